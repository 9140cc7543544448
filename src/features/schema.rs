use std::collections::HashSet;

/// Ordered list of feature columns the model was fit against.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureSchema {
    columns: Vec<String>,
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum SchemaError {
    #[error("duplicate feature column: {0}")]
    Duplicate(String),

    #[error("feature column {0} collides with a reserved column name")]
    Reserved(String),
}

impl FeatureSchema {
    pub fn new<I, S>(columns: I) -> Result<Self, SchemaError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let columns: Vec<String> = columns.into_iter().map(Into::into).collect();
        let mut seen = HashSet::with_capacity(columns.len());
        for col in &columns {
            if !seen.insert(col.as_str()) {
                return Err(SchemaError::Duplicate(col.clone()));
            }
        }
        Ok(Self { columns })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn position(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == column)
    }

    pub fn contains(&self, column: &str) -> bool {
        self.position(column).is_some()
    }

    /// Fails on the first column that appears in `reserved`.
    pub fn reject_reserved(&self, reserved: &[&str]) -> Result<(), SchemaError> {
        match self.columns.iter().find(|c| reserved.iter().any(|r| *r == c.as_str())) {
            Some(col) => Err(SchemaError::Reserved(col.clone())),
            None => Ok(()),
        }
    }
}
