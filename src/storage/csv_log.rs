use std::fs::{self, OpenOptions};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::storage::schema::LogSchema;

#[derive(Debug, thiserror::Error)]
pub enum LogError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("{path:?} header does not match the {schema} log schema (expected {expected:?}, found {found:?})")]
    HeaderMismatch {
        path: PathBuf,
        schema: &'static str,
        expected: Vec<String>,
        found: Vec<String>,
    },

    #[error("record has {got} fields but the log has {expected} columns")]
    Arity { expected: usize, got: usize },

    #[error("record is missing column {0}")]
    MissingColumn(String),

    #[error("log task failed: {0}")]
    Task(String),
}

/// Header plus data rows of one log file.
#[derive(Debug, Clone, Default)]
pub struct LogTable {
    pub columns: Vec<String>,
    pub rows: Vec<csv::StringRecord>,
}

impl LogTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

fn check_header(path: &Path, found: &csv::StringRecord, schema: &LogSchema) -> Result<(), LogError> {
    if found.iter().eq(schema.columns.iter().map(String::as_str)) {
        return Ok(());
    }
    Err(LogError::HeaderMismatch {
        path: path.to_path_buf(),
        schema: schema.name,
        expected: schema.columns.clone(),
        found: found.iter().map(str::to_string).collect(),
    })
}

/// Appends one record. A missing or empty file gets the schema header first;
/// an existing file must already carry that exact header.
pub fn append_log(path: &Path, record: &[String], schema: &LogSchema) -> Result<(), LogError> {
    if record.len() != schema.columns.len() {
        return Err(LogError::Arity {
            expected: schema.columns.len(),
            got: record.len(),
        });
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let needs_header = match fs::metadata(path) {
        Ok(meta) => meta.len() == 0,
        Err(e) if e.kind() == ErrorKind::NotFound => true,
        Err(e) => return Err(e.into()),
    };

    if !needs_header {
        let mut reader = csv::ReaderBuilder::new().has_headers(true).from_path(path)?;
        check_header(path, reader.headers()?, schema)?;
    }

    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let mut writer = csv::WriterBuilder::new().has_headers(false).from_writer(file);
    if needs_header {
        writer.write_record(&schema.columns)?;
    }
    writer.write_record(record)?;
    writer.flush()?;

    Ok(())
}

/// Reads a whole log. `Ok(None)` when the file does not exist yet.
pub fn read_log(path: &Path, schema: &LogSchema) -> Result<Option<LogTable>, LogError> {
    let file = match fs::File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };

    let mut reader = csv::ReaderBuilder::new().has_headers(true).from_reader(file);
    let headers = reader.headers()?.clone();
    if headers.is_empty() {
        return Ok(Some(LogTable {
            columns: schema.columns.clone(),
            rows: Vec::new(),
        }));
    }
    check_header(path, &headers, schema)?;

    let rows = reader.records().collect::<Result<Vec<_>, _>>()?;
    Ok(Some(LogTable {
        columns: schema.columns.clone(),
        rows,
    }))
}

/// Raw bytes of a log for export. `Ok(None)` when the file does not exist.
pub fn read_raw(path: &Path) -> Result<Option<Vec<u8>>, LogError> {
    match fs::read(path) {
        Ok(bytes) => Ok(Some(bytes)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}
