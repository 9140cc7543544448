use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Occupation {
    Student,
    Working,
    Unemployed,
    Other,
}

impl Occupation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Occupation::Student => "Student",
            Occupation::Working => "Working",
            Occupation::Unemployed => "Unemployed",
            Occupation::Other => "Other",
        }
    }
}

/// One form submission. Never persisted on its own.
#[derive(Debug, Clone, PartialEq)]
pub struct RawInput {
    pub age: i32,
    pub gender: Gender,
    pub occupation: Occupation,
    pub sleep_hours: i32,
    pub activity_level: i32,
    pub social_media_time: i32,
    pub post_text: String,
}
