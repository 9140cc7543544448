pub mod input;
pub mod mood;
pub mod prediction;
