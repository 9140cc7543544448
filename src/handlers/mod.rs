pub mod admin;
pub mod email;
pub mod health;
pub mod mood;
pub mod predict;
