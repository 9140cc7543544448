pub mod admin;
pub mod middleware;
