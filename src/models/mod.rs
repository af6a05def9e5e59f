//! Data models for the library portal

pub mod book;
pub mod user;

// Re-export commonly used types
pub use book::Book;
pub use user::{Registration, Role, User};
