//! SQL adapters
//!
//! Implementations of repository traits using SeaORM. The same adapter serves
//! PostgreSQL and SQLite; the backend is picked from the connection URL.

pub mod content_repo;
pub mod database;


pub use content_repo::SqlContentRepository;
pub use database::{connect, ensure_schema};
