//! HTTP handlers
//!
//! Axum request handlers for the API endpoints.

pub mod content;

pub use content::{
    content_exists, create_content, delete_content, get_content, list_content, update_content,
};
