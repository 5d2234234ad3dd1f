//! Content domain entity
//!
//! A user-supplied text blob with an identifier and two timestamps.
//! This is the only persisted resource of the service.

use std::hash::{Hash, Hasher};

use chrono::{DateTime, Utc};

use crate::error::DomainError;

/// Maximum number of characters a content body may hold
pub const MAX_CONTENT_LENGTH: usize = 5000;

/// Number of characters kept by [`Content::preview`]
const PREVIEW_LENGTH: usize = 50;

/// Row identity of a content record, assigned by the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContentId(pub i64);

impl ContentId {
    /// Identifiers handed out by the store are always positive
    pub fn is_valid(&self) -> bool {
        self.0 > 0
    }

    /// Fail with `InvalidInput` unless the id could refer to a stored row
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.is_valid() {
            Ok(())
        } else {
            Err(DomainError::InvalidInput(format!(
                "Invalid content ID: {}",
                self.0
            )))
        }
    }
}

impl From<i64> for ContentId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for ContentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A persisted content record
///
/// Equality and hashing compare the id only: two values describe the same
/// record if they point at the same row, whatever their field values.
#[derive(Debug, Clone)]
pub struct Content {
    pub id: ContentId,
    pub text: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Content {
    /// Short form of the body for log lines
    pub fn preview(&self) -> String {
        preview(&self.text)
    }
}

impl PartialEq for Content {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Content {}

impl Hash for Content {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// Data needed to create a new content record
#[derive(Debug, Clone)]
pub struct NewContent {
    pub text: String,
}

impl NewContent {
    /// Validate the body and build a new record
    pub fn new(text: &str) -> Result<Self, DomainError> {
        validate_text(text)?;
        Ok(Self {
            text: text.to_string(),
        })
    }
}

/// Check that a body is non-blank and at most [`MAX_CONTENT_LENGTH`] characters
pub fn validate_text(text: &str) -> Result<(), DomainError> {
    if text.trim().is_empty() {
        return Err(DomainError::InvalidInput(
            "Content cannot be empty".to_string(),
        ));
    }

    let length = text.chars().count();
    if length > MAX_CONTENT_LENGTH {
        return Err(DomainError::InvalidInput(format!(
            "Content must not exceed {} characters (got {})",
            MAX_CONTENT_LENGTH, length
        )));
    }

    Ok(())
}

/// Truncate a body to its first few characters for logging
pub fn preview(text: &str) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(PREVIEW_LENGTH).collect();
    if chars.next().is_some() {
        format!("{}...", head)
    } else {
        head
    }
}
