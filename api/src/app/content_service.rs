//! Content service
//!
//! Validation and existence checks around the content repository. Every
//! write runs its check, write and read-back inside one transaction.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};

use crate::domain::entities::{validate_text, Content, ContentId, NewContent};
use crate::domain::ports::{ContentRepository, ContentTransaction, TransactionalContentRepository};
use crate::error::DomainError;

/// Service for managing content records
pub struct ContentService<CR>
where
    CR: TransactionalContentRepository,
{
    contents: Arc<CR>,
}

impl<CR> ContentService<CR>
where
    CR: TransactionalContentRepository,
{
    pub fn new(contents: Arc<CR>) -> Self {
        Self { contents }
    }

    /// Create a new content record
    ///
    /// Returns the stored record, including the id and timestamps the store
    /// assigned.
    pub async fn create(&self, text: &str) -> Result<Content, DomainError> {
        tracing::info!("Creating new content record");

        let new_content = NewContent::new(text).inspect_err(|e| {
            tracing::warn!(length = text.chars().count(), "Rejected content: {}", e);
        })?;

        let txn = self.contents.begin().await?;

        let id = txn.insert(&new_content).await.inspect_err(|e| {
            tracing::error!("Failed to insert content: {}", e);
        })?;

        let content = txn.find_by_id(&id).await?.ok_or_else(|| {
            DomainError::Storage(format!("Created content {} could not be read back", id))
        })?;

        txn.commit().await?;

        tracing::info!(content_id = %id, "Created content");
        Ok(content)
    }

    /// Find a content record by ID
    ///
    /// Non-positive ids cannot exist, so they yield `None` instead of an error.
    pub async fn find_by_id(&self, id: &ContentId) -> Result<Option<Content>, DomainError> {
        if !id.is_valid() {
            tracing::warn!(content_id = %id, "Invalid content ID requested");
            return Ok(None);
        }

        tracing::debug!(content_id = %id, "Finding content by ID");
        self.contents.find_by_id(id).await
    }

    /// List all content records, newest first
    pub async fn find_all(&self) -> Result<Vec<Content>, DomainError> {
        tracing::debug!("Finding all content records");
        self.contents.find_all().await
    }

    /// Replace the body of an existing record
    pub async fn update(&self, id: &ContentId, text: &str) -> Result<Content, DomainError> {
        tracing::info!(content_id = %id, "Updating content");

        id.validate().inspect_err(|_| {
            tracing::warn!(content_id = %id, "Invalid ID for update");
        })?;

        let txn = self.contents.begin().await?;
        let existing = require(&txn, id).await?;

        validate_text(text).inspect_err(|e| {
            tracing::warn!(content_id = %id, "Rejected content update: {}", e);
        })?;

        let touched_at = next_update_time(existing.updated_at);
        let rows = txn.update_text(id, text, touched_at).await?;
        if rows == 0 {
            tracing::error!(content_id = %id, "Update affected no rows");
            return Err(DomainError::Storage(format!(
                "Failed to update content {}",
                id
            )));
        }

        let updated = txn.find_by_id(id).await?.ok_or_else(|| not_found(id))?;
        txn.commit().await?;

        tracing::info!(content_id = %id, preview = %updated.preview(), "Updated content");
        Ok(updated)
    }

    /// Delete an existing record
    pub async fn delete(&self, id: &ContentId) -> Result<(), DomainError> {
        tracing::info!(content_id = %id, "Deleting content");

        id.validate().inspect_err(|_| {
            tracing::warn!(content_id = %id, "Invalid ID for delete");
        })?;

        let txn = self.contents.begin().await?;
        require(&txn, id).await?;

        let rows = txn.delete_by_id(id).await?;
        if rows == 0 {
            tracing::error!(content_id = %id, "Delete affected no rows");
            return Err(DomainError::Storage(format!(
                "Failed to delete content {}",
                id
            )));
        }

        txn.commit().await?;

        tracing::info!(content_id = %id, "Deleted content");
        Ok(())
    }

    /// Total number of stored records
    pub async fn count(&self) -> Result<u64, DomainError> {
        tracing::debug!("Counting content records");
        self.contents.count().await
    }

    /// Whether a record with this id exists; false for invalid ids
    pub async fn exists_by_id(&self, id: &ContentId) -> Result<bool, DomainError> {
        Ok(self.find_by_id(id).await?.is_some())
    }
}

/// Lock an existing row for the rest of the transaction
async fn require<T>(txn: &T, id: &ContentId) -> Result<Content, DomainError>
where
    T: ContentTransaction,
{
    txn.lock_by_id(id).await?.ok_or_else(|| {
        tracing::warn!(content_id = %id, "Content not found");
        not_found(id)
    })
}

fn not_found(id: &ContentId) -> DomainError {
    DomainError::NotFound(format!("Content not found with ID: {}", id))
}

/// Timestamp for an update: now, but always strictly after the previous one
fn next_update_time(previous: DateTime<Utc>) -> DateTime<Utc> {
    Utc::now().max(previous + Duration::microseconds(1))
}
