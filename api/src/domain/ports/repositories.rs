//! Repository port traits
//!
//! These traits define the interface for data persistence.
//! Implementations are provided by adapters (e.g., SQL via SeaORM).

use async_trait::async_trait;

use chrono::{DateTime, Utc};

use crate::domain::entities::{Content, ContentId, NewContent};
use crate::error::DomainError;

/// Repository for Content records
///
/// Write operations report the number of rows they touched so that callers can
/// tell a silent no-op from a successful write.
#[async_trait]
pub trait ContentRepository: Send + Sync {
    /// Insert a new record and return its generated identifier
    ///
    /// Both timestamps are set to the insertion time.
    async fn insert(&self, content: &NewContent) -> Result<ContentId, DomainError>;

    /// Find a record by ID
    async fn find_by_id(&self, id: &ContentId) -> Result<Option<Content>, DomainError>;

    /// Find a record by ID and hold its row against other writers until the
    /// surrounding transaction ends
    async fn lock_by_id(&self, id: &ContentId) -> Result<Option<Content>, DomainError>;

    /// List all records, most recently created first
    async fn find_all(&self) -> Result<Vec<Content>, DomainError>;

    /// Replace the body and set `updated_at`
    async fn update_text(
        &self,
        id: &ContentId,
        text: &str,
        updated_at: DateTime<Utc>,
    ) -> Result<u64, DomainError>;

    /// Delete a record
    async fn delete_by_id(&self, id: &ContentId) -> Result<u64, DomainError>;

    /// Total number of records
    async fn count(&self) -> Result<u64, DomainError>;
}

/// Content repository that can open transactions
///
/// Writes made through the returned transaction become visible to other
/// callers only on `commit`.
#[async_trait]
pub trait TransactionalContentRepository: ContentRepository {
    type Transaction: ContentTransaction;

    /// Open a transaction over the same store
    async fn begin(&self) -> Result<Self::Transaction, DomainError>;
}

/// Content repository bound to an open transaction
///
/// Dropping it without calling `commit` rolls back every write made through it.
#[async_trait]
pub trait ContentTransaction: ContentRepository + Sized {
    async fn commit(self) -> Result<(), DomainError>;
}
