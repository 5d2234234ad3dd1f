//! Mock implementations of port traits
//!
//! These are in-memory implementations that can be configured for testing.
//! They store data in memory and allow tests to verify behavior.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};
use tokio::sync::{Mutex, Notify, OwnedMutexGuard};

use crate::domain::entities::{Content, ContentId, NewContent};
use crate::domain::ports::{ContentRepository, ContentTransaction, TransactionalContentRepository};
use crate::error::DomainError;

// ============================================================================
// In-Memory Content Repository
// ============================================================================

#[derive(Default)]
pub struct InMemoryContentRepository {
    contents: Arc<RwLock<BTreeMap<ContentId, Content>>>,
    last_id: Arc<RwLock<i64>>,
    /// Every call fails with a storage error
    should_fail: bool,
    /// Writes succeed but touch no rows
    drop_writes: bool,
    /// Held by the open transaction; transactions run one at a time
    txn_lock: Arc<Mutex<()>>,
}

impl InMemoryContentRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            should_fail: true,
            ..Self::default()
        }
    }

    pub fn dropping_writes() -> Self {
        Self {
            drop_writes: true,
            ..Self::default()
        }
    }

    /// Pre-populate with a record for testing
    pub fn with_content(self, content: Content) -> Self {
        {
            let mut last_id = self.last_id.write().unwrap();
            *last_id = (*last_id).max(content.id.0);
            self.contents.write().unwrap().insert(content.id, content);
        }
        self
    }

    fn check(&self) -> Result<(), DomainError> {
        if self.should_fail {
            Err(DomainError::Storage("Mock storage failure".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl ContentRepository for InMemoryContentRepository {
    async fn insert(&self, new_content: &NewContent) -> Result<ContentId, DomainError> {
        self.check()?;
        if self.drop_writes {
            return Err(DomainError::Storage("Insert affected no rows".to_string()));
        }

        let id = {
            let mut last_id = self.last_id.write().unwrap();
            *last_id += 1;
            ContentId(*last_id)
        };
        let now = Utc::now();
        let content = Content {
            id,
            text: new_content.text.clone(),
            created_at: now,
            updated_at: now,
        };
        self.contents.write().unwrap().insert(id, content);
        Ok(id)
    }

    async fn find_by_id(&self, id: &ContentId) -> Result<Option<Content>, DomainError> {
        self.check()?;
        Ok(self.contents.read().unwrap().get(id).cloned())
    }

    async fn lock_by_id(&self, id: &ContentId) -> Result<Option<Content>, DomainError> {
        self.find_by_id(id).await
    }

    async fn find_all(&self) -> Result<Vec<Content>, DomainError> {
        self.check()?;
        Ok(self.contents.read().unwrap().values().rev().cloned().collect())
    }

    async fn update_text(
        &self,
        id: &ContentId,
        text: &str,
        updated_at: DateTime<Utc>,
    ) -> Result<u64, DomainError> {
        self.check()?;
        if self.drop_writes {
            return Ok(0);
        }

        let mut contents = self.contents.write().unwrap();
        match contents.get_mut(id) {
            Some(content) => {
                content.text = text.to_string();
                content.updated_at = updated_at;
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn delete_by_id(&self, id: &ContentId) -> Result<u64, DomainError> {
        self.check()?;
        if self.drop_writes {
            return Ok(0);
        }

        let removed = self.contents.write().unwrap().remove(id);
        Ok(removed.map_or(0, |_| 1))
    }

    async fn count(&self) -> Result<u64, DomainError> {
        self.check()?;
        Ok(self.contents.read().unwrap().len() as u64)
    }
}

#[async_trait]
impl TransactionalContentRepository for InMemoryContentRepository {
    type Transaction = InMemoryContentTransaction;

    async fn begin(&self) -> Result<Self::Transaction, DomainError> {
        self.check()?;
        let guard = self.txn_lock.clone().lock_owned().await;

        // Work on a private copy; commit publishes it
        let staged = InMemoryContentRepository {
            contents: Arc::new(RwLock::new(self.contents.read().unwrap().clone())),
            last_id: Arc::new(RwLock::new(*self.last_id.read().unwrap())),
            should_fail: self.should_fail,
            drop_writes: self.drop_writes,
            txn_lock: Arc::default(),
        };

        Ok(InMemoryContentTransaction {
            staged,
            contents: self.contents.clone(),
            last_id: self.last_id.clone(),
            _guard: guard,
        })
    }
}

/// Open transaction on an [`InMemoryContentRepository`]
pub struct InMemoryContentTransaction {
    staged: InMemoryContentRepository,
    contents: Arc<RwLock<BTreeMap<ContentId, Content>>>,
    last_id: Arc<RwLock<i64>>,
    _guard: OwnedMutexGuard<()>,
}

#[async_trait]
impl ContentRepository for InMemoryContentTransaction {
    async fn insert(&self, new_content: &NewContent) -> Result<ContentId, DomainError> {
        self.staged.insert(new_content).await
    }

    async fn find_by_id(&self, id: &ContentId) -> Result<Option<Content>, DomainError> {
        self.staged.find_by_id(id).await
    }

    async fn lock_by_id(&self, id: &ContentId) -> Result<Option<Content>, DomainError> {
        self.staged.lock_by_id(id).await
    }

    async fn find_all(&self) -> Result<Vec<Content>, DomainError> {
        self.staged.find_all().await
    }

    async fn update_text(
        &self,
        id: &ContentId,
        text: &str,
        updated_at: DateTime<Utc>,
    ) -> Result<u64, DomainError> {
        self.staged.update_text(id, text, updated_at).await
    }

    async fn delete_by_id(&self, id: &ContentId) -> Result<u64, DomainError> {
        self.staged.delete_by_id(id).await
    }

    async fn count(&self) -> Result<u64, DomainError> {
        self.staged.count().await
    }
}

#[async_trait]
impl ContentTransaction for InMemoryContentTransaction {
    async fn commit(self) -> Result<(), DomainError> {
        self.staged.check()?;
        *self.contents.write().unwrap() = self.staged.contents.read().unwrap().clone();
        *self.last_id.write().unwrap() = *self.staged.last_id.read().unwrap();
        Ok(())
    }
}

// ============================================================================
// Gated Repository
// ============================================================================

/// Pauses the first `lock_by_id` call until released
///
/// Lets a test hold one transaction open at a known point while another
/// caller tries to write.
#[derive(Default)]
pub struct LookupGate {
    armed: AtomicBool,
    reached: Notify,
    resume: Notify,
}

impl LookupGate {
    pub fn armed() -> Arc<Self> {
        let gate = Self::default();
        gate.armed.store(true, Ordering::SeqCst);
        Arc::new(gate)
    }

    /// Wait until a caller is parked at the gate
    pub async fn wait_reached(&self) {
        self.reached.notified().await;
    }

    /// Let the parked caller continue
    pub fn release(&self) {
        self.resume.notify_one();
    }

    async fn pass(&self) {
        if self.armed.swap(false, Ordering::SeqCst) {
            self.reached.notify_one();
            self.resume.notified().await;
        }
    }
}

/// Wraps a repository (or its transactions) and parks at a [`LookupGate`]
/// right after the row lookup
pub struct GatedContentRepository<R> {
    inner: R,
    gate: Arc<LookupGate>,
}

impl<R> GatedContentRepository<R> {
    pub fn new(inner: R, gate: Arc<LookupGate>) -> Self {
        Self { inner, gate }
    }
}

#[async_trait]
impl<R> ContentRepository for GatedContentRepository<R>
where
    R: ContentRepository,
{
    async fn insert(&self, new_content: &NewContent) -> Result<ContentId, DomainError> {
        self.inner.insert(new_content).await
    }

    async fn find_by_id(&self, id: &ContentId) -> Result<Option<Content>, DomainError> {
        self.inner.find_by_id(id).await
    }

    async fn lock_by_id(&self, id: &ContentId) -> Result<Option<Content>, DomainError> {
        let found = self.inner.lock_by_id(id).await?;
        self.gate.pass().await;
        Ok(found)
    }

    async fn find_all(&self) -> Result<Vec<Content>, DomainError> {
        self.inner.find_all().await
    }

    async fn update_text(
        &self,
        id: &ContentId,
        text: &str,
        updated_at: DateTime<Utc>,
    ) -> Result<u64, DomainError> {
        self.inner.update_text(id, text, updated_at).await
    }

    async fn delete_by_id(&self, id: &ContentId) -> Result<u64, DomainError> {
        self.inner.delete_by_id(id).await
    }

    async fn count(&self) -> Result<u64, DomainError> {
        self.inner.count().await
    }
}

#[async_trait]
impl<R> TransactionalContentRepository for GatedContentRepository<R>
where
    R: TransactionalContentRepository,
{
    type Transaction = GatedContentRepository<R::Transaction>;

    async fn begin(&self) -> Result<Self::Transaction, DomainError> {
        let txn = self.inner.begin().await?;
        Ok(GatedContentRepository::new(txn, self.gate.clone()))
    }
}

#[async_trait]
impl<T> ContentTransaction for GatedContentRepository<T>
where
    T: ContentTransaction,
{
    async fn commit(self) -> Result<(), DomainError> {
        self.inner.commit().await
    }
}
