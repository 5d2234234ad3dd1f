//! SQL adapter for ContentRepository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};

use crate::domain::entities::{Content, ContentId, NewContent};
use crate::domain::ports::{ContentRepository, ContentTransaction, TransactionalContentRepository};
use crate::entity::content;
use crate::error::DomainError;

/// SeaORM implementation of ContentRepository
///
/// Runs on the connection pool by default; `begin` hands out the same
/// repository bound to a `DatabaseTransaction`.
pub struct SqlContentRepository<C = DatabaseConnection> {
    db: C,
}

impl<C> SqlContentRepository<C> {
    pub fn new(db: C) -> Self {
        Self { db }
    }
}

#[async_trait]
impl<C> ContentRepository for SqlContentRepository<C>
where
    C: ConnectionTrait + Send + Sync,
{
    async fn insert(&self, new_content: &NewContent) -> Result<ContentId, DomainError> {
        let now = Utc::now();

        let model = content::ActiveModel {
            content: Set(new_content.text.clone()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = content::Entity::insert(model)
            .exec(&self.db)
            .await
            .map_err(|e| match e {
                DbErr::RecordNotInserted => {
                    DomainError::Storage("Insert affected no rows".to_string())
                }
                e => DomainError::Storage(e.to_string()),
            })?;

        Ok(ContentId(result.last_insert_id))
    }

    async fn find_by_id(&self, id: &ContentId) -> Result<Option<Content>, DomainError> {
        let result = content::Entity::find_by_id(id.0).one(&self.db).await?;

        Ok(result.map(|m| m.into()))
    }

    async fn lock_by_id(&self, id: &ContentId) -> Result<Option<Content>, DomainError> {
        // SELECT ... FOR UPDATE; SQLite has no row locks and takes the
        // database write lock on the first write instead
        let result = content::Entity::find_by_id(id.0)
            .lock_exclusive()
            .one(&self.db)
            .await?;

        Ok(result.map(|m| m.into()))
    }

    async fn find_all(&self) -> Result<Vec<Content>, DomainError> {
        let results = content::Entity::find()
            .order_by_desc(content::Column::Id)
            .all(&self.db)
            .await?;

        Ok(results.into_iter().map(|m| m.into()).collect())
    }

    async fn update_text(
        &self,
        id: &ContentId,
        text: &str,
        updated_at: DateTime<Utc>,
    ) -> Result<u64, DomainError> {
        let result = content::Entity::update_many()
            .col_expr(content::Column::Content, Expr::value(text))
            .col_expr(content::Column::UpdatedAt, Expr::value(updated_at))
            .filter(content::Column::Id.eq(id.0))
            .exec(&self.db)
            .await?;

        Ok(result.rows_affected)
    }

    async fn delete_by_id(&self, id: &ContentId) -> Result<u64, DomainError> {
        let result = content::Entity::delete_by_id(id.0).exec(&self.db).await?;

        Ok(result.rows_affected)
    }

    async fn count(&self) -> Result<u64, DomainError> {
        Ok(content::Entity::find().count(&self.db).await?)
    }
}

#[async_trait]
impl TransactionalContentRepository for SqlContentRepository {
    type Transaction = SqlContentRepository<DatabaseTransaction>;

    async fn begin(&self) -> Result<Self::Transaction, DomainError> {
        let txn = self.db.begin().await?;
        Ok(SqlContentRepository::new(txn))
    }
}

#[async_trait]
impl ContentTransaction for SqlContentRepository<DatabaseTransaction> {
    async fn commit(self) -> Result<(), DomainError> {
        self.db.commit().await?;
        Ok(())
    }
}

/// Convert SeaORM model to domain entity
impl From<content::Model> for Content {
    fn from(model: content::Model) -> Self {
        Content {
            id: ContentId(model.id),
            text: model.content,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
