//! Connection setup and schema bootstrap

use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbBackend, DbErr};

use crate::error::DomainError;

const SQLITE_SCHEMA: &str = "CREATE TABLE IF NOT EXISTS content (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    content VARCHAR(5000) NOT NULL,
    created_at TIMESTAMP NOT NULL,
    updated_at TIMESTAMP NOT NULL
)";

const POSTGRES_SCHEMA: &str = "CREATE TABLE IF NOT EXISTS content (
    id BIGSERIAL PRIMARY KEY,
    content VARCHAR(5000) NOT NULL,
    created_at TIMESTAMPTZ NOT NULL,
    updated_at TIMESTAMPTZ NOT NULL
)";

/// Open a connection pool for the given URL
///
/// In-memory SQLite databases live inside a single connection, so the pool is
/// pinned to exactly one connection for them.
pub async fn connect(
    database_url: &str,
    max_connections: u32,
) -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new(database_url.to_string());

    if database_url.contains(":memory:") {
        options.max_connections(1).min_connections(1);
    } else {
        options.max_connections(max_connections);
    }
    options.sqlx_logging(false);

    Database::connect(options).await
}

/// Create the `content` table if it does not exist yet
pub async fn ensure_schema(db: &DatabaseConnection) -> Result<(), DomainError> {
    let ddl = match db.get_database_backend() {
        DbBackend::Sqlite => SQLITE_SCHEMA,
        DbBackend::Postgres => POSTGRES_SCHEMA,
        backend => {
            return Err(DomainError::Storage(format!(
                "Unsupported database backend: {:?}",
                backend
            )))
        }
    };

    db.execute_unprepared(ddl).await?;
    tracing::debug!("Content schema ready");

    Ok(())
}
