//! SQLite-backed user table.

use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

use crate::config::StoreConfig;

const CREATE_USERS_TABLE: &str = "
    CREATE TABLE IF NOT EXISTS users (
        id INTEGER PRIMARY KEY,
        name TEXT NOT NULL
    )
";

const INSERT_USER: &str = "INSERT INTO users (id, name) VALUES (?, ?)";

/// The single statement issued per lookup.
pub const SELECT_NAME_BY_ID: &str = "SELECT name FROM users WHERE id = ?";

/// Error type for data store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("no user with id `{id}`")]
    NotFound { id: String },

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl StoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }
}

/// Pooled handle to the user table. Cheap to clone.
#[derive(Debug, Clone)]
pub struct UserStore {
    pool: SqlitePool,
}

impl UserStore {
    /// Open the pool, create the table if absent and seed the default record.
    pub async fn open(config: &StoreConfig) -> Result<Self, StoreError> {
        let store = Self::connect(config).await?;
        store.migrate().await?;
        store.seed(config.seed_id, &config.seed_name).await;
        Ok(store)
    }

    /// Open the connection pool.
    ///
    /// At least one connection is kept open so an in-memory database lives as
    /// long as the pool.
    pub async fn connect(config: &StoreConfig) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str(&config.url)?;
        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        tracing::info!(
            url = %config.url,
            max_connections = config.max_connections,
            "Data store connected"
        );

        Ok(Self { pool })
    }

    /// Connections currently held by the pool, idle or in use.
    pub fn connections(&self) -> u32 {
        self.pool.size()
    }

    /// Pooled connections not checked out.
    pub fn idle_connections(&self) -> usize {
        self.pool.num_idle()
    }

    /// Create the user table if it does not exist yet.
    pub async fn migrate(&self) -> Result<(), StoreError> {
        sqlx::query(CREATE_USERS_TABLE).execute(&self.pool).await?;
        Ok(())
    }

    /// Insert the default record. Returns whether a row was written.
    ///
    /// A failed insert (usually the record already exists) is logged and
    /// otherwise ignored.
    pub async fn seed(&self, id: i64, name: &str) -> bool {
        match sqlx::query(INSERT_USER)
            .bind(id)
            .bind(name)
            .execute(&self.pool)
            .await
        {
            Ok(_) => {
                tracing::info!(id, name, "Seeded default user");
                true
            }
            Err(e) => {
                tracing::warn!(id, error = %e, "Default user not seeded, it may already exist");
                false
            }
        }
    }

    /// Look up the name stored under `id`.
    pub async fn fetch_name(&self, id: &str) -> Result<String, StoreError> {
        sqlx::query_scalar::<_, String>(SELECT_NAME_BY_ID)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| StoreError::NotFound { id: id.to_string() })
    }
}
