//! Server state
//!
//! [`ServerState`] holds the shared handles every handler needs: the
//! configuration, the SQLite pool and the notification sink. Cloning
//! is cheap (pool and notifier are internally reference-counted).

use crate::core::Config;
use crate::db::DbService;
use crate::services::Notifier;
use sqlx::SqlitePool;

#[derive(Clone)]
pub struct ServerState {
    /// Server configuration (immutable after startup)
    pub config: Config,
    /// SQLite connection pool
    pub pool: SqlitePool,
    /// Mutation event broadcast
    pub notifier: Notifier,
}

impl ServerState {
    pub fn new(config: Config, pool: SqlitePool, notifier: Notifier) -> Self {
        Self {
            config,
            pool,
            notifier,
        }
    }

    /// Initialize state: work dir layout, database, notifier.
    pub async fn initialize(config: &Config) -> anyhow::Result<Self> {
        config.ensure_work_dir_structure()?;

        let db_path = config.database_dir().join("cantina.db");
        let db = DbService::new(&db_path.to_string_lossy()).await?;

        Ok(Self::new(config.clone(), db.pool, Notifier::default()))
    }
}
