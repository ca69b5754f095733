/**
 * Store Selection
 *
 * Connects to PostgreSQL when `DATABASE_URL` is configured and runs the
 * embedded migrations. Without a URL, or when the connection fails, the
 * server keeps running on in-memory stores.
 */

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::sync::Arc;

use crate::backend::messaging::db::{MemoryMessageStore, MessageStore, PgMessageStore};
use crate::backend::store::{MemoryUserStore, PgUserStore, UserStore};
use crate::shared::config::ServerConfig;

/// The user and message stores the server runs on
pub struct Stores {
    pub users: Arc<dyn UserStore>,
    pub messages: Arc<dyn MessageStore>,
}

impl Stores {
    pub fn in_memory() -> Self {
        Self {
            users: Arc::new(MemoryUserStore::new()),
            messages: Arc::new(MemoryMessageStore::new()),
        }
    }

    pub fn postgres(pool: PgPool) -> Self {
        Self {
            users: Arc::new(PgUserStore::new(pool.clone())),
            messages: Arc::new(PgMessageStore::new(pool)),
        }
    }
}

/// Connect to the database and run migrations
///
/// Returns `None` when no URL is configured or the connection fails.
pub async fn load_database(config: &ServerConfig) -> Option<PgPool> {
    let Some(database_url) = config.database_url.as_deref() else {
        tracing::warn!("DATABASE_URL not set. Using in-memory stores.");
        return None;
    };

    tracing::info!("Connecting to database...");
    let pool = match PgPoolOptions::new().max_connections(10).connect(database_url).await {
        Ok(pool) => pool,
        Err(e) => {
            tracing::error!("Failed to create database connection pool: {:?}", e);
            tracing::warn!("Falling back to in-memory stores.");
            return None;
        }
    };
    tracing::info!("Database connection pool created successfully");

    tracing::info!("Running database migrations...");
    if let Err(e) = sqlx::migrate!().run(&pool).await {
        tracing::error!("Failed to run database migrations: {}", e);
        tracing::warn!("Continuing without migrations - database might not be up to date");
    } else {
        tracing::info!("Database migrations completed successfully");
    }

    Some(pool)
}

/// Pick the stores for `config`
pub async fn load_stores(config: &ServerConfig) -> Stores {
    match load_database(config).await {
        Some(pool) => Stores::postgres(pool),
        None => Stores::in_memory(),
    }
}
