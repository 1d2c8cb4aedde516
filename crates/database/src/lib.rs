//! SQLite persistence layer for Vita.
//!
//! This crate provides async database operations for user profiles, chat
//! exchanges, derived behaviour profiles, and daily activity logs using
//! SQLx with SQLite.
//!
//! # Example
//!
//! ```no_run
//! use database::{user, Database};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Connect and run migrations
//!     let db = Database::connect("sqlite:vita.db?mode=rwc").await?;
//!     db.migrate().await?;
//!
//!     // First contact creates an empty profile at onboarding step 0
//!     let profile = user::get_or_create(db.pool(), "+918971780778").await?;
//!     assert_eq!(profile.onboarding_step, 0);
//!
//!     Ok(())
//! }
//! ```

pub mod activity_log;
pub mod behaviour;
pub mod embedding;
pub mod error;
pub mod exchange;
pub mod models;
pub mod user;

pub use error::{DatabaseError, Result};
pub use models::{ActivityLog, Exchange, NewExchange, UserBehaviour, UserProfile};

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;

/// Database connection wrapper.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Default pool size for database connections.
    ///
    /// Each inbound message is an independent task that reads and writes
    /// the profile store, so the pool must cover concurrent turns.
    const DEFAULT_POOL_SIZE: u32 = 10;

    /// Connect to a SQLite database.
    ///
    /// The URL should be in the format `sqlite:path/to/db.sqlite?mode=rwc`.
    /// Use `?mode=rwc` to create the database file if it doesn't exist, or
    /// `sqlite::memory:` for tests.
    pub async fn connect(url: &str) -> Result<Self> {
        Self::connect_with_pool_size(url, Self::DEFAULT_POOL_SIZE).await
    }

    /// Connect to a SQLite database with a custom pool size.
    pub async fn connect_with_pool_size(url: &str, pool_size: u32) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(pool_size)
            .acquire_timeout(std::time::Duration::from_secs(30))
            .connect_with(options)
            .await?;

        tracing::info!("Connected to database: {} (pool size: {})", url, pool_size);

        Ok(Self { pool })
    }

    /// Run database migrations.
    ///
    /// This should be called once after connecting to ensure the schema is
    /// up to date.
    pub async fn migrate(&self) -> Result<()> {
        tracing::info!("Running database migrations...");

        sqlx::migrate!("./migrations").run(&self.pool).await?;

        tracing::info!("Migrations complete");
        Ok(())
    }

    /// Get a reference to the connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Close the database connection pool.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}
