//! SQLite record store for the ledger exports.
//!
//! This crate provides async access to orders, payment transactions,
//! withdrawal requests and stored narrative reports using SQLx with SQLite.
//! Every ledger query takes a [`DateWindow`] over `created_at` and returns
//! rows ordered by `(created_at, id)`.
//!
//! # Example
//!
//! ```no_run
//! use database::{Database, RecordStore};
//! use ledger_core::DateWindow;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Database::connect("sqlite:ledger.db?mode=rwc").await?;
//!     db.migrate().await?;
//!
//!     let window = DateWindow::parse(Some("2024-01-01"), None)?;
//!     let orders = db.settled_orders(&window).await?;
//!     println!("{} settled orders", orders.len());
//!
//!     Ok(())
//! }
//! ```
//!
//! [`DateWindow`]: ledger_core::DateWindow

pub mod error;
pub mod models;
pub mod order;
pub mod report;
pub mod store;
pub mod timestamp;
pub mod transaction;
pub mod validation;
pub mod withdrawal;

pub use error::{DatabaseError, Result};
pub use store::RecordStore;
pub use validation::{ReportId, ValidationError};

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
    /// Each export issues up to three concurrent queries.
    const DEFAULT_POOL_SIZE: u32 = 12;

    /// Connect to a SQLite database.
    ///
    /// The URL should be in the format `sqlite:path/to/db.sqlite?mode=rwc`.
    /// Use `?mode=rwc` to create the database file if it doesn't exist.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # async fn example() -> database::Result<()> {
    /// // File database
    /// let db = database::Database::connect("sqlite:data/ledger.db?mode=rwc").await?;
    ///
    /// // In-memory database (for testing)
    /// let db = database::Database::connect("sqlite::memory:").await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn connect(url: &str) -> Result<Self> {
        Self::connect_with_pool_size(url, Self::DEFAULT_POOL_SIZE).await
    }

    /// Connect to a SQLite database with a custom pool size.
    pub async fn connect_with_pool_size(url: &str, pool_size: u32) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(pool_size)
            .acquire_timeout(std::time::Duration::from_secs(30))
            .connect_with(options)
            .await?;

        tracing::info!(
            "Connected to database: {} (pool size: {})",
            url,
            pool_size
        );

        Ok(Self { pool })
    }

    /// Run database migrations.
    ///
    /// This should be called once after connecting to ensure the schema is up to date.
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
