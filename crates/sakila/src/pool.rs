//! Pooled connections, one checked out per request.

use crate::error::{StoreError, StoreResult};
use deadpool_postgres::{Manager, ManagerConfig, Pool, PoolBuilder, RecyclingMethod};
use tokio_postgres::NoTls;

/// Create a connection pool from a database URL.
///
/// Building the pool does not connect; the first `pool.get()` does.
///
/// # Example
///
/// ```ignore
/// let pool = sakila::create_pool("postgres://postgres@localhost/pagila", 16)?;
/// let client = pool.get().await?;
/// ```
pub fn create_pool(database_url: &str, max_size: usize) -> StoreResult<Pool> {
    create_pool_with(database_url, default_manager_config(), |builder| {
        builder.max_size(max_size)
    })
}

/// Like [`create_pool`], with caller-supplied recycling and builder settings.
pub fn create_pool_with(
    database_url: &str,
    manager_config: ManagerConfig,
    configure_pool: impl FnOnce(PoolBuilder) -> PoolBuilder,
) -> StoreResult<Pool> {
    let pg_config: tokio_postgres::Config = database_url
        .parse()
        .map_err(|e: tokio_postgres::Error| StoreError::Connection(e.to_string()))?;

    let mgr = Manager::from_config(pg_config, NoTls, manager_config);
    configure_pool(Pool::builder(mgr))
        .build()
        .map_err(|e| StoreError::Pool(e.to_string()))
}

/// Recycling issues `ROLLBACK`, which is a no-op outside a transaction.
///
/// A request future dropped between `BEGIN` and `COMMIT` returns its
/// connection with the transaction still open; this closes it before the
/// connection is handed out again.
fn default_manager_config() -> ManagerConfig {
    ManagerConfig {
        recycling_method: RecyclingMethod::Custom("ROLLBACK".to_string()),
    }
}
