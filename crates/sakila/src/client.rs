//! Executor trait for unified database access.

use crate::bound::BoundQuery;
use crate::error::{StoreError, StoreResult};
use tokio_postgres::Row;

/// The statement interface every store operation runs against.
///
/// One executor is one physical connection. `begin`, `commit` and `rollback`
/// act on that connection, so a transaction must keep using the executor it
/// was begun on until it ends.
pub trait Executor: Send + Sync {
    /// Execute a query and return all rows.
    fn query(
        &self,
        q: &BoundQuery,
    ) -> impl std::future::Future<Output = StoreResult<Vec<Row>>> + Send;

    /// Execute a query and return the first row, if any.
    ///
    /// Semantics:
    /// - 0 rows: returns `Ok(None)`
    /// - 1 row: returns `Ok(Some(row))`
    /// - multiple rows: returns `Ok(Some(first_row))` (does **not** error)
    fn query_opt(
        &self,
        q: &BoundQuery,
    ) -> impl std::future::Future<Output = StoreResult<Option<Row>>> + Send {
        async move {
            let rows = self.query(q).await?;
            Ok(rows.into_iter().next())
        }
    }

    /// Execute a statement and return the number of affected rows.
    fn execute(&self, q: &BoundQuery) -> impl std::future::Future<Output = StoreResult<u64>> + Send;

    /// Execute an `INSERT ... RETURNING <key>` and return the generated key.
    fn insert_returning_key(
        &self,
        q: &BoundQuery,
    ) -> impl std::future::Future<Output = StoreResult<i32>> + Send;

    fn begin(&self) -> impl std::future::Future<Output = StoreResult<()>> + Send;

    fn commit(&self) -> impl std::future::Future<Output = StoreResult<()>> + Send;

    fn rollback(&self) -> impl std::future::Future<Output = StoreResult<()>> + Send;
}

fn log_statement(q: &BoundQuery) {
    #[cfg(feature = "tracing")]
    tracing::debug!(
        target: "sakila.sql",
        sql = %q.to_sql(),
        param_count = q.params().len(),
    );
    #[cfg(not(feature = "tracing"))]
    let _ = q;
}

fn first_key(row: Option<Row>) -> StoreResult<i32> {
    let row = row.ok_or_else(|| StoreError::not_found("INSERT returned no generated key"))?;
    row.try_get::<_, i32>(0)
        .map_err(|e| StoreError::decode("0", e.to_string()))
}

impl Executor for tokio_postgres::Client {
    async fn query(&self, q: &BoundQuery) -> StoreResult<Vec<Row>> {
        log_statement(q);
        let sql = q.to_sql();
        tokio_postgres::Client::query(self, sql.as_str(), &q.params_ref())
            .await
            .map_err(StoreError::from_db_error)
    }

    async fn execute(&self, q: &BoundQuery) -> StoreResult<u64> {
        log_statement(q);
        let sql = q.to_sql();
        tokio_postgres::Client::execute(self, sql.as_str(), &q.params_ref())
            .await
            .map_err(StoreError::from_db_error)
    }

    async fn insert_returning_key(&self, q: &BoundQuery) -> StoreResult<i32> {
        log_statement(q);
        let sql = q.to_sql();
        let row = tokio_postgres::Client::query_opt(self, sql.as_str(), &q.params_ref())
            .await
            .map_err(StoreError::from_db_error)?;
        first_key(row)
    }

    async fn begin(&self) -> StoreResult<()> {
        self.batch_execute("BEGIN")
            .await
            .map_err(StoreError::from_db_error)
    }

    async fn commit(&self) -> StoreResult<()> {
        self.batch_execute("COMMIT")
            .await
            .map_err(StoreError::from_db_error)
    }

    async fn rollback(&self) -> StoreResult<()> {
        self.batch_execute("ROLLBACK")
            .await
            .map_err(StoreError::from_db_error)
    }
}

// ===== deadpool-postgres support =====

#[cfg(feature = "pool")]
impl Executor for deadpool_postgres::Client {
    async fn query(&self, q: &BoundQuery) -> StoreResult<Vec<Row>> {
        // Delegate to the deref target (tokio_postgres::Client).
        let client: &tokio_postgres::Client = self;
        Executor::query(client, q).await
    }

    async fn execute(&self, q: &BoundQuery) -> StoreResult<u64> {
        let client: &tokio_postgres::Client = self;
        Executor::execute(client, q).await
    }

    async fn insert_returning_key(&self, q: &BoundQuery) -> StoreResult<i32> {
        let client: &tokio_postgres::Client = self;
        Executor::insert_returning_key(client, q).await
    }

    async fn begin(&self) -> StoreResult<()> {
        let client: &tokio_postgres::Client = self;
        Executor::begin(client).await
    }

    async fn commit(&self) -> StoreResult<()> {
        let client: &tokio_postgres::Client = self;
        Executor::commit(client).await
    }

    async fn rollback(&self) -> StoreResult<()> {
        let client: &tokio_postgres::Client = self;
        Executor::rollback(client).await
    }
}

// ===== Reference implementation =====

impl<E: Executor> Executor for &E {
    fn query(
        &self,
        q: &BoundQuery,
    ) -> impl std::future::Future<Output = StoreResult<Vec<Row>>> + Send {
        (*self).query(q)
    }

    fn query_opt(
        &self,
        q: &BoundQuery,
    ) -> impl std::future::Future<Output = StoreResult<Option<Row>>> + Send {
        (*self).query_opt(q)
    }

    fn execute(
        &self,
        q: &BoundQuery,
    ) -> impl std::future::Future<Output = StoreResult<u64>> + Send {
        (*self).execute(q)
    }

    fn insert_returning_key(
        &self,
        q: &BoundQuery,
    ) -> impl std::future::Future<Output = StoreResult<i32>> + Send {
        (*self).insert_returning_key(q)
    }

    fn begin(&self) -> impl std::future::Future<Output = StoreResult<()>> + Send {
        (*self).begin()
    }

    fn commit(&self) -> impl std::future::Future<Output = StoreResult<()>> + Send {
        (*self).commit()
    }

    fn rollback(&self) -> impl std::future::Future<Output = StoreResult<()>> + Send {
        (*self).rollback()
    }
}
