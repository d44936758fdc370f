//! Statements for each table of the sample database.
//!
//! Every module exposes the statements it runs as `*_query` / `*_plan`
//! builders next to the async functions that execute them, so the SQL can be
//! inspected without a connection.

pub mod actor;
pub mod category;
pub mod customer;
pub mod film;
pub mod staff;

use crate::bound::BoundQuery;
use crate::client::Executor;
use crate::error::StoreResult;
use crate::row::{FromRow, map_rows};

pub(crate) async fn fetch_all<T: FromRow>(
    db: &impl Executor,
    q: &BoundQuery,
) -> StoreResult<Vec<T>> {
    let rows = db.query(q).await?;
    map_rows(&rows)
}

pub(crate) async fn fetch_opt<T: FromRow>(
    db: &impl Executor,
    q: &BoundQuery,
) -> StoreResult<Option<T>> {
    let row = db.query_opt(q).await?;
    row.as_ref().map(T::from_row).transpose()
}
