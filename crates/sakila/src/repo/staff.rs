//! `staff` rows. Read-only; credentials and pictures are never selected.

use crate::bound::BoundQuery;
use crate::client::Executor;
use crate::error::StoreResult;
use crate::row::{FromRow, RowExt};
use serde::Serialize;
use tokio_postgres::Row;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Staff {
    pub staff_id: i32,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
}

impl FromRow for Staff {
    fn from_row(row: &Row) -> StoreResult<Self> {
        Ok(Self {
            staff_id: row.try_get_column("staff_id")?,
            first_name: row.try_get_column("first_name")?,
            last_name: row.try_get_column("last_name")?,
            email: row.try_get_column("email")?,
        })
    }
}

pub fn list_query() -> BoundQuery {
    BoundQuery::new("SELECT staff_id, first_name, last_name, email FROM staff ORDER BY staff_id")
}

pub async fn list(db: &impl Executor) -> StoreResult<Vec<Staff>> {
    super::fetch_all(db, &list_query()).await
}
