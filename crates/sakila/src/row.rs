//! Decoding result rows into the entity structs in [`crate::repo`].

use crate::error::{StoreError, StoreResult};
use tokio_postgres::Row;

pub trait FromRow: Sized {
    fn from_row(row: &Row) -> StoreResult<Self>;
}

pub trait RowExt {
    /// Read `column`, naming it in the error when the type does not match.
    fn try_get_column<T>(&self, column: &str) -> StoreResult<T>
    where
        T: for<'a> tokio_postgres::types::FromSql<'a>;
}

impl RowExt for Row {
    fn try_get_column<T>(&self, column: &str) -> StoreResult<T>
    where
        T: for<'a> tokio_postgres::types::FromSql<'a>,
    {
        self.try_get(column)
            .map_err(|e| StoreError::decode(column, e.to_string()))
    }
}

/// Map every row with `T::from_row`.
pub fn map_rows<T: FromRow>(rows: &[Row]) -> StoreResult<Vec<T>> {
    rows.iter().map(T::from_row).collect()
}
