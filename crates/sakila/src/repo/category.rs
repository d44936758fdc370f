//! `category` rows.

use crate::bound::BoundQuery;
use crate::client::Executor;
use crate::error::StoreResult;
use crate::row::{FromRow, RowExt};
use crate::validate::{Validate, ValidationErrors, check_len};
use crate::value::Value;
use serde::{Deserialize, Serialize};
use tokio_postgres::Row;

pub const NAME_MAX: usize = 25;

const SELECT_CATEGORIES: &str = "SELECT category_id, name FROM category";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Category {
    pub category_id: i32,
    pub name: String,
}

impl FromRow for Category {
    fn from_row(row: &Row) -> StoreResult<Self> {
        Ok(Self {
            category_id: row.try_get_column("category_id")?,
            name: row.try_get_column("name")?,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryInput {
    pub name: String,
}

impl Validate for CategoryInput {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        check_len(&mut errors, "name", &self.name, NAME_MAX);
        errors.into_result()
    }
}

pub async fn list(db: &impl Executor) -> StoreResult<Vec<Category>> {
    let q = BoundQuery::new(format!("{SELECT_CATEGORIES} ORDER BY category_id"));
    super::fetch_all(db, &q).await
}

pub fn find_query(category_id: i32) -> BoundQuery {
    let mut q = BoundQuery::new(SELECT_CATEGORIES);
    q.push(" WHERE category_id = ").push_bind(category_id);
    q
}

pub async fn find(db: &impl Executor, category_id: i32) -> StoreResult<Option<Category>> {
    super::fetch_opt(db, &find_query(category_id)).await
}

pub fn insert_query(input: &CategoryInput) -> StoreResult<BoundQuery> {
    BoundQuery::template(
        "INSERT INTO category (name) VALUES (?) RETURNING category_id",
        [Value::from(input.name.as_str())],
    )
}

pub async fn create(db: &impl Executor, input: &CategoryInput) -> StoreResult<i32> {
    input.validate()?;
    db.insert_returning_key(&insert_query(input)?).await
}

pub fn update_query(category_id: i32, input: &CategoryInput) -> StoreResult<BoundQuery> {
    BoundQuery::template(
        "UPDATE category SET name = ?, last_update = now() WHERE category_id = ?",
        [Value::from(input.name.as_str()), Value::Int(category_id)],
    )
}

pub async fn update(
    db: &impl Executor,
    category_id: i32,
    input: &CategoryInput,
) -> StoreResult<u64> {
    input.validate()?;
    db.execute(&update_query(category_id, input)?).await
}

pub async fn delete(db: &impl Executor, category_id: i32) -> StoreResult<u64> {
    let q = BoundQuery::template(
        "DELETE FROM category WHERE category_id = ?",
        [Value::Int(category_id)],
    )?;
    db.execute(&q).await
}
