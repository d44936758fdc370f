//! `actor` rows.

use crate::bound::BoundQuery;
use crate::client::Executor;
use crate::error::StoreResult;
use crate::filter::{FilterSpec, build_search};
use crate::row::{FromRow, RowExt};
use crate::value::Value;
use crate::validate::{Validate, ValidationErrors, check_len};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tokio_postgres::Row;

pub const NAME_MAX: usize = 45;

const SELECT_ACTORS: &str = "SELECT actor_id, first_name, last_name, \
     last_update::timestamp AS last_update FROM actor WHERE 1=1";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Actor {
    pub actor_id: i32,
    pub first_name: String,
    pub last_name: String,
    pub last_update: NaiveDateTime,
}

impl FromRow for Actor {
    fn from_row(row: &Row) -> StoreResult<Self> {
        Ok(Self {
            actor_id: row.try_get_column("actor_id")?,
            first_name: row.try_get_column("first_name")?,
            last_name: row.try_get_column("last_name")?,
            last_update: row.try_get_column("last_update")?,
        })
    }
}

/// Form fields for creating or updating an actor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActorInput {
    pub first_name: String,
    pub last_name: String,
}

impl Validate for ActorInput {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        check_len(&mut errors, "first_name", &self.first_name, NAME_MAX);
        check_len(&mut errors, "last_name", &self.last_name, NAME_MAX);
        errors.into_result()
    }
}

/// Search fields of the actor list, in match order.
pub fn search_filter(first_name: Option<String>, last_name: Option<String>) -> FilterSpec {
    FilterSpec::new()
        .field("first_name", first_name)
        .field("last_name", last_name)
}

pub fn list_query(filter: &FilterSpec) -> BoundQuery {
    let mut q = build_search(SELECT_ACTORS, filter);
    q.push(" ORDER BY actor_id");
    q
}

pub async fn list(db: &impl Executor, filter: &FilterSpec) -> StoreResult<Vec<Actor>> {
    super::fetch_all(db, &list_query(filter)).await
}

pub fn find_query(actor_id: i32) -> BoundQuery {
    let mut q = BoundQuery::new(SELECT_ACTORS);
    q.push(" AND actor_id = ").push_bind(actor_id);
    q
}

pub async fn find(db: &impl Executor, actor_id: i32) -> StoreResult<Option<Actor>> {
    super::fetch_opt(db, &find_query(actor_id)).await
}

pub fn insert_query(input: &ActorInput) -> StoreResult<BoundQuery> {
    BoundQuery::template(
        "INSERT INTO actor (first_name, last_name) VALUES (?, ?) RETURNING actor_id",
        [Value::from(input.first_name.as_str()), Value::from(input.last_name.as_str())],
    )
}

/// Insert an actor and return its id.
pub async fn create(db: &impl Executor, input: &ActorInput) -> StoreResult<i32> {
    input.validate()?;
    db.insert_returning_key(&insert_query(input)?).await
}

pub fn update_query(actor_id: i32, input: &ActorInput) -> StoreResult<BoundQuery> {
    BoundQuery::template(
        "UPDATE actor SET first_name = ?, last_name = ?, last_update = now() WHERE actor_id = ?",
        [
            Value::from(input.first_name.as_str()),
            Value::from(input.last_name.as_str()),
            Value::Int(actor_id),
        ],
    )
}

pub async fn update(db: &impl Executor, actor_id: i32, input: &ActorInput) -> StoreResult<u64> {
    input.validate()?;
    db.execute(&update_query(actor_id, input)?).await
}

pub fn delete_query(actor_id: i32) -> StoreResult<BoundQuery> {
    BoundQuery::template("DELETE FROM actor WHERE actor_id = ?", [Value::Int(actor_id)])
}

pub async fn delete(db: &impl Executor, actor_id: i32) -> StoreResult<u64> {
    db.execute(&delete_query(actor_id)?).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_appends_order_after_predicates() {
        let q = list_query(&search_filter(Some("AN".into()), Some(String::new())));
        assert!(q.text().ends_with("AND first_name LIKE ? ORDER BY actor_id"));
        assert_eq!(q.params(), &[Value::from("%AN%")]);
    }

    #[test]
    fn find_binds_id() {
        let q = find_query(12);
        assert!(q.to_sql().ends_with("AND actor_id = $1"));
        assert_eq!(q.params(), &[Value::Int(12)]);
    }

    #[test]
    fn update_params_in_slot_order() {
        let input = ActorInput {
            first_name: "ED".into(),
            last_name: "CHASE".into(),
        };
        let q = update_query(3, &input).unwrap();
        assert_eq!(q.params(), &[Value::from("ED"), Value::from("CHASE"), Value::Int(3)]);
    }

    #[test]
    fn names_are_bounded() {
        let ok = ActorInput {
            first_name: "x".repeat(NAME_MAX),
            last_name: "y".into(),
        };
        assert!(ok.validate().is_ok());

        let long = ActorInput {
            first_name: "x".repeat(NAME_MAX + 1),
            last_name: "y".into(),
        };
        let errors = long.validate().unwrap_err();
        assert_eq!(errors.items[0].field, "first_name");
    }
}
