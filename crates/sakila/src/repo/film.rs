//! `film` rows and their `film_actor` associations.
//!
//! Creating, updating and deleting a film touch several tables, so each of
//! those is a [`TransactionPlan`].

use crate::bound::BoundQuery;
use crate::client::Executor;
use crate::error::{StoreError, StoreResult};
use crate::row::{FromRow, RowExt};
use crate::transaction::{TransactionPlan, append_associations, rewrite_associations};
use crate::validate::{Validate, ValidationErrors, check_len};
use crate::value::{StepId, Value};
use serde::{Deserialize, Serialize};
use tokio_postgres::Row;

pub const TITLE_MAX: usize = 128;

const SELECT_FILMS: &str = "SELECT f.film_id, f.title, f.description, \
     f.release_year::integer AS release_year, f.language_id, trim(l.name) AS language \
     FROM film f JOIN language l ON l.language_id = f.language_id";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Film {
    pub film_id: i32,
    pub title: String,
    pub description: Option<String>,
    pub release_year: Option<i32>,
    pub language_id: i32,
    pub language: String,
}

impl FromRow for Film {
    fn from_row(row: &Row) -> StoreResult<Self> {
        Ok(Self {
            film_id: row.try_get_column("film_id")?,
            title: row.try_get_column("title")?,
            description: row.try_get_column("description")?,
            release_year: row.try_get_column("release_year")?,
            language_id: row.try_get_column("language_id")?,
            language: row.try_get_column("language")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Language {
    pub language_id: i32,
    pub name: String,
}

impl FromRow for Language {
    fn from_row(row: &Row) -> StoreResult<Self> {
        Ok(Self {
            language_id: row.try_get_column("language_id")?,
            name: row.try_get_column("name")?,
        })
    }
}

/// Film fields plus the actors currently selected for it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilmInput {
    pub title: String,
    pub description: Option<String>,
    pub language_id: i32,
    #[serde(default)]
    pub actor_ids: Vec<i32>,
}

impl Validate for FilmInput {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        check_len(&mut errors, "title", &self.title, TITLE_MAX);
        errors.into_result()
    }
}

pub async fn list(db: &impl Executor) -> StoreResult<Vec<Film>> {
    let q = BoundQuery::new(format!("{SELECT_FILMS} ORDER BY f.film_id"));
    super::fetch_all(db, &q).await
}

pub fn find_query(film_id: i32) -> BoundQuery {
    let mut q = BoundQuery::new(SELECT_FILMS);
    q.push(" WHERE f.film_id = ").push_bind(film_id);
    q
}

pub async fn find(db: &impl Executor, film_id: i32) -> StoreResult<Option<Film>> {
    super::fetch_opt(db, &find_query(film_id)).await
}

/// Ids of the actors associated with a film.
pub async fn actor_ids(db: &impl Executor, film_id: i32) -> StoreResult<Vec<i32>> {
    let q = BoundQuery::template(
        "SELECT actor_id FROM film_actor WHERE film_id = ? ORDER BY actor_id",
        [Value::Int(film_id)],
    )?;
    let rows = db.query(&q).await?;
    rows.iter().map(|r| r.try_get_column("actor_id")).collect()
}

pub async fn languages(db: &impl Executor) -> StoreResult<Vec<Language>> {
    let q = BoundQuery::new(
        "SELECT language_id, trim(name) AS name FROM language ORDER BY language_id",
    );
    super::fetch_all(db, &q).await
}

fn film_values(input: &FilmInput) -> [Value; 3] {
    [
        Value::from(input.title.as_str()),
        Value::from(input.description.clone()),
        Value::Int(input.language_id),
    ]
}

/// Insert the film, then one `film_actor` row per selected actor.
pub fn create_plan(input: &FilmInput) -> StoreResult<TransactionPlan> {
    let mut plan = TransactionPlan::new();
    let film = plan.insert(BoundQuery::template(
        "INSERT INTO film (title, description, language_id) VALUES (?, ?, ?) RETURNING film_id",
        film_values(input),
    )?);
    append_associations(
        &mut plan,
        "film_actor",
        "film_id",
        Value::key_of(film),
        "actor_id",
        &input.actor_ids,
    )?;
    Ok(plan)
}

/// Create a film with its actors and return the new film id.
pub async fn create(db: &impl Executor, input: &FilmInput) -> StoreResult<i32> {
    input.validate()?;
    let outcome = create_plan(input)?.run(db).await?;
    outcome
        .primary_key()
        .ok_or_else(|| StoreError::Other("film insert produced no key".to_string()))
}

/// Update the film row and replace its actor list.
///
/// An empty `actor_ids` removes every actor from the film. A missing film
/// aborts the plan before the association rows are touched.
pub fn update_plan(film_id: i32, input: &FilmInput) -> StoreResult<TransactionPlan> {
    let mut plan = TransactionPlan::new();
    let [title, description, language] = film_values(input);
    plan.execute_existing(BoundQuery::template(
        "UPDATE film SET title = ?, description = ?, language_id = ?, last_update = now() \
         WHERE film_id = ?",
        [title, description, language, Value::Int(film_id)],
    )?);
    rewrite_associations(
        &mut plan,
        "film_actor",
        "film_id",
        Value::Int(film_id),
        "actor_id",
        &input.actor_ids,
    )?;
    Ok(plan)
}

/// Returns the number of `film` rows updated; 0 when `film_id` does not exist.
pub async fn update(db: &impl Executor, film_id: i32, input: &FilmInput) -> StoreResult<u64> {
    input.validate()?;
    match update_plan(film_id, input)?.run(db).await {
        Ok(outcome) => Ok(outcome.rows_of(StepId(0))),
        Err(StoreError::RolledBack { step: 0, source }) if source.is_not_found() => Ok(0),
        Err(e) => Err(e),
    }
}

/// Remove the film's association rows, then the film.
///
/// A film that still has inventory cannot be deleted; the foreign key error
/// rolls the whole plan back.
pub fn delete_plan(film_id: i32) -> StoreResult<TransactionPlan> {
    let mut plan = TransactionPlan::new();
    for table in ["film_actor", "film_category", "film"] {
        plan.execute(BoundQuery::template(
            &format!("DELETE FROM {table} WHERE film_id = ?"),
            [Value::Int(film_id)],
        )?);
    }
    Ok(plan)
}

pub async fn delete(db: &impl Executor, film_id: i32) -> StoreResult<u64> {
    let outcome = delete_plan(film_id)?.run(db).await?;
    Ok(outcome.rows_affected)
}
