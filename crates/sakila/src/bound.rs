//! Query text paired with its bound parameters.
//!
//! A [`BoundQuery`] stores SQL pieces and parameter slots separately. It can
//! be rendered two ways:
//! - [`BoundQuery::text`] uses driver-neutral `?` markers, one per parameter;
//! - [`BoundQuery::to_sql`] uses PostgreSQL's `$1, $2, ...`, which is what
//!   the executors send.
//!
//! # Example
//!
//! ```
//! use sakila::BoundQuery;
//!
//! let mut q = BoundQuery::new("SELECT * FROM actor WHERE 1=1");
//! q.push(" AND first_name LIKE ").push_bind("%AN%");
//!
//! assert_eq!(q.text(), "SELECT * FROM actor WHERE 1=1 AND first_name LIKE ?");
//! assert_eq!(q.to_sql(), "SELECT * FROM actor WHERE 1=1 AND first_name LIKE $1");
//! ```

use crate::error::{StoreError, StoreResult};
use crate::value::{StepId, Value};
use std::fmt::Write;
use tokio_postgres::types::ToSql;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Part {
    Raw(String),
    Param,
}

/// An ordered pair of query text and bound parameters.
///
/// Every parameter slot in the text has exactly one value, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundQuery {
    parts: Vec<Part>,
    params: Vec<Value>,
}

impl BoundQuery {
    /// A statement with no parameters.
    pub fn new(sql: impl Into<String>) -> Self {
        let sql = sql.into();
        let parts = if sql.is_empty() {
            Vec::new()
        } else {
            vec![Part::Raw(sql)]
        };
        Self {
            parts,
            params: Vec::new(),
        }
    }

    /// Build from a constant template using `?` markers.
    ///
    /// The template must not contain a literal `?` other than the markers.
    /// Fails when the marker count differs from the number of values.
    pub fn template(sql: &str, params: impl IntoIterator<Item = Value>) -> StoreResult<Self> {
        let params: Vec<Value> = params.into_iter().collect();
        let mut q = Self::new("");
        let mut pieces = sql.split('?');
        if let Some(first) = pieces.next() {
            q.push(first);
        }
        let mut slots = 0;
        for piece in pieces {
            q.parts.push(Part::Param);
            slots += 1;
            q.push(piece);
        }

        if slots != params.len() {
            return Err(StoreError::statement(format!(
                "template has {} placeholders but {} params were given",
                slots,
                params.len()
            )));
        }
        q.params = params;
        Ok(q)
    }

    /// Append raw SQL (no parameters).
    ///
    /// `sql` must not contain a literal `?`: [`text`](Self::text) would then
    /// show more markers than there are parameters. Bind values with
    /// [`push_bind`](Self::push_bind) instead.
    pub fn push(&mut self, sql: &str) -> &mut Self {
        if sql.is_empty() {
            return self;
        }

        match self.parts.last_mut() {
            Some(Part::Raw(last)) => last.push_str(sql),
            _ => self.parts.push(Part::Raw(sql.to_string())),
        }
        self
    }

    /// Append a parameter slot and bind its value.
    pub fn push_bind(&mut self, value: impl Into<Value>) -> &mut Self {
        self.parts.push(Part::Param);
        self.params.push(value.into());
        self
    }

    /// Append a comma-separated list of slots and bind all values.
    ///
    /// If `values` is empty, this appends `NULL` (so `IN (NULL)` is valid SQL).
    pub fn push_bind_list<T: Into<Value>>(
        &mut self,
        values: impl IntoIterator<Item = T>,
    ) -> &mut Self {
        let mut iter = values.into_iter();
        let Some(first) = iter.next() else {
            return self.push("NULL");
        };

        self.push_bind(first);
        for v in iter {
            self.push(", ");
            self.push_bind(v);
        }
        self
    }

    /// Render with `?` markers.
    pub fn text(&self) -> String {
        self.render(|out, _| out.push('?'))
    }

    /// Render with `$1, $2, ...` placeholders.
    pub fn to_sql(&self) -> String {
        self.render(|out, idx| {
            let _ = write!(out, "${}", idx);
        })
    }

    fn render(&self, mut slot: impl FnMut(&mut String, usize)) -> String {
        let mut out = String::new();
        let mut idx: usize = 0;
        for part in &self.parts {
            match part {
                Part::Raw(s) => out.push_str(s),
                Part::Param => {
                    idx += 1;
                    slot(&mut out, idx);
                }
            }
        }
        out
    }

    /// Bound values in slot order.
    pub fn params(&self) -> &[Value] {
        &self.params
    }

    /// Parameter refs compatible with `tokio-postgres`.
    pub fn params_ref(&self) -> Vec<&(dyn ToSql + Sync)> {
        self.params.iter().map(|p| p as &(dyn ToSql + Sync)).collect()
    }

    pub fn placeholder_count(&self) -> usize {
        self.parts.iter().filter(|p| matches!(p, Part::Param)).count()
    }

    /// Whether any parameter still refers to a generated key.
    pub fn has_keys(&self) -> bool {
        self.params.iter().any(|p| matches!(p, Value::Key(_)))
    }

    /// Replace every [`Value::Key`] with the key captured by that step.
    ///
    /// `keys[i]` is the key generated by step `i`, or `None` when step `i`
    /// did not insert.
    pub fn resolve_keys(&self, keys: &[Option<i32>]) -> StoreResult<Self> {
        let mut resolved = self.clone();
        for param in &mut resolved.params {
            if let Value::Key(step) = *param {
                let key = lookup_key(keys, step)?;
                *param = Value::Int(key);
            }
        }
        Ok(resolved)
    }
}

fn lookup_key(keys: &[Option<i32>], step: StepId) -> StoreResult<i32> {
    keys.get(step.index()).copied().flatten().ok_or_else(|| {
        StoreError::statement(format!("step {step} did not produce a generated key"))
    })
}

#[cfg(test)]
mod tests;
