//! Dynamic search predicates.
//!
//! A [`FilterSpec`] holds the optional search fields of one request. Its
//! columns are fixed by the caller; only the values come from user input, and
//! those travel as bound parameters.
//!
//! Embedded `%` and `_` in a value are not escaped, so `"A_"` matches `"AN"`.

use crate::bound::BoundQuery;

/// Ordered mapping from column to optional search value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSpec {
    fields: Vec<(&'static str, Option<String>)>,
}

impl FilterSpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field. Fields are matched in the order they are added.
    pub fn field(mut self, column: &'static str, value: Option<impl Into<String>>) -> Self {
        self.fields.push((column, value.map(Into::into)));
        self
    }

    /// Fields with a non-empty value, in declared order.
    pub fn populated(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.fields.iter().filter_map(|(column, value)| match value.as_deref() {
            Some(v) if !v.is_empty() => Some((*column, v)),
            _ => None,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.populated().next().is_none()
    }

    /// The value for `column`, if one was given (possibly empty).
    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(c, _)| *c == column)
            .and_then(|(_, v)| v.as_deref())
    }
}

/// Append one ` AND <column> LIKE ?` per populated field to `base`.
///
/// `base` must already end in a WHERE clause (e.g. `... WHERE 1=1`). Each
/// parameter is the field value wrapped as `%value%`. With no populated
/// field the result is `base` unchanged and has no parameters.
pub fn build_search(base: &str, spec: &FilterSpec) -> BoundQuery {
    let mut q = BoundQuery::new(base);
    for (column, value) in spec.populated() {
        q.push(" AND ").push(column).push(" LIKE ");
        q.push_bind(format!("%{value}%"));
    }
    q
}
