//! Request handlers, one module per table.

pub mod actors;
pub mod categories;
pub mod customers;
pub mod films;
pub mod pages;
pub mod staff;

/// Browsers submit untouched inputs as empty strings.
pub(crate) fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
