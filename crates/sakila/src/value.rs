//! Bound parameter values.

use bytes::BytesMut;
use std::error::Error;
use std::fmt;
use tokio_postgres::types::{IsNull, ToSql, Type};

/// Index of a step inside a [`TransactionPlan`](crate::TransactionPlan).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StepId(pub(crate) usize);

impl StepId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for StepId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A value passed to the database separately from the query text.
///
/// `Key` stands for the primary key generated by an earlier insert of the
/// same transaction plan. It is replaced before the statement runs; sending
/// it unresolved is an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Null,
    Int(i32),
    Text(String),
    Key(StepId),
}

impl Value {
    /// Placeholder for the key generated by `step`.
    pub fn key_of(step: StepId) -> Self {
        Self::Key(step)
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i32> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::Int(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<Option<String>> for Value {
    fn from(v: Option<String>) -> Self {
        v.map_or(Self::Null, Self::Text)
    }
}

impl From<Option<i32>> for Value {
    fn from(v: Option<i32>) -> Self {
        v.map_or(Self::Null, Self::Int)
    }
}

impl From<StepId> for Value {
    fn from(step: StepId) -> Self {
        Self::Key(step)
    }
}

fn unresolved(step: &StepId) -> Box<dyn Error + Sync + Send> {
    format!("generated key of step {step} was not resolved before execution").into()
}

impl ToSql for Value {
    fn to_sql(
        &self,
        ty: &Type,
        out: &mut BytesMut,
    ) -> Result<IsNull, Box<dyn Error + Sync + Send>> {
        match self {
            Self::Null => Ok(IsNull::Yes),
            Self::Int(v) => v.to_sql(ty, out),
            Self::Text(v) => v.to_sql(ty, out),
            Self::Key(step) => Err(unresolved(step)),
        }
    }

    fn accepts(ty: &Type) -> bool {
        <i32 as ToSql>::accepts(ty) || <String as ToSql>::accepts(ty)
    }

    // Checked per variant: `accepts` alone cannot tell an `Int` bound to a
    // text column from a `Text` bound to an integer column.
    fn to_sql_checked(
        &self,
        ty: &Type,
        out: &mut BytesMut,
    ) -> Result<IsNull, Box<dyn Error + Sync + Send>> {
        match self {
            Self::Null => Ok(IsNull::Yes),
            Self::Int(v) => v.to_sql_checked(ty, out),
            Self::Text(v) => v.to_sql_checked(ty, out),
            Self::Key(step) => Err(unresolved(step)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn options_map_to_null() {
        assert_eq!(Value::from(None::<String>), Value::Null);
        assert_eq!(Value::from(Some(7)), Value::Int(7));
    }

    #[test]
    fn int_serializes_for_int4() {
        let mut buf = BytesMut::new();
        let res = Value::Int(42).to_sql_checked(&Type::INT4, &mut buf).unwrap();
        assert!(matches!(res, IsNull::No));
        assert_eq!(&buf[..], &42_i32.to_be_bytes());
    }

    #[test]
    fn text_is_rejected_for_int4() {
        let mut buf = BytesMut::new();
        assert!(Value::from("x").to_sql_checked(&Type::INT4, &mut buf).is_err());
    }

    #[test]
    fn unresolved_key_fails() {
        let mut buf = BytesMut::new();
        let err = match Value::Key(StepId(0)).to_sql_checked(&Type::INT4, &mut buf) {
            Err(e) => e,
            Ok(_) => panic!("unresolved key was serialized"),
        };
        assert!(err.to_string().contains("step #0"));
    }
}
