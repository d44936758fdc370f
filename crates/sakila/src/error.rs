use crate::validate::ValidationErrors;
use std::fmt;
use thiserror::Error;

pub type StoreResult<T> = Result<T, StoreError>;

/// Integrity constraint classes PostgreSQL reports by SQLSTATE.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintKind {
    /// `23505`
    Unique,
    /// `23503`, e.g. deleting an actor still listed in `film_actor`
    ForeignKey,
    /// `23514`
    Check,
}

impl ConstraintKind {
    fn from_sqlstate(code: &str) -> Option<Self> {
        match code {
            "23505" => Some(Self::Unique),
            "23503" => Some(Self::ForeignKey),
            "23514" => Some(Self::Check),
            _ => None,
        }
    }
}

impl fmt::Display for ConstraintKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Unique => "unique",
            Self::ForeignKey => "foreign key",
            Self::Check => "check",
        })
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Query error: {0}")]
    Query(#[from] tokio_postgres::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("{kind} constraint {constraint} violated: {message}")]
    Constraint {
        kind: ConstraintKind,
        constraint: String,
        message: String,
    },

    #[error("Decode error on column '{column}': {message}")]
    Decode { column: String, message: String },

    /// Input rejected before any statement ran.
    #[error("Validation error: {0}")]
    Invalid(ValidationErrors),

    /// Placeholder/parameter mismatch or an unresolvable generated-key reference.
    #[error("Statement error: {0}")]
    Statement(String),

    /// Step `step` of a plan failed; the transaction was rolled back.
    #[error("Transaction rolled back at step {step}: {source}")]
    RolledBack {
        step: usize,
        #[source]
        source: Box<StoreError>,
    },

    #[cfg(feature = "pool")]
    #[error("Pool error: {0}")]
    Pool(String),

    #[error("{0}")]
    Other(String),
}

impl StoreError {
    pub fn decode(column: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Decode {
            column: column.into(),
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn statement(message: impl Into<String>) -> Self {
        Self::Statement(message.into())
    }

    /// True for a missing row, including one that aborted a plan.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::NotFound(_) => true,
            Self::RolledBack { source, .. } => source.is_not_found(),
            _ => false,
        }
    }

    pub fn is_invalid(&self) -> bool {
        matches!(self, Self::Invalid(_))
    }

    /// The constraint class behind this error, looking through a rollback.
    pub fn constraint_kind(&self) -> Option<ConstraintKind> {
        match self {
            Self::Constraint { kind, .. } => Some(*kind),
            Self::RolledBack { source, .. } => source.constraint_kind(),
            _ => None,
        }
    }

    /// Classify a driver error, keeping integrity violations apart from
    /// other failures.
    pub fn from_db_error(err: tokio_postgres::Error) -> Self {
        let Some(db_err) = err.as_db_error() else {
            return Self::Query(err);
        };
        match ConstraintKind::from_sqlstate(db_err.code().code()) {
            Some(kind) => Self::Constraint {
                kind,
                constraint: db_err.constraint().unwrap_or("unknown").to_string(),
                message: db_err.message().to_string(),
            },
            None => Self::Query(err),
        }
    }
}

impl From<ValidationErrors> for StoreError {
    fn from(errors: ValidationErrors) -> Self {
        Self::Invalid(errors)
    }
}

#[cfg(feature = "pool")]
impl From<deadpool_postgres::PoolError> for StoreError {
    fn from(err: deadpool_postgres::PoolError) -> Self {
        Self::Pool(err.to_string())
    }
}
