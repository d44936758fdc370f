//! # sakila
//!
//! Parameterized statements and transactional writes over the sakila
//! film-rental sample database (PostgreSQL port).
//!
//! ## Features
//!
//! - **Bound parameters only**: user input never enters query text
//!   ([`BoundQuery`], [`build_search`])
//! - **All-or-nothing writes**: multi-table changes run as a
//!   [`TransactionPlan`]; later steps can use keys generated by earlier ones
//! - **Pooled connections**: one checked-out connection per request
//!   ([`create_pool`])
//! - **Length validation** before any statement is sent ([`validate`])
//!
//! ```ignore
//! use sakila::repo::{actor, customer};
//!
//! let client = pool.get().await?;
//! let actors = actor::list(&client, &actor::search_filter(Some("AN".into()), None)).await?;
//!
//! let id = customer::create(&client, &new_customer, &new_address).await?;
//! ```

pub mod bound;
pub mod client;
pub mod error;
pub mod filter;
pub mod repo;
pub mod row;
pub mod transaction;
pub mod validate;
pub mod value;

pub use bound::BoundQuery;
pub use client::Executor;
pub use error::{ConstraintKind, StoreError, StoreResult};
pub use filter::{FilterSpec, build_search};
pub use row::{FromRow, RowExt};
pub use transaction::{PlanOutcome, StepKind, TransactionPlan, TxState, rewrite_associations};
pub use validate::{Validate, ValidationCode, ValidationError, ValidationErrors};
pub use value::{StepId, Value};

#[cfg(feature = "pool")]
pub mod pool;

#[cfg(feature = "pool")]
pub use pool::{create_pool, create_pool_with};

#[cfg(feature = "pool")]
pub use deadpool_postgres::{Pool, PoolError};
