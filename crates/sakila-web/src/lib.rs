//! HTML front end over the [`sakila`] store.
//!
//! Routes render minijinja pages from a pooled connection per request.
//! Validation failures answer 400 before a connection is checked out;
//! database failures are logged and redirected to `/error`.

pub mod config;
pub mod error;
pub mod handlers;
pub mod logging;
pub mod render;
pub mod routes;
pub mod state;

pub use config::AppConfig;
pub use error::{AppError, AppResult};
pub use routes::create_router;
pub use state::AppState;
