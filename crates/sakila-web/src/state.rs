use crate::render::Templates;
use sakila::Pool;
use std::sync::Arc;

/// Shared by every handler. Each request checks out its own connection.
#[derive(Clone)]
pub struct AppState {
    pub pool: Pool,
    pub templates: Arc<Templates>,
}

impl AppState {
    pub fn new(pool: Pool) -> Result<Self, minijinja::Error> {
        Ok(Self {
            pool,
            templates: Arc::new(Templates::new()?),
        })
    }
}
