use crate::error::AppResult;
use crate::state::AppState;
use axum::extract::State;
use axum::response::Html;
use minijinja::context;
use sakila::repo::staff;

pub async fn list(State(state): State<AppState>) -> AppResult<Html<String>> {
    let client = state.pool.get().await?;
    let staffs = staff::list(&client).await?;
    state.templates.render("staffs.html", context! { staffs => staffs })
}
