use super::non_empty;
use crate::error::{AppError, AppResult};
use crate::state::AppState;
use axum::extract::{Form, Path, Query, State};
use axum::response::{Html, Redirect};
use minijinja::context;
use sakila::Validate;
use sakila::repo::actor::{self, ActorInput};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ActorSearch {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

pub async fn list(
    State(state): State<AppState>,
    Query(search): Query<ActorSearch>,
) -> AppResult<Html<String>> {
    render_list(&state, search).await
}

pub async fn search(
    State(state): State<AppState>,
    Form(search): Form<ActorSearch>,
) -> AppResult<Html<String>> {
    render_list(&state, search).await
}

async fn render_list(state: &AppState, search: ActorSearch) -> AppResult<Html<String>> {
    let filter = actor::search_filter(
        non_empty(search.first_name.clone()),
        non_empty(search.last_name.clone()),
    );
    let client = state.pool.get().await?;
    let actors = actor::list(&client, &filter).await?;
    state.templates.render("actors.html", context! { actors => actors, search => search })
}

pub async fn create_form(State(state): State<AppState>) -> AppResult<Html<String>> {
    state.templates.render(
        "actor_form.html",
        context! {
            heading => "New actor",
            action => "/actors/create",
            actor => ActorInput::default(),
        },
    )
}

pub async fn create(
    State(state): State<AppState>,
    Form(input): Form<ActorInput>,
) -> AppResult<Redirect> {
    input.validate()?;
    let client = state.pool.get().await?;
    let actor_id = actor::create(&client, &input).await?;
    tracing::info!(actor_id, "actor created");
    Ok(Redirect::to("/actors"))
}

pub async fn update_form(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Html<String>> {
    let client = state.pool.get().await?;
    let found = actor::find(&client, id)
        .await?
        .ok_or_else(|| AppError::not_found("actor", id))?;
    state.templates.render(
        "actor_form.html",
        context! {
            heading => "Edit actor",
            action => format!("/actors/{id}/update"),
            actor => found,
        },
    )
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Form(input): Form<ActorInput>,
) -> AppResult<Redirect> {
    input.validate()?;
    let client = state.pool.get().await?;
    if actor::update(&client, id, &input).await? == 0 {
        return Err(AppError::not_found("actor", id));
    }
    Ok(Redirect::to("/actors"))
}

pub async fn delete_form(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Html<String>> {
    let client = state.pool.get().await?;
    let found = actor::find(&client, id)
        .await?
        .ok_or_else(|| AppError::not_found("actor", id))?;
    state.templates.render(
        "confirm_delete.html",
        context! {
            title => "Delete actor",
            label => format!("{} {}", found.first_name, found.last_name),
            action => format!("/actors/{id}/delete"),
            back => "/actors",
        },
    )
}

pub async fn delete(State(state): State<AppState>, Path(id): Path<i32>) -> AppResult<Redirect> {
    let client = state.pool.get().await?;
    actor::delete(&client, id).await?;
    tracing::info!(actor_id = id, "actor deleted");
    Ok(Redirect::to("/actors"))
}
