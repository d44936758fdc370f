use crate::error::{AppError, AppResult};
use crate::state::AppState;
use axum::extract::{Form, Path, State};
use axum::response::{Html, Redirect};
use minijinja::context;
use sakila::Validate;
use sakila::repo::category::{self, CategoryInput};

pub async fn list(State(state): State<AppState>) -> AppResult<Html<String>> {
    let client = state.pool.get().await?;
    let categories = category::list(&client).await?;
    state.templates.render("categories.html", context! { categories => categories })
}

pub async fn create_form(State(state): State<AppState>) -> AppResult<Html<String>> {
    state.templates.render(
        "category_form.html",
        context! {
            heading => "New category",
            action => "/categories/create",
            category => CategoryInput::default(),
        },
    )
}

pub async fn create(
    State(state): State<AppState>,
    Form(input): Form<CategoryInput>,
) -> AppResult<Redirect> {
    input.validate()?;
    let client = state.pool.get().await?;
    let category_id = category::create(&client, &input).await?;
    tracing::info!(category_id, "category created");
    Ok(Redirect::to("/categories"))
}

pub async fn update_form(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Html<String>> {
    let client = state.pool.get().await?;
    let found = category::find(&client, id)
        .await?
        .ok_or_else(|| AppError::not_found("category", id))?;
    state.templates.render(
        "category_form.html",
        context! {
            heading => "Edit category",
            action => format!("/categories/{id}/update"),
            category => found,
        },
    )
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Form(input): Form<CategoryInput>,
) -> AppResult<Redirect> {
    input.validate()?;
    let client = state.pool.get().await?;
    if category::update(&client, id, &input).await? == 0 {
        return Err(AppError::not_found("category", id));
    }
    Ok(Redirect::to("/categories"))
}

pub async fn delete_form(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Html<String>> {
    let client = state.pool.get().await?;
    let found = category::find(&client, id)
        .await?
        .ok_or_else(|| AppError::not_found("category", id))?;
    state.templates.render(
        "confirm_delete.html",
        context! {
            title => "Delete category",
            label => found.name,
            action => format!("/categories/{id}/delete"),
            back => "/categories",
        },
    )
}

pub async fn delete(State(state): State<AppState>, Path(id): Path<i32>) -> AppResult<Redirect> {
    let client = state.pool.get().await?;
    category::delete(&client, id).await?;
    tracing::info!(category_id = id, "category deleted");
    Ok(Redirect::to("/categories"))
}
