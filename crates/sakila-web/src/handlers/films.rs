use super::non_empty;
use crate::error::{AppError, AppResult};
use crate::state::AppState;
use axum::extract::{Form, Path, State};
use axum::response::{Html, Redirect};
use minijinja::context;
use sakila::repo::actor;
use sakila::repo::film::{self, FilmInput};
use sakila::{FilterSpec, Validate};

/// Film forms repeat `actor_ids` once per selected actor.
pub type FilmForm = Vec<(String, String)>;

pub fn parse_film_form(pairs: FilmForm) -> AppResult<FilmInput> {
    let mut input = FilmInput::default();
    for (key, value) in pairs {
        match key.as_str() {
            "title" => input.title = value,
            "description" => input.description = non_empty(Some(value)),
            "language_id" => input.language_id = parse_id("language_id", &value)?,
            "actor_ids" => input.actor_ids.push(parse_id("actor_ids", &value)?),
            _ => {}
        }
    }
    input.actor_ids.sort_unstable();
    input.actor_ids.dedup();
    Ok(input)
}

fn parse_id(field: &str, value: &str) -> AppResult<i32> {
    value
        .trim()
        .parse()
        .map_err(|_| AppError::BadRequest(format!("{field} must be a number, got {value:?}")))
}

pub async fn list(State(state): State<AppState>) -> AppResult<Html<String>> {
    let client = state.pool.get().await?;
    let films = film::list(&client).await?;
    state.templates.render("films.html", context! { films => films })
}

pub async fn create_form(State(state): State<AppState>) -> AppResult<Html<String>> {
    let client = state.pool.get().await?;
    let languages = film::languages(&client).await?;
    let actors = actor::list(&client, &FilterSpec::new()).await?;
    state.templates.render(
        "film_form.html",
        context! {
            heading => "New film",
            action => "/films/create",
            film => FilmInput::default(),
            selected => Vec::<i32>::new(),
            languages => languages,
            actors => actors,
        },
    )
}

pub async fn create(
    State(state): State<AppState>,
    Form(pairs): Form<FilmForm>,
) -> AppResult<Redirect> {
    let input = parse_film_form(pairs)?;
    input.validate()?;
    let client = state.pool.get().await?;
    let film_id = film::create(&client, &input).await?;
    tracing::info!(film_id, actors = input.actor_ids.len(), "film created");
    Ok(Redirect::to("/films"))
}

pub async fn update_form(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Html<String>> {
    let client = state.pool.get().await?;
    let found = film::find(&client, id)
        .await?
        .ok_or_else(|| AppError::not_found("film", id))?;
    let selected = film::actor_ids(&client, id).await?;
    let languages = film::languages(&client).await?;
    let actors = actor::list(&client, &FilterSpec::new()).await?;
    state.templates.render(
        "film_form.html",
        context! {
            heading => "Edit film",
            action => format!("/films/{id}/update"),
            film => found,
            selected => selected,
            languages => languages,
            actors => actors,
        },
    )
}

/// Update the film row and replace its actor list in one transaction.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Form(pairs): Form<FilmForm>,
) -> AppResult<Redirect> {
    let input = parse_film_form(pairs)?;
    input.validate()?;
    let client = state.pool.get().await?;
    if film::update(&client, id, &input).await? == 0 {
        return Err(AppError::not_found("film", id));
    }
    tracing::info!(film_id = id, actors = input.actor_ids.len(), "film updated");
    Ok(Redirect::to("/films"))
}

pub async fn delete_form(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Html<String>> {
    let client = state.pool.get().await?;
    let found = film::find(&client, id)
        .await?
        .ok_or_else(|| AppError::not_found("film", id))?;
    state.templates.render(
        "confirm_delete.html",
        context! {
            title => "Delete film",
            label => found.title,
            action => format!("/films/{id}/delete"),
            back => "/films",
        },
    )
}

pub async fn delete(State(state): State<AppState>, Path(id): Path<i32>) -> AppResult<Redirect> {
    let client = state.pool.get().await?;
    film::delete(&client, id).await?;
    tracing::info!(film_id = id, "film deleted");
    Ok(Redirect::to("/films"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(items: &[(&str, &str)]) -> FilmForm {
        items.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn collects_repeated_actor_ids() {
        let input = parse_film_form(pairs(&[
            ("title", "ACE GOLDFINGER"),
            ("description", ""),
            ("language_id", "1"),
            ("actor_ids", "19"),
            ("actor_ids", "85"),
        ]))
        .unwrap();
        assert_eq!(input.title, "ACE GOLDFINGER");
        assert_eq!(input.description, None);
        assert_eq!(input.language_id, 1);
        assert_eq!(input.actor_ids, vec![19, 85]);
    }

    #[test]
    fn repeated_actor_is_linked_once() {
        let input = parse_film_form(pairs(&[
            ("language_id", "1"),
            ("actor_ids", "85"),
            ("actor_ids", "19"),
            ("actor_ids", "85"),
        ]))
        .unwrap();
        assert_eq!(input.actor_ids, vec![19, 85]);
    }

    #[test]
    fn no_actor_ids_means_empty_selection() {
        let input =
            parse_film_form(pairs(&[("title", "ADAPTATION HOLES"), ("language_id", "1")])).unwrap();
        assert!(input.actor_ids.is_empty());
    }

    #[test]
    fn non_numeric_id_is_bad_request() {
        let err = parse_film_form(pairs(&[("language_id", "english")])).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }
}
