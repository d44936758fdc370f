use crate::handlers::{actors, categories, customers, films, pages, staff};
use crate::state::AppState;
use axum::Router;
use axum::routing::{get, post};
use tower_http::trace::TraceLayer;

/// Build the application router.
///
/// - `/actors` list, search, create, update, delete
/// - `/staffs` list
/// - `/categories` list, create, update, delete
/// - `/films` list, create and update with actors, delete
/// - `/customers` list, search, create, update, delete
/// - `/error` generic failure page
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(pages::index))
        .route("/error", get(pages::error))
        // Actors
        .route("/actors", get(actors::list))
        .route("/actors/search", post(actors::search))
        .route("/actors/create", get(actors::create_form).post(actors::create))
        .route("/actors/{id}/update", get(actors::update_form).post(actors::update))
        .route("/actors/{id}/delete", get(actors::delete_form).post(actors::delete))
        // Staff
        .route("/staffs", get(staff::list))
        // Categories
        .route("/categories", get(categories::list))
        .route("/categories/create", get(categories::create_form).post(categories::create))
        .route("/categories/{id}/update", get(categories::update_form).post(categories::update))
        .route("/categories/{id}/delete", get(categories::delete_form).post(categories::delete))
        // Films
        .route("/films", get(films::list))
        .route("/films/create", get(films::create_form).post(films::create))
        .route("/films/{id}/update", get(films::update_form).post(films::update))
        .route("/films/{id}/delete", get(films::delete_form).post(films::delete))
        // Customers
        .route("/customers", get(customers::list))
        .route("/customers/create", get(customers::create_form).post(customers::create))
        .route("/customers/{id}/update", get(customers::update_form).post(customers::update))
        .route("/customers/{id}/delete", get(customers::delete_form).post(customers::delete))
        .fallback(pages::not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
