//! Router behavior that needs no running database.
//!
//! The pool connects lazily, so requests rejected before checkout and pages
//! that never touch the database work against an unreachable server.

use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use axum::response::Response;
use sakila_web::{AppState, create_router};
use tower::ServiceExt;

fn state() -> AppState {
    let pool = sakila::create_pool("postgres://postgres@127.0.0.1:1/pagila", 2).unwrap();
    AppState::new(pool).unwrap()
}

async fn send(request: Request<Body>) -> Response {
    create_router(state()).oneshot(request).await.unwrap()
}

fn form(uri: &str, body: String) -> Request<Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body))
        .unwrap()
}

async fn body_text(response: Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn location(response: &Response) -> Option<&str> {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
}

#[tokio::test]
async fn root_redirects_to_actors() {
    let response = send(Request::get("/").body(Body::empty()).unwrap()).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/actors"));
}

#[tokio::test]
async fn error_page_is_500() {
    let response = send(Request::get("/error").body(Body::empty()).unwrap()).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body_text(response).await.contains("could not be completed"));
}

#[tokio::test]
async fn category_name_over_limit_is_rejected() {
    let response = send(form("/categories/create", format!("name={}", "x".repeat(26)))).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(body_text(response).await.contains("name must be at most 25 characters"));
}

#[tokio::test]
async fn actor_name_over_limit_is_rejected() {
    let body = format!("first_name={}&last_name=GUINESS", "P".repeat(46));
    let response = send(form("/actors/create", body)).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(body_text(response).await.contains("first_name"));
}

#[tokio::test]
async fn customer_form_reports_every_bad_field() {
    let body = format!(
        "store_id=1&first_name={}&last_name=SMITH&email=&address=1913+Hanoi+Way&address2=\
         &district=Nagasaki&city_id=463&postal_code=35200&phone={}",
        "M".repeat(46),
        "9".repeat(21),
    );
    let response = send(form("/customers/create", body)).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let text = body_text(response).await;
    assert!(text.contains("first_name"));
    assert!(text.contains("phone"));
}

#[tokio::test]
async fn film_form_with_bad_language_is_rejected() {
    let response = send(form("/films/create", "title=ACE&language_id=x&actor_ids=1".into())).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unreachable_database_redirects_to_error_page() {
    let response = send(Request::get("/staffs").body(Body::empty()).unwrap()).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/error"));
}

#[tokio::test]
async fn unknown_path_is_404() {
    let response = send(Request::get("/rentals").body(Body::empty()).unwrap()).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
