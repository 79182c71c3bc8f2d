//! HTTP surface for the catalog queries.
//!
//! Responses use a GraphQL-style envelope: `{"data": {"allBooks": [...]}}`
//! on success, `{"data": null, "errors": [{"message": ...}]}` on failure.

use std::collections::BTreeMap;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::error::Result;
use crate::service::CatalogService;

#[derive(Debug, Serialize)]
struct Envelope<T> {
    data: Option<BTreeMap<&'static str, T>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    errors: Vec<ErrorEntry>,
}

#[derive(Debug, Serialize)]
struct ErrorEntry {
    message: String,
}

/// Build the router with every query route.
pub fn router(service: CatalogService) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/graphql/books", get(all_books))
        .route("/graphql/authors", get(all_authors))
        .route("/graphql/users", get(all_users))
        .layer(TraceLayer::new_for_http())
        .with_state(service)
}

/// Serve until Ctrl-C.
pub async fn serve(service: CatalogService, bind: &str) -> Result<()> {
    let listener = TcpListener::bind(bind).await?;
    tracing::info!(addr = %bind, "Serving catalog queries");

    axum::serve(listener, router(service))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("HTTP server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
}

async fn health(State(service): State<CatalogService>) -> Response {
    match service.store().health_check().await {
        Ok(()) => (StatusCode::OK, Json(serde_json::json!({"status": "ok"}))).into_response(),
        Err(e) => {
            tracing::warn!(error = %e, "Health check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(serde_json::json!({"status": "unavailable"})),
            )
                .into_response()
        }
    }
}

async fn all_books(State(service): State<CatalogService>) -> Response {
    respond("allBooks", service.all_books().await)
}

async fn all_authors(State(service): State<CatalogService>) -> Response {
    respond("allAuthors", service.all_authors().await)
}

async fn all_users(State(service): State<CatalogService>) -> Response {
    respond("allUsers", service.all_users().await)
}

fn respond<T: Serialize>(field: &'static str, result: Result<T>) -> Response {
    match result {
        Ok(value) => {
            let body = Envelope {
                data: Some(BTreeMap::from([(field, value)])),
                errors: Vec::new(),
            };
            (StatusCode::OK, Json(body)).into_response()
        }
        Err(e) => {
            let body: Envelope<T> = Envelope {
                data: None,
                errors: vec![ErrorEntry {
                    message: e.to_string(),
                }],
            };
            (StatusCode::SERVICE_UNAVAILABLE, Json(body)).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::Request;
    use libris_store::{StoreClient, StoreConfig};
    use serde_json::Value;
    use tower::ServiceExt;

    use super::*;

    async fn seeded_service() -> CatalogService {
        let store = StoreClient::connect(&StoreConfig::in_memory()).await.unwrap();
        store.ensure_schema().await.unwrap();
        for sql in [
            "INSERT INTO authors (id, name, nationality) VALUES (1, 'Asimov', 'US')",
            "INSERT INTO books (id, title, genre, published_year, author_id) VALUES
               (10, 'Foundation', 'SciFi', 1951, 1),
               (11, 'Caves', 'SciFi', 1954, 1)",
            "INSERT INTO users (id, name, email) VALUES (100, 'Ada', 'ada@example.com')",
            "INSERT INTO reading_list (user_id, book_id) VALUES (100, 11)",
        ] {
            sqlx::query(sql).execute(store.inner()).await.unwrap();
        }
        CatalogService::new(store)
    }

    async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("GET")
            .uri(uri)
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn test_all_books_envelope() {
        let app = router(seeded_service().await);
        let (status, json) = get_json(app, "/graphql/books").await;

        assert_eq!(status, StatusCode::OK);
        assert!(json.get("errors").is_none());
        let books = json["data"]["allBooks"].as_array().unwrap();
        assert_eq!(books.len(), 2);
        assert_eq!(books[0]["publishedYear"], 1951);
        assert_eq!(books[0]["author"]["name"], "Asimov");
        assert_eq!(books[0]["author"]["books"][1]["author"]["id"], 0);
    }

    #[tokio::test]
    async fn test_all_authors_and_users() {
        let service = seeded_service().await;

        let (status, json) = get_json(router(service.clone()), "/graphql/authors").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["allAuthors"][0]["books"].as_array().unwrap().len(), 2);

        let (status, json) = get_json(router(service), "/graphql/users").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["allUsers"][0]["readingList"][0]["title"], "Caves");
    }

    #[tokio::test]
    async fn test_storage_failure_is_503() {
        let service = seeded_service().await;
        service.store().close().await;

        let (status, json) = get_json(router(service), "/graphql/books").await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert!(json["data"].is_null());
        let message = json["errors"][0]["message"].as_str().unwrap();
        assert!(message.starts_with("Storage unavailable"));
    }

    #[tokio::test]
    async fn test_health() {
        let service = seeded_service().await;

        let (status, json) = get_json(router(service.clone()), "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "ok");

        service.store().close().await;
        let (status, _) = get_json(router(service), "/health").await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    }
}
