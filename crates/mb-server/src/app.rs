//! Router construction.
//!
//! Builds the axum router with all routes.

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};

use crate::handlers;
use crate::state::AppState;

/// Create the application router.
///
/// # Arguments
///
/// * `state` - Shared application state
pub(crate) fn create_router(state: Arc<AppState>) -> Router {
    // Public read paths
    let public_routes = Router::new()
        .route("/api/health", get(handlers::public::health))
        .route("/api/meta", get(handlers::public::list_meta))
        .route("/api/pages/{*route}", get(handlers::public::load_page));

    // Credentialed content API
    let content_routes = Router::new()
        .route("/api/content/parse", post(handlers::content::parse_content))
        .route("/api/content", post(handlers::content::update_content))
        .route("/api/content/{*route}", get(handlers::content::get_content));

    Router::new()
        .merge(public_routes)
        .merge(content_routes)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode, header};
    use mb_content::{ContentRepository, UpdateCoordinator};
    use mb_renderer::ContentProcessor;
    use mb_store::{MemoryStore, Store};
    use pretty_assertions::assert_eq;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use crate::auth::StaticTokenAuthenticator;

    use super::*;

    const TOKEN: &str = "test-token";

    fn test_app() -> Router {
        let store: Arc<dyn Store> = Arc::new(MemoryStore::new());
        let processor = Arc::new(ContentProcessor::new());
        let repository = Arc::new(ContentRepository::new(store));
        let coordinator = UpdateCoordinator::new(Arc::clone(&processor), Arc::clone(&repository));
        let state = Arc::new(AppState {
            processor,
            repository,
            coordinator,
            authenticator: Arc::new(StaticTokenAuthenticator::new(Some(TOKEN.to_owned()))),
            version: "0.0.0-test".to_owned(),
        });
        create_router(state)
    }

    fn authed_post(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::AUTHORIZATION, format!("Bearer {TOKEN}"))
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn authed_get(uri: &str) -> Request<Body> {
        Request::builder()
            .uri(uri)
            .header(header::AUTHORIZATION, format!("Bearer {TOKEN}"))
            .body(Body::empty())
            .unwrap()
    }

    fn anonymous_get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn store_document(app: &Router, route: &str, body_text: &str) {
        let content = format!("---\nroute: {route}\n---\n{body_text}");
        let response = app
            .clone()
            .oneshot(authed_post("/api/content", json!({"content": content})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_health() {
        let app = test_app();

        let response = app.oneshot(anonymous_get("/api/health")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["version"], "0.0.0-test");
    }

    #[tokio::test]
    async fn test_update_requires_credential() {
        let app = test_app();

        let request = Request::builder()
            .method("POST")
            .uri("/api/content")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(
                json!({"content": "---\nroute: x\n---\nhi"}).to_string(),
            ))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_update_rejects_wrong_token() {
        let app = test_app();

        let request = Request::builder()
            .method("POST")
            .uri("/api/content")
            .header(header::AUTHORIZATION, "Bearer wrong")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(
                json!({"content": "---\nroute: x\n---\nhi"}).to_string(),
            ))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_update_and_get_round_trip() {
        let app = test_app();
        store_document(&app, "Hello World", "# Hi").await;

        // Any string with the same normalization finds the record
        for uri in ["/api/content/hello-world", "/api/content/Hello%20World"] {
            let response = app.clone().oneshot(authed_get(uri)).await.unwrap();
            assert_eq!(response.status(), StatusCode::OK);
            let body = body_json(response).await;
            assert_eq!(body["attributes"]["route"], "Hello World");
            assert!(body["rendered"].as_str().unwrap().contains(r#"<h1 id="hi">"#));
        }
    }

    #[tokio::test]
    async fn test_update_missing_route_code() {
        let app = test_app();

        let response = app
            .oneshot(authed_post(
                "/api/content",
                json!({"content": "---\ntitle: No Route\n---\nhi"}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = body_json(response).await;
        assert_eq!(body["type"], "error");
        assert_eq!(body["code"], "CONTENT_MISSING_FIELD");
    }

    #[tokio::test]
    async fn test_update_conflict_code() {
        let app = test_app();
        store_document(&app, "guide", "v1").await;

        let response = app
            .oneshot(authed_post(
                "/api/content",
                json!({
                    "content": "---\nroute: guide\n---\nv2",
                    "expectedPriorRaw": "not the stored raw"
                }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CONFLICT);
        let body = body_json(response).await;
        assert_eq!(body["code"], "CONTENT_HAS_CHANGED");
    }

    #[tokio::test]
    async fn test_update_with_matching_expectation() {
        let app = test_app();
        store_document(&app, "guide", "v1").await;

        let response = app
            .oneshot(authed_post(
                "/api/content",
                json!({
                    "content": "---\nroute: guide\n---\nv2",
                    "expectedPriorRaw": "---\nroute: guide\n---\nv1"
                }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_get_content_not_found() {
        let app = test_app();

        let response = app.oneshot(authed_get("/api/content/missing")).await.unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = body_json(response).await;
        assert_eq!(body["code"], "ROUTE_NOT_FOUND");
    }

    #[tokio::test]
    async fn test_parse_does_not_store() {
        let app = test_app();

        let response = app
            .clone()
            .oneshot(authed_post(
                "/api/content/parse",
                json!({"content": "---\nroute: draft\n---\n# Draft"}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["attributes"]["route"], "draft");
        assert!(body["rendered"].as_str().unwrap().contains("<h1"));
        assert_eq!(body["raw"], "---\nroute: draft\n---\n# Draft");

        // Nothing was written to the repository
        let response = app.oneshot(authed_get("/api/content/draft")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_public_page_returns_html_only() {
        let app = test_app();
        store_document(&app, "guide", "# Guide").await;

        let response = app.oneshot(anonymous_get("/api/pages/guide")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(
            response
                .headers()
                .get(header::CONTENT_TYPE)
                .unwrap()
                .to_str()
                .unwrap()
                .starts_with("text/html")
        );
        assert!(response.headers().contains_key(header::ETAG));
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let html = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(html.contains(r#"<h1 id="guide">"#));
        // Raw markdown is not leaked on the public path
        assert!(!html.contains("---"));
    }

    #[tokio::test]
    async fn test_public_page_conditional_get() {
        let app = test_app();
        store_document(&app, "guide", "# Guide").await;

        let first = app
            .clone()
            .oneshot(anonymous_get("/api/pages/guide"))
            .await
            .unwrap();
        let etag = first.headers().get(header::ETAG).unwrap().clone();

        let request = Request::builder()
            .uri("/api/pages/guide")
            .header(header::IF_NONE_MATCH, etag)
            .body(Body::empty())
            .unwrap();
        let second = app.oneshot(request).await.unwrap();

        assert_eq!(second.status(), StatusCode::NOT_MODIFIED);
    }

    #[tokio::test]
    async fn test_meta_list_is_public_and_lazy_inits() {
        let app = test_app();

        // First read against an empty store creates the collection
        let response = app.clone().oneshot(anonymous_get("/api/meta")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, json!([]));

        store_document(&app, "a", "first").await;
        store_document(&app, "b", "second").await;

        let response = app.oneshot(anonymous_get("/api/meta")).await.unwrap();
        let body = body_json(response).await;
        assert_eq!(body.as_array().unwrap().len(), 2);
        assert_eq!(body[0]["route"], "a");
    }
}
