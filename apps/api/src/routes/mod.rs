pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::chat::handlers as chat;
use crate::contributions::handlers as contributions;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Contributions calendar
        .route(
            "/api/v1/contributions",
            get(contributions::handle_default_calendar),
        )
        .route(
            "/api/v1/contributions/:username",
            get(contributions::handle_calendar),
        )
        .route(
            "/api/v1/contributions/:username/navigate",
            get(contributions::handle_navigate),
        )
        // Chat assistant
        .route("/api/v1/chat", post(chat::handle_chat))
        .route("/api/v1/chat/providers", get(chat::handle_providers))
        .route(
            "/api/v1/chat/:session_id",
            get(chat::handle_history).delete(chat::handle_reset),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use crate::chat::chain::ProviderChain;
    use crate::chat::session::SessionStore;
    use crate::config::Config;
    use crate::contributions::fetcher::ContributionsClient;
    use crate::llm_client::test_context;

    fn test_state(contributions_base: &str) -> AppState {
        let config = Config::for_tests(contributions_base);
        AppState {
            contributions: ContributionsClient::new(
                config.contributions_api_base.clone(),
                Duration::from_secs(config.contributions_cache_ttl_secs),
            )
            .unwrap()
            .with_max_users(config.contributions_cache_max_users),
            chain: Arc::new(ProviderChain::new(vec![], Duration::from_secs(1))),
            generation_context: Arc::new(test_context()),
            sessions: SessionStore::new(
                Duration::from_secs(config.session_idle_ttl_secs),
                config.max_sessions,
            ),
            config,
        }
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn chat_request(body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/v1/chat")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let app = build_router(test_state("http://127.0.0.1:9"));
        let (status, body) = send(app, get_request("/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["service"], "portfolio-api");
    }

    #[tokio::test]
    async fn test_chat_without_providers_answers_from_fallback() {
        let state = test_state("http://127.0.0.1:9");
        let app = build_router(state.clone());

        let (status, body) = send(app, chat_request(json!({ "message": "Tell me about your projects" }))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["provider"], "Fallback");
        assert!(!body["content"].as_str().unwrap().contains("[["));

        let session_id = body["session_id"].as_str().unwrap().to_string();
        let app = build_router(state);
        let (status, history) = send(app, get_request(&format!("/api/v1/chat/{session_id}"))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(history["messages"].as_array().unwrap().len(), 2);
        assert_eq!(history["messages"][0]["role"], "user");
    }

    #[tokio::test]
    async fn test_chat_rejects_empty_message() {
        let app = build_router(test_state("http://127.0.0.1:9"));
        let (status, body) = send(app, chat_request(json!({ "message": "   " }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_unknown_session_is_not_found() {
        let app = build_router(test_state("http://127.0.0.1:9"));
        let uri = format!("/api/v1/chat/{}", uuid::Uuid::new_v4());
        let (status, body) = send(app, get_request(&uri)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_reset_clears_history() {
        let state = test_state("http://127.0.0.1:9");
        let (_, body) = send(build_router(state.clone()), chat_request(json!({ "message": "hi" }))).await;
        let uri = format!("/api/v1/chat/{}", body["session_id"].as_str().unwrap());

        let request = Request::builder()
            .method("DELETE")
            .uri(&uri)
            .body(Body::empty())
            .unwrap();
        let (status, _) = send(build_router(state.clone()), request).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (_, history) = send(build_router(state), get_request(&uri)).await;
        assert!(history["messages"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_providers_lists_fallback() {
        let app = build_router(test_state("http://127.0.0.1:9"));
        let (status, body) = send(app, get_request("/api/v1/chat/providers")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["available"], json!(["Fallback"]));
    }

    #[tokio::test]
    async fn test_contributions_calendar_from_source() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v4/octocat"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "contributions": [
                    { "date": "2020-01-01", "count": 3, "level": 1 }
                ]
            })))
            .mount(&server)
            .await;

        let app = build_router(test_state(&server.uri()));
        let (status, body) = send(app, get_request("/api/v1/contributions/octocat?offset=0")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["username"], "octocat");
        assert_eq!(body["can_go_back"], true);
        assert_eq!(body["can_go_forward"], false);
        assert!(body["notice"].is_null());
    }

    #[tokio::test]
    async fn test_contributions_degrade_when_source_fails() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let app = build_router(test_state(&server.uri()));
        let (status, body) = send(app, get_request("/api/v1/contributions")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total"], 0);
        assert!(body["notice"].is_string());
    }

    #[tokio::test]
    async fn test_contributions_reject_invalid_username() {
        let app = build_router(test_state("http://127.0.0.1:9"));
        let (status, _) = send(app, get_request("/api/v1/contributions/-bad-")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_chat_on_busy_session_is_conflict() {
        let state = test_state("http://127.0.0.1:9");
        let session_id = state.sessions.create();
        let _in_flight = state.sessions.acquire(session_id).unwrap();

        let app = build_router(state.clone());
        let (status, body) = send(
            app,
            chat_request(json!({ "session_id": session_id, "message": "hello" })),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"]["code"], "CONFLICT");
    }

    async fn navigation_server(contributions: Value) -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v4/octocat"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "contributions": contributions })),
            )
            .mount(&server)
            .await;
        server
    }

    #[tokio::test]
    async fn test_navigate_backward_without_older_data_stays_put() {
        let server = navigation_server(json!([])).await;
        let app = build_router(test_state(&server.uri()));

        let (status, body) = send(
            app,
            get_request("/api/v1/contributions/octocat/navigate?offset=0&direction=backward"),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["offset"], 0);
        assert_eq!(body["can_go_back"], false);
    }

    #[tokio::test]
    async fn test_navigate_moves_between_years() {
        let server = navigation_server(json!([
            { "date": "2001-06-01", "count": 2, "level": 1 }
        ]))
        .await;
        let state = test_state(&server.uri());

        let (_, back) = send(
            build_router(state.clone()),
            get_request("/api/v1/contributions/octocat/navigate?offset=0&direction=backward"),
        )
        .await;
        assert_eq!(back["offset"], -1);
        assert_eq!(back["can_go_forward"], true);

        let (_, forward) = send(
            build_router(state.clone()),
            get_request("/api/v1/contributions/octocat/navigate?offset=0&direction=forward"),
        )
        .await;
        assert_eq!(forward["offset"], 0);
    }

    #[tokio::test]
    async fn test_navigate_at_oldest_allowed_year_stays_valid() {
        let server = navigation_server(json!([
            { "date": "1900-01-01", "count": 1, "level": 1 }
        ]))
        .await;
        let state = test_state(&server.uri());

        let (status, body) = send(
            build_router(state.clone()),
            get_request("/api/v1/contributions/octocat/navigate?offset=-50&direction=backward"),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["offset"], -50);
        assert_eq!(body["can_go_back"], false);

        let (status, _) = send(
            build_router(state),
            get_request("/api/v1/contributions/octocat?offset=-50"),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }
}
