#![allow(dead_code)]

use axum::Router;
use axum::http::StatusCode;
use axum::routing::{ get, post };
use axum::Json;
use serde_json::{ json, Value };
use std::sync::{ Arc, Mutex };

pub type Captured = Arc<Mutex<Vec<Value>>>;

/// Serves `router` on an ephemeral port and returns its base URL.
pub async fn spawn_backend(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

/// A base URL nothing is listening on.
pub async fn unreachable_backend() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

pub fn healthy_routes() -> Router {
    Router::new()
        .route(
            "/api/health",
            get(|| async { Json(json!({ "status": "healthy", "ai_initialized": true })) })
        )
        .route(
            "/api/clear",
            post(|| async { Json(json!({ "success": true, "message": "Conversation cleared" })) })
        )
}

/// Healthy backend whose chat endpoint always answers `reply`, recording request bodies.
pub fn replying_backend(reply: &'static str, captured: Captured) -> Router {
    healthy_routes().route(
        "/api/chat",
        post(move |Json(body): Json<Value>| {
            let captured = captured.clone();
            async move {
                captured.lock().unwrap().push(body);
                Json(json!({ "success": true, "response": reply }))
            }
        })
    )
}

/// Healthy backend whose chat endpoint fails with HTTP 500.
pub fn failing_backend() -> Router {
    healthy_routes().route(
        "/api/chat",
        post(|| async {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "success": false, "error": "Internal server error" })),
            )
        })
    )
}

/// Healthy backend whose chat endpoint answers 200 with a body that is not JSON.
pub fn garbled_backend() -> Router {
    healthy_routes().route("/api/chat", post(|| async { "<html>upstream proxy page</html>" }))
}

/// Reachable backend that reports a status other than `healthy`.
pub fn starting_backend() -> Router {
    Router::new().route(
        "/api/health",
        get(|| async { Json(json!({ "status": "starting", "ai_initialized": false })) })
    )
}
