#![allow(dead_code)]

use axum::{
    body::Body,
    http::{Request, Response},
    Router,
};
use http_body_util::BodyExt;
use service_core::config::Config as CoreConfig;
use std::sync::Arc;
use tower::ServiceExt;
use user_service::config::{MongoConfig, StoreBackend, UserConfig};
use user_service::services::{InMemoryUserRepository, MongoDb};
use user_service::startup::{build_router, AppState, Application};
use uuid::Uuid;

pub const ANN: &str = r#"{"name":"Ann","address":{"street":"1 Main","apt":"","city":"X","state":"Y","zip":"00000"}}"#;

/// Router over a fresh in-memory store; the store is returned for inspection.
pub fn memory_app() -> (Router, Arc<InMemoryUserRepository>) {
    let repo = Arc::new(InMemoryUserRepository::new());
    let state = AppState::new(UserConfig::in_memory(), repo.clone());
    (build_router(state), repo)
}

pub async fn send(app: &Router, request: Request<Body>) -> Response<Body> {
    app.clone()
        .oneshot(request)
        .await
        .expect("Failed to execute request")
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("Failed to read body")
        .to_bytes();
    String::from_utf8(bytes.to_vec()).expect("Body is not UTF-8")
}

pub fn post_user(body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/user/add")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn get_user(id: &str) -> Request<Body> {
    Request::builder()
        .uri(format!("/user/{}", id))
        .body(Body::empty())
        .unwrap()
}

pub fn delete_user(id: &str) -> Request<Body> {
    Request::builder()
        .method("DELETE")
        .uri(format!("/user/delete/{}", id))
        .body(Body::empty())
        .unwrap()
}

pub fn is_object_id_hex(s: &str) -> bool {
    s.len() == 24 && s.chars().all(|c| c.is_ascii_hexdigit())
}

pub fn mongo_config(uri: &str, database: &str) -> UserConfig {
    UserConfig {
        common: CoreConfig {
            port: 0, // Random port for testing
            ..CoreConfig::default()
        },
        store: StoreBackend::Mongo,
        mongodb: MongoConfig {
            uri: uri.to_string(),
            database: database.to_string(),
            collection: "user".to_string(),
        },
    }
}

pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub db: MongoDb,
    pub db_name: String,
}

impl TestApp {
    /// Serve the full application against the MongoDB at `MONGODB_URI`
    /// (default `mongodb://localhost:27017`) using a throwaway database.
    pub async fn spawn() -> Self {
        let uri = std::env::var("MONGODB_URI")
            .unwrap_or_else(|_| "mongodb://localhost:27017".to_string());
        let db_name = format!("user_test_{}", Uuid::new_v4().simple());

        let app = Application::build(mongo_config(&uri, &db_name))
            .await
            .expect("Failed to build test application");

        let port = app.port();
        let db = app.db().expect("MongoDB backend expected").clone();
        let address = format!("http://127.0.0.1:{}", port);

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        // Wait for server to be ready by polling health endpoint
        let client = reqwest::Client::new();
        let health_url = format!("{}/health", address);
        for _ in 0..50 {
            if client.get(&health_url).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
        }

        TestApp {
            address,
            port,
            db,
            db_name,
        }
    }

    pub async fn cleanup(&self) {
        let _ = self.db.client().database(&self.db_name).drop(None).await;
    }
}
