use crate::config::{StoreBackend, UserConfig};
use crate::handlers;
use crate::services::{InMemoryUserRepository, MongoDb, UserRepository};
use axum::{
    middleware,
    routing::{delete, get, post},
    Router,
};
use service_core::error::AppError;
use service_core::middleware::{metrics_middleware, request_id_middleware};
use std::future::IntoFuture;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::trace::TraceLayer;

#[derive(Clone)]
pub struct AppState {
    pub config: UserConfig,
    pub users: Arc<dyn UserRepository>,
}

impl AppState {
    pub fn new(config: UserConfig, users: Arc<dyn UserRepository>) -> Self {
        Self { config, users }
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/ready", get(handlers::readiness_check))
        .route("/metrics", get(handlers::metrics_endpoint))
        .route("/user/add", post(handlers::create_user))
        .route("/user/:id", get(handlers::get_user))
        .route("/user/delete/:id", delete(handlers::delete_user))
        .route_layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(request_id_middleware))
        .with_state(state)
}

pub struct Application {
    port: u16,
    server: Box<dyn std::future::Future<Output = std::io::Result<()>> + Send + Unpin>,
    db: Option<MongoDb>,
}

impl Application {
    pub async fn build(config: UserConfig) -> Result<Self, AppError> {
        let (users, db) = match config.store {
            StoreBackend::Mongo => {
                let db = MongoDb::connect(&config.mongodb).await.map_err(|e| {
                    tracing::error!("Failed to connect to MongoDB: {}", e);
                    e
                })?;
                let users: Arc<dyn UserRepository> = Arc::new(db.clone());
                (users, Some(db))
            }
            StoreBackend::Memory => {
                tracing::warn!("Using in-memory user store; data is lost on exit");
                let users: Arc<dyn UserRepository> = Arc::new(InMemoryUserRepository::new());
                (users, None)
            }
        };

        let app = build_router(AppState::new(config.clone(), users));

        let addr = SocketAddr::from(([0, 0, 0, 0], config.common.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind TCP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!("Listening on {}", port);

        let server = axum::serve(listener, app).with_graceful_shutdown(shutdown_signal());

        Ok(Self {
            port,
            server: Box::new(server.into_future()),
            db,
        })
    }

    /// The MongoDB handle, when the application runs against MongoDB.
    pub fn db(&self) -> Option<&MongoDb> {
        self.db.as_ref()
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        self.server.await
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
