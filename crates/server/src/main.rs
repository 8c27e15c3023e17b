//! murmur server entry point.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, bail};
use axum::Router;
use murmur_api::{AppState, router as api_router};
use murmur_common::Config;
use tokio::signal;
use tower_http::{
    cors::{Any, CorsLayer},
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Waits for a shutdown signal (SIGINT or SIGTERM).
///
/// On Unix systems, this listens for both SIGINT (Ctrl+C) and SIGTERM.
/// On Windows, this only listens for Ctrl+C.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
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
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received SIGINT, initiating graceful shutdown...");
        },
        () = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown...");
        },
    }
}

/// Assemble the application: the API under `/api` and, when a static
/// directory is given, the built client with an `index.html` fallback for
/// client-side routes.
fn build_app(state: AppState, static_dir: Option<&Path>) -> Router {
    let mut app = Router::new().nest("/api", api_router());

    if let Some(dir) = static_dir {
        let spa = ServeDir::new(dir).fallback(ServeFile::new(dir.join("index.html")));
        app = app.fallback_service(spa);
    }

    app.layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "murmur_server=debug,murmur_api=debug,murmur_core=debug,tower_http=debug".into()
            }),
        )
        .init();

    info!("Starting murmur server...");

    // Load configuration
    let config = Config::load().context("failed to load configuration")?;

    // Connect to database
    let db = murmur_db::init(&config)
        .await
        .context("failed to connect to database")?;
    info!("Connected to database");

    // Run migrations
    info!("Running database migrations...");
    murmur_db::migrate(&db)
        .await
        .context("failed to run migrations")?;
    info!("Migrations completed");

    let state = AppState::new(Arc::new(db));

    let static_dir = config.server.static_dir.as_deref().map(Path::new);
    if let Some(dir) = static_dir {
        if dir.join("index.html").is_file() {
            info!(dir = %dir.display(), "Serving client assets");
        } else {
            error!(dir = %dir.display(), "Static directory has no index.html");
            bail!(
                "could not find the build directory: {}, make sure to build the client first",
                dir.display()
            );
        }
    }

    let app = build_app(state, static_dir);

    // Start server with graceful shutdown
    let addr = config.bind_address();
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use sea_orm::{DatabaseBackend, MockDatabase};
    use tower::ServiceExt;

    fn mock_state() -> AppState {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        AppState::new(Arc::new(db))
    }

    fn static_fixture(name: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!("murmur-{name}-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("index.html"), "<html>murmur</html>").unwrap();
        std::fs::write(dir.join("app.js"), "console.log(1)").unwrap();
        dir
    }

    async fn get(app: Router, uri: &str) -> (StatusCode, String) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, String::from_utf8_lossy(&bytes).into_owned())
    }

    #[tokio::test]
    async fn test_without_static_dir_only_api_is_served() {
        let (status, _) = get(build_app(mock_state(), None), "/some/page").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_static_assets_and_spa_fallback() {
        let dir = static_fixture("spa");

        let (status, body) = get(build_app(mock_state(), Some(&dir)), "/app.js").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "console.log(1)");

        let (status, body) = get(build_app(mock_state(), Some(&dir)), "/posts/123").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("murmur"));
    }

    #[tokio::test]
    async fn test_unknown_api_route_is_json_404() {
        let dir = static_fixture("api");

        let (status, body) = get(build_app(mock_state(), Some(&dir)), "/api/unknown").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body.contains("NOT_FOUND"));
    }
}
