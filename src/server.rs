use axum::Router;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::db::{create_pool, migrations, seed};
use crate::handlers;
use crate::state::AppState;

/// The API router with its middleware stack.
pub fn router(state: AppState) -> Router {
    Router::new()
        .merge(handlers::routes())
        .layer(CorsLayer::permissive())
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Build the application state and Axum router from a [`Config`].
///
/// Opens the database pool, runs pending migrations and, when enabled, loads
/// the demo data before anything is served.
pub fn build_app(config: Config) -> Result<(AppState, Router), Box<dyn std::error::Error>> {
    let db = create_pool(&config.database_path)?;

    {
        let mut conn = db.get()?;
        migrations::run_migrations(&conn, &config.migrations_path)?;
        if config.seed_demo {
            seed::seed_demo(&mut conn, &config.jitter.classifier())?;
        }
    }

    tracing::info!(jitter = ?config.jitter, "Classifier configured");
    let state = AppState::new(db, config);
    let app = router(state.clone());

    Ok((state, app))
}

/// Bind the router to `host:port` and spawn the server as a tokio task.
///
/// Returns the port actually bound (useful when `port` is 0) and a
/// [`JoinHandle`] for the server task.
pub async fn serve(
    app: Router,
    host: &str,
    port: u16,
) -> Result<(u16, JoinHandle<()>), Box<dyn std::error::Error>> {
    let addr = format!("{host}:{port}");
    let listener = TcpListener::bind(&addr).await?;
    let actual_port = listener.local_addr()?.port();

    let handle = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            tracing::error!("Server error: {}", e);
        }
    });

    Ok((actual_port, handle))
}
