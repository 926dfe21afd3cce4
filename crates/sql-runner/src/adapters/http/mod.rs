pub mod handlers;
mod protocol;

use std::path::PathBuf;

use axum::{
    http::HeaderValue,
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use crate::{cli::Args, error::AppResult};

#[derive(Clone)]
pub struct AppState {
    pub db_path: PathBuf,
}

pub async fn run(args: Args) -> AppResult<()> {
    let router = build_router(args.db_path.clone(), &args.cors_origin);
    let listener = TcpListener::bind(args.bind).await?;
    tracing::info!(addr = %args.bind, db = %args.db_path.display(), "sql-runner listening");
    axum::serve(listener, router).await?;
    Ok(())
}

pub fn build_router(db_path: PathBuf, cors_origins: &[String]) -> Router {
    let state = AppState { db_path };

    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .route("/api/v1/sql/run", post(handlers::run_sql))
        .route("/api/v1/sql/tables", get(handlers::list_tables))
        .route("/api/v1/sql/tables/{table_name}", get(handlers::table_info))
        .layer(cors_layer(cors_origins))
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() {
        // No origins configured: permissive, for local development.
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<HeaderValue> = origins.iter().filter_map(|s| s.parse().ok()).collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    }
}
