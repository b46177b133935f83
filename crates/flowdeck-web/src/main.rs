mod access_log;
mod handlers;
mod openapi;
mod state;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::process;
use std::sync::Arc;

use axum::Router;
use axum::routing::{delete, get, post};
use clap::Parser;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tracing::{error, info};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use flowdeck_core::gateway::DEFAULT_PER_PAGE;
use flowdeck_core::gateway::memory::MemoryGateway;

use openapi::ApiDoc;
use state::{SharedState, WebApp};

// ============================================================
// CLI
// ============================================================

#[derive(Parser)]
#[command(name = "flowdeck-web", about = "flowdeck workflows list API server", version = flowdeck_core::VERSION)]
struct Args {
    /// Listen address.
    #[arg(long, default_value = "0.0.0.0:8080", env = "FLOWDECK_LISTEN")]
    listen: String,

    /// JSON file with an array of flow records to start from.
    /// If not specified, the store starts empty.
    #[arg(long, env = "FLOWDECK_SEED")]
    seed: Option<PathBuf>,

    /// Flows per page.
    #[arg(long, default_value_t = DEFAULT_PER_PAGE, env = "FLOWDECK_PER_PAGE",
          value_parser = clap::value_parser!(u32).range(1..))]
    per_page: u32,
}

// ============================================================
// Main
// ============================================================

#[tokio::main]
async fn main() {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new("flowdeck_web=info,flowdeck_core=info")
            }),
        )
        .init();

    let gateway = match args.seed {
        Some(ref path) => match MemoryGateway::from_json_file(path) {
            Ok(g) => g,
            Err(e) => {
                error!(path = %path.display(), error = %e, "failed to load seed flows");
                process::exit(1);
            }
        },
        None => MemoryGateway::new(),
    };

    info!(
        version = flowdeck_core::VERSION,
        flows = gateway.len().await,
        per_page = args.per_page,
        "starting"
    );

    let state: SharedState = Arc::new(WebApp {
        gateway: Arc::new(gateway),
        per_page: args.per_page,
    });

    let app = router(state)
        .layer(CorsLayer::permissive())
        .layer(CompressionLayer::new())
        .into_make_service_with_connect_info::<SocketAddr>();

    let addr: SocketAddr = match args.listen.parse() {
        Ok(a) => a,
        Err(e) => {
            error!(listen = %args.listen, error = %e, "invalid listen address");
            process::exit(1);
        }
    };

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(l) => l,
        Err(e) => {
            error!(%addr, error = %e, "failed to bind");
            process::exit(1);
        }
    };
    info!(%addr, "listening");

    if let Err(e) = axum::serve(listener, app).await {
        error!(error = %e, "server error");
        process::exit(1);
    }
}

/// API routes, Swagger UI and access logging over `state`.
pub(crate) fn router(state: SharedState) -> Router {
    Router::new()
        .route("/api/v1/health", get(handlers::handle_health))
        .route(
            "/api/v1/flows",
            get(handlers::handle_list_flows).post(handlers::handle_create_flow),
        )
        .route("/api/v1/flows/{id}", delete(handlers::handle_delete_flow))
        .route(
            "/api/v1/flows/{id}/duplicate",
            post(handlers::handle_duplicate_flow),
        )
        .route(
            "/api/v1/flows/{id}/toggle-status",
            post(handlers::handle_toggle_status),
        )
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .with_state(state)
        .layer(axum::middleware::from_fn(access_log::access_log))
}
