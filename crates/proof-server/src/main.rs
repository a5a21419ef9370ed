//! HTTP API server for Merkle membership proofs.

use std::sync::Arc;

use axum::Router;
use rand::{rngs::StdRng, SeedableRng};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

mod config;
mod error;
mod handlers;
mod routes;
mod state;


use config::ServerConfig;
use membership_prover::setup::{setup_membership, CircuitKeyPair, SetupError};
use state::{AppState, SharedState};

/// Build the application router over `state`.
pub fn app(state: SharedState) -> Router {
    Router::new()
        .merge(routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

/// Load keys for the configured depth, running setup when none exist yet.
fn load_or_setup_keys(config: &ServerConfig) -> Result<CircuitKeyPair, SetupError> {
    let keys_dir = &config.keys_dir;

    if keys_dir.join("params.json").exists() {
        info!(dir = %keys_dir.display(), "loading existing circuit keys");
        let keys = CircuitKeyPair::load_from_directory(keys_dir)?;
        if keys.depth == config.depth {
            return Ok(keys);
        }
        warn!(
            keys_depth = keys.depth,
            depth = config.depth,
            "stored keys were generated for another depth, regenerating"
        );
    }

    info!(depth = config.depth, "running trusted setup (this may take a while)");
    let mut rng = StdRng::from_entropy();
    let keys = setup_membership(config.depth, &mut rng)?;
    keys.save_to_directory(keys_dir)?;
    Ok(keys)
}

#[tokio::main(flavor = "multi_thread", worker_threads = 2)]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = match ServerConfig::load() {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    };

    info!(depth = config.depth, "starting membership proof server");

    // Native tree endpoints keep working without keys
    let keys = match load_or_setup_keys(&config) {
        Ok(keys) => Some(keys),
        Err(e) => {
            error!("circuit keys unavailable, zk proving disabled: {}", e);
            None
        }
    };

    let addr = config.listen_addr;
    let state = Arc::new(AppState::new(config, keys));

    info!(%addr, "listening");

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!(%addr, "failed to bind: {}", e);
            std::process::exit(1);
        }
    };
    if let Err(e) = axum::serve(listener, app(state)).await {
        error!("server error: {}", e);
    }
}
