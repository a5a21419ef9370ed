//! API route definitions.

use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers;
use crate::state::SharedState;

/// Create API routes
pub fn api_routes() -> Router<SharedState> {
    Router::new()
        // Health check
        .route("/health", get(handlers::health))
        // Native tree and proof endpoints
        .route("/api/tree/build", post(handlers::build_tree))
        .route("/api/proof/generate", post(handlers::generate_proof))
        .route("/api/proof/verify", post(handlers::verify_proof))
        // Zero-knowledge proof generation
        .route("/api/prove/membership", post(handlers::prove_membership))
}
