use axum::{Router, routing::get};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::store::DocumentStore;

pub mod handlers;
pub mod models;

use models::AppState;

pub fn create_router(store: Arc<DocumentStore>, max_hits: usize) -> Router {
    // Browser front ends call the endpoint from another origin.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/search", get(handlers::search_handler))
        .with_state(AppState { store, max_hits })
        .layer(cors)
}
