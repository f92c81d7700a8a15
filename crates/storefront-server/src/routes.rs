//! Router

use std::path::Path;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::{
    cors::{Any, CorsLayer},
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};

use crate::handlers::{
    create_checkout_session, get_order, health_check, list_products, stripe_webhook,
};
use crate::state::AppState;

/// Build the application router. Unknown paths fall through to the WASM
/// frontend in `static_dir`, with `index.html` for client-side routes.
pub fn router(state: AppState, static_dir: &Path) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let frontend =
        ServeDir::new(static_dir).fallback(ServeFile::new(static_dir.join("index.html")));

    Router::new()
        // Health & info
        .route("/health", get(health_check))

        // Catalog
        .route("/api/products", get(list_products))

        // Checkout
        .route("/functions/v1/create-checkout-session", post(create_checkout_session))
        .route("/api/orders/{session_id}", get(get_order))
        .route("/webhook/stripe", post(stripe_webhook))

        // Static files (WASM frontend)
        .fallback_service(frontend)

        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
