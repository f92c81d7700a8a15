//! storefront HTTP Server
//!
//! Axum-based server backing the storefront frontend: the product listing,
//! the create-checkout-session function, Stripe webhooks, and the static
//! WASM bundle.

mod catalog;
mod config;
mod handlers;
mod routes;
mod state;

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use storefront_payments::{CheckoutSessions, MemoryOrderStore, RedirectUrls, StripeClient};

use crate::config::ServerConfig;
use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::from_env();

    let products = catalog::load_products(config.products_file.as_deref()).await?;

    // Initialize payments
    let urls = RedirectUrls::for_origin(&config.public_url);
    let (sessions, webhook_secret) = match StripeClient::from_env(urls) {
        Ok(client) => {
            tracing::info!("✓ Stripe configured");
            let secret: Arc<str> = Arc::from(client.webhook_secret());
            let sessions: Arc<dyn CheckoutSessions> = Arc::new(client);
            (Some(sessions), Some(secret))
        }
        Err(e) => {
            tracing::warn!("⚠ Stripe not configured - payments disabled ({})", e);
            tracing::warn!("  Set STRIPE_SECRET_KEY and STRIPE_WEBHOOK_SECRET in .env");
            (None, None)
        }
    };

    // Build application state
    let state = AppState {
        products: Arc::new(products),
        sessions,
        webhook_secret,
        order_store: Arc::new(MemoryOrderStore::new()),
    };

    let app = routes::router(state, &config.static_dir);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;

    tracing::info!("══════════════════════════════════════════════════");
    tracing::info!("🛒 storefront running on http://{}", config.bind_addr);
    tracing::info!("══════════════════════════════════════════════════");
    tracing::info!("");
    tracing::info!("Endpoints:");
    tracing::info!("  GET  /health                               - Health check");
    tracing::info!("  GET  /api/products                         - Product collection");
    tracing::info!("  POST /functions/v1/create-checkout-session - Create Stripe checkout");
    tracing::info!("  GET  /api/orders/{{session_id}}              - Order status");
    tracing::info!("  POST /webhook/stripe                       - Stripe webhook");
    tracing::info!("");

    axum::serve(listener, app).await?;

    Ok(())
}
