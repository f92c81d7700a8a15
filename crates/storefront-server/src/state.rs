//! Application State

use std::sync::Arc;

use storefront_core::Product;
use storefront_payments::{CheckoutSessions, MemoryOrderStore};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// The product collection, loaded once at startup
    pub products: Arc<Vec<Product>>,

    /// Checkout session creator (None if Stripe is not configured)
    pub sessions: Option<Arc<dyn CheckoutSessions>>,

    /// Stripe webhook signing secret (None if Stripe is not configured)
    pub webhook_secret: Option<Arc<str>>,

    /// Orders recorded from webhooks
    pub order_store: Arc<MemoryOrderStore>,
}
