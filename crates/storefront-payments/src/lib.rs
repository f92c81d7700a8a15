//! # storefront-payments
//!
//! Server-side payment processing for the storefront.
//!
//! ## Stripe Checkout (Hosted)
//!
//! **Flow:** cart → create session here → browser redirects to Stripe's
//! hosted page → Stripe redirects back and posts a webhook
//!
//! ```text
//! ┌─────────────┐  items   ┌─────────────────┐  redirect  ┌─────────────────┐
//! │   Browser   │─────────▶│ create-checkout │───────────▶│  Stripe Hosted  │
//! │   (cart)    │◀─────────│    -session     │ session_id │  Checkout Page  │
//! └─────────────┘          └─────────────────┘            └────────┬────────┘
//!                                                                  │ webhook
//!                                                         ┌────────▼────────┐
//!                                                         │   OrderStore    │
//!                                                         └─────────────────┘
//! ```
//!
//! Stripe handles card data and PCI compliance entirely; this crate only ever
//! sees line items and session ids.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use storefront_payments::{CheckoutSessions, RedirectUrls, StripeClient};
//!
//! let client = StripeClient::new(
//!     "sk_test_xxx",
//!     "whsec_xxx",
//!     RedirectUrls::for_origin("https://shop.example.com"),
//! );
//!
//! let session = client.create_session(&request.items).await?;
//! // Hand session.id back to the browser for redirectToCheckout
//! ```

mod checkout;
mod error;
mod orders;
mod webhook;

pub use checkout::{
    CheckoutSession, CheckoutSessions, PricedLineItem, RedirectUrls, StripeClient,
    order_total, price_line_items, to_cents,
};
pub use error::{PaymentError, Result};
pub use orders::{MemoryOrderStore, Order, OrderRef, OrderStatus, OrderStore};
pub use webhook::{WebhookEvent, WebhookHandler};
