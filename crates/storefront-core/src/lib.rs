//! # storefront-core
//!
//! Cart state, catalog loading, the cart panel state machine and the
//! checkout flow for the storefront. Compiles for both native targets and
//! `wasm32-unknown-unknown`.
//!
//! ## Flow
//!
//! ```text
//! ┌──────────┐ add_to_cart ┌───────────┐ notify ┌────────────┐
//! │ Catalog  │────────────▶│ CartStore │───────▶│ Cart Panel │
//! └──────────┘             └───────────┘        └─────┬──────┘
//!                                                     │ checkout
//!                                                     ▼
//!                ┌─────────────────┐ session_id ┌──────────────┐
//!                │ Hosted payment  │◀───────────│   Checkout   │
//!                │      page       │  redirect  │  Initiator   │
//!                └─────────────────┘            └──────────────┘
//! ```
//!
//! The payment provider and the session backend sit behind traits so the
//! browser crate can plug in Stripe.js and HTTP, and tests can plug in fakes.

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod error;
pub mod model;
pub mod panel;

pub use cart::{Cart, CartStore, SubscriptionId};
pub use catalog::{ProductSource, featured_products, load_catalog, parse_products};
pub use checkout::{
    Checkout, CheckoutController, CreateSessionRequest, CreateSessionResponse, LineItem,
    Notification, NotificationVariant, Notifier, PaymentHandle, PaymentProvider,
    SessionBackend, SubmitOutcome,
};
pub use error::{Result, ShopError};
pub use model::{CartItem, CartProduct, Product, format_price};
pub use panel::{Bounds, CartPanel, OpenEffects, PanelEvent, PanelState, Point};
