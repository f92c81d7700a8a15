//! Stripe Checkout Integration
//!
//! Server side of the "create checkout session" function: validates the
//! cart's line items and creates a hosted Stripe Checkout session in
//! one-time `payment` mode.

use async_trait::async_trait;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use stripe::{
    CheckoutSession as StripeCheckoutSession, CheckoutSessionMode, Client,
    CreateCheckoutSession, CreateCheckoutSessionLineItems,
    CreateCheckoutSessionLineItemsPriceData,
    CreateCheckoutSessionLineItemsPriceDataProductData, Currency,
};

use storefront_core::LineItem;

use crate::error::{PaymentError, Result};

/// Where Stripe sends the shopper after the hosted page
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedirectUrls {
    pub success_url: String,
    pub cancel_url: String,
}

impl RedirectUrls {
    /// Derive both URLs from the site's public origin
    pub fn for_origin(origin: &str) -> Self {
        let origin = origin.trim_end_matches('/');
        Self {
            success_url: format!("{origin}/?checkout=success&session_id={{CHECKOUT_SESSION_ID}}"),
            cancel_url: format!("{origin}/shop?checkout=cancelled"),
        }
    }
}

/// A line item ready for Stripe: price in integer cents
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PricedLineItem {
    pub name: String,
    pub unit_amount: i64,
    pub quantity: u64,
    pub image: Option<String>,
}

impl PricedLineItem {
    /// `unit_amount * quantity`, `None` on overflow
    pub fn subtotal(&self) -> Option<i64> {
        self.unit_amount.checked_mul(i64::try_from(self.quantity).ok()?)
    }
}

/// Convert a decimal price to cents, rounding half away from zero
pub fn to_cents(price: Decimal) -> Option<i64> {
    price
        .checked_mul(dec!(100))?
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
}

/// Sum of all subtotals in cents
pub fn order_total(items: &[PricedLineItem]) -> Result<i64> {
    items
        .iter()
        .try_fold(0_i64, |acc, item| acc.checked_add(item.subtotal()?))
        .ok_or_else(|| PaymentError::InvalidLineItem("order total out of range".into()))
}

/// Reject items Stripe would refuse and convert the rest to cents
pub fn price_line_items(items: &[LineItem]) -> Result<Vec<PricedLineItem>> {
    if items.is_empty() {
        return Err(PaymentError::InvalidLineItem("cart is empty".into()));
    }

    let priced = items
        .iter()
        .map(|item| {
            let name = item.name.trim();
            if name.is_empty() {
                return Err(PaymentError::InvalidLineItem("item has no name".into()));
            }
            if item.quantity == 0 {
                return Err(invalid(name, "quantity must be at least 1"));
            }
            if item.price.is_sign_negative() {
                return Err(invalid(name, "price is negative"));
            }
            let unit_amount =
                to_cents(item.price).ok_or_else(|| invalid(name, "price out of range"))?;

            Ok(PricedLineItem {
                name: name.to_string(),
                unit_amount,
                quantity: u64::from(item.quantity),
                image: Some(item.image.clone()).filter(|url| !url.trim().is_empty()),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    order_total(&priced)?;
    Ok(priced)
}

fn invalid(name: &str, reason: &str) -> PaymentError {
    PaymentError::InvalidLineItem(format!("{name}: {reason}"))
}

/// Result of creating a checkout session
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CheckoutSession {
    /// Stripe session ID
    pub id: String,

    /// Sum of all line items in cents
    pub amount_total: i64,
}

/// Creates hosted checkout sessions (Strategy pattern)
///
/// Implemented by [`StripeClient`]; the server holds it as a trait object so
/// other gateways or test doubles can stand in.
#[async_trait]
pub trait CheckoutSessions: Send + Sync {
    async fn create_session(&self, items: &[LineItem]) -> Result<CheckoutSession>;
}

/// Stripe client wrapper
pub struct StripeClient {
    client: Client,
    webhook_secret: String,
    urls: RedirectUrls,
}

impl StripeClient {
    /// Create a new Stripe client
    pub fn new(secret_key: &str, webhook_secret: &str, urls: RedirectUrls) -> Self {
        Self {
            client: Client::new(secret_key),
            webhook_secret: webhook_secret.to_string(),
            urls,
        }
    }

    /// Create from environment variables
    pub fn from_env(urls: RedirectUrls) -> Result<Self> {
        let secret_key = std::env::var("STRIPE_SECRET_KEY")
            .map_err(|_| PaymentError::Config("STRIPE_SECRET_KEY not set".into()))?;
        let webhook_secret = std::env::var("STRIPE_WEBHOOK_SECRET")
            .map_err(|_| PaymentError::Config("STRIPE_WEBHOOK_SECRET not set".into()))?;

        Ok(Self::new(&secret_key, &webhook_secret, urls))
    }

    /// Get the webhook secret
    pub fn webhook_secret(&self) -> &str {
        &self.webhook_secret
    }
}

#[async_trait]
impl CheckoutSessions for StripeClient {
    async fn create_session(&self, items: &[LineItem]) -> Result<CheckoutSession> {
        let priced = price_line_items(items)?;
        let amount_total = order_total(&priced)?;

        let mut params = CreateCheckoutSession::new();
        params.success_url = Some(&self.urls.success_url);
        params.cancel_url = Some(&self.urls.cancel_url);
        params.mode = Some(CheckoutSessionMode::Payment);

        params.line_items = Some(
            priced
                .into_iter()
                .map(|item| CreateCheckoutSessionLineItems {
                    quantity: Some(item.quantity),
                    price_data: Some(CreateCheckoutSessionLineItemsPriceData {
                        currency: Currency::USD,
                        unit_amount: Some(item.unit_amount),
                        product_data: Some(CreateCheckoutSessionLineItemsPriceDataProductData {
                            name: item.name,
                            images: item.image.map(|url| vec![url]),
                            ..Default::default()
                        }),
                        ..Default::default()
                    }),
                    ..Default::default()
                })
                .collect(),
        );

        let session = StripeCheckoutSession::create(&self.client, params)
            .await
            .map_err(|e| PaymentError::Stripe(e.to_string()))?;

        tracing::info!(
            session_id = %session.id,
            amount_total,
            "Created checkout session"
        );

        Ok(CheckoutSession {
            id: session.id.to_string(),
            amount_total,
        })
    }
}
