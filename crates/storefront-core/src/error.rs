//! Error Types

use thiserror::Error;

/// Result type alias for storefront operations
pub type Result<T> = std::result::Result<T, ShopError>;

/// Shown when a checkout failure carries no message of its own
pub const CHECKOUT_FALLBACK_MESSAGE: &str = "Something went wrong during checkout.";

/// Storefront error types
#[derive(Error, Debug)]
pub enum ShopError {
    /// Catalog read failed
    #[error("Fetch error: {0}")]
    Fetch(String),

    /// Payment provider client could not be obtained
    #[error("Payment init error: {0}")]
    PaymentInit(String),

    /// Remote create-checkout-session call failed or returned no session
    #[error("Session creation error: {0}")]
    SessionCreation(String),

    /// Redirect to the hosted payment page reported an error
    #[error("Redirect error: {0}")]
    Redirect(String),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ShopError {
    /// The underlying failure message, without the variant prefix
    pub fn message(&self) -> String {
        match self {
            ShopError::Fetch(msg)
            | ShopError::PaymentInit(msg)
            | ShopError::SessionCreation(msg)
            | ShopError::Redirect(msg) => msg.clone(),
            ShopError::Json(e) => e.to_string(),
        }
    }

    /// Text shown to the user in a checkout notification
    pub fn user_message(&self) -> String {
        let msg = self.message();
        if msg.trim().is_empty() {
            CHECKOUT_FALLBACK_MESSAGE.into()
        } else {
            msg
        }
    }
}
