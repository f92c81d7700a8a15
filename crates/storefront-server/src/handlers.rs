//! HTTP Handlers

use axum::{
    Json,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
};
use serde::Serialize;

use storefront_core::{CreateSessionRequest, CreateSessionResponse, Product};
use storefront_payments::{Order, OrderStore, PaymentError, WebhookHandler};

use crate::state::AppState;

// ============================================================================
// Response Types
// ============================================================================

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub stripe_configured: bool,
    pub products: usize,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn api_error(status: StatusCode, error: impl Into<String>, code: &str) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: error.into(),
            code: code.into(),
        }),
    )
}

fn payments_disabled() -> ApiError {
    api_error(StatusCode::SERVICE_UNAVAILABLE, "Payments not configured", "PAYMENTS_DISABLED")
}

// ============================================================================
// Handlers
// ============================================================================

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        stripe_configured: state.sessions.is_some(),
        products: state.products.len(),
    })
}

/// Every row of the product collection
pub async fn list_products(State(state): State<AppState>) -> Json<Vec<Product>> {
    Json(state.products.as_ref().clone())
}

/// The create-checkout-session function
pub async fn create_checkout_session(
    State(state): State<AppState>,
    Json(payload): Json<CreateSessionRequest>,
) -> Result<Json<CreateSessionResponse>, ApiError> {
    let sessions = state.sessions.as_ref().ok_or_else(payments_disabled)?;

    tracing::info!(items = payload.items.len(), "Creating checkout session");

    let session = sessions.create_session(&payload.items).await.map_err(|e| {
        tracing::error!("Checkout error: {}", e);
        match e {
            PaymentError::InvalidLineItem(_) => {
                api_error(StatusCode::BAD_REQUEST, e.user_message(), "INVALID_ITEMS")
            }
            _ => api_error(StatusCode::INTERNAL_SERVER_ERROR, e.user_message(), "CHECKOUT_ERROR"),
        }
    })?;

    Ok(Json(CreateSessionResponse::with_session(session.id)))
}

/// Order status for a checkout session
pub async fn get_order(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<Order>, ApiError> {
    let order = state.order_store.get(&session_id).await.map_err(|e| {
        tracing::error!("Order lookup error: {}", e);
        api_error(StatusCode::INTERNAL_SERVER_ERROR, e.user_message(), "STORAGE_ERROR")
    })?;

    order
        .map(Json)
        .ok_or_else(|| api_error(StatusCode::NOT_FOUND, "Order not found", "ORDER_NOT_FOUND"))
}

/// Stripe webhook handler
pub async fn stripe_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: String,
) -> Result<StatusCode, ApiError> {
    let secret = state.webhook_secret.as_ref().ok_or_else(payments_disabled)?;

    let signature = headers
        .get("stripe-signature")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| {
            api_error(StatusCode::BAD_REQUEST, "Missing Stripe signature", "MISSING_SIGNATURE")
        })?;

    let handler = WebhookHandler::new(state.order_store.clone());

    let event = handler.parse_event(&body, signature, secret).map_err(|e| {
        tracing::warn!("Webhook signature failed: {}", e);
        api_error(StatusCode::BAD_REQUEST, "Invalid signature", "INVALID_SIGNATURE")
    })?;

    handler.handle(event).await.map_err(|e| {
        tracing::error!("Webhook processing error: {}", e);
        api_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Webhook processing failed",
            "WEBHOOK_ERROR",
        )
    })?;

    Ok(StatusCode::OK)
}
