//! Stripe Webhook Handling
//!
//! Records the outcome of checkout sessions as orders.

use std::sync::Arc;

use stripe::{CheckoutSession, CheckoutSessionPaymentStatus, Event, EventObject, EventType, Webhook};

use crate::error::{PaymentError, Result};
use crate::orders::{Order, OrderStatus, OrderStore};

/// Parsed webhook event
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WebhookEvent {
    /// Shopper finished the hosted checkout page
    CheckoutCompleted {
        session_id: String,
        customer_email: Option<String>,
        amount_total: Option<i64>,
        paid: bool,
    },

    /// Session timed out without payment
    CheckoutExpired { session_id: String },

    /// Unhandled event type
    Other { event_type: String },
}

/// Webhook handler
pub struct WebhookHandler<S: OrderStore> {
    order_store: Arc<S>,
}

impl<S: OrderStore> WebhookHandler<S> {
    pub fn new(order_store: Arc<S>) -> Self {
        Self { order_store }
    }

    /// Verify webhook signature and parse event
    pub fn parse_event(&self, payload: &str, signature: &str, secret: &str) -> Result<Event> {
        Webhook::construct_event(payload, signature, secret)
            .map_err(|e| PaymentError::WebhookSignature(e.to_string()))
    }

    /// Process a webhook event
    pub async fn handle(&self, event: Event) -> Result<WebhookEvent> {
        tracing::info!(event_type = ?event.type_, "Processing Stripe webhook");

        let parsed = parse_webhook_event(&event)?;
        self.apply(&parsed).await?;
        Ok(parsed)
    }

    /// Update the order store for an already parsed event
    pub async fn apply(&self, event: &WebhookEvent) -> Result<()> {
        match event {
            WebhookEvent::CheckoutCompleted {
                session_id,
                customer_email,
                amount_total,
                paid,
            } => {
                let status = if *paid { OrderStatus::Paid } else { OrderStatus::Pending };
                let mut order = self
                    .order_store
                    .get(session_id)
                    .await?
                    .unwrap_or_else(|| Order::new(session_id.clone(), status));

                order.customer_email.clone_from(customer_email);
                order.amount_total = *amount_total;
                order.set_status(status);
                self.order_store.save(&order).await?;

                tracing::info!(
                    order = %order.reference,
                    session_id = %session_id,
                    status = ?status,
                    "Recorded order"
                );
            }

            WebhookEvent::CheckoutExpired { session_id } => {
                let mut order = self
                    .order_store
                    .get(session_id)
                    .await?
                    .unwrap_or_else(|| Order::new(session_id.clone(), OrderStatus::Expired));

                if order.status == OrderStatus::Paid {
                    tracing::warn!(session_id = %session_id, "Ignoring expiry of a paid order");
                    return Ok(());
                }

                order.set_status(OrderStatus::Expired);
                self.order_store.save(&order).await?;

                tracing::info!(session_id = %session_id, "Checkout session expired");
            }

            WebhookEvent::Other { event_type } => {
                tracing::debug!(event_type = %event_type, "Unhandled webhook event");
            }
        }

        Ok(())
    }
}

/// Parse Stripe event into our event type
fn parse_webhook_event(event: &Event) -> Result<WebhookEvent> {
    match event.type_ {
        EventType::CheckoutSessionCompleted => {
            let session = checkout_session(event)?;
            Ok(WebhookEvent::CheckoutCompleted {
                session_id: session.id.to_string(),
                customer_email: session.customer_email.clone().or_else(|| {
                    session
                        .customer_details
                        .as_ref()
                        .and_then(|details| details.email.clone())
                }),
                amount_total: session.amount_total,
                paid: session.payment_status != CheckoutSessionPaymentStatus::Unpaid,
            })
        }

        EventType::CheckoutSessionExpired => {
            let session = checkout_session(event)?;
            Ok(WebhookEvent::CheckoutExpired {
                session_id: session.id.to_string(),
            })
        }

        _ => Ok(WebhookEvent::Other {
            event_type: format!("{:?}", event.type_),
        }),
    }
}

fn checkout_session(event: &Event) -> Result<&CheckoutSession> {
    if let EventObject::CheckoutSession(session) = &event.data.object {
        Ok(session)
    } else {
        Err(PaymentError::WebhookParse("Invalid checkout session data".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orders::MemoryOrderStore;
    use hmac::{Hmac, Mac};
    use sha2::Sha256;

    const SECRET: &str = "whsec_test_secret";

    /// `Stripe-Signature` header for `payload`, timestamped now
    fn sign(payload: &str, secret: &str) -> String {
        let timestamp = chrono::Utc::now().timestamp();
        let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes()).unwrap();
        mac.update(format!("{timestamp}.{payload}").as_bytes());
        format!("t={timestamp},v1={}", hex::encode(mac.finalize().into_bytes()))
    }

    fn session_event(event_type: &str, session_id: &str, payment_status: &str) -> String {
        let now = chrono::Utc::now().timestamp();
        serde_json::json!({
            "id": "evt_test_webhook",
            "object": "event",
            "created": now,
            "livemode": false,
            "pending_webhooks": 1,
            "request": { "id": null, "idempotency_key": null },
            "type": event_type,
            "data": {
                "object": {
                    "id": session_id,
                    "object": "checkout.session",
                    "amount_subtotal": 25998,
                    "amount_total": 25998,
                    "automatic_tax": { "enabled": false, "liability": null, "status": null },
                    "cancel_url": "http://localhost:3000/shop?checkout=cancelled",
                    "created": now,
                    "currency": "usd",
                    "custom_fields": [],
                    "custom_text": {
                        "after_submit": null,
                        "shipping_address": null,
                        "submit": null,
                        "terms_of_service_acceptance": null
                    },
                    "customer_details": {
                        "email": "buyer@example.com",
                        "tax_exempt": "none",
                        "tax_ids": []
                    },
                    "expires_at": now + 86_400,
                    "livemode": false,
                    "metadata": {},
                    "mode": "payment",
                    "payment_method_types": ["card"],
                    "payment_status": payment_status,
                    "phone_number_collection": { "enabled": false },
                    "shipping_options": [],
                    "status": "complete",
                    "success_url": "http://localhost:3000/?checkout=success",
                    "total_details": {
                        "amount_discount": 0,
                        "amount_shipping": 0,
                        "amount_tax": 0
                    },
                    "url": null
                }
            }
        })
        .to_string()
    }

    fn handler() -> (WebhookHandler<MemoryOrderStore>, Arc<MemoryOrderStore>) {
        let store = Arc::new(MemoryOrderStore::new());
        (WebhookHandler::new(Arc::clone(&store)), store)
    }

    #[tokio::test]
    async fn test_completed_records_paid_order() {
        let (handler, store) = handler();

        handler
            .apply(&WebhookEvent::CheckoutCompleted {
                session_id: "cs_test_1".into(),
                customer_email: Some("buyer@example.com".into()),
                amount_total: Some(25998),
                paid: true,
            })
            .await
            .unwrap();

        let order = store.get("cs_test_1").await.unwrap().unwrap();
        assert_eq!(order.status, OrderStatus::Paid);
        assert_eq!(order.amount_total, Some(25998));
        assert_eq!(order.customer_email.as_deref(), Some("buyer@example.com"));
    }

    #[tokio::test]
    async fn test_expiry_does_not_downgrade_paid_order() {
        let (handler, store) = handler();
        handler
            .apply(&WebhookEvent::CheckoutCompleted {
                session_id: "cs_test_2".into(),
                customer_email: None,
                amount_total: Some(100),
                paid: true,
            })
            .await
            .unwrap();

        handler
            .apply(&WebhookEvent::CheckoutExpired {
                session_id: "cs_test_2".into(),
            })
            .await
            .unwrap();

        let order = store.get("cs_test_2").await.unwrap().unwrap();
        assert_eq!(order.status, OrderStatus::Paid);
    }

    #[tokio::test]
    async fn test_expired_session_recorded() {
        let (handler, store) = handler();
        handler
            .apply(&WebhookEvent::CheckoutExpired {
                session_id: "cs_test_3".into(),
            })
            .await
            .unwrap();

        let order = store.get("cs_test_3").await.unwrap().unwrap();
        assert_eq!(order.status, OrderStatus::Expired);
    }

    #[test]
    fn test_bad_signature_rejected() {
        let (handler, _) = handler();
        let result = handler.parse_event("{}", "t=1,v1=deadbeef", "whsec_test");
        assert!(matches!(result, Err(PaymentError::WebhookSignature(_))));
    }

    #[tokio::test]
    async fn test_signed_completed_event_records_paid_order() {
        let (handler, store) = handler();
        let payload = session_event("checkout.session.completed", "cs_test_signed", "paid");

        let event = handler.parse_event(&payload, &sign(&payload, SECRET), SECRET).unwrap();
        let parsed = handler.handle(event).await.unwrap();

        assert_eq!(
            parsed,
            WebhookEvent::CheckoutCompleted {
                session_id: "cs_test_signed".into(),
                customer_email: Some("buyer@example.com".into()),
                amount_total: Some(25998),
                paid: true,
            }
        );
        let order = store.get("cs_test_signed").await.unwrap().unwrap();
        assert_eq!(order.status, OrderStatus::Paid);
        assert_eq!(order.customer_email.as_deref(), Some("buyer@example.com"));
    }

    #[tokio::test]
    async fn test_signed_unpaid_completion_is_pending() {
        let (handler, store) = handler();
        let payload = session_event("checkout.session.completed", "cs_test_unpaid", "unpaid");

        let event = handler.parse_event(&payload, &sign(&payload, SECRET), SECRET).unwrap();
        handler.handle(event).await.unwrap();

        let order = store.get("cs_test_unpaid").await.unwrap().unwrap();
        assert_eq!(order.status, OrderStatus::Pending);
    }

    #[tokio::test]
    async fn test_signed_expired_event() {
        let (handler, store) = handler();
        let payload = session_event("checkout.session.expired", "cs_test_gone", "unpaid");

        let event = handler.parse_event(&payload, &sign(&payload, SECRET), SECRET).unwrap();
        let parsed = handler.handle(event).await.unwrap();

        assert_eq!(
            parsed,
            WebhookEvent::CheckoutExpired {
                session_id: "cs_test_gone".into()
            }
        );
        let order = store.get("cs_test_gone").await.unwrap().unwrap();
        assert_eq!(order.status, OrderStatus::Expired);
    }

    #[test]
    fn test_tampered_payload_rejected() {
        let (handler, _) = handler();
        let payload = session_event("checkout.session.completed", "cs_test_x", "paid");
        let signature = sign(&payload, SECRET);
        let tampered = payload.replace("25998", "1");

        let result = handler.parse_event(&tampered, &signature, SECRET);
        assert!(matches!(result, Err(PaymentError::WebhookSignature(_))));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let (handler, _) = handler();
        let payload = session_event("checkout.session.completed", "cs_test_y", "paid");

        let result = handler.parse_event(&payload, &sign(&payload, "whsec_other"), SECRET);
        assert!(matches!(result, Err(PaymentError::WebhookSignature(_))));
    }
}
