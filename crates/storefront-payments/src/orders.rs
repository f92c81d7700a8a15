//! Order Records
//!
//! One order per completed or expired checkout session, keyed by the Stripe
//! session id.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::error::Result;

/// Human-facing order reference (formatted: ORD-XXXX-XXXX)
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OrderRef(String);

impl OrderRef {
    /// Generate a new order reference
    pub fn generate() -> Self {
        let hex = uuid::Uuid::new_v4().simple().to_string().to_uppercase();
        Self(format!("ORD-{}-{}", &hex[0..4], &hex[4..8]))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for OrderRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// Session completed and paid
    Paid,
    /// Session completed, payment still pending (delayed methods)
    Pending,
    /// Session expired without payment
    Expired,
}

/// An order record
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Order {
    pub reference: OrderRef,

    /// Stripe checkout session id
    pub session_id: String,

    pub customer_email: Option<String>,

    /// Total in cents as reported by Stripe
    pub amount_total: Option<i64>,

    pub status: OrderStatus,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    pub fn new(session_id: impl Into<String>, status: OrderStatus) -> Self {
        let now = Utc::now();
        Self {
            reference: OrderRef::generate(),
            session_id: session_id.into(),
            customer_email: None,
            amount_total: None,
            status,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn set_status(&mut self, status: OrderStatus) {
        self.status = status;
        self.updated_at = Utc::now();
    }
}

/// Order storage trait
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Save or update an order
    async fn save(&self, order: &Order) -> Result<()>;

    /// Get order by checkout session id
    async fn get(&self, session_id: &str) -> Result<Option<Order>>;
}

/// In-memory order store (for development)
#[derive(Default)]
pub struct MemoryOrderStore {
    orders: RwLock<HashMap<String, Order>>,
}

impl MemoryOrderStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl OrderStore for MemoryOrderStore {
    async fn save(&self, order: &Order) -> Result<()> {
        self.orders
            .write()
            .await
            .insert(order.session_id.clone(), order.clone());
        Ok(())
    }

    async fn get(&self, session_id: &str) -> Result<Option<Order>> {
        Ok(self.orders.read().await.get(session_id).cloned())
    }
}
