//! Cart State
//!
//! `Cart` is the value: line items keyed by product id plus the derived total.
//! `CartStore` wraps it in an observable container that publishes a snapshot
//! to every subscriber after each mutation.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use rust_decimal::Decimal;
use serde::Serialize;

use crate::model::{CartItem, CartProduct};

/// Line items and their total.
///
/// Fields are private: the only ways to change a cart are [`Cart::add`],
/// [`Cart::remove`] and [`Cart::update_quantity`], and each of them recomputes
/// `total` before returning.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Cart {
    items: Vec<CartItem>,
    #[serde(with = "rust_decimal::serde::float")]
    total: Decimal,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub fn total(&self) -> Decimal {
        self.total
    }

    /// Number of distinct line items
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Sum of all quantities
    pub fn unit_count(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity)).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&CartItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Insert a new line item, or bump the quantity of an existing one
    pub fn add(&mut self, product: CartProduct) {
        let mut items = self.items.clone();
        if let Some(item) = items.iter_mut().find(|item| item.id == product.id) {
            item.quantity = item.quantity.saturating_add(1);
        } else {
            items.push(CartItem::from_product(product));
        }
        self.commit(items);
    }

    /// Drop a line item; unknown ids are ignored
    pub fn remove(&mut self, id: &str) {
        let mut items = self.items.clone();
        items.retain(|item| item.id != id);
        self.commit(items);
    }

    /// Set a line item's quantity, clamped at zero. Zero removes the item.
    pub fn update_quantity(&mut self, id: &str, quantity: i64) {
        let clamped = quantity.max(0);
        if clamped == 0 {
            self.remove(id);
            return;
        }

        let mut items = self.items.clone();
        if let Some(item) = items.iter_mut().find(|item| item.id == id) {
            item.quantity = u32::try_from(clamped).unwrap_or(u32::MAX);
        }
        self.commit(items);
    }

    /// Replace the items together with their total. A change whose total
    /// overflows is dropped and the cart keeps its previous state.
    fn commit(&mut self, items: Vec<CartItem>) {
        match total_of(&items) {
            Some(total) => {
                self.items = items;
                self.total = total;
            }
            None => tracing::warn!("Cart total out of range, change ignored"),
        }
    }
}

fn total_of(items: &[CartItem]) -> Option<Decimal> {
    items
        .iter()
        .try_fold(Decimal::ZERO, |acc, item| acc.checked_add(item.line_total()?))
}

/// Handle returned by [`CartStore::subscribe`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Subscriber = Arc<dyn Fn(&Cart) + Send + Sync>;

/// Observable cart container
///
/// Snapshots reach subscribers in mutation order, also when mutations come
/// from several threads or from inside a subscriber.
pub struct CartStore {
    cart: RwLock<Cart>,
    subscribers: RwLock<Vec<(SubscriptionId, Subscriber)>>,
    next_id: AtomicU64,
    /// Snapshots not yet delivered, queued under the cart lock
    pending: Mutex<VecDeque<Cart>>,
    /// Set while one caller drains `pending`
    delivering: AtomicBool,
}

impl Default for CartStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CartStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            cart: RwLock::new(Cart::new()),
            subscribers: RwLock::new(Vec::new()),
            next_id: AtomicU64::new(0),
            pending: Mutex::new(VecDeque::new()),
            delivering: AtomicBool::new(false),
        }
    }

    /// Immutable copy of the current cart
    pub fn snapshot(&self) -> Cart {
        self.cart
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn add_to_cart(&self, product: CartProduct) {
        tracing::debug!(product_id = %product.id, "Adding to cart");
        self.mutate(|cart| cart.add(product));
    }

    pub fn remove_from_cart(&self, id: &str) {
        tracing::debug!(product_id = %id, "Removing from cart");
        self.mutate(|cart| cart.remove(id));
    }

    pub fn update_quantity(&self, id: &str, quantity: i64) {
        tracing::debug!(product_id = %id, quantity, "Updating cart quantity");
        self.mutate(|cart| cart.update_quantity(id, quantity));
    }

    /// Register a reader. It is called with the new cart after every mutation.
    pub fn subscribe(&self, subscriber: impl Fn(&Cart) + Send + Sync + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.subscribers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push((id, Arc::new(subscriber)));
        id
    }

    /// Remove a reader; unknown ids are ignored
    pub fn unsubscribe(&self, id: SubscriptionId) {
        self.subscribers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .retain(|(sub_id, _)| *sub_id != id);
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    fn mutate(&self, op: impl FnOnce(&mut Cart)) {
        {
            let mut cart = self.cart.write().unwrap_or_else(PoisonError::into_inner);
            op(&mut cart);
            self.queue().push_back(cart.clone());
        }
        self.deliver();
    }

    fn queue(&self) -> std::sync::MutexGuard<'_, VecDeque<Cart>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Drain queued snapshots unless another caller is already draining.
    /// Subscribers run without any lock held so they may read or mutate the
    /// store.
    fn deliver(&self) {
        loop {
            if self
                .delivering
                .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
                .is_err()
            {
                return;
            }

            loop {
                let Some(snapshot) = self.queue().pop_front() else {
                    break;
                };
                let subscribers: Vec<Subscriber> = self
                    .subscribers
                    .read()
                    .unwrap_or_else(PoisonError::into_inner)
                    .iter()
                    .map(|(_, sub)| Arc::clone(sub))
                    .collect();

                for subscriber in subscribers {
                    subscriber(&snapshot);
                }
            }

            self.delivering.store(false, Ordering::SeqCst);

            // A snapshot queued after the last pop but before the flag was
            // cleared has no one else to deliver it.
            if self.queue().is_empty() {
                return;
            }
        }
    }
}
