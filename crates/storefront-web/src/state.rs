//! Shared UI State
//!
//! The cart store is shared through context; a signal mirrors its snapshot
//! so views re-render on every mutation.

use std::sync::Arc;
use std::time::Duration;

use leptos::prelude::*;

use storefront_core::{Cart, CartProduct, CartStore, Notification, Notifier};

/// How long a toast stays up without being dismissed
const TOAST_TIMEOUT: Duration = Duration::from_secs(5);

/// The cart store plus a reactive snapshot of it
#[derive(Clone)]
pub struct CartContext {
    store: Arc<CartStore>,
    cart: ReadSignal<Cart>,
}

impl CartContext {
    pub fn new() -> Self {
        let store = Arc::new(CartStore::new());
        let (cart, set_cart) = signal(store.snapshot());

        let subscription = store.subscribe(move |cart| set_cart.set(cart.clone()));
        let owned = store.clone();
        on_cleanup(move || owned.unsubscribe(subscription));

        Self { store, cart }
    }

    pub fn cart(&self) -> ReadSignal<Cart> {
        self.cart
    }

    pub fn add(&self, product: CartProduct) {
        self.store.add_to_cart(product);
    }

    pub fn remove(&self, id: &str) {
        self.store.remove_from_cart(id);
    }

    pub fn set_quantity(&self, id: &str, quantity: i64) {
        self.store.update_quantity(id, quantity);
    }
}

pub fn use_cart() -> CartContext {
    expect_context::<CartContext>()
}

#[derive(Clone, Debug)]
pub struct Toast {
    pub id: u64,
    pub notification: Notification,
}

/// Toast queue; implements [`Notifier`] for the checkout flow
#[derive(Clone, Copy)]
pub struct Toasts {
    items: RwSignal<Vec<Toast>>,
    next_id: StoredValue<u64>,
}

impl Toasts {
    pub fn new() -> Self {
        Self {
            items: RwSignal::new(Vec::new()),
            next_id: StoredValue::new(0),
        }
    }

    pub fn items(&self) -> RwSignal<Vec<Toast>> {
        self.items
    }

    pub fn dismiss(&self, id: u64) {
        self.items.update(|items| items.retain(|toast| toast.id != id));
    }
}

impl Notifier for Toasts {
    fn notify(&self, notification: Notification) {
        let id = self.next_id.get_value();
        self.next_id.set_value(id + 1);

        self.items.update(|items| items.push(Toast { id, notification }));

        let toasts = *self;
        set_timeout(move || toasts.dismiss(id), TOAST_TIMEOUT);
    }
}

pub fn use_toasts() -> Toasts {
    expect_context::<Toasts>()
}
