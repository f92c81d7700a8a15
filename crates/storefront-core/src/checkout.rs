//! Checkout
//!
//! Turns the cart into a hosted-checkout redirect:
//!
//! 1. obtain a payment provider handle
//! 2. serialize cart items to `{name, price, quantity, image}`
//! 3. ask the backend function for a checkout session
//! 4. redirect to the hosted page for that session
//!
//! One best-effort attempt per click. The cart is never modified here.

use std::cell::Cell;
use std::rc::Rc;

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{Result, ShopError};
use crate::model::CartItem;

/// A cart item as sent to the create-checkout-session function
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub quantity: u32,
    pub image: String,
}

impl From<&CartItem> for LineItem {
    fn from(item: &CartItem) -> Self {
        Self {
            name: item.name.clone(),
            price: item.price,
            quantity: item.quantity,
            image: item.image.clone(),
        }
    }
}

/// Request body of the create-checkout-session function
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateSessionRequest {
    pub items: Vec<LineItem>,
}

impl CreateSessionRequest {
    pub fn from_cart_items(items: &[CartItem]) -> Self {
        Self {
            items: items.iter().map(LineItem::from).collect(),
        }
    }
}

/// Response body of the create-checkout-session function
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateSessionResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
}

impl CreateSessionResponse {
    pub fn with_session(session_id: impl Into<String>) -> Self {
        Self {
            session_id: Some(session_id.into()),
        }
    }
}

/// Server-side "create checkout session" function
#[async_trait(?Send)]
pub trait SessionBackend {
    /// `Err` carries the remote error's message
    async fn create_checkout_session(
        &self,
        request: &CreateSessionRequest,
    ) -> std::result::Result<CreateSessionResponse, String>;
}

/// Client handle of the payment provider
#[async_trait(?Send)]
pub trait PaymentHandle {
    /// Navigate to the hosted checkout page. Only returns on failure in a
    /// real browser; `Err` carries the provider's error message.
    async fn redirect_to_checkout(&self, session_id: &str) -> std::result::Result<(), String>;
}

/// Loads the payment provider's client library
#[async_trait(?Send)]
pub trait PaymentProvider {
    /// `None` when the client could not be initialized
    async fn load(&self) -> Option<Rc<dyn PaymentHandle>>;
}

/// The checkout initiator
pub struct Checkout<P, B> {
    provider: P,
    backend: B,
}

impl<P: PaymentProvider, B: SessionBackend> Checkout<P, B> {
    pub fn new(provider: P, backend: B) -> Self {
        Self { provider, backend }
    }

    /// Run one checkout attempt for `items`
    pub async fn run(&self, items: &[CartItem]) -> Result<()> {
        let handle = self
            .provider
            .load()
            .await
            .ok_or_else(|| ShopError::PaymentInit("Stripe failed to initialize.".into()))?;

        let request = CreateSessionRequest::from_cart_items(items);
        tracing::info!(items = request.items.len(), "Sending items to checkout");

        let response = self
            .backend
            .create_checkout_session(&request)
            .await
            .map_err(ShopError::SessionCreation)?;

        let session_id = response
            .session_id
            .filter(|id| !id.is_empty())
            .ok_or_else(|| {
                ShopError::SessionCreation("No session ID received from the server".into())
            })?;

        tracing::info!(session_id = %session_id, "Received session ID");

        handle
            .redirect_to_checkout(&session_id)
            .await
            .map_err(ShopError::Redirect)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationVariant {
    Default,
    Destructive,
}

/// A transient, dismissible message for the user
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub title: String,
    pub description: String,
    pub variant: NotificationVariant,
}

impl Notification {
    pub fn checkout_error(err: &ShopError) -> Self {
        Self {
            title: "Checkout Error".into(),
            description: err.user_message(),
            variant: NotificationVariant::Destructive,
        }
    }
}

/// Where notifications are shown
pub trait Notifier {
    fn notify(&self, notification: Notification);
}

/// Result of a checkout button press
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Redirect was issued
    Redirected,
    /// Failed and the user was notified
    Failed,
    /// Another checkout was already in flight
    Ignored,
}

/// Drives the checkout button: one attempt at a time, failures become
/// notifications.
pub struct CheckoutController<P, B> {
    checkout: Checkout<P, B>,
    processing: Cell<bool>,
}

struct ProcessingGuard<'a>(&'a Cell<bool>);

impl Drop for ProcessingGuard<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

impl<P: PaymentProvider, B: SessionBackend> CheckoutController<P, B> {
    pub fn new(checkout: Checkout<P, B>) -> Self {
        Self {
            checkout,
            processing: Cell::new(false),
        }
    }

    /// True while a checkout attempt is in flight
    pub fn is_processing(&self) -> bool {
        self.processing.get()
    }

    /// Run a checkout for a snapshot of the cart items
    pub async fn submit(&self, items: &[CartItem], notifier: &dyn Notifier) -> SubmitOutcome {
        if self.processing.replace(true) {
            tracing::debug!("Checkout already in progress");
            return SubmitOutcome::Ignored;
        }
        let _busy = ProcessingGuard(&self.processing);

        match self.checkout.run(items).await {
            Ok(()) => SubmitOutcome::Redirected,
            Err(e) => {
                tracing::error!(error = %e, "Error in checkout");
                notifier.notify(Notification::checkout_error(&e));
                SubmitOutcome::Failed
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::Cart;
    use crate::model::CartProduct;
    use rust_decimal_macros::dec;
    use std::cell::RefCell;

    struct FakeHandle {
        redirect_error: Option<String>,
        redirected_to: RefCell<Vec<String>>,
    }

    #[async_trait(?Send)]
    impl PaymentHandle for FakeHandle {
        async fn redirect_to_checkout(&self, session_id: &str) -> std::result::Result<(), String> {
            self.redirected_to.borrow_mut().push(session_id.to_string());
            match &self.redirect_error {
                Some(msg) => Err(msg.clone()),
                None => Ok(()),
            }
        }
    }

    struct FakeProvider {
        handle: Option<Rc<FakeHandle>>,
    }

    impl FakeProvider {
        fn working() -> Self {
            Self::with_redirect_error(None)
        }

        fn with_redirect_error(redirect_error: Option<&str>) -> Self {
            Self {
                handle: Some(Rc::new(FakeHandle {
                    redirect_error: redirect_error.map(String::from),
                    redirected_to: RefCell::new(Vec::new()),
                })),
            }
        }

        fn redirects(&self) -> Vec<String> {
            self.handle
                .as_ref()
                .map(|h| h.redirected_to.borrow().clone())
                .unwrap_or_default()
        }
    }

    #[async_trait(?Send)]
    impl PaymentProvider for FakeProvider {
        async fn load(&self) -> Option<Rc<dyn PaymentHandle>> {
            self.handle.clone().map(|h| h as Rc<dyn PaymentHandle>)
        }
    }

    struct FakeBackend {
        reply: std::result::Result<CreateSessionResponse, String>,
        requests: RefCell<Vec<CreateSessionRequest>>,
        yield_first: bool,
    }

    impl FakeBackend {
        fn replying(reply: std::result::Result<CreateSessionResponse, String>) -> Self {
            Self {
                reply,
                requests: RefCell::new(Vec::new()),
                yield_first: false,
            }
        }
    }

    #[async_trait(?Send)]
    impl SessionBackend for FakeBackend {
        async fn create_checkout_session(
            &self,
            request: &CreateSessionRequest,
        ) -> std::result::Result<CreateSessionResponse, String> {
            self.requests.borrow_mut().push(request.clone());
            if self.yield_first {
                tokio::task::yield_now().await;
            }
            self.reply.clone()
        }
    }

    #[derive(Default)]
    struct RecordingNotifier {
        seen: RefCell<Vec<Notification>>,
    }

    impl Notifier for RecordingNotifier {
        fn notify(&self, notification: Notification) {
            self.seen.borrow_mut().push(notification);
        }
    }

    fn blanket_cart() -> Cart {
        let mut cart = Cart::new();
        cart.add(CartProduct {
            id: "2".into(),
            name: "Winter Blanket".into(),
            price: dec!(129.99),
            image: "https://example.com/blanket.jpg".into(),
        });
        cart
    }

    #[test]
    fn test_line_items_drop_id() {
        let cart = blanket_cart();
        let request = CreateSessionRequest::from_cart_items(cart.items());
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "items": [{
                    "name": "Winter Blanket",
                    "price": 129.99,
                    "quantity": 1,
                    "image": "https://example.com/blanket.jpg"
                }]
            })
        );
    }

    #[tokio::test]
    async fn test_successful_checkout_redirects() {
        let provider = FakeProvider::working();
        let backend = FakeBackend::replying(Ok(CreateSessionResponse::with_session("cs_test_1")));
        let checkout = Checkout::new(provider, backend);

        let cart = blanket_cart();
        checkout.run(cart.items()).await.unwrap();

        assert_eq!(checkout.provider.redirects(), vec!["cs_test_1".to_string()]);
        assert_eq!(checkout.backend.requests.borrow()[0].items[0].quantity, 1);
    }

    #[tokio::test]
    async fn test_provider_unavailable() {
        let provider = FakeProvider { handle: None };
        let backend = FakeBackend::replying(Ok(CreateSessionResponse::with_session("cs_test_1")));
        let checkout = Checkout::new(provider, backend);

        let err = checkout.run(&[]).await.unwrap_err();
        assert!(matches!(err, ShopError::PaymentInit(_)));
        assert!(checkout.backend.requests.borrow().is_empty());
    }

    #[tokio::test]
    async fn test_empty_cart_without_session_id() {
        let cart = Cart::new();
        let checkout = Checkout::new(
            FakeProvider::working(),
            FakeBackend::replying(Ok(CreateSessionResponse::default())),
        );

        let err = checkout.run(cart.items()).await.unwrap_err();

        assert!(matches!(err, ShopError::SessionCreation(_)));
        assert_eq!(err.message(), "No session ID received from the server");
        assert_eq!(checkout.backend.requests.borrow()[0], CreateSessionRequest::default());
        assert!(cart.is_empty());
        assert!(checkout.provider.redirects().is_empty());
    }

    #[tokio::test]
    async fn test_redirect_error() {
        let checkout = Checkout::new(
            FakeProvider::with_redirect_error(Some("Session expired")),
            FakeBackend::replying(Ok(CreateSessionResponse::with_session("cs_test_2"))),
        );

        let err = checkout.run(blanket_cart().items()).await.unwrap_err();
        assert!(matches!(err, ShopError::Redirect(ref msg) if msg == "Session expired"));
    }

    #[tokio::test]
    async fn test_network_error_notifies_and_releases_busy_flag() {
        let controller = CheckoutController::new(Checkout::new(
            FakeProvider::working(),
            FakeBackend::replying(Err("Failed to fetch".into())),
        ));
        let notifier = RecordingNotifier::default();
        let cart = blanket_cart();

        let outcome = controller.submit(cart.items(), &notifier).await;

        assert_eq!(outcome, SubmitOutcome::Failed);
        assert!(!controller.is_processing());
        let seen = notifier.seen.borrow();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].title, "Checkout Error");
        assert_eq!(seen[0].description, "Failed to fetch");
        assert_eq!(seen[0].variant, NotificationVariant::Destructive);
        assert_eq!(cart.item_count(), 1);
    }

    #[tokio::test]
    async fn test_empty_error_message_uses_fallback() {
        let controller = CheckoutController::new(Checkout::new(
            FakeProvider::working(),
            FakeBackend::replying(Err(String::new())),
        ));
        let notifier = RecordingNotifier::default();

        controller.submit(&[], &notifier).await;

        assert_eq!(
            notifier.seen.borrow()[0].description,
            "Something went wrong during checkout."
        );
    }

    #[tokio::test]
    async fn test_success_does_not_notify() {
        let controller = CheckoutController::new(Checkout::new(
            FakeProvider::working(),
            FakeBackend::replying(Ok(CreateSessionResponse::with_session("cs_test_3"))),
        ));
        let notifier = RecordingNotifier::default();

        let outcome = controller.submit(blanket_cart().items(), &notifier).await;

        assert_eq!(outcome, SubmitOutcome::Redirected);
        assert!(notifier.seen.borrow().is_empty());
        assert!(!controller.is_processing());
    }

    #[tokio::test]
    async fn test_second_submit_while_processing_is_ignored() {
        let mut backend =
            FakeBackend::replying(Ok(CreateSessionResponse::with_session("cs_test_4")));
        backend.yield_first = true;
        let controller = CheckoutController::new(Checkout::new(FakeProvider::working(), backend));
        let notifier = RecordingNotifier::default();
        let cart = blanket_cart();

        let (first, second) = tokio::join!(
            controller.submit(cart.items(), &notifier),
            controller.submit(cart.items(), &notifier),
        );

        assert_eq!(first, SubmitOutcome::Redirected);
        assert_eq!(second, SubmitOutcome::Ignored);
        assert_eq!(controller.checkout.backend.requests.borrow().len(), 1);
        assert!(!controller.is_processing());
    }
}
