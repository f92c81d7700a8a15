//! Stripe.js Binding
//!
//! `index.html` loads `https://js.stripe.com/v3/`; this module calls the
//! global `Stripe(publishableKey)` constructor and `redirectToCheckout`.

use std::cell::OnceCell;
use std::rc::Rc;

use async_trait::async_trait;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;

use storefront_core::{PaymentHandle, PaymentProvider};

/// Publishable key baked in at build time
const PUBLISHABLE_KEY: &str = match option_env!("STRIPE_PUBLISHABLE_KEY") {
    Some(key) => key,
    None => "",
};

/// `window.Stripe`, present once the Stripe.js script has loaded
fn stripe_constructor() -> Result<js_sys::Function, JsValue> {
    js_sys::Reflect::get(&js_sys::global(), &"Stripe".into())?
        .dyn_into::<js_sys::Function>()
        .map_err(|_| JsValue::from_str("Stripe.js is not loaded"))
}

fn init_stripe(publishable_key: &str) -> Result<JsValue, JsValue> {
    stripe_constructor()?.call1(&JsValue::NULL, &publishable_key.into())
}

/// Best-effort text of a thrown JS value
fn js_message(value: &JsValue) -> String {
    value
        .dyn_ref::<js_sys::Error>()
        .map(|e| String::from(e.message()))
        .or_else(|| value.as_string())
        .unwrap_or_default()
}

/// An initialized `Stripe(publishableKey)` object
struct StripeHandle(JsValue);

#[async_trait(?Send)]
impl PaymentHandle for StripeHandle {
    async fn redirect_to_checkout(&self, session_id: &str) -> Result<(), String> {
        let options = js_sys::Object::new();
        js_sys::Reflect::set(&options, &"sessionId".into(), &session_id.into())
            .map_err(|e| js_message(&e))?;

        let redirect = js_sys::Reflect::get(&self.0, &"redirectToCheckout".into())
            .and_then(|f| f.dyn_into::<js_sys::Function>().map_err(JsValue::from))
            .map_err(|e| js_message(&e))?;
        let promise = redirect
            .call1(&self.0, &options)
            .and_then(|p| p.dyn_into::<js_sys::Promise>().map_err(JsValue::from))
            .map_err(|e| js_message(&e))?;

        let result = JsFuture::from(promise).await.map_err(|e| js_message(&e))?;

        // Resolves only on failure, with `{ error: { message } }`
        let error = js_sys::Reflect::get(&result, &"error".into()).unwrap_or(JsValue::UNDEFINED);
        if error.is_undefined() || error.is_null() {
            return Ok(());
        }

        Err(js_sys::Reflect::get(&error, &"message".into())
            .ok()
            .and_then(|m| m.as_string())
            .unwrap_or_default())
    }
}

/// Lazily initialized Stripe.js client, created once per page
pub struct StripeJsProvider {
    publishable_key: String,
    handle: OnceCell<Option<Rc<StripeHandle>>>,
}

impl StripeJsProvider {
    pub fn new(publishable_key: impl Into<String>) -> Self {
        Self {
            publishable_key: publishable_key.into(),
            handle: OnceCell::new(),
        }
    }

    /// Use the key from `STRIPE_PUBLISHABLE_KEY` at build time
    pub fn from_build_env() -> Self {
        Self::new(PUBLISHABLE_KEY)
    }

    fn init(&self) -> Option<Rc<StripeHandle>> {
        if self.publishable_key.is_empty() {
            tracing::error!("STRIPE_PUBLISHABLE_KEY was not set at build time");
            return None;
        }

        match init_stripe(&self.publishable_key) {
            Ok(stripe) => Some(Rc::new(StripeHandle(stripe))),
            Err(e) => {
                tracing::error!(error = %js_message(&e), "Stripe.js failed to load");
                None
            }
        }
    }
}

#[async_trait(?Send)]
impl PaymentProvider for StripeJsProvider {
    async fn load(&self) -> Option<Rc<dyn PaymentHandle>> {
        let handle = self.handle.get_or_init(|| self.init()).clone()?;
        Some(handle)
    }
}
