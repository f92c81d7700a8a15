//! storefront Web Frontend
//!
//! Leptos-based WASM frontend: catalog, featured showcase, cart panel and
//! the hosted checkout redirect.

mod api;
mod app;
mod components;
mod dom;
mod pages;
mod state;
mod stripe;

pub use app::App;

use wasm_bindgen::prelude::*;

/// WASM entry point
#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    tracing_wasm::set_as_global_default();
    leptos::mount::mount_to_body(App);
}
