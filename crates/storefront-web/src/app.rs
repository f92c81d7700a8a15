//! Main App Component

use leptos::prelude::*;
use leptos_router::{components::*, path};

use crate::components::{CartPanel, ToastViewport};
use crate::pages::{HomePage, ShopPage};
use crate::state::{CartContext, Toasts};

/// Root application component
#[component]
pub fn App() -> impl IntoView {
    provide_context(CartContext::new());
    provide_context(Toasts::new());

    view! {
        <Router>
            <nav class="navbar">
                <a href="/" class="brand">"Cozy Goods"</a>
                <div class="nav-links">
                    <a href="/shop">"Shop"</a>
                    <CartPanel />
                </div>
            </nav>
            <main class="app">
                <Routes fallback=|| view! { <p>"Page not found"</p> }>
                    <Route path=path!("/") view=HomePage />
                    <Route path=path!("/shop") view=ShopPage />
                </Routes>
            </main>
            <ToastViewport />
        </Router>
    }
}
