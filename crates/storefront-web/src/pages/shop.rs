//! Catalog Page

use leptos::prelude::*;
use leptos::task::spawn_local;

use storefront_core::{Product, load_catalog};

use crate::api::HttpProductSource;
use crate::components::ProductCard;

#[component]
pub fn ShopPage() -> impl IntoView {
    let (products, set_products) = signal(Vec::<Product>::new());

    // One fetch per mount; failures are logged and leave the list empty
    spawn_local(async move {
        let loaded = load_catalog(&HttpProductSource::new()).await;
        set_products.set(loaded);
    });

    view! {
        <div class="shop">
            <h1>"Our Collection"</h1>
            <div class="product-grid">
                <For
                    each=move || products.get()
                    key=|product| product.id.clone()
                    children=|product| view! { <ProductCard product=product /> }
                />
            </div>
        </div>
    }
}
