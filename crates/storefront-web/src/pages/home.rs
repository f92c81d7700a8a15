//! Home Page

use leptos::prelude::*;

use storefront_core::featured_products;

use crate::components::ProductCard;

#[component]
pub fn HomePage() -> impl IntoView {
    view! {
        <div class="home">
            <header class="hero">
                <h1>"Cozy Goods"</h1>
                <p class="tagline">"Warm things for cold evenings"</p>
                <div class="cta">
                    <a href="/shop" class="btn btn-primary">"Shop the Collection"</a>
                </div>
            </header>

            <section class="featured">
                <h2>"Featured Collection"</h2>
                <div class="product-grid">
                    {featured_products()
                        .into_iter()
                        .map(|product| view! { <ProductCard product=product /> })
                        .collect_view()}
                </div>
            </section>
        </div>
    }
}
