use leptos::prelude::*;

use storefront_core::{Product, format_price};

use crate::state::use_cart;

/// One product with its display image and an "Add to Cart" button
#[component]
pub fn ProductCard(product: Product) -> impl IntoView {
    let cart = use_cart();
    let image = product.primary_image().unwrap_or_default().to_string();
    let price = format_price(product.price);
    let name = product.name.clone();
    let description = product.description.clone();

    let on_add = move |_| cart.add(product.to_cart_product());

    view! {
        <div class="product-card">
            <img class="product-image" src=image alt=name.clone() />
            <div class="product-body">
                <h3>{name}</h3>
                <p class="description">{description}</p>
                <div class="product-footer">
                    <span class="price">{price}</span>
                    <button class="btn btn-primary" on:click=on_add>"Add to Cart"</button>
                </div>
            </div>
        </div>
    }
}
