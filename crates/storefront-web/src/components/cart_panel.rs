use std::rc::Rc;

use leptos::html;
use leptos::prelude::*;
use leptos::task::spawn_local;

use storefront_core::{
    CartItem, CartPanel as PanelMachine, Checkout, CheckoutController, PanelEvent, PanelState,
    format_price,
};

use crate::api::HttpSessionBackend;
use crate::dom::DomEffects;
use crate::state::{use_cart, use_toasts};
use crate::stripe::StripeJsProvider;

type StoreCheckout = CheckoutController<StripeJsProvider, HttpSessionBackend>;

/// Cart toggle with its slide-over panel
#[component]
pub fn CartPanel() -> impl IntoView {
    let cart = use_cart();
    let toasts = use_toasts();

    let state = RwSignal::new(PanelState::Closed);
    let panel_ref = NodeRef::<html::Div>::new();
    let toggle_ref = NodeRef::<html::Button>::new();

    let machine = StoredValue::new_local(PanelMachine::new(DomEffects::new(
        state, panel_ref, toggle_ref,
    )));
    Effect::new(move |_| {
        let next = state.get();
        machine.update_value(|panel| panel.sync(next));
    });
    on_cleanup(move || {
        machine.try_update_value(|panel| panel.teardown());
    });

    let send = move |event: PanelEvent| state.update(|s| *s = s.next(event));

    let checkout = StoredValue::new_local(Rc::new(StoreCheckout::new(Checkout::new(
        StripeJsProvider::from_build_env(),
        HttpSessionBackend::new(),
    ))));
    let processing = RwSignal::new(false);

    let items = cart.cart();
    let on_checkout = move |_| {
        let Some(controller) = checkout.try_get_value() else {
            return;
        };
        if controller.is_processing() {
            return;
        }
        let snapshot = items.get_untracked().items().to_vec();
        processing.set(true);
        spawn_local(async move {
            controller.submit(&snapshot, &toasts).await;
            processing.set(false);
        });
    };

    let badge = move || {
        let count = items.with(|cart| cart.item_count());
        (count > 0).then(|| view! { <span class="badge">{count}</span> })
    };

    view! {
        <button
            node_ref=toggle_ref
            class="cart-toggle"
            aria-label="Cart"
            on:click=move |_| send(PanelEvent::Toggle)
        >
            "🛒"
            {badge}
        </button>

        <Show when=move || state.get().is_open()>
            <div class="cart-backdrop" on:click=move |_| send(PanelEvent::Backdrop)></div>
        </Show>

        <div
            node_ref=panel_ref
            class="cart-panel"
            class:open=move || state.get().is_open()
        >
            <div class="cart-header">
                <h2>"Your Cart"</h2>
                <button
                    class="cart-close"
                    aria-label="Close cart"
                    on:click=move |_| send(PanelEvent::CloseButton)
                >
                    "×"
                </button>
            </div>

            <Show
                when=move || !items.with(|cart| cart.is_empty())
                fallback=|| view! { <p class="cart-empty">"Your cart is empty"</p> }
            >
                <ul class="cart-items">
                    <For
                        each=move || items.get().items().to_vec()
                        key=|item| (item.id.clone(), item.quantity)
                        children=move |item| view! { <CartRow item=item /> }
                    />
                </ul>
                <div class="cart-footer">
                    <div class="cart-total">
                        <span>"Total"</span>
                        <span>{move || format_price(items.with(|cart| cart.total()))}</span>
                    </div>
                    <button
                        class="btn btn-primary checkout"
                        disabled=move || processing.get()
                        on:click=on_checkout
                    >
                        {move || if processing.get() { "Processing..." } else { "Checkout" }}
                    </button>
                </div>
            </Show>
        </div>
    }
}

#[component]
fn CartRow(item: CartItem) -> impl IntoView {
    let cart = use_cart();
    let quantity = i64::from(item.quantity);

    let dec = {
        let (cart, id) = (cart.clone(), item.id.clone());
        move |_| cart.set_quantity(&id, quantity - 1)
    };
    let inc = {
        let (cart, id) = (cart.clone(), item.id.clone());
        move |_| cart.set_quantity(&id, quantity + 1)
    };
    let remove = {
        let id = item.id.clone();
        move |_| cart.remove(&id)
    };

    view! {
        <li class="cart-row">
            <img src=item.image.clone() alt=item.name.clone() />
            <div class="cart-row-body">
                <span class="name">{item.name.clone()}</span>
                <span class="price">{format_price(item.price)}</span>
                <div class="stepper">
                    <button aria-label="Decrease quantity" on:click=dec>"−"</button>
                    <span class="quantity">{item.quantity}</span>
                    <button aria-label="Increase quantity" on:click=inc>"+"</button>
                </div>
            </div>
            <button class="cart-remove" aria-label="Remove item" on:click=remove>"Remove"</button>
        </li>
    }
}
