use leptos::prelude::*;

use storefront_core::NotificationVariant;

use crate::state::use_toasts;

#[component]
pub fn ToastViewport() -> impl IntoView {
    let toasts = use_toasts();

    view! {
        <div class="toast-viewport">
            <For
                each=move || toasts.items().get()
                key=|toast| toast.id
                children=move |toast| {
                    let id = toast.id;
                    let class = match toast.notification.variant {
                        NotificationVariant::Destructive => "toast toast-destructive",
                        NotificationVariant::Default => "toast",
                    };
                    view! {
                        <div class=class role="status">
                            <div class="toast-text">
                                <strong>{toast.notification.title}</strong>
                                <p>{toast.notification.description}</p>
                            </div>
                            <button
                                class="toast-close"
                                aria-label="Dismiss"
                                on:click=move |_| toasts.dismiss(id)
                            >
                                "×"
                            </button>
                        </div>
                    }
                }
            />
        </div>
    }
}
