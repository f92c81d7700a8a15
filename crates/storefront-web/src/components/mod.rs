//! UI Components

mod cart_panel;
mod product_card;
mod toasts;

pub use cart_panel::CartPanel;
pub use product_card::ProductCard;
pub use toasts::ToastViewport;
