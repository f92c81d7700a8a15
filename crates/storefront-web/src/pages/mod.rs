//! Page Components

mod home;
mod shop;

pub use home::HomePage;
pub use shop::ShopPage;
