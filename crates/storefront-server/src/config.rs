//! Server Configuration

use std::path::PathBuf;

/// Settings read from the environment (after `.env` is loaded)
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServerConfig {
    /// `BIND_ADDR`, default `0.0.0.0:3000`
    pub bind_addr: String,

    /// `STATIC_DIR`, where the built WASM frontend lives
    pub static_dir: PathBuf,

    /// `PRODUCTS_FILE`, JSON array of products; featured collection if unset
    pub products_file: Option<PathBuf>,

    /// `PUBLIC_URL`, origin used for Stripe success/cancel redirects
    pub public_url: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:3000".into(),
            static_dir: PathBuf::from("static"),
            products_file: None,
            public_url: "http://localhost:3000".into(),
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key/value source; blank values count as unset
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let defaults = Self::default();

        Self {
            bind_addr: get("BIND_ADDR").unwrap_or(defaults.bind_addr),
            static_dir: get("STATIC_DIR").map_or(defaults.static_dir, PathBuf::from),
            products_file: get("PRODUCTS_FILE").map(PathBuf::from),
            public_url: get("PUBLIC_URL").unwrap_or(defaults.public_url),
        }
    }
}
