//! API Client

use async_trait::async_trait;

use storefront_core::{
    CreateSessionRequest, CreateSessionResponse, Product, ProductSource, Result, SessionBackend,
    ShopError,
};

/// Origin of the page, which is also where the server lives
fn origin() -> String {
    web_sys::window()
        .and_then(|w| w.location().origin().ok())
        .unwrap_or_else(|| "http://localhost:3000".into())
}

/// Product collection over `GET /api/products`
pub struct HttpProductSource {
    client: reqwest::Client,
    base_url: String,
}

impl HttpProductSource {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: origin(),
        }
    }
}

#[async_trait(?Send)]
impl ProductSource for HttpProductSource {
    async fn fetch_all(&self) -> Result<Vec<Product>> {
        let response = self
            .client
            .get(format!("{}/api/products", self.base_url))
            .send()
            .await
            .map_err(|e| ShopError::Fetch(e.to_string()))?;

        if !response.status().is_success() {
            return Err(ShopError::Fetch(format!("HTTP {}", response.status())));
        }

        response
            .json::<Vec<Product>>()
            .await
            .map_err(|e| ShopError::Fetch(e.to_string()))
    }
}

/// The create-checkout-session function over HTTP
pub struct HttpSessionBackend {
    client: reqwest::Client,
    base_url: String,
}

impl HttpSessionBackend {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: origin(),
        }
    }
}

#[async_trait(?Send)]
impl SessionBackend for HttpSessionBackend {
    async fn create_checkout_session(
        &self,
        request: &CreateSessionRequest,
    ) -> std::result::Result<CreateSessionResponse, String> {
        let response = self
            .client
            .post(format!("{}/functions/v1/create-checkout-session", self.base_url))
            .json(request)
            .send()
            .await
            .map_err(|e| e.to_string())?;

        if response.status().is_success() {
            response.json().await.map_err(|e| e.to_string())
        } else {
            let data: serde_json::Value = response.json().await.unwrap_or_default();
            Err(data["error"].as_str().unwrap_or("Request failed").to_string())
        }
    }
}
