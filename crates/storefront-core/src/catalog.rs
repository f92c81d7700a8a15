//! Product Catalog
//!
//! One fetch-all call against the product collection. Failures degrade to an
//! empty list after being logged; there is no retry and no pagination.

use async_trait::async_trait;
use rust_decimal_macros::dec;

use crate::error::Result;
use crate::model::Product;

/// Read boundary for the product collection (Strategy pattern)
///
/// The browser implements this over HTTP.
#[async_trait(?Send)]
pub trait ProductSource {
    /// Fetch every row of the product collection
    async fn fetch_all(&self) -> Result<Vec<Product>>;
}

/// Load the catalog once. Errors are logged and yield an empty list.
pub async fn load_catalog<S: ProductSource + ?Sized>(source: &S) -> Vec<Product> {
    match source.fetch_all().await {
        Ok(products) => {
            tracing::info!(count = products.len(), "Loaded product catalog");
            products
        }
        Err(e) => {
            tracing::error!(error = %e, "Error fetching products");
            Vec::new()
        }
    }
}

/// The featured collection shown on the home page
pub fn featured_products() -> Vec<Product> {
    vec![Product {
        id: "2".into(),
        name: "Winter Blanket".into(),
        description: "Handmade with soft merino wool".into(),
        price: dec!(129.99),
        images: vec!["https://images.unsplash.com/photo-1582562124811-c09040d0a901".into()],
        stock_quantity: 0,
    }]
}

/// Parse a product collection from its JSON form
pub fn parse_products(json: &str) -> Result<Vec<Product>> {
    Ok(serde_json::from_str(json)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ShopError;

    struct FixedSource(Vec<Product>);

    #[async_trait(?Send)]
    impl ProductSource for FixedSource {
        async fn fetch_all(&self) -> Result<Vec<Product>> {
            Ok(self.0.clone())
        }
    }

    struct FailingSource;

    #[async_trait(?Send)]
    impl ProductSource for FailingSource {
        async fn fetch_all(&self) -> Result<Vec<Product>> {
            Err(ShopError::Fetch("connection refused".into()))
        }
    }

    #[tokio::test]
    async fn test_load_catalog_returns_rows() {
        let source = FixedSource(featured_products());
        let products = load_catalog(&source).await;
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].name, "Winter Blanket");
    }

    #[tokio::test]
    async fn test_load_catalog_failure_is_empty() {
        let products = load_catalog(&FailingSource).await;
        assert!(products.is_empty());
    }

    #[test]
    fn test_parse_products() {
        let json = r#"[{"id":"1","name":"Scarf","description":"Wool","price":45,"images":["https://example.com/s.jpg"],"stock_quantity":12}]"#;
        let products = parse_products(json).unwrap();
        assert_eq!(products[0].stock_quantity, 12);
        assert_eq!(products[0].price, dec!(45));
    }

    #[test]
    fn test_parse_products_rejects_garbage() {
        let err = parse_products("{not json").unwrap_err();
        assert!(matches!(err, ShopError::Json(_)));
    }
}
