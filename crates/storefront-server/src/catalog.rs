//! Product Collection
//!
//! The managed product table stand-in: a JSON file read once at startup.

use std::path::Path;

use anyhow::Context;
use storefront_core::{Product, featured_products, parse_products};

/// Read the product collection from `path`, or fall back to the featured set
pub async fn load_products(path: Option<&Path>) -> anyhow::Result<Vec<Product>> {
    let Some(path) = path else {
        tracing::info!("PRODUCTS_FILE not set, serving the featured collection");
        return Ok(featured_products());
    };

    let json = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("reading products from {}", path.display()))?;

    let products = parse_products(&json)
        .with_context(|| format!("parsing products from {}", path.display()))?;

    tracing::info!(count = products.len(), path = %path.display(), "Loaded products");
    Ok(products)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_default_is_featured() {
        let products = load_products(None).await.unwrap();
        assert_eq!(products, featured_products());
    }

    #[tokio::test]
    async fn test_loads_file() {
        let path = std::env::temp_dir()
            .join(format!("storefront-products-{}.json", std::process::id()));
        tokio::fs::write(
            &path,
            r#"[{"id":"9","name":"Tea Towel","description":"Linen","price":18.5,"images":[],"stock_quantity":40}]"#,
        )
        .await
        .unwrap();

        let products = load_products(Some(&path)).await.unwrap();
        tokio::fs::remove_file(&path).await.unwrap();

        assert_eq!(products.len(), 1);
        assert_eq!(products[0].name, "Tea Towel");
    }

    #[tokio::test]
    async fn test_missing_file_is_error() {
        let result = load_products(Some(Path::new("/nonexistent/products.json"))).await;
        assert!(result.is_err());
    }
}
