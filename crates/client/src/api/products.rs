//! Product endpoints with catalog caching.
//!
//! Product detail and list reads are cached for 5 minutes (catalog data
//! changes rarely and is read on every page). Typeahead search always hits
//! the backend: its queries are too varied to cache and its results must
//! be fresh.

use reqwest::Method;
use tracing::{debug, instrument};

use clementine_core::{ProductId, ProductSummary};

use super::{ApiClient, ApiError, NoBody};

/// Cached catalog responses.
#[derive(Debug, Clone)]
pub(crate) enum CatalogCacheValue {
    Product(Box<ProductSummary>),
    Products(Vec<ProductSummary>),
}

impl ApiClient {
    /// Get a product by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the product is not found or the request fails.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn get_product(&self, product_id: &ProductId) -> Result<ProductSummary, ApiError> {
        let cache_key = format!("product:{product_id}");

        if let Some(CatalogCacheValue::Product(product)) =
            self.catalog_cache().get(&cache_key).await
        {
            debug!("Cache hit for product");
            return Ok(*product);
        }

        let product: ProductSummary = self
            .execute(
                Method::GET,
                &format!("/products/{product_id}"),
                None::<&NoBody>,
            )
            .await?;

        self.catalog_cache()
            .insert(
                cache_key,
                CatalogCacheValue::Product(Box::new(product.clone())),
            )
            .await;

        Ok(product)
    }

    /// Get the product list.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn list_products(&self, limit: Option<u32>) -> Result<Vec<ProductSummary>, ApiError> {
        let cache_key = format!("products:{}", limit.unwrap_or(0));

        if let Some(CatalogCacheValue::Products(products)) =
            self.catalog_cache().get(&cache_key).await
        {
            debug!("Cache hit for products");
            return Ok(products);
        }

        let path = limit.map_or_else(
            || "/products".to_owned(),
            |limit| format!("/products?limit={limit}"),
        );

        let products: Vec<ProductSummary> =
            self.execute(Method::GET, &path, None::<&NoBody>).await?;

        self.catalog_cache()
            .insert(cache_key, CatalogCacheValue::Products(products.clone()))
            .await;

        Ok(products)
    }

    /// Typeahead product search. Never cached.
    ///
    /// Cancellation: dropping the returned future aborts the underlying
    /// request, which is how the debounced search discards superseded
    /// keystrokes.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self), fields(query = %query))]
    pub async fn search_products(
        &self,
        query: &str,
        limit: u32,
    ) -> Result<Vec<ProductSummary>, ApiError> {
        let path = format!(
            "/products/search?query={}&limit={limit}",
            urlencoding::encode(query)
        );
        self.execute(Method::GET, &path, None::<&NoBody>).await
    }

    /// Invalidate a cached product.
    pub async fn invalidate_product(&self, product_id: &ProductId) {
        let cache_key = format!("product:{product_id}");
        self.catalog_cache().invalidate(&cache_key).await;
    }

    /// Invalidate all cached catalog data.
    pub async fn invalidate_catalog(&self) {
        self.catalog_cache().invalidate_all();
        self.catalog_cache().run_pending_tasks().await;
    }
}
