//! REST client for the stock and products endpoints.
//!
//! Uses `reqwest` for HTTP with a per-request timeout.
//! Caches product metadata using `moka`; stock is never cached.

use std::sync::Arc;

use async_trait::async_trait;
use moka::future::Cache;
use reqwest::StatusCode;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use rocketshoes_core::ProductId;
use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};
use url::Url;

use super::{Product, Stock, StockError, StockService};
use crate::config::StockApiConfig;

/// Client for the stock/product REST API.
///
/// Cheap to clone; clones share the connection pool and product cache.
#[derive(Clone)]
pub struct StockClient {
    inner: Arc<StockClientInner>,
}

struct StockClientInner {
    client: reqwest::Client,
    base_url: Url,
    products: Cache<ProductId, Product>,
}

impl StockClient {
    /// Create a new stock API client.
    ///
    /// # Errors
    ///
    /// Returns error if the token is not a valid header value or the HTTP
    /// client fails to build.
    pub fn new(config: &StockApiConfig) -> Result<Self, StockError> {
        let mut headers = HeaderMap::new();

        if let Some(token) = &config.token {
            let mut value = HeaderValue::from_str(&format!("Bearer {}", token.expose_secret()))
                .map_err(|e| StockError::Parse(format!("Invalid API token format: {e}")))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.request_timeout)
            .build()?;

        let products = Cache::builder()
            .max_capacity(1000)
            .time_to_live(config.product_cache_ttl)
            .build();

        Ok(Self {
            inner: Arc::new(StockClientInner {
                client,
                base_url: config.base_url.clone(),
                products,
            }),
        })
    }

    /// GET a JSON resource relative to the base URL.
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        product_id: ProductId,
    ) -> Result<T, StockError> {
        let url = self.inner.base_url.join(path)?;

        let response = self.inner.client.get(url).send().await?;
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            return Err(StockError::NotFound(product_id));
        }

        // Get response body as text first for better error diagnostics
        let body = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %body.chars().take(500).collect::<String>(),
                "Stock API returned non-success status"
            );
            return Err(StockError::Api {
                status: status.as_u16(),
                message: body.chars().take(200).collect(),
            });
        }

        serde_json::from_str(&body).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %body.chars().take(500).collect::<String>(),
                "Failed to parse stock API response"
            );
            StockError::Parse(e.to_string())
        })
    }
}

#[async_trait]
impl StockService for StockClient {
    #[instrument(skip(self), fields(product_id = %product_id))]
    async fn stock(&self, product_id: ProductId) -> Result<Stock, StockError> {
        self.get_json(&format!("stock/{product_id}"), product_id)
            .await
    }

    #[instrument(skip(self), fields(product_id = %product_id))]
    async fn product(&self, product_id: ProductId) -> Result<Product, StockError> {
        if let Some(product) = self.inner.products.get(&product_id).await {
            debug!("Cache hit for product");
            return Ok(product);
        }

        let product: Product = self
            .get_json(&format!("products/{product_id}"), product_id)
            .await?;

        self.inner
            .products
            .insert(product_id, product.clone())
            .await;

        Ok(product)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use secrecy::SecretString;

    #[test]
    fn test_new_without_token() {
        let config = StockApiConfig::new("http://127.0.0.1:9").unwrap();
        assert!(StockClient::new(&config).is_ok());
    }

    #[test]
    fn test_new_rejects_invalid_token() {
        let mut config = StockApiConfig::new("http://127.0.0.1:9").unwrap();
        config.token = Some(SecretString::from("bad\ntoken"));
        let err = StockClient::new(&config).err().unwrap();
        assert!(matches!(err, StockError::Parse(_)));
    }

    #[tokio::test]
    async fn test_unreachable_host_is_http_error() {
        // Reserve a free port, then release it so nothing is listening
        let port = std::net::TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port();
        let config = StockApiConfig::new(&format!("http://127.0.0.1:{port}")).unwrap();
        let client = StockClient::new(&config).unwrap();
        let err = client.stock(ProductId::new(1)).await.unwrap_err();
        assert!(matches!(err, StockError::Http(_)));
    }
}
