//! HTTP product store.

use async_trait::async_trait;
use catalog_core::catalog::{Category, Flavor, Product, Weight};
use catalog_core::search::{FilterCriteria, ProductPage};
use catalog_core::Price;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use std::time::Instant;
use tracing::{debug, warn};
use url::Url;

use crate::endpoint::Endpoint;
use crate::error::StoreError;
use crate::retry::{BackoffStrategy, RetryPolicy};
use crate::store::ProductStore;
use crate::timeout::TimeoutConfig;
use crate::wire::{
    ApiResponse, CategoriesData, FlavorsData, MaxPriceData, ProductDetailData, ProductListData,
    WeightsData,
};

/// Transport policy combining timeout and retry configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportPolicy {
    pub timeout: TimeoutConfig,
    pub retry: RetryPolicy,
}

impl TransportPolicy {
    pub fn new(timeout: TimeoutConfig, retry: RetryPolicy) -> Self {
        Self { timeout, retry }
    }

    /// Create from an endpoint's defaults.
    pub fn from_endpoint(endpoint: Endpoint) -> Self {
        Self {
            timeout: TimeoutConfig::from_total(endpoint.default_timeout()),
            retry: RetryPolicy::new(endpoint.default_max_retries()),
        }
    }
}

/// Product store reached over the public HTTP API.
///
/// Retries and timeouts are applied here, per endpoint. Callers see either
/// a payload or a single [`StoreError`].
#[derive(Debug, Clone)]
pub struct HttpProductStore {
    client: reqwest::Client,
    base_url: Url,
    timeout: Option<TimeoutConfig>,
    max_retries: Option<u32>,
    backoff: BackoffStrategy,
}

impl HttpProductStore {
    /// Create a store for the API rooted at `base_url`, using endpoint
    /// default timeouts and retries.
    pub fn new(base_url: &str) -> Result<Self, StoreError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| StoreError::Request(format!("invalid base URL {}: {}", base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(StoreError::Request(format!(
                "base URL cannot carry a path: {}",
                base_url
            )));
        }
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| StoreError::Request(e.to_string()))?;

        Ok(Self {
            client,
            base_url,
            timeout: None,
            max_retries: None,
            backoff: BackoffStrategy::default(),
        })
    }

    /// Apply one timeout configuration to every endpoint.
    pub fn with_timeout(mut self, timeout: TimeoutConfig) -> Result<Self, StoreError> {
        self.client = reqwest::Client::builder()
            .connect_timeout(timeout.connect)
            .timeout(timeout.total)
            .build()
            .map_err(|e| StoreError::Request(e.to_string()))?;
        self.timeout = Some(timeout);
        Ok(self)
    }

    /// Apply one retry budget to every endpoint.
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = Some(max_retries);
        self
    }

    /// Set backoff strategy.
    pub fn with_backoff(mut self, backoff: BackoffStrategy) -> Self {
        self.backoff = backoff;
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Effective policy for an endpoint.
    pub fn policy_for(&self, endpoint: Endpoint) -> TransportPolicy {
        let defaults = TransportPolicy::from_endpoint(endpoint);
        let timeout = self.timeout.unwrap_or(defaults.timeout);
        let retry = RetryPolicy::new(self.max_retries.unwrap_or(defaults.retry.max_attempts))
            .with_backoff(self.backoff.clone());
        TransportPolicy::new(timeout, retry)
    }

    /// Absolute URL of an endpoint. The slug is percent-encoded as a path
    /// segment.
    pub fn endpoint_url(&self, endpoint: Endpoint, slug: Option<&str>) -> Result<Url, StoreError> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url.path_segments_mut().map_err(|_| {
                StoreError::Request(format!("base URL cannot carry a path: {}", self.base_url))
            })?;
            segments.pop_if_empty();
            for part in endpoint.path(None).split('/').filter(|s| !s.is_empty()) {
                segments.push(part);
            }
            if let Some(slug) = slug {
                segments.push(slug);
            }
        }
        Ok(url)
    }

    /// List URL with the criteria as query parameters.
    pub fn list_url(&self, criteria: &FilterCriteria) -> Result<Url, StoreError> {
        let mut url = self.endpoint_url(Endpoint::ListProducts, None)?;
        url.query_pairs_mut().extend_pairs(criteria.to_store_params());
        Ok(url)
    }

    async fn get<T: DeserializeOwned>(&self, endpoint: Endpoint, url: Url) -> Result<T, StoreError> {
        let policy = self.policy_for(endpoint);
        let mut attempt = 0;

        loop {
            let started = Instant::now();
            match self.send_once::<T>(&url, &policy).await {
                Ok(data) => {
                    debug!(
                        endpoint = %endpoint,
                        attempt,
                        elapsed_ms = started.elapsed().as_millis() as u64,
                        "store request succeeded"
                    );
                    return Ok(data);
                }
                Err(e) if policy.retry.should_retry(&e, attempt) => {
                    let delay = policy.retry.backoff.delay_for_attempt(attempt);
                    warn!(
                        endpoint = %endpoint,
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "store request failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => {
                    debug!(endpoint = %endpoint, attempt, error = %e, "store request failed");
                    return Err(e);
                }
            }
        }
    }

    async fn send_once<T: DeserializeOwned>(
        &self,
        url: &Url,
        policy: &TransportPolicy,
    ) -> Result<T, StoreError> {
        let response = self
            .client
            .get(url.clone())
            .timeout(policy.timeout.total)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(StoreError::NotFound(url.to_string()));
        }
        if !status.is_success() {
            return Err(StoreError::Http {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let bytes = response.bytes().await?;
        let envelope: ApiResponse<T> = serde_json::from_slice(&bytes)?;
        Ok(envelope.data)
    }
}

#[async_trait]
impl ProductStore for HttpProductStore {
    async fn list_products(&self, criteria: &FilterCriteria) -> Result<ProductPage, StoreError> {
        let url = self.list_url(criteria)?;
        let data: ProductListData = self.get(Endpoint::ListProducts, url).await?;
        Ok(data.into())
    }

    async fn product_detail(&self, slug: &str) -> Result<Product, StoreError> {
        let url = self.endpoint_url(Endpoint::ProductDetail, Some(slug))?;
        let data: ProductDetailData = self.get(Endpoint::ProductDetail, url).await?;
        Ok(data.product)
    }

    async fn list_categories(&self) -> Result<Vec<Category>, StoreError> {
        let url = self.endpoint_url(Endpoint::Categories, None)?;
        let data: CategoriesData = self.get(Endpoint::Categories, url).await?;
        Ok(data.categories)
    }

    async fn list_flavors(&self) -> Result<Vec<Flavor>, StoreError> {
        let url = self.endpoint_url(Endpoint::Flavors, None)?;
        let data: FlavorsData = self.get(Endpoint::Flavors, url).await?;
        Ok(data.flavors)
    }

    async fn list_weights(&self) -> Result<Vec<Weight>, StoreError> {
        let url = self.endpoint_url(Endpoint::Weights, None)?;
        let data: WeightsData = self.get(Endpoint::Weights, url).await?;
        Ok(data.weights)
    }

    async fn max_price(&self) -> Result<Option<Price>, StoreError> {
        let url = self.endpoint_url(Endpoint::MaxPrice, None)?;
        let data: MaxPriceData = self.get(Endpoint::MaxPrice, url).await?;
        Ok(data.max_price)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_endpoint_urls_keep_base_path() {
        let store = HttpProductStore::new("https://shop.example.com/api/").unwrap();
        assert_eq!(
            store.endpoint_url(Endpoint::Flavors, None).unwrap().as_str(),
            "https://shop.example.com/api/public/flavors"
        );
        assert_eq!(
            store
                .endpoint_url(Endpoint::ProductDetail, Some("whey blend/1kg"))
                .unwrap()
                .as_str(),
            "https://shop.example.com/api/public/products/whey%20blend%2F1kg"
        );
    }

    #[test]
    fn test_list_url_carries_criteria() {
        let store = HttpProductStore::new("https://shop.example.com/api").unwrap();
        let criteria = FilterCriteria::new().with_search("gold whey").with_flavor("f1");
        let url = store.list_url(&criteria).unwrap();
        assert_eq!(url.path(), "/api/public/products");

        let query = url.query().unwrap();
        assert!(query.starts_with("page=1&limit=20&sort=createdAt&order=desc"));
        assert!(query.contains("search=gold+whey"));
        assert!(query.contains("flavor=f1"));
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(matches!(
            HttpProductStore::new("not a url"),
            Err(StoreError::Request(_))
        ));
        assert!(HttpProductStore::new("mailto:shop@example.com").is_err());
    }

    #[test]
    fn test_policy_overrides() {
        let store = HttpProductStore::new("https://shop.example.com").unwrap();
        assert_eq!(
            store.policy_for(Endpoint::ProductDetail).retry.max_attempts,
            0
        );

        let store = store
            .with_timeout(TimeoutConfig::from_millis(500, 4000))
            .unwrap()
            .with_max_retries(3);
        let policy = store.policy_for(Endpoint::ProductDetail);
        assert_eq!(policy.retry.max_attempts, 3);
        assert_eq!(policy.timeout.total, Duration::from_millis(4000));
    }
}
