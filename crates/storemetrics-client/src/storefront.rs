//! Instrumented client for the product backend.
//!
//! Backend contract: `GET /products/:id` returns a [`Product`];
//! `POST /products/:id/purchase` performs a purchase (body not relied on).
//! Metrics are reported through [`MonitoringClient`] and never affect the
//! result returned to the caller.

use std::sync::Arc;
use std::time::Instant;

use futures_util::future::try_join_all;
use serde::{Deserialize, Serialize};

use crate::error::{ClientError, Result};
use crate::monitoring::MonitoringClient;

const PRODUCTS_ENDPOINT: &str = "/products";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: u64,
    pub name: String,
    pub price: f64,
    pub stock: i64,
}

#[derive(Clone)]
pub struct StorefrontClient {
    http: reqwest::Client,
    base_url: Arc<str>,
    monitoring: MonitoringClient,
}

impl StorefrontClient {
    pub fn new(backend_url: impl Into<String>, monitoring: MonitoringClient) -> Self {
        let base_url: String = backend_url.into();
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').into(),
            monitoring,
        }
    }

    pub fn monitoring(&self) -> &MonitoringClient {
        &self.monitoring
    }

    async fn fetch_product(&self, id: u64) -> Result<Product> {
        let url = format!("{}/products/{id}", self.base_url);
        let res = self.http.get(&url).send().await?;
        if !res.status().is_success() {
            return Err(ClientError::Status {
                url,
                status: res.status(),
            });
        }
        Ok(res.json().await?)
    }

    /// Fetch all `ids` concurrently.
    ///
    /// Reports latency and result for `/products` and one availability gauge
    /// per product on success; a single error result otherwise.
    pub async fn load_products(&self, ids: &[u64]) -> Result<Vec<Product>> {
        let started = Instant::now();
        match try_join_all(ids.iter().map(|&id| self.fetch_product(id))).await {
            Ok(products) => {
                let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;
                self.monitoring.record_api_latency(PRODUCTS_ENDPOINT, elapsed_ms);
                self.monitoring.record_api_result(PRODUCTS_ENDPOINT, true);
                for p in &products {
                    self.monitoring.record_product_availability(p.id, p.stock > 0);
                }
                Ok(products)
            }
            Err(e) => {
                tracing::debug!(error = %e, "loading products failed");
                self.monitoring.record_api_result(PRODUCTS_ENDPOINT, false);
                Err(e)
            }
        }
    }

    /// Purchase one unit, then return the refreshed product.
    pub async fn purchase(&self, id: u64) -> Result<Product> {
        let endpoint = format!("/products/{id}/purchase");
        let url = format!("{}{}", self.base_url, endpoint);
        let started = Instant::now();

        let sent = self.http.post(&url).send().await;
        let outcome = match sent {
            Ok(res) if res.status().is_success() => Ok(()),
            Ok(res) => Err(ClientError::Status {
                url,
                status: res.status(),
            }),
            Err(e) => Err(ClientError::from(e)),
        };

        if let Err(e) = outcome {
            tracing::debug!(product_id = id, error = %e, "purchase failed");
            self.monitoring.record_purchase_attempt(id, false);
            return Err(e);
        }

        let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;
        self.monitoring.record_api_latency(&endpoint, elapsed_ms);
        self.monitoring.record_purchase_attempt(id, true);

        self.fetch_product(id).await
    }
}
