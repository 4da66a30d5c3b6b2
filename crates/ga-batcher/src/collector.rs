// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! HTTP transport delivering encoded payloads to the collection endpoint.

use crate::errors::TransportError;
use async_trait::async_trait;
use std::env;
use std::time::Duration;
use tracing::debug;

/// Default measurement-protocol collection endpoint.
pub const DEFAULT_COLLECTOR_URL: &str = "https://www.google-analytics.com";

const BATCH_PATH: &str = "/batch";

/// Timeout for multi-hit batch deliveries.
const BATCH_TIMEOUT: Duration = Duration::from_secs(15);
/// Timeout for single-hit deliveries.
const SINGLE_HIT_TIMEOUT: Duration = Duration::from_secs(5);

/// One encoded batch ready for delivery.
#[derive(Clone, Debug, PartialEq)]
pub struct BatchPayload {
    /// Newline-joined hit records.
    pub body: String,
    /// Number of hit records in `body`.
    pub hits: usize,
}

/// Delivery seam between the batching engine and the network.
///
/// Implementations must not panic; the engine treats every error as a
/// dropped batch and keeps running.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, payload: BatchPayload) -> Result<(), TransportError>;
}

/// Collector endpoint settings.
#[derive(Clone, Debug, PartialEq)]
pub struct CollectorConfig {
    /// Base URL of the collection endpoint, without the batch path.
    pub base_url: String,
    /// HTTPS proxy to tunnel deliveries through.
    pub https_proxy: Option<String>,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        CollectorConfig {
            base_url: DEFAULT_COLLECTOR_URL.to_string(),
            https_proxy: None,
        }
    }
}

impl CollectorConfig {
    /// Default endpoint with the proxy taken from `GA_PROXY_HTTPS`, falling
    /// back to `HTTPS_PROXY`.
    pub fn from_env() -> Self {
        CollectorConfig {
            base_url: DEFAULT_COLLECTOR_URL.to_string(),
            https_proxy: env::var("GA_PROXY_HTTPS")
                .or_else(|_| env::var("HTTPS_PROXY"))
                .ok(),
        }
    }
}

/// `reqwest`-backed [`Transport`] posting batch bodies to the collector.
#[derive(Clone, Debug)]
pub struct CollectorClient {
    client: reqwest::Client,
    batch_url: String,
}

impl CollectorClient {
    pub fn new(config: &CollectorConfig) -> Result<Self, TransportError> {
        let mut builder = reqwest::Client::builder().timeout(BATCH_TIMEOUT);
        if let Some(proxy_url) = &config.https_proxy {
            let proxy = reqwest::Proxy::https(proxy_url)
                .map_err(|e| TransportError::Client(e.to_string()))?;
            builder = builder.proxy(proxy);
        }
        let client = builder
            .build()
            .map_err(|e| TransportError::Client(e.to_string()))?;

        Ok(CollectorClient {
            client,
            batch_url: format!("{}{}", config.base_url.trim_end_matches('/'), BATCH_PATH),
        })
    }
}

#[async_trait]
impl Transport for CollectorClient {
    async fn send(&self, payload: BatchPayload) -> Result<(), TransportError> {
        // Batches get the longer window; a lone hit should fail fast.
        let timeout = if payload.hits > 1 {
            BATCH_TIMEOUT
        } else {
            SINGLE_HIT_TIMEOUT
        };

        let response = self
            .client
            .post(&self.batch_url)
            .header("Content-Type", "text/plain")
            .timeout(timeout)
            .body(payload.body)
            .send()
            .await
            .map_err(|e| TransportError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status(status.as_u16()));
        }
        debug!("Delivered batch of {} hits", payload.hits);
        Ok(())
    }
}
