// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use crate::attribution::Attribution;
use crate::request::RequestContext;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// Asynchronous callback resolving the session (client) id for a request.
pub type SessionIdProducer =
    Arc<dyn Fn(RequestContext) -> Pin<Box<dyn Future<Output = String> + Send>> + Send + Sync>;

/// Asynchronous callback resolving campaign attribution for a request.
/// Returning `None` means the request carries no attribution.
pub type AttributionProducer = Arc<
    dyn Fn(RequestContext) -> Pin<Box<dyn Future<Output = Option<Attribution>> + Send>>
        + Send
        + Sync,
>;

/// Synchronous per-request opt-out. Returning `false` skips tracking.
pub type TrackFilter = Arc<dyn Fn(&RequestContext) -> bool + Send + Sync>;

/// Wraps an async closure as a [`SessionIdProducer`].
pub fn session_id_producer<F, Fut>(produce: F) -> SessionIdProducer
where
    F: Fn(RequestContext) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = String> + Send + 'static,
{
    Arc::new(move |request| Box::pin(produce(request)))
}

/// Wraps an async closure as an [`AttributionProducer`].
pub fn attribution_producer<F, Fut>(produce: F) -> AttributionProducer
where
    F: Fn(RequestContext) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Option<Attribution>> + Send + 'static,
{
    Arc::new(move |request| Box::pin(produce(request)))
}

/// Wraps a predicate as a [`TrackFilter`].
pub fn track_filter<F>(filter: F) -> TrackFilter
where
    F: Fn(&RequestContext) -> bool + Send + Sync + 'static,
{
    Arc::new(filter)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn session_id_producer_passes_the_request_through() {
        let producer = session_id_producer(|request| async move {
            format!("session-for-{}", request.path)
        });
        let session_id = producer(RequestContext::new("/home")).await;
        assert_eq!(session_id, "session-for-/home");
    }

    #[tokio::test]
    async fn attribution_producer_can_return_none() {
        let producer = attribution_producer(|_request| async move { None });
        assert_eq!(producer(RequestContext::new("/home")).await, None);
    }

    #[test]
    fn track_filter_sees_the_request() {
        let filter = track_filter(|request: &RequestContext| request.path != "/health");
        assert!(filter(&RequestContext::new("/home")));
        assert!(!filter(&RequestContext::new("/health")));
    }
}
