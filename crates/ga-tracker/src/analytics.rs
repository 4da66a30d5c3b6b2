// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Tracker facade tying producers, property fan-out, and the delivery
//! engine together.
//!
//! [`Analytics`] owns one engine task for its whole lifetime. Requests get
//! a scoped [`GaTracker`] view whose builders assemble hits and hand them
//! to the engine; nothing here waits for the network.

use crate::error::TrackerError;
use crate::events::{append_ecommerce_fields, append_event_fields, EcommerceAction, Event, Product};
use crate::outcome::{OutcomeAction, ResponseOutcome};
use crate::producers::{AttributionProducer, SessionIdProducer, TrackFilter};
use crate::request::RequestContext;
use crate::settings::{HitType, PropertySettings, TrackerOptions};
use ga_batcher::{BatcherHandle, BatcherService, CollectorClient, FieldValue, Hit, Transport};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Analytics forwarder for one service.
///
/// Built once at startup, shared across requests, and shut down when the
/// service stops. Construction spawns the delivery engine and therefore
/// needs a running Tokio runtime. Dropping the facade without calling
/// [`Analytics::shutdown`] closes the engine, which still drains the
/// buffer on its own task; nothing awaits that drain, so it races runtime
/// teardown. Only `shutdown` guarantees the final flush has finished.
pub struct Analytics {
    properties: Vec<PropertySettings>,
    session_id_producer: SessionIdProducer,
    attribution_producer: Option<AttributionProducer>,
    track_filter: Option<TrackFilter>,
    batcher: BatcherHandle,
    service_task: JoinHandle<()>,
}

impl Analytics {
    /// Validates the options, builds the collector client, and spawns the
    /// delivery engine.
    pub fn new(options: TrackerOptions) -> Result<Self, TrackerError> {
        options.validate()?;
        let client = CollectorClient::new(&options.collector)?;
        Ok(Self::spawn(options, Arc::new(client)))
    }

    /// Same as [`Analytics::new`] with a caller-supplied transport, the
    /// seam tests and embedders use to intercept deliveries.
    pub fn with_transport(
        options: TrackerOptions,
        transport: Arc<dyn Transport>,
    ) -> Result<Self, TrackerError> {
        options.validate()?;
        Ok(Self::spawn(options, transport))
    }

    fn spawn(options: TrackerOptions, transport: Arc<dyn Transport>) -> Self {
        let TrackerOptions {
            properties,
            session_id_producer,
            attribution_producer,
            track_filter,
            batch,
            ..
        } = options;

        let (service, batcher) = BatcherService::new(batch, transport);
        let service_task = tokio::spawn(service.run());
        debug!("Analytics started with {} properties", properties.len());

        Analytics {
            properties,
            session_id_producer,
            attribution_producer,
            track_filter,
            batcher,
            service_task,
        }
    }

    /// Returns the request-scoped tracking view for `request`.
    pub fn ga(&self, request: RequestContext) -> GaTracker<'_> {
        GaTracker {
            analytics: self,
            request,
        }
    }

    /// Maps a served response onto hits: a successful rendered view becomes
    /// a page view and a server error becomes an exception event. Requests
    /// failing the track filter are skipped before any producer runs.
    pub async fn track_response(
        &self,
        request: &RequestContext,
        outcome: &ResponseOutcome,
    ) -> Result<(), TrackerError> {
        if !self.should_track(request) {
            debug!("Request to {} opted out of tracking", request.path);
            return Ok(());
        }
        match outcome.action() {
            OutcomeAction::PageView => self.ga(request.clone()).page_view().await,
            OutcomeAction::Exception {
                route_path,
                status_code,
            } => {
                let event = Event {
                    category: "Exception".to_string(),
                    action: route_path,
                    label: Some(status_code.to_string()),
                    value: None,
                };
                self.ga(request.clone()).event(event).await
            }
            OutcomeAction::Ignore => Ok(()),
        }
    }

    /// Forces delivery of everything buffered right now, resolving after
    /// the delivery attempts finish.
    pub async fn flush(&self) {
        if self.batcher.flush().await.is_err() {
            warn!("Flush ignored, the delivery engine is stopped");
        }
    }

    /// Drains the buffer, stops the engine, and waits for the final flush
    /// to complete. Hits submitted afterwards are dropped.
    pub async fn shutdown(self) {
        self.batcher.shutdown();
        if self.service_task.await.is_err() {
            warn!("Delivery engine task ended abnormally during shutdown");
        } else {
            info!("All buffered hits sent to the measurement protocol collector");
        }
    }

    fn should_track(&self, request: &RequestContext) -> bool {
        match &self.track_filter {
            Some(filter) => filter(request),
            None => true,
        }
    }

    /// Builds one hit per subscribing property and submits them all. The
    /// producers only run when at least one property will receive the hit.
    async fn track(&self, request: &RequestContext, kind: HitKind) -> Result<(), TrackerError> {
        let hit_type = kind.hit_type();
        let receivers: Vec<&PropertySettings> = self
            .properties
            .iter()
            .filter(|property| property.accepts(hit_type))
            .collect();
        if receivers.is_empty() {
            debug!("No properties subscribe to {:?} hits", hit_type);
            return Ok(());
        }

        let session_id = (self.session_id_producer)(request.clone()).await;
        let attribution = match &self.attribution_producer {
            Some(producer) => producer(request.clone()).await,
            None => None,
        };
        if let Some(attribution) = &attribution {
            if !attribution.is_complete() {
                warn!("Attribution should contain campaign and one of source or id");
            }
        }

        for property in receivers {
            let mut hit = base_hit(property, &session_id, request);
            if let Some(attribution) = &attribution {
                attribution.append_to(&mut hit);
            }
            hit.push_field("t", kind.wire_type());
            match &kind {
                HitKind::PageView { additional } => {
                    for (key, value) in additional {
                        hit.push_field(key.clone(), value.clone());
                    }
                }
                HitKind::Event(event) => append_event_fields(&mut hit, event),
                HitKind::Ecommerce { action, products } => {
                    append_ecommerce_fields(&mut hit, action, products);
                }
            }
            if self.batcher.submit(hit).is_err() {
                warn!(
                    "Hit for property {} dropped, the delivery engine is stopped",
                    property.id
                );
            }
        }
        Ok(())
    }
}

fn base_hit(property: &PropertySettings, session_id: &str, request: &RequestContext) -> Hit {
    Hit::new()
        .field("v", 1)
        .field("tid", property.id.clone())
        .field("cid", session_id)
        .field("aip", 1)
        .field("ds", "web")
        .field("dh", request.host.clone())
        .field("dr", request.referrer.clone())
        .field("ua", request.user_agent.clone())
        .field("dp", request.path.clone())
}

enum HitKind {
    PageView {
        additional: Vec<(String, FieldValue)>,
    },
    Event(Event),
    Ecommerce {
        action: EcommerceAction,
        products: Vec<Product>,
    },
}

impl HitKind {
    fn hit_type(&self) -> HitType {
        match self {
            HitKind::PageView { .. } => HitType::PageView,
            HitKind::Event(_) => HitType::Event,
            HitKind::Ecommerce { .. } => HitType::Ecommerce,
        }
    }

    /// Wire value of the `t` field. E-commerce hits ride on the event hit
    /// type with their product fields attached.
    fn wire_type(&self) -> &'static str {
        match self {
            HitKind::PageView { .. } => "page_view",
            HitKind::Event(_) | HitKind::Ecommerce { .. } => "event",
        }
    }
}

/// Request-scoped tracking view handed out by [`Analytics::ga`].
pub struct GaTracker<'a> {
    analytics: &'a Analytics,
    request: RequestContext,
}

impl GaTracker<'_> {
    /// Tracks a page view for this request.
    pub async fn page_view(&self) -> Result<(), TrackerError> {
        self.page_view_with_data(Vec::new()).await
    }

    /// Tracks a page view with caller-supplied fields appended after the
    /// standard ones.
    pub async fn page_view_with_data(
        &self,
        additional: Vec<(String, FieldValue)>,
    ) -> Result<(), TrackerError> {
        self.analytics
            .track(&self.request, HitKind::PageView { additional })
            .await
    }

    /// Tracks a custom event. Events without a category or an action are
    /// rejected before anything is buffered.
    pub async fn event(&self, event: Event) -> Result<(), TrackerError> {
        event.validate()?;
        self.analytics
            .track(&self.request, HitKind::Event(event))
            .await
    }

    /// Returns the e-commerce action builder for this request.
    pub fn ecommerce(&self) -> Ecommerce<'_> {
        Ecommerce { tracker: self }
    }
}

/// E-commerce action builder mirroring the shop funnel.
pub struct Ecommerce<'a> {
    tracker: &'a GaTracker<'a>,
}

impl Ecommerce<'_> {
    /// Tracks a product detail view.
    pub async fn detail(&self, products: &[Product]) -> Result<(), TrackerError> {
        self.send(EcommerceAction::Detail, products).await
    }

    /// Tracks products being added to the cart.
    pub async fn add(&self, products: &[Product]) -> Result<(), TrackerError> {
        self.send(EcommerceAction::Add, products).await
    }

    /// Tracks products being removed from the cart.
    pub async fn remove(&self, products: &[Product]) -> Result<(), TrackerError> {
        self.send(EcommerceAction::Remove, products).await
    }

    /// Tracks a checkout step, optionally with an option such as the
    /// payment method.
    pub async fn checkout(
        &self,
        products: &[Product],
        step: u32,
        option: Option<&str>,
    ) -> Result<(), TrackerError> {
        let action = EcommerceAction::Checkout {
            step,
            option: option.map(str::to_string),
        };
        self.send(action, products).await
    }

    /// Tracks a completed transaction.
    pub async fn purchase(
        &self,
        products: &[Product],
        transaction_id: &str,
        affiliation: Option<&str>,
    ) -> Result<(), TrackerError> {
        let action = EcommerceAction::Purchase {
            transaction_id: transaction_id.to_string(),
            affiliation: affiliation.map(str::to_string),
        };
        self.send(action, products).await
    }

    /// Tracks a refund of a transaction.
    pub async fn refund(
        &self,
        products: &[Product],
        transaction_id: &str,
    ) -> Result<(), TrackerError> {
        let action = EcommerceAction::Refund {
            transaction_id: transaction_id.to_string(),
        };
        self.send(action, products).await
    }

    async fn send(&self, action: EcommerceAction, products: &[Product]) -> Result<(), TrackerError> {
        self.tracker
            .analytics
            .track(
                &self.tracker.request,
                HitKind::Ecommerce {
                    action,
                    products: products.to_vec(),
                },
            )
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attribution::Attribution;
    use crate::producers::{attribution_producer, session_id_producer};
    use ga_batcher::{BatchConfig, BatchPayload, TransportError};
    use std::sync::Mutex;
    use std::time::Duration;
    use tokio::time::{sleep, timeout};
    use tracing_test::traced_test;

    #[derive(Clone, Default)]
    struct RecordingTransport {
        payloads: Arc<Mutex<Vec<BatchPayload>>>,
    }

    impl RecordingTransport {
        fn payloads(&self) -> Vec<BatchPayload> {
            self.payloads.lock().expect("lock poisoned").clone()
        }
    }

    #[async_trait::async_trait]
    impl Transport for RecordingTransport {
        async fn send(&self, payload: BatchPayload) -> Result<(), TransportError> {
            self.payloads.lock().expect("lock poisoned").push(payload);
            Ok(())
        }
    }

    fn page_view_options(attribution: Option<Attribution>) -> TrackerOptions {
        let mut options = TrackerOptions::new(
            vec![PropertySettings::new("UA-XXXXXX", vec![HitType::PageView])],
            session_id_producer(|_request| async move { "test-session".to_string() }),
        );
        options.batch = BatchConfig::new(1, Duration::from_secs(60));
        options.attribution_producer = Some(attribution_producer(move |_request| {
            let attribution = attribution.clone();
            async move { attribution }
        }));
        options
    }

    #[tokio::test]
    #[traced_test]
    async fn incomplete_attribution_warns_but_still_delivers() {
        let campaign_only = Attribution {
            campaign: Some("attribution_campaign".to_string()),
            ..Attribution::default()
        };
        let transport = RecordingTransport::default();
        let analytics = Analytics::with_transport(
            page_view_options(Some(campaign_only)),
            Arc::new(transport.clone()),
        )
        .expect("tracker builds");

        analytics
            .ga(RequestContext::new("/campaign"))
            .page_view()
            .await
            .expect("page view");
        analytics.flush().await;

        assert!(logs_contain(
            "Attribution should contain campaign and one of source or id"
        ));
        let payloads = transport.payloads();
        assert_eq!(payloads.len(), 1);
        assert!(payloads[0].body.contains("cn=attribution_campaign"));

        analytics.shutdown().await;
    }

    #[tokio::test]
    #[traced_test]
    async fn complete_attribution_stays_quiet() {
        let complete = Attribution {
            campaign: Some("attribution_campaign".to_string()),
            source: Some("attribution_source".to_string()),
            ..Attribution::default()
        };
        let transport = RecordingTransport::default();
        let analytics = Analytics::with_transport(
            page_view_options(Some(complete)),
            Arc::new(transport.clone()),
        )
        .expect("tracker builds");

        analytics
            .ga(RequestContext::new("/campaign"))
            .page_view()
            .await
            .expect("page view");
        analytics.flush().await;

        assert!(!logs_contain("Attribution should contain"));
        assert_eq!(transport.payloads().len(), 1);

        analytics.shutdown().await;
    }

    #[tokio::test]
    async fn dropping_the_facade_still_drains_in_the_background() {
        let transport = RecordingTransport::default();
        let mut options = page_view_options(None);
        options.batch = BatchConfig::new(20, Duration::from_secs(60));
        let analytics = Analytics::with_transport(options, Arc::new(transport.clone()))
            .expect("tracker builds");

        analytics
            .ga(RequestContext::new("/page"))
            .page_view()
            .await
            .expect("page view");
        drop(analytics);

        timeout(Duration::from_secs(5), async {
            while transport.payloads().is_empty() {
                sleep(Duration::from_millis(20)).await;
            }
        })
        .await
        .expect("dropped facade drains its buffer in the background");
        assert_eq!(transport.payloads()[0].hits, 1);
    }

    #[tokio::test]
    #[traced_test]
    async fn shutdown_drains_the_buffer_and_reports_completion() {
        let transport = RecordingTransport::default();
        let mut options = page_view_options(None);
        options.batch = BatchConfig::new(20, Duration::from_secs(60));
        let analytics = Analytics::with_transport(options, Arc::new(transport.clone()))
            .expect("tracker builds");

        for _ in 0..3 {
            analytics
                .ga(RequestContext::new("/page"))
                .page_view()
                .await
                .expect("page view");
        }
        analytics.shutdown().await;

        assert!(logs_contain(
            "All buffered hits sent to the measurement protocol collector"
        ));
        let payloads = transport.payloads();
        assert_eq!(payloads.len(), 1, "drain is a single delivery");
        assert_eq!(payloads[0].hits, 3);
    }
}
