// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

#![cfg_attr(not(test), deny(clippy::panic))]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![cfg_attr(not(test), deny(clippy::todo))]
#![cfg_attr(not(test), deny(clippy::unimplemented))]

//! Request-scoped analytics tracking over the measurement protocol.
//!
//! The tracker resolves a session id and campaign attribution per request,
//! fans each hit out to every subscribing property, and hands the results
//! to the [`ga_batcher`] delivery engine. Failed deliveries are logged and
//! dropped; tracking never gates request handling.

pub mod analytics;
pub mod attribution;
pub mod error;
pub mod events;
pub mod outcome;
pub mod producers;
pub mod request;
pub mod settings;

pub use analytics::{Analytics, Ecommerce, GaTracker};
pub use attribution::Attribution;
pub use error::TrackerError;
pub use events::{EcommerceAction, Event, Product};
pub use ga_batcher::{BatchConfig, CollectorConfig, FieldValue};
pub use outcome::ResponseOutcome;
pub use producers::{
    attribution_producer, session_id_producer, track_filter, AttributionProducer,
    SessionIdProducer, TrackFilter,
};
pub use request::RequestContext;
pub use settings::{HitType, PropertySettings, TrackerOptions};
