// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use crate::error::TrackerError;
use crate::producers::{AttributionProducer, SessionIdProducer, TrackFilter};
use ga_batcher::{BatchConfig, CollectorConfig};

/// Hit categories a property can subscribe to.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum HitType {
    PageView,
    Event,
    Ecommerce,
}

/// One analytics property and the hit categories it receives.
#[derive(Clone, Debug, PartialEq)]
pub struct PropertySettings {
    /// Tracking id of the property.
    pub id: String,
    /// Hit categories forwarded to this property.
    pub hit_types: Vec<HitType>,
}

impl PropertySettings {
    pub fn new(id: impl Into<String>, hit_types: Vec<HitType>) -> Self {
        PropertySettings {
            id: id.into(),
            hit_types,
        }
    }

    pub(crate) fn accepts(&self, hit_type: HitType) -> bool {
        self.hit_types.contains(&hit_type)
    }

    fn validate(&self) -> Result<(), TrackerError> {
        if self.id.trim().len() < 2 {
            return Err(TrackerError::InvalidConfig(format!(
                "property id {:?} must be at least two characters",
                self.id
            )));
        }
        if self.hit_types.is_empty() {
            return Err(TrackerError::InvalidConfig(format!(
                "property {} must subscribe to at least one hit type",
                self.id
            )));
        }
        Ok(())
    }
}

/// Everything needed to build an [`Analytics`](crate::analytics::Analytics)
/// instance.
#[derive(Clone)]
pub struct TrackerOptions {
    /// Properties receiving hits. When empty, producers are never invoked
    /// and nothing reaches the network.
    pub properties: Vec<PropertySettings>,
    /// Resolves the client/session id for a request.
    pub session_id_producer: SessionIdProducer,
    /// Resolves campaign attribution for a request, when any.
    pub attribution_producer: Option<AttributionProducer>,
    /// Per-request opt-out applied before response outcomes are mapped.
    pub track_filter: Option<TrackFilter>,
    /// Batching settings for the delivery engine.
    pub batch: BatchConfig,
    /// Collector endpoint settings.
    pub collector: CollectorConfig,
}

impl TrackerOptions {
    /// Options with the required pieces and environment-driven batching and
    /// collector settings.
    pub fn new(properties: Vec<PropertySettings>, session_id_producer: SessionIdProducer) -> Self {
        TrackerOptions {
            properties,
            session_id_producer,
            attribution_producer: None,
            track_filter: None,
            batch: BatchConfig::from_env(),
            collector: CollectorConfig::from_env(),
        }
    }

    pub(crate) fn validate(&self) -> Result<(), TrackerError> {
        for property in &self.properties {
            property.validate()?;
        }
        Ok(())
    }
}
