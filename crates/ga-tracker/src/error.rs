// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use ga_batcher::TransportError;
use thiserror::Error;

/// Errors surfaced to callers of the tracker.
#[derive(Debug, Error)]
pub enum TrackerError {
    /// Property settings failed structural validation.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    /// A custom event was missing a required field.
    #[error("Invalid event: {0}")]
    InvalidEvent(String),
    /// The collector client could not be constructed.
    #[error("Failed to initialize collector: {0}")]
    CollectorInit(#[from] TransportError),
}
