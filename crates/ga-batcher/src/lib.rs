// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

#![cfg_attr(not(test), deny(clippy::panic))]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![cfg_attr(not(test), deny(clippy::todo))]
#![cfg_attr(not(test), deny(clippy::unimplemented))]

//! Hit-buffering and batched-delivery engine for the measurement protocol.
//!
//! Hits submitted through a [`BatcherHandle`] accumulate in a FIFO buffer
//! owned by a [`BatcherService`] task and leave it in batches: when the
//! buffer reaches the configured batch size, when the interval timer
//! fires, or when the engine shuts down and drains. Delivery is
//! best-effort; transport failures are logged and the affected batch is
//! dropped.

pub mod buffer;
pub mod collector;
pub mod config;
pub mod encode;
pub mod errors;
pub mod hit;
pub mod scheduler;

pub use collector::{
    BatchPayload, CollectorClient, CollectorConfig, Transport, DEFAULT_COLLECTOR_URL,
};
pub use config::BatchConfig;
pub use errors::{BatcherError, TransportError};
pub use hit::{FieldValue, Hit, QueuedHit, QUEUE_TIME_KEY};
pub use scheduler::{BatcherHandle, BatcherService};
