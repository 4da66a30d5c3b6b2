// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use thiserror::Error;

/// Errors raised by the collector transport.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The HTTP client could not be built, e.g. from a malformed proxy URL.
    #[error("Failed to build collector client: {0}")]
    Client(String),
    /// The request never produced a response (connect failure, timeout).
    #[error("Failed to reach collector: {0}")]
    Request(String),
    /// The collector answered with a non-success status.
    #[error("Collector responded with status {0}")]
    Status(u16),
}

/// Errors raised by [`BatcherHandle`](crate::scheduler::BatcherHandle)
/// operations.
#[derive(Debug, Error)]
pub enum BatcherError {
    /// The engine task has stopped and no longer accepts commands.
    #[error("Batcher is stopped")]
    Stopped,
}
