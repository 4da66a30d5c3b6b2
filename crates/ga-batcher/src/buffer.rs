// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use crate::hit::QueuedHit;
use std::collections::VecDeque;

/// Ordered buffer of hits awaiting delivery.
///
/// Hits leave in submission order and every batch is a contiguous prefix of
/// the buffer, so delivery preserves FIFO order per engine. The buffer is
/// unbounded; capacity is governed only by how fast flushes drain it.
#[derive(Debug, Default)]
pub struct HitBuffer {
    hits: VecDeque<QueuedHit>,
}

impl HitBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, hit: QueuedHit) {
        self.hits.push_back(hit);
    }

    /// Removes and returns up to `max` hits from the buffer head.
    pub fn drain_batch(&mut self, max: usize) -> Vec<QueuedHit> {
        let take = max.min(self.hits.len());
        self.hits.drain(..take).collect()
    }

    pub fn len(&self) -> usize {
        self.hits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }
}
