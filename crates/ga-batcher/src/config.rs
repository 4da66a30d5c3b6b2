// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use std::env;
use std::time::Duration;
use tracing::debug;

/// Default number of hits per delivered batch.
pub const DEFAULT_BATCH_SIZE: usize = 20;
/// Largest batch the measurement protocol accepts per request.
pub const MAX_BATCH_SIZE: usize = 20;
pub const MIN_BATCH_SIZE: usize = 1;

/// Default delay between interval flushes.
pub const DEFAULT_BATCH_INTERVAL: Duration = Duration::from_millis(15_000);
pub const MIN_BATCH_INTERVAL: Duration = Duration::from_millis(1_000);
pub const MAX_BATCH_INTERVAL: Duration = Duration::from_millis(60_000);

/// Ceiling on the queue time reported per hit (four hours).
pub const MAX_QUEUE_TIME: Duration = Duration::from_millis(14_400_000);

const BATCH_SIZE_ENV: &str = "GA_TRACKER_BATCH_SIZE";
const BATCH_INTERVAL_ENV: &str = "GA_TRACKER_BATCH_INTERVAL_MS";

/// Immutable batching settings, fixed when the engine is constructed.
///
/// Out-of-range sizes and intervals are clamped rather than rejected, so an
/// engine always starts with workable settings. The engine re-applies the
/// clamps when it is constructed, so this holds for struct-literal configs
/// too.
#[derive(Clone, Debug, PartialEq)]
pub struct BatchConfig {
    /// Number of buffered hits that triggers a flush, in [1, 20].
    pub batch_size: usize,
    /// Delay between interval flushes, in [1s, 60s]. Unused when
    /// `batch_size` is 1.
    pub batch_interval: Duration,
    /// Ceiling on the reported queue time.
    pub max_queue_time: Duration,
}

impl Default for BatchConfig {
    fn default() -> Self {
        BatchConfig {
            batch_size: DEFAULT_BATCH_SIZE,
            batch_interval: DEFAULT_BATCH_INTERVAL,
            max_queue_time: MAX_QUEUE_TIME,
        }
    }
}

impl BatchConfig {
    /// Builds a config from explicit settings, clamping both into range.
    pub fn new(batch_size: usize, batch_interval: Duration) -> Self {
        BatchConfig {
            batch_size: clamp_batch_size(batch_size),
            batch_interval: clamp_batch_interval(batch_interval),
            max_queue_time: MAX_QUEUE_TIME,
        }
    }

    /// Builds a config from `GA_TRACKER_BATCH_SIZE` and
    /// `GA_TRACKER_BATCH_INTERVAL_MS`, falling back to the defaults for
    /// unset or unparseable values.
    pub fn from_env() -> Self {
        let batch_size = match env::var(BATCH_SIZE_ENV) {
            Ok(raw) => match raw.parse::<usize>() {
                Ok(size) => size,
                Err(_) => {
                    debug!("Invalid {BATCH_SIZE_ENV} value {raw:?}, using default");
                    DEFAULT_BATCH_SIZE
                }
            },
            Err(_) => DEFAULT_BATCH_SIZE,
        };

        let batch_interval = match env::var(BATCH_INTERVAL_ENV) {
            Ok(raw) => match raw.parse::<u64>() {
                Ok(millis) => Duration::from_millis(millis),
                Err(_) => {
                    debug!("Invalid {BATCH_INTERVAL_ENV} value {raw:?}, using default");
                    DEFAULT_BATCH_INTERVAL
                }
            },
            Err(_) => DEFAULT_BATCH_INTERVAL,
        };

        Self::new(batch_size, batch_interval)
    }

    /// Re-applies both range clamps, keeping the queue-time ceiling as is.
    /// Engine construction runs every config through this before use.
    pub(crate) fn normalized(self) -> Self {
        BatchConfig {
            batch_size: clamp_batch_size(self.batch_size),
            batch_interval: clamp_batch_interval(self.batch_interval),
            max_queue_time: self.max_queue_time,
        }
    }
}

fn clamp_batch_size(requested: usize) -> usize {
    let clamped = requested.clamp(MIN_BATCH_SIZE, MAX_BATCH_SIZE);
    if clamped != requested {
        debug!("Batch size {requested} out of range, clamped to {clamped}");
    }
    clamped
}

fn clamp_batch_interval(requested: Duration) -> Duration {
    let clamped = requested.clamp(MIN_BATCH_INTERVAL, MAX_BATCH_INTERVAL);
    if clamped != requested {
        debug!(
            "Batch interval {}ms out of range, clamped to {}ms",
            requested.as_millis(),
            clamped.as_millis()
        );
    }
    clamped
}
