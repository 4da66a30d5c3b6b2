// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Batching engine that owns the hit buffer and serializes every flush
//! trigger.
//!
//! The engine is a service/handle pair: [`BatcherService`] owns the buffer,
//! the interval timer, and the transport, and processes commands on a
//! single task, while [`BatcherHandle`] is the cheap clonable submission
//! side. Size triggers, interval ticks, and shutdown draining are all arms
//! of one `select!` loop, so a batch can never be double-fetched or lost
//! to a race between them.

use crate::buffer::HitBuffer;
use crate::collector::{BatchPayload, Transport};
use crate::config::BatchConfig;
use crate::encode;
use crate::errors::BatcherError;
use crate::hit::{Hit, QueuedHit};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tokio::time::{interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error};

#[derive(Debug)]
pub enum BatcherCommand {
    Submit(QueuedHit),
    Flush(oneshot::Sender<()>),
}

/// Handle for submitting hits to a running engine.
#[derive(Clone)]
pub struct BatcherHandle {
    tx: mpsc::UnboundedSender<BatcherCommand>,
    cancel: CancellationToken,
}

impl BatcherHandle {
    /// Queues a hit for delivery, stamping it with the submission instant.
    /// Returns without waiting for any flush.
    pub fn submit(&self, hit: Hit) -> Result<(), BatcherError> {
        self.tx
            .send(BatcherCommand::Submit(QueuedHit::new(hit)))
            .map_err(|_| BatcherError::Stopped)
    }

    /// Flushes everything currently buffered, resolving once the pass has
    /// completed. An empty buffer resolves without any delivery.
    pub async fn flush(&self) -> Result<(), BatcherError> {
        let (response_tx, response_rx) = oneshot::channel();
        self.tx
            .send(BatcherCommand::Flush(response_tx))
            .map_err(|_| BatcherError::Stopped)?;
        response_rx.await.map_err(|_| BatcherError::Stopped)
    }

    /// Stops the interval timer and asks the engine to drain whatever is
    /// buffered. The drain is complete when the service task finishes.
    /// Cancelling more than once is a no-op.
    pub fn shutdown(&self) {
        self.cancel.cancel();
    }
}

/// Service owning the buffer and processing engine commands.
pub struct BatcherService {
    config: BatchConfig,
    transport: Arc<dyn Transport>,
    buffer: HitBuffer,
    rx: mpsc::UnboundedReceiver<BatcherCommand>,
    cancel: CancellationToken,
}

impl BatcherService {
    pub fn new(config: BatchConfig, transport: Arc<dyn Transport>) -> (Self, BatcherHandle) {
        // A zero batch size would never drain and a zero interval would
        // panic the timer, so out-of-range configs are clamped here too.
        let config = config.normalized();
        let (tx, rx) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();

        let service = BatcherService {
            config,
            transport,
            buffer: HitBuffer::new(),
            rx,
            cancel: cancel.clone(),
        };
        let handle = BatcherHandle { tx, cancel };

        (service, handle)
    }

    /// Runs the engine until shutdown. All buffer access happens on this
    /// task, so concurrent triggers are serialized by construction.
    pub async fn run(mut self) {
        debug!("Batcher started with batch size {}", self.config.batch_size);

        let mut timer = interval(self.config.batch_interval);
        timer.set_missed_tick_behavior(MissedTickBehavior::Skip);
        timer.tick().await; // discard first tick
        // With a batch size of one every submit flushes, so no timer runs.
        let timer_enabled = self.config.batch_size > 1;

        loop {
            tokio::select! {
                command = self.rx.recv() => match command {
                    Some(command) => self.handle_command(command).await,
                    None => {
                        // Every handle is gone; deliver what is left.
                        self.flush_all().await;
                        break;
                    }
                },
                _ = timer.tick(), if timer_enabled => {
                    self.flush_all().await;
                }
                () = self.cancel.cancelled() => {
                    let flush_acks = self.drain_pending_commands();
                    debug!(
                        "Batcher shutting down, draining {} buffered hits",
                        self.buffer.len()
                    );
                    self.flush_all().await;
                    for ack in flush_acks {
                        let _ = ack.send(());
                    }
                    break;
                }
            }
        }

        debug!("Batcher stopped");
    }

    async fn handle_command(&mut self, command: BatcherCommand) {
        match command {
            BatcherCommand::Submit(queued) => {
                self.buffer.push(queued);
                if self.buffer.len() >= self.config.batch_size {
                    self.flush_all().await;
                }
            }
            BatcherCommand::Flush(response_tx) => {
                self.flush_all().await;
                if response_tx.send(()).is_err() {
                    debug!("Flush requester went away before the ack");
                }
            }
        }
    }

    /// Moves commands already sitting on the channel into the buffer so a
    /// shutdown drain cannot strand submissions behind the cancel signal.
    fn drain_pending_commands(&mut self) -> Vec<oneshot::Sender<()>> {
        let mut flush_acks = Vec::new();
        while let Ok(command) = self.rx.try_recv() {
            match command {
                BatcherCommand::Submit(queued) => self.buffer.push(queued),
                BatcherCommand::Flush(response_tx) => flush_acks.push(response_tx),
            }
        }
        flush_acks
    }

    /// Drains the buffer head-first in batches of at most `batch_size`,
    /// delivering each batch before fetching the next. A failed delivery is
    /// logged and its batch dropped.
    async fn flush_all(&mut self) {
        while !self.buffer.is_empty() {
            let batch = self.buffer.drain_batch(self.config.batch_size);
            let records: Vec<String> = batch
                .into_iter()
                .map(|mut queued| {
                    let queue_time = queued.queued_at.elapsed().min(self.config.max_queue_time);
                    queued.hit.set_queue_time_ms(queue_time.as_millis() as i64);
                    encode::hit_record(&queued.hit)
                })
                .collect();

            let hit_count = records.len();
            let payload = BatchPayload {
                body: encode::batch_body(&records),
                hits: hit_count,
            };

            debug!("Flushing batch of {hit_count} hits");
            if let Err(e) = self.transport.send(payload).await {
                error!("Failed to deliver batch of {hit_count} hits: {e}");
            }
        }
    }
}
