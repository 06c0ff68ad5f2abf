//! Outbox Relay
//!
//! Background worker that drains the outbox: claims due pending rows,
//! publishes them to the broker, and marks them published only after broker
//! acknowledgment. Safe to run with multiple workers; failed attempts are
//! retried with exponential backoff and dead-lettered past the ceiling.

use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::time::{sleep, Instant};

use crate::config::RelayConfig;
use crate::publisher::Publisher;

use super::{OutboxError, OutboxRepository, OutboxStatus};

/// Cap on the backoff exponent so the delay stays bounded
const MAX_BACKOFF_SHIFT: u32 = 6;

/// Exponential retry delay for a row that has already failed `attempts` times
pub fn backoff_delay(base: Duration, attempts: i32) -> Duration {
    let shift = (attempts.max(0) as u32).min(MAX_BACKOFF_SHIFT);
    base.saturating_mul(1u32 << shift)
}

/// Relay worker draining the outbox to a broker
pub struct OutboxRelay<P: Publisher> {
    outbox: OutboxRepository,
    publisher: P,
    config: RelayConfig,
}

impl<P: Publisher> OutboxRelay<P> {
    /// Create a relay with default tuning
    pub fn new(outbox: OutboxRepository, publisher: P) -> Self {
        Self {
            outbox,
            publisher,
            config: RelayConfig::default(),
        }
    }

    /// Create a relay with explicit tuning
    pub fn with_config(outbox: OutboxRepository, publisher: P, config: RelayConfig) -> Self {
        Self {
            outbox,
            publisher,
            config,
        }
    }

    /// Run the relay loop until the task is dropped.
    /// Errors are logged and never kill the loop.
    pub async fn run(&self) {
        tracing::info!(
            batch_size = self.config.batch_size,
            max_attempts = self.config.max_attempts,
            "Outbox relay started"
        );

        let mut last_reclaim = Instant::now();

        loop {
            if last_reclaim.elapsed() >= self.config.claim_timeout {
                last_reclaim = Instant::now();
                match self.outbox.release_stale_claims(self.config.claim_timeout).await {
                    Ok(0) => {}
                    Ok(released) => {
                        tracing::warn!(released, "Released stale outbox claims");
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "Stale claim release failed");
                    }
                }
            }

            match self.process_batch().await {
                Ok(0) => {
                    sleep(self.config.poll_interval).await;
                }
                Ok(processed) => {
                    tracing::debug!(processed, "Relayed outbox batch");
                    // A partial batch means the backlog is drained
                    if processed < self.config.batch_size as usize {
                        sleep(self.config.poll_interval).await;
                    }
                }
                Err(e) => {
                    tracing::error!(error = %e, "Relay pass failed");
                    sleep(self.config.poll_interval).await;
                }
            }
        }
    }

    /// Claim and publish one batch; returns the number of rows processed.
    /// Exposed so tests can drive the relay without the loop.
    pub async fn process_batch(&self) -> Result<usize, OutboxError> {
        let claimed = self.outbox.claim_batch(self.config.batch_size).await?;
        if claimed.is_empty() {
            return Ok(0);
        }

        let total = claimed.len();

        for message in claimed {
            match self.publisher.publish(&message.channel, &message.payload).await {
                Ok(()) => {
                    self.outbox.mark_published(message.id).await?;
                    tracing::info!(
                        id = %message.id,
                        channel = %message.channel,
                        "Notification published"
                    );
                }
                Err(e) => {
                    let status = self
                        .outbox
                        .mark_failed(
                            message.id,
                            self.retry_at(message.attempts),
                            self.config.max_attempts,
                            &e.to_string(),
                        )
                        .await?;

                    if status == OutboxStatus::Dead {
                        tracing::error!(
                            id = %message.id,
                            attempts = message.attempts + 1,
                            error = %e,
                            "Outbox row dead-lettered"
                        );
                    } else {
                        tracing::warn!(
                            id = %message.id,
                            attempts = message.attempts + 1,
                            error = %e,
                            "Publish failed, will retry"
                        );
                    }
                }
            }
        }

        Ok(total)
    }

    fn retry_at(&self, attempts_so_far: i32) -> DateTime<Utc> {
        let delay = backoff_delay(self.config.backoff_base, attempts_so_far);
        Utc::now()
            + chrono::Duration::from_std(delay).unwrap_or_else(|_| chrono::Duration::seconds(3600))
    }
}
