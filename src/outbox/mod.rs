//! Transactional outbox
//!
//! Outbound notifications are written to the `outbox_messages` table in the
//! same transaction as the account mutation, then relayed to the broker by a
//! background worker with at-least-once semantics. This closes the dual-write
//! gap of calling the broker directly after commit: a committed mutation can
//! no longer lose its notification, and a rolled-back mutation can no longer
//! leak one.

mod message;
mod relay;
mod repository;

pub use message::{EmailMessage, EMAIL_CHANNEL};
pub use relay::{backoff_delay, OutboxRelay};
pub use repository::{OutboxError, OutboxMessage, OutboxRepository, OutboxStatus};
