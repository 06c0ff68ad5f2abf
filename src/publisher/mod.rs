//! Notification Publisher
//!
//! Port for handing a message to a broker for asynchronous delivery. The
//! only caller is the outbox relay, which invokes `publish` strictly after
//! the triggering transaction has committed.

mod redis_publisher;

pub use redis_publisher::RedisPublisher;

use async_trait::async_trait;

/// Publisher errors
#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    #[error("Broker error: {0}")]
    Broker(#[from] redis::RedisError),

    #[error("Broker unavailable: {0}")]
    Unavailable(String),
}

/// Port for delivering a message to a named channel
#[async_trait]
pub trait Publisher: Send + Sync {
    /// Hand the payload to the broker; returning Ok means the broker
    /// acknowledged the message.
    async fn publish(&self, channel: &str, payload: &serde_json::Value)
        -> Result<(), PublishError>;
}
