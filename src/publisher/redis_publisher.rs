//! Redis list publisher
//!
//! Pushes the JSON payload onto the named list; consumers pop from the other
//! end. The connection manager reconnects on broker restarts.

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;

use super::{PublishError, Publisher};

/// Publisher backed by a Redis list per channel
#[derive(Clone)]
pub struct RedisPublisher {
    conn: ConnectionManager,
}

impl RedisPublisher {
    /// Connect to the broker at the given URL
    pub async fn connect(url: &str) -> Result<Self, PublishError> {
        let client = redis::Client::open(url)?;
        let conn = ConnectionManager::new(client).await?;

        Ok(Self { conn })
    }
}

#[async_trait]
impl Publisher for RedisPublisher {
    async fn publish(
        &self,
        channel: &str,
        payload: &serde_json::Value,
    ) -> Result<(), PublishError> {
        let mut conn = self.conn.clone();
        let body = payload.to_string();

        let _queued: i64 = conn.rpush(channel, body).await?;

        Ok(())
    }
}

impl std::fmt::Debug for RedisPublisher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisPublisher").finish_non_exhaustive()
    }
}
