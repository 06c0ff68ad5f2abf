//! Common test utilities

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use uuid::Uuid;

use account_core::publisher::{PublishError, Publisher};

/// Connect to the test database
pub async fn setup_test_db() -> PgPool {
    dotenvy::dotenv().ok();
    let database_url =
        std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for tests");

    PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .expect("Failed to connect to DB")
}

/// Insert a customer and return its id
pub async fn seed_customer(pool: &PgPool, first_name: &str, last_name: &str, email: &str) -> Uuid {
    let id = Uuid::new_v4();

    sqlx::query(
        r#"
        INSERT INTO customers (id, first_name, last_name, email)
        VALUES ($1, $2, $3, $4)
        "#,
    )
    .bind(id)
    .bind(first_name)
    .bind(last_name)
    .bind(email)
    .execute(pool)
    .await
    .expect("Failed to seed customer");

    id
}

/// In-memory publisher recording what the relay delivers.
/// Can be configured to fail its next N publish attempts to simulate a
/// broker outage.
#[derive(Clone, Default)]
pub struct MemoryPublisher {
    published: Arc<Mutex<Vec<(String, serde_json::Value)>>>,
    failures_remaining: Arc<AtomicU32>,
}

impl MemoryPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Publisher that fails its next `times` publish attempts
    pub fn failing(times: u32) -> Self {
        let publisher = Self::new();
        publisher.failures_remaining.store(times, Ordering::SeqCst);
        publisher
    }

    /// Everything delivered so far, in order
    pub fn published(&self) -> Vec<(String, serde_json::Value)> {
        self.published.lock().unwrap().clone()
    }
}

#[async_trait]
impl Publisher for MemoryPublisher {
    async fn publish(
        &self,
        channel: &str,
        payload: &serde_json::Value,
    ) -> Result<(), PublishError> {
        let remaining = self.failures_remaining.load(Ordering::SeqCst);
        if remaining > 0 {
            self.failures_remaining
                .store(remaining - 1, Ordering::SeqCst);
            return Err(PublishError::Unavailable("simulated outage".to_string()));
        }

        self.published
            .lock()
            .unwrap()
            .push((channel.to_string(), payload.clone()));

        Ok(())
    }
}
