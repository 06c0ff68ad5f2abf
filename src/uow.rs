//! Unit of Work
//!
//! Groups repository mutations into a single atomic commit. Scoped per
//! command invocation; dropping a unit of work without calling `complete`
//! rolls the transaction back, so a cancelled command leaves no partial
//! state and no outbox row.

use sqlx::{PgPool, Postgres, Transaction};

/// Atomic transaction boundary around one command's mutations
pub struct UnitOfWork {
    tx: Transaction<'static, Postgres>,
}

impl UnitOfWork {
    /// Begin a new unit of work on its own connection
    pub async fn begin(pool: &PgPool) -> Result<Self, sqlx::Error> {
        Ok(Self {
            tx: pool.begin().await?,
        })
    }

    /// The underlying transaction, for binding repository queries
    pub fn tx(&mut self) -> &mut Transaction<'static, Postgres> {
        &mut self.tx
    }

    /// Durably apply all staged mutations, or fail applying none
    pub async fn complete(self) -> Result<(), sqlx::Error> {
        self.tx.commit().await
    }
}

impl std::fmt::Debug for UnitOfWork {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UnitOfWork").finish_non_exhaustive()
    }
}
