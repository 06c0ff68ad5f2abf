//! Delete Account Handler
//!
//! Removes an account by id. Deleting a missing account fails with NotFound,
//! and repeating the delete yields the same NotFound, so the outcome is
//! defined and repeatable.

use sqlx::PgPool;

use crate::config::NotificationPolicy;
use crate::error::AppError;
use crate::outbox::{EmailMessage, OutboxRepository, EMAIL_CHANNEL};
use crate::repository::{AccountRepository, CustomerRepository};
use crate::uow::UnitOfWork;

use super::DeleteAccountCommand;

/// Handler for account deletion
pub struct DeleteAccountHandler {
    accounts: AccountRepository,
    customers: CustomerRepository,
    outbox: OutboxRepository,
    pool: PgPool,
    policy: NotificationPolicy,
}

impl DeleteAccountHandler {
    pub fn new(pool: PgPool, policy: NotificationPolicy) -> Self {
        Self {
            accounts: AccountRepository::new(pool.clone()),
            customers: CustomerRepository::new(pool.clone()),
            outbox: OutboxRepository::new(pool.clone()),
            pool,
            policy,
        }
    }

    /// Execute the delete account command
    pub async fn execute(&self, command: DeleteAccountCommand) -> Result<(), AppError> {
        let mut uow = UnitOfWork::begin(&self.pool).await?;

        let account = self
            .accounts
            .get_by_id_locked(&mut uow, command.account_id)
            .await?
            .ok_or(AppError::AccountNotFound(command.account_id))?;

        self.accounts.delete(&mut uow, command.account_id).await?;

        if self.policy.on_delete {
            match self.customers.get_by_id(account.customer_id).await? {
                Some(customer) => {
                    let message = EmailMessage::account_closed(&customer, account.account_number);
                    self.outbox
                        .enqueue(&mut uow, EMAIL_CHANNEL, &message)
                        .await?;
                }
                None => {
                    tracing::warn!(
                        customer_id = %account.customer_id,
                        "Owner not found, skipping close notification"
                    );
                }
            }
        }

        uow.complete().await?;

        tracing::info!(
            account_id = %command.account_id,
            account_number = account.account_number,
            "Account deleted"
        );

        Ok(())
    }
}
