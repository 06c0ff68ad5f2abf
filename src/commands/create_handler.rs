//! Create Account Handler
//!
//! Opens an account and stages its "account opened" notification in the
//! same transaction. The command succeeds once the commit lands; delivery
//! is the relay's concern from then on.

use sqlx::PgPool;
use std::time::Duration;

use crate::config::NotificationPolicy;
use crate::domain::{validate_currency, Account, Customer, DomainError};
use crate::error::AppError;
use crate::identifier::AccountNumberGenerator;
use crate::outbox::{EmailMessage, OutboxRepository, EMAIL_CHANNEL};
use crate::repository::{is_unique_violation, AccountRepository, CustomerRepository};
use crate::uow::UnitOfWork;

use super::{AccountProjection, CreateAccountCommand};

/// Commit retries when concurrent creates race on the same number
const MAX_COMMIT_RETRIES: u32 = 3;

/// Handler for account creation
pub struct CreateAccountHandler {
    accounts: AccountRepository,
    customers: CustomerRepository,
    outbox: OutboxRepository,
    pool: PgPool,
    policy: NotificationPolicy,
}

impl CreateAccountHandler {
    pub fn new(pool: PgPool, policy: NotificationPolicy) -> Self {
        Self {
            accounts: AccountRepository::new(pool.clone()),
            customers: CustomerRepository::new(pool.clone()),
            outbox: OutboxRepository::new(pool.clone()),
            pool,
            policy,
        }
    }

    /// Execute the create account command
    pub async fn execute(
        &self,
        command: CreateAccountCommand,
    ) -> Result<AccountProjection, AppError> {
        // Validate before any side effects
        validate_currency(&command.currency_code)?;
        if command.name.trim().is_empty() {
            return Err(DomainError::EmptyAccountName.into());
        }

        // The customer must resolve now: the notification content is part of
        // the same transaction as the account row
        let customer = self
            .customers
            .get_by_id(command.customer_id)
            .await?
            .ok_or(AppError::CustomerNotFound(command.customer_id))?;

        for attempt in 0..MAX_COMMIT_RETRIES {
            match self.try_create(&command, &customer).await {
                Ok(account) => {
                    tracing::info!(
                        account_number = account.account_number,
                        customer_id = %command.customer_id,
                        currency = %account.currency_code,
                        "Account opened"
                    );
                    return Ok(AccountProjection::from(&account));
                }
                // Two commands drew the same number between check and commit;
                // the UNIQUE constraint caught it, redraw and retry
                Err(AppError::Database(e)) if is_unique_violation(&e) => {
                    let delay = Duration::from_millis(50 * (attempt as u64 + 1));
                    tokio::time::sleep(delay).await;
                    tracing::warn!(
                        "Account number collision at commit, retrying (attempt {}/{})",
                        attempt + 1,
                        MAX_COMMIT_RETRIES
                    );
                    continue;
                }
                Err(e) => return Err(e),
            }
        }

        Err(DomainError::AccountNumberExhausted {
            attempts: MAX_COMMIT_RETRIES,
        }
        .into())
    }

    /// Single attempt: allocate, insert, enqueue, commit
    async fn try_create(
        &self,
        command: &CreateAccountCommand,
        customer: &Customer,
    ) -> Result<Account, AppError> {
        let mut uow = UnitOfWork::begin(&self.pool).await?;

        let mut generator = AccountNumberGenerator::new();
        let account_number = generator.allocate(&mut uow, &self.accounts).await?;

        let account = Account::open(
            command.customer_id,
            command.name.clone(),
            command.currency_code.clone(),
            account_number,
        );
        self.accounts.insert(&mut uow, &account).await?;

        if self.policy.on_create {
            let message = EmailMessage::account_opened(customer, &account.currency_code);
            self.outbox
                .enqueue(&mut uow, EMAIL_CHANNEL, &message)
                .await?;
        }

        uow.complete().await?;

        Ok(account)
    }
}
