//! Command Dispatcher
//!
//! Routes an inbound command value to its handler and folds the outcome
//! into the uniform response envelope. Deliberately thin.

use sqlx::PgPool;

use crate::config::NotificationPolicy;

use super::{
    AccountProjection, ApiResponse, CreateAccountCommand, CreateAccountHandler,
    DeleteAccountCommand, DeleteAccountHandler, UpdateAccountCommand, UpdateAccountHandler,
};

/// The three command kinds this core accepts
#[derive(Debug, Clone)]
pub enum AccountCommand {
    Create(CreateAccountCommand),
    Update(UpdateAccountCommand),
    Delete(DeleteAccountCommand),
}

/// Dispatcher owning one handler per command kind
pub struct CommandDispatcher {
    create: CreateAccountHandler,
    update: UpdateAccountHandler,
    delete: DeleteAccountHandler,
}

impl CommandDispatcher {
    pub fn new(pool: PgPool, policy: NotificationPolicy) -> Self {
        Self {
            create: CreateAccountHandler::new(pool.clone(), policy),
            update: UpdateAccountHandler::new(pool.clone(), policy),
            delete: DeleteAccountHandler::new(pool, policy),
        }
    }

    /// Route a command to its handler and return the response envelope.
    /// The payload is present only for Create.
    pub async fn dispatch(&self, command: AccountCommand) -> ApiResponse<AccountProjection> {
        match command {
            AccountCommand::Create(cmd) => match self.create.execute(cmd).await {
                Ok(projection) => ApiResponse::success(projection),
                Err(e) => {
                    tracing::warn!(error = %e, "Create command failed");
                    ApiResponse::failure(&e)
                }
            },
            AccountCommand::Update(cmd) => match self.update.execute(cmd).await {
                Ok(()) => ApiResponse::success_empty(),
                Err(e) => {
                    tracing::warn!(error = %e, "Update command failed");
                    ApiResponse::failure(&e)
                }
            },
            AccountCommand::Delete(cmd) => match self.delete.execute(cmd).await {
                Ok(()) => ApiResponse::success_empty(),
                Err(e) => {
                    tracing::warn!(error = %e, "Delete command failed");
                    ApiResponse::failure(&e)
                }
            },
        }
    }
}
