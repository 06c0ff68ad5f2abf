//! Account lifecycle command core
//!
//! Create, update, and delete commands for financial accounts, with the
//! persisted effect reliably paired to an asynchronous notification through
//! a transactional outbox. Re-exports modules for integration testing and
//! external use.

pub mod commands;
pub mod db;
pub mod domain;
pub mod identifier;
pub mod outbox;
pub mod publisher;
pub mod repository;
pub mod uow;

pub mod config;
mod error;

pub use config::{Config, NotificationPolicy, RelayConfig};
pub use error::{AppError, AppResult, ErrorKind};
pub use domain::{Account, AccountChanges, Customer, DomainError};
pub use commands::{AccountCommand, ApiResponse, CommandDispatcher};
