//! Command Handlers module
//!
//! Command handlers that orchestrate validation, identifier generation,
//! persistence through a unit of work, and transactional notification
//! enqueueing, plus the dispatcher routing commands to them.

mod commands;
mod create_handler;
mod delete_handler;
mod dispatcher;
mod update_handler;


pub use commands::*;
pub use create_handler::CreateAccountHandler;
pub use delete_handler::DeleteAccountHandler;
pub use dispatcher::{AccountCommand, CommandDispatcher};
pub use update_handler::UpdateAccountHandler;
