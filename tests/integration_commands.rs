//! Integration tests for the command handlers and dispatcher
//!
//! These tests require a database connection (DATABASE_URL).

mod common;

use std::sync::Arc;

use chrono::Utc;
use rust_decimal_macros::dec;
use uuid::Uuid;

use account_core::commands::{
    AccountCommand, CommandDispatcher, CreateAccountCommand, DeleteAccountCommand,
    UpdateAccountCommand,
};
use account_core::domain::AccountChanges;
use account_core::identifier::{derive_iban, ACCOUNT_NUMBER_MAX, ACCOUNT_NUMBER_MIN};
use account_core::repository::AccountRepository;
use account_core::NotificationPolicy;

use common::{seed_customer, setup_test_db};

#[tokio::test]
async fn test_create_returns_seven_digit_number_and_derived_iban() {
    let pool = setup_test_db().await;
    let customer_id = seed_customer(&pool, "Grace", "Hopper", "grace@example.com").await;
    let dispatcher = CommandDispatcher::new(pool.clone(), NotificationPolicy::default());

    let before = Utc::now();
    let response = dispatcher
        .dispatch(AccountCommand::Create(CreateAccountCommand::new(
            customer_id,
            "USD".to_string(),
            "Checking".to_string(),
        )))
        .await;

    assert!(response.success, "create failed: {:?}", response.error);
    let account = response.payload.expect("create returns the account");

    assert!((ACCOUNT_NUMBER_MIN..=ACCOUNT_NUMBER_MAX).contains(&account.account_number));
    assert_eq!(account.account_number.to_string().len(), 7);
    assert_eq!(account.iban, derive_iban(account.account_number));
    assert!(account.iban.starts_with("TR"));
    assert_eq!(account.balance, dec!(0));
    assert_eq!(account.currency_code, "USD");
    assert!(account.open_date >= before);
    assert!(account.open_date <= Utc::now());
}

#[tokio::test]
async fn test_create_rejects_unrecognized_currency() {
    let pool = setup_test_db().await;
    let customer_id = seed_customer(&pool, "Alan", "Turing", "alan@example.com").await;
    let dispatcher = CommandDispatcher::new(pool.clone(), NotificationPolicy::default());

    let response = dispatcher
        .dispatch(AccountCommand::Create(CreateAccountCommand::new(
            customer_id,
            "DOGE".to_string(),
            "Checking".to_string(),
        )))
        .await;

    assert!(!response.success);
    let error = response.error.expect("failure carries an error");
    assert_eq!(error.kind, "validation");
    assert!(error.message.contains("DOGE"));
}

#[tokio::test]
async fn test_create_for_unknown_customer_leaves_no_trace() {
    let pool = setup_test_db().await;
    let ghost_id = Uuid::new_v4();
    let dispatcher = CommandDispatcher::new(pool.clone(), NotificationPolicy::default());

    let response = dispatcher
        .dispatch(AccountCommand::Create(CreateAccountCommand::new(
            ghost_id,
            "USD".to_string(),
            "Checking".to_string(),
        )))
        .await;

    assert!(!response.success);
    assert_eq!(response.error.unwrap().kind, "not_found");

    // No account and no staged notification for the failed command
    let accounts: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM accounts WHERE customer_id = $1")
        .bind(ghost_id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(accounts, 0);
}

#[tokio::test]
async fn test_concurrent_creates_allocate_distinct_numbers() {
    let pool = setup_test_db().await;
    let customer_id = seed_customer(&pool, "Katherine", "Johnson", "kj@example.com").await;
    let dispatcher = Arc::new(CommandDispatcher::new(
        pool.clone(),
        NotificationPolicy::default(),
    ));

    let mut handles = Vec::new();
    for i in 0..8 {
        let dispatcher = Arc::clone(&dispatcher);
        handles.push(tokio::spawn(async move {
            dispatcher
                .dispatch(AccountCommand::Create(CreateAccountCommand::new(
                    customer_id,
                    "EUR".to_string(),
                    format!("Account {i}"),
                )))
                .await
        }));
    }

    let mut numbers = Vec::new();
    for handle in handles {
        let response = handle.await.unwrap();
        assert!(response.success, "create failed: {:?}", response.error);
        numbers.push(response.payload.unwrap().account_number);
    }

    let mut deduped = numbers.clone();
    deduped.sort_unstable();
    deduped.dedup();
    assert_eq!(deduped.len(), numbers.len(), "duplicate account number");
}

#[tokio::test]
async fn test_update_changes_label_but_not_identity() {
    let pool = setup_test_db().await;
    let customer_id = seed_customer(&pool, "Margaret", "Hamilton", "mh@example.com").await;
    let dispatcher = CommandDispatcher::new(pool.clone(), NotificationPolicy::default());
    let accounts = AccountRepository::new(pool.clone());

    let created = dispatcher
        .dispatch(AccountCommand::Create(CreateAccountCommand::new(
            customer_id,
            "GBP".to_string(),
            "Old name".to_string(),
        )))
        .await
        .payload
        .expect("create succeeds");

    let response = dispatcher
        .dispatch(AccountCommand::Update(UpdateAccountCommand::new(
            created.id,
            AccountChanges {
                name: Some("New name".to_string()),
                currency_code: None,
            },
        )))
        .await;

    assert!(response.success);
    assert!(response.payload.is_none());

    let stored = accounts
        .get_by_id(created.id)
        .await
        .unwrap()
        .expect("account still exists");
    assert_eq!(stored.name, "New name");
    assert_eq!(stored.currency_code, "GBP");
    assert_eq!(stored.account_number, created.account_number);
    assert_eq!(stored.iban, created.iban);
    // Stored timestamps are microsecond-truncated by the database
    assert!((stored.open_date - created.open_date).num_milliseconds().abs() < 10);
}

#[tokio::test]
async fn test_update_missing_account_is_not_found() {
    let pool = setup_test_db().await;
    let dispatcher = CommandDispatcher::new(pool.clone(), NotificationPolicy::default());
    let ghost_id = Uuid::new_v4();

    let response = dispatcher
        .dispatch(AccountCommand::Update(UpdateAccountCommand::new(
            ghost_id,
            AccountChanges {
                name: Some("Anything".to_string()),
                currency_code: None,
            },
        )))
        .await;

    assert!(!response.success);
    assert_eq!(response.error.unwrap().kind, "not_found");
}

#[tokio::test]
async fn test_update_with_no_changes_is_rejected() {
    let pool = setup_test_db().await;
    let dispatcher = CommandDispatcher::new(pool.clone(), NotificationPolicy::default());

    let response = dispatcher
        .dispatch(AccountCommand::Update(UpdateAccountCommand::new(
            Uuid::new_v4(),
            AccountChanges::default(),
        )))
        .await;

    assert!(!response.success);
    assert_eq!(response.error.unwrap().kind, "validation");
}

#[tokio::test]
async fn test_delete_is_repeatably_not_found_after_removal() {
    let pool = setup_test_db().await;
    let customer_id = seed_customer(&pool, "Annie", "Easley", "annie@example.com").await;
    let dispatcher = CommandDispatcher::new(pool.clone(), NotificationPolicy::default());

    let created = dispatcher
        .dispatch(AccountCommand::Create(CreateAccountCommand::new(
            customer_id,
            "TRY".to_string(),
            "To close".to_string(),
        )))
        .await
        .payload
        .expect("create succeeds");

    let first = dispatcher
        .dispatch(AccountCommand::Delete(DeleteAccountCommand::new(created.id)))
        .await;
    assert!(first.success);

    // Deleting an already-deleted id keeps producing the same outcome
    for _ in 0..3 {
        let again = dispatcher
            .dispatch(AccountCommand::Delete(DeleteAccountCommand::new(created.id)))
            .await;
        assert!(!again.success);
        assert_eq!(again.error.unwrap().kind, "not_found");
    }
}
