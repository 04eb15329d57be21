use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Statement};

use ledger::{
    AccountDetails, DepositCmd, Ledger, LedgerConfig, LedgerError, PaymentMethodKind,
    PaymentMethodNewCmd, RejectCmd, TransactionFilter, TransactionKind, TransactionStatus,
    TransferCmd, TransferDirection, ValidateCmd, WalletStatus, WithdrawCmd,
};
use migration::MigratorTrait;
use uuid::Uuid;

async fn ledger_with_db() -> (Ledger, DatabaseConnection) {
    ledger_with_config(LedgerConfig::default()).await
}

async fn ledger_with_config(config: LedgerConfig) -> (Ledger, DatabaseConnection) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let backend = db.get_database_backend();
    for (username, is_admin) in [("alice", false), ("bob", false), ("root", true)] {
        db.execute(Statement::from_sql_and_values(
            backend,
            "INSERT INTO users (username, password, is_admin) VALUES (?, ?, ?)",
            vec![username.into(), "password".into(), is_admin.into()],
        ))
        .await
        .unwrap();
    }
    let ledger = Ledger::builder()
        .database(db.clone())
        .config(config)
        .build()
        .await
        .unwrap();
    (ledger, db)
}

async fn mobile_money_method(ledger: &Ledger) -> Uuid {
    ledger
        .new_payment_method(PaymentMethodNewCmd {
            name: "MTN Mobile Money".to_string(),
            kind: PaymentMethodKind::MobileMoney,
            instructions: Some("Send to 677 000 000".to_string()),
            account_details: AccountDetails {
                account_name: Some("Cauris Ltd".to_string()),
                account_number: Some("677000000".to_string()),
                ..Default::default()
            },
        })
        .await
        .unwrap()
}

/// Seeds a spendable balance through a validated deposit.
async fn credit(ledger: &Ledger, method_id: Uuid, user: &str, amount_minor: i64) {
    let tx = ledger
        .request_deposit(DepositCmd {
            user_id: user.to_string(),
            payment_method_id: method_id,
            amount_minor,
            client_name: user.to_string(),
            description: None,
        })
        .await
        .unwrap();
    ledger
        .validate_transaction(ValidateCmd {
            transaction_id: tx.id,
            actor_id: "root".to_string(),
            note: None,
        })
        .await
        .unwrap();
}

#[tokio::test]
async fn deposit_is_pending_until_validated() {
    let (ledger, _db) = ledger_with_db().await;
    let method_id = mobile_money_method(&ledger).await;

    let tx = ledger
        .request_deposit(DepositCmd {
            user_id: "alice".to_string(),
            payment_method_id: method_id,
            amount_minor: 10_000,
            client_name: "Alice N.".to_string(),
            description: Some("first top-up".to_string()),
        })
        .await
        .unwrap();

    assert_eq!(tx.kind, TransactionKind::Deposit);
    assert_eq!(tx.status, TransactionStatus::Pending);
    assert!(tx.reference.starts_with("DEP-"));

    // No balance effect before the operator confirms settlement.
    let wallet = ledger.wallet("alice").await.unwrap();
    assert_eq!(wallet.balance.minor(), 0);
    assert_eq!(wallet.pending_balance.minor(), 0);

    let validated = ledger
        .validate_transaction(ValidateCmd {
            transaction_id: tx.id,
            actor_id: "root".to_string(),
            note: Some("matched on statement".to_string()),
        })
        .await
        .unwrap();
    assert_eq!(validated.status, TransactionStatus::Completed);
    assert_eq!(validated.validated_by.as_deref(), Some("root"));

    let wallet = ledger.wallet("alice").await.unwrap();
    assert_eq!(wallet.balance.minor(), 10_000);
    assert_eq!(wallet.pending_balance.minor(), 0);
}

#[tokio::test]
async fn validating_twice_applies_the_balance_effect_once() {
    let (ledger, _db) = ledger_with_db().await;
    let method_id = mobile_money_method(&ledger).await;

    let tx = ledger
        .request_deposit(DepositCmd {
            user_id: "alice".to_string(),
            payment_method_id: method_id,
            amount_minor: 10_000,
            client_name: "Alice N.".to_string(),
            description: None,
        })
        .await
        .unwrap();

    ledger
        .validate_transaction(ValidateCmd {
            transaction_id: tx.id,
            actor_id: "root".to_string(),
            note: None,
        })
        .await
        .unwrap();

    let err = ledger
        .validate_transaction(ValidateCmd {
            transaction_id: tx.id,
            actor_id: "root".to_string(),
            note: None,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::InvalidTransition(_)));

    // Rejecting after completion is just as invalid.
    let err = ledger
        .reject_transaction(RejectCmd {
            transaction_id: tx.id,
            actor_id: "root".to_string(),
            reason: "too late".to_string(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::InvalidTransition(_)));

    let wallet = ledger.wallet("alice").await.unwrap();
    assert_eq!(wallet.balance.minor(), 10_000);
}

#[tokio::test]
async fn rejected_deposit_never_touches_the_balance() {
    let (ledger, _db) = ledger_with_db().await;
    let method_id = mobile_money_method(&ledger).await;

    let tx = ledger
        .request_deposit(DepositCmd {
            user_id: "alice".to_string(),
            payment_method_id: method_id,
            amount_minor: 10_000,
            client_name: "Alice N.".to_string(),
            description: None,
        })
        .await
        .unwrap();

    let rejected = ledger
        .reject_transaction(RejectCmd {
            transaction_id: tx.id,
            actor_id: "root".to_string(),
            reason: "no matching settlement".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(rejected.status, TransactionStatus::Rejected);
    assert_eq!(rejected.rejected_by.as_deref(), Some("root"));
    assert_eq!(
        rejected.decision_note.as_deref(),
        Some("no matching settlement")
    );

    let wallet = ledger.wallet("alice").await.unwrap();
    assert_eq!(wallet.balance.minor(), 0);
}

#[tokio::test]
async fn rejecting_without_a_reason_fails() {
    let (ledger, _db) = ledger_with_db().await;
    let method_id = mobile_money_method(&ledger).await;

    let tx = ledger
        .request_deposit(DepositCmd {
            user_id: "alice".to_string(),
            payment_method_id: method_id,
            amount_minor: 1_000,
            client_name: "Alice N.".to_string(),
            description: None,
        })
        .await
        .unwrap();

    let err = ledger
        .reject_transaction(RejectCmd {
            transaction_id: tx.id,
            actor_id: "root".to_string(),
            reason: "   ".to_string(),
        })
        .await
        .unwrap_err();
    assert_eq!(
        err,
        LedgerError::InvalidAmount("reason must not be empty".to_string())
    );

    // Still pending, still decidable.
    let fetched = ledger.transaction(tx.id).await.unwrap();
    assert_eq!(fetched.status, TransactionStatus::Pending);
}

#[tokio::test]
async fn zero_amount_deposit_fails_before_any_write() {
    let (ledger, _db) = ledger_with_db().await;
    let method_id = mobile_money_method(&ledger).await;

    let err = ledger
        .request_deposit(DepositCmd {
            user_id: "alice".to_string(),
            payment_method_id: method_id,
            amount_minor: 0,
            client_name: "Alice N.".to_string(),
            description: None,
        })
        .await
        .unwrap_err();
    assert_eq!(
        err,
        LedgerError::InvalidAmount("amount_minor must be > 0".to_string())
    );

    // Nothing persisted: no wallet, no ledger row.
    assert_eq!(
        ledger.wallet("alice").await.unwrap_err(),
        LedgerError::KeyNotFound("wallet not exists".to_string())
    );
    let txs = ledger
        .transactions_for_user("alice", &TransactionFilter::default())
        .await
        .unwrap();
    assert!(txs.is_empty());
}

#[tokio::test]
async fn deposit_requires_an_active_payment_method() {
    let (ledger, _db) = ledger_with_db().await;
    let method_id = mobile_money_method(&ledger).await;
    ledger
        .set_payment_method_active(method_id, false)
        .await
        .unwrap();

    let err = ledger
        .request_deposit(DepositCmd {
            user_id: "alice".to_string(),
            payment_method_id: method_id,
            amount_minor: 1_000,
            client_name: "Alice N.".to_string(),
            description: None,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::PaymentMethodInactive(_)));

    let err = ledger
        .request_deposit(DepositCmd {
            user_id: "alice".to_string(),
            payment_method_id: Uuid::new_v4(),
            amount_minor: 1_000,
            client_name: "Alice N.".to_string(),
            description: None,
        })
        .await
        .unwrap_err();
    assert_eq!(
        err,
        LedgerError::KeyNotFound("payment method not exists".to_string())
    );
}

#[tokio::test]
async fn withdrawal_reserves_then_reject_returns_funds() {
    // Scenario: balance 10,000; withdraw 3,000; reject with a reason.
    let (ledger, _db) = ledger_with_db().await;
    let method_id = mobile_money_method(&ledger).await;
    credit(&ledger, method_id, "alice", 10_000).await;

    let tx = ledger
        .request_withdrawal(WithdrawCmd {
            user_id: "alice".to_string(),
            payment_method_id: method_id,
            amount_minor: 3_000,
            pin: None,
        })
        .await
        .unwrap();
    assert_eq!(tx.status, TransactionStatus::Pending);
    assert!(tx.reference.starts_with("WDR-"));

    let wallet = ledger.wallet("alice").await.unwrap();
    assert_eq!(wallet.balance.minor(), 7_000);
    assert_eq!(wallet.pending_balance.minor(), 3_000);

    ledger
        .reject_transaction(RejectCmd {
            transaction_id: tx.id,
            actor_id: "root".to_string(),
            reason: "bad account".to_string(),
        })
        .await
        .unwrap();

    let wallet = ledger.wallet("alice").await.unwrap();
    assert_eq!(wallet.balance.minor(), 10_000);
    assert_eq!(wallet.pending_balance.minor(), 0);

    let fetched = ledger.transaction(tx.id).await.unwrap();
    assert_eq!(fetched.status, TransactionStatus::Rejected);
    assert_eq!(fetched.decision_note.as_deref(), Some("bad account"));
}

#[tokio::test]
async fn withdrawal_validate_releases_the_reservation() {
    // Scenario: balance 10,000; withdraw 3,000; validate.
    let (ledger, _db) = ledger_with_db().await;
    let method_id = mobile_money_method(&ledger).await;
    credit(&ledger, method_id, "alice", 10_000).await;

    let tx = ledger
        .request_withdrawal(WithdrawCmd {
            user_id: "alice".to_string(),
            payment_method_id: method_id,
            amount_minor: 3_000,
            pin: None,
        })
        .await
        .unwrap();

    ledger
        .validate_transaction(ValidateCmd {
            transaction_id: tx.id,
            actor_id: "root".to_string(),
            note: None,
        })
        .await
        .unwrap();

    let wallet = ledger.wallet("alice").await.unwrap();
    assert_eq!(wallet.balance.minor(), 7_000);
    assert_eq!(wallet.pending_balance.minor(), 0);

    let fetched = ledger.transaction(tx.id).await.unwrap();
    assert_eq!(fetched.status, TransactionStatus::Completed);
}

#[tokio::test]
async fn withdrawal_beyond_balance_is_rejected_synchronously() {
    let (ledger, _db) = ledger_with_db().await;
    let method_id = mobile_money_method(&ledger).await;
    credit(&ledger, method_id, "alice", 1_000).await;

    let err = ledger
        .request_withdrawal(WithdrawCmd {
            user_id: "alice".to_string(),
            payment_method_id: method_id,
            amount_minor: 2_000,
            pin: None,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::InsufficientFunds(_)));

    let wallet = ledger.wallet("alice").await.unwrap();
    assert_eq!(wallet.balance.minor(), 1_000);
    assert_eq!(wallet.pending_balance.minor(), 0);

    // No withdrawal row was left behind.
    let txs = ledger
        .transactions_for_user(
            "alice",
            &TransactionFilter {
                kind: Some(TransactionKind::Withdrawal),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert!(txs.is_empty());
}

#[tokio::test]
async fn withdrawal_fee_is_reserved_and_returned_with_the_amount() {
    let (ledger, _db) = ledger_with_config(LedgerConfig {
        withdrawal_fee_minor: 150,
        ..Default::default()
    })
    .await;
    let method_id = mobile_money_method(&ledger).await;
    credit(&ledger, method_id, "alice", 10_000).await;

    let tx = ledger
        .request_withdrawal(WithdrawCmd {
            user_id: "alice".to_string(),
            payment_method_id: method_id,
            amount_minor: 3_000,
            pin: None,
        })
        .await
        .unwrap();
    assert_eq!(tx.fee_minor, 150);
    assert_eq!(tx.total_minor, 3_150);

    let wallet = ledger.wallet("alice").await.unwrap();
    assert_eq!(wallet.balance.minor(), 6_850);
    assert_eq!(wallet.pending_balance.minor(), 3_150);

    ledger
        .reject_transaction(RejectCmd {
            transaction_id: tx.id,
            actor_id: "root".to_string(),
            reason: "customer cancelled".to_string(),
        })
        .await
        .unwrap();

    let wallet = ledger.wallet("alice").await.unwrap();
    assert_eq!(wallet.balance.minor(), 10_000);
    assert_eq!(wallet.pending_balance.minor(), 0);
}

#[tokio::test]
async fn pin_protected_withdrawal_fails_closed() {
    let (ledger, _db) = ledger_with_db().await;
    let method_id = mobile_money_method(&ledger).await;
    credit(&ledger, method_id, "alice", 10_000).await;
    ledger.set_pin("alice", Some("1234")).await.unwrap();

    // Missing PIN is as wrong as a bad one.
    for pin in [None, Some("4321".to_string())] {
        let err = ledger
            .request_withdrawal(WithdrawCmd {
                user_id: "alice".to_string(),
                payment_method_id: method_id,
                amount_minor: 1_000,
                pin,
            })
            .await
            .unwrap_err();
        assert_eq!(err, LedgerError::InvalidPin);
    }

    let wallet = ledger.wallet("alice").await.unwrap();
    assert_eq!(wallet.balance.minor(), 10_000);
    assert_eq!(wallet.pending_balance.minor(), 0);

    ledger
        .request_withdrawal(WithdrawCmd {
            user_id: "alice".to_string(),
            payment_method_id: method_id,
            amount_minor: 1_000,
            pin: Some("1234".to_string()),
        })
        .await
        .unwrap();
}

#[tokio::test]
async fn transfer_moves_funds_and_writes_a_debit_credit_pair() {
    // Scenario: sender 5,000, receiver 1,000; transfer 2,000 with the PIN.
    let (ledger, _db) = ledger_with_db().await;
    let method_id = mobile_money_method(&ledger).await;
    credit(&ledger, method_id, "alice", 5_000).await;
    credit(&ledger, method_id, "bob", 1_000).await;
    ledger.set_pin("alice", Some("1234")).await.unwrap();

    let receipt = ledger
        .transfer(TransferCmd {
            sender_id: "alice".to_string(),
            receiver_id: "bob".to_string(),
            amount_minor: 2_000,
            pin: Some("1234".to_string()),
            description: Some("lunch money".to_string()),
        })
        .await
        .unwrap();
    assert!(receipt.reference.starts_with("TRF-"));

    let alice = ledger.wallet("alice").await.unwrap();
    let bob = ledger.wallet("bob").await.unwrap();
    assert_eq!(alice.balance.minor(), 3_000);
    assert_eq!(bob.balance.minor(), 3_000);
    // Conservation across the pair.
    assert_eq!(alice.balance.minor() + bob.balance.minor(), 6_000);

    let debit = ledger.transaction(receipt.debit_transaction_id).await.unwrap();
    let credit_row = ledger
        .transaction(receipt.credit_transaction_id)
        .await
        .unwrap();
    assert_eq!(debit.reference, credit_row.reference);
    assert_eq!(debit.direction, Some(TransferDirection::Debit));
    assert_eq!(credit_row.direction, Some(TransferDirection::Credit));
    assert_eq!(debit.status, TransactionStatus::Completed);
    assert_eq!(credit_row.status, TransactionStatus::Completed);
    assert_eq!(debit.counterparty_user_id.as_deref(), Some("bob"));
    assert_eq!(credit_row.counterparty_user_id.as_deref(), Some("alice"));
}

#[tokio::test]
async fn transfer_beyond_balance_fails_without_side_effects() {
    // Scenario: sender 1,000; transfer 2,000.
    let (ledger, _db) = ledger_with_db().await;
    let method_id = mobile_money_method(&ledger).await;
    credit(&ledger, method_id, "alice", 1_000).await;
    credit(&ledger, method_id, "bob", 500).await;

    let err = ledger
        .transfer(TransferCmd {
            sender_id: "alice".to_string(),
            receiver_id: "bob".to_string(),
            amount_minor: 2_000,
            pin: None,
            description: None,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::InsufficientFunds(_)));

    assert_eq!(ledger.wallet("alice").await.unwrap().balance.minor(), 1_000);
    assert_eq!(ledger.wallet("bob").await.unwrap().balance.minor(), 500);

    let txs = ledger
        .transactions_for_user(
            "alice",
            &TransactionFilter {
                kind: Some(TransactionKind::Transfer),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert!(txs.is_empty());
}

#[tokio::test]
async fn transfer_preconditions_are_enforced() {
    let (ledger, _db) = ledger_with_db().await;
    let method_id = mobile_money_method(&ledger).await;
    credit(&ledger, method_id, "alice", 5_000).await;

    let err = ledger
        .transfer(TransferCmd {
            sender_id: "alice".to_string(),
            receiver_id: "alice".to_string(),
            amount_minor: 100,
            pin: None,
            description: None,
        })
        .await
        .unwrap_err();
    assert_eq!(err, LedgerError::SelfTransfer);

    // Receiver wallet must already exist; nothing is debited on failure.
    let err = ledger
        .transfer(TransferCmd {
            sender_id: "alice".to_string(),
            receiver_id: "bob".to_string(),
            amount_minor: 100,
            pin: None,
            description: None,
        })
        .await
        .unwrap_err();
    assert_eq!(
        err,
        LedgerError::KeyNotFound("receiver wallet not exists".to_string())
    );
    assert_eq!(ledger.wallet("alice").await.unwrap().balance.minor(), 5_000);
}

#[tokio::test]
async fn transfer_with_missing_pin_fails_closed() {
    let (ledger, _db) = ledger_with_db().await;
    let method_id = mobile_money_method(&ledger).await;
    credit(&ledger, method_id, "alice", 5_000).await;
    ledger.ensure_wallet("bob").await.unwrap();
    ledger.set_pin("alice", Some("1234")).await.unwrap();

    let err = ledger
        .transfer(TransferCmd {
            sender_id: "alice".to_string(),
            receiver_id: "bob".to_string(),
            amount_minor: 1_000,
            pin: None,
            description: None,
        })
        .await
        .unwrap_err();
    assert_eq!(err, LedgerError::InvalidPin);
    assert_eq!(ledger.wallet("alice").await.unwrap().balance.minor(), 5_000);
}

#[tokio::test]
async fn frozen_wallet_rejects_every_mutation() {
    let (ledger, _db) = ledger_with_db().await;
    let method_id = mobile_money_method(&ledger).await;
    credit(&ledger, method_id, "alice", 5_000).await;
    credit(&ledger, method_id, "bob", 1_000).await;

    ledger
        .set_wallet_status("bob", WalletStatus::Frozen)
        .await
        .unwrap();

    // The receiver freeze aborts the whole transfer, sender included.
    let err = ledger
        .transfer(TransferCmd {
            sender_id: "alice".to_string(),
            receiver_id: "bob".to_string(),
            amount_minor: 1_000,
            pin: None,
            description: None,
        })
        .await
        .unwrap_err();
    assert_eq!(err, LedgerError::WalletFrozen("bob".to_string()));
    assert_eq!(ledger.wallet("alice").await.unwrap().balance.minor(), 5_000);
    assert_eq!(ledger.wallet("bob").await.unwrap().balance.minor(), 1_000);

    let err = ledger
        .request_withdrawal(WithdrawCmd {
            user_id: "bob".to_string(),
            payment_method_id: method_id,
            amount_minor: 100,
            pin: None,
        })
        .await
        .unwrap_err();
    assert_eq!(err, LedgerError::WalletFrozen("bob".to_string()));

    // Unfreeze and the wallet works again.
    ledger
        .set_wallet_status("bob", WalletStatus::Active)
        .await
        .unwrap();
    ledger
        .request_withdrawal(WithdrawCmd {
            user_id: "bob".to_string(),
            payment_method_id: method_id,
            amount_minor: 100,
            pin: None,
        })
        .await
        .unwrap();
}

#[tokio::test]
async fn pending_deposit_on_frozen_wallet_stays_pending() {
    let (ledger, _db) = ledger_with_db().await;
    let method_id = mobile_money_method(&ledger).await;

    let tx = ledger
        .request_deposit(DepositCmd {
            user_id: "alice".to_string(),
            payment_method_id: method_id,
            amount_minor: 1_000,
            client_name: "Alice N.".to_string(),
            description: None,
        })
        .await
        .unwrap();
    ledger
        .set_wallet_status("alice", WalletStatus::Frozen)
        .await
        .unwrap();

    let err = ledger
        .validate_transaction(ValidateCmd {
            transaction_id: tx.id,
            actor_id: "root".to_string(),
            note: None,
        })
        .await
        .unwrap_err();
    assert_eq!(err, LedgerError::WalletFrozen("alice".to_string()));

    // The decision failed atomically: still pending, decidable later.
    let fetched = ledger.transaction(tx.id).await.unwrap();
    assert_eq!(fetched.status, TransactionStatus::Pending);
}

#[tokio::test]
async fn listing_filters_by_kind_and_status_newest_first() {
    let (ledger, _db) = ledger_with_db().await;
    let method_id = mobile_money_method(&ledger).await;
    credit(&ledger, method_id, "alice", 10_000).await;
    ledger.ensure_wallet("bob").await.unwrap();

    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    let withdrawal = ledger
        .request_withdrawal(WithdrawCmd {
            user_id: "alice".to_string(),
            payment_method_id: method_id,
            amount_minor: 2_000,
            pin: None,
        })
        .await
        .unwrap();
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    ledger
        .transfer(TransferCmd {
            sender_id: "alice".to_string(),
            receiver_id: "bob".to_string(),
            amount_minor: 500,
            pin: None,
            description: None,
        })
        .await
        .unwrap();

    let all = ledger
        .transactions_for_user("alice", &TransactionFilter::default())
        .await
        .unwrap();
    assert_eq!(all.len(), 3);
    assert_eq!(all[0].kind, TransactionKind::Transfer);
    assert_eq!(all[1].id, withdrawal.id);
    assert_eq!(all[2].kind, TransactionKind::Deposit);

    let pending_only = ledger
        .transactions_for_user(
            "alice",
            &TransactionFilter {
                status: Some(TransactionStatus::Pending),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(pending_only.len(), 1);
    assert_eq!(pending_only[0].id, withdrawal.id);

    let limited = ledger
        .transactions_for_user(
            "alice",
            &TransactionFilter {
                limit: 1,
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(limited.len(), 1);

    // Bob only sees his own credit row.
    let bobs = ledger
        .transactions_for_user("bob", &TransactionFilter::default())
        .await
        .unwrap();
    assert_eq!(bobs.len(), 1);
    assert_eq!(bobs[0].direction, Some(TransferDirection::Credit));
}

#[tokio::test]
async fn review_queue_lists_pending_oldest_first() {
    let (ledger, _db) = ledger_with_db().await;
    let method_id = mobile_money_method(&ledger).await;
    credit(&ledger, method_id, "alice", 10_000).await;

    let first = ledger
        .request_deposit(DepositCmd {
            user_id: "alice".to_string(),
            payment_method_id: method_id,
            amount_minor: 1_000,
            client_name: "Alice N.".to_string(),
            description: None,
        })
        .await
        .unwrap();
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    let second = ledger
        .request_withdrawal(WithdrawCmd {
            user_id: "alice".to_string(),
            payment_method_id: method_id,
            amount_minor: 2_000,
            pin: None,
        })
        .await
        .unwrap();

    let queue = ledger.pending_transactions(None).await.unwrap();
    assert_eq!(queue.len(), 2);
    assert_eq!(queue[0].id, first.id);
    assert_eq!(queue[1].id, second.id);

    let deposits_only = ledger
        .pending_transactions(Some(TransactionKind::Deposit))
        .await
        .unwrap();
    assert_eq!(deposits_only.len(), 1);
    assert_eq!(deposits_only[0].id, first.id);
}

#[tokio::test]
async fn payment_method_names_are_unique_case_insensitively() {
    let (ledger, _db) = ledger_with_db().await;
    mobile_money_method(&ledger).await;

    let err = ledger
        .new_payment_method(PaymentMethodNewCmd {
            name: "mtn mobile money".to_string(),
            kind: PaymentMethodKind::MobileMoney,
            instructions: None,
            account_details: AccountDetails::default(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::ExistingKey(_)));

    let methods = ledger.payment_methods(false).await.unwrap();
    assert_eq!(methods.len(), 1);
}

#[tokio::test]
async fn amounts_above_the_configured_maximum_are_rejected() {
    let (ledger, _db) = ledger_with_config(LedgerConfig {
        max_amount_minor: 5_000,
        ..Default::default()
    })
    .await;
    let method_id = mobile_money_method(&ledger).await;

    let err = ledger
        .request_deposit(DepositCmd {
            user_id: "alice".to_string(),
            payment_method_id: method_id,
            amount_minor: 5_001,
            client_name: "Alice N.".to_string(),
            description: None,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::InvalidAmount(_)));
}

#[tokio::test]
async fn wallet_is_created_lazily_and_never_negative() {
    let (ledger, _db) = ledger_with_db().await;

    assert_eq!(
        ledger.wallet("alice").await.unwrap_err(),
        LedgerError::KeyNotFound("wallet not exists".to_string())
    );

    let wallet = ledger.ensure_wallet("alice").await.unwrap();
    assert_eq!(wallet.balance.minor(), 0);
    assert_eq!(wallet.pending_balance.minor(), 0);
    assert!(wallet.is_active());

    // ensure_wallet is idempotent.
    let again = ledger.ensure_wallet("alice").await.unwrap();
    assert_eq!(again.created_at, wallet.created_at);
}

#[tokio::test]
async fn references_are_unique_across_the_ledger() {
    let (ledger, _db) = ledger_with_db().await;
    let method_id = mobile_money_method(&ledger).await;

    let mut references = std::collections::HashSet::new();
    for _ in 0..20 {
        let tx = ledger
            .request_deposit(DepositCmd {
                user_id: "alice".to_string(),
                payment_method_id: method_id,
                amount_minor: 100,
                client_name: "Alice N.".to_string(),
                description: None,
            })
            .await
            .unwrap();
        assert!(references.insert(tx.reference.clone()), "duplicate reference");
    }
}
