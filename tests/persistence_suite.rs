use budgie_core::domain::paycheck::{FilingStatus, PayFrequency, Paycheck};
use budgie_core::domain::recurrence::Frequency;
use budgie_core::domain::savings::SavingsAccount;
use budgie_core::domain::transaction::{Transaction, TransactionKind};
use budgie_core::errors::BudgetError;
use budgie_core::ledger::Ledger;
use budgie_core::portfolio::CryptoHolding;
use budgie_core::storage::{JsonStorage, StorageBackend};
use chrono::NaiveDate;
use serde_json::Value;
use std::fs;
use tempfile::TempDir;
use uuid::Uuid;

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

fn storage_with_temp_dir() -> (JsonStorage, TempDir) {
    let temp = TempDir::new().expect("temp dir");
    let storage = JsonStorage::new(Some(temp.path().to_path_buf()), Some(3)).expect("json storage");
    (storage, temp)
}

fn populated_ledger() -> Ledger {
    let mut ledger = Ledger::new();
    ledger
        .add_transaction(
            Transaction::new(
                "Rent",
                1_200.0,
                TransactionKind::Expense,
                Frequency::Monthly,
                date(2024, 1, 31),
                "housing",
                Some(date(2025, 1, 31)),
            )
            .unwrap(),
        )
        .unwrap();
    ledger
        .add_paycheck(
            Paycheck::new(
                "Acme",
                20.0,
                40.0,
                PayFrequency::BiWeekly,
                date(2024, 1, 5),
                None,
                FilingStatus::MarriedJoint,
                2,
                75.0,
                20.0,
            )
            .unwrap(),
        )
        .unwrap();
    ledger
        .add_savings_account(SavingsAccount::new("Emergency", 2_500.0, 0.04).unwrap())
        .unwrap();
    ledger.crypto_portfolio.add_holding(CryptoHolding {
        id: Uuid::new_v4(),
        symbol: "BTC".into(),
        name: "Bitcoin".into(),
        amount: 0.25,
        purchase_price: 20_000.0,
        purchase_date: Some(date(2023, 11, 2)),
        current_price: 0.0,
    });
    ledger
}

#[test]
fn transaction_round_trips_across_all_frequencies() {
    let frequencies = [
        Frequency::OneTime,
        Frequency::Daily,
        Frequency::Weekly,
        Frequency::BiWeekly,
        Frequency::Monthly,
        Frequency::Yearly,
    ];
    for frequency in frequencies {
        for end_date in [None, Some(date(2025, 12, 31))] {
            let original = Transaction::new(
                "Sample",
                55.5,
                TransactionKind::Expense,
                frequency,
                date(2024, 3, 1),
                "misc",
                end_date,
            )
            .unwrap();
            let encoded = serde_json::to_string(&original).unwrap();
            let decoded: Transaction = serde_json::from_str(&encoded).unwrap();
            assert_eq!(decoded, original, "{frequency:?} / {end_date:?}");
        }
    }
}

#[test]
fn paycheck_round_trips_across_all_frequencies() {
    let frequencies = [
        PayFrequency::Daily,
        PayFrequency::Weekly,
        PayFrequency::BiWeekly,
        PayFrequency::Monthly,
    ];
    for frequency in frequencies {
        for end_date in [None, Some(date(2026, 1, 1))] {
            let original = Paycheck::new(
                "Acme",
                31.25,
                37.5,
                frequency,
                date(2024, 2, 9),
                end_date,
                FilingStatus::HeadOfHousehold,
                0,
                12.5,
                3.0,
            )
            .unwrap();
            let encoded = serde_json::to_string(&original).unwrap();
            let decoded: Paycheck = serde_json::from_str(&encoded).unwrap();
            assert_eq!(decoded, original, "{frequency:?} / {end_date:?}");
        }
    }
}

#[test]
fn full_ledger_round_trips_through_storage() {
    let (storage, _guard) = storage_with_temp_dir();
    let ledger = populated_ledger();
    storage.save(&ledger, "household").expect("save ledger");
    let loaded = storage.load("household").expect("load ledger");

    let original_json: Value = serde_json::to_value(&ledger).unwrap();
    let loaded_json: Value = serde_json::to_value(&loaded).unwrap();
    assert_eq!(original_json, loaded_json);

    // Identity survives the round trip, so removal still works.
    let transaction_id = ledger.transactions[0].id;
    let mut loaded = loaded;
    assert_eq!(loaded.transactions[0].id, transaction_id);
    loaded.remove_transaction(transaction_id).expect("remove");
}

#[test]
fn corrupt_file_surfaces_error_instead_of_empty_ledger() {
    let (storage, _guard) = storage_with_temp_dir();
    let path = storage.ledger_path("damaged");
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, "{\"transactions\": [{\"name\": 3}]}").unwrap();
    let err = storage.load("damaged").expect_err("load must fail");
    assert!(matches!(err, BudgetError::Serde(_)));
}

#[test]
fn missing_file_surfaces_error() {
    let (storage, _guard) = storage_with_temp_dir();
    let err = storage.load("absent").expect_err("load must fail");
    assert!(matches!(err, BudgetError::Storage(_)));
}

#[test]
fn save_to_explicit_path_round_trips() {
    let (storage, guard) = storage_with_temp_dir();
    let ledger = populated_ledger();
    let path = guard.path().join("exported.json");
    storage.save_to_path(&ledger, &path).expect("save to path");
    let loaded = storage.load_from_path(&path).expect("load from path");
    assert_eq!(
        serde_json::to_value(&ledger).unwrap(),
        serde_json::to_value(&loaded).unwrap()
    );
}

#[test]
fn legacy_json_without_optional_sections_still_loads() {
    let raw = r#"{
        "transactions": [{
            "name": "Rent",
            "amount": 1200.0,
            "transaction_type": "expense",
            "frequency": "monthly",
            "start_date": "2024-01-31",
            "end_date": null,
            "category": "housing"
        }],
        "paychecks": []
    }"#;
    let ledger: Ledger = serde_json::from_str(raw).unwrap();
    assert_eq!(ledger.transactions.len(), 1);
    assert!(ledger.savings_accounts.is_empty());
    assert!(ledger.crypto_portfolio.holdings.is_empty());
    assert!(ledger.transactions[0].occurs_on(date(2024, 2, 29)));
}
