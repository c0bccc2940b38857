//! Integration tests for the auction house CLI
//!
//! These replay scenario files from disk through the same path as
//! `auctionhouse run`.

use std::path::{Path, PathBuf};

use auctionhouse_cli::commands::{resolve_config, run, run_scenario};
use auctionhouse_cli::Scenario;
use auctionhouse_core::{Money, StatusKind};
use auctionhouse_engine::LotStatus;
use rust_decimal_macros::dec;
use tempfile::TempDir;

fn bundled_scenario() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("scenarios/bicycle.json")
}

fn write(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, contents).unwrap();
    path
}

/// Test: the bundled scenario sells the bicycle for 100.00
#[test]
fn test_bundled_scenario() {
    let scenario = Scenario::from_file(bundled_scenario()).unwrap();
    let config = resolve_config(&scenario, None).unwrap();
    let report = run_scenario(&scenario, config);

    let kinds: Vec<StatusKind> = report.statuses().map(|status| status.kind).collect();
    // the 75.00 bid is below 70.00 + increment
    assert_eq!(kinds[12], StatusKind::Error);
    assert_eq!(kinds[14], StatusKind::Sale);
    assert_eq!(kinds.iter().filter(|kind| **kind == StatusKind::Error).count(), 1);

    let close = &report.steps[14];
    assert_eq!(close.transfers.len(), 2);
    assert_eq!(close.transfers[0].request.amount, Money::new(dec!(110)));
    assert_eq!(close.transfers[1].request.amount, Money::new(dec!(85)));

    let first_view = report.steps[9].catalogue.as_ref().unwrap();
    assert_eq!(first_view.len(), 3);
    assert!(first_view.iter().all(|entry| entry.status == LotStatus::Unopened));

    assert_eq!(report.catalogue[0].status, LotStatus::Sold);
    assert_eq!(report.catalogue[1].status, LotStatus::Unopened);
}

/// Test: a config file on the command line overrides the scenario's own config
#[test]
fn test_config_file_overrides_scenario() {
    let dir = TempDir::new().unwrap();
    let config_path = write(&dir, "house.json", r#"{ "buyer_premium": "20" }"#);

    let mut scenario = Scenario::from_file(bundled_scenario()).unwrap();
    scenario.config = Some(Default::default());

    let config = resolve_config(&scenario, Some(config_path.as_path())).unwrap();
    assert_eq!(config.buyer_premium, dec!(20));

    let report = run_scenario(&scenario, config);
    let close = &report.steps[14];
    assert_eq!(close.transfers[0].request.amount, Money::new(dec!(120)));
}

/// Test: a declined buyer payment leaves the lot pending
#[test]
fn test_failing_account_from_scenario() {
    let dir = TempDir::new().unwrap();
    let path = write(
        &dir,
        "pending.json",
        r#"{
            "failing_accounts": ["BB A/C"],
            "steps": [
                { "action": "register_seller", "name": "SellerY", "address": "@SellerY", "bank_account": "SY A/C" },
                { "action": "add_lot", "seller": "SellerY", "number": 1, "description": "Bicycle", "reserve_price": "80.00" },
                { "action": "register_buyer", "name": "BuyerB", "address": "@BuyerB", "bank_account": "BB A/C", "auth_code": "BB-auth" },
                { "action": "note_interest", "buyer": "BuyerB", "lot": 1 },
                { "action": "open_auction", "auctioneer": "Auctioneer1", "address": "@Auctioneer1", "lot": 1 },
                { "action": "make_bid", "buyer": "BuyerB", "lot": 1, "amount": "90.00" },
                { "action": "close_auction", "auctioneer": "Auctioneer1", "lot": 1 }
            ]
        }"#,
    );

    let scenario = Scenario::from_file(&path).unwrap();
    let report = run_scenario(&scenario, resolve_config(&scenario, None).unwrap());

    let close = report.steps.last().unwrap();
    assert_eq!(close.status.kind, StatusKind::SalePendingPayment);
    assert_eq!(close.transfers.len(), 1);
    assert_eq!(report.catalogue[0].status, LotStatus::SoldPendingPayment);
}

/// Test: the run command succeeds in both output modes
#[test]
fn test_run_command() {
    run(&bundled_scenario(), None, false).unwrap();
    run(&bundled_scenario(), None, true).unwrap();
}

/// Test: missing and malformed inputs are reported as errors
#[test]
fn test_run_command_errors() {
    let dir = TempDir::new().unwrap();
    assert!(run(&dir.path().join("missing.json"), None, false).is_err());

    let broken = write(&dir, "broken.json", "{ \"steps\": [");
    assert!(run(&broken, None, false).is_err());

    let bad_config = write(&dir, "bad.json", r#"{ "commission": "150" }"#);
    assert!(run(&bundled_scenario(), Some(bad_config.as_path()), false).is_err());
}
