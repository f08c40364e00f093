use clap::error::ErrorKind;
use clap::Parser;
use serde_json::Value;
use std::path::Path;
use stockledger_cli::commands::CommandResult;
use stockledger_cli::{execute, Cli};

const MISSING_ID: &str = "5f0c2a52-8a8e-4bd4-9c3c-3b4f1d7a9e10";

fn invoke(db: &Path, args: &[&str]) -> (CommandResult, Value) {
    let db = db.to_str().unwrap();
    let argv: Vec<&str> = ["stockledger", "--db", db]
        .into_iter()
        .chain(args.iter().copied())
        .collect();
    let cli = Cli::try_parse_from(argv).unwrap();
    let result = execute(cli);
    let payload = parse_payload(&result.output);
    (result, payload)
}

fn parse_payload(output: &str) -> Value {
    serde_json::from_str(output).unwrap_or_else(|err| panic!("invalid json {output}: {err}"))
}

fn create_tv(db: &Path, stock: &str) -> String {
    let (result, payload) = invoke(
        db,
        &[
            "product",
            "create",
            "--code",
            "TV-55",
            "--description",
            "55 inch TV",
            "--category",
            "electronic",
            "--supplier-cost",
            "100.00",
            "--stock",
            stock,
        ],
    );
    assert_eq!(result.exit_code, 0, "{}", result.output);
    payload["data"]["id"].as_str().unwrap().to_string()
}

#[test]
fn product_create_returns_ok_envelope() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("ledger.sqlite3");

    let id = create_tv(&db, "3");
    let (result, payload) = invoke(&db, &["product", "get", &id]);

    assert_eq!(result.exit_code, 0);
    assert_eq!(payload["command"], "product get");
    assert_eq!(payload["status"], "ok");
    assert!(payload["error_class"].is_null());
    assert_eq!(payload["data"]["stock_quantity"], 3);
    assert_eq!(payload["data"]["supplier_cost"], "100.00");
}

#[test]
fn full_flow_reports_profit() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("ledger.sqlite3");
    let id = create_tv(&db, "0");
    let id = id.as_str();

    for args in [
        vec!["movement", "register", "--product", id, "--kind", "incoming", "--quantity", "10"],
        vec![
            "movement", "register", "--product", id, "--kind", "outgoing", "--quantity", "5",
            "--sale-amount", "15.00",
        ],
        vec![
            "movement", "register", "--product", id, "--kind", "outgoing", "--quantity", "2",
            "--sale-amount", "18.00",
        ],
    ] {
        let (result, _) = invoke(&db, &args);
        assert_eq!(result.exit_code, 0, "{}", result.output);
    }

    let (_, product) = invoke(&db, &["product", "get", id]);
    assert_eq!(product["data"]["stock_quantity"], 3);

    let (result, report) = invoke(&db, &["product", "profit", id]);
    assert_eq!(result.exit_code, 0);
    assert_eq!(report["data"]["unit_cost"], "10.00");
    assert_eq!(report["data"]["average_sale_price"], "15.86");
    assert_eq!(report["data"]["unit_profit"], "5.86");
    assert_eq!(report["data"]["total_profit"], "41.00");

    let (_, history) = invoke(&db, &["movement", "list", "--product", id]);
    assert_eq!(history["data"].as_array().unwrap().len(), 3);
    assert_eq!(history["data"][0]["kind"], "incoming");
}

#[test]
fn insufficient_stock_exits_with_validation_code() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("ledger.sqlite3");
    let id = create_tv(&db, "1");

    let (result, payload) = invoke(
        &db,
        &[
            "movement", "register", "--product", &id, "--kind", "outgoing", "--quantity", "2",
            "--sale-amount", "20.00",
        ],
    );

    assert_eq!(result.exit_code, 2);
    assert_eq!(payload["command"], "movement register");
    assert_eq!(payload["status"], "error");
    assert_eq!(payload["error_class"], "insufficient_stock");
    assert!(payload["data"].is_null());
}

#[test]
fn unknown_kind_is_reported_as_invalid_movement_kind() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("ledger.sqlite3");
    let id = create_tv(&db, "1");

    let (result, payload) = invoke(
        &db,
        &["movement", "register", "--product", &id, "--kind", "transfer", "--quantity", "1"],
    );

    assert_eq!(result.exit_code, 2);
    assert_eq!(payload["error_class"], "invalid_movement_kind");
}

#[test]
fn negative_sale_amount_is_a_validation_failure() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("ledger.sqlite3");
    let id = create_tv(&db, "1");

    let (result, payload) = invoke(
        &db,
        &[
            "movement", "register", "--product", &id, "--kind", "outgoing", "--quantity", "1",
            "--sale-amount", "-1.00",
        ],
    );

    assert_eq!(result.exit_code, 2);
    assert_eq!(payload["error_class"], "validation_failed");
}

#[test]
fn oversized_sale_amount_keeps_profit_query_usable() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("ledger.sqlite3");
    let id = create_tv(&db, "2");

    let (result, payload) = invoke(
        &db,
        &[
            "movement",
            "register",
            "--product",
            &id,
            "--kind",
            "outgoing",
            "--quantity",
            "2",
            "--sale-amount",
            "79228162514264337593543950335",
        ],
    );
    assert_eq!(result.exit_code, 2);
    assert_eq!(payload["error_class"], "validation_failed");

    let (result, payload) = invoke(&db, &["product", "profit", &id]);
    assert_eq!(result.exit_code, 0, "{}", result.output);
    assert_eq!(payload["data"]["outgoing_quantity"], 0);
}

#[test]
fn missing_records_exit_with_not_found_code() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("ledger.sqlite3");

    let (result, payload) = invoke(&db, &["product", "profit", MISSING_ID]);
    assert_eq!(result.exit_code, 3);
    assert_eq!(payload["error_class"], "product_not_found");

    let (result, payload) = invoke(&db, &["movement", "get", MISSING_ID]);
    assert_eq!(result.exit_code, 3);
    assert_eq!(payload["error_class"], "movement_not_found");
}

#[test]
fn list_filters_by_category_and_rejects_unknown_category() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("ledger.sqlite3");
    create_tv(&db, "0");

    let (_, electronics) = invoke(&db, &["product", "list", "--category", "Electronic"]);
    assert_eq!(electronics["data"].as_array().unwrap().len(), 1);

    let (_, furniture) = invoke(&db, &["product", "list", "--category", "furniture"]);
    assert!(furniture["data"].as_array().unwrap().is_empty());

    let (result, payload) = invoke(&db, &["product", "list", "--category", "toys"]);
    assert_eq!(result.exit_code, 2);
    assert_eq!(payload["error_class"], "validation_failed");
}

#[test]
fn update_keeps_stock_and_delete_is_guarded_by_history() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("ledger.sqlite3");
    let id = create_tv(&db, "4");

    let (result, updated) = invoke(
        &db,
        &[
            "product",
            "update",
            &id,
            "--code",
            "TV-65",
            "--description",
            "65 inch TV",
            "--category",
            "electronic",
            "--supplier-cost",
            "180.00",
        ],
    );
    assert_eq!(result.exit_code, 0, "{}", result.output);
    assert_eq!(updated["data"]["code"], "TV-65");
    assert_eq!(updated["data"]["stock_quantity"], 4);

    invoke(
        &db,
        &["movement", "register", "--product", &id, "--kind", "incoming", "--quantity", "1"],
    );
    let (result, payload) = invoke(&db, &["product", "delete", &id]);
    assert_eq!(result.exit_code, 2);
    assert_eq!(payload["error_class"], "operation_not_allowed");
}

#[test]
fn invalid_log_level_is_a_config_error() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("ledger.sqlite3");

    let (result, payload) = invoke(&db, &["--log-level", "loud", "product", "list"]);
    assert_eq!(result.exit_code, 2);
    assert_eq!(payload["error_class"], "config_validation");
}

#[test]
fn malformed_id_is_rejected_by_argument_parsing() {
    let parsed = Cli::try_parse_from(["stockledger", "product", "get", "not-a-uuid"]);
    assert!(parsed.is_err());
}

#[test]
fn version_flag_reports_core_version() {
    let err = Cli::try_parse_from(["stockledger", "--version"]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DisplayVersion);
    assert!(err
        .to_string()
        .contains(stockledger_core::core_version()));
}
