// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rusqlite::Connection;

use coinquest::cli::build_cli;
use coinquest::commands::exporter;
use coinquest::db::init_schema;

fn conn() -> Connection {
    let mut c = Connection::open_in_memory().unwrap();
    init_schema(&mut c).unwrap();
    c.execute(
        "INSERT INTO transactions(kind, amount, currency, category, merchant, date, notes)
         VALUES ('expense', '12.50', 'USD', 'Food', 'Corner deli', '2025-08-14', 'lunch')",
        [],
    )
    .unwrap();
    c.execute(
        "INSERT INTO transactions(kind, amount, currency, category, date)
         VALUES ('income', '2500', 'USD', 'Salary', '2025-08-15')",
        [],
    )
    .unwrap();
    c
}

fn export_args(argv: &[&str]) -> clap::ArgMatches {
    let mut full = vec!["coinquest", "export"];
    full.extend_from_slice(argv);
    let m = build_cli().get_matches_from(full);
    let (name, sub) = m.subcommand().unwrap();
    assert_eq!(name, "export");
    sub.clone()
}

#[test]
fn csv_export_writes_header_and_rows() {
    let c = conn();
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("txs.csv");
    exporter::handle(
        &c,
        &export_args(&["transactions", "--format", "csv", "--out", out.to_str().unwrap()]),
    )
    .unwrap();

    let body = std::fs::read_to_string(&out).unwrap();
    let mut lines = body.lines();
    assert_eq!(
        lines.next().unwrap(),
        "date,kind,amount,currency,category,merchant,method,notes"
    );
    assert_eq!(lines.clone().count(), 2);
    assert!(body.contains("2025-08-14,expense,12.50,USD,Food,Corner deli,,lunch"));
}

#[test]
fn json_export_is_a_parseable_array() {
    let c = conn();
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("txs.json");
    exporter::handle(
        &c,
        &export_args(&["transactions", "--format", "json", "--out", out.to_str().unwrap()]),
    )
    .unwrap();

    let body = std::fs::read_to_string(&out).unwrap();
    let items: Vec<serde_json::Value> = serde_json::from_str(&body).unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["category"], "Food");
    assert_eq!(items[1]["amount"], "2500");
    assert!(items[1]["merchant"].is_null());
}
