// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rusqlite::Connection;
use tallybook::commands::exporter::{self, write_csv};
use tallybook::commands::transactions::TransactionRow;
use tallybook::{cli, utils};
use tempfile::tempdir;

fn setup() -> Connection {
    let mut conn = Connection::open_in_memory().unwrap();
    tallybook::db::init_schema(&mut conn).unwrap();
    conn.execute("INSERT INTO users(id, email) VALUES (1, 'kai@example.com')", [])
        .unwrap();
    utils::set_current_user(&conn, 1).unwrap();
    conn
}

fn row(
    kind: &str,
    date: &str,
    category: &str,
    description: &str,
    amount: &str,
) -> TransactionRow {
    TransactionRow {
        kind: kind.parse().unwrap(),
        date: date.to_string(),
        category: category.to_string(),
        description: description.to_string(),
        amount: amount.to_string(),
        currency: "USD".to_string(),
    }
}

#[test]
fn empty_list_yields_exactly_the_header_line() {
    let mut out = Vec::new();
    write_csv(&[], &mut out).unwrap();
    assert_eq!(
        String::from_utf8(out).unwrap(),
        "Type,Date,Category,Description,Amount,Currency\n"
    );
}

#[test]
fn rows_are_written_comma_joined_in_list_order() {
    let rows = vec![
        row("income", "2024-01-05", "Client A", "Payment", "100"),
        row("expense", "2024-01-06", "-", "Supplies", "25"),
    ];
    let mut out = Vec::new();
    write_csv(&rows, &mut out).unwrap();
    assert_eq!(
        String::from_utf8(out).unwrap(),
        "Type,Date,Category,Description,Amount,Currency\n\
         income,2024-01-05,Client A,Payment,100,USD\n\
         expense,2024-01-06,-,Supplies,25,USD\n"
    );
}

#[test]
fn export_writes_the_unified_list_newest_first() {
    let conn = setup();
    conn.execute("INSERT INTO clients(id, user_id, name) VALUES (1, 1, 'Client A')", [])
        .unwrap();
    conn.execute(
        "INSERT INTO income(user_id, description, amount, date, client_id, currency)
         VALUES (1, 'Payment', '100', '2024-01-05', 1, 'USD')",
        [],
    )
    .unwrap();
    conn.execute(
        "INSERT INTO expenses(user_id, description, amount, date, currency)
         VALUES (1, 'Supplies', '25', '2024-01-06', 'USD')",
        [],
    )
    .unwrap();

    let dir = tempdir().unwrap();
    let out_path = dir.path().join("transactions.csv");
    let out_str = out_path.to_string_lossy().to_string();

    let matches = cli::build_cli().get_matches_from([
        "tallybook",
        "export",
        "transactions",
        "--out",
        &out_str,
    ]);
    if let Some(("export", export_m)) = matches.subcommand() {
        exporter::handle(&conn, export_m).unwrap();
    } else {
        panic!("no export subcommand");
    }

    let contents = std::fs::read_to_string(&out_path).unwrap();
    assert_eq!(
        contents,
        "Type,Date,Category,Description,Amount,Currency\n\
         expense,2024-01-06,-,Supplies,25,USD\n\
         income,2024-01-05,Client A,Payment,100,USD\n"
    );
}

#[test]
fn export_transactions_as_json() {
    let conn = setup();
    conn.execute(
        "INSERT INTO expenses(user_id, description, amount, date, currency)
         VALUES (1, 'Supplies', '25', '2024-01-06', 'EUR')",
        [],
    )
    .unwrap();

    let dir = tempdir().unwrap();
    let out_path = dir.path().join("export.json");
    let out_str = out_path.to_string_lossy().to_string();

    let matches = cli::build_cli().get_matches_from([
        "tallybook",
        "export",
        "transactions",
        "--format",
        "json",
        "--out",
        &out_str,
    ]);
    if let Some(("export", export_m)) = matches.subcommand() {
        exporter::handle(&conn, export_m).unwrap();
    } else {
        panic!("no export subcommand");
    }

    let contents = std::fs::read_to_string(&out_path).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&contents).unwrap();
    assert_eq!(
        parsed,
        serde_json::json!([
            {
                "type": "expense",
                "date": "2024-01-06",
                "category": "-",
                "description": "Supplies",
                "amount": "25",
                "currency": "EUR"
            }
        ])
    );
}

#[test]
fn export_rejects_unknown_format() {
    let conn = setup();
    let dir = tempdir().unwrap();
    let out_path = dir.path().join("export.unknown");
    let out_str = out_path.to_string_lossy().to_string();

    let matches = cli::build_cli().get_matches_from([
        "tallybook",
        "export",
        "transactions",
        "--format",
        "xml",
        "--out",
        &out_str,
    ]);
    if let Some(("export", export_m)) = matches.subcommand() {
        assert!(exporter::handle(&conn, export_m).is_err());
    } else {
        panic!("no export subcommand");
    }
    assert!(!out_path.exists());
}
