// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rusqlite::Connection;
use tallybook::{cli, commands::income, utils};

fn setup() -> Connection {
    let mut conn = Connection::open_in_memory().unwrap();
    tallybook::db::init_schema(&mut conn).unwrap();
    conn.execute("INSERT INTO users(id, email) VALUES (1, 'kai@example.com')", [])
        .unwrap();
    utils::set_current_user(&conn, 1).unwrap();
    conn
}

fn run_income(conn: &Connection, args: &[&str]) -> anyhow::Result<()> {
    let mut argv = vec!["tallybook", "income"];
    argv.extend_from_slice(args);
    let matches = cli::build_cli().get_matches_from(argv);
    match matches.subcommand() {
        Some(("income", m)) => income::handle(conn, m),
        _ => panic!("no income subcommand"),
    }
}

fn income_count(conn: &Connection) -> i64 {
    conn.query_row("SELECT COUNT(*) FROM income", [], |r| r.get(0))
        .unwrap()
}

#[test]
fn non_positive_amounts_are_rejected_before_insert() {
    let conn = setup();
    for bad in ["0", "-5", "abc"] {
        assert!(run_income(&conn, &["add", "--amount", bad, "--date", "2024-01-05"]).is_err());
    }
    assert_eq!(income_count(&conn), 0);
}

#[test]
fn invalid_dates_are_rejected_before_insert() {
    let conn = setup();
    assert!(run_income(&conn, &["add", "--amount", "10", "--date", "05/01/2024"]).is_err());
    assert!(run_income(&conn, &["add", "--amount", "10", "--date", "2024-02-30"]).is_err());
    assert_eq!(income_count(&conn), 0);
}

#[test]
fn client_reference_must_belong_to_the_current_user() {
    let conn = setup();
    conn.execute("INSERT INTO users(id, email) VALUES (2, 'other@example.com')", [])
        .unwrap();
    conn.execute("INSERT INTO clients(id, user_id, name) VALUES (7, 2, 'Theirs')", [])
        .unwrap();

    assert!(
        run_income(
            &conn,
            &["add", "--amount", "10", "--date", "2024-01-05", "--client", "7"],
        )
        .is_err()
    );
    assert!(
        run_income(
            &conn,
            &["add", "--amount", "10", "--date", "2024-01-05", "--client", "99"],
        )
        .is_err()
    );
    assert_eq!(income_count(&conn), 0);
}

#[test]
fn description_and_client_are_optional() {
    let conn = setup();
    run_income(&conn, &["add", "--amount", "250.75", "--date", "2024-01-05"]).unwrap();
    assert_eq!(income_count(&conn), 1);

    let rows = income_rows_from(&conn, &["list"]);
    assert_eq!(rows[0].amount, "250.75");
    assert_eq!(rows[0].client, "-");
    assert_eq!(rows[0].description, "");
}

#[test]
fn unsupported_currency_is_rejected() {
    let conn = setup();
    assert!(
        run_income(
            &conn,
            &["add", "--amount", "10", "--date", "2024-01-05", "--currency", "JPY"],
        )
        .is_err()
    );
    assert_eq!(income_count(&conn), 0);
}

fn income_rows_from(conn: &Connection, args: &[&str]) -> Vec<income::IncomeRow> {
    let mut argv = vec!["tallybook", "income"];
    argv.extend_from_slice(args);
    let matches = cli::build_cli().get_matches_from(argv);
    if let Some(("income", m)) = matches.subcommand() {
        if let Some(("list", list_m)) = m.subcommand() {
            return income::query_rows(conn, 1, list_m).unwrap();
        }
    }
    panic!("no income list subcommand");
}

#[test]
fn list_is_ordered_date_descending_and_respects_limit() {
    let conn = setup();
    run_income(&conn, &["add", "--amount", "10", "--date", "2024-01-01"]).unwrap();
    run_income(&conn, &["add", "--amount", "20", "--date", "2024-03-01"]).unwrap();
    run_income(&conn, &["add", "--amount", "30", "--date", "2024-02-01"]).unwrap();

    let rows = income_rows_from(&conn, &["list"]);
    let dates: Vec<&str> = rows.iter().map(|r| r.date.as_str()).collect();
    assert_eq!(dates, ["2024-03-01", "2024-02-01", "2024-01-01"]);

    let rows = income_rows_from(&conn, &["list", "--limit", "2"]);
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].date, "2024-03-01");

    let rows = income_rows_from(&conn, &["list", "--month", "2024-02"]);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].amount, "30");
}

#[test]
fn edit_updates_fields_by_id() {
    let conn = setup();
    run_income(&conn, &["add", "--amount", "10", "--date", "2024-01-01"]).unwrap();
    let id: i64 = conn
        .query_row("SELECT id FROM income", [], |r| r.get(0))
        .unwrap();
    conn.execute("INSERT INTO clients(id, user_id, name) VALUES (3, 1, 'Acme Ltd')", [])
        .unwrap();

    run_income(
        &conn,
        &[
            "edit",
            &id.to_string(),
            "--amount",
            "42.50",
            "--desc",
            "Retainer",
            "--client",
            "3",
        ],
    )
    .unwrap();

    let rows = income_rows_from(&conn, &["list"]);
    assert_eq!(rows[0].amount, "42.50");
    assert_eq!(rows[0].description, "Retainer");
    assert_eq!(rows[0].client, "Acme Ltd");

    run_income(&conn, &["edit", &id.to_string(), "--no-client"]).unwrap();
    let rows = income_rows_from(&conn, &["list"]);
    assert_eq!(rows[0].client, "-");

    // invalid updates leave the row untouched
    assert!(run_income(&conn, &["edit", &id.to_string(), "--amount", "-1"]).is_err());
    let rows = income_rows_from(&conn, &["list"]);
    assert_eq!(rows[0].amount, "42.50");
}

#[test]
fn rm_deletes_only_own_entries() {
    let conn = setup();
    run_income(&conn, &["add", "--amount", "10", "--date", "2024-01-01"]).unwrap();
    let id: i64 = conn
        .query_row("SELECT id FROM income", [], |r| r.get(0))
        .unwrap();

    conn.execute("INSERT INTO users(id, email) VALUES (2, 'other@example.com')", [])
        .unwrap();
    conn.execute(
        "INSERT INTO income(id, user_id, amount, date, currency) VALUES (50, 2, '99', '2024-01-01', 'USD')",
        [],
    )
    .unwrap();

    assert!(run_income(&conn, &["rm", "50", "--yes"]).is_err());
    run_income(&conn, &["rm", &id.to_string(), "--yes"]).unwrap();
    assert_eq!(income_count(&conn), 1);
}
