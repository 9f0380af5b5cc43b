// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::Summary;
use crate::utils::{
    maybe_print_json, month_bounds, next_month, parse_month, pretty_table, prev_month,
    require_user,
};
use anyhow::{Context, Result};
use chrono::NaiveDate;
use rusqlite::{Connection, params};
use rust_decimal::Decimal;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    let user = require_user(conn)?;

    if m.get_flag("all") {
        let summary = compute_all(conn, user.id).unwrap_or_else(|e| {
            eprintln!("Error fetching summary: {:#}", e);
            Summary::zeroed()
        });
        print_summary(m, "all time", &summary)?;
        return Ok(());
    }

    let mut reference = match m.get_one::<String>("month") {
        Some(s) => parse_month(s)?,
        None => chrono::Utc::now().date_naive(),
    };
    if let Some(&offset) = m.get_one::<i32>("offset") {
        for _ in 0..offset.abs() {
            reference = if offset < 0 {
                prev_month(reference)
            } else {
                next_month(reference)
            };
        }
    }

    // A failed fetch degrades to a zeroed summary and an error on stderr; it
    // never propagates past this boundary.
    let summary = compute(conn, user.id, reference).unwrap_or_else(|e| {
        eprintln!("Error fetching summary: {:#}", e);
        Summary::zeroed()
    });
    print_summary(m, &reference.format("%B %Y").to_string(), &summary)?;
    Ok(())
}

/// Totals for the calendar month containing `reference`, both boundary days
/// inclusive.
pub fn compute(conn: &Connection, user_id: i64, reference: NaiveDate) -> Result<Summary> {
    let (first, last) = month_bounds(reference);
    let income = sum_amounts(
        conn,
        "SELECT amount FROM income WHERE user_id=?1 AND date>=?2 AND date<=?3",
        user_id,
        first,
        last,
    )?;
    let expenses = sum_amounts(
        conn,
        "SELECT amount FROM expenses WHERE user_id=?1 AND date>=?2 AND date<=?3",
        user_id,
        first,
        last,
    )?;
    Ok(Summary::new(income, expenses))
}

/// All-time totals, the dashboard variant.
pub fn compute_all(conn: &Connection, user_id: i64) -> Result<Summary> {
    let income = sum_all(conn, "SELECT amount FROM income WHERE user_id=?1", user_id)?;
    let expenses = sum_all(conn, "SELECT amount FROM expenses WHERE user_id=?1", user_id)?;
    Ok(Summary::new(income, expenses))
}

// Amounts are stored as decimal strings; summing happens here rather than in
// SQL to keep exact arithmetic.
fn sum_amounts(
    conn: &Connection,
    sql: &str,
    user_id: i64,
    first: NaiveDate,
    last: NaiveDate,
) -> Result<Decimal> {
    let mut stmt = conn.prepare(sql)?;
    let mut rows = stmt.query(params![user_id, first.to_string(), last.to_string()])?;
    let mut total = Decimal::ZERO;
    while let Some(r) = rows.next()? {
        let s: String = r.get(0)?;
        total += s
            .parse::<Decimal>()
            .with_context(|| format!("Invalid amount '{}' in ledger", s))?;
    }
    Ok(total)
}

fn sum_all(conn: &Connection, sql: &str, user_id: i64) -> Result<Decimal> {
    let mut stmt = conn.prepare(sql)?;
    let mut rows = stmt.query(params![user_id])?;
    let mut total = Decimal::ZERO;
    while let Some(r) = rows.next()? {
        let s: String = r.get(0)?;
        total += s
            .parse::<Decimal>()
            .with_context(|| format!("Invalid amount '{}' in ledger", s))?;
    }
    Ok(total)
}

fn print_summary(m: &clap::ArgMatches, period: &str, summary: &Summary) -> Result<()> {
    if !maybe_print_json(m.get_flag("json"), m.get_flag("jsonl"), summary)? {
        let rows = vec![vec![
            period.to_string(),
            format!("{:.2}", summary.income_total),
            format!("{:.2}", summary.expense_total),
            format!("{:.2}", summary.net),
        ]];
        println!(
            "{}",
            pretty_table(&["Period", "Income", "Expenses", "Net"], rows)
        );
    }
    Ok(())
}
