// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result, bail};
use chrono::{Datelike, Months, NaiveDate};
use comfy_table::{Cell, Table, presets::UTF8_FULL};
use rusqlite::{Connection, OptionalExtension, params};
use rust_decimal::Decimal;

use crate::models::User;

pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", s))
}

/// Parse a `YYYY-MM` month into the first day of that month.
pub fn parse_month(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(&format!("{}-01", s), "%Y-%m-%d")
        .with_context(|| format!("Invalid month '{}', expected YYYY-MM", s))
}

pub fn parse_decimal(s: &str) -> Result<Decimal> {
    s.parse::<Decimal>()
        .with_context(|| format!("Invalid decimal '{}'", s))
}

/// Amounts on both ledgers must be strictly positive; this runs before any
/// row is written.
pub fn parse_positive_amount(s: &str) -> Result<Decimal> {
    let d = parse_decimal(s)?;
    if d <= Decimal::ZERO {
        bail!("Amount must be positive, got '{}'", s);
    }
    Ok(d)
}

pub fn fmt_money(d: &Decimal, ccy: &str) -> String {
    format!("{} {:.2}", ccy, d)
}

/// First and last calendar day of the month containing `reference`, both
/// inclusive.
pub fn month_bounds(reference: NaiveDate) -> (NaiveDate, NaiveDate) {
    let first = reference
        .with_day(1)
        .expect("day 1 is valid for every month");
    let last = first
        .checked_add_months(Months::new(1))
        .and_then(|d| d.pred_opt())
        .expect("month end within chrono range");
    (first, last)
}

pub fn prev_month(reference: NaiveDate) -> NaiveDate {
    reference
        .checked_sub_months(Months::new(1))
        .expect("month within chrono range")
}

pub fn next_month(reference: NaiveDate) -> NaiveDate {
    reference
        .checked_add_months(Months::new(1))
        .expect("month within chrono range")
}

pub fn pretty_table(headers: &[&str], rows: Vec<Vec<String>>) -> Table {
    let mut t = Table::new();
    t.load_preset(UTF8_FULL);
    t.set_header(headers.iter().map(|h| Cell::new(*h)));
    for r in rows {
        t.add_row(r.into_iter().map(Cell::new));
    }
    t
}

pub fn maybe_print_json<T: serde::Serialize>(
    json_flag: bool,
    jsonl_flag: bool,
    v: &T,
) -> Result<bool> {
    if json_flag {
        println!("{}", serde_json::to_string_pretty(v)?);
        return Ok(true);
    }
    if jsonl_flag {
        // If v is an array, stream each element; else stream single line
        let val = serde_json::to_value(v)?;
        if let Some(arr) = val.as_array() {
            for item in arr {
                println!("{}", serde_json::to_string(item)?);
            }
        } else {
            println!("{}", serde_json::to_string(&val)?);
        }
        return Ok(true);
    }
    Ok(false)
}

// Active profile, stored in settings like any other scalar preference.
pub fn current_user(conn: &Connection) -> Result<Option<User>> {
    let id: Option<i64> = conn
        .query_row(
            "SELECT value FROM settings WHERE key='current_user'",
            [],
            |r| r.get::<_, String>(0),
        )
        .optional()?
        .map(|s| s.parse::<i64>())
        .transpose()
        .context("Corrupt current_user setting")?;
    let Some(id) = id else {
        return Ok(None);
    };
    let user = conn
        .query_row("SELECT id, email FROM users WHERE id=?1", params![id], |r| {
            Ok(User {
                id: r.get(0)?,
                email: r.get(1)?,
            })
        })
        .optional()?;
    Ok(user)
}

/// Session gate: every data command goes through here before touching a
/// ledger table.
pub fn require_user(conn: &Connection) -> Result<User> {
    current_user(conn)?.context("Not signed in. Run 'tallybook login <email>' first")
}

pub fn set_current_user(conn: &Connection, user_id: i64) -> Result<()> {
    conn.execute(
        "INSERT INTO settings(key, value) VALUES('current_user', ?1)
         ON CONFLICT(key) DO UPDATE SET value=excluded.value",
        params![user_id.to_string()],
    )?;
    Ok(())
}

pub fn clear_current_user(conn: &Connection) -> Result<()> {
    conn.execute("DELETE FROM settings WHERE key='current_user'", [])?;
    Ok(())
}

/// A client referenced by an income entry must belong to the referencing
/// user; dangling references are only ever produced by deletes, never by
/// inserts or updates.
pub fn client_owned_by(conn: &Connection, client_id: i64, user_id: i64) -> Result<i64> {
    let mut stmt = conn.prepare("SELECT id FROM clients WHERE id=?1 AND user_id=?2")?;
    let id: i64 = stmt
        .query_row(params![client_id, user_id], |r| r.get(0))
        .with_context(|| format!("Client {} not found for the current profile", client_id))?;
    Ok(id)
}

/// Destructive commands prompt unless --yes was passed.
pub fn confirm(prompt: &str) -> Result<bool> {
    use std::io::Write;
    print!("{} [y/N] ", prompt);
    std::io::stdout().flush()?;
    let mut answer = String::new();
    std::io::stdin().read_line(&mut answer)?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes"))
}

/// Resolve a client reference for display. `None` when the entry has no
/// client; dangling ids degrade to "Unknown Client".
pub fn client_display(client_id: Option<i64>, resolved_name: Option<String>) -> String {
    match (client_id, resolved_name) {
        (None, _) => "-".to_string(),
        (Some(_), Some(name)) => name,
        (Some(_), None) => "Unknown Client".to_string(),
    }
}
