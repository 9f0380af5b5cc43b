// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::transactions::{TransactionRow, query_rows};
use crate::utils::require_user;
use anyhow::{Result, bail};
use rusqlite::Connection;
use std::io::Write;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("transactions", sub)) => export_transactions(conn, sub),
        _ => Ok(()),
    }
}

fn export_transactions(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let user = require_user(conn)?;
    let fmt = sub.get_one::<String>("format").unwrap().to_lowercase();
    let out = sub.get_one::<String>("out").unwrap();

    let rows = query_rows(conn, user.id, None, None)?;
    match fmt.as_str() {
        "csv" => {
            let mut file = std::fs::File::create(out)?;
            write_csv(&rows, &mut file)?;
        }
        "json" => {
            std::fs::write(out, serde_json::to_string_pretty(&rows)?)?;
        }
        _ => bail!("Unknown format: {} (use csv|json)", fmt),
    }
    println!("Exported {} transactions to {}", rows.len(), out);
    Ok(())
}

/// Fixed header then one row per transaction in list order. An empty list
/// produces exactly the header line with its trailing newline. Fields with
/// embedded delimiters get quoted by the writer.
pub fn write_csv<W: Write>(rows: &[TransactionRow], out: &mut W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(out);
    wtr.write_record(["Type", "Date", "Category", "Description", "Amount", "Currency"])?;
    for r in rows {
        wtr.write_record([
            r.kind.as_str(),
            r.date.as_str(),
            r.category.as_str(),
            r.description.as_str(),
            r.amount.as_str(),
            r.currency.as_str(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}
