// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::Currency;
use crate::utils::{
    confirm, maybe_print_json, parse_date, parse_positive_amount, pretty_table, require_user,
};
use anyhow::{Result, bail};
use rusqlite::{Connection, params};
use serde::Serialize;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("edit", sub)) => edit(conn, sub)?,
        Some(("rm", sub)) => rm(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let user = require_user(conn)?;
    let amount = parse_positive_amount(sub.get_one::<String>("amount").unwrap())?;
    let date = parse_date(sub.get_one::<String>("date").unwrap())?;
    let description = sub.get_one::<String>("description").unwrap().trim();
    if description.is_empty() {
        bail!("Expense description is required");
    }
    let currency: Currency = sub.get_one::<String>("currency").unwrap().parse()?;

    conn.execute(
        "INSERT INTO expenses(user_id, description, amount, date, currency)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            user.id,
            description,
            amount.to_string(),
            date.to_string(),
            currency.as_str()
        ],
    )?;
    println!("Recorded expense {} on {}", amount, date);
    Ok(())
}

#[derive(Serialize)]
pub struct ExpenseRow {
    pub id: i64,
    pub date: String,
    pub description: String,
    pub amount: String,
    pub currency: String,
}

pub fn query_rows(
    conn: &Connection,
    user_id: i64,
    sub: &clap::ArgMatches,
) -> Result<Vec<ExpenseRow>> {
    let mut sql = String::from(
        "SELECT id, date, description, amount, currency FROM expenses WHERE user_id=?",
    );
    let mut params_vec: Vec<String> = vec![user_id.to_string()];
    if let Some(month) = sub.get_one::<String>("month") {
        sql.push_str(" AND substr(date,1,7)=?");
        params_vec.push(month.into());
    }
    sql.push_str(" ORDER BY date DESC, id DESC");
    if let Some(limit) = sub.get_one::<usize>("limit") {
        sql.push_str(" LIMIT ?");
        params_vec.push(limit.to_string());
    }

    let mut stmt = conn.prepare(&sql)?;
    let params: Vec<&dyn rusqlite::ToSql> = params_vec
        .iter()
        .map(|s| s as &dyn rusqlite::ToSql)
        .collect();
    let mut rows = stmt.query(rusqlite::params_from_iter(params))?;

    let mut data = Vec::new();
    while let Some(r) = rows.next()? {
        data.push(ExpenseRow {
            id: r.get(0)?,
            date: r.get(1)?,
            description: r.get(2)?,
            amount: r.get(3)?,
            currency: r.get(4)?,
        });
    }
    Ok(data)
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let user = require_user(conn)?;
    let data = query_rows(conn, user.id, sub)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let rows = data
            .iter()
            .map(|r| {
                vec![
                    r.id.to_string(),
                    r.date.clone(),
                    r.description.clone(),
                    r.amount.clone(),
                    r.currency.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Id", "Date", "Description", "Amount", "CCY"], rows)
        );
    }
    Ok(())
}

fn edit(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let user = require_user(conn)?;
    let id = *sub.get_one::<i64>("id").unwrap();

    let mut sets: Vec<&str> = Vec::new();
    let mut values: Vec<String> = Vec::new();
    if let Some(amount) = sub.get_one::<String>("amount") {
        sets.push("amount=?");
        values.push(parse_positive_amount(amount)?.to_string());
    }
    if let Some(date) = sub.get_one::<String>("date") {
        sets.push("date=?");
        values.push(parse_date(date)?.to_string());
    }
    if let Some(desc) = sub.get_one::<String>("description") {
        let desc = desc.trim();
        if desc.is_empty() {
            bail!("Expense description is required");
        }
        sets.push("description=?");
        values.push(desc.to_string());
    }
    if let Some(ccy) = sub.get_one::<String>("currency") {
        sets.push("currency=?");
        values.push(ccy.parse::<Currency>()?.as_str().to_string());
    }
    if sets.is_empty() {
        bail!("Nothing to update (pass --amount, --date, --desc or --currency)");
    }

    let sql = format!(
        "UPDATE expenses SET {} WHERE id=? AND user_id=?",
        sets.join(", ")
    );
    values.push(id.to_string());
    values.push(user.id.to_string());
    let params: Vec<&dyn rusqlite::ToSql> =
        values.iter().map(|s| s as &dyn rusqlite::ToSql).collect();
    let changed = conn.execute(&sql, rusqlite::params_from_iter(params))?;
    if changed == 0 {
        bail!("Expense entry {} not found for the current profile", id);
    }
    println!("Updated expense entry {}", id);
    Ok(())
}

fn rm(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let user = require_user(conn)?;
    let id = *sub.get_one::<i64>("id").unwrap();
    if !sub.get_flag("yes") && !confirm(&format!("Delete expense entry {}?", id))? {
        println!("Aborted");
        return Ok(());
    }
    let changed = conn.execute(
        "DELETE FROM expenses WHERE id=?1 AND user_id=?2",
        params![id, user.id],
    )?;
    if changed == 0 {
        bail!("Expense entry {} not found for the current profile", id);
    }
    println!("Deleted expense entry {}", id);
    Ok(())
}
