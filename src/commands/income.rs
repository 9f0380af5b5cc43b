// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::Currency;
use crate::utils::{
    client_display, client_owned_by, confirm, maybe_print_json, parse_date, parse_positive_amount,
    pretty_table, require_user,
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
    let description = sub.get_one::<String>("description").map(|s| s.to_string());
    let currency: Currency = sub.get_one::<String>("currency").unwrap().parse()?;
    let client_id = match sub.get_one::<i64>("client") {
        Some(&id) => Some(client_owned_by(conn, id, user.id)?),
        None => None,
    };

    conn.execute(
        "INSERT INTO income(user_id, description, amount, date, client_id, currency)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            user.id,
            description,
            amount.to_string(),
            date.to_string(),
            client_id,
            currency.as_str()
        ],
    )?;
    println!("Recorded income {} on {}", amount, date);
    Ok(())
}

#[derive(Serialize)]
pub struct IncomeRow {
    pub id: i64,
    pub date: String,
    pub description: String,
    pub amount: String,
    pub currency: String,
    pub client: String,
}

pub fn query_rows(conn: &Connection, user_id: i64, sub: &clap::ArgMatches) -> Result<Vec<IncomeRow>> {
    let mut sql = String::from(
        "SELECT i.id, i.date, i.description, i.amount, i.currency, i.client_id, c.name
         FROM income i LEFT JOIN clients c ON i.client_id=c.id
         WHERE i.user_id=?",
    );
    let mut params_vec: Vec<String> = vec![user_id.to_string()];
    if let Some(month) = sub.get_one::<String>("month") {
        sql.push_str(" AND substr(i.date,1,7)=?");
        params_vec.push(month.into());
    }
    sql.push_str(" ORDER BY i.date DESC, i.id DESC");
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
        let client_id: Option<i64> = r.get(5)?;
        let client_name: Option<String> = r.get(6)?;
        data.push(IncomeRow {
            id: r.get(0)?,
            date: r.get(1)?,
            description: r.get::<_, Option<String>>(2)?.unwrap_or_default(),
            amount: r.get(3)?,
            currency: r.get(4)?,
            client: client_display(client_id, client_name),
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
                    r.client.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Id", "Date", "Description", "Amount", "CCY", "Client"], rows)
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
        sets.push("description=?");
        values.push(desc.clone());
    }
    if let Some(ccy) = sub.get_one::<String>("currency") {
        sets.push("currency=?");
        values.push(ccy.parse::<Currency>()?.as_str().to_string());
    }

    // client changes go through separate statements: NULL and integer binds
    // do not mix well with the string-typed positional vector above
    let client_change: Option<Option<i64>> = if sub.get_flag("no-client") {
        Some(None)
    } else if let Some(&cid) = sub.get_one::<i64>("client") {
        Some(Some(client_owned_by(conn, cid, user.id)?))
    } else {
        None
    };

    if sets.is_empty() && client_change.is_none() {
        bail!("Nothing to update (pass --amount, --date, --desc, --client or --no-client)");
    }

    let mut changed = 0;
    if !sets.is_empty() {
        let sql = format!(
            "UPDATE income SET {} WHERE id=? AND user_id=?",
            sets.join(", ")
        );
        values.push(id.to_string());
        values.push(user.id.to_string());
        let params: Vec<&dyn rusqlite::ToSql> =
            values.iter().map(|s| s as &dyn rusqlite::ToSql).collect();
        changed = conn.execute(&sql, rusqlite::params_from_iter(params))?;
    }
    if let Some(cid) = client_change {
        changed = conn.execute(
            "UPDATE income SET client_id=?1 WHERE id=?2 AND user_id=?3",
            params![cid, id, user.id],
        )?;
    }
    if changed == 0 {
        bail!("Income entry {} not found for the current profile", id);
    }
    println!("Updated income entry {}", id);
    Ok(())
}

fn rm(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let user = require_user(conn)?;
    let id = *sub.get_one::<i64>("id").unwrap();
    if !sub.get_flag("yes") && !confirm(&format!("Delete income entry {}?", id))? {
        println!("Aborted");
        return Ok(());
    }
    let changed = conn.execute(
        "DELETE FROM income WHERE id=?1 AND user_id=?2",
        params![id, user.id],
    )?;
    if changed == 0 {
        bail!("Income entry {} not found for the current profile", id);
    }
    println!("Deleted income entry {}", id);
    Ok(())
}
