// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::EntryKind;
use crate::utils::{maybe_print_json, pretty_table, require_user};
use anyhow::Result;
use rusqlite::Connection;
use serde::Serialize;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("list", sub)) => list(conn, sub)?,
        _ => {}
    }
    Ok(())
}

/// One row of the unified read model: both ledgers merged, newest first. The
/// category column carries the client name for income entries ("Unknown
/// Client" for dangling references) and "-" otherwise.
#[derive(Serialize)]
pub struct TransactionRow {
    #[serde(rename = "type")]
    pub kind: EntryKind,
    pub date: String,
    pub category: String,
    pub description: String,
    pub amount: String,
    pub currency: String,
}

pub fn query_rows(
    conn: &Connection,
    user_id: i64,
    month: Option<&str>,
    limit: Option<usize>,
) -> Result<Vec<TransactionRow>> {
    let mut sql = String::from(
        "SELECT kind, date, category, description, amount, currency FROM (
            SELECT 'income' AS kind, i.date AS date, i.id AS rid,
                   CASE WHEN i.client_id IS NULL THEN '-'
                        ELSE COALESCE(c.name, 'Unknown Client') END AS category,
                   COALESCE(i.description, '') AS description,
                   i.amount AS amount, i.currency AS currency
            FROM income i LEFT JOIN clients c ON i.client_id=c.id
            WHERE i.user_id=?1
            UNION ALL
            SELECT 'expense', e.date, e.id, '-', e.description, e.amount, e.currency
            FROM expenses e WHERE e.user_id=?1
         )",
    );
    let mut params_vec: Vec<String> = vec![user_id.to_string()];
    if let Some(month) = month {
        sql.push_str(" WHERE substr(date,1,7)=?2");
        params_vec.push(month.to_string());
    }
    sql.push_str(" ORDER BY date DESC, rid DESC");
    if let Some(limit) = limit {
        sql.push_str(&format!(" LIMIT {}", limit));
    }

    let mut stmt = conn.prepare(&sql)?;
    let params: Vec<&dyn rusqlite::ToSql> = params_vec
        .iter()
        .map(|s| s as &dyn rusqlite::ToSql)
        .collect();
    let mut rows = stmt.query(rusqlite::params_from_iter(params))?;

    let mut data = Vec::new();
    while let Some(r) = rows.next()? {
        data.push(TransactionRow {
            kind: r.get::<_, String>(0)?.parse()?,
            date: r.get(1)?,
            category: r.get(2)?,
            description: r.get(3)?,
            amount: r.get(4)?,
            currency: r.get(5)?,
        });
    }
    Ok(data)
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let user = require_user(conn)?;
    let month = sub.get_one::<String>("month").map(|s| s.as_str());
    let limit = sub.get_one::<usize>("limit").copied();
    let data = query_rows(conn, user.id, month, limit)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let rows = data
            .iter()
            .map(|r| {
                vec![
                    r.kind.to_string(),
                    r.date.clone(),
                    r.category.clone(),
                    r.description.clone(),
                    r.amount.clone(),
                    r.currency.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["Type", "Date", "Category", "Description", "Amount", "CCY"],
                rows,
            )
        );
    }
    Ok(())
}
