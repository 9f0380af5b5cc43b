// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::utils::{confirm, maybe_print_json, pretty_table, require_user};
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

/// Validated before any row is written: trimmed, at least 2 characters.
pub fn validate_name(name: &str) -> Result<&str> {
    let name = name.trim();
    if name.chars().count() < 2 {
        bail!("Client name must be at least 2 characters");
    }
    Ok(name)
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let user = require_user(conn)?;
    let name = validate_name(sub.get_one::<String>("name").unwrap())?;
    conn.execute(
        "INSERT INTO clients(user_id, name) VALUES (?1, ?2)",
        params![user.id, name],
    )?;
    println!("Added client '{}'", name);
    Ok(())
}

#[derive(Serialize)]
pub struct ClientRow {
    pub id: i64,
    pub name: String,
    pub created_at: String,
}

pub fn query_rows(conn: &Connection, user_id: i64) -> Result<Vec<ClientRow>> {
    let mut stmt = conn.prepare(
        "SELECT id, name, created_at FROM clients WHERE user_id=?1 ORDER BY name ASC",
    )?;
    let rows = stmt.query_map(params![user_id], |r| {
        Ok(ClientRow {
            id: r.get(0)?,
            name: r.get(1)?,
            created_at: r.get(2)?,
        })
    })?;
    let mut data = Vec::new();
    for row in rows {
        data.push(row?);
    }
    Ok(data)
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let user = require_user(conn)?;
    let data = query_rows(conn, user.id)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let rows = data
            .iter()
            .map(|c| vec![c.id.to_string(), c.name.clone(), c.created_at.clone()])
            .collect();
        println!("{}", pretty_table(&["Id", "Name", "Created"], rows));
    }
    Ok(())
}

fn edit(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let user = require_user(conn)?;
    let id = *sub.get_one::<i64>("id").unwrap();
    let name = validate_name(sub.get_one::<String>("name").unwrap())?;
    let changed = conn.execute(
        "UPDATE clients SET name=?1 WHERE id=?2 AND user_id=?3",
        params![name, id, user.id],
    )?;
    if changed == 0 {
        bail!("Client {} not found for the current profile", id);
    }
    println!("Renamed client {} to '{}'", id, name);
    Ok(())
}

/// Deleting a client never cascades: income entries keep their client_id and
/// display as "Unknown Client" from then on.
fn rm(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let user = require_user(conn)?;
    let id = *sub.get_one::<i64>("id").unwrap();
    let name: String = conn
        .query_row(
            "SELECT name FROM clients WHERE id=?1 AND user_id=?2",
            params![id, user.id],
            |r| r.get(0),
        )
        .map_err(|_| anyhow::anyhow!("Client {} not found for the current profile", id))?;
    if !sub.get_flag("yes") && !confirm(&format!("Delete client '{}'?", name))? {
        println!("Aborted");
        return Ok(());
    }
    conn.execute(
        "DELETE FROM clients WHERE id=?1 AND user_id=?2",
        params![id, user.id],
    )?;
    println!("Removed client '{}'", name);
    Ok(())
}
