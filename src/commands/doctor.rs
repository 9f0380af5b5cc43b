// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::utils::pretty_table;
use anyhow::Result;
use rusqlite::Connection;
use rust_decimal::Decimal;

pub fn handle(conn: &Connection) -> Result<()> {
    let mut rows = Vec::new();

    // 1) Dangling client references (these render as "Unknown Client")
    let mut stmt = conn.prepare(
        "SELECT i.id, i.client_id FROM income i
         WHERE i.client_id IS NOT NULL
           AND NOT EXISTS (SELECT 1 FROM clients c WHERE c.id=i.client_id)",
    )?;
    let mut cur = stmt.query([])?;
    while let Some(r) = cur.next()? {
        let id: i64 = r.get(0)?;
        let cid: i64 = r.get(1)?;
        rows.push(vec![
            "dangling_client_ref".into(),
            format!("income {} -> client {}", id, cid),
        ]);
    }

    // 2) Client references crossing profile boundaries
    let mut stmt2 = conn.prepare(
        "SELECT i.id, i.client_id FROM income i
         JOIN clients c ON c.id=i.client_id
         WHERE c.user_id != i.user_id",
    )?;
    let mut cur2 = stmt2.query([])?;
    while let Some(r) = cur2.next()? {
        let id: i64 = r.get(0)?;
        let cid: i64 = r.get(1)?;
        rows.push(vec![
            "cross_profile_client_ref".into(),
            format!("income {} -> client {}", id, cid),
        ]);
    }

    // 3) Non-positive or unparsable stored amounts
    for table in ["income", "expenses"] {
        let mut stmt3 = conn.prepare(&format!("SELECT id, amount FROM {}", table))?;
        let mut cur3 = stmt3.query([])?;
        while let Some(r) = cur3.next()? {
            let id: i64 = r.get(0)?;
            let amount: String = r.get(1)?;
            match amount.parse::<Decimal>() {
                Ok(d) if d > Decimal::ZERO => {}
                _ => rows.push(vec![
                    "bad_amount".into(),
                    format!("{} {}: '{}'", table, id, amount),
                ]),
            }
        }
    }

    if rows.is_empty() {
        println!("doctor: no issues found");
    } else {
        println!("{}", pretty_table(&["Issue", "Detail"], rows));
    }
    Ok(())
}
