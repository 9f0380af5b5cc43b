// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::utils::{clear_current_user, current_user, set_current_user};
use anyhow::{Context, Result, bail};
use rusqlite::{Connection, OptionalExtension, params};

/// Select the active profile. Credential checks are the auth provider's
/// business in the hosted product; locally a profile is identity only.
pub fn login(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let email = sub.get_one::<String>("email").context("email is required")?;
    let email = email.trim().to_lowercase();
    if !email.contains('@') {
        bail!("Invalid email '{}'", email);
    }

    let existing: Option<i64> = conn
        .query_row("SELECT id FROM users WHERE email=?1", params![email], |r| {
            r.get(0)
        })
        .optional()?;

    let user_id = match existing {
        Some(id) => id,
        None => {
            if !sub.get_flag("create") {
                bail!("No profile for '{}' (pass --create to add one)", email);
            }
            conn.execute("INSERT INTO users(email) VALUES (?1)", params![email])?;
            conn.last_insert_rowid()
        }
    };

    set_current_user(conn, user_id)?;
    println!("Signed in as {}", email);
    Ok(())
}

pub fn logout(conn: &Connection) -> Result<()> {
    clear_current_user(conn)?;
    println!("Signed out");
    Ok(())
}

pub fn whoami(conn: &Connection) -> Result<()> {
    match current_user(conn)? {
        Some(user) => println!("{}", user.email),
        None => println!("Not signed in"),
    }
    Ok(())
}
