// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use rusqlite::Connection;

use crate::engine::rewards::CURRENCY_RATES;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("set", sub)) => {
            let code = sub.get_one::<String>("code").unwrap().to_uppercase();
            if !CURRENCY_RATES.iter().any(|(c, _)| *c == code) {
                eprintln!(
                    "Note: '{}' has no threshold scaling entry; task amounts stay at USD magnitudes",
                    code
                );
            }
            crate::db::set_base_currency(conn, &code)?;
            println!("Display currency set to {}", code);
        }
        _ => {
            println!("{}", crate::db::get_base_currency(conn)?);
        }
    }
    Ok(())
}
