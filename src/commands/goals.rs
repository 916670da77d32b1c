// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension};
use rust_decimal::Decimal;

use crate::commands::game::award_badges;
use crate::utils::{maybe_print_json, parse_date, parse_decimal, pretty_table};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("allocate", sub)) => allocate(conn, sub)?,
        Some(("complete", sub)) => complete(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let name = sub.get_one::<String>("name").unwrap().trim().to_string();
    let target = parse_decimal(sub.get_one::<String>("target").unwrap())?;
    if target <= Decimal::ZERO {
        anyhow::bail!("Target amount must be positive");
    }
    let color = sub.get_one::<String>("color").map(|s| s.to_string());
    let icon = sub.get_one::<String>("icon").map(|s| s.to_string());
    let deadline = match sub.get_one::<String>("deadline") {
        Some(s) => Some(parse_date(s)?),
        None => None,
    };
    conn.execute(
        "INSERT INTO savings_goals(name, target_amount, color, icon, deadline)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            name,
            target.to_string(),
            color,
            icon,
            deadline.map(|d| d.to_string())
        ],
    )?;
    println!("Goal '{}' created (target {})", name, target);
    Ok(())
}

/// Credit a goal. Allocations must be positive, so the current amount only
/// ever grows.
pub fn allocate_to(conn: &Connection, name: &str, amount: Decimal) -> Result<Decimal> {
    if amount <= Decimal::ZERO {
        anyhow::bail!("Allocation must be positive");
    }
    let row: Option<(String, String)> = conn
        .query_row(
            "SELECT current_amount, target_amount FROM savings_goals WHERE name=?1",
            params![name],
            |r| Ok((r.get(0)?, r.get(1)?)),
        )
        .optional()?;
    let (current_s, target_s) = row.with_context(|| format!("Goal '{}' not found", name))?;
    let current = current_s
        .parse::<Decimal>()
        .with_context(|| format!("Invalid current amount '{}' for goal {}", current_s, name))?;
    let target = target_s
        .parse::<Decimal>()
        .with_context(|| format!("Invalid target amount '{}' for goal {}", target_s, name))?;

    let new_amount = current + amount;
    conn.execute(
        "UPDATE savings_goals SET current_amount=?1 WHERE name=?2",
        params![new_amount.to_string(), name],
    )?;
    if new_amount >= target && current < target {
        println!("Goal '{}' reached its target of {}!", name, target);
    }
    Ok(new_amount)
}

fn allocate(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let name = sub.get_one::<String>("name").unwrap();
    let amount = parse_decimal(sub.get_one::<String>("amount").unwrap())?;
    let new_amount = allocate_to(conn, name, amount)?;
    println!("Goal '{}' now at {}", name, new_amount);
    Ok(())
}

fn complete(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let name = sub.get_one::<String>("name").unwrap();
    let n = conn.execute(
        "UPDATE savings_goals SET is_completed=1 WHERE name=?1",
        params![name],
    )?;
    if n == 0 {
        anyhow::bail!("Goal '{}' not found", name);
    }
    println!("Goal '{}' marked completed", name);

    let profile = crate::db::load_profile(conn)?;
    let profile = award_badges(conn, profile)?;
    crate::db::save_profile(conn, &profile)?;
    Ok(())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let mut stmt = conn.prepare(
        "SELECT name, target_amount, current_amount, deadline, is_completed
         FROM savings_goals ORDER BY is_completed, name",
    )?;
    let rows = stmt.query_map([], |r| {
        Ok((
            r.get::<_, String>(0)?,
            r.get::<_, String>(1)?,
            r.get::<_, String>(2)?,
            r.get::<_, Option<String>>(3)?,
            r.get::<_, bool>(4)?,
        ))
    })?;
    let mut data = Vec::new();
    for row in rows {
        let (name, target_s, current_s, deadline, done) = row?;
        let target = target_s
            .parse::<Decimal>()
            .with_context(|| format!("Invalid target '{}' for goal {}", target_s, name))?;
        let current = current_s
            .parse::<Decimal>()
            .with_context(|| format!("Invalid amount '{}' for goal {}", current_s, name))?;
        let pct = if target > Decimal::ZERO {
            (current / target * Decimal::from(100)).round_dp(0)
        } else {
            Decimal::ZERO
        };
        data.push(vec![
            name,
            format!("{:.2}", current),
            format!("{:.2}", target),
            format!("{}%", pct),
            deadline.unwrap_or_default(),
            if done { "done".into() } else { String::new() },
        ]);
    }
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        println!(
            "{}",
            pretty_table(
                &["Goal", "Saved", "Target", "Progress", "Deadline", "Status"],
                data
            )
        );
    }
    Ok(())
}
