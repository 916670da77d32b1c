// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension};
use rust_decimal::Decimal;

use crate::models::{Interval, Subscription};
use crate::utils::{maybe_print_json, parse_date, parse_decimal, pretty_table, today};

pub fn handle(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("pay", sub)) => pay(conn, sub)?,
        Some(("undo", sub)) => undo(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let title = sub.get_one::<String>("title").unwrap().trim().to_string();
    let amount = parse_decimal(sub.get_one::<String>("amount").unwrap())?;
    let date = parse_date(sub.get_one::<String>("date").unwrap())?;
    let interval: Interval = sub.get_one::<String>("interval").unwrap().parse()?;
    let method = sub.get_one::<String>("method").map(|s| s.to_string());
    let remind = *sub.get_one::<u32>("remind-days").unwrap();
    let currency = crate::db::get_base_currency(conn)?;

    conn.execute(
        "INSERT INTO subscriptions(title, amount, currency, billing_date, interval, payment_method, reminder_days_before)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            title,
            amount.to_string(),
            currency,
            date.to_string(),
            interval.as_str(),
            method,
            remind
        ],
    )?;
    println!("Tracking '{}' ({} {} {})", title, amount, currency, interval.as_str());
    Ok(())
}

fn row_to_sub(r: &rusqlite::Row<'_>) -> Result<Subscription> {
    let amount_s: String = r.get(2)?;
    let date_s: String = r.get(4)?;
    let interval_s: String = r.get(5)?;
    Ok(Subscription {
        id: r.get(0)?,
        title: r.get(1)?,
        amount: amount_s
            .parse::<Decimal>()
            .with_context(|| format!("Invalid amount '{}' in subscriptions", amount_s))?,
        currency: r.get(3)?,
        billing_date: parse_date(&date_s)?,
        interval: interval_s.parse()?,
        payment_method: r.get(6)?,
        reminder_days_before: r.get(7)?,
        active: r.get(8)?,
        last_payment_tx: r.get(9)?,
    })
}

fn load(conn: &Connection, title: &str) -> Result<Subscription> {
    let mut stmt = conn.prepare(
        "SELECT id, title, amount, currency, billing_date, interval, payment_method,
                reminder_days_before, active, last_payment_tx
         FROM subscriptions WHERE title=?1",
    )?;
    let sub = stmt
        .query_row(params![title], |r| {
            Ok(row_to_sub(r))
        })
        .optional()?
        .with_context(|| format!("Subscription '{}' not found", title))??;
    Ok(sub)
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let mut stmt = conn.prepare(
        "SELECT id, title, amount, currency, billing_date, interval, payment_method,
                reminder_days_before, active, last_payment_tx
         FROM subscriptions ORDER BY title",
    )?;
    let mut rows = stmt.query([])?;
    let mut subs = Vec::new();
    while let Some(r) = rows.next()? {
        subs.push(row_to_sub(r)?);
    }

    if maybe_print_json(json_flag, jsonl_flag, &subs)? {
        return Ok(());
    }
    let now = today();
    let data: Vec<Vec<String>> = subs
        .iter()
        .map(|s| {
            let due = s.next_due(now);
            let days_out = (due - now).num_days();
            let reminder = days_out <= i64::from(s.reminder_days_before);
            vec![
                s.title.clone(),
                format!("{} {}", s.amount, s.currency),
                s.interval.as_str().to_string(),
                due.to_string(),
                if !s.active {
                    "inactive".into()
                } else if s.last_payment_tx.is_some() {
                    "paid".into()
                } else if reminder {
                    format!("due in {} day(s)", days_out)
                } else {
                    String::new()
                },
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["Subscription", "Amount", "Interval", "Next due", "Status"], data)
    );
    Ok(())
}

/// Record this cycle's payment as a normal expense transaction and link it
/// to the subscription. The link is what "paid" means; undo removes both.
fn pay(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let title = sub.get_one::<String>("title").unwrap();
    let date = match sub.get_one::<String>("date") {
        Some(s) => parse_date(s)?,
        None => today(),
    };
    let s = load(conn, title)?;

    let tx = conn.transaction()?;
    tx.execute(
        "INSERT INTO transactions(kind, amount, currency, category, merchant, payment_method, date, notes)
         VALUES ('expense', ?1, ?2, 'Subscriptions', ?3, ?4, ?5, ?6)",
        params![
            s.amount.to_string(),
            s.currency,
            s.title,
            s.payment_method,
            date.to_string(),
            format!("{} subscription payment", s.interval.as_str())
        ],
    )?;
    let tx_id = tx.last_insert_rowid();
    tx.execute(
        "UPDATE subscriptions SET last_payment_tx=?1 WHERE id=?2",
        params![tx_id, s.id],
    )?;
    tx.commit()?;
    println!("Paid '{}': {} {} on {}", s.title, s.amount, s.currency, date);
    Ok(())
}

fn undo(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let title = sub.get_one::<String>("title").unwrap();
    let s = load(conn, title)?;
    let tx_id = s
        .last_payment_tx
        .with_context(|| format!("Subscription '{}' has no recorded payment", title))?;

    let tx = conn.transaction()?;
    tx.execute("DELETE FROM transactions WHERE id=?1", params![tx_id])?;
    tx.execute(
        "UPDATE subscriptions SET last_payment_tx=NULL WHERE id=?1",
        params![s.id],
    )?;
    tx.commit()?;
    println!("Undid payment for '{}' (removed transaction {})", title, tx_id);
    Ok(())
}
