// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use rusqlite::{params, Connection};
use rust_decimal::Decimal;

use crate::commands::game::award_badges;
use crate::engine::rewards::TX_LOGGED_XP;
use crate::engine::xp::add_xp;
use crate::models::{Transaction, TxKind};
use crate::utils::{maybe_print_json, parse_date, parse_decimal, pretty_table, today};

pub fn handle(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("delete", sub)) => delete(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let amount = parse_decimal(sub.get_one::<String>("amount").unwrap())?;
    if amount <= Decimal::ZERO {
        anyhow::bail!("Amount must be positive; use --kind to mark income vs expense");
    }
    let kind: TxKind = sub.get_one::<String>("kind").unwrap().parse()?;
    let category = sub.get_one::<String>("category").unwrap().trim().to_string();
    let date = match sub.get_one::<String>("date") {
        Some(s) => parse_date(s)?,
        None => today(),
    };
    let currency = match sub.get_one::<String>("currency") {
        Some(s) => s.to_uppercase(),
        None => crate::db::get_base_currency(conn)?,
    };
    let merchant = sub.get_one::<String>("merchant").map(|s| s.to_string());
    let method = sub.get_one::<String>("method").map(|s| s.to_string());
    let notes = sub.get_one::<String>("notes").map(|s| s.to_string());

    conn.execute(
        "INSERT INTO transactions(kind, amount, currency, category, merchant, payment_method, date, notes)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            kind.as_str(),
            amount.to_string(),
            currency,
            category,
            merchant,
            method,
            date.to_string(),
            notes
        ],
    )?;
    println!(
        "Recorded {} {} {} on {} ({})",
        kind.as_str(),
        amount,
        currency,
        date,
        category
    );

    let profile = crate::db::load_profile(conn)?;
    let before = profile.level;
    let profile = add_xp(profile, TX_LOGGED_XP, "transaction logged", today());
    if profile.level > before {
        println!("Level up! Now level {}", profile.level);
    }
    let profile = award_badges(conn, profile)?;
    crate::db::save_profile(conn, &profile)?;
    println!("+{} XP", TX_LOGGED_XP);
    Ok(())
}

fn delete(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap();
    let n = conn.execute("DELETE FROM transactions WHERE id=?1", params![id])?;
    if n == 0 {
        anyhow::bail!("No transaction with id {}", id);
    }
    println!("Deleted transaction {}", id);
    Ok(())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");

    let mut sql = String::from(
        "SELECT id, kind, amount, currency, category, merchant, payment_method, date, notes
         FROM transactions WHERE 1=1",
    );
    let mut params_vec: Vec<String> = Vec::new();
    if let Some(month) = sub.get_one::<String>("month") {
        sql.push_str(" AND substr(date,1,7)=?");
        params_vec.push(month.into());
    }
    if let Some(cat) = sub.get_one::<String>("category") {
        sql.push_str(" AND category=?");
        params_vec.push(cat.into());
    }
    if let Some(kind) = sub.get_one::<String>("kind") {
        sql.push_str(" AND kind=?");
        params_vec.push(kind.into());
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
        data.push(row_to_tx(r)?);
    }

    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|t| {
                vec![
                    t.id.to_string(),
                    t.date.to_string(),
                    t.kind.as_str().to_string(),
                    t.amount.to_string(),
                    t.currency.clone(),
                    t.category.clone(),
                    t.merchant.clone().unwrap_or_default(),
                    t.notes.clone().unwrap_or_default(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["Id", "Date", "Kind", "Amount", "CCY", "Category", "Merchant", "Notes"],
                rows,
            )
        );
    }
    Ok(())
}

fn row_to_tx(r: &rusqlite::Row<'_>) -> Result<Transaction> {
    let kind_s: String = r.get(1)?;
    let amount_s: String = r.get(2)?;
    let date_s: String = r.get(7)?;
    Ok(Transaction {
        id: r.get(0)?,
        kind: kind_s.parse()?,
        amount: amount_s
            .parse::<Decimal>()
            .with_context(|| format!("Invalid amount '{}' in transactions", amount_s))?,
        currency: r.get(3)?,
        category: r.get(4)?,
        merchant: r.get(5)?,
        payment_method: r.get(6)?,
        date: parse_date(&date_s)?,
        notes: r.get(8)?,
    })
}

/// Full transaction history, oldest first. The engine recomputes progress
/// and scores from this on every call.
pub fn load_all(conn: &Connection) -> Result<Vec<Transaction>> {
    let mut stmt = conn.prepare(
        "SELECT id, kind, amount, currency, category, merchant, payment_method, date, notes
         FROM transactions ORDER BY date, id",
    )?;
    let mut rows = stmt.query([])?;
    let mut out = Vec::new();
    while let Some(r) = rows.next()? {
        out.push(row_to_tx(r)?);
    }
    Ok(out)
}
