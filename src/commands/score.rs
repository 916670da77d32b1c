// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use chrono::{Months, NaiveDate};
use rusqlite::Connection;
use rust_decimal::Decimal;
use std::collections::BTreeMap;

use crate::commands::transactions::load_all;
use crate::engine::scoring::{
    burn_rate, consistency_score, discipline_score, financial_health_score,
};
use crate::models::{Transaction, TxKind};
use crate::utils::{
    days_in_month, maybe_print_json, month_end, month_of, parse_month, pretty_table, today,
};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    let json_flag = m.get_flag("json");
    let jsonl_flag = m.get_flag("jsonl");
    let month = match m.get_one::<String>("month") {
        Some(s) => parse_month(s)?,
        None => month_of(today()),
    };

    let txs = load_all(conn)?;
    let month_txs: Vec<Transaction> = txs
        .iter()
        .filter(|t| month_of(t.date) == month)
        .cloned()
        .collect();

    let mut income = Decimal::ZERO;
    let mut expenses = Decimal::ZERO;
    for t in &month_txs {
        match t.kind {
            TxKind::Income => income += t.amount,
            TxKind::Expense => expenses += t.amount,
        }
    }

    let budget = crate::db::load_budget(conn, &month)?;
    let total_budget = budget.map(|b| b.total).unwrap_or(Decimal::ZERO);

    let anchor = if month == month_of(today()) {
        today()
    } else {
        month_end(&month)?
    };

    let health = financial_health_score(income, expenses, total_budget, expenses);
    let discipline = if total_budget > Decimal::ZERO {
        let daily_budget = total_budget / Decimal::from(days_in_month(anchor));
        discipline_score(&month_txs, daily_budget)
    } else {
        // no budget to measure against
        50
    };
    let streak_months = savings_streak_months(&txs, anchor);
    let consistency = consistency_score(streak_months, income, expenses);
    let burn = burn_rate(expenses, total_budget, anchor);

    if maybe_print_json(json_flag, jsonl_flag, &serde_json::json!({
        "month": month,
        "income": income,
        "expenses": expenses,
        "health": health,
        "discipline": discipline,
        "consistency": consistency,
        "savings_streak_months": streak_months,
        "burn_rate": burn,
    }))? {
        return Ok(());
    }

    let rows = vec![
        vec!["Financial health".to_string(), format!("{}/100", health)],
        vec!["Discipline".to_string(), format!("{}/100", discipline)],
        vec!["Consistency".to_string(), format!("{}/100", consistency)],
        vec!["Savings streak".to_string(), format!("{} month(s)", streak_months)],
        vec!["Daily burn".to_string(), format!("{:.2}", burn.daily)],
        vec![
            "Projected spend".to_string(),
            format!(
                "{:.2}{}",
                burn.projected,
                if burn.over_budget { " (over budget)" } else { "" }
            ),
        ],
        vec![
            "Budget runway".to_string(),
            format!("{} day(s)", burn.days_until_exhaustion),
        ],
    ];
    println!("{}", pretty_table(&["Metric", "Value"], rows));
    Ok(())
}

/// Consecutive months ending at the anchor month (or the one before it,
/// if the anchor month is not yet in surplus) where income exceeded
/// expenses.
fn savings_streak_months(txs: &[Transaction], anchor: NaiveDate) -> u32 {
    let mut nets: BTreeMap<String, Decimal> = BTreeMap::new();
    for t in txs {
        let e = nets.entry(month_of(t.date)).or_insert(Decimal::ZERO);
        match t.kind {
            TxKind::Income => *e += t.amount,
            TxKind::Expense => *e -= t.amount,
        }
    }
    let positive = |d: NaiveDate| {
        nets.get(&month_of(d))
            .map(|v| *v > Decimal::ZERO)
            .unwrap_or(false)
    };

    let mut cursor = anchor;
    if !positive(cursor) {
        cursor = match cursor.checked_sub_months(Months::new(1)) {
            Some(d) => d,
            None => return 0,
        };
        if !positive(cursor) {
            return 0;
        }
    }
    let mut streak = 0u32;
    while positive(cursor) {
        streak += 1;
        cursor = match cursor.checked_sub_months(Months::new(1)) {
            Some(d) => d,
            None => break,
        };
    }
    streak
}
