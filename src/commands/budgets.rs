// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use rusqlite::{params, Connection};
use rust_decimal::Decimal;
use std::collections::BTreeMap;

use crate::engine::scoring::burn_rate;
use crate::models::SurplusAction;
use crate::utils::{
    maybe_print_json, month_end, month_of, next_month, parse_decimal, parse_month, pretty_table,
    today,
};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("set", sub)) => set(conn, sub)?,
        Some(("limit", sub)) => limit(conn, sub)?,
        Some(("report", sub)) => report(conn, sub)?,
        Some(("surplus", sub)) => surplus(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn set(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let month = parse_month(sub.get_one::<String>("month").unwrap())?;
    let total = parse_decimal(sub.get_one::<String>("total").unwrap())?;
    crate::db::ensure_budget(conn, &month)?;
    conn.execute(
        "UPDATE budgets SET total=?1 WHERE month=?2",
        params![total.to_string(), month],
    )?;
    println!("Budget for {} set to {}", month, total);
    Ok(())
}

fn limit(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let month = parse_month(sub.get_one::<String>("month").unwrap())?;
    let category = sub.get_one::<String>("category").unwrap().trim().to_string();
    let amount = parse_decimal(sub.get_one::<String>("amount").unwrap())?;
    let budget = crate::db::ensure_budget(conn, &month)?;
    conn.execute(
        "INSERT INTO budget_limits(budget_id, category, amount) VALUES (?1,?2,?3)
         ON CONFLICT(budget_id, category) DO UPDATE SET amount=excluded.amount",
        params![budget.id, category, amount.to_string()],
    )?;
    println!("Limit for {} / {} = {}", month, category, amount);
    Ok(())
}

/// Expense totals per category for a month, parsed out of the stored
/// decimal strings.
pub fn spent_by_category(conn: &Connection, month: &str) -> Result<BTreeMap<String, Decimal>> {
    let mut stmt = conn.prepare(
        "SELECT category, amount FROM transactions
         WHERE kind='expense' AND substr(date,1,7)=?1",
    )?;
    let mut rows = stmt.query(params![month])?;
    let mut spent = BTreeMap::new();
    while let Some(r) = rows.next()? {
        let cat: String = r.get(0)?;
        let amt_s: String = r.get(1)?;
        let amt = amt_s
            .parse::<Decimal>()
            .with_context(|| format!("Invalid amount '{}' in transactions", amt_s))?;
        *spent.entry(cat).or_insert(Decimal::ZERO) += amt;
    }
    Ok(spent)
}

fn report(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let month = match sub.get_one::<String>("month") {
        Some(s) => parse_month(s)?,
        None => month_of(today()),
    };

    let budget = crate::db::load_budget(conn, &month)?;
    let spent = spent_by_category(conn, &month)?;
    let total_spent: Decimal = spent.values().copied().sum();
    let total_budget = budget.as_ref().map(|b| b.total).unwrap_or(Decimal::ZERO);
    let limits = budget.map(|b| b.limits).unwrap_or_default();

    let mut categories: Vec<String> = spent.keys().cloned().collect();
    for c in limits.keys() {
        if !categories.contains(c) {
            categories.push(c.clone());
        }
    }
    categories.sort();

    let mut data = Vec::new();
    for cat in &categories {
        let s = spent.get(cat).copied().unwrap_or(Decimal::ZERO);
        let l = limits.get(cat).copied();
        data.push(vec![
            cat.clone(),
            l.map(|v| format!("{:.2}", v)).unwrap_or_default(),
            format!("{:.2}", s),
            match l {
                Some(v) if s > v => "over".to_string(),
                Some(_) => "ok".to_string(),
                None => String::new(),
            },
        ]);
    }

    // Burn-rate projection anchored at today within the current month, or
    // at month end for past months.
    let anchor = if month == month_of(today()) {
        today()
    } else {
        month_end(&month)?
    };
    let burn = burn_rate(total_spent, total_budget, anchor);

    if maybe_print_json(json_flag, jsonl_flag, &serde_json::json!({
        "month": month,
        "total_budget": total_budget,
        "total_spent": total_spent,
        "categories": data,
        "burn_rate": burn,
    }))? {
        return Ok(());
    }

    println!("{}", pretty_table(&["Category", "Limit", "Spent", "Status"], data));
    println!(
        "Total: {:.2} of {:.2} | daily burn {:.2}, projected {:.2}{} | {} day(s) of budget left",
        total_spent,
        total_budget,
        burn.daily,
        burn.projected,
        if burn.over_budget { " (OVER)" } else { "" },
        burn.days_until_exhaustion
    );
    Ok(())
}

fn surplus(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let month = parse_month(sub.get_one::<String>("month").unwrap())?;
    let action: SurplusAction = sub.get_one::<String>("action").unwrap().parse()?;

    let budget = crate::db::load_budget(conn, &month)?
        .with_context(|| format!("No budget recorded for {}", month))?;
    if let Some(existing) = budget.surplus_action {
        anyhow::bail!(
            "Surplus for {} already decided: {} (the decision is final)",
            month,
            existing.as_str()
        );
    }

    let spent: Decimal = spent_by_category(conn, &month)?.values().copied().sum();
    let surplus = budget.total - spent;

    match action {
        SurplusAction::Rollover => {
            if surplus > Decimal::ZERO {
                let next = next_month(&month)?;
                let next_budget = crate::db::ensure_budget(conn, &next)?;
                let new_total = next_budget.total + surplus;
                conn.execute(
                    "UPDATE budgets SET total=?1 WHERE month=?2",
                    params![new_total.to_string(), next],
                )?;
                println!("Rolled {} into {} (new total {})", surplus, next, new_total);
            } else {
                println!("No surplus to roll over ({})", surplus);
            }
        }
        SurplusAction::Saved => {
            let goal_name = sub
                .get_one::<String>("goal")
                .context("--goal is required when action is 'saved'")?;
            if surplus > Decimal::ZERO {
                crate::commands::goals::allocate_to(conn, goal_name, surplus)?;
                println!("Saved {} into goal '{}'", surplus, goal_name);
            } else {
                println!("No surplus to save ({})", surplus);
            }
        }
        SurplusAction::Ignored => {
            println!("Surplus for {} ignored", month);
        }
    }

    conn.execute(
        "UPDATE budgets SET surplus_action=?1 WHERE month=?2",
        params![action.as_str(), month],
    )?;
    Ok(())
}
