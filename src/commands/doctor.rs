// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use rusqlite::{Connection, OptionalExtension};
use rust_decimal::Decimal;

use crate::engine::xp::xp_threshold;
use crate::models::ClaimedTask;
use crate::utils::pretty_table;

pub fn handle(conn: &Connection) -> Result<()> {
    let mut rows = Vec::new();

    // 1) Profile level/XP invariant
    let (level, xp): (u32, i64) =
        conn.query_row("SELECT level, xp FROM profile WHERE id=1", [], |r| {
            Ok((r.get(0)?, r.get(1)?))
        })?;
    if xp >= xp_threshold(level) {
        rows.push(vec![
            "profile_xp_overflow".into(),
            format!("xp {} >= threshold {} at level {}", xp, xp_threshold(level), level),
        ]);
    }

    // 2) Claim keys that no longer parse
    let claims_json: String =
        conn.query_row("SELECT claimed_tasks FROM profile WHERE id=1", [], |r| {
            r.get(0)
        })?;
    let raw_claims: Vec<String> =
        serde_json::from_str(&claims_json).context("Corrupt claimed_tasks column")?;
    for key in &raw_claims {
        if key.parse::<ClaimedTask>().is_err() {
            rows.push(vec!["bad_claim_key".into(), key.clone()]);
        }
    }

    // 3) Subscription payment links pointing at deleted transactions
    let mut stmt = conn.prepare(
        "SELECT title, last_payment_tx FROM subscriptions WHERE last_payment_tx IS NOT NULL",
    )?;
    let mut cur = stmt.query([])?;
    while let Some(r) = cur.next()? {
        let title: String = r.get(0)?;
        let tx_id: i64 = r.get(1)?;
        let exists: Option<i64> = conn
            .query_row(
                "SELECT id FROM transactions WHERE id=?1",
                [tx_id],
                |r| r.get(0),
            )
            .optional()?;
        if exists.is_none() {
            rows.push(vec![
                "dangling_payment_link".into(),
                format!("{} -> tx {}", title, tx_id),
            ]);
        }
    }

    // 4) Budgets whose category limits sum past the month total
    let mut bstmt = conn.prepare("SELECT id, month, total FROM budgets")?;
    let mut bcur = bstmt.query([])?;
    while let Some(r) = bcur.next()? {
        let id: i64 = r.get(0)?;
        let month: String = r.get(1)?;
        let total_s: String = r.get(2)?;
        let total = total_s
            .parse::<Decimal>()
            .with_context(|| format!("Invalid budget total '{}' for {}", total_s, month))?;
        let mut lstmt = conn.prepare("SELECT amount FROM budget_limits WHERE budget_id=?1")?;
        let mut lcur = lstmt.query([id])?;
        let mut sum = Decimal::ZERO;
        while let Some(l) = lcur.next()? {
            let s: String = l.get(0)?;
            sum += s
                .parse::<Decimal>()
                .with_context(|| format!("Invalid limit '{}' in {}", s, month))?;
        }
        if total > Decimal::ZERO && sum > total {
            rows.push(vec![
                "limits_exceed_total".into(),
                format!("{}: limits {} > total {}", month, sum, total),
            ]);
        }
    }

    if rows.is_empty() {
        println!("doctor: no issues found");
    } else {
        println!("{}", pretty_table(&["Issue", "Detail"], rows));
    }
    Ok(())
}
