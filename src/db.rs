// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use crate::models::{Budget, GamificationProfile, SurplusAction};
use rust_decimal::Decimal;

static APP: Lazy<(&str, &str, &str)> = Lazy::new(|| ("com.coinquest", "Coinquest", "coinquest"));

pub fn db_path() -> Result<PathBuf> {
    let proj = ProjectDirs::from(APP.0, APP.1, APP.2)
        .context("Could not determine platform-specific data dir")?;
    let data_dir = proj.data_dir();
    fs::create_dir_all(data_dir).context("Failed to create data dir")?;
    Ok(data_dir.join("coinquest.sqlite"))
}

pub fn open_or_init() -> Result<Connection> {
    let path = db_path()?;
    let mut conn =
        Connection::open(&path).with_context(|| format!("Open DB at {}", path.display()))?;
    init_schema(&mut conn)?;
    Ok(conn)
}

pub fn init_schema(conn: &mut Connection) -> Result<()> {
    conn.execute_batch(
        r#"
    PRAGMA foreign_keys = ON;

    CREATE TABLE IF NOT EXISTS settings(
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS transactions(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        kind TEXT NOT NULL CHECK(kind IN ('income','expense')),
        amount TEXT NOT NULL,
        currency TEXT NOT NULL,
        category TEXT NOT NULL,
        merchant TEXT,
        payment_method TEXT,
        date TEXT NOT NULL,
        notes TEXT,
        created_at TEXT NOT NULL DEFAULT (datetime('now'))
    );
    CREATE INDEX IF NOT EXISTS idx_transactions_date ON transactions(date);

    CREATE TABLE IF NOT EXISTS budgets(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        month TEXT NOT NULL UNIQUE,
        total TEXT NOT NULL DEFAULT '0',
        surplus_action TEXT CHECK(surplus_action IN ('rollover','saved','ignored'))
    );

    CREATE TABLE IF NOT EXISTS budget_limits(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        budget_id INTEGER NOT NULL,
        category TEXT NOT NULL,
        amount TEXT NOT NULL,
        UNIQUE(budget_id, category),
        FOREIGN KEY(budget_id) REFERENCES budgets(id) ON DELETE CASCADE
    );

    CREATE TABLE IF NOT EXISTS savings_goals(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL UNIQUE,
        target_amount TEXT NOT NULL,
        current_amount TEXT NOT NULL DEFAULT '0',
        color TEXT,
        icon TEXT,
        deadline TEXT,
        is_completed INTEGER NOT NULL DEFAULT 0
    );

    CREATE TABLE IF NOT EXISTS subscriptions(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        title TEXT NOT NULL UNIQUE,
        amount TEXT NOT NULL,
        currency TEXT NOT NULL,
        billing_date TEXT NOT NULL,
        interval TEXT NOT NULL CHECK(interval IN ('weekly','monthly','yearly')),
        payment_method TEXT,
        reminder_days_before INTEGER NOT NULL DEFAULT 3,
        active INTEGER NOT NULL DEFAULT 1,
        last_payment_tx INTEGER REFERENCES transactions(id) ON DELETE SET NULL
    );

    CREATE TABLE IF NOT EXISTS profile(
        id INTEGER PRIMARY KEY CHECK(id = 1),
        level INTEGER NOT NULL DEFAULT 1,
        xp INTEGER NOT NULL DEFAULT 0,
        total_xp INTEGER NOT NULL DEFAULT 0,
        coins INTEGER NOT NULL DEFAULT 0,
        total_coins INTEGER NOT NULL DEFAULT 0,
        streak INTEGER NOT NULL DEFAULT 0,
        last_check_in TEXT,
        badges TEXT NOT NULL DEFAULT '[]',
        claimed_tasks TEXT NOT NULL DEFAULT '[]',
        history TEXT NOT NULL DEFAULT '[]',
        redemptions TEXT NOT NULL DEFAULT '[]'
    );
    INSERT OR IGNORE INTO profile(id) VALUES (1);
    "#,
    )?;
    Ok(())
}

// Currency used for new transactions and task threshold scaling
pub fn get_base_currency(conn: &Connection) -> Result<String> {
    let v: Option<String> = conn
        .query_row(
            "SELECT value FROM settings WHERE key='base_currency'",
            [],
            |r| r.get(0),
        )
        .optional()?;
    Ok(v.unwrap_or_else(|| "USD".to_string()))
}

pub fn set_base_currency(conn: &Connection, ccy: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO settings(key, value) VALUES('base_currency', ?1)
         ON CONFLICT(key) DO UPDATE SET value=excluded.value",
        params![ccy],
    )?;
    Ok(())
}

pub fn load_profile(conn: &Connection) -> Result<GamificationProfile> {
    let row = conn.query_row(
        "SELECT level, xp, total_xp, coins, total_coins, streak, last_check_in,
                badges, claimed_tasks, history, redemptions
         FROM profile WHERE id=1",
        [],
        |r| {
            Ok((
                r.get::<_, u32>(0)?,
                r.get::<_, i64>(1)?,
                r.get::<_, i64>(2)?,
                r.get::<_, i64>(3)?,
                r.get::<_, i64>(4)?,
                r.get::<_, u32>(5)?,
                r.get::<_, Option<String>>(6)?,
                r.get::<_, String>(7)?,
                r.get::<_, String>(8)?,
                r.get::<_, String>(9)?,
                r.get::<_, String>(10)?,
            ))
        },
    )?;
    let (level, xp, total_xp, coins, total_coins, streak, last_check_in, badges, claims, hist, red) =
        row;
    Ok(GamificationProfile {
        level,
        xp,
        total_xp,
        coins,
        total_coins,
        streak,
        last_check_in: match last_check_in {
            Some(s) => Some(crate::utils::parse_date(&s)?),
            None => None,
        },
        badges: serde_json::from_str(&badges).context("Corrupt badges column")?,
        claimed_tasks: serde_json::from_str(&claims).context("Corrupt claimed_tasks column")?,
        history: serde_json::from_str(&hist).context("Corrupt history column")?,
        redemption_history: serde_json::from_str(&red).context("Corrupt redemptions column")?,
    })
}

pub fn save_profile(conn: &Connection, p: &GamificationProfile) -> Result<()> {
    conn.execute(
        "UPDATE profile SET level=?1, xp=?2, total_xp=?3, coins=?4, total_coins=?5,
         streak=?6, last_check_in=?7, badges=?8, claimed_tasks=?9, history=?10,
         redemptions=?11 WHERE id=1",
        params![
            p.level,
            p.xp,
            p.total_xp,
            p.coins,
            p.total_coins,
            p.streak,
            p.last_check_in.map(|d| d.to_string()),
            serde_json::to_string(&p.badges)?,
            serde_json::to_string(&p.claimed_tasks)?,
            serde_json::to_string(&p.history)?,
            serde_json::to_string(&p.redemption_history)?,
        ],
    )?;
    Ok(())
}

/// Load the month's budget if one exists, limits included.
pub fn load_budget(conn: &Connection, month: &str) -> Result<Option<Budget>> {
    let head: Option<(i64, String, Option<String>)> = conn
        .query_row(
            "SELECT id, total, surplus_action FROM budgets WHERE month=?1",
            params![month],
            |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?)),
        )
        .optional()?;
    let Some((id, total_s, action_s)) = head else {
        return Ok(None);
    };
    let total = total_s
        .parse::<Decimal>()
        .with_context(|| format!("Invalid budget total '{}' for {}", total_s, month))?;
    let surplus_action = match action_s {
        Some(s) => Some(s.parse::<SurplusAction>()?),
        None => None,
    };

    let mut limits = BTreeMap::new();
    let mut stmt =
        conn.prepare("SELECT category, amount FROM budget_limits WHERE budget_id=?1")?;
    let mut rows = stmt.query(params![id])?;
    while let Some(r) = rows.next()? {
        let cat: String = r.get(0)?;
        let amt_s: String = r.get(1)?;
        let amt = amt_s
            .parse::<Decimal>()
            .with_context(|| format!("Invalid limit '{}' for {}", amt_s, cat))?;
        limits.insert(cat, amt);
    }
    Ok(Some(Budget {
        id,
        month: month.to_string(),
        total,
        limits,
        surplus_action,
    }))
}

/// Budget row for the month, created lazily with a zero total.
pub fn ensure_budget(conn: &Connection, month: &str) -> Result<Budget> {
    conn.execute(
        "INSERT OR IGNORE INTO budgets(month, total) VALUES (?1, '0')",
        params![month],
    )?;
    load_budget(conn, month)?.context("Budget row missing after insert")
}
