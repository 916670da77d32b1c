// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("Invalid transaction kind '{0}', expected income|expense")]
    InvalidKind(String),
    #[error("Invalid surplus action '{0}', expected rollover|saved|ignored")]
    InvalidSurplusAction(String),
    #[error("Invalid billing interval '{0}', expected weekly|monthly|yearly")]
    InvalidInterval(String),
    #[error("Malformed claim key '{0}', expected <task-id>_<period-token>")]
    MalformedClaimKey(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TxKind {
    Income,
    Expense,
}

impl TxKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TxKind::Income => "income",
            TxKind::Expense => "expense",
        }
    }
}

impl FromStr for TxKind {
    type Err = ModelError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "income" => Ok(TxKind::Income),
            "expense" => Ok(TxKind::Expense),
            other => Err(ModelError::InvalidKind(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    pub kind: TxKind,
    pub amount: Decimal,
    pub currency: String,
    pub category: String,
    pub merchant: Option<String>,
    pub payment_method: Option<String>,
    pub date: NaiveDate,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SurplusAction {
    Rollover,
    Saved,
    Ignored,
}

impl SurplusAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            SurplusAction::Rollover => "rollover",
            SurplusAction::Saved => "saved",
            SurplusAction::Ignored => "ignored",
        }
    }
}

impl FromStr for SurplusAction {
    type Err = ModelError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "rollover" => Ok(SurplusAction::Rollover),
            "saved" => Ok(SurplusAction::Saved),
            "ignored" => Ok(SurplusAction::Ignored),
            other => Err(ModelError::InvalidSurplusAction(other.to_string())),
        }
    }
}

/// One budget per calendar month, created lazily on first use.
/// `surplus_action` is a decision lock: set at most once per month.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Budget {
    pub id: i64,
    pub month: String, // YYYY-MM
    pub total: Decimal,
    pub limits: BTreeMap<String, Decimal>,
    pub surplus_action: Option<SurplusAction>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavingsGoal {
    pub id: i64,
    pub name: String,
    pub target_amount: Decimal,
    pub current_amount: Decimal,
    pub color: Option<String>,
    pub icon: Option<String>,
    pub deadline: Option<NaiveDate>,
    pub is_completed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Interval {
    Weekly,
    Monthly,
    Yearly,
}

impl Interval {
    pub fn as_str(&self) -> &'static str {
        match self {
            Interval::Weekly => "weekly",
            Interval::Monthly => "monthly",
            Interval::Yearly => "yearly",
        }
    }
}

impl FromStr for Interval {
    type Err = ModelError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "weekly" => Ok(Interval::Weekly),
            "monthly" => Ok(Interval::Monthly),
            "yearly" => Ok(Interval::Yearly),
            other => Err(ModelError::InvalidInterval(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subscription {
    pub id: i64,
    pub title: String,
    pub amount: Decimal,
    pub currency: String,
    pub billing_date: NaiveDate,
    pub interval: Interval,
    pub payment_method: Option<String>,
    pub reminder_days_before: u32,
    pub active: bool,
    pub last_payment_tx: Option<i64>,
}

impl Subscription {
    /// First billing date on or after `today`, stepping from the anchor
    /// date by the subscription's interval.
    pub fn next_due(&self, today: NaiveDate) -> NaiveDate {
        let mut due = self.billing_date;
        while due < today {
            due = match self.interval {
                Interval::Weekly => due + chrono::Duration::days(7),
                Interval::Monthly => due
                    .checked_add_months(chrono::Months::new(1))
                    .unwrap_or(due + chrono::Duration::days(30)),
                Interval::Yearly => due
                    .checked_add_months(chrono::Months::new(12))
                    .unwrap_or(due + chrono::Duration::days(365)),
            };
        }
        due
    }
}

/// A claimed task key: task id plus the calendar period it was claimed in.
/// Stored as `<taskId>_<periodToken>` and parsed here once, rather than
/// split ad hoc, since task ids may themselves contain underscores.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct ClaimedTask {
    pub task_id: String,
    pub period: String,
}

static CLAIM_KEY_RE: Lazy<Regex> = Lazy::new(|| {
    // day must precede month in the alternation so a day token is not cut
    // short at its month-shaped prefix
    Regex::new(r"^(.+)_(\d{4}-\d{2}-\d{2}|\d{4}-W\d{2}|\d{4}-\d{2})$").expect("claim key regex")
});

impl ClaimedTask {
    pub fn new(task_id: &str, period: &str) -> Self {
        Self {
            task_id: task_id.to_string(),
            period: period.to_string(),
        }
    }
}

impl fmt::Display for ClaimedTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.task_id, self.period)
    }
}

impl From<ClaimedTask> for String {
    fn from(c: ClaimedTask) -> String {
        c.to_string()
    }
}

impl FromStr for ClaimedTask {
    type Err = ModelError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let caps = CLAIM_KEY_RE
            .captures(s)
            .ok_or_else(|| ModelError::MalformedClaimKey(s.to_string()))?;
        Ok(ClaimedTask {
            task_id: caps[1].to_string(),
            period: caps[2].to_string(),
        })
    }
}

impl TryFrom<String> for ClaimedTask {
    type Error = ModelError;
    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub date: NaiveDate,
    pub delta: i64,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Redemption {
    pub date: NaiveDate,
    pub item_id: String,
    pub cost: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GamificationProfile {
    pub level: u32,
    pub xp: i64,
    pub total_xp: i64,
    pub coins: i64,
    pub total_coins: i64,
    pub streak: u32,
    pub last_check_in: Option<NaiveDate>,
    #[serde(default)]
    pub badges: BTreeSet<String>,
    #[serde(default)]
    pub claimed_tasks: BTreeSet<ClaimedTask>,
    #[serde(default)]
    pub history: Vec<HistoryEntry>,
    #[serde(default)]
    pub redemption_history: Vec<Redemption>,
}

impl Default for GamificationProfile {
    fn default() -> Self {
        Self {
            level: 1,
            xp: 0,
            total_xp: 0,
            coins: 0,
            total_coins: 0,
            streak: 0,
            last_check_in: None,
            badges: BTreeSet::new(),
            claimed_tasks: BTreeSet::new(),
            history: Vec::new(),
            redemption_history: Vec::new(),
        }
    }
}
