// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Static reward tables: task templates, badge definitions, shop items, XP
//! constants, and the fixed currency table used to scale task thresholds.

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::HashSet;

use crate::engine::streak::{period_token, PeriodKind};
use crate::engine::xp::{add_coins, add_xp};
use crate::models::{ClaimedTask, GamificationProfile, Transaction, TxKind};

pub const CHECK_IN_XP: i64 = 10;
pub const CHECK_IN_COINS: i64 = 5;
pub const TX_LOGGED_XP: i64 = 5;

/// What a task asks the user to do; drives the progress check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskKind {
    /// Log N expense transactions in the period.
    LogExpenses,
    /// Log N income transactions in the period.
    LogIncome,
    /// Keep total period spending under the threshold.
    SpendUnder,
    /// Have N days in the period with no expenses at all.
    NoSpendDays,
    /// Log expenses in N distinct categories.
    Categories,
    /// End the period with income minus expenses at or above the threshold.
    SaveAmount,
}

pub struct TaskTemplate {
    pub id: &'static str,
    pub title: &'static str,
    /// May contain an `{amount}` placeholder, filled at materialization.
    pub description: &'static str,
    pub xp: i64,
    pub coins: i64,
    pub total: u32,
    pub kind: TaskKind,
    /// Threshold in USD, scaled per display currency.
    pub usd_amount: Option<i64>,
}

pub const LOG_EXPENSE_TASK_ID: &str = "log_expense";

/// Template pinned to slot 0 of every daily rotation.
pub static LOG_EXPENSE_TASK: TaskTemplate = TaskTemplate {
    id: LOG_EXPENSE_TASK_ID,
    title: "Log an expense",
    description: "Record at least one expense today",
    xp: 10,
    coins: 2,
    total: 1,
    kind: TaskKind::LogExpenses,
    usd_amount: None,
};

pub static DAILY_TASKS: &[TaskTemplate] = &[
    TaskTemplate {
        id: "log_three_expenses",
        title: "Diligent logger",
        description: "Record three expenses today",
        xp: 20,
        coins: 4,
        total: 3,
        kind: TaskKind::LogExpenses,
        usd_amount: None,
    },
    TaskTemplate {
        id: "spend_under_50",
        title: "Frugal day",
        description: "Keep today's spending under {amount}",
        xp: 25,
        coins: 5,
        total: 1,
        kind: TaskKind::SpendUnder,
        usd_amount: Some(50),
    },
    TaskTemplate {
        id: "spend_under_20",
        title: "Shoestring day",
        description: "Keep today's spending under {amount}",
        xp: 40,
        coins: 8,
        total: 1,
        kind: TaskKind::SpendUnder,
        usd_amount: Some(20),
    },
    TaskTemplate {
        id: "no_spend",
        title: "No-spend day",
        description: "Get through the day without a single expense",
        xp: 50,
        coins: 10,
        total: 1,
        kind: TaskKind::NoSpendDays,
        usd_amount: None,
    },
    TaskTemplate {
        id: "log_income",
        title: "Money in",
        description: "Record an income today",
        xp: 15,
        coins: 3,
        total: 1,
        kind: TaskKind::LogIncome,
        usd_amount: None,
    },
    TaskTemplate {
        id: "three_categories",
        title: "Sorted spender",
        description: "Log expenses across three different categories",
        xp: 20,
        coins: 4,
        total: 3,
        kind: TaskKind::Categories,
        usd_amount: None,
    },
    TaskTemplate {
        id: "save_10",
        title: "Daily saver",
        description: "End the day at least {amount} ahead",
        xp: 30,
        coins: 6,
        total: 1,
        kind: TaskKind::SaveAmount,
        usd_amount: Some(10),
    },
];

pub static WEEKLY_TASKS: &[TaskTemplate] = &[
    TaskTemplate {
        id: "week_save_100",
        title: "Weekly saver",
        description: "End the week at least {amount} ahead",
        xp: 100,
        coins: 20,
        total: 1,
        kind: TaskKind::SaveAmount,
        usd_amount: Some(100),
    },
    TaskTemplate {
        id: "week_no_spend_2",
        title: "Two quiet days",
        description: "Have two no-spend days this week",
        xp: 80,
        coins: 15,
        total: 2,
        kind: TaskKind::NoSpendDays,
        usd_amount: None,
    },
    TaskTemplate {
        id: "week_log_10",
        title: "Bookkeeper",
        description: "Record ten expenses this week",
        xp: 60,
        coins: 12,
        total: 10,
        kind: TaskKind::LogExpenses,
        usd_amount: None,
    },
    TaskTemplate {
        id: "week_five_categories",
        title: "Full picture",
        description: "Log expenses across five different categories this week",
        xp: 70,
        coins: 14,
        total: 5,
        kind: TaskKind::Categories,
        usd_amount: None,
    },
    TaskTemplate {
        id: "week_under_300",
        title: "Weekly ceiling",
        description: "Keep this week's spending under {amount}",
        xp: 90,
        coins: 18,
        total: 1,
        kind: TaskKind::SpendUnder,
        usd_amount: Some(300),
    },
    TaskTemplate {
        id: "week_income_2",
        title: "Side hustle",
        description: "Record two incomes this week",
        xp: 60,
        coins: 12,
        total: 2,
        kind: TaskKind::LogIncome,
        usd_amount: None,
    },
];

pub static MONTHLY_TASKS: &[TaskTemplate] = &[
    TaskTemplate {
        id: "month_save_500",
        title: "Monthly saver",
        description: "End the month at least {amount} ahead",
        xp: 300,
        coins: 60,
        total: 1,
        kind: TaskKind::SaveAmount,
        usd_amount: Some(500),
    },
    TaskTemplate {
        id: "month_under_2000",
        title: "Monthly ceiling",
        description: "Keep this month's spending under {amount}",
        xp: 250,
        coins: 50,
        total: 1,
        kind: TaskKind::SpendUnder,
        usd_amount: Some(2000),
    },
    TaskTemplate {
        id: "month_log_30",
        title: "Iron ledger",
        description: "Record thirty expenses this month",
        xp: 200,
        coins: 40,
        total: 30,
        kind: TaskKind::LogExpenses,
        usd_amount: None,
    },
    TaskTemplate {
        id: "month_no_spend_8",
        title: "Quiet month",
        description: "Have eight no-spend days this month",
        xp: 280,
        coins: 55,
        total: 8,
        kind: TaskKind::NoSpendDays,
        usd_amount: None,
    },
    TaskTemplate {
        id: "month_eight_categories",
        title: "Category cartographer",
        description: "Log expenses across eight different categories this month",
        xp: 220,
        coins: 45,
        total: 8,
        kind: TaskKind::Categories,
        usd_amount: None,
    },
];

/// Fixed approximate rates, USD base. Only used to scale task thresholds
/// into familiar local magnitudes; not a real FX source.
pub static CURRENCY_RATES: &[(&str, f64)] = &[
    ("USD", 1.0),
    ("EUR", 0.92),
    ("GBP", 0.79),
    ("CHF", 0.88),
    ("CAD", 1.36),
    ("AUD", 1.52),
    ("JPY", 150.0),
    ("CNY", 7.2),
    ("INR", 83.0),
    ("BRL", 5.0),
    ("MXN", 17.0),
    ("SEK", 10.5),
];

fn rate_for(ccy: &str) -> f64 {
    CURRENCY_RATES
        .iter()
        .find(|(c, _)| c.eq_ignore_ascii_case(ccy))
        .map(|(_, r)| *r)
        .unwrap_or(1.0)
}

/// Round a scaled threshold to a clean denomination: nearest 5 under 100,
/// nearest 50 under 1000, nearest 100 above.
pub fn round_clean(v: f64) -> i64 {
    let step = if v < 100.0 {
        5.0
    } else if v < 1000.0 {
        50.0
    } else {
        100.0
    };
    let rounded = (v / step).round() * step;
    (rounded as i64).max(step as i64)
}

/// Scale a USD threshold into the display currency and round it clean.
pub fn scale_for_currency(usd: i64, ccy: &str) -> i64 {
    round_clean(usd as f64 * rate_for(ccy))
}

/// A task template bound to a display currency.
#[derive(Debug, Clone, Serialize)]
pub struct TaskDescriptor {
    pub id: String,
    pub title: String,
    pub description: String,
    pub xp: i64,
    pub coins: i64,
    pub total: u32,
    pub kind: TaskKind,
    /// Threshold in the display currency, where the kind carries one.
    pub amount: Option<Decimal>,
}

pub fn materialize(t: &TaskTemplate, currency: &str) -> TaskDescriptor {
    let amount = t.usd_amount.map(|u| Decimal::from(scale_for_currency(u, currency)));
    let description = match amount {
        Some(a) => t
            .description
            .replace("{amount}", &format!("{} {}", a, currency)),
        None => t.description.to_string(),
    };
    TaskDescriptor {
        id: t.id.to_string(),
        title: t.title.to_string(),
        description,
        xp: t.xp,
        coins: t.coins,
        total: t.total,
        kind: t.kind,
        amount,
    }
}

fn range_start(kind: PeriodKind, today: NaiveDate) -> NaiveDate {
    match kind {
        PeriodKind::Day => today,
        PeriodKind::Week => {
            today - chrono::Duration::days(i64::from(today.weekday().num_days_from_monday()))
        }
        PeriodKind::Month => today.with_day(1).unwrap_or(today),
    }
}

/// Progress toward a task, recomputed from the full transaction log on
/// every call. Capped at the task's completion target.
pub fn task_progress(
    task: &TaskDescriptor,
    cadence: PeriodKind,
    txs: &[Transaction],
    today: NaiveDate,
) -> u32 {
    let start = range_start(cadence, today);
    let in_range = |t: &&Transaction| t.date >= start && t.date <= today;

    let progress = match task.kind {
        TaskKind::LogExpenses => txs
            .iter()
            .filter(in_range)
            .filter(|t| t.kind == TxKind::Expense)
            .count() as u32,
        TaskKind::LogIncome => txs
            .iter()
            .filter(in_range)
            .filter(|t| t.kind == TxKind::Income)
            .count() as u32,
        TaskKind::SpendUnder => {
            let spent: Decimal = txs
                .iter()
                .filter(in_range)
                .filter(|t| t.kind == TxKind::Expense)
                .map(|t| t.amount)
                .sum();
            match task.amount {
                Some(limit) if spent < limit => task.total,
                _ => 0,
            }
        }
        TaskKind::NoSpendDays => {
            let spent_days: HashSet<NaiveDate> = txs
                .iter()
                .filter(in_range)
                .filter(|t| t.kind == TxKind::Expense)
                .map(|t| t.date)
                .collect();
            let mut quiet = 0u32;
            let mut d = start;
            while d <= today {
                if !spent_days.contains(&d) {
                    quiet += 1;
                }
                d = match d.succ_opt() {
                    Some(n) => n,
                    None => break,
                };
            }
            quiet
        }
        TaskKind::Categories => {
            let cats: HashSet<&str> = txs
                .iter()
                .filter(in_range)
                .filter(|t| t.kind == TxKind::Expense)
                .map(|t| t.category.as_str())
                .collect();
            cats.len() as u32
        }
        TaskKind::SaveAmount => {
            let mut net = Decimal::ZERO;
            for t in txs.iter().filter(in_range) {
                match t.kind {
                    TxKind::Income => net += t.amount,
                    TxKind::Expense => net -= t.amount,
                }
            }
            match task.amount {
                Some(target) if net >= target => task.total,
                _ => 0,
            }
        }
    };
    progress.min(task.total)
}

#[derive(Debug, thiserror::Error)]
pub enum ClaimError {
    #[error("Task '{task}' already claimed for {period}")]
    AlreadyClaimed { task: String, period: String },
    #[error("Task '{task}' is not complete yet ({progress}/{total})")]
    Incomplete {
        task: String,
        progress: u32,
        total: u32,
    },
}

/// Claim a completed task for the current period. Double-claims within the
/// same period are rejected via the compound claim key.
pub fn claim_task(
    profile: GamificationProfile,
    task: &TaskDescriptor,
    cadence: PeriodKind,
    progress: u32,
    today: NaiveDate,
) -> Result<GamificationProfile, ClaimError> {
    if progress < task.total {
        return Err(ClaimError::Incomplete {
            task: task.id.clone(),
            progress,
            total: task.total,
        });
    }
    let period = period_token(cadence, today);
    let key = ClaimedTask::new(&task.id, &period);
    if profile.claimed_tasks.contains(&key) {
        return Err(ClaimError::AlreadyClaimed {
            task: task.id.clone(),
            period,
        });
    }
    let mut p = profile;
    p.claimed_tasks.insert(key);
    let p = add_xp(p, task.xp, &format!("task: {}", task.title), today);
    let p = add_coins(p, task.coins);
    Ok(p)
}

#[derive(Debug, Clone, Copy)]
pub enum BadgeRule {
    LevelReached(u32),
    CheckInStreak(u32),
    TransactionsLogged(u32),
    GoalsCompleted(u32),
    CoinsEarned(i64),
    TasksClaimed(u32),
}

pub struct Badge {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub rule: BadgeRule,
}

pub static BADGES: &[Badge] = &[
    Badge {
        id: "first_steps",
        name: "First Steps",
        description: "Log your first transaction",
        rule: BadgeRule::TransactionsLogged(1),
    },
    Badge {
        id: "ledger_50",
        name: "Ledger Keeper",
        description: "Log 50 transactions",
        rule: BadgeRule::TransactionsLogged(50),
    },
    Badge {
        id: "ledger_250",
        name: "Master of the Ledger",
        description: "Log 250 transactions",
        rule: BadgeRule::TransactionsLogged(250),
    },
    Badge {
        id: "level_5",
        name: "Getting Serious",
        description: "Reach level 5",
        rule: BadgeRule::LevelReached(5),
    },
    Badge {
        id: "level_10",
        name: "Double Digits",
        description: "Reach level 10",
        rule: BadgeRule::LevelReached(10),
    },
    Badge {
        id: "streak_7",
        name: "One Week Strong",
        description: "Check in seven days in a row",
        rule: BadgeRule::CheckInStreak(7),
    },
    Badge {
        id: "streak_30",
        name: "Habit Formed",
        description: "Check in thirty days in a row",
        rule: BadgeRule::CheckInStreak(30),
    },
    Badge {
        id: "goal_done",
        name: "Goal Getter",
        description: "Complete a savings goal",
        rule: BadgeRule::GoalsCompleted(1),
    },
    Badge {
        id: "coins_1000",
        name: "Coin Collector",
        description: "Earn 1000 coins in total",
        rule: BadgeRule::CoinsEarned(1000),
    },
    Badge {
        id: "tasks_25",
        name: "Task Machine",
        description: "Claim 25 tasks",
        rule: BadgeRule::TasksClaimed(25),
    },
];

/// Profile-external counters a badge rule may need.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProfileStats {
    pub transactions_logged: u32,
    pub goals_completed: u32,
}

/// Badges whose rule now holds and which the profile does not hold yet.
pub fn newly_earned_badges(
    profile: &GamificationProfile,
    stats: &ProfileStats,
) -> Vec<&'static Badge> {
    BADGES
        .iter()
        .filter(|b| !profile.badges.contains(b.id))
        .filter(|b| match b.rule {
            BadgeRule::LevelReached(n) => profile.level >= n,
            BadgeRule::CheckInStreak(n) => profile.streak >= n,
            BadgeRule::TransactionsLogged(n) => stats.transactions_logged >= n,
            BadgeRule::GoalsCompleted(n) => stats.goals_completed >= n,
            BadgeRule::CoinsEarned(n) => profile.total_coins >= n,
            BadgeRule::TasksClaimed(n) => profile.claimed_tasks.len() as u32 >= n,
        })
        .collect()
}

pub struct ShopItem {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub cost: i64,
}

pub static SHOP_ITEMS: &[ShopItem] = &[
    ShopItem {
        id: "theme_emerald",
        name: "Emerald theme",
        description: "A deep green look for your reports",
        cost: 100,
    },
    ShopItem {
        id: "theme_gold",
        name: "Golden theme",
        description: "For those who made it",
        cost: 500,
    },
    ShopItem {
        id: "icon_rocket",
        name: "Rocket icon pack",
        description: "Extra icons for savings goals",
        cost: 150,
    },
    ShopItem {
        id: "flair_laurel",
        name: "Laurel flair",
        description: "A laurel wreath next to your level",
        cost: 300,
    },
    ShopItem {
        id: "confetti",
        name: "Confetti",
        description: "Celebrate level-ups in style",
        cost: 50,
    },
];

pub fn shop_item(id: &str) -> Option<&'static ShopItem> {
    SHOP_ITEMS.iter().find(|i| i.id == id)
}

#[derive(Debug, thiserror::Error)]
pub enum RedeemError {
    #[error("Unknown shop item '{0}'")]
    UnknownItem(String),
    #[error("Not enough coins: need {need}, have {have}")]
    InsufficientCoins { need: i64, have: i64 },
}

/// Spend coins on a shop item. The profile is returned unchanged inside the
/// error cases.
pub fn redeem(
    profile: GamificationProfile,
    item_id: &str,
    today: NaiveDate,
) -> Result<GamificationProfile, RedeemError> {
    let item = shop_item(item_id).ok_or_else(|| RedeemError::UnknownItem(item_id.to_string()))?;
    if profile.coins < item.cost {
        return Err(RedeemError::InsufficientCoins {
            need: item.cost,
            have: profile.coins,
        });
    }
    let mut p = profile;
    p.coins -= item.cost;
    p.redemption_history.push(crate::models::Redemption {
        date: today,
        item_id: item.id.to_string(),
        cost: item.cost,
    });
    Ok(p)
}
