// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Financial scoring: four independent pure functions over aggregated
//! monthly sums, plus the burn-rate projection. Scores are 0-100; missing
//! inputs degrade to neutral values rather than erroring.

use chrono::{Datelike, NaiveDate};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::models::{Transaction, TxKind};

fn pct(num: Decimal, den: Decimal) -> Decimal {
    num / den * Decimal::from(100)
}

/// Weighted sum of three bands: savings rate (40/25/10), budget adherence
/// (30/15), and expense/income ratio (30/20/10). The ratio defaults to 100
/// when there is no income. Capped at 100.
pub fn financial_health_score(
    income: Decimal,
    expenses: Decimal,
    total_budget: Decimal,
    total_spent: Decimal,
) -> u32 {
    let mut score = 0u32;

    if income > Decimal::ZERO {
        let savings_rate = pct(income - expenses, income);
        score += if savings_rate >= Decimal::from(20) {
            40
        } else if savings_rate >= Decimal::from(10) {
            25
        } else if savings_rate > Decimal::ZERO {
            10
        } else {
            0
        };
    }

    if total_budget > Decimal::ZERO {
        let usage = pct(total_spent, total_budget);
        score += if usage <= Decimal::from(85) {
            30
        } else if usage <= Decimal::from(100) {
            15
        } else {
            0
        };
    }

    let ratio = if income > Decimal::ZERO {
        pct(expenses, income)
    } else {
        Decimal::from(100)
    };
    score += if ratio < Decimal::from(50) {
        30
    } else if ratio < Decimal::from(70) {
        20
    } else if ratio < Decimal::from(90) {
        10
    } else {
        0
    };

    score.min(100)
}

/// Fraction of distinct expense days whose total stayed within the daily
/// budget, as 0-100. Neutral 50 when there are no expense transactions.
pub fn discipline_score(transactions: &[Transaction], daily_budget: Decimal) -> u32 {
    let mut days: BTreeMap<NaiveDate, Decimal> = BTreeMap::new();
    for t in transactions.iter().filter(|t| t.kind == TxKind::Expense) {
        *days.entry(t.date).or_insert(Decimal::ZERO) += t.amount;
    }
    if days.is_empty() {
        return 50;
    }
    let within = days.values().filter(|v| **v <= daily_budget).count();
    (within * 100 / days.len()) as u32
}

/// `min(50, streak*10)` plus 50 when income exceeds expenses and expenses
/// are positive.
pub fn consistency_score(savings_streak_months: u32, income: Decimal, expenses: Decimal) -> u32 {
    let streak_part = (savings_streak_months * 10).min(50);
    let surplus_part = if income > expenses && expenses > Decimal::ZERO {
        50
    } else {
        0
    };
    streak_part + surplus_part
}

#[derive(Debug, Clone, Serialize)]
pub struct BurnRate {
    /// Average spend per elapsed day of the month.
    pub daily: Decimal,
    /// Projected month-end spend at the current daily rate.
    pub projected: Decimal,
    pub over_budget: bool,
    /// Days until the remaining budget runs out at the current rate;
    /// 30 when the burn rate is zero or no budget is set.
    pub days_until_exhaustion: i64,
}

pub fn burn_rate(current_expenses: Decimal, total_budget: Decimal, today: NaiveDate) -> BurnRate {
    let elapsed = Decimal::from(today.day());
    let days_in_month = Decimal::from(crate::utils::days_in_month(today));

    let daily = current_expenses / elapsed;
    let projected = daily * days_in_month;
    let over_budget = total_budget > Decimal::ZERO && projected > total_budget;

    let days_until_exhaustion = if daily <= Decimal::ZERO || total_budget <= Decimal::ZERO {
        30
    } else {
        let remaining = total_budget - current_expenses;
        if remaining <= Decimal::ZERO {
            0
        } else {
            (remaining / daily).floor().to_i64().unwrap_or(30)
        }
    };

    BurnRate {
        daily,
        projected,
        over_budget,
        days_until_exhaustion,
    }
}
