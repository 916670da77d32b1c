// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use coinquest::engine::scoring::{
    burn_rate, consistency_score, discipline_score, financial_health_score,
};
use coinquest::models::{Transaction, TxKind};

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn dec(v: i64) -> Decimal {
    Decimal::from(v)
}

fn expense(amount: i64, date: NaiveDate) -> Transaction {
    Transaction {
        id: 0,
        kind: TxKind::Expense,
        amount: dec(amount),
        currency: "USD".into(),
        category: "Misc".into(),
        merchant: None,
        payment_method: None,
        date,
        notes: None,
    }
}

#[test]
fn health_score_worked_example() {
    // savings rate 30% -> 40, adherence 84% -> 30, ratio 70% (not <70) -> 10
    let score = financial_health_score(dec(60000), dec(42000), dec(50000), dec(42000));
    assert_eq!(score, 80);
}

#[test]
fn health_score_all_zero_input() {
    // only the ratio branch fires, and it defaults to 100 -> 0 points
    let score = financial_health_score(dec(0), dec(0), dec(0), dec(0));
    assert_eq!(score, 0);
}

#[test]
fn health_score_is_bounded() {
    // best case across all three bands
    let score = financial_health_score(dec(10000), dec(2000), dec(5000), dec(2000));
    assert!(score <= 100);
    assert_eq!(score, 100); // 40 + 30 + 30
}

#[test]
fn health_score_ratio_bands() {
    // income 100, expenses 49 -> ratio 49% -> 30 ratio points
    // savings rate 51% -> 40; no budget
    assert_eq!(financial_health_score(dec(100), dec(49), dec(0), dec(0)), 70);
    // expenses 69 -> ratio <70 -> 20; savings 31% -> 40
    assert_eq!(financial_health_score(dec(100), dec(69), dec(0), dec(0)), 60);
    // expenses 89 -> ratio <90 -> 10; savings 11% -> 25
    assert_eq!(financial_health_score(dec(100), dec(89), dec(0), dec(0)), 35);
}

#[test]
fn discipline_neutral_without_transactions() {
    assert_eq!(discipline_score(&[], dec(100)), 50);
}

#[test]
fn discipline_counts_days_within_budget() {
    let txs = vec![
        expense(40, d(2025, 8, 1)),
        expense(70, d(2025, 8, 1)), // day total 110, over
        expense(30, d(2025, 8, 2)), // within
        expense(90, d(2025, 8, 3)), // within
        expense(200, d(2025, 8, 4)), // over
    ];
    // 2 of 4 distinct days within a 100 daily budget
    assert_eq!(discipline_score(&txs, dec(100)), 50);
}

#[test]
fn discipline_ignores_income() {
    let mut txs = vec![expense(40, d(2025, 8, 1))];
    txs.push(Transaction {
        kind: TxKind::Income,
        ..expense(100000, d(2025, 8, 2))
    });
    assert_eq!(discipline_score(&txs, dec(100)), 100);
}

#[test]
fn consistency_caps_streak_part() {
    assert_eq!(consistency_score(0, dec(0), dec(0)), 0);
    assert_eq!(consistency_score(3, dec(0), dec(0)), 30);
    assert_eq!(consistency_score(12, dec(0), dec(0)), 50); // capped
    // surplus bonus needs income > expenses > 0
    assert_eq!(consistency_score(2, dec(500), dec(300)), 70);
    assert_eq!(consistency_score(2, dec(500), dec(0)), 20); // no expenses, no bonus
}

#[test]
fn burn_rate_zero_spend_defaults() {
    let b = burn_rate(dec(0), dec(1000), d(2025, 8, 15));
    assert_eq!(b.days_until_exhaustion, 30);
    assert!(!b.over_budget);
    assert_eq!(b.daily, dec(0));
}

#[test]
fn burn_rate_projects_month_end() {
    // 150 spent over 15 days -> 10/day -> 310 projected in a 31-day month
    let b = burn_rate(dec(150), dec(1000), d(2025, 8, 15));
    assert_eq!(b.daily, dec(10));
    assert_eq!(b.projected, dec(310));
    assert!(!b.over_budget);
    // remaining 850 / 10 per day
    assert_eq!(b.days_until_exhaustion, 85);
}

#[test]
fn burn_rate_flags_over_budget() {
    let b = burn_rate(dec(600), dec(1000), d(2025, 8, 15)); // 40/day -> 1240 projected
    assert!(b.over_budget);
    assert_eq!(b.days_until_exhaustion, 10); // 400 remaining / 40
}

#[test]
fn burn_rate_exhausted_budget() {
    let b = burn_rate(dec(1200), dec(1000), d(2025, 8, 15));
    assert_eq!(b.days_until_exhaustion, 0);
    assert!(b.over_budget);
}

#[test]
fn burn_rate_without_budget() {
    let b = burn_rate(dec(500), dec(0), d(2025, 8, 15));
    assert!(!b.over_budget);
    assert_eq!(b.days_until_exhaustion, 30);
}
