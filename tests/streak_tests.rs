// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;

use coinquest::engine::streak::{apply_check_in, current_streak, period_token, PeriodKind};
use coinquest::models::{ClaimedTask, GamificationProfile};

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn day_claims(dates: &[NaiveDate]) -> Vec<ClaimedTask> {
    dates
        .iter()
        .map(|dt| ClaimedTask::new("log_expense", &period_token(PeriodKind::Day, *dt)))
        .collect()
}

#[test]
fn empty_set_is_zero() {
    assert_eq!(current_streak(PeriodKind::Day, &[], d(2025, 8, 15)), 0);
}

#[test]
fn today_only_is_one() {
    let claims = day_claims(&[d(2025, 8, 15)]);
    assert_eq!(current_streak(PeriodKind::Day, &claims, d(2025, 8, 15)), 1);
}

#[test]
fn yesterday_counts_via_grace() {
    let claims = day_claims(&[d(2025, 8, 14)]);
    assert_eq!(current_streak(PeriodKind::Day, &claims, d(2025, 8, 15)), 1);
}

#[test]
fn two_day_gap_resets() {
    let claims = day_claims(&[d(2025, 8, 13)]);
    assert_eq!(current_streak(PeriodKind::Day, &claims, d(2025, 8, 15)), 0);
}

#[test]
fn run_counts_until_first_gap() {
    let claims = day_claims(&[
        d(2025, 8, 15),
        d(2025, 8, 14),
        d(2025, 8, 13),
        // gap on the 12th
        d(2025, 8, 11),
        d(2025, 8, 10),
    ]);
    assert_eq!(current_streak(PeriodKind::Day, &claims, d(2025, 8, 15)), 3);
}

#[test]
fn run_spans_month_boundary() {
    let claims = day_claims(&[d(2025, 9, 1), d(2025, 8, 31), d(2025, 8, 30)]);
    assert_eq!(current_streak(PeriodKind::Day, &claims, d(2025, 9, 1)), 3);
}

#[test]
fn duplicate_claims_count_once() {
    let claims = vec![
        ClaimedTask::new("log_expense", "2025-08-15"),
        ClaimedTask::new("no_spend", "2025-08-15"),
        ClaimedTask::new("log_expense", "2025-08-14"),
    ];
    assert_eq!(current_streak(PeriodKind::Day, &claims, d(2025, 8, 15)), 2);
}

#[test]
fn foreign_tokens_are_ignored() {
    // week/month tokens must not feed the daily streak
    let claims = vec![
        ClaimedTask::new("week_log_10", "2025-W33"),
        ClaimedTask::new("month_log_30", "2025-08"),
    ];
    assert_eq!(current_streak(PeriodKind::Day, &claims, d(2025, 8, 15)), 0);
}

#[test]
fn weekly_streak_walks_iso_weeks() {
    // 2025-08-15 falls in ISO week 33
    let claims = vec![
        ClaimedTask::new("week_save_100", "2025-W33"),
        ClaimedTask::new("week_save_100", "2025-W32"),
        ClaimedTask::new("week_save_100", "2025-W31"),
    ];
    assert_eq!(current_streak(PeriodKind::Week, &claims, d(2025, 8, 15)), 3);
}

#[test]
fn weekly_streak_crosses_year_boundary() {
    // 2026-01-01 is in ISO week 2026-W01; the previous week is 2025-W52
    let claims = vec![
        ClaimedTask::new("week_log_10", "2026-W01"),
        ClaimedTask::new("week_log_10", "2025-W52"),
    ];
    assert_eq!(current_streak(PeriodKind::Week, &claims, d(2026, 1, 1)), 2);
}

#[test]
fn monthly_streak_counts_back() {
    let claims = vec![
        ClaimedTask::new("month_save_500", "2025-08"),
        ClaimedTask::new("month_save_500", "2025-07"),
        ClaimedTask::new("month_save_500", "2025-06"),
        ClaimedTask::new("month_save_500", "2025-04"),
    ];
    assert_eq!(current_streak(PeriodKind::Month, &claims, d(2025, 8, 15)), 3);
}

#[test]
fn claim_key_with_underscores_round_trips() {
    let key: ClaimedTask = "week_no_spend_2_2025-W33".parse().unwrap();
    assert_eq!(key.task_id, "week_no_spend_2");
    assert_eq!(key.period, "2025-W33");
    assert_eq!(key.to_string(), "week_no_spend_2_2025-W33");
}

#[test]
fn malformed_claim_key_is_rejected() {
    assert!("justonetoken".parse::<ClaimedTask>().is_err());
    assert!("task_08-15".parse::<ClaimedTask>().is_err());
}

#[test]
fn check_in_extends_and_resets() {
    let p = GamificationProfile::default();
    let (p, awarded) = apply_check_in(p, d(2025, 8, 14));
    assert!(awarded);
    assert_eq!(p.streak, 1);

    let (p, awarded) = apply_check_in(p, d(2025, 8, 15));
    assert!(awarded);
    assert_eq!(p.streak, 2);

    // gap of more than one day resets
    let (p, awarded) = apply_check_in(p, d(2025, 8, 20));
    assert!(awarded);
    assert_eq!(p.streak, 1);
}

#[test]
fn check_in_same_day_is_noop() {
    let p = GamificationProfile::default();
    let (p, first) = apply_check_in(p, d(2025, 8, 15));
    assert!(first);
    let xp_after_first = p.total_xp;
    let (p, second) = apply_check_in(p, d(2025, 8, 15));
    assert!(!second);
    assert_eq!(p.total_xp, xp_after_first);
    assert_eq!(p.streak, 1);
}
