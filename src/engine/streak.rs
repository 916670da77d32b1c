// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{Datelike, Months, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

use crate::engine::rewards::{CHECK_IN_COINS, CHECK_IN_XP};
use crate::engine::xp::{add_coins, add_xp};
use crate::models::{ClaimedTask, GamificationProfile};

/// Calendar cadence a claim period token belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeriodKind {
    Day,
    Week,
    Month,
}

static DAY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("day token regex"));
static WEEK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{4}-W\d{2}$").expect("week token regex"));
static MONTH_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{4}-\d{2}$").expect("month token regex"));

impl PeriodKind {
    fn pattern(&self) -> &'static Regex {
        match self {
            PeriodKind::Day => &DAY_RE,
            PeriodKind::Week => &WEEK_RE,
            PeriodKind::Month => &MONTH_RE,
        }
    }
}

/// Period token for a date: `YYYY-MM-DD`, `YYYY-Www` (ISO week), or `YYYY-MM`.
pub fn period_token(kind: PeriodKind, date: NaiveDate) -> String {
    match kind {
        PeriodKind::Day => date.format("%Y-%m-%d").to_string(),
        PeriodKind::Week => {
            let iw = date.iso_week();
            format!("{:04}-W{:02}", iw.year(), iw.week())
        }
        PeriodKind::Month => format!("{:04}-{:02}", date.year(), date.month()),
    }
}

fn step_back(kind: PeriodKind, date: NaiveDate) -> Option<NaiveDate> {
    match kind {
        PeriodKind::Day => date.pred_opt(),
        PeriodKind::Week => date.checked_sub_days(chrono::Days::new(7)),
        PeriodKind::Month => date.checked_sub_months(Months::new(1)),
    }
}

/// Longest unbroken run of consecutive periods ending at today, or at the
/// previous period if today has no claim yet (grace of exactly one period;
/// two consecutive misses reset to 0). Tokens not matching the kind's
/// pattern are ignored; an empty or all-unmatched set yields 0.
pub fn current_streak(kind: PeriodKind, claims: &[ClaimedTask], today: NaiveDate) -> u32 {
    let tokens: HashSet<&str> = claims
        .iter()
        .map(|c| c.period.as_str())
        .filter(|p| kind.pattern().is_match(p))
        .collect();
    if tokens.is_empty() {
        return 0;
    }

    let mut anchor = today;
    if !tokens.contains(period_token(kind, anchor).as_str()) {
        anchor = match step_back(kind, anchor) {
            Some(d) => d,
            None => return 0,
        };
        if !tokens.contains(period_token(kind, anchor).as_str()) {
            return 0;
        }
    }

    let mut streak = 0u32;
    let mut cursor = anchor;
    loop {
        if !tokens.contains(period_token(kind, cursor).as_str()) {
            break;
        }
        streak += 1;
        cursor = match step_back(kind, cursor) {
            Some(d) => d,
            None => break,
        };
    }
    streak
}

/// Daily check-in: same day is a no-op, a consecutive day extends the
/// streak, any gap resets it to 1. A successful check-in awards the
/// check-in XP and coins.
pub fn apply_check_in(
    profile: GamificationProfile,
    today: NaiveDate,
) -> (GamificationProfile, bool) {
    if profile.last_check_in == Some(today) {
        return (profile, false);
    }
    let streak = match profile.last_check_in {
        Some(prev) if prev.succ_opt() == Some(today) => profile.streak + 1,
        _ => 1,
    };
    let mut p = profile;
    p.streak = streak;
    p.last_check_in = Some(today);
    let p = add_xp(p, CHECK_IN_XP, "daily check-in", today);
    let p = add_coins(p, CHECK_IN_COINS);
    (p, true)
}
