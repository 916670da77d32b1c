// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;

use crate::models::{GamificationProfile, HistoryEntry};

/// Base of the exponential level curve.
pub const XP_BASE: f64 = 100.0;

/// Most recent history entries kept on the profile.
pub const HISTORY_LIMIT: usize = 50;

/// XP required to move past `level`: floor(100 * level^1.4).
/// Strictly increasing for level >= 1.
pub fn xp_threshold(level: u32) -> i64 {
    (XP_BASE * f64::from(level.max(1)).powf(1.4)).floor() as i64
}

fn push_history(p: &mut GamificationProfile, date: NaiveDate, delta: i64, reason: &str) {
    p.history.insert(
        0,
        HistoryEntry {
            date,
            delta,
            reason: reason.to_string(),
        },
    );
    p.history.truncate(HISTORY_LIMIT);
}

/// Add XP and roll over level-ups. Each level gained awards `level * 10`
/// coins (at the new level). Post-condition: `xp < xp_threshold(level)`.
pub fn add_xp(
    mut profile: GamificationProfile,
    amount: i64,
    reason: &str,
    today: NaiveDate,
) -> GamificationProfile {
    let amount = amount.max(0);
    profile.xp += amount;
    profile.total_xp += amount;
    push_history(&mut profile, today, amount, reason);
    while profile.xp >= xp_threshold(profile.level) {
        profile.xp -= xp_threshold(profile.level);
        profile.level += 1;
        let award = i64::from(profile.level) * 10;
        profile.coins += award;
        profile.total_coins += award;
    }
    profile
}

/// Deduct XP, clamped at zero. Never de-levels.
pub fn remove_xp(
    mut profile: GamificationProfile,
    amount: i64,
    reason: &str,
    today: NaiveDate,
) -> GamificationProfile {
    let amount = amount.max(0);
    profile.xp = (profile.xp - amount).max(0);
    profile.total_xp = (profile.total_xp - amount).max(0);
    push_history(&mut profile, today, -amount, reason);
    profile
}

/// Grant coins without touching XP.
pub fn add_coins(mut profile: GamificationProfile, amount: i64) -> GamificationProfile {
    let amount = amount.max(0);
    profile.coins += amount;
    profile.total_coins += amount;
    profile
}
