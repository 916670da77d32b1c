// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rusqlite::Connection;

use coinquest::db::{init_schema, load_profile, save_profile};
use coinquest::engine::xp::add_xp;
use coinquest::models::{ClaimedTask, Redemption};

fn conn() -> Connection {
    let mut c = Connection::open_in_memory().unwrap();
    init_schema(&mut c).unwrap();
    c
}

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

#[test]
fn fresh_schema_seeds_a_level_one_profile() {
    let c = conn();
    let p = load_profile(&c).unwrap();
    assert_eq!(p.level, 1);
    assert_eq!(p.xp, 0);
    assert_eq!(p.coins, 0);
    assert!(p.badges.is_empty());
    assert!(p.claimed_tasks.is_empty());
}

#[test]
fn init_schema_is_idempotent() {
    let mut c = conn();
    let p = load_profile(&c).unwrap();
    let p = add_xp(p, 42, "test", d(2025, 8, 15));
    save_profile(&c, &p).unwrap();

    // re-running the schema must not reset the stored profile
    init_schema(&mut c).unwrap();
    let p = load_profile(&c).unwrap();
    assert_eq!(p.total_xp, 42);
}

#[test]
fn profile_round_trips_through_sqlite() {
    let c = conn();
    let mut p = load_profile(&c).unwrap();
    p.level = 4;
    p.xp = 120;
    p.total_xp = 900;
    p.coins = 77;
    p.total_coins = 150;
    p.streak = 6;
    p.last_check_in = Some(d(2025, 8, 15));
    p.badges.insert("first_steps".into());
    p.claimed_tasks
        .insert(ClaimedTask::new("log_expense", "2025-08-15"));
    p.claimed_tasks
        .insert(ClaimedTask::new("week_no_spend_2", "2025-W33"));
    p.redemption_history.push(Redemption {
        date: d(2025, 8, 14),
        item_id: "confetti".into(),
        cost: 50,
    });
    save_profile(&c, &p).unwrap();

    let q = load_profile(&c).unwrap();
    assert_eq!(q.level, 4);
    assert_eq!(q.xp, 120);
    assert_eq!(q.total_xp, 900);
    assert_eq!(q.coins, 77);
    assert_eq!(q.total_coins, 150);
    assert_eq!(q.streak, 6);
    assert_eq!(q.last_check_in, Some(d(2025, 8, 15)));
    assert!(q.badges.contains("first_steps"));
    assert_eq!(q.claimed_tasks.len(), 2);
    // compound keys with underscores in the task id survive the round trip
    assert!(q
        .claimed_tasks
        .contains(&ClaimedTask::new("week_no_spend_2", "2025-W33")));
    assert_eq!(q.redemption_history.len(), 1);
    assert_eq!(q.redemption_history[0].item_id, "confetti");
}

#[test]
fn history_truncation_survives_persistence() {
    let c = conn();
    let mut p = load_profile(&c).unwrap();
    for i in 0..80 {
        p = add_xp(p, 1, &format!("gain {}", i), d(2025, 8, 15));
    }
    save_profile(&c, &p).unwrap();
    let q = load_profile(&c).unwrap();
    assert_eq!(q.history.len(), coinquest::engine::xp::HISTORY_LIMIT);
    assert_eq!(q.history[0].reason, "gain 79");
}

#[test]
fn corrupt_claim_key_fails_loudly() {
    let c = conn();
    c.execute(
        "UPDATE profile SET claimed_tasks='[\"nodigits\"]' WHERE id=1",
        [],
    )
    .unwrap();
    assert!(load_profile(&c).is_err());
}
