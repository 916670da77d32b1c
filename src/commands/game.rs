// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use rusqlite::Connection;

use crate::commands::transactions::load_all;
use crate::engine::rewards::{
    claim_task, newly_earned_badges, redeem, task_progress, ProfileStats, TaskDescriptor, BADGES,
    SHOP_ITEMS,
};
use crate::engine::rotation::{daily_tasks, monthly_tasks, weekly_tasks};
use crate::engine::streak::{apply_check_in, current_streak, period_token, PeriodKind};
use crate::engine::xp::xp_threshold;
use crate::models::{ClaimedTask, GamificationProfile};
use crate::utils::{maybe_print_json, parse_date, pretty_table, today};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("checkin", _)) => checkin(conn)?,
        Some(("tasks", sub)) => tasks(conn, sub)?,
        Some(("claim", sub)) => claim(conn, sub)?,
        Some(("profile", sub)) => profile(conn, sub)?,
        Some(("badges", _)) => badges(conn)?,
        Some(("shop", _)) => shop()?,
        Some(("redeem", sub)) => redeem_item(conn, sub)?,
        _ => {}
    }
    Ok(())
}

/// Current values of the profile-external badge counters.
pub fn profile_stats(conn: &Connection) -> Result<ProfileStats> {
    let transactions_logged: u32 =
        conn.query_row("SELECT COUNT(*) FROM transactions", [], |r| r.get(0))?;
    let goals_completed: u32 = conn.query_row(
        "SELECT COUNT(*) FROM savings_goals WHERE is_completed=1",
        [],
        |r| r.get(0),
    )?;
    Ok(ProfileStats {
        transactions_logged,
        goals_completed,
    })
}

/// Re-evaluate badge rules and attach any newly earned badges, announcing
/// them as they land.
pub fn award_badges(
    conn: &Connection,
    mut profile: GamificationProfile,
) -> Result<GamificationProfile> {
    let stats = profile_stats(conn)?;
    let earned: Vec<&'static str> = newly_earned_badges(&profile, &stats)
        .iter()
        .map(|b| {
            println!("Badge earned: {} - {}", b.name, b.description);
            b.id
        })
        .collect();
    for id in earned {
        profile.badges.insert(id.to_string());
    }
    Ok(profile)
}

fn checkin(conn: &Connection) -> Result<()> {
    let profile = crate::db::load_profile(conn)?;
    let (profile, awarded) = apply_check_in(profile, today());
    if !awarded {
        println!("Already checked in today (streak: {})", profile.streak);
        return Ok(());
    }
    println!(
        "Checked in! Streak: {} day{}",
        profile.streak,
        if profile.streak == 1 { "" } else { "s" }
    );
    let profile = award_badges(conn, profile)?;
    crate::db::save_profile(conn, &profile)?;
    Ok(())
}

fn cadence_of(s: &str) -> PeriodKind {
    match s {
        "weekly" => PeriodKind::Week,
        "monthly" => PeriodKind::Month,
        _ => PeriodKind::Day,
    }
}

fn rotation_for(
    cadence: PeriodKind,
    date: chrono::NaiveDate,
    currency: &str,
) -> Vec<TaskDescriptor> {
    match cadence {
        PeriodKind::Day => daily_tasks(date, currency),
        PeriodKind::Week => weekly_tasks(date, currency),
        PeriodKind::Month => monthly_tasks(date, currency),
    }
}

fn tasks(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let date = match sub.get_one::<String>("date") {
        Some(s) => parse_date(s)?,
        None => today(),
    };
    let currency = crate::db::get_base_currency(conn)?;
    let txs = load_all(conn)?;
    let profile = crate::db::load_profile(conn)?;

    #[derive(serde::Serialize)]
    struct TaskRow {
        cadence: &'static str,
        #[serde(flatten)]
        task: TaskDescriptor,
        progress: u32,
        claimed: bool,
    }

    let mut out = Vec::new();
    for (label, cadence) in [
        ("daily", PeriodKind::Day),
        ("weekly", PeriodKind::Week),
        ("monthly", PeriodKind::Month),
    ] {
        let period = period_token(cadence, date);
        for task in rotation_for(cadence, date, &currency) {
            let progress = task_progress(&task, cadence, &txs, date);
            let claimed = profile
                .claimed_tasks
                .contains(&ClaimedTask::new(&task.id, &period));
            out.push(TaskRow {
                cadence: label,
                task,
                progress,
                claimed,
            });
        }
    }

    if !maybe_print_json(json_flag, jsonl_flag, &out)? {
        let rows: Vec<Vec<String>> = out
            .iter()
            .map(|r| {
                vec![
                    r.cadence.to_string(),
                    r.task.id.clone(),
                    r.task.description.clone(),
                    format!("{}/{}", r.progress, r.task.total),
                    format!("{} XP, {} coins", r.task.xp, r.task.coins),
                    if r.claimed { "yes".into() } else { "".into() },
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["Cadence", "Task", "Description", "Progress", "Reward", "Claimed"],
                rows
            )
        );
    }
    Ok(())
}

fn claim(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let task_id = sub.get_one::<String>("task").unwrap();
    let cadence = cadence_of(sub.get_one::<String>("cadence").unwrap());
    let date = today();
    let currency = crate::db::get_base_currency(conn)?;

    let task = rotation_for(cadence, date, &currency)
        .into_iter()
        .find(|t| &t.id == task_id)
        .with_context(|| format!("Task '{}' is not in the current rotation", task_id))?;

    let txs = load_all(conn)?;
    let progress = task_progress(&task, cadence, &txs, date);

    let profile = crate::db::load_profile(conn)?;
    let before = profile.level;
    let profile = claim_task(profile, &task, cadence, progress, date)?;
    println!(
        "Claimed '{}': +{} XP, +{} coins",
        task.title, task.xp, task.coins
    );
    if profile.level > before {
        println!("Level up! Now level {}", profile.level);
    }
    let profile = award_badges(conn, profile)?;
    crate::db::save_profile(conn, &profile)?;
    Ok(())
}

fn profile(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let p = crate::db::load_profile(conn)?;
    if maybe_print_json(json_flag, jsonl_flag, &p)? {
        return Ok(());
    }
    let claims: Vec<ClaimedTask> = p.claimed_tasks.iter().cloned().collect();
    let now = today();
    let rows = vec![
        vec!["Level".to_string(), p.level.to_string()],
        vec![
            "XP".to_string(),
            format!("{} / {}", p.xp, xp_threshold(p.level)),
        ],
        vec!["Total XP".to_string(), p.total_xp.to_string()],
        vec!["Coins".to_string(), p.coins.to_string()],
        vec!["Check-in streak".to_string(), p.streak.to_string()],
        vec![
            "Last check-in".to_string(),
            p.last_check_in.map(|d| d.to_string()).unwrap_or_default(),
        ],
        vec!["Badges".to_string(), p.badges.len().to_string()],
        vec!["Tasks claimed".to_string(), p.claimed_tasks.len().to_string()],
        vec![
            "Claim streaks".to_string(),
            format!(
                "{} day(s) / {} week(s) / {} month(s)",
                current_streak(PeriodKind::Day, &claims, now),
                current_streak(PeriodKind::Week, &claims, now),
                current_streak(PeriodKind::Month, &claims, now),
            ),
        ],
    ];
    println!("{}", pretty_table(&["Stat", "Value"], rows));
    Ok(())
}

fn badges(conn: &Connection) -> Result<()> {
    let p = crate::db::load_profile(conn)?;
    let rows: Vec<Vec<String>> = BADGES
        .iter()
        .map(|b| {
            vec![
                b.id.to_string(),
                b.name.to_string(),
                b.description.to_string(),
                if p.badges.contains(b.id) {
                    "earned".into()
                } else {
                    "".into()
                },
            ]
        })
        .collect();
    println!("{}", pretty_table(&["Id", "Badge", "How", "Status"], rows));
    Ok(())
}

fn shop() -> Result<()> {
    let rows: Vec<Vec<String>> = SHOP_ITEMS
        .iter()
        .map(|i| {
            vec![
                i.id.to_string(),
                i.name.to_string(),
                i.description.to_string(),
                i.cost.to_string(),
            ]
        })
        .collect();
    println!("{}", pretty_table(&["Id", "Item", "Description", "Coins"], rows));
    Ok(())
}

fn redeem_item(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let item_id = sub.get_one::<String>("item").unwrap();
    let profile = crate::db::load_profile(conn)?;
    let profile = redeem(profile, item_id, today())?;
    crate::db::save_profile(conn, &profile)?;
    println!("Redeemed '{}'. Coins left: {}", item_id, profile.coins);
    Ok(())
}
