// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Deterministic task rotation: every user sees the same task subset for a
//! given calendar period. The shuffle is driven by a sine-based
//! pseudo-random function seeded from the period, which is exactly as
//! strong as it needs to be. Do not swap in a CSPRNG; cross-session
//! determinism is the contract here, not unpredictability.

use chrono::{Datelike, NaiveDate};

use crate::engine::rewards::{
    materialize, TaskDescriptor, TaskTemplate, DAILY_TASKS, LOG_EXPENSE_TASK, MONTHLY_TASKS,
    WEEKLY_TASKS,
};

pub const DAILY_COUNT: usize = 5;
pub const WEEKLY_COUNT: usize = 4;
pub const MONTHLY_COUNT: usize = 3;

/// frac(sin(seed) * 10000), seed advancing by one per draw.
pub struct SeedRng {
    state: f64,
}

impl SeedRng {
    pub fn new(seed: u32) -> Self {
        Self {
            state: f64::from(seed),
        }
    }

    pub fn next_f64(&mut self) -> f64 {
        let x = self.state.sin() * 10000.0;
        self.state += 1.0;
        x - x.floor()
    }
}

/// Fisher-Yates driven by the seeded generator.
pub fn shuffle<T>(items: &mut [T], rng: &mut SeedRng) {
    for i in (1..items.len()).rev() {
        let j = (rng.next_f64() * (i as f64 + 1.0)) as usize;
        items.swap(i, j.min(i));
    }
}

pub fn daily_seed(date: NaiveDate) -> u32 {
    date.year().unsigned_abs() * 1000 + date.ordinal()
}

pub fn weekly_seed(date: NaiveDate) -> u32 {
    let iw = date.iso_week();
    iw.year().unsigned_abs() * 100 + iw.week()
}

pub fn monthly_seed(date: NaiveDate) -> u32 {
    date.year().unsigned_abs() * 100 + date.month()
}

fn pick(pool: &'static [TaskTemplate], seed: u32, n: usize, currency: &str) -> Vec<TaskDescriptor> {
    let mut candidates: Vec<&TaskTemplate> = pool.iter().collect();
    let mut rng = SeedRng::new(seed);
    shuffle(&mut candidates, &mut rng);
    candidates
        .into_iter()
        .take(n)
        .map(|t| materialize(t, currency))
        .collect()
}

/// Five daily tasks; slot 0 is always the "log an expense" task, the rest
/// come from the shuffled daily pool.
pub fn daily_tasks(date: NaiveDate, currency: &str) -> Vec<TaskDescriptor> {
    let mut out = Vec::with_capacity(DAILY_COUNT);
    out.push(materialize(&LOG_EXPENSE_TASK, currency));
    out.extend(pick(DAILY_TASKS, daily_seed(date), DAILY_COUNT - 1, currency));
    out
}

pub fn weekly_tasks(date: NaiveDate, currency: &str) -> Vec<TaskDescriptor> {
    pick(WEEKLY_TASKS, weekly_seed(date), WEEKLY_COUNT, currency)
}

pub fn monthly_tasks(date: NaiveDate, currency: &str) -> Vec<TaskDescriptor> {
    pick(MONTHLY_TASKS, monthly_seed(date), MONTHLY_COUNT, currency)
}
