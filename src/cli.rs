// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{value_parser, Arg, ArgAction, Command};

fn json_flags(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print as pretty JSON"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .help("Print as JSON lines"),
    )
}

fn tx_cmd() -> Command {
    Command::new("tx")
        .about("Log and inspect transactions")
        .subcommand(
            Command::new("add")
                .about("Record a transaction (awards XP)")
                .arg(Arg::new("amount").long("amount").required(true))
                .arg(Arg::new("category").long("category").required(true))
                .arg(
                    Arg::new("kind")
                        .long("kind")
                        .value_parser(["income", "expense"])
                        .default_value("expense"),
                )
                .arg(Arg::new("date").long("date").help("YYYY-MM-DD, default today"))
                .arg(Arg::new("merchant").long("merchant"))
                .arg(Arg::new("method").long("method").help("Payment method"))
                .arg(Arg::new("notes").long("notes"))
                .arg(Arg::new("currency").long("currency")),
        )
        .subcommand(json_flags(
            Command::new("list")
                .about("List transactions")
                .arg(Arg::new("month").long("month").help("YYYY-MM"))
                .arg(Arg::new("category").long("category"))
                .arg(
                    Arg::new("kind")
                        .long("kind")
                        .value_parser(["income", "expense"]),
                )
                .arg(
                    Arg::new("limit")
                        .long("limit")
                        .value_parser(value_parser!(usize)),
                ),
        ))
        .subcommand(
            Command::new("delete").about("Delete a transaction").arg(
                Arg::new("id")
                    .required(true)
                    .value_parser(value_parser!(i64)),
            ),
        )
}

fn budget_cmd() -> Command {
    Command::new("budget")
        .about("Monthly budgets, category limits, and the surplus decision")
        .subcommand(
            Command::new("set")
                .about("Set the month's total budget")
                .arg(Arg::new("month").long("month").required(true))
                .arg(Arg::new("total").long("total").required(true)),
        )
        .subcommand(
            Command::new("limit")
                .about("Set a per-category limit")
                .arg(Arg::new("month").long("month").required(true))
                .arg(Arg::new("category").long("category").required(true))
                .arg(Arg::new("amount").long("amount").required(true)),
        )
        .subcommand(json_flags(
            Command::new("report")
                .about("Limits vs spent plus burn-rate projection")
                .arg(Arg::new("month").long("month").help("YYYY-MM, default current")),
        ))
        .subcommand(
            Command::new("surplus")
                .about("Decide what happens to a month's surplus (once per month)")
                .arg(Arg::new("month").long("month").required(true))
                .arg(
                    Arg::new("action")
                        .long("action")
                        .required(true)
                        .value_parser(["rollover", "saved", "ignored"]),
                )
                .arg(
                    Arg::new("goal")
                        .long("goal")
                        .help("Savings goal to credit when action is 'saved'"),
                ),
        )
}

fn goal_cmd() -> Command {
    Command::new("goal")
        .about("Savings goals")
        .subcommand(
            Command::new("add")
                .about("Create a savings goal")
                .arg(Arg::new("name").required(true))
                .arg(Arg::new("target").long("target").required(true))
                .arg(Arg::new("color").long("color"))
                .arg(Arg::new("icon").long("icon"))
                .arg(Arg::new("deadline").long("deadline").help("YYYY-MM-DD")),
        )
        .subcommand(
            Command::new("allocate")
                .about("Move money into a goal")
                .arg(Arg::new("name").required(true))
                .arg(Arg::new("amount").long("amount").required(true)),
        )
        .subcommand(
            Command::new("complete")
                .about("Mark a goal completed")
                .arg(Arg::new("name").required(true)),
        )
        .subcommand(json_flags(Command::new("list").about("List goals")))
}

fn sub_cmd() -> Command {
    Command::new("sub")
        .about("Recurring subscriptions")
        .subcommand(
            Command::new("add")
                .about("Track a subscription")
                .arg(Arg::new("title").required(true))
                .arg(Arg::new("amount").long("amount").required(true))
                .arg(
                    Arg::new("date")
                        .long("date")
                        .required(true)
                        .help("First billing date, YYYY-MM-DD"),
                )
                .arg(
                    Arg::new("interval")
                        .long("interval")
                        .value_parser(["weekly", "monthly", "yearly"])
                        .default_value("monthly"),
                )
                .arg(Arg::new("method").long("method").help("Payment method"))
                .arg(
                    Arg::new("remind-days")
                        .long("remind-days")
                        .value_parser(value_parser!(u32))
                        .default_value("3"),
                ),
        )
        .subcommand(json_flags(Command::new("list").about("List subscriptions")))
        .subcommand(
            Command::new("pay")
                .about("Record this cycle's payment as a linked transaction")
                .arg(Arg::new("title").required(true))
                .arg(Arg::new("date").long("date").help("YYYY-MM-DD, default today")),
        )
        .subcommand(
            Command::new("undo")
                .about("Undo the last recorded payment")
                .arg(Arg::new("title").required(true)),
        )
}

fn game_cmd() -> Command {
    Command::new("game")
        .about("Check-ins, tasks, badges, and the coin shop")
        .subcommand(Command::new("checkin").about("Daily check-in"))
        .subcommand(json_flags(
            Command::new("tasks")
                .about("Today's task rotations with progress")
                .arg(Arg::new("date").long("date").help("YYYY-MM-DD, default today")),
        ))
        .subcommand(
            Command::new("claim")
                .about("Claim a completed task")
                .arg(Arg::new("task").required(true).help("Task id"))
                .arg(
                    Arg::new("cadence")
                        .long("cadence")
                        .value_parser(["daily", "weekly", "monthly"])
                        .default_value("daily"),
                ),
        )
        .subcommand(json_flags(Command::new("profile").about("Level, XP, coins, streak")))
        .subcommand(Command::new("badges").about("Earned and available badges"))
        .subcommand(Command::new("shop").about("What coins can buy"))
        .subcommand(
            Command::new("redeem")
                .about("Spend coins on a shop item")
                .arg(Arg::new("item").required(true).help("Shop item id")),
        )
}

fn currency_cmd() -> Command {
    Command::new("currency")
        .about("Display currency used for new transactions and task thresholds")
        .subcommand(
            Command::new("set")
                .arg(Arg::new("code").required(true).help("ISO currency code")),
        )
        .subcommand(Command::new("show"))
}

pub fn build_cli() -> Command {
    Command::new("coinquest")
        .about("Gamified personal finance tracking from the terminal")
        .version(clap::crate_version!())
        .subcommand(Command::new("init").about("Initialize the database"))
        .subcommand(tx_cmd())
        .subcommand(budget_cmd())
        .subcommand(goal_cmd())
        .subcommand(sub_cmd())
        .subcommand(game_cmd())
        .subcommand(json_flags(
            Command::new("score")
                .about("Financial health, discipline, consistency, and burn rate")
                .arg(Arg::new("month").long("month").help("YYYY-MM, default current")),
        ))
        .subcommand(
            Command::new("export").about("Export data").subcommand(
                Command::new("transactions")
                    .arg(
                        Arg::new("format")
                            .long("format")
                            .value_parser(["csv", "json"])
                            .default_value("csv"),
                    )
                    .arg(Arg::new("out").long("out").required(true)),
            ),
        )
        .subcommand(currency_cmd())
        .subcommand(Command::new("doctor").about("Consistency checks"))
}
