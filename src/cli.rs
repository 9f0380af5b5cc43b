// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, value_parser};

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

fn confirm_flag(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("yes")
            .long("yes")
            .short('y')
            .action(ArgAction::SetTrue)
            .help("Skip the confirmation prompt"),
    )
}

pub fn build_cli() -> Command {
    Command::new("tallybook")
        .about("Freelance income/expense tracking with clients, monthly summaries, and CSV export")
        .version(clap::crate_version!())
        .subcommand_required(false)
        .subcommand(Command::new("init").about("Initialize the database"))
        .subcommand(
            Command::new("login")
                .about("Select the active profile")
                .arg(Arg::new("email").required(true))
                .arg(
                    Arg::new("create")
                        .long("create")
                        .action(ArgAction::SetTrue)
                        .help("Create the profile if it does not exist"),
                ),
        )
        .subcommand(Command::new("logout").about("Clear the active profile"))
        .subcommand(Command::new("whoami").about("Show the active profile"))
        .subcommand(
            Command::new("client")
                .about("Manage clients")
                .subcommand(
                    Command::new("add")
                        .about("Add a client")
                        .arg(Arg::new("name").required(true)),
                )
                .subcommand(json_flags(Command::new("list").about("List clients")))
                .subcommand(
                    Command::new("edit")
                        .about("Rename a client")
                        .arg(Arg::new("id").required(true).value_parser(value_parser!(i64)))
                        .arg(Arg::new("name").long("name").required(true)),
                )
                .subcommand(confirm_flag(
                    Command::new("rm")
                        .about("Remove a client (income entries keep a dangling reference)")
                        .arg(Arg::new("id").required(true).value_parser(value_parser!(i64))),
                )),
        )
        .subcommand(
            Command::new("income")
                .about("Manage income entries")
                .subcommand(
                    Command::new("add")
                        .about("Record an income entry")
                        .arg(Arg::new("amount").long("amount").required(true).allow_hyphen_values(true))
                        .arg(Arg::new("date").long("date").required(true))
                        .arg(Arg::new("description").long("desc"))
                        .arg(
                            Arg::new("client")
                                .long("client")
                                .value_parser(value_parser!(i64))
                                .help("Client id to associate"),
                        )
                        .arg(Arg::new("currency").long("currency").default_value("USD")),
                )
                .subcommand(json_flags(
                    Command::new("list")
                        .about("List income entries, newest first")
                        .arg(Arg::new("month").long("month").help("Restrict to YYYY-MM"))
                        .arg(
                            Arg::new("limit")
                                .long("limit")
                                .value_parser(value_parser!(usize)),
                        ),
                ))
                .subcommand(
                    Command::new("edit")
                        .about("Update an income entry")
                        .arg(Arg::new("id").required(true).value_parser(value_parser!(i64)))
                        .arg(Arg::new("amount").long("amount").allow_hyphen_values(true))
                        .arg(Arg::new("date").long("date"))
                        .arg(Arg::new("description").long("desc"))
                        .arg(
                            Arg::new("client")
                                .long("client")
                                .value_parser(value_parser!(i64)),
                        )
                        .arg(
                            Arg::new("no-client")
                                .long("no-client")
                                .action(ArgAction::SetTrue)
                                .conflicts_with("client")
                                .help("Clear the client association"),
                        )
                        .arg(Arg::new("currency").long("currency")),
                )
                .subcommand(confirm_flag(
                    Command::new("rm")
                        .about("Delete an income entry")
                        .arg(Arg::new("id").required(true).value_parser(value_parser!(i64))),
                )),
        )
        .subcommand(
            Command::new("expense")
                .about("Manage expense entries")
                .subcommand(
                    Command::new("add")
                        .about("Record an expense entry")
                        .arg(Arg::new("amount").long("amount").required(true).allow_hyphen_values(true))
                        .arg(Arg::new("date").long("date").required(true))
                        .arg(Arg::new("description").long("desc").required(true))
                        .arg(Arg::new("currency").long("currency").default_value("USD")),
                )
                .subcommand(json_flags(
                    Command::new("list")
                        .about("List expense entries, newest first")
                        .arg(Arg::new("month").long("month").help("Restrict to YYYY-MM"))
                        .arg(
                            Arg::new("limit")
                                .long("limit")
                                .value_parser(value_parser!(usize)),
                        ),
                ))
                .subcommand(
                    Command::new("edit")
                        .about("Update an expense entry")
                        .arg(Arg::new("id").required(true).value_parser(value_parser!(i64)))
                        .arg(Arg::new("amount").long("amount").allow_hyphen_values(true))
                        .arg(Arg::new("date").long("date"))
                        .arg(Arg::new("description").long("desc"))
                        .arg(Arg::new("currency").long("currency")),
                )
                .subcommand(confirm_flag(
                    Command::new("rm")
                        .about("Delete an expense entry")
                        .arg(Arg::new("id").required(true).value_parser(value_parser!(i64))),
                )),
        )
        .subcommand(json_flags(
            Command::new("summary")
                .about("Income, expenses and net for a calendar month")
                .arg(Arg::new("month").long("month").help("Reference month YYYY-MM (default: current)"))
                .arg(
                    Arg::new("offset")
                        .long("offset")
                        .value_parser(value_parser!(i32))
                        .allow_hyphen_values(true)
                        .help("Shift the reference month by N months (e.g. -1 for previous)"),
                )
                .arg(
                    Arg::new("all")
                        .long("all")
                        .action(ArgAction::SetTrue)
                        .conflicts_with_all(["month", "offset"])
                        .help("All-time totals over the unified transaction list"),
                ),
        ))
        .subcommand(
            Command::new("tx").about("Unified transaction view").subcommand(json_flags(
                Command::new("list")
                    .about("List income and expenses merged, newest first")
                    .arg(Arg::new("month").long("month").help("Restrict to YYYY-MM"))
                    .arg(
                        Arg::new("limit")
                            .long("limit")
                            .value_parser(value_parser!(usize)),
                    ),
            )),
        )
        .subcommand(
            Command::new("export").about("Export data").subcommand(
                Command::new("transactions")
                    .about("Export the unified transaction list")
                    .arg(
                        Arg::new("format")
                            .long("format")
                            .default_value("csv")
                            .help("csv or json"),
                    )
                    .arg(
                        Arg::new("out")
                            .long("out")
                            .default_value("transactions.csv"),
                    ),
            ),
        )
        .subcommand(Command::new("doctor").about("Check ledger integrity"))
}
