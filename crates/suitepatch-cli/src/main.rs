//! Suitepatch CLI: the `suitepatch` command.

mod cli;
mod commands;
mod support;

use clap::Parser;
use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Apply {
            plan,
            dir,
            commit,
            json,
        } => commands::apply::run(plan, dir, commit, json),

        Commands::Structure { dir, json } => commands::structure::run(dir, json),

        Commands::Seed {
            suite,
            dir,
            commit,
            json,
        } => commands::seed::run(suite, dir, commit, json),
    }
}
