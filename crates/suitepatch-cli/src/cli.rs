use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "suitepatch",
    about = "Apply machine-proposed structural edits to a Gherkin feature-test suite",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Apply an update plan: simulate by default, persist with --commit
    Apply {
        /// Path to the update plan JSON
        plan: String,

        /// Base directory holding the feature suite
        #[arg(long, default_value = "features")]
        dir: String,

        /// Persist the result (takes the directory lock, writes backups)
        #[arg(long)]
        commit: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the parsed structure of every feature document
    Structure {
        /// Base directory holding the feature suite
        #[arg(long, default_value = "features")]
        dir: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Materialize a generated suite under the base directory
    Seed {
        /// Path to the generated suite JSON
        suite: String,

        /// Base directory holding the feature suite
        #[arg(long, default_value = "features")]
        dir: String,

        /// Persist instead of simulating
        #[arg(long)]
        commit: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}
