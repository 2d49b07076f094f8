//set-pill-cli/src/cli.rs
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

#[derive(Parser, Debug)]
#[command(author, version, about = "Inspect workout history and configure the set pill", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
    /// Print tables as CSV instead
    #[arg(long, global = true)]
    pub export_csv: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List retained workouts, newest first
    History {
        /// Only show workouts for this exercise (exact name)
        #[arg(short, long)]
        exercise: Option<String>,
        /// Show at most N workouts
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },
    /// Show the sets of the most recent workout for an exercise
    Previous {
        /// Exercise name (e.g., "Bench Press")
        name: String,
    },
    /// Delete all stored workout history
    ClearHistory {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Show the path to the config file
    ConfigPath,
    /// Show the path to the history database
    DbPath,
    /// Set the exercise the pill logs
    SetExercise { name: String },
    /// Set how many sets a workout has
    SetSets { count: usize },
    /// Set the rest durations offered by the picker, in seconds
    SetRestPresets {
        #[arg(required = true, num_args = 1..)]
        seconds: Vec<u32>,
    },
    /// Set default units (Metric/Imperial)
    SetUnits {
        #[arg(value_enum)]
        units: UnitsCli,
    },
    /// Set the table header color (e.g., "green", "DarkGrey")
    SetHeaderColor { color: String },
    GenerateCompletion {
        /// The shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnitsCli {
    Metric,
    Imperial,
}

// Function to parse CLI arguments
pub fn parse_args() -> Cli {
    Cli::parse()
}

pub fn build_cli_command() -> clap::Command {
    Cli::command()
}
