//set-pill-cli/src/main.rs
mod cli;

use anyhow::{bail, Context, Result};
use chrono::Local;
use comfy_table::{presets::UTF8_FULL, Cell, Color, ContentArrangement, Table};
use std::io::{self, stdin, stdout, Write};
use strum::IntoEnumIterator;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use set_pill_lib::{
    format_duration, AppService, CompletedSet, StandardColor, Units, WorkoutHistoryEntry,
};

const LOG_ENV_VAR: &str = "PILL_LOG";

fn main() -> Result<()> {
    init_logging();

    let cli_args = cli::parse_args();
    let export_csv = cli_args.export_csv;

    if let cli::Commands::GenerateCompletion { shell } = cli_args.command {
        let mut cmd = cli::build_cli_command();
        let bin_name = cmd.get_name().to_string();

        eprintln!("Generating completion script for {}...", shell);
        clap_complete::generate(shell, &mut cmd, bin_name, &mut stdout());
        return Ok(());
    }

    let mut service =
        AppService::initialize().context("Failed to initialize application service")?;
    debug!(command = ?cli_args.command, "running command");

    match cli_args.command {
        cli::Commands::GenerateCompletion { .. } => {
            unreachable!("Completion generation should have exited already");
        }
        cli::Commands::History { exercise, limit } => {
            let entries = service.list_history(exercise.as_deref(), limit);
            if entries.is_empty() {
                println!("No workouts found matching the criteria.");
            } else if export_csv {
                write_history_csv(io::stdout(), &entries, service.config.units)?;
            } else {
                print_history_table(&entries, header_color(&service), service.config.units);
            }
        }
        cli::Commands::Previous { name } => {
            let sets = service.previous_sets(name.trim());
            if sets.is_empty() {
                println!("No previous workout found for '{}'.", name.trim());
            } else if export_csv {
                write_sets_csv(io::stdout(), &sets, service.config.units)?;
            } else {
                print_sets_table(&sets, header_color(&service), service.config.units);
            }
        }
        cli::Commands::ClearHistory { yes } => {
            if !yes && !confirm("Delete all stored workout history?")? {
                println!("Aborted.");
                return Ok(());
            }
            match service.clear_history() {
                Ok(()) => println!("Workout history cleared."),
                Err(e) => bail!("Error clearing history: {}", e),
            }
        }
        cli::Commands::ConfigPath => {
            println!("Config file is located at: {:?}", service.get_config_path());
        }
        cli::Commands::DbPath => {
            println!("Database file is located at: {:?}", service.get_db_path());
        }
        cli::Commands::SetExercise { name } => match service.set_exercise_name(&name) {
            Ok(()) => {
                println!(
                    "Successfully set exercise to: '{}'",
                    service.config.exercise_name
                );
                println!("Config file updated: {:?}", service.get_config_path());
            }
            Err(e) => bail!("Error setting exercise: {}", e),
        },
        cli::Commands::SetSets { count } => match service.set_set_count(count) {
            Ok(()) => {
                println!("Successfully set sets per workout to: {}", count);
                println!("Config file updated: {:?}", service.get_config_path());
            }
            Err(e) => bail!("Error setting set count: {}", e),
        },
        cli::Commands::SetRestPresets { seconds } => match service.set_rest_presets(&seconds) {
            Ok(()) => {
                let shown: Vec<String> = service
                    .config
                    .rest_presets
                    .iter()
                    .map(|&s| format_duration(u64::from(s)))
                    .collect();
                println!("Successfully set rest presets to: {}", shown.join(", "));
                println!("Config file updated: {:?}", service.get_config_path());
            }
            Err(e) => bail!("Error setting rest presets: {}", e),
        },
        cli::Commands::SetUnits { units } => {
            let lib_units = match units {
                cli::UnitsCli::Metric => Units::Metric,
                cli::UnitsCli::Imperial => Units::Imperial,
            };
            match service.set_units(lib_units) {
                Ok(()) => {
                    println!("Successfully set default units to: {:?}", lib_units);
                    println!("Config file updated: {:?}", service.get_config_path());
                }
                Err(e) => bail!("Error setting units: {}", e),
            }
        }
        cli::Commands::SetHeaderColor { color } => match service.set_header_color(&color) {
            Ok(()) => {
                println!(
                    "Successfully set header color to: {}",
                    service.config.theme.header_color
                );
                println!("Config file updated: {:?}", service.get_config_path());
            }
            Err(e) => {
                let valid: Vec<String> = StandardColor::iter().map(|c| c.to_string()).collect();
                bail!("Error setting header color: {}\nValid colors: {}", e, valid.join(", "))
            }
        },
    }

    Ok(())
}

fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn confirm(question: &str) -> Result<bool> {
    print!("{} [y/N]: ", question);
    stdout().flush()?;
    let mut input = String::new();
    stdin().read_line(&mut input)?;
    Ok(matches!(input.trim().to_lowercase().as_str(), "y" | "yes"))
}

fn header_color(service: &AppService) -> Color {
    set_pill_lib::parse_color(&service.config.theme.header_color)
        .map(Color::from)
        .unwrap_or(Color::Green) // Fallback
}

/// Prints one row per completed set, grouped by workout.
fn print_history_table(entries: &[WorkoutHistoryEntry], header_color: Color, units: Units) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Date (Local)").fg(header_color),
            Cell::new("Exercise").fg(header_color),
            Cell::new("Set").fg(header_color),
            Cell::new(format!("Weight ({})", units.weight_label())).fg(header_color),
            Cell::new("Reps").fg(header_color),
            Cell::new("Time").fg(header_color),
        ]);

    for entry in entries {
        let date = entry
            .date
            .with_timezone(&Local)
            .format("%Y-%m-%d %H:%M")
            .to_string();
        for set in &entry.sets {
            table.add_row(vec![
                Cell::new(&date),
                Cell::new(&entry.exercise_name),
                Cell::new(set.set_number.to_string()),
                Cell::new(&set.weight),
                Cell::new(&set.reps),
                Cell::new(&set.elapsed_time),
            ]);
        }
    }
    println!("{table}");
}

fn print_sets_table(sets: &[CompletedSet], header_color: Color, units: Units) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Set").fg(header_color),
            Cell::new(format!("Weight ({})", units.weight_label())).fg(header_color),
            Cell::new("Reps").fg(header_color),
            Cell::new("Time").fg(header_color),
        ]);

    for set in sets {
        table.add_row(vec![
            Cell::new(set.set_number.to_string()),
            Cell::new(&set.weight),
            Cell::new(&set.reps),
            Cell::new(&set.elapsed_time),
        ]);
    }
    println!("{table}");
}

fn write_history_csv<W: Write>(out: W, entries: &[WorkoutHistoryEntry], units: Units) -> Result<()> {
    let mut writer = csv::Writer::from_writer(out);

    let weight_header = format!("Weight_{}", units.weight_label());
    writer.write_record(["Date", "Exercise", "Set", weight_header.as_str(), "Reps", "Time"])?;

    for entry in entries {
        let date = entry.date.to_rfc3339(); // RFC3339 for CSV
        for set in &entry.sets {
            writer.write_record([
                date.as_str(),
                entry.exercise_name.as_str(),
                set.set_number.to_string().as_str(),
                set.weight.as_str(),
                set.reps.as_str(),
                set.elapsed_time.as_str(),
            ])?;
        }
    }
    writer.flush()?;
    Ok(())
}

fn write_sets_csv<W: Write>(out: W, sets: &[CompletedSet], units: Units) -> Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    let weight_header = format!("Weight_{}", units.weight_label());
    writer.write_record(["Set", weight_header.as_str(), "Reps", "Time"])?;
    for set in sets {
        writer.write_record([
            set.set_number.to_string().as_str(),
            set.weight.as_str(),
            set.reps.as_str(),
            set.elapsed_time.as_str(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}
