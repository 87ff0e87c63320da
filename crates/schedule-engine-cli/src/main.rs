//! `schedule` CLI — lay out appointments and classify slots from the command line.
//!
//! ## Usage
//!
//! ```sh
//! # Print the 15-minute slot grid of a day
//! schedule slots --granularity 15
//!
//! # Column layout per date for a schedule document (stdin → stdout)
//! cat schedule.json | schedule layout
//!
//! # Classify every slot of a date against a fixed "now"
//! schedule classify -i schedule.json --date 2026-03-16 --now 2026-03-16T11:00
//!
//! # Same, as a text table
//! schedule classify -i schedule.json --date 2026-03-16 --format table
//!
//! # Is the calendar open at a given time?
//! schedule hours -i schedule.json --date 2026-03-16 --time 08:30
//! ```
//!
//! Diagnostics go to stderr; set `RUST_LOG` or pass `-v` for more detail.

use std::collections::BTreeMap;
use std::io::{self, Read};

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use schedule_engine::layout::{LayoutOutcome, SkippedAppointment};
use schedule_engine::zone;
use schedule_engine::{
    classify_day, compute_layout_by_date, generate_slots, is_within_hours, EngineError,
    ScheduleDocument, TimeSlot,
};
use serde::Serialize;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "schedule",
    version,
    about = "Appointment layout and slot availability for calendar views"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Increase log verbosity (-v info, -vv debug). RUST_LOG takes precedence.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the slot grid of a day
    Slots {
        /// Slot width in minutes; must evenly divide 1440
        #[arg(short, long, default_value_t = 15)]
        granularity: u32,
        /// Emit JSON instead of one label per line
        #[arg(long)]
        json: bool,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Compute the column layout of every date in a schedule document
    Layout {
        /// Input schedule document (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        /// Fail instead of reporting rejected or skipped appointments
        #[arg(long)]
        strict: bool,
    },
    /// Classify every slot of one date
    Classify {
        /// Input schedule document (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        /// Date to classify (YYYY-MM-DD)
        #[arg(long)]
        date: String,
        /// Reference "now" (RFC 3339 or local YYYY-MM-DDTHH:MM); defaults to the current time
        #[arg(long)]
        now: Option<String>,
        /// Override the document's slot granularity
        #[arg(short, long)]
        granularity: Option<u32>,
        /// Output format
        #[arg(long, value_enum, default_value_t = Format::Json)]
        format: Format,
    },
    /// Report whether the calendar is open at a date and time
    Hours {
        /// Input schedule document (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Date (YYYY-MM-DD)
        #[arg(long)]
        date: String,
        /// Time of day (HH:MM)
        #[arg(long)]
        time: String,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Json,
    Table,
}

#[derive(Serialize)]
struct LayoutReport {
    dates: BTreeMap<NaiveDate, LayoutOutcome>,
    rejected: Vec<SkippedAppointment>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Slots {
            granularity,
            json,
            output,
        } => {
            let slots: Vec<TimeSlot> = generate_slots(granularity)
                .context("Failed to generate slots")?
                .collect();
            let rendered = if json {
                serde_json::to_string_pretty(&slots)?
            } else {
                let labels: Vec<&str> = slots.iter().map(|s| s.label.as_str()).collect();
                format!("{}\n", labels.join("\n"))
            };
            write_output(output.as_deref(), &rendered)?;
        }
        Commands::Layout {
            input,
            output,
            strict,
        } => {
            let doc = read_document(input.as_deref())?;
            let resolved = doc
                .resolve_appointments()
                .context("Failed to resolve appointments")?;
            let dates = compute_layout_by_date(&resolved.appointments);
            if strict {
                if let Some(rejected) = resolved.rejected.first() {
                    return Err(EngineError::from(rejected.clone()))
                        .context("Appointment record could not be read");
                }
                for outcome in dates.values() {
                    outcome.ensure_complete().context("Invalid appointment")?;
                }
            }
            info!(
                dates = dates.len(),
                rejected = resolved.rejected.len(),
                "laid out schedule"
            );
            let report = LayoutReport {
                dates,
                rejected: resolved.rejected,
            };
            write_output(output.as_deref(), &serde_json::to_string_pretty(&report)?)?;
        }
        Commands::Classify {
            input,
            output,
            date,
            now,
            granularity,
            format,
        } => {
            let doc = read_document(input.as_deref())?;
            let tz = doc.config.validate().context("Invalid configuration")?;
            let date = parse_date(&date)?;
            let now = match now {
                Some(raw) => zone::parse_instant(&raw, tz.as_ref())
                    .with_context(|| format!("Invalid --now value: {}", raw))?,
                None => current_time(tz.as_ref()),
            };
            let granularity = granularity.unwrap_or(doc.config.granularity_minutes);
            let slots = generate_slots(granularity).context("Failed to generate slots")?;

            let resolved = doc
                .resolve_appointments()
                .context("Failed to resolve appointments")?;
            let on_date: Vec<_> = resolved
                .appointments
                .into_iter()
                .filter(|a| a.date() == date)
                .collect();
            debug!(%date, %now, appointments = on_date.len(), "classifying");

            let classified = classify_day(date, slots, &doc.rules, &on_date, now);
            let rendered = match format {
                Format::Json => serde_json::to_string_pretty(&classified)?,
                Format::Table => classified
                    .iter()
                    .map(|c| format!("{}  {:?}\n", c.label, c.state))
                    .collect(),
            };
            write_output(output.as_deref(), &rendered)?;
        }
        Commands::Hours { input, date, time } => {
            let doc = read_document(input.as_deref())?;
            let date = parse_date(&date)?;
            let time = NaiveTime::parse_from_str(&time, "%H:%M")
                .with_context(|| format!("Invalid time (expected HH:MM): {}", time))?;
            let open = is_within_hours(date, time, &doc.rules);
            println!("{}", if open { "open" } else { "closed" });
        }
    }

    Ok(())
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn current_time(tz: Option<&zone::Tz>) -> NaiveDateTime {
    match tz {
        Some(tz) => zone::to_local(Utc::now(), tz),
        None => Local::now().naive_local(),
    }
}

fn parse_date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .with_context(|| format!("Invalid date (expected YYYY-MM-DD): {}", raw))
}

fn read_document(path: Option<&str>) -> Result<ScheduleDocument> {
    let json = read_input(path)?;
    ScheduleDocument::from_json(&json).context("Failed to parse schedule document")
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}

fn write_output(path: Option<&str>, content: &str) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write file: {}", path))?;
        }
        None => {
            print!("{}", content);
        }
    }
    Ok(())
}
