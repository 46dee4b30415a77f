mod file_store;
mod policy;
mod simulation;

use anyhow::{Context, Result, anyhow, bail};
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::io::{Write, stdout};
use std::path::PathBuf;

use file_store::FileStore;
use policy::Strategy;
use simulation::{SimulationSummary, simulate};
use workshop_game::{
    ActionParams, Clock, FixedClock, GameState, ResourceKind, StatKind, SystemClock, ToolId,
    Workshop,
};

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ReportFormat {
    /// Human-readable, colored
    Console,
    /// Machine-readable summary
    Json,
}

#[derive(Debug, Parser)]
#[command(name = "workshop", version)]
#[command(about = "Play the daily workshop game from a terminal")]
struct Cli {
    /// Directory holding the save file
    #[arg(long, default_value = ".workshop")]
    data_dir: PathBuf,

    /// Pretend today is this date (YYYY-MM-DD)
    #[arg(long)]
    date: Option<NaiveDate>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Show the workshop and the current scene
    Status,
    /// List the numbered choices on the current screen
    Choices,
    /// Take a choice by its number from `choices`
    Pick {
        /// One-based choice number
        number: usize,
    },
    /// Dispatch an action by name
    Act {
        /// Action name, e.g. `gather_parts` or `build_toolbox`
        action: String,
        /// Tool the action targets
        #[arg(long)]
        tool: Option<String>,
        /// Minigame input value
        #[arg(long)]
        value: Option<u32>,
    },
    /// Skip ahead one day (limited per real day)
    NextDay,
    /// Delete the save and start over
    Reset {
        /// Confirm the destructive reset
        #[arg(long)]
        yes: bool,
    },
    /// Run a scripted playtest in memory; the save is not touched
    Simulate {
        /// Calendar days to play
        #[arg(long, default_value_t = 30)]
        days: u32,
        /// Decision strategy
        #[arg(long, value_enum, default_value_t = Strategy::Balanced)]
        strategy: Strategy,
        /// Seed for randomized strategies
        #[arg(long, default_value_t = 1337)]
        seed: u64,
        /// Output report format
        #[arg(long, value_enum, default_value_t = ReportFormat::Console)]
        report: ReportFormat,
    },
}

/// System date unless overridden on the command line.
#[derive(Debug, Clone)]
enum HostClock {
    System(SystemClock),
    Fixed(FixedClock),
}

impl HostClock {
    fn new(date: Option<NaiveDate>) -> Self {
        date.map_or(Self::System(SystemClock), |date| {
            Self::Fixed(FixedClock::new(date))
        })
    }
}

impl Clock for HostClock {
    fn today(&self) -> NaiveDate {
        match self {
            Self::System(clock) => clock.today(),
            Self::Fixed(clock) => clock.today(),
        }
    }
}

type Session = Workshop<FileStore, HostClock>;

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let mut out = stdout().lock();
    run(&cli, &mut out)
}

fn run(cli: &Cli, out: &mut dyn Write) -> Result<()> {
    let clock = HostClock::new(cli.date);
    if let Command::Simulate {
        days,
        strategy,
        seed,
        report,
    } = &cli.command
    {
        let mut policy = strategy.create_policy(*seed);
        let summary = simulate(clock.today(), *days, policy.as_mut())?;
        return write_summary(out, &summary, *report);
    }

    let store = FileStore::new(&cli.data_dir);
    let mut workshop = Session::open(store, clock)
        .with_context(|| format!("opening save in {}", cli.data_dir.display()))?;

    match &cli.command {
        Command::Status => {
            write_status(out, &workshop)?;
            write_scene(out, &workshop)?;
        }
        Command::Choices => write_choices(out, &workshop)?,
        Command::Pick { number } => {
            let choices = workshop.choices();
            let choice = number
                .checked_sub(1)
                .and_then(|idx| choices.get(idx))
                .ok_or_else(|| anyhow!("no choice numbered {number}; run `choices` to list them"))?;
            let message = workshop.dispatch_named(&choice.action, choice.params)?;
            write_outcome(out, &workshop, &message)?;
        }
        Command::Act {
            action,
            tool,
            value,
        } => {
            let params = ActionParams {
                tool: tool.as_deref().map(parse_tool).transpose()?,
                value: *value,
            };
            let message = workshop.dispatch_named(action, params)?;
            write_outcome(out, &workshop, &message)?;
        }
        Command::NextDay => {
            let message = workshop.advance_day()?;
            write_outcome(out, &workshop, &message)?;
        }
        Command::Reset { yes } => {
            if !yes {
                bail!("reset deletes the save in {}; pass --yes to confirm", cli.data_dir.display());
            }
            let message = workshop.reset()?;
            writeln!(out, "{}", "Workshop reset.".bright_yellow().bold())?;
            write_outcome(out, &workshop, &message)?;
        }
        Command::Simulate { .. } => {}
    }
    Ok(())
}

fn parse_tool(name: &str) -> Result<ToolId> {
    name.parse::<ToolId>().map_err(|()| {
        let known: Vec<&str> = ToolId::ALL.iter().map(|id| id.key()).collect();
        anyhow!("unknown tool `{name}`; expected one of {}", known.join(", "))
    })
}

fn write_outcome(out: &mut dyn Write, workshop: &Session, message: &str) -> Result<()> {
    if !message.is_empty() {
        writeln!(out, "{}", message.bright_white())?;
    }
    let state = workshop.state();
    writeln!(
        out,
        "{}",
        format!(
            "Day {} | {}/{} action points",
            state.day, state.action_points, state.max_action_points
        )
        .dimmed()
    )?;
    write_scene(out, workshop)
}

fn write_status(out: &mut dyn Write, workshop: &Session) -> Result<()> {
    let state = workshop.state();
    writeln!(out, "{}", "🔧 Daily Workshop".bright_cyan().bold())?;
    writeln!(out, "{}", "================================".cyan())?;
    writeln!(
        out,
        "Day {} ({}) | workshop level {} | {}/{} action points",
        state.day,
        state.last_played_date,
        state.workshop_level,
        state.action_points,
        state.max_action_points
    )?;
    writeln!(out, "{}", stat_line(state))?;
    writeln!(out, "{}", resource_line(state))?;
    for id in ToolId::ALL {
        if let Some(tool) = state.tool(id).filter(|tool| tool.built) {
            writeln!(out, "  {} {}%", tool.name.green(), tool.durability)?;
        }
    }
    for assistant in &state.assistants {
        writeln!(
            out,
            "  {} ({}, {}) trust {}",
            assistant.name.bright_blue(),
            assistant.personality,
            assistant.specialty,
            assistant.reliability
        )?;
    }
    if !workshop.last_message().is_empty() {
        writeln!(out, "{}", workshop.last_message().italic())?;
    }
    Ok(())
}

fn stat_line(state: &GameState) -> String {
    StatKind::ALL
        .iter()
        .map(|kind| format!("{kind} {}", state.stat(*kind)))
        .collect::<Vec<_>>()
        .join(" | ")
}

fn resource_line(state: &GameState) -> String {
    ResourceKind::ALL
        .iter()
        .map(|kind| format!("{} {}", kind.label(), state.resources.get(*kind)))
        .collect::<Vec<_>>()
        .join(" | ")
}

fn write_scene(out: &mut dyn Write, workshop: &Session) -> Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", workshop.text())?;
    if workshop.is_game_over() {
        writeln!(out, "{}", "Game over. Run `reset --yes` to start again.".red().bold())?;
        return Ok(());
    }
    write_choices(out, workshop)
}

fn write_choices(out: &mut dyn Write, workshop: &Session) -> Result<()> {
    for (idx, choice) in workshop.choices().iter().enumerate() {
        writeln!(out, "  {}. {}", (idx + 1).to_string().yellow(), choice.label)?;
    }
    Ok(())
}

fn write_summary(
    out: &mut dyn Write,
    summary: &SimulationSummary,
    format: ReportFormat,
) -> Result<()> {
    match format {
        ReportFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, summary)?;
            writeln!(out)?;
        }
        ReportFormat::Console => {
            writeln!(out, "{}", "🧪 Workshop Playtest".bright_cyan().bold())?;
            writeln!(out, "{}", "================================".cyan())?;
            writeln!(
                out,
                "Strategy {} from {}: {} days played, {} actions",
                summary.strategy.bold(),
                summary.start_date,
                summary.days_played,
                summary.actions_taken
            )?;
            match &summary.game_over {
                Some(cause) => writeln!(
                    out,
                    "{}",
                    format!("❌ Game over on day {} ({cause})", summary.final_day).red()
                )?,
                None => writeln!(
                    out,
                    "{}",
                    format!("✅ Still running on day {}", summary.final_day).green()
                )?,
            }
            let stats = &summary.stats;
            writeln!(
                out,
                "logic {} | efficiency {} | skill {} | adaptation {} | concentration {}",
                stats.logic, stats.efficiency, stats.skill, stats.adaptation, stats.concentration
            )?;
            let res = &summary.resources;
            writeln!(
                out,
                "parts {} | materials {} | energy {} | rare parts {}",
                res.parts, res.materials, res.energy, res.rare_parts
            )?;
            writeln!(
                out,
                "Level {} | tools: {} | team: {}",
                summary.workshop_level,
                display_list(&summary.tools_built),
                display_list(&summary.assistants)
            )?;
            for (event, count) in &summary.daily_events {
                writeln!(out, "  {event:20} {count}")?;
            }
        }
    }
    Ok(())
}

fn display_list(items: &[String]) -> String {
    if items.is_empty() {
        "none".to_string()
    } else {
        items.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir(label: &str) -> PathBuf {
        std::env::temp_dir().join(format!(
            "workshop-cli-{label}-{}",
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap_or_default()
                .as_nanos()
        ))
    }

    fn cli(label: &str, command: Command) -> Cli {
        Cli {
            data_dir: temp_dir(label),
            date: NaiveDate::from_ymd_opt(2026, 10, 18),
            command,
        }
    }

    fn run_to_string(cli: &Cli) -> Result<String> {
        let mut buffer = Vec::new();
        run(cli, &mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }

    #[test]
    fn status_creates_a_save() {
        colored::control::set_override(false);
        let args = cli("status", Command::Status);
        let output = run_to_string(&args).unwrap();
        assert!(output.contains("Day 1 (2026-10-18)"));
        assert!(output.contains("MacGyver"));
        assert!(args.data_dir.join("workshop.save.json").exists());
        let _ = std::fs::remove_dir_all(&args.data_dir);
    }

    #[test]
    fn reset_requires_confirmation() {
        let args = cli("reset", Command::Reset { yes: false });
        let err = run_to_string(&args).unwrap_err();
        assert!(err.to_string().contains("--yes"));
        let _ = std::fs::remove_dir_all(&args.data_dir);
    }

    #[test]
    fn pick_rejects_out_of_range_numbers() {
        let args = cli("pick", Command::Pick { number: 0 });
        assert!(run_to_string(&args).is_err());
        let _ = std::fs::remove_dir_all(&args.data_dir);
    }

    #[test]
    fn unknown_tools_are_reported() {
        let err = parse_tool("laser").unwrap_err();
        assert!(err.to_string().contains("cncMachine"));
        assert_eq!(parse_tool("cnc_machine").unwrap(), ToolId::CncMachine);
    }

    #[test]
    fn simulate_writes_json_summary() {
        let args = cli(
            "simulate",
            Command::Simulate {
                days: 3,
                strategy: Strategy::Balanced,
                seed: 1,
                report: ReportFormat::Json,
            },
        );
        let output = run_to_string(&args).unwrap();
        let summary: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(summary["strategy"], "Balanced");
        assert!(!args.data_dir.exists(), "simulation never touches the save");
    }
}
