//! Top-level CLI definition and dispatch.

use std::io::{self, IsTerminal, Write};
use std::path::PathBuf;

use clap::{Args, CommandFactory, Parser, Subcommand};
use clap_complete::{Shell as CompletionShell, generate};
use colored::{Colorize, control};
use serde_json::{Value, json};
use thiserror::Error;

use daterange_picker::core::config::Config;
use daterange_picker::core::errors::PickerError;
use daterange_picker::date::pattern::DisplayPattern;
use daterange_picker::date::value::DateValue;
use daterange_picker::logger::jsonl::{JsonlConfig, JsonlWriter};
use daterange_picker::picker::model::PickerSettings;
use daterange_picker::picker::preset::{self, PageDirection, PresetTag};
use daterange_picker::picker::runtime::PickerRuntime;
use daterange_picker::picker::store::{DraftRange, Mode};
use daterange_picker::replay::{self, ReplayReport};

/// Date-range picker engine: presets, paging and interaction replay.
#[derive(Debug, Parser)]
#[command(
    name = "drp",
    author,
    version,
    about = "Date-range picker interaction engine",
    long_about = None,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Override config file path.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Force JSON output mode.
    #[arg(long, global = true)]
    json: bool,
    /// Disable colored output.
    #[arg(long, global = true)]
    no_color: bool,
    /// Subcommand to execute.
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Subcommand)]
enum Command {
    /// Show the range a preset covers.
    Preset(PresetArgs),
    /// Page a range one period back or forward.
    Shift(ShiftArgs),
    /// Replay a JSONL interaction script.
    Replay(ReplayArgs),
    /// View and validate configuration.
    Config(ConfigArgs),
    /// Generate shell completions.
    Completions(CompletionsArgs),
}

#[derive(Debug, Clone, Args)]
struct PresetArgs {
    /// Preset to expand (today, week, month, year).
    #[arg(value_parser = parse_preset)]
    preset: PresetTag,
    /// Day the period is built around (defaults to today).
    #[arg(long, value_parser = parse_date_arg, value_name = "DATE")]
    anchor: Option<DateValue>,
}

#[derive(Debug, Clone, Args)]
struct ShiftArgs {
    /// Preset governing the step (custom slides by the range's own span).
    #[arg(value_parser = parse_preset)]
    preset: PresetTag,
    /// Range start.
    #[arg(value_parser = parse_date_arg)]
    start: DateValue,
    /// Range end (defaults to start).
    #[arg(value_parser = parse_date_arg)]
    end: Option<DateValue>,
    /// Direction to page.
    #[arg(long, default_value = "next", value_parser = parse_direction)]
    direction: PageDirection,
    /// Number of periods to move.
    #[arg(long, default_value_t = 1, value_name = "N")]
    count: u32,
}

#[derive(Debug, Clone, Args)]
struct ReplayArgs {
    /// Script file (one JSON event per line).
    script: PathBuf,
    /// Override picker mode.
    #[arg(long, value_parser = parse_mode)]
    mode: Option<Mode>,
    /// Day treated as today (defaults to the local date).
    #[arg(long, value_parser = parse_date_arg, value_name = "DATE")]
    today: Option<DateValue>,
    /// Override the maximum range length.
    #[arg(long, value_name = "DAYS")]
    max_days: Option<u32>,
    /// Append activity records to this JSONL file.
    #[arg(long, value_name = "PATH")]
    log: Option<PathBuf>,
}

#[derive(Debug, Clone, Args)]
struct ConfigArgs {
    /// Config operation to run.
    #[command(subcommand)]
    command: Option<ConfigCommand>,
}

#[derive(Debug, Clone, Subcommand)]
enum ConfigCommand {
    /// Print resolved config file path.
    Path,
    /// Print effective merged configuration.
    Show,
    /// Validate configuration and exit.
    Validate,
}

#[derive(Debug, Clone, Args)]
struct CompletionsArgs {
    /// Shell to generate completion script for.
    #[arg(value_enum)]
    shell: CompletionShell,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputMode {
    Human,
    Json,
}

/// CLI error type with explicit exit-code mapping.
#[derive(Debug, Error)]
pub enum CliError {
    /// Invalid user input at runtime.
    #[error("{0}")]
    User(String),
    /// Environment/runtime failure.
    #[error("{0}")]
    Runtime(String),
    /// Internal bug or invariant violation.
    #[error("{0}")]
    Internal(String),
    /// JSON serialization failed.
    #[error("failed to serialize output: {0}")]
    Json(#[from] serde_json::Error),
    /// Output write failed.
    #[error("failed to write output: {0}")]
    Io(#[from] io::Error),
}

impl CliError {
    /// Process exit code contract for the CLI.
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::User(_) => 1,
            Self::Runtime(_) | Self::Io(_) => 2,
            Self::Internal(_) | Self::Json(_) => 3,
        }
    }
}

impl From<PickerError> for CliError {
    fn from(error: PickerError) -> Self {
        match error {
            PickerError::Io { .. } => Self::Runtime(error.to_string()),
            PickerError::Serialization { context: "serde_json", .. } => {
                Self::Internal(error.to_string())
            }
            other => Self::User(other.to_string()),
        }
    }
}

/// Dispatch CLI commands.
pub fn run(cli: &Cli) -> Result<(), CliError> {
    if cli.no_color {
        control::set_override(false);
    }

    match &cli.command {
        Command::Preset(args) => run_preset(cli, args),
        Command::Shift(args) => run_shift(cli, args),
        Command::Replay(args) => run_replay(cli, args),
        Command::Config(args) => run_config(cli, args),
        Command::Completions(args) => {
            let mut command = Cli::command();
            let binary_name = command.get_name().to_string();
            generate(args.shell, &mut command, binary_name, &mut io::stdout());
            Ok(())
        }
    }
}

fn load_config(cli: &Cli) -> Result<Config, CliError> {
    Config::load(cli.config.as_deref()).map_err(CliError::from)
}

fn pattern_for(cli: &Cli) -> Result<DisplayPattern, CliError> {
    let config = load_config(cli)?;
    Ok(DisplayPattern::parse(&config.picker.format)?)
}

fn run_preset(cli: &Cli, args: &PresetArgs) -> Result<(), CliError> {
    let anchor = args.anchor.unwrap_or_else(DateValue::today);
    let Some(range) = preset::preset_range_for(args.preset, anchor) else {
        return Err(CliError::User(
            "custom has no fixed period; pick today, week, month or year".to_string(),
        ));
    };
    let pattern = pattern_for(cli)?;
    emit_range(cli, "preset", args.preset, &range, &pattern)
}

fn run_shift(cli: &Cli, args: &ShiftArgs) -> Result<(), CliError> {
    let mut range = DraftRange::between(args.start, args.end.unwrap_or(args.start)).normalized();
    for _ in 0..args.count {
        range = preset::shift_period(args.preset, range, args.direction);
    }
    let pattern = pattern_for(cli)?;
    emit_range(cli, "shift", args.preset, &range, &pattern)
}

fn emit_range(
    cli: &Cli,
    command: &str,
    tag: PresetTag,
    range: &DraftRange,
    pattern: &DisplayPattern,
) -> Result<(), CliError> {
    let format = |date: Option<DateValue>| date.map(|d| pattern.format(d));
    match output_mode(cli) {
        OutputMode::Human => {
            println!("{}", preset::preset_label(tag, range, pattern).bold());
            if let Some(span) = range.span_days() {
                println!("  {} {span} day(s)", "span:".dimmed());
            }
        }
        OutputMode::Json => {
            let payload = json!({
                "command": command,
                "preset": tag,
                "start": format(range.start),
                "end": format(range.end),
                "span_days": range.span_days(),
            });
            write_json_line(&payload)?;
        }
    }
    Ok(())
}

fn run_replay(cli: &Cli, args: &ReplayArgs) -> Result<(), CliError> {
    let mut config = load_config(cli)?;
    if let Some(mode) = args.mode {
        config.picker.mode = mode;
    }
    if args.max_days.is_some() {
        config.picker.max_days = args.max_days;
    }
    config.validate()?;

    let events = replay::load_script(&args.script)?;
    let today = args.today.unwrap_or_else(DateValue::today);
    let settings = PickerSettings::from_config(&config)?;

    let mut runtime = PickerRuntime::recording(settings, today);
    if let Some(path) = &args.log {
        runtime = runtime.with_log(JsonlWriter::open(JsonlConfig {
            path: path.clone(),
            fallback_path: None,
            max_size_bytes: config.logging.max_size_bytes,
            max_rotated_files: config.logging.max_rotated_files,
        }));
    } else if config.logging.enabled {
        runtime = runtime.with_log(JsonlWriter::open(JsonlConfig::from(&config.logging)));
    }
    let report = replay::replay_into(&mut runtime, events);
    drop(runtime.into_host());

    match output_mode(cli) {
        OutputMode::Human => print_replay_human(&report),
        OutputMode::Json => {
            let mut payload = serde_json::to_value(&report)?;
            if let Value::Object(map) = &mut payload {
                map.insert("command".to_string(), json!("replay"));
            }
            write_json_line(&payload)?;
        }
    }
    Ok(())
}

fn print_replay_human(report: &ReplayReport) {
    println!("Replayed {} event(s) in {} mode.", report.events, report.mode);
    for (key, value) in &report.host.changes {
        let key = serde_json::to_string(key).unwrap_or_default();
        let value = serde_json::to_string(value).unwrap_or_default();
        println!("  {} {key} {value}", "onChange".green());
    }
    for (_, message) in &report.host.notifications {
        println!("  {} {message}", "notice".yellow());
    }
    let committed = serde_json::to_string(&report.committed).unwrap_or_default();
    match report.preset {
        Some(preset) => println!("Committed: {committed} (preset {preset})"),
        None => println!("Committed: {committed}"),
    }
    println!("  {} {}", "label:".dimmed(), report.label.bold());
}

fn run_config(cli: &Cli, args: &ConfigArgs) -> Result<(), CliError> {
    match &args.command {
        None | Some(ConfigCommand::Path) => {
            let path = cli.config.clone().unwrap_or_else(Config::default_path);
            let exists = path.exists();

            match output_mode(cli) {
                OutputMode::Human => {
                    println!("{}", path.display());
                    if !exists {
                        println!("  (file does not exist; defaults will be used)");
                    }
                }
                OutputMode::Json => {
                    let payload = json!({
                        "command": "config path",
                        "path": path.to_string_lossy(),
                        "exists": exists,
                    });
                    write_json_line(&payload)?;
                }
            }
            Ok(())
        }
        Some(ConfigCommand::Show) => {
            let config = Config::load(cli.config.as_deref())
                .map_err(|e| CliError::Runtime(e.to_string()))?;

            match output_mode(cli) {
                OutputMode::Human => {
                    let toml_str = config
                        .to_toml()
                        .map_err(|e| CliError::Runtime(e.to_string()))?;
                    println!("{toml_str}");
                }
                OutputMode::Json => {
                    let value = serde_json::to_value(&config)?;
                    let payload = json!({
                        "command": "config show",
                        "config": value,
                    });
                    write_json_line(&payload)?;
                }
            }
            Ok(())
        }
        Some(ConfigCommand::Validate) => match Config::load(cli.config.as_deref()) {
            Ok(config) => {
                let hash = config
                    .stable_hash()
                    .map_err(|e| CliError::Runtime(e.to_string()))?;

                match output_mode(cli) {
                    OutputMode::Human => {
                        println!("{}", "Configuration is valid.".green());
                        println!("  Source: {}", config.paths.config_file.display());
                        println!("  Hash: {hash}");
                    }
                    OutputMode::Json => {
                        let payload = json!({
                            "command": "config validate",
                            "valid": true,
                            "path": config.paths.config_file.to_string_lossy(),
                            "hash": hash,
                        });
                        write_json_line(&payload)?;
                    }
                }
                Ok(())
            }
            Err(e) => {
                match output_mode(cli) {
                    OutputMode::Human => {
                        eprintln!("{} {e}", "Configuration is INVALID:".red());
                    }
                    OutputMode::Json => {
                        let payload = json!({
                            "command": "config validate",
                            "valid": false,
                            "code": e.code(),
                            "error": e.to_string(),
                        });
                        write_json_line(&payload)?;
                    }
                }
                Err(CliError::User(format!("invalid config: {e}")))
            }
        },
    }
}

// ---------------------------------------------------------------------------
// Argument parsers
// ---------------------------------------------------------------------------

fn parse_preset(raw: &str) -> Result<PresetTag, String> {
    raw.parse()
}

fn parse_direction(raw: &str) -> Result<PageDirection, String> {
    raw.parse()
}

fn parse_mode(raw: &str) -> Result<Mode, String> {
    raw.parse()
}

/// Accept `YYYY-MM-DD` or compact `YYYYMMDD`.
fn parse_date_arg(raw: &str) -> Result<DateValue, String> {
    let raw = raw.trim();
    DateValue::parse_with(raw, "%Y-%m-%d")
        .or_else(|| DateValue::parse_compact(raw))
        .ok_or_else(|| format!("expected YYYY-MM-DD or YYYYMMDD, got {raw:?}"))
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

fn write_json_line(payload: &Value) -> Result<(), CliError> {
    let mut stdout = io::stdout().lock();
    serde_json::to_writer(&mut stdout, payload)?;
    writeln!(stdout)?;
    Ok(())
}

fn output_mode(cli: &Cli) -> OutputMode {
    let env_mode = std::env::var("DRP_OUTPUT_FORMAT").ok();
    resolve_output_mode(cli.json, env_mode.as_deref(), io::stdout().is_terminal())
}

fn resolve_output_mode(json_flag: bool, env_mode: Option<&str>, stdout_is_tty: bool) -> OutputMode {
    if json_flag {
        return OutputMode::Json;
    }

    let fallback = if stdout_is_tty {
        OutputMode::Human
    } else {
        OutputMode::Json
    };

    match env_mode
        .map(str::trim)
        .map(str::to_ascii_lowercase)
        .as_deref()
    {
        Some("json") => OutputMode::Json,
        Some("human") => OutputMode::Human,
        _ => fallback,
    }
}
