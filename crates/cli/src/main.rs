mod scenario;

use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};

use qc_portal_core::session::session_logger::ConsoleKind;
use qc_portal_core::shared::clock::SystemClock;
use qc_portal_core::shared::settings::Settings;
use qc_portal_core::shared::timecode::format_timecode;
use qc_portal_core::transcript::domain::script_cross_check::ScriptCrossChecker;
use qc_portal_core::transcript::domain::transcript_index::TranscriptIndex;

use scenario::{replay, ReplayReport, Scenario};

/// Headless tools for audio QC review.
#[derive(Parser)]
#[command(name = "qc-portal")]
struct Cli {
    /// Settings JSON file (defaults to the platform config location).
    #[arg(long, global = true)]
    settings: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Check that every script line appears in a transcript.
    Crosscheck {
        /// Reference script, one phrase per line.
        #[arg(long)]
        script: PathBuf,

        /// Transcript with `[MM:SS.mmm] text` lines.
        #[arg(long)]
        transcript: PathBuf,

        /// Print the result as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Show the transcript line active at a playback time.
    Highlight {
        #[arg(long)]
        transcript: PathBuf,

        /// Playback position in seconds.
        #[arg(long)]
        at: f64,
    },
    /// Replay a scripted review session and print its results.
    Replay {
        /// Scenario JSON file.
        #[arg(long)]
        scenario: PathBuf,
    },
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let settings = load_settings(cli.settings.as_deref())?;

    match cli.command {
        Command::Crosscheck {
            script,
            transcript,
            json,
        } => run_crosscheck(&script, &transcript, json, &settings),
        Command::Highlight { transcript, at } => run_highlight(&transcript, at),
        Command::Replay { scenario } => run_replay(&scenario, settings),
    }
}

fn load_settings(path: Option<&Path>) -> Result<Settings, Box<dyn std::error::Error>> {
    match path {
        Some(path) => Ok(Settings::load_from(path)?),
        None => Ok(Settings::load()),
    }
}

fn read_text(path: &Path) -> Result<String, Box<dyn std::error::Error>> {
    fs::read_to_string(path).map_err(|e| format!("failed to read {}: {e}", path.display()).into())
}

fn run_crosscheck(
    script: &Path,
    transcript: &Path,
    json: bool,
    settings: &Settings,
) -> Result<(), Box<dyn std::error::Error>> {
    let script = read_text(script)?;
    let transcript = read_text(transcript)?;
    let checker = ScriptCrossChecker::new(settings.phrase_match_ratio);

    let Some(result) = checker.check(&script, &transcript) else {
        println!("Nothing to check: script or transcript is empty");
        return Ok(());
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    println!("Found {}/{} script phrases", result.found, result.total);
    for phrase in &result.missing_phrases {
        println!("  missing: {phrase}");
    }
    if result.all_found {
        println!("All phrases found");
    }
    Ok(())
}

fn run_highlight(transcript: &Path, at: f64) -> Result<(), Box<dyn std::error::Error>> {
    let index = TranscriptIndex::parse(&read_text(transcript)?);
    let i = index.active_index(at);
    match index.segments().get(i) {
        Some(segment) => println!(
            "#{i} [{}] {}",
            format_timecode(segment.start_time),
            segment.text
        ),
        None => println!("Transcript has no timestamped lines"),
    }
    Ok(())
}

fn run_replay(path: &Path, settings: Settings) -> Result<(), Box<dyn std::error::Error>> {
    let scenario = Scenario::load(path)?;
    log::info!(
        "Replaying {} step(s) over {}",
        scenario.steps.len(),
        format_timecode(scenario.duration)
    );
    let report = replay(&scenario, settings, &SystemClock)?;
    print_report(&report)
}

fn print_report(report: &ReplayReport) -> Result<(), Box<dyn std::error::Error>> {
    println!("Review log ({} rows):", report.rows.len());
    for row in &report.rows {
        let feedback = if row.feedback().is_empty() {
            "-"
        } else {
            row.feedback()
        };
        println!(
            "  {} - {}  {:<8} {:<12} {}",
            row.start_timecode(),
            row.end_timecode(),
            row.category().to_string(),
            row.urgency().to_string(),
            feedback
        );
    }

    for entry in report.console.iter().filter(|e| e.kind == ConsoleKind::Error) {
        eprintln!("warning: {}", entry.message);
    }
    if let Some(result) = &report.cross_check {
        println!("Script check: {}/{} phrases found", result.found, result.total);
    }
    println!("Active play time: {}", format_timecode(report.active_play_time));
    println!("{}", report.payload.to_json_pretty()?);
    Ok(())
}
