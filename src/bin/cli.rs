//! CLI binary for duescout.

use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::{DateTime, FixedOffset, Local};
use clap::{Parser, Subcommand};
use duescout::{ScoutConfig, Submitter, build_submissions, scan_file};
use duescout_extract::{ExtractConfig, ScrapedTask};
use tracing_subscriber::EnvFilter;

/// duescout: find assignment due dates on saved course pages.
#[derive(Parser)]
#[command(name = "duescout", version, about)]
struct Cli {
    /// Path to TOML configuration file.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Subcommand to run.
    #[command(subcommand)]
    command: Command,
}

/// Available commands.
#[derive(Subcommand)]
enum Command {
    /// Extract tasks from an HTML file and print them as JSON.
    Scan {
        /// Saved HTML page.
        file: PathBuf,
        /// Reference time for year inference and "today"/"tomorrow" (RFC 3339).
        #[arg(long)]
        now: Option<DateTime<FixedOffset>>,
        /// Pretty-print the JSON output.
        #[arg(long)]
        pretty: bool,
    },

    /// Extract tasks from an HTML file and submit them to the task tracker.
    Submit {
        /// Saved HTML page.
        file: PathBuf,
        /// URL the page was saved from, attached to every task.
        #[arg(long)]
        url: String,
        /// Reference time for year inference and "today"/"tomorrow" (RFC 3339).
        #[arg(long)]
        now: Option<DateTime<FixedOffset>>,
        /// Print the request bodies instead of sending them.
        #[arg(long)]
        dry_run: bool,
    },

    /// Manage the configuration file.
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Write a default configuration file.
    Init {
        /// Overwrite an existing file.
        #[arg(long)]
        force: bool,
    },
    /// Print the effective configuration.
    Show,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr; stdout carries the JSON output.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("duescout=info,duescout_extract=info")),
        )
        .init();

    let cli = Cli::parse();
    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(ScoutConfig::default_config_path);

    match cli.command {
        Command::Scan { file, now, pretty } => {
            let config = load_config(cli.config.as_deref(), &config_path)?;
            let tasks = scan(&file, &config.extract, now)?;
            print_json(&tasks, pretty)
        }
        Command::Submit {
            file,
            url,
            now,
            dry_run,
        } => {
            let config = load_config(cli.config.as_deref(), &config_path)?;
            run_submit(&config, &file, &url, now, dry_run).await
        }
        Command::Config { action } => match action {
            ConfigAction::Init { force } => init_config(&config_path, force),
            ConfigAction::Show => {
                let config = load_config(cli.config.as_deref(), &config_path)?;
                print!("{}", config.to_toml()?);
                Ok(())
            }
        },
    }
}

/// An explicit `--config` must exist; the default path is optional.
fn load_config(explicit: Option<&Path>, default_path: &Path) -> anyhow::Result<ScoutConfig> {
    let config = match explicit {
        Some(path) => ScoutConfig::from_file(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None if default_path.exists() => ScoutConfig::from_file(default_path)
            .with_context(|| format!("failed to load config from {}", default_path.display()))?,
        None => ScoutConfig::default(),
    };
    config.validate()?;
    Ok(config)
}

fn scan(
    file: &Path,
    config: &ExtractConfig,
    now: Option<DateTime<FixedOffset>>,
) -> anyhow::Result<Vec<ScrapedTask>> {
    let tasks = match now {
        Some(now) => scan_file(file, config, &now),
        None => scan_file(file, config, &Local::now()),
    }
    .with_context(|| format!("failed to scan {}", file.display()))?;
    Ok(tasks)
}

async fn run_submit(
    config: &ScoutConfig,
    file: &Path,
    source_url: &str,
    now: Option<DateTime<FixedOffset>>,
    dry_run: bool,
) -> anyhow::Result<()> {
    let tasks = scan(file, &config.extract, now)?;
    let submissions = build_submissions(&tasks, &config.submit, source_url);

    if dry_run {
        return print_json(&submissions, true);
    }
    if submissions.is_empty() {
        tracing::info!("no tasks found, nothing to submit");
        return Ok(());
    }

    let submitter = Submitter::new(&config.submit)?;
    tracing::info!(endpoint = submitter.endpoint(), tasks = submissions.len(), "submitting tasks");
    let report = submitter.submit_all(&submissions).await;

    println!("submitted {} of {} tasks", report.submitted, submissions.len());
    for (title, error) in &report.failed {
        eprintln!("  failed: {title}: {error}");
    }
    if !report.is_complete() {
        anyhow::bail!("{} task(s) failed to submit", report.failed.len());
    }
    Ok(())
}

fn init_config(path: &Path, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        anyhow::bail!(
            "{} already exists (use --force to overwrite)",
            path.display()
        );
    }
    ScoutConfig::default().save_to_file(path)?;
    println!("wrote {}", path.display());
    Ok(())
}

fn print_json<T: serde::Serialize>(value: &T, pretty: bool) -> anyhow::Result<()> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{json}");
    Ok(())
}
