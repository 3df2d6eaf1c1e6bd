use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use log::{LevelFilter, info, warn};
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

mod cli;

use cli::Cli;
use cli::commands::{Commands, RunArgs};
use telepoll::Trigger;
use telepoll::config::Config;
use telepoll::poller::PollReport;
use telepoll::sink::{ChannelSink, write_json_lines};
use telepoll::transport::TelegramClient;

/// Start logging before the config is read so config loading can report.
///
/// With `RUST_LOG` set it owns the filter; otherwise the level starts at
/// info (debug with `-v`) and is moved to the configured one later.
fn setup_logging(from_env: bool, verbose: bool) -> Result<()> {
    // Create log directory
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("telepoll")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    let log_file = log_dir.join("telepoll.log");

    // Setup env_logger with file output
    let target = Box::new(
        fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)
            .context("Failed to open log file")?,
    );

    let mut builder = if from_env {
        env_logger::Builder::from_default_env()
    } else {
        let mut builder = env_logger::Builder::new();
        builder.filter_level(LevelFilter::Trace);
        builder
    };
    builder.target(env_logger::Target::Pipe(target)).init();

    if !from_env {
        log::set_max_level(log_level_filter(None, verbose));
    }

    info!("Logging initialized, writing to: {}", log_file.display());
    Ok(())
}

/// Effective level when `RUST_LOG` is unset: `-v` wins, then the config
fn log_level_filter(config_level: Option<&str>, verbose: bool) -> LevelFilter {
    if verbose {
        return LevelFilter::Debug;
    }
    match config_level {
        Some(level) => level.parse().unwrap_or_else(|_| {
            warn!("Unknown log_level {:?} in config, using info", level);
            LevelFilter::Info
        }),
        None => LevelFilter::Info,
    }
}

/// Explicit `--config` must load; implicit files that fail are reported and skipped
fn load_config(cli: &Cli) -> Result<Config> {
    if let Some(path) = &cli.config {
        return Config::load_from_file(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display()));
    }

    let loaded = Config::load_from_candidates(&Config::default_candidates());
    for skipped in &loaded.skipped {
        eprintln!(
            "{} {}: {}",
            "Ignoring config".yellow(),
            skipped.path.display(),
            skipped.error
        );
    }
    Ok(loaded.config)
}

async fn run_application(cli: &Cli, config: Config) -> Result<()> {
    info!("Starting application");

    if cli.is_verbose() {
        eprintln!("{}", "Verbose mode enabled".yellow());
    }

    match &cli.command {
        None => handle_run_command(&RunArgs::default(), config).await,
        Some(Commands::Run(args)) => handle_run_command(args, config).await,
        Some(Commands::ShowConfig) => handle_show_config_command(&config),
    }
}

async fn handle_run_command(args: &RunArgs, mut config: Config) -> Result<()> {
    config.apply_overrides(&args.overrides());
    let poll_config = config.poll_config().context("Invalid polling configuration")?;
    info!("Polling with {:?}", poll_config);

    let source = TelegramClient::new(&poll_config, config.http.connect_timeout())
        .context("Failed to create Telegram client")?;
    let (sink, batches) = ChannelSink::new();

    eprintln!(
        "{} {} (updates: {}, timeout: {}s)",
        "Polling:".green(),
        poll_config.base_url,
        poll_config.selection,
        poll_config.timeout
    );

    // Stdout is written from its own task so a slow reader never stalls polling
    let mut writer = tokio::spawn(write_json_lines(batches, tokio::io::stdout()));

    let handle = Trigger::new(Arc::new(source), Arc::new(sink), poll_config).start();
    let state = handle.state();
    let join = handle.join();
    tokio::pin!(join);

    let (result, written) = tokio::select! {
        result = &mut join => (result, writer.await),
        written = &mut writer => {
            warn!("Output writer ended early, stopping");
            state.stop();
            (join.await, written)
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Ctrl-C received, stopping");
            eprintln!("{}", "Stopping...".yellow());
            state.stop();
            let result = join.await;
            (result, writer.await)
        }
    };

    let report = result.context("Polling failed")?;
    let batches_written = written
        .context("Output writer task failed")?
        .context("Failed to write updates to stdout")?;
    info!("Wrote {} batches to stdout", batches_written);
    print_report(&report);
    Ok(())
}

fn handle_show_config_command(config: &Config) -> Result<()> {
    let yaml = serde_yaml::to_string(&config.redacted()).context("Failed to render config")?;
    print!("{}", yaml);
    Ok(())
}

fn print_report(report: &PollReport) {
    eprintln!(
        "{} next offset {}, {} polls, {} batches, {} updates received",
        "Stopped:".cyan(),
        report.next_offset,
        report.polls,
        report.batches_emitted,
        report.updates_received
    );
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    let from_env = std::env::var_os("RUST_LOG").is_some();
    setup_logging(from_env, cli.is_verbose()).context("Failed to setup logging")?;

    // Load configuration
    let config = load_config(&cli)?;
    if !from_env {
        log::set_max_level(log_level_filter(config.log_level.as_deref(), cli.is_verbose()));
    }

    info!("Starting with config from: {:?}", cli.config);

    // Run the main application logic
    run_application(&cli, config).await.context("Application failed")?;

    Ok(())
}
