//! safeprune - verification-gated cleanup
//!
//! This is the main CLI application. It loads configuration, builds the
//! operations context and drives one operation from the ops crate while
//! rendering the events it emits.

mod cli;
mod display;
mod error;
mod events;
mod logging;

use crate::cli::{Cli, Commands};
use crate::display::OutputRenderer;
use crate::error::CliError;
use crate::events::EventHandler;
use clap::Parser;
use safeprune_config::{constants, ColorChoice, Config, OutputFormat};
use safeprune_errors::ConfigError;
use safeprune_events::{EventEmitter, EventReceiver};
use safeprune_ops::{OperationResult, OpsContextBuilder, OpsCtx, RepositoryContents};
use std::path::PathBuf;
use std::process;
use tokio::select;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() {
    // Parse command line arguments first to check for JSON mode
    let cli = Cli::parse();
    let json_mode = cli.global.json;

    init_tracing(json_mode, cli.global.debug, &log_dir_for(&cli));

    match run(cli).await {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(e) => {
            error!("Application error: {}", e);
            if !json_mode {
                eprintln!("Error: {e}");
            }
            process::exit(1);
        }
    }
}

/// Main application logic. Returns whether the operation succeeded.
async fn run(cli: Cli) -> Result<bool, CliError> {
    info!("Starting safeprune v{}", env!("CARGO_PKG_VERSION"));

    // defaults < file < env < flags
    let mut config = Config::load_or_default(cli.global.config.as_deref()).await?;
    config.merge_env()?;
    apply_cli_config(&mut config, &cli.global)?;

    let (event_sender, event_receiver) = safeprune_events::channel();

    let ops_ctx = OpsContextBuilder::new()
        .with_config(config.clone())
        .with_event_sender(event_sender)
        .build()?;

    let output = if cli.global.json {
        OutputFormat::Json
    } else {
        config.general.default_output
    };
    let json_output = output == OutputFormat::Json;
    let color = match (cli.global.color, output) {
        (Some(color), _) => color,
        (None, OutputFormat::Plain) => ColorChoice::Never,
        (None, _) => config.general.color,
    };
    let renderer = OutputRenderer::new(json_output, color);

    let colors_enabled = match color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => console::Term::stdout().features().colors_supported(),
    };
    let mut event_handler = EventHandler::new(colors_enabled, cli.global.debug, !json_output);

    let operation = cli.command.name();
    let result =
        execute_command_with_events(cli.command, &ops_ctx, event_receiver, &mut event_handler)
            .await?;

    renderer.render_result(&result)?;

    let success = result.is_success();
    if success {
        info!(operation, "Command completed successfully");
    } else {
        warn!(operation, "Command completed with failures");
    }
    Ok(success)
}

/// Execute command with concurrent event handling
async fn execute_command_with_events(
    command: Commands,
    ops_ctx: &OpsCtx,
    mut event_receiver: EventReceiver,
    event_handler: &mut EventHandler,
) -> Result<OperationResult, CliError> {
    let mut command_future = Box::pin(execute_command(command, ops_ctx));

    loop {
        select! {
            result = &mut command_future => {
                // Drain whatever the operation emitted last
                while let Ok(event) = event_receiver.try_recv() {
                    event_handler.handle_event(&event);
                }
                return result;
            }

            event = event_receiver.recv() => {
                if let Some(event) = event {
                    event_handler.handle_event(&event);
                }
            }
        }
    }
}

/// Execute the specified command
async fn execute_command(command: Commands, ctx: &OpsCtx) -> Result<OperationResult, CliError> {
    match command {
        Commands::Verify { files, report } => {
            let report = safeprune_ops::verify_files(ctx, &files, report.as_deref()).await?;
            Ok(OperationResult::Verification(report))
        }

        Commands::Restore { file } => {
            let outcome = safeprune_ops::restore_file(ctx, &file).await?;
            Ok(OperationResult::Restore(outcome))
        }

        Commands::Publish { file, repo } => {
            let outcome = safeprune_ops::publish_file(ctx, &file, &repo).await?;
            Ok(OperationResult::Publish(outcome))
        }

        Commands::Recover { file, repo } => {
            let report = safeprune_ops::recover_file(ctx, &file, &repo).await?;
            Ok(OperationResult::Recovery(report))
        }

        Commands::Contents { repo } => {
            // A listing failure is shown as an empty repository
            let contents = match safeprune_ops::repository_contents(ctx, &repo).await {
                Ok(contents) => contents,
                Err(e) => {
                    ctx.emit_warning_with_context(
                        format!("could not list contents of {repo}"),
                        e.to_string(),
                    );
                    RepositoryContents {
                        owner: ctx.config.remote.owner.clone(),
                        repository: repo,
                        entries: Vec::new(),
                    }
                }
            };
            Ok(OperationResult::Contents(contents))
        }

        Commands::CheckHealth { report } => {
            let report = safeprune_ops::check_health(ctx, report.as_deref()).await?;
            Ok(OperationResult::HealthCheck(report))
        }
    }
}

/// Apply CLI flags on top of file and environment configuration
fn apply_cli_config(config: &mut Config, global: &cli::GlobalArgs) -> Result<(), CliError> {
    if let Some(color) = &global.color {
        config.general.color = *color;
    }

    if let Some(org) = &global.org {
        if org.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "--org".to_string(),
                value: org.clone(),
            }
            .into());
        }
        config.remote.owner.clone_from(org);
    }

    if let Some(work_dir) = &global.work_dir {
        if !work_dir.is_dir() {
            return Err(CliError::InvalidArguments(format!(
                "working directory {} does not exist",
                work_dir.display()
            )));
        }
        config.paths.work_dir = Some(work_dir.clone());
    }

    Ok(())
}

// Tracing starts before the config file is read, so only the flag and the
// environment can move the log directory.
fn log_dir_for(cli: &Cli) -> PathBuf {
    let work_dir = cli
        .global
        .work_dir
        .clone()
        .or_else(|| std::env::var_os("SAFEPRUNE_WORK_DIR").map(PathBuf::from))
        .or_else(|| std::env::current_dir().ok())
        .unwrap_or_else(|| PathBuf::from("."));
    work_dir.join(constants::LOGS_DIR)
}

const DEFAULT_DEBUG_FILTER: &str = "info,safeprune=debug,safeprune_ops=debug";

fn debug_filter() -> tracing_subscriber::EnvFilter {
    tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(DEFAULT_DEBUG_FILTER))
}

fn log_file_in(log_dir: &std::path::Path) -> PathBuf {
    log_dir.join(format!(
        "safeprune-{}.log",
        chrono::Utc::now().format("%Y%m%d-%H%M%S")
    ))
}

/// Initialize tracing/logging
fn init_tracing(json_mode: bool, debug_enabled_flag: bool, log_dir: &std::path::Path) {
    let debug_enabled = std::env::var("RUST_LOG").is_ok() || debug_enabled_flag;

    if json_mode {
        // Keep stdout and stderr clean for the JSON document
        if debug_enabled && std::fs::create_dir_all(log_dir).is_ok() {
            if let Ok(file) = std::fs::File::create(log_file_in(log_dir)) {
                tracing_subscriber::fmt()
                    .json()
                    .with_writer(file)
                    .with_env_filter(debug_filter())
                    .init();
                return;
            }
        }
        tracing_subscriber::fmt()
            .with_writer(std::io::sink)
            .with_env_filter("off")
            .init();
    } else if debug_enabled {
        if let Err(e) = std::fs::create_dir_all(log_dir) {
            eprintln!("Warning: Failed to create log directory: {e}");
        }

        let log_file = log_file_in(log_dir);
        match std::fs::File::create(&log_file) {
            Ok(file) => {
                tracing_subscriber::fmt()
                    .json()
                    .with_writer(file)
                    .with_env_filter(debug_filter())
                    .init();

                eprintln!("Debug logging enabled: {}", log_file.display());
            }
            Err(e) => {
                eprintln!("Warning: Failed to create log file: {e}");
                tracing_subscriber::fmt()
                    .with_writer(std::io::stderr)
                    .with_env_filter(debug_filter())
                    .init();
            }
        }
    } else {
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                    tracing_subscriber::EnvFilter::new("warn,safeprune=warn,safeprune_ops=warn")
                }),
            )
            .init();
    }
}
