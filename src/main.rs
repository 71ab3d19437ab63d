//! scmd - personal command store
//!
//! Main entry point for the scmd CLI.

mod app;
mod cli;
mod cmd_catalog;
mod cmd_embed;
mod cmd_search;
mod render;

use clap::Parser;
use tracing::{debug, error, warn};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use scmd_config::{ConfigLoader, ConfigValidator, LoggingConfig};

use crate::app::App;
use crate::cli::{Cli, Commands};

fn init_tracing(logging: &LoggingConfig, verbose: bool) -> Result<(), Box<dyn std::error::Error>> {
    let log_dir = ConfigLoader::expand_path(&logging.dir);
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("scmd")
        .filename_suffix("log")
        .max_log_files(logging.max_files)
        .build(&log_dir)?;

    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    // Dropping the guard would lose buffered lines on exit.
    static GUARD: std::sync::OnceLock<tracing_appender::non_blocking::WorkerGuard> =
        std::sync::OnceLock::new();
    let _ = GUARD.set(guard);

    let default_level = if verbose { "debug" } else { "info" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(env_filter)
        // Console layer on stderr so results on stdout stay clean
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_ansi(true),
        )
        .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
        .init();

    Ok(())
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config_path = cli.config.clone().unwrap_or_else(ConfigLoader::default_path);
    let config = match ConfigLoader::resolve(&config_path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Invalid configuration {}: {}", config_path.display(), e);
            std::process::exit(2);
        }
    };

    if let Err(e) = init_tracing(&config.logging, cli.verbose) {
        eprintln!("Logging disabled: {}", e);
    }
    debug!("Configuration loaded from {}", config_path.display());
    for warning in ConfigValidator::validate(&config).warnings {
        warn!("{}: {}", warning.path, warning.message);
    }

    if let Err(e) = run(cli, config).await {
        error!("{}", e);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli, config: scmd_config::Config) -> Result<(), Box<dyn std::error::Error>> {
    let app = App::bootstrap(config).await?;

    match cli.command.unwrap_or(Commands::Interactive { no_ai: false }) {
        Commands::Search { query, no_ai, format } => {
            cmd_search::handle_search(&app, &query.join(" "), no_ai, format).await
        }
        Commands::Interactive { no_ai } => cmd_search::handle_interactive(&app, no_ai).await,
        Commands::Add { key, data } => cmd_catalog::handle_add(&app, &key, &data).await,
        Commands::Save { key, data } => cmd_catalog::handle_save(&app, &key, &data).await,
        Commands::Import { file } => cmd_catalog::handle_import(&app, &file).await,
        Commands::List { limit, format } => cmd_catalog::handle_list(&app, limit, format).await,
        Commands::Show { id } => cmd_catalog::handle_show(&app, id).await,
        Commands::Delete { id, yes } => {
            cmd_catalog::handle_show(&app, id).await?;
            if yes || cmd_catalog::confirm(&format!("Delete command {}? (y/n): ", id))? {
                cmd_catalog::handle_delete(&app, id).await
            } else {
                println!("Cancelled.");
                Ok(())
            }
        }
        Commands::Count => cmd_catalog::handle_count(&app).await,
        Commands::Embed => cmd_embed::handle_embed(&app).await,
        Commands::Stats => cmd_embed::handle_stats(&app).await,
        Commands::Status { refresh } => cmd_embed::handle_status(&app, refresh).await,
    }
}
