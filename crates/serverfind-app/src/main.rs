mod cli;
mod find;
mod fixture;
mod session;

use std::path::Path;
use std::process::ExitCode;
use std::time::Duration;

use serverfind_common::{ConfigError, Result, ServerfindError};
use serverfind_config::ServerfindConfig;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

use crate::cli::{Args, Command};
use crate::fixture::Fixture;
use crate::session::RunOptions;

/// Load the config at `path` (or the default location). Failures fall back
/// to defaults and are returned for logging once tracing is up.
fn load_config(path: Option<&Path>) -> (ServerfindConfig, Option<ConfigError>) {
    match serverfind_config::load_config(path) {
        Ok(config) => (config, None),
        Err(e) => (ServerfindConfig::default(), Some(e)),
    }
}

fn init_logging(args: &Args, config: &ServerfindConfig) {
    let default_directive = format!("serverfind={}", config.logging.level.as_directive());
    let directive = args.log_level.as_deref().unwrap_or(&default_directive);
    let filter = match directive.parse() {
        Ok(d) => EnvFilter::from_default_env().add_directive(d),
        Err(_) => EnvFilter::from_default_env().add_directive(LevelFilter::INFO.into()),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn dispatch(args: Args, config: ServerfindConfig) -> Result<()> {
    match args.command {
        Command::Find {
            query,
            advanced,
            fixture,
            json,
        } => {
            let fixture = Fixture::load_or_sample(fixture.as_deref())?;
            let report = find::find(&config, &fixture, &query, advanced)?;
            if json {
                let out = serde_json::to_string_pretty(&report)
                    .map_err(|e| ServerfindError::Other(e.to_string()))?;
                println!("{out}");
            } else {
                println!("{}", report.render_text());
            }
            Ok(())
        }
        Command::Run {
            fixture,
            url,
            render_delay_ms,
            ephemeral,
        } => {
            session::run(
                config,
                RunOptions {
                    fixture,
                    url,
                    render_delay: Duration::from_millis(render_delay_ms),
                    ephemeral,
                },
            )
            .await
        }
        Command::Config { save } => {
            println!("{}", serverfind_config::config_to_json(&config));
            if let Some(path) = save {
                serverfind_config::save_config_to_path(&config, &path)?;
                tracing::info!(path = %path.display(), "config written");
            }
            Ok(())
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = cli::parse();

    let (config, config_error) = load_config(args.config.as_deref());
    init_logging(&args, &config);

    tracing::info!("serverfind v{} starting", env!("CARGO_PKG_VERSION"));
    if let Some(path) = &args.config {
        tracing::info!(path = %path.display(), "using config override");
    }
    if let Some(e) = config_error {
        tracing::warn!("Config load failed, using defaults: {e}");
    }

    match dispatch(args, config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "command failed");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
