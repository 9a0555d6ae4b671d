use anyhow::{Context, Result};
use clap::Parser;
use scholar_chat::config::{LogFormat, LoggingConfig};
use scholar_chat::{Config, ConfigOverrides, Server};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Literature-grounded chat endpoint backed by Semantic Scholar
#[derive(Debug, Parser)]
#[command(name = "scholar-chat", version, about)]
struct Cli {
    /// Path to a TOML configuration file
    #[arg(short, long, env = "SCHOLAR_CHAT_CONFIG")]
    config: Option<PathBuf>,

    /// Address to bind
    #[arg(long)]
    host: Option<String>,

    /// Port to bind
    #[arg(short, long)]
    port: Option<u16>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Log output format
    #[arg(long, value_enum)]
    log_format: Option<LogFormat>,

    /// Print the effective configuration as TOML and exit
    #[arg(long)]
    print_config: bool,
}

impl Cli {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            server_host: self.host.clone(),
            server_port: self.port,
            log_level: self.log_level.clone(),
            log_format: self.log_format,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::load(cli.config.as_deref())
        .context("failed to load configuration")?
        .with_overrides(&cli.overrides());
    config.validate().context("invalid configuration")?;

    if cli.print_config {
        print!("{}", config.to_toml()?);
        return Ok(());
    }

    init_tracing(&config.logging);
    info!(
        "{} {} using {}",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
        config.search.endpoint
    );

    Server::new(config).run().await?;
    Ok(())
}

/// `RUST_LOG` takes precedence over the configured level
fn init_tracing(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(logging.level.to_lowercase()));

    match logging.format {
        LogFormat::Pretty => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .init(),
        LogFormat::Json => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .json()
            .init(),
    }
}
