//! homedash - Personal Dashboard Backend binary.

use clap::Parser;
use homedash::{
    start_web_server, AppConfig, AppState, ResourceCollector, WebConfig, DEFAULT_WEB_PORT,
};
use std::sync::Arc;
use tracing::{info, Level};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser)]
#[command(name = "homedash")]
#[command(about = "Personal dashboard backend")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(
    long_about = "Aggregates Spotify playback, weather, calendar, Twitch, and local resource status behind one JSON API"
)]
struct Cli {
    /// Web server bind address
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    /// Web server port
    #[arg(short, long, default_value_t = DEFAULT_WEB_PORT)]
    port: u16,

    /// Path to a .env file with service credentials
    #[arg(long)]
    env_file: Option<String>,

    /// Static files directory served under /static
    #[arg(long, default_value = "static")]
    static_dir: String,

    /// Dashboard HTML entry point served at /
    #[arg(long, default_value = "index.html")]
    index: String,

    /// Disable GPU monitoring
    #[arg(long)]
    no_gpu: bool,

    /// Disable CORS headers
    #[arg(long)]
    no_cors: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_logging(&cli)?;
    load_env(&cli)?;

    let config = AppConfig::from_env();

    let collector = if cli.no_gpu {
        info!("GPU monitoring disabled");
        ResourceCollector::without_gpu()
    } else {
        ResourceCollector::new()
    };

    let state = Arc::new(AppState::from_config(&config, collector));

    let web_config = WebConfig::new(&cli.host, cli.port)
        .with_cors(!cli.no_cors)
        .with_static_path(Some(cli.static_dir.clone()))
        .with_index_path(Some(cli.index.clone()));

    info!("Web server configuration:");
    info!("  - Bind address: {}:{}", cli.host, cli.port);
    info!("  - CORS enabled: {}", !cli.no_cors);
    info!("  - Static directory: {}", cli.static_dir);

    start_web_server(state, web_config).await?;

    Ok(())
}

fn init_logging(cli: &Cli) -> anyhow::Result<()> {
    let level = if cli.debug {
        Level::DEBUG
    } else if cli.verbose {
        Level::INFO
    } else {
        Level::WARN
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    Ok(())
}

fn load_env(cli: &Cli) -> anyhow::Result<()> {
    match &cli.env_file {
        Some(path) => {
            dotenvy::from_path(path)
                .map_err(|e| anyhow::anyhow!("failed to load env file {path}: {e}"))?;
            info!("Loaded environment from {path}");
        }
        None => {
            // A missing default .env is fine; credentials may come from the
            // process environment.
            if dotenvy::dotenv().is_ok() {
                info!("Loaded environment from .env");
            }
        }
    }
    Ok(())
}
