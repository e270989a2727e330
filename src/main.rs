use clap::Parser;
use roster::config::Settings;
use std::{net::SocketAddr, path::PathBuf, sync::Arc};

#[derive(Parser)]
#[command(name = "roster", about = "Search service over a student records spreadsheet")]
struct Cli {
    /// Config file (default: $XDG_CONFIG_HOME/roster/config.toml, if present).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Address to listen on, e.g. 0.0.0.0:5000.
    #[arg(long)]
    bind: Option<String>,

    /// Spreadsheet to serve.
    #[arg(long)]
    data: Option<PathBuf>,

    /// Worksheet name (default: first sheet).
    #[arg(long)]
    sheet: Option<String>,

    /// Append logs to this file instead of stderr.
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Load the dataset before accepting requests and exit if it fails.
    #[arg(long)]
    warm: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut settings = Settings::load(cli.config.as_deref())?;
    if let Some(bind) = cli.bind {
        settings.server.bind = bind;
    }
    if let Some(data) = cli.data {
        settings.dataset.path = data;
    }
    if cli.sheet.is_some() {
        settings.dataset.sheet = cli.sheet;
    }

    init_tracing(&settings.logging.filter, cli.log_file.as_deref())?;

    let cache = Arc::new(roster::cache_from_settings(&settings));
    if cli.warm {
        let warm = Arc::clone(&cache);
        tokio::task::spawn_blocking(move || warm.get()).await??;
    }

    let addr: SocketAddr = settings.server.bind.parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, source = %cache.source_id(), "roster listening");

    axum::serve(listener, roster::http::router(cache))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

fn init_tracing(default_filter: &str, log_file: Option<&std::path::Path>) -> anyhow::Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_env("RUST_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter));

    match log_file {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)?;
            tracing_subscriber::fmt()
                .with_writer(std::sync::Mutex::new(file))
                .with_ansi(false)
                .with_env_filter(filter)
                .init();
        }
        None => {
            tracing_subscriber::fmt().with_env_filter(filter).init();
        }
    }
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for ctrl-c");
    }
    tracing::info!("shutting down");
}
