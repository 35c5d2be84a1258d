use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tokio::net::TcpListener;
use track2tabs_relay::{serve, RelayConfig};

/// Relay browser uploads to the Track2Tabs chord detection backend.
#[derive(Parser, Debug)]
#[command(name = "track2tabs-relay")]
#[command(about = "Track2Tabs upload relay")]
struct Args {
    /// YAML config file (all keys optional)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Address to listen on (default: 127.0.0.1:3000)
    #[arg(long)]
    bind: Option<SocketAddr>,

    /// Chord detection endpoint (default: http://127.0.0.1:8000/chords)
    #[arg(long, env = "TRACK2TABS_BACKEND_URL")]
    backend_url: Option<String>,

    /// Largest accepted request body in bytes (default: 25 MiB)
    #[arg(long)]
    max_body_bytes: Option<usize>,

    /// Backend request timeout in seconds (default: 120)
    #[arg(long)]
    timeout_secs: Option<u64>,
}

impl Args {
    fn into_config(self) -> anyhow::Result<RelayConfig> {
        let mut config = match &self.config {
            Some(path) => RelayConfig::load(path)?,
            None => RelayConfig::default(),
        };

        if let Some(bind) = self.bind {
            config.bind = bind;
        }
        if let Some(url) = self.backend_url {
            config.backend_url = url;
        }
        if let Some(max) = self.max_body_bytes {
            config.max_body_bytes = max;
        }
        if let Some(secs) = self.timeout_secs {
            config.timeout_secs = secs;
        }

        config.validate()?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Args::parse().into_config()?;

    let listener = TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("Failed to bind to {}", config.bind))?;

    serve(listener, &config, async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => log::info!("Shutting down..."),
            Err(e) => {
                log::warn!("Could not listen for Ctrl+C: {}", e);
                std::future::pending::<()>().await
            }
        }
    })
    .await
}
