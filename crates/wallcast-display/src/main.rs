use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tokio::sync::{mpsc, watch};
use tracing::info;

use wallcast_client::{ChangePoller, KintoClient, MediaCache};
use wallcast_core::WallConfig;
use wallcast_slideshow::{NoopPreloader, Preloader, Slideshow};

mod term;

use term::TermRenderer;

/// Rotating wall of records from a remote store.
#[derive(Parser, Debug)]
#[command(name = "wallcast", version, about)]
struct Cli {
    /// Path to wallcast.toml (defaults to ./wallcast.toml).
    #[arg(short, long)]
    config: Option<String>,

    /// Override the initial fetch limit.
    #[arg(long)]
    limit: Option<u32>,

    /// Override the rotation delay in milliseconds.
    #[arg(long)]
    refresh_ms: Option<u64>,
}

/// Adapts the shared media cache to the slideshow's preload seam.
struct CachePreloader(Arc<MediaCache>);

impl Preloader for CachePreloader {
    fn preload(&self, location: &str) {
        self.0.preload(location);
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "wallcast=info".into()),
        )
        .init();

    let cli = Cli::parse();
    let mut config = WallConfig::load(cli.config.as_deref())?;
    if let Some(limit) = cli.limit {
        config.wall.limit = limit;
    }
    if let Some(refresh_ms) = cli.refresh_ms {
        config.wall.refresh_ms = refresh_ms;
    }

    info!(
        server = %config.server.url,
        bucket = %config.server.bucket,
        collection = %config.server.collection,
        "starting wallcast"
    );

    let client = KintoClient::new(&config.server);

    let preloader: Box<dyn Preloader> = if config.wall.preload {
        Box::new(CachePreloader(Arc::new(MediaCache::new())))
    } else {
        Box::new(NoopPreloader)
    };

    let (event_tx, event_rx) = mpsc::channel(64);
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let slideshow = Slideshow::new(
        Box::new(TermRenderer::new()),
        preloader,
        Duration::from_millis(config.wall.refresh_ms),
        event_rx,
    );

    // Initial batch. A failure here is surfaced and fatal — the wall never
    // starts and there is no retry.
    let initial = match client.fetch_records(config.wall.limit).await {
        Ok(records) => records,
        Err(e) => {
            slideshow.show_error(&e.to_string()).await;
            return Err(e.into());
        }
    };
    info!(count = initial.len(), "initial records fetched");

    // Change poller picks up strictly after the newest fetched record.
    let cursor = initial.iter().map(|r| r.last_modified).max().unwrap_or(0);
    let poller = ChangePoller::new(
        client,
        config.wall.poll_interval_secs,
        cursor,
        event_tx,
    );
    tokio::spawn(poller.run(shutdown_rx.clone()));

    let shutdown_for_signal = shutdown_tx.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("ctrl-c received, stopping");
            let _ = shutdown_for_signal.send(true);
        }
    });

    slideshow.run(initial, shutdown_rx).await;
    Ok(())
}
