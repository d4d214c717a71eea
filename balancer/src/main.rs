use balancer::proxy::{forward, ProxyState};
use balancer::sticky::{BackendPool, StickyRouter};
use clap::Parser;
use log::info;
use std::sync::Arc;
use std::time::Duration;

/// Main-method of the application.
/// Parses command-line arguments, then relays every request to one of the
/// configured backend game servers.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Command line arguments
    #[derive(Parser, Debug)]
    #[clap(author, version, about)]
    struct Args {
        /// Balancer IP address to bind to
        #[clap(short = 'H', long, default_value = "127.0.0.1")]
        host: String,
        /// Balancer port to listen on
        #[clap(short, long, default_value = "6969")]
        port: u16,
        /// Backend base URLs, repeatable
        #[clap(short, long, default_values_t = vec!["http://127.0.0.1:8000".to_string()])]
        backend: Vec<String>,
        /// Per-request backend timeout in seconds
        #[clap(short, long, default_value = "10")]
        timeout: u64,
    }

    // Initialize logging
    env_logger::init();

    // Parse command line arguments
    let args = Args::parse();

    let pool = BackendPool::new(args.backend.clone());
    if pool.is_empty() {
        return Err("at least one backend must be configured".into());
    }
    info!("Balancing across {} backends: {:?}", pool.len(), args.backend);

    let state = ProxyState {
        router: Arc::new(StickyRouter::new(pool)),
        client: reqwest::Client::builder()
            .timeout(Duration::from_secs(args.timeout))
            .build()?,
    };

    let app = axum::Router::new().fallback(forward).with_state(state);

    let address = format!("{}:{}", args.host, args.port);
    let listener = tokio::net::TcpListener::bind(&address).await?;
    info!("Load balancer listening on {}", address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Load balancer shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Failed to install Ctrl+C handler: {}", e);
    }
}
