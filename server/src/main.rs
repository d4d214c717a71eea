use clap::Parser;
use log::info;
use server::http::{router, AppState};
use server::registry::GameRegistry;
use server::words::Dictionary;
use std::path::PathBuf;
use std::sync::Arc;

/// Main-method of the application.
/// Parses command-line arguments, loads the dictionary, then serves the
/// HTTP API until interrupted.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Command line arguments
    #[derive(Parser, Debug)]
    #[clap(author, version, about)]
    struct Args {
        /// Server IP address to bind to
        #[clap(short = 'H', long, default_value = "127.0.0.1")]
        host: String,
        /// Server port to listen on
        #[clap(short, long, default_value = "8000")]
        port: u16,
        /// Word list file, one word per line
        #[clap(short, long, default_value = "kata-dasar.txt")]
        dictionary: PathBuf,
        /// Directory of static files for the browser client
        #[clap(short, long, default_value = "static")]
        static_dir: PathBuf,
    }

    // Initialize logging
    env_logger::init();

    // Parse command line arguments
    let args = Args::parse();

    let dictionary = Dictionary::load_or_fallback(&args.dictionary);
    info!("Dictionary loaded with {} words", dictionary.len());

    let state = AppState {
        registry: Arc::new(GameRegistry::new()),
        dictionary: Arc::new(dictionary),
        static_dir: args.static_dir,
    };

    let address = format!("{}:{}", args.host, args.port);
    let listener = tokio::net::TcpListener::bind(&address).await?;
    info!("Game server listening on {}", address);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Game server shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Failed to install Ctrl+C handler: {}", e);
    }
}
