use std::net::SocketAddr;

use clap::Parser;
use rshare::constants::DEFAULT_TRACKER_PORT;
use rshare::server::IndexServer;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "rshare-tracker")]
#[command(about = "Indexing server for rshare peers")]
struct Cli {
    /// Address to listen on
    #[arg(short, long, default_value_t = SocketAddr::from(([0, 0, 0, 0], DEFAULT_TRACKER_PORT)))]
    listen: SocketAddr,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let cli = Cli::parse();
    let server = IndexServer::bind(cli.listen).await?;
    server.run().await;

    Ok(())
}
