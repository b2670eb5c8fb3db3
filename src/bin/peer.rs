use std::io::Write;
use std::path::PathBuf;

use clap::Parser;
use rshare::constants::{DEFAULT_TRACKER_HOST, DEFAULT_TRACKER_PORT, EPHEMERAL_PORT};
use rshare::peer::{PeerConfig, PeerError, PeerNode, RetrieveOutcome};
use rshare::protocol::{FileName, PeerIdentity};
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "rshare-peer")]
#[command(about = "Share a directory with other rshare peers")]
struct Cli {
    /// Directory to share; retrieved files are saved here too
    directory: PathBuf,
    /// File server port, also used as this peer's identity (0 = any free port)
    #[arg(short, long, default_value_t = EPHEMERAL_PORT)]
    port: u16,
    #[arg(long, default_value = DEFAULT_TRACKER_HOST)]
    tracker_host: String,
    #[arg(long, default_value_t = DEFAULT_TRACKER_PORT)]
    tracker_port: u16,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = PeerConfig::new(cli.directory)
        .with_tracker(cli.tracker_host, cli.tracker_port)
        .with_listen_port(cli.port);

    let node = PeerNode::start(config).await?;
    println!("peer {} ready", node.identity());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let Some(request) = prompt(&mut lines, "request [(s)earch|(r)etrieve|(q)uit]: ").await? else {
            break;
        };

        match request.chars().next().map(|c| c.to_ascii_lowercase()) {
            Some('s') => search(&node, &mut lines).await?,
            Some('r') => retrieve(&node, &mut lines).await?,
            Some('q') => break,
            _ => println!("unexpected request"),
        }
    }

    node.shutdown().await?;
    Ok(())
}

async fn prompt(lines: &mut Lines<BufReader<Stdin>>, label: &str) -> std::io::Result<Option<String>> {
    print!("{}", label);
    std::io::stdout().flush()?;
    Ok(lines.next_line().await?.map(|line| line.trim().to_string()))
}

async fn read_name(lines: &mut Lines<BufReader<Stdin>>) -> std::io::Result<Option<FileName>> {
    let Some(input) = prompt(lines, "filename: ").await? else {
        return Ok(None);
    };
    match FileName::new(input) {
        Ok(name) => Ok(Some(name)),
        Err(e) => {
            println!("{}", e);
            Ok(None)
        }
    }
}

async fn search(
    node: &PeerNode,
    lines: &mut Lines<BufReader<Stdin>>,
) -> Result<(), Box<dyn std::error::Error>> {
    let Some(name) = read_name(lines).await? else {
        return Ok(());
    };

    match node.search(&name).await {
        Ok(peers) if peers.is_empty() => println!("file not found"),
        Ok(peers) => {
            let ids: Vec<String> = peers.iter().map(|p| p.to_string()).collect();
            println!("peer(s) with file: {}", ids.join(","));
        }
        Err(e) => println!("search failed: {}", e),
    }
    Ok(())
}

async fn retrieve(
    node: &PeerNode,
    lines: &mut Lines<BufReader<Stdin>>,
) -> Result<(), Box<dyn std::error::Error>> {
    let Some(input) = prompt(lines, "peer: ").await? else {
        return Ok(());
    };
    let target: PeerIdentity = match input.parse() {
        Ok(target) => target,
        Err(e) => {
            println!("{}", e);
            return Ok(());
        }
    };
    if target == node.identity() {
        println!("peer is current client");
        return Ok(());
    }

    let Some(name) = read_name(lines).await? else {
        return Ok(());
    };

    match node.retrieve(target, &name).await {
        Ok(RetrieveOutcome::Saved { path, bytes }) => {
            println!("saved {} ({} bytes)", path.display(), bytes)
        }
        Ok(RetrieveOutcome::NotFound) => println!("file does not exist"),
        Ok(RetrieveOutcome::StatFailed) => println!("could not read file stats"),
        Err(PeerError::SelfRetrieve(_)) => println!("peer is current client"),
        Err(e) => println!("failed peer connection: {}", e),
    }
    Ok(())
}
