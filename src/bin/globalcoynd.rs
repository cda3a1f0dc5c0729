use std::sync::Arc;

use colored::*;

use globalcoyn::config::Config;
use globalcoyn::net::gossip::Gossip;
use globalcoyn::node::Orchestrator;

fn banner() {
    println!("{}", " ██████╗ ██╗      ██████╗ ██████╗  █████╗ ██╗      ██████╗ ██████╗ ██╗   ██╗███╗   ██╗".bright_cyan());
    println!("{}", "██╔════╝ ██║     ██╔═══██╗██╔══██╗██╔══██╗██║     ██╔════╝██╔═══██╗╚██╗ ██╔╝████╗  ██║".bright_cyan());
    println!("{}", "██║  ███╗██║     ██║   ██║██████╔╝███████║██║     ██║     ██║   ██║ ╚████╔╝ ██╔██╗ ██║".bright_cyan().bold());
    println!("{}", "██║   ██║██║     ██║   ██║██╔══██╗██╔══██║██║     ██║     ██║   ██║  ╚██╔╝  ██║╚██╗██║".bright_cyan().bold());
    println!("{}", "╚██████╔╝███████╗╚██████╔╝██████╔╝██║  ██║███████╗╚██████╗╚██████╔╝   ██║   ██║ ╚████║".blue());
    println!("{}", " ╚═════╝ ╚══════╝ ╚═════╝ ╚═════╝ ╚═╝  ╚═╝╚══════╝ ╚═════╝ ╚═════╝    ╚═╝   ╚═╝  ╚═══╝".blue());
    println!();
    println!("{}", "                       Account-Model Proof-of-Work Node                       ".bright_green().on_black().bold());
    println!();
    println!("{}", " [SECURITY WARNING] ".on_red().white().bold());
    println!("{}", " Your public IP will be visible to peers you connect with.".red());
    println!("{}", " This binary never exposes an HTTP/RPC socket; drive it via globalcoin-cli.".red());
    println!();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    tracing_subscriber::fmt::init();
    banner();

    let config = Config::from_env();
    println!("{} data dir: {}", "[init]".bright_blue().bold(), config.data_dir.display());
    println!("{} network: {:?}", "[init]".bright_blue().bold(), config.network);

    let orchestrator = Arc::new(Orchestrator::open(config.clone()).await?);
    let info = orchestrator.get_chain_info().await;
    println!("{} chain height: {}", "[init]".bright_blue().bold(), info.height);

    if let Ok(addr) = std::env::var("GLOBALCOYN_MINE_TO") {
        orchestrator.start_mining(addr.clone()).await;
        println!("{} mining to {addr}", "[miner]".bright_yellow().bold());
    }

    let peers = orchestrator.peer_manager();
    let gossip = Gossip::new(orchestrator.clone(), peers, config.network.magic(), config.p2p_port);
    let bind_addr: std::net::SocketAddr = format!("0.0.0.0:{}", config.p2p_port).parse()?;
    let gossip_handle = tokio::spawn(async move {
        if let Err(e) = gossip.run(bind_addr).await {
            eprintln!("{} error: {e}", "[p2p]".bright_red().bold());
        }
    });
    println!("{} p2p listening on 0.0.0.0:{}", "[p2p]".bright_green().bold(), config.p2p_port);

    println!();
    println!("{}", "  Usage: globalcoin-cli <command> [args...]".bright_yellow().bold());
    println!("  {} globalcoin-cli --data-dir {} chaininfo", "❯".bright_black(), config.data_dir.display());
    println!("  {} globalcoin-cli --data-dir {} createwallet", "❯".bright_black(), config.data_dir.display());
    println!("  {} globalcoin-cli --data-dir {} balance <address>", "❯".bright_black(), config.data_dir.display());
    println!();

    tokio::signal::ctrl_c().await?;
    gossip_handle.abort();
    orchestrator.shutdown().await;
    println!("{} done", "[shutdown]".bright_red().bold());
    Ok(())
}
