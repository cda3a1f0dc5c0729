// globalcoin-cli — one-shot client for a globalcoynd data directory.
//
// There is no RPC socket to dial: every command opens the same
// chain.log/wallets.dat/peers.json the daemon uses, performs one operation
// through the orchestrator facade, and exits. Running this against a data
// directory a live daemon also has open is safe for reads; for writes
// (send, createwallet) stop the daemon first, the same way you would not
// edit a database file two processes have open for writing.

use std::env;

use colored::*;

use globalcoyn::config::Config;
use globalcoyn::node::Orchestrator;

fn print_usage() {
    println!("{}", " ██████╗ ██╗      ██████╗ ██████╗  █████╗ ██╗      ██████╗ ██████╗ ██╗   ██╗███╗   ██╗".bright_cyan());
    println!("{}", "██╔════╝ ██║     ██╔═══██╗██╔══██╗██╔══██╗██║     ██╔════╝██╔═══██╗╚██╗ ██╔╝████╗  ██║".bright_cyan());
    println!("{}", "██║  ███╗██║     ██║   ██║██████╔╝███████║██║     ██║     ██║   ██║ ╚████╔╝ ██╔██╗ ██║".bright_cyan().bold());
    println!("{}", "╚██████╔╝███████╗╚██████╔╝██████╔╝██║  ██║███████╗╚██████╗╚██████╔╝   ██║   ██║ ╚████║".blue());
    println!("{}", " ╚═════╝ ╚══════╝ ╚═════╝ ╚═════╝ ╚═╝  ╚═╝╚══════╝ ╚═════╝ ╚═════╝    ╚═╝   ╚═╝  ╚═══╝".blue());
    println!("{}", "                     - CLI Node Control -                        ".bright_yellow().on_blue().bold());
    println!();
    println!("{}", "  Usage: globalcoin-cli [--data-dir <path>] <command> [args...]".bright_yellow().bold());
    println!();
    println!("{}", "  Commands:".bright_white().bold());
    for (cmd, desc) in [
        ("createwallet <password>", "Generate a new mnemonic wallet, encrypted under <password>"),
        ("importwallet <password> <word1> ... <word12>", "Recover a wallet from its mnemonic"),
        ("listwallets", "List known wallet addresses"),
        ("balance <address>", "Get an address's current balance"),
        ("history <address>", "List an address's transactions"),
        ("send <address> <password> <recipient> <amount> <fee>", "Sign and submit a transaction"),
        ("chaininfo", "Get chain height, tip hash, and difficulty"),
        ("block <height>", "Get the block at a given height"),
        ("mempool", "List pending mempool transactions"),
        ("peers", "List known peers and their state"),
        ("addnode <host:port>", "Register a peer for the daemon to dial"),
    ] {
        println!("  {} {:<48} {}", "❯".bright_black(), cmd.bright_green(), desc.white());
    }
    println!();
}

fn load_config(args: &mut Vec<String>) -> Config {
    let mut config = Config::from_env();
    if let Some(pos) = args.iter().position(|a| a == "--data-dir") {
        if pos + 1 < args.len() {
            config.data_dir = std::path::PathBuf::from(args[pos + 1].clone());
            args.drain(pos..pos + 2);
        }
    }
    config
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut args: Vec<String> = env::args().skip(1).collect();
    let config = load_config(&mut args);

    if args.is_empty() {
        print_usage();
        return Ok(());
    }

    let command = args[0].clone();
    let rest = &args[1..];
    let orchestrator = Orchestrator::open(config).await?;

    match command.as_str() {
        "createwallet" => {
            let password = rest.first().ok_or("usage: createwallet <password>")?;
            let (address, mnemonic) = orchestrator.wallet_create(password).await?;
            println!("{}", "NEW WALLET CREATED".bright_green().bold());
            println!("{} {}", "Mnemonic:".bright_yellow(), mnemonic.white().bold());
            println!("{} {}", "Address: ".bright_yellow(), address.bright_white());
            println!();
            println!(
                "{}",
                "IMPORTANT: write down your mnemonic. It is the only way to recover these funds."
                    .on_red()
                    .white()
                    .bold()
            );
        }
        "importwallet" => {
            let password = rest.first().ok_or("usage: importwallet <password> <word1> ... <word12>")?;
            let mnemonic = rest[1..].join(" ");
            let address = orchestrator.wallet_import(&mnemonic, password).await?;
            println!("{} {}", "Address: ".bright_yellow(), address.bright_white());
        }
        "listwallets" => {
            for w in orchestrator.wallet_list().await {
                println!("{}", w.address);
            }
        }
        "balance" => {
            let address = rest.first().ok_or("usage: balance <address>")?;
            println!("{}", orchestrator.wallet_balance(address).await);
        }
        "history" => {
            let address = rest.first().ok_or("usage: history <address>")?;
            for tx in orchestrator.address_history(address).await {
                println!(
                    "{} -> {} amount={} fee={} ts={}",
                    tx.sender, tx.recipient, tx.amount, tx.fee, tx.timestamp
                );
            }
        }
        "send" => {
            if rest.len() < 5 {
                return Err("usage: send <address> <password> <recipient> <amount> <fee>".into());
            }
            let address = &rest[0];
            let password = &rest[1];
            let recipient = rest[2].clone();
            let amount: u64 = rest[3].parse()?;
            let fee: u64 = rest[4].parse()?;
            let hash = orchestrator.wallet_sign_and_submit(address, password, recipient, amount, fee, None).await?;
            println!("{} {}", "submitted tx:".bright_green().bold(), hex::encode(hash));
        }
        "chaininfo" => {
            let info = orchestrator.get_chain_info().await;
            println!("height:          {}", info.height);
            println!("tip hash:        {}", hex::encode(info.tip_hash));
            println!("difficulty bits: {:#010x}", info.difficulty_bits);
        }
        "block" => {
            let height: u64 = rest.first().ok_or("usage: block <height>")?.parse()?;
            let block = orchestrator.get_block(Some(height), None).await?;
            println!("index:        {}", block.header.index);
            println!("previous:     {}", hex::encode(block.header.previous_hash));
            println!("merkle root:  {}", hex::encode(block.header.merkle_root));
            println!("transactions: {}", block.transactions.len());
        }
        "mempool" => {
            for tx in orchestrator.mempool_snapshot().await {
                println!("{} -> {} amount={} fee={}", tx.sender, tx.recipient, tx.amount, tx.fee);
            }
        }
        "peers" => {
            for p in orchestrator.list_peers().await {
                println!("{}:{} state={:?} faults={}", p.host, p.p2p_port, p.state, p.protocol_faults);
            }
        }
        "addnode" => {
            let spec = rest.first().ok_or("usage: addnode <host:port>")?;
            let (host, port) = spec.rsplit_once(':').ok_or("expected host:port")?;
            orchestrator.connect_peer(host.to_string(), port.parse()?).await;
            orchestrator.save_peers().await?;
            println!("{} {spec}", "registered peer:".bright_green().bold());
        }
        other => {
            eprintln!("{} unknown command '{other}'", "error:".bright_red().bold());
            print_usage();
            std::process::exit(1);
        }
    }

    Ok(())
}
