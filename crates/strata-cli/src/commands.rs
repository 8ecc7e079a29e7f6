use std::io::Write;

use anyhow::Context;
use colored::Colorize;
use strata_client::{BatchStore, ClientConfig, RetryPolicy};
use strata_server::{ServerConfig, StrataServer};
use strata_types::{Chunk, ContentHash, Hints};

use crate::cli::*;

pub async fn run_command(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Serve(args) => cmd_serve(args).await,
        Command::Root(args) => cmd_root(args).await,
        Command::Put(args) => cmd_put(args).await,
        Command::Get(args) => cmd_get(args).await,
        Command::Cas(args) => cmd_cas(args).await,
    }
}

fn server_config(args: &ServeArgs) -> anyhow::Result<ServerConfig> {
    let mut config = match &args.config {
        Some(path) => ServerConfig::load(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => ServerConfig::default(),
    };
    if let Some(bind) = args.bind {
        config.bind_addr = bind;
    }
    if args.access_token.is_some() {
        config.access_token = args.access_token.clone();
    }
    if args.max_chunks_per_write.is_some() {
        config.max_chunks_per_write = args.max_chunks_per_write;
    }
    Ok(config)
}

fn client_config(args: &RemoteArgs) -> anyhow::Result<ClientConfig> {
    let config = ClientConfig::from_url(&args.url)?;
    Ok(match args.max_rounds {
        Some(rounds) => config.with_retry(RetryPolicy::max_rounds(rounds)),
        None => config,
    })
}

async fn cmd_serve(args: ServeArgs) -> anyhow::Result<()> {
    let config = server_config(&args)?;
    tracing::debug!(?config, "server config");
    println!("{} Strata store on {}", "✓".green().bold(), config.bind_addr.to_string().bold());
    if config.access_token.is_some() {
        println!("  Access token: {}", "required".yellow());
    }
    if let Some(limit) = config.max_chunks_per_write {
        println!("  Backpressure after {} chunks per write", limit.to_string().cyan());
    }
    StrataServer::new(config).serve().await?;
    Ok(())
}

async fn cmd_root(args: RemoteArgs) -> anyhow::Result<()> {
    let store = BatchStore::connect(&client_config(&args)?)?;
    let root = store.root().await?;
    if root.is_empty() {
        println!("{}", "(no root)".dimmed());
    } else {
        println!("{}", root.to_hex().yellow());
    }
    Ok(())
}

async fn cmd_put(args: PutArgs) -> anyhow::Result<()> {
    let store = BatchStore::connect(&client_config(&args.remote)?)?;
    for path in &args.paths {
        let payload =
            std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
        let chunk = Chunk::new(payload);
        println!("  {} {} {}", "queued:".green(), chunk.hash().short_hex().yellow(), path.display());
        store.schedule_put(chunk, args.height, Hints::new());
    }
    let report = store.close().await?;
    println!(
        "{} {} chunks durable ({} rounds, {} sent)",
        "✓".green().bold(),
        report.chunks_accepted,
        report.rounds,
        report.chunks_sent
    );
    Ok(())
}

async fn cmd_get(args: GetArgs) -> anyhow::Result<()> {
    let hash: ContentHash = args.hash.parse()?;
    let store = BatchStore::connect(&client_config(&args.remote)?)?;
    match store.get(&hash).await? {
        Some(chunk) => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(chunk.payload())?;
            stdout.flush()?;
            Ok(())
        }
        None => anyhow::bail!("chunk {} not found", hash.short_hex()),
    }
}

async fn cmd_cas(args: CasArgs) -> anyhow::Result<()> {
    let current = parse_root(&args.current)?;
    let proposed = parse_root(&args.proposed)?;
    let store = BatchStore::connect(&client_config(&args.remote)?)?;
    if store.update_root(current, proposed).await? {
        println!("{} Root is now {}", "✓".green().bold(), proposed.to_hex().yellow());
    } else {
        let actual = store.root().await?;
        println!(
            "{} Root moved; current is {}",
            "✗".red().bold(),
            actual.to_hex().yellow()
        );
    }
    Ok(())
}

/// `empty` stands for the unset root.
fn parse_root(s: &str) -> anyhow::Result<ContentHash> {
    if s == "empty" {
        return Ok(ContentHash::empty());
    }
    s.parse::<ContentHash>()
        .with_context(|| format!("`{s}` is not a root hash"))
}
