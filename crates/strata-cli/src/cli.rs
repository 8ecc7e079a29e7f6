use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "strata",
    about = "Strata: content-addressed chunk store with a compare-and-swap root",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the store service
    Serve(ServeArgs),
    /// Print the current root
    Root(RemoteArgs),
    /// Upload files as chunks and flush them
    Put(PutArgs),
    /// Fetch one chunk and write its payload to stdout
    Get(GetArgs),
    /// Compare-and-swap the root
    Cas(CasArgs),
}

#[derive(Args)]
pub struct ServeArgs {
    /// TOML config file; flags below override it
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    #[arg(long)]
    pub bind: Option<SocketAddr>,
    #[arg(long)]
    pub access_token: Option<String>,
    /// Accept at most this many chunks per write and report the rest as backpressure
    #[arg(long)]
    pub max_chunks_per_write: Option<usize>,
}

#[derive(Args)]
pub struct RemoteArgs {
    /// Store URL; its query string is forwarded on every request
    #[arg(long, default_value = "http://127.0.0.1:9000")]
    pub url: String,
    /// Give up after this many backpressure rounds
    #[arg(long)]
    pub max_rounds: Option<usize>,
}

#[derive(Args)]
pub struct PutArgs {
    #[command(flatten)]
    pub remote: RemoteArgs,
    #[arg(long, default_value = "1")]
    pub height: u64,
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,
}

#[derive(Args)]
pub struct GetArgs {
    #[command(flatten)]
    pub remote: RemoteArgs,
    pub hash: String,
}

#[derive(Args)]
pub struct CasArgs {
    #[command(flatten)]
    pub remote: RemoteArgs,
    #[arg(long)]
    pub current: String,
    #[arg(long)]
    pub proposed: String,
}
