//! nhkey - inspect and canonicalize SONiC next-hop keys
//!
//! Parses next-hop key strings the way route orchestration does and prints
//! them as JSON or in canonical order.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use sonic_nexthop::{NextHopEncoding, NextHopKey, RouterIntfsTable};
use std::collections::BTreeSet;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "nhkey", version, about = "Inspect SONiC next-hop keys")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, clap::Args)]
struct KeyArgs {
    /// Key encoding; without it the shape is inferred (ip or ip@alias)
    #[arg(long, short)]
    encoding: Option<NextHopEncoding>,

    /// Router interface table (JSON) used to resolve implicit and VRF aliases
    #[arg(long)]
    intfs: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Parse one key and print its fields as JSON
    Parse {
        key: String,
        #[command(flatten)]
        args: KeyArgs,
    },
    /// Parse keys and print them deduplicated in canonical order
    Sort {
        #[arg(required = true)]
        keys: Vec<String>,
        #[command(flatten)]
        args: KeyArgs,
    },
}

#[derive(Debug, Serialize)]
struct NextHopView<'a> {
    ip_address: String,
    alias: &'a str,
    vni: u32,
    mac_address: String,
    srv6_segment: &'a str,
    srv6_source: &'a str,
    encoding: String,
    encoded: String,
    is_intf_nexthop: bool,
    is_srv6_nexthop: bool,
}

impl<'a> From<&'a NextHopKey> for NextHopView<'a> {
    fn from(nh: &'a NextHopKey) -> Self {
        Self {
            ip_address: nh.ip_address().to_string(),
            alias: nh.alias(),
            vni: nh.vni(),
            mac_address: nh.mac_address().to_string(),
            srv6_segment: nh.srv6_segment(),
            srv6_source: nh.srv6_source(),
            encoding: nh.encoding().to_string(),
            encoded: nh.encode(),
            is_intf_nexthop: nh.is_intf_nexthop(),
            is_srv6_nexthop: nh.is_srv6_nexthop(),
        }
    }
}

fn main() -> ExitCode {
    init_logging();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("nhkey: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Parse { key, args } => {
            let intfs = load_intfs(&args)?;
            let nh = parse_key(&key, args.encoding, &intfs)?;
            println!("{}", serde_json::to_string_pretty(&NextHopView::from(&nh))?);
        }
        Command::Sort { keys, args } => {
            let intfs = load_intfs(&args)?;
            let sorted = keys
                .iter()
                .map(|k| parse_key(k, args.encoding, &intfs))
                .collect::<Result<BTreeSet<_>>>()?;
            info!("Sorted {} keys into {} next-hops", keys.len(), sorted.len());
            for nh in &sorted {
                println!("{}", nh.encode());
            }
        }
    }
    Ok(())
}

fn load_intfs(args: &KeyArgs) -> Result<RouterIntfsTable> {
    match &args.intfs {
        Some(path) => RouterIntfsTable::load(path)
            .with_context(|| format!("loading router interfaces from {}", path.display())),
        None => Ok(RouterIntfsTable::new()),
    }
}

fn parse_key(
    key: &str,
    encoding: Option<NextHopEncoding>,
    intfs: &RouterIntfsTable,
) -> Result<NextHopKey> {
    let nh = match encoding {
        Some(encoding) => NextHopKey::parse_with(key, encoding)?,
        None => NextHopKey::parse(key, intfs)?,
    };
    Ok(nh)
}
