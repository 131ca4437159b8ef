//! calcstack-server — publishes one shared stack and serves it over TCP.
//!
//! ```bash
//! calcstack-server --config calcstack.toml --addr 0.0.0.0:1099
//! ```

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::info;

use calcstack::config::ServerConfig;
use calcstack::remote::StackServer;
use calcstack::{logging, Registry, StackService};

/// Serve a shared calculator stack.
#[derive(Parser, Debug)]
#[command(name = "calcstack-server")]
struct Cli {
  /// TOML configuration file.
  #[arg(long)]
  config: Option<PathBuf>,

  /// Listen address, overriding the configuration file.
  #[arg(long)]
  addr: Option<String>,

  /// Name to publish the stack under, overriding the configuration file.
  #[arg(long)]
  name: Option<String>,
}

fn main() -> anyhow::Result<()> {
  let cli = Cli::parse();

  let mut config = match cli.config {
    Some(ref path) => ServerConfig::from_file(path)?,
    None => ServerConfig::default(),
  };
  if let Some(addr) = cli.addr {
    config.addr = addr;
  }
  if let Some(name) = cli.name {
    config.service_name = name;
  }

  logging::init(&config.log_filter);

  let registry = Registry::new();
  registry.bind(&config.service_name, StackService::new())?;

  let server = StackServer::bind(&config, registry)
    .with_context(|| format!("failed to listen on {}", config.addr))?;
  info!(addr = %server.local_addr()?, "calcstack server is ready");
  server.run()?;

  Ok(())
}
