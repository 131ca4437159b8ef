//! calcstack-client — runs the demo session against a server.

use anyhow::Context;
use clap::Parser;

use calcstack::calculator::run_demo;
use calcstack::config::ClientConfig;
use calcstack::logging;
use calcstack::remote::RemoteStack;

/// Run the calculator demo against a remote stack.
#[derive(Parser, Debug)]
#[command(name = "calcstack-client")]
struct Cli {
  /// Server address.
  #[arg(long)]
  addr: Option<String>,

  /// Service name to look up.
  #[arg(long)]
  name: Option<String>,
}

fn main() -> anyhow::Result<()> {
  let cli = Cli::parse();
  logging::init("warn");

  let mut config = ClientConfig::default();
  if let Some(addr) = cli.addr {
    config.addr = addr;
  }
  if let Some(name) = cli.name {
    config.service_name = name;
  }

  let mut calc = RemoteStack::connect_named(config.addr.as_str(), &config.service_name)
    .with_context(|| format!("failed to reach {} at {}", config.service_name, config.addr))?;

  println!("Running the demo session (delayPop waits ~1s) ...");
  let report = run_demo(&mut calc)?;

  println!("isEmpty? {}", report.empty_after_reduce);
  println!("pop() = {}", report.popped);
  println!("delayPop(1000) = {}", report.delayed);
  println!("isEmpty (end)? {}", report.empty_at_end);

  Ok(())
}
