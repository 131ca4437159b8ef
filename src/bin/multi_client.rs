//! calcstack-multi-client — four scripted clients sharing one remote stack.

use anyhow::anyhow;
use clap::Parser;
use tracing::error;

use calcstack::calculator::{run_script, ClientScript};
use calcstack::config::ClientConfig;
use calcstack::logging;
use calcstack::remote::RemoteStack;

/// Run concurrent scripted clients against a remote stack.
#[derive(Parser, Debug)]
#[command(name = "calcstack-multi-client")]
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
  logging::init("info");

  let defaults = ClientConfig::default();
  let addr = cli.addr.unwrap_or(defaults.addr);
  let name = cli.name.unwrap_or(defaults.service_name);

  let mut failures = 0;
  crossbeam::scope(|scope| {
    let handles: Vec<_> = ClientScript::defaults().into_iter().map(|script| {
      let addr = addr.as_str();
      let name = name.as_str();
      scope.spawn(move |_| {
        let mut calc = RemoteStack::connect_named(addr, name)?;
        run_script(&mut calc, &script).map(|t| (script.id.clone(), t))
      })
    }).collect();

    for h in handles {
      match h.join() {
        Ok(Ok((id, transcript))) => {
          for line in transcript {
            println!("{}: {}", id, line);
          }
        }
        Ok(Err(e)) => {
          error!(error = %e, "client failed");
          failures += 1;
        }
        Err(_) => failures += 1,
      }
    }
  }).map_err(|_| anyhow!("client thread panicked"))?;

  println!("All clients completed.");
  if failures > 0 {
    return Err(anyhow!("{} of the clients failed", failures));
  }
  Ok(())
}
