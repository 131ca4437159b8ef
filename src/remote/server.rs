use std::io::{self, BufRead, BufReader, Write};
use std::net::{Shutdown, SocketAddr, TcpListener, TcpStream, ToSocketAddrs};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crossbeam::channel::{self, Receiver, Sender};
use tracing::{debug, info, warn};

use crate::cancel::{self, CancelToken};
use crate::config::ServerConfig;
use crate::registry::Registry;
use crate::service::StackService;
use super::wire::{self, Request, Response};

/// Serves the services of a `Registry` over TCP, one thread per connection.
pub struct StackServer {
  listener: TcpListener,
  registry: Registry,
  default_name: String,
  stopping: Arc<AtomicBool>,
}

/// Stops a running `StackServer` from another thread.
#[derive(Clone)]
pub struct ServerHandle {
  addr: SocketAddr,
  registry: Registry,
  stopping: Arc<AtomicBool>,
}

impl StackServer {
  /// Binds the configured address. New connections start out talking to
  /// the service bound under `config.service_name`.
  pub fn bind(config: &ServerConfig, registry: Registry) -> io::Result<Self> {
    let addr = config.addr.to_socket_addrs()?
      .next()
      .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput,
                                    format!("no address for {}", config.addr)))?;
    let listener = TcpListener::bind(addr)?;

    Ok(Self {
      listener: listener,
      registry: registry,
      default_name: config.service_name.clone(),
      stopping: Arc::new(AtomicBool::new(false)),
    })
  }

  pub fn local_addr(&self) -> io::Result<SocketAddr> {
    self.listener.local_addr()
  }

  pub fn handle(&self) -> io::Result<ServerHandle> {
    Ok(ServerHandle {
      addr: self.local_addr()?,
      registry: self.registry.clone(),
      stopping: self.stopping.clone(),
    })
  }

  /// Accepts connections until `ServerHandle::shutdown` is called.
  pub fn run(self) -> io::Result<()> {
    info!(addr = %self.local_addr()?, service = %self.default_name, "server listening");
    let mut failures = 0;

    for stream in self.listener.incoming() {
      if self.stopping.load(Ordering::SeqCst) {
        break;
      }

      let stream = match stream {
        Ok(s) => {
          failures = 0;
          s
        }
        Err(e) => {
          let pause = accept_backoff(failures);
          warn!(error = %e, ?pause, "accept failed");
          failures = failures.saturating_add(1);
          thread::sleep(pause);
          continue;
        }
      };

      let registry = self.registry.clone();
      let name = self.default_name.clone();
      thread::Builder::new()
        .name("calcstack-conn".to_string())
        .spawn(move || {
          let peer = stream.peer_addr().ok();
          info!(?peer, "connection opened");
          if let Err(e) = serve_connection(stream, &registry, &name) {
            warn!(?peer, error = %e, "connection failed");
          }
          info!(?peer, "connection closed");
        })?;
    }

    info!("server stopped");
    Ok(())
  }
}

impl ServerHandle {
  pub fn local_addr(&self) -> SocketAddr {
    self.addr
  }

  /// Stops accepting connections and shuts down every registered service,
  /// which interrupts pending delayed pops.
  pub fn shutdown(&self) {
    if self.stopping.swap(true, Ordering::SeqCst) {
      return;
    }
    self.registry.shutdown_all();
    // wake the blocking accept
    let _ = TcpStream::connect(self.addr);
  }
}

/// How long the accept loop pauses after `failures` consecutive errors.
/// Errors such as running out of file descriptors tend to persist.
fn accept_backoff(failures: u32) -> Duration {
  let millis = 10u64 << failures.min(6);
  Duration::from_millis(millis.min(500))
}

/// Reads requests on a helper thread and answers them on this one. When
/// the peer hangs up the helper cancels the connection's token, so a
/// delayed pop still waiting on its behalf fails instead of popping a value
/// nobody will receive.
fn serve_connection(stream: TcpStream, registry: &Registry, default_name: &str) -> io::Result<()> {
  let mut writer = stream.try_clone()?;
  let read_half = stream.try_clone()?;
  let (hangup, token) = cancel::pair();
  let (tx, rx) = channel::unbounded();

  let reader = thread::Builder::new()
    .name("calcstack-read".to_string())
    .spawn(move || {
      read_lines(read_half, tx);
      hangup.cancel();
    })?;

  let result = answer_lines(&rx, &mut writer, registry, default_name, &token);

  // unblocks the reader if we stopped first
  let _ = stream.shutdown(Shutdown::Both);
  let _ = reader.join();
  result
}

/// Forwards raw request lines until end of stream or a read error.
fn read_lines(stream: TcpStream, lines: Sender<Vec<u8>>) {
  let mut reader = BufReader::new(stream);

  loop {
    let mut buf = Vec::new();
    match reader.read_until(b'\n', &mut buf) {
      Ok(0) => break,
      Ok(_) => {
        if lines.send(buf).is_err() {
          break;
        }
      }
      Err(e) => {
        debug!(error = %e, "read failed");
        break;
      }
    }
  }
}

fn answer_lines(lines: &Receiver<Vec<u8>>, writer: &mut TcpStream, registry: &Registry,
                default_name: &str, token: &CancelToken) -> io::Result<()> {
  let mut service = registry.lookup(default_name).ok();

  for buf in lines.iter() {
    let line = match String::from_utf8(buf) {
      Ok(line) => line,
      Err(e) => {
        let response = Response::Protocol {
          message: format!("request is not valid UTF-8: {}", e.utf8_error()),
        };
        send(writer, &response)?;
        continue;
      }
    };
    if line.trim().is_empty() {
      continue;
    }

    let response = match wire::decode::<Request>(&line) {
      Ok(Request::Lookup { name }) => match registry.lookup(&name) {
        Ok(s) => {
          service = Some(s);
          Response::Unit
        }
        Err(e) => Response::Registry { message: e.to_string() },
      },
      Ok(request) => match service {
        Some(ref s) => dispatch_with(s, request, token),
        None => Response::Registry {
          message: format!("no service selected (`{}` is not bound)", default_name),
        },
      },
      Err(e) => Response::Protocol { message: e.to_string() },
    };

    send(writer, &response)?;
  }

  Ok(())
}

fn send(writer: &mut TcpStream, response: &Response) -> io::Result<()> {
  match *response {
    Response::Error { ref error } => warn!(%error, "request failed"),
    Response::Registry { ref message } | Response::Protocol { ref message } => {
      warn!(%message, "request rejected")
    }
    _ => {}
  }

  let out = wire::encode(response).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
  writer.write_all(out.as_bytes())?;
  writer.flush()
}

/// Runs one request against `service`.
pub fn dispatch(service: &StackService, request: Request) -> Response {
  dispatch_with(service, request, &CancelToken::never())
}

/// Like `dispatch`, but a delayed pop also gives up when `token` is
/// cancelled.
pub fn dispatch_with(service: &StackService, request: Request, token: &CancelToken) -> Response {
  debug!(?request, "dispatch");

  let result = match request {
    Request::Push { value } => {
      service.push(value);
      Ok(Response::Unit)
    }
    Request::Pop => service.pop().map(|v| Response::Value { value: v }),
    Request::IsEmpty => Ok(Response::Bool { value: service.is_empty() }),
    Request::Reduce { operator } => service.reduce(&operator).map(|_| Response::Unit),
    Request::DelayedPop { millis } => {
      service.delayed_pop_with(millis, token).map(|v| Response::Value { value: v })
    }
    Request::Lookup { .. } => Ok(Response::Protocol {
      message: "lookup is handled by the connection".to_string(),
    }),
  };

  result.unwrap_or_else(|e| Response::Error { error: e })
}
