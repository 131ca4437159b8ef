use std::io::{self, BufRead, BufReader, Write};
use std::net::{TcpStream, ToSocketAddrs};

use tracing::debug;

use crate::calculator::Calculator;
use crate::error::RemoteError;
use super::wire::{self, Request, Response};

/// A connection to a remote stack service.
pub struct RemoteStack {
  reader: BufReader<TcpStream>,
  writer: TcpStream,
}

impl RemoteStack {
  /// Connects to the server's default service.
  pub fn connect<A: ToSocketAddrs>(addr: A) -> Result<Self, RemoteError> {
    let stream = TcpStream::connect(addr)?;
    stream.set_nodelay(true)?;
    Ok(Self {
      reader: BufReader::new(stream.try_clone()?),
      writer: stream,
    })
  }

  /// Connects and selects the service bound under `name`.
  pub fn connect_named<A: ToSocketAddrs>(addr: A, name: &str) -> Result<Self, RemoteError> {
    let mut remote = Self::connect(addr)?;
    match remote.call(&Request::Lookup { name: name.to_string() })? {
      Response::Unit => Ok(remote),
      other => Err(unexpected(other)),
    }
  }

  /// Sends one request and waits for its response. Failure responses come
  /// back as `Err`.
  pub fn call(&mut self, request: &Request) -> Result<Response, RemoteError> {
    debug!(?request, "call");
    let line = wire::encode(request)?;
    self.writer.write_all(line.as_bytes())?;
    self.writer.flush()?;

    let mut reply = String::new();
    if self.reader.read_line(&mut reply)? == 0 {
      return Err(RemoteError::Transport(io::Error::new(
        io::ErrorKind::UnexpectedEof, "server closed the connection")));
    }

    match wire::decode::<Response>(&reply)? {
      Response::Error { error } => Err(RemoteError::Service(error)),
      Response::Registry { message } => Err(RemoteError::Registry(message)),
      Response::Protocol { message } => Err(RemoteError::Protocol(message)),
      ok => Ok(ok),
    }
  }

  fn call_unit(&mut self, request: Request) -> Result<(), RemoteError> {
    match self.call(&request)? {
      Response::Unit => Ok(()),
      other => Err(unexpected(other)),
    }
  }

  fn call_value(&mut self, request: Request) -> Result<i32, RemoteError> {
    match self.call(&request)? {
      Response::Value { value } => Ok(value),
      other => Err(unexpected(other)),
    }
  }
}

fn unexpected(response: Response) -> RemoteError {
  RemoteError::Protocol(format!("unexpected response {:?}", response))
}

impl Calculator for RemoteStack {
  type Error = RemoteError;

  fn push_value(&mut self, value: i32) -> Result<(), RemoteError> {
    self.call_unit(Request::Push { value: value })
  }

  fn push_operation(&mut self, operator: &str) -> Result<(), RemoteError> {
    self.call_unit(Request::Reduce { operator: operator.to_string() })
  }

  fn pop(&mut self) -> Result<i32, RemoteError> {
    self.call_value(Request::Pop)
  }

  fn is_empty(&mut self) -> Result<bool, RemoteError> {
    match self.call(&Request::IsEmpty)? {
      Response::Bool { value } => Ok(value),
      other => Err(unexpected(other)),
    }
  }

  fn delay_pop(&mut self, millis: i64) -> Result<i32, RemoteError> {
    self.call_value(Request::DelayedPop { millis: millis })
  }
}
