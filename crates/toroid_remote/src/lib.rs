//! # TOROID Remote Fetch
//!
//! Thin blocking client for the world server.
//!
//! ## Protocol
//!
//! ```text
//! CLIENT                               SERVER
//!   |--- "list\n" ---------------------->|
//!   |<-- "blinker.txt\nglider.txt\n" ----|  (connection closed)
//!
//!   |--- "get glider.txt\n" ------------>|
//!   |<-- raw file bytes -----------------|  (connection closed)
//! ```
//!
//! One request per connection. The response ends when the server closes
//! the stream.

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

use std::io::{self, Read, Write};
use std::net::{TcpStream, ToSocketAddrs};
use std::path::Path;
use std::time::Duration;

use thiserror::Error;

/// Default world server port.
pub const DEFAULT_PORT: u16 = 4040;

/// Default connect and read timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Errors raised by the fetch client.
#[derive(Error, Debug)]
pub enum RemoteError {
    /// Host name did not resolve to any address.
    #[error("cannot resolve {host}:{port}")]
    Resolve {
        /// Host requested.
        host: String,
        /// Port requested.
        port: u16,
    },

    /// No resolved address accepted the connection.
    #[error("cannot connect to {host}:{port}: {source}")]
    Connect {
        /// Host requested.
        host: String,
        /// Port requested.
        port: u16,
        /// Last connection error.
        #[source]
        source: io::Error,
    },

    /// Sending the request or reading the response failed.
    #[error("transfer failed: {0}")]
    Transfer(#[source] io::Error),

    /// World names are single tokens.
    #[error("invalid world name {0:?}")]
    InvalidName(String),

    /// Server answered with nothing.
    #[error("world {0:?} not found on server")]
    NotFound(String),

    /// Writing the fetched world locally failed.
    #[error("cannot write {path}: {source}")]
    Write {
        /// Destination path.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
}

/// Result type for remote operations.
pub type RemoteResult<T> = Result<T, RemoteError>;

/// Client for one world server.
#[derive(Clone, Debug)]
pub struct RemoteClient {
    host: String,
    port: u16,
    timeout: Duration,
}

impl RemoteClient {
    /// Creates a client for `host:port` with the default timeout.
    #[must_use]
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Overrides the connect/read timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Server host.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Server port.
    #[must_use]
    pub const fn port(&self) -> u16 {
        self.port
    }

    /// Names of the worlds the server offers.
    ///
    /// # Errors
    ///
    /// Fails on connection or transfer errors.
    pub fn list(&self) -> RemoteResult<Vec<String>> {
        let body = self.request("list")?;
        Ok(String::from_utf8_lossy(&body)
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_owned)
            .collect())
    }

    /// Raw bytes of world `name`.
    ///
    /// # Errors
    ///
    /// Fails on an invalid name, connection or transfer errors, or an empty
    /// response.
    pub fn fetch(&self, name: &str) -> RemoteResult<Vec<u8>> {
        if name.is_empty() || name.chars().any(|c| c.is_whitespace() || c.is_control()) {
            return Err(RemoteError::InvalidName(name.to_owned()));
        }
        let body = self.request(&format!("get {name}"))?;
        if body.is_empty() {
            return Err(RemoteError::NotFound(name.to_owned()));
        }
        tracing::info!(name, bytes = body.len(), "fetched world");
        Ok(body)
    }

    /// Fetches world `name` and writes it verbatim to `path`. Returns the
    /// number of bytes written.
    ///
    /// # Errors
    ///
    /// Same as [`fetch`](Self::fetch), plus local write failures.
    pub fn fetch_to_file(&self, name: &str, path: impl AsRef<Path>) -> RemoteResult<usize> {
        let path = path.as_ref();
        let body = self.fetch(name)?;
        std::fs::write(path, &body).map_err(|source| RemoteError::Write {
            path: path.display().to_string(),
            source,
        })?;
        Ok(body.len())
    }

    fn connect(&self) -> RemoteResult<TcpStream> {
        let addrs: Vec<_> = (self.host.as_str(), self.port)
            .to_socket_addrs()
            .map_err(|_| self.resolve_error())?
            .collect();
        if addrs.is_empty() {
            return Err(self.resolve_error());
        }

        let mut last_error = None;
        for addr in addrs {
            match TcpStream::connect_timeout(&addr, self.timeout) {
                Ok(stream) => return Ok(stream),
                Err(e) => {
                    tracing::debug!(%addr, error = %e, "connect attempt failed");
                    last_error = Some(e);
                }
            }
        }
        Err(RemoteError::Connect {
            host: self.host.clone(),
            port: self.port,
            source: last_error
                .unwrap_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no address")),
        })
    }

    fn resolve_error(&self) -> RemoteError {
        RemoteError::Resolve {
            host: self.host.clone(),
            port: self.port,
        }
    }

    fn request(&self, command: &str) -> RemoteResult<Vec<u8>> {
        let mut stream = self.connect()?;
        stream
            .set_read_timeout(Some(self.timeout))
            .and_then(|()| stream.set_write_timeout(Some(self.timeout)))
            .map_err(RemoteError::Transfer)?;

        tracing::debug!(host = %self.host, port = self.port, command, "sending request");
        stream
            .write_all(format!("{command}\n").as_bytes())
            .and_then(|()| stream.flush())
            .map_err(RemoteError::Transfer)?;

        let mut body = Vec::new();
        stream.read_to_end(&mut body).map_err(RemoteError::Transfer)?;
        Ok(body)
    }
}
