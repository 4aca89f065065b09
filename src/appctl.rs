//! Client for the unixctl control socket of Open vSwitch daemons.
//!
//! `ovs-vswitchd` listens on `<rundir>/ovs-vswitchd.<pid>.ctl` and speaks
//! JSON-RPC 1.0. Every request is a single JSON object
//! `{"method": "coverage/show", "params": [], "id": 0}` and the daemon answers
//! with one object carrying either a `result` string or an `error`.
//! This is the same channel `ovs-appctl` uses.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::io::{self, Write};
use std::os::unix::net::UnixStream;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, instrument};

/// Default run directory of the Open vSwitch daemons.
pub const DEFAULT_RUNDIR: &str = "/run/openvswitch";

/// Default daemon queried by the exporter.
pub const DEFAULT_TARGET: &str = "ovs-vswitchd";

/// Default timeout applied to connect, write and read.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Errors raised while talking to a control socket.
#[derive(Debug, thiserror::Error)]
pub enum AppctlError {
    #[error("failed to read pidfile {path}: {source}")]
    PidFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid pid in {path}: {content:?}")]
    InvalidPid { path: PathBuf, content: String },

    #[error("failed to connect to {path}: {source}")]
    Connect {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("i/o error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid reply from {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("connection to {0} closed before a reply was received")]
    NoReply(PathBuf),

    #[error("{command}: {message}")]
    Daemon { command: String, message: String },

    #[error("{0}: reply carries neither result nor error")]
    MissingResult(String),
}

/// Something able to run a status command against a daemon and return its
/// textual output.
pub trait StatusQuery: Send + Sync {
    fn query(&self, command: &str) -> Result<String, AppctlError>;
}

/// Where to find the control socket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SocketLocation {
    /// Resolve `<rundir>/<target>.<pid>.ctl` from `<rundir>/<target>.pid`
    /// on every query, so daemon restarts are followed.
    PidFile { rundir: PathBuf, target: String },
    /// Use this socket path as is.
    Path(PathBuf),
}

impl SocketLocation {
    pub fn resolve(&self) -> Result<PathBuf, AppctlError> {
        match self {
            SocketLocation::Path(path) => Ok(path.clone()),
            SocketLocation::PidFile { rundir, target } => {
                let pidfile = rundir.join(format!("{target}.pid"));
                let pid = read_pidfile(&pidfile)?;
                Ok(rundir.join(format!("{target}.{pid}.ctl")))
            }
        }
    }
}

impl Default for SocketLocation {
    fn default() -> Self {
        SocketLocation::PidFile {
            rundir: PathBuf::from(DEFAULT_RUNDIR),
            target: DEFAULT_TARGET.to_string(),
        }
    }
}

/// Reads the pid written by an OVS daemon.
pub fn read_pidfile(path: &Path) -> Result<u32, AppctlError> {
    let content = fs::read_to_string(path).map_err(|source| AppctlError::PidFile {
        path: path.to_path_buf(),
        source,
    })?;
    content
        .trim()
        .parse()
        .map_err(|_| AppctlError::InvalidPid {
            path: path.to_path_buf(),
            content: content.trim().to_string(),
        })
}

#[derive(Serialize)]
struct Request<'a> {
    method: &'a str,
    params: [&'a str; 0],
    id: u64,
}

#[derive(Deserialize)]
struct Response {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<Value>,
}

/// Synchronous unixctl client. One connection per query.
#[derive(Debug, Clone)]
pub struct UnixCtlClient {
    location: SocketLocation,
    timeout: Duration,
}

impl UnixCtlClient {
    pub fn new(location: SocketLocation, timeout: Duration) -> Self {
        Self { location, timeout }
    }

    fn roundtrip(&self, path: &Path, command: &str) -> Result<Response, AppctlError> {
        let io_err = |source| AppctlError::Io {
            path: path.to_path_buf(),
            source,
        };

        let mut stream = UnixStream::connect(path).map_err(|source| AppctlError::Connect {
            path: path.to_path_buf(),
            source,
        })?;
        stream.set_read_timeout(Some(self.timeout)).map_err(io_err)?;
        stream.set_write_timeout(Some(self.timeout)).map_err(io_err)?;

        let request = Request {
            method: command,
            params: [],
            id: 0,
        };
        let payload = serde_json::to_vec(&request).map_err(|source| AppctlError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        stream.write_all(&payload).map_err(io_err)?;
        stream.flush().map_err(io_err)?;

        // The daemon does not terminate replies, so read exactly one object.
        let mut replies = serde_json::Deserializer::from_reader(&stream).into_iter::<Response>();
        match replies.next() {
            Some(Ok(response)) => Ok(response),
            Some(Err(e)) if e.is_io() => Err(io_err(io::Error::from(e))),
            Some(Err(source)) => Err(AppctlError::Json {
                path: path.to_path_buf(),
                source,
            }),
            None => Err(AppctlError::NoReply(path.to_path_buf())),
        }
    }
}

impl StatusQuery for UnixCtlClient {
    #[instrument(skip(self))]
    fn query(&self, command: &str) -> Result<String, AppctlError> {
        let path = self.location.resolve()?;
        debug!("Sending {} to {}", command, path.display());

        let response = self.roundtrip(&path, command)?;

        if let Some(error) = response.error.filter(|e| !e.is_null()) {
            return Err(AppctlError::Daemon {
                command: command.to_string(),
                message: value_to_text(error),
            });
        }
        match response.result {
            Some(result) if !result.is_null() => Ok(value_to_text(result)),
            _ => Err(AppctlError::MissingResult(command.to_string())),
        }
    }
}

fn value_to_text(value: Value) -> String {
    match value {
        Value::String(s) => s,
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_from_pidfile() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("ovs-vswitchd.pid"), "4242\n").unwrap();

        let location = SocketLocation::PidFile {
            rundir: dir.path().to_path_buf(),
            target: "ovs-vswitchd".to_string(),
        };
        assert_eq!(
            location.resolve().unwrap(),
            dir.path().join("ovs-vswitchd.4242.ctl")
        );
    }

    #[test]
    fn test_resolve_invalid_pid() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("ovs-vswitchd.pid"), "garbage").unwrap();

        let location = SocketLocation::PidFile {
            rundir: dir.path().to_path_buf(),
            target: "ovs-vswitchd".to_string(),
        };
        assert!(matches!(
            location.resolve(),
            Err(AppctlError::InvalidPid { .. })
        ));
    }

    #[test]
    fn test_resolve_missing_pidfile() {
        let dir = tempfile::tempdir().unwrap();
        let location = SocketLocation::PidFile {
            rundir: dir.path().to_path_buf(),
            target: "ovs-vswitchd".to_string(),
        };
        assert!(matches!(location.resolve(), Err(AppctlError::PidFile { .. })));
    }

    #[test]
    fn test_request_encoding() {
        let request = Request {
            method: "coverage/show",
            params: [],
            id: 0,
        };
        assert_eq!(
            serde_json::to_string(&request).unwrap(),
            r#"{"method":"coverage/show","params":[],"id":0}"#
        );
    }

    #[test]
    fn test_value_to_text() {
        assert_eq!(value_to_text(Value::String("a\nb".into())), "a\nb");
        assert_eq!(value_to_text(serde_json::json!(["x"])), r#"["x"]"#);
    }
}
