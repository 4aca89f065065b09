//! Integration tests for the unixctl client.
//!
//! Each test spawns a one-shot fake daemon on a Unix socket inside a
//! temporary run directory.

use ovs_coverage_exporter::{AppctlError, SocketLocation, StatusQuery, UnixCtlClient};
use serde_json::Value;
use std::fs;
use std::io::Write;
use std::os::unix::net::UnixListener;
use std::path::Path;
use std::thread::{self, JoinHandle};
use std::time::Duration;

const TIMEOUT: Duration = Duration::from_secs(2);

/// Accepts one connection, reads a single JSON-RPC request and answers with
/// `reply` (or hangs up when `reply` is `None`). Returns the request.
fn serve_once(path: &Path, reply: Option<Value>) -> JoinHandle<Value> {
    let listener = UnixListener::bind(path).expect("Failed to bind fake control socket");
    thread::spawn(move || {
        let (mut stream, _) = listener.accept().expect("Failed to accept connection");
        let request: Value = serde_json::Deserializer::from_reader(&stream)
            .into_iter::<Value>()
            .next()
            .expect("No request received")
            .expect("Request is not valid JSON");

        if let Some(reply) = reply {
            let mut reply = reply;
            reply["id"] = request["id"].clone();
            stream
                .write_all(reply.to_string().as_bytes())
                .expect("Failed to write reply");
        }
        request
    })
}

fn pidfile_location(dir: &Path, target: &str, pid: u32) -> (SocketLocation, std::path::PathBuf) {
    fs::write(dir.join(format!("{}.pid", target)), format!("{}\n", pid)).unwrap();
    let location = SocketLocation::PidFile {
        rundir: dir.to_path_buf(),
        target: target.to_string(),
    };
    (location, dir.join(format!("{}.{}.ctl", target, pid)))
}

#[test]
fn test_query_through_pidfile_lookup() {
    let dir = tempfile::tempdir().unwrap();
    let (location, socket) = pidfile_location(dir.path(), "ovs-vswitchd", 1234);

    let report = concat!(
        "Event coverage, avg rate over last: 5 seconds, last minute, last hour,  hash=00000000:\n",
        "netdev_sent 0.0/sec 0.000/sec 0.0000/sec   total: 42\n",
    );
    let server = serve_once(&socket, Some(serde_json::json!({"result": report, "error": null})));

    let client = UnixCtlClient::new(location, TIMEOUT);
    let reply = client.query("coverage/show").unwrap();
    assert_eq!(reply, report);

    let request = server.join().unwrap();
    assert_eq!(request["method"], "coverage/show");
    assert_eq!(request["params"], serde_json::json!([]));
}

#[test]
fn test_daemon_error_is_returned() {
    let dir = tempfile::tempdir().unwrap();
    let socket = dir.path().join("custom.ctl");
    let server = serve_once(
        &socket,
        Some(serde_json::json!({
            "result": null,
            "error": "\"coverage/show\" is not a valid command",
        })),
    );

    let client = UnixCtlClient::new(SocketLocation::Path(socket), TIMEOUT);
    match client.query("coverage/show") {
        Err(AppctlError::Daemon { command, message }) => {
            assert_eq!(command, "coverage/show");
            assert!(message.contains("is not a valid command"));
        }
        other => panic!("expected a daemon error, got {:?}", other),
    }
    server.join().unwrap();
}

#[test]
fn test_hangup_without_reply() {
    let dir = tempfile::tempdir().unwrap();
    let socket = dir.path().join("silent.ctl");
    let server = serve_once(&socket, None);

    let client = UnixCtlClient::new(SocketLocation::Path(socket), TIMEOUT);
    let result = client.query("coverage/show");
    server.join().unwrap();

    assert!(
        matches!(result, Err(AppctlError::NoReply(_))),
        "expected NoReply, got {:?}",
        result
    );
}

#[test]
fn test_missing_socket_fails_to_connect() {
    let dir = tempfile::tempdir().unwrap();
    let (location, _) = pidfile_location(dir.path(), "ovs-vswitchd", 99999);

    let client = UnixCtlClient::new(location, TIMEOUT);
    assert!(matches!(
        client.query("coverage/show"),
        Err(AppctlError::Connect { .. })
    ));
}

#[test]
fn test_missing_pidfile() {
    let dir = tempfile::tempdir().unwrap();
    let location = SocketLocation::PidFile {
        rundir: dir.path().to_path_buf(),
        target: "ovs-vswitchd".to_string(),
    };

    let client = UnixCtlClient::new(location, TIMEOUT);
    assert!(matches!(
        client.query("coverage/show"),
        Err(AppctlError::PidFile { .. })
    ));
}
