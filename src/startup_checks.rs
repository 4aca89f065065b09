//! Startup requirement validation for ovs-coverage-exporter.
//!
//! This module checks that the control socket of the queried daemon can be
//! found before the HTTP server starts. Failures are reported but the
//! exporter keeps running: OVS may simply not be up yet.

use nix::unistd::geteuid;
use ovs_coverage_exporter::{AppctlError, SocketLocation};
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

/// Validate all runtime requirements
pub fn validate_requirements(location: &SocketLocation) -> Result<PathBuf, ValidationError> {
    info!("🔍 Validating runtime requirements...");

    check_user_privileges();
    if let SocketLocation::PidFile { rundir, .. } = location {
        check_rundir(rundir)?;
    }
    let socket = check_control_socket(location)?;

    info!("✅ All runtime requirements validated");
    Ok(socket)
}

/// Check if running with sufficient privileges
fn check_user_privileges() {
    if geteuid().is_root() {
        info!("✅ Running as root (uid=0)");
    } else {
        warn!("⚠️  Not running as root - the control socket may not be accessible");
        warn!("   Recommendation: run as root or as the user owning the OVS run directory");
    }
}

fn check_rundir(rundir: &Path) -> Result<(), ValidationError> {
    if !rundir.is_dir() {
        error!("❌ OVS run directory {} not found", rundir.display());
        error!("   Solution: start Open vSwitch or pass --ovs-rundir");
        return Err(ValidationError::RundirMissing(rundir.to_path_buf()));
    }
    debug!("OVS run directory {} exists", rundir.display());
    Ok(())
}

fn check_control_socket(location: &SocketLocation) -> Result<PathBuf, ValidationError> {
    let socket = location.resolve()?;
    if !socket.exists() {
        error!("❌ Control socket {} does not exist", socket.display());
        return Err(ValidationError::SocketMissing(socket));
    }
    info!("✅ Control socket found: {}", socket.display());
    Ok(socket)
}

#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("OVS run directory not found: {}", .0.display())]
    RundirMissing(PathBuf),

    #[error("control socket not found: {}", .0.display())]
    SocketMissing(PathBuf),

    #[error(transparent)]
    Resolve(#[from] AppctlError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_missing_rundir() {
        let location = SocketLocation::PidFile {
            rundir: PathBuf::from("/nonexistent/openvswitch"),
            target: "ovs-vswitchd".to_string(),
        };
        assert!(matches!(
            validate_requirements(&location),
            Err(ValidationError::RundirMissing(_))
        ));
    }

    #[test]
    fn test_missing_socket() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("ovs-vswitchd.pid"), "17").unwrap();
        let location = SocketLocation::PidFile {
            rundir: dir.path().to_path_buf(),
            target: "ovs-vswitchd".to_string(),
        };
        match validate_requirements(&location) {
            Err(ValidationError::SocketMissing(path)) => {
                assert_eq!(path, dir.path().join("ovs-vswitchd.17.ctl"))
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_explicit_socket_found() {
        let dir = tempfile::tempdir().unwrap();
        let socket = dir.path().join("custom.ctl");
        fs::write(&socket, "").unwrap();
        let found = validate_requirements(&SocketLocation::Path(socket.clone())).unwrap();
        assert_eq!(found, socket);
    }
}
