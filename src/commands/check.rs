//! Check command implementation.
//!
//! Validates configuration and control socket access.

use ovs_coverage_exporter::collectors::coverage::{self, parse_report};
use ovs_coverage_exporter::{StatusQuery, UnixCtlClient};

use crate::config::{validate_effective_config, Config};
use crate::startup_checks::validate_requirements;

/// Validates configuration and, optionally, a live `coverage/show` round trip.
pub fn command_check(query: bool, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    println!("🔍 OVS Coverage Exporter - System Check");
    println!("=======================================");

    let mut all_ok = true;

    println!("\n⚙️  Checking configuration...");
    match validate_effective_config(config) {
        Ok(_) => println!("   ✅ Configuration is valid"),
        Err(e) => {
            println!("   ❌ Configuration invalid: {}", e);
            all_ok = false;
        }
    }

    println!("\n🔌 Checking control socket...");
    let location = config.socket_location();
    match validate_requirements(&location) {
        Ok(socket) => println!("   ✅ Control socket: {}", socket.display()),
        Err(e) => {
            println!("   ❌ {}", e);
            all_ok = false;
        }
    }

    if query && all_ok {
        println!("\n📊 Querying {}...", coverage::COMMAND);
        let client = UnixCtlClient::new(location, config.appctl_timeout());
        match client.query(coverage::COMMAND) {
            Ok(buf) => {
                let report = parse_report(&buf);
                println!("   ✅ {} counters reported", report.len());
                if !report.errors().is_empty() {
                    println!("   ⚠️  {} malformed lines", report.errors().len());
                    for e in report.errors() {
                        println!("      ├─ {}", e);
                    }
                }
            }
            Err(e) => {
                println!("   ❌ Query failed: {}", e);
                all_ok = false;
            }
        }
    }

    println!("\n📋 Summary:");
    if all_ok {
        println!("   ✅ All checks passed - exporter is ready");
        Ok(())
    } else {
        println!("   ❌ Some checks failed - please review the output above");
        std::process::exit(1);
    }
}
