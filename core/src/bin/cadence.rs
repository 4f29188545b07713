//! Cadence CLI
//!
//! Runs the sample coroutine, the tick benchmark, and prints the effective
//! configuration without embedding the library in a host.

use cadence_core::cli;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    if let Err(e) = cli::run_cli().await {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
