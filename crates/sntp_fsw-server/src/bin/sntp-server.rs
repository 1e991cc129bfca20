// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

// SNTP server test utility: answers requests forever on one UDP port.
// Diagnostics go through tracing; set RUST_LOG=debug to see each request.
//
//   cargo run -p sntp_fsw-server --bin sntp-server -- --port 1123 --skew-ms 5000

use clap::Parser;
use std::net::SocketAddr;
use std::process::ExitCode;
use std::sync::atomic::AtomicBool;
use tracing::error;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use sntp_server::ServerConfig;
use sntp_server::blocking::BlockingServer;
use sntp_server::protocol::{KissCode, Stratum};
use sntp_server::timestamp::{NtpDuration, OffsetClock, SystemClock};

fn parse_kiss_code(s: &str) -> Result<KissCode, String> {
    KissCode::parse(s).ok_or_else(|| format!("`{s}` is not a 1-4 character ASCII kiss code"))
}

/// SNTP server test utility
#[derive(Parser, Debug)]
#[command(name = "sntp-server")]
#[command(about = "Answer SNTP requests on a UDP port", long_about = None)]
struct Args {
    /// UDP port to listen on
    #[arg(short, long, default_value_t = sntp_server::protocol::PORT)]
    port: u16,

    /// Stratum reported in responses
    #[arg(short, long, default_value_t = 15)]
    stratum: u8,

    /// Answer every request with this kiss-of-death code (e.g. DENY, RATE)
    #[arg(long, value_parser = parse_kiss_code)]
    kiss: Option<KissCode>,

    /// Shift reported time from the host clock, in milliseconds
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    skew_ms: i64,
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();

    println!("SNTP Server Test App");
    println!(
        "Configuration:\n\t Server Port: {}\n\t Stratum: {}\n\t Kiss code: {}\n\t Skew: {} ms",
        args.port,
        args.stratum,
        args.kiss.map_or_else(|| "none".to_string(), |k| k.to_string()),
        args.skew_ms
    );

    let mut config = ServerConfig::new().with_stratum(Stratum(args.stratum));
    if let Some(code) = args.kiss {
        config = config.with_kiss_code(code);
    }

    let addr = SocketAddr::from(([0, 0, 0, 0], args.port));
    let server = match BlockingServer::bind(addr, config) {
        Ok(server) => server,
        Err(e) => {
            error!(%addr, error = %e, "unable to bind server port");
            return ExitCode::FAILURE;
        }
    };
    let server = server.with_clock(OffsetClock::new(
        SystemClock,
        NtpDuration::from_millis(args.skew_ms),
    ));

    println!("SNTP Server Listening");
    server.run(&AtomicBool::new(false));
    ExitCode::SUCCESS
}
