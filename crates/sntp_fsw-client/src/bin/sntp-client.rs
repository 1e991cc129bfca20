// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

// SNTP client test utility: runs one query against a server and prints the
// result. Diagnostics go through tracing; set RUST_LOG=debug to see the
// exchange.
//
//   cargo run -p sntp_fsw-client --bin sntp-client -- --ip 127.0.0.1 --port 1123

use clap::Parser;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::process::ExitCode;
use std::time::Duration;
use tracing::{debug, warn};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use sntp_client::client::SntpClient;

/// SNTP client test utility
#[derive(Parser, Debug)]
#[command(name = "sntp-client")]
#[command(about = "Query an SNTP server once and report the clock offset", long_about = None)]
struct Args {
    /// Server name, reported only; no name resolution is performed
    #[arg(short, long, default_value = "localhost")]
    server: String,

    /// Server IP address
    #[arg(short, long, visible_alias = "server-ip", default_value_t = IpAddr::V4(Ipv4Addr::LOCALHOST))]
    ip: IpAddr,

    /// Server UDP port
    #[arg(short, long, default_value_t = sntp_client::protocol::PORT)]
    port: u16,

    /// Local UDP port to send from (0 picks any free port)
    #[arg(short = 'c', long, default_value_t = 0)]
    client_port: u16,

    /// How long to wait for the reply, in milliseconds
    #[arg(short, long, default_value_t = 1000)]
    timeout_ms: u64,
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();

    println!("SNTP Client Test App");
    println!(
        "Configuration:\n\t Server Name: {}\n\t Server IP: {}\n\t Port: {}\n\t Client (listen) port: {}",
        args.server, args.ip, args.port, args.client_port
    );

    let server = SocketAddr::new(args.ip, args.port);
    let client = match SntpClient::builder()
        .server(server)
        .local_port(args.client_port)
        .receive_timeout(Duration::from_millis(args.timeout_ms))
        .build()
    {
        Ok(client) => client,
        Err(status) => {
            warn!(%status, "client setup failed");
            println!(
                "SNTP Response Failed. Status was {}={}",
                status.code(),
                status
            );
            return ExitCode::FAILURE;
        }
    };
    debug!(local = ?client.local_addr(), %server, "querying");

    match client.query() {
        Ok(response) => {
            println!(
                "ServerTime={} ({} s since Unix epoch) ClockOffset={}ms RoundTripDelay={}ms Stratum={} RefId={}",
                response.server_time(),
                response.server_time().unix_seconds_era0(),
                response.clock_offset_ms(),
                response.round_trip_delay_ms(),
                response.stratum.0,
                response.reference_id,
            );
            ExitCode::SUCCESS
        }
        Err(status) => {
            println!(
                "SNTP Response Failed. Status was {}={}",
                status.code(),
                status
            );
            ExitCode::FAILURE
        }
    }
}
