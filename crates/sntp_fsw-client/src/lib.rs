// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

/*!
Single-shot SNTP client.

One query is one exchange: read the clock, send a request, wait a bounded
time for the reply, validate it against what was sent, and compute the clock
offset. Applying that offset to a system clock is left to the caller.

# Example

```rust,no_run
use sntp_client::client::SntpClient;

let client = SntpClient::builder()
    .server("127.0.0.1:123".parse().unwrap())
    .build()
    .unwrap();
match client.query() {
    Ok(response) => println!("offset {} ms", response.clock_offset_ms()),
    Err(status) => eprintln!("query failed: {status}"),
}
```

# Feature Flags

| Feature | Default | Description |
|---------|---------|-------------|
| `cli` | yes | Builds the `sntp-client` test utility (`clap`, `tracing-subscriber`). |
| `tokio` | no | Async query over `tokio::net::UdpSocket`. |
*/

#![warn(missing_docs)]

// Re-export protocol modules for convenience.
pub use sntp_proto::{codec, poll, protocol, status, timestamp, transport};
pub use sntp_proto::{SntpResponse, Status, Timestamp};

/// Blocking client context that owns its UDP socket.
pub mod client;

/// Client configuration.
pub mod config;

/// The request/response state machine.
pub mod exchange;

/// Async query using the Tokio runtime.
#[cfg(feature = "tokio")]
pub mod async_sntp;

pub use config::ClientConfig;
pub use exchange::{ClientExchange, ExchangeState, run_query};
