// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! One client request/response exchange as an explicit state machine.
//!
//! ```text
//! Idle -> RequestBuilt -> Sent -> AwaitingResponse -> Completed
//!                           |            |        \-> TimedOut
//!                           \------------+----------> Failed
//! ```
//!
//! Each step either advances the state or ends the exchange. There are no
//! internal retries; a caller that wants another attempt starts a new
//! exchange.

use log::debug;
use std::net::SocketAddr;

use sntp_proto::codec::{SntpResponse, deserialize_response_with_policy, serialize_request};
use sntp_proto::protocol::PACKET_SIZE;
use sntp_proto::status::Status;
use sntp_proto::timestamp::{Clock, Timestamp};
use sntp_proto::transport::DatagramTransport;

use crate::config::ClientConfig;

/// Where an exchange is in its lifecycle.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ExchangeState {
    /// Nothing done yet.
    Idle,
    /// Request serialized; T1 recorded.
    RequestBuilt,
    /// Request handed to the transport.
    Sent,
    /// Blocked in the bounded receive.
    AwaitingResponse,
    /// A valid response was received and the offset computed.
    Completed,
    /// No response arrived in time.
    TimedOut,
    /// The exchange ended with a hard failure or a rejected response.
    Failed,
}

impl ExchangeState {
    /// Whether the exchange has ended.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            ExchangeState::Completed | ExchangeState::TimedOut | ExchangeState::Failed
        )
    }
}

/// Read T1 and serialize a request into `buf` with a fresh random correlator.
///
/// Returns the transmit timestamp as written on the wire.
pub(crate) fn prepare_request<C: Clock>(clock: &C, buf: &mut [u8]) -> Result<Timestamp, Status> {
    let t1 = clock.now()?;
    serialize_request(t1, rand::random::<u32>(), buf)
}

/// Validate a received datagram against the request that was sent.
///
/// `t4` must already have been read when this is called.
pub(crate) fn accept_response(
    config: &ClientConfig,
    server: SocketAddr,
    sent: Timestamp,
    t4: Timestamp,
    datagram: &[u8],
    from: SocketAddr,
) -> Result<SntpResponse, Status> {
    if datagram.len() != PACKET_SIZE {
        debug!(
            "received {} bytes from {}, expected {}",
            datagram.len(),
            from,
            PACKET_SIZE
        );
        return Err(Status::NetworkFailure);
    }
    if from.ip() != server.ip() {
        debug!("response from {} but request went to {}", from, server);
        return Err(Status::InvalidResponse);
    }
    deserialize_response_with_policy(sent, t4, datagram, config.kiss_policy())
}

/// A single client exchange over a borrowed transport and clock.
#[derive(Debug)]
pub struct ClientExchange<'a, T, C> {
    config: &'a ClientConfig,
    server: SocketAddr,
    transport: T,
    clock: C,
    state: ExchangeState,
    buf: [u8; PACKET_SIZE],
    sent: Option<Timestamp>,
    status: Status,
}

impl<'a, T, C> ClientExchange<'a, T, C>
where
    T: DatagramTransport,
    C: Clock,
{
    /// Prepare an exchange in the [`ExchangeState::Idle`] state.
    ///
    /// Fails with [`Status::ContextNotInitialized`] if `config` has no server
    /// and [`Status::BadParameter`] if its receive timeout is zero.
    pub fn new(config: &'a ClientConfig, transport: T, clock: C) -> Result<Self, Status> {
        let server = config.validate()?;
        Ok(ClientExchange {
            config,
            server,
            transport,
            clock,
            state: ExchangeState::Idle,
            buf: [0u8; PACKET_SIZE],
            sent: None,
            status: Status::Success,
        })
    }

    /// Current state.
    pub fn state(&self) -> ExchangeState {
        self.state
    }

    /// Status of the exchange so far; [`Status::Success`] until something fails.
    pub fn status(&self) -> Status {
        self.status
    }

    /// The transmit timestamp that went out, once the request is built.
    pub fn transmit_timestamp(&self) -> Option<Timestamp> {
        self.sent
    }

    fn expect_state(&self, expected: ExchangeState) -> Result<(), Status> {
        if self.state == expected {
            Ok(())
        } else {
            debug!("exchange step needs {:?}, state is {:?}", expected, self.state);
            Err(Status::ContextNotInitialized)
        }
    }

    fn end(&mut self, status: Status) -> Status {
        self.state = if status.is_timeout() {
            ExchangeState::TimedOut
        } else {
            ExchangeState::Failed
        };
        self.status = status;
        status
    }

    /// `Idle -> RequestBuilt`: read T1 and serialize the request.
    pub fn build_request(&mut self) -> Result<Timestamp, Status> {
        self.expect_state(ExchangeState::Idle)?;
        match prepare_request(&self.clock, &mut self.buf) {
            Ok(sent) => {
                self.sent = Some(sent);
                self.state = ExchangeState::RequestBuilt;
                Ok(sent)
            }
            Err(status) => Err(self.end(status)),
        }
    }

    /// `RequestBuilt -> Sent`: hand the request to the transport.
    pub fn send(&mut self) -> Result<(), Status> {
        self.expect_state(ExchangeState::RequestBuilt)?;
        match self.transport.send_to(&self.buf, self.server) {
            Ok(sz) if sz == PACKET_SIZE => {
                debug!("sent {} bytes to {}", sz, self.server);
                self.state = ExchangeState::Sent;
                Ok(())
            }
            Ok(sz) => {
                debug!("short send of {} bytes to {}", sz, self.server);
                Err(self.end(Status::NetworkFailure))
            }
            Err(e) => {
                debug!("send to {} failed: {}", self.server, e);
                Err(self.end(Status::from_send_error(&e)))
            }
        }
    }

    /// `Sent -> AwaitingResponse -> Completed | TimedOut | Failed`.
    pub fn await_response(&mut self) -> Result<SntpResponse, Status> {
        self.expect_state(ExchangeState::Sent)?;
        let sent = self.sent.ok_or(Status::ContextNotInitialized)?;
        self.state = ExchangeState::AwaitingResponse;

        // One byte of slack so an oversized datagram shows up as such.
        let mut recv_buf = [0u8; PACKET_SIZE + 1];
        let received = self
            .transport
            .recv_from(&mut recv_buf, self.config.receive_timeout());
        let t4 = self.clock.now();

        let (len, from) = match received {
            Ok((0, from)) => {
                debug!("empty datagram from {}", from);
                return Err(self.end(Status::NoResponseReceived));
            }
            Ok(got) => got,
            Err(e) => {
                debug!("receive failed: {}", e);
                return Err(self.end(Status::from_recv_error(&e)));
            }
        };
        let t4 = t4.map_err(|status| self.end(status))?;
        debug!("recv: {} bytes from {}", len, from);

        match accept_response(self.config, self.server, sent, t4, &recv_buf[..len], from) {
            Ok(response) => {
                self.state = ExchangeState::Completed;
                Ok(response)
            }
            Err(status) => Err(self.end(status)),
        }
    }

    /// Run every remaining step to completion.
    pub fn run(mut self) -> Result<SntpResponse, Status> {
        self.build_request()?;
        self.send()?;
        self.await_response()
    }
}

/// Run one query: build, send, await and validate.
///
/// This is the client entry point; it owns no state beyond the call.
pub fn run_query<T, C>(
    config: &ClientConfig,
    transport: T,
    clock: C,
) -> Result<SntpResponse, Status>
where
    T: DatagramTransport,
    C: Clock,
{
    ClientExchange::new(config, transport, clock)?.run()
}
