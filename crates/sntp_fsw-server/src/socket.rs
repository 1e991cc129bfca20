// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! UDP socket creation with `SO_REUSEADDR` and optional DSCP marking.

use std::io;
use std::net::{SocketAddr, UdpSocket};

use socket2::{Domain, Protocol, Socket, Type};

/// Options applied when the server binds its socket.
#[derive(Clone, Debug, Default)]
pub(crate) struct SocketOptions {
    /// DSCP (Differentiated Services Code Point) value for outgoing replies.
    ///
    /// Only the lower 6 bits are used. 46 (EF) is the usual choice for time
    /// traffic.
    pub dscp: Option<u8>,
}

impl SocketOptions {
    /// Create and bind a UDP socket.
    ///
    /// The address is reusable so a restarted server can rebind its port
    /// immediately. `nonblocking` must be set for sockets handed to an async
    /// runtime.
    pub(crate) fn bind_udp(&self, bind_addr: SocketAddr, nonblocking: bool) -> io::Result<UdpSocket> {
        let domain = if bind_addr.is_ipv4() {
            Domain::IPV4
        } else {
            Domain::IPV6
        };
        let socket = Socket::new(domain, Type::DGRAM, Some(Protocol::UDP))?;
        socket.set_reuse_address(true)?;

        if let Some(dscp) = self.dscp {
            // DSCP occupies bits 7-2 of the TOS/Traffic Class byte.
            let tos = u32::from(dscp & 0x3F) << 2;
            if bind_addr.is_ipv4() {
                socket.set_tos_v4(tos)?;
            } else {
                socket.set_tclass_v6(tos)?;
            }
        }

        socket.set_nonblocking(nonblocking)?;
        socket.bind(&bind_addr.into())?;
        Ok(socket.into())
    }
}
