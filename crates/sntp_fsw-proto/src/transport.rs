// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! The datagram capability the client and server roles are handed.
//!
//! The core never opens sockets. Callers own the transport and lend it to a
//! single exchange; tests substitute scripted fakes.

use std::io;
use std::net::{SocketAddr, UdpSocket};
use std::time::Duration;

/// Send and bounded-receive of whole datagrams.
pub trait DatagramTransport {
    /// Send one datagram to `target`, returning the number of bytes sent.
    fn send_to(&self, buf: &[u8], target: SocketAddr) -> io::Result<usize>;

    /// Wait up to `timeout` for one datagram.
    ///
    /// Returns the datagram length and sender. Nothing arriving in time must
    /// surface as `ErrorKind::WouldBlock` or `ErrorKind::TimedOut`.
    fn recv_from(&self, buf: &mut [u8], timeout: Duration) -> io::Result<(usize, SocketAddr)>;
}

impl<T: DatagramTransport + ?Sized> DatagramTransport for &T {
    fn send_to(&self, buf: &[u8], target: SocketAddr) -> io::Result<usize> {
        (**self).send_to(buf, target)
    }

    fn recv_from(&self, buf: &mut [u8], timeout: Duration) -> io::Result<(usize, SocketAddr)> {
        (**self).recv_from(buf, timeout)
    }
}

impl DatagramTransport for UdpSocket {
    fn send_to(&self, buf: &[u8], target: SocketAddr) -> io::Result<usize> {
        UdpSocket::send_to(self, buf, target)
    }

    fn recv_from(&self, buf: &mut [u8], timeout: Duration) -> io::Result<(usize, SocketAddr)> {
        // A zero read timeout is rejected by the OS layer; treat it as "poll once".
        let timeout = timeout.max(Duration::from_millis(1));
        self.set_read_timeout(Some(timeout))?;
        UdpSocket::recv_from(self, buf)
    }
}
