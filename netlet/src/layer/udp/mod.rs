//! The UDP layer.
//!
//! Delivers datagrams to the handler bound to their destination port. Datagrams for a port
//! without handler are answered with an ICMP port unreachable message.
//!
//! A handler is called with a [`Datagram`], which borrows the received payload and the
//! interface. It can thus [`reply`] directly from within the callback.
//!
//! [`Datagram`]: struct.Datagram.html
//! [`reply`]: struct.Datagram.html#method.reply
use alloc::boxed::Box;
use alloc::collections::BTreeMap;

use crate::layer::{ip, FnHandler, Result};
use crate::storage::Buffer;
use crate::wire::Ipv4Address;

mod endpoint;
#[cfg(test)]
mod tests;

pub(crate) use self::endpoint::send_to;

/// A receiver of UDP datagrams on one port.
pub trait Recv {
    /// Handle a single received datagram.
    fn receive(&mut self, datagram: Datagram<'_>);
}

/// A received datagram, as presented to the handler of its port.
pub struct Datagram<'a> {
    payload: &'a [u8],
    src_addr: Ipv4Address,
    src_port: u16,
    dst_port: u16,
    sender: &'a mut dyn ip::Send,
}

/// The table of open ports.
#[derive(Default)]
pub struct Endpoint {
    ports: BTreeMap<u16, Box<dyn Recv>>,
}

impl Endpoint {
    /// An endpoint without open ports.
    pub fn new() -> Self {
        Endpoint::default()
    }

    /// Bind `handler` to `port`, returning the previous handler.
    pub fn open(&mut self, port: u16, handler: Box<dyn Recv>) -> Option<Box<dyn Recv>> {
        self.ports.insert(port, handler)
    }

    /// Unbind `port`, returning whether it was open.
    pub fn close(&mut self, port: u16) -> bool {
        self.ports.remove(&port).is_some()
    }

    /// Check if a handler is bound to `port`.
    pub fn is_open(&self, port: u16) -> bool {
        self.ports.contains_key(&port)
    }

    /// Detach the handler of `port` for the duration of a callback.
    fn checkout(&mut self, port: u16) -> Option<Box<dyn Recv>> {
        self.ports.remove(&port)
    }

    /// Reattach a handler after its callback.
    fn checkin(&mut self, port: u16, handler: Box<dyn Recv>) {
        self.ports.entry(port).or_insert(handler);
    }
}

impl<'a> Datagram<'a> {
    /// The data of the datagram.
    pub fn payload(&self) -> &'a [u8] {
        self.payload
    }

    /// The address of the sender.
    pub fn src_addr(&self) -> Ipv4Address {
        self.src_addr
    }

    /// The port of the sender.
    pub fn src_port(&self) -> u16 {
        self.src_port
    }

    /// The local port the datagram was received on.
    pub fn dst_port(&self) -> u16 {
        self.dst_port
    }

    /// Send `data` back to the source of this datagram, from the port it was received on.
    pub fn reply(&mut self, data: &[u8]) -> Result<()> {
        self.send_to(data, self.src_addr, self.src_port)
    }

    /// Send `data` to any destination, from the port this datagram was received on.
    pub fn send_to(&mut self, data: &[u8], dst_addr: Ipv4Address, dst_port: u16) -> Result<()> {
        send_to(&mut *self.sender, Buffer::from_slice(data), self.dst_port, dst_addr, dst_port)
    }
}

impl<F> Recv for FnHandler<F>
    where F: FnMut(Datagram<'_>)
{
    fn receive(&mut self, datagram: Datagram<'_>) {
        (self.0)(datagram)
    }
}

impl core::fmt::Debug for Endpoint {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        f.debug_set().entries(self.ports.keys()).finish()
    }
}
