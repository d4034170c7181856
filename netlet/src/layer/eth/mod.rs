//! The ethernet layer.
//!
//! This is tasked with decoding the framed ethernet data that the physical device deals with, and
//! putting upper layer data into an ethernet framing. The state within the ethernet endpoint is
//! tiny compared to other layers, only the table of network protocols it dispatches to.
//!
//! Frames are not filtered by their destination address. A tap device only delivers frames meant
//! for the host side of the link or broadcast anyways.
use crate::layer::Registry;
use crate::wire::EthernetProtocol;

mod endpoint;
#[cfg(test)]
mod tests;

/// Length of the Ethernet II header.
pub const HEADER_LEN: usize = 14;

/// The network layers an ethernet frame can be handed to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Network {
    /// Address resolution messages.
    Arp,
    /// Internet protocol datagrams.
    Ipv4,
}

/// The ethernet state, the dispatch table by EtherType.
#[derive(Clone, Debug, Default)]
pub struct Endpoint {
    networks: Registry<EthernetProtocol, Network>,
}

impl Endpoint {
    /// An endpoint without any registered network protocol.
    pub fn new() -> Self {
        Endpoint::default()
    }

    /// Deliver frames of `protocol` to `network`.
    pub fn register(&mut self, protocol: EthernetProtocol, network: Network) {
        self.networks.register(protocol, network)
    }

    /// The network registered for `protocol`.
    pub fn lookup(&self, protocol: EthernetProtocol) -> Option<Network> {
        self.networks.lookup(protocol)
    }
}
