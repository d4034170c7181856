//! The IP layer.
//!
//! Accepts IPv4 datagrams addressed to the configured protocol address and dispatches them to the
//! transport registered for their protocol number. Datagrams for any other protocol are answered
//! with an ICMP protocol unreachable message.
//!
//! On the sending side payloads that exceed [`MAX_FRAGMENT_PAYLOAD`] are split into fragments
//! sharing one identification value. There is no reassembly of received fragments: each is
//! processed as if it was a complete datagram.
//!
//! [`MAX_FRAGMENT_PAYLOAD`]: constant.MAX_FRAGMENT_PAYLOAD.html
use crate::layer::{Registry, Result};
use crate::storage::Buffer;
use crate::wire::{IpProtocol, Ipv4Address, ETHERNET_MTU, IPV4_HEADER_LEN};

mod endpoint;

/// The largest payload of a single fragment.
///
/// A multiple of 8, as required for all but the last fragment of a datagram.
pub const MAX_FRAGMENT_PAYLOAD: usize = ETHERNET_MTU - IPV4_HEADER_LEN;

/// The time to live of emitted datagrams.
pub const DEFAULT_TTL: u8 = 64;

/// The transport layers a datagram can be handed to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Transport {
    /// Control messages.
    Icmp,
    /// User datagrams.
    Udp,
}

/// Addressing information of a received datagram, handed to the transport layers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Inbound {
    /// The sender of the datagram.
    pub src_addr: Ipv4Address,
    /// Length of the stripped IP header, including options.
    ///
    /// Allows a transport to restore the complete datagram for an error report.
    pub header_len: usize,
}

/// The IP state.
#[derive(Clone, Debug, Default)]
pub struct Endpoint {
    /// Identification of the next emitted datagram.
    ident: u16,

    transports: Registry<IpProtocol, Transport>,
}

/// A sender of IP datagrams.
///
/// Implemented by the interface. Upper layers that need to send while the interface is busy
/// dispatching to them, such as UDP handlers replying to a datagram, receive it as this trait.
pub trait Send {
    /// The source address of sent datagrams.
    fn local_addr(&self) -> Ipv4Address;

    /// Send `payload` as one datagram, fragmented as necessary.
    fn send(&mut self, payload: &Buffer, dst_addr: Ipv4Address, protocol: IpProtocol) -> Result<()>;
}

impl Endpoint {
    /// An endpoint without any registered transport.
    pub fn new() -> Self {
        Endpoint::default()
    }

    /// Deliver datagrams of `protocol` to `transport`.
    pub fn register(&mut self, protocol: IpProtocol, transport: Transport) {
        self.transports.register(protocol, transport)
    }

    /// The transport registered for `protocol`.
    pub fn lookup(&self, protocol: IpProtocol) -> Option<Transport> {
        self.transports.lookup(protocol)
    }

    /// Take an identification value for a new datagram.
    pub fn next_ident(&mut self) -> u16 {
        let ident = self.ident;
        self.ident = self.ident.wrapping_add(1);
        ident
    }
}
