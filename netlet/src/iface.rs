//! The interface, owner of all protocol state and of the device.
use alloc::boxed::Box;
use alloc::vec::Vec;

use crate::config::Config;
use crate::layer::{arp, eth, ip, udp, FnHandler, Result};
use crate::nic::Device;
use crate::storage::Buffer;
use crate::wire::{EthernetProtocol, IpProtocol, Ipv4Address, ETHERNET_MTU};

/// A network stack on a single device with one address pair.
///
/// All state of the stack lives here and is only touched through `&mut self`, so processing is
/// naturally single threaded. The protocol operations are spread over the `layer` modules, each
/// of which adds the methods of its layer to this struct.
///
/// Drive the stack by calling [`poll`] repeatedly. Each call handles at most one received frame
/// and never blocks.
///
/// ```
/// use netlet::{Config, Interface};
/// use netlet::nic::External;
/// use netlet::wire::{EthernetAddress, Ipv4Address};
///
/// let config = Config::new(
///     EthernetAddress([0x02, 0x00, 0x00, 0x00, 0x00, 0x01]),
///     Ipv4Address::new(10, 0, 0, 1));
/// let mut iface = Interface::new(config, External::new()).unwrap();
/// iface.udp_open_with(7, |mut datagram| {
///     let echo = datagram.payload().to_vec();
///     let _ = datagram.reply(&echo);
/// });
///
/// // The announcement went out, nothing has been received.
/// assert_eq!(iface.device().sent().len(), 1);
/// assert_eq!(iface.poll(), Ok(false));
/// ```
///
/// [`poll`]: #method.poll
pub struct Interface<D: Device> {
    pub(crate) nic: D,
    pub(crate) config: Config,
    pub(crate) eth: eth::Endpoint,
    pub(crate) arp: arp::Endpoint,
    pub(crate) ip: ip::Endpoint,
    pub(crate) udp: udp::Endpoint,
    /// Receive buffer, reused for every frame.
    pub(crate) rx: Buffer,
}

impl<D: Device> Interface<D> {
    /// Length of the receive buffer, a full frame without frame check sequence.
    pub const RX_LEN: usize = eth::HEADER_LEN + ETHERNET_MTU;

    /// Set up all layers on `nic`.
    ///
    /// Registers the network and transport protocols and, unless disabled in the configuration,
    /// announces the protocol address.
    pub fn new(config: Config, nic: D) -> Result<Self> {
        let mut iface = Interface {
            nic,
            config,
            eth: eth::Endpoint::new(),
            arp: arp::Endpoint::new(&config),
            ip: ip::Endpoint::new(),
            udp: udp::Endpoint::new(),
            rx: Buffer::new(Self::RX_LEN),
        };

        iface.eth.register(EthernetProtocol::Arp, eth::Network::Arp);
        iface.eth.register(EthernetProtocol::Ipv4, eth::Network::Ipv4);
        iface.ip.register(IpProtocol::Icmp, ip::Transport::Icmp);
        iface.ip.register(IpProtocol::Udp, ip::Transport::Udp);

        net_debug!("iface: up as {} on {}", config.protocol_addr, config.hardware_addr);
        if config.announce {
            iface.arp_announce()?;
        }

        Ok(iface)
    }

    /// Try to receive and process one frame.
    ///
    /// Returns `Ok(true)` if a frame was received, regardless of whether it was accepted by any
    /// layer. Only errors of the device itself are returned.
    pub fn poll(&mut self) -> Result<bool> {
        self.ethernet_poll()
    }

    /// Bind `handler` to a local UDP port.
    ///
    /// Replaces and returns the handler previously bound to the port.
    pub fn udp_open(&mut self, port: u16, handler: Box<dyn udp::Recv>) -> Option<Box<dyn udp::Recv>> {
        self.udp.open(port, handler)
    }

    /// Bind a closure to a local UDP port.
    pub fn udp_open_with<F>(&mut self, port: u16, handler: F) -> Option<Box<dyn udp::Recv>>
        where F: FnMut(udp::Datagram) + 'static,
    {
        self.udp_open(port, Box::new(FnHandler(handler)))
    }

    /// Unbind a local UDP port.
    ///
    /// Returns whether the port had been open.
    pub fn udp_close(&mut self, port: u16) -> bool {
        self.udp.close(port)
    }

    /// Send `data` in a UDP datagram.
    pub fn udp_send(&mut self, data: &[u8], src_port: u16, dst_addr: Ipv4Address, dst_port: u16)
        -> Result<()>
    {
        self.udp_out(Buffer::from_slice(data), src_port, dst_addr, dst_port)
    }

    /// All live entries of the neighbor table, ordered by protocol address.
    pub fn neighbors(&mut self) -> Vec<arp::Neighbor> {
        let now = self.nic.timestamp();
        self.arp.neighbors(now)
    }

    /// Whether a packet to `addr` is waiting for address resolution.
    pub fn is_resolving(&mut self, addr: Ipv4Address) -> bool {
        let now = self.nic.timestamp();
        self.arp.is_pending(addr, now)
    }

    /// The configuration the interface was created with.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The underlying device.
    pub fn device(&self) -> &D {
        &self.nic
    }

    /// Mutable access to the underlying device.
    pub fn device_mut(&mut self) -> &mut D {
        &mut self.nic
    }

    /// Tear down the stack, returning the device.
    pub fn into_device(self) -> D {
        self.nic
    }
}

/// The interface is the sender of every datagram, including replies from UDP handlers.
impl<D: Device> ip::Send for Interface<D> {
    fn local_addr(&self) -> Ipv4Address {
        self.config.protocol_addr
    }

    fn send(&mut self, payload: &Buffer, dst_addr: Ipv4Address, protocol: IpProtocol) -> Result<()> {
        self.ip_out(payload, dst_addr, protocol)
    }
}
