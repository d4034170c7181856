//! Static configuration of an interface.
use crate::time::Duration;
use crate::wire::{EthernetAddress, Ipv4Address};

/// The address pair and timing knobs of an [`Interface`].
///
/// ```
/// use netlet::Config;
/// use netlet::time::Duration;
/// use netlet::wire::{EthernetAddress, Ipv4Address};
///
/// let config = Config::new(
///         EthernetAddress([0x02, 0x00, 0x00, 0x00, 0x00, 0x01]),
///         Ipv4Address::new(10, 0, 0, 1))
///     .arp_timeout(Duration::from_secs(20))
///     .announce(false);
/// assert_eq!(config.arp_pending_timeout, Duration::from_secs(1));
/// ```
///
/// [`Interface`]: iface/struct.Interface.html
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    /// The source address of all outgoing frames.
    pub hardware_addr: EthernetAddress,

    /// The only address accepted as destination of inbound datagrams.
    pub protocol_addr: Ipv4Address,

    /// How long a resolved neighbor stays valid after its last update.
    pub arp_timeout: Duration,

    /// How long a packet waits for the resolution of its destination.
    ///
    /// Also the minimum interval between two requests for the same address.
    pub arp_pending_timeout: Duration,

    /// Treat a UDP checksum field of zero as "not computed".
    pub udp_accept_zero_checksum: bool,

    /// Announce the protocol address with an ARP request on startup.
    pub announce: bool,
}

impl Config {
    /// Default lifetime of neighbor table entries.
    pub const ARP_TIMEOUT: Duration = Duration::from_secs(60);

    /// Default lifetime of packets awaiting resolution.
    pub const ARP_PENDING_TIMEOUT: Duration = Duration::from_secs(1);

    /// A configuration with default timing for the given addresses.
    pub fn new(hardware_addr: EthernetAddress, protocol_addr: Ipv4Address) -> Self {
        Config {
            hardware_addr,
            protocol_addr,
            arp_timeout: Self::ARP_TIMEOUT,
            arp_pending_timeout: Self::ARP_PENDING_TIMEOUT,
            udp_accept_zero_checksum: true,
            announce: true,
        }
    }

    /// Set the lifetime of neighbor table entries.
    pub fn arp_timeout(self, arp_timeout: Duration) -> Self {
        Config { arp_timeout, ..self }
    }

    /// Set the lifetime of packets awaiting resolution.
    pub fn arp_pending_timeout(self, arp_pending_timeout: Duration) -> Self {
        Config { arp_pending_timeout, ..self }
    }

    /// Choose whether a zero UDP checksum skips verification.
    pub fn udp_accept_zero_checksum(self, udp_accept_zero_checksum: bool) -> Self {
        Config { udp_accept_zero_checksum, ..self }
    }

    /// Choose whether to announce the address on startup.
    pub fn announce(self, announce: bool) -> Self {
        Config { announce, ..self }
    }
}
