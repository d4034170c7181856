//! Receiving and sending ARP messages.
//!
//! Restricted to resolving the addresses needed by the ip layer on the local link. The endpoint
//! holds two tables with independent lifetimes:
//!
//! * the neighbor table, mapping protocol to hardware addresses of hosts that recently sent us
//!   any ARP message, and
//! * the pending table, holding at most one outbound packet per unresolved destination.
//!
//! A destination with a pending packet has an outstanding request. Further packets to it are
//! dropped until either an answer releases the parked packet or the pending entry times out, at
//! which point the next packet issues a fresh request. There are no retransmissions.
use core::fmt;
use alloc::vec::Vec;

use crate::config::Config;
use crate::managed::TtlMap;
use crate::storage::Buffer;
use crate::time::Instant;
use crate::wire::{EthernetAddress, Ipv4Address};

mod endpoint;

/// The address resolution state.
#[derive(Debug)]
pub struct Endpoint {
    /// Resolved neighbors.
    table: TtlMap<Ipv4Address, EthernetAddress>,

    /// Packets waiting for the resolution of their destination.
    pending: TtlMap<Ipv4Address, Buffer>,
}

/// A resolved neighbor, as listed by [`Interface::neighbors`].
///
/// [`Interface::neighbors`]: ../../iface/struct.Interface.html#method.neighbors
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct Neighbor {
    /// The IPv4 address of the neighbor.
    pub protocol_addr: Ipv4Address,
    /// The hardware address it was last seen with.
    pub hardware_addr: EthernetAddress,
    /// Time of the last message from the neighbor.
    pub updated: Instant,
}

impl Endpoint {
    /// An endpoint with empty tables, expiring entries as configured.
    pub fn new(config: &Config) -> Self {
        Endpoint {
            table: TtlMap::new(Some(config.arp_timeout)),
            pending: TtlMap::new(Some(config.arp_pending_timeout)),
        }
    }

    /// Look up the hardware address of `addr`.
    pub fn lookup(&mut self, addr: Ipv4Address, now: Instant) -> Option<EthernetAddress> {
        self.table.get(&addr, now).cloned()
    }

    /// Add or refresh a neighbor.
    ///
    /// Evicts all expired neighbors first so the table is bounded by the hosts heard from within
    /// one timeout.
    pub fn update(&mut self, addr: Ipv4Address, hardware_addr: EthernetAddress, now: Instant) {
        self.table.purge(now);
        self.table.set(addr, hardware_addr, now);
    }

    /// Whether a packet to `addr` awaits resolution.
    pub fn is_pending(&mut self, addr: Ipv4Address, now: Instant) -> bool {
        self.pending.contains(&addr, now)
    }

    /// All live neighbors, ordered by protocol address.
    pub fn neighbors(&mut self, now: Instant) -> Vec<Neighbor> {
        let mut neighbors = Vec::with_capacity(self.table.len());
        self.table.for_each(now, |&protocol_addr, &hardware_addr, updated| {
            neighbors.push(Neighbor { protocol_addr, hardware_addr, updated })
        });
        neighbors
    }
}

impl fmt::Display for Neighbor {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} | {} | {}", self.protocol_addr, self.hardware_addr, self.updated)
    }
}
