//! As noted in RFC 826, arp assumes that at least the mapping and identities of the own host are
//! fully known to the resolver. Furthermore, we are expected to only keep a very small cache of
//! immediate communication hosts.
use crate::iface::Interface;
use crate::layer::Result;
use crate::nic::Device;
use crate::storage::Buffer;
use crate::wire::{arp_packet, ArpOperation, ArpRepr, EthernetAddress, EthernetProtocol};
use crate::wire::Ipv4Address;

impl<D: Device> Interface<D> {
    /// Process a received ARP message.
    ///
    /// Any valid request or reply refreshes the sender in the neighbor table. If a packet was
    /// waiting for the sender it is released. Otherwise requests for our own address are answered.
    pub fn arp_in(&mut self, packet: &mut Buffer, src_mac: EthernetAddress) {
        let repr = match ArpRepr::parse(arp_packet::new_unchecked(packet.as_slice())) {
            Ok(repr) => repr,
            Err(err) => {
                net_debug!("arp: dropped message from {}: {}", src_mac, err);
                return;
            },
        };

        let ArpRepr::EthernetIpv4 {
            operation,
            source_hardware_addr,
            source_protocol_addr,
            target_hardware_addr: _,
            target_protocol_addr,
        } = repr;

        let now = self.nic.timestamp();
        net_trace!("arp: {} is at {}", source_protocol_addr, source_hardware_addr);
        self.arp.update(source_protocol_addr, source_hardware_addr, now);

        if let Some(pending) = self.arp.pending.take(&source_protocol_addr, now) {
            net_trace!("arp: releasing packet to {}", source_protocol_addr);
            if let Err(err) = self.ethernet_out(pending, source_hardware_addr, EthernetProtocol::Ipv4) {
                net_debug!("arp: failed to release packet to {}: {}", source_protocol_addr, err);
            }
            return;
        }

        if operation == ArpOperation::Request && target_protocol_addr == self.config.protocol_addr {
            if let Err(err) = self.arp_reply(source_protocol_addr, source_hardware_addr) {
                net_debug!("arp: failed to answer {}: {}", source_protocol_addr, err);
            }
        }
    }

    /// Send an IP packet to `dst_addr` on the local link.
    ///
    /// Frames the packet immediately if the destination is resolved. Otherwise the packet is
    /// parked and a request is broadcast, unless a packet for the same destination is already
    /// waiting. In that case the new packet is dropped.
    pub fn arp_out(&mut self, packet: Buffer, dst_addr: Ipv4Address) -> Result<()> {
        if dst_addr.is_broadcast() {
            return self.ethernet_out(packet, EthernetAddress::BROADCAST, EthernetProtocol::Ipv4);
        }

        let now = self.nic.timestamp();
        if let Some(hardware_addr) = self.arp.lookup(dst_addr, now) {
            return self.ethernet_out(packet, hardware_addr, EthernetProtocol::Ipv4);
        }

        if self.arp.is_pending(dst_addr, now) {
            net_debug!("arp: dropped packet to {}, resolution in progress", dst_addr);
            return Ok(());
        }

        self.arp.pending.purge(now);
        self.arp.pending.set(dst_addr, packet, now);
        self.arp_request(dst_addr)
    }

    /// Broadcast a request for the hardware address of `target_addr`.
    pub fn arp_request(&mut self, target_addr: Ipv4Address) -> Result<()> {
        net_trace!("arp: who has {}", target_addr);
        self.arp_emit(ArpOperation::Request, target_addr, EthernetAddress::UNSPECIFIED, EthernetAddress::BROADCAST)
    }

    /// Tell `target_addr` at `target_mac` our own hardware address.
    pub fn arp_reply(&mut self, target_addr: Ipv4Address, target_mac: EthernetAddress) -> Result<()> {
        net_trace!("arp: answering {} at {}", target_addr, target_mac);
        self.arp_emit(ArpOperation::Reply, target_addr, target_mac, target_mac)
    }

    /// Announce our own address by requesting it.
    pub fn arp_announce(&mut self) -> Result<()> {
        let own = self.config.protocol_addr;
        self.arp_request(own)
    }

    fn arp_emit(
        &mut self,
        operation: ArpOperation,
        target_protocol_addr: Ipv4Address,
        target_hardware_addr: EthernetAddress,
        dst_addr: EthernetAddress,
    ) -> Result<()> {
        let repr = ArpRepr::EthernetIpv4 {
            operation,
            source_hardware_addr: self.config.hardware_addr,
            source_protocol_addr: self.config.protocol_addr,
            target_hardware_addr,
            target_protocol_addr,
        };

        let mut packet = Buffer::new(repr.buffer_len());
        repr.emit(arp_packet::new_unchecked_mut(packet.as_mut_slice()));
        self.ethernet_out(packet, dst_addr, EthernetProtocol::Arp)
    }
}
