use crate::iface::Interface;
use crate::layer::{ip, Error, Result};
use crate::nic::Device;
use crate::storage::Buffer;
use crate::wire::{icmpv4_packet, ipv4_packet, Checksum, Icmpv4DstUnreachable, Icmpv4Repr};
use crate::wire::{IpProtocol, Ipv4Address, IPV4_HEADER_LEN};

use super::QUOTED_PAYLOAD_LEN;

impl<D: Device> Interface<D> {
    /// Process a received control message.
    ///
    /// Echo requests are answered with a reply carrying the identical payload. Messages that fail
    /// the checksum are dropped, all other messages are ignored.
    pub fn icmp_in(&mut self, packet: &mut Buffer, inbound: ip::Inbound) {
        let repr = match Icmpv4Repr::parse(icmpv4_packet::new_unchecked(packet.as_slice()), Checksum::Manual) {
            Ok(repr) => repr,
            Err(err) => {
                net_debug!("icmp: dropped message from {}: {}", inbound.src_addr, err);
                return;
            },
        };

        let reply = match repr.echo_reply() {
            Some(reply) => reply,
            None => {
                net_trace!("icmp: ignored {} from {}", repr, inbound.src_addr);
                return;
            },
        };

        let mut message = Buffer::default();
        if message.copy(packet, packet.len()).is_err() {
            return;
        }
        reply.emit(icmpv4_packet::new_unchecked_mut(message.as_mut_slice()), Checksum::Manual);

        net_trace!("icmp: echo reply to {}", inbound.src_addr);
        if let Err(err) = self.ip_out(&message, inbound.src_addr, IpProtocol::Icmp) {
            net_debug!("icmp: failed to reply to {}: {}", inbound.src_addr, err);
        }
    }

    /// Report an undeliverable datagram to `dst_addr`.
    ///
    /// `original` must start with the IP header of the offending datagram. The report quotes that
    /// header, options included, followed by at most 8 octets of its payload.
    pub fn icmp_unreachable(
        &mut self,
        original: &Buffer,
        dst_addr: Ipv4Address,
        reason: Icmpv4DstUnreachable,
    ) -> Result<()> {
        if original.len() < IPV4_HEADER_LEN {
            return Err(Error::Illegal);
        }

        let header_len = usize::from(ipv4_packet::new_unchecked(original.as_slice()).header_len());
        let data_len = original.len().min(header_len + QUOTED_PAYLOAD_LEN);
        let repr = Icmpv4Repr::DstUnreachable { reason, data_len };

        let mut message = Buffer::new(repr.buffer_len());
        let quote = &original.as_slice()[..data_len];
        message.as_mut_slice()[repr.buffer_len() - data_len..].copy_from_slice(quote);
        repr.emit(icmpv4_packet::new_unchecked_mut(message.as_mut_slice()), Checksum::Manual);

        net_trace!("icmp: {} to {}", repr, dst_addr);
        self.ip_out(&message, dst_addr, IpProtocol::Icmp)
    }
}
