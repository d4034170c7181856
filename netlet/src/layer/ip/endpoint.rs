use crate::iface::Interface;
use crate::layer::{Error, Result};
use crate::nic::Device;
use crate::storage::Buffer;
use crate::wire::{ipv4_packet, Checksum, EthernetAddress, Icmpv4DstUnreachable, IpProtocol};
use crate::wire::{Ipv4Address, Ipv4Repr, IPV4_HEADER_LEN};

use super::{Inbound, Transport, DEFAULT_TTL, MAX_FRAGMENT_PAYLOAD};

impl<D: Device> Interface<D> {
    /// Process a received datagram.
    ///
    /// Drops datagrams that are malformed, fail the header checksum, or are addressed to anyone
    /// else. Trims the link layer padding and the header, then hands the payload to the registered
    /// transport.
    pub fn ip_in(&mut self, packet: &mut Buffer, src_mac: EthernetAddress) {
        let header = ipv4_packet::new_unchecked(packet.as_slice());
        let repr = match Ipv4Repr::parse(header, Checksum::Manual) {
            Ok(repr) => repr,
            Err(err) => {
                net_debug!("ip: dropped datagram from {}: {}", src_mac, err);
                return;
            },
        };

        if repr.dst_addr != self.config.protocol_addr {
            net_debug!("ip: dropped datagram for {}", repr.dst_addr);
            return;
        }

        let header_len = usize::from(header.header_len());
        let padding = packet.len() - header_len - repr.payload_len;
        if packet.remove_padding(padding).is_err() || packet.remove_header(header_len).is_err() {
            return;
        }

        let inbound = Inbound {
            src_addr: repr.src_addr,
            header_len,
        };

        match self.ip.lookup(repr.protocol) {
            Some(Transport::Icmp) => self.icmp_in(packet, inbound),
            Some(Transport::Udp) => self.udp_in(packet, inbound),
            None => {
                net_debug!("ip: no transport for {} from {}", repr.protocol, repr.src_addr);
                if packet.add_header(header_len).is_err() {
                    return;
                }
                let reason = Icmpv4DstUnreachable::ProtoUnreachable;
                if let Err(err) = self.icmp_unreachable(packet, repr.src_addr, reason) {
                    net_debug!("ip: failed to report unreachable protocol: {}", err);
                }
            },
        }
    }

    /// Send `payload` to `dst_addr`.
    ///
    /// Payloads longer than `MAX_FRAGMENT_PAYLOAD` are split into fragments of that size, the
    /// last one possibly shorter. All fragments share one identification value.
    pub fn ip_out(&mut self, payload: &Buffer, dst_addr: Ipv4Address, protocol: IpProtocol)
        -> Result<()>
    {
        // Bounded by the total length field of a single datagram.
        if payload.len() > usize::from(u16::max_value()) - IPV4_HEADER_LEN {
            return Err(Error::BadSize);
        }

        let ident = self.ip.next_ident();
        let data = payload.as_slice();

        if data.len() <= MAX_FRAGMENT_PAYLOAD {
            return self.ip_fragment_out(data, dst_addr, protocol, ident, 0, false);
        }

        net_trace!("ip: fragmenting {} octets for {} with id {}", data.len(), dst_addr, ident);
        for (index, fragment) in data.chunks(MAX_FRAGMENT_PAYLOAD).enumerate() {
            let offset = index * MAX_FRAGMENT_PAYLOAD;
            let more = offset + fragment.len() < data.len();
            self.ip_fragment_out(fragment, dst_addr, protocol, ident, (offset / 8) as u16, more)?;
        }

        Ok(())
    }

    /// Send a single fragment of a datagram.
    ///
    /// The `offset` is counted in units of 8 octets, as in the header field.
    pub fn ip_fragment_out(
        &mut self,
        payload: &[u8],
        dst_addr: Ipv4Address,
        protocol: IpProtocol,
        ident: u16,
        offset: u16,
        more_frags: bool,
    ) -> Result<()> {
        if offset > 0x1fff {
            return Err(Error::BadSize);
        }

        let repr = Ipv4Repr {
            src_addr: self.config.protocol_addr,
            dst_addr,
            protocol,
            payload_len: payload.len(),
            hop_limit: DEFAULT_TTL,
            ident,
            more_frags,
            frag_offset: offset * 8,
        };

        let mut packet = Buffer::from_slice(payload);
        packet.add_header(repr.buffer_len())?;
        repr.emit(ipv4_packet::new_unchecked_mut(packet.as_mut_slice()), Checksum::Manual);

        self.arp_out(packet, dst_addr)
    }
}
