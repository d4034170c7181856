use crate::iface::Interface;
use crate::layer::{ip, Error, Result};
use crate::nic::Device;
use crate::storage::Buffer;
use crate::wire::{udp_packet, Icmpv4DstUnreachable, IpProtocol, Ipv4Address, UdpChecksum, UdpRepr};
use crate::wire::UDP_HEADER_LEN;

use super::Datagram;

impl<D: Device> Interface<D> {
    /// Process a received user datagram.
    ///
    /// Drops truncated datagrams and those failing the checksum. A checksum field of zero is not
    /// verified, unless configured otherwise. Delivers the payload to the handler of the
    /// destination port, or reports the port as unreachable.
    pub fn udp_in(&mut self, packet: &mut Buffer, inbound: ip::Inbound) {
        let src_addr = inbound.src_addr;
        let datagram = udp_packet::new_unchecked(packet.as_slice());
        let checksum = if datagram.as_bytes().len() >= UDP_HEADER_LEN
            && datagram.checksum() == 0
            && self.config.udp_accept_zero_checksum
        {
            UdpChecksum::Ignored
        } else {
            UdpChecksum::Manual { src_addr, dst_addr: self.config.protocol_addr }
        };

        let repr = match UdpRepr::parse(datagram, checksum) {
            Ok(repr) => repr,
            Err(err) => {
                net_debug!("udp: dropped datagram from {}: {}", src_addr, err);
                return;
            },
        };

        let mut handler = match self.udp.checkout(repr.dst_port) {
            Some(handler) => handler,
            None => {
                net_debug!("udp: port {} unreachable for {}", repr.dst_port, src_addr);
                if packet.add_header(inbound.header_len).is_err() {
                    return;
                }
                let reason = Icmpv4DstUnreachable::PortUnreachable;
                if let Err(err) = self.icmp_unreachable(packet, src_addr, reason) {
                    net_debug!("udp: failed to report unreachable port: {}", err);
                }
                return;
            },
        };

        let padding = packet.len() - usize::from(repr.length);
        if packet.remove_padding(padding).is_ok() && packet.remove_header(UDP_HEADER_LEN).is_ok() {
            net_trace!("udp: {} octets from {}:{} to port {}",
                packet.len(), src_addr, repr.src_port, repr.dst_port);
            handler.receive(Datagram {
                payload: packet.as_slice(),
                src_addr,
                src_port: repr.src_port,
                dst_port: repr.dst_port,
                sender: &mut *self,
            });
        }

        self.udp.checkin(repr.dst_port, handler);
    }

    /// Send `payload` in a datagram from `src_port` to `dst_addr` and `dst_port`.
    pub fn udp_out(&mut self, payload: Buffer, src_port: u16, dst_addr: Ipv4Address, dst_port: u16)
        -> Result<()>
    {
        send_to(self, payload, src_port, dst_addr, dst_port)
    }
}

/// Prepend the header to `payload` and hand the datagram to `sender`.
pub(crate) fn send_to(
    sender: &mut dyn ip::Send,
    mut payload: Buffer,
    src_port: u16,
    dst_addr: Ipv4Address,
    dst_port: u16,
) -> Result<()> {
    let length = payload.len() + UDP_HEADER_LEN;
    if length > usize::from(u16::max_value()) {
        return Err(Error::BadSize);
    }

    payload.add_header(UDP_HEADER_LEN)?;
    let repr = UdpRepr {
        src_port,
        dst_port,
        length: length as u16,
    };
    let checksum = UdpChecksum::Manual {
        src_addr: sender.local_addr(),
        dst_addr,
    };
    repr.emit(udp_packet::new_unchecked_mut(payload.as_mut_slice()), checksum);

    sender.send(&payload, dst_addr, IpProtocol::Udp)
}
