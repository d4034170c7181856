//! Frame builders shared by the layer tests.
use alloc::vec::Vec;

use crate::config::Config;
use crate::iface::Interface;
use crate::nic::External;
use crate::wire::{arp_packet, ethernet_frame, icmpv4_packet, ipv4_packet, udp_packet};
use crate::wire::{ArpOperation, ArpRepr, Checksum, Icmpv4Repr, UdpChecksum, UdpRepr};
use crate::wire::{EthernetAddress, EthernetProtocol, EthernetRepr, IpProtocol, Ipv4Address, Ipv4Repr};

pub const MAC_ADDR_HOST: EthernetAddress = EthernetAddress([0x02, 0, 0, 0, 0, 1]);
pub const IP_ADDR_HOST: Ipv4Address = Ipv4Address::new(10, 0, 0, 1);
pub const MAC_ADDR_OTHER: EthernetAddress = EthernetAddress([0x02, 0, 0, 0, 0, 2]);
pub const IP_ADDR_OTHER: Ipv4Address = Ipv4Address::new(10, 0, 0, 2);

pub fn config() -> Config {
    Config::new(MAC_ADDR_HOST, IP_ADDR_HOST).announce(false)
}

pub fn iface() -> Interface<External> {
    Interface::new(config(), External::new()).unwrap()
}

/// An interface that already resolved the other host.
pub fn resolved_iface() -> Interface<External> {
    let mut iface = iface();
    let reply = arp(ArpOperation::Reply, MAC_ADDR_OTHER, IP_ADDR_OTHER, MAC_ADDR_HOST, IP_ADDR_HOST);
    iface.device_mut().push_recv(&reply);
    assert_eq!(iface.poll(), Ok(true));
    assert!(iface.device_mut().take_sent().is_empty());
    iface
}

pub fn frame(dst_addr: EthernetAddress, ethertype: EthernetProtocol, payload: &[u8]) -> Vec<u8> {
    let mut buffer = vec![0; 14 + payload.len()];
    let frame = ethernet_frame::new_unchecked_mut(&mut buffer);
    EthernetRepr { src_addr: MAC_ADDR_OTHER, dst_addr, ethertype }.emit(frame);
    frame.payload_mut_slice().copy_from_slice(payload);
    buffer
}

pub fn arp(
    operation: ArpOperation,
    source_hardware_addr: EthernetAddress,
    source_protocol_addr: Ipv4Address,
    target_hardware_addr: EthernetAddress,
    target_protocol_addr: Ipv4Address,
) -> Vec<u8> {
    let repr = ArpRepr::EthernetIpv4 {
        operation,
        source_hardware_addr,
        source_protocol_addr,
        target_hardware_addr,
        target_protocol_addr,
    };
    let mut payload = vec![0; repr.buffer_len()];
    repr.emit(arp_packet::new_unchecked_mut(&mut payload));
    frame(MAC_ADDR_HOST, EthernetProtocol::Arp, &payload)
}

/// A datagram from the other host to `dst_addr`, framed.
pub fn ipv4(dst_addr: Ipv4Address, protocol: IpProtocol, payload: &[u8]) -> Vec<u8> {
    let repr = Ipv4Repr {
        src_addr: IP_ADDR_OTHER,
        dst_addr,
        protocol,
        payload_len: payload.len(),
        hop_limit: 64,
        ident: 0x1234,
        more_frags: false,
        frag_offset: 0,
    };
    let mut datagram = vec![0; repr.buffer_len() + payload.len()];
    repr.emit(ipv4_packet::new_unchecked_mut(&mut datagram), Checksum::Manual);
    datagram[repr.buffer_len()..].copy_from_slice(payload);
    frame(MAC_ADDR_HOST, EthernetProtocol::Ipv4, &datagram)
}

/// An echo request message carrying `payload`.
pub fn echo_request(ident: u16, seq_no: u16, payload: &[u8]) -> Vec<u8> {
    let repr = Icmpv4Repr::EchoRequest { ident, seq_no, payload: payload.len() };
    let mut message = vec![0; repr.buffer_len()];
    message[repr.buffer_len() - payload.len()..].copy_from_slice(payload);
    repr.emit(icmpv4_packet::new_unchecked_mut(&mut message), Checksum::Manual);
    message
}

/// A datagram from the other host, with `checksum` applied.
pub fn udp(src_port: u16, dst_port: u16, payload: &[u8], checksum: UdpChecksum) -> Vec<u8> {
    let repr = UdpRepr { src_port, dst_port, length: (8 + payload.len()) as u16 };
    let mut datagram = vec![0; repr.buffer_len()];
    datagram[8..].copy_from_slice(payload);
    repr.emit(udp_packet::new_unchecked_mut(&mut datagram), checksum);
    datagram
}

/// The pseudo header checksum of datagrams towards the host.
pub fn to_host() -> UdpChecksum {
    UdpChecksum::Manual { src_addr: IP_ADDR_OTHER, dst_addr: IP_ADDR_HOST }
}

/// Unwrap the ethernet header of a sent frame.
pub fn sent_payload(frame: &[u8]) -> (EthernetRepr, &[u8]) {
    let frame = ethernet_frame::new_checked(frame).unwrap();
    (EthernetRepr::parse(frame).unwrap(), frame.payload_slice())
}

/// Unwrap the ethernet and ip header of a sent frame.
pub fn sent_datagram(frame: &[u8]) -> (Ipv4Repr, &[u8]) {
    let (eth, payload) = sent_payload(frame);
    assert_eq!(eth.ethertype, EthernetProtocol::Ipv4);
    let packet = ipv4_packet::new_checked(payload).unwrap();
    let repr = Ipv4Repr::parse(packet, Checksum::Manual).unwrap();
    let start = usize::from(packet.header_len());
    (repr, &payload[start..start + repr.payload_len])
}
