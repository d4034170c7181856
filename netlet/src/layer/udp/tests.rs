use std::cell::RefCell;
use std::rc::Rc;

use crate::layer::testing::*;
use crate::layer::Error;
use crate::wire::{icmpv4_packet, udp_packet, Checksum, Icmpv4DstUnreachable, Icmpv4Repr};
use crate::wire::{IpProtocol, Ipv4Address, UdpChecksum, UdpRepr};

type Received = Rc<RefCell<Vec<(Ipv4Address, u16, Vec<u8>)>>>;

fn record(iface: &mut crate::Interface<crate::nic::External>, port: u16) -> Received {
    let received = Received::default();
    let log = received.clone();
    iface.udp_open_with(port, move |datagram| {
        log.borrow_mut().push((datagram.src_addr(), datagram.src_port(), datagram.payload().to_vec()));
    });
    received
}

#[test]
fn deliver_to_port() {
    let mut iface = resolved_iface();
    let received = record(&mut iface, 53);

    let datagram = udp(4000, 53, b"query", to_host());
    iface.device_mut().push_recv(&ipv4(IP_ADDR_HOST, IpProtocol::Udp, &datagram));
    assert_eq!(iface.poll(), Ok(true));

    assert_eq!(*received.borrow(), vec![(IP_ADDR_OTHER, 4000, b"query".to_vec())]);
    assert!(iface.device().sent().is_empty());
}

#[test]
fn reply_from_handler() {
    let mut iface = resolved_iface();
    iface.udp_open_with(7, |mut datagram| {
        let echo = datagram.payload().to_vec();
        datagram.reply(&echo).unwrap();
    });

    let datagram = udp(4000, 7, b"echo me", to_host());
    iface.device_mut().push_recv(&ipv4(IP_ADDR_HOST, IpProtocol::Udp, &datagram));
    assert_eq!(iface.poll(), Ok(true));

    let sent = iface.device_mut().take_sent();
    assert_eq!(sent.len(), 1);
    let (repr, payload) = sent_datagram(&sent[0]);
    assert_eq!(repr.dst_addr, IP_ADDR_OTHER);
    assert_eq!(repr.protocol, IpProtocol::Udp);

    let checksum = UdpChecksum::Manual { src_addr: IP_ADDR_HOST, dst_addr: IP_ADDR_OTHER };
    let packet = udp_packet::new_checked(payload).unwrap();
    assert_eq!(UdpRepr::parse(packet, checksum), Ok(UdpRepr {
        src_port: 7,
        dst_port: 4000,
        length: 15,
    }));
    assert_eq!(packet.payload_slice(), b"echo me");

    // The handler survives its own invocation.
    iface.device_mut().push_recv(&ipv4(IP_ADDR_HOST, IpProtocol::Udp, &datagram));
    assert_eq!(iface.poll(), Ok(true));
    assert_eq!(iface.device_mut().take_sent().len(), 1);
}

#[test]
fn port_unreachable() {
    let mut iface = resolved_iface();
    let datagram = udp(4000, 9999, b"nobody home", to_host());
    let frame = ipv4(IP_ADDR_HOST, IpProtocol::Udp, &datagram);
    iface.device_mut().push_recv(&frame);
    assert_eq!(iface.poll(), Ok(true));

    let sent = iface.device_mut().take_sent();
    assert_eq!(sent.len(), 1);
    let (repr, message) = sent_datagram(&sent[0]);
    assert_eq!(repr.dst_addr, IP_ADDR_OTHER);
    assert_eq!(repr.protocol, IpProtocol::Icmp);

    let packet = icmpv4_packet::new_checked(message).unwrap();
    assert_eq!(Icmpv4Repr::parse(packet, Checksum::Manual), Ok(Icmpv4Repr::DstUnreachable {
        reason: Icmpv4DstUnreachable::PortUnreachable,
        data_len: 28,
    }));
    // The original IP header and the UDP header.
    assert_eq!(packet.payload_slice(), &frame[14..14 + 28]);
}

#[test]
fn closed_port_unreachable() {
    let mut iface = resolved_iface();
    let received = record(&mut iface, 53);
    assert!(iface.udp.is_open(53));
    assert!(iface.udp_close(53));
    assert!(!iface.udp_close(53));
    assert!(!iface.udp.is_open(53));

    let datagram = udp(4000, 53, b"late", to_host());
    iface.device_mut().push_recv(&ipv4(IP_ADDR_HOST, IpProtocol::Udp, &datagram));
    assert_eq!(iface.poll(), Ok(true));

    assert!(received.borrow().is_empty());
    assert_eq!(iface.device_mut().take_sent().len(), 1);
}

#[test]
fn reopen_replaces_handler() {
    let mut iface = resolved_iface();
    let first = record(&mut iface, 53);
    let second = Received::default();
    let log = second.clone();
    let previous = iface.udp_open_with(53, move |datagram| {
        log.borrow_mut().push((datagram.src_addr(), datagram.dst_port(), Vec::new()));
    });
    assert!(previous.is_some());

    let datagram = udp(4000, 53, b"", to_host());
    iface.device_mut().push_recv(&ipv4(IP_ADDR_HOST, IpProtocol::Udp, &datagram));
    assert_eq!(iface.poll(), Ok(true));

    assert!(first.borrow().is_empty());
    assert_eq!(*second.borrow(), vec![(IP_ADDR_OTHER, 53, Vec::new())]);
}

#[test]
fn zero_checksum() {
    let datagram = udp(4000, 53, b"unchecked", UdpChecksum::Ignored);

    let mut iface = resolved_iface();
    let received = record(&mut iface, 53);
    iface.device_mut().push_recv(&ipv4(IP_ADDR_HOST, IpProtocol::Udp, &datagram));
    assert_eq!(iface.poll(), Ok(true));
    assert_eq!(received.borrow().len(), 1);

    let config = config().udp_accept_zero_checksum(false);
    let mut iface = crate::Interface::new(config, crate::nic::External::new()).unwrap();
    let received = record(&mut iface, 53);
    iface.device_mut().push_recv(&ipv4(IP_ADDR_HOST, IpProtocol::Udp, &datagram));
    assert_eq!(iface.poll(), Ok(true));
    assert!(received.borrow().is_empty());
    assert!(iface.device().sent().is_empty());
}

#[test]
fn drops_bad_checksum() {
    let mut iface = resolved_iface();
    let received = record(&mut iface, 53);
    let mut datagram = udp(4000, 53, b"garbled", to_host());
    datagram[9] ^= 0x20;
    iface.device_mut().push_recv(&ipv4(IP_ADDR_HOST, IpProtocol::Udp, &datagram));

    assert_eq!(iface.poll(), Ok(true));
    assert!(received.borrow().is_empty());
    assert!(iface.device().sent().is_empty());
}

#[test]
fn trims_to_length_field() {
    let mut iface = resolved_iface();
    let received = record(&mut iface, 53);
    let mut datagram = udp(4000, 53, b"data", to_host());
    // Trailing octets inside the IP payload but beyond the UDP length.
    datagram.extend_from_slice(&[0xee; 4]);
    iface.device_mut().push_recv(&ipv4(IP_ADDR_HOST, IpProtocol::Udp, &datagram));

    assert_eq!(iface.poll(), Ok(true));
    assert_eq!(received.borrow()[0].2, b"data".to_vec());
}

#[test]
fn send_large_datagram() {
    let mut iface = resolved_iface();
    iface.udp_send(&[0x55; 3000], 4000, IP_ADDR_OTHER, 5000).unwrap();
    assert_eq!(iface.device_mut().take_sent().len(), 3);

    assert_eq!(iface.udp_send(&[0; 65535 - 7], 4000, IP_ADDR_OTHER, 5000), Err(Error::BadSize));
    assert!(iface.device().sent().is_empty());
}
