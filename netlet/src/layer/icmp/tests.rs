use crate::layer::testing::*;
use crate::layer::Error;
use crate::storage::Buffer;
use crate::wire::{icmpv4_packet, Checksum, Icmpv4DstUnreachable, Icmpv4Repr, IpProtocol};

#[test]
fn answer_echo_request() {
    let mut iface = resolved_iface();
    let request = echo_request(0x4242, 7, b"the quick brown fox");
    iface.device_mut().push_recv(&ipv4(IP_ADDR_HOST, IpProtocol::Icmp, &request));
    assert_eq!(iface.poll(), Ok(true));

    let sent = iface.device_mut().take_sent();
    assert_eq!(sent.len(), 1);
    let (repr, message) = sent_datagram(&sent[0]);
    assert_eq!(repr.src_addr, IP_ADDR_HOST);
    assert_eq!(repr.dst_addr, IP_ADDR_OTHER);
    assert_eq!(repr.protocol, IpProtocol::Icmp);
    assert_eq!(message.len(), request.len());

    let packet = icmpv4_packet::new_checked(message).unwrap();
    assert_eq!(Icmpv4Repr::parse(packet, Checksum::Manual), Ok(Icmpv4Repr::EchoReply {
        ident: 0x4242,
        seq_no: 7,
        payload: 19,
    }));
    assert_eq!(packet.payload_slice(), b"the quick brown fox");
}

#[test]
fn answer_echo_request_with_code() {
    let mut iface = resolved_iface();
    let mut request = echo_request(0x4242, 8, b"coded");
    {
        let packet = icmpv4_packet::new_unchecked_mut(&mut request);
        packet.set_msg_code(1);
        packet.fill_checksum();
    }
    iface.device_mut().push_recv(&ipv4(IP_ADDR_HOST, IpProtocol::Icmp, &request));
    assert_eq!(iface.poll(), Ok(true));

    let sent = iface.device_mut().take_sent();
    assert_eq!(sent.len(), 1);
    let (_, message) = sent_datagram(&sent[0]);
    let packet = icmpv4_packet::new_checked(message).unwrap();
    assert_eq!(packet.msg_code(), 0);
    assert_eq!(Icmpv4Repr::parse(packet, Checksum::Manual), Ok(Icmpv4Repr::EchoReply {
        ident: 0x4242,
        seq_no: 8,
        payload: 5,
    }));
}

#[test]
fn answer_before_resolution() {
    let mut iface = iface();
    let request = echo_request(1, 1, b"ping");
    iface.device_mut().push_recv(&ipv4(IP_ADDR_HOST, IpProtocol::Icmp, &request));
    assert_eq!(iface.poll(), Ok(true));

    // The reply waits for the other host, which is asked first.
    let sent = iface.device_mut().take_sent();
    assert_eq!(sent.len(), 1);
    assert!(iface.is_resolving(IP_ADDR_OTHER));
}

#[test]
fn drops_bad_checksum() {
    let mut iface = resolved_iface();
    let mut request = echo_request(1, 1, b"ping");
    request[2] ^= 0x01;
    iface.device_mut().push_recv(&ipv4(IP_ADDR_HOST, IpProtocol::Icmp, &request));

    assert_eq!(iface.poll(), Ok(true));
    assert!(iface.device().sent().is_empty());
}

#[test]
fn ignores_other_messages() {
    let mut iface = resolved_iface();
    let mut reply = echo_request(1, 1, b"pong");
    let repr = Icmpv4Repr::EchoReply { ident: 1, seq_no: 1, payload: 4 };
    repr.emit(icmpv4_packet::new_unchecked_mut(&mut reply), Checksum::Manual);
    iface.device_mut().push_recv(&ipv4(IP_ADDR_HOST, IpProtocol::Icmp, &reply));

    assert_eq!(iface.poll(), Ok(true));
    assert!(iface.device().sent().is_empty());
}

#[test]
fn unreachable_quotes_short_datagram() {
    let mut iface = resolved_iface();
    let datagram = ipv4(IP_ADDR_HOST, IpProtocol::Tcp, &[1, 2, 3]);
    let original = Buffer::from_slice(&datagram[14..]);
    iface.icmp_unreachable(&original, IP_ADDR_OTHER, Icmpv4DstUnreachable::HostUnreachable).unwrap();

    let sent = iface.device_mut().take_sent();
    let (_, message) = sent_datagram(&sent[0]);
    let packet = icmpv4_packet::new_checked(message).unwrap();
    assert_eq!(Icmpv4Repr::parse(packet, Checksum::Manual), Ok(Icmpv4Repr::DstUnreachable {
        reason: Icmpv4DstUnreachable::HostUnreachable,
        data_len: 23,
    }));
    assert_eq!(packet.payload_slice(), original.as_slice());
}

#[test]
fn unreachable_needs_header() {
    let mut iface = resolved_iface();
    let truncated = Buffer::from_slice(&[0x45; 12]);
    let reason = Icmpv4DstUnreachable::PortUnreachable;
    assert_eq!(iface.icmp_unreachable(&truncated, IP_ADDR_OTHER, reason), Err(Error::Illegal));
    assert!(iface.device().sent().is_empty());
}
