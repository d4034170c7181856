use crate::layer::testing::*;
use crate::wire::{EthernetAddress, EthernetProtocol, IpProtocol};

#[test]
fn pads_short_frames() {
    let mut iface = resolved_iface();
    iface.udp_send(b"hi", 4000, IP_ADDR_OTHER, 5000).unwrap();

    let sent = iface.device_mut().take_sent();
    assert_eq!(sent.len(), 1);
    // 20 + 8 + 2 octets padded to the minimum payload of 46.
    assert_eq!(sent[0].len(), 60);
    assert!(sent[0][14 + 30..].iter().all(|&byte| byte == 0));

    let (repr, payload) = sent_payload(&sent[0]);
    assert_eq!(repr.src_addr, MAC_ADDR_HOST);
    assert_eq!(repr.dst_addr, MAC_ADDR_OTHER);
    assert_eq!(repr.ethertype, EthernetProtocol::Ipv4);
    assert_eq!(payload.len(), 46);
}

#[test]
fn ignores_unknown_ethertype() {
    let mut iface = iface();
    let unknown = frame(MAC_ADDR_HOST, EthernetProtocol::Unknown(0x88b5), &[0; 46]);
    iface.device_mut().push_recv(&unknown);

    assert_eq!(iface.poll(), Ok(true));
    assert!(iface.device().sent().is_empty());
    assert_eq!(iface.poll(), Ok(false));
}

#[test]
fn drops_runt_frames() {
    let mut iface = iface();
    iface.device_mut().push_recv(&[0xff; 10]);

    assert_eq!(iface.poll(), Ok(true));
    assert!(iface.device().sent().is_empty());
}

#[test]
fn strips_padding_of_received_frames() {
    let mut iface = resolved_iface();
    // An echo request with a short payload, padded by the sender.
    let mut request = ipv4(IP_ADDR_HOST, IpProtocol::Icmp, &echo_request(1, 0, &[]));
    request.resize(60, 0);
    iface.device_mut().push_recv(&request);
    assert_eq!(iface.poll(), Ok(true));

    let sent = iface.device_mut().take_sent();
    assert_eq!(sent.len(), 1);
    let (repr, payload) = sent_datagram(&sent[0]);
    assert_eq!(repr.payload_len, 8);
    assert_eq!(payload[0], 0);

    // Broadcasts are accepted just as unicast frames.
    let broadcast = frame(EthernetAddress::BROADCAST, EthernetProtocol::Unknown(0x1234), &[0; 46]);
    iface.device_mut().push_recv(&broadcast);
    assert_eq!(iface.poll(), Ok(true));
}
