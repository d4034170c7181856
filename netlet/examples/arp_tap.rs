//! Resolves a neighbor on a tap interface.
//!
//! # Usage
//!
//! The example opens a tap as a network device, answers all incoming ARP requests for its host
//! address and sends a single datagram to the peer, which requires resolving it first. Set up the
//! tap as for the `udp_echo_tap` example, then run:
//!
//!   > $ cargo run --example arp_tap -- tap0 10.0.0.1 02:00:00:00:00:01 10.0.0.2
//!
//! Watch the request and the released datagram with `tcpdump -i tap0`.
use std::io::{stdout, Write};
use std::net::Ipv4Addr;
use std::os::unix::io::AsRawFd;
use std::time::Duration;

use structopt::StructOpt;

use netlet::{Config, Interface};
use netlet::nic::sys::{sys_wait, TapInterface};
use netlet::wire::EthernetAddress;

#[derive(StructOpt)]
struct Args {
    name: String,
    host: Ipv4Addr,
    hostmac: EthernetAddress,
    peer: Ipv4Addr,
    #[structopt(default_value = "9")]
    port: u16,
}

fn main() {
    let Args { name, host, hostmac, peer, port } = Args::from_args();

    let tap = TapInterface::new(&name)
        .expect("Couldn't initialize interface");
    let mut iface = Interface::new(Config::new(hostmac, host.into()), tap)
        .expect("Couldn't announce address");

    iface.udp_send(b"discard me", port, peer.into(), port)
        .expect("Couldn't send datagram");

    let out = stdout();
    let mut out = out.lock();
    out.write_all(b"Started arp endpoint\n").unwrap();

    loop {
        let fd = iface.device().as_raw_fd();
        sys_wait(fd, Some(Duration::from_secs(1))).expect("Waiting on tap failed");

        let result = iface.poll();
        if let Ok(true) = result {
            out.write_all(b".").unwrap();
            out.flush().unwrap();
        }

        result.unwrap_or_else(|err| {
            panic!("Error during receive {:?} {:?}", err, iface.device_mut().last_err());
        });

        if !iface.is_resolving(peer.into()) {
            writeln!(out, "\n===ARP TABLE BEGIN===").unwrap();
            for neighbor in iface.neighbors() {
                writeln!(out, "{}", neighbor).unwrap();
            }
            writeln!(out, "===ARP TABLE  END ===").unwrap();
        }
    }
}
