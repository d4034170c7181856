//! Echoes UDP datagrams on a tap interface.
//!
//! # Usage
//!
//! The example opens a tap as network device, answers ARP requests and pings for its address and
//! sends back every datagram received on the echo port. It periodically prints its neighbor
//! table.
//!
//! The following steps are necessary to set the example up (likely requires root or sudo):
//!
//! 1. Setup the tap interface, named `tap0` here:
//!
//!   > $ ip tuntap add mode tap name tap0
//! 2. Assign an address on the host system
//!
//!   > $ ip addr add 10.0.0.2/24 dev tap0
//! 3. Bring up the interface on the host
//!
//!   > $ ip link set up dev tap0
//! 4. You no longer require root. Start the example.
//!
//!   > $ cargo run --example udp_echo_tap -- tap0 10.0.0.1 02:00:00:00:00:01
//! 5. Send a datagram from the host.
//!
//!   > $ echo hello | nc -u 10.0.0.1 7
use std::net::Ipv4Addr;
use std::os::unix::io::AsRawFd;
use std::time::Duration;

use structopt::StructOpt;

use netlet::{Config, Interface};
use netlet::nic::sys::{sys_wait, TapInterface};
use netlet::wire::EthernetAddress;

#[derive(StructOpt)]
struct Args {
    /// Name of the tap device.
    name: String,
    host: Ipv4Addr,
    hostmac: EthernetAddress,
    /// The port to echo on.
    #[structopt(default_value = "7")]
    port: u16,
    /// Log every processed frame.
    #[structopt(short = "v", long = "verbose")]
    verbose: bool,
}

struct StdoutLogger;

impl log::Log for StdoutLogger {
    fn enabled(&self, _: &log::Metadata) -> bool {
        true
    }

    fn log(&self, record: &log::Record) {
        println!("[{}] {}", record.level(), record.args());
    }

    fn flush(&self) { }
}

static LOGGER: StdoutLogger = StdoutLogger;

fn main() {
    let args = Args::from_args();
    log::set_logger(&LOGGER).expect("Logger already set");
    log::set_max_level(if args.verbose {
        log::LevelFilter::Trace
    } else {
        log::LevelFilter::Debug
    });

    let tap = TapInterface::new(&args.name)
        .expect("Couldn't initialize interface");
    let config = Config::new(args.hostmac, args.host.into());
    let mut iface = Interface::new(config, tap)
        .expect("Couldn't announce address");

    let port = args.port;
    iface.udp_open_with(port, |mut datagram| {
        let payload = datagram.payload().to_vec();
        println!("{}:{} sent {} octets", datagram.src_addr(), datagram.src_port(), payload.len());
        if let Err(err) = datagram.reply(&payload) {
            println!("Failed to echo: {}", err);
        }
    });

    println!("Echoing on {}:{}", args.host, port);

    loop {
        let fd = iface.device().as_raw_fd();
        sys_wait(fd, Some(Duration::from_secs(5))).expect("Waiting on tap failed");

        match iface.poll() {
            Ok(true) => continue,
            Ok(false) => {},
            Err(err) => panic!("Error during receive {:?} {:?}", err, iface.device_mut().last_err()),
        }

        println!("===ARP TABLE BEGIN===");
        for neighbor in iface.neighbors() {
            println!("{}", neighbor);
        }
        println!("===ARP TABLE  END ===");
    }
}
