//! A minimal network stack for a single Ethernet interface.
//!
//! ## Table of contents
//!
//! 1. [Design](#design)
//! 2. [The wire module](wire/index.html)
//! 3. [The layers](layer/index.html)
//!    1. [Receiving](layer/index.html#receiving)
//!    1. [Sending](layer/index.html#sending)
//! 4. [The interface](iface/struct.Interface.html)
//! 5. [Network interfaces](nic/index.html)
//! 6. Internals
//!    1. [The managed module](managed/index.html)
//!    2. [The storage module](storage/index.html)
//!
//! ## Design
//!
//! The stack speaks Ethernet II, ARP, IPv4, ICMP and UDP with one hardware and one protocol
//! address. There is no routing: every destination is assumed to be on the local link.
//!
//! Processing is driven entirely by the caller. Each call to [`Interface::poll`] takes at most one
//! frame from the device and runs it through all layers before returning, possibly sending answers
//! on the way. Nothing happens in the background, not even the expiry of neighbor table entries,
//! which is evaluated lazily against the clock of the device.
//!
//! Applications hook into the UDP layer by binding handlers to ports. A handler receives each
//! datagram together with the means to answer it.
//!
//! ```
//! use netlet::{Config, Interface};
//! use netlet::nic::External;
//! use netlet::wire::{EthernetAddress, Ipv4Address};
//!
//! let config = Config::new(
//!     EthernetAddress([0x02, 0x00, 0x00, 0x00, 0x00, 0x01]),
//!     Ipv4Address::new(10, 0, 0, 1));
//! let mut iface = Interface::new(config, External::new()).unwrap();
//!
//! // Unresolved, so the datagram waits while the destination is asked for.
//! iface.udp_send(b"hello", 4000, Ipv4Address::new(10, 0, 0, 2), 4000).unwrap();
//! assert!(iface.is_resolving(Ipv4Address::new(10, 0, 0, 2)));
//! ```
//!
//! The `wire` module owes much of its structure to [`smoltcp`].
//!
//! [`Interface::poll`]: iface/struct.Interface.html#method.poll
//! [`smoltcp`]: https://github.com/m-labs/smoltcp
#![warn(missing_docs)]

// tests should be able to use `std`
#![cfg_attr(all(
    not(feature = "std"),
    not(test)),
no_std)]

extern crate alloc;

#[macro_use] mod macros;

pub mod config;
pub mod iface;
pub mod layer;
pub mod managed;
pub mod nic;
pub mod storage;
pub mod time;
pub mod wire;

pub use self::config::Config;
pub use self::iface::Interface;
