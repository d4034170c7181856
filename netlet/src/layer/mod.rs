//! The process logic of protocol layers.
//!
//! ## Layering
//!
//! Each protocol layer is split into two parts; the packet logic contained in `wire` and the
//! processing part in this module. An endpoint represents the local state of a protocol: the
//! neighbor table of `arp`, the identification counter of `ip`, the open ports of `udp`. The
//! processing itself is implemented as methods of [`Interface`], which owns every endpoint
//! together with the device, so that the layers can call into each other in both directions.
//!
//! ## Receiving
//!
//! A received frame is moved upwards in a single [`Buffer`]. Every layer validates its header,
//! strips it, and hands the rest to the layer registered for the protocol number it found. Nothing
//! on the receiving path reports errors to the caller: malformed input is logged and dropped,
//! undeliverable datagrams are answered with ICMP errors towards their sender.
//!
//! ## Sending
//!
//! On the way down each layer prepends its header into the headroom of the buffer. The `ip` layer
//! may split a payload into fragments, each of which continues in its own buffer. The `arp` layer
//! either knows the hardware address of the destination or parks the packet until it does. Errors
//! on the sending path, such as a payload too large for the buffer, are returned to the caller.
//!
//! [`Interface`]: ../iface/struct.Interface.html
//! [`Buffer`]: ../storage/struct.Buffer.html
use core::fmt;
use alloc::vec::Vec;

pub mod arp;
pub mod eth;
pub mod icmp;
pub mod ip;
pub mod udp;

#[cfg(test)]
mod testing;

/// The result type of layer operations.
pub type Result<T> = core::result::Result<T, Error>;

/// The errors of sending operations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Error {
    /// The operation was not permitted.
    ///
    /// Returned when the device, endpoint, receiver or sender does not allow or implement an
    /// operation.
    Illegal,

    /// Not enough space for the requested packet.
    ///
    /// Returned when a payload does not fit the length fields of its headers, or a buffer has not
    /// enough room to prepend a header.
    BadSize,

    /// Unable to find a route towards the destination address.
    Unreachable,

    /// The action could not be completed because there were not enough resources.
    ///
    /// The main difference towards `Illegal` is that implies that it would have been legal with
    /// more resources.
    Exhausted,

    /// The device failed to receive or transmit.
    Device,
}

/// A standard wrapper for a function implementing receive traits.
///
/// Keeps the type alias overhead low by providing a single wrapper type that implements the
/// receive traits for all layers, where applicable.
pub struct FnHandler<F>(pub F);

/// A small protocol number to handler table.
///
/// Registration appends or overwrites, entries are never removed. The tables of this stack hold
/// two entries each so lookup is a linear scan.
#[derive(Clone, Debug)]
pub struct Registry<K, V> {
    entries: Vec<(K, V)>,
}

impl<K: PartialEq + Copy, V: Copy> Registry<K, V> {
    /// Create an empty registry.
    pub fn new() -> Self {
        Registry { entries: Vec::new() }
    }

    /// Register `value` for `key`, replacing an earlier registration.
    pub fn register(&mut self, key: K, value: V) {
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Find the handler registered for `key`.
    pub fn lookup(&self, key: K) -> Option<V> {
        self.entries.iter()
            .find(|(k, _)| *k == key)
            .map(|&(_, value)| value)
    }
}

impl<K: PartialEq + Copy, V: Copy> Default for Registry<K, V> {
    fn default() -> Self {
        Registry::new()
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Illegal => write!(f, "operation not permitted"),
            Error::BadSize => write!(f, "packet does not fit"),
            Error::Unreachable => write!(f, "destination unreachable"),
            Error::Exhausted => write!(f, "resources exhausted"),
            Error::Device => write!(f, "device failure"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error { }

/// Can convert from a wire error.
///
/// This indicates some layer tried to operate on a packet but failed.
impl From<crate::wire::Error> for Error {
    fn from(_: crate::wire::Error) -> Self {
        Error::Illegal
    }
}

/// Can convert from a buffer error.
///
/// One common cause is a lack of headroom to prepend a header.
impl From<crate::storage::BufferError> for Error {
    fn from(_: crate::storage::BufferError) -> Self {
        Error::BadSize
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn registry() {
        let mut registry = Registry::new();
        assert_eq!(registry.lookup(1u8), None);
        registry.register(1u8, 'a');
        registry.register(2u8, 'b');
        registry.register(1u8, 'c');
        assert_eq!(registry.lookup(1), Some('c'));
        assert_eq!(registry.lookup(2), Some('b'));
        assert_eq!(registry.lookup(3), None);
    }

    #[test]
    fn conversions() {
        use crate::storage::BufferError;
        assert_eq!(Error::from(BufferError::Overflow), Error::BadSize);
        assert_eq!(Error::from(crate::wire::Error::Truncated), Error::Illegal);
    }
}
