//! The ICMP layer.
//!
//! Answers echo requests and generates destination unreachable reports for datagrams that could
//! not be delivered. Other messages are accepted and ignored. The layer has no state of its own.
mod endpoint;
#[cfg(test)]
mod tests;

/// The number of payload octets of an offending datagram quoted in an error report.
pub const QUOTED_PAYLOAD_LEN: usize = 8;
