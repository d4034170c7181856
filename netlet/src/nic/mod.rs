//! Encapsulates a network interface card.
//!
//! Also permits software emulation or implementation of one as well, of course. The stack talks to
//! its card through the [`Device`] trait only: frames in, frames out, and a clock to stamp them.
//!
//! [`Device`]: trait.Device.html
pub mod external;
pub mod loopback;

#[cfg(feature = "sys")]
#[path="sys/mod.rs"]
mod sys_internal;

use crate::layer::Result;
use crate::time::Instant;

pub use self::external::External;
pub use self::loopback::Loopback;

#[cfg(feature = "sys")]
pub use self::sys_internal::exports as sys;

/// A layer 2 device exchanging complete Ethernet frames.
///
/// Frames passed in either direction start with the Ethernet header and carry no trailing frame
/// check sequence.
pub trait Device {
    /// Receive a single frame into `frame`.
    ///
    /// Must not block. Returns the length of the received frame, or `Ok(0)` when no frame is
    /// pending. A frame longer than the buffer is truncated to it.
    fn recv(&mut self, frame: &mut [u8]) -> Result<usize>;

    /// Transmit a single frame.
    fn send(&mut self, frame: &[u8]) -> Result<()>;

    /// The current time of the device clock.
    ///
    /// Should be monotonically increasing. Table expiry is measured against it, so a clock that
    /// jumps backwards makes stale entries live longer.
    fn timestamp(&self) -> Instant;
}

impl<D: Device + ?Sized> Device for &'_ mut D {
    fn recv(&mut self, frame: &mut [u8]) -> Result<usize> {
        (**self).recv(frame)
    }

    fn send(&mut self, frame: &[u8]) -> Result<()> {
        (**self).send(frame)
    }

    fn timestamp(&self) -> Instant {
        (**self).timestamp()
    }
}

/// Copy a queued frame into a receive buffer, truncating it to the buffer length.
fn copy_frame(queued: &[u8], frame: &mut [u8]) -> usize {
    let len = queued.len().min(frame.len());
    frame[..len].copy_from_slice(&queued[..len]);
    len
}
