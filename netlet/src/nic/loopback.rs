//! Implementation of a software loop-back device.
use alloc::collections::VecDeque;
use alloc::vec::Vec;

use crate::layer::Error;
use crate::time::Instant;
use super::{copy_frame, Device, Result};

/// A software loop-back device.
///
/// Every frame sent is received again, in order. Holds at most a fixed number of frames in flight.
#[derive(Debug)]
pub struct Loopback {
    queue: VecDeque<Vec<u8>>,
    capacity: usize,
    now: Instant,
}

impl Loopback {
    /// Create a loop-back device holding up to `capacity` frames.
    pub fn new(capacity: usize) -> Self {
        Loopback {
            queue: VecDeque::with_capacity(capacity),
            capacity,
            now: Instant::default(),
        }
    }

    /// Update the time reported to the stack.
    pub fn set_current_time(&mut self, instant: Instant) {
        self.now = instant;
    }
}

impl Device for Loopback {
    fn recv(&mut self, frame: &mut [u8]) -> Result<usize> {
        match self.queue.pop_front() {
            Some(queued) => Ok(copy_frame(&queued, frame)),
            None => Ok(0),
        }
    }

    fn send(&mut self, frame: &[u8]) -> Result<()> {
        if self.queue.len() == self.capacity {
            return Err(Error::Exhausted);
        }
        self.queue.push_back(frame.to_vec());
        Ok(())
    }

    fn timestamp(&self) -> Instant {
        self.now
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn loops() {
        let mut nic = Loopback::new(1);
        let mut buffer = [0; 8];
        assert_eq!(nic.send(&[0xab; 3]), Ok(()));
        assert_eq!(nic.send(&[0xcd; 3]), Err(Error::Exhausted));
        assert_eq!(nic.recv(&mut buffer), Ok(3));
        assert_eq!(&buffer[..3], &[0xab; 3]);
        assert_eq!(nic.recv(&mut buffer), Ok(0));
    }
}
