//! A stub nic whose frames come from and go to the caller.
//!
//! Useful for tests: inject frames with `push_recv`, drive the stack, then inspect what it tried to
//! transmit through `sent`. The clock only moves when told to.
use alloc::collections::VecDeque;
use alloc::vec::Vec;

use crate::time::{Duration, Instant};
use super::{copy_frame, Device, Result};

/// A device backed by in-memory queues and a manual clock.
#[derive(Debug, Default)]
pub struct External {
    /// Frames pending to be received, oldest first.
    inbound: VecDeque<Vec<u8>>,

    /// Every frame sent so far, in order of transmission.
    outbound: Vec<Vec<u8>>,

    /// The time reported to the stack.
    now: Instant,
}

impl External {
    /// A new external nic with nothing to receive, at time zero.
    pub fn new() -> Self {
        External::default()
    }

    /// Queue a frame to be received.
    pub fn push_recv(&mut self, frame: &[u8]) {
        self.inbound.push_back(frame.to_vec());
    }

    /// Remaining number of frames to receive.
    pub fn to_recv(&self) -> usize {
        self.inbound.len()
    }

    /// All frames sent since the last `take_sent`.
    pub fn sent(&self) -> &[Vec<u8>] {
        &self.outbound
    }

    /// Remove and return all sent frames.
    pub fn take_sent(&mut self) -> Vec<Vec<u8>> {
        core::mem::replace(&mut self.outbound, Vec::new())
    }

    /// Update the time reported to the stack.
    pub fn set_current_time(&mut self, instant: Instant) {
        self.now = instant;
    }

    /// Move the clock forward.
    pub fn advance(&mut self, duration: Duration) {
        self.now += duration;
    }
}

impl Device for External {
    fn recv(&mut self, frame: &mut [u8]) -> Result<usize> {
        match self.inbound.pop_front() {
            Some(queued) => Ok(copy_frame(&queued, frame)),
            None => Ok(0),
        }
    }

    fn send(&mut self, frame: &[u8]) -> Result<()> {
        self.outbound.push(frame.to_vec());
        Ok(())
    }

    fn timestamp(&self) -> Instant {
        self.now
    }
}
