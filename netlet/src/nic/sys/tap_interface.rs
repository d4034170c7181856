// Copyright (C) 2016 whitequark@whitequark.org
// Copyright (C) 2019 Andreas Molzer <andreas.molzer@tum.de>
//
// in large parts from `smoltcp` originally distributed under 0-clause BSD
use std::os::unix::io::{RawFd, AsRawFd};

use libc;
use super::{now, Errno, FdResult, IoLenResult, LibcResult, ifreq};

use crate::layer::{Error, Result};
use crate::nic::Device;
use crate::time::Instant;

/// A static descriptor for interacting with a tap interface.
///
/// Contains the file descriptor and a pre-filled `ifreq` structure with the interface name that is
/// required for `ioctl` calls. This offers the raw methods for reading and writing, wrap it in a
/// [`TapInterface`] to use it as a `nic::Device`.
///
/// [`TapInterface`]: struct.TapInterface.html
#[derive(Debug)]
pub struct TapInterfaceDesc {
    lower: libc::c_int,
    ifreq: ifreq
}

/// A tap interface usable as a network device.
///
/// Receiving never blocks, use `sys_wait` on its file descriptor to sleep until a frame arrives.
/// Failed system calls are reported as `layer::Error::Device` and the original errno is kept for
/// inspection through `last_err`.
#[derive(Debug)]
pub struct TapInterface {
    inner: TapInterfaceDesc,
    last_err: Option<Errno>,
}

impl AsRawFd for TapInterfaceDesc {
    fn as_raw_fd(&self) -> RawFd {
        self.lower
    }
}

impl AsRawFd for TapInterface {
    fn as_raw_fd(&self) -> RawFd {
        self.inner.as_raw_fd()
    }
}

static TAP_PATH: &'static [u8] = b"/dev/net/tun\0";

impl TapInterfaceDesc {
    /// Try to open a socket for the named interface.
    ///
    /// Note that this does *not* yet set the interface for the file descriptor, it only creates
    /// the necessary structures involved in doing so. Call [`attach_interface`] afterwards.
    ///
    /// [`attach_interface`]: #method.attach_interface
    pub fn new(name: &str) -> core::result::Result<TapInterfaceDesc, Errno> {
        let lower = unsafe {
            libc::open(
                TAP_PATH.as_ptr() as *const libc::c_char,
                libc::O_RDWR | libc::O_NONBLOCK)
        };

        FdResult(lower).errno()?;

        Ok(TapInterfaceDesc {
            lower,
            ifreq: ifreq::new(name),
        })
    }

    /// Update the file descriptor to the named interface.
    ///
    /// See `ioctl` with `TUNSETIFF` for details on errors.
    pub fn attach_interface(&mut self) -> core::result::Result<(), Errno> {
        self.ifreq.attach_tap(self.lower)
    }

    /// Try to find the mtu of the tap.
    ///
    /// Works by opening an `AF_INET/PROTO_IP` socket and querying the mtu of the named interface.
    pub fn interface_mtu(&mut self) -> core::result::Result<usize, Errno> {
        let lower = unsafe {
            libc::socket(libc::AF_INET, libc::SOCK_DGRAM, libc::IPPROTO_IP)
        };

        FdResult(lower).errno()?;

        let mtu = self.ifreq.mtu(lower);

        unsafe { libc::close(lower); }

        mtu
    }

    /// Receive a single message on the tap into the buffer.
    pub fn recv(&mut self, buffer: &mut [u8]) -> core::result::Result<usize, Errno> {
        let len = unsafe {
            libc::read(
                self.lower,
                buffer.as_mut_ptr() as *mut libc::c_void,
                buffer.len())
        };
        IoLenResult(len).errno()?;
        Ok(len as usize)
    }

    /// Send a single message onto the tap from the buffer.
    pub fn send(&mut self, buffer: &[u8]) -> core::result::Result<usize, Errno> {
        let len = unsafe {
            libc::write(
                self.lower,
                buffer.as_ptr() as *const libc::c_void,
                buffer.len())
        };
        IoLenResult(len).errno()?;
        Ok(len as usize)
    }
}

impl Drop for TapInterfaceDesc {
    fn drop(&mut self) {
        unsafe { libc::close(self.lower); }
    }
}

impl TapInterface {
    /// Open a tap interface by name.
    pub fn new(name: &str) -> core::result::Result<Self, Errno> {
        let inner = TapInterfaceDesc::new(name)?;
        Self::with_descriptor(inner)
    }

    /// Wrap an existing descriptor into a device.
    pub fn with_descriptor(mut inner: TapInterfaceDesc) -> core::result::Result<Self, Errno> {
        inner.attach_interface()?;
        Ok(TapInterface {
            inner,
            last_err: None,
        })
    }

    /// Access the underlying descriptor.
    pub fn descriptor(&mut self) -> &mut TapInterfaceDesc {
        &mut self.inner
    }

    /// Take the last io error returned by the OS.
    pub fn last_err(&mut self) -> Option<Errno> {
        self.last_err.take()
    }

    fn store_err(&mut self, err: Errno) -> Error {
        net_debug!("tap: system call failed: {}", err);
        self.last_err = Some(err);
        Error::Device
    }
}

impl Device for TapInterface {
    fn recv(&mut self, frame: &mut [u8]) -> Result<usize> {
        match self.inner.recv(frame) {
            Ok(len) => Ok(len),
            Err(ref err) if err.would_block() => Ok(0),
            Err(err) => Err(self.store_err(err)),
        }
    }

    fn send(&mut self, frame: &[u8]) -> Result<()> {
        match self.inner.send(frame) {
            Ok(_) => Ok(()),
            Err(err) => Err(self.store_err(err)),
        }
    }

    /// The monotonic system clock.
    ///
    /// `CLOCK_MONOTONIC` is always available on Linux, a failure reads as time zero.
    fn timestamp(&self) -> Instant {
        now().unwrap_or_default()
    }
}
