// Copyright (C) 2016 whitequark@whitequark.org
// Copyright (C) 2019 Andreas Molzer <andreas.molzer@tum.de>
//
// in large parts from `smoltcp` originally distributed under 0-clause BSD
use super::{ifreq, Errno, LibcResult, IoctlResult};
use libc;

const SIOCGIFMTU: libc::Ioctl = 0x8921;
const TUNSETIFF:  libc::Ioctl = 0x400454CA;
const IFF_TAP:    libc::c_int = 0x0002;
const IFF_NO_PI:  libc::c_int = 0x1000;

/// The kernel `struct ifreq`: the name followed by a union of at most 24 bytes.
#[repr(C)]
struct Request<T: Copy> {
    interface: ifreq,
    data: T,
    _union_tail: [u8; 24],
}

impl ifreq {
    /// Issue an interface request with `data` as the start of the union.
    ///
    /// Returns the union value as written back by the kernel.
    fn request<T: Copy>(&self, fd: libc::c_int, code: libc::Ioctl, data: T) -> Result<T, Errno> {
        let mut request = Request {
            interface: *self,
            data,
            _union_tail: [0; 24],
        };

        let res = unsafe {
            libc::ioctl(fd, code, &mut request as *mut Request<T>)
        };

        IoctlResult(res).errno()?;

        Ok(request.data)
    }

    /// Attach `fd`, an open `/dev/net/tun`, to the named tap, creating it if necessary.
    pub(super) fn attach_tap(&self, fd: libc::c_int) -> Result<(), Errno> {
        let flags = (IFF_TAP | IFF_NO_PI) as libc::c_short;
        self.request(fd, TUNSETIFF, flags).map(drop)
    }

    /// Query the mtu of the named interface through any socket `fd`.
    pub(super) fn mtu(&self, fd: libc::c_int) -> Result<usize, Errno> {
        self.request(fd, SIOCGIFMTU, 0 as libc::c_int).map(|mtu| mtu as usize)
    }
}
