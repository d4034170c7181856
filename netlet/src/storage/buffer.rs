use core::fmt;
use alloc::vec::Vec;

/// Octets reserved in front of the data region of a new buffer.
///
/// Sufficient for the Ethernet, IPv4 and UDP headers combined.
pub const HEADROOM: usize = 64;

/// Octets reserved behind the data region of a new buffer.
///
/// Sufficient to pad any frame to the Ethernet minimum payload.
pub const TAILROOM: usize = 64;

/// A growable packet buffer with reserved room on both sides.
///
/// ```text
/// |<-- headroom -->|<-- data (head..tail) -->|<-- tailroom -->|
/// ```
///
/// Headers are prepended with [`add_header`] and stripped with [`remove_header`], trailing padding
/// is handled by [`add_padding`] and [`remove_padding`]. None of these move the data. Stripping a
/// header and adding it back afterwards restores the very same octets, which allows an inbound
/// layer to hand the complete original datagram to an error report.
///
/// [`add_header`]: #method.add_header
/// [`remove_header`]: #method.remove_header
/// [`add_padding`]: #method.add_padding
/// [`remove_padding`]: #method.remove_padding
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Buffer {
    storage: Vec<u8>,
    head: usize,
    tail: usize,
}

/// Error variants for moving the data boundaries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Error {
    /// Not enough head- or tailroom to grow the data region.
    Overflow,

    /// The data region is shorter than the amount to remove.
    Underflow,
}

impl Buffer {
    /// A zeroed buffer of `len` data octets with the default head- and tailroom.
    pub fn new(len: usize) -> Self {
        Buffer::with_room(HEADROOM, len, TAILROOM)
    }

    /// A zeroed buffer with explicit room on both sides.
    pub fn with_room(headroom: usize, len: usize, tailroom: usize) -> Self {
        Buffer {
            storage: alloc::vec![0; headroom + len + tailroom],
            head: headroom,
            tail: headroom + len,
        }
    }

    /// Copy `data` into a new buffer with the default head- and tailroom.
    pub fn from_slice(data: &[u8]) -> Self {
        let mut buffer = Buffer::new(data.len());
        buffer.as_mut_slice().copy_from_slice(data);
        buffer
    }

    /// Re-initialize as a copy of the first `len` octets of `src`.
    ///
    /// The head- and tailroom of `self` are reset to their defaults. Fails, without modifying
    /// anything, when `src` holds fewer than `len` octets.
    pub fn copy(&mut self, src: &Buffer, len: usize) -> Result<(), Error> {
        let data = src.as_slice().get(..len).ok_or(Error::Underflow)?;
        self.storage.clear();
        self.storage.resize(HEADROOM + len + TAILROOM, 0);
        self.head = HEADROOM;
        self.tail = HEADROOM + len;
        self.storage[self.head..self.tail].copy_from_slice(data);
        Ok(())
    }

    /// Reset to `len` data octets with the default room, reusing the allocation.
    ///
    /// The content of the data region is unspecified afterwards.
    pub fn reset(&mut self, len: usize) {
        self.storage.resize(HEADROOM + len + TAILROOM, 0);
        self.head = HEADROOM;
        self.tail = HEADROOM + len;
    }

    /// Grow the data region by `len` octets at the front.
    ///
    /// The new octets are whatever the headroom held before. In particular, a header removed
    /// with `remove_header` reappears unchanged.
    pub fn add_header(&mut self, len: usize) -> Result<(), Error> {
        if len > self.headroom() {
            return Err(Error::Overflow);
        }
        self.head -= len;
        Ok(())
    }

    /// Shrink the data region by `len` octets at the front.
    pub fn remove_header(&mut self, len: usize) -> Result<(), Error> {
        if len > self.len() {
            return Err(Error::Underflow);
        }
        self.head += len;
        Ok(())
    }

    /// Grow the data region by `len` zeroed octets at the back.
    pub fn add_padding(&mut self, len: usize) -> Result<(), Error> {
        if len > self.tailroom() {
            return Err(Error::Overflow);
        }
        let end = self.tail + len;
        for byte in &mut self.storage[self.tail..end] {
            *byte = 0;
        }
        self.tail = end;
        Ok(())
    }

    /// Shrink the data region by `len` octets at the back.
    pub fn remove_padding(&mut self, len: usize) -> Result<(), Error> {
        if len > self.len() {
            return Err(Error::Underflow);
        }
        self.tail -= len;
        Ok(())
    }

    /// Number of data octets.
    pub fn len(&self) -> usize {
        self.tail - self.head
    }

    /// Whether the data region is empty.
    pub fn is_empty(&self) -> bool {
        self.head == self.tail
    }

    /// Total number of octets, including head- and tailroom.
    pub fn capacity(&self) -> usize {
        self.storage.len()
    }

    /// Octets available in front of the data.
    pub fn headroom(&self) -> usize {
        self.head
    }

    /// Octets available behind the data.
    pub fn tailroom(&self) -> usize {
        self.storage.len() - self.tail
    }

    /// The data region.
    pub fn as_slice(&self) -> &[u8] {
        &self.storage[self.head..self.tail]
    }

    /// The data region, mutably.
    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.storage[self.head..self.tail]
    }
}

impl AsRef<[u8]> for Buffer {
    fn as_ref(&self) -> &[u8] {
        self.as_slice()
    }
}

impl AsMut<[u8]> for Buffer {
    fn as_mut(&mut self) -> &mut [u8] {
        self.as_mut_slice()
    }
}

impl fmt::Debug for Buffer {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Buffer")
            .field("headroom", &self.headroom())
            .field("data", &self.as_slice())
            .field("tailroom", &self.tailroom())
            .finish()
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Overflow => write!(f, "not enough room in buffer"),
            Error::Underflow => write!(f, "buffer holds too few octets"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error { }

#[cfg(test)]
mod test {
    use super::*;

    static PAYLOAD_BYTES: [u8; 6] = [0xaa, 0x00, 0x00, 0xff, 0x12, 0x34];

    fn assert_room(buffer: &Buffer) {
        assert_eq!(buffer.headroom() + buffer.len() + buffer.tailroom(), buffer.capacity());
    }

    #[test]
    fn test_new() {
        let buffer = Buffer::new(10);
        assert_eq!(buffer.len(), 10);
        assert_eq!(buffer.headroom(), HEADROOM);
        assert_eq!(buffer.tailroom(), TAILROOM);
        assert!(buffer.as_slice().iter().all(|&b| b == 0));
        assert_room(&buffer);
    }

    #[test]
    fn test_header() {
        let mut buffer = Buffer::from_slice(&PAYLOAD_BYTES);
        assert_eq!(buffer.add_header(4), Ok(()));
        assert_eq!(buffer.len(), 10);
        buffer.as_mut_slice()[..4].copy_from_slice(&[1, 2, 3, 4]);
        assert_eq!(&buffer.as_slice()[4..], &PAYLOAD_BYTES[..]);
        assert_room(&buffer);

        assert_eq!(buffer.remove_header(4), Ok(()));
        assert_eq!(buffer.as_slice(), &PAYLOAD_BYTES[..]);

        // The removed header is still in place.
        assert_eq!(buffer.add_header(4), Ok(()));
        assert_eq!(&buffer.as_slice()[..4], &[1, 2, 3, 4]);
    }

    #[test]
    fn test_header_bounds() {
        let mut buffer = Buffer::with_room(2, 3, 0);
        assert_eq!(buffer.add_header(3), Err(Error::Overflow));
        assert_eq!(buffer.len(), 3);
        assert_eq!(buffer.remove_header(4), Err(Error::Underflow));
        assert_eq!(buffer.len(), 3);
        assert_eq!(buffer.remove_header(3), Ok(()));
        assert!(buffer.is_empty());
        assert_room(&buffer);
    }

    #[test]
    fn test_padding() {
        let mut buffer = Buffer::from_slice(&PAYLOAD_BYTES);
        assert_eq!(buffer.remove_padding(2), Ok(()));
        assert_eq!(buffer.as_slice(), &PAYLOAD_BYTES[..4]);

        // New padding is always zeroed, even where data was before.
        assert_eq!(buffer.add_padding(4), Ok(()));
        assert_eq!(&buffer.as_slice()[4..], &[0, 0, 0, 0]);
        assert_room(&buffer);

        assert_eq!(buffer.add_padding(TAILROOM), Err(Error::Overflow));
        assert_eq!(buffer.remove_padding(9), Err(Error::Underflow));
        assert_eq!(buffer.len(), 8);
    }

    #[test]
    fn test_copy() {
        let src = Buffer::from_slice(&PAYLOAD_BYTES);
        let mut dst = Buffer::with_room(0, 1, 0);
        assert_eq!(dst.copy(&src, 4), Ok(()));
        assert_eq!(dst.as_slice(), &PAYLOAD_BYTES[..4]);
        assert_eq!(dst.headroom(), HEADROOM);
        assert_room(&dst);

        assert_eq!(dst.copy(&src, 7), Err(Error::Underflow));
        assert_eq!(dst.as_slice(), &PAYLOAD_BYTES[..4]);
    }

    #[test]
    fn test_reset() {
        let mut buffer = Buffer::from_slice(&PAYLOAD_BYTES);
        buffer.remove_header(2).unwrap();
        buffer.reset(100);
        assert_eq!(buffer.len(), 100);
        assert_eq!(buffer.headroom(), HEADROOM);
        assert_eq!(buffer.tailroom(), TAILROOM);
    }
}
