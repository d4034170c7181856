//! Owned packet memory.
//!
//! A packet travels through the stack in a single [`Buffer`]. Each layer on the way down prepends
//! its header into the reserved headroom and each layer on the way up strips its own header again,
//! so the payload bytes are never moved between layers.
//!
//! [`Buffer`]: struct.Buffer.html
mod buffer;

pub use self::buffer::{
    Buffer,
    Error as BufferError,
    HEADROOM,
    TAILROOM};
