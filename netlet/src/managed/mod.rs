//! Containers with managed lifetimes.
//!
//! The tables of the stack forget their entries after a while, the neighbor cache as well as the
//! packets waiting for address resolution. [`TtlMap`] implements that forgetting lazily: there is
//! no timer, expired entries are only discarded when they are looked at.
//!
//! [`TtlMap`]: struct.TtlMap.html
mod ttl;

pub use self::ttl::TtlMap;
