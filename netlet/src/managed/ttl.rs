use alloc::collections::BTreeMap;

use crate::time::{Duration, Expiration, Instant};

/// A map whose entries expire a fixed time after their last update.
///
/// An entry written at `t` stays visible while `now <= t + ttl`. Expired entries are evicted
/// when a lookup or a traversal encounters them, the map never consults a clock on its own. Each
/// operation that may evict is passed the current time by the caller.
///
/// ```
/// use netlet::managed::TtlMap;
/// use netlet::time::{Duration, Instant};
///
/// let mut map = TtlMap::new(Some(Duration::from_secs(1)));
/// map.set(1u8, "one", Instant::from_millis(0));
/// assert_eq!(map.get(&1, Instant::from_millis(1_000)), Some(&"one"));
/// assert_eq!(map.get(&1, Instant::from_millis(1_001)), None);
/// ```
#[derive(Clone, Debug)]
pub struct TtlMap<K: Ord, V> {
    entries: BTreeMap<K, Entry<V>>,
    ttl: Option<Duration>,
}

#[derive(Clone, Debug)]
struct Entry<V> {
    value: V,
    updated: Instant,
}

impl<V> Entry<V> {
    fn is_alive(&self, ttl: Option<Duration>, now: Instant) -> bool {
        Expiration::after(self.updated, ttl).is_alive(now)
    }
}

impl<K: Ord, V> TtlMap<K, V> {
    /// Create an empty map.
    ///
    /// With a `ttl` of `None` entries never expire.
    pub fn new(ttl: Option<Duration>) -> Self {
        TtlMap {
            entries: BTreeMap::new(),
            ttl,
        }
    }

    /// The lifetime of an entry after its last update.
    pub fn ttl(&self) -> Option<Duration> {
        self.ttl
    }

    /// Insert or overwrite the value of `key` and refresh its timestamp.
    ///
    /// Returns the previous value, whether or not it had expired.
    pub fn set(&mut self, key: K, value: V, now: Instant) -> Option<V> {
        self.entries
            .insert(key, Entry { value, updated: now })
            .map(|old| old.value)
    }

    /// Look up the live value of `key`.
    pub fn get(&mut self, key: &K, now: Instant) -> Option<&V> {
        self.entry(key, now).map(|(value, _)| value)
    }

    /// Look up the live value of `key` mutably, without refreshing it.
    pub fn get_mut(&mut self, key: &K, now: Instant) -> Option<&mut V> {
        self.evict(key, now);
        self.entries.get_mut(key).map(|entry| &mut entry.value)
    }

    /// Look up the live value of `key` together with the time of its last update.
    pub fn entry(&mut self, key: &K, now: Instant) -> Option<(&V, Instant)> {
        self.evict(key, now);
        self.entries.get(key).map(|entry| (&entry.value, entry.updated))
    }

    /// Check if a live value for `key` exists.
    pub fn contains(&mut self, key: &K, now: Instant) -> bool {
        self.entry(key, now).is_some()
    }

    /// Remove `key` regardless of its age.
    pub fn delete(&mut self, key: &K) -> Option<V> {
        self.entries.remove(key).map(|entry| entry.value)
    }

    /// Remove `key`, returning its value only if it was still live.
    pub fn take(&mut self, key: &K, now: Instant) -> Option<V> {
        let ttl = self.ttl;
        self.entries.remove(key)
            .filter(|entry| entry.is_alive(ttl, now))
            .map(|entry| entry.value)
    }

    /// Evict all expired entries, then visit the remaining ones in key order.
    pub fn for_each(&mut self, now: Instant, mut visitor: impl FnMut(&K, &V, Instant)) {
        self.purge(now);
        for (key, entry) in self.entries.iter() {
            visitor(key, &entry.value, entry.updated)
        }
    }

    /// Evict all expired entries.
    pub fn purge(&mut self, now: Instant) {
        let ttl = self.ttl;
        self.entries.retain(|_, entry| entry.is_alive(ttl, now));
    }

    /// The number of stored entries, including expired ones not yet evicted.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no entries, live or expired, are stored.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn evict(&mut self, key: &K, now: Instant) {
        let ttl = self.ttl;
        let expired = match self.entries.get(key) {
            Some(entry) => !entry.is_alive(ttl, now),
            None => return,
        };

        if expired {
            self.entries.remove(key);
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use alloc::vec::Vec;

    fn secs(secs: u64) -> Option<Duration> {
        Some(Duration::from_secs(secs))
    }

    #[test]
    fn test_set_get() {
        let mut map = TtlMap::new(secs(60));
        let now = Instant::from_secs(5);
        assert_eq!(map.set(1, 'a', now), None);
        assert_eq!(map.get(&1, now), Some(&'a'));
        assert_eq!(map.get(&2, now), None);
        assert_eq!(map.set(1, 'b', now), Some('a'));
        assert_eq!(map.get(&1, now), Some(&'b'));
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_expiry_boundary() {
        let mut map = TtlMap::new(secs(1));
        map.set(1, (), Instant::from_millis(0));
        assert!(map.contains(&1, Instant::from_millis(1_000)));
        assert!(!map.contains(&1, Instant::from_millis(1_001)));
        // Evicted by the failed lookup.
        assert!(map.is_empty());
    }

    #[test]
    fn test_refresh() {
        let mut map = TtlMap::new(secs(1));
        map.set(1, 'a', Instant::from_millis(0));
        map.set(1, 'a', Instant::from_millis(900));
        assert_eq!(map.entry(&1, Instant::from_millis(1_500)), Some((&'a', Instant::from_millis(900))));
    }

    #[test]
    fn test_never_expire() {
        let mut map = TtlMap::new(None);
        map.set(1, 'a', Instant::from_millis(0));
        assert_eq!(map.get(&1, Instant::from_secs(1_000_000)), Some(&'a'));
    }

    #[test]
    fn test_take() {
        let mut map = TtlMap::new(secs(1));
        map.set(1, 'a', Instant::from_millis(0));
        map.set(2, 'b', Instant::from_millis(0));
        assert_eq!(map.take(&1, Instant::from_millis(500)), Some('a'));
        assert_eq!(map.take(&1, Instant::from_millis(500)), None);
        assert_eq!(map.take(&2, Instant::from_millis(2_000)), None);
        assert!(map.is_empty());
    }

    #[test]
    fn test_delete() {
        let mut map = TtlMap::new(secs(1));
        map.set(1, 'a', Instant::from_millis(0));
        assert_eq!(map.delete(&1), Some('a'));
        assert_eq!(map.delete(&1), None);
    }

    #[test]
    fn test_for_each() {
        let mut map = TtlMap::new(secs(10));
        map.set(3, 'c', Instant::from_secs(5));
        map.set(1, 'a', Instant::from_secs(0));
        map.set(2, 'b', Instant::from_secs(6));

        let mut seen = Vec::new();
        map.for_each(Instant::from_secs(12), |&key, &value, updated| {
            seen.push((key, value, updated))
        });
        assert_eq!(seen, [
            (2, 'b', Instant::from_secs(6)),
            (3, 'c', Instant::from_secs(5)),
        ]);
        assert_eq!(map.len(), 2);
    }
}
