use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use anyhow::Result;

struct Slot<V> {
    value: Option<(Instant, V)>,
}

/// Bounded time-to-live memo for upstream responses. An explicit component
/// handed to the provider, not process-global state.
///
/// Each key owns a slot lock, so a miss triggers exactly one fetch per
/// distinct key while fetches for different keys proceed in parallel.
pub struct TtlCache<K, V> {
    ttl: Duration,
    capacity: usize,
    slots: Mutex<HashMap<K, Arc<Mutex<Slot<V>>>>>,
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    pub fn new(ttl: Duration, capacity: usize) -> Self {
        Self {
            ttl,
            capacity: capacity.max(1),
            slots: Mutex::new(HashMap::new()),
        }
    }

    pub fn get(&self, key: &K) -> Option<V> {
        let slot = {
            let slots = self.slots.lock().expect("cache lock poisoned");
            slots.get(key).cloned()
        }?;
        let guard = slot.lock().expect("cache slot lock poisoned");
        match &guard.value {
            Some((fetched_at, value)) if fetched_at.elapsed() < self.ttl => Some(value.clone()),
            _ => None,
        }
    }

    /// Fresh value for `key`, fetching through `fetch` when the entry is
    /// missing or expired. Concurrent callers of the same key serialize on
    /// the slot, so only the first performs the fetch. A failed fetch
    /// leaves the slot empty and is returned to the caller.
    pub fn get_or_fetch(&self, key: &K, fetch: impl FnOnce() -> Result<V>) -> Result<V> {
        let slot = self.slot(key);
        let mut guard = slot.lock().expect("cache slot lock poisoned");
        if let Some((fetched_at, value)) = &guard.value
            && fetched_at.elapsed() < self.ttl
        {
            return Ok(value.clone());
        }

        let value = fetch()?;
        guard.value = Some((Instant::now(), value.clone()));
        drop(guard);
        self.enforce_capacity();
        Ok(value)
    }

    fn slot(&self, key: &K) -> Arc<Mutex<Slot<V>>> {
        let mut slots = self.slots.lock().expect("cache lock poisoned");
        slots
            .entry(key.clone())
            .or_insert_with(|| Arc::new(Mutex::new(Slot { value: None })))
            .clone()
    }

    /// Drop expired entries first, then the stalest, until within bounds.
    fn enforce_capacity(&self) {
        let mut slots = self.slots.lock().expect("cache lock poisoned");
        if slots.len() <= self.capacity {
            return;
        }

        let mut stamped: Vec<(K, Option<Instant>)> = Vec::with_capacity(slots.len());
        for (key, slot) in slots.iter() {
            // Skip slots another caller currently holds; they are in use.
            let Ok(guard) = slot.try_lock() else { continue };
            stamped.push((key.clone(), guard.value.as_ref().map(|(at, _)| *at)));
        }

        for (key, fetched_at) in &stamped {
            if slots.len() <= self.capacity {
                return;
            }
            let expired = match fetched_at {
                Some(at) => at.elapsed() >= self.ttl,
                None => true,
            };
            if expired {
                slots.remove(key);
            }
        }

        let mut by_age: Vec<(K, Instant)> = stamped
            .into_iter()
            .filter_map(|(key, at)| at.map(|at| (key, at)))
            .collect();
        by_age.sort_by_key(|(_, at)| *at);
        for (key, _) in by_age {
            if slots.len() <= self.capacity {
                break;
            }
            slots.remove(&key);
        }
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.slots.lock().expect("cache lock poisoned").len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn hit_within_ttl_skips_the_fetch() {
        let cache: TtlCache<String, u32> = TtlCache::new(Duration::from_secs(60), 16);
        let fetches = AtomicUsize::new(0);
        let fetch = || {
            fetches.fetch_add(1, Ordering::SeqCst);
            Ok(7)
        };
        assert_eq!(cache.get_or_fetch(&"k".to_string(), fetch).unwrap(), 7);
        assert_eq!(
            cache
                .get_or_fetch(&"k".to_string(), || {
                    fetches.fetch_add(1, Ordering::SeqCst);
                    Ok(9)
                })
                .unwrap(),
            7
        );
        assert_eq!(fetches.load(Ordering::SeqCst), 1);
        assert_eq!(cache.get(&"k".to_string()), Some(7));
    }

    #[test]
    fn expired_entries_refetch_once() {
        let cache: TtlCache<String, u32> = TtlCache::new(Duration::ZERO, 16);
        assert_eq!(cache.get_or_fetch(&"k".to_string(), || Ok(1)).unwrap(), 1);
        // TTL zero: the entry is immediately stale and must be refetched.
        assert_eq!(cache.get_or_fetch(&"k".to_string(), || Ok(2)).unwrap(), 2);
        assert_eq!(cache.get(&"k".to_string()), None);
    }

    #[test]
    fn failed_fetches_are_not_cached() {
        let cache: TtlCache<String, u32> = TtlCache::new(Duration::from_secs(60), 16);
        let err = cache.get_or_fetch(&"k".to_string(), || anyhow::bail!("down"));
        assert!(err.is_err());
        assert_eq!(cache.get_or_fetch(&"k".to_string(), || Ok(3)).unwrap(), 3);
    }

    #[test]
    fn capacity_is_bounded() {
        let cache: TtlCache<u32, u32> = TtlCache::new(Duration::from_secs(60), 4);
        for k in 0..20 {
            cache.get_or_fetch(&k, || Ok(k)).unwrap();
        }
        assert!(cache.len() <= 5, "len {}", cache.len());
    }

    #[test]
    fn distinct_keys_fetch_independently() {
        let cache: TtlCache<u32, u32> = TtlCache::new(Duration::from_secs(60), 16);
        assert_eq!(cache.get_or_fetch(&1, || Ok(10)).unwrap(), 10);
        assert_eq!(cache.get_or_fetch(&2, || Ok(20)).unwrap(), 20);
        assert_eq!(cache.get(&1), Some(10));
        assert_eq!(cache.get(&2), Some(20));
    }
}
