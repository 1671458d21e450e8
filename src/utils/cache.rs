//! Read-through memoization for single-entity lookups.
//!
//! Writers call [`ReadCache::refresh`] or [`ReadCache::invalidate`] before they
//! report success. Every write bumps a generation counter, and a reader only
//! stores what it loaded if no write happened since it took its
//! [`ReadCache::ticket`], so a slow read can never reinstate a value a
//! concurrent write already replaced.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;

use parking_lot::RwLock;

#[derive(Debug)]
struct Entries<K, V> {
    generation: u64,
    values: HashMap<K, V>,
}

/// Proof of the generation a read started at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

#[derive(Debug)]
pub struct ReadCache<K, V> {
    enabled: bool,
    entries: RwLock<Entries<K, V>>,
}

impl<K, V> ReadCache<K, V>
where
    K: Eq + Hash,
    V: Clone,
{
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            entries: RwLock::new(Entries {
                generation: 0,
                values: HashMap::new(),
            }),
        }
    }

    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        if !self.enabled {
            return None;
        }
        self.entries.read().values.get(key).cloned()
    }

    /// Take before loading from the store.
    pub fn ticket(&self) -> Ticket {
        Ticket(self.entries.read().generation)
    }

    /// Store a loaded value unless a write happened after `ticket` was taken.
    pub fn fill(&self, ticket: Ticket, key: K, value: V) {
        if !self.enabled {
            return;
        }
        let mut entries = self.entries.write();
        if entries.generation == ticket.0 {
            entries.values.insert(key, value);
        }
    }

    /// Replace the entry with a freshly written value.
    pub fn refresh(&self, key: K, value: V) {
        let mut entries = self.entries.write();
        entries.generation += 1;
        if self.enabled {
            entries.values.insert(key, value);
        }
    }

    pub fn invalidate<Q>(&self, key: &Q)
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let mut entries = self.entries.write();
        entries.generation += 1;
        entries.values.remove(key);
    }

    pub fn len(&self) -> usize {
        self.entries.read().values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
