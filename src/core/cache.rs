//! Per-session listing cache for roam.
//!
//! Keyed by (backend kind, root identity, joined relative path). Entries
//! are created on first visit and reused on revisit until explicitly
//! invalidated with the refresh key. There is no eviction: remote
//! listings dominate the cost of a session, and a session only ever
//! visits a human-scale number of locations.

use crate::core::backend::BackendKind;
use crate::core::listing::Listing;

use std::collections::HashMap;

/// Cache key: one location as seen through one backend and root.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ListingKey {
    pub kind: BackendKind,
    pub root: String,
    pub rel: String,
}

/// Cached state for one visited location.
#[derive(Debug, Clone)]
pub struct CachedListing {
    /// Fully-qualified location string, as shown in the location bar.
    pub location: String,
    pub listing: Listing,
    pub depth: usize,
}

#[derive(Default)]
pub struct ListingCache {
    map: HashMap<ListingKey, CachedListing>,
}

impl ListingCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &ListingKey) -> Option<&CachedListing> {
        self.map.get(key)
    }

    pub fn contains(&self, key: &ListingKey) -> bool {
        self.map.contains_key(key)
    }

    pub fn insert(&mut self, key: ListingKey, cached: CachedListing) {
        self.map.insert(key, cached);
    }

    /// Drops one entry so the next visit re-fetches.
    pub fn invalidate(&mut self, key: &ListingKey) {
        self.map.remove(key);
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.map.len()
    }
}
