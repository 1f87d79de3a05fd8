//! Eviction strategies for the in-memory response cache.
//!
//! Freshness and stale fallback do not depend on which policy is plugged in;
//! a policy only decides which keys disappear after a write.

use {
	crate::cache::CacheEntry,
	std::collections::HashMap,
};

pub trait EvictionPolicy: Send + Sync {
	/// Keys to drop after `just_written` was stored. Must never return `just_written`.
	fn victims(&self, entries: &HashMap<String, CacheEntry>, just_written: &str) -> Vec<String>;
}

/// Keep every entry for the lifetime of the process
#[derive(Debug, Default, Clone, Copy)]
pub struct Unbounded;

impl EvictionPolicy for Unbounded {
	fn victims(&self, _entries: &HashMap<String, CacheEntry>, _just_written: &str) -> Vec<String> {
		Vec::new()
	}
}

/// Cap the entry count, dropping the oldest fetches first
#[derive(Debug, Clone, Copy)]
pub struct MaxEntries(pub usize);

impl EvictionPolicy for MaxEntries {
	fn victims(&self, entries: &HashMap<String, CacheEntry>, just_written: &str) -> Vec<String> {
		if entries.len() <= self.0 {
			return Vec::new();
		}
		let overflow = entries.len() - self.0;

		let mut candidates: Vec<(&String, &CacheEntry)> = entries.iter().filter(|(key, _)| key.as_str() != just_written).collect();
		candidates.sort_by_key(|(_, entry)| entry.fetched_at);
		candidates.into_iter().take(overflow).map(|(key, _)| key.clone()).collect()
	}
}

pub fn policy_for(max_entries: Option<usize>) -> Box<dyn EvictionPolicy> {
	match max_entries {
		Some(limit) => Box::new(MaxEntries(limit)),
		None => Box::new(Unbounded),
	}
}
