use {
	crate::eviction::{EvictionPolicy, Unbounded},
	async_trait::async_trait,
	serde_json::Value,
	std::{collections::HashMap, sync::Arc, time::Duration},
	tokio::{sync::RwLock, time::Instant},
	tracing::debug,
};

/// Last successful upstream response for one canonical query
#[derive(Debug, Clone)]
pub struct CacheEntry {
	pub payload: Arc<Value>,
	pub fetched_at: Instant,
}

impl CacheEntry {
	pub fn new(payload: Arc<Value>) -> Self {
		Self { payload, fetched_at: Instant::now() }
	}

	pub fn age(&self) -> Duration {
		Instant::now().saturating_duration_since(self.fetched_at)
	}
}

/// Key -> entry storage behind the resolver.
///
/// Writes replace whole entries. One process owns one store; a shared
/// backend can be slotted in by implementing this trait.
#[async_trait]
pub trait CacheStore: Send + Sync {
	async fn get(&self, key: &str) -> Option<CacheEntry>;

	async fn put(&self, key: &str, entry: CacheEntry);

	async fn len(&self) -> usize;
}

pub struct MemoryCache {
	entries: RwLock<HashMap<String, CacheEntry>>,
	eviction: Box<dyn EvictionPolicy>,
}

impl Default for MemoryCache {
	fn default() -> Self {
		Self::new(Box::new(Unbounded))
	}
}

impl MemoryCache {
	pub fn new(eviction: Box<dyn EvictionPolicy>) -> Self {
		Self { entries: RwLock::new(HashMap::new()), eviction }
	}
}

#[async_trait]
impl CacheStore for MemoryCache {
	async fn get(&self, key: &str) -> Option<CacheEntry> {
		let read_guard = self.entries.read().await;
		read_guard.get(key).cloned()
	}

	async fn put(&self, key: &str, entry: CacheEntry) {
		let mut write_guard = self.entries.write().await;
		write_guard.insert(key.to_string(), entry);

		let victims = self.eviction.victims(&write_guard, key);
		for victim in &victims {
			write_guard.remove(victim);
		}
		if !victims.is_empty() {
			debug!(evicted = victims.len(), remaining = write_guard.len(), "cache entries evicted");
		}
	}

	async fn len(&self) -> usize {
		self.entries.read().await.len()
	}
}
