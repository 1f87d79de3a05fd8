use {
	chrono::Utc,
	dashmap::DashMap,
	serde::{Deserialize, Serialize},
	std::sync::Arc,
	tokio::time::Duration,
	tracing::info,
};

const GC_INTERVAL_SECS: u64 = 600; // gc 间隔（秒）
const GC_SAMPLE_LIMIT: u32 = 200; // 每轮最多检查多少个 key
const IDLE_EXPIRE_MS: i64 = 3600 * 1000; // key 多久没访问就回收（毫秒）

/// `limit` requests every `interval_secs` seconds
#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
pub struct Rule {
	pub limit: u32,
	pub interval_secs: i64,
}

impl Rule {
	pub fn check(&self) -> anyhow::Result<()> {
		if self.limit == 0 || self.interval_secs <= 0 {
			return Err(anyhow::anyhow!("rate limit rule must have limit > 0 and interval_secs > 0"));
		}
		Ok(())
	}
}

// 固定窗口补满，没有额外容量
#[derive(Debug, Clone)]
struct Bucket {
	available: u32,
	next_refill_at: i64,
	refill_amount: u32,
	refill_interval_ms: i64,
	last_access_ms: i64,
}

impl Bucket {
	fn new(rule: &Rule, now: i64) -> Self {
		let refill_interval_ms = rule.interval_secs * 1000;
		Self { available: rule.limit, next_refill_at: now + refill_interval_ms, refill_amount: rule.limit, refill_interval_ms, last_access_ms: now }
	}

	fn consume(&mut self, now: i64) -> bool {
		if now >= self.next_refill_at {
			self.available = self.refill_amount;
			let elapsed_windows = (now - self.next_refill_at) / self.refill_interval_ms + 1;
			self.next_refill_at += elapsed_windows * self.refill_interval_ms;
		}
		self.last_access_ms = now;
		if self.available > 0 {
			self.available -= 1;
			true
		} else {
			false
		}
	}
}

/// client key (ip) -> route pattern -> bucket
///
/// Routes without a rule are not limited.
#[derive(Default)]
pub struct RateLimiter {
	rules: DashMap<String, Rule>,
	buckets: DashMap<String, DashMap<String, Bucket>>,
}

impl RateLimiter {
	pub fn with_patterns(patterns: &[&str], rule: Rule) -> anyhow::Result<Self> {
		let limiter = Self::default();
		for pattern in patterns {
			limiter.add_rule(pattern, rule)?;
		}
		Ok(limiter)
	}

	pub fn add_rule(&self, pattern: &str, rule: Rule) -> anyhow::Result<()> {
		rule.check()?;
		self.rules.insert(pattern.to_string(), rule);
		Ok(())
	}

	pub fn is_allowed(&self, key: &str, pattern: &str) -> bool {
		self.is_allowed_at(key, pattern, Utc::now().timestamp_millis())
	}

	pub fn is_allowed_at(&self, key: &str, pattern: &str, now_ms: i64) -> bool {
		let Some(rule) = self.rules.get(pattern).map(|r| *r) else {
			return true;
		};
		let per_key = self.buckets.entry(key.to_string()).or_default();
		let mut bucket = per_key.entry(pattern.to_string()).or_insert_with(|| Bucket::new(&rule, now_ms));
		bucket.consume(now_ms)
	}

	/// 随机抽样回收长期未访问的 key，返回删除数量
	pub fn collect_idle(&self, now_ms: i64) -> usize {
		let mut delete_keys = Vec::new();
		let mut checked = 0;

		for entry in self.buckets.iter() {
			if fastrand::bool() {
				continue;
			}
			if checked > GC_SAMPLE_LIMIT {
				break;
			}
			if entry.value().iter().all(|bucket| bucket.last_access_ms + IDLE_EXPIRE_MS <= now_ms) {
				delete_keys.push(entry.key().clone());
			}
			checked += 1;
		}

		for key in &delete_keys {
			self.buckets.remove(key);
		}
		delete_keys.len()
	}

	pub fn tracked_keys(&self) -> usize {
		self.buckets.len()
	}
}

pub async fn rate_limit_gc(rate_limiter: Arc<RateLimiter>) {
	let mut ticker = tokio::time::interval(Duration::from_secs(GC_INTERVAL_SECS));
	ticker.tick().await;

	loop {
		ticker.tick().await;
		let deleted = rate_limiter.collect_idle(Utc::now().timestamp_millis());
		info!("rate limit gc deleted {} keys", deleted);
	}
}
