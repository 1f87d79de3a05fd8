use {
	crate::consts::WATCHLIST_KEY,
	serde_json::{Map, Value},
	std::{
		fs,
		io::ErrorKind,
		path::{Path, PathBuf},
		sync::{Mutex, MutexGuard, PoisonError},
	},
	thiserror::Error,
	tracing::warn,
};

/// Local storage failures. Never shown to the user: loading falls back to an
/// empty list and a failed save only gets logged.
#[derive(Debug, Error)]
pub enum PersistenceError {
	#[error("watchlist storage io error: {0}")]
	Io(#[from] std::io::Error),

	#[error("malformed watchlist data: {0}")]
	Malformed(String),
}

pub trait WatchlistStore: Send + Sync {
	fn load(&self) -> Result<Vec<String>, PersistenceError>;

	fn save(&self, ids: &[String]) -> Result<(), PersistenceError>;
}

/// JSON object file; the list lives under a fixed key and other keys are preserved
pub struct JsonFileStore {
	path: PathBuf,
	key: String,
}

impl JsonFileStore {
	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self { path: path.into(), key: WATCHLIST_KEY.to_string() }
	}

	pub fn path(&self) -> &Path {
		&self.path
	}

	fn read_object(&self) -> Result<Option<Map<String, Value>>, PersistenceError> {
		let raw = match fs::read_to_string(&self.path) {
			Ok(raw) => raw,
			Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
			Err(e) => return Err(e.into()),
		};
		match serde_json::from_str::<Value>(&raw).map_err(|e| PersistenceError::Malformed(e.to_string()))? {
			Value::Object(object) => Ok(Some(object)),
			other => Err(PersistenceError::Malformed(format!("expected a JSON object, found {}", json_kind(&other)))),
		}
	}
}

impl WatchlistStore for JsonFileStore {
	fn load(&self) -> Result<Vec<String>, PersistenceError> {
		let Some(object) = self.read_object()? else {
			return Ok(Vec::new());
		};
		match object.get(&self.key) {
			None => Ok(Vec::new()),
			// 非字符串元素直接丢掉
			Some(Value::Array(items)) => Ok(items.iter().filter_map(|item| item.as_str().map(str::to_string)).collect()),
			Some(other) => Err(PersistenceError::Malformed(format!("{} holds {}, expected an array", self.key, json_kind(other)))),
		}
	}

	fn save(&self, ids: &[String]) -> Result<(), PersistenceError> {
		// 文件坏了就整体覆盖
		let mut object = self.read_object().ok().flatten().unwrap_or_default();
		object.insert(self.key.clone(), Value::from(ids.to_vec()));

		if let Some(parent) = self.path.parent()
			&& !parent.as_os_str().is_empty()
		{
			fs::create_dir_all(parent)?;
		}
		let body = serde_json::to_string_pretty(&Value::Object(object)).map_err(|e| PersistenceError::Malformed(e.to_string()))?;

		// 先写临时文件再 rename，避免写一半
		let tmp_path = self.path.with_extension("tmp");
		fs::write(&tmp_path, body)?;
		fs::rename(&tmp_path, &self.path)?;
		Ok(())
	}
}

fn json_kind(value: &Value) -> &'static str {
	match value {
		Value::Null => "null",
		Value::Bool(_) => "a boolean",
		Value::Number(_) => "a number",
		Value::String(_) => "a string",
		Value::Array(_) => "an array",
		Value::Object(_) => "an object",
	}
}

/// Ordered, duplicate-free list of asset ids, written back after every change
pub struct Watchlist {
	ids: Mutex<Vec<String>>,
	store: Box<dyn WatchlistStore>,
}

impl Watchlist {
	/// Unreadable or malformed storage starts an empty list
	pub fn open(store: Box<dyn WatchlistStore>) -> Self {
		let ids = match store.load() {
			Ok(loaded) => {
				let mut ids: Vec<String> = Vec::with_capacity(loaded.len());
				for id in loaded {
					if !ids.contains(&id) {
						ids.push(id);
					}
				}
				ids
			}
			Err(e) => {
				warn!("Failed to load watchlist, starting empty: {}", e);
				Vec::new()
			}
		};
		Self { ids: Mutex::new(ids), store }
	}

	fn lock(&self) -> MutexGuard<'_, Vec<String>> {
		self.ids.lock().unwrap_or_else(PoisonError::into_inner)
	}

	pub fn ids(&self) -> Vec<String> {
		self.lock().clone()
	}

	pub fn contains(&self, id: &str) -> bool {
		self.lock().iter().any(|x| x == id)
	}

	pub fn len(&self) -> usize {
		self.lock().len()
	}

	pub fn is_empty(&self) -> bool {
		self.lock().is_empty()
	}

	/// Prepends `id`; no-op when already present
	pub fn add(&self, id: &str) -> bool {
		let mut ids = self.lock();
		if ids.iter().any(|x| x == id) {
			return false;
		}
		ids.insert(0, id.to_string());
		self.persist(&ids);
		true
	}

	pub fn remove(&self, id: &str) -> bool {
		let mut ids = self.lock();
		let before = ids.len();
		ids.retain(|x| x != id);
		if ids.len() == before {
			return false;
		}
		self.persist(&ids);
		true
	}

	/// Removes when present, otherwise prepends. Returns whether `id` is now listed.
	pub fn toggle(&self, id: &str) -> bool {
		let mut ids = self.lock();
		let present = match ids.iter().position(|x| x == id) {
			Some(index) => {
				ids.remove(index);
				false
			}
			None => {
				ids.insert(0, id.to_string());
				true
			}
		};
		self.persist(&ids);
		present
	}

	/// Moves the item at `from` to `to` (clamped to the last index).
	/// Out-of-range `from` is a no-op.
	pub fn reorder(&self, from: usize, to: usize) -> bool {
		let mut ids = self.lock();
		let len = ids.len();
		if len == 0 || from >= len {
			return false;
		}
		let dest = to.min(len - 1);
		let item = ids.remove(from);
		ids.insert(dest, item);
		self.persist(&ids);
		true
	}

	fn persist(&self, ids: &[String]) {
		if let Err(e) = self.store.save(ids) {
			warn!("Failed to persist watchlist: {}", e);
		}
	}
}
