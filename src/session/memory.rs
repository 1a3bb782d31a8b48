//! Thread-safe in-memory [`SessionStore`] for local development and tests.

// self
use crate::{
	_prelude::*,
	session::{SessionKey, SessionStore},
};

type SessionMap = Arc<RwLock<HashMap<SessionKey, Value>>>;

/// Session backend that keeps values in-process; clones share the same map.
#[derive(Clone, Debug, Default)]
pub struct MemorySessionStore(SessionMap);
impl MemorySessionStore {
	/// Stores `value` under `key`, replacing any previous value.
	pub fn insert(&self, key: SessionKey, value: Value) -> Option<Value> {
		self.0.write().insert(key, value)
	}

	/// Removes the value stored under `key`.
	pub fn remove(&self, key: SessionKey) -> Option<Value> {
		self.0.write().remove(&key)
	}
}
impl SessionStore for MemorySessionStore {
	fn get(&self, key: SessionKey) -> Option<Value> {
		self.0.read().get(&key).cloned()
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn clones_share_values() {
		let store = MemorySessionStore::default();
		let view = store.clone();

		assert!(store.insert(SessionKey::ScopedToken, serde_json::json!("gAAAA")).is_none());
		assert_eq!(view.get(SessionKey::ScopedToken), Some(serde_json::json!("gAAAA")));
		assert_eq!(view.remove(SessionKey::ScopedToken), Some(serde_json::json!("gAAAA")));
		assert!(store.get(SessionKey::ScopedToken).is_none());
	}
}
