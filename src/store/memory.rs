//! Thread-safe in-memory [`TokenStore`] sharded by key hash.

// std
use std::hash::DefaultHasher;
// self
use crate::{
	_prelude::*,
	auth::AccessToken,
	store::{StoreError, StoreFuture, StoreKey, TokenStore},
};

const SHARD_COUNT: usize = 16;

type Shard = RwLock<HashMap<StoreKey, AccessToken>>;

/// Process-local token cache.
///
/// Keys are spread over independently locked shards so callers resolving different keys rarely
/// contend. Tokens are cloned in and out; a shard lock is never held across an await point.
#[derive(Clone, Debug)]
pub struct MemoryStore(Arc<[Shard]>);
impl MemoryStore {
	/// Number of cached entries across all shards.
	pub fn len(&self) -> usize {
		self.0.iter().map(|shard| shard.read().len()).sum()
	}

	/// Returns true if nothing is cached.
	pub fn is_empty(&self) -> bool {
		self.0.iter().all(|shard| shard.read().is_empty())
	}

	/// Synchronous lookup.
	pub fn get_now(&self, key: &StoreKey) -> Option<AccessToken> {
		self.shard(key).read().get(key).cloned()
	}

	/// Synchronous insert or replace.
	pub fn put_now(&self, key: StoreKey, token: AccessToken) {
		self.shard(&key).write().insert(key, token);
	}

	fn shard(&self, key: &StoreKey) -> &Shard {
		let mut hasher = DefaultHasher::new();

		key.hash(&mut hasher);

		&self.0[hasher.finish() as usize % self.0.len()]
	}
}
impl Default for MemoryStore {
	fn default() -> Self {
		Self((0..SHARD_COUNT).map(|_| Shard::default()).collect())
	}
}
impl TokenStore for MemoryStore {
	fn get<'a>(&'a self, key: &'a StoreKey) -> StoreFuture<'a, Option<AccessToken>> {
		Box::pin(async move { Ok::<_, StoreError>(self.get_now(key)) })
	}

	fn put(&self, key: StoreKey, token: AccessToken) -> StoreFuture<'_, ()> {
		Box::pin(async move {
			self.put_now(key, token);

			Ok(())
		})
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::auth::ClientId;

	fn key(scope: &str) -> StoreKey {
		StoreKey::new(ClientId::new("cid").expect("Client fixture should be valid."), scope)
	}

	#[test]
	fn put_replaces_existing_entry() {
		let store = MemoryStore::default();

		store.put_now(key("read"), AccessToken::bearer("old"));
		store.put_now(key("read"), AccessToken::bearer("new"));

		assert_eq!(store.len(), 1);
		assert_eq!(store.get_now(&key("read")), Some(AccessToken::bearer("new")));
	}

	#[test]
	fn distinct_keys_do_not_share_entries() {
		let store = MemoryStore::default();

		store.put_now(key("read"), AccessToken::bearer("r"));

		assert!(store.get_now(&key("write")).is_none());
		assert!(!store.is_empty());
	}

	#[test]
	fn concurrent_writers_leave_one_whole_entry_per_key() {
		let store = MemoryStore::default();
		let threads = (0..8)
			.map(|i| {
				let store = store.clone();

				std::thread::spawn(move || {
					for round in 0..100 {
						store.put_now(key("shared"), AccessToken::bearer(format!("{i}-{round}")));
						store.put_now(key(&format!("own-{i}")), AccessToken::bearer("mine"));

						let seen = store.get_now(&key("shared")).expect("Shared entry should exist.");

						assert!(seen.token.expose().contains('-'));
					}
				})
			})
			.collect::<Vec<_>>();

		for thread in threads {
			thread.join().expect("Writer thread should not panic.");
		}

		assert_eq!(store.len(), 9);
	}
}
