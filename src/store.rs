//! Token cache contract and the bundled in-memory implementation.

pub mod memory;

pub use memory::MemoryStore;

// self
use crate::{
	_prelude::*,
	auth::{AccessToken, ClientId, PrincipalId},
};

/// Boxed future returned by [`TokenStore`] operations.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StoreError>> + 'a + Send>>;

/// Concurrent cache of the last-known token per [`StoreKey`].
///
/// A `put` must be visible to every `get` on the same key that starts after it returns, and a
/// `get` must never observe a partially written token. Entries are replaced, never mutated.
pub trait TokenStore
where
	Self: 'static + Send + Sync,
{
	/// Fetches the token cached under `key`, if any.
	fn get<'a>(&'a self, key: &'a StoreKey) -> StoreFuture<'a, Option<AccessToken>>;

	/// Inserts or replaces the token cached under `key`.
	fn put(&self, key: StoreKey, token: AccessToken) -> StoreFuture<'_, ()>;
}

/// Error type produced by [`TokenStore`] implementations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum StoreError {
	/// Backend-level failure for the storage engine.
	#[error("Backend failure: {message}.")]
	Backend {
		/// Human-readable error payload.
		message: String,
	},
}

/// Composite cache identity.
///
/// Two requests share a cached token only when every component matches, so the same
/// client/user/scope triple is cached independently per resource server host.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StoreKey {
	/// Acting principal, if any.
	pub user: Option<PrincipalId>,
	/// Host of the resource server the token is presented to.
	pub resource_host: Option<String>,
	/// Client the token was issued to.
	pub client_id: ClientId,
	/// Space-joined requested scope.
	pub scope: String,
}
impl StoreKey {
	/// Builds a key without user or resource host components.
	pub fn new(client_id: ClientId, scope: impl Into<String>) -> Self {
		Self { user: None, resource_host: None, client_id, scope: scope.into() }
	}

	/// Sets the acting principal.
	pub fn with_user(mut self, user: Option<PrincipalId>) -> Self {
		self.user = user;

		self
	}

	/// Sets the resource server host.
	pub fn with_resource_host(mut self, host: Option<String>) -> Self {
		self.resource_host = host;

		self
	}
}

#[cfg(test)]
mod tests {
	// std
	use std::error::Error as StdError;
	// self
	use super::*;

	fn client() -> ClientId {
		ClientId::new("cid").expect("Client fixture should be valid.")
	}

	#[test]
	fn store_error_converts_into_client_error_with_source() {
		let store_error = StoreError::Backend { message: "cache unreachable".into() };
		let error: Error = store_error.clone().into();

		assert!(matches!(error, Error::Storage(_)));
		assert!(error.to_string().contains("cache unreachable"));

		let source =
			StdError::source(&error).expect("Client error should expose the store error as source.");

		assert_eq!(source.to_string(), store_error.to_string());
	}

	#[test]
	fn every_component_takes_part_in_equality() {
		let base = StoreKey::new(client(), "read");
		let alice = PrincipalId::new("alice").expect("Principal fixture should be valid.");

		assert_eq!(base, StoreKey::new(client(), "read"));
		assert_ne!(base, base.clone().with_user(Some(alice)));
		assert_ne!(base, base.clone().with_resource_host(Some("api.example.com".into())));
		assert_ne!(base, StoreKey::new(client(), "read write"));
		assert_ne!(
			base,
			StoreKey::new(ClientId::new("other").expect("Client fixture should be valid."), "read")
		);
	}
}
