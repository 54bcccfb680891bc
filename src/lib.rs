//! OAuth 2.0 client-side authentication for HTTP clients: obtain, cache, refresh, and reissue
//! access tokens for outgoing requests using the four standard grants, with a blocking and an
//! async façade sharing one token-lifecycle state machine.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod codec;
pub mod error;
pub mod flows;
pub mod grant;
pub mod http;
pub mod oauth;
pub mod obs;
pub mod store;
#[cfg(feature = "reqwest")]
#[doc(hidden)]
pub mod _preludet {
	//! Convenience re-exports and helpers shared by the integration tests and demos.

	pub use crate::_prelude::*;

	// self
	use crate::{
		flows::{BlockingOAuth2Authentication, OAuth2Authentication},
		grant::GrantProperties,
		http::{ReqwestBlockingHttpClient, ReqwestHttpClient},
		oauth::{ClientAuthMethod, HttpAuthorizationServer, ReqwestTransportErrorMapper},
		store::MemoryStore,
	};

	/// Builds a reqwest HTTP client that never follows redirects and accepts the self-signed
	/// certificates produced by `httpmock`.
	pub fn test_reqwest_http_client() -> ReqwestHttpClient {
		let client = ReqwestHttpClient::builder()
			.danger_accept_invalid_certs(true)
			.danger_accept_invalid_hostnames(true)
			.build()
			.expect("Failed to build insecure Reqwest client for tests.");

		ReqwestHttpClient::with_client(client)
	}

	/// Blocking counterpart of [`test_reqwest_http_client`].
	pub fn test_reqwest_blocking_http_client() -> ReqwestBlockingHttpClient {
		let client = ReqwestBlockingHttpClient::builder()
			.danger_accept_invalid_certs(true)
			.danger_accept_invalid_hostnames(true)
			.build()
			.expect("Failed to build insecure blocking Reqwest client for tests.");

		ReqwestBlockingHttpClient::with_client(client)
	}

	/// Constructs an async [`OAuth2Authentication`] backed by an in-memory store and the
	/// reqwest transport used across integration tests.
	pub fn build_reqwest_test_authentication(
		properties: GrantProperties,
		method: ClientAuthMethod,
	) -> (OAuth2Authentication, Arc<MemoryStore>) {
		let store = Arc::new(MemoryStore::default());
		let server =
			HttpAuthorizationServer::new(test_reqwest_http_client(), ReqwestTransportErrorMapper)
				.with_client_auth_method(method);
		let authentication =
			OAuth2Authentication::with_server(properties, Arc::new(server), store.clone());

		(authentication, store)
	}

	/// Constructs a [`BlockingOAuth2Authentication`] over the blocking reqwest transport.
	pub fn build_reqwest_blocking_test_authentication(
		properties: GrantProperties,
		method: ClientAuthMethod,
	) -> (BlockingOAuth2Authentication, Arc<MemoryStore>) {
		let store = Arc::new(MemoryStore::default());
		let authentication = BlockingOAuth2Authentication::with_sync_http_client(
			properties,
			test_reqwest_blocking_http_client(),
			ReqwestTransportErrorMapper,
			method,
			store.clone(),
		);

		(authentication, store)
	}
}

mod _prelude {
	pub use std::{
		collections::{BTreeMap, HashMap},
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		hash::{Hash, Hasher},
		pin::Pin,
		str::FromStr,
		sync::Arc,
	};

	pub use parking_lot::{Mutex, RwLock};
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(test)] use {color_eyre as _, httpmock as _, tokio as _};
