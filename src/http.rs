//! Transport seam for authorization-server exchanges.
//!
//! The client core only needs "execute a request, get status, headers, and body". That contract
//! is [`TokenHttpClient`], which hands out [`AsyncHttpClient`] handles over `oauth2`'s
//! [`HttpRequest`]/[`HttpResponse`] types. Blocking transports implement [`SyncHttpClient`]
//! instead and are lifted with [`Blocking`], whose handles resolve immediately; the synchronous
//! façade then drives the same state machine as the async one.
//!
//! Bundled reqwest transports never follow redirects: the authorize request needs the raw
//! `3xx` response and its `Location` header.

// std
use std::{
	future::{Ready, ready},
	marker::PhantomData,
};
// crates.io
use oauth2::{AsyncHttpClient, HttpClientError, HttpRequest, HttpResponse, SyncHttpClient};
// self
use crate::_prelude::*;
#[cfg(feature = "reqwest")] use crate::error::ConfigError;

/// Async HTTP transport shared by every exchange of an authorization-server client.
///
/// Implementations must be `Send + Sync + 'static` so one transport can back many façades, and
/// the handles they return must own whatever state they need so request futures stay `Send`.
pub trait TokenHttpClient
where
	Self: 'static + Send + Sync,
{
	/// Concrete error emitted by the underlying transport.
	type TransportError: 'static + Send + Sync + StdError;

	/// [`AsyncHttpClient`] handle used for a single exchange.
	type Handle: for<'c> AsyncHttpClient<
			'c,
			Error = HttpClientError<Self::TransportError>,
			Future: 'c + Send,
		>
		+ 'static
		+ Send
		+ Sync;

	/// Returns a handle for the next exchange.
	fn handle(&self) -> Self::Handle;
}

/// Lifts a blocking [`SyncHttpClient`] into a [`TokenHttpClient`] whose futures are already
/// resolved when returned.
pub struct Blocking<C, E> {
	client: Arc<C>,
	_error: PhantomData<fn() -> E>,
}
impl<C, E> Blocking<C, E> {
	/// Wraps a blocking transport.
	pub fn new(client: C) -> Self {
		Self::from_shared(Arc::new(client))
	}

	/// Wraps a shared blocking transport.
	pub fn from_shared(client: Arc<C>) -> Self {
		Self { client, _error: PhantomData }
	}

	/// Borrows the wrapped transport.
	pub fn inner(&self) -> &C {
		&self.client
	}
}
impl<C, E> Clone for Blocking<C, E> {
	fn clone(&self) -> Self {
		Self::from_shared(self.client.clone())
	}
}
impl<C, E> Debug for Blocking<C, E>
where
	C: Debug,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("Blocking").field(&self.client).finish()
	}
}
impl<C, E> TokenHttpClient for Blocking<C, E>
where
	C: 'static + Send + Sync + SyncHttpClient<Error = HttpClientError<E>>,
	E: 'static + Send + Sync + StdError,
{
	type Handle = BlockingHandle<C, E>;
	type TransportError = E;

	fn handle(&self) -> Self::Handle {
		BlockingHandle(self.clone())
	}
}

/// Handle returned by [`Blocking`]; runs the request on the calling thread.
pub struct BlockingHandle<C, E>(Blocking<C, E>);
impl<'c, C, E> AsyncHttpClient<'c> for BlockingHandle<C, E>
where
	C: 'static + Send + Sync + SyncHttpClient<Error = HttpClientError<E>>,
	E: 'static + Send + Sync + StdError,
{
	type Error = HttpClientError<E>;
	type Future = Ready<Result<HttpResponse, Self::Error>>;

	fn call(&'c self, request: HttpRequest) -> Self::Future {
		ready(self.0.client.call(request))
	}
}

/// Async reqwest transport with redirect following disabled.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug)]
pub struct ReqwestHttpClient(ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestHttpClient {
	/// Client builder preconfigured to leave redirects to the caller.
	pub fn builder() -> reqwest::ClientBuilder {
		ReqwestClient::builder().redirect(reqwest::redirect::Policy::none())
	}

	/// Builds a transport from [`ReqwestHttpClient::builder`] defaults.
	pub fn new() -> Result<Self, ConfigError> {
		Ok(Self(Self::builder().build()?))
	}

	/// Wraps an existing client. It must not follow redirects.
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestHttpClient {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl TokenHttpClient for ReqwestHttpClient {
	type Handle = ReqwestHandle;
	type TransportError = ReqwestError;

	fn handle(&self) -> Self::Handle {
		ReqwestHandle(self.0.clone())
	}
}

/// [`AsyncHttpClient`] handle returned by [`ReqwestHttpClient`].
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug)]
pub struct ReqwestHandle(ReqwestClient);
#[cfg(feature = "reqwest")]
impl<'c> AsyncHttpClient<'c> for ReqwestHandle {
	type Error = HttpClientError<ReqwestError>;
	type Future = Pin<Box<dyn Future<Output = Result<HttpResponse, Self::Error>> + 'c + Send>>;

	fn call(&'c self, request: HttpRequest) -> Self::Future {
		let client = self.0.clone();

		Box::pin(async move {
			let response =
				client.execute(request.try_into().map_err(Box::new)?).await.map_err(Box::new)?;
			let status = response.status();
			let headers = response.headers().to_owned();
			let mut converted = HttpResponse::new(response.bytes().await.map_err(Box::new)?.to_vec());

			*converted.status_mut() = status;
			*converted.headers_mut() = headers;

			Ok(converted)
		})
	}
}

/// Blocking reqwest transport with redirect following disabled.
///
/// Do not call it from inside an async runtime; reqwest's blocking client panics there.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug)]
pub struct ReqwestBlockingHttpClient(reqwest::blocking::Client);
#[cfg(feature = "reqwest")]
impl ReqwestBlockingHttpClient {
	/// Client builder preconfigured to leave redirects to the caller.
	pub fn builder() -> reqwest::blocking::ClientBuilder {
		reqwest::blocking::Client::builder().redirect(reqwest::redirect::Policy::none())
	}

	/// Builds a transport from [`ReqwestBlockingHttpClient::builder`] defaults.
	pub fn new() -> Result<Self, ConfigError> {
		Ok(Self(Self::builder().build()?))
	}

	/// Wraps an existing client. It must not follow redirects.
	pub fn with_client(client: reqwest::blocking::Client) -> Self {
		Self(client)
	}
}
#[cfg(feature = "reqwest")]
impl SyncHttpClient for ReqwestBlockingHttpClient {
	type Error = HttpClientError<ReqwestError>;

	fn call(&self, request: HttpRequest) -> Result<HttpResponse, Self::Error> {
		let response = self.0.execute(request.try_into().map_err(Box::new)?).map_err(Box::new)?;
		let status = response.status();
		let headers = response.headers().to_owned();
		let mut converted = HttpResponse::new(response.bytes().map_err(Box::new)?.to_vec());

		*converted.status_mut() = status;
		*converted.headers_mut() = headers;

		Ok(converted)
	}
}
