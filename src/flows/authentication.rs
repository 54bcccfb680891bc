//! `Authorization` header façades over the shared token repository.

// crates.io
use futures::executor;
use oauth2::{HttpClientError, SyncHttpClient};
// self
use crate::{
	_prelude::*,
	auth::{AccessToken, PrincipalId},
	flows::{
		AccessTokenProvider, AccessTokenRepository, AuthenticatedRequestContext, ResourceRequest,
	},
	grant::GrantProperties,
	http::Blocking,
	oauth::{
		AuthorizationServerClient, ClientAuthMethod, HttpAuthorizationServer, TransportErrorMapper,
	},
	store::TokenStore,
};
#[cfg(feature = "reqwest")]
use crate::{
	http::{ReqwestBlockingHttpClient, ReqwestHttpClient},
	oauth::ReqwestTransportErrorMapper,
};

/// Async façade producing `Authorization` header values for outgoing requests.
#[derive(Clone, Debug)]
pub struct OAuth2Authentication {
	properties: Arc<GrantProperties>,
	repository: AccessTokenRepository,
	principal: Option<PrincipalId>,
}
impl OAuth2Authentication {
	/// Creates a façade from its configuration and repository.
	pub fn new(properties: GrantProperties, repository: AccessTokenRepository) -> Self {
		Self { properties: Arc::new(properties), repository, principal: None }
	}

	/// Wires the grant's strategy to `server` and caches tokens in `store`.
	pub fn with_server(
		properties: GrantProperties,
		server: Arc<dyn AuthorizationServerClient>,
		store: Arc<dyn TokenStore>,
	) -> Self {
		let provider = AccessTokenProvider::new(properties.strategy(), server);

		Self::new(properties, AccessTokenRepository::new(store, provider))
	}

	/// Uses a fresh reqwest transport with the given client authentication method.
	#[cfg(feature = "reqwest")]
	pub fn reqwest(
		properties: GrantProperties,
		method: ClientAuthMethod,
		store: Arc<dyn TokenStore>,
	) -> Result<Self> {
		let server =
			HttpAuthorizationServer::new(ReqwestHttpClient::new()?, ReqwestTransportErrorMapper)
				.with_client_auth_method(method);

		Ok(Self::with_server(properties, Arc::new(server), store))
	}

	/// Binds the acting principal used for cache partitioning.
	pub fn with_principal(mut self, principal: PrincipalId) -> Self {
		self.principal = Some(principal);

		self
	}

	/// Grant configuration.
	pub fn properties(&self) -> &GrantProperties {
		&self.properties
	}

	/// Underlying repository.
	pub fn repository(&self) -> &AccessTokenRepository {
		&self.repository
	}

	/// Context used to resolve the token for `request`.
	pub fn context(&self, request: &ResourceRequest) -> AuthenticatedRequestContext {
		AuthenticatedRequestContext::new(self.properties.clone())
			.with_request(request.clone())
			.with_principal(self.principal.clone())
	}

	/// Resolves the token for `request`.
	pub async fn token(&self, request: &ResourceRequest) -> Result<AccessToken> {
		self.repository.find_token(&self.context(request)).await
	}

	/// `Authorization` header value (`"<Type> <token>"`) for `request`.
	pub async fn content(&self, request: &ResourceRequest) -> Result<String> {
		Ok(self.token(request).await?.authorization_value())
	}
}

/// Blocking façade; drives the same repository as [`OAuth2Authentication`] on the calling
/// thread.
///
/// Pair it with a blocking transport (see [`Blocking`]). Do not call it from inside an async
/// runtime.
#[derive(Clone, Debug)]
pub struct BlockingOAuth2Authentication(OAuth2Authentication);
impl BlockingOAuth2Authentication {
	/// Wraps an async façade.
	pub fn new(inner: OAuth2Authentication) -> Self {
		Self(inner)
	}

	/// Builds a façade over any blocking `oauth2` HTTP client.
	pub fn with_sync_http_client<C, E, M>(
		properties: GrantProperties,
		http_client: C,
		error_mapper: M,
		method: ClientAuthMethod,
		store: Arc<dyn TokenStore>,
	) -> Self
	where
		C: 'static + Send + Sync + SyncHttpClient<Error = HttpClientError<E>>,
		E: 'static + Send + Sync + StdError,
		M: TransportErrorMapper<E>,
	{
		let server = HttpAuthorizationServer::new(Blocking::<C, E>::new(http_client), error_mapper)
			.with_client_auth_method(method);

		Self(OAuth2Authentication::with_server(properties, Arc::new(server), store))
	}

	/// Uses a fresh blocking reqwest transport with the given client authentication method.
	#[cfg(feature = "reqwest")]
	pub fn reqwest(
		properties: GrantProperties,
		method: ClientAuthMethod,
		store: Arc<dyn TokenStore>,
	) -> Result<Self> {
		Ok(Self::with_sync_http_client(
			properties,
			ReqwestBlockingHttpClient::new()?,
			ReqwestTransportErrorMapper,
			method,
			store,
		))
	}

	/// Binds the acting principal used for cache partitioning.
	pub fn with_principal(self, principal: PrincipalId) -> Self {
		Self(self.0.with_principal(principal))
	}

	/// Async façade sharing this façade's repository.
	pub fn as_async(&self) -> &OAuth2Authentication {
		&self.0
	}

	/// Resolves the token for `request`.
	pub fn token(&self, request: &ResourceRequest) -> Result<AccessToken> {
		executor::block_on(self.0.token(request))
	}

	/// `Authorization` header value (`"<Type> <token>"`) for `request`.
	pub fn content(&self, request: &ResourceRequest) -> Result<String> {
		executor::block_on(self.0.content(request))
	}
}
