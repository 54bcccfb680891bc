//! Per-call authentication context and cache key derivation.

// self
use crate::{
	_prelude::*,
	auth::{AccessTokenRequest, ClientId, PrincipalId, merge_scopes},
	error::ConfigError,
	grant::{GrantProperties, GrantType},
	store::StoreKey,
};

/// Outgoing request to a protected resource, reduced to what token selection needs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResourceRequest {
	/// Target URI; its host partitions the token cache.
	pub uri: Url,
	/// Scopes declared for this call on top of the grant's configured scopes.
	pub scopes: Vec<String>,
}
impl ResourceRequest {
	/// Creates a request for `uri` with no extra scopes.
	pub fn new(uri: Url) -> Self {
		Self { uri, scopes: Vec::new() }
	}

	/// Parses `uri` and creates a request for it.
	pub fn parse(uri: impl AsRef<str>) -> Result<Self, ConfigError> {
		let uri = Url::parse(uri.as_ref())
			.map_err(|source| ConfigError::InvalidUri { field: "resource_uri", source })?;

		Ok(Self::new(uri))
	}

	/// Appends per-call scopes.
	pub fn with_scopes<I, S>(mut self, scopes: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.scopes.extend(scopes.into_iter().map(Into::into));

		self
	}

	/// `host[:port]` of the resource server, when the URI has a host.
	pub fn host(&self) -> Option<String> {
		let host = self.uri.host_str()?;

		Some(match self.uri.port() {
			Some(port) => format!("{host}:{port}"),
			None => host.to_owned(),
		})
	}
}

/// Grant configuration paired with the call being authenticated and the acting principal.
#[derive(Clone, Debug)]
pub struct AuthenticatedRequestContext {
	/// Grant configuration.
	pub properties: Arc<GrantProperties>,
	/// Outgoing request, if the token is obtained for a specific call.
	pub request: Option<ResourceRequest>,
	/// Principal bound to this call; overrides [`GrantProperties::user`].
	pub principal: Option<PrincipalId>,
}
impl AuthenticatedRequestContext {
	/// Creates a context detached from any request or principal.
	pub fn new(properties: Arc<GrantProperties>) -> Self {
		Self { properties, request: None, principal: None }
	}

	/// Attaches the outgoing request.
	pub fn with_request(mut self, request: ResourceRequest) -> Self {
		self.request = Some(request);

		self
	}

	/// Binds (or clears) the acting principal.
	pub fn with_principal(mut self, principal: Option<PrincipalId>) -> Self {
		self.principal = principal;

		self
	}

	/// Configured scopes followed by the call's scopes, space-joined without de-duplication.
	pub fn scope(&self) -> String {
		let call =
			self.request.iter().flat_map(|request| request.scopes.iter().map(String::as_str));

		merge_scopes(&self.properties.scopes, call)
	}

	/// Acting identity: the bound principal, else the grant's configured user.
	pub fn user(&self) -> Option<&PrincipalId> {
		self.principal.as_ref().or(self.properties.user.as_ref())
	}

	/// Resource server host of the attached request.
	pub fn resource_host(&self) -> Option<String> {
		self.request.as_ref().and_then(ResourceRequest::host)
	}

	/// Client identifier of the configured grant.
	pub fn client_id(&self) -> &ClientId {
		self.properties.client_id()
	}

	/// Cache key for this context.
	pub fn key(&self) -> StoreKey {
		StoreKey::new(self.client_id().clone(), self.scope())
			.with_user(self.user().cloned())
			.with_resource_host(self.resource_host())
	}

	/// Starts a token endpoint request for `grant` against the configured endpoint and client.
	pub fn token_request(&self, grant: GrantType) -> AccessTokenRequest {
		AccessTokenRequest::new(
			self.properties.access_token_uri.clone(),
			self.properties.credentials.clone(),
			grant,
		)
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::auth::ClientCredentials;

	fn properties() -> Arc<GrantProperties> {
		let credentials = ClientCredentials::new("cid").expect("Client credentials should build.");
		let properties = GrantProperties::client_credentials("https://auth/token", credentials)
			.and_then(|p| p.with_scopes(["read", "write"]))
			.expect("Grant properties should build.");

		Arc::new(properties)
	}

	fn principal(name: &str) -> PrincipalId {
		PrincipalId::new(name).expect("Principal fixture should be valid.")
	}

	#[test]
	fn scope_merges_configured_then_call_scopes() {
		let request = ResourceRequest::parse("https://api.example.com/items")
			.expect("Resource URI should parse.")
			.with_scopes(["admin", "read"]);
		let context = AuthenticatedRequestContext::new(properties()).with_request(request);

		assert_eq!(context.scope(), "read write admin read");
		assert_eq!(AuthenticatedRequestContext::new(properties()).scope(), "read write");
	}

	#[test]
	fn bound_principal_overrides_configured_user() {
		let mut configured = (*properties()).clone();

		configured.user = Some(principal("service"));

		let context = AuthenticatedRequestContext::new(Arc::new(configured));

		assert_eq!(context.user(), Some(&principal("service")));
		assert_eq!(
			context.clone().with_principal(Some(principal("alice"))).user(),
			Some(&principal("alice"))
		);
	}

	#[test]
	fn key_folds_in_user_host_and_scope() {
		let api = ResourceRequest::parse("https://api.example.com/a").expect("URI should parse.");
		let other =
			ResourceRequest::parse("https://other.example.com:8443/b").expect("URI should parse.");
		let base = AuthenticatedRequestContext::new(properties());
		let key = base.clone().with_request(api.clone()).key();

		assert_eq!(key.resource_host.as_deref(), Some("api.example.com"));
		assert_eq!(key.scope, "read write");
		assert_eq!(key, base.clone().with_request(api.clone()).key());
		assert_ne!(key, base.clone().with_request(other.clone()).key());
		assert_eq!(
			base.clone().with_request(other).key().resource_host.as_deref(),
			Some("other.example.com:8443")
		);
		assert_ne!(
			key,
			base.clone().with_request(api.clone()).with_principal(Some(principal("alice"))).key()
		);
		assert_ne!(key, base.with_request(api.with_scopes(["admin"])).key());
	}
}
