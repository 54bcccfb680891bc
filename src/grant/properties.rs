//! Validated, immutable grant configuration.

// self
use crate::{
	_prelude::*,
	auth::{
		AuthorizationRequest, ClientCredentials, ClientId, PrincipalId, ResourceOwner, ScopeSet,
		Secret,
	},
	error::ConfigError,
	grant::{
		AccessTokenStrategy, AuthorizationCodeStrategy, ClientCredentialsStrategy, GrantType,
		ImplicitStrategy, ResourceOwnerPasswordStrategy,
	},
};

/// Configuration shared by every grant plus the grant-specific details.
///
/// Build values with the per-grant factory functions; they reject missing or malformed
/// endpoints up front. The struct also deserializes from configuration files, where
/// `grant_type` selects the variant:
///
/// ```json
/// {
/// 	"access_token_uri": "https://auth.example.com/token",
/// 	"credentials": { "client_id": "cid", "client_secret": "secret" },
/// 	"scopes": ["read", "write"],
/// 	"grant_type": "client_credentials"
/// }
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrantProperties {
	/// Token endpoint.
	pub access_token_uri: Url,
	/// Client identity.
	pub credentials: ClientCredentials,
	/// Scopes requested on every call.
	#[serde(default)]
	pub scopes: ScopeSet,
	/// Identity folded into the cache key when no principal is bound to the call.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub user: Option<PrincipalId>,
	/// Grant-specific settings.
	#[serde(flatten)]
	pub grant: GrantDetails,
}
impl GrantProperties {
	/// Client Credentials grant.
	pub fn client_credentials(
		access_token_uri: impl AsRef<str>,
		credentials: ClientCredentials,
	) -> Result<Self, ConfigError> {
		Self::build(access_token_uri, credentials, GrantDetails::ClientCredentials)
	}

	/// Resource Owner Password Credentials grant.
	pub fn resource_owner(
		access_token_uri: impl AsRef<str>,
		credentials: ClientCredentials,
		resource_owner: ResourceOwner,
	) -> Result<Self, ConfigError> {
		Self::build(access_token_uri, credentials, GrantDetails::Password { resource_owner })
	}

	/// Authorization Code grant; `response_type` defaults to `code`.
	pub fn authorization_code(
		access_token_uri: impl AsRef<str>,
		credentials: ClientCredentials,
		redirect: RedirectGrant,
	) -> Result<Self, ConfigError> {
		Self::build(access_token_uri, credentials, GrantDetails::AuthorizationCode(redirect))
	}

	/// Implicit grant; `response_type` defaults to `token`.
	pub fn implicit(
		access_token_uri: impl AsRef<str>,
		credentials: ClientCredentials,
		redirect: RedirectGrant,
	) -> Result<Self, ConfigError> {
		Self::build(access_token_uri, credentials, GrantDetails::Implicit(redirect))
	}

	fn build(
		access_token_uri: impl AsRef<str>,
		credentials: ClientCredentials,
		grant: GrantDetails,
	) -> Result<Self, ConfigError> {
		Ok(Self {
			access_token_uri: parse_uri("access_token_uri", access_token_uri.as_ref())?,
			credentials,
			scopes: ScopeSet::default(),
			user: None,
			grant,
		})
	}

	/// Replaces the configured scopes.
	pub fn with_scopes<I, S>(mut self, scopes: I) -> Result<Self, ConfigError>
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.scopes = ScopeSet::new(scopes)?;

		Ok(self)
	}

	/// Sets the default cache identity.
	pub fn with_user(mut self, user: PrincipalId) -> Self {
		self.user = Some(user);

		self
	}

	/// Grant type these properties configure.
	pub fn grant_type(&self) -> GrantType {
		self.grant.grant_type()
	}

	/// Client identifier.
	pub fn client_id(&self) -> &ClientId {
		&self.credentials.client_id
	}

	/// Builds the strategy for the configured grant.
	pub fn strategy(&self) -> Arc<dyn AccessTokenStrategy> {
		match &self.grant {
			GrantDetails::ClientCredentials => Arc::new(ClientCredentialsStrategy),
			GrantDetails::Password { resource_owner } =>
				Arc::new(ResourceOwnerPasswordStrategy::new(resource_owner.clone())),
			GrantDetails::AuthorizationCode(redirect) =>
				Arc::new(AuthorizationCodeStrategy::new(redirect.clone())),
			GrantDetails::Implicit(redirect) => Arc::new(ImplicitStrategy::new(redirect.clone())),
		}
	}
}

/// Closed set of grant-specific settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "grant_type", rename_all = "snake_case")]
pub enum GrantDetails {
	/// No extra settings.
	ClientCredentials,
	/// Resource-owner credentials sent with every token request.
	Password {
		/// Resource owner whose credentials are exchanged.
		resource_owner: ResourceOwner,
	},
	/// Redirect-based code grant.
	AuthorizationCode(RedirectGrant),
	/// Redirect-only token grant.
	Implicit(RedirectGrant),
}
impl GrantDetails {
	/// Grant type of the variant.
	pub fn grant_type(&self) -> GrantType {
		match self {
			GrantDetails::ClientCredentials => GrantType::ClientCredentials,
			GrantDetails::Password { .. } => GrantType::Password,
			GrantDetails::AuthorizationCode(_) => GrantType::AuthorizationCode,
			GrantDetails::Implicit(_) => GrantType::Implicit,
		}
	}
}

/// Authorization endpoint settings for the redirect-based grants.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedirectGrant {
	/// Authorization endpoint.
	pub authorization_uri: Url,
	/// Redirect target registered for the client.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub redirect_uri: Option<Url>,
	/// Explicit `response_type`; the grant's default applies when absent.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub response_type: Option<String>,
	/// Anti-CSRF value the authorization server must echo.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub state: Option<String>,
	/// `Cookie` header carrying the resource owner's session.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub cookie: Option<Secret>,
	/// Extra headers for the authorize call.
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub headers: Vec<(String, String)>,
}
impl RedirectGrant {
	/// Starts redirect settings for `authorization_uri`.
	pub fn new(authorization_uri: impl AsRef<str>) -> Result<Self, ConfigError> {
		Ok(Self {
			authorization_uri: parse_uri("authorization_uri", authorization_uri.as_ref())?,
			redirect_uri: None,
			response_type: None,
			state: None,
			cookie: None,
			headers: Vec::new(),
		})
	}

	/// Sets the redirect URI.
	pub fn with_redirect_uri(mut self, redirect_uri: impl AsRef<str>) -> Result<Self, ConfigError> {
		self.redirect_uri = Some(parse_uri("redirect_uri", redirect_uri.as_ref())?);

		Ok(self)
	}

	/// Overrides the `response_type`.
	pub fn with_response_type(mut self, response_type: impl Into<String>) -> Self {
		self.response_type = Some(response_type.into());

		self
	}

	/// Sets the `state` value.
	pub fn with_state(mut self, state: impl Into<String>) -> Self {
		self.state = Some(state.into());

		self
	}

	/// Sets the `Cookie` header value.
	pub fn with_cookie(mut self, cookie: impl Into<String>) -> Self {
		self.cookie = Some(Secret::new(cookie));

		self
	}

	/// Appends an extra authorize header.
	pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.headers.push((name.into(), value.into()));

		self
	}

	/// Builds the authorize request for `client_id` and `scope`.
	pub fn authorization_request(
		&self,
		client_id: &ClientId,
		scope: String,
		default_response_type: &str,
	) -> AuthorizationRequest {
		AuthorizationRequest {
			authorization_uri: self.authorization_uri.clone(),
			client_id: client_id.clone(),
			response_type: self
				.response_type
				.clone()
				.unwrap_or_else(|| default_response_type.to_owned()),
			scope,
			redirect_uri: self.redirect_uri.clone(),
			state: self.state.clone(),
			cookie: self.cookie.as_ref().map(|cookie| cookie.expose().to_owned()),
			headers: self.headers.clone(),
		}
	}
}

fn parse_uri(field: &'static str, raw: &str) -> Result<Url, ConfigError> {
	if raw.trim().is_empty() {
		return Err(ConfigError::MissingField { field });
	}

	Url::parse(raw).map_err(|source| ConfigError::InvalidUri { field, source })
}
