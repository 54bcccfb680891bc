//! Outbound token-endpoint and authorization-endpoint request shapes built by grant strategies.

// self
use crate::{
	_prelude::*,
	auth::{ClientCredentials, ClientId},
	error::ConfigError,
	grant::GrantType,
};

const REDACTED_PARAMETERS: [&str; 4] = ["password", "refresh_token", "code", "client_secret"];

/// Token endpoint exchange (`POST <uri>`) assembled by a grant strategy.
///
/// Parameters keep insertion order; `grant_type` is always first.
#[derive(Clone)]
pub struct AccessTokenRequest {
	/// Token endpoint.
	pub uri: Url,
	/// Client presenting the request.
	pub credentials: ClientCredentials,
	/// Ordered form parameters.
	pub parameters: Vec<(String, String)>,
	/// Extra request headers.
	pub headers: Vec<(String, String)>,
}
impl AccessTokenRequest {
	/// Starts a request for `grant`, seeding the `grant_type` parameter.
	pub fn new(uri: Url, credentials: ClientCredentials, grant: GrantType) -> Self {
		Self {
			uri,
			credentials,
			parameters: vec![("grant_type".into(), grant.as_str().into())],
			headers: Vec::new(),
		}
	}

	/// Appends a form parameter.
	pub fn with_parameter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
		self.parameters.push((key.into(), value.into()));

		self
	}

	/// Appends a form parameter when `value` is present.
	pub fn with_optional_parameter(self, key: impl Into<String>, value: Option<&str>) -> Self {
		match value {
			Some(value) => self.with_parameter(key, value),
			None => self,
		}
	}

	/// Appends `scope` unless it is empty.
	pub fn with_scope(self, scope: &str) -> Self {
		if scope.is_empty() { self } else { self.with_parameter("scope", scope) }
	}

	/// Appends an extra header.
	pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.headers.push((name.into(), value.into()));

		self
	}

	/// Returns the first value recorded for `key`.
	pub fn parameter(&self, key: &str) -> Option<&str> {
		self.parameters.iter().find(|(name, _)| name == key).map(|(_, value)| value.as_str())
	}

	/// Returns the `grant_type` parameter.
	pub fn grant_type(&self) -> Option<&str> {
		self.parameter("grant_type")
	}

	/// Returns the `scope` parameter, if one was sent.
	pub fn scope(&self) -> Option<&str> {
		self.parameter("scope")
	}
}
impl Debug for AccessTokenRequest {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		let parameters = self
			.parameters
			.iter()
			.map(|(key, value)| {
				let shown =
					if REDACTED_PARAMETERS.contains(&key.as_str()) { "<redacted>" } else { value };

				(key.as_str(), shown)
			})
			.collect::<Vec<_>>();

		f.debug_struct("AccessTokenRequest")
			.field("uri", &self.uri.as_str())
			.field("credentials", &self.credentials)
			.field("parameters", &parameters)
			.field("headers", &self.headers)
			.finish()
	}
}

/// Authorization endpoint request (`GET <authorization_uri>?...`) used by redirect-based grants.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthorizationRequest {
	/// Authorization endpoint.
	pub authorization_uri: Url,
	/// Client asking for authorization.
	pub client_id: ClientId,
	/// `response_type` sent on the query (`code` or `token`).
	pub response_type: String,
	/// Space-joined requested scope; omitted from the query when empty.
	pub scope: String,
	/// Redirect target registered for the client.
	pub redirect_uri: Option<Url>,
	/// Opaque anti-CSRF value the server must echo back.
	pub state: Option<String>,
	/// `Cookie` header value identifying the resource owner's session.
	pub cookie: Option<String>,
	/// Extra headers for the authorize request.
	pub headers: Vec<(String, String)>,
}
impl AuthorizationRequest {
	/// Builds the full authorize URL, appending parameters in wire order
	/// (`response_type`, `client_id`, `scope`, `redirect_uri`, `state`).
	pub fn authorize_url(&self) -> Result<Url, ConfigError> {
		if self.response_type.is_empty() {
			return Err(ConfigError::MissingField { field: "response_type" });
		}

		let mut url = self.authorization_uri.clone();

		{
			let mut query = url.query_pairs_mut();

			query.append_pair("response_type", &self.response_type);
			query.append_pair("client_id", self.client_id.as_ref());

			if !self.scope.is_empty() {
				query.append_pair("scope", &self.scope);
			}
			if let Some(redirect_uri) = &self.redirect_uri {
				query.append_pair("redirect_uri", redirect_uri.as_str());
			}
			if let Some(state) = &self.state {
				query.append_pair("state", state);
			}
		}

		Ok(url)
	}
}
