//! Immutable access token values and expiry helpers.

// self
use crate::{
	_prelude::*,
	auth::{ScopeSet, Secret},
};

/// Token type reported by the authorization server.
///
/// The external name is used verbatim as the `Authorization` scheme.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenType {
	/// RFC 6750 bearer token.
	#[default]
	Bearer,
	/// Legacy `OAuth` scheme.
	#[serde(rename = "OAuth")]
	OAuth,
}
impl TokenType {
	/// Returns the external scheme name.
	pub const fn as_str(self) -> &'static str {
		match self {
			TokenType::Bearer => "Bearer",
			TokenType::OAuth => "OAuth",
		}
	}

	/// Parses a `token_type` value case-insensitively, falling back to [`TokenType::Bearer`]
	/// for missing or unrecognized values.
	pub fn parse_lenient(raw: Option<&str>) -> Self {
		match raw {
			Some(value) if value.eq_ignore_ascii_case("oauth") => TokenType::OAuth,
			_ => TokenType::Bearer,
		}
	}
}
impl Display for TokenType {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Issued OAuth access token.
///
/// Two tokens are equal when their type and token string match; expiry, scopes, and the
/// refresh token do not take part. The [`Display`] form is `"<Type> <token>"`, ready to be
/// used as an `Authorization` header value, so avoid formatting tokens into logs; [`Debug`]
/// redacts both secrets.
#[derive(Clone, Serialize, Deserialize)]
pub struct AccessToken {
	/// Token scheme.
	pub token_type: TokenType,
	/// Access token secret.
	pub token: Secret,
	/// Absolute expiry instant; `None` never expires.
	pub expiration: Option<OffsetDateTime>,
	/// Scopes granted to the token.
	pub scope: ScopeSet,
	/// Refresh token secret, if the server issued one.
	pub refresh_token: Option<Secret>,
}
impl AccessToken {
	/// Creates a token of the given type with no expiry, scope, or refresh token.
	pub fn new(token_type: TokenType, token: impl Into<String>) -> Self {
		Self {
			token_type,
			token: Secret::new(token),
			expiration: None,
			scope: ScopeSet::default(),
			refresh_token: None,
		}
	}

	/// Creates a [`TokenType::Bearer`] token.
	pub fn bearer(token: impl Into<String>) -> Self {
		Self::new(TokenType::Bearer, token)
	}

	/// Creates a [`TokenType::OAuth`] token.
	pub fn oauth(token: impl Into<String>) -> Self {
		Self::new(TokenType::OAuth, token)
	}

	/// Sets an absolute expiry instant.
	pub fn with_expiration(mut self, instant: OffsetDateTime) -> Self {
		self.expiration = Some(instant);

		self
	}

	/// Sets the expiry relative to `issued_at`, clamped to the representable range.
	pub fn expires_in(self, issued_at: OffsetDateTime, duration: Duration) -> Self {
		self.with_expiration(issued_at.saturating_add(duration))
	}

	/// Sets the granted scopes.
	pub fn with_scope(mut self, scope: ScopeSet) -> Self {
		self.scope = scope;

		self
	}

	/// Attaches a refresh token.
	pub fn with_refresh_token(mut self, token: impl Into<String>) -> Self {
		self.refresh_token = Some(Secret::new(token));

		self
	}

	/// Returns true if an expiry is set and `instant` has reached it.
	pub fn expired_at(&self, instant: OffsetDateTime) -> bool {
		self.expiration.is_some_and(|expiration| instant >= expiration)
	}

	/// Returns true if the token is expired relative to the current clock.
	pub fn expired(&self) -> bool {
		self.expired_at(OffsetDateTime::now_utc())
	}

	/// Scopes joined with a single space.
	pub fn scope(&self) -> String {
		self.scope.to_wire()
	}

	/// Returns the refresh token value, if any.
	pub fn refresh_token(&self) -> Option<&str> {
		self.refresh_token.as_ref().map(Secret::expose)
	}

	/// `Authorization` header value (`"<Type> <token>"`).
	pub fn authorization_value(&self) -> String {
		self.to_string()
	}
}
impl PartialEq for AccessToken {
	fn eq(&self, other: &Self) -> bool {
		self.token_type == other.token_type && self.token == other.token
	}
}
impl Eq for AccessToken {}
impl Hash for AccessToken {
	fn hash<H: Hasher>(&self, state: &mut H) {
		self.token_type.hash(state);
		self.token.hash(state);
	}
}
impl Display for AccessToken {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "{} {}", self.token_type, self.token.expose())
	}
}
impl Debug for AccessToken {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("AccessToken")
			.field("token_type", &self.token_type)
			.field("token", &"<redacted>")
			.field("expiration", &self.expiration)
			.field("scope", &self.scope)
			.field("refresh_token", &self.refresh_token.as_ref().map(|_| "<redacted>"))
			.finish()
	}
}
