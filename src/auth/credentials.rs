//! Client and resource-owner credentials presented to the authorization server.

// self
use crate::{
	_prelude::*,
	auth::{ClientId, Secret},
	error::ConfigError,
};

/// Client identity registered with the authorization server.
///
/// An empty secret is treated as absent: it is dropped from form/query client
/// authentication and encoded as `client_id:` in the Basic header.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientCredentials {
	/// OAuth 2.0 client identifier.
	pub client_id: ClientId,
	/// Client secret for confidential clients.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub client_secret: Option<Secret>,
}
impl ClientCredentials {
	/// Validates the identifier and builds credentials for a public client.
	pub fn new(client_id: impl Into<String>) -> Result<Self, ConfigError> {
		Ok(Self { client_id: ClientId::new(client_id)?, client_secret: None })
	}

	/// Attaches a client secret.
	pub fn with_secret(mut self, secret: impl Into<String>) -> Self {
		self.client_secret = Some(Secret::new(secret));

		self
	}

	/// Returns the secret when it is present and non-empty.
	pub fn secret(&self) -> Option<&str> {
		self.client_secret.as_ref().filter(|secret| !secret.is_empty()).map(Secret::expose)
	}
}

/// Resource-owner credentials used by the password grant.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceOwner {
	/// Resource-owner username.
	pub username: String,
	/// Resource-owner password.
	pub password: Secret,
}
impl ResourceOwner {
	/// Builds resource-owner credentials; the username must not be empty.
	pub fn new(username: impl Into<String>, password: impl Into<String>) -> Result<Self, ConfigError> {
		let username = username.into();

		if username.is_empty() {
			return Err(ConfigError::MissingField { field: "resource_owner.username" });
		}

		Ok(Self { username, password: Secret::new(password) })
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn empty_secret_is_treated_as_absent() {
		let public = ClientCredentials::new("cid").expect("Client credentials should build.");

		assert_eq!(public.secret(), None);
		assert_eq!(public.clone().with_secret("").secret(), None);
		assert_eq!(public.with_secret("secret").secret(), Some("secret"));
	}

	#[test]
	fn credentials_require_a_client_id() {
		let err = ClientCredentials::new("").expect_err("Empty client id must be rejected.");

		assert!(matches!(err, ConfigError::InvalidIdentifier(_)));
	}

	#[test]
	fn resource_owner_requires_username() {
		assert!(ResourceOwner::new("", "pw").is_err());

		let owner = ResourceOwner::new("alice", "pw").expect("Resource owner should build.");

		assert_eq!(format!("{owner:?}"), "ResourceOwner { username: \"alice\", password: Secret(\"<redacted>\") }");
	}
}
