//! Decoded token response fields and their conversion into [`AccessToken`].

// self
use crate::{
	_prelude::*,
	auth::{AccessToken, ScopeSet, Secret, TokenType},
	error::DecodeError,
};

/// Token fields consumed from a token endpoint body or an implicit-grant fragment.
#[derive(Clone, Debug)]
pub struct TokenResponse {
	/// `access_token`.
	pub access_token: Secret,
	/// `token_type` as sent by the server.
	pub token_type: Option<String>,
	/// `expires_in`, in seconds.
	pub expires_in: Option<i64>,
	/// `scope`, space-joined.
	pub scope: Option<String>,
	/// `refresh_token`.
	pub refresh_token: Option<Secret>,
}
impl TokenResponse {
	/// Reads the token fields out of a decoded field map.
	///
	/// `expires_in` accepts any integer rendering; empty optional fields count as absent.
	pub fn from_fields(fields: &BTreeMap<String, String>) -> Result<Self, DecodeError> {
		let access_token = non_empty(fields, "access_token")
			.ok_or(DecodeError::MissingField { field: "access_token" })?;
		let expires_in = non_empty(fields, "expires_in")
			.map(|raw| {
				raw.trim()
					.parse::<i64>()
					.map_err(|_| DecodeError::InvalidField { field: "expires_in", value: raw.into() })
			})
			.transpose()?;

		Ok(Self {
			access_token: Secret::new(access_token),
			token_type: non_empty(fields, "token_type").map(Into::into),
			expires_in,
			scope: non_empty(fields, "scope").map(Into::into),
			refresh_token: non_empty(fields, "refresh_token").map(Secret::new),
		})
	}

	/// Builds the token, stamping expiry relative to `issued_at`.
	///
	/// When the server does not report a scope, the token carries `requested_scope`. An
	/// `expires_in` that puts the expiry outside the representable range is rejected.
	pub fn into_access_token(
		self,
		issued_at: OffsetDateTime,
		requested_scope: &str,
	) -> Result<AccessToken, DecodeError> {
		let scope = ScopeSet::parse(self.scope.as_deref().unwrap_or(requested_scope));
		let token_type = TokenType::parse_lenient(self.token_type.as_deref());
		let mut token = AccessToken::new(token_type, self.access_token.expose()).with_scope(scope);

		if let Some(seconds) = self.expires_in {
			let expiration = issued_at.checked_add(Duration::seconds(seconds)).ok_or_else(|| {
				DecodeError::InvalidField { field: "expires_in", value: seconds.to_string() }
			})?;

			token = token.with_expiration(expiration);
		}

		token.refresh_token = self.refresh_token;

		Ok(token)
	}
}

fn non_empty<'a>(fields: &'a BTreeMap<String, String>, key: &str) -> Option<&'a str> {
	fields.get(key).map(String::as_str).filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
	// crates.io
	use time::macros;
	// self
	use super::*;

	fn fields(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
		pairs.iter().map(|(k, v)| ((*k).to_owned(), (*v).to_owned())).collect()
	}

	#[test]
	fn builds_token_from_standard_fields() {
		let issued = macros::datetime!(2025-03-01 12:00 UTC);
		let token = TokenResponse::from_fields(&fields(&[
			("access_token", "aaa111"),
			("token_type", "bearer"),
			("expires_in", "3600"),
			("scope", "read write"),
			("refresh_token", "rrr"),
		]))
		.expect("Token response should decode.")
		.into_access_token(issued, "")
		.expect("Token should build.");

		assert_eq!(token.token_type, TokenType::Bearer);
		assert_eq!(token.token.expose(), "aaa111");
		assert_eq!(token.scope(), "read write");
		assert_eq!(token.expiration, Some(macros::datetime!(2025-03-01 13:00 UTC)));
		assert_eq!(token.refresh_token(), Some("rrr"));
	}

	#[test]
	fn absent_expiry_means_no_expiration() {
		let token = TokenResponse::from_fields(&fields(&[("access_token", "t")]))
			.expect("Token response should decode.")
			.into_access_token(OffsetDateTime::now_utc(), "")
			.expect("Token should build.");

		assert_eq!(token.expiration, None);
		assert_eq!(token.token_type, TokenType::Bearer);
	}

	#[test]
	fn missing_scope_falls_back_to_requested_scope() {
		let token = TokenResponse::from_fields(&fields(&[("access_token", "t")]))
			.expect("Token response should decode.")
			.into_access_token(OffsetDateTime::now_utc(), "write read")
			.expect("Token should build.");

		assert_eq!(token.scope(), "write read");
	}

	#[test]
	fn access_token_is_required() {
		let err = TokenResponse::from_fields(&fields(&[("token_type", "bearer")]))
			.expect_err("Missing access_token must fail.");

		assert!(matches!(err, DecodeError::MissingField { field: "access_token" }));
	}

	#[test]
	fn non_numeric_expiry_is_rejected() {
		let err =
			TokenResponse::from_fields(&fields(&[("access_token", "t"), ("expires_in", "soon")]))
				.expect_err("Non-numeric expires_in must fail.");

		assert!(matches!(err, DecodeError::InvalidField { field: "expires_in", .. }));
	}

	#[test]
	fn out_of_range_expiry_is_rejected() {
		for raw in ["9223372036854775807", "-9223372036854775808"] {
			let err = TokenResponse::from_fields(&fields(&[("access_token", "t"), ("expires_in", raw)]))
				.expect("Token response should decode.")
				.into_access_token(macros::datetime!(2025-03-01 12:00 UTC), "")
				.expect_err("An unrepresentable expiry must fail.");

			assert!(
				matches!(err, DecodeError::InvalidField { field: "expires_in", ref value } if value == raw)
			);
		}
	}
}
