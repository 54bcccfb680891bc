//! Client-level error types shared across grants, the protocol client, and the token store.

// self
use crate::{_prelude::*, grant::GrantType};

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical error exposed by public APIs.
///
/// Nothing here is retried internally; retry policy belongs to the caller.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Token cache failure.
	#[error("{0}")]
	Storage(
		#[from]
		#[source]
		crate::store::StoreError,
	),
	/// Required configuration is missing or invalid.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Transport failure (DNS, TCP, TLS).
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// Token endpoint answered with a body that could not be decoded.
	#[error(transparent)]
	Decode(#[from] DecodeError),
	/// Token endpoint answered with a non-2xx status.
	#[error(transparent)]
	OAuth2(#[from] OAuth2Error),

	/// Authorization endpoint answered 2xx instead of redirecting; the resource owner has not
	/// approved the client yet.
	#[error("User approval is required for client `{client_id}` with scope `{scope}`.")]
	UserApprovalRequired {
		/// Client asking for approval.
		client_id: String,
		/// Requested scope string.
		scope: String,
	},
	/// Authorization redirect did not carry the expected credential; the caller must follow
	/// the redirect in a user agent.
	#[error("A user redirect is required to complete authorization.")]
	UserRedirectRequired {
		/// Redirect target reported by the authorization server, if any.
		location: Option<Url>,
	},
	/// `state` returned by the authorization server differs from the one that was sent.
	#[error("Possible CSRF detected: the authorization state did not round-trip.")]
	PossibleCsrf {
		/// State sent on the authorize request.
		expected: String,
		/// State echoed by the authorization server.
		returned: Option<String>,
	},
	/// Operation is not defined for the grant type.
	#[error("The {grant} grant does not support {operation}.")]
	UnsupportedOperation {
		/// Grant that rejected the operation.
		grant: GrantType,
		/// Operation label.
		operation: &'static str,
	},
}

/// Configuration and validation failures.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// HTTP request construction failed.
	#[error(transparent)]
	HttpRequest(#[from] oauth2::http::Error),
	/// A configured URI cannot be parsed.
	#[error("The {field} URI is invalid.")]
	InvalidUri {
		/// Configuration field holding the URI.
		field: &'static str,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// A configured header cannot be represented on the wire.
	#[error("Header `{name}` is invalid.")]
	InvalidHeader {
		/// Header name as configured.
		name: String,
	},
	/// A required field is missing or empty.
	#[error("Missing required field: {field}.")]
	MissingField {
		/// Field label.
		field: &'static str,
	},
	/// An identifier failed validation.
	#[error(transparent)]
	InvalidIdentifier(#[from] crate::auth::IdentifierError),
	/// Configured scopes failed validation.
	#[error("Configured scopes are invalid.")]
	InvalidScope(#[from] crate::auth::ScopeValidationError),
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the {endpoint} endpoint.")]
	Network {
		/// Endpoint label (`authorization` or `token`).
		endpoint: &'static str,
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the authorization server.")]
	Io(#[from] std::io::Error),
	/// Transport reported a failure without a structured error.
	#[error("HTTP client error occurred while calling the {endpoint} endpoint: {message}.")]
	Other {
		/// Endpoint label (`authorization` or `token`).
		endpoint: &'static str,
		/// Transport-supplied message.
		message: String,
	},
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(
		endpoint: &'static str,
		src: impl 'static + Send + Sync + std::error::Error,
	) -> Self {
		Self::Network { endpoint, source: Box::new(src) }
	}
}

/// Failures decoding a token endpoint or redirect payload.
#[derive(Debug, ThisError)]
pub enum DecodeError {
	/// JSON body could not be parsed.
	#[error("Token response contains malformed JSON.")]
	Json {
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
	/// XML body could not be parsed.
	#[cfg(feature = "xml")]
	#[error("Token response contains malformed XML.")]
	Xml {
		/// Structured parsing failure.
		#[source]
		source: quick_xml::DeError,
	},
	/// Body was not valid UTF-8.
	#[error("Token response body is not valid UTF-8.")]
	Utf8(#[from] std::str::Utf8Error),
	/// Content type is not one the codec understands.
	#[error("Unsupported token response content type: {content_type}.")]
	UnsupportedContentType {
		/// Content type reported by the server.
		content_type: String,
	},
	/// A field required to build a token is absent.
	#[error("Token response is missing {field}.")]
	MissingField {
		/// Field name.
		field: &'static str,
	},
	/// A field has an unusable value.
	#[error("Token response field {field} is invalid: {value}.")]
	InvalidField {
		/// Field name.
		field: &'static str,
		/// Offending raw value.
		value: String,
	},
}

/// Non-2xx answer from the token endpoint, carrying the decoded OAuth error body.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub struct OAuth2Error {
	/// HTTP status code.
	pub status: u16,
	/// OAuth `error` code, when decodable.
	pub error: Option<String>,
	/// OAuth `error_description`, when present.
	pub error_description: Option<String>,
	/// OAuth `error_uri`, when present.
	pub error_uri: Option<String>,
}
impl OAuth2Error {
	/// Builds an error from the status and the decoded error body fields.
	pub fn from_fields(status: u16, fields: &BTreeMap<String, String>) -> Self {
		Self {
			status,
			error: fields.get("error").cloned(),
			error_description: fields.get("error_description").cloned(),
			error_uri: fields.get("error_uri").cloned(),
		}
	}
}
impl Display for OAuth2Error {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "Token endpoint returned HTTP {}: ", self.status)?;

		match (&self.error, &self.error_description) {
			(Some(error), Some(description)) => write!(f, "{error} ({description})."),
			(Some(error), None) => write!(f, "{error}."),
			(None, Some(description)) => write!(f, "{description}."),
			(None, None) => f.write_str("no error details."),
		}
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn oauth2_error_reads_standard_fields() {
		let fields = BTreeMap::from([
			("error".to_string(), "invalid_client".to_string()),
			("error_description".to_string(), "bad secret".to_string()),
		]);
		let err = OAuth2Error::from_fields(401, &fields);

		assert_eq!(err.error.as_deref(), Some("invalid_client"));
		assert_eq!(err.error_description.as_deref(), Some("bad secret"));
		assert!(err.error_uri.is_none());
		assert_eq!(err.to_string(), "Token endpoint returned HTTP 401: invalid_client (bad secret).");
	}

	#[test]
	fn oauth2_error_without_body_still_formats() {
		let err = OAuth2Error::from_fields(500, &BTreeMap::new());

		assert_eq!(err.to_string(), "Token endpoint returned HTTP 500: no error details.");
	}

	#[test]
	fn unsupported_operation_names_the_grant() {
		let err = Error::UnsupportedOperation {
			grant: GrantType::ClientCredentials,
			operation: "refresh",
		};

		assert_eq!(err.to_string(), "The client_credentials grant does not support refresh.");
	}
}
