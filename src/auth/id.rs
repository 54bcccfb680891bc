//! Validated identifiers for OAuth clients and acting principals.

// std
use std::borrow::Borrow;
// self
use crate::_prelude::*;

macro_rules! def_id {
	($(#[$meta:meta])* $name:ident, $kind:literal, $validate:path) => {
		$(#[$meta])*
		#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
		#[serde(try_from = "String", into = "String")]
		pub struct $name(String);
		impl $name {
			/// Validates and wraps `value`.
			pub fn new(value: impl Into<String>) -> Result<Self, IdentifierError> {
				let value = value.into();

				$validate($kind, &value)?;

				Ok(Self(value))
			}

			/// Borrows the identifier.
			pub fn as_str(&self) -> &str {
				&self.0
			}
		}
		impl AsRef<str> for $name {
			fn as_ref(&self) -> &str {
				&self.0
			}
		}
		impl Borrow<str> for $name {
			fn borrow(&self) -> &str {
				&self.0
			}
		}
		impl From<$name> for String {
			fn from(value: $name) -> Self {
				value.0
			}
		}
		impl TryFrom<String> for $name {
			type Error = IdentifierError;

			fn try_from(value: String) -> Result<Self, Self::Error> {
				Self::new(value)
			}
		}
		impl FromStr for $name {
			type Err = IdentifierError;

			fn from_str(s: &str) -> Result<Self, Self::Err> {
				Self::new(s)
			}
		}
		impl Debug for $name {
			fn fmt(&self, f: &mut Formatter) -> FmtResult {
				write!(f, concat!($kind, "({})"), self.0)
			}
		}
		impl Display for $name {
			fn fmt(&self, f: &mut Formatter) -> FmtResult {
				f.write_str(&self.0)
			}
		}
	};
}

/// Error returned when identifier validation fails.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, ThisError)]
pub enum IdentifierError {
	/// The identifier was empty.
	#[error("{kind} identifier cannot be empty.")]
	Empty {
		/// Kind of identifier (`Client`, `Principal`).
		kind: &'static str,
	},
	/// The identifier contains a control character.
	#[error("{kind} identifier contains the forbidden character {found:?}.")]
	ForbiddenCharacter {
		/// Kind of identifier (`Client`, `Principal`).
		kind: &'static str,
		/// First offending character.
		found: char,
	},
}

def_id! {
	/// OAuth 2.0 client identifier registered with the authorization server.
	///
	/// Any non-empty string without control characters is accepted, so URL-shaped ids such as
	/// client metadata documents work.
	ClientId, "Client", validate
}
def_id! {
	/// Stable identity of the user a token is obtained for. Only used as part of cache keys, so
	/// any non-empty string without control characters is accepted.
	PrincipalId, "Principal", validate
}

fn validate(kind: &'static str, value: &str) -> Result<(), IdentifierError> {
	if value.is_empty() {
		return Err(IdentifierError::Empty { kind });
	}
	if let Some(found) = value.chars().find(|c| c.is_control()) {
		return Err(IdentifierError::ForbiddenCharacter { kind, found });
	}

	Ok(())
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn client_ids_reject_only_empty_and_control_characters() {
		assert_eq!(
			ClientId::new("client\n123"),
			Err(IdentifierError::ForbiddenCharacter { kind: "Client", found: '\n' })
		);
		assert_eq!(ClientId::new(""), Err(IdentifierError::Empty { kind: "Client" }));

		for raw in ["https://client.example.com/meta.json", "client 123", "urn:client:123"] {
			let client = ClientId::new(raw).expect("Separator characters should be accepted.");

			assert_eq!(client.as_str(), raw);
		}

		let long = ClientId::new("c".repeat(1024)).expect("Long client ids should be accepted.");

		assert_eq!(long.as_str().len(), 1024);

		let client = ClientId::new("client-123").expect("Client fixture should be considered valid.");

		assert_eq!(client.as_str(), "client-123");
		assert_eq!(format!("{client:?}"), "Client(client-123)");
	}

	#[test]
	fn principals_accept_display_names() {
		let principal = PrincipalId::new("Jane Doe").expect("Spaces are allowed in principals.");

		assert_eq!(principal.to_string(), "Jane Doe");
		assert!(PrincipalId::new("").is_err());
		assert!(PrincipalId::new("tab\tseparated").is_err());
		assert!(PrincipalId::new("a".repeat(1024)).is_ok());
	}

	#[test]
	fn deserialization_revalidates() {
		let client: ClientId =
			serde_json::from_str("\"cid\"").expect("Client should deserialize successfully.");

		assert_eq!(client.as_ref(), "cid");
		assert!(serde_json::from_str::<ClientId>("\"a\\u0007b\"").is_err());
		assert!(serde_json::from_str::<PrincipalId>("\"\"").is_err());
	}

	#[test]
	fn borrow_supports_str_lookup() {
		let map = HashMap::from([(
			PrincipalId::new("alice").expect("Principal used for lookup should be valid."),
			7_u8,
		)]);

		assert_eq!(map.get("alice"), Some(&7));
	}
}
