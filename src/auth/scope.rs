//! Scope lists carried by grant configuration and issued tokens.

// self
use crate::_prelude::*;

/// Errors emitted when validating configured scopes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum ScopeValidationError {
	/// Empty scope entries are not allowed.
	#[error("Scope entries cannot be empty.")]
	Empty,
	/// Scopes cannot contain embedded whitespace characters.
	#[error("Scope contains whitespace: {scope}.")]
	ContainsWhitespace {
		/// The offending scope string.
		scope: String,
	},
}

/// Ordered list of OAuth scopes without repeats.
///
/// Scopes keep the position of their first occurrence, so the space-joined wire form follows
/// the order they were configured (or granted) in.
#[derive(Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct ScopeSet(Vec<String>);
impl ScopeSet {
	/// Validates and collects `scopes`, dropping repeats.
	pub fn new<I, S>(scopes: I) -> Result<Self, ScopeValidationError>
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		let mut set = Self::default();

		for scope in scopes {
			set.push(scope)?;
		}

		Ok(set)
	}

	/// Reads a space-delimited `scope` field as sent by an authorization server.
	///
	/// Runs of whitespace separate entries; a blank field yields an empty set.
	pub fn parse(wire: &str) -> Self {
		let mut scopes = Vec::new();

		for scope in wire.split_whitespace() {
			if !scopes.iter().any(|known| known == scope) {
				scopes.push(scope.to_owned());
			}
		}

		Self(scopes)
	}

	/// Appends `scope` unless it is already present.
	pub fn push(&mut self, scope: impl Into<String>) -> Result<(), ScopeValidationError> {
		let scope = scope.into();

		if scope.is_empty() {
			return Err(ScopeValidationError::Empty);
		}
		if scope.chars().any(char::is_whitespace) {
			return Err(ScopeValidationError::ContainsWhitespace { scope });
		}
		if !self.contains(&scope) {
			self.0.push(scope);
		}

		Ok(())
	}

	/// Number of distinct scopes.
	pub fn len(&self) -> usize {
		self.0.len()
	}

	/// Returns true if no scopes are defined.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// Returns true if `scope` is in the list.
	pub fn contains(&self, scope: &str) -> bool {
		self.0.iter().any(|known| known == scope)
	}

	/// Scopes in order.
	pub fn iter(&self) -> impl Iterator<Item = &str> {
		self.0.iter().map(String::as_str)
	}

	/// Space-joined wire form.
	pub fn to_wire(&self) -> String {
		self.0.join(" ")
	}
}
impl Debug for ScopeSet {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_list().entries(self.iter()).finish()
	}
}
impl Display for ScopeSet {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(&self.to_wire())
	}
}
impl TryFrom<Vec<String>> for ScopeSet {
	type Error = ScopeValidationError;

	fn try_from(value: Vec<String>) -> Result<Self, Self::Error> {
		Self::new(value)
	}
}
impl From<ScopeSet> for Vec<String> {
	fn from(value: ScopeSet) -> Self {
		value.0
	}
}

/// Scope string for one call: configured scopes first, then the call's own.
///
/// Call scopes are appended verbatim, repeats included; only empty fragments are skipped.
pub fn merge_scopes<'a, I>(configured: &'a ScopeSet, call: I) -> String
where
	I: IntoIterator<Item = &'a str>,
{
	configured
		.iter()
		.chain(call.into_iter().filter(|scope| !scope.is_empty()))
		.collect::<Vec<_>>()
		.join(" ")
}
