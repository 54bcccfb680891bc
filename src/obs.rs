//! Optional observability helpers for token acquisition.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit structured spans named `oauth2_client.flow` with `flow` (grant),
//!   `stage` (call site), and `decision` (cache branch) fields, plus a debug event per decision.
//! - Enable `metrics` to increment the `oauth2_client_flow_total` counter for every
//!   attempt/success/failure, labeled by `flow` + `outcome`, and the
//!   `oauth2_client_token_decision_total` counter labeled by `flow` + `decision`.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::{_prelude::*, grant::GrantType};

/// Token acquisition kinds observed by the client.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FlowKind {
	/// Client Credentials grant.
	ClientCredentials,
	/// Resource Owner Password grant.
	Password,
	/// Authorization Code grant.
	AuthorizationCode,
	/// Implicit grant.
	Implicit,
	/// Refresh token exchange.
	Refresh,
}
impl FlowKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			FlowKind::ClientCredentials => "client_credentials",
			FlowKind::Password => "password",
			FlowKind::AuthorizationCode => "authorization_code",
			FlowKind::Implicit => "implicit",
			FlowKind::Refresh => "refresh",
		}
	}
}
impl From<GrantType> for FlowKind {
	fn from(grant: GrantType) -> Self {
		match grant {
			GrantType::ClientCredentials => FlowKind::ClientCredentials,
			GrantType::Password => FlowKind::Password,
			GrantType::AuthorizationCode => FlowKind::AuthorizationCode,
			GrantType::Implicit => FlowKind::Implicit,
			GrantType::RefreshToken => FlowKind::Refresh,
		}
	}
}
impl Display for FlowKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each network attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FlowOutcome {
	/// Exchange started.
	Attempt,
	/// Exchange produced a token.
	Success,
	/// Failure propagated back to the caller.
	Failure,
}
impl FlowOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			FlowOutcome::Attempt => "attempt",
			FlowOutcome::Success => "success",
			FlowOutcome::Failure => "failure",
		}
	}
}
impl Display for FlowOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Branch taken by the repository for one lookup.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TokenDecision {
	/// Cached token still valid; no network call.
	Fresh,
	/// Cached token expired and was refreshed.
	Refresh,
	/// Cached token expired without a refresh token and was reissued.
	Reissue,
	/// Nothing cached; a token was issued.
	Miss,
}
impl TokenDecision {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			TokenDecision::Fresh => "fresh",
			TokenDecision::Refresh => "refresh",
			TokenDecision::Reissue => "reissue",
			TokenDecision::Miss => "miss",
		}
	}
}
impl Display for TokenDecision {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
