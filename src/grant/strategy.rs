//! Per-grant token acquisition strategies.
//!
//! A strategy turns an [`AuthenticatedRequestContext`] into either a token endpoint request or,
//! for the implicit grant, a token read straight off the authorization redirect. Strategies hold
//! only their grant-specific settings; everything shared comes from the context.

mod authorization_code;
mod client_credentials;
mod implicit;
mod password;

pub use authorization_code::AuthorizationCodeStrategy;
pub use client_credentials::ClientCredentialsStrategy;
pub use implicit::ImplicitStrategy;
pub use password::ResourceOwnerPasswordStrategy;

// crates.io
use oauth2::http::header::{CONTENT_TYPE, LOCATION};
// self
use crate::{
	_prelude::*,
	auth::{AccessToken, AccessTokenRequest, AuthorizationRequest},
	codec::{self, BodyCodec, DefaultBodyCodec},
	error::{ConfigError, DecodeError, OAuth2Error},
	flows::AuthenticatedRequestContext,
	grant::GrantType,
	oauth::AuthorizationServerClient,
};

/// Boxed future returned by [`AccessTokenStrategy::new_access_token_request`].
pub type StrategyFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T>> + 'a + Send>>;

/// Outcome of the first phase of a token acquisition.
#[derive(Clone, Debug)]
pub enum TokenIssue {
	/// Token endpoint exchange still to be performed.
	Request(AccessTokenRequest),
	/// Token already obtained (implicit grant).
	Issued(AccessToken),
}

/// Knows how one grant obtains and refreshes tokens.
pub trait AccessTokenStrategy
where
	Self: 'static + Send + Sync,
{
	/// Grant implemented by the strategy.
	fn grant(&self) -> GrantType;

	/// Prepares a new token. Redirect-based grants call `server` to query the authorization
	/// endpoint first.
	fn new_access_token_request<'a>(
		&'a self,
		context: &'a AuthenticatedRequestContext,
		server: &'a dyn AuthorizationServerClient,
	) -> StrategyFuture<'a, TokenIssue>;

	/// Prepares a refresh exchange for `token`.
	///
	/// Grants without refresh semantics keep this default and fail with
	/// [`Error::UnsupportedOperation`].
	fn new_refresh_token_request(
		&self,
		token: &AccessToken,
		context: &AuthenticatedRequestContext,
	) -> Result<AccessTokenRequest> {
		let _ = (token, context);

		Err(Error::UnsupportedOperation { grant: self.grant(), operation: "refresh" })
	}
}

/// `{grant_type: refresh_token, refresh_token, scope?}` for grants that support refresh.
pub(crate) fn refresh_token_request(
	token: &AccessToken,
	context: &AuthenticatedRequestContext,
) -> Result<AccessTokenRequest> {
	let refresh_token =
		token.refresh_token().ok_or(ConfigError::MissingField { field: "refresh_token" })?;

	Ok(context
		.token_request(GrantType::RefreshToken)
		.with_parameter("refresh_token", refresh_token)
		.with_scope(&context.scope()))
}

/// Where the authorization server put the grant's payload on the redirect.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum RedirectPart {
	Query,
	Fragment,
}

/// Decoded authorization redirect.
#[derive(Clone, Debug)]
pub(crate) struct Redirect {
	pub(crate) location: Url,
	pub(crate) fields: BTreeMap<String, String>,
}
impl Redirect {
	pub(crate) fn field(&self, name: &str) -> Option<&str> {
		self.fields.get(name).map(String::as_str).filter(|value| !value.is_empty())
	}
}

/// Queries the authorization endpoint and validates the redirect it answers with.
///
/// A 2xx answer means the resource owner has not approved the client. Any other non-redirect
/// status surfaces as [`OAuth2Error`] built from the response body. A redirect must echo the
/// request's `state` when one was sent; an `error` field on the redirect surfaces as
/// [`OAuth2Error`] too.
pub(crate) async fn follow_authorization(
	server: &dyn AuthorizationServerClient,
	request: &AuthorizationRequest,
	part: RedirectPart,
) -> Result<Redirect> {
	let response = server.authorize(request).await?;
	let status = response.status();

	if status.is_success() {
		return Err(Error::UserApprovalRequired {
			client_id: request.client_id.to_string(),
			scope: request.scope.clone(),
		});
	}
	if !status.is_redirection() {
		let content_type =
			response.headers().get(CONTENT_TYPE).and_then(|value| value.to_str().ok());
		let fields = DefaultBodyCodec.decode(response.body(), content_type).unwrap_or_default();

		return Err(OAuth2Error::from_fields(status.as_u16(), &fields).into());
	}

	let Some(raw) = response.headers().get(LOCATION).and_then(|value| value.to_str().ok()) else {
		return Err(Error::UserRedirectRequired { location: None });
	};
	let location = request
		.authorization_uri
		.join(raw)
		.map_err(|_| DecodeError::InvalidField { field: "location", value: raw.into() })?;
	let payload = match part {
		RedirectPart::Query => location.query(),
		RedirectPart::Fragment => location.fragment(),
	};
	let fields = codec::decode_form(payload.unwrap_or_default().as_bytes());

	verify_state(request.state.as_deref(), fields.get("state").map(String::as_str))?;

	if fields.contains_key("error") {
		return Err(OAuth2Error::from_fields(status.as_u16(), &fields).into());
	}

	Ok(Redirect { location, fields })
}

fn verify_state(expected: Option<&str>, returned: Option<&str>) -> Result<()> {
	match expected {
		Some(expected) if returned != Some(expected) => Err(Error::PossibleCsrf {
			expected: expected.into(),
			returned: returned.map(Into::into),
		}),
		_ => Ok(()),
	}
}
