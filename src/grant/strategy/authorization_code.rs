// self
use crate::{
	_prelude::*,
	auth::{AccessToken, AccessTokenRequest},
	flows::AuthenticatedRequestContext,
	grant::{
		AccessTokenStrategy, GrantType, RedirectGrant, StrategyFuture, TokenIssue,
		strategy::{self, RedirectPart},
	},
	oauth::AuthorizationServerClient,
};

/// Two-phase code grant: query the authorization endpoint for a `code`, then exchange it as
/// `{grant_type: authorization_code, code, redirect_uri?}`.
#[derive(Clone, Debug)]
pub struct AuthorizationCodeStrategy {
	redirect: RedirectGrant,
}
impl AuthorizationCodeStrategy {
	/// Creates the strategy with its authorization endpoint settings.
	pub fn new(redirect: RedirectGrant) -> Self {
		Self { redirect }
	}
}
impl AccessTokenStrategy for AuthorizationCodeStrategy {
	fn grant(&self) -> GrantType {
		GrantType::AuthorizationCode
	}

	fn new_access_token_request<'a>(
		&'a self,
		context: &'a AuthenticatedRequestContext,
		server: &'a dyn AuthorizationServerClient,
	) -> StrategyFuture<'a, TokenIssue> {
		Box::pin(async move {
			let authorization =
				self.redirect.authorization_request(context.client_id(), context.scope(), "code");
			let redirect =
				strategy::follow_authorization(server, &authorization, RedirectPart::Query).await?;
			let Some(code) = redirect.field("code") else {
				return Err(Error::UserRedirectRequired { location: Some(redirect.location) });
			};
			let request = context
				.token_request(GrantType::AuthorizationCode)
				.with_parameter("code", code)
				.with_optional_parameter(
					"redirect_uri",
					self.redirect.redirect_uri.as_ref().map(Url::as_str),
				);

			Ok(TokenIssue::Request(request))
		})
	}

	fn new_refresh_token_request(
		&self,
		token: &AccessToken,
		context: &AuthenticatedRequestContext,
	) -> Result<AccessTokenRequest> {
		strategy::refresh_token_request(token, context)
	}
}
