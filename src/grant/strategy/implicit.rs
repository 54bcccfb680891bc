// self
use crate::{
	_prelude::*,
	auth::TokenResponse,
	flows::AuthenticatedRequestContext,
	grant::{
		AccessTokenStrategy, GrantType, RedirectGrant, StrategyFuture, TokenIssue,
		strategy::{self, RedirectPart},
	},
	oauth::AuthorizationServerClient,
};

/// Redirect-only grant: the token is read from the redirect fragment and the token endpoint is
/// never called. Refresh is unsupported.
#[derive(Clone, Debug)]
pub struct ImplicitStrategy {
	redirect: RedirectGrant,
}
impl ImplicitStrategy {
	/// Creates the strategy with its authorization endpoint settings.
	pub fn new(redirect: RedirectGrant) -> Self {
		Self { redirect }
	}
}
impl AccessTokenStrategy for ImplicitStrategy {
	fn grant(&self) -> GrantType {
		GrantType::Implicit
	}

	fn new_access_token_request<'a>(
		&'a self,
		context: &'a AuthenticatedRequestContext,
		server: &'a dyn AuthorizationServerClient,
	) -> StrategyFuture<'a, TokenIssue> {
		Box::pin(async move {
			let scope = context.scope();
			let authorization =
				self.redirect.authorization_request(context.client_id(), scope.clone(), "token");
			let issued_at = OffsetDateTime::now_utc();
			let redirect =
				strategy::follow_authorization(server, &authorization, RedirectPart::Fragment)
					.await?;

			if redirect.field("access_token").is_none() {
				return Err(Error::UserRedirectRequired { location: Some(redirect.location) });
			}

			let token =
				TokenResponse::from_fields(&redirect.fields)?.into_access_token(issued_at, &scope)?;

			Ok(TokenIssue::Issued(token))
		})
	}
}
