// self
use crate::{
	_prelude::*,
	flows::AuthenticatedRequestContext,
	grant::{AccessTokenStrategy, GrantType, StrategyFuture, TokenIssue},
	oauth::AuthorizationServerClient,
};

/// `{grant_type: client_credentials, scope}`; no user interaction, no refresh.
#[derive(Clone, Copy, Debug, Default)]
pub struct ClientCredentialsStrategy;
impl AccessTokenStrategy for ClientCredentialsStrategy {
	fn grant(&self) -> GrantType {
		GrantType::ClientCredentials
	}

	fn new_access_token_request<'a>(
		&'a self,
		context: &'a AuthenticatedRequestContext,
		_: &'a dyn AuthorizationServerClient,
	) -> StrategyFuture<'a, TokenIssue> {
		Box::pin(async move {
			let request =
				context.token_request(GrantType::ClientCredentials).with_scope(&context.scope());

			Ok(TokenIssue::Request(request))
		})
	}
}
