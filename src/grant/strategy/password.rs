// self
use crate::{
	_prelude::*,
	auth::{AccessToken, AccessTokenRequest, ResourceOwner},
	flows::AuthenticatedRequestContext,
	grant::{AccessTokenStrategy, GrantType, StrategyFuture, TokenIssue, strategy},
	oauth::AuthorizationServerClient,
};

/// `{grant_type: password, username, password, scope}`.
#[derive(Clone, Debug)]
pub struct ResourceOwnerPasswordStrategy {
	resource_owner: ResourceOwner,
}
impl ResourceOwnerPasswordStrategy {
	/// Creates the strategy for `resource_owner`.
	pub fn new(resource_owner: ResourceOwner) -> Self {
		Self { resource_owner }
	}
}
impl AccessTokenStrategy for ResourceOwnerPasswordStrategy {
	fn grant(&self) -> GrantType {
		GrantType::Password
	}

	fn new_access_token_request<'a>(
		&'a self,
		context: &'a AuthenticatedRequestContext,
		_: &'a dyn AuthorizationServerClient,
	) -> StrategyFuture<'a, TokenIssue> {
		Box::pin(async move {
			let request = context
				.token_request(GrantType::Password)
				.with_parameter("username", &self.resource_owner.username)
				.with_parameter("password", self.resource_owner.password.expose())
				.with_scope(&context.scope());

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
