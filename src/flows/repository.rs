//! Token lifecycle decisions: reuse, refresh, or reissue.

// self
use crate::{
	_prelude::*,
	auth::AccessToken,
	flows::AuthenticatedRequestContext,
	grant::{AccessTokenStrategy, GrantType, TokenIssue},
	oauth::AuthorizationServerClient,
	obs::{self, FlowKind, FlowOutcome, FlowSpan, TokenDecision},
	store::TokenStore,
};

/// Runs a grant's strategy against an authorization server.
#[derive(Clone)]
pub struct AccessTokenProvider {
	strategy: Arc<dyn AccessTokenStrategy>,
	server: Arc<dyn AuthorizationServerClient>,
}
impl AccessTokenProvider {
	/// Pairs a strategy with the server it talks to.
	pub fn new(
		strategy: Arc<dyn AccessTokenStrategy>,
		server: Arc<dyn AuthorizationServerClient>,
	) -> Self {
		Self { strategy, server }
	}

	/// Grant served by the strategy.
	pub fn grant(&self) -> GrantType {
		self.strategy.grant()
	}

	/// Obtains a brand-new token.
	pub async fn issue(&self, context: &AuthenticatedRequestContext) -> Result<AccessToken> {
		match self.strategy.new_access_token_request(context, self.server.as_ref()).await? {
			TokenIssue::Request(request) => self.server.require_token(&request).await,
			TokenIssue::Issued(token) => Ok(token),
		}
	}

	/// Exchanges the refresh token carried by `token`.
	///
	/// If the server does not rotate the refresh token, the previous one is kept on the new
	/// token.
	pub async fn refresh(
		&self,
		token: &AccessToken,
		context: &AuthenticatedRequestContext,
	) -> Result<AccessToken> {
		let request = self.strategy.new_refresh_token_request(token, context)?;
		let mut refreshed = self.server.require_token(&request).await?;

		if refreshed.refresh_token.is_none() {
			refreshed.refresh_token = token.refresh_token.clone();
		}

		Ok(refreshed)
	}
}
impl Debug for AccessTokenProvider {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("AccessTokenProvider").field("grant", &self.grant()).finish()
	}
}

/// Owns the token cache and decides, per lookup, whether a network exchange is needed.
///
/// Concurrent lookups on the same key are not coordinated: when several observe an absent or
/// expired token they each run their own exchange and the last cache write wins.
#[derive(Clone)]
pub struct AccessTokenRepository {
	store: Arc<dyn TokenStore>,
	provider: AccessTokenProvider,
}
impl AccessTokenRepository {
	/// Creates a repository over `store`.
	pub fn new(store: Arc<dyn TokenStore>, provider: AccessTokenProvider) -> Self {
		Self { store, provider }
	}

	/// Backing cache.
	pub fn store(&self) -> &Arc<dyn TokenStore> {
		&self.store
	}

	/// Token provider.
	pub fn provider(&self) -> &AccessTokenProvider {
		&self.provider
	}

	/// Returns a valid token for `context`.
	///
	/// - fresh cached token: returned without any network call
	/// - expired with a refresh token: refreshed
	/// - expired without one, or nothing cached: a new token is issued
	///
	/// A new token is cached only after the exchange fully succeeds; errors leave the cache
	/// untouched and are never retried.
	pub async fn find_token(&self, context: &AuthenticatedRequestContext) -> Result<AccessToken> {
		let kind = FlowKind::from(self.provider.grant());
		let span = FlowSpan::new(kind, "find_token");

		span.instrument(self.resolve(kind, &span, context)).await
	}

	async fn resolve(
		&self,
		kind: FlowKind,
		span: &FlowSpan,
		context: &AuthenticatedRequestContext,
	) -> Result<AccessToken> {
		let decide = |decision: TokenDecision| {
			span.record_decision(decision);
			obs::record_token_decision(kind, decision);
		};
		let key = context.key();
		let now = OffsetDateTime::now_utc();
		let token = match self.store.get(&key).await? {
			Some(cached) if !cached.expired_at(now) => {
				decide(TokenDecision::Fresh);

				return Ok(cached);
			},
			Some(cached) if cached.refresh_token.is_some() => {
				decide(TokenDecision::Refresh);

				let refresh = self.provider.refresh(&cached, context);

				observe_exchange(FlowKind::Refresh, refresh).await?
			},
			Some(_) => {
				decide(TokenDecision::Reissue);

				observe_exchange(kind, self.provider.issue(context)).await?
			},
			None => {
				decide(TokenDecision::Miss);

				observe_exchange(kind, self.provider.issue(context)).await?
			},
		};

		self.store.put(key, token.clone()).await?;

		Ok(token)
	}
}
impl Debug for AccessTokenRepository {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("AccessTokenRepository").field("provider", &self.provider).finish()
	}
}

async fn observe_exchange<F>(kind: FlowKind, exchange: F) -> Result<AccessToken>
where
	F: Future<Output = Result<AccessToken>>,
{
	obs::record_flow_outcome(kind, FlowOutcome::Attempt);

	let result = exchange.await;

	match &result {
		Ok(_) => obs::record_flow_outcome(kind, FlowOutcome::Success),
		Err(_) => obs::record_flow_outcome(kind, FlowOutcome::Failure),
	}

	result
}
