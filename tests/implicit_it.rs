// crates.io
use httpmock::prelude::*;
// self
use oauth2_client::{
	_preludet::*,
	auth::{AccessToken, ClientCredentials, TokenType},
	flows::ResourceRequest,
	grant::{GrantProperties, RedirectGrant},
	oauth::ClientAuthMethod,
};

fn properties(server: &MockServer) -> GrantProperties {
	let credentials =
		ClientCredentials::new("cid").expect("Client credentials fixture should be valid.");
	let redirect = RedirectGrant::new(server.url("/authorize"))
		.and_then(|r| r.with_redirect_uri("https://app.example.com/cb"))
		.expect("Redirect settings should build.")
		.with_state("xyz");

	GrantProperties::implicit(server.url("/token"), credentials, redirect)
		.and_then(|p| p.with_scopes(["read"]))
		.expect("Implicit properties should build.")
}

fn resource() -> ResourceRequest {
	ResourceRequest::parse("https://api.example.com/items").expect("Resource URI should parse.")
}

#[tokio::test]
async fn implicit_reads_token_from_fragment() {
	let server = MockServer::start_async().await;
	let authorize = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/authorize")
				.query_param("response_type", "token")
				.query_param("state", "xyz");
			then.status(302).header(
				"location",
				"https://app.example.com/cb#access_token=imp&token_type=bearer&expires_in=120&state=xyz",
			);
		})
		.await;
	let token_endpoint = server
		.mock_async(|when, then| {
			when.method(POST).path("/token");
			then.status(500);
		})
		.await;
	let (authentication, store) =
		build_reqwest_test_authentication(properties(&server), ClientAuthMethod::Header);
	let before = OffsetDateTime::now_utc();
	let token = authentication.token(&resource()).await.expect("Implicit grant should succeed.");
	let expiration = token.expiration.expect("Fragment carried an expiry.");

	assert_eq!(token.token_type, TokenType::Bearer);
	assert_eq!(token.token.expose(), "imp");
	assert_eq!(token.scope(), "read");
	assert!(expiration >= before + Duration::seconds(119));
	assert_eq!(store.len(), 1);

	authorize.assert_async().await;
	token_endpoint.assert_calls_async(0).await;
}

#[tokio::test]
async fn implicit_without_fragment_token_requires_redirect() {
	let server = MockServer::start_async().await;
	let _authorize = server
		.mock_async(|when, then| {
			when.method(GET).path("/authorize");
			then.status(302).header("location", "https://app.example.com/cb#state=xyz");
		})
		.await;
	let (authentication, store) =
		build_reqwest_test_authentication(properties(&server), ClientAuthMethod::Header);
	let err = authentication
		.token(&resource())
		.await
		.expect_err("A fragment without a token should be surfaced.");

	assert!(matches!(err, Error::UserRedirectRequired { location: Some(_) }));
	assert!(store.is_empty());
}

#[tokio::test]
async fn implicit_rejects_mismatched_fragment_state() {
	let server = MockServer::start_async().await;
	let authorize = server
		.mock_async(|when, then| {
			when.method(GET).path("/authorize").query_param("state", "xyz");
			then.status(302)
				.header("location", "https://app.example.com/cb#access_token=imp&state=wrong");
		})
		.await;
	let (authentication, store) =
		build_reqwest_test_authentication(properties(&server), ClientAuthMethod::Header);
	let err = authentication
		.token(&resource())
		.await
		.expect_err("A fragment echoing another state should be rejected.");

	match err {
		Error::PossibleCsrf { expected, returned } => {
			assert_eq!(expected, "xyz");
			assert_eq!(returned.as_deref(), Some("wrong"));
		},
		other => panic!("Unexpected error: {other:?}."),
	}

	assert!(store.is_empty());

	authorize.assert_async().await;
}

#[tokio::test]
async fn implicit_expired_token_is_reissued_not_refreshed() {
	let server = MockServer::start_async().await;
	let authorize = server
		.mock_async(|when, then| {
			when.method(GET).path("/authorize");
			then.status(302)
				.header("location", "https://app.example.com/cb#access_token=again&state=xyz");
		})
		.await;
	let (authentication, store) =
		build_reqwest_test_authentication(properties(&server), ClientAuthMethod::Header);
	let key = authentication.context(&resource()).key();

	store.put_now(
		key.clone(),
		AccessToken::bearer("old")
			.with_expiration(OffsetDateTime::now_utc() - Duration::seconds(1)),
	);

	let token = authentication.token(&resource()).await.expect("Reissue should succeed.");

	assert_eq!(token.token.expose(), "again");
	assert_eq!(store.get_now(&key), Some(token));

	authorize.assert_async().await;
}
