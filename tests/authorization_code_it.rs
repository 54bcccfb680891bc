// crates.io
use httpmock::prelude::*;
// self
use oauth2_client::{
	_preludet::*,
	auth::ClientCredentials,
	error::OAuth2Error,
	flows::ResourceRequest,
	grant::{GrantProperties, RedirectGrant},
	oauth::ClientAuthMethod,
};

const TOKEN_BODY: &str =
	r#"{"access_token":"code-token","token_type":"bearer","expires_in":600,"refresh_token":"r1","scope":"read"}"#;
const REDIRECT_URI: &str = "https://app.example.com/cb";

fn properties(server: &MockServer, state: Option<&str>) -> GrantProperties {
	let credentials = ClientCredentials::new("cid")
		.expect("Client credentials fixture should be valid.")
		.with_secret("secret");
	let mut redirect = RedirectGrant::new(server.url("/authorize"))
		.and_then(|r| r.with_redirect_uri(REDIRECT_URI))
		.expect("Redirect settings should build.")
		.with_cookie("JSESSIONID=abc");

	if let Some(state) = state {
		redirect = redirect.with_state(state);
	}

	GrantProperties::authorization_code(server.url("/token"), credentials, redirect)
		.and_then(|p| p.with_scopes(["read"]))
		.expect("Authorization code properties should build.")
}

fn resource() -> ResourceRequest {
	ResourceRequest::parse("https://api.example.com/items").expect("Resource URI should parse.")
}

#[tokio::test]
async fn authorization_code_exchanges_redirected_code() {
	let server = MockServer::start_async().await;
	let authorize = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/authorize")
				.query_param("response_type", "code")
				.query_param("client_id", "cid")
				.query_param("scope", "read")
				.query_param("redirect_uri", REDIRECT_URI)
				.query_param("state", "right")
				.header("cookie", "JSESSIONID=abc");
			then.status(302).header("location", "https://app.example.com/cb?code=abc&state=right");
		})
		.await;
	let token = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/token")
				.header("authorization", "Basic Y2lkOnNlY3JldA==")
				.body(
					"grant_type=authorization_code&code=abc&redirect_uri=https%3A%2F%2Fapp.example.com%2Fcb",
				);
			then.status(200).header("content-type", "application/json").body(TOKEN_BODY);
		})
		.await;
	let (authentication, store) = build_reqwest_test_authentication(
		properties(&server, Some("right")),
		ClientAuthMethod::Header,
	);
	let issued = authentication.token(&resource()).await.expect("Code exchange should succeed.");

	assert_eq!(issued.to_string(), "Bearer code-token");
	assert_eq!(issued.refresh_token(), Some("r1"));
	assert_eq!(store.len(), 1);

	authorize.assert_async().await;
	token.assert_async().await;
}

#[tokio::test]
async fn authorization_code_resolves_relative_location() {
	let server = MockServer::start_async().await;
	let authorize = server
		.mock_async(|when, then| {
			when.method(GET).path("/authorize");
			then.status(303).header("location", "/cb?code=rel");
		})
		.await;
	let token = server
		.mock_async(|when, then| {
			when.method(POST).path("/token").body_includes("code=rel");
			then.status(200).header("content-type", "application/json").body(TOKEN_BODY);
		})
		.await;
	let (authentication, _store) =
		build_reqwest_test_authentication(properties(&server, None), ClientAuthMethod::Header);

	authentication.token(&resource()).await.expect("Relative redirect should be resolved.");

	authorize.assert_async().await;
	token.assert_async().await;
}

#[tokio::test]
async fn authorization_code_rejects_mismatched_state() {
	let server = MockServer::start_async().await;
	let _authorize = server
		.mock_async(|when, then| {
			when.method(GET).path("/authorize");
			then.status(302).header("location", "https://app.example.com/cb?code=abc&state=wrong");
		})
		.await;
	let token = server
		.mock_async(|when, then| {
			when.method(POST).path("/token");
			then.status(200).header("content-type", "application/json").body(TOKEN_BODY);
		})
		.await;
	let (authentication, store) = build_reqwest_test_authentication(
		properties(&server, Some("right")),
		ClientAuthMethod::Header,
	);
	let err = authentication
		.token(&resource())
		.await
		.expect_err("A mismatched state should abort the exchange.");

	match err {
		Error::PossibleCsrf { expected, returned } => {
			assert_eq!(expected, "right");
			assert_eq!(returned.as_deref(), Some("wrong"));
		},
		other => panic!("Unexpected error: {other:?}."),
	}

	assert!(store.is_empty());

	token.assert_calls_async(0).await;
}

#[tokio::test]
async fn authorization_code_requires_user_approval_on_success_status() {
	let server = MockServer::start_async().await;
	let _authorize = server
		.mock_async(|when, then| {
			when.method(GET).path("/authorize");
			then.status(200).header("content-type", "text/html").body("<html>approve?</html>");
		})
		.await;
	let (authentication, _store) =
		build_reqwest_test_authentication(properties(&server, None), ClientAuthMethod::Header);
	let err = authentication
		.token(&resource())
		.await
		.expect_err("A login page should require user approval.");

	match err {
		Error::UserApprovalRequired { client_id, scope } => {
			assert_eq!(client_id, "cid");
			assert_eq!(scope, "read");
		},
		other => panic!("Unexpected error: {other:?}."),
	}
}

#[tokio::test]
async fn authorization_code_surfaces_authorize_server_errors() {
	let server = MockServer::start_async().await;
	let authorize = server
		.mock_async(|when, then| {
			when.method(GET).path("/authorize");
			then.status(500)
				.header("content-type", "application/json")
				.body(r#"{"error":"server_error","error_description":"boom"}"#);
		})
		.await;
	let token_endpoint = server
		.mock_async(|when, then| {
			when.method(POST).path("/token");
			then.status(200).header("content-type", "application/json").body(TOKEN_BODY);
		})
		.await;
	let (authentication, store) =
		build_reqwest_test_authentication(properties(&server, None), ClientAuthMethod::Header);
	let err = authentication
		.token(&resource())
		.await
		.expect_err("A failing authorization endpoint should surface its error.");

	match err {
		Error::OAuth2(OAuth2Error { status, error, error_description, .. }) => {
			assert_eq!(status, 500);
			assert_eq!(error.as_deref(), Some("server_error"));
			assert_eq!(error_description.as_deref(), Some("boom"));
		},
		other => panic!("Unexpected error: {other:?}."),
	}

	assert!(store.is_empty());

	authorize.assert_async().await;
	token_endpoint.assert_calls_async(0).await;
}

#[tokio::test]
async fn authorization_code_without_code_requires_redirect() {
	let server = MockServer::start_async().await;
	let _authorize = server
		.mock_async(|when, then| {
			when.method(GET).path("/authorize");
			then.status(302).header("location", "https://login.example.com/signin?next=1");
		})
		.await;
	let (authentication, _store) =
		build_reqwest_test_authentication(properties(&server, None), ClientAuthMethod::Header);
	let err = authentication
		.token(&resource())
		.await
		.expect_err("A redirect without a code should be surfaced.");

	match err {
		Error::UserRedirectRequired { location: Some(location) } =>
			assert_eq!(location.as_str(), "https://login.example.com/signin?next=1"),
		other => panic!("Unexpected error: {other:?}."),
	}
}

#[tokio::test]
async fn authorization_code_surfaces_redirect_errors() {
	let server = MockServer::start_async().await;
	let _authorize = server
		.mock_async(|when, then| {
			when.method(GET).path("/authorize");
			then.status(302).header(
				"location",
				"https://app.example.com/cb?error=access_denied&error_description=denied&state=right",
			);
		})
		.await;
	let (authentication, _store) = build_reqwest_test_authentication(
		properties(&server, Some("right")),
		ClientAuthMethod::Header,
	);
	let err = authentication
		.token(&resource())
		.await
		.expect_err("A denied authorization should fail.");

	match err {
		Error::OAuth2(OAuth2Error { status, error, error_description, .. }) => {
			assert_eq!(status, 302);
			assert_eq!(error.as_deref(), Some("access_denied"));
			assert_eq!(error_description.as_deref(), Some("denied"));
		},
		other => panic!("Unexpected error: {other:?}."),
	}
}
