//! Resolves a client-credentials token against a mock authorization server and shows the second
//! lookup being served from the in-memory cache.

// std
use std::sync::Arc;
// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
// self
use oauth2_client::{
	auth::ClientCredentials,
	flows::{OAuth2Authentication, ResourceRequest},
	grant::GrantProperties,
	oauth::ClientAuthMethod,
	store::MemoryStore,
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;
	let token_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/token");
			then.status(200).header("content-type", "application/json").body(
				"{\"access_token\":\"demo-access\",\"token_type\":\"bearer\",\"expires_in\":900}",
			);
		})
		.await;
	let properties = GrantProperties::client_credentials(
		server.url("/token"),
		ClientCredentials::new("demo-client")?.with_secret("super-secret"),
	)?
	.with_scopes(["email.read", "profile.read"])?;
	let store = Arc::new(MemoryStore::default());
	let authentication =
		OAuth2Authentication::reqwest(properties, ClientAuthMethod::Header, store.clone())?;
	let request = ResourceRequest::parse("https://api.example.com/profile")?;
	let header = authentication.content(&request).await?;
	let cached = authentication.content(&request).await?;

	println!("Authorization: {header}.");
	println!("Second lookup reused the cached token: {}.", header == cached);
	println!("Cached entries: {}.", store.len());

	token_mock.assert_async().await;

	Ok(())
}
