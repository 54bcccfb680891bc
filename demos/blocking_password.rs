//! Drives the resource owner password grant through the blocking façade, then forces a refresh
//! by planting an expired token in the cache.

// std
use std::sync::Arc;
// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
use time::{Duration, OffsetDateTime};
// self
use oauth2_client::{
	auth::{ClientCredentials, ResourceOwner},
	flows::{BlockingOAuth2Authentication, ResourceRequest},
	grant::GrantProperties,
	oauth::ClientAuthMethod,
	store::MemoryStore,
};

fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start();
	let password_mock = server.mock(|when, then| {
		when.method(POST).path("/token").body_includes("grant_type=password");
		then.status(200).header("content-type", "application/json").body(
			"{\"access_token\":\"pw-access\",\"token_type\":\"bearer\",\"expires_in\":900,\"refresh_token\":\"pw-refresh\"}",
		);
	});
	let refresh_mock = server.mock(|when, then| {
		when.method(POST).path("/token").body_includes("grant_type=refresh_token");
		then.status(200)
			.header("content-type", "application/x-www-form-urlencoded")
			.body("access_token=refreshed-access&token_type=bearer&expires_in=900");
	});
	let properties = GrantProperties::resource_owner(
		server.url("/token"),
		ClientCredentials::new("demo-client")?.with_secret("super-secret"),
		ResourceOwner::new("alice", "correct horse")?,
	)?
	.with_scopes(["profile.read"])?;
	let store = Arc::new(MemoryStore::default());
	let authentication = BlockingOAuth2Authentication::reqwest(
		properties,
		ClientAuthMethod::FormParameter,
		store.clone(),
	)?;
	let request = ResourceRequest::parse("https://api.example.com/profile")?;

	println!("Issued: {}.", authentication.content(&request)?);

	let key = authentication.as_async().context(&request).key();

	if let Some(cached) = store.get_now(&key) {
		let expired = cached.with_expiration(OffsetDateTime::now_utc() - Duration::seconds(1));

		store.put_now(key, expired);
	}

	let refreshed = authentication.token(&request)?;

	println!("Refreshed: {refreshed}.");
	println!("Refresh token carried forward: {:?}.", refreshed.refresh_token());

	password_mock.assert();
	refresh_mock.assert();

	Ok(())
}
