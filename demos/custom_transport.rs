//! Plugs a hand-written blocking transport into the client.
//!
//! Any `Fn(HttpRequest) -> Result<HttpResponse, HttpClientError<E>>` is an `oauth2` blocking
//! client. Pair it with [`NetworkErrorMapper`] (or a mapper of your own) and the blocking façade
//! drives it like any other transport. The canned body carries no content type, so the codec
//! sniffs it as JSON.

// std
use std::{
	error::Error as StdError,
	fmt::{Display, Formatter, Result as FmtResult},
	sync::Arc,
};
// crates.io
use color_eyre::Result;
// self
use oauth2_client::{
	auth::ClientCredentials,
	flows::{BlockingOAuth2Authentication, ResourceRequest},
	grant::GrantProperties,
	oauth::{ClientAuthMethod, HttpClientError, HttpRequest, HttpResponse, NetworkErrorMapper},
	store::MemoryStore,
};

#[derive(Debug)]
struct DnsFailure {
	host: String,
}
impl Display for DnsFailure {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "DNS lookup failed for {}", self.host)
	}
}
impl StdError for DnsFailure {}

fn canned_transport(request: HttpRequest) -> Result<HttpResponse, HttpClientError<DnsFailure>> {
	if request.uri().host() != Some("auth.example.com") {
		let host = request.uri().host().unwrap_or_default().to_owned();

		return Err(HttpClientError::Reqwest(Box::new(DnsFailure { host })));
	}

	Ok(HttpResponse::new(
		b"{\"access_token\":\"canned\",\"token_type\":\"bearer\",\"expires_in\":60}".to_vec(),
	))
}

fn authentication(token_uri: &str) -> Result<BlockingOAuth2Authentication> {
	let properties = GrantProperties::client_credentials(
		token_uri,
		ClientCredentials::new("demo-client")?.with_secret("demo-secret"),
	)?;

	Ok(BlockingOAuth2Authentication::with_sync_http_client(
		properties,
		canned_transport,
		NetworkErrorMapper,
		ClientAuthMethod::Header,
		Arc::new(MemoryStore::default()),
	))
}

fn main() -> Result<()> {
	color_eyre::install()?;

	let request = ResourceRequest::parse("https://api.example.com/items")?;
	let token = authentication("https://auth.example.com/token")?.token(&request)?;

	println!("Token from the canned transport: {token}.");

	match authentication("https://unreachable.example.com/token")?.token(&request) {
		Ok(_) => println!("Canned transport unexpectedly succeeded."),
		Err(e) => println!("Transport failure mapped by the client: {e}."),
	}

	Ok(())
}
