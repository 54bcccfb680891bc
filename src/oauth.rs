//! Authorization-server protocol client: the authorize redirect request and the token exchange.

pub use oauth2::{HttpClientError, HttpRequest, HttpResponse};

// crates.io
use base64::{Engine, engine::general_purpose::STANDARD};
use oauth2::{
	AsyncHttpClient,
	http::{
		HeaderName, HeaderValue, Method, Request,
		header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, COOKIE},
		request::Builder,
	},
};
// self
use crate::{
	_prelude::*,
	auth::{AccessToken, AccessTokenRequest, AuthorizationRequest, ClientCredentials, TokenResponse},
	codec::{BodyCodec, DefaultBodyCodec, FORM_CONTENT_TYPE},
	error::{ConfigError, OAuth2Error, TransportError},
	http::TokenHttpClient,
};
#[cfg(feature = "reqwest")] use crate::http::ReqwestHttpClient;

/// Boxed future returned by [`AuthorizationServerClient`] operations.
pub type ServerFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T>> + 'a + Send>>;

const TOKEN_ACCEPT: &str = "application/json, application/x-www-form-urlencoded;q=0.9, */*;q=0.1";

/// How the client presents its own id and secret to the token endpoint.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClientAuthMethod {
	/// `Authorization: Basic base64(client_id:client_secret)`.
	#[default]
	Header,
	/// `client_id`/`client_secret` appended to the form body.
	FormParameter,
	/// `client_id`/`client_secret` appended to the token URI query.
	QueryParameter,
}
impl ClientAuthMethod {
	/// Returns a stable label.
	pub const fn as_str(self) -> &'static str {
		match self {
			ClientAuthMethod::Header => "header",
			ClientAuthMethod::FormParameter => "form_parameter",
			ClientAuthMethod::QueryParameter => "query_parameter",
		}
	}
}

/// Maps HTTP transport failures into client [`Error`] values.
pub trait TransportErrorMapper<E>
where
	Self: 'static + Send + Sync,
	E: 'static + Send + Sync + StdError,
{
	/// Converts an [`HttpClientError`] raised while calling `endpoint` (`authorization` or
	/// `token`).
	fn map_transport_error(&self, endpoint: &'static str, error: HttpClientError<E>) -> Error;
}

/// Transport-agnostic mapper: every structured transport error becomes a network failure.
#[derive(Clone, Copy, Debug, Default)]
pub struct NetworkErrorMapper;
impl<E> TransportErrorMapper<E> for NetworkErrorMapper
where
	E: 'static + Send + Sync + StdError,
{
	fn map_transport_error(&self, endpoint: &'static str, error: HttpClientError<E>) -> Error {
		match error {
			HttpClientError::Reqwest(inner) => TransportError::network(endpoint, *inner).into(),
			other => map_common_transport_error(endpoint, other),
		}
	}
}

/// Default mapper for reqwest-backed transports.
#[cfg(feature = "reqwest")]
#[derive(Clone, Copy, Debug, Default)]
pub struct ReqwestTransportErrorMapper;
#[cfg(feature = "reqwest")]
impl TransportErrorMapper<ReqwestError> for ReqwestTransportErrorMapper {
	fn map_transport_error(
		&self,
		endpoint: &'static str,
		error: HttpClientError<ReqwestError>,
	) -> Error {
		match error {
			HttpClientError::Reqwest(inner) if inner.is_builder() => ConfigError::from(*inner).into(),
			HttpClientError::Reqwest(inner) => TransportError::network(endpoint, *inner).into(),
			other => map_common_transport_error(endpoint, other),
		}
	}
}

fn map_common_transport_error<E>(endpoint: &'static str, error: HttpClientError<E>) -> Error
where
	E: 'static + Send + Sync + StdError,
{
	match error {
		HttpClientError::Http(inner) => ConfigError::from(inner).into(),
		HttpClientError::Io(inner) => TransportError::Io(inner).into(),
		HttpClientError::Other(message) => TransportError::Other { endpoint, message }.into(),
		HttpClientError::Reqwest(inner) => TransportError::network(endpoint, *inner).into(),
		_ => TransportError::Other { endpoint, message: "unknown HTTP client failure".into() }
			.into(),
	}
}

/// The two wire exchanges a client performs against an authorization server.
pub trait AuthorizationServerClient
where
	Self: 'static + Send + Sync,
{
	/// Sends `GET <authorization_uri>?response_type&client_id&scope&redirect_uri&state` without
	/// following redirects and returns the raw response.
	fn authorize<'a>(&'a self, request: &'a AuthorizationRequest) -> ServerFuture<'a, HttpResponse>;

	/// Sends `POST <uri>` with the request's form parameters plus client authentication and
	/// decodes the answer into an [`AccessToken`].
	fn require_token<'a>(
		&'a self,
		request: &'a AccessTokenRequest,
	) -> ServerFuture<'a, AccessToken>;
}

/// [`AuthorizationServerClient`] over any [`TokenHttpClient`].
pub struct HttpAuthorizationServer<C, M> {
	http_client: Arc<C>,
	error_mapper: Arc<M>,
	client_auth_method: ClientAuthMethod,
	codec: Arc<dyn BodyCodec>,
}
impl<C, M> HttpAuthorizationServer<C, M>
where
	C: TokenHttpClient,
	M: TransportErrorMapper<C::TransportError>,
{
	/// Creates a client using Basic client authentication and the default body codec.
	pub fn new(http_client: C, error_mapper: M) -> Self {
		Self::from_shared(Arc::new(http_client), Arc::new(error_mapper))
	}

	/// Creates a client from shared transport and mapper instances.
	pub fn from_shared(http_client: Arc<C>, error_mapper: Arc<M>) -> Self {
		Self {
			http_client,
			error_mapper,
			client_auth_method: ClientAuthMethod::default(),
			codec: Arc::new(DefaultBodyCodec),
		}
	}

	/// Overrides the client authentication method.
	pub fn with_client_auth_method(mut self, method: ClientAuthMethod) -> Self {
		self.client_auth_method = method;

		self
	}

	/// Overrides the body codec.
	pub fn with_codec(mut self, codec: impl BodyCodec) -> Self {
		self.codec = Arc::new(codec);

		self
	}

	/// Configured client authentication method.
	pub fn client_auth_method(&self) -> ClientAuthMethod {
		self.client_auth_method
	}

	fn build_token_request(&self, request: &AccessTokenRequest) -> Result<HttpRequest> {
		let credentials = &request.credentials;
		let mut uri = request.uri.clone();
		let mut parameters = request.parameters.clone();
		let mut builder = Request::builder()
			.method(Method::POST)
			.header(CONTENT_TYPE, FORM_CONTENT_TYPE)
			.header(ACCEPT, TOKEN_ACCEPT);

		match self.client_auth_method {
			ClientAuthMethod::Header => {
				builder = builder.header(AUTHORIZATION, basic_authorization(credentials));
			},
			ClientAuthMethod::FormParameter => {
				parameters.push(("client_id".into(), credentials.client_id.to_string()));

				if let Some(secret) = credentials.secret() {
					parameters.push(("client_secret".into(), secret.into()));
				}
			},
			ClientAuthMethod::QueryParameter => {
				let mut query = uri.query_pairs_mut();

				query.append_pair("client_id", credentials.client_id.as_ref());

				if let Some(secret) = credentials.secret() {
					query.append_pair("client_secret", secret);
				}
			},
		}

		builder = append_headers(builder, &request.headers)?;

		let body = self.codec.encode(&parameters).into_bytes();

		Ok(builder.uri(uri.as_str()).body(body).map_err(ConfigError::from)?)
	}
}
impl<C, M> Debug for HttpAuthorizationServer<C, M> {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("HttpAuthorizationServer")
			.field("client_auth_method", &self.client_auth_method)
			.finish_non_exhaustive()
	}
}
#[cfg(feature = "reqwest")]
impl HttpAuthorizationServer<ReqwestHttpClient, ReqwestTransportErrorMapper> {
	/// Creates a client over a freshly built reqwest transport.
	pub fn reqwest() -> Result<Self> {
		Ok(Self::new(ReqwestHttpClient::new()?, ReqwestTransportErrorMapper))
	}
}
impl<C, M> AuthorizationServerClient for HttpAuthorizationServer<C, M>
where
	C: TokenHttpClient,
	M: TransportErrorMapper<C::TransportError>,
{
	fn authorize<'a>(&'a self, request: &'a AuthorizationRequest) -> ServerFuture<'a, HttpResponse> {
		Box::pin(async move {
			let url = request.authorize_url()?;
			let mut builder = Request::builder().method(Method::GET).uri(url.as_str());

			if let Some(cookie) = &request.cookie {
				builder = builder.header(COOKIE, header_value(COOKIE.as_str(), cookie)?);
			}

			builder = append_headers(builder, &request.headers)?;

			let http_request = builder.body(Vec::new()).map_err(ConfigError::from)?;
			let handle = self.http_client.handle();

			handle
				.call(http_request)
				.await
				.map_err(|e| self.error_mapper.map_transport_error("authorization", e))
		})
	}

	fn require_token<'a>(
		&'a self,
		request: &'a AccessTokenRequest,
	) -> ServerFuture<'a, AccessToken> {
		Box::pin(async move {
			let http_request = self.build_token_request(request)?;
			let issued_at = OffsetDateTime::now_utc();
			let handle = self.http_client.handle();
			let response = handle
				.call(http_request)
				.await
				.map_err(|e| self.error_mapper.map_transport_error("token", e))?;
			let content_type =
				response.headers().get(CONTENT_TYPE).and_then(|value| value.to_str().ok());

			if !response.status().is_success() {
				let fields = self.codec.decode(response.body(), content_type).unwrap_or_default();

				return Err(OAuth2Error::from_fields(response.status().as_u16(), &fields).into());
			}

			let fields = self.codec.decode(response.body(), content_type)?;
			let token = TokenResponse::from_fields(&fields)?
				.into_access_token(issued_at, request.scope().unwrap_or_default())?;

			Ok(token)
		})
	}
}

/// `Basic` client authentication value; a missing secret encodes as `client_id:`.
pub fn basic_authorization(credentials: &ClientCredentials) -> String {
	let pair = format!("{}:{}", credentials.client_id, credentials.secret().unwrap_or_default());

	format!("Basic {}", STANDARD.encode(pair))
}

fn append_headers(mut builder: Builder, headers: &[(String, String)]) -> Result<Builder> {
	for (name, value) in headers {
		let header_name = HeaderName::from_bytes(name.as_bytes())
			.map_err(|_| ConfigError::InvalidHeader { name: name.clone() })?;

		builder = builder.header(header_name, header_value(name, value)?);
	}

	Ok(builder)
}

fn header_value(name: &str, value: &str) -> Result<HeaderValue, ConfigError> {
	HeaderValue::from_str(value).map_err(|_| ConfigError::InvalidHeader { name: name.into() })
}
