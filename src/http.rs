//! Transport primitives for identity and quota requests.
//!
//! [`HttpTransport`] is the broker's only dependency on an HTTP stack. It works on crate-owned
//! [`HttpRequest`]/[`HttpResponse`] values so fakes and alternative clients stay simple, and it
//! owns timeout enforcement: a request that exceeds [`HttpRequest::timeout`] must fail with
//! [`TransportError::Timeout`].

// std
use std::ops::Deref;
// self
use crate::{_prelude::*, auth::TokenSecret, error::TransportError};

/// Header carrying the caller's token on every authenticated request.
pub const AUTH_TOKEN_HEADER: &str = "X-Auth-Token";
/// Response header carrying the token issued by the identity service.
pub const SUBJECT_TOKEN_HEADER: &str = "X-Subject-Token";

/// Boxed future returned by [`HttpTransport::execute`].
pub type TransportFuture<'a> =
	Pin<Box<dyn Future<Output = Result<HttpResponse, TransportError>> + 'a + Send>>;

/// Abstraction over HTTP clients capable of executing broker requests.
///
/// Implementations must be `Send + Sync + 'static` so a single transport can back many
/// concurrent fetchers, and the returned futures must be `Send`.
pub trait HttpTransport
where
	Self: 'static + Send + Sync,
{
	/// Sends `request` and returns the full response, whatever its status.
	fn execute(&self, request: HttpRequest) -> TransportFuture<'_>;
}

/// Supported request methods.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HttpMethod {
	/// `GET`.
	Get,
	/// `POST`.
	Post,
}
impl HttpMethod {
	/// Returns the method token.
	pub const fn as_str(self) -> &'static str {
		match self {
			HttpMethod::Get => "GET",
			HttpMethod::Post => "POST",
		}
	}
}

/// Outbound request.
#[derive(Clone)]
pub struct HttpRequest {
	/// Request method.
	pub method: HttpMethod,
	/// Absolute URL.
	pub url: Url,
	/// Token sent as `X-Auth-Token`, if any.
	pub auth_token: Option<TokenSecret>,
	/// Additional headers.
	pub headers: BTreeMap<String, String>,
	/// JSON body, if any.
	pub body: Option<Vec<u8>>,
	/// Upper bound for the whole exchange.
	pub timeout: Option<StdDuration>,
}
impl HttpRequest {
	/// Creates a `GET` request expecting JSON.
	pub fn get(url: Url) -> Self {
		Self::new(HttpMethod::Get, url)
	}

	/// Creates a `POST` request carrying `body` as JSON.
	pub fn post_json(url: Url, body: &Value) -> Self {
		let mut request = Self::new(HttpMethod::Post, url);

		request.headers.insert("content-type".into(), "application/json".into());
		request.body = Some(body.to_string().into_bytes());

		request
	}

	/// Attaches the caller's token.
	pub fn with_auth_token(mut self, token: &TokenSecret) -> Self {
		self.auth_token = Some(token.clone());

		self
	}

	/// Bounds the request duration.
	pub fn with_timeout(mut self, timeout: StdDuration) -> Self {
		self.timeout = Some(timeout);

		self
	}

	fn new(method: HttpMethod, url: Url) -> Self {
		let mut headers = BTreeMap::new();

		headers.insert("accept".into(), "application/json".into());

		Self { method, url, auth_token: None, headers, body: None, timeout: None }
	}
}

impl Debug for HttpRequest {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		// The scope exchange carries the unscoped token inside the body.
		f.debug_struct("HttpRequest")
			.field("method", &self.method)
			.field("url", &self.url.as_str())
			.field("auth_token", &self.auth_token)
			.field("headers", &self.headers.keys().collect::<Vec<_>>())
			.field("body_len", &self.body.as_ref().map(Vec::len))
			.field("timeout", &self.timeout)
			.finish()
	}
}

/// Inbound response.
#[derive(Clone, Default)]
pub struct HttpResponse {
	/// HTTP status code.
	pub status: u16,
	/// Response headers keyed by lowercase name.
	pub headers: BTreeMap<String, String>,
	/// Raw body.
	pub body: Vec<u8>,
}
impl HttpResponse {
	/// Creates a response with the given status and body and no headers.
	pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
		Self { status, headers: BTreeMap::new(), body: body.into() }
	}

	/// Adds a header, normalizing the name to lowercase.
	pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
		self.headers.insert(name.to_ascii_lowercase(), value.into());

		self
	}

	/// Looks up a header case-insensitively.
	pub fn header(&self, name: &str) -> Option<&str> {
		self.headers.get(&name.to_ascii_lowercase()).map(String::as_str)
	}

	/// Returns `true` for 2xx statuses.
	pub fn is_success(&self) -> bool {
		(200..300).contains(&self.status)
	}
}
impl Debug for HttpResponse {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		// Header values may carry tokens.
		f.debug_struct("HttpResponse")
			.field("status", &self.status)
			.field("headers", &self.headers.keys().collect::<Vec<_>>())
			.field("body_len", &self.body.len())
			.finish()
	}
}

/// Appends `path` to `base`, keeping any path prefix `base` already carries.
pub(crate) fn join_path(base: &Url, path: &str) -> Result<Url, url::ParseError> {
	if base.cannot_be_a_base() {
		return Err(url::ParseError::RelativeUrlWithCannotBeABaseBase);
	}

	let mut joined = base.clone();

	joined.set_query(None);
	joined.set_fragment(None);

	let prefix = joined.path().trim_end_matches('/').to_owned();

	joined.set_path(&format!("{prefix}/{}", path.trim_start_matches('/')));

	Ok(joined)
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
#[cfg(feature = "reqwest")]
#[derive(Clone, Default)]
pub struct ReqwestHttpClient(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestHttpClient {
	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestHttpClient {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl Deref for ReqwestHttpClient {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl HttpTransport for ReqwestHttpClient {
	fn execute(&self, request: HttpRequest) -> TransportFuture<'_> {
		let client = self.0.clone();

		Box::pin(async move {
			let HttpRequest { method, url, auth_token, headers, body, timeout } = request;
			let mut builder = match method {
				HttpMethod::Get => client.get(url),
				HttpMethod::Post => client.post(url),
			};

			for (name, value) in &headers {
				builder = builder.header(name.as_str(), value.as_str());
			}
			if let Some(token) = auth_token.as_ref() {
				builder = builder.header(AUTH_TOKEN_HEADER, token.expose());
			}
			if let Some(body) = body {
				builder = builder.body(body);
			}
			if let Some(timeout) = timeout {
				builder = builder.timeout(timeout);
			}

			let response = builder.send().await?;
			let status = response.status().as_u16();
			let headers = response
				.headers()
				.iter()
				.filter_map(|(name, value)| {
					value.to_str().ok().map(|value| (name.as_str().to_owned(), value.to_owned()))
				})
				.collect();
			let body = response.bytes().await?.to_vec();

			Ok(HttpResponse { status, headers, body })
		})
	}
}
