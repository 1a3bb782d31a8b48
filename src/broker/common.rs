//! Request plumbing shared by the identity exchange and the quota fetchers.

// self
use crate::{
	_prelude::*,
	broker::QuotaBroker,
	error::{ConfigError, UpstreamError},
	http::{self, HttpRequest, HttpResponse, HttpTransport},
};

const BODY_PREVIEW_LIMIT: usize = 256;

impl<T> QuotaBroker<T>
where
	T: ?Sized + HttpTransport,
{
	/// Sends `request` with the configured timeout, labelling transport failures with `service`.
	pub(crate) async fn send(
		&self,
		service: &'static str,
		request: HttpRequest,
	) -> Result<HttpResponse, UpstreamError> {
		self.transport
			.execute(request.with_timeout(self.config.request_timeout))
			.await
			.map_err(|source| UpstreamError::Transport { service, source })
	}

	/// Builds a URL below the identity endpoint.
	pub(crate) fn identity_url(&self, path: &str) -> Result<Url> {
		http::join_path(&self.config.identity_endpoint, path)
			.map_err(|source| ConfigError::InvalidUrl { endpoint: "identity", source }.into())
	}
}

/// Turns a non-2xx response into [`UpstreamError::Status`].
pub(crate) fn ensure_success(
	service: &'static str,
	response: HttpResponse,
) -> Result<HttpResponse, UpstreamError> {
	if response.is_success() {
		Ok(response)
	} else {
		Err(UpstreamError::Status {
			service,
			status: response.status,
			message: body_preview(&response.body),
		})
	}
}

/// Decodes a JSON body, keeping the path of the first offending field.
pub(crate) fn decode_json<D>(service: &'static str, body: &[u8]) -> Result<D, UpstreamError>
where
	D: DeserializeOwned,
{
	let mut deserializer = serde_json::Deserializer::from_slice(body);

	serde_path_to_error::deserialize(&mut deserializer)
		.map_err(|source| UpstreamError::MalformedBody { service, source })
}

/// Lossy UTF-8 preview of a response body, capped at [`BODY_PREVIEW_LIMIT`] characters.
pub(crate) fn body_preview(body: &[u8]) -> String {
	let text = String::from_utf8_lossy(body);
	let text = text.trim();

	if text.chars().count() <= BODY_PREVIEW_LIMIT {
		return text.to_owned();
	}

	let mut buf = text.chars().take(BODY_PREVIEW_LIMIT).collect::<String>();

	buf.push('…');

	buf
}
