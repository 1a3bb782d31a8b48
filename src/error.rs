//! Crate-level error types shared across the identity exchange, catalog resolution, and quota
//! fetchers.

// self
use crate::_prelude::*;

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Session state could not be decoded.
	#[error(transparent)]
	Session(#[from] crate::session::SessionError),
	/// Catalog lookup failed for the requested service.
	#[error("Endpoint resolution failed: {0}")]
	EndpointResolutionFailed(#[from] crate::catalog::CatalogError),
	/// Upstream service was unreachable or answered with a failure.
	#[error(transparent)]
	UpstreamUnavailable(#[from] UpstreamError),

	/// Identity service refused to scope the token to the requested project.
	#[error("Identity service denied the project scope for `{project}` (HTTP {status}): {reason}.")]
	ScopeDenied {
		/// Project the caller tried to scope to.
		project: String,
		/// HTTP status returned by the identity service.
		status: u16,
		/// Identity-supplied reason string.
		reason: String,
	},
	/// No usable credential (or token metadata) is available for the request.
	#[error("Request is not authenticated.")]
	NotAuthenticated,
	/// No project is selected for the request.
	#[error("No project selected.")]
	ProjectNotSelected,
}

/// Configuration and validation failures.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// Identity endpoint is required.
	#[error("Missing identity endpoint.")]
	MissingIdentityEndpoint,
	/// Endpoints must use HTTP or HTTPS.
	#[error("The {endpoint} endpoint must use http or https: {url}.")]
	UnsupportedScheme {
		/// Which endpoint failed validation.
		endpoint: &'static str,
		/// Endpoint URL that failed validation.
		url: String,
	},
	/// A request URL could not be derived from the configured endpoint.
	#[error("Unable to build a request URL from the {endpoint} endpoint.")]
	InvalidUrl {
		/// Which endpoint the URL was derived from.
		endpoint: &'static str,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Request timeout must be positive.
	#[error("The request timeout must be greater than zero.")]
	ZeroTimeout,
	/// A configured service type is empty.
	#[error("The {which} service type cannot be empty.")]
	EmptyServiceType {
		/// Which service type setting is empty.
		which: &'static str,
	},
	/// The volume fallback chain must name at least one service type.
	#[error("The volume service fallback chain cannot be empty.")]
	EmptyVolumeFallback,
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Upstream failures; the aggregator absorbs these into absent quota groups.
#[derive(Debug, ThisError)]
pub enum UpstreamError {
	/// Service answered with a non-success status.
	#[error("The {service} service returned HTTP {status}: {message}.")]
	Status {
		/// Upstream service label.
		service: &'static str,
		/// HTTP status code.
		status: u16,
		/// Preview of the response body.
		message: String,
	},
	/// Request never produced a response.
	#[error("Transport failure while calling the {service} service.")]
	Transport {
		/// Upstream service label.
		service: &'static str,
		/// Underlying transport failure.
		#[source]
		source: TransportError,
	},
	/// Response body could not be decoded.
	#[error("The {service} service returned a malformed body.")]
	MalformedBody {
		/// Upstream service label.
		service: &'static str,
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
	/// Token issuance succeeded but the subject token header was missing or unreadable.
	#[error("The identity service response is missing the X-Subject-Token header.")]
	MissingSubjectToken,
}
impl UpstreamError {
	/// Returns `true` when the failure was caused by the request timeout.
	pub fn is_timeout(&self) -> bool {
		matches!(self, Self::Transport { source: TransportError::Timeout, .. })
	}

	/// Returns the HTTP status carried by the failure, if any.
	pub fn status(&self) -> Option<u16> {
		match self {
			Self::Status { status, .. } => Some(*status),
			_ => None,
		}
	}
}

/// Transport-level failures (network, IO, timeout).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while sending the request.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Request exceeded the configured timeout.
	#[error("Request timed out.")]
	Timeout,
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while sending the request.")]
	Io(#[from] std::io::Error),
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		if e.is_timeout() { Self::Timeout } else { Self::network(e) }
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::catalog::CatalogError;

	#[test]
	fn catalog_errors_convert_into_resolution_failures() {
		let err: Error = CatalogError::ServiceNotFound { service_type: "volumev3".into() }.into();

		assert!(matches!(err, Error::EndpointResolutionFailed(CatalogError::ServiceNotFound { .. })));
		assert!(err.to_string().contains("volumev3"));

		let source = StdError::source(&err)
			.expect("Resolution failure should expose the catalog error as its source.");

		assert!(source.to_string().contains("volumev3"));
	}

	#[test]
	fn upstream_error_helpers_classify_failures() {
		let timeout =
			UpstreamError::Transport { service: "network", source: TransportError::Timeout };

		assert!(timeout.is_timeout());
		assert_eq!(timeout.status(), None);

		let status =
			UpstreamError::Status { service: "compute", status: 503, message: "busy".into() };

		assert!(!status.is_timeout());
		assert_eq!(status.status(), Some(503));
		assert!(matches!(Error::from(status), Error::UpstreamUnavailable(_)));
	}
}
