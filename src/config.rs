//! Broker configuration: identity endpoint, endpoint interface, service types, and timeouts.
//!
//! Values are validated through [`BrokerConfigBuilder`]. The struct is serde-friendly so hosts
//! can load it from whatever source they already use; this crate does not read the environment.

/// Builder API for assembling broker configuration.
pub mod builder;

pub use builder::*;

// self
use crate::{
	_prelude::*,
	catalog::{Interface, ResolutionPolicy},
};

/// Validated configuration consumed by [`QuotaBroker`](crate::broker::QuotaBroker).
///
/// Deserialization goes through [`BrokerConfigBuilder`], so omitted settings take their defaults
/// and invalid ones are rejected exactly as [`BrokerConfigBuilder::build`] rejects them.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "BrokerConfigBuilder")]
pub struct BrokerConfig {
	/// Identity service root (for example `https://identity.example.com` or
	/// `https://cloud.example.com/identity`); `/v3/...` paths are appended to it.
	pub identity_endpoint: Url,
	/// Interface used when resolving quota endpoints.
	pub interface: Interface,
	/// Upper bound for every upstream request.
	pub request_timeout: StdDuration,
	/// Service type of the compute service.
	pub compute_service_type: String,
	/// Block-storage service types, newest first.
	pub volume_service_types: Vec<String>,
	/// Service type of the network service.
	pub network_service_type: String,
}
impl BrokerConfig {
	/// Default timeout applied to each upstream request.
	pub const DEFAULT_REQUEST_TIMEOUT: StdDuration = StdDuration::from_secs(30);

	/// Creates a new builder.
	pub fn builder() -> BrokerConfigBuilder {
		BrokerConfigBuilder::new()
	}

	/// Resolution policy for the compute fetcher.
	pub fn compute_policy(&self) -> ResolutionPolicy {
		ResolutionPolicy::Exact(self.compute_service_type.clone())
	}

	/// Resolution policy for the volume fetcher.
	pub fn volume_policy(&self) -> ResolutionPolicy {
		ResolutionPolicy::Fallback(self.volume_service_types.clone())
	}

	/// Resolution policy for the network fetcher.
	pub fn network_policy(&self) -> ResolutionPolicy {
		ResolutionPolicy::Exact(self.network_service_type.clone())
	}
}
