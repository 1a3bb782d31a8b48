//! Quota broker: scope exchange, per-service quota fetchers, and the concurrent aggregator.

mod aggregate;
mod common;
mod identity;
mod quotas;

// self
use crate::{_prelude::*, config::BrokerConfig, http::HttpTransport};
#[cfg(feature = "reqwest")] use crate::{error::ConfigError, http::ReqwestHttpClient};

#[cfg(feature = "reqwest")]
/// Broker specialized for the crate's default reqwest transport.
pub type ReqwestQuotaBroker = QuotaBroker<ReqwestHttpClient>;

/// Talks to the identity, compute, block-storage, and network services of one cloud.
///
/// The broker holds no per-user state: tokens, catalogs, and project selections arrive with each
/// call, so one broker can serve every session of a host.
pub struct QuotaBroker<T>
where
	T: ?Sized + HttpTransport,
{
	/// Transport used for every outbound request.
	pub transport: Arc<T>,
	/// Validated configuration.
	pub config: BrokerConfig,
}
impl<T> QuotaBroker<T>
where
	T: ?Sized + HttpTransport,
{
	/// Creates a broker that reuses the caller-provided transport.
	pub fn with_transport(config: BrokerConfig, transport: impl Into<Arc<T>>) -> Self {
		Self { transport: transport.into(), config }
	}
}
#[cfg(feature = "reqwest")]
impl QuotaBroker<ReqwestHttpClient> {
	/// Creates a broker backed by a freshly built reqwest client.
	pub fn new(config: BrokerConfig) -> Result<Self> {
		let client = ReqwestClient::builder().build().map_err(ConfigError::from)?;

		Ok(Self::with_transport(config, ReqwestHttpClient::with_client(client)))
	}
}
impl<T> Clone for QuotaBroker<T>
where
	T: ?Sized + HttpTransport,
{
	fn clone(&self) -> Self {
		Self { transport: self.transport.clone(), config: self.config.clone() }
	}
}
impl<T> Debug for QuotaBroker<T>
where
	T: ?Sized + HttpTransport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("QuotaBroker").field("config", &self.config).finish()
	}
}
