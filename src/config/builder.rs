// self
use crate::{_prelude::*, catalog::Interface, config::BrokerConfig, error::ConfigError};

/// Builder for [`BrokerConfig`] values; also the serde form of a configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct BrokerConfigBuilder {
	/// Identity service root (required).
	pub identity_endpoint: Option<Url>,
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
impl BrokerConfigBuilder {
	/// Creates a builder seeded with the defaults (`public`, 30 s, `compute`,
	/// `[volumev3, volume]`, `network`).
	pub fn new() -> Self {
		Self {
			identity_endpoint: None,
			interface: Interface::default(),
			request_timeout: BrokerConfig::DEFAULT_REQUEST_TIMEOUT,
			compute_service_type: "compute".into(),
			volume_service_types: vec!["volumev3".into(), "volume".into()],
			network_service_type: "network".into(),
		}
	}

	/// Sets the identity service root.
	pub fn identity_endpoint(mut self, url: Url) -> Self {
		self.identity_endpoint = Some(url);

		self
	}

	/// Overrides the endpoint interface.
	pub fn interface(mut self, interface: Interface) -> Self {
		self.interface = interface;

		self
	}

	/// Overrides the per-request timeout.
	pub fn request_timeout(mut self, timeout: StdDuration) -> Self {
		self.request_timeout = timeout;

		self
	}

	/// Overrides the compute service type.
	pub fn compute_service_type(mut self, service_type: impl Into<String>) -> Self {
		self.compute_service_type = service_type.into();

		self
	}

	/// Replaces the block-storage fallback chain.
	pub fn volume_service_types<I, S>(mut self, service_types: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.volume_service_types = service_types.into_iter().map(Into::into).collect();

		self
	}

	/// Overrides the network service type.
	pub fn network_service_type(mut self, service_type: impl Into<String>) -> Self {
		self.network_service_type = service_type.into();

		self
	}

	/// Consumes the builder and validates the resulting configuration.
	pub fn build(self) -> Result<BrokerConfig, ConfigError> {
		let identity_endpoint =
			self.identity_endpoint.ok_or(ConfigError::MissingIdentityEndpoint)?;
		let config = BrokerConfig {
			identity_endpoint,
			interface: self.interface,
			request_timeout: self.request_timeout,
			compute_service_type: self.compute_service_type,
			volume_service_types: self.volume_service_types,
			network_service_type: self.network_service_type,
		};

		config.validate()?;

		Ok(config)
	}
}
impl Default for BrokerConfigBuilder {
	fn default() -> Self {
		Self::new()
	}
}
impl TryFrom<BrokerConfigBuilder> for BrokerConfig {
	type Error = ConfigError;

	fn try_from(builder: BrokerConfigBuilder) -> Result<Self, Self::Error> {
		builder.build()
	}
}

impl BrokerConfig {
	/// Validates invariants for the configuration.
	pub fn validate(&self) -> Result<(), ConfigError> {
		validate_endpoint("identity", &self.identity_endpoint)?;

		if self.request_timeout.is_zero() {
			return Err(ConfigError::ZeroTimeout);
		}

		validate_service_type("compute", &self.compute_service_type)?;
		validate_service_type("network", &self.network_service_type)?;

		if self.volume_service_types.is_empty() {
			return Err(ConfigError::EmptyVolumeFallback);
		}
		for service_type in &self.volume_service_types {
			validate_service_type("volume", service_type)?;
		}

		Ok(())
	}
}

fn validate_endpoint(name: &'static str, url: &Url) -> Result<(), ConfigError> {
	match url.scheme() {
		"http" | "https" => Ok(()),
		_ => Err(ConfigError::UnsupportedScheme { endpoint: name, url: url.to_string() }),
	}
}

fn validate_service_type(which: &'static str, service_type: &str) -> Result<(), ConfigError> {
	if service_type.trim().is_empty() {
		Err(ConfigError::EmptyServiceType { which })
	} else {
		Ok(())
	}
}
