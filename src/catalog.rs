//! Typed service catalog and endpoint resolution.
//!
//! The catalog arrives as part of the token metadata. [`ServiceCatalog`] indexes it once by
//! service type so that resolution is a pure lookup: exact type match, then exact interface
//! match, first endpoint wins. [`ResolutionPolicy`] adds an ordered fallback chain for services
//! that may be registered under more than one type (block storage as `volumev3` or `volume`).

// self
use crate::_prelude::*;

/// Endpoint visibility.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Interface {
	#[default]
	/// Reachable by end users.
	Public,
	/// Reachable inside the deployment network.
	Internal,
	/// Reserved for administrative access.
	Admin,
}
impl Interface {
	/// Returns the label used by the identity service.
	pub const fn as_str(self) -> &'static str {
		match self {
			Interface::Public => "public",
			Interface::Internal => "internal",
			Interface::Admin => "admin",
		}
	}
}
impl Display for Interface {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
impl FromStr for Interface {
	type Err = CatalogError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"public" => Ok(Self::Public),
			"internal" => Ok(Self::Internal),
			"admin" => Ok(Self::Admin),
			other => Err(CatalogError::UnknownInterface { interface: other.to_owned() }),
		}
	}
}

/// Catalog resolution failures.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum CatalogError {
	/// No catalog entry carries the requested service type.
	#[error("Service `{service_type}` not found in catalog.")]
	ServiceNotFound {
		/// Requested service type (comma-joined when a fallback chain was exhausted).
		service_type: String,
	},
	/// The service exists but exposes no endpoint with the requested interface.
	#[error("Endpoint with interface `{interface}` not found for service `{service_type}`.")]
	EndpointNotFound {
		/// Requested service type.
		service_type: String,
		/// Requested interface.
		interface: Interface,
	},
	/// Interface label is not one of `public`, `internal`, `admin`.
	#[error("Unknown endpoint interface `{interface}`.")]
	UnknownInterface {
		/// Offending label.
		interface: String,
	},
	/// A request URL could not be derived from the resolved endpoint.
	#[error("Endpoint URL for service `{service_type}` cannot be extended.")]
	InvalidEndpointUrl {
		/// Service type whose endpoint was used.
		service_type: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
}

/// Network endpoint of a catalog service.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoint {
	/// Endpoint identifier.
	pub id: String,
	/// Visibility of the endpoint.
	pub interface: Interface,
	/// Base URL.
	pub url: Url,
	/// Region name, when reported.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub region: Option<String>,
	/// Region identifier, when reported.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub region_id: Option<String>,
}

/// One service as listed in the catalog.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceCatalogEntry {
	/// Service identifier, when reported.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub id: Option<String>,
	/// Service type tag (`compute`, `volumev3`, `network`, ...).
	#[serde(rename = "type")]
	pub service_type: String,
	/// Service name (`nova`, `cinderv3`, ...), when reported.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub name: Option<String>,
	/// Endpoints in catalog order.
	#[serde(default)]
	pub endpoints: Vec<Endpoint>,
}

/// Service catalog indexed by service type.
///
/// Entries sharing a type contribute their endpoints in catalog order, so the first matching
/// endpoint of the first such entry still wins.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<ServiceCatalogEntry>", into = "Vec<ServiceCatalogEntry>")]
pub struct ServiceCatalog {
	entries: Vec<ServiceCatalogEntry>,
	by_type: HashMap<String, Vec<Endpoint>>,
}
impl ServiceCatalog {
	/// Indexes the provided entries.
	pub fn new(entries: Vec<ServiceCatalogEntry>) -> Self {
		let mut by_type: HashMap<String, Vec<Endpoint>> = HashMap::new();

		for entry in &entries {
			by_type
				.entry(entry.service_type.clone())
				.or_default()
				.extend(entry.endpoints.iter().cloned());
		}

		Self { entries, by_type }
	}

	/// Raw entries in catalog order.
	pub fn entries(&self) -> &[ServiceCatalogEntry] {
		&self.entries
	}

	/// Number of catalog entries.
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	/// Returns `true` when the catalog lists no services.
	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// Returns `true` when at least one entry carries `service_type`.
	pub fn contains(&self, service_type: &str) -> bool {
		self.by_type.contains_key(service_type)
	}

	/// Resolves the first endpoint of `service_type` exposed on `interface`.
	pub fn resolve(&self, service_type: &str, interface: Interface) -> Result<&Endpoint, CatalogError> {
		let endpoints = self
			.by_type
			.get(service_type)
			.ok_or_else(|| CatalogError::ServiceNotFound { service_type: service_type.to_owned() })?;

		endpoints.iter().find(|endpoint| endpoint.interface == interface).ok_or_else(|| {
			CatalogError::EndpointNotFound { service_type: service_type.to_owned(), interface }
		})
	}

	/// Tries each service type in order, moving on only when a type is absent from the catalog.
	///
	/// An [`CatalogError::EndpointNotFound`] for an earlier type is returned as-is; later types
	/// are not consulted.
	pub fn resolve_any<S>(
		&self,
		service_types: &[S],
		interface: Interface,
	) -> Result<&Endpoint, CatalogError>
	where
		S: AsRef<str>,
	{
		for service_type in service_types {
			match self.resolve(service_type.as_ref(), interface) {
				Err(CatalogError::ServiceNotFound { .. }) => continue,
				resolved => return resolved,
			}
		}

		Err(CatalogError::ServiceNotFound {
			service_type: service_types.iter().map(AsRef::as_ref).collect::<Vec<_>>().join(", "),
		})
	}

	/// Lists every endpoint of the given types exposed on `interface`, in catalog order.
	pub fn endpoints_for<S>(&self, service_types: &[S], interface: Interface) -> Vec<&Endpoint>
	where
		S: AsRef<str>,
	{
		self.entries
			.iter()
			.filter(|entry| service_types.iter().any(|ty| ty.as_ref() == entry.service_type))
			.flat_map(|entry| entry.endpoints.iter())
			.filter(|endpoint| endpoint.interface == interface)
			.collect()
	}
}
impl From<Vec<ServiceCatalogEntry>> for ServiceCatalog {
	fn from(entries: Vec<ServiceCatalogEntry>) -> Self {
		Self::new(entries)
	}
}
impl From<ServiceCatalog> for Vec<ServiceCatalogEntry> {
	fn from(catalog: ServiceCatalog) -> Self {
		catalog.entries
	}
}

/// How a fetcher picks its service from the catalog.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionPolicy {
	/// Exactly one service type.
	Exact(String),
	/// Ordered service types; later ones are tried only when earlier ones are absent.
	Fallback(Vec<String>),
}
impl ResolutionPolicy {
	/// Resolves the policy against `catalog`.
	pub fn resolve<'a>(
		&self,
		catalog: &'a ServiceCatalog,
		interface: Interface,
	) -> Result<&'a Endpoint, CatalogError> {
		match self {
			Self::Exact(service_type) => catalog.resolve(service_type, interface),
			Self::Fallback(service_types) => catalog.resolve_any(service_types, interface),
		}
	}

	/// Service type label used in errors and logs.
	pub fn label(&self) -> String {
		match self {
			Self::Exact(service_type) => service_type.clone(),
			Self::Fallback(service_types) => service_types.join(", "),
		}
	}
}
