//! OpenStack quota aggregation core: scope Keystone tokens, resolve endpoints from the service
//! catalog, and fan out compute, block-storage, and network quota reads into one normalized model.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod broker;
pub mod catalog;
pub mod config;
pub mod error;
pub mod http;
pub mod obs;
pub mod quota;
pub mod session;
#[cfg(all(any(test, feature = "test"), feature = "reqwest"))]
pub mod _preludet {
	//! Convenience re-exports and helpers for integration tests; enabled via `cfg(test)` or the
	//! `test` crate feature.

	pub use crate::_prelude::*;

	// self
	use crate::{
		broker::QuotaBroker,
		catalog::{Endpoint, Interface, ServiceCatalog, ServiceCatalogEntry},
		config::BrokerConfig,
		http::ReqwestHttpClient,
	};

	/// Broker type alias used by reqwest-backed integration tests.
	pub type ReqwestTestBroker = QuotaBroker<ReqwestHttpClient>;

	/// Builds a reqwest HTTP client that accepts the self-signed certificates produced by
	/// `httpmock` during tests.
	pub fn test_reqwest_http_client() -> ReqwestHttpClient {
		let client = ReqwestClient::builder()
			.danger_accept_invalid_certs(true)
			.danger_accept_invalid_hostnames(true)
			.build()
			.expect("Failed to build insecure Reqwest client for tests.");

		ReqwestHttpClient::with_client(client)
	}

	/// Constructs a [`QuotaBroker`] whose identity endpoint points at `identity_url`, backed by
	/// the reqwest transport used across integration tests.
	pub fn build_reqwest_test_broker(identity_url: &str) -> ReqwestTestBroker {
		let config = BrokerConfig::builder()
			.identity_endpoint(
				Url::parse(identity_url).expect("Test identity endpoint should parse successfully."),
			)
			.build()
			.expect("Test broker configuration should build successfully.");

		QuotaBroker::with_transport(config, test_reqwest_http_client())
	}

	/// Builds a catalog entry exposing one endpoint per `(interface, url)` pair.
	pub fn catalog_entry(service_type: &str, endpoints: &[(Interface, &str)]) -> ServiceCatalogEntry {
		ServiceCatalogEntry {
			id: Some(format!("{service_type}-service")),
			service_type: service_type.into(),
			name: None,
			endpoints: endpoints
				.iter()
				.enumerate()
				.map(|(idx, (interface, url))| Endpoint {
					id: format!("{service_type}-{idx}"),
					interface: *interface,
					url: Url::parse(url).expect("Test endpoint URL should parse successfully."),
					region: Some("RegionOne".into()),
					region_id: Some("RegionOne".into()),
				})
				.collect(),
		}
	}

	/// Builds a catalog with public compute, volumev3, and network services rooted at `base`.
	pub fn public_catalog(base: &str) -> ServiceCatalog {
		let base = base.trim_end_matches('/');

		ServiceCatalog::new(vec![
			catalog_entry("compute", &[(Interface::Public, &format!("{base}/compute/v2.1"))]),
			catalog_entry("volumev3", &[(Interface::Public, &format!("{base}/volume/v3"))]),
			catalog_entry("network", &[(Interface::Public, &format!("{base}/network"))]),
		])
	}

	/// Identity response body for a token scoped to `project_id` whose catalog is
	/// [`public_catalog`] rooted at `base`.
	pub fn scoped_token_body(base: &str, project_id: &str) -> Value {
		serde_json::json!({
			"token": {
				"methods": ["token"],
				"user": { "id": "u-1", "name": "demo", "domain": { "id": "default", "name": "Default" } },
				"roles": [{ "id": "r-1", "name": "member" }],
				"project": { "id": project_id, "name": "demo", "domain": { "id": "default" } },
				"catalog": public_catalog(base),
				"issued_at": "2026-10-17T08:00:00.000000Z",
				"expires_at": "2026-10-17T20:00:00.000000Z"
			}
		})
	}
}

mod _prelude {
	pub use std::{
		collections::{BTreeMap, HashMap},
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		hash::Hash,
		pin::Pin,
		str::FromStr,
		sync::Arc,
		time::Duration as StdDuration,
	};

	pub use parking_lot::RwLock;
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize, de::DeserializeOwned};
	pub use serde_json::Value;
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(all(test, feature = "reqwest"))] use {color_eyre as _, httpmock as _};
