//! Scopes an unscoped token to a project, aggregates its quotas against mocked compute,
//! block-storage, and network services, and prints the presentation summary.

// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
use serde_json::json;
use url::Url;
// self
use openstack_quotas::{
	auth::{ProjectId, TokenSecret},
	broker::QuotaBroker,
	config::BrokerConfig,
	http::ReqwestHttpClient,
	reqwest::Client,
	session::QuotaContext,
};

const SCOPED: &str = "gAAAA-demo-scoped";

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;
	let base = server.base_url();
	let identity_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/v3/auth/tokens");
			then.status(201).header("X-Subject-Token", SCOPED).json_body(json!({
				"token": {
					"methods": ["token"],
					"user": { "id": "u-demo", "name": "demo" },
					"project": { "id": "p-demo", "name": "demo" },
					"catalog": [
						{ "type": "compute", "endpoints": [
							{ "id": "c", "interface": "public", "url": format!("{base}/compute/v2.1") }
						] },
						{ "type": "volume", "endpoints": [
							{ "id": "v", "interface": "public", "url": format!("{base}/volume/v2") }
						] }
					],
					"issued_at": "2026-10-17T08:00:00Z",
					"expires_at": "2026-10-17T20:00:00Z"
				}
			}));
		})
		.await;

	server
		.mock_async(|when, then| {
			when.method(GET).path("/compute/v2.1/os-quota-sets/p-demo/detail");
			then.status(200).json_body(json!({
				"quota_set": {
					"instances": { "in_use": 4, "limit": 10 },
					"cores": { "in_use": 8, "limit": -1 },
					"ram": { "in_use": 6144, "limit": 51200 }
				}
			}));
		})
		.await;
	server
		.mock_async(|when, then| {
			when.method(GET).path("/volume/v2/os-quota-sets/p-demo").query_param("usage", "true");
			then.status(200).json_body(json!({
				"quota_set": {
					"volumes": { "in_use": 2, "limit": 10 },
					"gigabytes": { "in_use": 120, "limit": 1000 },
					"snapshots": { "in_use": 0, "limit": 0 }
				}
			}));
		})
		.await;

	let config = BrokerConfig::builder().identity_endpoint(Url::parse(&base)?).build()?;
	let broker = QuotaBroker::<ReqwestHttpClient>::with_transport(
		config,
		ReqwestHttpClient::with_client(Client::builder().build()?),
	);
	let scoped = broker
		.scope_token(&TokenSecret::new("gAAAA-demo-unscoped"), &ProjectId::new("p-demo")?)
		.await?;
	// The catalog has no network service, so that group stays absent.
	let quotas = broker.aggregate(&QuotaContext::from_scoped(&scoped)).await;

	identity_mock.assert_async().await;

	for group in quotas.summary() {
		println!("{}:", group.name);

		for item in group.items {
			let percentage = item.percentage().map_or_else(|| "-".into(), |p| format!("{p}%"));

			println!(
				"  {:<22} {:>6} / {:<6} {:>2} {percentage}",
				item.label,
				item.used,
				item.limit.display(),
				item.units
			);
		}
	}

	println!("{}", serde_json::to_string_pretty(&quotas)?);

	Ok(())
}
