// crates.io
use httpmock::prelude::*;
// self
use openstack_quotas::{
	_preludet::*,
	auth::{ProjectId, TokenSecret},
	catalog::{Interface, ServiceCatalog},
	quota::{AggregatedQuotaResult, QuotaLimit, QuotaUsage},
	session::{MemorySessionStore, QuotaContext, SessionContext, SessionKey},
};

const SCOPED: &str = "gAAAA-scoped";
const PROJECT: &str = "p-1";

fn context(catalog: ServiceCatalog) -> QuotaContext {
	QuotaContext::new(
		TokenSecret::new(SCOPED),
		catalog,
		Some(ProjectId::new(PROJECT).expect("Project identifier fixture should be valid.")),
	)
}

fn compute_body() -> Value {
	serde_json::json!({
		"quota_set": {
			"id": PROJECT,
			"instances": { "in_use": 3, "limit": 10, "reserved": 0 },
			"cores": { "in_use": 6, "limit": -1, "reserved": 0 },
			"ram": { "in_use": 2048, "limit": 8192, "reserved": 0 },
			"key_pairs": { "in_use": 1, "limit": 100, "reserved": 0 }
		}
	})
}

fn volume_body() -> Value {
	serde_json::json!({
		"quota_set": {
			"id": PROJECT,
			"volumes": { "in_use": 2, "limit": 10, "reserved": 0, "allocated": 0 },
			"gigabytes": { "in_use": 40, "limit": 1000, "reserved": 0, "allocated": 0 },
			"snapshots": { "in_use": 0, "limit": 0, "reserved": 0, "allocated": 0 },
			"backups": { "in_use": 1, "limit": 10, "reserved": 0, "allocated": 0 }
		}
	})
}

fn network_body() -> Value {
	serde_json::json!({
		"quota": {
			"network": { "used": 1, "limit": 100, "reserved": 0 },
			"subnet": { "used": 1, "limit": 100, "reserved": 0 },
			"port": { "used": 4, "limit": 500, "reserved": 0 },
			"router": { "used": 1, "limit": 10, "reserved": 0 },
			"floatingip": { "used": 2, "limit": 50, "reserved": 0 },
			"security_group": { "used": 1, "limit": 10, "reserved": 0 },
			"security_group_rule": { "used": 4, "limit": 100, "reserved": 0 }
		}
	})
}

async fn mock_compute(server: &MockServer) -> httpmock::Mock<'_> {
	server
		.mock_async(|when, then| {
			when.method(GET)
				.path(format!("/compute/v2.1/os-quota-sets/{PROJECT}/detail"))
				.header("x-auth-token", SCOPED);
			then.status(200).header("content-type", "application/json").json_body(compute_body());
		})
		.await
}

async fn mock_volume<'a>(server: &'a MockServer, prefix: &str) -> httpmock::Mock<'a> {
	let path = format!("{prefix}/os-quota-sets/{PROJECT}");

	server
		.mock_async(|when, then| {
			when.method(GET)
				.path(path.as_str())
				.query_param("usage", "true")
				.header("x-auth-token", SCOPED);
			then.status(200).header("content-type", "application/json").json_body(volume_body());
		})
		.await
}

#[tokio::test]
async fn aggregate_normalizes_all_three_services() {
	let server = MockServer::start_async().await;
	let broker = build_reqwest_test_broker(&server.base_url());
	let compute = mock_compute(&server).await;
	let volume = mock_volume(&server, "/volume/v3").await;
	let network = server
		.mock_async(|when, then| {
			when.method(GET)
				.path(format!("/network/v2.0/quotas/{PROJECT}/details"))
				.header("x-auth-token", SCOPED);
			then.status(200).header("content-type", "application/json").json_body(network_body());
		})
		.await;
	let result = broker.aggregate(&context(public_catalog(&server.base_url()))).await;

	compute.assert_async().await;
	volume.assert_async().await;
	network.assert_async().await;

	assert!(result.is_complete());

	let compute = result.compute.as_ref().expect("Compute group should be present.");

	assert_eq!(compute.ram, QuotaUsage::new(2, QuotaLimit::Bounded(8)).with_reserved(0));
	assert_eq!(compute.cores.limit, QuotaLimit::Unlimited);
	assert_eq!(compute.cores.percentage(), None);
	assert!(compute.key_pairs.is_some());
	assert!(compute.server_groups.is_none());

	let volume = result.volume.as_ref().expect("Volume group should be present.");

	assert_eq!(volume.snapshots.limit, QuotaLimit::Disabled);
	assert_eq!(volume.snapshots.percentage(), Some(0));
	assert!(volume.backups.is_some());
	assert!(volume.backup_gigabytes.is_none());

	let network = result.network.as_ref().expect("Network group should be present.");

	assert_eq!(network.floatingips, QuotaUsage::new(2, QuotaLimit::Bounded(50)).with_reserved(0));
	assert_eq!(network.ports.percentage(), Some(1));

	let encoded = serde_json::to_value(&result).expect("Aggregated result should serialize.");

	assert_eq!(encoded["compute"]["cores"]["limit"], serde_json::json!(-1));
	assert_eq!(encoded["volume"]["snapshots"]["limit"], serde_json::json!(0));
	assert!(encoded["compute"].get("server_groups").is_none());
	assert_eq!(
		result.summary().iter().map(|group| group.name).collect::<Vec<_>>(),
		["Compute", "Volume", "Network"]
	);
}

#[tokio::test]
async fn failing_service_leaves_only_its_group_absent() {
	let server = MockServer::start_async().await;
	let broker = build_reqwest_test_broker(&server.base_url());
	let _compute = mock_compute(&server).await;
	let _volume = mock_volume(&server, "/volume/v3").await;
	let network = server
		.mock_async(|when, then| {
			when.method(GET).path(format!("/network/v2.0/quotas/{PROJECT}/details"));
			then.status(503).body("Service Unavailable");
		})
		.await;
	let result = broker.aggregate(&context(public_catalog(&server.base_url()))).await;

	network.assert_async().await;

	assert!(result.compute.is_some());
	assert!(result.volume.is_some());
	assert!(result.network.is_none());
	assert_eq!(
		serde_json::to_value(&result).expect("Aggregated result should serialize.")["network"],
		Value::Null
	);
}

#[tokio::test]
async fn malformed_document_is_absorbed() {
	let server = MockServer::start_async().await;
	let broker = build_reqwest_test_broker(&server.base_url());
	let _compute = mock_compute(&server).await;

	server
		.mock_async(|when, then| {
			when.method(GET).path(format!("/volume/v3/os-quota-sets/{PROJECT}"));
			then.status(200).header("content-type", "application/json").body("<html>oops</html>");
		})
		.await;

	let catalog = ServiceCatalog::new(vec![
		catalog_entry(
			"compute",
			&[(Interface::Public, &format!("{}/compute/v2.1", server.base_url()))],
		),
		catalog_entry("volumev3", &[(Interface::Public, &format!("{}/volume/v3", server.base_url()))]),
	]);
	let result = broker.aggregate(&context(catalog)).await;

	assert!(result.compute.is_some());
	assert!(result.volume.is_none());
	// No network entry in the catalog at all.
	assert!(result.network.is_none());
}

#[tokio::test]
async fn volume_falls_back_to_legacy_service_type() {
	let server = MockServer::start_async().await;
	let broker = build_reqwest_test_broker(&server.base_url());
	let volume = mock_volume(&server, "/volume/v2").await;
	let catalog = ServiceCatalog::new(vec![catalog_entry(
		"volume",
		&[
			(Interface::Internal, "http://10.0.0.10:8776/v2"),
			(Interface::Public, &format!("{}/volume/v2", server.base_url())),
		],
	)]);
	let quotas = broker
		.fetch_volume_quotas(&context(catalog))
		.await
		.expect("Legacy volume service should resolve through the fallback chain.");

	volume.assert_async().await;

	assert_eq!(quotas.volumes, QuotaUsage::new(2, QuotaLimit::Bounded(10)).with_reserved(0));
}

#[tokio::test]
async fn missing_project_fails_every_fetcher_without_requests() {
	let server = MockServer::start_async().await;
	let broker = build_reqwest_test_broker(&server.base_url());
	let compute = mock_compute(&server).await;
	let context =
		QuotaContext::new(TokenSecret::new(SCOPED), public_catalog(&server.base_url()), None);

	assert!(matches!(broker.fetch_compute_quotas(&context).await, Err(Error::ProjectNotSelected)));
	assert_eq!(broker.aggregate(&context).await, AggregatedQuotaResult::default());

	compute.assert_calls_async(0).await;
}

#[tokio::test]
async fn aggregate_session_checks_session_before_fan_out() {
	let server = MockServer::start_async().await;
	let broker = build_reqwest_test_broker(&server.base_url());
	let compute = mock_compute(&server).await;
	let store = MemorySessionStore::default();
	let session = SessionContext::load(&store).expect("Empty session should decode.");

	assert!(matches!(broker.aggregate_session(&session).await, Err(Error::NotAuthenticated)));

	let mut metadata = scoped_token_body(&server.base_url(), PROJECT)["token"].clone();

	metadata
		.as_object_mut()
		.expect("Token metadata fixture should be an object.")
		.remove("project");
	store.insert(SessionKey::ScopedToken, serde_json::json!(SCOPED));
	store.insert(SessionKey::ProjectData, metadata);

	let session = SessionContext::load(&store).expect("Session should decode.");

	assert!(matches!(broker.aggregate_session(&session).await, Err(Error::ProjectNotSelected)));

	compute.assert_calls_async(0).await;

	store.insert(SessionKey::SelectedProject, serde_json::json!({ "id": PROJECT, "name": "demo" }));

	let session = SessionContext::load(&store).expect("Session should decode.");
	let result =
		broker.aggregate_session(&session).await.expect("Authenticated session should aggregate.");

	compute.assert_async().await;

	assert!(result.compute.is_some());
	assert!(!result.is_complete());
}
