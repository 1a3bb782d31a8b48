// std
use std::sync::atomic::{AtomicUsize, Ordering};
// self
use openstack_quotas::{
	_preludet::*,
	auth::{ProjectId, TokenSecret},
	broker::QuotaBroker,
	config::BrokerConfig,
	error::{TransportError, UpstreamError},
	http::{HttpRequest, HttpResponse, HttpTransport, TransportFuture},
	session::QuotaContext,
};

const BASE: &str = "https://cloud.example.com";

/// Answers compute and volume reads with empty quota documents and times out on the network.
#[derive(Default)]
struct FakeTransport {
	seen: RwLock<Vec<HttpRequest>>,
}
impl HttpTransport for FakeTransport {
	fn execute(&self, request: HttpRequest) -> TransportFuture<'_> {
		let path = request.url.path().to_owned();

		self.seen.write().push(request);

		Box::pin(async move {
			if path.starts_with("/network/") {
				Err(TransportError::Timeout)
			} else {
				Ok(HttpResponse::new(200, r#"{"quota_set":{}}"#))
			}
		})
	}
}

fn broker(transport: Arc<FakeTransport>) -> QuotaBroker<FakeTransport> {
	let config = BrokerConfig::builder()
		.identity_endpoint(Url::parse(BASE).expect("Identity fixture URL should parse."))
		.request_timeout(StdDuration::from_secs(5))
		.build()
		.expect("Fake broker configuration should build.");

	QuotaBroker::with_transport(config, transport)
}

fn context() -> QuotaContext {
	QuotaContext::new(
		TokenSecret::new("gAAAA-scoped"),
		public_catalog(BASE),
		Some(ProjectId::new("p-1").expect("Project identifier fixture should be valid.")),
	)
}

#[tokio::test]
async fn timeouts_surface_as_upstream_unavailable() {
	let broker = broker(Arc::new(FakeTransport::default()));
	let err = broker
		.fetch_network_quotas(&context())
		.await
		.expect_err("Timed out network request should fail.");

	match err {
		Error::UpstreamUnavailable(upstream) => {
			assert!(upstream.is_timeout());
			assert!(matches!(upstream, UpstreamError::Transport { service: "network", .. }));
		},
		other => panic!("Unexpected error: {other:?}."),
	}
}

#[tokio::test]
async fn aggregate_absorbs_timeouts_and_bounds_every_request() {
	let transport = Arc::new(FakeTransport::default());
	let broker = broker(transport.clone());
	let result = broker.aggregate(&context()).await;

	assert!(result.network.is_none());

	let compute = result.compute.expect("Compute group should be present.");

	// Empty documents default every mandatory field.
	assert_eq!(compute.instances.used, 0);
	assert!(compute.instances.limit.is_unlimited());
	assert!(result.volume.is_some());

	let seen = transport.seen.read();

	assert_eq!(seen.len(), 3);

	for request in seen.iter() {
		assert_eq!(request.timeout, Some(StdDuration::from_secs(5)));
		assert_eq!(
			request.auth_token.as_ref().map(TokenSecret::expose),
			Some("gAAAA-scoped")
		);
	}

	assert!(seen.iter().any(|request| request.url.query() == Some("usage=true")));
}

#[tokio::test]
async fn dyn_transports_are_supported() {
	let transport: Arc<dyn HttpTransport> = Arc::new(FakeTransport::default());
	let config = BrokerConfig::builder()
		.identity_endpoint(Url::parse(BASE).expect("Identity fixture URL should parse."))
		.build()
		.expect("Fake broker configuration should build.");
	let broker = QuotaBroker::<dyn HttpTransport>::with_transport(config, transport);
	let result = broker.aggregate(&context()).await;

	assert!(result.compute.is_some());
	assert!(result.network.is_none());
}

/// Holds every request open for a fixed delay while tracking how many are in flight at once.
#[derive(Default)]
struct SlowTransport {
	in_flight: AtomicUsize,
	peak: AtomicUsize,
}
impl HttpTransport for SlowTransport {
	fn execute(&self, _request: HttpRequest) -> TransportFuture<'_> {
		Box::pin(async move {
			let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;

			self.peak.fetch_max(now, Ordering::SeqCst);
			tokio::time::sleep(StdDuration::from_millis(200)).await;
			self.in_flight.fetch_sub(1, Ordering::SeqCst);

			Ok(HttpResponse::new(200, r#"{"quota_set":{},"quota":{}}"#))
		})
	}
}

#[tokio::test]
async fn aggregate_runs_all_fetchers_concurrently() {
	let transport = Arc::new(SlowTransport::default());
	let config = BrokerConfig::builder()
		.identity_endpoint(Url::parse(BASE).expect("Identity fixture URL should parse."))
		.build()
		.expect("Fake broker configuration should build.");
	let broker: QuotaBroker<SlowTransport> = QuotaBroker::with_transport(config, transport.clone());
	let started = std::time::Instant::now();
	let result = broker.aggregate(&context()).await;

	assert!(result.compute.is_some());
	assert!(result.volume.is_some());
	assert!(result.network.is_some());
	assert_eq!(transport.peak.load(Ordering::SeqCst), 3);
	assert_eq!(transport.in_flight.load(Ordering::SeqCst), 0);
	// Sequential fetches would take at least 600 ms.
	assert!(started.elapsed() < StdDuration::from_millis(550));
}
