//! Concurrent fan-out over the three quota fetchers.

// self
use crate::{
	_prelude::*,
	broker::QuotaBroker,
	http::HttpTransport,
	obs::{self, Stage},
	quota::AggregatedQuotaResult,
	session::{QuotaContext, SessionContext},
};

impl<T> QuotaBroker<T>
where
	T: ?Sized + HttpTransport,
{
	/// Fetches compute, block-storage, and network quotas concurrently.
	///
	/// Waits for all three fetchers. A failing fetcher leaves its group `None` and never affects
	/// the others, so this never fails; an all-`None` result means every upstream was unavailable.
	pub async fn aggregate(&self, context: &QuotaContext) -> AggregatedQuotaResult {
		let result = obs::observe(Stage::Aggregate, async move {
			let (compute, volume, network) = futures::join!(
				self.fetch_compute_quotas(context),
				self.fetch_volume_quotas(context),
				self.fetch_network_quotas(context),
			);

			Ok(AggregatedQuotaResult {
				compute: settle(Stage::Compute, compute),
				volume: settle(Stage::Volume, volume),
				network: settle(Stage::Network, network),
			})
		})
		.await;

		result.unwrap_or_default()
	}

	/// Request-level entry point.
	///
	/// Fails with [`Error::NotAuthenticated`] or [`Error::ProjectNotSelected`] before any upstream
	/// call when the session cannot produce a quota context; otherwise delegates to
	/// [`QuotaBroker::aggregate`].
	pub async fn aggregate_session(&self, session: &SessionContext) -> Result<AggregatedQuotaResult> {
		let context = session.quota_context()?;

		Ok(self.aggregate(&context).await)
	}
}

fn settle<Q>(stage: Stage, result: Result<Q>) -> Option<Q> {
	match result {
		Ok(quotas) => Some(quotas),
		Err(e) => {
			obs::log_absorbed_failure(stage, &e);

			None
		},
	}
}
