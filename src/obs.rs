//! Optional observability helpers for broker stages.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit structured spans named `openstack_quotas.stage` with a `stage`
//!   field, plus a `warn` event whenever the aggregator absorbs a fetcher failure.
//! - Enable `metrics` to increment the `openstack_quotas_stage_total` counter for every
//!   attempt/success/failure, labeled by `stage` + `outcome`.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Pipeline stages observed by the broker.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Stage {
	/// Scope exchange against the identity service.
	ScopeToken,
	/// Project listing against the identity service.
	ListProjects,
	/// Compute quota fetch.
	Compute,
	/// Block-storage quota fetch.
	Volume,
	/// Network quota fetch.
	Network,
	/// Concurrent fan-out over the three fetchers.
	Aggregate,
}
impl Stage {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			Stage::ScopeToken => "scope_token",
			Stage::ListProjects => "list_projects",
			Stage::Compute => "compute",
			Stage::Volume => "volume",
			Stage::Network => "network",
			Stage::Aggregate => "aggregate",
		}
	}
}
impl Display for Stage {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each stage.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StageOutcome {
	/// Entry to a stage.
	Attempt,
	/// Successful completion.
	Success,
	/// Failure, whether propagated or absorbed.
	Failure,
}
impl StageOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			StageOutcome::Attempt => "attempt",
			StageOutcome::Success => "success",
			StageOutcome::Failure => "failure",
		}
	}
}
impl Display for StageOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Runs `fut` inside the stage span and records its attempt and outcome.
pub(crate) async fn observe<F, T>(stage: Stage, fut: F) -> Result<T>
where
	F: Future<Output = Result<T>>,
{
	let span = StageSpan::new(stage);

	record_stage_outcome(stage, StageOutcome::Attempt);

	let result = span.instrument(fut).await;

	match &result {
		Ok(_) => record_stage_outcome(stage, StageOutcome::Success),
		Err(_) => record_stage_outcome(stage, StageOutcome::Failure),
	}

	result
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn labels_are_stable() {
		assert_eq!(Stage::ScopeToken.to_string(), "scope_token");
		assert_eq!(Stage::ListProjects.as_str(), "list_projects");
		assert_eq!(StageOutcome::Failure.to_string(), "failure");
	}

	#[tokio::test]
	async fn observe_passes_results_through() {
		let ok = observe(Stage::Compute, async { Ok::<_, Error>(7) }).await;
		let err = observe(Stage::Network, async { Err::<(), _>(Error::ProjectNotSelected) }).await;

		assert_eq!(ok.expect("Observed future should succeed."), 7);
		assert!(matches!(err, Err(Error::ProjectNotSelected)));
	}
}
