//! Normalized quota model shared by the compute, volume, and network fetchers.
//!
//! Upstream services speak the `-1 = unlimited / 0 = disabled` convention. Internally that
//! convention is lifted into [`QuotaLimit`]; it is reconstructed only when a [`QuotaUsage`] is
//! serialized for the aggregation output.

pub mod compute;
pub mod network;
pub mod summary;
pub mod volume;

pub(crate) mod raw;

pub use compute::*;
pub use network::*;
pub use summary::*;
pub use volume::*;

// self
use crate::_prelude::*;

/// Upper bound for a quota.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "i64", into = "i64")]
pub enum QuotaLimit {
	/// No upper bound (`-1` on the wire).
	Unlimited,
	/// Resource disabled for the project (`0` on the wire).
	Disabled,
	/// Positive upper bound.
	Bounded(u64),
}
impl QuotaLimit {
	/// Converts the upstream convention; any negative value means unlimited.
	pub const fn from_wire(value: i64) -> Self {
		match value {
			i64::MIN..=-1 => Self::Unlimited,
			0 => Self::Disabled,
			bound => Self::Bounded(bound as u64),
		}
	}

	/// Reconstructs the upstream convention.
	pub fn to_wire(self) -> i64 {
		match self {
			Self::Unlimited => -1,
			Self::Disabled => 0,
			Self::Bounded(bound) => i64::try_from(bound).unwrap_or(i64::MAX),
		}
	}

	/// Returns `true` for [`QuotaLimit::Unlimited`].
	pub const fn is_unlimited(self) -> bool {
		matches!(self, Self::Unlimited)
	}

	/// Returns `true` for [`QuotaLimit::Disabled`].
	pub const fn is_disabled(self) -> bool {
		matches!(self, Self::Disabled)
	}

	/// Returns the bound, if any.
	pub const fn bound(self) -> Option<u64> {
		match self {
			Self::Bounded(bound) => Some(bound),
			_ => None,
		}
	}

	/// Percentage of the limit consumed by `used`, rounded half-up.
	///
	/// Unlimited quotas have no percentage; disabled quotas are always at 0.
	pub fn percentage_of(self, used: u64) -> Option<u64> {
		match self {
			Self::Unlimited => None,
			Self::Disabled | Self::Bounded(0) => Some(0),
			Self::Bounded(bound) => {
				let bound = u128::from(bound);
				let rounded = (u128::from(used) * 200 + bound) / (bound * 2);

				Some(u64::try_from(rounded).unwrap_or(u64::MAX))
			},
		}
	}

	/// Label shown next to a usage figure: `∞`, `0`, or the bound.
	pub fn display(self) -> String {
		match self {
			Self::Unlimited => "∞".into(),
			Self::Disabled => "0".into(),
			Self::Bounded(bound) => bound.to_string(),
		}
	}
}
impl From<i64> for QuotaLimit {
	fn from(value: i64) -> Self {
		Self::from_wire(value)
	}
}
impl From<QuotaLimit> for i64 {
	fn from(limit: QuotaLimit) -> Self {
		limit.to_wire()
	}
}
impl Display for QuotaLimit {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(&self.display())
	}
}

/// Usage of one resource against its limit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuotaUsage {
	/// Amount currently consumed.
	pub used: u64,
	/// Upper bound.
	pub limit: QuotaLimit,
	/// Amount reserved by in-flight operations, when the service reports it.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub reserved: Option<u64>,
}
impl QuotaUsage {
	/// Creates a usage without a reserved figure.
	pub const fn new(used: u64, limit: QuotaLimit) -> Self {
		Self { used, limit, reserved: None }
	}

	/// Sets the reserved figure.
	pub const fn with_reserved(mut self, reserved: u64) -> Self {
		self.reserved = Some(reserved);

		self
	}

	/// Percentage consumed; `None` for unlimited quotas.
	pub fn percentage(&self) -> Option<u64> {
		self.limit.percentage_of(self.used)
	}
}

/// Combined result of one aggregation request.
///
/// Each group is `None` when its upstream service failed; the JSON form always carries all
/// three keys, using `null` for absent groups.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregatedQuotaResult {
	/// Compute quotas.
	pub compute: Option<ComputeQuotas>,
	/// Block-storage quotas.
	pub volume: Option<VolumeQuotas>,
	/// Network quotas.
	pub network: Option<NetworkQuotas>,
}
impl AggregatedQuotaResult {
	/// Returns `true` when every group is absent.
	pub fn is_empty(&self) -> bool {
		self.compute.is_none() && self.volume.is_none() && self.network.is_none()
	}

	/// Returns `true` when every group is present.
	pub fn is_complete(&self) -> bool {
		self.compute.is_some() && self.volume.is_some() && self.network.is_some()
	}
}
