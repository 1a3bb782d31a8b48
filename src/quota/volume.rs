//! Block-storage quotas (`os-quota-sets?usage=true` documents).

// self
use crate::{
	_prelude::*,
	quota::{
		QuotaUsage,
		raw::{IN_USE_FIELDS, RawQuotaDocument},
	},
};

/// Block-storage quotas for one project. Gigabyte figures are reported in GiB upstream.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VolumeQuotas {
	/// Volumes.
	pub volumes: QuotaUsage,
	/// Volume storage, in GiB.
	pub gigabytes: QuotaUsage,
	/// Volume snapshots.
	pub snapshots: QuotaUsage,
	/// Volume backups, when reported.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub backups: Option<QuotaUsage>,
	/// Backup storage in GiB, when reported.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub backup_gigabytes: Option<QuotaUsage>,
}
impl VolumeQuotas {
	pub(crate) fn from_document(document: &RawQuotaDocument) -> Self {
		let optional = |resource: &str| {
			document.optional_usage(resource, IN_USE_FIELDS).map(|usage| usage.into_usage())
		};

		Self {
			volumes: document.usage("volumes", IN_USE_FIELDS).into_usage(),
			gigabytes: document.usage("gigabytes", IN_USE_FIELDS).into_usage(),
			snapshots: document.usage("snapshots", IN_USE_FIELDS).into_usage(),
			backups: optional("backups"),
			backup_gigabytes: optional("backup_gigabytes"),
		}
	}
}
