//! Compute quotas (`os-quota-sets` detail documents).

// self
use crate::{
	_prelude::*,
	quota::{
		QuotaUsage,
		raw::{IN_USE_FIELDS, RawQuotaDocument},
	},
};

/// Compute quotas for one project. RAM figures are expressed in GiB.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComputeQuotas {
	/// Server instances.
	pub instances: QuotaUsage,
	/// Virtual CPUs.
	pub cores: QuotaUsage,
	/// Memory, in GiB.
	pub ram: QuotaUsage,
	/// Key pairs, when reported.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub key_pairs: Option<QuotaUsage>,
	/// Server groups, when reported.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub server_groups: Option<QuotaUsage>,
	/// Members per server group, when reported.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub server_group_members: Option<QuotaUsage>,
}
impl ComputeQuotas {
	pub(crate) fn from_document(document: &RawQuotaDocument) -> Self {
		let optional = |resource: &str| {
			document.optional_usage(resource, IN_USE_FIELDS).map(|usage| usage.into_usage())
		};

		Self {
			instances: document.usage("instances", IN_USE_FIELDS).into_usage(),
			cores: document.usage("cores", IN_USE_FIELDS).into_usage(),
			ram: document.usage("ram", IN_USE_FIELDS).mib_to_gib().into_usage(),
			key_pairs: optional("key_pairs"),
			server_groups: optional("server_groups"),
			server_group_members: optional("server_group_members"),
		}
	}
}
