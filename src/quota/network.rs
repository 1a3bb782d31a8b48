//! Network quotas (`/v2.0/quotas/{project}/details` documents).

// self
use crate::{
	_prelude::*,
	quota::{
		QuotaUsage,
		raw::{RawQuotaDocument, USED_FIELDS},
	},
};

/// Network quotas for one project; every field is always populated.
///
/// The network service keys its documents by singular resource name (`network`, `floatingip`);
/// plural keys are accepted as a fallback.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkQuotas {
	/// Networks.
	pub networks: QuotaUsage,
	/// Subnets.
	pub subnets: QuotaUsage,
	/// Ports.
	pub ports: QuotaUsage,
	/// Routers.
	pub routers: QuotaUsage,
	/// Floating IPs.
	pub floatingips: QuotaUsage,
	/// Security groups.
	pub security_groups: QuotaUsage,
	/// Security-group rules.
	pub security_group_rules: QuotaUsage,
}
impl NetworkQuotas {
	pub(crate) fn from_document(document: &RawQuotaDocument) -> Self {
		let usage = |aliases: &[&str]| document.usage_of(aliases, USED_FIELDS).into_usage();

		Self {
			networks: usage(&["network", "networks"]),
			subnets: usage(&["subnet", "subnets"]),
			ports: usage(&["port", "ports"]),
			routers: usage(&["router", "routers"]),
			floatingips: usage(&["floatingip", "floatingips"]),
			security_groups: usage(&["security_group", "security_groups"]),
			security_group_rules: usage(&["security_group_rule", "security_group_rules"]),
		}
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::quota::QuotaLimit;

	#[test]
	fn missing_resources_default_to_unlimited() {
		let document: RawQuotaDocument = serde_json::from_value(serde_json::json!({
			"network": { "used": 1, "limit": 100, "reserved": 0 },
			"port": { "used": "7", "limit": "500" },
			"floatingip": { "used": 0, "limit": 0 }
		}))
		.expect("Network document fixture should deserialize.");
		let quotas = NetworkQuotas::from_document(&document);

		assert_eq!(quotas.networks, QuotaUsage::new(1, QuotaLimit::Bounded(100)).with_reserved(0));
		assert_eq!(quotas.ports, QuotaUsage::new(7, QuotaLimit::Bounded(500)));
		assert_eq!(quotas.floatingips.limit, QuotaLimit::Disabled);
		assert_eq!(quotas.routers, QuotaUsage::new(0, QuotaLimit::Unlimited));
		assert_eq!(quotas.security_group_rules, QuotaUsage::new(0, QuotaLimit::Unlimited));
	}

	#[test]
	fn plural_resource_keys_are_accepted() {
		let document: RawQuotaDocument = serde_json::from_value(serde_json::json!({
			"security_groups": { "used": 2, "limit": 10 },
			"security_group_rules": { "used": 14, "limit": 100 }
		}))
		.expect("Network document fixture should deserialize.");
		let quotas = NetworkQuotas::from_document(&document);

		assert_eq!(quotas.security_groups, QuotaUsage::new(2, QuotaLimit::Bounded(10)));
		assert_eq!(quotas.security_group_rules.percentage(), Some(14));
	}
}
