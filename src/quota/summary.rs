//! Labelled rows for presentation layers.
//!
//! Rendering is left to the caller; this only fixes the labels, units, and ordering used by the
//! project overview, skipping absent groups and unreported optional rows.

// self
use crate::{
	_prelude::*,
	quota::{AggregatedQuotaResult, QuotaLimit, QuotaUsage},
};

/// One labelled quota row.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct QuotaItem {
	/// Human-readable label.
	pub label: &'static str,
	/// Amount consumed.
	pub used: u64,
	/// Upper bound.
	pub limit: QuotaLimit,
	/// Unit suffix (`GB` or empty).
	pub units: &'static str,
}
impl QuotaItem {
	fn new(label: &'static str, units: &'static str, usage: &QuotaUsage) -> Self {
		Self { label, used: usage.used, limit: usage.limit, units }
	}

	/// Percentage consumed; `None` for unlimited quotas.
	pub fn percentage(&self) -> Option<u64> {
		self.limit.percentage_of(self.used)
	}
}

/// Named group of rows.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct QuotaGroup {
	/// Group name (`Compute`, `Volume`, `Network`).
	pub name: &'static str,
	/// Rows in display order.
	pub items: Vec<QuotaItem>,
}

impl AggregatedQuotaResult {
	/// Builds labelled groups for every present quota group.
	pub fn summary(&self) -> Vec<QuotaGroup> {
		let mut groups = Vec::new();

		if let Some(compute) = &self.compute {
			let mut items = vec![
				QuotaItem::new("Instances", "", &compute.instances),
				QuotaItem::new("VCPUs", "", &compute.cores),
				QuotaItem::new("RAM", "GB", &compute.ram),
			];

			push_optional(&mut items, "Key Pairs", "", compute.key_pairs.as_ref());
			push_optional(&mut items, "Server Groups", "", compute.server_groups.as_ref());
			push_optional(
				&mut items,
				"Server Group Members",
				"",
				compute.server_group_members.as_ref(),
			);
			groups.push(QuotaGroup { name: "Compute", items });
		}
		if let Some(volume) = &self.volume {
			let mut items = vec![
				QuotaItem::new("Volumes", "", &volume.volumes),
				QuotaItem::new("Volume Snapshots", "", &volume.snapshots),
				QuotaItem::new("Volume Storage", "GB", &volume.gigabytes),
			];

			push_optional(&mut items, "Volume Backups", "", volume.backups.as_ref());
			push_optional(&mut items, "Backup Storage", "GB", volume.backup_gigabytes.as_ref());
			groups.push(QuotaGroup { name: "Volume", items });
		}
		if let Some(network) = &self.network {
			groups.push(QuotaGroup {
				name: "Network",
				items: vec![
					QuotaItem::new("Floating IPs", "", &network.floatingips),
					QuotaItem::new("Security Groups", "", &network.security_groups),
					QuotaItem::new("Security Group Rules", "", &network.security_group_rules),
					QuotaItem::new("Networks", "", &network.networks),
					QuotaItem::new("Subnets", "", &network.subnets),
					QuotaItem::new("Ports", "", &network.ports),
					QuotaItem::new("Routers", "", &network.routers),
				],
			});
		}

		groups
	}
}

fn push_optional(
	items: &mut Vec<QuotaItem>,
	label: &'static str,
	units: &'static str,
	usage: Option<&QuotaUsage>,
) {
	if let Some(usage) = usage {
		items.push(QuotaItem::new(label, units, usage));
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::quota::{ComputeQuotas, NetworkQuotas};

	fn usage(used: u64, limit: i64) -> QuotaUsage {
		QuotaUsage::new(used, QuotaLimit::from_wire(limit))
	}

	#[test]
	fn summary_skips_absent_groups_and_rows() {
		let result = AggregatedQuotaResult {
			compute: Some(ComputeQuotas {
				instances: usage(1, 10),
				cores: usage(2, -1),
				ram: usage(4, 8),
				key_pairs: None,
				server_groups: Some(usage(0, 0)),
				server_group_members: None,
			}),
			volume: None,
			network: Some(NetworkQuotas {
				networks: usage(1, 10),
				subnets: usage(1, 10),
				ports: usage(3, 50),
				routers: usage(1, 10),
				floatingips: usage(1, 4),
				security_groups: usage(1, 10),
				security_group_rules: usage(4, 100),
			}),
		};
		let groups = result.summary();

		assert_eq!(groups.iter().map(|group| group.name).collect::<Vec<_>>(), ["Compute", "Network"]);

		let compute = &groups[0].items;

		assert_eq!(
			compute.iter().map(|item| item.label).collect::<Vec<_>>(),
			["Instances", "VCPUs", "RAM", "Server Groups"]
		);
		assert_eq!(compute[1].percentage(), None);
		assert_eq!(compute[2].units, "GB");
		assert_eq!(compute[2].percentage(), Some(50));
		assert_eq!(compute[3].percentage(), Some(0));
		assert_eq!(groups[1].items[0].label, "Floating IPs");
		assert_eq!(groups[1].items[0].percentage(), Some(25));
	}

	#[test]
	fn empty_result_has_no_groups() {
		assert!(AggregatedQuotaResult::default().summary().is_empty());
	}
}
