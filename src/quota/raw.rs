//! Lenient decoding of raw quota documents.
//!
//! Upstream documents are read field by field: a missing or non-numeric `used` becomes 0 and a
//! missing or non-numeric `limit` becomes unlimited, so one bad field never spoils the rest.

// self
use crate::{
	_prelude::*,
	quota::{QuotaLimit, QuotaUsage},
};

const MIB_PER_GIB: i64 = 1024;

/// Field names of one usage record.
#[derive(Clone, Copy, Debug)]
pub(crate) struct UsageFields {
	used: &'static str,
	limit: &'static str,
	reserved: &'static str,
	/// Reserved figure assumed when the record omits it; `None` leaves it absent.
	reserved_default: Option<u64>,
}

/// Compute and block-storage detail documents (`in_use` / `limit` / `reserved`).
pub(crate) const IN_USE_FIELDS: UsageFields =
	UsageFields { used: "in_use", limit: "limit", reserved: "reserved", reserved_default: Some(0) };
/// Network detail documents (`used` / `limit` / `reserved`).
pub(crate) const USED_FIELDS: UsageFields =
	UsageFields { used: "used", limit: "limit", reserved: "reserved", reserved_default: None };

/// `{"quota_set": {...}}` envelope used by compute and block storage.
#[derive(Debug, Deserialize)]
pub(crate) struct QuotaSetEnvelope {
	pub(crate) quota_set: RawQuotaDocument,
}

/// `{"quota": {...}}` envelope used by the network service.
#[derive(Debug, Deserialize)]
pub(crate) struct NetworkQuotaEnvelope {
	pub(crate) quota: RawQuotaDocument,
}

/// Quota document keyed by resource name.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(transparent)]
pub(crate) struct RawQuotaDocument(serde_json::Map<String, Value>);
impl RawQuotaDocument {
	/// Returns `true` when the document reports `resource` at all.
	pub(crate) fn has(&self, resource: &str) -> bool {
		self.0.contains_key(resource)
	}

	/// Reads the usage record for `resource`, tolerating any shape.
	pub(crate) fn usage(&self, resource: &str, fields: UsageFields) -> RawUsage {
		let record = self.0.get(resource).and_then(Value::as_object);
		let read = |name: &str| record.and_then(|record| lenient_int(record.get(name)));

		RawUsage {
			used: read(fields.used),
			limit: read(fields.limit),
			reserved: read(fields.reserved),
			reserved_default: fields.reserved_default,
		}
	}

	/// Reads the first of `aliases` the document reports, defaulting like [`Self::usage`].
	pub(crate) fn usage_of(&self, aliases: &[&str], fields: UsageFields) -> RawUsage {
		let resource = aliases.iter().copied().find(|alias| self.has(alias)).unwrap_or_default();

		self.usage(resource, fields)
	}

	/// Reads `resource` only when the document reports it.
	pub(crate) fn optional_usage(&self, resource: &str, fields: UsageFields) -> Option<RawUsage> {
		self.has(resource).then(|| self.usage(resource, fields))
	}
}

/// Parsed but not yet defaulted usage record.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct RawUsage {
	used: Option<i64>,
	limit: Option<i64>,
	reserved: Option<i64>,
	reserved_default: Option<u64>,
}
impl RawUsage {
	/// Converts MiB figures to GiB, rounding half-up.
	///
	/// Sentinel limits (`-1`, `0`) pass through unchanged and a positive limit never rounds down
	/// to the disabled sentinel.
	pub(crate) fn mib_to_gib(self) -> Self {
		let scale = |value: i64| value.saturating_add(MIB_PER_GIB / 2) / MIB_PER_GIB;

		Self {
			used: self.used.map(|used| if used > 0 { scale(used) } else { used }),
			limit: self.limit.map(|limit| if limit > 0 { scale(limit).max(1) } else { limit }),
			reserved: self.reserved.map(|reserved| if reserved > 0 { scale(reserved) } else { reserved }),
			reserved_default: self.reserved_default,
		}
	}

	/// Applies the per-field defaults.
	pub(crate) fn into_usage(self) -> QuotaUsage {
		QuotaUsage {
			used: self.used.map_or(0, clamp_non_negative),
			limit: QuotaLimit::from_wire(self.limit.unwrap_or(-1)),
			reserved: self.reserved.map(clamp_non_negative).or(self.reserved_default),
		}
	}
}

fn clamp_non_negative(value: i64) -> u64 {
	u64::try_from(value).unwrap_or(0)
}

/// Integer reading with `parseInt`-like leniency: numbers are truncated, strings contribute
/// their leading integer, everything else is absent.
pub(crate) fn lenient_int(value: Option<&Value>) -> Option<i64> {
	match value? {
		Value::Number(number) => number.as_i64().or_else(|| {
			number.as_u64().map(|n| i64::try_from(n).unwrap_or(i64::MAX)).or_else(|| {
				number.as_f64().filter(|n| n.is_finite()).map(|n| n.trunc() as i64)
			})
		}),
		Value::String(text) => leading_int(text),
		_ => None,
	}
}

fn leading_int(text: &str) -> Option<i64> {
	let trimmed = text.trim_start();
	let (negative, digits) = match trimmed.as_bytes().first() {
		Some(b'-') => (true, &trimmed[1..]),
		Some(b'+') => (false, &trimmed[1..]),
		_ => (false, trimmed),
	};
	let end = digits.find(|ch: char| !ch.is_ascii_digit()).unwrap_or(digits.len());

	if end == 0 {
		return None;
	}

	let magnitude = digits[..end].parse::<i64>().unwrap_or(i64::MAX);

	Some(if negative { -magnitude } else { magnitude })
}
