//! Project and domain references returned by the identity service.

// self
use crate::{
	_prelude::*,
	auth::{DomainId, ProjectId},
};

/// Project the caller can scope to, as listed by `GET /v3/auth/projects`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
	/// Project identifier; the scope target.
	pub id: ProjectId,
	/// Display name.
	pub name: String,
	/// Owning domain.
	pub domain_id: DomainId,
	/// Whether the project is enabled.
	#[serde(default = "enabled_default")]
	pub enabled: bool,
	/// Free-form description, when set.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub description: Option<String>,
	/// Parent project (or domain) identifier, when reported.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub parent_id: Option<String>,
}
impl Project {
	/// Creates an enabled project with no description or parent.
	pub fn new(id: ProjectId, name: impl Into<String>, domain_id: DomainId) -> Self {
		Self { id, name: name.into(), domain_id, enabled: true, description: None, parent_id: None }
	}
}

/// Domain reference embedded in token metadata.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainRef {
	/// Domain identifier.
	pub id: DomainId,
	/// Domain name, when reported.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub name: Option<String>,
}

/// Project reference embedded in a scoped token's metadata.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectRef {
	/// Project identifier.
	pub id: ProjectId,
	/// Project name.
	pub name: String,
	/// Owning domain, when reported.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub domain: Option<DomainRef>,
}

fn enabled_default() -> bool {
	true
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn project_listing_entries_deserialize_with_defaults() {
		let project: Project = serde_json::from_value(serde_json::json!({
			"id": "263fd9",
			"name": "demo",
			"domain_id": "default",
			"is_domain": false,
			"links": { "self": "https://identity.example.com/v3/projects/263fd9" }
		}))
		.expect("Project listing entry should deserialize.");

		assert_eq!(project.id.as_ref(), "263fd9");
		assert_eq!(project.domain_id.as_ref(), "default");
		assert!(project.enabled);
		assert!(project.description.is_none());
	}
}
