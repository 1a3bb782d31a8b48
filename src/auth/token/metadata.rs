//! Token metadata returned in the body of a token-issuance response.

// self
use crate::{
	_prelude::*,
	auth::{DomainRef, ProjectRef, TokenSecret, UserId},
	catalog::ServiceCatalog,
};

/// User the token was issued to.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
	/// User identifier.
	pub id: UserId,
	/// User name.
	pub name: String,
	/// Owning domain, when reported.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub domain: Option<DomainRef>,
}

/// Role assignment carried by a scoped token.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
	/// Role identifier.
	pub id: String,
	/// Role name.
	pub name: String,
}

/// Metadata the identity service returns alongside a token.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TokenMetadata {
	/// Token holder.
	pub user: User,
	/// Roles the holder has on the scoped project.
	#[serde(default)]
	pub roles: Vec<Role>,
	/// Service catalog visible to the token.
	#[serde(default)]
	pub catalog: ServiceCatalog,
	/// Scoped project; absent for unscoped tokens.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub project: Option<ProjectRef>,
	/// Authentication methods used to obtain the token.
	#[serde(default)]
	pub methods: Vec<String>,
	/// Issue instant.
	#[serde(with = "time::serde::rfc3339")]
	pub issued_at: OffsetDateTime,
	/// Expiry instant.
	#[serde(with = "time::serde::rfc3339")]
	pub expires_at: OffsetDateTime,
}
impl TokenMetadata {
	/// Returns `true` if the token is expired at `instant`.
	pub fn is_expired_at(&self, instant: OffsetDateTime) -> bool {
		instant >= self.expires_at
	}

	/// Returns `true` if the holder has a role named `name` (case-insensitive).
	pub fn has_role(&self, name: &str) -> bool {
		self.roles.iter().any(|role| role.name.eq_ignore_ascii_case(name))
	}
}

/// Project-scoped credential produced by the scope exchange.
///
/// The token is a capability owned by the caller's session; it is never logged and never
/// persisted beyond that session.
#[derive(Clone, Debug)]
pub struct ScopedToken {
	/// Scoped token value taken from the `X-Subject-Token` header.
	pub token: TokenSecret,
	/// Metadata taken from the response body.
	pub metadata: TokenMetadata,
}
