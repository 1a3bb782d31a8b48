//! Typed view over the host's session state.
//!
//! The host owns session transport and storage; the broker only reads four values from it
//! through [`SessionStore`] and turns them into an explicit [`SessionContext`], which in turn
//! yields the per-request [`QuotaContext`] the fetchers consume.

pub mod memory;

pub use memory::*;

// self
use crate::{
	_prelude::*,
	auth::{ProjectId, ScopedToken, TokenMetadata, TokenSecret},
	catalog::ServiceCatalog,
};

/// Session values the broker reads.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SessionKey {
	/// Unscoped token issued at login.
	UnscopedToken,
	/// Project-scoped token issued by the scope exchange.
	ScopedToken,
	/// Project the user selected.
	SelectedProject,
	/// Metadata of the scoped token (user, roles, catalog).
	ProjectData,
}
impl SessionKey {
	/// Returns the storage key used by the host session.
	pub const fn as_str(self) -> &'static str {
		match self {
			SessionKey::UnscopedToken => "keystone_unscoped_token",
			SessionKey::ScopedToken => "projectToken",
			SessionKey::SelectedProject => "selectedProject",
			SessionKey::ProjectData => "projectData",
		}
	}
}
impl Display for SessionKey {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Session decoding failures.
#[derive(Debug, ThisError)]
pub enum SessionError {
	/// A stored value does not have the expected shape.
	#[error("Session value `{key}` is malformed.")]
	Malformed {
		/// Offending key.
		key: SessionKey,
		/// Underlying decoding failure.
		#[source]
		source: serde_json::Error,
	},
}

/// Read-only access to the host's session.
pub trait SessionStore
where
	Self: Send + Sync,
{
	/// Returns the raw value stored under `key`, if any.
	fn get(&self, key: SessionKey) -> Option<Value>;
}

/// Decoded session state for one request.
#[derive(Clone, Debug, Default)]
pub struct SessionContext {
	/// Unscoped token issued at login.
	pub unscoped_token: Option<TokenSecret>,
	/// Project-scoped token.
	pub scoped_token: Option<TokenSecret>,
	/// Identifier of the selected project.
	pub selected_project: Option<ProjectId>,
	/// Metadata of the scoped token.
	pub project_data: Option<TokenMetadata>,
}
impl SessionContext {
	/// Reads and decodes every value the broker needs from `store`.
	///
	/// Missing values stay `None`; values that are present but malformed fail with
	/// [`SessionError::Malformed`].
	pub fn load(store: &dyn SessionStore) -> Result<Self, SessionError> {
		let selected_project = decode::<SelectedProject>(store, SessionKey::SelectedProject)?
			.map(SelectedProject::into_id);

		Ok(Self {
			unscoped_token: decode(store, SessionKey::UnscopedToken)?,
			scoped_token: decode(store, SessionKey::ScopedToken)?,
			selected_project,
			project_data: decode(store, SessionKey::ProjectData)?,
		})
	}

	/// Project the request targets: the selected project, else the scoped token's project.
	pub fn project(&self) -> Option<&ProjectId> {
		self.selected_project
			.as_ref()
			.or_else(|| self.project_data.as_ref()?.project.as_ref().map(|project| &project.id))
	}

	/// Builds the per-request quota context.
	///
	/// Fails with [`Error::NotAuthenticated`] when the scoped token or its metadata is missing
	/// and with [`Error::ProjectNotSelected`] when no project can be determined.
	pub fn quota_context(&self) -> Result<QuotaContext> {
		let token = self.scoped_token.clone().ok_or(Error::NotAuthenticated)?;
		let project = self.project().cloned().ok_or(Error::ProjectNotSelected)?;
		let metadata = self.project_data.as_ref().ok_or(Error::NotAuthenticated)?;

		Ok(QuotaContext::new(token, metadata.catalog.clone(), Some(project)))
	}
}

/// Inputs shared by the three quota fetchers.
#[derive(Clone, Debug)]
pub struct QuotaContext {
	/// Project-scoped token sent as `X-Auth-Token`.
	pub token: TokenSecret,
	/// Catalog captured at scope time.
	pub catalog: Arc<ServiceCatalog>,
	/// Project whose quotas are read.
	pub project: Option<ProjectId>,
}
impl QuotaContext {
	/// Creates a context from its parts.
	pub fn new(
		token: TokenSecret,
		catalog: impl Into<Arc<ServiceCatalog>>,
		project: Option<ProjectId>,
	) -> Self {
		Self { token, catalog: catalog.into(), project }
	}

	/// Creates a context straight from a scope exchange result.
	pub fn from_scoped(scoped: &ScopedToken) -> Self {
		Self::new(
			scoped.token.clone(),
			scoped.metadata.catalog.clone(),
			scoped.metadata.project.as_ref().map(|project| project.id.clone()),
		)
	}

	pub(crate) fn require_project(&self) -> Result<&ProjectId> {
		self.project.as_ref().ok_or(Error::ProjectNotSelected)
	}
}

/// Selected project as stored by hosts: either the full project object or its bare id.
#[derive(Deserialize)]
#[serde(untagged)]
enum SelectedProject {
	Id(ProjectId),
	Object { id: ProjectId },
}
impl SelectedProject {
	fn into_id(self) -> ProjectId {
		match self {
			Self::Id(id) | Self::Object { id } => id,
		}
	}
}

fn decode<T>(store: &dyn SessionStore, key: SessionKey) -> Result<Option<T>, SessionError>
where
	T: DeserializeOwned,
{
	match store.get(key) {
		None | Some(Value::Null) => Ok(None),
		Some(value) =>
			serde_json::from_value(value).map(Some).map_err(|source| SessionError::Malformed { key, source }),
	}
}
