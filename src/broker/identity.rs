//! Identity service calls: project listing and the project scope exchange.

// self
use crate::{
	_prelude::*,
	auth::{Project, ProjectId, ScopedToken, TokenMetadata, TokenSecret},
	broker::{QuotaBroker, common},
	error::UpstreamError,
	http::{HttpRequest, HttpTransport, SUBJECT_TOKEN_HEADER},
	obs::{self, Stage},
};

const SERVICE: &str = "identity";

#[derive(Deserialize)]
struct TokenEnvelope {
	token: TokenMetadata,
}

#[derive(Deserialize)]
struct ProjectsEnvelope {
	projects: Vec<Project>,
}

/// Identity error body: `{"error": {"message": ..}}`.
#[derive(Deserialize)]
struct IdentityErrorEnvelope {
	error: IdentityErrorBody,
}
#[derive(Deserialize)]
struct IdentityErrorBody {
	message: String,
}

impl<T> QuotaBroker<T>
where
	T: ?Sized + HttpTransport,
{
	/// Exchanges an unscoped token for a token scoped to `project`.
	///
	/// The scoped token comes from the `X-Subject-Token` response header; its metadata, including
	/// the service catalog every later fetch resolves endpoints from, comes from the body.
	/// The identity service refusing the scope (401/403) yields [`Error::ScopeDenied`]; any other
	/// failure yields [`Error::UpstreamUnavailable`].
	pub async fn scope_token(&self, unscoped: &TokenSecret, project: &ProjectId) -> Result<ScopedToken> {
		obs::observe(Stage::ScopeToken, async move {
			let url = self.identity_url("v3/auth/tokens")?;
			let body = serde_json::json!({
				"auth": {
					"identity": {
						"methods": ["token"],
						"token": { "id": unscoped.expose() }
					},
					"scope": {
						"project": { "id": project.to_string() }
					}
				}
			});
			let response = self.send(SERVICE, HttpRequest::post_json(url, &body)).await?;

			if matches!(response.status, 401 | 403) {
				return Err(Error::ScopeDenied {
					project: project.to_string(),
					status: response.status,
					reason: identity_reason(&response.body),
				});
			}

			let response = common::ensure_success(SERVICE, response)?;
			let token = response
				.header(SUBJECT_TOKEN_HEADER)
				.filter(|value| !value.trim().is_empty())
				.map(TokenSecret::new)
				.ok_or(UpstreamError::MissingSubjectToken)?;
			let TokenEnvelope { token: metadata } = common::decode_json(SERVICE, &response.body)?;

			Ok(ScopedToken { token, metadata })
		})
		.await
	}

	/// Lists the projects the unscoped token can be scoped to, sorted by name.
	///
	/// A rejected token (401) yields [`Error::NotAuthenticated`].
	pub async fn list_projects(&self, unscoped: &TokenSecret) -> Result<Vec<Project>> {
		obs::observe(Stage::ListProjects, async move {
			let url = self.identity_url("v3/auth/projects")?;
			let response =
				self.send(SERVICE, HttpRequest::get(url).with_auth_token(unscoped)).await?;

			if response.status == 401 {
				return Err(Error::NotAuthenticated);
			}

			let response = common::ensure_success(SERVICE, response)?;
			let ProjectsEnvelope { mut projects } = common::decode_json(SERVICE, &response.body)?;

			projects.sort_by(|a, b| {
				a.name.to_lowercase().cmp(&b.name.to_lowercase()).then_with(|| a.name.cmp(&b.name))
			});

			Ok(projects)
		})
		.await
	}
}

fn identity_reason(body: &[u8]) -> String {
	serde_json::from_slice::<IdentityErrorEnvelope>(body)
		.map(|envelope| envelope.error.message)
		.unwrap_or_else(|_| common::body_preview(body))
}
