//! Per-service quota fetchers.
//!
//! Each fetcher resolves its endpoint from the session catalog, issues one authenticated `GET`,
//! and normalizes the document. The catalog is never re-fetched.

// self
use crate::{
	_prelude::*,
	broker::{QuotaBroker, common},
	catalog::{CatalogError, ResolutionPolicy},
	http::{self, HttpRequest, HttpTransport},
	obs::{self, Stage},
	quota::{
		ComputeQuotas, NetworkQuotas, VolumeQuotas,
		raw::{NetworkQuotaEnvelope, QuotaSetEnvelope},
	},
	session::QuotaContext,
};

impl<T> QuotaBroker<T>
where
	T: ?Sized + HttpTransport,
{
	/// Reads compute quotas from `GET {compute}/os-quota-sets/{project}/detail`.
	pub async fn fetch_compute_quotas(&self, context: &QuotaContext) -> Result<ComputeQuotas> {
		const STAGE: Stage = Stage::Compute;

		obs::observe(STAGE, async move {
			let project = context.require_project()?;
			let url = self.quota_url(
				context,
				&self.config.compute_policy(),
				&format!("os-quota-sets/{project}/detail"),
			)?;
			let QuotaSetEnvelope { quota_set } = self.get_json(STAGE, context, url).await?;

			Ok(ComputeQuotas::from_document(&quota_set))
		})
		.await
	}

	/// Reads block-storage quotas from `GET {volume}/os-quota-sets/{project}?usage=true`,
	/// walking the configured service-type fallback chain.
	pub async fn fetch_volume_quotas(&self, context: &QuotaContext) -> Result<VolumeQuotas> {
		const STAGE: Stage = Stage::Volume;

		obs::observe(STAGE, async move {
			let project = context.require_project()?;
			let mut url = self.quota_url(
				context,
				&self.config.volume_policy(),
				&format!("os-quota-sets/{project}"),
			)?;

			url.query_pairs_mut().append_pair("usage", "true");

			let QuotaSetEnvelope { quota_set } = self.get_json(STAGE, context, url).await?;

			Ok(VolumeQuotas::from_document(&quota_set))
		})
		.await
	}

	/// Reads network quotas from `GET {network}/v2.0/quotas/{project}/details`.
	pub async fn fetch_network_quotas(&self, context: &QuotaContext) -> Result<NetworkQuotas> {
		const STAGE: Stage = Stage::Network;

		obs::observe(STAGE, async move {
			let project = context.require_project()?;
			let url = self.quota_url(
				context,
				&self.config.network_policy(),
				&format!("v2.0/quotas/{project}/details"),
			)?;
			let NetworkQuotaEnvelope { quota } = self.get_json(STAGE, context, url).await?;

			Ok(NetworkQuotas::from_document(&quota))
		})
		.await
	}

	fn quota_url(
		&self,
		context: &QuotaContext,
		policy: &ResolutionPolicy,
		path: &str,
	) -> Result<Url> {
		let endpoint = policy.resolve(&context.catalog, self.config.interface)?;

		http::join_path(&endpoint.url, path).map_err(|source| {
			CatalogError::InvalidEndpointUrl { service_type: policy.label(), source }.into()
		})
	}

	async fn get_json<D>(&self, stage: Stage, context: &QuotaContext, url: Url) -> Result<D>
	where
		D: DeserializeOwned,
	{
		let service = stage.as_str();
		let response =
			self.send(service, HttpRequest::get(url).with_auth_token(&context.token)).await?;
		let response = common::ensure_success(service, response)?;

		Ok(common::decode_json(service, &response.body)?)
	}
}
