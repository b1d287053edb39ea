//! Identity provider descriptor and the Microsoft identity platform preset.

/// Builder API for assembling provider descriptors.
pub mod builder;

pub use builder::*;

// self
use crate::{
	_prelude::*,
	auth::{ProviderId, TenantId},
};

/// Default authority host for the Microsoft identity platform.
pub const MICROSOFT_AUTHORITY_HOST: &str = "https://login.microsoftonline.com";
/// App-only scope that grants every Graph application permission consented for the app.
pub const GRAPH_DEFAULT_SCOPE: &str = "https://graph.microsoft.com/.default";

/// Client authentication modes for token endpoint calls.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ClientAuthMethod {
	/// HTTP Basic with `client_id`/`client_secret`.
	ClientSecretBasic,
	#[default]
	/// Form POST body parameters for `client_id`/`client_secret`.
	ClientSecretPost,
}

/// Immutable provider descriptor consumed by the token provider.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProviderDescriptor {
	/// Descriptor identifier.
	pub id: ProviderId,
	/// Token endpoint used for client-credentials exchanges.
	pub token_endpoint: Url,
	/// Scopes requested with every exchange.
	pub scopes: Vec<String>,
	/// Client authentication mechanism.
	pub client_auth_method: ClientAuthMethod,
}
impl ProviderDescriptor {
	/// Creates a new builder for the provided identifier.
	pub fn builder(id: ProviderId) -> ProviderDescriptorBuilder {
		ProviderDescriptorBuilder::new(id)
	}

	/// Describes the Microsoft identity platform v2.0 endpoint for `tenant`.
	///
	/// `authority_host` is normally [`MICROSOFT_AUTHORITY_HOST`]; sovereign clouds and tests
	/// override it.
	pub fn microsoft(
		authority_host: &Url,
		tenant: &TenantId,
		scope: impl Into<String>,
	) -> Result<Self, ProviderDescriptorError> {
		let base = authority_host.as_str().trim_end_matches('/');
		let token_endpoint = Url::parse(&format!("{base}/{tenant}/oauth2/v2.0/token"))
			.map_err(|e| ProviderDescriptorError::InvalidTokenEndpoint { reason: e.to_string() })?;
		let id = ProviderId::new(format!("microsoft-{tenant}"))?;

		Self::builder(id)
			.token_endpoint(token_endpoint)
			.scope(scope)
			.client_auth_method(ClientAuthMethod::ClientSecretPost)
			.build()
	}
}
