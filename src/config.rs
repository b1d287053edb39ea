//! Process configuration: CLI flags with environment fallbacks and `.env` support.

// std
use std::{net::SocketAddr, time::Duration as StdDuration};
// crates.io
use clap::Parser;
// self
use crate::{
	_prelude::*,
	auth::{ClientId, DriveId, Secret, SiteId, TenantId},
	error::ConfigError,
	graph::GraphClient,
	http::{self, ReqwestHttpClient},
	oauth::ReqwestTransportErrorMapper,
	provider::{
		GRAPH_DEFAULT_SCOPE, MICROSOFT_AUTHORITY_HOST, MicrosoftIdentityStrategy,
		ProviderDescriptor,
	},
	token::{ReqwestTokenProvider, TokenProvider},
};

/// Default Microsoft Graph endpoint.
pub const GRAPH_BASE_URL: &str = "https://graph.microsoft.com/v1.0";

/// Relay settings. Every flag can also be supplied through its environment variable.
#[derive(Clone, Debug, Parser)]
#[command(name = "sharepoint-relay", version, about = "Serve SharePoint text files over HTTP.")]
pub struct RelayConfig {
	/// Directory (tenant) identifier of the app registration.
	#[arg(long, env = "TENANT_ID")]
	pub tenant_id: TenantId,
	/// Application (client) identifier.
	#[arg(long, env = "CLIENT_ID")]
	pub client_id: ClientId,
	/// Client secret of the app registration.
	#[arg(long, env = "CLIENT_SECRET", hide_env_values = true)]
	pub client_secret: Secret,
	/// Graph site identifier.
	#[arg(long, env = "SITE_ID")]
	pub site_id: SiteId,
	/// Graph drive (document library) identifier.
	#[arg(long, env = "DRIVE_ID")]
	pub drive_id: DriveId,
	/// Address the HTTP server listens on.
	#[arg(long, env = "LISTEN_ADDR", default_value = "0.0.0.0:9080")]
	pub listen: SocketAddr,
	/// Identity platform authority host.
	#[arg(long, env = "AUTHORITY_HOST", default_value = MICROSOFT_AUTHORITY_HOST)]
	pub authority_host: Url,
	/// Microsoft Graph base URL including the API version.
	#[arg(long, env = "GRAPH_BASE_URL", default_value = GRAPH_BASE_URL)]
	pub graph_base_url: Url,
	/// Scope requested with the client-credentials grant.
	#[arg(long, env = "GRAPH_SCOPE", default_value = GRAPH_DEFAULT_SCOPE)]
	pub scope: String,
	/// Timeout applied to every outbound HTTP call, in seconds.
	#[arg(
		long,
		env = "HTTP_TIMEOUT_SECS",
		default_value_t = 30,
		value_parser = clap::value_parser!(u64).range(1..)
	)]
	pub http_timeout_secs: u64,
	/// Refresh tokens this many seconds before they expire.
	#[arg(long, env = "TOKEN_REFRESH_WINDOW_SECS", default_value_t = 60)]
	pub refresh_window_secs: u32,
	/// Default log filter; `RUST_LOG` takes precedence.
	#[arg(long, env = "LOG_LEVEL", default_value = "info")]
	pub log_level: String,
}
impl RelayConfig {
	/// Loads `.env` (when present) and parses flags plus environment.
	///
	/// Exits the process with usage help when required settings are missing.
	pub fn load() -> Self {
		let _ = dotenv::dotenv();

		Self::parse()
	}

	/// Timeout for outbound HTTP calls.
	pub fn http_timeout(&self) -> StdDuration {
		StdDuration::from_secs(self.http_timeout_secs)
	}

	/// Preemptive refresh window for cached tokens.
	pub fn refresh_window(&self) -> Duration {
		Duration::seconds(i64::from(self.refresh_window_secs))
	}

	/// Identity provider descriptor for the configured tenant.
	pub fn descriptor(&self) -> Result<ProviderDescriptor, ConfigError> {
		Ok(ProviderDescriptor::microsoft(&self.authority_host, &self.tenant_id, self.scope.as_str())?)
	}

	/// Token provider wired to the Microsoft identity platform.
	pub fn token_provider(&self) -> Result<ReqwestTokenProvider, ConfigError> {
		let provider = TokenProvider::with_http_client(
			self.descriptor()?,
			Arc::new(MicrosoftIdentityStrategy),
			self.client_id.clone(),
			self.client_secret.clone(),
			ReqwestHttpClient::token_endpoint(self.http_timeout())?,
			ReqwestTransportErrorMapper,
		)
		.with_refresh_window(self.refresh_window());

		Ok(provider)
	}

	/// Graph client bound to the configured site and drive.
	pub fn graph_client(&self) -> Result<GraphClient, ConfigError> {
		GraphClient::new(
			http::graph_client(self.http_timeout())?,
			self.graph_base_url.clone(),
			self.site_id.clone(),
			self.drive_id.clone(),
		)
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	const REQUIRED: [&str; 11] = [
		"sharepoint-relay",
		"--tenant-id",
		"contoso.onmicrosoft.com",
		"--client-id",
		"00000000-0000-0000-0000-000000000001",
		"--client-secret",
		"s3cr3t",
		"--site-id",
		"contoso.sharepoint.com,1111,2222",
		"--drive-id",
		"b!drive",
	];

	#[test]
	fn defaults_apply_when_only_required_flags_are_given() {
		let config = RelayConfig::try_parse_from(REQUIRED).expect("Required flags should parse.");

		assert_eq!(config.listen, "0.0.0.0:9080".parse().expect("Address should parse."));
		assert_eq!(config.authority_host.as_str(), "https://login.microsoftonline.com/");
		assert_eq!(config.graph_base_url.as_str(), GRAPH_BASE_URL);
		assert_eq!(config.scope, GRAPH_DEFAULT_SCOPE);
		assert_eq!(config.http_timeout(), StdDuration::from_secs(30));
		assert_eq!(config.refresh_window(), Duration::seconds(60));
		assert_eq!(config.log_level, "info");
	}

	#[test]
	fn secrets_stay_out_of_debug_output() {
		let config = RelayConfig::try_parse_from(REQUIRED).expect("Required flags should parse.");

		assert!(!format!("{config:?}").contains("s3cr3t"));
		assert_eq!(config.client_secret.expose(), "s3cr3t");
	}

	#[test]
	fn invalid_identifiers_are_rejected() {
		let mut args = REQUIRED.to_vec();

		args[2] = "has space";

		assert!(RelayConfig::try_parse_from(args).is_err());
	}

	#[test]
	fn zero_timeout_is_rejected() {
		let mut args = REQUIRED.to_vec();

		args.extend(["--http-timeout-secs", "0"]);

		assert!(RelayConfig::try_parse_from(args.clone()).is_err());

		args.pop();
		args.push("5");

		let config = RelayConfig::try_parse_from(args).expect("Positive timeouts should parse.");

		assert_eq!(config.http_timeout(), StdDuration::from_secs(5));
	}

	#[test]
	fn derived_components_build() {
		let config = RelayConfig::try_parse_from(REQUIRED).expect("Required flags should parse.");
		let descriptor = config.descriptor().expect("Descriptor should build.");

		assert_eq!(
			descriptor.token_endpoint.as_str(),
			"https://login.microsoftonline.com/contoso.onmicrosoft.com/oauth2/v2.0/token"
		);

		let provider = config.token_provider().expect("Token provider should build.");

		assert_eq!(provider.refresh_window(), Duration::seconds(60));

		let graph = config.graph_client().expect("Graph client should build.");

		assert_eq!(graph.drive_id().as_ref(), "b!drive");
	}
}
