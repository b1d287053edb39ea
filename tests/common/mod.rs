//! Shared fixtures for integration tests: httpmock-backed identity provider and Graph.

#![allow(dead_code)]

// std
use std::sync::Arc;
// crates.io
use httpmock::MockServer;
use time::Duration;
use tokio::net::TcpListener;
// self
use sharepoint_relay::{
	auth::{ClientId, DriveId, Secret, SiteId, TenantId},
	graph::GraphClient,
	http::ReqwestHttpClient,
	oauth::ReqwestTransportErrorMapper,
	provider::{GRAPH_DEFAULT_SCOPE, MicrosoftIdentityStrategy, ProviderDescriptor},
	relay::ReqwestRelay,
	reqwest::Client as ReqwestClient,
	server,
	token::{ReqwestTokenProvider, TokenProvider},
	url::Url,
};

pub const TENANT: &str = "tenant-1";
pub const CLIENT_ID: &str = "relay-client";
pub const CLIENT_SECRET: &str = "relay-secret";
pub const SITE: &str = "site-1";
pub const DRIVE: &str = "drive-1";
pub const TOKEN_PATH: &str = "/tenant-1/oauth2/v2.0/token";
pub const ROOT_CHILDREN_PATH: &str = "/v1.0/sites/site-1/drives/drive-1/root/children";

/// Builds a reqwest client that accepts the self-signed certificates produced by `httpmock`.
pub fn test_reqwest_client() -> ReqwestClient {
	ReqwestClient::builder()
		.danger_accept_invalid_certs(true)
		.danger_accept_invalid_hostnames(true)
		.build()
		.expect("Failed to build insecure Reqwest client for tests.")
}

/// Microsoft descriptor whose authority host is the mock server.
pub fn descriptor(server: &MockServer) -> ProviderDescriptor {
	let authority =
		Url::parse(&server.base_url()).expect("Mock authority host should parse successfully.");
	let tenant = TenantId::new(TENANT).expect("Tenant identifier should be valid.");

	ProviderDescriptor::microsoft(&authority, &tenant, GRAPH_DEFAULT_SCOPE)
		.expect("Mock Microsoft descriptor should build.")
}

/// Token provider pointed at the mock identity provider.
pub fn token_provider(server: &MockServer) -> ReqwestTokenProvider {
	TokenProvider::with_http_client(
		descriptor(server),
		Arc::new(MicrosoftIdentityStrategy),
		ClientId::new(CLIENT_ID).expect("Client identifier should be valid."),
		Secret::new(CLIENT_SECRET),
		ReqwestHttpClient::with_client(test_reqwest_client()),
		ReqwestTransportErrorMapper,
	)
	.with_refresh_window(Duration::seconds(60))
}

/// Graph client pointed at `{mock}/v1.0`.
pub fn graph_client(server: &MockServer) -> GraphClient {
	GraphClient::new(
		test_reqwest_client(),
		Url::parse(&server.url("/v1.0")).expect("Mock Graph base URL should parse."),
		SiteId::new(SITE).expect("Site identifier should be valid."),
		DriveId::new(DRIVE).expect("Drive identifier should be valid."),
	)
	.expect("Graph client should build against the mock server.")
}

/// Relay wired to the mock server for both identity and Graph calls.
pub fn relay(server: &MockServer) -> ReqwestRelay {
	ReqwestRelay::new(token_provider(server), graph_client(server))
}

/// Token endpoint success body.
pub fn token_body(access_token: &str, expires_in: i64) -> String {
	format!(
		"{{\"access_token\":\"{access_token}\",\"token_type\":\"Bearer\",\"expires_in\":{expires_in}}}"
	)
}

/// A running relay bound to an ephemeral loopback port.
pub struct RelayHandle {
	pub base_url: String,
	pub client: ReqwestClient,
}
impl RelayHandle {
	/// Serves `relay` in the background for the rest of the test.
	pub async fn spawn(relay: ReqwestRelay) -> Self {
		let listener =
			TcpListener::bind("127.0.0.1:0").await.expect("Ephemeral listener should bind.");
		let addr = listener.local_addr().expect("Listener should report its address.");

		tokio::spawn(server::run(listener, Arc::new(relay), std::future::pending()));

		Self { base_url: format!("http://{addr}"), client: ReqwestClient::new() }
	}

	/// Posts a raw JSON body to `/get_file`.
	pub async fn post_raw(&self, body: &str) -> (u16, Option<String>, Option<String>, String) {
		let response = self
			.client
			.post(format!("{}/get_file", self.base_url))
			.header("content-type", "application/json")
			.body(body.to_owned())
			.send()
			.await
			.expect("Relay should answer.");
		let status = response.status().as_u16();
		let header = |name: &str| {
			response.headers().get(name).and_then(|value| value.to_str().ok()).map(str::to_owned)
		};
		let content_type = header("content-type");
		let retry_after = header("retry-after");
		let text = response.text().await.expect("Relay response body should be readable.");

		(status, content_type, retry_after, text)
	}

	/// Posts `{"fileName": file_name}` and returns status plus body.
	pub async fn get_file(&self, file_name: &str) -> (u16, String) {
		let body = serde_json::json!({ "fileName": file_name }).to_string();
		let (status, _, _, text) = self.post_raw(&body).await;

		(status, text)
	}
}

/// Extracts `detail` from a JSON error body.
pub fn detail(body: &str) -> String {
	let value: serde_json::Value =
		serde_json::from_str(body).expect("Error responses should be JSON.");

	value["detail"].as_str().expect("Error body should carry a string detail.").to_owned()
}
