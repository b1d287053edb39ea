mod common;

// std
use std::{collections::BTreeMap, sync::Arc};
// crates.io
use httpmock::prelude::*;
// self
use common::*;
use sharepoint_relay::{
	auth::{ClientId, Secret},
	error::{AuthError, Error},
	http::ReqwestHttpClient,
	oauth::ReqwestTransportErrorMapper,
	provider::{
		DefaultProviderStrategy, MicrosoftIdentityStrategy, ProviderErrorContext,
		ProviderErrorKind, ProviderStrategy,
	},
	token::{ReqwestTokenProvider, TokenProvider},
};

struct TaggingStrategy;
impl ProviderStrategy for TaggingStrategy {
	fn classify_token_error(&self, ctx: &ProviderErrorContext) -> ProviderErrorKind {
		DefaultProviderStrategy.classify_token_error(ctx)
	}

	fn augment_token_request(&self, form: &mut BTreeMap<String, String>) {
		form.insert("client_info".into(), "1".into());
		form.insert("grant_type".into(), "password".into());
	}
}

fn provider_with(server: &MockServer, strategy: Arc<dyn ProviderStrategy>) -> ReqwestTokenProvider {
	TokenProvider::with_http_client(
		descriptor(server),
		strategy,
		ClientId::new(CLIENT_ID).expect("Client identifier should be valid."),
		Secret::new(CLIENT_SECRET),
		ReqwestHttpClient::with_client(test_reqwest_client()),
		ReqwestTransportErrorMapper,
	)
}

#[tokio::test]
async fn custom_strategy_adds_form_parameters_but_not_grant_overrides() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(POST)
				.path(TOKEN_PATH)
				.body_includes("client_info=1")
				.body_includes("grant_type=client_credentials")
				.body_excludes("grant_type=password");
			then.status(200)
				.header("content-type", "application/json")
				.body(token_body("tagged-token", 600));
		})
		.await;
	let provider = provider_with(&server, Arc::new(TaggingStrategy));
	let token = provider.access_token().await.expect("Tagged exchange should succeed.");

	assert_eq!(token.secret.expose(), "tagged-token");

	mock.assert_async().await;
}

#[tokio::test]
async fn aadsts_codes_drive_classification() {
	let server = MockServer::start_async().await;
	let _mock = server
		.mock_async(|when, then| {
			when.method(POST).path(TOKEN_PATH);
			then.status(400).header("content-type", "application/json").body(
				"{\"error\":\"invalid_request\",\"error_description\":\"AADSTS90002: Tenant 'tenant-1' not found.\"}",
			);
		})
		.await;
	let microsoft = provider_with(&server, Arc::new(MicrosoftIdentityStrategy));
	let err = microsoft.access_token().await.expect_err("Unknown tenants should be rejected.");

	assert!(matches!(err, Error::Auth(AuthError::InvalidClient { .. })), "{err:?}");

	let generic = provider_with(&server, Arc::new(DefaultProviderStrategy));
	let err = generic.access_token().await.expect_err("Unknown tenants should be rejected.");

	assert!(matches!(err, Error::Auth(AuthError::InvalidGrant { .. })), "{err:?}");
}

#[test]
fn default_strategy_reads_error_description_when_error_code_is_unknown() {
	let ctx = ProviderErrorContext::new()
		.with_http_status(400)
		.with_oauth_error("invalid_request")
		.with_error_description("invalid_grant: assertion already used");

	assert_eq!(DefaultProviderStrategy.classify_token_error(&ctx), ProviderErrorKind::InvalidGrant);
}
