//! Provider strategy hooks that customize token exchanges.
//!
//! Implementations decorate outgoing token requests and normalize error mapping
//! without tying the token provider to any particular HTTP client.

// self
use crate::_prelude::*;

/// Strategy hook that allows providers to decorate requests and classify errors.
///
/// Implementors are required to be `Send + Sync`, and the hooks use crate-owned data
/// types so strategies never depend on reqwest-specific structures. Override only what
/// you need; `augment_token_request` has a default no-op implementation.
pub trait ProviderStrategy: Send + Sync {
	/// Maps low-level HTTP/JSON errors into the relay taxonomy for a token request.
	fn classify_token_error(&self, ctx: &ProviderErrorContext) -> ProviderErrorKind;

	/// Gives providers a chance to add custom form parameters before dispatching.
	fn augment_token_request(&self, _form: &mut BTreeMap<String, String>) {}
}

/// Canonical provider error categories used by strategies.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProviderErrorKind {
	/// Provider rejected the grant.
	InvalidGrant,
	/// Client authentication failed.
	InvalidClient,
	/// Requested scope is not available to the application.
	InsufficientScope,
	/// Failure is temporary or unexpected.
	Transient,
}

/// Context passed to provider strategies when classifying token errors.
///
/// The struct keeps only primitive data (status codes, OAuth fields, body preview) so
/// strategies stay decoupled from any HTTP client.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProviderErrorContext {
	/// HTTP status code returned by the provider, when available.
	pub http_status: Option<u16>,
	/// Provider-supplied OAuth `error` field.
	pub oauth_error: Option<String>,
	/// Provider-supplied OAuth `error_description` field.
	pub error_description: Option<String>,
	/// Preview of the response body for non-JSON payloads.
	pub body_preview: Option<String>,
	/// Indicates whether the failure originated from the network/transport layer.
	pub network_error: bool,
}
impl ProviderErrorContext {
	/// Creates an empty context.
	pub fn new() -> Self {
		Self::default()
	}

	/// Convenience constructor for transport-level/network failures.
	pub fn network_failure() -> Self {
		Self { network_error: true, ..Self::default() }
	}

	/// Adds an HTTP status code (e.g., 400, 401, 500).
	pub fn with_http_status(mut self, status: u16) -> Self {
		self.http_status = Some(status);

		self
	}

	/// Adds the OAuth error code string returned by the provider.
	pub fn with_oauth_error(mut self, error: impl Into<String>) -> Self {
		self.oauth_error = Some(error.into());

		self
	}

	/// Adds the OAuth `error_description` field.
	pub fn with_error_description(mut self, description: impl Into<String>) -> Self {
		self.error_description = Some(description.into());

		self
	}

	/// Adds a body preview for providers that return non-JSON payloads.
	pub fn with_body_preview(mut self, body: impl Into<String>) -> Self {
		self.body_preview = Some(truncate_preview(body.into()));

		self
	}
}

/// Default strategy that applies RFC-guided heuristics.
///
/// It prioritizes structured OAuth fields (`error`, `error_description`), then
/// falls back to body text hints, and finally the HTTP status code. Network
/// failures are always treated as transient.
#[derive(Debug, Default)]
pub struct DefaultProviderStrategy;
impl Display for DefaultProviderStrategy {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("default-provider-strategy")
	}
}
impl ProviderStrategy for DefaultProviderStrategy {
	fn classify_token_error(&self, ctx: &ProviderErrorContext) -> ProviderErrorKind {
		if ctx.network_error {
			return ProviderErrorKind::Transient;
		}
		if matches!(ctx.http_status, Some(status) if status >= 500) {
			return ProviderErrorKind::Transient;
		}
		if let Some(kind) =
			classify_oauth_error(ctx.oauth_error.as_deref(), ctx.error_description.as_deref())
		{
			return kind;
		}
		if let Some(kind) = classify_body(ctx.body_preview.as_deref()) {
			return kind;
		}

		classify_status(ctx.http_status)
	}
}

/// Strategy for the Microsoft identity platform.
///
/// Entra ID embeds `AADSTS` codes in `error_description`; the codes are more precise than
/// the generic OAuth `error` field (an expired secret is reported as `invalid_client`, a
/// missing tenant as `invalid_request`). Unknown codes fall back to
/// [`DefaultProviderStrategy`].
#[derive(Debug, Default)]
pub struct MicrosoftIdentityStrategy;
impl ProviderStrategy for MicrosoftIdentityStrategy {
	fn classify_token_error(&self, ctx: &ProviderErrorContext) -> ProviderErrorKind {
		ctx.error_description
			.as_deref()
			.and_then(aadsts_code)
			.and_then(classify_aadsts)
			.unwrap_or_else(|| DefaultProviderStrategy.classify_token_error(ctx))
	}
}

const BODY_PREVIEW_LIMIT: usize = 256;

/// Truncates a body preview to a bounded number of characters.
pub(crate) fn truncate_preview(body: String) -> String {
	if body.chars().count() <= BODY_PREVIEW_LIMIT {
		return body;
	}

	let mut buf = String::new();

	for (idx, ch) in body.chars().enumerate() {
		if idx >= BODY_PREVIEW_LIMIT {
			buf.push('…');

			break;
		}
		buf.push(ch);
	}

	buf
}

fn aadsts_code(description: &str) -> Option<u32> {
	let start = description.find("AADSTS")? + "AADSTS".len();
	let digits: String =
		description[start..].chars().take_while(|ch| ch.is_ascii_digit()).collect();

	digits.parse().ok()
}

fn classify_aadsts(code: u32) -> Option<ProviderErrorKind> {
	match code {
		// Invalid or expired secret, unknown application, unknown tenant.
		7000215 | 7000222 | 700016 | 90002 => Some(ProviderErrorKind::InvalidClient),
		// Scope or resource not configured for the application.
		70011 | 500011 => Some(ProviderErrorKind::InsufficientScope),
		// Application disabled or blocked by policy.
		7000112 | 53003 => Some(ProviderErrorKind::InvalidGrant),
		_ => None,
	}
}

fn classify_oauth_error(
	oauth_error: Option<&str>,
	error_description: Option<&str>,
) -> Option<ProviderErrorKind> {
	oauth_error
		.and_then(match_exact_value)
		.or_else(|| error_description.and_then(match_exact_value))
		.or_else(|| classify_body(error_description))
}

fn match_exact_value(value: &str) -> Option<ProviderErrorKind> {
	if value.eq_ignore_ascii_case("invalid_grant") || value.eq_ignore_ascii_case("access_denied") {
		Some(ProviderErrorKind::InvalidGrant)
	} else if value.eq_ignore_ascii_case("invalid_client")
		|| value.eq_ignore_ascii_case("unauthorized_client")
	{
		Some(ProviderErrorKind::InvalidClient)
	} else if value.eq_ignore_ascii_case("invalid_scope")
		|| value.eq_ignore_ascii_case("insufficient_scope")
	{
		Some(ProviderErrorKind::InsufficientScope)
	} else if value.eq_ignore_ascii_case("temporarily_unavailable")
		|| value.eq_ignore_ascii_case("server_error")
	{
		Some(ProviderErrorKind::Transient)
	} else {
		None
	}
}

fn classify_body(body: Option<&str>) -> Option<ProviderErrorKind> {
	let lowered = body?.to_ascii_lowercase();

	match lowered.as_str() {
		text if text.contains("invalid_grant") => Some(ProviderErrorKind::InvalidGrant),
		text if text.contains("invalid_client") => Some(ProviderErrorKind::InvalidClient),
		text if text.contains("insufficient_scope") || text.contains("invalid_scope") =>
			Some(ProviderErrorKind::InsufficientScope),
		text if text.contains("temporarily_unavailable") || text.contains("retry") =>
			Some(ProviderErrorKind::Transient),
		_ => None,
	}
}

fn classify_status(status: Option<u16>) -> ProviderErrorKind {
	match status {
		Some(400) => ProviderErrorKind::InvalidGrant,
		Some(401) => ProviderErrorKind::InvalidClient,
		Some(403) => ProviderErrorKind::InsufficientScope,
		_ => ProviderErrorKind::Transient,
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn default_strategy_prefers_oauth_error_fields() {
		let ctx = ProviderErrorContext::new().with_http_status(400).with_oauth_error("invalid_client");

		assert_eq!(
			DefaultProviderStrategy.classify_token_error(&ctx),
			ProviderErrorKind::InvalidClient
		);

		let ctx = ProviderErrorContext::new().with_http_status(400).with_oauth_error("invalid_scope");

		assert_eq!(
			DefaultProviderStrategy.classify_token_error(&ctx),
			ProviderErrorKind::InsufficientScope
		);
	}

	#[test]
	fn default_strategy_treats_server_errors_as_transient() {
		let ctx = ProviderErrorContext::new().with_http_status(503).with_oauth_error("invalid_grant");

		assert_eq!(DefaultProviderStrategy.classify_token_error(&ctx), ProviderErrorKind::Transient);
		assert_eq!(
			DefaultProviderStrategy.classify_token_error(&ProviderErrorContext::network_failure()),
			ProviderErrorKind::Transient
		);
	}

	#[test]
	fn default_strategy_falls_back_to_status_and_body() {
		let ctx = ProviderErrorContext::new().with_http_status(401);

		assert_eq!(
			DefaultProviderStrategy.classify_token_error(&ctx),
			ProviderErrorKind::InvalidClient
		);

		let ctx = ProviderErrorContext::new().with_body_preview("error=insufficient_scope");

		assert_eq!(
			DefaultProviderStrategy.classify_token_error(&ctx),
			ProviderErrorKind::InsufficientScope
		);
	}

	#[test]
	fn microsoft_strategy_reads_aadsts_codes() {
		let ctx = ProviderErrorContext::new()
			.with_http_status(400)
			.with_oauth_error("invalid_request")
			.with_error_description(
				"AADSTS90002: Tenant 'nope' not found. Trace ID: 0000 Correlation ID: 1111",
			);

		assert_eq!(
			MicrosoftIdentityStrategy.classify_token_error(&ctx),
			ProviderErrorKind::InvalidClient
		);

		let ctx = ProviderErrorContext::new()
			.with_http_status(400)
			.with_oauth_error("invalid_scope")
			.with_error_description("AADSTS1002012: The provided value for scope is not valid.");

		assert_eq!(
			MicrosoftIdentityStrategy.classify_token_error(&ctx),
			ProviderErrorKind::InsufficientScope
		);
	}

	#[test]
	fn aadsts_code_extraction_stops_at_non_digits() {
		assert_eq!(aadsts_code("AADSTS7000215: Invalid client secret provided."), Some(7000215));
		assert_eq!(aadsts_code("no code here"), None);
	}

	#[test]
	fn previews_are_truncated() {
		let preview = truncate_preview("x".repeat(BODY_PREVIEW_LIMIT + 10));

		assert_eq!(preview.chars().count(), BODY_PREVIEW_LIMIT + 1);
		assert!(preview.ends_with('…'));
	}
}
