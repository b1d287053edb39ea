//! Access token model, lifecycle helpers, and builder.

// self
use crate::{_prelude::*, auth::Secret};

/// Errors produced by [`AccessTokenBuilder`].
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum AccessTokenBuilderError {
	/// Issued when no access token value was provided.
	#[error("Access token is required.")]
	MissingAccessToken,
	/// Issued when no expiry (absolute or relative) was configured.
	#[error("Expiry must be supplied via expires_at or expires_in.")]
	MissingExpiry,
}

/// Bearer token issued by the identity provider.
#[derive(Clone)]
pub struct AccessToken {
	/// Bearer secret; callers must avoid logging it.
	pub secret: Secret,
	/// Issued-at instant recorded when the response arrived.
	pub issued_at: OffsetDateTime,
	/// Expiry instant derived from issued_at plus expires_in.
	pub expires_at: OffsetDateTime,
}
impl AccessToken {
	/// Returns a builder for assembling tokens from endpoint responses.
	pub fn builder() -> AccessTokenBuilder {
		AccessTokenBuilder::default()
	}

	/// Returns `true` once `instant` reached the expiry instant.
	pub fn is_expired_at(&self, instant: OffsetDateTime) -> bool {
		instant >= self.expires_at
	}

	/// Remaining lifetime at `instant`; negative once expired.
	pub fn remaining_at(&self, instant: OffsetDateTime) -> Duration {
		self.expires_at - instant
	}

	/// Full lifetime granted by the identity provider.
	pub fn lifetime(&self) -> Duration {
		self.expires_at - self.issued_at
	}

	/// Formats the `Authorization` header value.
	pub fn bearer(&self) -> String {
		format!("Bearer {}", self.secret.expose())
	}
}
impl Debug for AccessToken {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("AccessToken")
			.field("secret", &"<redacted>")
			.field("issued_at", &self.issued_at)
			.field("expires_at", &self.expires_at)
			.finish()
	}
}

/// Builder for [`AccessToken`].
#[derive(Clone, Debug, Default)]
pub struct AccessTokenBuilder {
	secret: Option<Secret>,
	issued_at: Option<OffsetDateTime>,
	expires_at: Option<OffsetDateTime>,
	expires_in: Option<Duration>,
}
impl AccessTokenBuilder {
	/// Sets the issued-at instant.
	pub fn issued_at(mut self, instant: OffsetDateTime) -> Self {
		self.issued_at = Some(instant);

		self
	}

	/// Sets an absolute expiry instant.
	pub fn expires_at(mut self, instant: OffsetDateTime) -> Self {
		self.expires_at = Some(instant);

		self
	}

	/// Sets a relative expiry duration from the issued instant.
	pub fn expires_in(mut self, duration: Duration) -> Self {
		self.expires_in = Some(duration);

		self
	}

	/// Provides the access token value.
	pub fn access_token(mut self, token: impl Into<String>) -> Self {
		self.secret = Some(Secret::new(token));

		self
	}

	/// Consumes the builder and produces an [`AccessToken`].
	pub fn build(self) -> Result<AccessToken, AccessTokenBuilderError> {
		let secret = self.secret.ok_or(AccessTokenBuilderError::MissingAccessToken)?;

		if secret.expose().is_empty() {
			return Err(AccessTokenBuilderError::MissingAccessToken);
		}

		let issued_at = self.issued_at.unwrap_or_else(OffsetDateTime::now_utc);
		let expires_at = match (self.expires_at, self.expires_in) {
			(Some(instant), _) => instant,
			(None, Some(delta)) => issued_at + delta,
			(None, None) => return Err(AccessTokenBuilderError::MissingExpiry),
		};

		Ok(AccessToken { secret, issued_at, expires_at })
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use time::macros;
	// self
	use super::*;

	#[test]
	fn expiry_and_lifetime_follow_the_instants() {
		let token = AccessToken::builder()
			.access_token("access")
			.issued_at(macros::datetime!(2025-01-01 00:00 UTC))
			.expires_at(macros::datetime!(2025-01-01 01:00 UTC))
			.build()
			.expect("Access token builder should succeed for expiry checks.");

		assert!(!token.is_expired_at(macros::datetime!(2025-01-01 00:30 UTC)));
		assert!(token.is_expired_at(macros::datetime!(2025-01-01 01:00 UTC)));
		assert_eq!(token.lifetime(), Duration::hours(1));
		assert_eq!(
			token.remaining_at(macros::datetime!(2025-01-01 00:45 UTC)),
			Duration::minutes(15)
		);
	}

	#[test]
	fn builder_handles_relative_expiry() {
		let token = AccessToken::builder()
			.access_token("secret")
			.issued_at(macros::datetime!(2025-01-01 00:00 UTC))
			.expires_in(Duration::seconds(3599))
			.build()
			.expect("Access token builder should support relative expiry calculations.");

		assert_eq!(token.expires_at, macros::datetime!(2025-01-01 00:59:59 UTC));
		assert_eq!(token.bearer(), "Bearer secret");
	}

	#[test]
	fn builder_rejects_missing_fields() {
		assert_eq!(
			AccessToken::builder().expires_in(Duration::minutes(1)).build().unwrap_err(),
			AccessTokenBuilderError::MissingAccessToken
		);
		assert_eq!(
			AccessToken::builder().access_token("").expires_in(Duration::minutes(1)).build().unwrap_err(),
			AccessTokenBuilderError::MissingAccessToken
		);
		assert_eq!(
			AccessToken::builder().access_token("x").build().unwrap_err(),
			AccessTokenBuilderError::MissingExpiry
		);
	}

	#[test]
	fn debug_output_redacts_the_bearer() {
		let token = AccessToken::builder()
			.access_token("eyJ0eXAiOiJKV1Qi")
			.expires_in(Duration::hours(1))
			.build()
			.expect("Token fixture should build.");
		let rendered = format!("{token:?}");

		assert!(!rendered.contains("eyJ0eXAiOiJKV1Qi"));
		assert!(rendered.contains("<redacted>"));
	}
}
