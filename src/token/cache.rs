//! Process-wide holder for the current access token.

// self
use crate::{_prelude::*, auth::AccessToken};

/// Thread-safe slot holding at most one [`AccessToken`].
///
/// Readers never block each other; a store replaces the previous token outright so the
/// last completed refresh wins.
#[derive(Debug, Default)]
pub struct TokenCache(RwLock<Option<AccessToken>>);
impl TokenCache {
	/// Creates an empty cache.
	pub fn new() -> Self {
		Self::default()
	}

	/// Returns a copy of the cached token, if any.
	pub fn current(&self) -> Option<AccessToken> {
		self.0.read().clone()
	}

	/// Replaces the cached token.
	pub fn store(&self, token: AccessToken) {
		*self.0.write() = Some(token);
	}
}
