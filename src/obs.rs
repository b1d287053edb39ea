//! Observability helpers for relay stages.
//!
//! # Feature Flags
//!
//! - Spans named `sharepoint_relay.stage` carry the `stage` and `file_name` fields for every
//!   step of a request.
//! - Enable `metrics` to increment `sharepoint_relay_stage_total` (labeled by `stage` +
//!   `outcome`) and `sharepoint_relay_token_cache_total` (labeled by `result`).

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Steps a file request goes through.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Stage {
	/// Obtaining a bearer token.
	Authenticate,
	/// Locating the file in the drive listing.
	Resolve,
	/// Downloading the file bytes.
	Fetch,
	/// Checking that the bytes are text.
	Validate,
}
impl Stage {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			Stage::Authenticate => "authenticate",
			Stage::Resolve => "resolve",
			Stage::Fetch => "fetch",
			Stage::Validate => "validate",
		}
	}
}
impl Display for Stage {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each stage.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StageOutcome {
	/// Stage entered.
	Attempt,
	/// Stage completed.
	Success,
	/// Stage failed and the request was aborted.
	Failure,
}
impl StageOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			StageOutcome::Attempt => "attempt",
			StageOutcome::Success => "success",
			StageOutcome::Failure => "failure",
		}
	}
}
impl Display for StageOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// How a token request was satisfied.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TokenCacheResult {
	/// Cached token was still outside its refresh window.
	Hit,
	/// Another caller refreshed while this one waited on the guard.
	Coalesced,
	/// Token endpoint was called.
	Refresh,
}
impl TokenCacheResult {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			TokenCacheResult::Hit => "hit",
			TokenCacheResult::Coalesced => "coalesced",
			TokenCacheResult::Refresh => "refresh",
		}
	}
}

/// Runs `fut` inside a [`StageSpan`] and records attempt plus success or failure.
pub async fn observe_stage<T, Fut>(stage: Stage, file_name: &str, fut: Fut) -> Result<T>
where
	Fut: Future<Output = Result<T>>,
{
	let span = StageSpan::new(stage, file_name);

	record_stage_outcome(stage, StageOutcome::Attempt);

	let result = span.instrument(fut).await;

	match &result {
		Ok(_) => record_stage_outcome(stage, StageOutcome::Success),
		Err(err) => {
			record_stage_outcome(stage, StageOutcome::Failure);
			::tracing::debug!(stage = stage.as_str(), file_name, error = %err, "Stage failed.");
		},
	}

	result
}
