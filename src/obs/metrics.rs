// self
use crate::obs::{Stage, StageOutcome, TokenCacheResult};

/// Records a stage outcome via the global metrics recorder (when enabled).
pub fn record_stage_outcome(stage: Stage, outcome: StageOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"sharepoint_relay_stage_total",
			"stage" => stage.as_str(),
			"outcome" => outcome.as_str()
		)
		.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (stage, outcome);
	}
}

/// Records how a token request was satisfied (when metrics are enabled).
pub fn record_token_cache(result: TokenCacheResult) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!("sharepoint_relay_token_cache_total", "result" => result.as_str())
			.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = result;
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn recorders_noop_without_installed_recorder() {
		record_stage_outcome(Stage::Fetch, StageOutcome::Failure);
		record_token_cache(TokenCacheResult::Hit);
	}
}
