// crates.io
use tracing::{Instrument, instrument::Instrumented};
use tracing_subscriber::EnvFilter;
// self
use crate::{_prelude::*, obs::Stage};

/// A span builder used by relay stages.
#[derive(Clone, Debug)]
pub struct StageSpan {
	span: tracing::Span,
}
impl StageSpan {
	/// Creates a new span tagged with the provided stage and requested file name.
	pub fn new(stage: Stage, file_name: &str) -> Self {
		let span = tracing::info_span!("sharepoint_relay.stage", stage = stage.as_str(), file_name);

		Self { span }
	}

	/// Instruments an async block without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> Instrumented<Fut>
	where
		Fut: Future,
	{
		fut.instrument(self.span.clone())
	}
}

/// Installs the global `fmt` subscriber.
///
/// `RUST_LOG` wins over `default_directive`. Returns `false` when a subscriber was already
/// installed.
pub fn init_tracing(default_directive: &str) -> bool {
	let filter =
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

	tracing_subscriber::fmt().with_env_filter(filter).try_init().is_ok()
}

#[cfg(test)]
mod tests {
	// self
	use super::{StageSpan, init_tracing};
	use crate::obs::Stage;

	#[tokio::test]
	async fn instrument_wraps_future() {
		let span = StageSpan::new(Stage::Validate, "notes.txt");
		let value = span.instrument(async { 42 }).await;

		assert_eq!(value, 42);
	}

	#[test]
	fn second_init_reports_existing_subscriber() {
		init_tracing("info");

		assert!(!init_tracing("debug"));
	}
}
