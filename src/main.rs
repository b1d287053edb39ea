//! `sharepoint-relay` binary: load configuration, install logging, serve.

// std
use std::process::ExitCode;
// self
use sharepoint_relay::{config::RelayConfig, obs, server};

#[tokio::main]
async fn main() -> ExitCode {
	let config = RelayConfig::load();

	obs::init_tracing(&config.log_level);

	match server::serve(&config).await {
		Ok(()) => ExitCode::SUCCESS,
		Err(err) => {
			tracing::error!(error = %err, "Relay failed.");

			ExitCode::FAILURE
		},
	}
}
