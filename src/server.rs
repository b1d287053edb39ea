//! HTTP surface: `POST /get_file` plus the error-to-response mapping.

// std
use std::net::SocketAddr;
// crates.io
use axum::{
	Json, Router,
	extract::{State, rejection::JsonRejection},
	http::{
		HeaderValue, StatusCode,
		header::{CONTENT_TYPE, RETRY_AFTER},
	},
	response::{IntoResponse, Response},
	routing::post,
};
use tokio::net::TcpListener;
// self
use crate::{
	_prelude::*,
	config::RelayConfig,
	error::{ConfigError, TransportError},
	relay::{FileRequest, ReqwestRelay},
};

/// Shared handler state.
pub type AppState = Arc<ReqwestRelay>;

/// JSON error body: `{"detail": "..."}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
	/// Human-readable reason.
	pub detail: String,
}

/// Builds the router with the single `POST /get_file` route.
pub fn router(state: AppState) -> Router {
	Router::new().route("/get_file", post(get_file)).with_state(state)
}

/// Builds the relay from `config`, binds the listener and serves until Ctrl-C.
pub async fn serve(config: &RelayConfig) -> Result<()> {
	let relay = ReqwestRelay::from_config(config)?;
	let listener = bind(config.listen).await?;

	run(listener, Arc::new(relay), shutdown_signal()).await
}

/// Serves `state` on an already bound listener until `shutdown` resolves.
pub async fn run<F>(listener: TcpListener, state: AppState, shutdown: F) -> Result<()>
where
	F: 'static + Send + Future<Output = ()>,
{
	if let Ok(addr) = listener.local_addr() {
		tracing::info!(%addr, "Relay listening.");
	}

	axum::serve(listener, router(state))
		.with_graceful_shutdown(shutdown)
		.await
		.map_err(TransportError::Io)?;

	tracing::info!("Relay stopped.");

	Ok(())
}

async fn bind(addr: SocketAddr) -> Result<TcpListener> {
	TcpListener::bind(addr).await.map_err(|source| ConfigError::Bind { addr, source }.into())
}

async fn shutdown_signal() {
	if let Err(err) = tokio::signal::ctrl_c().await {
		tracing::warn!(error = %err, "Failed to listen for Ctrl-C; shutting down.");
	}
}

async fn get_file(
	State(relay): State<AppState>,
	payload: Result<Json<FileRequest>, JsonRejection>,
) -> Response {
	let request = match payload {
		Ok(Json(request)) => request,
		Err(rejection) => return Error::bad_request(rejection.body_text()).into_response(),
	};

	match relay.get_file(&request).await {
		Ok(content) =>
			([(CONTENT_TYPE, "text/plain; charset=utf-8")], content.into_text()).into_response(),
		Err(err) => err.into_response(),
	}
}

/// Detail returned to the caller.
///
/// Client-facing errors carry their own message. Upstream and local faults get a fixed text;
/// the full error only goes to the log.
pub fn detail_for(err: &Error) -> String {
	match err {
		Error::BadRequest { .. } | Error::NotText { .. } | Error::FileNotFound { .. } =>
			err.to_string(),
		Error::Auth(_) => "No se pudo obtener un token de acceso para Microsoft Graph.".into(),
		Error::Upstream(_) | Error::Transport(_) => "Error al acceder a SharePoint.".into(),
		Error::Config(_) => "Error interno del servicio.".into(),
	}
}

/// HTTP status for a relay error.
pub fn status_for(err: &Error) -> StatusCode {
	match err {
		Error::BadRequest { .. } | Error::NotText { .. } => StatusCode::BAD_REQUEST,
		Error::FileNotFound { .. } => StatusCode::NOT_FOUND,
		Error::Auth(_) | Error::Upstream(_) | Error::Transport(_) => StatusCode::BAD_GATEWAY,
		Error::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
	}
}

impl IntoResponse for Error {
	fn into_response(self) -> Response {
		let status = status_for(&self);

		if status.is_server_error() {
			tracing::warn!(status = status.as_u16(), error = ?self, "Request failed.");
		} else {
			tracing::debug!(status = status.as_u16(), error = %self, "Request rejected.");
		}

		let retry_after = self
			.retry_after()
			.filter(|_| status == StatusCode::BAD_GATEWAY)
			.map(|delay| HeaderValue::from(delay.whole_seconds().max(0)));
		let mut response = (status, Json(ErrorBody { detail: detail_for(&self) })).into_response();

		if let Some(value) = retry_after {
			response.headers_mut().insert(RETRY_AFTER, value);
		}

		response
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::error::{AuthError, Endpoint, UpstreamError};

	#[test]
	fn statuses_follow_the_error_taxonomy() {
		let cases: [(Error, StatusCode); 6] = [
			(Error::bad_request("x"), StatusCode::BAD_REQUEST),
			(
				Error::FileNotFound { file_name: "a.txt".into(), folder: None },
				StatusCode::NOT_FOUND,
			),
			(AuthError::InvalidClient { reason: "bad".into() }.into(), StatusCode::BAD_GATEWAY),
			(UpstreamError::PageLimit { max: 1 }.into(), StatusCode::BAD_GATEWAY),
			(
				TransportError::network(Endpoint::Listing, std::io::Error::other("reset")).into(),
				StatusCode::BAD_GATEWAY,
			),
			(
				ConfigError::InvalidGraphBase { url: "mailto:x".into() }.into(),
				StatusCode::INTERNAL_SERVER_ERROR,
			),
		];

		for (err, status) in cases {
			assert_eq!(status_for(&err), status, "{err:?}");
		}
	}

	#[test]
	fn bad_gateway_responses_forward_retry_after() {
		let err: Error = UpstreamError::Status {
			endpoint: Endpoint::Listing,
			status: 429,
			message: "activityLimitReached".into(),
			retry_after: Some(Duration::seconds(12)),
		}
		.into();
		let response = err.into_response();

		assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
		assert_eq!(
			response.headers().get(RETRY_AFTER).and_then(|value| value.to_str().ok()),
			Some("12")
		);
		assert_eq!(
			response.headers().get(CONTENT_TYPE).and_then(|value| value.to_str().ok()),
			Some("application/json")
		);
	}

	#[test]
	fn upstream_details_stay_generic() {
		let auth: Error = AuthError::InvalidClient {
			reason: "AADSTS7000215: Invalid client secret for tenant contoso. Trace ID: 42".into(),
		}
		.into();
		let upstream: Error = UpstreamError::Status {
			endpoint: Endpoint::Listing,
			status: 500,
			message: "generalException: internal detail".into(),
			retry_after: None,
		}
		.into();

		for err in [auth, upstream] {
			let detail = detail_for(&err);

			assert!(!detail.contains("AADSTS"), "{detail}");
			assert!(!detail.contains("generalException"), "{detail}");
		}
		assert_eq!(
			detail_for(&Error::bad_request("El campo 'fileName' es obligatorio.")),
			"El campo 'fileName' es obligatorio."
		);
	}

	#[test]
	fn not_found_responses_have_no_retry_after() {
		let response =
			Error::FileNotFound { file_name: "a.txt".into(), folder: None }.into_response();

		assert_eq!(response.status(), StatusCode::NOT_FOUND);
		assert!(response.headers().get(RETRY_AFTER).is_none());
	}
}
