//! Relay-level error types shared across the token, graph, and server layers.

// self
use crate::_prelude::*;

/// Relay-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical relay error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Identity provider refused or failed to issue a token.
	#[error(transparent)]
	Auth(#[from] AuthError),
	/// Storage provider failure distinct from "not found".
	#[error(transparent)]
	Upstream(#[from] UpstreamError),
	/// Transport failure (DNS, TCP, TLS).
	#[error(transparent)]
	Transport(#[from] TransportError),

	/// Client input could not be accepted.
	#[error("{reason}")]
	BadRequest {
		/// Human-readable explanation returned to the caller.
		reason: String,
	},
	/// No file with the requested name exists in the library (or folder).
	#[error("{}", not_found_message(file_name, folder.as_deref()))]
	FileNotFound {
		/// Requested file name.
		file_name: String,
		/// Folder the lookup was scoped to, if any.
		folder: Option<String>,
	},
	/// File exists but its bytes are not valid text.
	#[error("El archivo no contiene datos de texto legibles.")]
	NotText {
		/// Requested file name.
		file_name: String,
		/// Underlying decoding failure.
		#[source]
		source: std::str::Utf8Error,
	},
}
impl Error {
	/// Builds a [`Error::BadRequest`] from any message.
	pub fn bad_request(reason: impl Into<String>) -> Self {
		Self::BadRequest { reason: reason.into() }
	}

	/// Upstream `Retry-After` hint carried by the error, if any.
	pub fn retry_after(&self) -> Option<Duration> {
		match self {
			Self::Auth(AuthError::TokenEndpoint { retry_after, .. }) => *retry_after,
			Self::Upstream(UpstreamError::Status { retry_after, .. }) => *retry_after,
			_ => None,
		}
	}
}

fn not_found_message(file_name: &str, folder: Option<&str>) -> String {
	match folder {
		Some(folder) => format!("Archivo '{file_name}' no encontrado en '{folder}'"),
		None => format!("Archivo '{file_name}' no encontrado en el sitio de SharePoint"),
	}
}

/// Configuration and validation failures raised locally.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// HTTP request construction failed.
	#[error(transparent)]
	HttpRequest(#[from] oauth2::http::Error),
	/// Provider descriptor contains an invalid URL.
	#[error("Descriptor contains an invalid URL.")]
	InvalidDescriptor {
		/// Underlying parsing failure.
		#[source]
		source: oauth2::url::ParseError,
	},
	/// Identity provider descriptor failed validation.
	#[error(transparent)]
	Descriptor(#[from] crate::provider::ProviderDescriptorError),
	/// A configured identifier is malformed.
	#[error(transparent)]
	Identifier(#[from] crate::auth::IdentifierError),
	/// Graph base URL cannot address drive resources.
	#[error("Graph base URL `{url}` cannot be used as a base.")]
	InvalidGraphBase {
		/// Offending URL.
		url: String,
	},
	/// Listener could not be bound.
	#[error("Failed to bind the HTTP listener on {addr}.")]
	Bind {
		/// Address that was requested.
		addr: std::net::SocketAddr,
		/// Underlying IO failure.
		#[source]
		source: std::io::Error,
	},
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Failures raised while obtaining an access token from the identity provider.
#[derive(Debug, ThisError)]
pub enum AuthError {
	/// Client authentication failed or credentials are malformed.
	#[error("Client authentication failed: {reason}.")]
	InvalidClient {
		/// Provider- or relay-supplied reason string.
		reason: String,
	},
	/// Provider rejected the grant.
	#[error("Provider rejected the grant: {reason}.")]
	InvalidGrant {
		/// Provider- or relay-supplied reason string.
		reason: String,
	},
	/// Requested scope is not granted to the application.
	#[error("Application lacks the requested scope: {reason}.")]
	InsufficientScope {
		/// Provider- or relay-supplied reason string.
		reason: String,
	},
	/// Provider returned an unexpected or temporary failure.
	#[error("Token endpoint returned an unexpected response: {message}.")]
	TokenEndpoint {
		/// Provider- or relay-supplied message summarizing the failure.
		message: String,
		/// HTTP status code, when available.
		status: Option<u16>,
		/// Retry-After hint from upstream, if supplied.
		retry_after: Option<Duration>,
	},
	/// Token endpoint responded with malformed JSON that could not be parsed.
	#[error("Token endpoint returned malformed JSON.")]
	TokenResponseParse {
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::error::Error>,
		/// HTTP status code, when available.
		status: Option<u16>,
	},
	/// Token endpoint response omitted `expires_in`.
	#[error("Token endpoint response is missing expires_in.")]
	MissingExpiresIn,
	/// Token endpoint returned an excessively large `expires_in`.
	#[error("The expires_in value exceeds the supported range.")]
	ExpiresInOutOfRange,
	/// Token endpoint returned a non-positive duration.
	#[error("The expires_in value must be positive.")]
	NonPositiveExpiresIn,
	/// Token could not be assembled from the endpoint response.
	#[error("Unable to build access token.")]
	TokenBuild(#[from] crate::auth::AccessTokenBuilderError),
}

/// Storage provider failures distinct from "file not found".
#[derive(Debug, ThisError)]
pub enum UpstreamError {
	/// Endpoint answered with a non-success status.
	#[error("The {endpoint} returned HTTP {status}: {message}.")]
	Status {
		/// Endpoint that failed.
		endpoint: Endpoint,
		/// HTTP status code.
		status: u16,
		/// Graph error message or a truncated body preview.
		message: String,
		/// Retry-After hint from upstream, if supplied.
		retry_after: Option<Duration>,
	},
	/// Endpoint answered with JSON that does not match the expected shape.
	#[error("The {endpoint} returned malformed JSON.")]
	Parse {
		/// Endpoint that failed.
		endpoint: Endpoint,
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::error::Error>,
	},
	/// Listing kept paginating past the supported number of pages.
	#[error("The listing endpoint returned more than {max} pages.")]
	PageLimit {
		/// Maximum number of pages followed.
		max: usize,
	},
	/// Listing pointed its next page at a different origin than the Graph base URL.
	#[error("The listing endpoint returned a next page on a foreign origin: {url}.")]
	ForeignNextLink {
		/// Rejected next-page URL.
		url: String,
	},
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the {endpoint}.")]
	Network {
		/// Endpoint that was being called.
		endpoint: Endpoint,
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred during transport.")]
	Io(#[from] std::io::Error),
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(endpoint: Endpoint, src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { endpoint, source: Box::new(src) }
	}
}

/// Remote endpoints the relay talks to, used to label failures.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Endpoint {
	/// Identity provider token endpoint.
	Token,
	/// Graph drive listing endpoint.
	Listing,
	/// Graph (or pre-authenticated) download endpoint.
	Download,
}
impl Endpoint {
	/// Returns a stable label suitable for messages and metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			Endpoint::Token => "token endpoint",
			Endpoint::Listing => "listing endpoint",
			Endpoint::Download => "download endpoint",
		}
	}
}
impl Display for Endpoint {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn not_found_message_names_the_file() {
		let err = Error::FileNotFound { file_name: "ventas.csv".into(), folder: None };

		assert_eq!(err.to_string(), "Archivo 'ventas.csv' no encontrado en el sitio de SharePoint");

		let err = Error::FileNotFound {
			file_name: "ventas.csv".into(),
			folder: Some("Reportes/2024".into()),
		};

		assert_eq!(err.to_string(), "Archivo 'ventas.csv' no encontrado en 'Reportes/2024'");
	}

	#[test]
	fn retry_after_is_exposed_for_upstream_statuses() {
		let err: Error = UpstreamError::Status {
			endpoint: Endpoint::Listing,
			status: 429,
			message: "throttled".into(),
			retry_after: Some(Duration::seconds(7)),
		}
		.into();

		assert_eq!(err.retry_after(), Some(Duration::seconds(7)));
		assert!(err.to_string().contains("listing endpoint returned HTTP 429"));
		assert_eq!(Error::bad_request("nope").retry_after(), None);
	}

	#[test]
	fn transport_errors_name_the_endpoint() {
		let io = std::io::Error::other("connection reset");
		let err = TransportError::network(Endpoint::Download, io);

		assert_eq!(err.to_string(), "Network error occurred while calling the download endpoint.");
		assert!(StdError::source(&err).is_some());
	}
}
