//! Request orchestration: authenticate, resolve, fetch, validate.

// self
use crate::{
	_prelude::*,
	config::RelayConfig,
	graph::GraphClient,
	http::{ReqwestHttpClient, TokenHttpClient},
	oauth::{ReqwestTransportErrorMapper, TransportErrorMapper},
	obs::{self, Stage},
	text::{self, FileContent},
	token::TokenProvider,
};

/// Relay specialized for the crate's reqwest transport stack.
pub type ReqwestRelay = FileRelay<ReqwestHttpClient, ReqwestTransportErrorMapper>;

/// Body of `POST /get_file`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRequest {
	/// Exact (case-sensitive) file name to look up.
	#[serde(rename = "fileName", default)]
	pub file_name: Option<String>,
	/// Optional folder path inside the drive; blank means the drive root.
	#[serde(default)]
	pub folder: Option<String>,
}
impl FileRequest {
	/// Creates a request for `file_name` in the drive root.
	pub fn new(file_name: impl Into<String>) -> Self {
		Self { file_name: Some(file_name.into()), folder: None }
	}

	/// Returns the file name as sent, rejecting missing or whitespace-only values.
	pub fn validated_file_name(&self) -> Result<&str> {
		match self.file_name.as_deref() {
			Some(name) if !name.trim().is_empty() => Ok(name),
			_ => Err(Error::bad_request("El campo 'fileName' es obligatorio.")),
		}
	}
}

/// Linear pipeline that turns a [`FileRequest`] into the file's text.
pub struct FileRelay<C, M>
where
	C: ?Sized + TokenHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Token source shared by every request.
	pub tokens: Arc<TokenProvider<C, M>>,
	/// Graph client bound to the configured drive.
	pub graph: GraphClient,
}
impl<C, M> FileRelay<C, M>
where
	C: ?Sized + TokenHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Assembles a relay from its parts.
	pub fn new(tokens: impl Into<Arc<TokenProvider<C, M>>>, graph: GraphClient) -> Self {
		Self { tokens: tokens.into(), graph }
	}

	/// Runs one request through every stage. Nothing is retried.
	pub async fn get_file(&self, request: &FileRequest) -> Result<FileContent> {
		let file_name = request.validated_file_name()?;
		let folder = request.folder.as_deref();
		let token =
			obs::observe_stage(Stage::Authenticate, file_name, self.tokens.access_token()).await?;
		let file = obs::observe_stage(
			Stage::Resolve,
			file_name,
			self.graph.resolve(&token, file_name, folder),
		)
		.await?;
		let bytes =
			obs::observe_stage(Stage::Fetch, file_name, self.graph.fetch(&token, &file)).await?;
		let content = obs::observe_stage(Stage::Validate, file_name, async {
			text::as_text(file_name, bytes)
		})
		.await?;

		tracing::info!(file_name, item = %file.id, bytes = content.bytes().len(), "Served file.");

		Ok(content)
	}
}
impl ReqwestRelay {
	/// Builds the production relay from configuration.
	pub fn from_config(config: &RelayConfig) -> Result<Self> {
		Ok(Self::new(config.token_provider()?, config.graph_client()?))
	}
}
impl<C, M> Debug for FileRelay<C, M>
where
	C: ?Sized + TokenHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("FileRelay").field("tokens", &self.tokens).field("graph", &self.graph).finish()
	}
}
