//! Content download for resolved files.

// crates.io
use reqwest::header::AUTHORIZATION;
// self
use crate::{
	_prelude::*,
	auth::AccessToken,
	error::Endpoint,
	graph::{self, DownloadRef, FileDescriptor, GraphClient},
};

impl GraphClient {
	/// Downloads the raw bytes of `file`.
	///
	/// Direct download URLs are pre-authenticated and are fetched without the bearer token.
	pub async fn fetch(&self, token: &AccessToken, file: &FileDescriptor) -> Result<Vec<u8>> {
		let request = match &file.download {
			DownloadRef::Direct(url) => self.http.get(url.clone()),
			DownloadRef::Content(url) =>
				self.http.get(url.clone()).header(AUTHORIZATION, token.bearer()),
		};
		let response = request.send().await.map_err(graph::network(Endpoint::Download))?;

		if !response.status().is_success() {
			return Err(graph::upstream_status(Endpoint::Download, response).await);
		}

		let bytes = response.bytes().await.map_err(graph::network(Endpoint::Download))?;

		tracing::debug!(item = %file.id, bytes = bytes.len(), "Downloaded file content.");

		Ok(bytes.to_vec())
	}
}
