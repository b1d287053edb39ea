//! File lookup over paginated drive listings.

// crates.io
use reqwest::{
	StatusCode,
	header::{ACCEPT, AUTHORIZATION},
};
// self
use crate::{
	_prelude::*,
	auth::AccessToken,
	error::{Endpoint, UpstreamError},
	graph::{
		self, DownloadRef, DriveItem, DriveItemPage, FileDescriptor, GraphClient,
		MAX_LISTING_PAGES,
	},
};

impl GraphClient {
	/// Finds the first file named exactly `file_name` in the drive root or in `folder`.
	///
	/// Folders never match. Listings are followed through `@odata.nextLink` until a match
	/// shows up or the pages run out; a next page outside the Graph base origin is refused
	/// before the token is sent. A 404 on a folder listing means the folder is missing
	/// and is reported as [`Error::FileNotFound`].
	pub async fn resolve(
		&self,
		token: &AccessToken,
		file_name: &str,
		folder: Option<&str>,
	) -> Result<FileDescriptor> {
		let folder = graph::normalize_folder(folder);
		let not_found =
			|| Error::FileNotFound { file_name: file_name.to_owned(), folder: folder.clone() };
		let mut next = Some(self.children_url(folder.as_deref()));
		let mut pages = 0;

		while let Some(url) = next.take() {
			if pages == MAX_LISTING_PAGES {
				return Err(UpstreamError::PageLimit { max: MAX_LISTING_PAGES }.into());
			}

			if url.origin() != self.base_url.origin() {
				return Err(UpstreamError::ForeignNextLink { url: url.to_string() }.into());
			}

			pages += 1;

			let response = self
				.http
				.get(url)
				.header(AUTHORIZATION, token.bearer())
				.header(ACCEPT, "application/json")
				.send()
				.await
				.map_err(graph::network(Endpoint::Listing))?;
			let status = response.status();

			if status == StatusCode::NOT_FOUND && folder.is_some() {
				return Err(not_found());
			}
			if !status.is_success() {
				return Err(graph::upstream_status(Endpoint::Listing, response).await);
			}

			let body = response.bytes().await.map_err(graph::network(Endpoint::Listing))?;
			let DriveItemPage { value, next_link } = graph::decode(Endpoint::Listing, &body)?;

			tracing::debug!(page = pages, items = value.len(), "Scanned listing page.");

			if let Some(item) = value.into_iter().find(|item| item.is_file_named(file_name)) {
				return Ok(self.descriptor_for(item));
			}

			next = next_link;
		}

		Err(not_found())
	}

	fn descriptor_for(&self, item: DriveItem) -> FileDescriptor {
		let download = match item.download_url {
			Some(url) => DownloadRef::Direct(url),
			None => DownloadRef::Content(self.content_url(&item.id)),
		};

		FileDescriptor { id: item.id, name: item.name, size: item.size, download }
	}
}
