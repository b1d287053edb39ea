//! Microsoft Graph drive access: locating a file by name and downloading its bytes.
//!
//! [`GraphClient`] is bound to one site and one drive (document library). Every call takes
//! the bearer token explicitly so the token lifecycle stays with the token provider.

pub mod model;

mod fetcher;
mod resolver;

pub use model::*;

// crates.io
use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
// self
use crate::{
	_prelude::*,
	auth::{DriveId, SiteId},
	error::{ConfigError, Endpoint, TransportError, UpstreamError},
	http,
	provider::strategy::truncate_preview,
};

/// Upper bound on listing pages followed for a single lookup.
pub const MAX_LISTING_PAGES: usize = 200;

/// Graph client scoped to a single site and drive.
#[derive(Clone, Debug)]
pub struct GraphClient {
	http: ReqwestClient,
	base_url: Url,
	site_id: SiteId,
	drive_id: DriveId,
}
impl GraphClient {
	/// Creates a client for `{base_url}/sites/{site_id}/drives/{drive_id}`.
	pub fn new(
		http: ReqwestClient,
		base_url: Url,
		site_id: SiteId,
		drive_id: DriveId,
	) -> Result<Self, ConfigError> {
		if base_url.cannot_be_a_base() {
			return Err(ConfigError::InvalidGraphBase { url: base_url.to_string() });
		}

		Ok(Self { http, base_url, site_id, drive_id })
	}

	/// Drive the client is bound to.
	pub fn drive_id(&self) -> &DriveId {
		&self.drive_id
	}

	/// Listing URL for the drive root, or for `folder` inside it.
	///
	/// `folder` is split on `/`; empty segments are ignored.
	pub fn children_url(&self, folder: Option<&str>) -> Url {
		let segments = folder.map(folder_segments).unwrap_or_default();

		self.drive_url(|path| {
			match segments.split_last() {
				Some((last, parents)) => {
					path.push("root:");
					path.extend(parents);
					path.push(&format!("{last}:"));
				},
				None => {
					path.push("root");
				},
			}
			path.push("children");
		})
	}

	/// Authenticated `/content` endpoint for `item_id`.
	pub fn content_url(&self, item_id: &str) -> Url {
		self.drive_url(|path| {
			path.extend(["items", item_id, "content"]);
		})
	}

	fn drive_url(&self, build: impl FnOnce(&mut url::PathSegmentsMut<'_>)) -> Url {
		let mut url = self.base_url.clone();

		if let Ok(mut path) = url.path_segments_mut() {
			path.pop_if_empty().extend([
				"sites",
				self.site_id.as_ref(),
				"drives",
				self.drive_id.as_ref(),
			]);
			build(&mut path);
		}

		url
	}
}

/// Splits a folder path into non-empty segments.
pub(crate) fn folder_segments(folder: &str) -> Vec<&str> {
	folder.split('/').map(str::trim).filter(|segment| !segment.is_empty()).collect()
}

/// Normalizes an optional folder: blank values mean the drive root.
pub(crate) fn normalize_folder(folder: Option<&str>) -> Option<String> {
	let segments = folder.map(folder_segments).unwrap_or_default();

	if segments.is_empty() { None } else { Some(segments.join("/")) }
}

async fn upstream_status(endpoint: Endpoint, response: Response) -> Error {
	let status = response.status();
	let retry_after = http::parse_retry_after(response.headers());
	let body = response.text().await.unwrap_or_default();
	let message = serde_json::from_str::<GraphErrorBody>(&body)
		.map(|body| body.error.to_string())
		.ok()
		.filter(|message| !message.is_empty())
		.or_else(|| (!body.trim().is_empty()).then(|| truncate_preview(body)))
		.unwrap_or_else(|| reason_phrase(status));

	UpstreamError::Status { endpoint, status: status.as_u16(), message, retry_after }.into()
}

fn reason_phrase(status: StatusCode) -> String {
	status.canonical_reason().unwrap_or("no response body").to_owned()
}

fn decode<T>(endpoint: Endpoint, body: &[u8]) -> Result<T>
where
	T: DeserializeOwned,
{
	let mut de = serde_json::Deserializer::from_slice(body);

	serde_path_to_error::deserialize(&mut de)
		.map_err(|source| UpstreamError::Parse { endpoint, source }.into())
}

fn network(endpoint: Endpoint) -> impl FnOnce(ReqwestError) -> Error {
	move |err| TransportError::network(endpoint, err).into()
}
