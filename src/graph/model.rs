//! Typed Microsoft Graph payloads used by the resolver and fetcher.

// self
use crate::_prelude::*;

/// One page of `GET .../children`.
#[derive(Debug, Deserialize)]
pub struct DriveItemPage {
	/// Items on this page.
	#[serde(default)]
	pub value: Vec<DriveItem>,
	/// Absolute URL of the next page, if any.
	#[serde(rename = "@odata.nextLink")]
	pub next_link: Option<Url>,
}

/// A file or folder inside a drive.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriveItem {
	/// Drive-scoped item identifier.
	pub id: String,
	/// Display name including extension.
	pub name: String,
	/// Size in bytes.
	pub size: Option<u64>,
	/// Present only on files.
	pub file: Option<FileFacet>,
	/// Present only on folders.
	pub folder: Option<FolderFacet>,
	/// Short-lived pre-authenticated download URL.
	#[serde(rename = "@microsoft.graph.downloadUrl")]
	pub download_url: Option<Url>,
}
impl DriveItem {
	/// Returns `true` for files whose name equals `name` exactly.
	pub fn is_file_named(&self, name: &str) -> bool {
		self.file.is_some() && self.name == name
	}
}

/// File facet of a [`DriveItem`].
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileFacet {
	/// MIME type reported by SharePoint.
	pub mime_type: Option<String>,
}

/// Folder facet of a [`DriveItem`].
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FolderFacet {
	/// Number of direct children.
	pub child_count: Option<u64>,
}

/// Graph error envelope: `{"error": {"code": .., "message": ..}}`.
#[derive(Debug, Deserialize)]
pub struct GraphErrorBody {
	/// Error details.
	pub error: GraphErrorDetail,
}

/// Inner Graph error object.
#[derive(Debug, Default, Deserialize)]
pub struct GraphErrorDetail {
	/// Machine-readable code such as `itemNotFound`.
	#[serde(default)]
	pub code: String,
	/// Human-readable message.
	#[serde(default)]
	pub message: String,
}
impl Display for GraphErrorDetail {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		match (self.code.is_empty(), self.message.is_empty()) {
			(false, false) => write!(f, "{}: {}", self.code, self.message),
			(false, true) => f.write_str(&self.code),
			_ => f.write_str(&self.message),
		}
	}
}

/// Where a resolved file's bytes can be downloaded from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DownloadRef {
	/// Pre-authenticated URL; must be fetched without credentials.
	Direct(Url),
	/// Item `/content` endpoint; requires the bearer token.
	Content(Url),
}

/// A file located in the drive.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileDescriptor {
	/// Drive-scoped item identifier.
	pub id: String,
	/// File name as listed.
	pub name: String,
	/// Size in bytes, when reported.
	pub size: Option<u64>,
	/// Download reference.
	pub download: DownloadRef,
}
