//! Text validation for downloaded files.

// self
use crate::_prelude::*;

/// Downloaded bytes that decoded as UTF-8.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileContent {
	text: String,
}
impl FileContent {
	/// Decoded text; byte-identical to the download.
	pub fn text(&self) -> &str {
		&self.text
	}

	/// Raw bytes as downloaded.
	pub fn bytes(&self) -> &[u8] {
		self.text.as_bytes()
	}

	/// Consumes the content and returns the text.
	pub fn into_text(self) -> String {
		self.text
	}
}

/// Decodes `bytes` as strict UTF-8.
///
/// Invalid sequences yield [`Error::NotText`]; nothing is replaced or trimmed. A leading
/// byte-order mark is kept as part of the text.
pub fn as_text(file_name: &str, bytes: Vec<u8>) -> Result<FileContent> {
	String::from_utf8(bytes).map(|text| FileContent { text }).map_err(|err| Error::NotText {
		file_name: file_name.to_owned(),
		source: err.utf8_error(),
	})
}
