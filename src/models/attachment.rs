//! File attachments carried inline in chat frames as data URLs.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};

const BASE64_MARKER: &str = ";base64,";

/// A fully read local file: `(data URL, file name)`, a two-element array on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "(String, String)", into = "(String, String)")]
pub struct Attachment {
    pub data_url: String,
    pub name: String,
}

impl Attachment {
    /// Encode raw bytes, guessing the MIME type from the file name.
    pub fn from_bytes(name: impl Into<String>, bytes: &[u8]) -> Self {
        let name = name.into();
        let mime = mime_guess::from_path(&name).first_or_octet_stream();
        Self {
            data_url: format!("data:{}{}{}", mime.essence_str(), BASE64_MARKER, STANDARD.encode(bytes)),
            name,
        }
    }

    /// MIME type declared in the data URL, if well-formed.
    pub fn mime_type(&self) -> Option<&str> {
        let rest = self.data_url.strip_prefix("data:")?;
        rest.split_once(BASE64_MARKER).map(|(mime, _)| mime)
    }

    /// Decode the payload the way the server stores it: everything after `;base64,`.
    pub fn decode(&self) -> Option<Vec<u8>> {
        let (_, payload) = self.data_url.split_once(BASE64_MARKER)?;
        STANDARD.decode(payload).ok()
    }
}

impl From<(String, String)> for Attachment {
    fn from((data_url, name): (String, String)) -> Self {
        Self { data_url, name }
    }
}

impl From<Attachment> for (String, String) {
    fn from(a: Attachment) -> Self {
        (a.data_url, a.name)
    }
}

/// A file reference on an inbound message: `(payload or stored path, display name)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "(String, String)", into = "(String, String)")]
pub struct FileRef {
    pub payload: String,
    pub name: String,
}

impl FileRef {
    /// Where the server serves the stored file.
    pub fn href(&self, media_url: &str) -> String {
        format!("{}{}", media_url, self.name)
    }
}

impl From<(String, String)> for FileRef {
    fn from((payload, name): (String, String)) -> Self {
        Self { payload, name }
    }
}

impl From<FileRef> for (String, String) {
    fn from(f: FileRef) -> Self {
        (f.payload, f.name)
    }
}
