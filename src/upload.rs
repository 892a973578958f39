use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::error::{ChatError, Result};

/// Bytes as they came from the picker. The web front end receives files
/// already base64 encoded; the terminal reads raw bytes from disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileContents {
    Raw(Vec<u8>),
    Base64(String),
    /// The picker handed us a file the browser could not read.
    Unreadable,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    pub name: String,
    pub content_type: Option<String>,
    pub contents: FileContents,
}

impl UploadedFile {
    pub fn from_bytes(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            content_type: None,
            contents: FileContents::Raw(bytes),
        }
    }

    pub fn from_base64(
        name: impl Into<String>,
        content_type: Option<String>,
        data: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            content_type,
            contents: FileContents::Base64(data.into()),
        }
    }

    pub fn unreadable(name: impl Into<String>, content_type: Option<String>) -> Self {
        Self {
            name: name.into(),
            content_type,
            contents: FileContents::Unreadable,
        }
    }

    pub async fn read(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await.map_err(|source| ChatError::ReadFile {
            path: path.display().to_string(),
            source,
        })?;
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self::from_bytes(name, bytes))
    }

    /// The supplied content type, else a guess from the file name.
    pub fn mime_type(&self) -> String {
        match &self.content_type {
            Some(content_type) if !content_type.is_empty() => content_type.clone(),
            _ => mime_guess::from_path(&self.name)
                .first_or_octet_stream()
                .essence_str()
                .to_string(),
        }
    }

    /// Encodes the file as a `data:` URL an `<img>` can show.
    pub fn to_data_url(&self) -> Result<String> {
        let payload = match &self.contents {
            FileContents::Raw(bytes) => STANDARD.encode(bytes),
            FileContents::Base64(data) => {
                STANDARD.decode(data).map_err(|source| ChatError::Decode {
                    name: self.name.clone(),
                    source,
                })?;
                data.clone()
            }
            FileContents::Unreadable => {
                return Err(ChatError::Unreadable {
                    name: self.name.clone(),
                })
            }
        };
        Ok(format!("data:{};base64,{}", self.mime_type(), payload))
    }
}
