// Messages exchanged with the browser over the WebSocket.
// Using serde allows easy conversion to/from JSON for WebSocket messages.

use serde::{Deserialize, Serialize};

use crate::controller::ChatController;
use crate::profile::ProfileForm;
use crate::render::RenderSink;
use crate::upload::UploadedFile;

/// What the page tells us the user did.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientEvent {
    SendText {
        text: String,
    },
    UploadImage {
        #[serde(default)]
        file: Option<FilePayload>,
    },
    OpenProfile,
    CloseProfile,
    SaveProfile(ProfileForm),
}

impl ClientEvent {
    /// Runs the matching controller operation.
    pub async fn apply<S: RenderSink>(self, controller: &ChatController<S>) {
        match self {
            Self::SendText { text } => {
                controller.send_text(&text).await;
            }
            Self::UploadImage { file } => {
                controller.upload_image(file.map(UploadedFile::from)).await;
            }
            Self::OpenProfile => controller.open_profile_editor().await,
            Self::CloseProfile => controller.close_profile_editor().await,
            Self::SaveProfile(form) => controller.save_profile(form).await,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilePayload {
    pub name: String,
    #[serde(default)]
    pub content_type: Option<String>,
    /// Base64 file contents, without the `data:` prefix. `None` when the
    /// browser failed to read the file.
    #[serde(default)]
    pub data: Option<String>,
}

impl From<FilePayload> for UploadedFile {
    fn from(payload: FilePayload) -> Self {
        match payload.data {
            Some(data) => UploadedFile::from_base64(payload.name, payload.content_type, data),
            None => UploadedFile::unreadable(payload.name, payload.content_type),
        }
    }
}

/// What the page should do to its DOM.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ViewCommand {
    Append { html: String },
    ScrollToEnd,
    ClearInput,
    SetModal { open: bool },
    ResetFilePicker,
}
