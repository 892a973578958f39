//! What the controller draws, and where it draws it.

use chrono::Local;
use serde::Serialize;

use crate::estimate::NutritionEstimate;

/// One bubble in the chat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChatMessage {
    UserText { text: String },
    UserImage { name: String, data_url: String },
    BotText { text: String },
    BotCard { sentence: String, estimate: NutritionEstimate },
}

impl ChatMessage {
    pub fn is_user(&self) -> bool {
        matches!(self, Self::UserText { .. } | Self::UserImage { .. })
    }

    pub fn is_bot(&self) -> bool {
        !self.is_user()
    }
}

/// The view the controller writes to. Implementations must not block; the
/// controller calls these while holding its session lock.
pub trait RenderSink: Send + 'static {
    fn append(&mut self, message: ChatMessage);
    fn scroll_to_end(&mut self);
    fn clear_input(&mut self);
    fn set_modal_visible(&mut self, visible: bool);
    /// Forget the last picked file so picking it again fires a new upload.
    fn reset_file_picker(&mut self);
}

#[derive(Debug, Clone, PartialEq)]
pub struct TranscriptEntry {
    pub timestamp: String,
    pub message: ChatMessage,
}

/// In-memory sink. Scroll position is measured in messages: the view is at the
/// bottom when `scroll_top == scroll_height()`.
#[derive(Debug, Default)]
pub struct Transcript {
    pub entries: Vec<TranscriptEntry>,
    pub scroll_top: usize,
    pub modal_visible: bool,
    pub inputs_cleared: usize,
    pub file_picker_resets: usize,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> impl Iterator<Item = &ChatMessage> {
        self.entries.iter().map(|entry| &entry.message)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn scroll_height(&self) -> usize {
        self.entries.len()
    }

    pub fn is_scrolled_to_bottom(&self) -> bool {
        self.scroll_top == self.scroll_height()
    }

    pub fn cards(&self) -> Vec<NutritionEstimate> {
        self.messages()
            .filter_map(|message| match message {
                ChatMessage::BotCard { estimate, .. } => Some(*estimate),
                _ => None,
            })
            .collect()
    }
}

impl RenderSink for Transcript {
    fn append(&mut self, message: ChatMessage) {
        let timestamp = Local::now().format("%H:%M:%S").to_string();
        self.entries.push(TranscriptEntry { timestamp, message });
    }

    fn scroll_to_end(&mut self) {
        self.scroll_top = self.scroll_height();
    }

    fn clear_input(&mut self) {
        self.inputs_cleared += 1;
    }

    fn set_modal_visible(&mut self, visible: bool) {
        self.modal_visible = visible;
    }

    fn reset_file_picker(&mut self) {
        self.file_picker_resets += 1;
    }
}
