//! The chat controller: turns user actions into render-sink calls and owns
//! the session's profile and modal state.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn, Instrument};

use crate::constants::{DEFAULT_RESPONSE_DELAY_MS, PROFILE_SAVED_MESSAGE};
use crate::estimate::{response_sentence, NutritionEstimate};
use crate::profile::{ProfileForm, UserProfile};
use crate::render::{ChatMessage, RenderSink};
use crate::upload::UploadedFile;

#[derive(Debug, Clone)]
pub struct ControllerConfig {
    /// How long the fake bot "thinks" before answering.
    pub response_delay: Duration,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            response_delay: Duration::from_millis(*DEFAULT_RESPONSE_DELAY_MS),
        }
    }
}

struct Session<S> {
    profile: UserProfile,
    modal_open: bool,
    sink: S,
}

impl<S: RenderSink> Session<S> {
    fn render_response(&mut self, query: &str, is_image: bool) {
        let estimate = NutritionEstimate::compute(&self.profile, is_image);
        let sentence = response_sentence(query, is_image, &self.profile);
        debug!(total_calories = estimate.total_calories, is_image, "rendering bot card");
        self.sink.append(ChatMessage::BotCard { sentence, estimate });
        self.sink.scroll_to_end();
    }
}

/// One chat session. Cloning gives another handle to the same session.
pub struct ChatController<S> {
    session: Arc<Mutex<Session<S>>>,
    // Handles only, so dropping the controller leaves the tasks running.
    pending: Arc<Mutex<Vec<JoinHandle<()>>>>,
    config: ControllerConfig,
}

impl<S> Clone for ChatController<S> {
    fn clone(&self) -> Self {
        Self {
            session: Arc::clone(&self.session),
            pending: Arc::clone(&self.pending),
            config: self.config.clone(),
        }
    }
}

impl<S: RenderSink> ChatController<S> {
    pub fn new(sink: S, config: ControllerConfig) -> Self {
        Self {
            session: Arc::new(Mutex::new(Session {
                profile: UserProfile::default(),
                modal_open: false,
                sink,
            })),
            pending: Arc::new(Mutex::new(Vec::new())),
            config,
        }
    }

    /// Sends the trimmed `input` as a user message and schedules the bot
    /// reply. Blank input is ignored. Returns whether a message was sent.
    pub async fn send_text(&self, input: &str) -> bool {
        let text = input.trim();
        if text.is_empty() {
            debug!("ignoring empty message");
            return false;
        }

        {
            let mut session = self.session.lock().await;
            session.sink.append(ChatMessage::UserText {
                text: text.to_string(),
            });
            session.sink.clear_input();
            session.sink.scroll_to_end();
        }

        self.schedule_response(text.to_string(), false).await;
        true
    }

    /// Shows the picked image and schedules the bot reply. The image bubble
    /// and the reply complete independently; either may land first. `None`
    /// means the picker was cancelled.
    pub async fn upload_image(&self, file: Option<UploadedFile>) -> bool {
        let Some(file) = file else {
            debug!("file picker cancelled");
            return false;
        };
        info!(name = %file.name, "image uploaded");

        let name = file.name.clone();
        let session = Arc::clone(&self.session);
        self.track(async move {
            let data_url = match file.to_data_url() {
                Ok(data_url) => data_url,
                Err(e) => {
                    warn!("Failed to decode uploaded image: {}", e);
                    return;
                }
            };
            let mut session = session.lock().await;
            session.sink.append(ChatMessage::UserImage {
                name: file.name,
                data_url,
            });
            session.sink.scroll_to_end();
        })
        .await;

        self.schedule_response(name, true).await;
        self.session.lock().await.sink.reset_file_picker();
        true
    }

    pub async fn open_profile_editor(&self) {
        let mut session = self.session.lock().await;
        session.modal_open = true;
        session.sink.set_modal_visible(true);
    }

    pub async fn close_profile_editor(&self) {
        let mut session = self.session.lock().await;
        session.modal_open = false;
        session.sink.set_modal_visible(false);
    }

    pub async fn is_profile_editor_open(&self) -> bool {
        self.session.lock().await.modal_open
    }

    /// Stores the form as the new profile, closes the editor and confirms.
    pub async fn save_profile(&self, form: ProfileForm) {
        let profile = UserProfile::from(form);
        let mut session = self.session.lock().await;
        session.profile = profile;
        session.modal_open = false;
        session.sink.set_modal_visible(false);
        session.sink.append(ChatMessage::BotText {
            text: PROFILE_SAVED_MESSAGE.to_string(),
        });
        session.sink.scroll_to_end();
        info!("profile updated");
    }

    /// Swaps in a new profile and hands back the old one.
    pub async fn replace_profile(&self, profile: UserProfile) -> UserProfile {
        let mut session = self.session.lock().await;
        std::mem::replace(&mut session.profile, profile)
    }

    pub async fn profile(&self) -> UserProfile {
        self.session.lock().await.profile.clone()
    }

    /// Renders a bot card for `query` right away.
    pub async fn render_bot_response(&self, query: &str, is_image: bool) {
        self.session.lock().await.render_response(query, is_image);
    }

    /// Runs `f` against the sink.
    pub async fn inspect<R>(&self, f: impl FnOnce(&S) -> R) -> R {
        f(&self.session.lock().await.sink)
    }

    /// Waits until every scheduled reply and image decode has finished.
    pub async fn drain(&self) {
        loop {
            let pending = std::mem::take(&mut *self.pending.lock().await);
            if pending.is_empty() {
                return;
            }
            for handle in pending {
                if let Err(e) = handle.await {
                    error!("Chat task failed: {:?}", e);
                }
            }
        }
    }

    async fn schedule_response(&self, query: String, is_image: bool) {
        let session = Arc::clone(&self.session);
        let delay = self.config.response_delay;
        self.track(async move {
            tokio::time::sleep(delay).await;
            session.lock().await.render_response(&query, is_image);
        })
        .await;
    }

    async fn track<F>(&self, task: F)
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let mut pending = self.pending.lock().await;
        // Forget finished tasks so a long session doesn't pile them up.
        pending.retain(|handle| !handle.is_finished());
        pending.push(tokio::spawn(task.in_current_span()));
    }
}
