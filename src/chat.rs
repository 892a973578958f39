// Terminal front end: the same chat, one line at a time on stdin/stdout.

use std::io::Write;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};

use comfy_table::Table;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{info, warn};

use crate::controller::{ChatController, ControllerConfig};
use crate::error::Result;
use crate::profile::ProfileForm;
use crate::render::{ChatMessage, RenderSink};
use crate::upload::UploadedFile;

const HELP: &str = "Commands: /photo <path>, /profile, /set <field> <value>, /save, /close, /quit";
const EDITOR_HELP: &str =
    "Profile editor open. Fields: age, gender, height, weight, activity. Use /set, then /save or /close.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Send(String),
    /// `None` when no path was given, i.e. the picker was cancelled.
    Photo(Option<PathBuf>),
    Profile,
    Set { field: String, value: String },
    Save,
    Close,
    Quit,
    Unknown(String),
}

pub fn parse_command(line: &str) -> Command {
    let Some(rest) = line.trim_start().strip_prefix('/') else {
        return Command::Send(line.to_string());
    };
    let (name, args) = match rest.split_once(char::is_whitespace) {
        Some((name, args)) => (name, args.trim()),
        None => (rest.trim_end(), ""),
    };
    match name {
        "photo" => Command::Photo((!args.is_empty()).then(|| PathBuf::from(args))),
        "profile" => Command::Profile,
        "set" => {
            let (field, value) = args.split_once(char::is_whitespace).unwrap_or((args, ""));
            Command::Set {
                field: field.to_string(),
                value: value.trim().to_string(),
            }
        }
        "save" => Command::Save,
        "close" => Command::Close,
        "quit" | "exit" => Command::Quit,
        other => Command::Unknown(other.to_string()),
    }
}

/// Prints bubbles as lines and cards as small tables.
pub struct TerminalSink<W> {
    out: Arc<Mutex<W>>,
}

impl<W: Write> TerminalSink<W> {
    pub fn new(out: Arc<Mutex<W>>) -> Self {
        Self { out }
    }

    fn write(&self, text: &str) {
        let mut out = self.out.lock().unwrap_or_else(PoisonError::into_inner);
        if let Err(e) = writeln!(out, "{text}") {
            warn!("Failed to write to terminal: {}", e);
        }
    }
}

pub fn format_message(message: &ChatMessage) -> String {
    match message {
        ChatMessage::UserText { text } => format!("You: {text}"),
        ChatMessage::UserImage { name, .. } => format!("You: [photo {name}]"),
        ChatMessage::BotText { text } => format!("Bot: {text}"),
        ChatMessage::BotCard { sentence, estimate } => {
            let mut table = Table::new();
            table
                .add_row(vec![
                    "Total Calories".to_string(),
                    format!("~{} kcal", estimate.total_calories),
                ])
                .add_row(vec!["Protein".to_string(), format!("~{} g", estimate.protein_grams)])
                .add_row(vec!["Fat".to_string(), format!("~{} g", estimate.fat_grams)]);
            format!("Bot: {sentence}\n{table}")
        }
    }
}

impl<W: Write + Send + 'static> RenderSink for TerminalSink<W> {
    fn append(&mut self, message: ChatMessage) {
        self.write(&format_message(&message));
    }

    fn scroll_to_end(&mut self) {
        let mut out = self.out.lock().unwrap_or_else(PoisonError::into_inner);
        if let Err(e) = out.flush() {
            warn!("Failed to flush terminal: {}", e);
        }
    }

    // The line was already consumed by the reader.
    fn clear_input(&mut self) {}

    fn set_modal_visible(&mut self, visible: bool) {
        if visible {
            self.write(EDITOR_HELP);
        } else {
            self.write("Profile editor closed.");
        }
    }

    fn reset_file_picker(&mut self) {}
}

/// Runs a chat session until `/quit` or end of input, then waits for replies
/// still in flight.
pub async fn run_session<R, W>(
    input: R,
    output: Arc<Mutex<W>>,
    config: ControllerConfig,
) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write + Send + 'static,
{
    let controller = ChatController::new(TerminalSink::new(output.clone()), config);
    let notes = TerminalSink::new(output);
    let mut draft = ProfileForm::default();
    let mut lines = input.lines();

    notes.write(HELP);
    while let Some(line) = lines.next_line().await? {
        match parse_command(&line) {
            Command::Send(text) => {
                controller.send_text(&text).await;
            }
            Command::Photo(path) => {
                let file = match path {
                    Some(path) => match UploadedFile::read(&path).await {
                        Ok(file) => Some(file),
                        Err(e) => {
                            warn!("{}", e);
                            notes.write(&format!("Could not open {}", path.display()));
                            None
                        }
                    },
                    None => None,
                };
                controller.upload_image(file).await;
            }
            Command::Profile => {
                draft = ProfileForm::from(&controller.profile().await);
                controller.open_profile_editor().await;
            }
            Command::Set { field, value } => {
                if !controller.is_profile_editor_open().await {
                    notes.write("Open the profile editor with /profile first.");
                } else if !draft.set(&field, value) {
                    notes.write(&format!("Unknown profile field '{field}'."));
                }
            }
            Command::Save => {
                if controller.is_profile_editor_open().await {
                    controller.save_profile(std::mem::take(&mut draft)).await;
                } else {
                    notes.write("Open the profile editor with /profile first.");
                }
            }
            Command::Close => controller.close_profile_editor().await,
            Command::Quit => break,
            Command::Unknown(name) => notes.write(&format!("Unknown command /{name}. {HELP}")),
        }
    }

    info!("Input finished, waiting for pending replies");
    controller.drain().await;
    Ok(())
}

/// Chat on the process's stdin and stdout.
pub async fn run_terminal_chat(config: ControllerConfig) -> Result<()> {
    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let stdout = Arc::new(Mutex::new(std::io::stdout()));
    run_session(stdin, stdout, config).await
}
