use std::convert::Infallible;
use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Request, State,
    },
    http::{header, StatusCode},
    response::{Html, IntoResponse},
    routing::get,
    serve, Router,
};
use tokio::sync::mpsc;
use tower_http::{services::ServeDir, trace::TraceLayer};
use tracing::{debug, error, info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::controller::{ChatController, ControllerConfig};
use crate::error::{ChatError, Result};
use crate::protocol::{ClientEvent, ViewCommand};
use crate::render::{ChatMessage, RenderSink};
use crate::view::Templates;

const CHAT_JS: &str = include_str!("../static/chat.js");
const STYLE_CSS: &str = include_str!("../static/style.css");

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Serve `/static` from here instead of the built-in assets.
    pub static_dir: Option<PathBuf>,
    /// Load templates from here (with reload) instead of the built-in ones.
    pub templates_dir: Option<PathBuf>,
    pub controller: ControllerConfig,
}

// Shared application state
#[derive(Clone)]
struct AppState {
    templates: Arc<Templates>,
    controller: ControllerConfig,
}

/// Renders each message to HTML and queues view commands for one socket.
struct SocketSink {
    templates: Arc<Templates>,
    commands: mpsc::UnboundedSender<ViewCommand>,
}

impl SocketSink {
    fn send(&self, command: ViewCommand) {
        if self.commands.send(command).is_err() {
            debug!("WebSocket already closed, dropping view command");
        }
    }
}

impl RenderSink for SocketSink {
    fn append(&mut self, message: ChatMessage) {
        match self.templates.render_message(&message) {
            Ok(html) => self.send(ViewCommand::Append { html }),
            Err(e) => error!("Failed to render message: {}", e),
        }
    }

    fn scroll_to_end(&mut self) {
        self.send(ViewCommand::ScrollToEnd);
    }

    fn clear_input(&mut self) {
        self.send(ViewCommand::ClearInput);
    }

    fn set_modal_visible(&mut self, visible: bool) {
        self.send(ViewCommand::SetModal { open: visible });
    }

    fn reset_file_picker(&mut self) {
        self.send(ViewCommand::ResetFilePicker);
    }
}

async fn index_handler(
    State(state): State<AppState>,
) -> Result<Html<String>, (StatusCode, Html<String>)> {
    state.templates.render_page().map(Html).map_err(|e| {
        error!("Failed to get or render template: {}", e);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Html(format!("Internal Server Error: {}", e)),
        )
    })
}

async fn chat_js() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "text/javascript")], CHAT_JS)
}

async fn style_css() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "text/css")], STYLE_CSS)
}

// WebSocket upgrade handler
async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    info!("WebSocket connection upgrade requested");
    ws.on_upgrade(move |socket| {
        let session_id = Uuid::new_v4();
        handle_socket(socket, state).instrument(info_span!("session", %session_id))
    })
}

// Each connection is one page session with its own controller and profile.
async fn handle_socket(mut socket: WebSocket, state: AppState) {
    info!("New WebSocket connection established");
    let (commands_tx, mut commands_rx) = mpsc::unbounded_channel();
    let controller = ChatController::new(
        SocketSink {
            templates: state.templates.clone(),
            commands: commands_tx,
        },
        state.controller.clone(),
    );

    loop {
        tokio::select! {
            Some(command) = commands_rx.recv() => {
                let json = match serde_json::to_string(&command) {
                    Ok(json) => json,
                    Err(e) => {
                        error!("Failed to serialize view command: {}", e);
                        continue;
                    }
                };
                if socket.send(Message::Text(json)).await.is_err() {
                    warn!("WebSocket client disconnected or send error. Closing connection.");
                    break;
                }
            }

            message = socket.recv() => {
                match message {
                    Some(Ok(Message::Text(text))) => match serde_json::from_str::<ClientEvent>(&text) {
                        Ok(event) => event.apply(&controller).await,
                        Err(e) => warn!("Ignoring malformed client event: {}", e),
                    },
                    Some(Ok(Message::Binary(_))) => {
                        warn!("Received unexpected binary message from client");
                    }
                    // Axum answers pings itself
                    Some(Ok(Message::Ping(_) | Message::Pong(_))) => {}
                    Some(Ok(Message::Close(_))) => {
                        info!("Client requested WebSocket close");
                        break;
                    }
                    Some(Err(e)) => {
                        warn!("WebSocket receive error: {}", e);
                        break;
                    }
                    None => {
                        info!("WebSocket client disconnected");
                        break;
                    }
                }
            }
        }
    }
    info!("WebSocket connection closed");
}

/// Builds the application router.
pub fn router(config: &ServerConfig) -> Router {
    let templates = match &config.templates_dir {
        Some(dir) => Templates::from_dir(dir.clone()),
        None => Templates::embedded(),
    };
    let state = AppState {
        templates: Arc::new(templates),
        controller: config.controller.clone(),
    };

    let router = Router::new()
        .route("/", get(index_handler))
        .route("/ws", get(ws_handler));

    let router = match &config.static_dir {
        Some(dir) => {
            let static_files_service =
                ServeDir::new(dir).not_found_service(tower::service_fn(|_: Request| async {
                    Ok::<_, Infallible>((StatusCode::NOT_FOUND, "Not Found").into_response())
                }));
            router.nest_service("/static", static_files_service)
        }
        None => router
            .route("/static/chat.js", get(chat_js))
            .route("/static/style.css", get(style_css)),
    };

    router.with_state(state).layer(TraceLayer::new_for_http())
}

pub async fn start_web_server<F>(config: ServerConfig, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = router(&config);

    let listener = tokio::net::TcpListener::bind((config.host.as_str(), config.port))
        .await
        .map_err(|source| ChatError::Bind {
            addr: format!("{}:{}", config.host, config.port),
            source,
        })?;
    let addr = listener.local_addr()?;
    info!("Web server listening on http://{}", addr);

    serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown)
        .await?;

    Ok(())
}
