//! A chat widget that pretends to estimate nutrition. Users type a meal or
//! send a photo and, after a short delay, get a made-up calorie card back.
//!
//! The [`controller::ChatController`] holds the behaviour and writes through a
//! [`render::RenderSink`]; the web server and the terminal chat are sinks.

pub mod chat;
pub mod config;
pub mod constants;
pub mod controller;
pub mod error;
pub mod estimate;
pub mod profile;
pub mod protocol;
pub mod render;
pub mod upload;
pub mod view;
pub mod web_server;

pub use controller::{ChatController, ControllerConfig};
pub use error::{ChatError, Result};
pub use estimate::NutritionEstimate;
pub use profile::{ProfileForm, UserProfile};
pub use render::{ChatMessage, RenderSink, Transcript};
pub use upload::UploadedFile;
