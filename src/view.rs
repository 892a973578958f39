// HTML rendering for the web front end.

use std::path::PathBuf;

use minijinja::{path_loader, Environment};
use minijinja_autoreload::AutoReloader;

use crate::error::Result;
use crate::render::ChatMessage;

const INDEX_TEMPLATE: &str = include_str!("../templates/index.html");
const MESSAGE_TEMPLATE: &str = include_str!("../templates/message.html");

pub const PAGE_TITLE: &str = "Nutrition Assistant";
pub const GREETING: &str =
    "Hi! Tell me what you ate, or send a photo, and I'll estimate the nutrition.";

pub struct Templates {
    reloader: AutoReloader,
}

impl Templates {
    /// Templates compiled into the binary.
    pub fn embedded() -> Self {
        let reloader = AutoReloader::new(|_notifier| {
            let mut env = Environment::new();
            env.add_template("index.html", INDEX_TEMPLATE)?;
            env.add_template("message.html", MESSAGE_TEMPLATE)?;
            Ok(env)
        });
        Self { reloader }
    }

    /// Templates loaded from `dir`, reloaded when files there change.
    pub fn from_dir(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        let reloader = AutoReloader::new(move |notifier| {
            let mut env = Environment::new();
            env.set_loader(path_loader(dir.clone()));
            notifier.watch_path(&dir, true);
            Ok(env)
        });
        Self { reloader }
    }

    pub fn render_page(&self) -> Result<String> {
        let env = self.reloader.acquire_env()?;
        let tmpl = env.get_template("index.html")?;
        let context = minijinja::context! {
            title => PAGE_TITLE,
            greeting => GREETING,
        };
        Ok(tmpl.render(context)?)
    }

    pub fn render_message(&self, message: &ChatMessage) -> Result<String> {
        let env = self.reloader.acquire_env()?;
        let tmpl = env.get_template("message.html")?;
        Ok(tmpl.render(minijinja::context! { message => message })?)
    }
}

impl std::fmt::Debug for Templates {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Templates").finish_non_exhaustive()
    }
}
