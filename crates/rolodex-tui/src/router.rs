//! Host-side routing of navigation targets.
//!
//! The terminal has no pages of its own, so the router keeps a session history
//! of visited targets and, when configured, hands the full URL to the
//! platform opener.

use rolodex_core::config::AppConfig;
use std::process::{Command, Stdio};
use tracing::{debug, warn};

const MAX_HISTORY: usize = 50;

/// Spawn a command with all I/O redirected to null (fire and forget)
fn spawn_silent(program: &str, args: &[&str]) {
    if let Err(e) = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
    {
        warn!("Failed to run {program}: {e}");
    }
}

fn opener() -> &'static str {
    if cfg!(target_os = "macos") {
        "open"
    } else {
        "xdg-open"
    }
}

pub struct Router {
    base_url: Option<String>,
    open_in_browser: bool,
    history: Vec<String>,
}

impl Router {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            base_url: config.base_url.clone(),
            open_in_browser: config.open_in_browser,
            history: Vec::new(),
        }
    }

    /// Full URL for `target`, or the bare path when no base URL is set.
    pub fn url_for(&self, target: &str) -> String {
        match self.base_url.as_deref() {
            Some(base) if !base.is_empty() => format!("{}{target}", base.trim_end_matches('/')),
            _ => target.to_string(),
        }
    }

    /// Record `target` as the current page and open it if configured to.
    /// Returns the URL that was (or would have been) opened.
    pub fn navigate(&mut self, target: &str) -> String {
        let url = self.url_for(target);

        self.history.push(target.to_string());
        if self.history.len() > MAX_HISTORY {
            self.history.remove(0);
        }

        if self.open_in_browser && self.base_url.is_some() {
            debug!("Opening {url}");
            spawn_silent(opener(), &[&url]);
        }
        url
    }

    pub fn current(&self) -> Option<&str> {
        self.history.last().map(String::as_str)
    }

    /// Visited targets, oldest first.
    pub fn history(&self) -> &[String] {
        &self.history
    }
}
