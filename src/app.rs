use crate::agent::ChatAgent;
use crate::config::settings::{ SettingsStore, Theme };
use crate::history::export::{ write_export, ExportError };
use crate::render::SharedRenderer;

use log::{ info, warn, error };
use std::error::Error;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{ AsyncBufRead, AsyncBufReadExt };
use tokio::task::JoinHandle;

const HELP_TEXT: &str = "Commands:
  /clear                      start a new conversation
  /export                     save the conversation as JSON
  /theme [light|dark]         toggle or set the colour theme
  /settings                   show saved settings
  /settings api-key <key>     save an API key
  /settings project-id <id>   save a project id
  /status                     show backend connectivity
  /help                       show this help
  /quit                       leave";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Send(String),
    Clear,
    Export,
    Theme(Option<Theme>),
    ShowSettings,
    SetApiKey(String),
    SetProjectId(String),
    Status,
    Help,
    Quit,
    Unknown(String),
}

impl Command {
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        let Some(rest) = line.strip_prefix('/') else {
            return Command::Send(line.to_string());
        };

        let mut parts = rest.splitn(3, char::is_whitespace);
        let name = parts.next().unwrap_or("").to_lowercase();
        let arg = parts
            .next()
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty());
        let value = parts.next().map(str::trim).unwrap_or("").to_string();

        match (name.as_str(), arg.as_deref()) {
            ("clear", None) => Command::Clear,
            ("export", None) => Command::Export,
            ("theme", None) => Command::Theme(None),
            ("theme", Some("light")) => Command::Theme(Some(Theme::Light)),
            ("theme", Some("dark")) => Command::Theme(Some(Theme::Dark)),
            ("settings", None) => Command::ShowSettings,
            ("settings", Some("api-key")) => Command::SetApiKey(value),
            ("settings", Some("project-id")) => Command::SetProjectId(value),
            ("status", None) => Command::Status,
            ("help", _) => Command::Help,
            ("quit", _) | ("exit", _) => Command::Quit,
            _ => Command::Unknown(line.to_string()),
        }
    }
}

/// Everything one chat session needs, built once at startup.
pub struct AppContext<W: Write + Send + 'static> {
    agent: Arc<ChatAgent>,
    settings: SettingsStore,
    renderer: SharedRenderer<W>,
    export_dir: PathBuf,
    render_task: JoinHandle<()>,
}

impl<W: Write + Send + 'static> AppContext<W> {
    pub fn new(
        agent: Arc<ChatAgent>,
        settings: SettingsStore,
        renderer: SharedRenderer<W>,
        export_dir: PathBuf,
        render_task: JoinHandle<()>
    ) -> Self {
        Self {
            agent,
            settings,
            renderer,
            export_dir,
            render_task,
        }
    }

    pub fn agent(&self) -> &Arc<ChatAgent> {
        &self.agent
    }

    fn notice(&self, text: &str) {
        let result = match self.renderer.lock() {
            Ok(mut r) => r.notice(text),
            Err(poisoned) => poisoned.into_inner().notice(text),
        };
        if let Err(e) = result {
            error!("Failed to write to terminal: {}", e);
        }
    }

    fn apply_theme(&self, theme: Theme) {
        match self.renderer.lock() {
            Ok(mut r) => r.set_theme(theme),
            Err(poisoned) => poisoned.into_inner().set_theme(theme),
        }
    }

    /// Reads lines from `input` until end of input or `/quit`.
    pub async fn run<R>(&mut self, input: R) -> Result<(), Box<dyn Error + Send + Sync>>
        where R: AsyncBufRead + Unpin
    {
        let mut lines = input.lines();
        while let Some(line) = lines.next_line().await? {
            if !self.handle(Command::parse(&line)).await {
                break;
            }
        }
        Ok(())
    }

    /// Executes one command. Returns `false` when the session should end.
    pub async fn handle(&mut self, command: Command) -> bool {
        match command {
            Command::Send(text) => {
                self.agent.send(&text).await;
            }
            Command::Clear => self.agent.clear().await,
            Command::Export => self.export().await,
            Command::Theme(requested) => {
                let result = match requested {
                    Some(theme) => self.settings.set_theme(theme).map(|_| theme),
                    None => self.settings.toggle_theme(),
                };
                match result {
                    Ok(theme) => {
                        self.apply_theme(theme);
                        self.notice(&format!("Theme set to {}.", theme));
                    }
                    Err(e) => {
                        warn!("Failed to save theme: {}", e);
                        self.notice("Could not save the theme preference.");
                    }
                }
            }
            Command::ShowSettings => {
                let settings = self.settings.settings();
                self.notice(
                    &format!(
                        "Theme: {}\nAPI key: {}\nProject id: {}\nSaved in: {}",
                        settings.theme,
                        settings.masked_api_key(),
                        settings.project_id.as_deref().unwrap_or("(not set)"),
                        self.settings.path().display()
                    )
                );
            }
            Command::SetApiKey(key) => {
                let saved = self.settings.set_api_key(Some(key));
                self.report_settings_save(saved);
            }
            Command::SetProjectId(id) => {
                let saved = self.settings.set_project_id(Some(id));
                self.report_settings_save(saved);
            }
            Command::Status => {
                self.notice(self.agent.status().label());
            }
            Command::Help => self.notice(HELP_TEXT),
            Command::Quit => {
                return false;
            }
            Command::Unknown(line) => {
                self.notice(&format!("Unknown command: {} (try /help)", line));
            }
        }
        true
    }

    fn report_settings_save(&self, saved: Result<(), crate::config::settings::SettingsError>) {
        match saved {
            Ok(()) => self.notice("Settings saved successfully!"),
            Err(e) => {
                warn!("Failed to save settings: {}", e);
                self.notice("Could not save settings.");
            }
        }
    }

    async fn export(&self) {
        let written = match self.agent.export().await {
            Ok(export) => write_export(&export, &self.export_dir),
            Err(e) => Err(e),
        };
        match written {
            Ok(path) => self.notice(&format!("Chat exported to {}", path.display())),
            Err(ExportError::EmptyConversation) => self.notice("No chat history to export."),
            Err(e) => {
                error!("Chat export failed: {}", e);
                self.notice("Chat export failed.");
            }
        }
    }

    /// Stops the renderer once every pending event has been written.
    pub async fn shutdown(self) {
        let Self { agent, render_task, .. } = self;
        drop(agent);
        if let Err(e) = render_task.await {
            error!("Renderer task ended abnormally: {}", e);
        }
        info!("Chat session closed");
    }
}
