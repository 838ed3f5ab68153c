use chrono::Local;
use log::error;
use std::io::{ self, Write };
use std::sync::{ Arc, Mutex };
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::task::JoinHandle;
use crate::config::settings::Theme;
use crate::models::chat::{ ChatMessage, Role };
use crate::models::events::{ ChatEvent, ServerStatus };

pub const WELCOME_MESSAGE: &str =
    "Hi, I am AutoSphere AI. How can I help you today? I'm here to assist with automation, provide intelligent solutions, and help you achieve more with AI-powered assistance.";

const TYPING_LINE: &str = "AutoSphere AI is typing...";
const CLEAR_LINE: &str = "\r\x1b[2K";
const RESET: &str = "\x1b[0m";

#[derive(Debug, Clone, Copy)]
struct Palette {
    user: &'static str,
    assistant: &'static str,
    muted: &'static str,
    ok: &'static str,
    warn: &'static str,
}

impl Palette {
    fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Light => Palette {
                user: "\x1b[34m",
                assistant: "\x1b[35m",
                muted: "\x1b[90m",
                ok: "\x1b[32m",
                warn: "\x1b[33m",
            },
            Theme::Dark => Palette {
                user: "\x1b[96m",
                assistant: "\x1b[95m",
                muted: "\x1b[37m",
                ok: "\x1b[92m",
                warn: "\x1b[93m",
            },
        }
    }
}

/// Writes chat events to a terminal. The only component that knows about presentation.
pub struct TerminalRenderer<W: Write> {
    out: W,
    palette: Palette,
    typing: bool,
}

pub type SharedRenderer<W> = Arc<Mutex<TerminalRenderer<W>>>;

impl<W: Write> TerminalRenderer<W> {
    pub fn new(out: W, theme: Theme) -> Self {
        Self {
            out,
            palette: Palette::for_theme(theme),
            typing: false,
        }
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.palette = Palette::for_theme(theme);
    }

    pub fn get_ref(&self) -> &W {
        &self.out
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    pub fn render(&mut self, event: &ChatEvent) -> io::Result<()> {
        match event {
            ChatEvent::MessageAppended(message) => self.message(message),
            ChatEvent::ComposingStarted => {
                self.typing = true;
                write!(self.out, "{}{}{}", self.palette.muted, TYPING_LINE, RESET)?;
                self.out.flush()
            }
            ChatEvent::ComposingFinished => self.clear_typing(),
            ChatEvent::Cleared => {
                self.clear_typing()?;
                writeln!(self.out, "{}Conversation cleared.{}", self.palette.muted, RESET)?;
                self.welcome()
            }
            ChatEvent::StatusChanged(status) => {
                let colour = match status {
                    ServerStatus::Connected => self.palette.ok,
                    ServerStatus::ServerError | ServerStatus::Disconnected => self.palette.warn,
                };
                self.status(status.label(), colour)
            }
        }
    }

    pub fn welcome(&mut self) -> io::Result<()> {
        self.assistant_line(WELCOME_MESSAGE, &Local::now().format("%H:%M").to_string())
    }

    pub fn notice(&mut self, text: &str) -> io::Result<()> {
        self.clear_typing()?;
        writeln!(self.out, "{}{}{}", self.palette.muted, text, RESET)?;
        self.out.flush()
    }

    fn message(&mut self, message: &ChatMessage) -> io::Result<()> {
        self.clear_typing()?;
        let time = message.timestamp.with_timezone(&Local).format("%H:%M").to_string();
        match message.role {
            Role::User => {
                writeln!(
                    self.out,
                    "{}You{} {}[{}]{}: {}",
                    self.palette.user,
                    RESET,
                    self.palette.muted,
                    time,
                    RESET,
                    message.content
                )?;
                self.out.flush()
            }
            Role::Assistant => self.assistant_line(&message.content, &time),
        }
    }

    fn assistant_line(&mut self, content: &str, time: &str) -> io::Result<()> {
        writeln!(
            self.out,
            "{}AutoSphere AI{} {}[{}]{}: {}",
            self.palette.assistant,
            RESET,
            self.palette.muted,
            time,
            RESET,
            content
        )?;
        self.out.flush()
    }

    fn status(&mut self, label: &str, colour: &str) -> io::Result<()> {
        self.clear_typing()?;
        writeln!(self.out, "{}● {}{}", colour, label, RESET)?;
        self.out.flush()
    }

    fn clear_typing(&mut self) -> io::Result<()> {
        if self.typing {
            self.typing = false;
            write!(self.out, "{}", CLEAR_LINE)?;
        }
        Ok(())
    }
}

/// Drains `events` into `renderer` until the sending side is dropped.
pub fn spawn<W>(renderer: SharedRenderer<W>, mut events: UnboundedReceiver<ChatEvent>) -> JoinHandle<()>
    where W: Write + Send + 'static
{
    tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            let result = match renderer.lock() {
                Ok(mut r) => r.render(&event),
                Err(poisoned) => poisoned.into_inner().render(&event),
            };
            if let Err(e) = result {
                error!("Failed to render chat event: {}", e);
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    fn rendered(events: &[ChatEvent]) -> String {
        let mut renderer = TerminalRenderer::new(Vec::new(), Theme::Light);
        for ev in events {
            renderer.render(ev).unwrap();
        }
        String::from_utf8(renderer.into_inner()).unwrap()
    }

    #[test]
    fn typing_line_is_erased_before_reply() {
        let out = rendered(
            &[
                ChatEvent::ComposingStarted,
                ChatEvent::ComposingFinished,
                ChatEvent::MessageAppended(ChatMessage::assistant("done")),
            ]
        );
        let typing = out.find(TYPING_LINE).unwrap();
        let erase = out.find(CLEAR_LINE).unwrap();
        let reply = out.find("done").unwrap();
        assert!(typing < erase && erase < reply);
    }

    #[test]
    fn erase_is_only_written_while_typing() {
        let out = rendered(&[ChatEvent::ComposingFinished]);
        assert!(out.is_empty());
    }

    #[test]
    fn clear_reshows_welcome() {
        let out = rendered(&[ChatEvent::Cleared]);
        assert!(out.contains("Conversation cleared."));
        assert!(out.contains(WELCOME_MESSAGE));
    }

    #[test]
    fn connection_status_labels() {
        assert!(rendered(&[ChatEvent::StatusChanged(ServerStatus::Connected)]).contains("Connected"));
        assert!(
            rendered(&[ChatEvent::StatusChanged(ServerStatus::ServerError)]).contains("Server Error")
        );
        assert!(
            rendered(&[ChatEvent::StatusChanged(ServerStatus::Disconnected)]).contains("Disconnected")
        );
    }

    #[test]
    fn user_lines_are_labelled() {
        let out = rendered(&[ChatEvent::MessageAppended(ChatMessage::user("ping"))]);
        assert!(out.contains("You"));
        assert!(out.contains(": ping"));
    }

    #[tokio::test]
    async fn spawned_renderer_drains_channel() {
        let renderer = Arc::new(Mutex::new(TerminalRenderer::new(Vec::new(), Theme::Dark)));
        let (tx, rx) = mpsc::unbounded_channel();
        let handle = spawn(renderer.clone(), rx);

        tx.send(ChatEvent::MessageAppended(ChatMessage::assistant("pong"))).unwrap();
        drop(tx);
        handle.await.unwrap();

        let out = String::from_utf8_lossy(renderer.lock().unwrap().get_ref()).to_string();
        assert!(out.contains("pong"));
    }
}
