//! Display side of the gallery: loader, error line, cards

use std::io::Write;
use tracing::warn;

use crate::render::{self, Frame};

/// Receives every visible change the controller makes
pub trait Presenter {
    fn show_loader(&mut self, visible: bool);
    /// `None` hides the error line
    fn show_error(&mut self, message: Option<&str>);
    /// Replace the whole gallery
    fn render(&mut self, frame: &Frame);
    /// Update one card's favorite control without re-rendering
    fn mark_favorite(&mut self, id: &str, favorite: bool);
    fn open_image(&mut self, url: &str);
}

/// Writes the gallery to a terminal or pipe, as text or JSON lines
pub struct TerminalPresenter<W: Write> {
    writer: W,
    json: bool,
}

impl<W: Write> TerminalPresenter<W> {
    pub fn new(writer: W, json: bool) -> Self {
        Self { writer, json }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    fn emit_event(&mut self, event: serde_json::Value) {
        if let Err(e) = writeln!(self.writer, "{}", event) {
            warn!(error = %e, "failed to write gallery output");
        }
    }

    fn emit_line(&mut self, line: &str) {
        if let Err(e) = writeln!(self.writer, "{}", line) {
            warn!(error = %e, "failed to write gallery output");
        }
    }
}

impl<W: Write> Presenter for TerminalPresenter<W> {
    fn show_loader(&mut self, visible: bool) {
        // Loader state is only interesting to a human watching the output
        if visible && !self.json {
            self.emit_line("Loading...");
        }
    }

    fn show_error(&mut self, message: Option<&str>) {
        let Some(message) = message else {
            return;
        };
        if self.json {
            self.emit_event(serde_json::json!({ "type": "error", "message": message }));
        } else {
            self.emit_line(&format!("Error: {}", message));
        }
    }

    fn render(&mut self, frame: &Frame) {
        // A cleared gallery has nothing to print
        if matches!(frame, Frame::Cards(cards) if cards.is_empty()) {
            return;
        }
        let result = if self.json {
            render::write_json(&mut self.writer, frame)
        } else {
            render::write_text(&mut self.writer, frame)
        };
        if let Err(e) = result.and_then(|_| self.writer.flush()) {
            warn!(error = %e, "failed to write gallery output");
        }
    }

    fn mark_favorite(&mut self, id: &str, favorite: bool) {
        if self.json {
            self.emit_event(serde_json::json!({ "type": "favorite", "id": id, "favorite": favorite }));
        } else if favorite {
            self.emit_line(&format!("★ {} added to favorites", id));
        } else {
            self.emit_line(&format!("☆ {} removed from favorites", id));
        }
    }

    fn open_image(&mut self, url: &str) {
        if self.json {
            self.emit_event(serde_json::json!({ "type": "open", "url": url }));
        } else {
            self.emit_line(&format!("Open: {}", url));
        }
    }
}
