//! Terminal output for the poll driver.

use std::io::Write;
use std::sync::{Arc, Mutex};

use hnpulse_core::hn::WEB_HOMEPAGE;
use hnpulse_core::{CoreError, MenuRow, Notification, Notifier, RenderModel, Renderer};

const SEPARATOR: &str = "────────────────────────────────";

/// Rows of the last rendered menu, shared with the prompt so `open <rank>`
/// can find the link.
pub type SharedRows = Arc<Mutex<Vec<MenuRow>>>;

/// Menu text for one tick, one entry per line.
pub fn menu_lines(model: &RenderModel) -> Vec<String> {
    let mut lines = Vec::new();

    let header = match model.badge_label() {
        Some(badge) => format!("📰 HN Pulse [{badge} new]"),
        None => "📰 HN Pulse".to_string(),
    };
    lines.push(header);
    lines.push(format!("🌐 Open Hacker News  {WEB_HOMEPAGE}"));
    lines.push(SEPARATOR.to_string());

    if model.rows.is_empty() {
        if model.is_filtered() {
            lines.push(format!(
                "🔍 No matching stories found (searched {})",
                model.fetched
            ));
            lines.push(format!("   Filters: {}", model.filters.join(", ")));
        } else {
            lines.push("No stories available".to_string());
        }
    }

    for (index, row) in model.rows.iter().enumerate() {
        if index > 0 && index % 5 == 0 {
            lines.push(SEPARATOR.to_string());
        }
        lines.push(row.label());
        lines.push(row.detail());
    }

    lines.push(SEPARATOR.to_string());
    let filters = if model.is_filtered() {
        format!("{} ({} active)", model.filters.join(", "), model.filters.len())
    } else {
        "none".to_string()
    };
    lines.push(format!(
        "⚙️  Settings: {} stories, filters: {filters}",
        model.max_display_count
    ));
    lines.push(format!(
        "   Updated {}",
        model.updated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    lines
}

/// Prints the menu to stdout, or one JSON object per tick with `json`.
pub struct TerminalRenderer {
    json: bool,
    rows: SharedRows,
}

impl TerminalRenderer {
    pub fn new(json: bool) -> Self {
        Self {
            json,
            rows: SharedRows::default(),
        }
    }

    pub fn rows(&self) -> SharedRows {
        Arc::clone(&self.rows)
    }

    fn remember(&self, rows: &[MenuRow]) {
        if let Ok(mut guard) = self.rows.lock() {
            *guard = rows.to_vec();
        }
    }
}

impl Renderer for TerminalRenderer {
    fn render_loading(&mut self) {
        if !self.json {
            println!("⏳ Loading stories...");
        }
    }

    fn render(&mut self, model: &RenderModel) {
        self.remember(&model.rows);
        if self.json {
            match serde_json::to_string(model) {
                Ok(line) => println!("{line}"),
                Err(e) => tracing::warn!("failed to encode menu: {e}"),
            }
            return;
        }

        let mut out = std::io::stdout().lock();
        for line in menu_lines(model) {
            let _ = writeln!(out, "{line}");
        }
        let _ = writeln!(out);
    }

    fn render_error(&mut self, error: &CoreError) {
        if self.json {
            let line = serde_json::json!({ "error": error.to_string() });
            println!("{line}");
        } else {
            println!("⚠️  Error loading stories: {error}");
            println!("   Will retry on the next refresh.");
        }
    }
}

/// Prints notifications and optionally opens their links in the browser.
pub struct ConsoleNotifier {
    json: bool,
    open_links: bool,
}

impl ConsoleNotifier {
    pub fn new(json: bool, open_links: bool) -> Self {
        Self { json, open_links }
    }
}

impl Notifier for ConsoleNotifier {
    fn notify(&mut self, notification: &Notification) {
        tracing::debug!(id = notification.story_id, kind = ?notification.kind, "notify");

        if self.json {
            match serde_json::to_string(notification) {
                Ok(line) => println!("{line}"),
                Err(e) => tracing::warn!("failed to encode notification: {e}"),
            }
        } else {
            println!("{}", notification.kind.heading());
            println!("  {}", notification.title);
            println!("  {}", notification.url);
        }

        if self.open_links {
            if let Err(e) = open::that(&notification.url) {
                tracing::warn!("could not open {}: {e}", notification.url);
            }
        }
    }
}
