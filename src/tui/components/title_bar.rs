//! # TitleBar Component
//!
//! Top status bar: app name, the transient status message, and a "↓ New"
//! indicator when content sits below the current scroll position.
//!
//! Stateless — all three props come from elsewhere (`status_message` from
//! core state, `has_unseen_content` from the message list) and the bar just
//! renders what it's given. A plain `Span` is enough for a one-line bar; no
//! borders, no padding.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::Span;

use crate::tui::component::Component;
use crate::tui::theme::Theme;

pub struct TitleBar {
    /// Status message (e.g., "Sending...", "Attached photo.jpg")
    pub status_message: String,
    /// Whether there's content below the current scroll position
    pub has_unseen_content: bool,
    pub theme: Theme,
}

impl TitleBar {
    pub fn new(status_message: String, has_unseen_content: bool, theme: Theme) -> Self {
        Self {
            status_message,
            has_unseen_content,
            theme,
        }
    }
}

impl Component for TitleBar {
    /// Render as a single line with conditional formatting. Priority order:
    /// the unseen-content marker always wins the right edge, the status
    /// message is dropped entirely when empty.
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let title_text = if self.has_unseen_content {
            format!("Parley | {} | ↓ New", self.status_message)
        } else if self.status_message.is_empty() {
            "Parley".to_string()
        } else {
            format!("Parley | {}", self.status_message)
        };

        frame.render_widget(
            Span::styled(title_text, Style::default().fg(self.theme.font_color)),
            area,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn render_to_text(mut title_bar: TitleBar) -> String {
        let backend = TestBackend::new(80, 1);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|f| {
                title_bar.render(f, f.area());
            })
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn test_title_bar_with_unseen_content() {
        let text = render_to_text(TitleBar::new(
            "Sending...".to_string(),
            true,
            Theme::default(),
        ));
        assert!(text.contains("Parley"));
        assert!(text.contains("Sending..."));
        assert!(text.contains("↓ New"));
    }

    #[test]
    fn test_title_bar_with_status_message() {
        let text = render_to_text(TitleBar::new(
            "Attached photo.jpg".to_string(),
            false,
            Theme::default(),
        ));
        assert!(text.contains("Parley"));
        assert!(text.contains("Attached photo.jpg"));
        assert!(!text.contains("↓ New"));
    }

    #[test]
    fn test_title_bar_default_no_status() {
        let text = render_to_text(TitleBar::new("".to_string(), false, Theme::default()));
        assert!(text.contains("Parley"));
        assert!(!text.contains('|'));
        assert!(!text.contains("↓ New"));
    }
}
