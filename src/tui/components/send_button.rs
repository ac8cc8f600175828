//! # SendButton Component
//!
//! The send control beside the composer. Shows the `Send` label, or a
//! spinner frame for as long as a send is in flight. Stateless — the
//! screen hit-tests clicks against the button's rect.

use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::widgets::{Block, Paragraph};

use crate::tui::component::Component;
use crate::tui::theme::Theme;

/// Column budget for the button in the composer row.
pub const SEND_BUTTON_WIDTH: u16 = 10;

const SPINNER_FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

pub struct SendButton<'a> {
    /// Button label from the string table.
    pub label: &'a str,
    pub is_sending: bool,
    pub spinner_frame: usize,
    pub theme: Theme,
}

impl<'a> SendButton<'a> {
    pub fn new(label: &'a str, is_sending: bool, spinner_frame: usize, theme: Theme) -> Self {
        Self {
            label,
            is_sending,
            spinner_frame,
            theme,
        }
    }
}

impl<'a> Component for SendButton<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let block = Block::bordered()
            .border_type(ratatui::widgets::BorderType::Rounded)
            .border_style(Style::default().fg(self.theme.line_color));

        let content = if self.is_sending {
            Paragraph::new(SPINNER_FRAMES[self.spinner_frame % SPINNER_FRAMES.len()])
                .style(Style::default().fg(self.theme.status))
        } else {
            Paragraph::new(self.label).style(
                Style::default()
                    .fg(self.theme.font_color)
                    .add_modifier(Modifier::BOLD),
            )
        };

        frame.render_widget(content.alignment(Alignment::Center).block(block), area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn idle_button_shows_the_label() {
        let backend = TestBackend::new(SEND_BUTTON_WIDTH, 3);
        let mut terminal = Terminal::new(backend).unwrap();

        terminal
            .draw(|f| {
                let mut button = SendButton::new("Send", false, 0, Theme::default());
                button.render(f, f.area());
            })
            .unwrap();

        assert!(buffer_text(&terminal).contains("Send"));
    }

    #[test]
    fn sending_button_shows_the_spinner_instead() {
        let backend = TestBackend::new(SEND_BUTTON_WIDTH, 3);
        let mut terminal = Terminal::new(backend).unwrap();

        terminal
            .draw(|f| {
                let mut button = SendButton::new("Send", true, 3, Theme::default());
                button.render(f, f.area());
            })
            .unwrap();

        let text = buffer_text(&terminal);
        assert!(!text.contains("Send"));
        assert!(text.contains(SPINNER_FRAMES[3]));
    }
}
