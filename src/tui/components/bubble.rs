//! # ChatBubble Component
//!
//! Renders a single chat message. The sender header (name + time) appears
//! only when the message starts a sender group; grouped follow-ups render
//! as a bare bubble, which is the visual grouping.
//!
//! `calculate_height` predicts rendered height with `textwrap` options that
//! match Ratatui's `Paragraph` wrapping, so the parent `MessageList` can lay
//! out scroll positions without rendering anything.

use chrono::Local;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Padding, Paragraph, Widget, Wrap};

use crate::core::chat::ChatMessage;
use crate::tui::component::Component;
use crate::tui::theme::Theme;

/// Horizontal padding (per side) between the border and text content.
const CONTENT_PAD_H: u16 = 1;
/// Total horizontal space consumed by borders (1 left + 1 right) and padding.
const HORIZONTAL_OVERHEAD: u16 = 2 + CONTENT_PAD_H * 2;
/// Total vertical space consumed by borders (1 top + 1 bottom).
const VERTICAL_OVERHEAD: u16 = 2;

/// Transient component: created fresh each frame with the data it needs.
/// Hover state is tracked by the parent `MessageList` and passed in.
#[derive(Clone)]
pub struct ChatBubble<'a> {
    pub message: &'a ChatMessage,
    /// Whether this message starts a sender group (shows the header).
    pub first_in_group: bool,
    pub is_hovered: bool,
    pub theme: Theme,
}

impl<'a> ChatBubble<'a> {
    pub fn new(
        message: &'a ChatMessage,
        first_in_group: bool,
        is_hovered: bool,
        theme: Theme,
    ) -> Self {
        Self {
            message,
            first_in_group,
            is_hovered,
            theme,
        }
    }

    /// Calculate the height required for this message at the given width.
    ///
    /// The wrapping options must match the Ratatui default for `Paragraph`
    /// to keep a 1:1 mapping between calculated and actual height. The
    /// header lives in the top border, so grouping never changes height;
    /// an attachment adds one line.
    pub fn calculate_height(message: &ChatMessage, width: u16) -> u16 {
        let content_width = width.saturating_sub(HORIZONTAL_OVERHEAD);
        if content_width == 0 {
            // Terminal too narrow for borders + padding; still occupy a row.
            return 1;
        }

        let attachment_lines = u16::from(message.attachment.is_some());
        let content = message.body.trim();
        if content.is_empty() {
            return attachment_lines + VERTICAL_OVERHEAD;
        }

        let options = textwrap::Options::new(content_width as usize)
            .break_words(true)
            .word_separator(textwrap::WordSeparator::AsciiSpace);

        let lines = textwrap::wrap(content, options);
        (lines.len() as u16).max(1) + attachment_lines + VERTICAL_OVERHEAD
    }
}

impl<'a> Widget for ChatBubble<'a> {
    fn render(self, area: Rect, buf: &mut ratatui::buffer::Buffer) {
        let text_style = Style::default().fg(self.theme.font_color);

        let border_style = if self.is_hovered {
            Style::default().fg(self.theme.line_color)
        } else {
            Style::default()
                .fg(self.theme.line_color)
                .add_modifier(Modifier::DIM)
        };

        let mut block = Block::bordered()
            .border_type(ratatui::widgets::BorderType::Rounded)
            .border_style(border_style)
            .padding(Padding::horizontal(CONTENT_PAD_H));

        if self.first_in_group {
            let header = Line::from(vec![
                Span::styled(
                    self.message.sender.display_name.clone(),
                    text_style.add_modifier(Modifier::BOLD),
                ),
                Span::raw(" "),
                Span::styled(
                    self.message
                        .sent_at
                        .with_timezone(&Local)
                        .format("%H:%M")
                        .to_string(),
                    Style::default().fg(self.theme.status),
                ),
            ]);
            block = block.title(header);
        }

        let inner_area = block.inner(area);
        block.render(area, buf);

        let content = self.message.body.trim();
        let mut text = if content.is_empty() {
            Text::default()
        } else {
            Text::from(content)
        };

        if let Some(asset) = &self.message.attachment {
            text.push_line(Line::styled(
                format!("[img] {}", asset.file_name),
                Style::default().fg(self.theme.status),
            ));
        }

        let paragraph = Paragraph::new(text)
            .style(text_style)
            .wrap(Wrap { trim: true });

        paragraph.render(inner_area, buf);
    }
}

/// `ChatBubble` is stateless; the `&mut self` required by the trait only
/// delegates to the [`Widget`] implementation.
impl<'a> Component for ChatBubble<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        frame.render_widget(self.clone(), area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::chat::Participant;
    use crate::test_support::test_asset;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn make_message(body: &str) -> ChatMessage {
        ChatMessage::outgoing(
            Participant::new("7", "casey"),
            body.to_string(),
            None,
        )
    }

    fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    // ==========================================================================
    // calculate_height tests
    // ==========================================================================

    #[test]
    fn calculate_height_empty_body_returns_border_height() {
        let message = make_message("");
        assert_eq!(ChatBubble::calculate_height(&message, 80), VERTICAL_OVERHEAD);
    }

    #[test]
    fn calculate_height_zero_width_returns_minimum() {
        let message = make_message("Hello world");
        assert_eq!(ChatBubble::calculate_height(&message, 0), 1);
    }

    #[test]
    fn calculate_height_single_line_fits() {
        let message = make_message("Hello");
        assert_eq!(
            ChatBubble::calculate_height(&message, 80),
            1 + VERTICAL_OVERHEAD
        );
    }

    #[test]
    fn calculate_height_wraps_at_width_boundary() {
        // "Hello world" = 11 chars, width 9 → content_width = 5
        // Wraps to: "Hello" | "world" = 2 lines
        let message = make_message("Hello world");
        assert_eq!(
            ChatBubble::calculate_height(&message, 9),
            2 + VERTICAL_OVERHEAD
        );
    }

    #[test]
    fn calculate_height_breaks_long_words() {
        // "abcdefghij" = 10 chars, width 8 → content_width = 4 → 3 lines
        let message = make_message("abcdefghij");
        assert_eq!(
            ChatBubble::calculate_height(&message, 8),
            3 + VERTICAL_OVERHEAD
        );
    }

    #[test]
    fn calculate_height_attachment_adds_a_line() {
        let mut message = make_message("Hello");
        message.attachment = Some(test_asset("photo.jpg"));
        assert_eq!(
            ChatBubble::calculate_height(&message, 80),
            2 + VERTICAL_OVERHEAD
        );
    }

    // ==========================================================================
    // Render tests
    // ==========================================================================

    #[test]
    fn group_start_shows_the_sender_header() {
        let backend = TestBackend::new(40, 4);
        let mut terminal = Terminal::new(backend).unwrap();
        let message = make_message("hi");

        terminal
            .draw(|f| {
                let mut bubble = ChatBubble::new(&message, true, false, Theme::default());
                Component::render(&mut bubble, f, f.area());
            })
            .unwrap();

        assert!(buffer_text(&terminal).contains("casey"));
    }

    #[test]
    fn grouped_message_suppresses_the_header() {
        let backend = TestBackend::new(40, 4);
        let mut terminal = Terminal::new(backend).unwrap();
        let message = make_message("hi");

        terminal
            .draw(|f| {
                let mut bubble = ChatBubble::new(&message, false, false, Theme::default());
                Component::render(&mut bubble, f, f.area());
            })
            .unwrap();

        let text = buffer_text(&terminal);
        assert!(!text.contains("casey"));
        assert!(text.contains("hi"));
    }

    #[test]
    fn attachment_renders_its_file_name() {
        let backend = TestBackend::new(40, 5);
        let mut terminal = Terminal::new(backend).unwrap();
        let mut message = make_message("look");
        message.attachment = Some(test_asset("photo.jpg"));

        terminal
            .draw(|f| {
                let mut bubble = ChatBubble::new(&message, true, false, Theme::default());
                Component::render(&mut bubble, f, f.area());
            })
            .unwrap();

        assert!(buffer_text(&terminal).contains("[img] photo.jpg"));
    }
}
