//! # Composer Component
//!
//! The draft-message input: captures text, shows the placeholder while
//! empty, and emits the drafted text on submit.
//!
//! ## State Management
//!
//! The buffer is internal state. The placeholder string and theme are
//! props from the screen. Cursor position and scroll state are
//! encapsulated in `CursorState`.

mod cursor;
mod text_wrap;

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::widgets::{Block, Paragraph};

use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;
use crate::tui::theme::Theme;

use cursor::CursorState;
use text_wrap::{
    MAX_VISIBLE_LINES, VERTICAL_OVERHEAD, inner_width, next_char_boundary, prev_char_boundary,
    wrap_line_count, wrap_options,
};

/// High-level events emitted by the Composer
#[derive(Debug, Clone, PartialEq)]
pub enum ComposerEvent {
    /// User submitted the draft (Enter pressed, draft non-empty)
    Submit(String),
    /// Draft content changed (synchronous with the keystroke)
    ContentChanged,
}

/// Text input component for drafting messages.
///
/// # Props
///
/// - `placeholder`: shown in the theme's status color while the draft is empty
/// - `theme`: colors for text, border, and placeholder
///
/// # State
///
/// - `buffer`: current draft text
/// - `cursor`: cursor position, scroll offset, and cached width
pub struct Composer {
    /// Draft buffer (Internal State)
    pub buffer: String,
    /// Placeholder shown while the buffer is empty (Prop)
    pub placeholder: String,
    /// Colors (Prop)
    pub theme: Theme,
    /// Cursor and scroll tracking
    cursor: CursorState,
}

impl Composer {
    pub fn new(placeholder: String, theme: Theme) -> Self {
        Self {
            buffer: String::new(),
            placeholder,
            theme,
            cursor: CursorState::new(),
        }
    }

    /// Calculate required height for the current draft, clamped to viewport
    /// limits. Returns a value in
    /// [1 + VERTICAL_OVERHEAD, MAX_VISIBLE_LINES + VERTICAL_OVERHEAD].
    pub fn calculate_height(&self, content_width: u16) -> u16 {
        let width = inner_width(content_width);
        let content_lines = wrap_line_count(&self.buffer, width);
        let visible_lines = content_lines.min(MAX_VISIBLE_LINES);
        visible_lines + VERTICAL_OVERHEAD
    }

    /// Take the whole draft and reset the cursor. Used when the send button
    /// is clicked (Enter goes through `handle_event` instead).
    pub fn take_buffer(&mut self) -> String {
        self.cursor.reset();
        std::mem::take(&mut self.buffer)
    }

    /// Get the visible text based on current scroll offset.
    /// When scroll_offset > 0, only returns the visible lines.
    fn get_visible_text(&self, content_width: u16) -> String {
        if self.cursor.scroll_offset == 0 {
            return self.buffer.clone();
        }

        let width = inner_width(content_width);
        if width == 0 {
            return String::new();
        }

        let lines = textwrap::wrap(&self.buffer, wrap_options(width));

        let start = self.cursor.scroll_offset as usize;
        let end = (start + MAX_VISIBLE_LINES as usize).min(lines.len());

        lines[start..end].join("\n")
    }

    /// Render scrollbar when content exceeds visible area
    fn render_scrollbar(&self, frame: &mut Frame, area: Rect) {
        use ratatui::widgets::{Scrollbar, ScrollbarOrientation, ScrollbarState};

        let width = inner_width(area.width);
        let total_lines = wrap_line_count(&self.buffer, width);

        if total_lines <= MAX_VISIBLE_LINES {
            return;
        }

        // ScrollbarState content_length is max scrollable position, not total items
        let max_scroll = total_lines.saturating_sub(MAX_VISIBLE_LINES);

        let mut scrollbar_state = ScrollbarState::default()
            .content_length(max_scroll as usize)
            .position(self.cursor.scroll_offset as usize);

        let scrollbar_area = Rect {
            x: area.x + area.width.saturating_sub(1),
            y: area.y + 1,
            width: 1,
            height: area.height.saturating_sub(2),
        };

        frame.render_stateful_widget(
            Scrollbar::new(ScrollbarOrientation::VerticalRight),
            scrollbar_area,
            &mut scrollbar_state,
        );
    }
}

impl Component for Composer {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        self.cursor.last_content_width = area.width;
        self.cursor.update_scroll_offset(&self.buffer, area.width);

        let block = Block::bordered()
            .border_type(ratatui::widgets::BorderType::Rounded)
            .border_style(Style::default().fg(self.theme.line_color));

        let input = if self.buffer.is_empty() {
            // Placeholder in the status color until the first keystroke
            Paragraph::new(self.placeholder.as_str())
                .block(block)
                .style(Style::default().fg(self.theme.status))
        } else {
            Paragraph::new(self.get_visible_text(area.width))
                .block(block)
                .style(Style::default().fg(self.theme.font_color))
        };

        frame.render_widget(input, area);
        self.render_scrollbar(frame, area);

        let (cursor_x, cursor_y) = self.cursor.screen_pos(&self.buffer, area);
        frame.set_cursor_position((cursor_x, cursor_y));
    }
}

impl EventHandler for Composer {
    type Event = ComposerEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::InputChar(c) => {
                self.buffer.insert(self.cursor.pos, *c);
                self.cursor.pos += c.len_utf8();
                Some(ComposerEvent::ContentChanged)
            }
            TuiEvent::Paste(text) => {
                self.buffer.insert_str(self.cursor.pos, text);
                self.cursor.pos += text.len();
                Some(ComposerEvent::ContentChanged)
            }
            TuiEvent::Backspace => {
                if self.cursor.pos > 0 {
                    let prev = prev_char_boundary(&self.buffer, self.cursor.pos);
                    self.buffer.drain(prev..self.cursor.pos);
                    self.cursor.pos = prev;
                    Some(ComposerEvent::ContentChanged)
                } else {
                    None
                }
            }
            TuiEvent::Delete => {
                if self.cursor.pos < self.buffer.len() {
                    let next = next_char_boundary(&self.buffer, self.cursor.pos);
                    self.buffer.drain(self.cursor.pos..next);
                    Some(ComposerEvent::ContentChanged)
                } else {
                    None
                }
            }
            TuiEvent::CursorLeft => {
                if self.cursor.pos > 0 {
                    self.cursor.pos = prev_char_boundary(&self.buffer, self.cursor.pos);
                    Some(ComposerEvent::ContentChanged)
                } else {
                    None
                }
            }
            TuiEvent::CursorRight => {
                if self.cursor.pos < self.buffer.len() {
                    self.cursor.pos = next_char_boundary(&self.buffer, self.cursor.pos);
                    Some(ComposerEvent::ContentChanged)
                } else {
                    None
                }
            }
            TuiEvent::CursorHome => {
                let line_start = self.buffer[..self.cursor.pos]
                    .rfind('\n')
                    .map(|i| i + 1)
                    .unwrap_or(0);
                (self.cursor.pos != line_start).then(|| {
                    self.cursor.pos = line_start;
                    ComposerEvent::ContentChanged
                })
            }
            TuiEvent::CursorEnd => {
                let line_end = self.buffer[self.cursor.pos..]
                    .find('\n')
                    .map(|i| self.cursor.pos + i)
                    .unwrap_or(self.buffer.len());
                (self.cursor.pos != line_end).then(|| {
                    self.cursor.pos = line_end;
                    ComposerEvent::ContentChanged
                })
            }
            TuiEvent::Submit => {
                if !self.buffer.trim().is_empty() {
                    let text = std::mem::take(&mut self.buffer);
                    self.cursor.reset();
                    Some(ComposerEvent::Submit(text))
                } else {
                    None
                }
            }
            TuiEvent::CursorUp => self
                .cursor
                .move_vertically(&self.buffer, -1, self.cursor.last_content_width)
                .then_some(ComposerEvent::ContentChanged),
            TuiEvent::CursorDown => self
                .cursor
                .move_vertically(&self.buffer, 1, self.cursor.last_content_width)
                .then_some(ComposerEvent::ContentChanged),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::strings::{self, StringKey};
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn composer() -> Composer {
        Composer::new(
            strings::get(StringKey::WriteMessage).to_string(),
            Theme::default(),
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

    #[test]
    fn test_composer_new() {
        let input = composer();
        assert!(input.buffer.is_empty());
    }

    #[test]
    fn draft_updates_are_synchronous() {
        let mut input = composer();

        let res = input.handle_event(&TuiEvent::InputChar('a'));
        assert_eq!(res, Some(ComposerEvent::ContentChanged));
        assert_eq!(input.buffer, "a");

        let res = input.handle_event(&TuiEvent::InputChar('b'));
        assert_eq!(res, Some(ComposerEvent::ContentChanged));
        assert_eq!(input.buffer, "ab");

        let res = input.handle_event(&TuiEvent::Backspace);
        assert_eq!(res, Some(ComposerEvent::ContentChanged));
        assert_eq!(input.buffer, "a");
    }

    #[test]
    fn submit_emits_the_draft_and_clears_it() {
        let mut input = composer();
        input.buffer = "hello".to_string();

        let res = input.handle_event(&TuiEvent::Submit);
        match res {
            Some(ComposerEvent::Submit(text)) => assert_eq!(text, "hello"),
            _ => panic!("Expected Submit event"),
        }

        assert!(input.buffer.is_empty(), "Buffer should be cleared after submit");
    }

    #[test]
    fn empty_draft_does_not_submit() {
        let mut input = composer();
        input.buffer = "   ".to_string();
        assert_eq!(input.handle_event(&TuiEvent::Submit), None);
    }

    #[test]
    fn take_buffer_drains_and_resets() {
        let mut input = composer();
        input.handle_event(&TuiEvent::InputChar('h'));
        input.handle_event(&TuiEvent::InputChar('i'));

        assert_eq!(input.take_buffer(), "hi");
        assert!(input.buffer.is_empty());
        // Cursor is back at the start: backspace has nothing to delete
        assert_eq!(input.handle_event(&TuiEvent::Backspace), None);
    }

    #[test]
    fn placeholder_renders_while_empty() {
        let backend = TestBackend::new(40, 3);
        let mut terminal = Terminal::new(backend).unwrap();
        let mut input = composer();

        terminal
            .draw(|f| {
                input.render(f, f.area());
            })
            .unwrap();

        assert!(buffer_text(&terminal).contains("Write a message"));
    }

    #[test]
    fn typed_text_replaces_the_placeholder() {
        let backend = TestBackend::new(40, 3);
        let mut terminal = Terminal::new(backend).unwrap();
        let mut input = composer();
        input.handle_event(&TuiEvent::InputChar('y'));
        input.handle_event(&TuiEvent::InputChar('o'));

        terminal
            .draw(|f| {
                input.render(f, f.area());
            })
            .unwrap();

        let text = buffer_text(&terminal);
        assert!(text.contains("yo"));
        assert!(!text.contains("Write a message"));
    }
}
