//! # AttachmentMenu Component
//!
//! The camera and photos buttons beside the composer, plus a chip showing
//! the pending attachment. Stateless: clicks are resolved by the screen
//! hit-testing against the button rects this module computes.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use unicode_width::UnicodeWidthStr;

use crate::platform::permission::AttachmentKind;
use crate::platform::picker::SelectedAsset;
use crate::tui::component::Component;
use crate::tui::theme::Theme;

pub const CAMERA_LABEL: &str = "[ camera ]";
pub const PHOTOS_LABEL: &str = "[ photos ]";
/// Columns between the buttons and around the pending chip.
const GAP: u16 = 2;

/// Total column budget for the menu inside the composer row.
pub const MENU_WIDTH: u16 = 44;

pub struct AttachmentMenu<'a> {
    pub theme: Theme,
    /// Asset waiting to ride along with the next send.
    pub pending: Option<&'a SelectedAsset>,
    /// Kind whose permission + picker flow is currently in flight.
    pub active: Option<AttachmentKind>,
}

impl<'a> AttachmentMenu<'a> {
    pub fn new(
        theme: Theme,
        pending: Option<&'a SelectedAsset>,
        active: Option<AttachmentKind>,
    ) -> Self {
        Self {
            theme,
            pending,
            active,
        }
    }

    fn label_width(label: &str) -> u16 {
        label.width() as u16
    }

    /// Screen rect of the camera button within the menu area.
    pub fn camera_rect(area: Rect) -> Rect {
        Rect::new(
            area.x,
            area.y,
            Self::label_width(CAMERA_LABEL).min(area.width),
            area.height.min(1),
        )
    }

    /// Screen rect of the photos button within the menu area.
    pub fn photos_rect(area: Rect) -> Rect {
        let x = area.x + Self::label_width(CAMERA_LABEL) + GAP;
        let width = Self::label_width(PHOTOS_LABEL);
        Rect::new(
            x.min(area.x + area.width),
            area.y,
            width.min(area.width.saturating_sub(x - area.x)),
            area.height.min(1),
        )
    }

    /// Which button (if any) a screen coordinate lands on.
    pub fn hit_test(area: Rect, column: u16, row: u16) -> Option<AttachmentKind> {
        let position = ratatui::layout::Position::new(column, row);
        if Self::camera_rect(area).contains(position) {
            Some(AttachmentKind::Camera)
        } else if Self::photos_rect(area).contains(position) {
            Some(AttachmentKind::Photo)
        } else {
            None
        }
    }

    fn button_style(&self, kind: AttachmentKind) -> Style {
        let base = Style::default().fg(self.theme.font_color);
        if self.active == Some(kind) {
            base.add_modifier(Modifier::REVERSED)
        } else {
            base
        }
    }
}

impl<'a> Component for AttachmentMenu<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let mut spans = vec![
            Span::styled(CAMERA_LABEL, self.button_style(AttachmentKind::Camera)),
            Span::raw(" ".repeat(GAP as usize)),
            Span::styled(PHOTOS_LABEL, self.button_style(AttachmentKind::Photo)),
        ];

        if let Some(asset) = self.pending {
            let used = Self::label_width(CAMERA_LABEL) + GAP + Self::label_width(PHOTOS_LABEL) + GAP;
            let budget = area.width.saturating_sub(used) as usize;
            let chip = truncate_display(&format!("+ {}", asset.file_name), budget);
            if !chip.is_empty() {
                spans.push(Span::raw(" ".repeat(GAP as usize)));
                spans.push(Span::styled(chip, Style::default().fg(self.theme.status)));
            }
        }

        frame.render_widget(Line::from(spans), area);
    }
}

/// Truncate a string to a display-column budget, appending `…` when cut.
fn truncate_display(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }
    if max_width == 0 {
        return String::new();
    }

    let mut out = String::new();
    let mut used = 0usize;
    for c in s.chars() {
        let w = unicode_width::UnicodeWidthChar::width(c).unwrap_or(0);
        if used + w > max_width.saturating_sub(1) {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    out
}
