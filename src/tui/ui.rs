//! # Screen Layout
//!
//! Composes the chat screen each frame: title bar / message list /
//! composer row (attachment buttons, input, send button). Also owns the
//! hit-test helpers that map mouse coordinates back onto messages and
//! controls, using the same layout math as the draw pass.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Position, Rect};
use ratatui::style::Style;
use ratatui::widgets::Block;

use crate::core::state::App;
use crate::core::strings::{self, StringKey};
use crate::tui::TuiState;
use crate::tui::component::Component;
use crate::tui::components::attachment_menu::{AttachmentMenu, MENU_WIDTH};
use crate::tui::components::send_button::{SEND_BUTTON_WIDTH, SendButton};
use crate::tui::components::{MessageList, TitleBar};
use crate::tui::theme::Theme;

/// Clickable controls in the composer row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlHit {
    Camera,
    Photos,
    Send,
}

/// The screen's resolved sub-areas for one frame.
pub struct ScreenAreas {
    pub title: Rect,
    pub messages: Rect,
    /// Single row for the attachment buttons, vertically centered in the
    /// composer row.
    pub menu: Rect,
    pub input: Rect,
    pub send: Rect,
}

/// Width available to the composer input column for a given frame width.
pub fn input_column_width(frame_width: u16) -> u16 {
    frame_width.saturating_sub(MENU_WIDTH + SEND_BUTTON_WIDTH)
}

/// Split the frame. `composer_height` is dynamic (the draft grows the row),
/// so hit tests must be given the same value the draw pass used.
pub fn screen_areas(frame_area: Rect, composer_height: u16) -> ScreenAreas {
    use Constraint::{Length, Min};
    let layout = Layout::vertical([Length(1), Min(0), Length(composer_height)]);
    let [title, messages, composer_row] = layout.areas(frame_area);

    let row_layout =
        Layout::horizontal([Length(MENU_WIDTH), Min(0), Length(SEND_BUTTON_WIDTH)]);
    let [menu_col, input, send] = row_layout.areas(composer_row);

    let menu = Rect::new(
        menu_col.x,
        menu_col.y + menu_col.height / 2,
        menu_col.width,
        menu_col.height.min(1),
    );

    ScreenAreas {
        title,
        messages,
        menu,
        input,
        send,
    }
}

pub fn draw_ui(frame: &mut Frame, app: &App, tui: &mut TuiState, theme: Theme, spinner_frame: usize) {
    // Themed background behind everything
    frame.render_widget(
        Block::default().style(Style::default().bg(theme.background)),
        frame.area(),
    );

    let composer_height = tui
        .composer
        .calculate_height(input_column_width(frame.area().width));
    let areas = screen_areas(frame.area(), composer_height);

    let mut title_bar = TitleBar::new(
        app.status_message.clone(),
        tui.message_list.has_unseen_content,
        theme,
    );
    title_bar.render(frame, areas.title);

    let mut list = MessageList::new(
        &mut tui.message_list,
        &app.log,
        theme,
        strings::get(StringKey::NoContent),
    );
    list.render(frame, areas.messages);

    let mut menu = AttachmentMenu::new(theme, app.pending_attachment.as_ref(), tui.active_flow);
    menu.render(frame, areas.menu);

    tui.composer.render(frame, areas.input);

    let mut send = SendButton::new(
        strings::get(StringKey::Send),
        app.is_sending,
        spinner_frame,
        theme,
    );
    send.render(frame, areas.send);
}

/// Hit test: which message index (if any) sits at the given screen row.
pub fn hit_test_message(
    screen_y: u16,
    frame_area: Rect,
    scroll_offset_y: u16,
    prefix_heights: &[u16],
    composer_height: u16,
) -> Option<usize> {
    let areas = screen_areas(frame_area, composer_height);
    let messages = areas.messages;

    if screen_y < messages.y || screen_y >= messages.y + messages.height {
        return None;
    }

    // Convert screen Y to content Y (accounting for scroll)
    let content_y = (screen_y - messages.y) + scroll_offset_y;

    // prefix_heights[i] is the content Y where message i ends
    let index = prefix_heights.partition_point(|&end| end <= content_y);
    (index < prefix_heights.len()).then_some(index)
}

/// Hit test: which composer-row control (if any) a click lands on.
pub fn hit_test_controls(
    column: u16,
    row: u16,
    frame_area: Rect,
    composer_height: u16,
) -> Option<ControlHit> {
    let areas = screen_areas(frame_area, composer_height);

    if let Some(kind) = AttachmentMenu::hit_test(areas.menu, column, row) {
        return Some(match kind {
            crate::platform::permission::AttachmentKind::Camera => ControlHit::Camera,
            crate::platform::permission::AttachmentKind::Photo => ControlHit::Photos,
        });
    }

    if areas.send.contains(Position::new(column, row)) {
        return Some(ControlHit::Send);
    }

    None
}
