//! # TUI Adapter
//!
//! The ratatui-specific layer. Handles terminal I/O, renders the chat
//! screen, and translates keyboard/mouse events into `core::Action` values.
//! This is the only module that knows about ratatui and crossterm.
//!
//! ## Redraw Strategy
//!
//! The event loop uses conditional redraw to avoid unnecessary work:
//!
//! - **Animating** (send spinner, attachment flow in flight): draws every
//!   ~80ms for smooth animation.
//! - **Idle**: sleeps up to 500ms, only redraws on events or resize.
//!
//! ## Attachment flows
//!
//! Each permission + picker sequence runs as one cancellable task keyed by
//! its request kind. A second press for the same kind supersedes (aborts)
//! the in-flight task instead of racing it; Escape aborts everything in
//! flight. Results come back over the action channel.

mod component;
mod components;
mod event;
pub mod theme;
mod ui;

use log::{debug, info, warn};
use std::collections::HashMap;
use std::io::stdout;
use std::sync::{Arc, mpsc};

use crossterm::cursor::{Hide, SetCursorStyle, Show};
use crossterm::event::{
    DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
};
use crossterm::execute;

use crate::core::action::{Action, Effect, update};
use crate::core::config::ResolvedConfig;
use crate::core::state::App;
use crate::core::strings::{self, StringKey};
use crate::platform::permission::{
    AttachmentKind, HostPermissionGate, PermissionGate, PermissionStatus,
};
use crate::platform::picker::{AttachmentPicker, HostPicker, PickerOptions};
use crate::tui::component::EventHandler;
use crate::tui::components::{Composer, ComposerEvent, MessageListState};
use crate::tui::event::{TuiEvent, poll_event_immediate, poll_event_timeout};
use crate::tui::theme::Theme;

/// TUI-specific presentation state (not part of core business logic)
pub struct TuiState {
    // Persistent component states
    pub message_list: MessageListState,
    pub composer: Composer,
    /// Kind of the most recently started attachment flow still in flight
    /// (drives the button highlight).
    pub active_flow: Option<AttachmentKind>,
}

impl TuiState {
    pub fn new(theme: Theme) -> Self {
        Self {
            message_list: MessageListState::new(),
            composer: Composer::new(strings::get(StringKey::WriteMessage).to_string(), theme),
            active_flow: None,
        }
    }

    #[cfg(test)]
    pub fn new_for_test() -> Self {
        Self::new(Theme::default())
    }
}

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> std::io::Result<Self> {
        execute!(
            stdout(),
            EnableMouseCapture,
            EnableBracketedPaste,
            Show,                        // Show cursor for input editing
            SetCursorStyle::SteadyBlock, // Non-blinking: avoids blink timer reset from continuous redraws
        )?;
        info!("Terminal modes enabled (mouse, bracketed paste, steady block cursor)");
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(
            stdout(),
            DisableMouseCapture,
            DisableBracketedPaste,
            Hide // Hide cursor on exit
        );
    }
}

/// Build the host platform seams from a resolved config.
pub fn build_platform(
    config: &ResolvedConfig,
) -> (Arc<dyn PermissionGate>, Arc<dyn AttachmentPicker>) {
    (
        Arc::new(HostPermissionGate::new(config)),
        Arc::new(HostPicker::new(config)),
    )
}

pub fn run(config: ResolvedConfig, theme: Theme) -> std::io::Result<()> {
    let (gate, picker) = build_platform(&config);
    let mut app = App::from_config(&config);
    let mut tui = TuiState::new(theme);

    let mut terminal = ratatui::init();
    let _terminal_mode_guard = TerminalModeGuard::new();

    // Channel for actions from background tasks
    let (tx, rx) = mpsc::channel();

    // In-flight attachment flows, keyed by request kind
    let mut flow_handles: HashMap<AttachmentKind, tokio::task::JoinHandle<()>> = HashMap::new();

    // Animation timer
    let start_time = std::time::Instant::now();
    let mut needs_redraw = true; // Force first frame

    loop {
        // Drop finished flows so the highlight and animation settle
        flow_handles.retain(|_, handle| !handle.is_finished());
        tui.active_flow = match tui.active_flow {
            Some(kind) if flow_handles.contains_key(&kind) => Some(kind),
            _ => flow_handles.keys().next().copied(),
        };

        let animating = app.is_sending || !flow_handles.is_empty();
        if animating {
            needs_redraw = true;
        }

        // Only draw when something changed
        if needs_redraw {
            let elapsed = start_time.elapsed().as_secs_f32();
            let spinner_frame = (elapsed * 12.0) as usize;
            terminal.draw(|f| ui::draw_ui(f, &app, &mut tui, theme, spinner_frame))?;
            needs_redraw = false;
        }

        // Dynamic poll timeout: short when animating (~12fps), long when idle
        let timeout = if animating {
            std::time::Duration::from_millis(80)
        } else {
            std::time::Duration::from_millis(500)
        };
        let first_event = poll_event_timeout(timeout);

        // Process first event + drain ALL pending events before next draw
        let mut should_quit = false;
        if first_event.is_some() {
            needs_redraw = true;
        }
        for event in first_event
            .into_iter()
            .chain(std::iter::from_fn(poll_event_immediate))
        {
            // Resize just needs a redraw (already flagged above)
            if matches!(event, TuiEvent::Resize) {
                continue;
            }

            // ForceQuit (Ctrl+C) always quits
            if matches!(event, TuiEvent::ForceQuit) {
                if update(&mut app, Action::Quit) == Effect::Quit {
                    should_quit = true;
                }
                continue;
            }

            // Escape cancels any in-flight attachment flow
            if matches!(event, TuiEvent::Escape) {
                for (kind, handle) in flow_handles.drain() {
                    handle.abort();
                    debug!("cancelled {} flow", kind.label());
                }
                tui.active_flow = None;
                continue;
            }

            let frame_area = terminal.get_frame().area();
            let composer_height = tui
                .composer
                .calculate_height(ui::input_column_width(frame_area.width));

            // Mouse hover over messages
            if let TuiEvent::MouseMove(_col, row) = event {
                let scroll_offset = tui.message_list.scroll_state.offset().y;
                tui.message_list.hovered_index = ui::hit_test_message(
                    row,
                    frame_area,
                    scroll_offset,
                    &tui.message_list.layout.prefix_heights,
                    composer_height,
                );
                continue;
            }

            // Mouse click — attachment buttons and the send button
            if let TuiEvent::MouseClick(col, row) = event {
                match ui::hit_test_controls(col, row, frame_area, composer_height) {
                    Some(ui::ControlHit::Camera) => {
                        let effect = update(&mut app, Action::RequestAttachment(AttachmentKind::Camera));
                        start_flow_if_needed(effect, &mut flow_handles, &mut tui, &gate, &picker, &tx);
                    }
                    Some(ui::ControlHit::Photos) => {
                        let effect = update(&mut app, Action::RequestAttachment(AttachmentKind::Photo));
                        start_flow_if_needed(effect, &mut flow_handles, &mut tui, &gate, &picker, &tx);
                    }
                    Some(ui::ControlHit::Send) => {
                        if !app.is_sending && !tui.composer.buffer.trim().is_empty() {
                            let text = tui.composer.take_buffer();
                            if let Effect::DeliverMessage(id) = update(&mut app, Action::Submit(text)) {
                                spawn_delivery(id, tx.clone());
                            }
                        }
                    }
                    None => {}
                }
                continue;
            }

            // Scroll events always go to the message list
            if matches!(
                event,
                TuiEvent::ScrollUp
                    | TuiEvent::ScrollDown
                    | TuiEvent::ScrollPageUp
                    | TuiEvent::ScrollPageDown
            ) {
                tui.message_list.handle_event(&event);
                continue;
            }

            // Attachment shortcuts
            if matches!(event, TuiEvent::OpenLibrary) {
                let effect = update(&mut app, Action::RequestAttachment(AttachmentKind::Photo));
                start_flow_if_needed(effect, &mut flow_handles, &mut tui, &gate, &picker, &tx);
                continue;
            }
            if matches!(event, TuiEvent::CaptureCamera) {
                let effect = update(&mut app, Action::RequestAttachment(AttachmentKind::Camera));
                start_flow_if_needed(effect, &mut flow_handles, &mut tui, &gate, &picker, &tx);
                continue;
            }

            // While a send is in flight, swallow Enter so the draft survives
            if matches!(event, TuiEvent::Submit) && app.is_sending {
                continue;
            }

            // Composer handles everything else
            if let Some(composer_event) = tui.composer.handle_event(&event) {
                match composer_event {
                    ComposerEvent::Submit(text) => {
                        if let Effect::DeliverMessage(id) = update(&mut app, Action::Submit(text)) {
                            spawn_delivery(id, tx.clone());
                        }
                    }
                    ComposerEvent::ContentChanged => {}
                }
            }
        }

        // Handle background task actions (attachment flows, delivery)
        while let Ok(action) = rx.try_recv() {
            needs_redraw = true;
            debug!("Event loop received: {:?}", action);
            match update(&mut app, action) {
                Effect::Quit => should_quit = true,
                Effect::StartAttachmentFlow(kind) => {
                    supersede_flow(kind, &mut flow_handles, &mut tui, &gate, &picker, &tx);
                }
                Effect::DeliverMessage(id) => spawn_delivery(id, tx.clone()),
                Effect::None => {}
            }
        }

        if should_quit {
            break;
        }
    }

    // Abandon any in-flight flows before tearing the terminal down
    for (_, handle) in flow_handles.drain() {
        handle.abort();
    }

    ratatui::restore();
    Ok(())
}

fn start_flow_if_needed(
    effect: Effect,
    flow_handles: &mut HashMap<AttachmentKind, tokio::task::JoinHandle<()>>,
    tui: &mut TuiState,
    gate: &Arc<dyn PermissionGate>,
    picker: &Arc<dyn AttachmentPicker>,
    tx: &mpsc::Sender<Action>,
) {
    if let Effect::StartAttachmentFlow(kind) = effect {
        supersede_flow(kind, flow_handles, tui, gate, picker, tx);
    }
}

/// Start the flow for `kind`, aborting any in-flight flow of the same kind.
fn supersede_flow(
    kind: AttachmentKind,
    flow_handles: &mut HashMap<AttachmentKind, tokio::task::JoinHandle<()>>,
    tui: &mut TuiState,
    gate: &Arc<dyn PermissionGate>,
    picker: &Arc<dyn AttachmentPicker>,
    tx: &mpsc::Sender<Action>,
) {
    let handle = spawn_attachment_flow(kind, gate.clone(), picker.clone(), tx.clone());
    if let Some(previous) = flow_handles.insert(kind, handle) {
        previous.abort();
        info!("superseded in-flight {} flow", kind.label());
    }
    tui.active_flow = Some(kind);
}

/// One cancellable permission + picker round-trip.
///
/// Sends `Action::AttachmentPicked` only on success; denial and
/// cancellation are silent no-ops (logged, no state change).
pub fn spawn_attachment_flow(
    kind: AttachmentKind,
    gate: Arc<dyn PermissionGate>,
    picker: Arc<dyn AttachmentPicker>,
    tx: mpsc::Sender<Action>,
) -> tokio::task::JoinHandle<()> {
    info!("Spawning attachment flow: {}", kind.label());
    tokio::spawn(async move {
        let status = gate.request(kind).await;
        if status != PermissionStatus::Granted {
            debug!("{} permission not granted ({:?}), stopping", kind.label(), status);
            return;
        }

        let options = PickerOptions::images();
        let result = match kind {
            AttachmentKind::Photo => picker.launch_library(options).await,
            AttachmentKind::Camera => picker.launch_camera(options).await,
        };

        match result {
            Ok(Some(asset)) => {
                if tx.send(Action::AttachmentPicked { kind, asset }).is_err() {
                    warn!("Failed to send picked attachment: receiver dropped");
                }
            }
            Ok(None) => debug!("{} picker returned nothing", kind.label()),
            Err(e) => warn!("{} picker failed: {}", kind.label(), e),
        }
    })
}

/// Local delivery round-trip for an appended message. A messaging backend
/// client would replace this task; today it just confirms immediately.
fn spawn_delivery(id: String, tx: mpsc::Sender<Action>) {
    tokio::spawn(async move {
        debug!("delivering message {id}");
        if tx.send(Action::DeliveryConfirmed(id)).is_err() {
            warn!("Failed to send delivery confirmation: receiver dropped");
        }
    });
}
