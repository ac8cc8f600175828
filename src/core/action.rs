//! # Actions
//!
//! Everything that can happen on the chat screen becomes an `Action`.
//! User presses Enter? That's `Action::Submit`. The attachment flow
//! finishes? That's `Action::AttachmentPicked`.
//!
//! The `update()` function takes the current state and an action and
//! mutates the state. No side effects here — I/O happens in the event
//! loop, driven by the returned `Effect`.
//!
//! ```text
//! State + Action  →  update()  →  New State + Effect
//! ```

use log::debug;

use crate::core::chat::ChatMessage;
use crate::core::state::App;
use crate::platform::permission::AttachmentKind;
use crate::platform::picker::SelectedAsset;

#[derive(Debug)]
pub enum Action {
    /// Composer submitted a non-empty draft.
    Submit(String),
    /// The local delivery round-trip for the given message id finished.
    DeliveryConfirmed(String),
    /// Camera or photos button pressed.
    RequestAttachment(AttachmentKind),
    /// The attachment flow produced an asset.
    AttachmentPicked {
        kind: AttachmentKind,
        asset: SelectedAsset,
    },
    Quit,
}

/// What the event loop should do after an update.
#[derive(Debug, PartialEq, Eq)]
pub enum Effect {
    None,
    Quit,
    /// Spawn (or supersede) the permission + picker task for this kind.
    StartAttachmentFlow(AttachmentKind),
    /// Hand the appended message to the delivery round-trip.
    DeliverMessage(String),
}

pub fn update(app: &mut App, action: Action) -> Effect {
    match action {
        Action::Submit(text) => {
            let message = ChatMessage::outgoing(
                app.user.clone(),
                text,
                app.pending_attachment.take(),
            );
            let id = message.id.clone();
            debug!("appending outgoing message {id}");
            app.log.push(message);
            app.is_sending = true;
            app.status_message = "Sending...".to_string();
            Effect::DeliverMessage(id)
        }
        Action::DeliveryConfirmed(id) => {
            debug!("delivery confirmed for {id}");
            app.is_sending = false;
            app.status_message = "Delivered".to_string();
            Effect::None
        }
        Action::RequestAttachment(kind) => {
            app.status_message = format!("Opening {}...", kind.label());
            Effect::StartAttachmentFlow(kind)
        }
        Action::AttachmentPicked { kind, asset } => {
            debug!("attachment picked via {}: {}", kind.label(), asset.file_name);
            app.status_message = format!("Attached {}", asset.file_name);
            app.pending_attachment = Some(asset);
            Effect::None
        }
        Action::Quit => Effect::Quit,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{test_app, test_asset};

    #[test]
    fn submit_appends_one_message_and_clears_nothing_else() {
        let mut app = test_app();
        let before = app.log.len();

        let effect = update(&mut app, Action::Submit("hi there".to_string()));

        assert_eq!(app.log.len(), before + 1);
        let appended = app.log.get(before).unwrap();
        assert_eq!(appended.body, "hi there");
        assert_eq!(appended.sender.uid, app.user.uid);
        assert!(!appended.id.is_empty(), "sent messages get a generated id");
        assert!(app.is_sending);
        assert_eq!(effect, Effect::DeliverMessage(appended.id.clone()));
    }

    #[test]
    fn submit_consumes_the_pending_attachment() {
        let mut app = test_app();
        app.pending_attachment = Some(test_asset("photo.jpg"));

        update(&mut app, Action::Submit("look".to_string()));

        let appended = app.log.get(app.log.len() - 1).unwrap();
        assert_eq!(
            appended.attachment.as_ref().map(|a| a.file_name.as_str()),
            Some("photo.jpg")
        );
        assert!(app.pending_attachment.is_none(), "slot is emptied on send");
    }

    #[test]
    fn delivery_confirmation_resets_the_sending_flag() {
        let mut app = test_app();
        let effect = update(&mut app, Action::Submit("hi".to_string()));
        let Effect::DeliverMessage(id) = effect else {
            panic!("expected DeliverMessage effect");
        };

        let effect = update(&mut app, Action::DeliveryConfirmed(id));
        assert!(!app.is_sending);
        assert_eq!(effect, Effect::None);
    }

    #[test]
    fn request_attachment_yields_a_flow_effect() {
        let mut app = test_app();
        let effect = update(&mut app, Action::RequestAttachment(AttachmentKind::Photo));
        assert_eq!(effect, Effect::StartAttachmentFlow(AttachmentKind::Photo));
    }

    #[test]
    fn picked_asset_lands_in_the_pending_slot() {
        let mut app = test_app();
        let effect = update(
            &mut app,
            Action::AttachmentPicked {
                kind: AttachmentKind::Camera,
                asset: test_asset("capture.jpg"),
            },
        );
        assert_eq!(effect, Effect::None);
        assert_eq!(
            app.pending_attachment.as_ref().map(|a| a.file_name.as_str()),
            Some("capture.jpg")
        );
        assert!(app.status_message.contains("capture.jpg"));
    }

    #[test]
    fn consecutive_sends_group_together() {
        let mut app = test_app();
        update(&mut app, Action::Submit("one".to_string()));
        update(&mut app, Action::Submit("two".to_string()));

        let n = app.log.len();
        assert!(app.log.is_first_in_group(n - 2), "follows a seeded sender");
        assert!(!app.log.is_first_in_group(n - 1), "same local sender");
    }

    #[test]
    fn quit_action_maps_to_quit_effect() {
        let mut app = test_app();
        assert_eq!(update(&mut app, Action::Quit), Effect::Quit);
    }
}
