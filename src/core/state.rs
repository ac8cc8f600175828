//! # Application State
//!
//! Core business state for the chat screen. Domain logic only — no TUI
//! types. Presentation state (scroll offsets, draft buffer) lives in the
//! `tui` module.
//!
//! ```text
//! App
//! ├── user: Participant                  // the local sender
//! ├── log: ChatLog                       // ordered messages + grouping
//! ├── status_message: String             // title bar text
//! ├── is_sending: bool                   // send in flight (spinner)
//! └── pending_attachment: Option<...>    // picked asset awaiting send
//! ```
//!
//! State changes only happen through `update(state, action)` in action.rs.

use crate::core::chat::{ChatLog, Participant};
use crate::core::config::ResolvedConfig;
use crate::platform::picker::SelectedAsset;

pub struct App {
    pub user: Participant,
    pub log: ChatLog,
    pub status_message: String,
    pub is_sending: bool,
    /// Asset picked by the attachment flow, attached to the next sent message.
    pub pending_attachment: Option<SelectedAsset>,
}

impl App {
    pub fn new(user: Participant) -> Self {
        let status_message = format!("Chatting as {}", user.display_name);
        Self {
            user,
            log: ChatLog::seeded(),
            status_message,
            is_sending: false,
            pending_attachment: None,
        }
    }

    pub fn from_config(config: &ResolvedConfig) -> Self {
        Self::new(Participant::local(
            &config.display_name,
            config.status_msg.as_deref().unwrap_or(""),
        ))
    }
}

#[cfg(test)]
mod tests {
    use crate::test_support::test_app;

    #[test]
    fn test_app_new_defaults() {
        let app = test_app();
        assert_eq!(app.status_message, "Chatting as tester");
        assert!(!app.is_sending);
        assert!(app.pending_attachment.is_none());
        assert_eq!(app.log.len(), 4);
    }
}
