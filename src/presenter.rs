//! Host-facing side effects: notifications, the popup views and the context menu.
//!
//! The flows in this crate never touch a UI directly. A host (terminal,
//! desktop shell, extension shim) implements these ports.

use crate::avatar::ProfileCard;

/// Icon shown on every notification.
pub const NOTIFICATION_ICON: &str = "logo_128.png";

/// System notification surfaced by the word capture flow.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct Notification {
    pub icon_url: String,
    pub title: String,
    pub message: String,
    pub silent: bool,
    pub clickable: bool,
}

impl Notification {
    /// Basic, non-clickable notification with the extension icon.
    #[must_use]
    pub fn basic(title: impl Into<String>) -> Self {
        Self {
            icon_url: NOTIFICATION_ICON.into(),
            title: title.into(),
            message: String::new(),
            silent: false,
            clickable: false,
        }
    }

    #[must_use]
    pub fn silent(mut self) -> Self {
        self.silent = true;
        self
    }

    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }
}

/// Shows system notifications.
pub trait Notifier: Send + Sync + 'static {
    fn notify(&self, notification: Notification);
}

/// The popup surface: two mutually exclusive views plus the pairing code.
pub trait PopupView: Send + Sync + 'static {
    /// Show the login view, hiding the main view.
    fn show_login(&self);

    /// Show the main view for a logged-in user, hiding the login view.
    fn show_main(&self, card: &ProfileCard);

    /// Render `uri` as a scannable code, replacing any previous one.
    fn show_pairing_code(&self, uri: &str);

    /// Overlay the current code with an "expired" marker.
    fn mark_pairing_code_expired(&self);
}

/// Where a context-menu entry is offered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuContext {
    Selection,
}

/// Context-menu entry a host registers on install.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextMenuEntry {
    pub id: &'static str,
    pub title: &'static str,
    pub contexts: &'static [MenuContext],
}

/// Menu id routed to [`WordCapture`](crate::capture::WordCapture).
pub const ADD_TO_WORDBOOK_MENU_ID: &str = "hearai_add_to_wordbook";

/// "Add to wordbook", offered on text selections.
pub const ADD_TO_WORDBOOK_MENU: ContextMenuEntry = ContextMenuEntry {
    id: ADD_TO_WORDBOOK_MENU_ID,
    title: "Add to wordbook",
    contexts: &[MenuContext::Selection],
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_notification_defaults() {
        let n = Notification::basic("Hello");
        assert_eq!(n.icon_url, "logo_128.png");
        assert_eq!(n.title, "Hello");
        assert!(n.message.is_empty());
        assert!(!n.silent);
        assert!(!n.clickable);
        assert!(Notification::basic("x").silent().silent);
    }

    #[test]
    fn add_to_wordbook_menu_targets_selection() {
        assert_eq!(ADD_TO_WORDBOOK_MENU.id, "hearai_add_to_wordbook");
        assert_eq!(ADD_TO_WORDBOOK_MENU.contexts, &[MenuContext::Selection]);
    }
}
