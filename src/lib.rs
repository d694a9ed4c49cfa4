#![doc = include_str!("../README.md")]

pub mod avatar;
pub mod backend;
pub mod capture;
#[cfg(feature = "client")]
pub mod client;
pub mod config;
pub mod error;
pub mod login;
pub mod popup;
pub mod presenter;
pub mod session_id;
pub mod store;
pub mod types;
pub mod word;

#[cfg(test)]
pub(crate) mod testing;

// Re-exports for convenient access
pub use avatar::{ProfileCard, placeholder_avatar};
pub use backend::Backend;
pub use capture::{CaptureOutcome, WordCapture};
#[cfg(feature = "client")]
pub use client::WordbookClient;
pub use config::Config;
pub use error::Error;
pub use login::{LoginState, PollOutcome, SessionController};
pub use popup::{Popup, ProfileOutcome, View};
pub use presenter::{
    ADD_TO_WORDBOOK_MENU, ContextMenuEntry, MenuContext, Notification, Notifier, PopupView,
};
pub use session_id::{generate_device_session_id, pairing_uri};
pub use store::{FileTokenStore, MemoryTokenStore, TokenStore};
pub use types::{AccessToken, AddWordOutcome, DeviceSessionId, UserProfile, Word};
pub use word::selected_word;
