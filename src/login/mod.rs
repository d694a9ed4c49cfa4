//! Device-pairing login.
//!
//! A secondary device logs the client in by scanning a code that embeds a
//! random session id. The client polls the backend for that id until it
//! reports an access token, the code expires, or the flow is torn down.
//!
//! ```rust,ignore
//! use hearai_wordbook::login::{PollOutcome, SessionController};
//!
//! let mut login = SessionController::new(backend, store, view, config)?;
//! login.start();
//! if let Some(PollOutcome::LoggedIn(token)) = login.wait().await {
//!     // token is already persisted
//! }
//! ```

mod controller;
mod poll;
mod state;

pub use controller::SessionController;
pub use state::{LoginState, PollOutcome};
