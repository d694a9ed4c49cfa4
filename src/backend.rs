use std::future::Future;

use crate::error::Error;
use crate::types::{AccessToken, AddWordOutcome, DeviceSessionId, UserProfile, Word};

/// Remote wordbook backend.
///
/// [`WordbookClient`](crate::client::WordbookClient) is the HTTP implementation;
/// the capture and login flows only depend on this trait so they can run
/// against an in-memory fake.
pub trait Backend: Send + Sync + 'static {
    /// Add a word to the user's wordbook (`POST /my/words`).
    ///
    /// Fails with [`Error::Http`] on a non-2xx status and
    /// [`Error::Transport`] when the request never completes.
    fn add_word(
        &self,
        word: &Word,
        token: &AccessToken,
    ) -> impl Future<Output = Result<AddWordOutcome, Error>> + Send;

    /// Fetch the profile behind a token (`GET /auth/profile`).
    ///
    /// Fails with [`Error::TokenInvalid`] on 401/403, [`Error::Http`] on other
    /// non-2xx statuses and [`Error::Transport`] on network failure.
    fn fetch_profile(
        &self,
        token: &AccessToken,
    ) -> impl Future<Output = Result<UserProfile, Error>> + Send;

    /// Ask whether a pairing attempt has been confirmed
    /// (`GET /auth/device-session?deviceSessionId=<id>`).
    ///
    /// `Ok(None)` means "not yet".
    fn lookup_device_session(
        &self,
        session_id: &DeviceSessionId,
    ) -> impl Future<Output = Result<Option<AccessToken>, Error>> + Send;
}
