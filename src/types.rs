use derive_more::{Display, From, Into};
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Opaque bearer credential issued by the backend.
///
/// Persisted under the `accessToken` key by [`TokenStore`](crate::store::TokenStore).
/// `Debug` output is redacted so tokens never end up in logs.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize, From, Into)]
#[serde(transparent)]
pub struct AccessToken(String);

impl AccessToken {
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("AccessToken(<redacted>)")
    }
}

/// Short-lived key correlating one pairing attempt with its backend confirmation.
///
/// Generated per attempt by [`generate_device_session_id`](crate::session_id::generate_device_session_id),
/// never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, From, Into)]
#[serde(transparent)]
pub struct DeviceSessionId(String);

impl DeviceSessionId {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Sanitized lowercase word matching `^[a-z-']+$`.
///
/// Guaranteed valid by construction. Use [`selected_word`](crate::word::selected_word),
/// `"Hello".parse::<Word>()` or `Word::try_from(string)` to create.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "String")]
pub struct Word(String);

impl Word {
    /// Only the sanitizer builds words; it has already checked the pattern.
    pub(crate) fn from_sanitized(word: String) -> Self {
        Self(word)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Word {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for Word {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        crate::word::selected_word(Some(s)).ok_or_else(|| Error::InvalidWord(s.to_owned()))
    }
}

impl TryFrom<String> for Word {
    type Error = Error;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Word> for String {
    fn from(w: Word) -> Self {
        w.0
    }
}

/// Profile returned by `GET /auth/profile`.
///
/// Transient: fetched per render, never cached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub struct UserProfile {
    #[serde(default)]
    pub avatar: Option<String>,
    pub nickname: String,
}

impl UserProfile {
    #[must_use]
    pub fn new(nickname: impl Into<String>) -> Self {
        Self {
            avatar: None,
            nickname: nickname.into(),
        }
    }

    #[must_use]
    pub fn with_avatar(mut self, avatar: impl Into<String>) -> Self {
        self.avatar = Some(avatar.into());
        self
    }
}

/// Result of adding a word. Both variants are successes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddWordOutcome {
    Added,
    AlreadyExists,
}

impl From<bool> for AddWordOutcome {
    fn from(result: bool) -> Self {
        if result { Self::Added } else { Self::AlreadyExists }
    }
}
