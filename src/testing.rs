//! In-memory fakes shared by the flow tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::avatar::ProfileCard;
use crate::backend::Backend;
use crate::error::Error;
use crate::presenter::{Notification, Notifier, PopupView};
use crate::types::{AccessToken, AddWordOutcome, DeviceSessionId, UserProfile, Word};

pub(crate) fn transport_error() -> Error {
    Error::Transport("connection refused".into())
}

pub(crate) fn http_error(status: u16) -> Error {
    Error::Http {
        operation: "test",
        status,
        body: "boom".into(),
    }
}

/// Scripted backend. Empty queues answer "not yet" for polls and fail
/// everything else with a transport error.
#[derive(Default)]
pub(crate) struct FakeBackend {
    polls: Mutex<VecDeque<Result<Option<AccessToken>, Error>>>,
    profiles: Mutex<VecDeque<Result<UserProfile, Error>>>,
    adds: Mutex<VecDeque<Result<AddWordOutcome, Error>>>,
    poll_count: AtomicUsize,
    polled_ids: Mutex<Vec<DeviceSessionId>>,
    added_words: Mutex<Vec<(String, String)>>,
    profile_tokens: Mutex<Vec<String>>,
}

impl FakeBackend {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// `pending` polls without a token, then one returning `token`.
    pub(crate) fn with_login_after(self, pending: usize, token: &str) -> Self {
        {
            let mut polls = self.polls.lock().unwrap();
            polls.extend((0..pending).map(|_| Ok(None)));
            polls.push_back(Ok(Some(AccessToken::new(token))));
        }
        self
    }

    pub(crate) fn push_poll(&self, result: Result<Option<AccessToken>, Error>) {
        self.polls.lock().unwrap().push_back(result);
    }

    pub(crate) fn push_profile(&self, result: Result<UserProfile, Error>) {
        self.profiles.lock().unwrap().push_back(result);
    }

    pub(crate) fn push_add(&self, result: Result<AddWordOutcome, Error>) {
        self.adds.lock().unwrap().push_back(result);
    }

    pub(crate) fn poll_count(&self) -> usize {
        self.poll_count.load(Ordering::SeqCst)
    }

    pub(crate) fn polled_ids(&self) -> Vec<DeviceSessionId> {
        self.polled_ids.lock().unwrap().clone()
    }

    pub(crate) fn added_words(&self) -> Vec<(String, String)> {
        self.added_words.lock().unwrap().clone()
    }

    pub(crate) fn profile_tokens(&self) -> Vec<String> {
        self.profile_tokens.lock().unwrap().clone()
    }
}

impl Backend for FakeBackend {
    async fn add_word(&self, word: &Word, token: &AccessToken) -> Result<AddWordOutcome, Error> {
        self.added_words
            .lock()
            .unwrap()
            .push((word.to_string(), token.as_str().to_owned()));
        let next = self.adds.lock().unwrap().pop_front();
        next.unwrap_or_else(|| Err(transport_error()))
    }

    async fn fetch_profile(&self, token: &AccessToken) -> Result<UserProfile, Error> {
        self.profile_tokens
            .lock()
            .unwrap()
            .push(token.as_str().to_owned());
        let next = self.profiles.lock().unwrap().pop_front();
        next.unwrap_or_else(|| Err(transport_error()))
    }

    async fn lookup_device_session(
        &self,
        session_id: &DeviceSessionId,
    ) -> Result<Option<AccessToken>, Error> {
        self.poll_count.fetch_add(1, Ordering::SeqCst);
        self.polled_ids.lock().unwrap().push(session_id.clone());
        let next = self.polls.lock().unwrap().pop_front();
        next.unwrap_or(Ok(None))
    }
}

#[derive(Default)]
pub(crate) struct RecordingNotifier {
    pub(crate) sent: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    pub(crate) fn sent(&self) -> Vec<Notification> {
        self.sent.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        self.sent.lock().unwrap().push(notification);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ViewEvent {
    Login,
    Main(String),
    PairingCode(String),
    Expired,
}

#[derive(Default)]
pub(crate) struct RecordingView {
    events: Mutex<Vec<ViewEvent>>,
}

impl RecordingView {
    pub(crate) fn events(&self) -> Vec<ViewEvent> {
        self.events.lock().unwrap().clone()
    }

    pub(crate) fn pairing_codes(&self) -> usize {
        self.events()
            .iter()
            .filter(|e| matches!(e, ViewEvent::PairingCode(_)))
            .count()
    }
}

impl PopupView for RecordingView {
    fn show_login(&self) {
        self.events.lock().unwrap().push(ViewEvent::Login);
    }

    fn show_main(&self, card: &ProfileCard) {
        self.events
            .lock()
            .unwrap()
            .push(ViewEvent::Main(card.nickname.clone()));
    }

    fn show_pairing_code(&self, uri: &str) {
        self.events
            .lock()
            .unwrap()
            .push(ViewEvent::PairingCode(uri.to_owned()));
    }

    fn mark_pairing_code_expired(&self) {
        self.events.lock().unwrap().push(ViewEvent::Expired);
    }
}

/// Formatted log lines captured while the guard from [`capture_logs`] lives.
#[derive(Clone, Default)]
pub(crate) struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    pub(crate) fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl std::io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

/// Routes this thread's events at `max_level` and above into a buffer.
pub(crate) fn capture_logs(
    max_level: tracing::Level,
) -> (tracing::subscriber::DefaultGuard, CapturedLogs) {
    let logs = CapturedLogs::default();
    let writer = logs.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(max_level)
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();
    (tracing::subscriber::set_default(subscriber), logs)
}
