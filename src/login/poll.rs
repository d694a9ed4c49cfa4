use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use super::state::{LoginState, PollOutcome, transition};
use crate::backend::Backend;
use crate::error::Error;
use crate::presenter::PopupView;
use crate::store::TokenStore;
use crate::types::{AccessToken, DeviceSessionId};

/// One polling loop, bound to a single device session id.
pub(super) struct PollLoop<B, S, V> {
    pub(super) backend: Arc<B>,
    pub(super) store: Arc<S>,
    pub(super) view: Arc<V>,
    pub(super) session_id: DeviceSessionId,
    pub(super) interval: Duration,
    pub(super) timeout: Duration,
    pub(super) cancel: CancellationToken,
    pub(super) state: watch::Sender<LoginState>,
}

impl<B: Backend, S: TokenStore, V: PopupView> PollLoop<B, S, V> {
    /// Polls immediately, then every `interval`, until a token arrives,
    /// `timeout` has elapsed, or the loop is cancelled.
    pub(super) async fn run(self) -> PollOutcome {
        let started = Instant::now();
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;
                () = self.cancel.cancelled() => return self.cancelled(),
                _ = ticker.tick() => {}
            }

            let polled = tokio::select! {
                biased;
                () = self.cancel.cancelled() => return self.cancelled(),
                polled = self.poll_once() => polled,
            };

            if let Some(token) = polled {
                return self.logged_in(token).await;
            }

            if started.elapsed() > self.timeout {
                tracing::info!(
                    session_id = %self.session_id,
                    timeout_secs = self.timeout.as_secs(),
                    "Pairing code expired"
                );
                if transition(&self.state, &self.session_id, LoginState::Expired) {
                    self.view.mark_pairing_code_expired();
                }
                return PollOutcome::Expired;
            }
        }
    }

    /// Every failure reads as "not logged in yet".
    async fn poll_once(&self) -> Option<AccessToken> {
        match self.backend.lookup_device_session(&self.session_id).await {
            Ok(token) => token.filter(|t| !t.as_str().is_empty()),
            Err(Error::Http { status, .. }) => {
                tracing::debug!(status, "Device session not confirmed");
                None
            }
            Err(e) => {
                tracing::debug!(error = %e, "Device session poll failed");
                None
            }
        }
    }

    async fn logged_in(&self, token: AccessToken) -> PollOutcome {
        // A token for a stopped session belongs to nobody.
        if self.cancel.is_cancelled() {
            return self.cancelled();
        }
        if let Err(e) = self.store.save(&token).await {
            tracing::error!(error = %e, "Failed to persist access token");
        }
        transition(
            &self.state,
            &self.session_id,
            LoginState::LoggedIn(token.clone()),
        );
        tracing::info!(session_id = %self.session_id, "Device pairing confirmed");
        PollOutcome::LoggedIn(token)
    }

    fn cancelled(&self) -> PollOutcome {
        tracing::debug!(session_id = %self.session_id, "Polling cancelled");
        PollOutcome::Cancelled
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryTokenStore;
    use crate::testing::{FakeBackend, RecordingView, capture_logs, transport_error};
    use crate::types::{AddWordOutcome, UserProfile, Word};

    /// Confirms the session while the loop is being stopped.
    struct StopDuringPoll {
        cancel: CancellationToken,
    }

    impl Backend for StopDuringPoll {
        async fn add_word(&self, _: &Word, _: &AccessToken) -> Result<AddWordOutcome, Error> {
            Err(transport_error())
        }

        async fn fetch_profile(&self, _: &AccessToken) -> Result<UserProfile, Error> {
            Err(transport_error())
        }

        async fn lookup_device_session(
            &self,
            _: &DeviceSessionId,
        ) -> Result<Option<AccessToken>, Error> {
            self.cancel.cancel();
            Ok(Some(AccessToken::new("late")))
        }
    }

    fn poll_loop<B>(
        backend: B,
        store: Arc<MemoryTokenStore>,
        cancel: CancellationToken,
    ) -> (PollLoop<B, MemoryTokenStore, RecordingView>, watch::Sender<LoginState>) {
        let session_id = DeviceSessionId::from("session-1".to_owned());
        let (state, _) = watch::channel(LoginState::AwaitingScan(session_id.clone()));
        let poll = PollLoop {
            backend: Arc::new(backend),
            store,
            view: Arc::new(RecordingView::default()),
            session_id,
            interval: Duration::from_secs(3),
            timeout: Duration::from_secs(300),
            cancel,
            state: state.clone(),
        };
        (poll, state)
    }

    #[tokio::test(start_paused = true)]
    async fn test_token_after_stop_is_not_saved() {
        let cancel = CancellationToken::new();
        let store = Arc::new(MemoryTokenStore::new());
        let backend = StopDuringPoll {
            cancel: cancel.clone(),
        };
        let (poll, state) = poll_loop(backend, store.clone(), cancel);

        assert_eq!(poll.run().await, PollOutcome::Cancelled);
        assert_eq!(store.load().await.unwrap(), None);
        assert!(matches!(*state.borrow(), LoginState::AwaitingScan(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_poll_failures_log_below_warn() {
        let (_guard, logs) = capture_logs(tracing::Level::WARN);
        let backend = FakeBackend::new();
        backend.push_poll(Err(transport_error()));
        backend.push_poll(Ok(Some(AccessToken::new("tok"))));
        let store = Arc::new(MemoryTokenStore::new());
        let (poll, _state) = poll_loop(backend, store, CancellationToken::new());

        assert_eq!(poll.run().await, PollOutcome::LoggedIn(AccessToken::new("tok")));
        assert!(
            !logs.contents().contains("Device session poll failed"),
            "{}",
            logs.contents()
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_poll_failures_log_at_debug() {
        let (_guard, logs) = capture_logs(tracing::Level::DEBUG);
        let backend = FakeBackend::new();
        backend.push_poll(Err(transport_error()));
        backend.push_poll(Ok(Some(AccessToken::new("tok"))));
        let store = Arc::new(MemoryTokenStore::new());
        let (poll, _state) = poll_loop(backend, store, CancellationToken::new());

        poll.run().await;
        let contents = logs.contents();
        assert!(
            contents
                .lines()
                .any(|l| l.contains("DEBUG") && l.contains("Device session poll failed")),
            "{contents}"
        );
    }
}
