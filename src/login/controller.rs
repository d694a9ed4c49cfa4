use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use super::poll::PollLoop;
use super::state::{LoginState, PollOutcome, transition};
use crate::backend::Backend;
use crate::config::Config;
use crate::error::Error;
use crate::presenter::PopupView;
use crate::session_id::{generate_device_session_id, pairing_uri};
use crate::store::TokenStore;
use crate::types::DeviceSessionId;

struct ActivePoll {
    session_id: DeviceSessionId,
    cancel: CancellationToken,
    handle: JoinHandle<PollOutcome>,
}

/// Owner of the device-pairing flow.
///
/// Holds at most one polling loop: [`start`](Self::start) cancels the previous
/// loop before spawning a new one, and dropping the controller cancels
/// whatever is still running.
pub struct SessionController<B, S, V> {
    backend: Arc<B>,
    store: Arc<S>,
    view: Arc<V>,
    config: Config,
    state: watch::Sender<LoginState>,
    active: Option<ActivePoll>,
}

impl<B: Backend, S: TokenStore, V: PopupView> SessionController<B, S, V> {
    /// # Errors
    ///
    /// Returns [`Error::Config`] if `config` cannot drive a polling loop.
    pub fn new(
        backend: Arc<B>,
        store: Arc<S>,
        view: Arc<V>,
        config: Config,
    ) -> Result<Self, Error> {
        config.validate()?;
        let (state, _) = watch::channel(LoginState::NoSession);
        Ok(Self {
            backend,
            store,
            view,
            config,
            state,
            active: None,
        })
    }

    /// Begin a new pairing attempt and return its session id.
    ///
    /// Must be called within a Tokio runtime.
    pub fn start(&mut self) -> DeviceSessionId {
        self.stop();

        let session_id = generate_device_session_id();
        self.view
            .show_pairing_code(&pairing_uri(&self.config.pairing_scheme, &session_id));
        self.state
            .send_replace(LoginState::AwaitingScan(session_id.clone()));

        let cancel = CancellationToken::new();
        let poll = PollLoop {
            backend: self.backend.clone(),
            store: self.store.clone(),
            view: self.view.clone(),
            session_id: session_id.clone(),
            interval: self.config.poll_interval,
            timeout: self.config.poll_timeout,
            cancel: cancel.clone(),
            state: self.state.clone(),
        };
        let handle = tokio::spawn(poll.run());

        tracing::info!(session_id = %session_id, "Device pairing started");
        self.active = Some(ActivePoll {
            session_id: session_id.clone(),
            cancel,
            handle,
        });
        session_id
    }

    /// Start over with a fresh session id.
    pub fn restart(&mut self) -> DeviceSessionId {
        self.start()
    }

    /// Cancel the active loop, if any. No request is issued afterwards.
    pub fn stop(&mut self) {
        if let Some(active) = self.active.take() {
            active.cancel.cancel();
            transition(&self.state, &active.session_id, LoginState::NoSession);
        }
    }

    /// Wait for the active loop to finish.
    ///
    /// Returns `None` when no loop is running. The loop stays owned by the
    /// controller until it finishes, so dropping this future early leaves it
    /// cancellable through [`stop`](Self::stop) or drop.
    pub async fn wait(&mut self) -> Option<PollOutcome> {
        let joined = (&mut self.active.as_mut()?.handle).await;
        let active = self.active.take()?;
        match joined {
            Ok(outcome) => Some(outcome),
            Err(e) => {
                tracing::error!(error = %e, session_id = %active.session_id, "Polling task failed");
                transition(&self.state, &active.session_id, LoginState::NoSession);
                Some(PollOutcome::Cancelled)
            }
        }
    }

    #[must_use]
    pub fn state(&self) -> LoginState {
        self.state.borrow().clone()
    }

    /// Receiver notified on every state change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<LoginState> {
        self.state.subscribe()
    }

    /// Session id of the running loop.
    #[must_use]
    pub fn session_id(&self) -> Option<&DeviceSessionId> {
        self.active.as_ref().map(|a| &a.session_id)
    }

    #[must_use]
    pub fn is_polling(&self) -> bool {
        self.active.as_ref().is_some_and(|a| !a.handle.is_finished())
    }
}

impl<B, S, V> Drop for SessionController<B, S, V> {
    fn drop(&mut self) {
        if let Some(active) = self.active.take() {
            active.cancel.cancel();
        }
    }
}
