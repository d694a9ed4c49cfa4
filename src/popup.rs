use std::sync::Arc;

use crate::avatar::ProfileCard;
use crate::backend::Backend;
use crate::config::Config;
use crate::error::Error;
use crate::login::{PollOutcome, SessionController};
use crate::presenter::PopupView;
use crate::store::TokenStore;
use crate::types::{AccessToken, UserProfile};

/// Classified result of a profile fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileOutcome {
    Loaded(UserProfile),
    /// 401/403: the token must be discarded.
    InvalidToken,
    /// Any other failed response. The token is kept.
    RequestFailed { status: Option<u16> },
    /// The backend could not be reached. The token is kept.
    NetworkError,
}

impl From<Result<UserProfile, Error>> for ProfileOutcome {
    fn from(result: Result<UserProfile, Error>) -> Self {
        match result {
            Ok(profile) => Self::Loaded(profile),
            Err(Error::TokenInvalid) => Self::InvalidToken,
            Err(Error::Transport(e)) => {
                tracing::warn!(error = %e, "Profile request network error");
                Self::NetworkError
            }
            Err(e) => {
                tracing::warn!(error = %e, "Profile request failed");
                Self::RequestFailed { status: e.status() }
            }
        }
    }
}

/// The two mutually exclusive popup views.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum View {
    Login,
    Main(ProfileCard),
}

impl View {
    /// Only a loaded profile leads to the main view.
    #[must_use]
    pub fn for_outcome(outcome: &ProfileOutcome) -> Self {
        match outcome {
            ProfileOutcome::Loaded(profile) => Self::Main(ProfileCard::from_profile(profile)),
            _ => Self::Login,
        }
    }
}

/// Popup controller: token check, profile display, pairing and logout.
pub struct Popup<B, S, V> {
    backend: Arc<B>,
    store: Arc<S>,
    view: Arc<V>,
    login: SessionController<B, S, V>,
    current: View,
}

impl<B: Backend, S: TokenStore, V: PopupView> Popup<B, S, V> {
    /// # Errors
    ///
    /// Returns [`Error::Config`] if `config` cannot drive the pairing loop.
    pub fn new(
        backend: Arc<B>,
        store: Arc<S>,
        view: Arc<V>,
        config: Config,
    ) -> Result<Self, Error> {
        let login =
            SessionController::new(backend.clone(), store.clone(), view.clone(), config)?;
        Ok(Self {
            backend,
            store,
            view,
            login,
            current: View::Login,
        })
    }

    /// Initial render when the popup opens.
    ///
    /// Without a stored token the pairing flow starts right away. With one,
    /// the profile decides: a rejected token is cleared before pairing
    /// restarts, while other failures keep it for the next open.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Store`] if the token store cannot be read or cleared.
    pub async fn open(&mut self) -> Result<View, Error> {
        let Some(token) = self.store.load().await? else {
            self.render(View::Login);
            self.login.start();
            return Ok(self.current.clone());
        };

        let outcome = ProfileOutcome::from(self.backend.fetch_profile(&token).await);
        self.apply_profile(outcome, true).await
    }

    /// Wait for the running pairing attempt and show the result.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PollTimeout`] if the pairing code expired, or
    /// [`Error::Store`] if a rejected token cannot be cleared.
    pub async fn complete_login(&mut self) -> Result<View, Error> {
        match self.login.wait().await {
            Some(PollOutcome::LoggedIn(token)) => self.on_logged_in(&token).await,
            Some(PollOutcome::Expired) => Err(Error::PollTimeout),
            Some(PollOutcome::Cancelled) | None => Ok(self.current.clone()),
        }
    }

    /// Show the profile behind a freshly obtained token.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Store`] if a rejected token cannot be cleared.
    pub async fn on_logged_in(&mut self, token: &AccessToken) -> Result<View, Error> {
        let outcome = ProfileOutcome::from(self.backend.fetch_profile(token).await);
        self.apply_profile(outcome, false).await
    }

    /// Forget the token and start a new pairing attempt.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Store`] if the token cannot be cleared.
    pub async fn logout(&mut self) -> Result<(), Error> {
        self.store.clear().await?;
        tracing::info!("Logged out");
        self.render(View::Login);
        self.login.restart();
        Ok(())
    }

    /// Tear down the popup, cancelling any pairing in progress.
    pub fn close(&mut self) {
        self.login.stop();
    }

    #[must_use]
    pub fn current_view(&self) -> &View {
        &self.current
    }

    #[must_use]
    pub fn login(&self) -> &SessionController<B, S, V> {
        &self.login
    }

    async fn apply_profile(
        &mut self,
        outcome: ProfileOutcome,
        pair_on_failure: bool,
    ) -> Result<View, Error> {
        match outcome {
            ProfileOutcome::InvalidToken => {
                self.store.clear().await?;
                tracing::info!("Stored token rejected, pairing again");
                self.render(View::Login);
                self.login.restart();
            }
            ProfileOutcome::RequestFailed { .. } | ProfileOutcome::NetworkError => {
                self.render(View::Login);
                if pair_on_failure {
                    self.login.start();
                }
            }
            ProfileOutcome::Loaded(_) => self.render(View::for_outcome(&outcome)),
        }
        Ok(self.current.clone())
    }

    fn render(&mut self, next: View) {
        match &next {
            View::Login => self.view.show_login(),
            View::Main(card) => self.view.show_main(card),
        }
        self.current = next;
    }
}
