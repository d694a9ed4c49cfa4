use tokio::sync::watch;

use crate::types::{AccessToken, DeviceSessionId};

/// Where the device-pairing flow currently stands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginState {
    NoSession,
    /// A pairing code is shown and the backend is being polled for it.
    AwaitingScan(DeviceSessionId),
    LoggedIn(AccessToken),
    /// The code expired without a confirmed login; polling has stopped.
    Expired,
}

/// How a polling loop ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome {
    LoggedIn(AccessToken),
    Expired,
    /// Stopped by restart or teardown.
    Cancelled,
}

/// Moves `state` to `next` only while it still belongs to `session_id`.
///
/// A loop that lost the race against a restart must not overwrite the
/// state of the newer session.
pub(super) fn transition(
    state: &watch::Sender<LoginState>,
    session_id: &DeviceSessionId,
    next: LoginState,
) -> bool {
    state.send_if_modified(|current| match current {
        LoginState::AwaitingScan(id) if id == session_id => {
            *current = next;
            true
        }
        _ => false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transition_only_from_own_session() {
        let own = DeviceSessionId::from("own".to_string());
        let other = DeviceSessionId::from("other".to_string());
        let (state, rx) = watch::channel(LoginState::AwaitingScan(own.clone()));

        assert!(!transition(&state, &other, LoginState::Expired));
        assert_eq!(*rx.borrow(), LoginState::AwaitingScan(own.clone()));

        assert!(transition(&state, &own, LoginState::Expired));
        assert_eq!(*rx.borrow(), LoginState::Expired);

        assert!(!transition(&state, &own, LoginState::NoSession));
        assert_eq!(*rx.borrow(), LoginState::Expired);
    }
}
