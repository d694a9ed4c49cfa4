use std::sync::Arc;

use crate::backend::Backend;
use crate::error::Error;
use crate::presenter::{ADD_TO_WORDBOOK_MENU_ID, Notification, Notifier};
use crate::store::TokenStore;
use crate::types::{AddWordOutcome, Word};
use crate::word::selected_word;

/// What a context-menu click resulted in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureOutcome {
    /// The click was for another menu entry.
    Ignored,
    /// The selection held no usable word; nothing was shown.
    InvalidWord,
    /// No token stored; the user was asked to log in.
    AuthMissing,
    Added(Word),
    AlreadyExists(Word),
    /// Upload failed; the user saw a generic notice.
    Failed,
}

/// Handles "add selected word to wordbook" clicks.
pub struct WordCapture<B, S, N> {
    backend: Arc<B>,
    store: Arc<S>,
    notifier: Arc<N>,
}

impl<B, S, N> Clone for WordCapture<B, S, N> {
    fn clone(&self) -> Self {
        Self {
            backend: self.backend.clone(),
            store: self.store.clone(),
            notifier: self.notifier.clone(),
        }
    }
}

impl<B: Backend, S: TokenStore, N: Notifier> WordCapture<B, S, N> {
    #[must_use]
    pub fn new(backend: Arc<B>, store: Arc<S>, notifier: Arc<N>) -> Self {
        Self {
            backend,
            store,
            notifier,
        }
    }

    /// React to a context-menu click carrying the current selection.
    pub async fn on_menu_click(
        &self,
        menu_item_id: &str,
        selection_text: Option<&str>,
    ) -> CaptureOutcome {
        if menu_item_id != ADD_TO_WORDBOOK_MENU_ID {
            return CaptureOutcome::Ignored;
        }

        let Some(word) = selected_word(selection_text.map(str::trim)) else {
            tracing::debug!("Selection is not a single word, ignoring");
            return CaptureOutcome::InvalidWord;
        };

        match self.upload(&word).await {
            Ok(AddWordOutcome::Added) => {
                self.notifier
                    .notify(Notification::basic(format!("Added: {word}")).silent());
                CaptureOutcome::Added(word)
            }
            Ok(AddWordOutcome::AlreadyExists) => {
                self.notifier
                    .notify(Notification::basic(format!("Already in wordbook: {word}")).silent());
                CaptureOutcome::AlreadyExists(word)
            }
            Err(Error::AuthMissing) => {
                self.notifier.notify(Notification::basic(
                    "Please log in from the extension first",
                ));
                CaptureOutcome::AuthMissing
            }
            Err(e) => {
                tracing::error!(error = %e, word = %word, "Failed to add word");
                self.notifier
                    .notify(Notification::basic("Failed to add word").silent());
                CaptureOutcome::Failed
            }
        }
    }

    async fn upload(&self, word: &Word) -> Result<AddWordOutcome, Error> {
        let token = self.store.load().await?.ok_or(Error::AuthMissing)?;
        let outcome = self.backend.add_word(word, &token).await?;
        tracing::info!(word = %word, outcome = ?outcome, "Word uploaded");
        Ok(outcome)
    }
}
