use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use site_store::KvStore;
use tracing::{debug, warn};

use crate::error::ContentResult;

/// Visitor's answer to the cookie banner.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConsentState {
    /// No answer yet; the banner is shown.
    #[default]
    Unset,
    Accepted,
    Declined,
}

impl ConsentState {
    /// Whether the cookie banner should be displayed.
    pub fn needs_prompt(&self) -> bool {
        matches!(self, Self::Unset)
    }

    fn stored_value(&self) -> Option<&'static str> {
        match self {
            Self::Unset => None,
            Self::Accepted => Some("true"),
            Self::Declined => Some("false"),
        }
    }
}

impl fmt::Display for ConsentState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Unset => "unset",
            Self::Accepted => "accepted",
            Self::Declined => "declined",
        })
    }
}

/// Cookie-consent flag, kept under its own storage key next to the
/// content blob.
pub struct ConsentStore {
    backend: Arc<dyn KvStore>,
    key: String,
}

impl ConsentStore {
    pub fn new(backend: Arc<dyn KvStore>, key: impl Into<String>) -> Self {
        Self {
            backend,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn get(&self) -> ContentResult<ConsentState> {
        let state = match self.backend.get(&self.key)?.as_deref() {
            None => ConsentState::Unset,
            Some("true") => ConsentState::Accepted,
            Some("false") => ConsentState::Declined,
            Some(other) => {
                warn!(key = %self.key, value = other, "unrecognised consent value, treating as unset");
                ConsentState::Unset
            }
        };
        Ok(state)
    }

    pub fn set(&self, state: ConsentState) -> ContentResult<()> {
        match state.stored_value() {
            Some(value) => self.backend.set(&self.key, value)?,
            None => {
                self.backend.remove(&self.key)?;
            }
        }
        debug!(key = %self.key, %state, "consent recorded");
        Ok(())
    }

    pub fn accept(&self) -> ContentResult<()> {
        self.set(ConsentState::Accepted)
    }

    pub fn decline(&self) -> ContentResult<()> {
        self.set(ConsentState::Declined)
    }

    /// Forget the answer so the banner is shown again.
    pub fn clear(&self) -> ContentResult<()> {
        self.set(ConsentState::Unset)
    }
}

impl fmt::Debug for ConsentStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConsentStore").field("key", &self.key).finish()
    }
}
