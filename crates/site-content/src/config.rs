use serde::{Deserialize, Serialize};
use site_store::validate_key;
use site_types::Locale;

use crate::error::{ContentError, ContentResult};

/// Storage key holding the serialized content tree.
pub const CONTENT_KEY: &str = "site_content_v1";

/// Storage key holding the cookie-consent flag.
pub const CONSENT_KEY: &str = "cookieConsent";

/// Content store settings. Every field has a default, so an empty TOML
/// table is a valid configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StoreConfig {
    pub content_key: String,
    pub consent_key: String,
    /// Locale presented to visitors before they choose one.
    pub default_locale: Locale,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            content_key: CONTENT_KEY.into(),
            consent_key: CONSENT_KEY.into(),
            default_locale: Locale::Cn,
        }
    }
}

impl StoreConfig {
    /// Both keys must be storable and distinct from each other.
    pub fn validate(&self) -> ContentResult<()> {
        validate_key(&self.content_key)
            .map_err(|e| ContentError::Config(format!("content_key: {e}")))?;
        validate_key(&self.consent_key)
            .map_err(|e| ContentError::Config(format!("consent_key: {e}")))?;
        if self.content_key == self.consent_key {
            return Err(ContentError::Config(format!(
                "content_key and consent_key must differ (both are {:?})",
                self.content_key
            )));
        }
        Ok(())
    }
}
