use std::sync::Arc;

use site_store::KvStore;
use site_types::{Inquiry, InquiryDraft, Locale};
use tracing::debug;

use crate::config::StoreConfig;
use crate::consent::ConsentStore;
use crate::error::{ContentError, ContentResult};
use crate::session::AdminSession;
use crate::store::ContentStore;
use crate::tree::LocaleView;

/// Everything one visitor session of the site touches: the content
/// store, the cookie-consent flag, the selected language and the admin
/// sign-in.
#[derive(Debug)]
pub struct Site {
    content: ContentStore,
    consent: ConsentStore,
    locale: Locale,
    session: AdminSession,
}

impl Site {
    /// Open a site over `backend`, sharing it between content and consent.
    pub fn open(backend: Arc<dyn KvStore>, config: StoreConfig) -> ContentResult<Self> {
        let consent = ConsentStore::new(Arc::clone(&backend), config.consent_key.clone());
        let content = ContentStore::open(backend, config)?;
        Ok(Self::from_parts(content, consent))
    }

    pub fn from_parts(content: ContentStore, consent: ConsentStore) -> Self {
        let locale = content.config().default_locale;
        Self {
            content,
            consent,
            locale,
            session: AdminSession::new(),
        }
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    pub fn set_locale(&mut self, locale: Locale) {
        debug!(from = %self.locale, to = %locale, "locale switched");
        self.locale = locale;
    }

    /// Switch to the other language.
    pub fn toggle_locale(&mut self) -> Locale {
        self.set_locale(self.locale.other());
        self.locale
    }

    /// Text of the current locale.
    pub fn t(&self) -> LocaleView<'_> {
        self.content.view(self.locale)
    }

    /// Read-only access to the content store.
    pub fn content(&self) -> &ContentStore {
        &self.content
    }

    /// Record a contact-form submission. This is the only write open to
    /// visitors; everything else goes through [`admin`](Self::admin).
    pub fn submit_inquiry(&mut self, draft: &InquiryDraft) -> ContentResult<Inquiry> {
        self.content.inquiries().submit(draft)
    }

    pub fn consent(&self) -> &ConsentStore {
        &self.consent
    }

    pub fn session(&self) -> &AdminSession {
        &self.session
    }

    pub fn login(&mut self) {
        self.session.login();
    }

    pub fn logout(&mut self) {
        self.session.logout();
    }

    /// The admin surface. Requires a signed-in session.
    pub fn admin(&mut self) -> ContentResult<&mut ContentStore> {
        if !self.session.is_authenticated() {
            return Err(ContentError::Unauthorized);
        }
        Ok(&mut self.content)
    }
}
