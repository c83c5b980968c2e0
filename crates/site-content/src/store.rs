use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use site_store::KvStore;
use site_types::{Bilingual, Clock, IdClock, Locale};
use tracing::{debug, error, info};

use crate::catalog::ArticleCatalog;
use crate::config::StoreConfig;
use crate::error::{ContentError, ContentResult};
use crate::ledger::InquiryLedger;
use crate::schema::Section;
use crate::tree::{check_unique_article_ids, unknown_key, ContentTree, LocaleView};

/// Owner of the canonical bilingual content tree.
///
/// Every mutation is write-through: the store clones the current tree,
/// applies the change, writes the serialized result to the backend and
/// only then publishes the new tree. If the write fails the published tree
/// is left exactly as it was.
pub struct ContentStore {
    backend: Arc<dyn KvStore>,
    config: StoreConfig,
    defaults: Arc<ContentTree>,
    tree: Arc<ContentTree>,
    ids: IdClock,
    load_anomaly: Option<ContentError>,
}

/// Dashboard counters for the admin console.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteOverview {
    pub articles: Bilingual<usize>,
    pub inquiries_total: usize,
    pub inquiries_unread: usize,
}

impl ContentStore {
    /// Open the store, falling back to the built-in content if the stored
    /// blob cannot be read or parsed. The failure is logged and kept as
    /// [`load_anomaly`](Self::load_anomaly).
    pub fn open(backend: Arc<dyn KvStore>, config: StoreConfig) -> ContentResult<Self> {
        Self::open_inner(backend, config, false)
    }

    /// Like [`open`](Self::open), but an unusable stored blob is an error.
    pub fn try_open(backend: Arc<dyn KvStore>, config: StoreConfig) -> ContentResult<Self> {
        Self::open_inner(backend, config, true)
    }

    fn open_inner(
        backend: Arc<dyn KvStore>,
        config: StoreConfig,
        strict: bool,
    ) -> ContentResult<Self> {
        config.validate()?;
        let defaults = Arc::new(ContentTree::builtin()?);
        let key = config.content_key.as_str();

        let mut load_anomaly = None;
        let tree = match load_stored(backend.as_ref(), key) {
            Ok(Some(tree)) => {
                info!(key, "loaded stored content");
                Arc::new(tree)
            }
            Ok(None) => {
                info!(key, "no stored content, using built-in defaults");
                Arc::clone(&defaults)
            }
            Err(e) if strict => return Err(e),
            Err(e) => {
                error!(key, error = %e, "stored content unusable, using built-in defaults");
                load_anomaly = Some(e);
                Arc::clone(&defaults)
            }
        };

        let ids = IdClock::system();
        observe_inquiries(&ids, &tree);

        Ok(Self {
            backend,
            config,
            defaults,
            tree,
            ids,
            load_anomaly,
        })
    }

    /// Replace the clock used for inquiry ids and submission dates.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.ids = IdClock::new(clock);
        observe_inquiries(&self.ids, &self.tree);
        self
    }

    /// Current snapshot. Holding it never blocks or observes later edits.
    pub fn get(&self) -> Arc<ContentTree> {
        Arc::clone(&self.tree)
    }

    /// Read-only projection of one locale of the current tree.
    pub fn view(&self, locale: Locale) -> LocaleView<'_> {
        self.tree.locale(locale)
    }

    /// The error that forced a fallback to defaults at open, if any.
    pub fn load_anomaly(&self) -> Option<&ContentError> {
        self.load_anomaly.as_ref()
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn backend(&self) -> &Arc<dyn KvStore> {
        &self.backend
    }

    /// Replace one key of one section in one locale.
    ///
    /// The key must already exist in the section and `value` must have the
    /// shape the schema expects for it.
    pub fn update_field(
        &mut self,
        locale: Locale,
        section: Section,
        key: &str,
        value: Value,
    ) -> ContentResult<()> {
        let Value::Object(mut fields) = self.tree.content(locale).section_value(section)? else {
            return Err(ContentError::SchemaViolation(format!(
                "section {section} is not a keyed record"
            )));
        };
        match fields.get_mut(key) {
            Some(slot) => *slot = value,
            None => return Err(unknown_key(section, key)),
        }

        self.commit("update_field", |tree, _| {
            apply_section(tree, locale, section, Value::Object(fields))
        })?;
        debug!(%locale, %section, key, "field updated");
        Ok(())
    }

    /// Replace a whole keyed section of one locale.
    pub fn replace_section(
        &mut self,
        locale: Locale,
        section: Section,
        value: Value,
    ) -> ContentResult<()> {
        self.commit("replace_section", |tree, _| {
            apply_section(tree, locale, section, value)
        })?;
        debug!(%locale, %section, "section replaced");
        Ok(())
    }

    /// Restore the built-in content and remove the stored blob.
    pub fn reset(&mut self) -> ContentResult<()> {
        let key = self.config.content_key.as_str();
        let removed = self.backend.remove(key)?;
        self.tree = Arc::clone(&self.defaults);
        self.load_anomaly = None;
        info!(key, removed, "content reset to built-in defaults");
        Ok(())
    }

    /// The shared inquiry list.
    pub fn inquiries(&mut self) -> InquiryLedger<'_> {
        InquiryLedger::new(self)
    }

    /// The article list of one locale.
    pub fn articles(&mut self, locale: Locale) -> ArticleCatalog<'_> {
        ArticleCatalog::new(self, locale)
    }

    pub fn overview(&self) -> SiteOverview {
        let tree = &self.tree;
        let inquiries = tree.inquiries();
        SiteOverview {
            articles: Bilingual::new(
                tree.articles(Locale::Cn).len(),
                tree.articles(Locale::En).len(),
            ),
            inquiries_total: inquiries.len(),
            inquiries_unread: inquiries.iter().filter(|i| i.status.is_unread()).count(),
        }
    }

    /// Apply `change` to a copy of the tree, persist it, then publish it.
    ///
    /// Nothing is published if `change` fails or the write fails.
    pub(crate) fn commit<T>(
        &mut self,
        op: &'static str,
        change: impl FnOnce(&mut ContentTree, &IdClock) -> ContentResult<T>,
    ) -> ContentResult<T> {
        let mut next = ContentTree::clone(&self.tree);
        let out = change(&mut next, &self.ids)?;
        self.persist(&next)?;
        self.tree = Arc::new(next);
        info!(op, "content committed");
        Ok(out)
    }

    fn persist(&self, tree: &ContentTree) -> ContentResult<()> {
        let key = self.config.content_key.as_str();
        let raw = tree.to_json()?;
        self.backend.set(key, &raw)?;
        debug!(key, len = raw.len(), "content persisted");
        Ok(())
    }
}

impl std::fmt::Debug for ContentStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContentStore")
            .field("config", &self.config)
            .field("ids", &self.ids)
            .field("load_anomaly", &self.load_anomaly)
            .finish()
    }
}

fn load_stored(backend: &dyn KvStore, key: &str) -> ContentResult<Option<ContentTree>> {
    match backend.get(key)? {
        Some(raw) => ContentTree::from_json(&raw).map(Some),
        None => Ok(None),
    }
}

fn observe_inquiries(ids: &IdClock, tree: &ContentTree) {
    if let Some(max) = tree.inquiries().iter().map(|i| i.id).max() {
        ids.observe(max);
    }
}

fn apply_section(
    tree: &mut ContentTree,
    locale: Locale,
    section: Section,
    value: Value,
) -> ContentResult<()> {
    tree.content_mut(locale).set_section(section, value)?;
    if section == Section::MarketInsights {
        check_unique_article_ids(locale, tree.articles(locale))?;
        tree.note_articles(locale);
    }
    Ok(())
}
