use std::collections::HashSet;
use std::ops::Deref;

use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use site_types::{
    Article, ArticleId, Bilingual, Category, Inquiry, InquiryFilter, Locale, TypeError,
};
use tracing::warn;

use crate::error::{ContentError, ContentResult};
use crate::schema::{
    AboutText, AuthText, BusinessText, ContactText, CookieConsentText, HeroText, LocaleContent,
    MarketInsightsText, NavText, Section,
};

/// Built-in dataset, in the stored blob layout.
const BUILTIN_CONTENT: &str = include_str!("../data/default_content.json");

/// The full bilingual content structure.
///
/// Keyed sections are held per locale. Inquiries are held once and
/// projected into both locale slots on read and on serialization, so the
/// two slots cannot diverge. The article high-water marks record the
/// largest article id ever issued per locale.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContentTree {
    locales: Bilingual<LocaleContent>,
    inquiries: Vec<Inquiry>,
    article_high_water: Bilingual<ArticleId>,
}

impl ContentTree {
    pub fn new(locales: Bilingual<LocaleContent>, inquiries: Vec<Inquiry>) -> Self {
        let article_high_water = Bilingual::splat(0);
        let mut tree = Self {
            locales,
            inquiries,
            article_high_water,
        };
        for locale in Locale::ALL {
            tree.note_articles(locale);
        }
        tree
    }

    /// The built-in default dataset.
    pub fn builtin() -> ContentResult<Self> {
        Self::from_json(BUILTIN_CONTENT)
    }

    /// Parse a stored blob.
    pub fn from_json(raw: &str) -> ContentResult<Self> {
        serde_json::from_str(raw).map_err(|e| ContentError::Corrupt(e.to_string()))
    }

    /// Serialize to the stored blob layout.
    pub fn to_json(&self) -> ContentResult<String> {
        serde_json::to_string(self).map_err(|e| ContentError::Serialization(e.to_string()))
    }

    /// Read-only projection of one locale, inquiries included.
    pub fn locale(&self, locale: Locale) -> LocaleView<'_> {
        LocaleView {
            locale,
            content: &self.locales[locale],
            inquiries: &self.inquiries,
        }
    }

    pub fn content(&self, locale: Locale) -> &LocaleContent {
        &self.locales[locale]
    }

    pub(crate) fn content_mut(&mut self, locale: Locale) -> &mut LocaleContent {
        &mut self.locales[locale]
    }

    /// The shared inquiry list, in stored order (newest first).
    pub fn inquiries(&self) -> &[Inquiry] {
        &self.inquiries
    }

    pub(crate) fn inquiries_mut(&mut self) -> &mut Vec<Inquiry> {
        &mut self.inquiries
    }

    /// Inquiries passing `filter`, in descending id order.
    pub fn list_inquiries(&self, filter: InquiryFilter) -> Vec<Inquiry> {
        let mut list: Vec<Inquiry> = self
            .inquiries
            .iter()
            .filter(|inq| filter.matches(inq))
            .cloned()
            .collect();
        list.sort_by(|a, b| b.id.cmp(&a.id));
        list
    }

    pub fn articles(&self, locale: Locale) -> &[Article] {
        &self.locales[locale].market_insights.articles
    }

    pub(crate) fn articles_mut(&mut self, locale: Locale) -> &mut Vec<Article> {
        &mut self.locales[locale].market_insights.articles
    }

    /// Largest article id ever issued in `locale`.
    pub fn article_high_water(&self, locale: Locale) -> ArticleId {
        self.article_high_water[locale]
    }

    /// Reserve the next article id for `locale`.
    pub(crate) fn next_article_id(&mut self, locale: Locale) -> ContentResult<ArticleId> {
        self.note_articles(locale);
        let next = self.article_high_water[locale]
            .checked_add(1)
            .ok_or(TypeError::IdSpaceExhausted("article"))?;
        self.article_high_water[locale] = next;
        Ok(next)
    }

    /// Raise the high-water mark to cover every id currently in the list.
    pub(crate) fn note_articles(&mut self, locale: Locale) {
        let max = max_article_id(self.articles(locale));
        let mark = &mut self.article_high_water[locale];
        *mark = (*mark).max(max);
    }

    /// Current value of one section in one locale.
    pub fn section_value(&self, locale: Locale, section: Section) -> ContentResult<Value> {
        match section {
            Section::Inquiries => serde_json::to_value(&self.inquiries)
                .map_err(|e| ContentError::Serialization(e.to_string())),
            _ => self.locales[locale].section_value(section),
        }
    }

    /// Current value of one key within a keyed section.
    pub fn field(&self, locale: Locale, section: Section, key: &str) -> ContentResult<Value> {
        let value = self.section_value(locale, section)?;
        value
            .get(key)
            .cloned()
            .ok_or_else(|| unknown_key(section, key))
    }
}

pub(crate) fn unknown_key(section: Section, key: &str) -> ContentError {
    ContentError::SchemaViolation(format!("unknown key {key:?} in section {section}"))
}

pub(crate) fn max_article_id(articles: &[Article]) -> ArticleId {
    articles.iter().map(|a| a.id).max().unwrap_or(0)
}

/// Reject article lists that reuse an id.
pub(crate) fn check_unique_article_ids(locale: Locale, articles: &[Article]) -> ContentResult<()> {
    let mut seen = HashSet::new();
    for article in articles {
        if !seen.insert(article.id) {
            return Err(ContentError::SchemaViolation(format!(
                "duplicate article id {} in {locale} article list",
                article.id
            )));
        }
    }
    Ok(())
}

/// Read-only view of one locale, as consumed by the presentation layer.
///
/// Dereferences to the locale's [`LocaleContent`]; inquiries are the
/// shared list.
#[derive(Clone, Copy, Debug)]
pub struct LocaleView<'a> {
    locale: Locale,
    content: &'a LocaleContent,
    inquiries: &'a [Inquiry],
}

impl<'a> LocaleView<'a> {
    pub fn locale(&self) -> Locale {
        self.locale
    }

    pub fn inquiries(&self) -> &'a [Inquiry] {
        self.inquiries
    }

    /// Articles in stored order, optionally narrowed to one category.
    pub fn articles(&self, filter: Option<Category>) -> Vec<&'a Article> {
        self.content
            .market_insights
            .articles
            .iter()
            .filter(|a| a.matches(filter))
            .collect()
    }

    /// Section names exposed by this locale, in storage order.
    pub fn section_names(&self) -> Vec<&'static str> {
        Section::ALL.iter().map(Section::as_str).collect()
    }
}

impl Deref for LocaleView<'_> {
    type Target = LocaleContent;

    fn deref(&self) -> &LocaleContent {
        self.content
    }
}

// ---------------------------------------------------------------------------
// Stored blob layout
// ---------------------------------------------------------------------------

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct WireLocaleRef<'a> {
    nav: &'a NavText,
    hero: &'a HeroText,
    about: &'a AboutText,
    business: &'a BusinessText,
    market_insights: &'a MarketInsightsText,
    contact: &'a ContactText,
    inquiries: &'a [Inquiry],
    auth: &'a AuthText,
    cookie_consent: &'a CookieConsentText,
}

#[derive(Serialize)]
struct WireTreeRef<'a> {
    cn: WireLocaleRef<'a>,
    en: WireLocaleRef<'a>,
    meta: WireMeta,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct WireMeta {
    article_high_water: Bilingual<ArticleId>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct WireLocale {
    nav: NavText,
    hero: HeroText,
    about: AboutText,
    business: BusinessText,
    market_insights: MarketInsightsText,
    contact: ContactText,
    #[serde(default)]
    inquiries: Vec<Inquiry>,
    auth: AuthText,
    cookie_consent: CookieConsentText,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct WireTree {
    cn: WireLocale,
    en: WireLocale,
    #[serde(default)]
    meta: Option<WireMeta>,
}

impl WireLocale {
    fn split(self) -> (LocaleContent, Vec<Inquiry>) {
        let content = LocaleContent {
            nav: self.nav,
            hero: self.hero,
            about: self.about,
            business: self.business,
            market_insights: self.market_insights,
            contact: self.contact,
            auth: self.auth,
            cookie_consent: self.cookie_consent,
        };
        (content, self.inquiries)
    }
}

fn wire_locale<'a>(content: &'a LocaleContent, inquiries: &'a [Inquiry]) -> WireLocaleRef<'a> {
    WireLocaleRef {
        nav: &content.nav,
        hero: &content.hero,
        about: &content.about,
        business: &content.business,
        market_insights: &content.market_insights,
        contact: &content.contact,
        inquiries,
        auth: &content.auth,
        cookie_consent: &content.cookie_consent,
    }
}

impl Serialize for ContentTree {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        WireTreeRef {
            cn: wire_locale(&self.locales.cn, &self.inquiries),
            en: wire_locale(&self.locales.en, &self.inquiries),
            meta: WireMeta {
                article_high_water: self.article_high_water.clone(),
            },
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for ContentTree {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let wire = WireTree::deserialize(deserializer)?;
        let (cn, cn_inquiries) = wire.cn.split();
        let (en, en_inquiries) = wire.en.split();

        // The cn slot is the master copy; a divergent en slot is a leftover
        // of a partial write and is discarded.
        if cn_inquiries != en_inquiries {
            warn!(
                cn = cn_inquiries.len(),
                en = en_inquiries.len(),
                "stored inquiry slots diverge; keeping the cn slot"
            );
        }

        let locales = Bilingual::new(cn, en);
        for (locale, content) in locales.iter() {
            check_unique_article_ids(locale, &content.market_insights.articles)
                .map_err(<D::Error as de::Error>::custom)?;
        }

        let mut tree = ContentTree::new(locales, cn_inquiries);
        if let Some(meta) = wire.meta {
            for locale in Locale::ALL {
                let mark = &mut tree.article_high_water[locale];
                *mark = (*mark).max(meta.article_high_water[locale]);
            }
        }
        Ok(tree)
    }
}
