//! Fixed section schema shared by both locales.
//!
//! Every section is a concrete record type. Both locales use the same
//! [`LocaleContent`] type, so their section/key structure cannot drift
//! apart; only leaf values differ. Unknown keys are denied on decode, which
//! is what turns a misspelled key or a wrongly shaped value into a
//! [`ContentError::SchemaViolation`].

use std::fmt;
use std::str::FromStr;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use site_types::{Article, Category};

use crate::error::{ContentError, ContentResult};

/// Named top-level grouping within one locale's content.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Section {
    Nav,
    Hero,
    About,
    Business,
    MarketInsights,
    Contact,
    Inquiries,
    Auth,
    CookieConsent,
}

impl Section {
    /// All sections, in storage order.
    pub const ALL: [Section; 9] = [
        Section::Nav,
        Section::Hero,
        Section::About,
        Section::Business,
        Section::MarketInsights,
        Section::Contact,
        Section::Inquiries,
        Section::Auth,
        Section::CookieConsent,
    ];

    /// The key used for this section in the stored blob.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Nav => "nav",
            Self::Hero => "hero",
            Self::About => "about",
            Self::Business => "business",
            Self::MarketInsights => "marketInsights",
            Self::Contact => "contact",
            Self::Inquiries => "inquiries",
            Self::Auth => "auth",
            Self::CookieConsent => "cookieConsent",
        }
    }

    /// Sections whose value is a sequence rather than a keyed record.
    pub fn is_sequence(&self) -> bool {
        matches!(self, Self::Inquiries)
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Section {
    type Err = ContentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Section::ALL
            .into_iter()
            .find(|section| section.as_str() == s)
            .ok_or_else(|| ContentError::SchemaViolation(format!("unknown section {s:?}")))
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NavText {
    pub home: String,
    pub about: String,
    pub business: String,
    pub market_insights: String,
    pub contact: String,
    pub login: String,
    pub register: String,
    pub logout: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct HeroText {
    pub title: String,
    pub subtitle: String,
    pub cta: String,
}

/// Title plus one-line description; used for philosophy and business cards.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TitledItem {
    pub title: String,
    pub desc: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Philosophy {
    pub title: String,
    pub items: Vec<TitledItem>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct AboutText {
    pub title: String,
    pub description: String,
    pub image_subtitle: String,
    pub details_title: String,
    pub est_date: String,
    pub capital: String,
    pub rep: String,
    pub location: String,
    pub philosophy: Philosophy,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct BusinessText {
    pub title: String,
    pub subtitle: String,
    pub details_button: String,
    pub items: Vec<TitledItem>,
}

/// Filter-tab labels on the market insights page.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CategoryLabels {
    pub all: String,
    #[serde(rename = "macro")]
    pub macro_economy: String,
    pub industry: String,
    pub strategy: String,
}

impl CategoryLabels {
    /// Label for a filter tab; `None` is the "all" tab.
    pub fn label(&self, category: Option<Category>) -> &str {
        match category {
            None => &self.all,
            Some(Category::Macro) => &self.macro_economy,
            Some(Category::Industry) => &self.industry,
            Some(Category::Strategy) => &self.strategy,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct MarketInsightsText {
    pub title: String,
    pub subtitle: String,
    pub read_more: String,
    pub view_archives: String,
    pub categories: CategoryLabels,
    pub articles: Vec<Article>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InquiryTypeOptions {
    pub institutional: String,
    pub individual: String,
    pub media: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ContactForm {
    pub title: String,
    pub name: String,
    pub email: String,
    #[serde(rename = "type")]
    pub inquiry_type: String,
    pub type_options: InquiryTypeOptions,
    pub message: String,
    pub submit: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ContactText {
    pub title: String,
    pub subtitle: String,
    pub address_title: String,
    pub address: String,
    pub phone_title: String,
    pub phone: String,
    pub email_title: String,
    pub email: String,
    pub email2: String,
    pub form: ContactForm,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct AuthText {
    pub login_title: String,
    pub register_title: String,
    pub email_placeholder: String,
    pub password_placeholder: String,
    pub confirm_password_placeholder: String,
    pub name_placeholder: String,
    pub submit_login: String,
    pub submit_register: String,
    pub has_account: String,
    pub no_account: String,
    pub welcome_back: String,
    pub welcome_new: String,
    pub remember_me: String,
    pub forgot_password: String,
    pub ssl_secure: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CookieConsentText {
    pub text: String,
    pub accept: String,
    pub decline: String,
}

/// One locale's copy of every keyed section.
///
/// Inquiries are not stored here: they are a single list shared by both
/// locales and live on [`ContentTree`](crate::tree::ContentTree).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LocaleContent {
    pub nav: NavText,
    pub hero: HeroText,
    pub about: AboutText,
    pub business: BusinessText,
    pub market_insights: MarketInsightsText,
    pub contact: ContactText,
    pub auth: AuthText,
    pub cookie_consent: CookieConsentText,
}

impl LocaleContent {
    /// Current value of a keyed section.
    pub fn section_value(&self, section: Section) -> ContentResult<Value> {
        match section {
            Section::Nav => encode(&self.nav),
            Section::Hero => encode(&self.hero),
            Section::About => encode(&self.about),
            Section::Business => encode(&self.business),
            Section::MarketInsights => encode(&self.market_insights),
            Section::Contact => encode(&self.contact),
            Section::Auth => encode(&self.auth),
            Section::CookieConsent => encode(&self.cookie_consent),
            Section::Inquiries => Err(shared_inquiries()),
        }
    }

    /// Replace a keyed section with `value`, which must decode into the
    /// section's record type. On error `self` is unchanged.
    pub fn set_section(&mut self, section: Section, value: Value) -> ContentResult<()> {
        match section {
            Section::Nav => self.nav = decode(section, value)?,
            Section::Hero => self.hero = decode(section, value)?,
            Section::About => self.about = decode(section, value)?,
            Section::Business => self.business = decode(section, value)?,
            Section::MarketInsights => self.market_insights = decode(section, value)?,
            Section::Contact => self.contact = decode(section, value)?,
            Section::Auth => self.auth = decode(section, value)?,
            Section::CookieConsent => self.cookie_consent = decode(section, value)?,
            Section::Inquiries => return Err(shared_inquiries()),
        }
        Ok(())
    }
}

fn shared_inquiries() -> ContentError {
    ContentError::SchemaViolation(
        "inquiries are shared by both locales and are edited through the inquiry ledger".into(),
    )
}

fn encode<T: Serialize>(value: &T) -> ContentResult<Value> {
    serde_json::to_value(value).map_err(|e| ContentError::Serialization(e.to_string()))
}

pub(crate) fn decode<T: DeserializeOwned>(section: Section, value: Value) -> ContentResult<T> {
    serde_json::from_value(value)
        .map_err(|e| ContentError::SchemaViolation(format!("{section}: {e}")))
}
