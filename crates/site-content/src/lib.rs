//! Bilingual content store for the corporate site.
//!
//! This crate owns all editable site copy, the market-insight articles and
//! the visitor inquiries. It provides:
//! - `ContentTree`, the typed `cn`/`en` content structure and its stored
//!   blob layout
//! - `ContentStore` with write-through persistence to a `KvStore`
//! - `InquiryLedger`, one inquiry list shared by both locales
//! - `ArticleCatalog`, per-locale article CRUD with never-reused ids
//! - `ConsentStore`, `AdminSession` and the `Site` facade used by the
//!   presentation layer

pub mod catalog;
pub mod config;
pub mod consent;
pub mod error;
pub mod ledger;
pub mod schema;
pub mod session;
pub mod site;
pub mod store;
pub mod tree;
pub mod validation;

pub use catalog::{placeholder_image, ArticleCatalog};
pub use config::{StoreConfig, CONSENT_KEY, CONTENT_KEY};
pub use consent::{ConsentState, ConsentStore};
pub use error::{ContentError, ContentResult, FieldError, ValidationErrors};
pub use ledger::InquiryLedger;
pub use schema::{
    AboutText, AuthText, BusinessText, CategoryLabels, ContactForm, ContactText,
    CookieConsentText, HeroText, InquiryTypeOptions, LocaleContent, MarketInsightsText, NavText,
    Philosophy, Section, TitledItem,
};
pub use session::AdminSession;
pub use site::Site;
pub use store::{ContentStore, SiteOverview};
pub use tree::{ContentTree, LocaleView};
pub use validation::{is_valid_email, validate_article, validate_inquiry};
