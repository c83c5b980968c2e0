//! Foundation types for the bilingual site content store.
//!
//! This crate provides the value types shared by every other crate in the
//! workspace. Nothing here touches storage.
//!
//! # Key Types
//!
//! - [`Locale`] -- one of the two content variants, `cn` or `en`
//! - [`Bilingual`] -- a pair of values indexed by [`Locale`]
//! - [`Article`] -- a published market-insight item
//! - [`Inquiry`] -- a visitor-submitted contact request
//! - [`IdClock`] -- monotonic, time-based identifier source

pub mod article;
pub mod clock;
pub mod error;
pub mod inquiry;
pub mod locale;

pub use article::{parse_date, Article, ArticleDraft, ArticleId, Category};
pub use clock::{Clock, FixedClock, IdClock, SystemClock};
pub use error::TypeError;
pub use inquiry::{Inquiry, InquiryDraft, InquiryFilter, InquiryId, InquiryStatus};
pub use locale::{Bilingual, Locale};
