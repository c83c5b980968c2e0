use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Article identifier, unique within one locale's article list.
pub type ArticleId = u64;

/// Closed set of market-insight categories.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Macro,
    Industry,
    Strategy,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Macro, Category::Industry, Category::Strategy];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Macro => "macro",
            Self::Industry => "industry",
            Self::Strategy => "strategy",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "macro" => Ok(Self::Macro),
            "industry" => Ok(Self::Industry),
            "strategy" => Ok(Self::Strategy),
            _ => Err(TypeError::UnknownCategory(s.to_string())),
        }
    }
}

/// A published market-insight item.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Article {
    pub id: ArticleId,
    pub title: String,
    pub date: NaiveDate,
    pub category: Category,
    /// Cover image URL.
    pub image: String,
    pub summary: String,
}

impl Article {
    /// Whether this article passes a category filter (`None` = all).
    pub fn matches(&self, filter: Option<Category>) -> bool {
        filter.map_or(true, |c| self.category == c)
    }
}

/// Editable fields of an article, as entered in the admin editor.
///
/// `date` and `image` are optional on creation; the catalog fills in
/// today's date and a placeholder cover.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArticleDraft {
    pub title: String,
    pub summary: String,
    pub category: Category,
    pub date: Option<NaiveDate>,
    pub image: Option<String>,
}

impl ArticleDraft {
    pub fn new(title: impl Into<String>, summary: impl Into<String>, category: Category) -> Self {
        Self {
            title: title.into(),
            summary: summary.into(),
            category,
            date: None,
            image: None,
        }
    }

    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    /// Draft pre-filled from an existing article, for in-place edits.
    pub fn from_article(article: &Article) -> Self {
        Self {
            title: article.title.clone(),
            summary: article.summary.clone(),
            category: article.category,
            date: Some(article.date),
            image: Some(article.image.clone()),
        }
    }
}

/// Parse a `YYYY-MM-DD` date as stored in the content blob.
pub fn parse_date(s: &str) -> Result<NaiveDate, TypeError> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|_| TypeError::InvalidDate(s.to_string()))
}
