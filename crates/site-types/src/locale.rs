use std::fmt;
use std::ops::{Index, IndexMut};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// One of the two supported content variants.
///
/// Serialized as the lowercase tag used for the top-level keys of the
/// stored content blob (`"cn"` / `"en"`).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    Cn,
    En,
}

impl Locale {
    /// Both locales, in storage order.
    pub const ALL: [Locale; 2] = [Locale::Cn, Locale::En];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cn => "cn",
            Self::En => "en",
        }
    }

    /// The opposite locale.
    pub fn other(&self) -> Locale {
        match self {
            Self::Cn => Self::En,
            Self::En => Self::Cn,
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Locale {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cn" => Ok(Self::Cn),
            "en" => Ok(Self::En),
            _ => Err(TypeError::UnknownLocale(s.to_string())),
        }
    }
}

/// A pair of values, one per [`Locale`].
///
/// Serializes as `{"cn": .., "en": ..}`, the same shape as the locale
/// layer of the stored content blob.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bilingual<T> {
    pub cn: T,
    pub en: T,
}

impl<T> Bilingual<T> {
    pub fn new(cn: T, en: T) -> Self {
        Self { cn, en }
    }

    /// Same value in both slots.
    pub fn splat(value: T) -> Self
    where
        T: Clone,
    {
        Self {
            cn: value.clone(),
            en: value,
        }
    }

    pub fn get(&self, locale: Locale) -> &T {
        match locale {
            Locale::Cn => &self.cn,
            Locale::En => &self.en,
        }
    }

    pub fn get_mut(&mut self, locale: Locale) -> &mut T {
        match locale {
            Locale::Cn => &mut self.cn,
            Locale::En => &mut self.en,
        }
    }

    /// Transform both slots, passing the locale alongside each value.
    pub fn map<U>(self, mut f: impl FnMut(Locale, T) -> U) -> Bilingual<U> {
        Bilingual {
            cn: f(Locale::Cn, self.cn),
            en: f(Locale::En, self.en),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Locale, &T)> {
        [(Locale::Cn, &self.cn), (Locale::En, &self.en)].into_iter()
    }
}

impl<T> Index<Locale> for Bilingual<T> {
    type Output = T;

    fn index(&self, locale: Locale) -> &T {
        self.get(locale)
    }
}

impl<T> IndexMut<Locale> for Bilingual<T> {
    fn index_mut(&mut self, locale: Locale) -> &mut T {
        self.get_mut(locale)
    }
}
