use thiserror::Error;

/// Errors produced when parsing or constructing foundation types.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TypeError {
    #[error("unknown locale: {0:?} (expected \"cn\" or \"en\")")]
    UnknownLocale(String),

    #[error("unknown article category: {0:?} (expected macro, industry or strategy)")]
    UnknownCategory(String),

    #[error("unknown inquiry filter: {0:?} (expected \"all\" or \"unread\")")]
    UnknownFilter(String),

    #[error("invalid date {0:?}: expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("{0} id space exhausted")]
    IdSpaceExhausted(&'static str),
}
