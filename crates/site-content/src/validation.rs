//! Field validation for visitor and admin submissions.
//!
//! Messages are bilingual (`English / 中文`) because the same message is
//! shown regardless of the locale the visitor is browsing in.

use std::sync::LazyLock;

use regex::Regex;
use site_types::{ArticleDraft, InquiryDraft};

use crate::error::ValidationErrors;

static EMAIL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles"));

/// Minimum visitor name length, in characters, after trimming.
pub const MIN_NAME_CHARS: usize = 2;

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email)
}

/// Check a contact-form submission. Only `name` and `email` are gated.
pub fn validate_inquiry(draft: &InquiryDraft) -> ValidationErrors {
    let mut errors = ValidationErrors::default();

    let name = draft.name.trim();
    if name.is_empty() {
        errors.push("name", "Name is required / 姓名不能为空");
    } else if name.chars().count() < MIN_NAME_CHARS {
        errors.push(
            "name",
            "Name must be at least 2 characters / 姓名至少需要2个字符",
        );
    }

    if draft.email.trim().is_empty() {
        errors.push("email", "Email is required / 邮箱不能为空");
    } else if !is_valid_email(&draft.email) {
        errors.push("email", "Invalid email address / 邮箱格式不正确");
    }

    errors
}

/// Check an article draft from the admin editor.
pub fn validate_article(draft: &ArticleDraft) -> ValidationErrors {
    let mut errors = ValidationErrors::default();
    if draft.title.trim().is_empty() {
        errors.push("title", "Title is required / 请输入文章标题");
    }
    if draft.summary.trim().is_empty() {
        errors.push("summary", "Summary is required / 请输入文章摘要");
    }
    errors
}
