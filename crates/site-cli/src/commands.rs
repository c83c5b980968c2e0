use std::fs;
use std::sync::Arc;

use anyhow::Context;
use colored::Colorize;
use serde::Serialize;
use serde_json::{json, Value};
use site_content::{ConsentState, ContentError, ContentStore, Section, Site};
use site_store::FileKvStore;
use site_types::{Article, ArticleDraft, Inquiry, InquiryDraft, InquiryFilter};
use tracing::debug;

use crate::cli::*;
use crate::config::SiteConfig;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let config = SiteConfig::load(cli.config.as_deref())?.with_data_dir(cli.data_dir);
    let mut site = open_site(&config)?;
    let format = cli.format;
    match cli.command {
        Command::Show(args) => cmd_show(&site, args, format),
        Command::Set(args) => cmd_set(&mut site, args),
        Command::Section(args) => cmd_section(&mut site, args),
        Command::Article(args) => cmd_article(&mut site, args, format),
        Command::Inquiry(args) => cmd_inquiry(&mut site, args, format),
        Command::Consent(args) => cmd_consent(&site, args, format),
        Command::Overview => cmd_overview(&site, format),
        Command::Reset => cmd_reset(&mut site),
    }
}

pub fn open_site(config: &SiteConfig) -> anyhow::Result<Site> {
    debug!(data_dir = %config.data_dir.display(), "opening site");
    let backend = FileKvStore::open(&config.data_dir)
        .with_context(|| format!("opening data directory {}", config.data_dir.display()))?;
    let site = Site::open(Arc::new(backend), config.store.clone())?;
    if let Some(anomaly) = site.content().load_anomaly() {
        eprintln!(
            "{} stored content could not be loaded ({anomaly}); showing built-in defaults",
            "warning:".yellow().bold()
        );
    }
    Ok(site)
}

/// The console is the admin surface; it signs in implicitly.
fn admin(site: &mut Site) -> anyhow::Result<&mut ContentStore> {
    site.login();
    Ok(site.admin()?)
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Command-line values are plain text unless they look like JSON.
fn parse_value(raw: &str) -> anyhow::Result<Value> {
    let trimmed = raw.trim_start();
    if trimmed.starts_with(['{', '[', '"']) {
        serde_json::from_str(raw).context("value looks like JSON but does not parse")
    } else {
        Ok(Value::String(raw.to_string()))
    }
}

fn render_scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn cmd_show(site: &Site, args: ShowArgs, format: OutputFormat) -> anyhow::Result<()> {
    let locale = args.locale.unwrap_or(site.locale());
    let tree = site.content().get();
    match (args.section, args.key) {
        (Some(section), Some(key)) => {
            let value = tree.field(locale, section, &key)?;
            match format {
                OutputFormat::Json => print_json(&value),
                OutputFormat::Text => {
                    println!("{}", render_scalar(&value));
                    Ok(())
                }
            }
        }
        (Some(section), None) => print_json(&tree.section_value(locale, section)?),
        (None, _) => match format {
            OutputFormat::Json => {
                let blob = serde_json::to_value(&*tree)?;
                print_json(&blob[locale.as_str()])
            }
            OutputFormat::Text => {
                println!("{} {}", "Locale:".bold(), locale.as_str().cyan());
                for section in Section::ALL {
                    let detail = match tree.section_value(locale, section)? {
                        Value::Array(items) => format!("{} entries", items.len()),
                        Value::Object(fields) => format!("{} keys", fields.len()),
                        _ => String::new(),
                    };
                    println!("  {} {}", format!("{:<16}", section.as_str()).bold(), detail.dimmed());
                }
                Ok(())
            }
        },
    }
}

fn cmd_set(site: &mut Site, args: SetArgs) -> anyhow::Result<()> {
    let value = parse_value(&args.value)?;
    admin(site)?.update_field(args.locale, args.section, &args.key, value)?;
    println!(
        "{} Updated {}.{}.{}",
        "✓".green().bold(),
        args.locale,
        args.section,
        args.key.bold()
    );
    Ok(())
}

fn cmd_section(site: &mut Site, args: SectionArgs) -> anyhow::Result<()> {
    let raw = match (&args.value, &args.file) {
        (_, Some(path)) => fs::read_to_string(path)
            .with_context(|| format!("reading section file {}", path.display()))?,
        (Some(value), None) => value.clone(),
        (None, None) => anyhow::bail!("a section value or --file is required"),
    };
    let value: Value = serde_json::from_str(&raw).context("section value is not valid JSON")?;
    admin(site)?.replace_section(args.locale, args.section, value)?;
    println!(
        "{} Replaced {}.{}",
        "✓".green().bold(),
        args.locale,
        args.section.as_str().bold()
    );
    Ok(())
}

fn print_articles(articles: &[Article]) {
    if articles.is_empty() {
        println!("No articles.");
        return;
    }
    for a in articles {
        println!(
            "{}  {}  {}  {}",
            format!("{:>4}", a.id).yellow(),
            a.date.to_string().dimmed(),
            format!("{:<8}", a.category.as_str()).cyan(),
            a.title
        );
    }
}

fn cmd_article(site: &mut Site, args: ArticleArgs, format: OutputFormat) -> anyhow::Result<()> {
    let locale = args.locale;
    let store = admin(site)?;
    let mut catalog = store.articles(locale);
    let (verb, article) = match args.action {
        ArticleAction::List { category } => {
            let articles = catalog.list(category);
            return match format {
                OutputFormat::Json => print_json(&articles),
                OutputFormat::Text => {
                    print_articles(&articles);
                    Ok(())
                }
            };
        }
        ArticleAction::Add(fields) => {
            let mut draft = ArticleDraft::new(fields.title, fields.summary, fields.category);
            draft.date = fields.date;
            draft.image = fields.image;
            ("Published", catalog.create(draft)?)
        }
        ArticleAction::Edit { id, fields } => {
            let current = catalog
                .get(id)
                .ok_or(ContentError::NotFound { kind: "article", id })?;
            let mut draft = ArticleDraft::from_article(&current);
            if let Some(title) = fields.title {
                draft.title = title;
            }
            if let Some(summary) = fields.summary {
                draft.summary = summary;
            }
            if let Some(category) = fields.category {
                draft.category = category;
            }
            if fields.date.is_some() {
                draft.date = fields.date;
            }
            if fields.image.is_some() {
                draft.image = fields.image;
            }
            ("Updated", catalog.update(id, draft)?)
        }
        ArticleAction::Delete { id } => ("Deleted", catalog.delete(id)?),
    };

    match format {
        OutputFormat::Json => print_json(&article),
        OutputFormat::Text => {
            println!(
                "{} {} {} article #{}: {}",
                "✓".green().bold(),
                verb,
                locale,
                article.id.to_string().yellow(),
                article.title
            );
            Ok(())
        }
    }
}

fn print_inquiries(inquiries: &[Inquiry]) {
    if inquiries.is_empty() {
        println!("No inquiries.");
        return;
    }
    for inq in inquiries {
        let marker = if inq.status.is_unread() {
            "●".blue().bold()
        } else {
            " ".normal()
        };
        println!(
            "{} {}  {}  {} <{}>  {}",
            marker,
            inq.id.to_string().yellow(),
            inq.date.to_string().dimmed(),
            inq.name.bold(),
            inq.email,
            inq.inquiry_type.cyan()
        );
        if !inq.message.is_empty() {
            println!("    {}", inq.message);
        }
    }
}

fn cmd_inquiry(site: &mut Site, args: InquiryArgs, format: OutputFormat) -> anyhow::Result<()> {
    let inquiry = match args.action {
        InquiryAction::Submit {
            name,
            email,
            inquiry_type,
            message,
        } => {
            let draft = InquiryDraft::new(name, email, inquiry_type, message);
            match site.submit_inquiry(&draft) {
                Ok(inquiry) => inquiry,
                Err(ContentError::Validation(errors)) => {
                    for field in &errors.fields {
                        eprintln!("  {} {}", format!("{}:", field.field).red().bold(), field.message);
                    }
                    return Err(ContentError::Validation(errors).into());
                }
                Err(e) => return Err(e.into()),
            }
        }
        InquiryAction::List { filter } => {
            let ledger = admin(site)?.inquiries();
            let inquiries = ledger.list(filter);
            return match format {
                OutputFormat::Json => print_json(&inquiries),
                OutputFormat::Text => {
                    println!(
                        "{} unread of {}",
                        ledger.unread_count().to_string().bold(),
                        ledger.list(InquiryFilter::All).len()
                    );
                    print_inquiries(&inquiries);
                    Ok(())
                }
            };
        }
        InquiryAction::Read { id } => admin(site)?.inquiries().mark_read(id)?,
        InquiryAction::Delete { id } => admin(site)?.inquiries().remove(id)?,
    };

    match format {
        OutputFormat::Json => print_json(&inquiry),
        OutputFormat::Text => {
            println!(
                "{} Inquiry {} from {} is {}",
                "✓".green().bold(),
                inquiry.id.to_string().yellow(),
                inquiry.name.bold(),
                inquiry.status
            );
            Ok(())
        }
    }
}

fn cmd_consent(site: &Site, args: ConsentArgs, format: OutputFormat) -> anyhow::Result<()> {
    let consent = site.consent();
    match args.action.unwrap_or(ConsentAction::Show) {
        ConsentAction::Show => {}
        ConsentAction::Accept => consent.accept()?,
        ConsentAction::Decline => consent.decline()?,
        ConsentAction::Clear => consent.clear()?,
    }
    let state = consent.get()?;
    match format {
        OutputFormat::Json => print_json(&json!({ "state": state })),
        OutputFormat::Text => {
            let shown = match state {
                ConsentState::Accepted => state.to_string().green(),
                ConsentState::Declined => state.to_string().red(),
                ConsentState::Unset => state.to_string().dimmed(),
            };
            println!("Cookie consent: {shown}");
            Ok(())
        }
    }
}

fn cmd_overview(site: &Site, format: OutputFormat) -> anyhow::Result<()> {
    let overview = site.content().overview();
    match format {
        OutputFormat::Json => print_json(&overview),
        OutputFormat::Text => {
            println!("{}", "Overview".bold());
            println!(
                "  Articles:  {} cn, {} en",
                overview.articles.cn.to_string().yellow(),
                overview.articles.en.to_string().yellow()
            );
            println!(
                "  Inquiries: {} total, {} unread",
                overview.inquiries_total.to_string().yellow(),
                overview.inquiries_unread.to_string().blue().bold()
            );
            Ok(())
        }
    }
}

fn cmd_reset(site: &mut Site) -> anyhow::Result<()> {
    admin(site)?.reset()?;
    println!("{} Content restored to built-in defaults", "✓".green().bold());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use site_types::Locale;

    fn run(dir: &tempfile::TempDir, args: &[&str]) -> anyhow::Result<()> {
        let data_dir = dir.path().to_str().unwrap();
        let mut argv = vec!["site-admin", "--data-dir", data_dir];
        argv.extend_from_slice(args);
        run_command(Cli::try_parse_from(argv)?)
    }

    fn reopen(dir: &tempfile::TempDir) -> Site {
        let config = SiteConfig::default().with_data_dir(Some(dir.path().to_path_buf()));
        open_site(&config).unwrap()
    }

    #[test]
    fn parse_value_rules() {
        assert_eq!(parse_value("Hello").unwrap(), json!("Hello"));
        assert_eq!(parse_value("42").unwrap(), json!("42"));
        assert_eq!(parse_value("\"quoted\"").unwrap(), json!("quoted"));
        assert_eq!(parse_value("[1, 2]").unwrap(), json!([1, 2]));
        assert!(parse_value("{broken").is_err());
    }

    #[test]
    fn set_persists_to_data_dir() {
        let dir = tempfile::tempdir().unwrap();
        run(&dir, &["set", "en", "hero", "title", "Invest Wisely"]).unwrap();
        let site = reopen(&dir);
        assert_eq!(site.content().view(Locale::En).hero.title, "Invest Wisely");
        assert!(dir.path().join("site_content_v1").is_file());
    }

    #[test]
    fn set_unknown_key_fails_without_writing() {
        let dir = tempfile::tempdir().unwrap();
        assert!(run(&dir, &["set", "en", "hero", "tagline", "x"]).is_err());
        assert!(!dir.path().join("site_content_v1").exists());
    }

    #[test]
    fn section_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("consent.json");
        fs::write(&file, r#"{"text": "We use cookies.", "accept": "OK", "decline": "No"}"#).unwrap();
        run(&dir, &["section", "en", "cookieConsent", "--file", file.to_str().unwrap()]).unwrap();
        assert_eq!(reopen(&dir).content().view(Locale::En).cookie_consent.accept, "OK");
    }

    #[test]
    fn article_lifecycle() {
        let dir = tempfile::tempdir().unwrap();
        run(&dir, &[
            "article", "-l", "en", "add", "--title", "Rates", "--summary", "Outlook",
            "--category", "macro", "--date", "2024-06-20",
        ])
        .unwrap();
        run(&dir, &["article", "-l", "en", "edit", "7", "--summary", "Revised"]).unwrap();

        let site = reopen(&dir);
        let tree = site.content().get();
        let article = tree.articles(Locale::En).iter().find(|a| a.id == 7).unwrap();
        assert_eq!(article.title, "Rates");
        assert_eq!(article.summary, "Revised");

        run(&dir, &["article", "-l", "en", "delete", "7"]).unwrap();
        assert!(run(&dir, &["article", "-l", "en", "delete", "7"]).is_err());
        run(&dir, &["--format", "json", "article", "list", "--category", "strategy"]).unwrap();
    }

    #[test]
    fn inquiry_submit_and_read() {
        let dir = tempfile::tempdir().unwrap();
        run(&dir, &[
            "inquiry", "submit", "--name", "Zhang", "--email", "zhang@example.com",
            "--type", "institutional", "--message", "interested",
        ])
        .unwrap();
        let site = reopen(&dir);
        let newest = site.content().get().list_inquiries(InquiryFilter::All)[0].clone();
        assert_eq!(newest.name, "Zhang");
        assert!(newest.status.is_unread());

        run(&dir, &["inquiry", "read", &newest.id.to_string()]).unwrap();
        run(&dir, &["inquiry", "list", "--filter", "unread"]).unwrap();
        let site = reopen(&dir);
        let tree = site.content().get();
        let stored = tree.inquiries().iter().find(|i| i.id == newest.id).unwrap();
        assert!(!stored.status.is_unread());
    }

    #[test]
    fn invalid_inquiry_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let err = run(&dir, &["inquiry", "submit", "--name", "", "--email", "bad"]).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ContentError>(),
            Some(ContentError::Validation(_))
        ));
        assert!(!dir.path().join("site_content_v1").exists());
    }

    #[test]
    fn consent_commands() {
        let dir = tempfile::tempdir().unwrap();
        run(&dir, &["consent", "accept"]).unwrap();
        assert_eq!(fs::read_to_string(dir.path().join("cookieConsent")).unwrap(), "true");
        run(&dir, &["consent", "clear"]).unwrap();
        assert!(!dir.path().join("cookieConsent").exists());
        run(&dir, &["consent"]).unwrap();
    }

    #[test]
    fn reset_removes_stored_content() {
        let dir = tempfile::tempdir().unwrap();
        run(&dir, &["set", "cn", "hero", "cta", "立即咨询"]).unwrap();
        assert!(dir.path().join("site_content_v1").exists());
        run(&dir, &["reset"]).unwrap();
        assert!(!dir.path().join("site_content_v1").exists());
        run(&dir, &["overview"]).unwrap();
        run(&dir, &["show", "-l", "cn", "hero", "cta"]).unwrap();
    }

    #[test]
    fn corrupt_store_still_opens() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("site_content_v1"), "not json").unwrap();
        let site = reopen(&dir);
        assert!(site.content().load_anomaly().is_some());
        run(&dir, &["show"]).unwrap();
    }
}
