use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use site_content::Section;
use site_types::{parse_date, ArticleId, Category, InquiryFilter, InquiryId, Locale};

#[derive(Parser)]
#[command(
    name = "site-admin",
    about = "Admin console for the bilingual site content store",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Directory holding the stored content (overrides the config file)
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// TOML configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Show a locale, a section, or a single field
    Show(ShowArgs),
    /// Set one field of one section
    Set(SetArgs),
    /// Replace a whole section
    Section(SectionArgs),
    /// Manage market-insight articles
    Article(ArticleArgs),
    /// Manage visitor inquiries
    Inquiry(InquiryArgs),
    /// Inspect or change the cookie-consent flag
    Consent(ConsentArgs),
    /// Dashboard counters
    Overview,
    /// Restore the built-in content and clear stored changes
    Reset,
}

#[derive(Args)]
pub struct ShowArgs {
    #[arg(short, long)]
    pub locale: Option<Locale>,
    pub section: Option<Section>,
    pub key: Option<String>,
}

#[derive(Args)]
pub struct SetArgs {
    pub locale: Locale,
    pub section: Section,
    pub key: String,
    /// Text value; values starting with `{`, `[` or `"` are parsed as JSON
    pub value: String,
}

#[derive(Args)]
pub struct SectionArgs {
    pub locale: Locale,
    pub section: Section,
    /// Section record as JSON
    #[arg(required_unless_present = "file")]
    pub value: Option<String>,
    /// Read the section record from a JSON file
    #[arg(long, conflicts_with = "value")]
    pub file: Option<PathBuf>,
}

#[derive(Args)]
pub struct ArticleArgs {
    #[arg(short, long, global = true, default_value = "cn")]
    pub locale: Locale,
    #[command(subcommand)]
    pub action: ArticleAction,
}

#[derive(Subcommand)]
pub enum ArticleAction {
    /// List articles in published order
    List {
        #[arg(long)]
        category: Option<Category>,
    },
    /// Publish a new article
    Add(ArticleFields),
    /// Edit an existing article in place
    Edit {
        id: ArticleId,
        #[command(flatten)]
        fields: ArticleEdit,
    },
    /// Delete an article
    Delete { id: ArticleId },
}

#[derive(Args)]
pub struct ArticleFields {
    #[arg(long)]
    pub title: String,
    #[arg(long)]
    pub summary: String,
    #[arg(long, default_value = "macro")]
    pub category: Category,
    #[arg(long, value_parser = parse_date)]
    pub date: Option<NaiveDate>,
    #[arg(long)]
    pub image: Option<String>,
}

#[derive(Args)]
pub struct ArticleEdit {
    #[arg(long)]
    pub title: Option<String>,
    #[arg(long)]
    pub summary: Option<String>,
    #[arg(long)]
    pub category: Option<Category>,
    #[arg(long, value_parser = parse_date)]
    pub date: Option<NaiveDate>,
    #[arg(long)]
    pub image: Option<String>,
}

#[derive(Args)]
pub struct InquiryArgs {
    #[command(subcommand)]
    pub action: InquiryAction,
}

#[derive(Subcommand)]
pub enum InquiryAction {
    /// Submit an inquiry as a visitor would
    Submit {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long = "type", default_value = "")]
        inquiry_type: String,
        #[arg(long, default_value = "")]
        message: String,
    },
    /// List inquiries, newest first
    List {
        #[arg(long, default_value = "all")]
        filter: InquiryFilter,
    },
    /// Mark an inquiry read
    Read { id: InquiryId },
    /// Delete an inquiry
    Delete { id: InquiryId },
}

#[derive(Args)]
pub struct ConsentArgs {
    #[command(subcommand)]
    pub action: Option<ConsentAction>,
}

#[derive(Subcommand)]
pub enum ConsentAction {
    Show,
    Accept,
    Decline,
    Clear,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_show_section() {
        let cli = Cli::try_parse_from(["site-admin", "show", "-l", "en", "hero"]).unwrap();
        if let Command::Show(args) = cli.command {
            assert_eq!(args.locale, Some(Locale::En));
            assert_eq!(args.section, Some(Section::Hero));
            assert!(args.key.is_none());
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_show_unknown_section_fails() {
        assert!(Cli::try_parse_from(["site-admin", "show", "footer"]).is_err());
    }

    #[test]
    fn parse_set() {
        let cli = Cli::try_parse_from([
            "site-admin", "set", "cn", "marketInsights", "title", "市场洞察",
        ])
        .unwrap();
        if let Command::Set(args) = cli.command {
            assert_eq!(args.locale, Locale::Cn);
            assert_eq!(args.section, Section::MarketInsights);
            assert_eq!(args.key, "title");
            assert_eq!(args.value, "市场洞察");
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_section_requires_value_or_file() {
        assert!(Cli::try_parse_from(["site-admin", "section", "en", "hero"]).is_err());
        let cli = Cli::try_parse_from([
            "site-admin", "section", "en", "hero", "--file", "hero.json",
        ])
        .unwrap();
        if let Command::Section(args) = cli.command {
            assert_eq!(args.file, Some(PathBuf::from("hero.json")));
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_article_add() {
        let cli = Cli::try_parse_from([
            "site-admin", "article", "-l", "en", "add", "--title", "T", "--summary", "S",
            "--category", "strategy", "--date", "2024-05-01",
        ])
        .unwrap();
        if let Command::Article(args) = cli.command {
            assert_eq!(args.locale, Locale::En);
            let ArticleAction::Add(fields) = args.action else { panic!("wrong action") };
            assert_eq!(fields.category, Category::Strategy);
            assert_eq!(fields.date, NaiveDate::from_ymd_opt(2024, 5, 1));
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_article_bad_date() {
        assert!(Cli::try_parse_from([
            "site-admin", "article", "add", "--title", "T", "--summary", "S", "--date", "May 1",
        ])
        .is_err());
    }

    #[test]
    fn parse_article_edit() {
        let cli = Cli::try_parse_from(["site-admin", "article", "edit", "3", "--title", "New"])
            .unwrap();
        if let Command::Article(args) = cli.command {
            assert_eq!(args.locale, Locale::Cn);
            let ArticleAction::Edit { id, fields } = args.action else { panic!("wrong action") };
            assert_eq!(id, 3);
            assert_eq!(fields.title.as_deref(), Some("New"));
            assert!(fields.summary.is_none());
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_inquiry_submit() {
        let cli = Cli::try_parse_from([
            "site-admin", "inquiry", "submit", "--name", "Zhang", "--email",
            "zhang@example.com", "--type", "institutional", "--message", "interested",
        ])
        .unwrap();
        if let Command::Inquiry(InquiryArgs { action: InquiryAction::Submit { name, inquiry_type, .. } }) = cli.command {
            assert_eq!(name, "Zhang");
            assert_eq!(inquiry_type, "institutional");
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_inquiry_list_unread() {
        let cli = Cli::try_parse_from(["site-admin", "inquiry", "list", "--filter", "unread"])
            .unwrap();
        assert!(matches!(
            cli.command,
            Command::Inquiry(InquiryArgs { action: InquiryAction::List { filter: InquiryFilter::Unread } })
        ));
    }

    #[test]
    fn parse_consent_default_action() {
        let cli = Cli::try_parse_from(["site-admin", "consent"]).unwrap();
        assert!(matches!(cli.command, Command::Consent(ConsentArgs { action: None })));
    }

    #[test]
    fn parse_global_flags() {
        let cli = Cli::try_parse_from([
            "site-admin", "overview", "--verbose", "--format", "json", "--data-dir", "/tmp/site",
        ])
        .unwrap();
        assert!(cli.verbose);
        assert!(matches!(cli.format, OutputFormat::Json));
        assert_eq!(cli.data_dir, Some(PathBuf::from("/tmp/site")));
        assert!(matches!(cli.command, Command::Overview));
    }
}
