use rand::Rng;
use site_types::{Article, ArticleDraft, ArticleId, Category, Locale};
use tracing::{debug, info};

use crate::error::{ContentError, ContentResult};
use crate::store::ContentStore;
use crate::validation::validate_article;

/// Cover image for an article created without one.
pub fn placeholder_image(id: ArticleId) -> String {
    let seed: u32 = rand::thread_rng().gen_range(0..1000);
    format!("https://picsum.photos/seed/{id}-{seed}/800/600")
}

/// Market-insight articles of one locale.
pub struct ArticleCatalog<'a> {
    store: &'a mut ContentStore,
    locale: Locale,
}

impl<'a> ArticleCatalog<'a> {
    pub(crate) fn new(store: &'a mut ContentStore, locale: Locale) -> Self {
        Self { store, locale }
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    /// Publish a new article at the top of the list.
    ///
    /// The id is one past the largest id this locale has ever issued, so
    /// ids of deleted articles are not handed out again.
    pub fn create(&mut self, draft: ArticleDraft) -> ContentResult<Article> {
        validate_article(&draft).into_result()?;
        let locale = self.locale;
        let article = self.store.commit("article.create", |tree, ids| {
            let id = tree.next_article_id(locale)?;
            let image = match draft.image {
                Some(image) if !image.trim().is_empty() => image,
                _ => placeholder_image(id),
            };
            let article = Article {
                id,
                title: draft.title,
                date: draft.date.unwrap_or_else(|| ids.today()),
                category: draft.category,
                image,
                summary: draft.summary,
            };
            tree.articles_mut(locale).insert(0, article.clone());
            Ok(article)
        })?;
        info!(%locale, id = article.id, "article created");
        Ok(article)
    }

    /// Replace an article's fields in place. Its id and list position are
    /// kept; an absent date or image keeps the current one.
    pub fn update(&mut self, id: ArticleId, draft: ArticleDraft) -> ContentResult<Article> {
        validate_article(&draft).into_result()?;
        let locale = self.locale;
        let article = self.store.commit("article.update", |tree, _| {
            let article = tree
                .articles_mut(locale)
                .iter_mut()
                .find(|a| a.id == id)
                .ok_or_else(|| not_found(id))?;
            article.title = draft.title;
            article.summary = draft.summary;
            article.category = draft.category;
            if let Some(date) = draft.date {
                article.date = date;
            }
            if let Some(image) = draft.image.filter(|i| !i.trim().is_empty()) {
                article.image = image;
            }
            Ok(article.clone())
        })?;
        debug!(%locale, id, "article updated");
        Ok(article)
    }

    pub fn delete(&mut self, id: ArticleId) -> ContentResult<Article> {
        let locale = self.locale;
        let removed = self.store.commit("article.delete", |tree, _| {
            let articles = tree.articles_mut(locale);
            let pos = articles
                .iter()
                .position(|a| a.id == id)
                .ok_or_else(|| not_found(id))?;
            Ok(articles.remove(pos))
        })?;
        info!(%locale, id, "article deleted");
        Ok(removed)
    }

    /// Articles in stored order, optionally narrowed to one category.
    pub fn list(&self, filter: Option<Category>) -> Vec<Article> {
        self.store
            .get()
            .articles(self.locale)
            .iter()
            .filter(|a| a.matches(filter))
            .cloned()
            .collect()
    }

    pub fn get(&self, id: ArticleId) -> Option<Article> {
        self.store
            .get()
            .articles(self.locale)
            .iter()
            .find(|a| a.id == id)
            .cloned()
    }
}

fn not_found(id: ArticleId) -> ContentError {
    ContentError::NotFound { kind: "article", id }
}
