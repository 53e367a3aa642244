use std::cmp::Ordering;
use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use unicode_normalization::{char::is_combining_mark, UnicodeNormalization};

use crate::auth::{can_perform, Action, AuthContext};
use crate::models::article::{Article, ArticleStatus};
use crate::utils::contains_lowercase;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    /// Keeps collection order; there is no scoring model.
    #[default]
    Relevance,
    DateDesc,
    DateAsc,
    Title,
}

/// Predicate state of the search page. Every empty field is "no restriction".
#[derive(Debug, Clone, PartialEq)]
pub struct ArticleFilter {
    pub query: String,
    pub author: String,
    pub journals: HashSet<String>,
    pub date_from: String,
    pub date_to: String,
    pub statuses: HashSet<ArticleStatus>,
}

impl Default for ArticleFilter {
    fn default() -> Self {
        Self {
            query: String::new(),
            author: String::new(),
            journals: HashSet::new(),
            date_from: String::new(),
            date_to: String::new(),
            statuses: HashSet::from([ArticleStatus::Published]),
        }
    }
}

impl ArticleFilter {
    /// Viewers who may not filter by status only ever see published work.
    pub fn restricted_to(mut self, ctx: &AuthContext) -> Self {
        if !can_perform(ctx, Action::FilterByStatus, None) {
            self.statuses = HashSet::from([ArticleStatus::Published]);
        }
        self
    }

    pub fn matches(&self, article: &Article) -> bool {
        self.matches_query(article)
            && self.matches_author(article)
            && (self.journals.is_empty() || self.journals.contains(&article.journal_id))
            && (self.date_from.is_empty() || article.publish_date.as_str() >= self.date_from.as_str())
            && (self.date_to.is_empty() || article.publish_date.as_str() <= self.date_to.as_str())
            && (self.statuses.is_empty() || self.statuses.contains(&article.status))
    }

    fn matches_query(&self, article: &Article) -> bool {
        if self.query.is_empty() {
            return true;
        }
        let needle = self.query.to_lowercase();
        contains_lowercase(&article.title, &needle)
            || contains_lowercase(&article.abstract_text, &needle)
            || article
                .keywords
                .iter()
                .any(|k| contains_lowercase(k, &needle))
    }

    fn matches_author(&self, article: &Article) -> bool {
        if self.author.is_empty() {
            return true;
        }
        let needle = self.author.to_lowercase();
        article
            .authors
            .iter()
            .any(|a| contains_lowercase(&a.name, &needle))
    }
}

// Primary collation key: decomposed, accents stripped, case folded.
fn title_key(title: &str) -> String {
    title
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .to_lowercase()
}

/// Orders titles the way a reader expects: "Émile" sorts with "emile",
/// "alpha" before "Beta". Ties fall back to case-folded, then raw order.
/// No locale tailoring is applied.
pub fn compare_titles(a: &str, b: &str) -> Ordering {
    title_key(a)
        .cmp(&title_key(b))
        .then_with(|| a.to_lowercase().cmp(&b.to_lowercase()))
        .then_with(|| a.cmp(b))
}

pub fn sort_articles(articles: &mut [Article], sort: SortKey) {
    match sort {
        SortKey::Relevance => {}
        SortKey::DateDesc => articles.sort_by(|a, b| b.publish_date.cmp(&a.publish_date)),
        SortKey::DateAsc => articles.sort_by(|a, b| a.publish_date.cmp(&b.publish_date)),
        SortKey::Title => articles.sort_by(|a, b| compare_titles(&a.title, &b.title)),
    }
}

pub fn filter_articles(articles: &[Article], filter: &ArticleFilter, sort: SortKey) -> Vec<Article> {
    let mut matched: Vec<Article> = articles
        .iter()
        .filter(|a| filter.matches(a))
        .cloned()
        .collect();
    sort_articles(&mut matched, sort);
    matched
}

/// Author names for autocomplete, first occurrence order.
pub fn distinct_authors(articles: &[Article]) -> Vec<String> {
    let mut seen = HashSet::new();
    articles
        .iter()
        .flat_map(|a| a.authors.iter())
        .filter(|au| seen.insert(au.name.as_str()))
        .map(|au| au.name.clone())
        .collect()
}
