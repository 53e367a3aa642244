use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::ai::SemanticMatch;
use crate::models::{article::Article, issue::Issue, journals::Journal};
use crate::search::articles::compare_titles;
use crate::utils::contains_lowercase;

/// Home page filter: free text over title and description, plus a field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JournalFilter {
    pub query: String,
    /// `None` means every field.
    pub field: Option<String>,
}

pub fn filter_journals(journals: &[Journal], filter: &JournalFilter) -> Vec<Journal> {
    let needle = filter.query.to_lowercase();
    journals
        .iter()
        .filter(|j| {
            needle.is_empty()
                || contains_lowercase(&j.title, &needle)
                || contains_lowercase(&j.description, &needle)
        })
        .filter(|j| filter.field.as_deref().map_or(true, |f| j.field == f))
        .cloned()
        .collect()
}

pub fn distinct_fields(journals: &[Journal]) -> Vec<String> {
    let mut seen = HashSet::new();
    journals
        .iter()
        .filter(|j| seen.insert(j.field.as_str()))
        .map(|j| j.field.clone())
        .collect()
}

/// Issues of a journal, newest year first.
pub fn issues_for_journal(issues: &[Issue], journal_id: &str) -> Vec<Issue> {
    let mut listed: Vec<Issue> = issues
        .iter()
        .filter(|i| i.journal_id == journal_id)
        .cloned()
        .collect();
    listed.sort_by(|a, b| b.year.cmp(&a.year));
    listed
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueSort {
    /// Table of contents order.
    #[default]
    Page,
    Title,
}

pub fn articles_for_issue(articles: &[Article], issue_id: &str, sort: IssueSort) -> Vec<Article> {
    let mut listed: Vec<Article> = articles
        .iter()
        .filter(|a| a.issue_id == issue_id)
        .cloned()
        .collect();
    if sort == IssueSort::Title {
        listed.sort_by(|a, b| compare_titles(&a.title, &b.title));
    }
    listed
}

/// Journals to display after a semantic search. An unavailable service
/// leaves the previous list alone; an explicit "nothing relevant" empties it.
pub fn apply_semantic_match(prior: &[Journal], all: &[Journal], outcome: &SemanticMatch) -> Vec<Journal> {
    match outcome {
        SemanticMatch::Matched(titles) => all
            .iter()
            .filter(|j| titles.contains(&j.title))
            .cloned()
            .collect(),
        SemanticMatch::NoMatches => Vec::new(),
        SemanticMatch::Unavailable => prior.to_vec(),
    }
}
