use crate::models::{
    article::Article,
    faq::{FaqCategory, FaqItem},
    log_entry::LogEntry,
    user::{Role, User},
};
use crate::utils::contains_lowercase;

/// Admin user list: name or email contains `term`, optionally one role.
pub fn filter_users(users: &[User], term: &str, role: Option<Role>) -> Vec<User> {
    let needle = term.to_lowercase();
    users
        .iter()
        .filter(|u| {
            needle.is_empty()
                || contains_lowercase(&u.name, &needle)
                || contains_lowercase(&u.email, &needle)
        })
        .filter(|u| role.map_or(true, |r| u.role == r))
        .cloned()
        .collect()
}

pub fn filter_logs(logs: &[LogEntry], term: &str) -> Vec<LogEntry> {
    let needle = term.to_lowercase();
    logs.iter()
        .filter(|l| {
            contains_lowercase(&l.action, &needle)
                || contains_lowercase(&l.user_name, &needle)
                || contains_lowercase(&l.details, &needle)
        })
        .cloned()
        .collect()
}

pub fn filter_faqs(faqs: &[FaqItem], category: Option<FaqCategory>) -> Vec<FaqItem> {
    faqs.iter()
        .filter(|f| category.map_or(true, |c| f.category == c))
        .cloned()
        .collect()
}

/// Publications of a profile, matched on the exact author name.
pub fn articles_by_author(articles: &[Article], name: &str) -> Vec<Article> {
    articles
        .iter()
        .filter(|a| a.has_author_named(name))
        .cloned()
        .collect()
}
