use std::sync::{Arc, RwLock};

use log::info;

use crate::db::repository::{CatalogRepository, ResourceKind};
use crate::db::seed;
use crate::errors::PortalError;
use crate::models::{
    article::Article, faq::FaqItem, issue::Issue, journals::Journal, log_entry::LogEntry,
    user::User,
};

#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub journals: Vec<Journal>,
    pub issues: Vec<Issue>,
    pub articles: Vec<Article>,
    pub users: Vec<User>,
    pub logs: Vec<LogEntry>,
    pub faqs: Vec<FaqItem>,
}

impl Dataset {
    fn has_journal(&self, id: &str) -> bool {
        self.journals.iter().any(|j| j.id == id)
    }

    fn check_issue_refs(&self, issue: &Issue) -> Result<(), PortalError> {
        if self.has_journal(&issue.journal_id) {
            Ok(())
        } else {
            Err(PortalError::NotFound(format!(
                "Journal with ID {} not found",
                issue.journal_id
            )))
        }
    }

    fn check_article_refs(&self, article: &Article) -> Result<(), PortalError> {
        if !self.has_journal(&article.journal_id) {
            return Err(PortalError::NotFound(format!(
                "Journal with ID {} not found",
                article.journal_id
            )));
        }
        match self.issues.iter().find(|i| i.id == article.issue_id) {
            Some(issue) if issue.journal_id == article.journal_id => Ok(()),
            Some(issue) => Err(PortalError::ValidationError(format!(
                "Issue {} belongs to journal {}, not {}",
                issue.id, issue.journal_id, article.journal_id
            ))),
            None => Err(PortalError::NotFound(format!(
                "Issue with ID {} not found",
                article.issue_id
            ))),
        }
    }
}

// Insert-or-replace keeping the original position of an existing record
fn upsert<T>(items: &mut Vec<T>, item: T, same: impl Fn(&T) -> bool) -> bool {
    match items.iter().position(same) {
        Some(pos) => {
            items[pos] = item;
            false
        }
        None => {
            items.push(item);
            true
        }
    }
}

/// In-memory stand-in for a database. Readers share an `Arc` snapshot;
/// writers copy it, apply the change and swap the new copy in.
pub struct MockStore {
    current: RwLock<Arc<Dataset>>,
}

impl MockStore {
    pub fn new(dataset: Dataset) -> Self {
        Self {
            current: RwLock::new(Arc::new(dataset)),
        }
    }

    pub fn seeded() -> Self {
        Self::new(seed::mock_dataset())
    }

    fn modify<T>(
        &self,
        change: impl FnOnce(&mut Dataset) -> Result<T, PortalError>,
    ) -> Result<T, PortalError> {
        let mut guard = self
            .current
            .write()
            .map_err(|e| PortalError::InternalError(format!("Store lock poisoned: {}", e)))?;
        let mut next = Dataset::clone(&guard);
        let out = change(&mut next)?;
        *guard = Arc::new(next);
        Ok(out)
    }
}

impl CatalogRepository for MockStore {
    fn snapshot(&self) -> Result<Arc<Dataset>, PortalError> {
        self.current
            .read()
            .map(|guard| Arc::clone(&guard))
            .map_err(|e| PortalError::InternalError(format!("Store lock poisoned: {}", e)))
    }

    fn save_journal(&self, journal: Journal) -> Result<(), PortalError> {
        self.modify(|data| {
            let id = journal.id.clone();
            let created = upsert(&mut data.journals, journal, |j| j.id == id);
            info!("Journal {} {}", id, if created { "created" } else { "updated" });
            Ok(())
        })
    }

    fn save_issue(&self, issue: Issue) -> Result<(), PortalError> {
        self.modify(|data| {
            data.check_issue_refs(&issue)?;
            if let Some(existing) = data.issues.iter().find(|i| i.id == issue.id) {
                if existing.journal_id != issue.journal_id {
                    return Err(PortalError::Conflict(format!(
                        "Issue {} already belongs to journal {}",
                        issue.id, existing.journal_id
                    )));
                }
            }
            let id = issue.id.clone();
            let created = upsert(&mut data.issues, issue, |i| i.id == id);
            info!("Issue {} {}", id, if created { "created" } else { "updated" });
            Ok(())
        })
    }

    fn save_article(&self, article: Article) -> Result<(), PortalError> {
        self.modify(|data| {
            data.check_article_refs(&article)?;
            let id = article.id.clone();
            let created = upsert(&mut data.articles, article, |a| a.id == id);
            info!("Article {} {}", id, if created { "created" } else { "updated" });
            Ok(())
        })
    }

    fn save_user(&self, user: User) -> Result<(), PortalError> {
        self.modify(|data| {
            let duplicate_email = data
                .users
                .iter()
                .any(|u| u.id != user.id && u.email.eq_ignore_ascii_case(&user.email));
            if duplicate_email {
                return Err(PortalError::Conflict(format!(
                    "A user with email {} already exists",
                    user.email
                )));
            }
            let id = user.id.clone();
            let created = upsert(&mut data.users, user, |u| u.id == id);
            info!("User {} {}", id, if created { "created" } else { "updated" });
            Ok(())
        })
    }

    fn delete(&self, kind: ResourceKind, id: &str) -> Result<(), PortalError> {
        self.modify(|data| {
            let before = match kind {
                ResourceKind::Journal => data.journals.len(),
                ResourceKind::Issue => data.issues.len(),
                ResourceKind::Article => data.articles.len(),
                ResourceKind::User => data.users.len(),
            };

            let removed = match kind {
                ResourceKind::Journal => {
                    data.journals.retain(|j| j.id != id);
                    data.issues.retain(|i| i.journal_id != id);
                    data.articles.retain(|a| a.journal_id != id);
                    before - data.journals.len()
                }
                ResourceKind::Issue => {
                    data.issues.retain(|i| i.id != id);
                    data.articles.retain(|a| a.issue_id != id);
                    before - data.issues.len()
                }
                ResourceKind::Article => {
                    data.articles.retain(|a| a.id != id);
                    before - data.articles.len()
                }
                ResourceKind::User => {
                    data.users.retain(|u| u.id != id);
                    before - data.users.len()
                }
            };

            if removed == 0 {
                return Err(PortalError::NotFound(format!(
                    "{} with ID {} not found",
                    kind, id
                )));
            }
            info!("Deleted {} with ID {}", kind, id);
            Ok(())
        })
    }

    fn append_log(&self, entry: LogEntry) -> Result<(), PortalError> {
        self.modify(|data| {
            data.logs.insert(0, entry);
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::article::ArticleStatus;
    use crate::models::user::Role;

    fn article(id: &str, issue_id: &str, journal_id: &str) -> Article {
        Article {
            id: id.to_string(),
            title: "A title".to_string(),
            authors: vec![],
            abstract_text: "An abstract".to_string(),
            publish_date: "2024-01-01".to_string(),
            keywords: vec![],
            pdf_url: None,
            page_range: "1-2".to_string(),
            issue_id: issue_id.to_string(),
            journal_id: journal_id.to_string(),
            status: ArticleStatus::Draft,
        }
    }

    #[test]
    fn readers_keep_their_snapshot_across_writes() {
        let store = MockStore::seeded();
        let before = store.snapshot().unwrap();
        store.delete(ResourceKind::Article, "a1").unwrap();

        assert_eq!(before.articles.len(), 3);
        assert_eq!(store.snapshot().unwrap().articles.len(), 2);
    }

    #[test]
    fn deleting_a_journal_cascades_to_issues_and_articles() {
        let store = MockStore::seeded();
        store.delete(ResourceKind::Journal, "j1").unwrap();

        let data = store.snapshot().unwrap();
        assert!(data.issues.iter().all(|i| i.journal_id != "j1"));
        assert!(data.articles.iter().all(|a| a.journal_id != "j1"));
        assert_eq!(data.articles.len(), 1);
    }

    #[test]
    fn deleting_a_missing_record_is_not_found() {
        let store = MockStore::seeded();
        let err = store.delete(ResourceKind::Issue, "nope").unwrap_err();
        assert!(matches!(err, PortalError::NotFound(_)));
    }

    #[test]
    fn article_must_reference_an_issue_of_its_journal() {
        let store = MockStore::seeded();

        let err = store.save_article(article("a9", "i3", "j1")).unwrap_err();
        assert!(matches!(err, PortalError::ValidationError(_)));

        let err = store.save_article(article("a9", "i9", "j1")).unwrap_err();
        assert!(matches!(err, PortalError::NotFound(_)));

        store.save_article(article("a9", "i2", "j1")).unwrap();
        assert_eq!(store.get_article("a9").unwrap().issue_id, "i2");
    }

    #[test]
    fn issue_must_reference_an_existing_journal() {
        let store = MockStore::seeded();
        let issue = Issue {
            id: "i9".to_string(),
            volume: 1,
            number: 1,
            year: 2025,
            cover_image: None,
            journal_id: "j42".to_string(),
        };
        assert!(matches!(
            store.save_issue(issue).unwrap_err(),
            PortalError::NotFound(_)
        ));
    }

    #[test]
    fn updates_keep_collection_order() {
        let store = MockStore::seeded();
        let mut journal = store.get_journal("j2").unwrap();
        journal.title = "Modern Medical Research Letters".to_string();
        store.save_journal(journal).unwrap();

        let ids: Vec<String> = store
            .snapshot()
            .unwrap()
            .journals
            .iter()
            .map(|j| j.id.clone())
            .collect();
        assert_eq!(ids, vec!["j1", "j2", "j3", "j4"]);
        assert_eq!(
            store.get_journal("j2").unwrap().title,
            "Modern Medical Research Letters"
        );
    }

    #[test]
    fn duplicate_user_email_conflicts() {
        let store = MockStore::seeded();
        let mut user = store.get_user("u2").unwrap();
        user.id = "u9".to_string();
        user.email = "JANE@mit.edu".to_string();
        assert!(matches!(
            store.save_user(user).unwrap_err(),
            PortalError::Conflict(_)
        ));
    }

    #[test]
    fn demo_user_is_looked_up_by_role() {
        let store = MockStore::seeded();
        let editor = store.user_for_role(Role::Editor).unwrap().unwrap();
        assert_eq!(editor.name, "Editor John");
    }

    #[test]
    fn logs_are_prepended() {
        let store = MockStore::seeded();
        store
            .append_log(LogEntry::record("u1", "System Admin", "Create Journal", "x".into()))
            .unwrap();
        let data = store.snapshot().unwrap();
        assert_eq!(data.logs.len(), 5);
        assert_eq!(data.logs[0].action, "Create Journal");
        assert_eq!(data.logs[1].id, "l1");
    }
}
