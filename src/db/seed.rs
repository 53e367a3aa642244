use crate::db::store::Dataset;
use crate::models::{
    article::{Article, ArticleStatus, Author},
    faq::{FaqCategory, FaqItem},
    issue::Issue,
    journals::Journal,
    log_entry::LogEntry,
    user::{Role, User},
};

/// The demo catalogue loaded at start-up. Every restart returns to it.
pub fn mock_dataset() -> Dataset {
    Dataset {
        journals: journals(),
        issues: issues(),
        articles: articles(),
        users: users(),
        logs: logs(),
        faqs: faqs(),
    }
}

fn journal(
    id: &str,
    title: &str,
    description: &str,
    issn: &str,
    field: &str,
    publisher: &str,
    cover: u32,
    contact_email: &str,
) -> Journal {
    Journal {
        id: id.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        issn: issn.to_string(),
        field: field.to_string(),
        publisher: publisher.to_string(),
        cover_image: format!("https://picsum.photos/400/600?random={}", cover),
        contact_email: contact_email.to_string(),
    }
}

fn journals() -> Vec<Journal> {
    vec![
        journal(
            "j1",
            "Journal of Advanced Artificial Intelligence",
            "A leading peer-reviewed journal covering machine learning, neural networks, and cognitive computing.",
            "2045-1234",
            "Computer Science",
            "TechScience Press",
            1,
            "editor@jaai.org",
        ),
        journal(
            "j2",
            "Modern Medical Research",
            "Clinical studies, reviews, and updates in general medicine and specialized healthcare fields.",
            "1098-7654",
            "Medicine",
            "HealthCorp Global",
            2,
            "submit@modmed.com",
        ),
        journal(
            "j3",
            "Quantum Physics Review",
            "Exploring the fundamental nature of reality through quantum mechanics and theoretical physics.",
            "5544-3322",
            "Physics",
            "Universe Publishing",
            3,
            "quantum@physicsreview.net",
        ),
        journal(
            "j4",
            "Global Economics Quarterly",
            "Analysis of global market trends, macroeconomics, and fiscal policy.",
            "9988-7766",
            "Economics",
            "EconWorld",
            4,
            "info@geq.org",
        ),
    ]
}

fn issue(id: &str, volume: u32, number: u32, year: i32, journal_id: &str, cover: u32) -> Issue {
    Issue {
        id: id.to_string(),
        volume,
        number,
        year,
        cover_image: Some(format!("https://picsum.photos/300/400?random={}", cover)),
        journal_id: journal_id.to_string(),
    }
}

fn issues() -> Vec<Issue> {
    vec![
        issue("i1", 12, 1, 2024, "j1", 10),
        issue("i2", 11, 4, 2023, "j1", 11),
        issue("i3", 45, 2, 2024, "j2", 12),
    ]
}

fn author(id: &str, name: &str, affiliation: &str) -> Author {
    Author {
        id: id.to_string(),
        name: name.to_string(),
        affiliation: affiliation.to_string(),
    }
}

fn keywords(words: &[&str]) -> Vec<String> {
    words.iter().map(|w| w.to_string()).collect()
}

fn articles() -> Vec<Article> {
    vec![
        Article {
            id: "a1".to_string(),
            title: "Transformer Architectures in Low-Resource Languages".to_string(),
            authors: vec![
                author("au1", "Dr. Jane Smith", "MIT"),
                author("au2", "John Doe", "Stanford"),
            ],
            abstract_text: "This paper explores the efficacy of transformer models when applied to languages with limited training datasets. We propose a new transfer learning technique that improves accuracy by 15%.".to_string(),
            publish_date: "2024-03-15".to_string(),
            keywords: keywords(&["NLP", "Transformers", "AI"]),
            pdf_url: None,
            page_range: "12-24".to_string(),
            issue_id: "i1".to_string(),
            journal_id: "j1".to_string(),
            status: ArticleStatus::Published,
        },
        Article {
            id: "a2".to_string(),
            title: "Ethical Implications of AGI".to_string(),
            authors: vec![author("au3", "Sarah Connor", "Tech Ethics Board")],
            abstract_text: "As we approach Artificial General Intelligence, the alignment problem becomes critical. This article surveys current alignment strategies and proposes a multi-layered safety framework.".to_string(),
            publish_date: "2024-03-20".to_string(),
            keywords: keywords(&["AGI", "Ethics", "Safety"]),
            pdf_url: None,
            page_range: "25-34".to_string(),
            issue_id: "i1".to_string(),
            journal_id: "j1".to_string(),
            status: ArticleStatus::Published,
        },
        Article {
            id: "a3".to_string(),
            title: "CRISPR Advances in 2023".to_string(),
            authors: vec![author("au4", "Dr. House", "Princeton Plainsboro")],
            abstract_text: "A review of the major breakthroughs in gene editing utilizing CRISPR-Cas9 technologies over the past year, focusing on therapeutic applications for hereditary diseases.".to_string(),
            publish_date: "2024-02-10".to_string(),
            keywords: keywords(&["Genetics", "CRISPR", "Medicine"]),
            pdf_url: None,
            page_range: "100-115".to_string(),
            issue_id: "i3".to_string(),
            journal_id: "j2".to_string(),
            status: ArticleStatus::Published,
        },
    ]
}

fn user(id: &str, name: &str, email: &str, role: Role, affiliation: &str, avatar: &str) -> User {
    User {
        id: id.to_string(),
        name: name.to_string(),
        email: email.to_string(),
        role,
        affiliation: affiliation.to_string(),
        avatar: Some(format!("https://ui-avatars.com/api/?name={}", avatar)),
    }
}

fn users() -> Vec<User> {
    vec![
        user(
            "u1",
            "System Admin",
            "admin@scholarflow.com",
            Role::Admin,
            "ScholarFlow HQ",
            "System+Admin&background=0D8ABC&color=fff",
        ),
        user(
            "u2",
            "Dr. Jane Smith",
            "jane@mit.edu",
            Role::Author,
            "MIT",
            "Jane+Smith&background=random",
        ),
        user(
            "u3",
            "Editor John",
            "john@journal.org",
            Role::Editor,
            "Science Press",
            "Editor+John&background=random",
        ),
        user(
            "u4",
            "Guest User",
            "guest@example.com",
            Role::Guest,
            "Independent",
            "Guest+User&background=random",
        ),
    ]
}

fn log(id: &str, user_id: &str, user_name: &str, action: &str, details: &str, timestamp: &str) -> LogEntry {
    LogEntry {
        id: id.to_string(),
        user_id: user_id.to_string(),
        user_name: user_name.to_string(),
        action: action.to_string(),
        details: details.to_string(),
        timestamp: timestamp.to_string(),
    }
}

fn logs() -> Vec<LogEntry> {
    vec![
        log("l1", "u1", "System Admin", "Create Journal", "Created \"Journal of AI\"", "2024-03-25 10:30 AM"),
        log("l2", "u2", "Dr. Jane Smith", "Submit Article", "Submitted \"Transformers...\"", "2024-03-24 14:15 PM"),
        log("l3", "u3", "Editor John", "Update Issue", "Updated Vol 12, Issue 1", "2024-03-23 09:00 AM"),
        log("l4", "u1", "System Admin", "Delete User", "Deleted user \"SpamBot\"", "2024-03-22 16:45 PM"),
    ]
}

fn faq(id: &str, category: FaqCategory, question: &str, answer: &str) -> FaqItem {
    FaqItem {
        id: id.to_string(),
        category,
        question: question.to_string(),
        answer: answer.to_string(),
    }
}

fn faqs() -> Vec<FaqItem> {
    vec![
        faq(
            "f1",
            FaqCategory::General,
            "How do I subscribe to a journal?",
            "You can subscribe by navigating to the journal page and clicking the \"Subscribe\" button. Some journals are open access and do not require subscription.",
        ),
        faq(
            "f2",
            FaqCategory::Author,
            "How do I submit an article?",
            "Register as an author, navigate to the target journal, and click \"Submit Manuscript\". You will need to upload a PDF and provide metadata.",
        ),
        faq(
            "f3",
            FaqCategory::Editor,
            "How do I review submissions?",
            "Log in to your dashboard. Pending submissions will appear in your \"My Profile\" page under \"Managed Journals\".",
        ),
        faq(
            "f4",
            FaqCategory::General,
            "Is the review process double-blind?",
            "Yes, most of our journals follow a double-blind peer review process to ensure impartiality.",
        ),
    ]
}
