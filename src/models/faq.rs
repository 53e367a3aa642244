use derive_more::Display;
use serde::{Deserialize, Serialize};

#[derive(Debug, Display, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FaqCategory {
    #[display("author")]
    Author,
    #[display("editor")]
    Editor,
    #[display("general")]
    General,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct FaqItem {
    pub id: String,
    pub category: FaqCategory,
    pub question: String,
    pub answer: String,
}
