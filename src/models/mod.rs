pub mod article;
pub mod faq;
pub mod issue;
pub mod journals;
pub mod log_entry;
pub mod response;
pub mod user;
