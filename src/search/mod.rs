pub mod articles;
pub mod directory;
pub mod journals;

pub use articles::{filter_articles, ArticleFilter, SortKey};
