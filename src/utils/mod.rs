use uuid::Uuid;

/// Fresh identifier for a record created through a form, e.g. `j-4f1c...`.
pub fn new_id(prefix: &str) -> String {
    let uuid = Uuid::new_v4().simple().to_string();
    format!("{}-{}", prefix, &uuid[..12])
}

/// Case-insensitive substring test. `needle` must already be lowercase.
pub fn contains_lowercase(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_carry_their_prefix() {
        let id = new_id("a");
        assert!(id.starts_with("a-"));
        assert_eq!(id.len(), 14);
        assert_ne!(id, new_id("a"));
    }

    #[test]
    fn substring_ignores_case_of_haystack() {
        assert!(contains_lowercase("CRISPR Advances", "crispr"));
        assert!(!contains_lowercase("Transformers", "crispr"));
    }
}
