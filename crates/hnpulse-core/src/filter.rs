//! Keyword filter over story titles.
//!
//! A [`FilterSet`] is normalized on construction (trimmed, lowercased, blanks
//! and duplicates dropped), so an empty set is the only "match everything"
//! state and matching never has to re-normalize.

use serde::{Deserialize, Serialize};

use crate::item::Item;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct FilterSet {
    keywords: Vec<String>,
}

impl FilterSet {
    pub fn new<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut normalized: Vec<String> = Vec::new();
        for kw in keywords {
            let kw = kw.as_ref().trim().to_lowercase();
            if !kw.is_empty() && !normalized.contains(&kw) {
                normalized.push(kw);
            }
        }
        Self {
            keywords: normalized,
        }
    }

    /// Parse comma-separated user input (`"rust, Go ,ai"`).
    pub fn parse(input: &str) -> Self {
        Self::new(input.split(','))
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    /// Whether any keyword is configured. An inactive set matches everything.
    pub fn is_active(&self) -> bool {
        !self.keywords.is_empty()
    }

    pub fn len(&self) -> usize {
        self.keywords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }

    pub fn matches(&self, item: &Item) -> bool {
        matches(item, self)
    }
}

impl From<Vec<String>> for FilterSet {
    fn from(keywords: Vec<String>) -> Self {
        Self::new(keywords)
    }
}

impl From<FilterSet> for Vec<String> {
    fn from(set: FilterSet) -> Self {
        set.keywords
    }
}

impl std::fmt::Display for FilterSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.keywords.join(", "))
    }
}

/// True if `filters` is empty, otherwise true iff some keyword is a substring
/// of the lowercased title.
pub fn matches(item: &Item, filters: &FilterSet) -> bool {
    if !filters.is_active() {
        return true;
    }
    let title = item.title.to_lowercase();
    filters
        .keywords
        .iter()
        .any(|kw| title.contains(kw.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn empty_filter_matches_everything() {
        let item = Item::new(1, "Anything at all");
        assert!(matches(&item, &FilterSet::default()));
    }

    #[test]
    fn matching_is_case_insensitive_substring() {
        let item = Item::new(1, "Rust vs Go");
        assert!(matches(&item, &FilterSet::new(["RUST"])));
        assert!(matches(&item, &FilterSet::new(["s g"])));
        assert!(!matches(&item, &FilterSet::new(["python"])));
    }

    #[test]
    fn any_keyword_is_enough() {
        let item = Item::new(1, "Show HN: a tiny Python profiler");
        assert!(matches(&item, &FilterSet::new(["javascript", "python"])));
    }

    #[test]
    fn normalization_drops_blanks_and_duplicates() {
        let set = FilterSet::new(["  Rust ", "", "   ", "rust", "AI"]);
        assert_eq!(set.keywords(), &["rust".to_string(), "ai".to_string()]);
    }

    #[test]
    fn blank_only_input_is_inactive() {
        let set = FilterSet::parse(" , ,, ");
        assert!(!set.is_active());
        assert!(matches(&Item::new(1, "x"), &set));
    }

    #[test]
    fn parse_splits_on_commas() {
        let set = FilterSet::parse("python, JavaScript ,machine learning");
        assert_eq!(set.len(), 3);
        assert_eq!(set.keywords()[2], "machine learning");
        assert_eq!(set.to_string(), "python, javascript, machine learning");
    }

    #[test]
    fn deserialize_normalizes() {
        let set: FilterSet = serde_json::from_str(r#"["  LLM", ""]"#).unwrap();
        assert_eq!(set.keywords(), &["llm".to_string()]);
    }

    proptest! {
        #[test]
        fn empty_set_matches_any_title(title in ".*") {
            let item = Item::new(1, title);
            prop_assert!(matches(&item, &FilterSet::default()));
        }

        #[test]
        fn keyword_in_title_always_matches(
            prefix in "[a-zA-Z ]{0,12}",
            kw in "[a-zA-Z]{1,8}",
            suffix in "[a-zA-Z ]{0,12}",
        ) {
            let title = format!("{prefix}{}{suffix}", kw.to_uppercase());
            let item = Item::new(1, title);
            prop_assert!(matches(&item, &FilterSet::new([kw.as_str()])));
        }

        #[test]
        fn adding_keywords_never_removes_matches(
            title in "[a-z ]{0,20}",
            a in "[a-z]{1,4}",
            b in "[a-z]{1,4}",
        ) {
            let item = Item::new(1, title);
            if matches(&item, &FilterSet::new([a.as_str()])) {
                prop_assert!(matches(&item, &FilterSet::new([a.as_str(), b.as_str()])));
            }
        }
    }
}
