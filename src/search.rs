//! Query resolution against the catalog window.

use crate::state::{CatalogEntry, END_ID, START_ID};

/// A resolved catalog key: numeric id or lowercase name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SearchKey {
    Id(u16),
    Name(String),
}

impl SearchKey {
    pub fn cache_key(&self) -> String {
        match self {
            SearchKey::Id(id) => id.to_string(),
            SearchKey::Name(name) => name.clone(),
        }
    }
}

/// Resolve a normalized (trimmed, lowercased) query to a key within the
/// window. Order: all-digits id within range, exact name, first substring
/// hit in list order. `None` means no match in range.
pub fn resolve(entries: &[CatalogEntry], query: &str) -> Option<SearchKey> {
    if !query.is_empty() && query.chars().all(|c| c.is_ascii_digit()) {
        let id: u16 = query.parse().ok()?;
        if (START_ID..=END_ID).contains(&id) {
            return Some(SearchKey::Id(id));
        }
        return None;
    }

    if entries.iter().any(|entry| entry.name == query) {
        return Some(SearchKey::Name(query.to_string()));
    }

    entries
        .iter()
        .find(|entry| entry.name.contains(query))
        .map(|entry| SearchKey::Name(entry.name.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries(names: &[&str]) -> Vec<CatalogEntry> {
        names
            .iter()
            .map(|name| CatalogEntry {
                name: name.to_string(),
                url: String::new(),
            })
            .collect()
    }

    #[test]
    fn test_numeric_in_range() {
        assert_eq!(resolve(&[], "387"), Some(SearchKey::Id(387)));
        assert_eq!(resolve(&[], "493"), Some(SearchKey::Id(493)));
    }

    #[test]
    fn test_numeric_out_of_range() {
        assert_eq!(resolve(&[], "386"), None);
        assert_eq!(resolve(&[], "494"), None);
        // Overflowing digit strings are out of range too.
        assert_eq!(resolve(&[], "99999999999"), None);
    }

    #[test]
    fn test_exact_match_wins_over_earlier_substring() {
        let catalog = entries(&["luxray", "lucario"]);
        assert_eq!(
            resolve(&catalog, "lucario"),
            Some(SearchKey::Name("lucario".to_string()))
        );
    }

    #[test]
    fn test_substring_first_in_list_order() {
        let catalog = entries(&["luxray", "lucario"]);
        assert_eq!(
            resolve(&catalog, "lux"),
            Some(SearchKey::Name("luxray".to_string()))
        );
        assert_eq!(
            resolve(&catalog, "ario"),
            Some(SearchKey::Name("lucario".to_string()))
        );
    }

    #[test]
    fn test_no_match() {
        let catalog = entries(&["turtwig", "grotle"]);
        assert_eq!(resolve(&catalog, "pikachu"), None);
    }
}
