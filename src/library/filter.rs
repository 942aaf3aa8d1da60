use crate::error::{Error, Result};

use super::model::LibraryEntry;

/// Case-insensitive substring search over entry names.
///
/// The query is trimmed and lowercased first; a blank query is an error rather
/// than "match everything". Order is preserved and `entries` is left untouched.
pub fn filter(entries: &[LibraryEntry], query: &str) -> Result<Vec<LibraryEntry>> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return Err(Error::EmptyQuery);
    }

    Ok(entries
        .iter()
        .filter(|e| e.name.to_lowercase().contains(&query))
        .cloned()
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn entries(names: &[&str]) -> Vec<LibraryEntry> {
        names
            .iter()
            .map(|n| LibraryEntry::new(Path::new("videos"), *n))
            .collect()
    }

    #[test]
    fn empty_or_blank_query_is_rejected() {
        let all = entries(&["a.mp4"]);
        assert!(matches!(filter(&all, ""), Err(Error::EmptyQuery)));
        assert!(matches!(filter(&all, "   "), Err(Error::EmptyQuery)));
    }

    #[test]
    fn query_matches_substrings_ignoring_case_and_keeps_order() {
        let all = entries(&["Beach Day.mp4", "a.mp4", "b.avi", "Birthday.MKV"]);
        let hits = filter(&all, "  B ").unwrap();
        let names: Vec<&str> = hits.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Beach Day.mp4", "b.avi", "Birthday.MKV"]);
    }

    #[test]
    fn subsequences_are_not_substrings() {
        let all = entries(&["holiday.mp4"]);
        assert!(filter(&all, "hd").unwrap().is_empty());
        assert_eq!(filter(&all, "LIDA").unwrap().len(), 1);
    }
}
