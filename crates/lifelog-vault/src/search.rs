//! Search over decrypted entries.
//!
//! Fields are encrypted with fresh IVs, so SQL cannot match on them. The
//! session narrows candidates by the plaintext date range first, decrypts
//! them, then filters with [`SearchQuery::matches`].

use serde::{Deserialize, Serialize};

use crate::date::EntryDate;
use crate::entries::DiaryEntry;

/// Which decrypted field a query matches against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchField {
    /// Entry title.
    Title,
    /// Entry tags.
    Tags,
    /// Mood, compared as decimal text.
    Mood,
}

/// A case-insensitive substring query over a date range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    /// First date included.
    pub from: EntryDate,
    /// Last date included.
    pub to: EntryDate,
    /// Field to match.
    pub field: SearchField,
    /// Text to look for. Empty matches every entry in range.
    pub needle: String,
}

impl SearchQuery {
    /// Build a query.
    #[must_use]
    pub fn new(from: EntryDate, to: EntryDate, field: SearchField, needle: impl Into<String>) -> Self {
        Self {
            from,
            to,
            field,
            needle: needle.into(),
        }
    }

    /// Whether the date range is empty (`from > to`).
    #[must_use]
    pub fn is_empty_range(&self) -> bool {
        self.from > self.to
    }

    /// Whether `entry` satisfies the query.
    #[must_use]
    pub fn matches(&self, entry: &DiaryEntry) -> bool {
        if entry.date < self.from || entry.date > self.to {
            return false;
        }
        if self.needle.is_empty() {
            return true;
        }
        let needle = self.needle.to_lowercase();
        match self.field {
            SearchField::Title => entry.title.to_lowercase().contains(&needle),
            SearchField::Tags => entry.tags.to_lowercase().contains(&needle),
            SearchField::Mood => entry.mood.as_text().contains(needle.trim()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entries::Mood;

    fn entry(date: &str, title: &str, tags: &str, mood: u32) -> DiaryEntry {
        DiaryEntry {
            date: date.parse().unwrap(),
            title: title.into(),
            tags: tags.into(),
            mood: Mood::new(mood).unwrap(),
            content: b"never searched".to_vec(),
        }
    }

    fn query(field: SearchField, needle: &str) -> SearchQuery {
        SearchQuery::new(
            "2024-01-01".parse().unwrap(),
            "2024-12-31".parse().unwrap(),
            field,
            needle,
        )
    }

    #[test]
    fn title_match_is_case_insensitive() {
        let e = entry("2024-05-01", "Hiking in the Alps", "", 50);
        assert!(query(SearchField::Title, "alps").matches(&e));
        assert!(query(SearchField::Title, "HIKING").matches(&e));
        assert!(!query(SearchField::Title, "beach").matches(&e));
    }

    #[test]
    fn tags_match_substring() {
        let e = entry("2024-05-01", "", "travel family", 50);
        assert!(query(SearchField::Tags, "fam").matches(&e));
        assert!(!query(SearchField::Title, "fam").matches(&e));
    }

    #[test]
    fn mood_matches_decimal_text() {
        let e = entry("2024-05-01", "", "", 75);
        assert!(query(SearchField::Mood, "75").matches(&e));
        assert!(query(SearchField::Mood, "7").matches(&e));
        assert!(!query(SearchField::Mood, "80").matches(&e));
    }

    #[test]
    fn empty_needle_matches_everything_in_range() {
        let e = entry("2024-05-01", "", "", 0);
        assert!(query(SearchField::Title, "").matches(&e));
    }

    #[test]
    fn content_is_never_matched() {
        let e = entry("2024-05-01", "title", "tags", 50);
        assert!(!query(SearchField::Title, "never searched").matches(&e));
    }

    #[test]
    fn out_of_range_never_matches() {
        let e = entry("2025-01-01", "match", "", 50);
        assert!(!query(SearchField::Title, "match").matches(&e));
    }

    #[test]
    fn inverted_range_is_empty() {
        let q = SearchQuery::new(
            "2024-12-31".parse().unwrap(),
            "2024-01-01".parse().unwrap(),
            SearchField::Title,
            "",
        );
        assert!(q.is_empty_range());
        assert!(!q.matches(&entry("2024-06-01", "", "", 50)));
    }
}
