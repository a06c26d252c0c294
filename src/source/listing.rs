//! Sorting, searching and capping of remote file listings

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use super::FileEntry;

/// Listings longer than this are cut off
pub const MAX_LISTED_FILES: usize = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    Filename,
    Size,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortCriterion {
    pub field: SortField,
    pub descending: bool,
}

impl Default for SortCriterion {
    /// Largest files first
    fn default() -> Self {
        Self {
            field: SortField::Size,
            descending: true,
        }
    }
}

impl SortCriterion {
    /// Clicking a column: same column flips direction, another column sorts ascending
    pub fn toggle(self, field: SortField) -> Self {
        if field == self.field {
            Self {
                field,
                descending: !self.descending,
            }
        } else {
            Self {
                field,
                descending: false,
            }
        }
    }

    fn compare(&self, a: &FileEntry, b: &FileEntry) -> Ordering {
        let primary = match self.field {
            SortField::Filename => a.filename.cmp(&b.filename),
            SortField::Size => a.size.cmp(&b.size),
        };
        let primary = if self.descending {
            primary.reverse()
        } else {
            primary
        };
        primary.then_with(|| a.filename.cmp(&b.filename))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingQuery {
    /// Substring a filename must contain; empty matches everything
    pub search: String,
    pub sort: SortCriterion,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingView {
    pub entries: Vec<FileEntry>,
    /// Number of matches before the cap
    pub total_matches: usize,
}

impl ListingView {
    pub fn is_truncated(&self) -> bool {
        self.total_matches > self.entries.len()
    }
}

impl ListingQuery {
    pub fn new(search: impl Into<String>, sort: SortCriterion) -> Self {
        Self {
            search: search.into(),
            sort,
        }
    }

    pub fn apply(&self, mut entries: Vec<FileEntry>) -> ListingView {
        entries.sort_by(|a, b| self.sort.compare(a, b));
        entries.retain(|entry| entry.filename.contains(self.search.as_str()));
        let total_matches = entries.len();
        entries.truncate(MAX_LISTED_FILES);
        ListingView {
            entries,
            total_matches,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(filename: &str, size: u64) -> FileEntry {
        FileEntry {
            filename: filename.to_string(),
            size,
        }
    }

    fn names(view: &ListingView) -> Vec<&str> {
        view.entries.iter().map(|e| e.filename.as_str()).collect()
    }

    #[test]
    fn test_default_sort_is_size_descending() {
        let view = ListingQuery::default().apply(vec![
            entry("small", 1),
            entry("big", 100),
            entry("mid", 10),
        ]);
        assert_eq!(names(&view), vec!["big", "mid", "small"]);
    }

    #[test]
    fn test_ties_broken_by_filename() {
        let sort = SortCriterion {
            field: SortField::Size,
            descending: true,
        };
        let view = ListingQuery::new("", sort).apply(vec![entry("b", 5), entry("a", 5)]);
        assert_eq!(names(&view), vec!["a", "b"]);
    }

    #[test]
    fn test_toggle() {
        let sort = SortCriterion::default();
        let flipped = sort.toggle(SortField::Size);
        assert!(!flipped.descending);
        assert!(flipped.toggle(SortField::Size).descending);

        let by_name = sort.toggle(SortField::Filename);
        assert_eq!(by_name.field, SortField::Filename);
        assert!(!by_name.descending);
    }

    #[test]
    fn test_search_filters_by_substring() {
        let sort = SortCriterion::default().toggle(SortField::Filename);
        let view = ListingQuery::new("run", sort).apply(vec![
            entry("runs/a.json", 1),
            entry("other.json", 1),
            entry("rerun.json", 1),
        ]);
        assert_eq!(names(&view), vec!["rerun.json", "runs/a.json"]);
        assert!(!view.is_truncated());
    }

    #[test]
    fn test_listing_is_capped() {
        let entries = (0..MAX_LISTED_FILES + 3)
            .map(|i| entry(&format!("f{i:04}"), i as u64))
            .collect();

        let view = ListingQuery::default().apply(entries);

        assert_eq!(view.entries.len(), MAX_LISTED_FILES);
        assert_eq!(view.total_matches, MAX_LISTED_FILES + 3);
        assert!(view.is_truncated());
        assert_eq!(view.entries[0].filename, "f0502");
    }
}
