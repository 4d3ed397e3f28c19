use std::collections::HashMap;

/// Per-keyword count of pages that mention the keyword
///
/// Keeps one entry per configured keyword, in configuration order, starting
/// at zero. Counts only ever grow: a page adds at most one to each keyword
/// no matter how often the keyword occurs in it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordMatchCounts {
    entries: Vec<(String, u32)>,
}

impl KeywordMatchCounts {
    /// Creates zeroed counts for the given keywords
    pub fn new(keywords: &[String]) -> Self {
        Self {
            entries: keywords.iter().map(|k| (k.clone(), 0)).collect(),
        }
    }

    /// Builds counts from explicit values, e.g. when reading a report back
    pub fn from_entries(entries: Vec<(String, u32)>) -> Self {
        Self { entries }
    }

    /// Adds one to every keyword that matched a single page
    pub fn record_page(&mut self, matches: &HashMap<String, bool>) {
        for (keyword, count) in &mut self.entries {
            if matches.get(keyword).copied().unwrap_or(false) {
                *count += 1;
            }
        }
    }

    /// Count for one keyword, or None if the keyword is not tracked
    pub fn get(&self, keyword: &str) -> Option<u32> {
        self.entries
            .iter()
            .find(|(k, _)| k == keyword)
            .map(|(_, count)| *count)
    }

    /// Iterates over `(keyword, count)` in keyword order
    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.entries.iter().map(|(k, c)| (k.as_str(), *c))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
