use deunicode::deunicode;
use regex::{Regex, RegexBuilder};
use std::collections::HashMap;

/// Scores text against a fixed, ordered set of keywords
///
/// Both the text and the keywords are transliterated to ASCII before
/// matching, and matching ignores case, so `"cafe"` finds `"Café"`. Each
/// keyword is a regular expression; one that fails to compile is matched
/// literally instead.
#[derive(Debug, Clone)]
pub struct KeywordMatcher {
    keywords: Vec<String>,
    patterns: Vec<Option<Regex>>,
}

impl KeywordMatcher {
    /// Compiles a matcher for the given keywords, preserving their order
    pub fn new(keywords: &[String]) -> Self {
        let patterns = keywords.iter().map(|k| compile_pattern(k)).collect();

        Self {
            keywords: keywords.to_vec(),
            patterns,
        }
    }

    /// The configured keywords in their original order
    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    /// Returns, for every keyword, whether it occurs anywhere in `text`
    ///
    /// Never fails; empty text yields all-false.
    pub fn match_text(&self, text: &str) -> HashMap<String, bool> {
        let normalized = normalize_text(text);

        self.keywords
            .iter()
            .zip(&self.patterns)
            .map(|(keyword, pattern)| {
                let found = !normalized.is_empty()
                    && pattern.as_ref().is_some_and(|p| p.is_match(&normalized));
                (keyword.clone(), found)
            })
            .collect()
    }
}

/// One-shot form of [`KeywordMatcher::match_text`]
pub fn match_keywords(text: &str, keywords: &[String]) -> HashMap<String, bool> {
    KeywordMatcher::new(keywords).match_text(text)
}

/// Reduces text to its diacritic-free ASCII transliteration
pub fn normalize_text(text: &str) -> String {
    deunicode(text)
}

// None only when even the escaped literal exceeds the regex size limit
fn compile_pattern(keyword: &str) -> Option<Regex> {
    let normalized = normalize_text(keyword);

    RegexBuilder::new(&normalized)
        .case_insensitive(true)
        .build()
        .or_else(|e| {
            tracing::warn!(
                "Keyword '{}' is not a valid pattern ({}), matching it literally",
                keyword,
                e
            );
            RegexBuilder::new(&regex::escape(&normalized))
                .case_insensitive(true)
                .build()
        })
        .ok()
}
