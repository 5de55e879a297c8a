//! Alias-set mention scanner.

use crate::names::aliases::AliasSet;
use log::warn;
use regex::{Regex, RegexBuilder};

/// One alias hit inside a text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mention {
    pub alias: String,
    /// Byte offsets of the hit in the scanned text.
    pub start: usize,
    pub end: usize,
}

/// Returns whether `text` mentions any alias of the set.
pub fn mentions(text: &str, aliases: &AliasSet) -> bool {
    AliasMatcher::new(aliases).is_mentioned_in(text)
}

/// Compiled alias set, reusable across many texts.
///
/// Patterns are tried in alias-set order, which is lexicographic.
#[derive(Debug, Clone, Default)]
pub struct AliasMatcher {
    patterns: Vec<(String, Regex)>,
}

impl AliasMatcher {
    pub fn new(aliases: &AliasSet) -> Self {
        let patterns = aliases
            .iter()
            .filter(|alias| !alias.trim().is_empty())
            .filter_map(|alias| alias_pattern(alias).map(|regex| (alias.clone(), regex)))
            .collect();
        Self { patterns }
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Returns true on the first alias found anywhere in `text`.
    pub fn is_mentioned_in(&self, text: &str) -> bool {
        if text.trim().is_empty() {
            return false;
        }
        self.patterns.iter().any(|(_, regex)| regex.is_match(text))
    }

    /// Returns the first alias (in set order) found in `text`.
    pub fn first_mention(&self, text: &str) -> Option<Mention> {
        if text.trim().is_empty() {
            return None;
        }
        self.patterns.iter().find_map(|(alias, regex)| {
            regex.find(text).map(|found| Mention {
                alias: alias.clone(),
                start: found.start(),
                end: found.end(),
            })
        })
    }

    /// Returns the first multi-word alias found in `text`.
    ///
    /// Single-word aliases (bare first or last names) are too ambiguous to
    /// create links from prose on their own.
    pub fn first_multi_word_mention(&self, text: &str) -> Option<Mention> {
        if text.trim().is_empty() {
            return None;
        }
        self.patterns
            .iter()
            .filter(|(alias, _)| alias.split_whitespace().nth(1).is_some())
            .find_map(|(alias, regex)| {
                regex.find(text).map(|found| Mention {
                    alias: alias.clone(),
                    start: found.start(),
                    end: found.end(),
                })
            })
    }
}

/// Anchors the escaped alias at word boundaries.
///
/// A boundary is only required on a side where the alias itself starts or
/// ends with a word character; `\b` after a trailing period would otherwise
/// demand a following letter.
fn alias_pattern(alias: &str) -> Option<Regex> {
    let leading = if alias.starts_with(is_word_char) { r"\b" } else { "" };
    let trailing = if alias.ends_with(is_word_char) { r"\b" } else { "" };
    let pattern = format!("{leading}{}{trailing}", regex::escape(alias));
    match RegexBuilder::new(&pattern).case_insensitive(true).build() {
        Ok(regex) => Some(regex),
        Err(err) => {
            warn!(
                "event=alias_pattern module=mention status=error alias_chars={} error={}",
                alias.chars().count(),
                err
            );
            None
        }
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

#[cfg(test)]
mod tests {
    use super::{mentions, AliasMatcher};
    use crate::names::aliases::AliasSet;

    fn aliases(values: &[&str]) -> AliasSet {
        values.iter().map(|value| value.to_string()).collect()
    }

    #[test]
    fn alias_inside_longer_word_is_not_a_mention() {
        let set = aliases(&["culver"]);
        assert!(!mentions("The Culverton road was paved.", &set));
        assert!(mentions("Mr. Culver's boat", &set));
    }

    #[test]
    fn matching_is_case_insensitive() {
        assert!(mentions("KEN CULVER arrived", &aliases(&["ken culver"])));
    }

    #[test]
    fn metacharacters_are_escaped() {
        let set = aliases(&["j.r. culver"]);
        assert!(mentions("signed by J.R. Culver", &set));
        assert!(!mentions("signed by JXRX Culver", &set));
    }

    #[test]
    fn alias_ending_in_period_matches_before_whitespace() {
        let set = aliases(&["kenneth culver jr."]);
        assert!(mentions("Kenneth Culver Jr. visited", &set));
        assert!(!mentions("Kenneth Culver Jrx visited", &set));
    }

    #[test]
    fn blank_text_or_empty_set_never_matches() {
        assert!(!mentions("   ", &aliases(&["culver"])));
        assert!(!mentions("Culver", &AliasSet::new()));
    }

    #[test]
    fn first_mention_reports_alias_and_offsets() {
        let matcher = AliasMatcher::new(&aliases(&["ken culver", "lodge"]));
        let hit = matcher.first_mention("At the lodge, Ken Culver waved").unwrap();
        assert_eq!(hit.alias, "ken culver");
        assert_eq!(hit.start, 14);
        assert_eq!(hit.end, 24);
    }

    #[test]
    fn multi_word_mention_skips_bare_names() {
        let matcher = AliasMatcher::new(&aliases(&["culver", "ken culver"]));
        assert!(matcher
            .first_multi_word_mention("Culver family picnic")
            .is_none());
        assert!(matcher
            .first_multi_word_mention("with Ken Culver")
            .is_some());
    }
}
