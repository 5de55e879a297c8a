//! Alias set generation for canonical names.
//!
//! # Responsibility
//! - Expand one display name into every text form treated as the same entity.
//!
//! # Invariants
//! - Output is deterministic and order-independent (`BTreeSet`).
//! - The lowercased full name is always present for non-blank input.
//! - Other aliases shorter than 2 characters are dropped.

use crate::names::nicknames::NicknameTable;
use crate::names::normalize::{
    collapse_whitespace, fold_case, parenthetical_content, slugify, strip_parenthetical,
};
use std::collections::BTreeSet;

/// Lowercase strings that refer to one canonical entity.
pub type AliasSet = BTreeSet<String>;

const WORD_STOPLIST: &[&str] = &["the", "and", "of"];
const MIN_ALIAS_CHARS: usize = 2;
const MIN_WORD_ALIAS_CHARS: usize = 3;

/// Generates the alias set of a display name.
///
/// Contents:
/// - the lowercase full name;
/// - every word of 3+ characters outside the stoplist;
/// - parenthetical content alone and the name without it;
/// - nickname expansion in both directions, paired with the last word;
/// - the slug form.
pub fn generate_aliases(name: &str, nicknames: &NicknameTable) -> AliasSet {
    let full = collapse_whitespace(&fold_case(name));
    let mut aliases = AliasSet::new();
    if full.is_empty() {
        return aliases;
    }
    aliases.insert(full.clone());

    let base = match parenthetical_content(&full) {
        Some(inner) => {
            aliases.insert(inner);
            let without = strip_parenthetical(&full);
            aliases.insert(without.clone());
            without
        }
        None => full.clone(),
    };

    let words: Vec<&str> = base
        .split_whitespace()
        .map(|word| word.trim_matches(|c: char| !c.is_alphanumeric()))
        .filter(|word| !word.is_empty())
        .collect();

    for word in &words {
        if word.chars().count() >= MIN_WORD_ALIAS_CHARS && !WORD_STOPLIST.contains(word) {
            aliases.insert((*word).to_string());
        }
    }

    if let Some(last) = words.last() {
        let last_index = words.len() - 1;
        for (index, token) in words.iter().enumerate() {
            let pairs_with_last = index < last_index;
            for nickname in nicknames.nicknames_of(token) {
                aliases.insert(nickname.to_string());
                if pairs_with_last {
                    aliases.insert(format!("{nickname} {last}"));
                }
            }
            if pairs_with_last {
                for full_name in nicknames.full_names_of(token) {
                    aliases.insert(format!("{full_name} {last}"));
                }
            }
        }
    }

    let slug = slugify(&full);
    if !slug.is_empty() {
        aliases.insert(slug);
    }

    aliases.retain(|alias| *alias == full || alias.chars().count() >= MIN_ALIAS_CHARS);
    aliases
}

#[cfg(test)]
mod tests {
    use super::generate_aliases;
    use crate::names::nicknames::NicknameTable;

    #[test]
    fn parenthetical_yields_both_forms() {
        let aliases = generate_aliases("Diana (Dee) Culver", &NicknameTable::bundled());
        assert!(aliases.contains("diana (dee) culver"));
        assert!(aliases.contains("dee"));
        assert!(aliases.contains("diana culver"));
        assert!(aliases.contains("diana-dee-culver"));
    }

    #[test]
    fn stoplist_and_short_words_are_skipped() {
        let aliases = generate_aliases("Church of the Sea", &NicknameTable::new());
        assert!(aliases.contains("church"));
        assert!(aliases.contains("sea"));
        assert!(!aliases.contains("of"));
        assert!(!aliases.contains("the"));
    }

    #[test]
    fn blank_name_yields_empty_set() {
        assert!(generate_aliases("   ", &NicknameTable::bundled()).is_empty());
    }

    #[test]
    fn single_word_nickname_is_not_paired_with_itself() {
        let aliases = generate_aliases("Ken", &NicknameTable::bundled());
        assert!(aliases.contains("ken"));
        assert!(!aliases.contains("kenneth ken"));
    }
}
