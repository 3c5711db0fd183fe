//! Rule sentence parsing.

use super::normalize_whitespace;
use crate::model::RuleRecord;

const BULLET: char = '\u{2022}';

/// Split the rules section into sentences, one record each.
///
/// Sentences end at `.`, `!` or `?` followed by whitespace. Leading and
/// trailing bullets are stripped, and sentences that are empty or made of
/// ASCII digits only (page numbers) are dropped. Ids count kept sentences only.
pub fn parse_rules(section: &str) -> Vec<RuleRecord> {
    let text = normalize_whitespace(section);
    if text.is_empty() {
        return Vec::new();
    }

    split_sentences(&text)
        .into_iter()
        .map(|s| s.trim_matches(|c: char| c == BULLET || c == ' '))
        .filter(|s| {
            let keep = !s.is_empty() && !s.chars().all(|c| c.is_ascii_digit());
            if !keep {
                log::debug!("Discarding rule sentence {:?}", s);
            }
            keep
        })
        .enumerate()
        .map(|(i, s)| RuleRecord::new(i + 1, s))
        .collect()
}

/// Split after sentence-ending punctuation that is followed by a space.
/// Expects whitespace already collapsed to single spaces.
fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;
    let mut prev = None;

    for (i, c) in text.char_indices() {
        if c == ' ' && matches!(prev, Some('.' | '!' | '?')) {
            sentences.push(&text[start..i]);
            start = i + 1;
        }
        prev = Some(c);
    }
    sentences.push(&text[start..]);
    sentences
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bulleted_sentence() {
        let rules = parse_rules("• Renew yearly.");
        assert_eq!(rules, vec![RuleRecord::new(1, "Renew yearly.")]);
        assert_eq!(rules[0].id, "rule_1");
    }

    #[test]
    fn test_page_number_is_discarded() {
        assert!(parse_rules("5").is_empty());
        let rules = parse_rules("Carry your CNIC. 5 Credits reset annually!");
        assert_eq!(rules.len(), 2);
        assert_eq!(rules[1].description, "5 Credits reset annually!");
    }

    #[test]
    fn test_ids_are_sequential_over_kept_sentences() {
        let rules = parse_rules("First rule. • Second rule? Third rule. 12");
        let ids: Vec<_> = rules.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["rule_1", "rule_2", "rule_3"]);
        assert_eq!(rules[1].description, "Second rule?");
        assert_eq!(rules[2].description, "Third rule.");
    }

    #[test]
    fn test_page_number_only_splits_after_punctuation() {
        let rules = parse_rules("First rule.\n12\n• Second rule? Third rule.");
        assert_eq!(rules.len(), 3);
        assert_eq!(rules[1].description, "12 • Second rule?");
    }

    #[test]
    fn test_non_decimal_numerals_are_kept() {
        let rules = parse_rules("Renew yearly. \u{bd}");
        assert_eq!(rules.len(), 2);
        assert_eq!(rules[1], RuleRecord::new(2, "\u{bd}"));
        assert_eq!(parse_rules("\u{2166}").len(), 1);
    }

    #[test]
    fn test_whitespace_is_normalized() {
        let rules = parse_rules("  Visit   a\n panel hospital.\tBring\nID.  ");
        assert_eq!(rules[0].description, "Visit a panel hospital.");
        assert_eq!(rules[1].description, "Bring ID.");
    }

    #[test]
    fn test_no_split_without_following_space() {
        let rules = parse_rules("Limit is Rs.1,000,000 per family.");
        assert_eq!(rules.len(), 1);
    }

    #[test]
    fn test_empty_section() {
        assert!(parse_rules("").is_empty());
        assert!(parse_rules(" \n\t ").is_empty());
    }
}
