use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::shared::constants::{MAX_INSIGNIFICANT_WORD_LEN, PHRASE_MATCH_RATIO};

static LEADING_TAG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\[[0-9]{1,2}:[0-9]{2}\.[0-9]{2,3}\]\s*").expect("valid timestamp tag regex")
});

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrossCheckResult {
    pub found: usize,
    pub total: usize,
    pub missing_phrases: Vec<String>,
    pub all_found: bool,
}

/// Checks that each line of a reference script shows up in a transcript.
///
/// This is a presence check, not an alignment: a phrase counts as found if
/// its normalized text is a substring of the normalized transcript, or if
/// enough of its significant words occur in order (gaps allowed).
pub struct ScriptCrossChecker {
    match_ratio: f64,
}

impl ScriptCrossChecker {
    pub fn new(match_ratio: f64) -> Self {
        Self { match_ratio }
    }

    /// Returns `None` when either text is empty or whitespace only.
    pub fn check(&self, script: &str, transcript: &str) -> Option<CrossCheckResult> {
        if script.trim().is_empty() || transcript.trim().is_empty() {
            return None;
        }

        let norm_transcript = normalize(transcript);
        let phrases = split_into_phrases(script);
        let mut missing = Vec::new();
        let mut found = 0;

        for phrase in &phrases {
            if self.phrase_found(phrase, &norm_transcript) {
                found += 1;
            } else {
                missing.push(phrase.clone());
            }
        }

        Some(CrossCheckResult {
            found,
            total: phrases.len(),
            all_found: missing.is_empty(),
            missing_phrases: missing,
        })
    }

    fn phrase_found(&self, phrase: &str, norm_transcript: &str) -> bool {
        let norm_phrase = normalize(phrase);
        if norm_phrase.is_empty() || norm_transcript.contains(&norm_phrase) {
            return true;
        }

        let words: Vec<&str> = norm_phrase
            .split(' ')
            .filter(|w| w.chars().count() > MAX_INSIGNIFICANT_WORD_LEN)
            .collect();
        if words.is_empty() {
            return true;
        }

        let matched = count_in_order(&words, norm_transcript);
        let required = (words.len() as f64 * self.match_ratio).ceil() as usize;
        matched >= required
    }
}

impl Default for ScriptCrossChecker {
    fn default() -> Self {
        Self::new(PHRASE_MATCH_RATIO)
    }
}

/// Lowercases, turns every character that is neither a word character nor
/// whitespace into a space, collapses runs of whitespace and trims.
pub fn normalize(text: &str) -> String {
    let replaced: String = text
        .to_lowercase()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '_' || c.is_whitespace() {
                c
            } else {
                ' '
            }
        })
        .collect();
    replaced.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Script lines with any leading `[MM:SS.mmm]` tag removed; blanks dropped.
pub fn split_into_phrases(script: &str) -> Vec<String> {
    script
        .split('\n')
        .map(|line| LEADING_TAG_RE.replace(line.trim(), "").trim().to_string())
        .filter(|line| !line.is_empty())
        .collect()
}

/// Counts words found scanning forward; each search starts just after the
/// previous match's start. Missing words don't move the cursor.
fn count_in_order(words: &[&str], haystack: &str) -> usize {
    let mut from = 0;
    let mut matched = 0;
    for word in words {
        let Some(offset) = haystack.get(from..).and_then(|rest| rest.find(word)) else {
            continue;
        };
        let idx = from + offset;
        from = idx + word.chars().next().map_or(1, char::len_utf8);
        matched += 1;
    }
    matched
}
