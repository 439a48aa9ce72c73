// src/core/engine.rs
use crate::core::dict::Dict;
use crate::core::types::{fingerprint, SessionStats};
use std::fmt::Write;

/// Punctuation that may cling to a word without blocking translation of the
/// rest of the token.
const PUNCTUATION: &[char] = &[
    ')', '(', '\'', '"', '“', '„', '.', ',', ';', ':', '?', '!', '/', '-',
];

/// Characters (besides whitespace) that delimiter-only tokens consist of.
const NON_WORD: &[char] = &['.', ',', ';', ':', '?', '!', '/', '-'];

/// Why a single token could not be translated. Absorbed by
/// [`Translator::translate`]; only surfaces from
/// [`Translator::translate_token`].
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    /// The token is a delimiter (whitespace, punctuation or a single
    /// character), not a word.
    #[error("not a word")]
    NotAWord,
    /// The token contains a multi-digit numeral run and is never looked up.
    #[error("untranslatable")]
    Untranslatable,
    /// No dictionary entry matched, even after punctuation stripping.
    #[error("word not found in dictionary")]
    WordNotFound,
}

/// The result of translating one text: the reassembled output and the token
/// counters for this session.
#[derive(Debug, Clone)]
pub struct Translation {
    pub text: String,
    pub stats: SessionStats,
}

/// Translates shuffled text against an immutable fingerprint dictionary.
///
/// There is no analysis of grammar or meaning; shuffled tokens are simply
/// replaced by the most frequent word with the same letters. Translators
/// borrow the dictionary, so several of them may share one `Dict` across
/// threads without synchronization.
///
/// ```
/// use unshuffle_core::{Dict, Translator};
///
/// let dict = Dict::from_text("Cbeeeeghrrsu Cheeseburger 42\n").unwrap();
/// let translation = Translator::new(&dict).translate("grubereheCes");
/// assert_eq!(translation.text, "Cheeseburger");
/// ```
pub struct Translator<'d> {
    dict: &'d Dict,
}

impl<'d> Translator<'d> {
    pub fn new(dict: &'d Dict) -> Self {
        Self { dict }
    }

    /// Translates a whole text token by token. Never fails: unknown words
    /// come back marked `w¿…?`, numeral runs as `u¿…?`, and delimiters pass
    /// through unchanged, so the output mirrors the input structure exactly.
    pub fn translate(&self, shuffled: &str) -> Translation {
        let mut stats = SessionStats::default();
        let mut text = String::with_capacity(shuffled.len());

        for token in tokenize(shuffled) {
            stats.tokens_processed += 1;
            match self.translate_token(token) {
                Ok(word) => {
                    stats.tokens_translated += 1;
                    text.push_str(&word);
                }
                Err(TokenError::NotAWord) => {
                    stats.tokens_not_words += 1;
                    text.push_str(token);
                }
                Err(TokenError::WordNotFound) => {
                    stats.tokens_not_translated += 1;
                    let _ = write!(text, "w¿{token}?");
                }
                Err(TokenError::Untranslatable) => {
                    stats.tokens_not_translated += 1;
                    let _ = write!(text, "u¿{token}?");
                }
            }
        }

        Translation { text, stats }
    }

    /// Translates a single token.
    ///
    /// The whole token (punctuation included) is fingerprinted and looked up
    /// first; on a miss the punctuation is stripped, the remainder retried,
    /// and any stripped mark re-appended at the end of the result.
    pub fn translate_token(&self, token: &str) -> Result<String, TokenError> {
        if !is_word(token) {
            return Err(TokenError::NotAWord);
        }
        if has_digit_run(token) {
            return Err(TokenError::Untranslatable);
        }

        if let Some(word) = self.dict.get(&fingerprint(token)) {
            return Ok(word.to_string());
        }

        let (bare, punctuation) = split_punctuation(token);
        match self.dict.get(&fingerprint(&bare)) {
            Some(word) => Ok(match punctuation {
                Some(mark) => format!("{word}{mark}"),
                None => word.to_string(),
            }),
            None => Err(TokenError::WordNotFound),
        }
    }
}

/// Splits text into alternating runs of non-whitespace and whitespace, so
/// that reassembly in order reproduces the input exactly. Never yields an
/// empty token; empty input yields nothing.
fn tokenize(text: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut start = 0;
    let mut current = None;
    for (idx, c) in text.char_indices() {
        let is_ws = c.is_whitespace();
        match current {
            None => current = Some(is_ws),
            Some(prev) if prev != is_ws => {
                tokens.push(&text[start..idx]);
                start = idx;
                current = Some(is_ws);
            }
            Some(_) => {}
        }
    }
    if start < text.len() {
        tokens.push(&text[start..]);
    }
    tokens
}

/// A token is a word unless it is at most one character long or consists
/// solely of whitespace and delimiter punctuation.
fn is_word(token: &str) -> bool {
    let mut chars = token.chars();
    if chars.next().is_none() || chars.next().is_none() {
        return false;
    }
    !token
        .chars()
        .all(|c| c.is_whitespace() || NON_WORD.contains(&c))
}

/// True if the token contains two or more consecutive ASCII digits. A lone
/// digit ("A1") does not count.
fn has_digit_run(token: &str) -> bool {
    let mut run = 0;
    for c in token.chars() {
        if c.is_ascii_digit() {
            run += 1;
            if run >= 2 {
                return true;
            }
        } else {
            run = 0;
        }
    }
    false
}

/// Separates punctuation and letters. All punctuation-class characters are
/// removed from the lookup form; the first one found is returned so it can
/// be re-appended after the translated word.
fn split_punctuation(token: &str) -> (String, Option<char>) {
    match token.chars().find(|c| PUNCTUATION.contains(c)) {
        Some(mark) => {
            let bare = token.chars().filter(|c| !PUNCTUATION.contains(c)).collect();
            (bare, Some(mark))
        }
        None => (token.to_string(), None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::fixtures;

    fn dict() -> Dict {
        Dict::from_text(fixtures::DICT).unwrap()
    }

    #[test]
    fn translates_shuffled_tokens() {
        let dict = dict();
        let translator = Translator::new(&dict);
        for (shuffled, unshuffled) in [
            ("Bnerkastel-Kseu", "Bernkastel-Kues"),
            ("Wiehnenctah", "Weihnachten"),
            ("teOsnr", "Ostern"),
        ] {
            assert_eq!(translator.translate_token(shuffled).unwrap(), unshuffled);
        }
    }

    #[test]
    fn unknown_word_is_not_found() {
        let dict = dict();
        let translator = Translator::new(&dict);
        assert_eq!(
            translator.translate_token("INVALIDKEY"),
            Err(TokenError::WordNotFound)
        );
    }

    #[test]
    fn delimiters_are_not_words() {
        let dict = dict();
        let translator = Translator::new(&dict);
        for token in [",,,!", "  ", "A"] {
            assert_eq!(translator.translate_token(token), Err(TokenError::NotAWord));
        }
    }

    #[test]
    fn multi_digit_runs_are_untranslatable() {
        let dict = dict();
        let translator = Translator::new(&dict);
        for token in ["348240", "12", "432849@39"] {
            assert_eq!(
                translator.translate_token(token),
                Err(TokenError::Untranslatable)
            );
        }
        // A single digit still goes through the normal lookup.
        assert_eq!(
            translator.translate_token("A1"),
            Err(TokenError::WordNotFound)
        );
    }

    #[test]
    fn punctuation_moves_to_the_end_of_the_translation() {
        let dict = dict();
        let translator = Translator::new(&dict);
        assert_eq!(translator.translate_token("Trüe!").unwrap(), "Türe!");
        assert_eq!(translator.translate_token("o?erd").unwrap(), "oder?");
    }

    #[test]
    fn translates_a_paragraph() {
        let dict = dict();
        let translation = Translator::new(&dict)
            .translate("Orsten estht vro rde Trüe!\n\t\nWir fueren snu -- o?erd");
        assert_eq!(
            translation.text,
            "Ostern steht vor der Türe!\n\t\nWir freuen uns -- oder?"
        );
        assert_eq!(translation.stats.tokens_processed, 19);
        assert_eq!(translation.stats.tokens_translated, 9);
        assert_eq!(translation.stats.tokens_not_translated, 0);
        assert_eq!(translation.stats.tokens_not_words, 10);
        assert_eq!(translation.stats.percent_translated(), 100.0);
    }

    #[test]
    fn failures_are_marked_inline() {
        let dict = dict();
        let translation = Translator::new(&dict).translate("INVALIDKEY rfx 348240");
        assert_eq!(translation.text, "w¿INVALIDKEY? w¿rfx? u¿348240?");
        assert_eq!(translation.stats.tokens_translated, 0);
        assert_eq!(translation.stats.tokens_not_translated, 3);
    }

    #[test]
    fn translates_exact_anagrams_of_und() {
        let (built, _) = crate::core::dict::CorpusFormat::Frequency
            .build(["1 und 98167"])
            .unwrap();
        let dict = built.into_dict();
        let translator = Translator::new(&dict);
        for shuffled in ["und", "nud", "udn", "dnu", "dun", "ndu"] {
            assert_eq!(translator.translate_token(shuffled).unwrap(), "und");
        }
    }

    #[test]
    fn empty_input_translates_to_empty_output() {
        let dict = dict();
        let translation = Translator::new(&dict).translate("");
        assert_eq!(translation.text, "");
        assert_eq!(translation.stats.tokens_processed, 0);
        assert_eq!(translation.stats.percent_translated(), 0.0);
    }

    #[test]
    fn whitespace_only_input_passes_through() {
        let dict = dict();
        let translation = Translator::new(&dict).translate(" \n\t ");
        assert_eq!(translation.text, " \n\t ");
        assert_eq!(translation.stats.tokens_not_words, 1);
        assert_eq!(translation.stats.percent_translated(), 0.0);
    }

    #[test]
    fn tokenize_preserves_whitespace_runs() {
        assert_eq!(tokenize("a  b\nc"), vec!["a", "  ", "b", "\n", "c"]);
        assert_eq!(tokenize("  a "), vec!["  ", "a", " "]);
        assert!(tokenize("").is_empty());
    }
}
