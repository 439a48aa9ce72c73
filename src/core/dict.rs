// src/core/dict.rs
use crate::core::types::{fingerprint, BuildStats, Fingerprint};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Hard failures of dictionary build, load or save. Per-line semantic
/// rejects (sentences, single characters, duplicates) are soft skips and
/// never surface here.
#[derive(Debug, thiserror::Error)]
pub enum DictError {
    #[error("malformed line {line}: {reason}")]
    MalformedLine { line: u64, reason: String },
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("cache error: {0}")]
    Cache(#[from] bincode::Error),
}

/// An immutable fingerprint → canonical-word table.
///
/// Built once from a frequency corpus (via [`CorpusFormat::build`]) or loaded
/// from a persisted dictionary, then shared read-only by any number of
/// translators.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct Dict {
    entries: HashMap<Fingerprint, String>,
}

impl Dict {
    /// Loads a dictionary from either a file path or an in-memory dictionary
    /// text. A source containing a newline is treated as dictionary text,
    /// anything else as a path.
    pub fn load(source: &str) -> Result<Self, DictError> {
        if source.contains('\n') {
            Self::from_text(source)
        } else {
            Self::from_file(source)
        }
    }

    /// Loads a dictionary from a file in the persisted
    /// `fingerprint canonical_word frequency` format.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, DictError> {
        let reader = BufReader::new(File::open(path)?);
        let mut entries = HashMap::new();
        let mut line_no = 0;
        for line in reader.lines() {
            line_no += 1;
            add_entry(&mut entries, &line?, line_no)?;
        }
        info!("Dict loaded: {} entries", entries.len());
        Ok(Self { entries })
    }

    /// Loads a dictionary from an in-memory multi-line string in the same
    /// format as [`from_file`](Self::from_file).
    pub fn from_text(text: &str) -> Result<Self, DictError> {
        let mut entries = HashMap::new();
        for (idx, line) in text.lines().enumerate() {
            add_entry(&mut entries, line, idx as u64 + 1)?;
        }
        info!("Dict loaded: {} entries", entries.len());
        Ok(Self { entries })
    }

    /// Looks up the canonical word for a fingerprint.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Parses one persisted dictionary line into the entry map. Blank lines are
/// skipped; anything that is not exactly three fields is a hard error. The
/// frequency field only matters at build time and is ignored here.
fn add_entry(
    entries: &mut HashMap<Fingerprint, String>,
    line: &str,
    line_no: u64,
) -> Result<(), DictError> {
    if line.trim().is_empty() {
        return Ok(());
    }
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() != 3 {
        return Err(DictError::MalformedLine {
            line: line_no,
            reason: format!("expected `fingerprint word frequency`, got {} fields", fields.len()),
        });
    }
    entries.insert(fields[0].to_string(), fields[1].to_string());
    Ok(())
}

/// A freshly built dictionary, still carrying the winning frequency per
/// fingerprint so it can be persisted in the
/// `fingerprint canonical_word frequency` format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuiltDict {
    entries: HashMap<Fingerprint, (String, u64)>,
}

impl BuiltDict {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries sorted by fingerprint, for stable persisted output.
    pub fn sorted_entries(&self) -> Vec<(&str, &str, u64)> {
        let mut entries: Vec<(&str, &str, u64)> = self
            .entries
            .iter()
            .map(|(key, (word, freq))| (key.as_str(), word.as_str(), *freq))
            .collect();
        entries.sort_unstable_by_key(|&(key, _, _)| key);
        entries
    }

    /// Drops the frequencies, leaving the lookup table used for translation.
    pub fn into_dict(self) -> Dict {
        Dict {
            entries: self
                .entries
                .into_iter()
                .map(|(key, (word, _))| (key, word))
                .collect(),
        }
    }
}

/// Supported corpus layouts for dictionary generation.
///
/// A closed set: callers pick a variant instead of selecting a converter by
/// name at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CorpusFormat {
    /// `rank word frequency` lines, e.g. the Uni Leipzig corpora
    /// (<https://wortschatz.uni-leipzig.de/en/download/German>). The rank is
    /// ignored; it only determines arrival order.
    Frequency,
}

impl CorpusFormat {
    /// Builds a dictionary from corpus lines, deduplicating fingerprint
    /// collisions by frequency.
    pub fn build<I, S>(self, lines: I) -> Result<(BuiltDict, BuildStats), DictError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        match self {
            CorpusFormat::Frequency => build_frequency(lines),
        }
    }
}

fn build_frequency<I, S>(lines: I) -> Result<(BuiltDict, BuildStats), DictError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut entries: HashMap<Fingerprint, (String, u64)> = HashMap::new();
    let mut stats = BuildStats::default();

    for line in lines {
        let line = line.as_ref();
        stats.lines += 1;

        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() < 3 {
            return Err(DictError::MalformedLine {
                line: stats.lines,
                reason: "expected `rank word frequency`".to_string(),
            });
        }
        let frequency: u64 = fields[fields.len() - 1].parse().map_err(|_| {
            DictError::MalformedLine {
                line: stats.lines,
                reason: format!("frequency `{}` is not an integer", fields[fields.len() - 1]),
            }
        })?;

        let words = &fields[1..fields.len() - 1];
        if words.len() > 1 {
            debug!("Ignored line {}: sentence '{}'", stats.lines, words.join(" "));
            stats.ignored += 1;
            continue;
        }
        let word = words[0];
        if word.chars().count() == 1 {
            debug!("Ignored line {}: single character '{}'", stats.lines, word);
            stats.ignored += 1;
            continue;
        }

        let key = fingerprint(word);
        // Skip if an existing entry is more common; an equally frequent
        // newcomer replaces the incumbent.
        if let Some((existing, existing_freq)) = entries.get(&key) {
            if *existing_freq > frequency {
                debug!(
                    "Ignored line {}: duplicate '{}' (n={}), keeping '{}' (n={})",
                    stats.lines, word, frequency, existing, existing_freq
                );
                stats.duplicates += 1;
                stats.ignored += 1;
                continue;
            }
        }
        entries.insert(key, (word.to_string(), frequency));
    }

    info!("Lines checked: {}", stats.lines);
    info!(
        "Words ignored: {} (thereof dupes: {})",
        stats.ignored, stats.duplicates
    );
    Ok((BuiltDict { entries }, stats))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::fixtures;
    use std::io::Write;

    #[test]
    fn builder_keeps_the_more_frequent_anagram() {
        let (built, stats) = CorpusFormat::Frequency
            .build(["1 der 134545", "2 red 9"])
            .unwrap();
        let dict = built.into_dict();
        assert_eq!(dict.get("der"), Some("der"));
        assert_eq!(dict.len(), 1);
        assert_eq!(stats.lines, 2);
        assert_eq!(stats.duplicates, 1);
        assert_eq!(stats.ignored, 1);
    }

    #[test]
    fn builder_lets_an_equal_frequency_replace() {
        let (built, stats) = CorpusFormat::Frequency
            .build(["1 der 100", "2 red 100"])
            .unwrap();
        assert_eq!(built.into_dict().get("der"), Some("red"));
        assert_eq!(stats.duplicates, 0);
    }

    #[test]
    fn builder_skips_sentences_and_single_characters() {
        let (built, stats) = CorpusFormat::Frequency
            .build(["2 too many words 90", "1 a 90", "3 und 98167"])
            .unwrap();
        let dict = built.into_dict();
        assert_eq!(dict.len(), 1);
        assert_eq!(dict.get("dnu"), Some("und"));
        assert_eq!(stats.lines, 3);
        assert_eq!(stats.ignored, 2);
        assert_eq!(stats.duplicates, 0);
    }

    #[test]
    fn builder_rejects_short_lines() {
        let err = CorpusFormat::Frequency.build(["1 und"]).unwrap_err();
        assert!(matches!(err, DictError::MalformedLine { line: 1, .. }));
    }

    #[test]
    fn builder_rejects_non_integer_frequency() {
        let err = CorpusFormat::Frequency.build(["1 und oft"]).unwrap_err();
        assert!(matches!(err, DictError::MalformedLine { line: 1, .. }));
    }

    #[test]
    fn dict_loads_from_text() {
        let dict = Dict::load(fixtures::DICT).unwrap();
        assert_eq!(dict.len(), 21);
        assert_eq!(dict.get("dnu"), Some("und"));
        assert_eq!(dict.get("Oenrst"), Some("Ostern"));
        assert!(dict.contains("-BKaeeeklnrsstu"));
        assert!(!dict.contains("xyz"));
    }

    #[test]
    fn dict_loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(fixtures::DICT.as_bytes()).unwrap();
        let dict = Dict::load(file.path().to_str().unwrap()).unwrap();
        assert_eq!(dict.len(), 21);
        assert_eq!(dict.get("Terü"), Some("Türe"));
    }

    #[test]
    fn dict_rejects_malformed_lines() {
        let err = Dict::from_text("der der 134545\nbroken").unwrap_err();
        assert!(matches!(err, DictError::MalformedLine { line: 2, .. }));
    }

    #[test]
    fn dict_skips_blank_lines() {
        let dict = Dict::from_text("der der 134545\n\ndnu und 98167\n").unwrap();
        assert_eq!(dict.len(), 2);
    }
}
