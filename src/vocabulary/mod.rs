//! Canonical vocabulary.
//!
//! Every other component treats the loaded vocabulary as ground truth: a word is
//! playable iff it is present here after [`normalize_word`].

pub mod error;


pub use error::{VocabularyError, VocabularyResult};

use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::storage::{read_json, write_json_atomic};

/// Normalizes raw player input: trim, lowercase, fold `ё` to `е`.
pub fn normalize_word(raw: &str) -> String {
    raw.trim()
        .chars()
        .flat_map(char::to_lowercase)
        .map(|c| if c == 'ё' { 'е' } else { c })
        .collect()
}

/// On-disk record of the vocabulary file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VocabularyRecord {
    pub id: u64,
    pub word: String,
    pub length: usize,
    pub first_letter: String,
    pub last_letter: String,
    #[serde(default)]
    pub frequency: u64,
    #[serde(default)]
    pub times_guessed: u64,
    #[serde(default)]
    pub times_used_as_target: u64,
}

/// Play counters updated concurrently while games run.
#[derive(Debug, Default)]
pub struct WordStats {
    frequency: AtomicU64,
    times_guessed: AtomicU64,
    times_used_as_target: AtomicU64,
}

impl WordStats {
    fn seeded(record: &VocabularyRecord) -> Self {
        Self {
            frequency: AtomicU64::new(record.frequency),
            times_guessed: AtomicU64::new(record.times_guessed),
            times_used_as_target: AtomicU64::new(record.times_used_as_target),
        }
    }

    pub fn frequency(&self) -> u64 {
        self.frequency.load(Ordering::Relaxed)
    }

    pub fn times_guessed(&self) -> u64 {
        self.times_guessed.load(Ordering::Relaxed)
    }

    pub fn times_used_as_target(&self) -> u64 {
        self.times_used_as_target.load(Ordering::Relaxed)
    }
}

/// A single vocabulary word. Immutable apart from its [`WordStats`].
#[derive(Debug)]
pub struct VocabularyEntry {
    pub id: u64,
    pub word: String,
    pub length: usize,
    pub first_letter: char,
    pub last_letter: char,
    stats: WordStats,
}

impl VocabularyEntry {
    fn new(id: u64, word: String, stats: WordStats) -> Self {
        let length = word.chars().count();
        let first_letter = word.chars().next().unwrap_or_default();
        let last_letter = word.chars().last().unwrap_or_default();
        Self {
            id,
            word,
            length,
            first_letter,
            last_letter,
            stats,
        }
    }

    pub fn stats(&self) -> &WordStats {
        &self.stats
    }

    fn to_record(&self) -> VocabularyRecord {
        VocabularyRecord {
            id: self.id,
            word: self.word.clone(),
            length: self.length,
            first_letter: self.first_letter.to_string(),
            last_letter: self.last_letter.to_string(),
            frequency: self.stats.frequency(),
            times_guessed: self.stats.times_guessed(),
            times_used_as_target: self.stats.times_used_as_target(),
        }
    }
}

/// The canonical word list.
#[derive(Debug)]
pub struct Vocabulary {
    entries: HashMap<String, VocabularyEntry>,
    words: Vec<String>,
}

impl Vocabulary {
    /// Builds a vocabulary from raw words (normalized, de-duplicated, ids by sorted order).
    pub fn from_words<I, S>(words: I) -> VocabularyResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut sorted: Vec<String> = words
            .into_iter()
            .map(|w| normalize_word(w.as_ref()))
            .filter(|w| !w.is_empty())
            .collect();
        sorted.sort();
        sorted.dedup();

        if sorted.is_empty() {
            return Err(VocabularyError::Empty);
        }

        let entries = sorted
            .iter()
            .enumerate()
            .map(|(id, word)| {
                (
                    word.clone(),
                    VocabularyEntry::new(id as u64, word.clone(), WordStats::default()),
                )
            })
            .collect();

        Ok(Self {
            entries,
            words: sorted,
        })
    }

    /// Loads the vocabulary file (`word → record` mapping).
    pub fn load(path: &Path) -> VocabularyResult<Self> {
        let records: HashMap<String, VocabularyRecord> = read_json(path)?;
        let vocabulary = Self::from_records(records)?;
        info!(
            path = %path.display(),
            words = vocabulary.len(),
            "Vocabulary loaded"
        );
        Ok(vocabulary)
    }

    /// Builds a vocabulary from already-parsed records, rejecting inconsistent keys.
    pub fn from_records(records: HashMap<String, VocabularyRecord>) -> VocabularyResult<Self> {
        if records.is_empty() {
            return Err(VocabularyError::Empty);
        }

        let mut entries = HashMap::with_capacity(records.len());
        for (key, record) in records {
            let normalized = normalize_word(&key);
            if normalized.is_empty() || normalized != normalize_word(&record.word) {
                return Err(VocabularyError::Inconsistent {
                    key,
                    word: record.word,
                });
            }
            if entries.contains_key(&normalized) {
                return Err(VocabularyError::Duplicate { word: normalized });
            }
            let stats = WordStats::seeded(&record);
            entries.insert(
                normalized.clone(),
                VocabularyEntry::new(record.id, normalized, stats),
            );
        }

        let mut words: Vec<String> = entries.keys().cloned().collect();
        words.sort();

        Ok(Self { entries, words })
    }

    /// Writes the vocabulary (with current play counters) back to disk.
    pub fn save(&self, path: &Path) -> VocabularyResult<()> {
        let records: BTreeMap<&str, VocabularyRecord> = self
            .entries
            .values()
            .map(|entry| (entry.word.as_str(), entry.to_record()))
            .collect();
        write_json_atomic(path, &records)?;
        Ok(())
    }

    /// Returns `true` if the (already normalized) word is in the vocabulary.
    #[inline]
    pub fn contains(&self, word: &str) -> bool {
        self.entries.contains_key(word)
    }

    #[inline]
    pub fn get(&self, word: &str) -> Option<&VocabularyEntry> {
        self.entries.get(word)
    }

    /// All words in sorted order.
    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Counts a validated guess of `word`.
    pub fn record_guess(&self, word: &str) {
        if let Some(entry) = self.entries.get(word) {
            entry.stats.frequency.fetch_add(1, Ordering::Relaxed);
            entry.stats.times_guessed.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Counts `word` being drawn as a session target.
    pub fn record_target(&self, word: &str) {
        if let Some(entry) = self.entries.get(word) {
            entry
                .stats
                .times_used_as_target
                .fetch_add(1, Ordering::Relaxed);
        }
    }
}
