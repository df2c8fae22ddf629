//! In-memory embedding table with a per-target neighbor cache.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use half::f16;
use moka::sync::Cache;
use tracing::{debug, info, warn};

use super::config::VectorIndexConfig;
use super::error::{VectorIndexError, VectorIndexResult};
use super::loader::{VectorFormat, read_vectors};
use super::{Neighbor, VectorIndex};
use crate::vocabulary::{Vocabulary, normalize_word};

/// Row-major f16 vectors restricted to vocabulary words.
struct VectorTable {
    dim: usize,
    keys: HashMap<String, usize>,
    words: Vec<String>,
    vectors: Vec<f16>,
    norms: Vec<f32>,
}

impl VectorTable {
    fn new() -> Self {
        Self {
            dim: 0,
            keys: HashMap::new(),
            words: Vec::new(),
            vectors: Vec::new(),
            norms: Vec::new(),
        }
    }

    fn len(&self) -> usize {
        self.words.len()
    }

    /// Inserts a row unless the key already exists. First row fixes the dimension.
    fn push(&mut self, key: String, word: String, values: &[f32]) -> VectorIndexResult<()> {
        if self.dim == 0 {
            self.dim = values.len();
        }
        if values.len() != self.dim {
            return Err(VectorIndexError::InvalidDimension {
                word: key,
                expected: self.dim,
                actual: values.len(),
            });
        }
        if self.keys.contains_key(&key) {
            return Ok(());
        }

        let norm = values.iter().map(|x| x * x).sum::<f32>().sqrt();
        self.keys.insert(key, self.words.len());
        self.words.push(word);
        self.vectors.extend(values.iter().map(|&v| f16::from_f32(v)));
        self.norms.push(norm);
        Ok(())
    }

    fn row(&self, index: usize) -> &[f16] {
        &self.vectors[index * self.dim..(index + 1) * self.dim]
    }

    fn row_f32(&self, index: usize) -> Vec<f32> {
        self.row(index).iter().map(|v| v.to_f32()).collect()
    }

    fn cosine_to(&self, query: &[f32], query_norm: f32, index: usize) -> f32 {
        let norm = self.norms[index];
        if query_norm == 0.0 || norm == 0.0 {
            return 0.0;
        }
        let dot: f32 = query
            .iter()
            .zip(self.row(index))
            .map(|(q, v)| q * v.to_f32())
            .sum();
        (dot / (query_norm * norm)).clamp(0.0, 1.0)
    }

    fn neighbors_of(&self, index: usize, top_n: usize) -> Vec<Neighbor> {
        let query = self.row_f32(index);
        let query_norm = self.norms[index];
        let own_word = &self.words[index];

        let mut scored: Vec<(usize, f32)> = (0..self.len())
            .filter(|&j| self.words[j] != *own_word)
            .map(|j| (j, self.cosine_to(&query, query_norm, j)))
            .collect();
        scored.sort_unstable_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));

        let mut seen = HashSet::new();
        scored
            .into_iter()
            .filter(|(j, _)| seen.insert(self.words[*j].as_str()))
            .take(top_n)
            .map(|(j, score)| Neighbor {
                word: self.words[j].clone(),
                score,
            })
            .collect()
    }
}

/// Splits a model key into `(bare word, normalized key)`, e.g. `Книга_NOUN`
/// becomes `("книга", "книга_NOUN")`.
fn split_key(key: &str) -> (String, String) {
    let bare_end = key.find('_').unwrap_or(key.len());
    let bare = normalize_word(&key[..bare_end]);
    let normalized_key = format!("{}{}", bare, &key[bare_end..]);
    (bare, normalized_key)
}

/// Embedding-backed [`VectorIndex`]. Built once at startup, read-only afterwards.
pub struct EmbeddingIndex {
    table: Option<VectorTable>,
    config: VectorIndexConfig,
    neighbor_cache: Cache<(String, usize), Arc<Vec<Neighbor>>>,
}

impl std::fmt::Debug for EmbeddingIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmbeddingIndex")
            .field(
                "table",
                &match &self.table {
                    Some(table) => format!("Loaded({} rows, dim {})", table.len(), table.dim),
                    None => "Unavailable".to_string(),
                },
            )
            .field("tag_suffixes", &self.config.tag_suffixes)
            .finish()
    }
}

impl EmbeddingIndex {
    fn with_table(table: Option<VectorTable>, config: VectorIndexConfig) -> Self {
        let neighbor_cache = Cache::builder()
            .max_capacity(config.neighbor_cache_capacity)
            .build();
        Self {
            table,
            config,
            neighbor_cache,
        }
    }

    /// An index with no model: every lookup reports [`VectorIndexError::Unavailable`].
    pub fn unavailable(config: VectorIndexConfig) -> Self {
        Self::with_table(None, config)
    }

    /// Loads a word2vec model, keeping only rows whose bare word is in `vocabulary`.
    pub fn load(
        path: &Path,
        vocabulary: &Vocabulary,
        config: VectorIndexConfig,
    ) -> VectorIndexResult<Self> {
        let format = VectorFormat::from_path(path);
        info!(path = %path.display(), ?format, "Loading vector model");

        let mut table = VectorTable::new();
        let mut skipped = 0usize;
        read_vectors(path, format, |key, values| {
            let (bare, normalized_key) = split_key(key);
            if !vocabulary.contains(&bare) {
                skipped += 1;
                return Ok(());
            }
            table.push(normalized_key, bare, values)
        })?;

        if table.len() == 0 {
            return Err(VectorIndexError::NoVocabularyWords {
                path: path.to_path_buf(),
            });
        }

        info!(
            rows = table.len(),
            dim = table.dim,
            skipped,
            "Vector model loaded"
        );
        Ok(Self::with_table(Some(table), config))
    }

    /// Loads the model if configured; any failure yields an unavailable index.
    pub fn load_or_unavailable(
        path: Option<&Path>,
        vocabulary: &Vocabulary,
        config: VectorIndexConfig,
    ) -> Self {
        let Some(path) = path else {
            warn!("No vector model configured, ranking runs in fallback mode");
            return Self::unavailable(config);
        };

        match Self::load(path, vocabulary, config.clone()) {
            Ok(index) => index,
            Err(e) => {
                warn!(error = %e, "Failed to load vector model, ranking runs in fallback mode");
                Self::unavailable(config)
            }
        }
    }

    /// Builds an index from in-memory `(key, vector)` rows.
    pub fn from_vectors<I, S>(
        rows: I,
        vocabulary: &Vocabulary,
        config: VectorIndexConfig,
    ) -> VectorIndexResult<Self>
    where
        I: IntoIterator<Item = (S, Vec<f32>)>,
        S: AsRef<str>,
    {
        let mut table = VectorTable::new();
        for (key, values) in rows {
            let (bare, normalized_key) = split_key(key.as_ref());
            if vocabulary.contains(&bare) {
                table.push(normalized_key, bare, &values)?;
            }
        }

        if table.len() == 0 {
            return Err(VectorIndexError::NoVocabularyWords {
                path: PathBuf::from("<memory>"),
            });
        }
        Ok(Self::with_table(Some(table), config))
    }

    /// Number of loaded rows (0 when unavailable).
    pub fn len(&self) -> usize {
        self.table.as_ref().map_or(0, VectorTable::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Model dimension (0 when unavailable).
    pub fn dimension(&self) -> usize {
        self.table.as_ref().map_or(0, |t| t.dim)
    }

    fn table(&self) -> VectorIndexResult<&VectorTable> {
        self.table.as_ref().ok_or(VectorIndexError::Unavailable)
    }

    /// Probes the configured tag suffixes in order.
    fn resolve(&self, table: &VectorTable, word: &str) -> Option<usize> {
        self.config
            .tag_suffixes
            .iter()
            .find_map(|suffix| table.keys.get(&format!("{word}{suffix}")).copied())
    }

    fn resolve_or_missing(&self, table: &VectorTable, word: &str) -> VectorIndexResult<usize> {
        self.resolve(table, word)
            .ok_or_else(|| VectorIndexError::WordNotFound {
                word: word.to_string(),
            })
    }
}

impl VectorIndex for EmbeddingIndex {
    fn is_available(&self) -> bool {
        self.table.is_some()
    }

    fn contains(&self, word: &str) -> bool {
        self.table
            .as_ref()
            .is_some_and(|table| self.resolve(table, word).is_some())
    }

    fn similarity(&self, a: &str, b: &str) -> VectorIndexResult<f32> {
        let table = self.table()?;
        let row_a = self.resolve_or_missing(table, a)?;
        let row_b = self.resolve_or_missing(table, b)?;
        let query = table.row_f32(row_a);
        Ok(table.cosine_to(&query, table.norms[row_a], row_b))
    }

    fn nearest_neighbors(&self, word: &str, top_n: usize) -> VectorIndexResult<Arc<Vec<Neighbor>>> {
        let table = self.table()?;
        let row = self.resolve_or_missing(table, word)?;

        let key = (word.to_string(), top_n);
        if let Some(cached) = self.neighbor_cache.get(&key) {
            return Ok(cached);
        }

        debug!(word, top_n, "Computing nearest neighbors");
        let neighbors = Arc::new(table.neighbors_of(row, top_n));
        self.neighbor_cache.insert(key, Arc::clone(&neighbors));
        Ok(neighbors)
    }
}
