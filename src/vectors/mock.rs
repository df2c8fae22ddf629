//! Small in-memory model for tests and examples.

use super::{EmbeddingIndex, VectorIndexConfig};
use crate::vocabulary::Vocabulary;

/// Vocabulary words that have no vector in [`sample_rows`].
pub const WORDS_WITHOUT_VECTORS: &[&str] = &["книжка", "елка"];

/// Four tight clusters (reading, furniture, animals, water) in 4 dimensions.
pub fn sample_rows() -> Vec<(&'static str, Vec<f32>)> {
    vec![
        ("книга_NOUN", vec![1.0, 0.0, 0.0, 0.0]),
        ("журнал_NOUN", vec![0.95, 0.1, 0.0, 0.0]),
        ("газета_NOUN", vec![0.9, 0.2, 0.0, 0.0]),
        ("роман_NOUN", vec![0.85, 0.05, 0.1, 0.0]),
        ("библиотека_NOUN", vec![0.8, 0.0, 0.3, 0.0]),
        ("стол_NOUN", vec![0.0, 1.0, 0.0, 0.0]),
        ("стул_NOUN", vec![0.0, 0.95, 0.1, 0.0]),
        ("шкаф_NOUN", vec![0.05, 0.9, 0.0, 0.2]),
        ("кошка_NOUN", vec![0.0, 0.0, 1.0, 0.0]),
        ("собака_NOUN", vec![0.0, 0.1, 0.95, 0.0]),
        ("река_NOUN", vec![0.0, 0.0, 0.0, 1.0]),
        ("озеро_NOUN", vec![0.0, 0.05, 0.0, 0.98]),
        ("море", vec![0.0, 0.0, 0.1, 0.95]),
        ("вектор_NOUN", vec![0.5, 0.5, 0.5, 0.5]),
    ]
}

/// Every vocabulary word of the sample model plus [`WORDS_WITHOUT_VECTORS`].
pub fn sample_vocabulary() -> Vocabulary {
    let words = sample_rows()
        .into_iter()
        .map(|(key, _)| key.split('_').next().unwrap_or(key).to_string())
        .filter(|w| w != "вектор")
        .chain(WORDS_WITHOUT_VECTORS.iter().map(|w| w.to_string()));
    Vocabulary::from_words(words).expect("sample vocabulary is non-empty")
}

/// An index over [`sample_rows`] restricted to `vocabulary`.
pub fn sample_index(vocabulary: &Vocabulary) -> EmbeddingIndex {
    EmbeddingIndex::from_vectors(sample_rows(), vocabulary, VectorIndexConfig::default())
        .expect("sample rows contain vocabulary words")
}

/// Cosine similarity of two f32 slices (0.0 on length mismatch or zero norm).
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot_product / (norm_a * norm_b)
    }
}
