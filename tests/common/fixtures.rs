//! Test fixtures for integration tests: on-disk vocabulary and model files plus
//! a fully wired game stack built from them.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tempfile::TempDir;

use wordweave::config::Config;
use wordweave::coordinator::SessionCoordinator;
use wordweave::learning::{AssociationStore, SnapshotWriter};
use wordweave::scoring::RankingEngine;
use wordweave::vectors::EmbeddingIndex;
use wordweave::vectors::mock::{WORDS_WITHOUT_VECTORS, sample_rows};
use wordweave::vocabulary::Vocabulary;

/// Writes a vocabulary file in the `word → record` schema.
pub fn write_vocabulary(path: &Path, words: &[&str]) {
    let records: serde_json::Map<String, serde_json::Value> = words
        .iter()
        .enumerate()
        .map(|(id, word)| {
            let chars: Vec<char> = word.chars().collect();
            (
                word.to_string(),
                serde_json::json!({
                    "id": id,
                    "word": word,
                    "length": chars.len(),
                    "first_letter": chars[0].to_string(),
                    "last_letter": chars[chars.len() - 1].to_string(),
                }),
            )
        })
        .collect();
    std::fs::write(path, serde_json::to_vec_pretty(&records).unwrap()).unwrap();
}

/// Every word of the sample model plus the words that have no vector.
pub fn sample_words() -> Vec<&'static str> {
    sample_rows()
        .into_iter()
        .map(|(key, _)| key.split('_').next().unwrap())
        .filter(|w| *w != "вектор")
        .chain(WORDS_WITHOUT_VECTORS.iter().copied())
        .collect()
}

/// Writes the sample model in word2vec binary format.
pub fn write_binary_model(path: &Path) {
    let rows = sample_rows();
    let dim = rows[0].1.len();
    let mut file = std::fs::File::create(path).unwrap();
    writeln!(file, "{} {}", rows.len(), dim).unwrap();
    for (key, values) in rows {
        file.write_all(key.as_bytes()).unwrap();
        file.write_all(b" ").unwrap();
        for value in values {
            file.write_all(&value.to_le_bytes()).unwrap();
        }
        file.write_all(b"\n").unwrap();
    }
}

/// Writes the sample model in word2vec text format.
pub fn write_text_model(path: &Path) {
    let rows = sample_rows();
    let mut text = format!("{} {}\n", rows.len(), rows[0].1.len());
    for (key, values) in rows {
        let values: Vec<String> = values.iter().map(|v| v.to_string()).collect();
        text.push_str(&format!("{} {}\n", key, values.join(" ")));
    }
    std::fs::write(path, text).unwrap();
}

/// A data directory with the sample vocabulary and (optionally) a binary model.
pub struct GameFiles {
    pub dir: TempDir,
    pub model: Option<PathBuf>,
}

impl GameFiles {
    pub fn with_model() -> Self {
        let files = Self::without_model();
        let model = files.dir.path().join("model.bin");
        write_binary_model(&model);
        Self {
            model: Some(model),
            ..files
        }
    }

    pub fn without_model() -> Self {
        let dir = TempDir::new().unwrap();
        write_vocabulary(&dir.path().join("word_database.json"), &sample_words());
        Self { dir, model: None }
    }

    pub fn config(&self) -> Config {
        Config {
            data_dir: self.dir.path().to_path_buf(),
            vector_model_path: self.model.clone(),
            learning_flush_every: 1,
            ..Default::default()
        }
    }
}

/// The game stack wired the way the server binary wires it.
pub struct GameStack {
    pub config: Config,
    pub vocabulary: Arc<Vocabulary>,
    pub associations: Arc<AssociationStore>,
    pub engine: Arc<RankingEngine>,
    pub coordinator: Arc<SessionCoordinator>,
    pub writer: tokio::task::JoinHandle<()>,
}

impl GameStack {
    /// Must run inside a tokio runtime (spawns the snapshot writer).
    pub fn start(config: Config) -> Self {
        config.validate().unwrap();
        let vocabulary = Arc::new(Vocabulary::load(&config.vocabulary_path()).unwrap());
        let index = EmbeddingIndex::load_or_unavailable(
            config.vector_model_path.as_deref(),
            &vocabulary,
            config.vector_index_config(),
        );

        let (writer, handle) = SnapshotWriter::spawn(config.learning_path());
        let associations = Arc::new(
            AssociationStore::load(&config.learning_path(), config.learning_config())
                .unwrap()
                .with_writer(writer),
        );
        let engine = Arc::new(
            RankingEngine::new(
                Arc::clone(&vocabulary),
                Arc::new(index),
                Arc::clone(&associations),
                config.ranking_config(),
            )
            .unwrap(),
        );
        let coordinator = Arc::new(SessionCoordinator::new(
            Arc::clone(&engine),
            config.coordinator_config(),
        ));

        Self {
            config,
            vocabulary,
            associations,
            engine,
            coordinator,
            writer: handle,
        }
    }

    /// Flushes learning data and vocabulary counters, then stops the writer.
    pub async fn shutdown(self) {
        self.associations.flush().await.unwrap();
        self.vocabulary
            .save(&self.config.vocabulary_path())
            .unwrap();
        let Self {
            coordinator,
            engine,
            associations,
            writer,
            ..
        } = self;
        drop(coordinator);
        drop(engine);
        drop(associations);
        writer.await.unwrap();
    }
}
