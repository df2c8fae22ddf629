use std::collections::{BTreeMap, BTreeSet, HashMap, VecDeque};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use parking_lot::{Mutex, RwLock};
use tracing::{debug, info, warn};

use super::config::LearningConfig;
use super::error::LearningResult;
use super::persistence::SnapshotWriter;
use super::types::{
    GamePath, LearningInsights, LearningSnapshot, LearningStats, Suggestion, WordDifficulty,
};
use crate::constants::{
    ASSOCIATION_SHARDS, DEFAULT_DIFFICULTY, DIFFICULTY_ATTEMPTS_SCALE, EXACT_STRENGTH,
};
use crate::hashing::shard_for;
use crate::session::Guess;
use crate::storage::{read_json_if_exists, write_json_atomic};

type EdgeMap = HashMap<String, HashMap<String, f32>>;

#[derive(Debug, Default)]
struct CategoryIndex {
    /// target → member words (the target included).
    sets: HashMap<String, BTreeSet<String>>,
    /// word → targets whose set contains it.
    membership: HashMap<String, BTreeSet<String>>,
}

impl CategoryIndex {
    fn merge(&mut self, target: &str, words: impl IntoIterator<Item = String>) {
        let set = self.sets.entry(target.to_string()).or_default();
        for word in words {
            self.membership
                .entry(word.clone())
                .or_default()
                .insert(target.to_string());
            set.insert(word);
        }
    }

    fn share_category(&self, a: &str, b: &str) -> bool {
        match (self.membership.get(a), self.membership.get(b)) {
            (Some(left), Some(right)) => !left.is_disjoint(right),
            _ => false,
        }
    }
}

/// Learned word-pair strengths and category sets, shared by all sessions.
///
/// Edges live in a sharded lock table keyed by the `from` word; every
/// read-modify-write holds exactly one shard lock, so concurrent increments of
/// the same pair are never lost and no two locks are ever nested.
pub struct AssociationStore {
    shards: Vec<RwLock<EdgeMap>>,
    categories: RwLock<CategoryIndex>,
    paths: Mutex<VecDeque<GamePath>>,
    games_played: AtomicU64,
    total_guesses: AtomicU64,
    last_update: Mutex<Option<DateTime<Utc>>>,
    config: LearningConfig,
    writer: Option<SnapshotWriter>,
}

impl std::fmt::Debug for AssociationStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssociationStore")
            .field("stats", &self.stats())
            .field("writer", &self.writer.as_ref().map(|w| w.path().to_path_buf()))
            .finish()
    }
}

impl Default for AssociationStore {
    fn default() -> Self {
        Self::new(LearningConfig::default())
    }
}

impl AssociationStore {
    /// Creates an empty store.
    pub fn new(config: LearningConfig) -> Self {
        Self {
            shards: (0..ASSOCIATION_SHARDS)
                .map(|_| RwLock::new(HashMap::new()))
                .collect(),
            categories: RwLock::new(CategoryIndex::default()),
            paths: Mutex::new(VecDeque::new()),
            games_played: AtomicU64::new(0),
            total_guesses: AtomicU64::new(0),
            last_update: Mutex::new(None),
            config,
            writer: None,
        }
    }

    /// Rebuilds a store from persisted data. Paths beyond the cap keep the newest.
    pub fn from_snapshot(snapshot: LearningSnapshot, config: LearningConfig) -> Self {
        let store = Self::new(config);

        for (from, edges) in snapshot.associations {
            let mut shard = store.shard(&from).write();
            shard.insert(from, edges.into_iter().collect());
        }

        {
            let mut categories = store.categories.write();
            for (target, words) in snapshot.categories {
                categories.merge(&target, words);
            }
        }

        {
            let mut paths = store.paths.lock();
            let skip = snapshot.paths.len().saturating_sub(store.config.max_paths);
            paths.extend(snapshot.paths.into_iter().skip(skip));
        }

        store
            .games_played
            .store(snapshot.games_played, Ordering::Relaxed);
        store
            .total_guesses
            .store(snapshot.total_guesses, Ordering::Relaxed);
        *store.last_update.lock() = snapshot.last_update;
        store
    }

    /// Loads the learning file; a missing file yields an empty store.
    pub fn load(path: &Path, config: LearningConfig) -> LearningResult<Self> {
        match read_json_if_exists::<LearningSnapshot>(path)? {
            Some(snapshot) => {
                let store = Self::from_snapshot(snapshot, config);
                info!(path = %path.display(), stats = ?store.stats(), "Learning data loaded");
                Ok(store)
            }
            None => {
                info!(path = %path.display(), "No learning data found, starting empty");
                Ok(Self::new(config))
            }
        }
    }

    /// Attaches a background writer used at batch boundaries.
    pub fn with_writer(mut self, writer: SnapshotWriter) -> Self {
        self.writer = Some(writer);
        self
    }

    pub fn config(&self) -> &LearningConfig {
        &self.config
    }

    fn shard(&self, word: &str) -> &RwLock<EdgeMap> {
        &self.shards[shard_for(word, self.shards.len())]
    }

    fn touch(&self) {
        *self.last_update.lock() = Some(Utc::now());
    }

    /// Strength of the directed edge `from → to`, if learned.
    pub fn strength(&self, from: &str, to: &str) -> Option<f32> {
        self.shard(from)
            .read()
            .get(from)
            .and_then(|edges| edges.get(to))
            .copied()
    }

    /// Applies `update` to the edge `from → to` under its shard lock.
    fn update_edge(&self, from: &str, to: &str, update: impl FnOnce(f32) -> f32) -> f32 {
        let mut shard = self.shard(from).write();
        let slot = shard
            .entry(from.to_string())
            .or_default()
            .entry(to.to_string())
            .or_insert(0.0);
        *slot = update(*slot);
        *slot
    }

    /// Learns from one scored guess. Returns the new forward strength.
    ///
    /// Non-exact: `old + rate / (1 + log10(rank + 1))`, clamped to the ceiling and
    /// never below `old`. Exact: `1.0`. The reverse edge is raised to
    /// `forward × reverse_discount`.
    pub fn observe_guess(&self, guess: &str, target: &str, rank: u32, is_correct: bool) -> f32 {
        self.total_guesses.fetch_add(1, Ordering::Relaxed);

        let rate = self.config.learning_rate;
        let ceiling = self.config.max_strength;
        let forward = self.update_edge(target, guess, |old| {
            if is_correct {
                EXACT_STRENGTH
            } else {
                let reward = rate / (1.0 + ((rank as f32) + 1.0).log10());
                (old + reward).min(ceiling).max(old)
            }
        });

        if guess != target {
            let discounted = forward * self.config.reverse_discount;
            self.update_edge(guess, target, |old| old.max(discounted));
        }

        self.touch();
        forward
    }

    /// Learns from a finished game.
    ///
    /// On a win every history word above the category threshold joins the
    /// target's category (the target included).
    pub fn observe_game_result(&self, target: &str, history: &[Guess], attempts: u32, won: bool) {
        let games_played = self.games_played.fetch_add(1, Ordering::Relaxed) + 1;

        {
            let mut paths = self.paths.lock();
            paths.push_back(GamePath {
                target: target.to_string(),
                guesses: history.iter().map(|g| g.word.clone()).collect(),
                attempts,
                timestamp: Utc::now(),
                won,
            });
            while paths.len() > self.config.max_paths {
                paths.pop_front();
            }
        }

        if won {
            let members: Vec<String> = history
                .iter()
                .filter(|g| g.similarity > self.config.category_threshold)
                .map(|g| g.word.clone())
                .chain(std::iter::once(target.to_string()))
                .collect();
            debug!(target, members = members.len(), "Merging category");
            self.categories.write().merge(target, members);
        }

        self.touch();

        if self.config.flush_every > 0 && games_played.is_multiple_of(self.config.flush_every) {
            self.submit_snapshot();
        }
    }

    fn submit_snapshot(&self) {
        let Some(writer) = &self.writer else {
            return;
        };
        if let Err(e) = writer.submit(self.snapshot()) {
            warn!(error = %e, "Could not queue learning snapshot");
        }
    }

    /// Returns `true` if both words appear in a common category set.
    pub fn share_category(&self, a: &str, b: &str) -> bool {
        self.categories.read().share_category(a, b)
    }

    /// Learned similarity for a pair, or `None` when nothing is known.
    ///
    /// The strongest edge in either direction, raised to the category floor when
    /// the words share a category.
    pub fn learned_similarity(&self, a: &str, b: &str) -> Option<f32> {
        let edge = match (self.strength(a, b), self.strength(b, a)) {
            (Some(x), Some(y)) => Some(x.max(y)),
            (x, y) => x.or(y),
        };

        if self.share_category(a, b) {
            Some(edge.unwrap_or(0.0).max(self.config.category_floor))
        } else {
            edge
        }
    }

    /// Outgoing edges of `word`, strongest first (self edges excluded).
    pub fn best_associations(&self, word: &str, top_n: usize) -> Vec<(String, f32)> {
        let mut edges: Vec<(String, f32)> = self
            .shard(word)
            .read()
            .get(word)
            .map(|edges| {
                edges
                    .iter()
                    .filter(|(to, _)| to.as_str() != word)
                    .map(|(to, s)| (to.clone(), *s))
                    .collect()
            })
            .unwrap_or_default();

        edges.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        edges.truncate(top_n);
        edges
    }

    /// Learned associations of `target` a player could try next, strongest
    /// first. `target` itself and words in `exclude` are never suggested.
    pub fn suggestions(&self, target: &str, exclude: &[String], top_n: usize) -> Vec<Suggestion> {
        self.best_associations(target, usize::MAX)
            .into_iter()
            .filter(|(word, _)| !exclude.contains(word))
            .take(top_n)
            .map(|(word, strength)| Suggestion { word, strength })
            .collect()
    }

    fn difficulties(&self) -> Vec<WordDifficulty> {
        let mut totals: BTreeMap<String, (usize, u64)> = BTreeMap::new();
        for path in self.paths.lock().iter().filter(|p| p.attempts > 0) {
            let entry = totals.entry(path.target.clone()).or_default();
            entry.0 += 1;
            entry.1 += u64::from(path.attempts);
        }

        totals
            .into_iter()
            .map(|(word, (games, attempts))| {
                let average_attempts = attempts as f64 / games as f64;
                WordDifficulty {
                    word,
                    games,
                    average_attempts,
                    difficulty: (average_attempts / DIFFICULTY_ATTEMPTS_SCALE).min(1.0) as f32,
                }
            })
            .collect()
    }

    /// Difficulty of `target` in `[0, 1]`, from its recorded games. Targets
    /// never played report [`DEFAULT_DIFFICULTY`].
    pub fn word_difficulty(&self, target: &str) -> f32 {
        self.difficulties()
            .into_iter()
            .find(|d| d.word == target)
            .map_or(DEFAULT_DIFFICULTY, |d| d.difficulty)
    }

    /// Aggregates over the retained paths.
    pub fn insights(&self) -> LearningInsights {
        let (games, wins, attempts) = {
            let paths = self.paths.lock();
            let played: Vec<&GamePath> = paths.iter().filter(|p| p.attempts > 0).collect();
            (
                played.len(),
                played.iter().filter(|p| p.won).count(),
                played.iter().map(|p| u64::from(p.attempts)).sum::<u64>(),
            )
        };
        if games == 0 {
            return LearningInsights::default();
        }

        let difficulties = self.difficulties();
        let by_difficulty = |a: &&WordDifficulty, b: &&WordDifficulty| {
            a.difficulty
                .total_cmp(&b.difficulty)
                .then_with(|| b.word.cmp(&a.word))
        };

        LearningInsights {
            games_analyzed: games,
            average_attempts: attempts as f64 / games as f64,
            win_rate: wins as f64 / games as f64,
            unique_targets: difficulties.len(),
            hardest: difficulties.iter().max_by(by_difficulty).cloned(),
            easiest: difficulties.iter().min_by(by_difficulty).cloned(),
        }
    }

    /// Members of the category keyed by `target`.
    pub fn category(&self, target: &str) -> Option<BTreeSet<String>> {
        self.categories.read().sets.get(target).cloned()
    }

    pub fn stats(&self) -> LearningStats {
        let associations = self
            .shards
            .iter()
            .map(|shard| shard.read().values().map(HashMap::len).sum::<usize>())
            .sum();
        LearningStats {
            games_played: self.games_played.load(Ordering::Relaxed),
            total_guesses: self.total_guesses.load(Ordering::Relaxed),
            associations,
            categories: self.categories.read().sets.len(),
            paths: self.paths.lock().len(),
        }
    }

    /// Copies the full state into the persisted schema.
    pub fn snapshot(&self) -> LearningSnapshot {
        let mut associations = BTreeMap::new();
        for shard in &self.shards {
            for (from, edges) in shard.read().iter() {
                associations.insert(
                    from.clone(),
                    edges.iter().map(|(to, s)| (to.clone(), *s)).collect(),
                );
            }
        }

        let categories = self
            .categories
            .read()
            .sets
            .iter()
            .map(|(target, words)| (target.clone(), words.clone()))
            .collect();

        LearningSnapshot {
            associations,
            paths: self.paths.lock().iter().cloned().collect(),
            categories,
            games_played: self.games_played.load(Ordering::Relaxed),
            total_guesses: self.total_guesses.load(Ordering::Relaxed),
            last_update: *self.last_update.lock(),
        }
    }

    /// Writes the current state synchronously.
    pub fn save(&self, path: &Path) -> LearningResult<()> {
        write_json_atomic(path, &self.snapshot())?;
        Ok(())
    }

    /// Forces a write of the current state through the attached writer,
    /// bypassing the batch schedule. Earlier batch snapshots are written first,
    /// so the flushed state is what ends up on disk. A store without a writer
    /// has nothing to flush.
    pub async fn flush(&self) -> LearningResult<()> {
        let Some(writer) = &self.writer else {
            return Ok(());
        };
        writer.flush(self.snapshot()).await?;
        info!(path = %writer.path().display(), stats = ?self.stats(), "Learning data flushed");
        Ok(())
    }
}
