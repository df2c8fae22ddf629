use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use tracing::{debug, info};

use super::error::{SessionError, SessionResult};
use super::types::{GameId, GameMode, Guess, GuessOutcome, PlayerId, SessionState};
use crate::learning::Suggestion;
use crate::scoring::RankingEngine;
use crate::vocabulary::normalize_word;

#[derive(Debug, Default)]
struct PlayerProgress {
    attempts: u32,
    history: Vec<Guess>,
}

#[derive(Debug)]
struct SessionInner {
    state: SessionState,
    /// Same order as [`GameSession::players`].
    progress: Vec<PlayerProgress>,
    winner: Option<PlayerId>,
    last_activity: Instant,
    finished_at: Option<Instant>,
}

/// One game: a hidden target, its players and their guesses.
pub struct GameSession {
    id: GameId,
    mode: GameMode,
    players: Vec<PlayerId>,
    target: String,
    started_at: DateTime<Utc>,
    engine: Arc<RankingEngine>,
    inner: Mutex<SessionInner>,
}

impl std::fmt::Debug for GameSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.lock();
        f.debug_struct("GameSession")
            .field("id", &self.id)
            .field("mode", &self.mode)
            .field("players", &self.players)
            .field("state", &inner.state)
            .field("winner", &inner.winner)
            .finish()
    }
}

impl GameSession {
    /// Starts a game with a target drawn from the engine's pool.
    pub fn start(
        id: GameId,
        mode: GameMode,
        players: Vec<PlayerId>,
        engine: Arc<RankingEngine>,
    ) -> SessionResult<Self> {
        Self::check_players(mode, &players)?;
        let target = engine.draw_target()?;
        Ok(Self::begin(id, mode, players, engine, target))
    }

    /// Starts a game with a chosen target.
    pub fn with_target(
        id: GameId,
        mode: GameMode,
        players: Vec<PlayerId>,
        engine: Arc<RankingEngine>,
        target: &str,
    ) -> SessionResult<Self> {
        Self::check_players(mode, &players)?;
        let target = normalize_word(target);
        if !engine.is_playable_target(&target) {
            return Err(SessionError::InvalidTarget { word: target });
        }
        Ok(Self::begin(id, mode, players, engine, target))
    }

    fn check_players(mode: GameMode, players: &[PlayerId]) -> SessionResult<()> {
        let expected = mode.player_count();
        let distinct = players.len() == 1 || players.first() != players.last();
        if players.len() != expected || !distinct {
            return Err(SessionError::InvalidPlayers {
                mode,
                expected,
                actual: players.len(),
            });
        }
        Ok(())
    }

    fn begin(
        id: GameId,
        mode: GameMode,
        players: Vec<PlayerId>,
        engine: Arc<RankingEngine>,
        target: String,
    ) -> Self {
        engine.vocabulary().record_target(&target);

        let inner = SessionInner {
            state: SessionState::Created,
            progress: players.iter().map(|_| PlayerProgress::default()).collect(),
            winner: None,
            last_activity: Instant::now(),
            finished_at: None,
        };
        let session = Self {
            id,
            mode,
            players,
            target,
            started_at: Utc::now(),
            engine,
            inner: Mutex::new(inner),
        };

        session.inner.lock().state = SessionState::InProgress;
        info!(
            game_id = %session.id,
            mode = %session.mode,
            players = ?session.players,
            "Game started"
        );
        debug!(game_id = %session.id, target = %session.target, "Target drawn");
        session
    }

    fn player_index(&self, player: &str) -> Option<usize> {
        self.players.iter().position(|p| p == player)
    }

    /// Submits a guess on behalf of `player`.
    ///
    /// Rejections (`EmptyWord`, `UnknownPlayer`, `InvalidWord`, `RepeatedWord`)
    /// leave the session untouched. Guesses after the game is won are still
    /// scored, but the winner never changes.
    pub fn guess(&self, player: &str, raw: &str) -> SessionResult<GuessOutcome> {
        let word = normalize_word(raw);
        if word.is_empty() {
            return Err(SessionError::EmptyWord);
        }

        let (outcome, winning_history) = {
            let mut inner = self.inner.lock();

            let index = self
                .player_index(player)
                .ok_or_else(|| SessionError::UnknownPlayer {
                    player: player.to_string(),
                })?;
            inner.last_activity = Instant::now();

            if !self.engine.vocabulary().contains(&word) {
                return Err(SessionError::InvalidWord { word });
            }
            if inner.progress[index].history.iter().any(|g| g.word == word) {
                return Err(SessionError::RepeatedWord { word });
            }

            let score = self.engine.score(&word, &self.target)?;

            let progress = &mut inner.progress[index];
            progress.attempts += 1;
            let attempts = progress.attempts;

            let is_correct = score.is_exact();
            if !is_correct {
                progress.history.push(Guess {
                    word: word.clone(),
                    similarity: score.similarity,
                    rank: score.rank,
                    attempt: attempts,
                });
            }

            let mut history = progress.history.clone();
            history.sort_by_key(|g| g.rank);

            let won_game = is_correct && inner.winner.is_none();
            if won_game {
                inner.winner = Some(player.to_string());
                inner.state = SessionState::Won;
                inner.finished_at = Some(Instant::now());
                info!(game_id = %self.id, winner = player, attempts, "Game won");
            }

            let is_winner = inner.winner.as_deref() == Some(player);
            let outcome = GuessOutcome {
                word,
                similarity: score.similarity,
                rank: score.rank,
                attempts,
                is_correct,
                history,
                winner: inner.winner.clone(),
                target_word: is_winner.then(|| self.target.clone()),
                won_game,
            };
            let winning_history = won_game.then(|| inner.progress[index].history.clone());
            (outcome, winning_history)
        };

        debug!(
            game_id = %self.id,
            player,
            word = %outcome.word,
            rank = outcome.rank,
            similarity = outcome.similarity,
            "Guess scored"
        );

        self.engine.vocabulary().record_guess(&outcome.word);
        let associations = self.engine.associations();
        associations.observe_guess(&outcome.word, &self.target, outcome.rank, outcome.is_correct);
        if let Some(history) = winning_history {
            associations.observe_game_result(&self.target, &history, outcome.attempts, true);
        }

        Ok(outcome)
    }

    /// Records an unfinished game as one lost path, provided anyone guessed.
    ///
    /// The path merges every player's history in rank order; its attempt count
    /// is the highest any player reached.
    pub(crate) fn abandon(&self) {
        let (attempts, mut history) = {
            let inner = self.inner.lock();
            if inner.winner.is_some() {
                return;
            }
            let attempts = inner.progress.iter().map(|p| p.attempts).max().unwrap_or(0);
            let history: Vec<Guess> = inner
                .progress
                .iter()
                .flat_map(|p| p.history.iter().cloned())
                .collect();
            (attempts, history)
        };

        if attempts > 0 {
            history.sort_by(|a, b| a.rank.cmp(&b.rank).then_with(|| a.word.cmp(&b.word)));
            history.dedup_by(|a, b| a.word == b.word);
            self.engine
                .associations()
                .observe_game_result(&self.target, &history, attempts, false);
        }
        debug!(game_id = %self.id, attempts, "Game abandoned");
    }

    /// Learned associations of the target that `player` has not guessed yet.
    /// Hints never count as attempts and never include the target.
    pub fn hints(&self, player: &str, count: usize) -> SessionResult<Vec<Suggestion>> {
        let index = self
            .player_index(player)
            .ok_or_else(|| SessionError::UnknownPlayer {
                player: player.to_string(),
            })?;
        let guessed: Vec<String> = {
            let mut inner = self.inner.lock();
            inner.last_activity = Instant::now();
            inner.progress[index]
                .history
                .iter()
                .map(|g| g.word.clone())
                .collect()
        };

        let hints = self
            .engine
            .associations()
            .suggestions(&self.target, &guessed, count);
        debug!(game_id = %self.id, player, hints = hints.len(), "Hints served");
        Ok(hints)
    }

    /// The other player of a multiplayer game.
    pub fn opponent(&self, player: &str) -> Option<&PlayerId> {
        if self.mode != GameMode::Multiplayer || self.player_index(player).is_none() {
            return None;
        }
        self.players.iter().find(|p| p.as_str() != player)
    }

    pub fn id(&self) -> GameId {
        self.id
    }

    pub fn mode(&self) -> GameMode {
        self.mode
    }

    pub fn players(&self) -> &[PlayerId] {
        &self.players
    }

    pub fn target_word(&self) -> &str {
        &self.target
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn state(&self) -> SessionState {
        self.inner.lock().state
    }

    pub fn winner(&self) -> Option<PlayerId> {
        self.inner.lock().winner.clone()
    }

    pub fn is_finished(&self) -> bool {
        self.inner.lock().state == SessionState::Won
    }

    /// Attempt count of `player`, `None` if they are not in this game.
    pub fn attempts(&self, player: &str) -> Option<u32> {
        let index = self.player_index(player)?;
        Some(self.inner.lock().progress[index].attempts)
    }

    /// History of `player` in guess order.
    pub fn history(&self, player: &str) -> Option<Vec<Guess>> {
        let index = self.player_index(player)?;
        Some(self.inner.lock().progress[index].history.clone())
    }

    /// Time since the last guess (or since the start).
    pub fn idle_for(&self) -> Duration {
        self.inner.lock().last_activity.elapsed()
    }

    pub fn is_idle(&self, timeout: Duration) -> bool {
        self.idle_for() >= timeout
    }

    /// Time since the game was won.
    pub fn finished_for(&self) -> Option<Duration> {
        self.inner.lock().finished_at.map(|t| t.elapsed())
    }
}
