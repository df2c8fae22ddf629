use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tokio::time;
use tracing::{debug, info, instrument};

use super::config::CoordinatorConfig;
use super::error::{CoordinatorError, CoordinatorResult};
use super::types::{GameStarted, Matchmaking, ReapReport, RoutedGuess};
use crate::constants::HINT_COUNT;
use crate::learning::Suggestion;
use crate::scoring::RankingEngine;
use crate::session::{GameId, GameMode, GameSession, PlayerId};

#[derive(Debug, Default)]
struct Registry {
    sessions: HashMap<GameId, Arc<GameSession>>,
    queue: VecDeque<PlayerId>,
}

/// Owns live sessions and the matchmaking queue.
pub struct SessionCoordinator {
    engine: Arc<RankingEngine>,
    config: CoordinatorConfig,
    registry: Mutex<Registry>,
    reaper_running: AtomicBool,
    shutdown_initiated: AtomicBool,
}

impl std::fmt::Debug for SessionCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let registry = self.registry.lock();
        f.debug_struct("SessionCoordinator")
            .field("sessions", &registry.sessions.len())
            .field("waiting", &registry.queue)
            .field("config", &self.config)
            .finish()
    }
}

impl SessionCoordinator {
    pub fn new(engine: Arc<RankingEngine>, config: CoordinatorConfig) -> Self {
        Self {
            engine,
            config,
            registry: Mutex::new(Registry::default()),
            reaper_running: AtomicBool::new(false),
            shutdown_initiated: AtomicBool::new(false),
        }
    }

    pub fn engine(&self) -> &Arc<RankingEngine> {
        &self.engine
    }

    pub fn config(&self) -> &CoordinatorConfig {
        &self.config
    }

    fn create_session(
        &self,
        registry: &mut Registry,
        mode: GameMode,
        players: Vec<PlayerId>,
    ) -> CoordinatorResult<GameStarted> {
        let session = GameSession::start(GameId::new(), mode, players, Arc::clone(&self.engine))?;
        let started = GameStarted {
            game_id: session.id(),
            mode,
            players: session.players().to_vec(),
        };
        registry.sessions.insert(session.id(), Arc::new(session));
        Ok(started)
    }

    /// Starts a single-player game. A player waiting for an opponent leaves the queue.
    #[instrument(skip(self))]
    pub fn request_solo_game(&self, player: &str) -> CoordinatorResult<GameStarted> {
        let mut registry = self.registry.lock();
        registry.queue.retain(|p| p != player);
        self.create_session(&mut registry, GameMode::Solo, vec![player.to_string()])
    }

    /// Pairs `player` with the longest-waiting player, or queues them.
    ///
    /// A player already in the queue is not added twice and never matches
    /// themself.
    #[instrument(skip(self))]
    pub fn request_multiplayer_game(&self, player: &str) -> CoordinatorResult<Matchmaking> {
        let mut registry = self.registry.lock();

        if registry.queue.iter().any(|p| p == player) {
            debug!(player, "Already waiting for an opponent");
            return Ok(Matchmaking::Waiting);
        }

        let Some(opponent) = registry.queue.pop_front() else {
            registry.queue.push_back(player.to_string());
            info!(player, "Waiting for an opponent");
            return Ok(Matchmaking::Waiting);
        };

        let players = vec![opponent.clone(), player.to_string()];
        match self.create_session(&mut registry, GameMode::Multiplayer, players) {
            Ok(started) => {
                info!(game_id = %started.game_id, %opponent, player, "Players matched");
                Ok(Matchmaking::Matched(started))
            }
            Err(e) => {
                registry.queue.push_front(opponent);
                Err(e)
            }
        }
    }

    /// Scores a guess in `game_id` and returns who else must hear about it.
    #[instrument(skip(self))]
    pub fn route_guess(
        &self,
        player: &str,
        game_id: GameId,
        word: &str,
    ) -> CoordinatorResult<RoutedGuess> {
        let session = self
            .session(game_id)
            .ok_or(CoordinatorError::UnknownGame { game_id })?;

        let outcome = session.guess(player, word)?;
        Ok(RoutedGuess {
            game_id,
            outcome,
            opponent: session.opponent(player).cloned(),
        })
    }

    /// Association hints for `player` in `game_id`.
    #[instrument(skip(self))]
    pub fn request_hints(
        &self,
        player: &str,
        game_id: GameId,
    ) -> CoordinatorResult<Vec<Suggestion>> {
        let session = self
            .session(game_id)
            .ok_or(CoordinatorError::UnknownGame { game_id })?;
        Ok(session.hints(player, HINT_COUNT)?)
    }

    /// Drops `player` from the matchmaking queue. Their sessions are kept so
    /// a reconnect can continue; the reaper collects them if they stay idle.
    #[instrument(skip(self))]
    pub fn disconnect(&self, player: &str) -> bool {
        let mut registry = self.registry.lock();
        let before = registry.queue.len();
        registry.queue.retain(|p| p != player);
        before != registry.queue.len()
    }

    pub fn session(&self, game_id: GameId) -> Option<Arc<GameSession>> {
        self.registry.lock().sessions.get(&game_id).cloned()
    }

    pub fn active_games(&self) -> usize {
        self.registry.lock().sessions.len()
    }

    pub fn waiting_players(&self) -> usize {
        self.registry.lock().queue.len()
    }

    /// Removes won sessions older than the finished TTL and sessions idle past
    /// the idle timeout. Abandoned games are recorded as lost.
    pub fn reap(&self) -> ReapReport {
        let mut report = ReapReport::default();
        let mut abandoned = Vec::new();

        {
            let mut registry = self.registry.lock();
            registry.sessions.retain(|_, session| {
                if let Some(age) = session.finished_for() {
                    if age >= self.config.finished_ttl {
                        report.finished += 1;
                        return false;
                    }
                    return true;
                }
                if session.is_idle(self.config.idle_timeout) {
                    report.abandoned += 1;
                    abandoned.push(Arc::clone(session));
                    return false;
                }
                true
            });
        }

        for session in abandoned {
            session.abandon();
        }

        if report.total() > 0 {
            info!(
                finished = report.finished,
                abandoned = report.abandoned,
                remaining = self.active_games(),
                "Reaped sessions"
            );
        }
        report
    }

    /// Runs [`reap`](Self::reap) every `reap_interval` until
    /// [`shutdown`](Self::shutdown). Only one reaper runs at a time.
    pub fn start_reaper(self: &Arc<Self>) -> JoinHandle<()> {
        if self.reaper_running.swap(true, Ordering::AcqRel) {
            return tokio::spawn(async {});
        }

        let coordinator = Arc::clone(self);
        tokio::spawn(async move {
            let mut interval = time::interval(coordinator.config.reap_interval);
            interval.tick().await;
            loop {
                interval.tick().await;
                if coordinator.shutdown_initiated.load(Ordering::Acquire) {
                    break;
                }
                coordinator.reap();
            }
            coordinator.reaper_running.store(false, Ordering::Release);
            debug!("Session reaper stopped");
        })
    }

    /// Stops the reaper at its next tick.
    pub fn shutdown(&self) {
        self.shutdown_initiated.store(true, Ordering::Release);
    }
}
