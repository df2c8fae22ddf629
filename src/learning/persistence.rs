//! Background snapshot writer.
//!
//! Snapshots are sent over an unbounded channel to a single tokio task that
//! writes them atomically, in submission order. Queued snapshots are coalesced
//! to the newest one, and a failed batch write is simply superseded by the next
//! batch boundary. Flush requests travel the same channel and are acknowledged
//! once their snapshot (or a newer one) is on disk.

use std::path::{Path, PathBuf};

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, error};

use super::error::{LearningError, LearningResult};
use super::types::LearningSnapshot;
use crate::storage::write_json_atomic;

type FlushAck = oneshot::Sender<Result<(), String>>;

enum WriterMessage {
    Batch(LearningSnapshot),
    Flush(LearningSnapshot, FlushAck),
}

impl WriterMessage {
    fn into_parts(self) -> (LearningSnapshot, Option<FlushAck>) {
        match self {
            Self::Batch(snapshot) => (snapshot, None),
            Self::Flush(snapshot, ack) => (snapshot, Some(ack)),
        }
    }
}

impl std::fmt::Debug for WriterMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Batch(s) => write!(f, "Batch(games_played={})", s.games_played),
            Self::Flush(s, _) => write!(f, "Flush(games_played={})", s.games_played),
        }
    }
}

/// Handle used by the store to submit snapshots.
#[derive(Debug, Clone)]
pub struct SnapshotWriter {
    tx: mpsc::UnboundedSender<WriterMessage>,
    path: PathBuf,
}

impl SnapshotWriter {
    /// Spawns the writer task. It stops once every handle is dropped.
    pub fn spawn(path: PathBuf) -> (Self, JoinHandle<()>) {
        let (tx, mut rx) = mpsc::unbounded_channel::<WriterMessage>();
        let task_path = path.clone();

        let handle = tokio::spawn(async move {
            while let Some(message) = rx.recv().await {
                let (mut snapshot, ack) = message.into_parts();
                let mut acks: Vec<FlushAck> = ack.into_iter().collect();
                while let Ok(newer) = rx.try_recv() {
                    let (next, ack) = newer.into_parts();
                    snapshot = next;
                    acks.extend(ack);
                }

                let path = task_path.clone();
                let games_played = snapshot.games_played;
                let result =
                    tokio::task::spawn_blocking(move || write_json_atomic(&path, &snapshot)).await;

                let outcome = match result {
                    Ok(Ok(())) => {
                        debug!(
                            games_played,
                            path = %task_path.display(),
                            "Learning snapshot written"
                        );
                        Ok(())
                    }
                    Ok(Err(e)) => {
                        error!(
                            error = %e,
                            "Learning snapshot write failed, retrying at next batch boundary"
                        );
                        Err(e.to_string())
                    }
                    Err(e) => {
                        error!(error = %e, "Learning snapshot task panicked");
                        Err(e.to_string())
                    }
                };

                for ack in acks {
                    let _ = ack.send(outcome.clone());
                }
            }
            debug!("Snapshot writer stopped");
        });

        (Self { tx, path }, handle)
    }

    /// Queues a batch snapshot. Never blocks.
    pub fn submit(&self, snapshot: LearningSnapshot) -> LearningResult<()> {
        self.tx
            .send(WriterMessage::Batch(snapshot))
            .map_err(|_| LearningError::WriterClosed)
    }

    /// Queues `snapshot` behind any pending batch and waits until it is written.
    pub async fn flush(&self, snapshot: LearningSnapshot) -> LearningResult<()> {
        let (ack_tx, ack_rx) = oneshot::channel();
        self.tx
            .send(WriterMessage::Flush(snapshot, ack_tx))
            .map_err(|_| LearningError::WriterClosed)?;

        match ack_rx.await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(reason)) => Err(LearningError::FlushFailed { reason }),
            Err(_) => Err(LearningError::WriterClosed),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
