use axum::{
    extract::{
        Path, State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::Response,
};
use futures_util::{SinkExt, StreamExt};
use tracing::{debug, error, info, instrument, warn};

use crate::coordinator::{Matchmaking, SessionCoordinator};
use crate::gateway::error::GatewayError;
use crate::gateway::messages::{ClientMessage, Outbound, ServerMessage};
use crate::gateway::state::AppState;
use crate::session::GameId;

#[instrument(skip(ws, state))]
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    Path(client_id): Path<String>,
    State(state): State<AppState>,
) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, client_id, state))
}

async fn handle_socket(socket: WebSocket, client_id: String, state: AppState) {
    let (mut sink, mut stream) = socket.split();
    let (connection_id, mut rx) = state.connections.register(&client_id);
    info!(client_id = %client_id, "Client connected");

    let writer_client = client_id.clone();
    let writer = tokio::spawn(async move {
        while let Some(message) = rx.recv().await {
            let text = match serde_json::to_string(&message) {
                Ok(text) => text,
                Err(e) => {
                    error!(error = %e, "Failed to encode server message");
                    continue;
                }
            };
            if sink.send(Message::Text(text.into())).await.is_err() {
                debug!(client_id = %writer_client, "Socket closed while sending");
                break;
            }
        }
    });

    while let Some(frame) = stream.next().await {
        match frame {
            Ok(Message::Text(text)) => {
                let coordinator = state.coordinator.clone();
                let sender = client_id.clone();
                let text = text.as_str().to_owned();
                let outbound = tokio::task::spawn_blocking(move || {
                    handle_text(&coordinator, &sender, &text)
                })
                .await
                .unwrap_or_else(|e| {
                    vec![Outbound::new(
                        client_id.clone(),
                        GatewayError::InternalError(e.to_string()).to_message(),
                    )]
                });
                state.connections.deliver(outbound);
            }
            Ok(Message::Close(_)) => break,
            Ok(_) => {}
            Err(e) => {
                warn!(client_id = %client_id, error = %e, "WebSocket receive failed");
                break;
            }
        }
    }

    close_connection(&state, &client_id, connection_id);
    writer.abort();
    info!(client_id = %client_id, "Client disconnected");
}

/// Tears down one connection. Matchmaking state is only cleared when this was
/// still the client's current connection; a newer one keeps its queue slot.
pub fn close_connection(state: &AppState, client_id: &str, connection_id: u64) -> bool {
    if !state.connections.unregister(client_id, connection_id) {
        debug!(client_id, connection_id, "Stale connection closed");
        return false;
    }
    state.coordinator.disconnect(client_id);
    true
}

/// Decodes one text frame and dispatches it.
pub fn handle_text(coordinator: &SessionCoordinator, client_id: &str, text: &str) -> Vec<Outbound> {
    match serde_json::from_str::<ClientMessage>(text) {
        Ok(message) => dispatch(coordinator, client_id, message),
        Err(e) => vec![Outbound::new(
            client_id,
            GatewayError::InvalidMessage(e.to_string()).to_message(),
        )],
    }
}

/// Applies one client action and returns every message it produces.
///
/// Failures become an `error` frame for the sender only.
pub fn dispatch(
    coordinator: &SessionCoordinator,
    client_id: &str,
    message: ClientMessage,
) -> Vec<Outbound> {
    try_dispatch(coordinator, client_id, message).unwrap_or_else(|e| {
        debug!(client_id, code = e.code(), error = %e, "Rejected client action");
        vec![Outbound::new(client_id, e.to_message())]
    })
}

fn try_dispatch(
    coordinator: &SessionCoordinator,
    client_id: &str,
    message: ClientMessage,
) -> Result<Vec<Outbound>, GatewayError> {
    match message {
        ClientMessage::StartSolo => {
            let started = coordinator.request_solo_game(client_id)?;
            Ok(vec![Outbound::new(
                client_id,
                ServerMessage::GameStarted {
                    game_id: started.game_id,
                    mode: started.mode,
                    opponent: None,
                },
            )])
        }
        ClientMessage::StartMultiplayer => match coordinator.request_multiplayer_game(client_id)? {
            Matchmaking::Waiting => Ok(vec![Outbound::new(
                client_id,
                ServerMessage::WaitingForOpponent,
            )]),
            Matchmaking::Matched(started) => Ok(started
                .players
                .iter()
                .map(|player| {
                    Outbound::new(
                        player.clone(),
                        ServerMessage::GameStarted {
                            game_id: started.game_id,
                            mode: started.mode,
                            opponent: started.opponent_of(player).cloned(),
                        },
                    )
                })
                .collect()),
        },
        ClientMessage::Guess { game_id, word } => {
            let game_id: GameId = game_id
                .parse()
                .map_err(|_| GatewayError::InvalidGameId(game_id.clone()))?;
            let routed = coordinator.route_guess(client_id, game_id, &word)?;

            let outcome = routed.outcome;
            let mut outbound = Vec::with_capacity(3);

            if let Some(opponent) = routed.opponent {
                outbound.push(Outbound::new(
                    opponent.clone(),
                    ServerMessage::OpponentGuess {
                        attempts: outcome.attempts,
                        last_word: outcome.word.clone(),
                    },
                ));
                if outcome.won_game
                    && let (Some(winner), Some(word)) = (&outcome.winner, &outcome.target_word)
                {
                    outbound.push(Outbound::new(
                        opponent,
                        ServerMessage::GameOver {
                            winner: winner.clone(),
                            word: word.clone(),
                        },
                    ));
                }
            }

            outbound.insert(0, Outbound::new(client_id, outcome.into()));
            Ok(outbound)
        }
        ClientMessage::Hint { game_id } => {
            let game_id: GameId = game_id
                .parse()
                .map_err(|_| GatewayError::InvalidGameId(game_id.clone()))?;
            let suggestions = coordinator.request_hints(client_id, game_id)?;
            Ok(vec![Outbound::new(
                client_id,
                ServerMessage::Hints {
                    game_id,
                    suggestions,
                },
            )])
        }
    }
}
