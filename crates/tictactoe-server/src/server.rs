//! WebSocket server and connection handling.

use crate::config::ServerConfig;
use crate::protocol::{ClientMessage, ServerMessage};
use crate::table::Table;
use dashmap::DashMap;
use futures_util::{SinkExt, StreamExt};
use std::net::SocketAddr;
use std::sync::Arc;
use tictactoe_core::{GameEvent, MoveSelector};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_tungstenite::{accept_async, tungstenite::Message};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// Server state shared across all connections.
pub struct ServerState {
    pub config: ServerConfig,
    /// One table per connected player, which also owns their outgoing channel
    pub tables: DashMap<Uuid, Table>,
}

impl ServerState {
    pub fn new(config: ServerConfig) -> Self {
        Self {
            config,
            tables: DashMap::new(),
        }
    }

    /// Send a message to a seated player.
    pub fn send_to_player(&self, player_id: Uuid, msg: ServerMessage) {
        if let Some(mut table) = self.tables.get_mut(&player_id) {
            table.send(msg);
        }
    }

    /// Greet a player and seat them at a fresh table.
    pub fn open_table(&self, player_id: Uuid, tx: mpsc::UnboundedSender<ServerMessage>) {
        // Queued ahead of the table's first state push
        let _ = tx.send(ServerMessage::Welcome { player_id });
        let table = Table::new(
            player_id,
            tx,
            self.config.default_difficulty,
            MoveSelector::new(),
        );
        self.tables.insert(player_id, table);
    }

    pub fn close_table(&self, player_id: Uuid) {
        self.tables.remove(&player_id);
    }
}

/// Run the WebSocket server.
pub async fn run_server(addr: SocketAddr, state: Arc<ServerState>) -> anyhow::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    info!("Tic-tac-toe server listening on {}", addr);

    while let Ok((stream, peer_addr)) = listener.accept().await {
        let state = Arc::clone(&state);
        tokio::spawn(async move {
            if let Err(e) = handle_connection(stream, peer_addr, state).await {
                error!("Connection error from {}: {}", peer_addr, e);
            }
        });
    }

    Ok(())
}

/// Handle a single WebSocket connection.
async fn handle_connection(
    stream: TcpStream,
    addr: SocketAddr,
    state: Arc<ServerState>,
) -> anyhow::Result<()> {
    let ws_stream = accept_async(stream).await?;
    info!("New WebSocket connection from {}", addr);

    let (mut ws_sender, mut ws_receiver) = ws_stream.split();

    let player_id = Uuid::new_v4();
    let (tx, mut rx) = mpsc::unbounded_channel::<ServerMessage>();
    state.open_table(player_id, tx);

    // Everything the table emits goes out through this task
    let send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if let Ok(text) = serde_json::to_string(&msg) {
                if ws_sender.send(Message::Text(text.into())).await.is_err() {
                    break;
                }
            }
        }
    });

    // Handle incoming messages
    while let Some(msg) = ws_receiver.next().await {
        match msg {
            Ok(Message::Text(text)) => match serde_json::from_str::<ClientMessage>(&text) {
                Ok(client_msg) => handle_message(player_id, client_msg, &state),
                Err(e) => {
                    warn!("Invalid message from {}: {}", player_id, text);
                    state.send_to_player(
                        player_id,
                        ServerMessage::Error {
                            message: format!("Invalid message: {}", e),
                        },
                    );
                }
            },
            Ok(Message::Close(_)) => {
                info!("Client {} closing connection", player_id);
                break;
            }
            Err(e) => {
                error!("WebSocket error from {}: {}", player_id, e);
                break;
            }
            _ => {}
        }
    }

    state.close_table(player_id);
    send_task.abort();

    info!("Table closed for {}", player_id);
    Ok(())
}

/// Handle a client message.
pub fn handle_message(player_id: Uuid, msg: ClientMessage, state: &Arc<ServerState>) {
    match msg {
        ClientMessage::CellActivated { index } => {
            let pending = {
                let Some(mut table) = state.tables.get_mut(&player_id) else {
                    return;
                };
                let events = table.cell_activated(index);
                if events.is_empty() {
                    return;
                }
                debug!("Player {} took cell {}", player_id, index);
                if events.iter().any(GameEvent::is_terminal) {
                    log_game_over(&table);
                }
                // Only the move that handed over the turn starts the pause
                table.awaiting_opponent().then(|| table.generation())
            };

            if let Some(generation) = pending {
                schedule_opponent_move(Arc::clone(state), player_id, generation);
            }
        }

        ClientMessage::SetDifficulty { difficulty } => {
            if let Some(mut table) = state.tables.get_mut(&player_id) {
                info!("Player {} switched to {}", player_id, difficulty);
                table.set_difficulty(difficulty);
            }
        }

        ClientMessage::Reset => {
            if let Some(mut table) = state.tables.get_mut(&player_id) {
                debug!("Player {} started a new game", player_id);
                table.reset();
            }
        }

        ClientMessage::Ping => {
            state.send_to_player(player_id, ServerMessage::Pong);
        }
    }
}

/// Play the opponent's reply after the configured pause.
///
/// The move is dropped if the player left or started another game while
/// the opponent was thinking.
pub fn schedule_opponent_move(
    state: Arc<ServerState>,
    player_id: Uuid,
    generation: u64,
) -> JoinHandle<()> {
    let delay = state.config.bot_delay;
    tokio::spawn(async move {
        tokio::time::sleep(delay).await;

        let Some(mut table) = state.tables.get_mut(&player_id) else {
            return;
        };
        if table.generation() != generation {
            debug!("Dropping stale opponent move for {}", player_id);
            return;
        }
        match table.play_opponent_turn() {
            Some(index) => {
                debug!("Opponent took cell {} against {}", index, player_id);
                if table.session().is_finished() {
                    log_game_over(&table);
                }
            }
            None => debug!("Opponent had no move against {}", player_id),
        }
    })
}

fn log_game_over(table: &Table) {
    let score = table.score();
    info!(
        "Game over for {}: {:?} ({}-{})",
        table.player_id,
        table.session().status(),
        score.player_wins,
        score.opponent_wins
    );
}
