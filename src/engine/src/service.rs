// Copyright © duelcore 2025-present
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//   https://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Channel-driven action intake.
//!
//! External input (player actions, network messages) arrives on an
//! inbound channel; resulting state changes and events flow out on the
//! per-game observer channels. The engine itself never blocks on I/O:
//! the service task is the only place that waits.

use std::sync::Arc;

use data::actions::game_action::ClientAction;
use primitives::game_primitives::{GameId, PlayerName};
use tokio::sync::mpsc;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::game_engine::GameEngine;

/// One inbound request for the engine.
#[derive(Debug, Clone)]
pub struct EngineRequest {
    pub game_id: GameId,
    pub player: PlayerName,
    pub action: ClientAction,
}

/// Spawns the intake loop, returning the sender side of the inbound
/// channel and the task handle.
///
/// Rejected actions are logged and dropped; the game remains in its
/// pre-action state, and the submitting session is expected to consult
/// the game view to resynchronize.
pub fn spawn(engine: Arc<GameEngine>) -> (UnboundedSender<EngineRequest>, JoinHandle<()>) {
    let (sender, receiver) = mpsc::unbounded_channel();
    let handle = tokio::spawn(run(engine, receiver));
    (sender, handle)
}

async fn run(engine: Arc<GameEngine>, mut receiver: UnboundedReceiver<EngineRequest>) {
    while let Some(request) = receiver.recv().await {
        let EngineRequest { game_id, player, action } = request;
        debug!(%game_id, ?player, "Processing inbound action");
        if let Err(error) = engine.process_action(game_id, player, action) {
            warn!(%game_id, ?player, code = error.code(), %error, "Rejected action");
        }
    }
}
