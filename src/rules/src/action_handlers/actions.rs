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

use data::actions::game_action::GameAction;
use data::core::game_error::{GameError, GameResult};
use data::game_states::game_state::{GameState, GameStatus};
use data::player_states::player_state::PlayerQueries;
use primitives::game_primitives::PlayerName;
use tracing::instrument;

use crate::action_handlers::combat_actions;
use crate::mutations::{priority, state_based_actions};

/// Executes a game action submitted by a player.
///
/// The game must be in progress; actions against paused or finished
/// games are rejected without mutation. After a successful action,
/// state-based actions run to a fixed point and pending triggers go
/// onto the stack, as happens whenever a player would receive priority.
#[instrument(name = "actions_execute", level = "debug", skip(game))]
pub fn execute(game: &mut GameState, player: PlayerName, action: GameAction) -> GameResult<()> {
    match game.status {
        GameStatus::Playing => {}
        GameStatus::Paused => {
            return Err(GameError::illegal_state("game is paused"));
        }
        GameStatus::GameOver { .. } => return Err(GameError::GameEnded),
        GameStatus::Setup => {
            return Err(GameError::illegal_state("game has not started"));
        }
    }
    if !game.player(player).is_in_game() {
        return Err(GameError::illegal_state("player is no longer in the game"));
    }

    match action {
        GameAction::PassPriority => priority::pass(game, player)?,
        GameAction::Concede => {
            game.player_mut(player).has_left = true;
        }
        GameAction::Combat(combat_action) => {
            combat_actions::execute(game, player, combat_action)?;
        }
    }

    state_based_actions::on_will_receive_priority(game);
    Ok(())
}
