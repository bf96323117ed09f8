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

use data::card_states::zones::ZoneQueries;
use data::core::game_error::{GameError, GameResult};
use data::game_states::game_state::GameState;
use primitives::game_primitives::PlayerName;
use tracing::{debug, instrument};

use crate::queries::player_queries;
use crate::stack::resolve;
use crate::steps::step;

/// Passes priority for the named player.
///
/// When every player still in the game has passed, the top of the stack
/// resolves, or the current step ends if the stack is empty. Players who
/// have lost or left never hold priority and are skipped.
#[instrument(level = "debug", skip(game))]
pub fn pass(game: &mut GameState, player: PlayerName) -> GameResult<()> {
    if game.priority != player {
        return Err(GameError::illegal_state(format!(
            "{player} does not have priority"
        )));
    }
    debug!(?player, step = ?game.step, "Passing priority");
    game.passed.insert(player);

    let all_passed =
        player_queries::players_in_game(game).iter().all(|&name| game.passed.contains(name));
    if all_passed {
        game.clear_passed();
        if game.stack().is_empty() {
            step::advance(game);
        } else {
            resolve::resolve_top_of_stack(game)?;
        }
    } else {
        game.priority = player_queries::next_player_after(game, player);
    }
    Ok(())
}
