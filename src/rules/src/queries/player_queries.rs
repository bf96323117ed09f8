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

use data::game_states::game_state::GameState;
use data::player_states::player_state::PlayerQueries;
use primitives::game_primitives::PlayerName;

/// Players participating in the game who have not lost or left, in turn
/// order.
pub fn players_in_game(game: &GameState) -> Vec<PlayerName> {
    game.players_in_game()
}

/// Players in turn order starting with the active player. This is APNAP
/// order: the active player makes choices first, then each other player
/// in turn order.
pub fn in_apnap_order(game: &GameState) -> Vec<PlayerName> {
    let players = players_in_game(game);
    let Some(start) = players.iter().position(|&name| name == game.active_player()) else {
        return players;
    };
    players[start..].iter().chain(players[..start].iter()).copied().collect()
}

/// The next player in turn order after the given player, skipping
/// players who have lost or left the game.
pub fn next_player_after(game: &GameState, player: PlayerName) -> PlayerName {
    let players = players_in_game(game);
    if players.is_empty() {
        return player;
    }
    match players.iter().position(|&name| name == player) {
        Some(index) => players[(index + 1) % players.len()],
        // The player has already lost; resume from the nearest survivor.
        None => players[0],
    }
}

/// Opponents of the given player who are still in the game.
pub fn opponents(game: &GameState, player: PlayerName) -> Vec<PlayerName> {
    players_in_game(game).into_iter().filter(|&name| name != player).collect()
}

/// True if the player is still in the game.
pub fn is_in_game(game: &GameState, player: PlayerName) -> bool {
    game.player(player).is_in_game()
}
