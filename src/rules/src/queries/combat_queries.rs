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

use data::game_states::combat_state::{AttackTarget, AttackerId, BlockerId};
use data::game_states::game_state::GameState;
use primitives::game_primitives::PlayerName;
use utils::bools;

use crate::combat::{blocks, declare};
use crate::queries::card_queries;

/// Creatures the given player could legally declare as attackers right
/// now.
pub fn legal_attackers(game: &GameState, player: PlayerName) -> Vec<AttackerId> {
    card_queries::battlefield_controlled_by(game, player)
        .into_iter()
        .filter(|&id| bools::is_true(|| declare::can_attack(game, id).ok()))
        .collect()
}

/// Blockers the given player could legally declare against the given
/// attacker right now.
pub fn legal_blockers(game: &GameState, player: PlayerName, attacker: AttackerId) -> Vec<BlockerId> {
    card_queries::battlefield_controlled_by(game, player)
        .into_iter()
        .filter(|&id| bools::is_true(|| blocks::can_block(game, id, attacker).ok()))
        .collect()
}

/// Legal targets the active player could attack during this combat.
pub fn attack_targets(game: &GameState) -> Vec<AttackTarget> {
    game.combat
        .as_ref()
        .map(|combat| combat.defenders.iter().copied().collect())
        .unwrap_or_default()
}

/// The players currently being attacked.
pub fn defending_players(game: &GameState) -> Vec<PlayerName> {
    let mut players: Vec<PlayerName> = game
        .combat
        .as_ref()
        .map(|combat| combat.defenders.iter().map(|target| target.defending_player()).collect())
        .unwrap_or_default();
    players.dedup();
    players
}
