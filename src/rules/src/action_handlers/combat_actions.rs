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

use data::actions::game_action::CombatAction;
use data::core::game_error::{GameError, GameResult};
use data::game_states::game_state::GameState;
use primitives::game_primitives::PlayerName;
use tracing::instrument;

use crate::combat::{blocks, damage, declare};
use crate::queries::card_queries;

/// Executes a combat decision submitted by a player.
///
/// Validation happens before any mutation: an action which fails leaves
/// the game unchanged.
#[instrument(name = "combat_actions_execute", level = "debug", skip(game))]
pub fn execute(game: &mut GameState, player: PlayerName, action: CombatAction) -> GameResult<()> {
    match action {
        CombatAction::DeclareAttacker { attacker, target } => {
            declare::declare_attacker(game, attacker, target, player)
        }
        CombatAction::RemoveAttacker { attacker } => {
            require_attacking_player(game, player)?;
            declare::remove_attacker(game, attacker)
        }
        CombatAction::ConfirmAttackers => {
            require_attacking_player(game, player)?;
            declare::confirm_attackers(game)
        }
        CombatAction::DeclareBlocker { blocker, attacker } => {
            blocks::declare_blocker(game, blocker, attacker, player)
        }
        CombatAction::RemoveBlocker { blocker } => {
            require_controller(game, player, blocker)?;
            blocks::remove_blocker(game, blocker)
        }
        CombatAction::ConfirmBlockers => {
            // Unmet must-block requirements are surfaced to the player
            // rather than silently dropped.
            let violations = blocks::check_block_requirements(game, player);
            if let Some(violation) = violations.first() {
                return Err(GameError::restriction(format!(
                    "creature {:?} must block attacker {:?}",
                    violation.blocker, violation.attacker
                )));
            }
            blocks::accept_blockers(game)
        }
        CombatAction::OrderBlockers { attacker, blockers } => {
            require_attacking_player(game, player)?;
            blocks::order_blockers(game, attacker, &blockers)
        }
        CombatAction::AssignAttackerDamage { attacker, assignments } => {
            damage::assign_attacker_damage(game, attacker, player, &assignments)
        }
        CombatAction::AssignBlockerDamage { blocker, assignments } => {
            damage::assign_blocker_damage(game, blocker, player, &assignments)
        }
    }
}

fn require_attacking_player(game: &GameState, player: PlayerName) -> GameResult<()> {
    let attacking = game.combat.as_ref().map(|combat| combat.attacking_player);
    if attacking != Some(player) {
        return Err(GameError::restriction("only the attacking player may take this action"));
    }
    Ok(())
}

fn require_controller(
    game: &GameState,
    player: PlayerName,
    card_id: primitives::game_primitives::CardId,
) -> GameResult<()> {
    if card_queries::controller(game, card_id) != Some(player) {
        return Err(GameError::restriction("player does not control this creature"));
    }
    Ok(())
}
