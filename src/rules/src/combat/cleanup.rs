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

//! Combat teardown and removal during combat.

use data::card_states::zones::ZoneQueries;
use data::events::game_event::{EventKind, GameEvent};
use data::game_states::game_state::GameState;
use primitives::game_primitives::{CardId, Zone};
use tracing::{debug, instrument};

use crate::dispatcher::dispatch;

/// Removes a creature from combat without untapping it.
///
/// Used when a creature leaves the battlefield mid-combat or is removed
/// by an effect. Groups emptied of blockers become unblocked; groups
/// whose last attacker is removed are discarded. Publishes
/// REMOVED_FROM_COMBAT if the creature was participating. Contrast with
/// `declare::remove_attacker`, which also untaps and only applies while
/// attackers are still being declared.
pub fn remove_from_combat(game: &mut GameState, card_id: CardId) {
    let Some(combat) = game.combat.as_mut() else {
        return;
    };
    let was_participating = combat.remove_card(card_id);

    if let Some(card) = game.card_mut(card_id) {
        card.attacking = None;
        card.blocking.clear();
    }
    // Other creatures may reference the removed card as a block target.
    let blockers: Vec<CardId> = game
        .zones
        .all_cards()
        .filter(|card| card.blocking.contains(&card_id))
        .map(|card| card.id)
        .collect();
    for blocker in blockers {
        if let Some(card) = game.card_mut(blocker) {
            card.blocking.retain(|&id| id != card_id);
        }
    }

    if was_participating {
        debug!(?card_id, "Removed from combat");
        dispatch::publish(game, GameEvent::new(EventKind::RemovedFromCombat).with_target(card_id));
    }
}

/// Ends the combat phase.
///
/// Combat groups are preserved for attacked-this-turn queries until the
/// end-of-turn cleanup; combat flags, marked damage, and damage
/// attribution are cleared from all participants. Publishes
/// END_COMBAT_STEP.
#[instrument(level = "debug", skip(game))]
pub fn end_combat(game: &mut GameState) {
    let Some(combat) = game.combat.take() else {
        return;
    };
    game.former_groups.extend(combat.groups);

    let cards: Vec<CardId> = game
        .zones
        .all_cards()
        .filter(|card| card.zone == Zone::Battlefield)
        .map(|card| card.id)
        .collect();
    for id in cards {
        if let Some(card) = game.card_mut(id) {
            card.clear_combat_state();
        }
    }

    dispatch::publish(game, GameEvent::new(EventKind::EndCombatStep));
}

/// True if the card attacked at any point this turn, in the current
/// combat or an earlier one.
pub fn attacked_this_turn(game: &GameState, card_id: CardId) -> bool {
    let in_former =
        game.former_groups.iter().any(|group| group.attackers.contains(&card_id));
    let in_current = game
        .combat
        .as_ref()
        .map(|combat| combat.groups.iter().any(|group| group.attackers.contains(&card_id)))
        .unwrap_or(false);
    in_former || in_current
}
