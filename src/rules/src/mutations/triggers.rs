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

use std::sync::Arc;

use data::card_states::stack_object::{StackObject, StackObjectKind};
use data::events::triggers::PendingTriggeredAbility;
use data::game_states::game_state::GameState;
use tracing::{debug, instrument};

use crate::queries::player_queries;

/// Drains the triggered-ability queue onto the stack.
///
/// Abilities go onto the stack in APNAP order: the active player's
/// triggers first, then each other player's in turn order. Triggers
/// controlled by the same player default to queue order; the chooser may
/// reorder them. Returns true if any ability was put on the stack.
#[instrument(level = "debug", skip(game))]
pub fn process_triggered_abilities(game: &mut GameState) -> bool {
    if game.triggered_queue.is_empty() {
        return false;
    }
    let pending = std::mem::take(&mut game.triggered_queue);
    debug!(count = pending.len(), "Placing triggered abilities on the stack");

    for player in player_queries::in_apnap_order(game) {
        let batch: Vec<PendingTriggeredAbility> =
            pending.iter().filter(|ability| ability.controller == player).cloned().collect();
        if batch.is_empty() {
            continue;
        }

        let chooser = game.chooser.clone();
        let order = chooser.order_triggers(game, player, &batch);
        let order = if is_permutation(&order, batch.len()) {
            order
        } else {
            game.mark_rules_error("chooser returned an invalid trigger ordering");
            (0..batch.len()).collect()
        };

        for index in order {
            push_onto_stack(game, batch[index].clone());
        }
    }
    true
}

fn is_permutation(order: &[usize], len: usize) -> bool {
    let mut seen = vec![false; len];
    if order.len() != len {
        return false;
    }
    for &index in order {
        if index >= len || seen[index] {
            return false;
        }
        seen[index] = true;
    }
    true
}

fn push_onto_stack(game: &mut GameState, pending: PendingTriggeredAbility) {
    let PendingTriggeredAbility { source, source_object, controller, event, effect, last_known, .. } =
        pending;
    game.zones.push_stack_object(|id| StackObject {
        id,
        kind: StackObjectKind::TriggeredAbility,
        source,
        source_object,
        controller,
        targets: vec![],
        effect: {
            let effect = effect.clone();
            Arc::new(move |game, stack_object| (*effect)(game, &event, stack_object))
        },
        applied_effects: vec![],
        last_known,
    });
}
