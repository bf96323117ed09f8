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

use data::card_states::stack_object::{StackObject, StackObjectKind};
use data::card_states::zones::ZoneQueries;
use data::core::game_error::{GameError, GameResult};
use data::game_states::game_state::GameState;
use primitives::game_primitives::{Source, Zone};
use tracing::{debug, instrument};

use crate::legality::resolution;
use crate::mutations::{move_card, state_based_actions};
use crate::queries::card_queries;

/// Resolves the top object of the stack.
///
/// Legality is re-checked first; an illegal object is countered on
/// resolution (its effect does nothing). Afterwards state-based actions
/// run to a fixed point, queued triggers go onto the stack, and priority
/// returns to the active player.
#[instrument(level = "debug", skip(game))]
pub fn resolve_top_of_stack(game: &mut GameState) -> GameResult<()> {
    let Some(object) = game.zones.pop_stack_object() else {
        return Err(GameError::illegal_state("the stack is empty"));
    };

    if resolution::can_resolve(game, &object) {
        debug!(id = ?object.id, kind = ?object.kind, "Resolving stack object");
        let effect = object.effect.clone();
        (*effect)(game, &object);
        finish_spell(game, &object);
    } else {
        debug!(id = ?object.id, "Stack object countered on resolution");
        counter_on_resolution(game, &object);
    }

    state_based_actions::on_will_receive_priority(game);
    game.priority = game.active_player();
    game.clear_passed();
    Ok(())
}

/// Moves a resolved spell's card out of the stack zone: permanents go to
/// the battlefield, everything else to its owner's graveyard.
///
/// Resolution effects which already moved the card (e.g. exile-self) are
/// left alone.
fn finish_spell(game: &mut GameState, object: &StackObject) {
    if object.kind != StackObjectKind::Spell {
        return;
    }
    let still_on_stack =
        game.card(object.source).map(|card| card.zone == Zone::Stack).unwrap_or(false);
    if !still_on_stack {
        return;
    }
    let is_permanent = card_queries::card_types(game, object.source)
        .map(|types| types.iter().any(|card_type| card_type.is_permanent()))
        .unwrap_or(false);
    let destination = if is_permanent { Zone::Battlefield } else { Zone::Graveyard };
    move_card::run(game, Source::Game, object.source, destination);
}

fn counter_on_resolution(game: &mut GameState, object: &StackObject) {
    if object.kind == StackObjectKind::Spell && game.has_card(object.source) {
        move_card::run(game, Source::Game, object.source, Zone::Graveyard);
    }
}
