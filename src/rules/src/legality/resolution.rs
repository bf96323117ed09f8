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

//! Resolution-time legality checks.
//!
//! A stack object is validated again at the moment it resolves: the
//! world may have changed since it was put on the stack. Objects which
//! fail these checks are countered on resolution: their effect does
//! nothing and they leave the stack.

use data::card_states::stack_object::{StackObject, StackObjectKind};
use data::card_states::zones::ZoneQueries;
use data::game_states::game_state::GameState;
use data::player_states::player_state::PlayerQueries;
use primitives::game_primitives::{EntityId, Zone};

/// True if the stack object may legally resolve.
///
/// The controller must still be in the game; a spell's source card must
/// still be on the stack; an activated ability's source must still
/// exist. Triggered abilities may resolve without their source. Every
/// chosen target must still be the same object incarnation it was at
/// selection time.
pub fn can_resolve(game: &GameState, object: &StackObject) -> bool {
    if !game.player(object.controller).is_in_game() {
        return false;
    }

    match object.kind {
        StackObjectKind::Spell => {
            let valid_source = game
                .card(object.source)
                .map(|card| card.zone == Zone::Stack && card.object_id == object.source_object)
                .unwrap_or(false);
            if !valid_source {
                return false;
            }
        }
        StackObjectKind::ActivatedAbility => {
            if !game.has_card(object.source) {
                return false;
            }
        }
        StackObjectKind::TriggeredAbility => {}
    }

    object.targets.iter().all(|target| target_is_valid(game, target))
}

/// True if a chosen target still exists as the same object it was when
/// selected.
///
/// Zone changes assign a new object ID, so an ID mismatch means the
/// target left its expected zone.
pub fn target_is_valid(game: &GameState, target: &EntityId) -> bool {
    match target {
        EntityId::Card(card_id, object_id) => game
            .card(*card_id)
            .map(|card| card.object_id == *object_id)
            .unwrap_or(false),
        EntityId::Player(player) => game.player(*player).is_in_game(),
    }
}
