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

use data::card_states::card_state::{CardFacing, CardKind, TappedState};
use data::card_states::zones::ZoneQueries;
use data::events::game_event::{EventKind, GameEvent};
use data::game_states::game_state::GameState;
use primitives::game_primitives::{CardId, Source, Zone};
use tracing::debug;
use utils::outcome;
use utils::outcome::Outcome;

use crate::combat::cleanup;
use crate::dispatcher::dispatch;
use crate::queries::card_queries;

/// Moves a card to a new zone, updates indices, assigns a new object ID,
/// and fires all relevant events.
///
/// Before a permanent leaves the battlefield its effective
/// characteristics are snapshotted so dies-triggers can match and
/// resolve against them, and it is removed from any live combat.
pub fn run(game: &mut GameState, source: Source, id: CardId, zone: Zone) -> Outcome {
    let old_zone = game.card(id)?.zone;
    debug!(?id, ?old_zone, ?zone, "Moving card to zone");

    if old_zone == Zone::Battlefield {
        if let Some(snapshot) = card_queries::snapshot(game, id) {
            game.last_known.insert(id, snapshot);
        }
        cleanup::remove_from_combat(game, id);
    }

    on_leave_zone(game, id, old_zone);
    let turn = game.turn;
    game.zones.move_card(id, zone, turn)?;
    on_enter_zone(game, id, zone);

    dispatch::publish(
        game,
        GameEvent::new(EventKind::ZoneChange)
            .with_source(source.card_id().unwrap_or(id))
            .with_target(id)
            .with_metadata("from", zone_name(old_zone))
            .with_metadata("to", zone_name(zone)),
    );

    // A token ceases to exist in any zone other than the battlefield.
    if game.card(id)?.kind == CardKind::Token && zone != Zone::Battlefield {
        game.zones.destroy_card(id)?;
    }
    outcome::OK
}

fn on_leave_zone(game: &mut GameState, card_id: CardId, zone: Zone) {
    if zone == Zone::Battlefield {
        if let Some(card) = game.card_mut(card_id) {
            card.tapped_state = TappedState::Untapped;
            card.damage = 0;
            card.damage_sources.clear();
            card.deathtouched = false;
            card.attached_to = None;
            card.attacking = None;
            card.blocking.clear();
        }
    }
}

fn on_enter_zone(game: &mut GameState, card_id: CardId, zone: Zone) {
    if let Some(card) = game.card_mut(card_id) {
        match zone {
            Zone::Stack | Zone::Battlefield | Zone::Graveyard | Zone::Exiled => {
                card.facing = CardFacing::FaceUp;
            }
            Zone::Hand | Zone::Library => {
                card.facing = CardFacing::FaceDown;
            }
            Zone::Command => {}
        }
    }
}

fn zone_name(zone: Zone) -> &'static str {
    match zone {
        Zone::Library => "library",
        Zone::Hand => "hand",
        Zone::Stack => "stack",
        Zone::Battlefield => "battlefield",
        Zone::Graveyard => "graveyard",
        Zone::Exiled => "exile",
        Zone::Command => "command",
    }
}
