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

use data::card_states::card_state::TappedState;
use data::card_states::counters::CounterKind;
use data::card_states::zones::ZoneQueries;
use data::core::numerics::Damage;
use data::game_states::game_state::GameState;
use primitives::game_primitives::{CardId, Source};
use tracing::debug;
use utils::outcome;
use utils::outcome::Outcome;

/// Taps a permanent.
pub fn tap(game: &mut GameState, _source: Source, id: CardId) -> Outcome {
    let card = game.card_mut(id)?;
    card.tapped_state = TappedState::Tapped;
    outcome::OK
}

/// Untaps a permanent.
pub fn untap(game: &mut GameState, _source: Source, id: CardId) -> Outcome {
    let card = game.card_mut(id)?;
    card.tapped_state = TappedState::Untapped;
    outcome::OK
}

/// Marks damage on a creature, recording the dealing card in the damage
/// attribution map.
///
/// State-based actions decide later whether the marked damage is lethal;
/// this mutation never moves the card.
pub fn mark_damage(
    game: &mut GameState,
    source: CardId,
    id: CardId,
    amount: Damage,
    deathtouch: bool,
) -> Outcome {
    if amount == 0 {
        return outcome::OK;
    }
    debug!(?id, amount, "Marking damage on permanent");
    let card = game.card_mut(id)?;
    card.damage += amount;
    *card.damage_sources.entry(source).or_default() += amount;
    if deathtouch {
        card.deathtouched = true;
    }
    outcome::OK
}

/// Removes loyalty counters from a planeswalker which has been dealt
/// damage.
pub fn remove_loyalty(game: &mut GameState, _source: Source, id: CardId, amount: Damage) -> Outcome {
    let card = game.card_mut(id)?;
    card.counters.remove(CounterKind::Loyalty, amount);
    outcome::OK
}
