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

//! Effective-characteristic queries.
//!
//! All game logic reads card characteristics through this module, never
//! from the printed card directly. Queries start from the printed
//! baseline and apply continuous effects in layer order, so an ability
//! granted by an effect behaves identically to a printed one.

use data::card_states::card_state::TappedState;
use data::card_states::counters::CounterKind;
use data::card_states::last_known_info::LastKnownInfo;
use data::card_states::zones::ZoneQueries;
use data::core::ability::Ability;
use data::core::card_types::CardType;
use data::core::numerics::{Damage, Loyalty, Power, Toughness};
use data::game_states::game_state::GameState;
use enumset::EnumSet;
use primitives::game_primitives::{CardId, PlayerName, Zone};

/// The effective card types of a card.
pub fn card_types(game: &GameState, id: CardId) -> Option<EnumSet<CardType>> {
    let card = game.card(id)?;
    Some(card.properties.card_types.query(game, card.printed.card_types))
}

/// True if the card is a creature by its effective types.
pub fn is_creature(game: &GameState, id: CardId) -> bool {
    card_types(game, id).map(|types| types.contains(CardType::Creature)).unwrap_or(false)
}

/// True if the card is a planeswalker by its effective types.
pub fn is_planeswalker(game: &GameState, id: CardId) -> bool {
    card_types(game, id).map(|types| types.contains(CardType::Planeswalker)).unwrap_or(false)
}

/// The effective ability set of a card.
pub fn abilities(game: &GameState, id: CardId) -> Option<EnumSet<Ability>> {
    let card = game.card(id)?;
    Some(card.properties.abilities.query(game, card.printed.abilities))
}

/// True if the card's effective abilities include the given ability.
pub fn has_ability(game: &GameState, id: CardId, ability: Ability) -> bool {
    abilities(game, id).map(|abilities| abilities.contains(ability)).unwrap_or(false)
}

/// The effective controller of a card.
pub fn controller(game: &GameState, id: CardId) -> Option<PlayerName> {
    let card = game.card(id)?;
    Some(card.properties.controller.query(game, card.controller))
}

/// The effective power and toughness of a card, applying the setting,
/// modifying, counter, and switching sublayers in order.
pub fn power_toughness(game: &GameState, id: CardId) -> Option<(Power, Toughness)> {
    let card = game.card(id)?;
    let base_power = card.printed.power.map(|value| value.base_value()).unwrap_or(0);
    let base_toughness = card.printed.toughness.map(|value| value.base_value()).unwrap_or(0);
    let mut power = card.properties.power.query(game, base_power);
    let mut toughness = card.properties.toughness.query(game, base_toughness);

    let plus = card.counters.count(CounterKind::PlusOnePlusOne) as i64;
    let minus = card.counters.count(CounterKind::MinusOneMinusOne) as i64;
    power += plus - minus;
    toughness += plus - minus;

    if card.properties.pt_switched.query(game, false) {
        std::mem::swap(&mut power, &mut toughness);
    }
    Some((power, toughness))
}

/// The effective power of a card.
pub fn power(game: &GameState, id: CardId) -> Option<Power> {
    power_toughness(game, id).map(|(power, _)| power)
}

/// The effective toughness of a card.
pub fn toughness(game: &GameState, id: CardId) -> Option<Toughness> {
    power_toughness(game, id).map(|(_, toughness)| toughness)
}

/// Current loyalty of a planeswalker.
pub fn loyalty(game: &GameState, id: CardId) -> Loyalty {
    game.card(id).map(|card| card.counters.count(CounterKind::Loyalty)).unwrap_or(0)
}

/// True if this creature is affected by summoning sickness: it came under
/// its controller's control this turn and has not been granted haste.
pub fn summoning_sick(game: &GameState, id: CardId) -> bool {
    let Some(card) = game.card(id) else {
        return false;
    };
    let new_this_turn =
        card.entered_current_zone == game.turn || card.last_changed_control == game.turn;
    new_this_turn && !has_ability(game, id, Ability::Haste)
}

/// The damage required to destroy this creature right now: effective
/// toughness minus damage already marked. Damage from a deathtouch
/// source is always lethal at 1.
pub fn lethal_damage(game: &GameState, id: CardId, deathtouch: bool) -> Damage {
    if deathtouch {
        return 1;
    }
    let toughness = toughness(game, id).unwrap_or(0);
    let marked = game.card(id).map(|card| card.damage).unwrap_or(0);
    (toughness.max(0) as Damage).saturating_sub(marked)
}

/// Captures the effective characteristics of a permanent, for use after
/// it has left the battlefield.
pub fn snapshot(game: &GameState, id: CardId) -> Option<LastKnownInfo> {
    let card = game.card(id)?;
    let (power, toughness) = power_toughness(game, id)?;
    Some(LastKnownInfo {
        card_id: id,
        object_id: card.object_id,
        name: card.printed.name.clone(),
        controller: controller(game, id)?,
        owner: card.owner,
        card_types: card_types(game, id)?,
        abilities: abilities(game, id)?,
        power,
        toughness,
        damage: card.damage,
        was_attacking: card.is_attacking(),
        was_blocking: card.is_blocking(),
    })
}

/// IDs of battlefield permanents whose *effective* controller is the
/// given player.
///
/// The zone index is keyed by baseline controller; control-changing
/// continuous effects are only visible through this query.
pub fn battlefield_controlled_by(game: &GameState, player: PlayerName) -> Vec<CardId> {
    game.zones
        .all_cards()
        .filter(|card| card.zone == Zone::Battlefield)
        .map(|card| card.id)
        .filter(|&id| controller(game, id) == Some(player))
        .collect()
}

/// True if the card is untapped.
pub fn is_untapped(game: &GameState, id: CardId) -> bool {
    game.card(id).map(|card| card.tapped_state == TappedState::Untapped).unwrap_or(false)
}
