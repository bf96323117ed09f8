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

//! State-based actions.
//!
//! These run whenever a player would receive priority and after each
//! resolution from the stack, iterating to a fixed point: any zone
//! change they cause publishes events which may queue further triggers
//! or create new illegal configurations.

use data::card_states::zones::ZoneQueries;
use data::core::card_types::CardType;
use data::game_states::game_state::{GameState, GameStatus, GameUpdate};
use data::player_states::player_state::PlayerQueries;
use enumset::EnumSet;
use primitives::game_primitives::{CardId, PlayerName, Source, Zone};
use tracing::{debug, instrument};

use crate::mutations::{move_card, triggers};
use crate::queries::card_queries;

/// Checks for state-based actions to perform in the provided game state,
/// repeating until a check performs none.
#[instrument(name = "state_based_actions_run", level = "debug", skip(game))]
pub fn run(game: &mut GameState) -> bool {
    let cap = game.configuration.maximum_state_based_iterations;
    let mut anything_happened = false;
    let mut iterations = 0;
    loop {
        iterations += 1;
        if iterations > cap {
            game.mark_rules_error(format!(
                "state-based actions did not reach a fixed point in {cap} iterations"
            ));
            break;
        }
        if !check_once(game) {
            break;
        }
        anything_happened = true;
    }
    update_game_over(game);
    anything_happened
}

/// Runs state-based actions and drains the triggered-ability queue, as
/// happens whenever a player would receive priority. Returns true if
/// anything happened.
pub fn on_will_receive_priority(game: &mut GameState) -> bool {
    let mut anything_happened = false;
    loop {
        let mut changed = run(game);
        if triggers::process_triggered_abilities(game) {
            changed = true;
        }
        anything_happened |= changed;
        if !changed {
            break;
        }
    }
    anything_happened
}

/// Performs a single pass over all state-based actions. Returns true if
/// any action was performed.
fn check_once(game: &mut GameState) -> bool {
    let mut changed = false;

    for name in game.configuration.all_players {
        let player = game.player(name);
        if !player.is_in_game() {
            continue;
        }
        let loses =
            player.life <= 0 || player.poison >= 10 || player.drew_from_empty_library;
        if loses {
            debug!(?name, "Player loses the game");
            game.player_mut(name).has_lost = true;
            changed = true;
        }
    }

    let battlefield: Vec<CardId> = game
        .zones
        .all_cards()
        .filter(|card| card.zone == Zone::Battlefield)
        .map(|card| card.id)
        .collect();

    for id in battlefield {
        let Some(types) = card_queries::card_types(game, id) else {
            continue;
        };

        if types.contains(CardType::Creature) {
            let toughness = card_queries::toughness(game, id).unwrap_or(0);
            let damage = game.card(id).map(|card| card.damage).unwrap_or(0);
            let deathtouched = game.card(id).map(|card| card.deathtouched).unwrap_or(false);
            let destroyed = toughness <= 0
                || damage >= toughness.max(0) as u64
                || (deathtouched && damage > 0);
            if destroyed {
                debug!(?id, "Creature dies to state-based action");
                move_card::run(game, Source::Game, id, Zone::Graveyard);
                changed = true;
                continue;
            }
        }

        if types.contains(CardType::Planeswalker) && card_queries::loyalty(game, id) == 0 {
            debug!(?id, "Planeswalker with no loyalty moves to graveyard");
            move_card::run(game, Source::Game, id, Zone::Graveyard);
            changed = true;
            continue;
        }

        // An Aura attached to an illegal or missing object is put into
        // its owner's graveyard.
        if types.contains(CardType::Enchantment) {
            let attached = game.card(id).and_then(|card| card.attached_to);
            if let Some(target) = attached {
                let legal = game
                    .card(target)
                    .map(|card| card.zone == Zone::Battlefield)
                    .unwrap_or(false);
                if !legal {
                    debug!(?id, "Aura attached to illegal object moves to graveyard");
                    move_card::run(game, Source::Game, id, Zone::Graveyard);
                    changed = true;
                }
            }
        }
    }

    changed
}

/// Ends the game once at most one player remains.
fn update_game_over(game: &mut GameState) {
    if matches!(game.status, GameStatus::GameOver { .. }) {
        return;
    }
    let remaining = game.players_in_game();
    if remaining.len() <= 1 && game.status == GameStatus::Playing {
        let winners: EnumSet<PlayerName> = remaining.into_iter().collect();
        game.status = GameStatus::GameOver { winners };
        game.send_update(GameUpdate::Status(game.status.clone()));
    }
}
