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

//! The game state machine.
//!
//! Advances through the steps of a turn, performing each step's
//! turn-based actions. Combat sub-steps delegate to the combat engine.

use data::card_states::zones::ZoneQueries;
use data::game_states::game_phase_step::GamePhaseStep;
use data::game_states::game_state::GameState;
use data::player_states::player_state::PlayerQueries;
use primitives::game_primitives::{CardId, Source, Zone};
use tracing::{debug, instrument};

use crate::combat::{blocks, cleanup, damage, declare};
use crate::mutations::{permanents, state_based_actions};
use crate::queries::player_queries;

/// Advances the game state to the next step.
///
/// Performs the turn-based actions which occur at the start of the new
/// step. Increments the turn number and active player when
/// transitioning to the untap step.
#[instrument(level = "debug", skip(game))]
pub fn advance(game: &mut GameState) {
    let step = enum_iterator::next(&game.step).unwrap_or(GamePhaseStep::Untap);
    debug!(?step, "Advancing to step");
    match step {
        GamePhaseStep::Untap => untap(game),
        GamePhaseStep::Upkeep => upkeep(game),
        GamePhaseStep::Draw => draw(game),
        GamePhaseStep::PreCombatMain => begin_step(game, GamePhaseStep::PreCombatMain),
        GamePhaseStep::BeginCombat => begin_combat(game),
        GamePhaseStep::DeclareAttackers => begin_step(game, GamePhaseStep::DeclareAttackers),
        GamePhaseStep::DeclareBlockers => begin_step(game, GamePhaseStep::DeclareBlockers),
        GamePhaseStep::FirstStrikeDamage => first_strike_damage(game),
        GamePhaseStep::CombatDamage => combat_damage(game),
        GamePhaseStep::EndCombat => end_combat(game),
        GamePhaseStep::PostCombatMain => begin_step(game, GamePhaseStep::PostCombatMain),
        GamePhaseStep::EndStep => begin_step(game, GamePhaseStep::EndStep),
        GamePhaseStep::Cleanup => cleanup_step(game),
    }
}

fn begin_step(game: &mut GameState, step: GamePhaseStep) {
    game.step = step;
    game.priority = game.active_player();
    game.clear_passed();
    state_based_actions::on_will_receive_priority(game);
}

fn untap(game: &mut GameState) {
    let next = player_queries::next_player_after(game, game.active_player());
    let players = player_queries::players_in_game(game);
    if players.first() == Some(&next) {
        game.turn.turn_number += 1;
    }
    game.turn.active_player = next;
    game.step = GamePhaseStep::Untap;
    game.priority = next;
    game.clear_passed();

    // The active player untaps their permanents simultaneously. This
    // turn-based action doesn't use the stack.
    let to_untap: Vec<CardId> = game.battlefield(next).iter().copied().collect();
    for card_id in to_untap {
        permanents::untap(game, Source::Game, card_id);
    }

    // No player receives priority during the untap step.
    advance(game)
}

fn upkeep(game: &mut GameState) {
    begin_step(game, GamePhaseStep::Upkeep);
}

fn draw(game: &mut GameState) {
    begin_step(game, GamePhaseStep::Draw);

    // The active player draws a card. Drawing from an empty library is a
    // loss condition applied by state-based actions.
    let active = game.active_player();
    match game.library(active).back().copied() {
        Some(card_id) => {
            crate::mutations::move_card::run(game, Source::Game, card_id, Zone::Hand);
        }
        None => {
            game.player_mut(active).drew_from_empty_library = true;
        }
    }
    state_based_actions::on_will_receive_priority(game);
}

fn begin_combat(game: &mut GameState) {
    declare::reset_combat(game);
    let active = game.active_player();
    // Infallible here: reset_combat just installed a combat struct.
    let _ = declare::set_attacker(game, active);
    let _ = declare::set_defenders(game);
    begin_step(game, GamePhaseStep::BeginCombat);
}

fn first_strike_damage(game: &mut GameState) {
    game.step = GamePhaseStep::FirstStrikeDamage;
    game.priority = game.active_player();
    game.clear_passed();
    accept_pending_blocks(game);

    // This step exists only when a combatant has first or double strike.
    if damage::has_first_or_double_strike(game) {
        let _ = damage::assign_combat_damage(game, true);
        let _ = damage::apply_combat_damage(game);
    }
    state_based_actions::on_will_receive_priority(game);
}

/// Steps reached without an explicit blocker confirmation treat the
/// declared blocks as final.
fn accept_pending_blocks(game: &mut GameState) {
    use data::game_states::combat_state::CombatPhase;
    let phase = game.combat.as_ref().map(|combat| combat.phase);
    match phase {
        Some(CombatPhase::DeclaringAttackers) => {
            let _ = declare::confirm_attackers(game);
            let _ = blocks::accept_blockers(game);
        }
        Some(CombatPhase::DeclaringBlockers) => {
            let _ = blocks::accept_blockers(game);
        }
        _ => {}
    }
}

fn combat_damage(game: &mut GameState) {
    game.step = GamePhaseStep::CombatDamage;
    game.priority = game.active_player();
    game.clear_passed();
    accept_pending_blocks(game);

    if game.combat.is_some() {
        let _ = damage::assign_combat_damage(game, false);
        let _ = damage::apply_combat_damage(game);
    }
    state_based_actions::on_will_receive_priority(game);
}

fn end_combat(game: &mut GameState) {
    cleanup::end_combat(game);
    begin_step(game, GamePhaseStep::EndCombat);
}

fn cleanup_step(game: &mut GameState) {
    game.step = GamePhaseStep::Cleanup;

    // All marked damage is removed and "this turn" state ends. This
    // turn-based action doesn't use the stack.
    for card in game.zones.all_cards_mut() {
        card.damage = 0;
        card.damage_sources.clear();
        card.deathtouched = false;
    }
    game.former_groups.clear();
    game.last_known.clear();

    // If state-based actions or triggers produce work here, players
    // receive priority; otherwise the turn ends immediately.
    let anything_happened = state_based_actions::on_will_receive_priority(game);
    if !anything_happened {
        advance(game)
    }
}
