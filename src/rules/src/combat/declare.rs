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

//! Attacker declaration.

use std::collections::BTreeSet;

use data::card_states::zones::ZoneQueries;
use data::core::ability::Ability;
use data::core::game_error::{GameError, GameResult};
use data::events::game_event::{EventKind, GameEvent};
use data::game_states::combat_state::{AttackTarget, CombatData, CombatGroup, CombatPhase};
use data::game_states::game_state::GameState;
use primitives::game_primitives::{CardId, PlayerName, Source, Zone};
use tracing::{debug, instrument};

use crate::dispatcher::dispatch;
use crate::mutations::permanents;
use crate::queries::{card_queries, player_queries};

/// Creates a fresh combat struct for the active player.
///
/// Groups from earlier combat phases of the same turn are preserved on
/// the game state for attacked-this-turn queries. Per-card combat flags
/// and marked damage are cleared. Publishes no event.
pub fn reset_combat(game: &mut GameState) {
    if let Some(combat) = game.combat.take() {
        game.former_groups.extend(combat.groups);
    }
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
    game.combat = Some(CombatData::new(game.active_player()));
}

/// Records the player making this combat's attack declarations.
pub fn set_attacker(game: &mut GameState, player: PlayerName) -> GameResult<()> {
    let Some(combat) = game.combat.as_mut() else {
        return Err(GameError::illegal_state("no active attacker: combat has not started"));
    };
    combat.attacking_player = player;
    Ok(())
}

/// Computes the set of legal attack targets: every opponent still in the
/// game, plus every planeswalker those opponents control.
pub fn set_defenders(game: &mut GameState) -> GameResult<()> {
    let Some(combat) = game.combat.as_ref() else {
        return Err(GameError::illegal_state("no active attacker: combat has not started"));
    };
    let attacking_player = combat.attacking_player;

    let mut defenders = BTreeSet::new();
    for opponent in player_queries::opponents(game, attacking_player) {
        defenders.insert(AttackTarget::Player(opponent));
        for id in card_queries::battlefield_controlled_by(game, opponent) {
            if card_queries::is_planeswalker(game, id) {
                defenders.insert(AttackTarget::Planeswalker(opponent, id));
            }
        }
    }

    if let Some(combat) = game.combat.as_mut() {
        combat.defenders = defenders;
    }
    Ok(())
}

/// Returns true if the card may be declared as an attacker at all.
///
/// A creature can attack if it is on the battlefield, controlled by the
/// attacking player, untapped, free of summoning sickness (unless it has
/// haste) and does not have defender. Forced-attack requirements are
/// checked against the final attack declaration, not here.
pub fn can_attack(game: &GameState, card_id: CardId) -> GameResult<bool> {
    let Some(card) = game.card(card_id) else {
        return Err(GameError::not_found("card"));
    };
    let Some(combat) = game.combat.as_ref() else {
        return Err(GameError::illegal_state("no active attacker: combat has not started"));
    };
    Ok(card.zone == Zone::Battlefield
        && card_queries::controller(game, card_id) == Some(combat.attacking_player)
        && card_queries::is_creature(game, card_id)
        && card_queries::is_untapped(game, card_id)
        && !card_queries::summoning_sick(game, card_id)
        && !card_queries::has_ability(game, card_id, Ability::Defender))
}

/// Returns true if the card may be declared attacking the given
/// defender.
pub fn can_attack_defender(
    game: &GameState,
    card_id: CardId,
    defender: AttackTarget,
) -> GameResult<bool> {
    if !can_attack(game, card_id)? {
        return Ok(false);
    }
    let Some(combat) = game.combat.as_ref() else {
        return Err(GameError::illegal_state("no active attacker: combat has not started"));
    };
    if !combat.defenders.contains(&defender) {
        return Ok(false);
    }
    // A forced-attack entry with an explicit defender set prohibits
    // attacking anywhere else.
    if let Some(allowed) = combat.creatures_forced_to_attack.get(&card_id) {
        if !allowed.is_empty() && !allowed.contains(&defender) {
            return Ok(false);
        }
    }
    Ok(true)
}

/// Declares a creature as an attacker.
///
/// Taps the creature unless it has vigilance, recording the tap so that
/// a later removal can undo it, and creates or extends a combat group
/// for the chosen defender. Publishes ATTACKER_DECLARED.
#[instrument(level = "debug", skip(game))]
pub fn declare_attacker(
    game: &mut GameState,
    card_id: CardId,
    defender: AttackTarget,
    controller: PlayerName,
) -> GameResult<()> {
    {
        let Some(combat) = game.combat.as_ref() else {
            return Err(GameError::illegal_state("no active attacker: combat has not started"));
        };
        if combat.phase != CombatPhase::DeclaringAttackers {
            return Err(GameError::illegal_state("attackers cannot be declared now"));
        }
        if controller != combat.attacking_player {
            return Err(GameError::restriction("only the attacking player declares attackers"));
        }
        if combat.attackers.contains(&card_id) {
            return Err(GameError::restriction("creature is already attacking"));
        }
    }
    if !can_attack_defender(game, card_id, defender)? {
        return Err(GameError::restriction("creature cannot attack this defender"));
    }

    let vigilance = card_queries::has_ability(game, card_id, Ability::Vigilance);
    let banding = card_queries::has_ability(game, card_id, Ability::Banding);

    // Attackers with banding join an existing band attacking the same
    // defender rather than forming their own group.
    let band_index = if banding {
        game.combat.as_ref().and_then(|combat| {
            combat.groups.iter().position(|group| {
                group.defender == defender
                    && group.attackers.iter().any(|&attacker| {
                        card_queries::has_ability(game, attacker, Ability::Banding)
                    })
            })
        })
    } else {
        None
    };

    if !vigilance {
        permanents::tap(game, Source::Game, card_id);
    }
    if let Some(card) = game.card_mut(card_id) {
        card.attacking = Some(defender);
    }
    if let Some(combat) = game.combat.as_mut() {
        combat.attackers.insert(card_id);
        if !vigilance {
            combat.attackers_tapped.insert(card_id);
        }
        match band_index {
            Some(index) => combat.groups[index].attackers.push(card_id),
            None => combat.groups.push(CombatGroup::new(card_id, defender)),
        }
    }

    debug!(?card_id, ?defender, "Declared attacker");
    dispatch::publish(game, GameEvent::new(EventKind::AttackerDeclared).with_source(card_id));
    Ok(())
}

/// Locks in the declared attackers and moves to declaring blockers.
///
/// Forced-attack requirements are validated here, against the final
/// attack declaration: every creature required to attack must be
/// attacking an allowed defender if it is able to attack at all.
/// Must-block requirements (lure) are computed for the blocking player
/// once the attack is locked in.
pub fn confirm_attackers(game: &mut GameState) -> GameResult<()> {
    let combat_phase = game.combat.as_ref().map(|combat| combat.phase);
    match combat_phase {
        None => return Err(GameError::illegal_state("no active attacker: combat has not started")),
        Some(CombatPhase::DeclaringAttackers) => {}
        Some(_) => return Err(GameError::illegal_state("attackers are already locked in")),
    }

    let forced: Vec<(CardId, BTreeSet<AttackTarget>)> = game
        .combat
        .as_ref()
        .map(|combat| {
            combat
                .creatures_forced_to_attack
                .iter()
                .map(|(&card_id, allowed)| (card_id, allowed.clone()))
                .collect()
        })
        .unwrap_or_default();
    for (card_id, allowed) in forced {
        if !can_attack(game, card_id).unwrap_or(false) {
            continue;
        }
        let attacking = game.card(card_id).and_then(|card| card.attacking);
        let satisfied = match attacking {
            Some(target) => allowed.is_empty() || allowed.contains(&target),
            None => false,
        };
        if !satisfied {
            return Err(GameError::restriction("creature is required to attack"));
        }
    }

    if let Some(combat) = game.combat.as_mut() {
        combat.phase = CombatPhase::DeclaringBlockers;
    }
    crate::combat::blocks::process_must_block_requirements(game)
}

/// Withdraws an attack declaration before attackers are confirmed,
/// untapping the creature if it was tapped as a cost of attacking.
pub fn remove_attacker(game: &mut GameState, card_id: CardId) -> GameResult<()> {
    let Some(combat) = game.combat.as_ref() else {
        return Err(GameError::illegal_state("no active attacker: combat has not started"));
    };
    if combat.phase != CombatPhase::DeclaringAttackers {
        return Err(GameError::illegal_state("attackers are already locked in"));
    }
    if !combat.attackers.contains(&card_id) {
        return Err(GameError::restriction("creature is not attacking"));
    }
    let was_tapped = combat.attackers_tapped.contains(&card_id);

    if was_tapped {
        permanents::untap(game, Source::Game, card_id);
    }
    if let Some(combat) = game.combat.as_mut() {
        combat.remove_card(card_id);
    }
    if let Some(card) = game.card_mut(card_id) {
        card.attacking = None;
    }
    Ok(())
}
