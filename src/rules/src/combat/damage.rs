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

//! Combat damage assignment and application.
//!
//! Damage happens in two passes: the assignment step records who deals
//! how much to whom (honoring blocker order, lethal sequencing,
//! deathtouch, trample, and banding), and the apply step turns those
//! assignments into state changes through the replaceable damage events.

use std::collections::BTreeMap;

use data::card_states::zones::ZoneQueries;
use data::core::ability::Ability;
use data::core::game_error::{GameError, GameResult};
use data::core::numerics::{power_to_damage, Damage};
use data::events::game_event::{EventKind, GameEvent};
use data::game_states::combat_state::{
    AttackTarget, AttackerId, BlockerId, CombatData, CombatGroup, CombatPhase, DamageAssignment,
    DamageTarget,
};
use data::game_states::game_state::GameState;
use primitives::game_primitives::{CardId, PlayerName, Source, Zone};
use tracing::{debug, instrument};

use crate::dispatcher::dispatch;
use crate::mutations::{permanents, players, state_based_actions};
use crate::queries::card_queries;

/// True if any attacker or blocker in the current combat has first
/// strike or double strike by its effective abilities.
///
/// The first-strike damage step runs only when this returns true.
pub fn has_first_or_double_strike(game: &GameState) -> bool {
    let Some(combat) = game.combat.as_ref() else {
        return false;
    };
    combat
        .attackers
        .iter()
        .copied()
        .chain(combat.all_blockers())
        .any(|id| has_strike_ability(game, id))
}

fn has_strike_ability(game: &GameState, id: CardId) -> bool {
    card_queries::has_ability(game, id, Ability::FirstStrike)
        || card_queries::has_ability(game, id, Ability::DoubleStrike)
}

/// True if the creature assigns damage in the given step.
///
/// Only first/double strikers assign in the first-strike step. In the
/// normal step, creatures which already assigned first-strike damage
/// assign again only with double strike.
fn assigns_in_step(game: &GameState, combat: &CombatData, id: CardId, first_strike: bool) -> bool {
    if first_strike {
        has_strike_ability(game, id)
    } else {
        card_queries::has_ability(game, id, Ability::DoubleStrike)
            || !combat.assigned_first_strike.contains(&id)
    }
}

fn alive_on_battlefield(game: &GameState, id: CardId) -> bool {
    game.card(id).map(|card| card.zone == Zone::Battlefield).unwrap_or(false)
}

/// Records combat damage assignments for the indicated step.
///
/// For each attacker: an unblocked attacker assigns everything to its
/// defender; a blocked attacker assigns along its blocker order, each
/// blocker receiving at least lethal damage before the next gets any,
/// with trample carrying the remainder over to the defender. Blockers
/// assign to the attackers they block the same way. Player-supplied
/// distributions (banding) override the automatic ones.
///
/// Publishes COMBAT_DAMAGE_ASSIGNED when done.
#[instrument(level = "debug", skip(game))]
pub fn assign_combat_damage(game: &mut GameState, first_strike: bool) -> GameResult<()> {
    let combat = match game.combat.as_ref() {
        Some(combat) if combat.phase == CombatPhase::BlockersDecided => combat.clone(),
        Some(_) => {
            return Err(GameError::illegal_state("blockers have not been accepted"));
        }
        None => return Err(GameError::illegal_state("no combat in progress")),
    };

    let mut assignments: Vec<DamageAssignment> = vec![];
    let mut assigned_sources: Vec<CardId> = vec![];

    for group in &combat.groups {
        for &attacker in &group.attackers {
            if !alive_on_battlefield(game, attacker)
                || !assigns_in_step(game, &combat, attacker, first_strike)
            {
                continue;
            }
            assigned_sources.push(attacker);
            let total = power_to_damage(card_queries::power(game, attacker).unwrap_or(0));
            if total == 0 {
                continue;
            }
            if !group.blocked {
                assignments.push(DamageAssignment {
                    source: attacker,
                    target: defender_target(group.defender),
                    amount: total,
                });
            } else if let Some(manual) = combat.manual_attacker_assignments.get(&attacker) {
                for (&target, &amount) in manual {
                    if amount > 0 {
                        assignments.push(DamageAssignment {
                            source: attacker,
                            target: DamageTarget::Creature(target),
                            amount,
                        });
                    }
                }
            } else {
                assign_attacker_automatically(game, group, attacker, total, &mut assignments);
            }
        }

        for &blocker in &group.blockers {
            if !alive_on_battlefield(game, blocker)
                || !assigns_in_step(game, &combat, blocker, first_strike)
                || assigned_sources.contains(&blocker)
            {
                continue;
            }
            assigned_sources.push(blocker);
            let total = power_to_damage(card_queries::power(game, blocker).unwrap_or(0));
            if total == 0 {
                continue;
            }
            if let Some(manual) = combat.manual_blocker_assignments.get(&blocker) {
                for (&target, &amount) in manual {
                    if amount > 0 {
                        assignments.push(DamageAssignment {
                            source: blocker,
                            target: DamageTarget::Creature(target),
                            amount,
                        });
                    }
                }
            } else {
                assign_blocker_automatically(game, blocker, total, &mut assignments);
            }
        }
    }

    let total: i64 = assignments.iter().map(|assignment| assignment.amount as i64).sum();
    if let Some(combat) = game.combat.as_mut() {
        combat.pending_assignments = assignments;
        if first_strike {
            combat.assigned_first_strike.extend(assigned_sources);
        }
    }
    debug!(first_strike, total, "Assigned combat damage");
    dispatch::publish(game, GameEvent::new(EventKind::CombatDamageAssigned).with_amount(total));
    Ok(())
}

/// Default attacker assignment: lethal to each blocker in order, the
/// remainder to the last blocker, or past the blockers with trample.
fn assign_attacker_automatically(
    game: &GameState,
    group: &CombatGroup,
    attacker: AttackerId,
    total: Damage,
    assignments: &mut Vec<DamageAssignment>,
) {
    let deathtouch = card_queries::has_ability(game, attacker, Ability::Deathtouch);
    let trample_target = trample_destination(game, attacker, group.defender);
    let blockers: Vec<BlockerId> =
        group.blockers.iter().copied().filter(|&id| alive_on_battlefield(game, id)).collect();

    if blockers.is_empty() {
        // All blockers already left combat. The attacker stays blocked
        // and assigns no damage, unless it can trample over.
        if let Some(target) = trample_target {
            assignments.push(DamageAssignment { source: attacker, target, amount: total });
        }
        return;
    }

    let mut remaining = total;
    for (index, &blocker) in blockers.iter().enumerate() {
        if remaining == 0 {
            break;
        }
        let lethal = remaining_lethal(game, blocker, deathtouch, assignments);
        let last = index + 1 == blockers.len();
        let amount = if trample_target.is_some() || !last {
            remaining.min(lethal)
        } else {
            remaining
        };
        if amount > 0 {
            assignments.push(DamageAssignment {
                source: attacker,
                target: DamageTarget::Creature(blocker),
                amount,
            });
            remaining -= amount;
        }
    }

    if remaining > 0 {
        if let Some(target) = trample_target {
            assignments.push(DamageAssignment { source: attacker, target, amount: remaining });
        }
    }
}

/// Default blocker assignment: all damage to a single blocked attacker,
/// or lethal in declaration order across several.
fn assign_blocker_automatically(
    game: &GameState,
    blocker: BlockerId,
    total: Damage,
    assignments: &mut Vec<DamageAssignment>,
) {
    let deathtouch = card_queries::has_ability(game, blocker, Ability::Deathtouch);
    let attackers: Vec<AttackerId> = game
        .card(blocker)
        .map(|card| card.blocking.clone())
        .unwrap_or_default()
        .into_iter()
        .filter(|&id| alive_on_battlefield(game, id))
        .collect();
    if attackers.is_empty() {
        return;
    }

    let mut remaining = total;
    for (index, &attacker) in attackers.iter().enumerate() {
        if remaining == 0 {
            break;
        }
        let last = index + 1 == attackers.len();
        let amount = if last {
            remaining
        } else {
            remaining.min(remaining_lethal(game, attacker, deathtouch, assignments))
        };
        if amount > 0 {
            assignments.push(DamageAssignment {
                source: blocker,
                target: DamageTarget::Creature(attacker),
                amount,
            });
            remaining -= amount;
        }
    }
}

/// Lethal damage still needed for a creature given what earlier
/// assignments in this step already send its way.
fn remaining_lethal(
    game: &GameState,
    creature: CardId,
    deathtouch: bool,
    assignments: &[DamageAssignment],
) -> Damage {
    let already: Damage = assignments
        .iter()
        .filter(|assignment| assignment.target == DamageTarget::Creature(creature))
        .map(|assignment| assignment.amount)
        .sum();
    card_queries::lethal_damage(game, creature, deathtouch).saturating_sub(already)
}

/// Where an attacker's trample damage goes, if anywhere.
///
/// Trample carries over to a defending player; carrying over to a
/// planeswalker additionally requires the trample-over-planeswalkers
/// ability.
fn trample_destination(
    game: &GameState,
    attacker: AttackerId,
    defender: AttackTarget,
) -> Option<DamageTarget> {
    if !card_queries::has_ability(game, attacker, Ability::Trample) {
        return None;
    }
    match defender {
        AttackTarget::Player(player) => Some(DamageTarget::Player(player)),
        AttackTarget::Planeswalker(_, id) => {
            card_queries::has_ability(game, attacker, Ability::TrampleOverPlaneswalkers)
                .then_some(DamageTarget::Planeswalker(id))
        }
    }
}

fn defender_target(defender: AttackTarget) -> DamageTarget {
    match defender {
        AttackTarget::Player(player) => DamageTarget::Player(player),
        AttackTarget::Planeswalker(_, id) => DamageTarget::Planeswalker(id),
    }
}

/// Supplies an explicit damage distribution for an attacking creature,
/// replacing the automatic assignment.
///
/// Normally the attacker's controller assigns; when the attacker or any
/// creature in its band has banding, the *defending* player assigns
/// instead. The distribution must spend exactly the creature's power
/// across its blockers and give every earlier blocker lethal damage
/// before a later one receives any.
pub fn assign_attacker_damage(
    game: &mut GameState,
    attacker: AttackerId,
    assigning_player: PlayerName,
    assignments: &BTreeMap<CardId, Damage>,
) -> GameResult<()> {
    let Some(combat) = game.combat.as_ref() else {
        return Err(GameError::illegal_state("no combat in progress"));
    };
    if combat.phase != CombatPhase::BlockersDecided {
        return Err(GameError::illegal_state("blockers have not been accepted"));
    }
    let Some(group) = combat.group_for_attacker(attacker).cloned() else {
        return Err(GameError::not_found("attacker"));
    };
    if !group.blocked {
        return Err(GameError::illegal_state("attacker is not blocked"));
    }

    let band_has_banding = group
        .attackers
        .iter()
        .any(|&id| card_queries::has_ability(game, id, Ability::Banding));
    let required = if band_has_banding {
        group.defender.defending_player()
    } else {
        card_queries::controller(game, attacker).ok_or_else(|| GameError::not_found("card"))?
    };
    if assigning_player != required {
        let role = if band_has_banding { "defending" } else { "attacking" };
        return Err(GameError::restriction(format!(
            "the {role} player must assign this creature's combat damage"
        )));
    }

    validate_distribution(game, attacker, &group.blockers, assignments)?;

    if let Some(combat) = game.combat.as_mut() {
        combat.manual_attacker_assignments.insert(attacker, assignments.clone());
    }
    Ok(())
}

/// Supplies an explicit damage distribution for a blocking creature.
///
/// Normally the blocker's controller assigns; when any blocker in the
/// group has banding, the *attacking* player assigns the blocker's
/// damage across the attackers it blocks.
pub fn assign_blocker_damage(
    game: &mut GameState,
    blocker: BlockerId,
    assigning_player: PlayerName,
    assignments: &BTreeMap<CardId, Damage>,
) -> GameResult<()> {
    let Some(combat) = game.combat.as_ref() else {
        return Err(GameError::illegal_state("no combat in progress"));
    };
    if combat.phase != CombatPhase::BlockersDecided {
        return Err(GameError::illegal_state("blockers have not been accepted"));
    }
    let blocking = game
        .card(blocker)
        .map(|card| card.blocking.clone())
        .ok_or_else(|| GameError::not_found("card"))?;
    if blocking.is_empty() {
        return Err(GameError::illegal_state("creature is not blocking"));
    }

    let blockers_have_banding = combat
        .groups
        .iter()
        .filter(|g| g.blockers.contains(&blocker))
        .flat_map(|g| g.blockers.iter())
        .any(|&id| card_queries::has_ability(game, id, Ability::Banding));
    let required = if blockers_have_banding {
        combat.attacking_player
    } else {
        card_queries::controller(game, blocker).ok_or_else(|| GameError::not_found("card"))?
    };
    if assigning_player != required {
        let role = if blockers_have_banding { "attacking" } else { "defending" };
        return Err(GameError::restriction(format!(
            "the {role} player must assign this creature's combat damage"
        )));
    }

    validate_distribution(game, blocker, &blocking, assignments)?;

    if let Some(combat) = game.combat.as_mut() {
        combat.manual_blocker_assignments.insert(blocker, assignments.clone());
    }
    Ok(())
}

fn validate_distribution(
    game: &GameState,
    source: CardId,
    legal_targets: &[CardId],
    assignments: &BTreeMap<CardId, Damage>,
) -> GameResult<()> {
    for target in assignments.keys() {
        if !legal_targets.contains(target) {
            return Err(GameError::restriction("damage assigned to a creature not in combat"));
        }
    }
    let total: Damage = assignments.values().sum();
    let power = power_to_damage(card_queries::power(game, source).unwrap_or(0));
    if total != power {
        return Err(GameError::restriction(format!(
            "damage total {total} must equal the creature's power {power}"
        )));
    }
    // Lethal sequencing: a later creature in the order may only receive
    // damage once each earlier one has lethal.
    let deathtouch = card_queries::has_ability(game, source, Ability::Deathtouch);
    for (index, &earlier) in legal_targets.iter().enumerate() {
        let later_has_damage = legal_targets[index + 1..]
            .iter()
            .any(|target| assignments.get(target).copied().unwrap_or(0) > 0);
        if !later_has_damage {
            continue;
        }
        let assigned = assignments.get(&earlier).copied().unwrap_or(0);
        if assigned < card_queries::lethal_damage(game, earlier, deathtouch) {
            return Err(GameError::restriction(
                "each blocker must be assigned lethal damage before the next",
            ));
        }
    }
    Ok(())
}

/// Applies the recorded damage assignments.
///
/// Each parcel first publishes a replaceable DAMAGE_PLAYER or
/// DAMAGE_PERMANENT event; whatever amount survives replacement is then
/// applied (marked damage for creatures, life loss for players, loyalty
/// loss for planeswalkers) and announced with the corresponding
/// DAMAGED_* event carrying the combat flag. Lifelink converts every
/// parcel dealt by a lifelinker into a replaceable GAIN_LIFE event.
/// Finishes by publishing COMBAT_DAMAGE_APPLIED and running state-based
/// actions.
#[instrument(level = "debug", skip(game))]
pub fn apply_combat_damage(game: &mut GameState) -> GameResult<()> {
    let assignments = match game.combat.as_mut() {
        Some(combat) if combat.phase == CombatPhase::BlockersDecided => {
            std::mem::take(&mut combat.pending_assignments)
        }
        Some(_) => return Err(GameError::illegal_state("blockers have not been accepted")),
        None => return Err(GameError::illegal_state("no combat in progress")),
    };

    for assignment in assignments {
        apply_one(game, assignment);
    }

    dispatch::publish(game, GameEvent::new(EventKind::CombatDamageApplied));
    state_based_actions::run(game);
    Ok(())
}

fn apply_one(game: &mut GameState, assignment: DamageAssignment) {
    let source = assignment.source;
    let deathtouch = card_queries::has_ability(game, source, Ability::Deathtouch);
    let lifelink = card_queries::has_ability(game, source, Ability::Lifelink);

    match assignment.target {
        DamageTarget::Creature(id) => {
            let event = GameEvent::new(EventKind::DamagePermanent)
                .with_source(source)
                .with_target(id)
                .with_amount(assignment.amount as i64)
                .combat_damage();
            let Some(event) = dispatch::publish_returning(game, event) else {
                return;
            };
            let amount = event.amount.max(0) as Damage;
            if amount == 0 {
                return;
            }
            permanents::mark_damage(game, source, id, amount, deathtouch);
            dispatch::publish(
                game,
                GameEvent::new(EventKind::DamagedPermanent)
                    .with_source(source)
                    .with_target(id)
                    .with_amount(amount as i64)
                    .combat_damage(),
            );
            if lifelink {
                players::apply_lifelink(game, source, amount);
            }
        }
        DamageTarget::Player(player) => {
            let event = GameEvent::new(EventKind::DamagePlayer)
                .with_source(source)
                .with_player(player)
                .with_amount(assignment.amount as i64)
                .combat_damage();
            let Some(event) = dispatch::publish_returning(game, event) else {
                return;
            };
            let amount = event.amount.max(0) as Damage;
            if amount == 0 {
                return;
            }
            players::lose_life(game, player, amount);
            dispatch::publish(
                game,
                GameEvent::new(EventKind::DamagedPlayer)
                    .with_source(source)
                    .with_player(player)
                    .with_amount(amount as i64)
                    .combat_damage(),
            );
            if lifelink {
                players::apply_lifelink(game, source, amount);
            }
        }
        DamageTarget::Planeswalker(id) => {
            let event = GameEvent::new(EventKind::DamagePermanent)
                .with_source(source)
                .with_target(id)
                .with_amount(assignment.amount as i64)
                .combat_damage();
            let Some(event) = dispatch::publish_returning(game, event) else {
                return;
            };
            let amount = event.amount.max(0) as Damage;
            if amount == 0 {
                return;
            }
            // Damage to a planeswalker removes that much loyalty. A
            // deathtouch source still marks it for state-based review.
            permanents::remove_loyalty(game, Source::Card(source), id, amount);
            if deathtouch {
                if let Some(card) = game.card_mut(id) {
                    card.deathtouched = true;
                }
            }
            dispatch::publish(
                game,
                GameEvent::new(EventKind::DamagedPermanent)
                    .with_source(source)
                    .with_target(id)
                    .with_amount(amount as i64)
                    .combat_damage(),
            );
            if lifelink {
                players::apply_lifelink(game, source, amount);
            }
        }
    }
}
