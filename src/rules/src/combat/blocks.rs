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

//! Blocker declaration, acceptance, and ordering.

use std::collections::{BTreeMap, BTreeSet};

use data::card_states::zones::ZoneQueries;
use data::core::ability::Ability;
use data::core::game_error::{GameError, GameResult};
use data::events::game_event::{EventKind, GameEvent};
use data::game_states::combat_state::{AttackerId, BlockerId, CombatPhase};
use data::game_states::game_state::GameState;
use itertools::Itertools;
use primitives::game_primitives::{CardId, PlayerName, Zone};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::dispatcher::dispatch;
use crate::queries::card_queries;

/// An unmet must-block requirement, reported by
/// [check_block_requirements].
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
pub struct BlockRequirementViolation {
    /// The creature which is required to block.
    pub blocker: BlockerId,

    /// The attacker it is required to block.
    pub attacker: AttackerId,
}

/// Returns true if `blocker` may be declared blocking `attacker`.
///
/// The blocker must be an untapped creature controlled by the player the
/// attacker is attacking, must not already be blocking that attacker,
/// and must satisfy the attacker's evasion abilities: an unblockable
/// attacker blocks nothing, and a flying attacker is blockable only by
/// creatures with flying or reach.
pub fn can_block(game: &GameState, blocker: BlockerId, attacker: AttackerId) -> GameResult<bool> {
    if game.card(blocker).is_none() || game.card(attacker).is_none() {
        return Err(GameError::not_found("card"));
    }
    let Some(combat) = game.combat.as_ref() else {
        return Err(GameError::illegal_state("no combat in progress"));
    };
    let Some(group) = combat.group_for_attacker(attacker) else {
        return Ok(false);
    };
    let defender = group.defender.defending_player();

    let blocker_ok = game.card(blocker).map(|card| card.zone) == Some(Zone::Battlefield)
        && card_queries::is_creature(game, blocker)
        && card_queries::is_untapped(game, blocker)
        && card_queries::controller(game, blocker) == Some(defender)
        && !group.blockers.contains(&blocker);
    if !blocker_ok {
        return Ok(false);
    }

    if card_queries::has_ability(game, attacker, Ability::Unblockable) {
        return Ok(false);
    }
    if card_queries::has_ability(game, attacker, Ability::Flying)
        && !card_queries::has_ability(game, blocker, Ability::Flying)
        && !card_queries::has_ability(game, blocker, Ability::Reach)
    {
        return Ok(false);
    }
    Ok(true)
}

/// Declares a creature as blocking an attacker. Publishes
/// BLOCKER_DECLARED.
#[instrument(level = "debug", skip(game))]
pub fn declare_blocker(
    game: &mut GameState,
    blocker: BlockerId,
    attacker: AttackerId,
    controller: PlayerName,
) -> GameResult<()> {
    {
        let Some(combat) = game.combat.as_ref() else {
            return Err(GameError::illegal_state("no combat in progress"));
        };
        if combat.phase != CombatPhase::DeclaringBlockers {
            return Err(GameError::illegal_state("blockers cannot be declared now"));
        }
    }
    if card_queries::controller(game, blocker) != Some(controller) {
        return Err(GameError::restriction("player does not control this blocker"));
    }
    if !can_block(game, blocker, attacker)? {
        return Err(GameError::restriction("creature cannot block this attacker"));
    }

    if let Some(combat) = game.combat.as_mut() {
        if let Some(group) = combat.group_for_attacker_mut(attacker) {
            group.blockers.push(blocker);
            group.blocked = true;
        }
    }
    if let Some(card) = game.card_mut(blocker) {
        card.blocking.push(attacker);
    }

    debug!(?blocker, ?attacker, "Declared blocker");
    dispatch::publish(
        game,
        GameEvent::new(EventKind::BlockerDeclared).with_source(blocker).with_target(attacker),
    );
    Ok(())
}

/// Withdraws all of a creature's block declarations before blockers are
/// accepted.
pub fn remove_blocker(game: &mut GameState, blocker: BlockerId) -> GameResult<()> {
    let Some(combat) = game.combat.as_ref() else {
        return Err(GameError::illegal_state("no combat in progress"));
    };
    if combat.phase != CombatPhase::DeclaringBlockers {
        return Err(GameError::illegal_state("blockers are already locked in"));
    }

    if let Some(combat) = game.combat.as_mut() {
        for group in &mut combat.groups {
            group.blockers.retain(|&id| id != blocker);
            if group.blockers.is_empty() {
                group.blocked = false;
            }
        }
    }
    if let Some(card) = game.card_mut(blocker) {
        card.blocking.clear();
    }
    Ok(())
}

/// Accepts the declared blockers, enforcing minimum-blocker restrictions
/// and publishing the block events.
///
/// An attacker blocked by fewer creatures than its minimum (menace and
/// similar) legally ends up unblocked: all of its blockers are removed,
/// without error. Publishes CREATURE_BLOCKED for each blocked attacker,
/// CREATURE_BLOCKS for each creature still blocking, UNBLOCKED_ATTACKER
/// for each unblocked attacker, and finally the phase-level
/// DECLARED_BLOCKERS.
#[instrument(level = "debug", skip(game))]
pub fn accept_blockers(game: &mut GameState) -> GameResult<()> {
    {
        let Some(combat) = game.combat.as_ref() else {
            return Err(GameError::illegal_state("no combat in progress"));
        };
        if combat.phase != CombatPhase::DeclaringBlockers {
            return Err(GameError::illegal_state("blockers cannot be accepted now"));
        }
    }

    // Enforce minimum blocker counts.
    let group_count = game.combat.as_ref().map(|combat| combat.groups.len()).unwrap_or(0);
    for index in 0..group_count {
        let Some((attackers, blockers)) = game.combat.as_ref().and_then(|combat| {
            combat
                .groups
                .get(index)
                .map(|group| (group.attackers.clone(), group.blockers.clone()))
        }) else {
            continue;
        };
        if blockers.is_empty() {
            continue;
        }
        let minimum = attackers
            .iter()
            .map(|&attacker| minimum_blockers(game, attacker))
            .max()
            .unwrap_or(1);
        if blockers.len() < minimum {
            debug!(?attackers, minimum, "Removing blockers below minimum requirement");
            if let Some(combat) = game.combat.as_mut() {
                if let Some(group) = combat.groups.get_mut(index) {
                    group.blockers.clear();
                    group.blocked = false;
                }
            }
            for blocker in blockers {
                if let Some(card) = game.card_mut(blocker) {
                    card.blocking.retain(|id| !attackers.contains(id));
                }
            }
        }
    }

    if let Some(combat) = game.combat.as_mut() {
        combat.phase = CombatPhase::BlockersDecided;
    }

    // Publish block events against the final configuration.
    let Some(combat) = game.combat.clone() else {
        return Ok(());
    };
    for group in &combat.groups {
        if group.blocked {
            for &attacker in &group.attackers {
                dispatch::publish(
                    game,
                    GameEvent::new(EventKind::CreatureBlocked).with_source(attacker),
                );
            }
        }
    }
    let blocking: Vec<BlockerId> = combat.groups.iter().flat_map(|g| g.blockers.clone()).unique().collect();
    for blocker in blocking {
        dispatch::publish(game, GameEvent::new(EventKind::CreatureBlocks).with_source(blocker));
    }
    for group in &combat.groups {
        if !group.blocked {
            for &attacker in &group.attackers {
                dispatch::publish(
                    game,
                    GameEvent::new(EventKind::UnblockedAttacker).with_source(attacker),
                );
            }
        }
    }
    dispatch::publish(game, GameEvent::new(EventKind::DeclaredBlockers));
    Ok(())
}

/// The minimum number of blockers needed to legally block this attacker.
pub fn minimum_blockers(game: &GameState, attacker: AttackerId) -> usize {
    let menace = if card_queries::has_ability(game, attacker, Ability::Menace) { 2 } else { 1 };
    let configured = game
        .combat
        .as_ref()
        .and_then(|combat| combat.min_blockers_per_attacker.get(&attacker).copied())
        .unwrap_or(1);
    menace.max(configured)
}

/// Computes must-block requirements from lure abilities.
///
/// Every creature able to block an attacker with lure is required to
/// block it; creatures which cannot block it (e.g. grounded creatures
/// against a flying lure) are exempt.
pub fn process_must_block_requirements(game: &mut GameState) -> GameResult<()> {
    let Some(combat) = game.combat.as_ref() else {
        return Err(GameError::illegal_state("no combat in progress"));
    };

    let mut requirements: BTreeMap<BlockerId, BTreeSet<AttackerId>> = BTreeMap::new();
    for &attacker in &combat.attackers {
        if !card_queries::has_ability(game, attacker, Ability::Lure) {
            continue;
        }
        let Some(group) = combat.group_for_attacker(attacker) else {
            continue;
        };
        let defender = group.defender.defending_player();
        for blocker in card_queries::battlefield_controlled_by(game, defender) {
            if can_block(game, blocker, attacker).unwrap_or(false) {
                requirements.entry(blocker).or_default().insert(attacker);
            }
        }
    }

    if let Some(combat) = game.combat.as_mut() {
        combat.creature_must_block = requirements;
    }
    Ok(())
}

/// Reports unmet must-block requirements for the given defending player.
///
/// Callers surface these to the player to fix before accepting blockers;
/// declaring the required block removes the violation.
pub fn check_block_requirements(
    game: &GameState,
    defender: PlayerName,
) -> Vec<BlockRequirementViolation> {
    let Some(combat) = game.combat.as_ref() else {
        return vec![];
    };
    let mut violations = vec![];
    for (&blocker, attackers) in &combat.creature_must_block {
        if card_queries::controller(game, blocker) != Some(defender) {
            continue;
        }
        let already_blocking =
            game.card(blocker).map(|card| card.blocking.clone()).unwrap_or_default();
        for &attacker in attackers {
            if already_blocking.contains(&attacker) {
                continue;
            }
            // Only blocks the creature could actually perform are required.
            if can_block(game, blocker, attacker).unwrap_or(false) {
                violations.push(BlockRequirementViolation { blocker, attacker });
            }
        }
    }
    violations
}

/// Replaces the damage-assignment order of an attacker's blockers.
///
/// The new order must be a permutation of the current blockers.
pub fn order_blockers(
    game: &mut GameState,
    attacker: AttackerId,
    ordered: &[CardId],
) -> GameResult<()> {
    let Some(combat) = game.combat.as_ref() else {
        return Err(GameError::illegal_state("no combat in progress"));
    };
    if combat.phase == CombatPhase::DeclaringAttackers {
        return Err(GameError::illegal_state("blockers have not been declared"));
    }
    let Some(group) = combat.group_for_attacker(attacker) else {
        return Err(GameError::not_found("attacker"));
    };

    let current: Vec<CardId> = group.blockers.iter().copied().sorted().collect();
    let proposed: Vec<CardId> = ordered.iter().copied().sorted().collect();
    if current != proposed {
        return Err(GameError::restriction("invalid order: blockers do not match the group"));
    }

    if let Some(combat) = game.combat.as_mut() {
        if let Some(group) = combat.group_for_attacker_mut(attacker) {
            group.blockers = ordered.to_vec();
        }
    }
    Ok(())
}
