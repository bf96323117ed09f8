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

use std::collections::{BTreeMap, BTreeSet};

use primitives::game_primitives::{CardId, PlayerName};
use serde::{Deserialize, Serialize};

use crate::core::numerics::Damage;

/// Entity which has been declared as an attacker.
pub type AttackerId = CardId;

/// Entity which has been declared as a blocker.
pub type BlockerId = CardId;

/// Possible entities a creature may attack.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum AttackTarget {
    Player(PlayerName),
    Planeswalker(PlayerName, CardId),
}

impl AttackTarget {
    pub fn defending_player(&self) -> PlayerName {
        match self {
            Self::Player(player) => *player,
            Self::Planeswalker(player, _) => *player,
        }
    }
}

/// Progress of the current combat phase, gating which combat operations
/// are legal.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
pub enum CombatPhase {
    /// The active player is declaring attackers.
    DeclaringAttackers,

    /// Attackers are locked in; the defending players are declaring
    /// blockers.
    DeclaringBlockers,

    /// Blockers have been accepted. Blocker ordering and damage
    /// assignment are now legal; combat participation is frozen except
    /// for removals.
    BlockersDecided,
}

/// The pairing of one attacker (or band of attackers) with its chosen
/// defender and any declared blockers.
///
/// Blockers are stored in damage-assignment order; cards are referenced
/// by ID only, never owned here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CombatGroup {
    pub attackers: Vec<AttackerId>,
    pub defender: AttackTarget,
    pub blockers: Vec<BlockerId>,
    pub blocked: bool,
}

impl CombatGroup {
    pub fn new(attacker: AttackerId, defender: AttackTarget) -> Self {
        Self { attackers: vec![attacker], defender, blockers: vec![], blocked: false }
    }
}

/// Where one parcel of combat damage is going.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
pub enum DamageTarget {
    Creature(CardId),
    Player(PlayerName),
    Planeswalker(CardId),
}

/// One source-to-target combat damage assignment, recorded during the
/// assignment step and dealt during the apply step.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DamageAssignment {
    pub source: CardId,
    pub target: DamageTarget,
    pub amount: Damage,
}

/// Tracks the state of creatures participating in a combat phase.
///
/// Created when the combat phase begins, mutated through the declare
/// steps, frozen during damage except for legal removals, and cleared at
/// end of combat (with groups preserved on the game state for
/// attacked-this-turn queries until cleanup).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CombatData {
    /// The player whose turn it is.
    pub attacking_player: PlayerName,

    pub phase: CombatPhase,

    /// Players and planeswalkers that may legally be attacked.
    pub defenders: BTreeSet<AttackTarget>,

    /// Creatures declared as attackers.
    pub attackers: BTreeSet<AttackerId>,

    /// The subset of [Self::attackers] that were tapped as a cost of
    /// attacking. Excludes vigilance attackers, which never tapped.
    pub attackers_tapped: BTreeSet<AttackerId>,

    /// Attack pairings in declaration order.
    pub groups: Vec<CombatGroup>,

    /// Creatures which must attack this combat if able, with the
    /// defenders they may be sent at. An empty set means any defender.
    pub creatures_forced_to_attack: BTreeMap<CardId, BTreeSet<AttackTarget>>,

    /// Creatures which must block the given attackers if able.
    pub creature_must_block: BTreeMap<BlockerId, BTreeSet<AttackerId>>,

    /// Minimum number of blockers needed to legally block each attacker,
    /// for menace and similar restrictions.
    pub min_blockers_per_attacker: BTreeMap<AttackerId, usize>,

    /// Damage assignments recorded by the current assignment step.
    pub pending_assignments: Vec<DamageAssignment>,

    /// Player-supplied damage distributions overriding the automatic
    /// assignment, keyed by the assigning creature. Used for banding.
    pub manual_attacker_assignments: BTreeMap<AttackerId, BTreeMap<CardId, Damage>>,
    pub manual_blocker_assignments: BTreeMap<BlockerId, BTreeMap<CardId, Damage>>,

    /// Creatures which assigned damage during the first-strike step and
    /// therefore do not assign again in the normal step unless they have
    /// double strike.
    pub assigned_first_strike: BTreeSet<CardId>,
}

impl CombatData {
    pub fn new(attacking_player: PlayerName) -> Self {
        Self {
            attacking_player,
            phase: CombatPhase::DeclaringAttackers,
            defenders: BTreeSet::new(),
            attackers: BTreeSet::new(),
            attackers_tapped: BTreeSet::new(),
            groups: vec![],
            creatures_forced_to_attack: BTreeMap::new(),
            creature_must_block: BTreeMap::new(),
            min_blockers_per_attacker: BTreeMap::new(),
            pending_assignments: vec![],
            manual_attacker_assignments: BTreeMap::new(),
            manual_blocker_assignments: BTreeMap::new(),
            assigned_first_strike: BTreeSet::new(),
        }
    }

    /// The group containing the given attacker, if any.
    pub fn group_for_attacker(&self, attacker: AttackerId) -> Option<&CombatGroup> {
        self.groups.iter().find(|group| group.attackers.contains(&attacker))
    }

    /// Mutable equivalent of [Self::group_for_attacker].
    pub fn group_for_attacker_mut(&mut self, attacker: AttackerId) -> Option<&mut CombatGroup> {
        self.groups.iter_mut().find(|group| group.attackers.contains(&attacker))
    }

    /// Iterator over all declared blockers across all groups.
    pub fn all_blockers(&self) -> impl Iterator<Item = BlockerId> + '_ {
        self.groups.iter().flat_map(|group| group.blockers.iter().copied())
    }

    /// True if the card is participating in this combat as attacker or
    /// blocker.
    pub fn is_participating(&self, card_id: CardId) -> bool {
        self.attackers.contains(&card_id) || self.all_blockers().any(|id| id == card_id)
    }

    /// Removes a card from all combat bookkeeping.
    ///
    /// Groups whose last blocker is removed become unblocked; groups
    /// whose last attacker is removed are discarded. Returns true if the
    /// card was participating.
    pub fn remove_card(&mut self, card_id: CardId) -> bool {
        let was_attacking = self.attackers.remove(&card_id);
        self.attackers_tapped.remove(&card_id);
        self.creatures_forced_to_attack.remove(&card_id);
        self.creature_must_block.remove(&card_id);
        self.min_blockers_per_attacker.remove(&card_id);
        self.manual_attacker_assignments.remove(&card_id);
        self.manual_blocker_assignments.remove(&card_id);

        let mut was_blocking = false;
        for group in &mut self.groups {
            group.attackers.retain(|&id| id != card_id);
            let before = group.blockers.len();
            group.blockers.retain(|&id| id != card_id);
            was_blocking |= group.blockers.len() != before;
            if group.blockers.is_empty() {
                group.blocked = false;
            }
        }
        self.groups.retain(|group| !group.attackers.is_empty());

        was_attacking || was_blocking
    }
}
