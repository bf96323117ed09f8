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

use std::collections::BTreeMap;
use std::str::FromStr;

use primitives::game_primitives::{CardId, EntityId};
use serde::{Deserialize, Serialize};

use crate::core::numerics::Damage;
use crate::game_states::combat_state::AttackTarget;

/// Combat decisions a player can submit.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub enum CombatAction {
    /// Declare a creature as attacking the given target.
    DeclareAttacker { attacker: CardId, target: AttackTarget },

    /// Withdraw an attack declaration before attackers are confirmed.
    RemoveAttacker { attacker: CardId },

    /// Lock in the declared attackers and move to declaring blockers.
    ConfirmAttackers,

    /// Declare a creature as blocking the given attacker.
    DeclareBlocker { blocker: CardId, attacker: CardId },

    /// Withdraw a block declaration before blockers are accepted.
    RemoveBlocker { blocker: CardId },

    /// Lock in the declared blockers. Enforces minimum-blocker
    /// restrictions and fires the block events.
    ConfirmBlockers,

    /// Set the damage-assignment order of the blockers of an attacker.
    OrderBlockers { attacker: CardId, blockers: Vec<CardId> },

    /// Supply an explicit damage distribution for an attacking creature.
    AssignAttackerDamage { attacker: CardId, assignments: BTreeMap<CardId, Damage> },

    /// Supply an explicit damage distribution for a blocking creature.
    AssignBlockerDamage { blocker: CardId, assignments: BTreeMap<CardId, Damage> },
}

/// A complete game action a player can submit.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub enum GameAction {
    PassPriority,
    Concede,
    Combat(CombatAction),
}

impl From<CombatAction> for GameAction {
    fn from(value: CombatAction) -> Self {
        GameAction::Combat(value)
    }
}

/// Named player actions accepted over the wire as plain strings.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
pub enum PlayerActionName {
    Pass,
    DeclareAttackersDone,
    DeclareBlockersDone,
    Concede,
}

impl FromStr for PlayerActionName {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PASS" => Ok(PlayerActionName::Pass),
            "DECLARE_ATTACKERS_DONE" => Ok(PlayerActionName::DeclareAttackersDone),
            "DECLARE_BLOCKERS_DONE" => Ok(PlayerActionName::DeclareBlockersDone),
            "CONCEDE" => Ok(PlayerActionName::Concede),
            _ => Err(()),
        }
    }
}

/// Raw input arriving from a client session.
///
/// The engine maps these onto [GameAction]s; unknown or out-of-context
/// input is rejected without mutating the game.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub enum ClientAction {
    /// A named spell or object, e.g. to cast by name.
    SendString(String),

    /// A numeric payload, e.g. a life-total adjustment in debug flows.
    SendInteger(i64),

    /// A named player action such as "PASS".
    PlayerAction(PlayerActionName),

    /// A target selection for the pending decision.
    SelectTarget(EntityId),

    /// A fully-structured game action.
    Game(GameAction),
}
