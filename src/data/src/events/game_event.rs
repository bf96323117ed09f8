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

use enumset::EnumSetType;
use primitives::game_primitives::{CardId, PlayerName, ReplacementId};
use serde::{Deserialize, Serialize};
use strum::Display;

/// The closed set of event types the engine publishes.
///
/// `Damage*` events fire *before* damage is applied and may be replaced
/// or prevented; `Damaged*` events fire after the state change commits.
#[derive(Debug, Hash, Ord, PartialOrd, Serialize, Deserialize, EnumSetType, Display)]
pub enum EventKind {
    AttackerDeclared,
    BlockerDeclared,
    CreatureBlocked,
    CreatureBlocks,
    DeclaredBlockers,
    UnblockedAttacker,
    CombatDamageAssigned,
    CombatDamageApplied,
    DamagePlayer,
    DamagePermanent,
    DamagedPlayer,
    DamagedPermanent,
    GainLife,
    ZoneChange,
    RemovedFromCombat,
    EndCombatStep,
}

/// A published game event.
///
/// Events are values: replacement effects rewrite them before delivery,
/// and the `applied_effects` list records which replacements have already
/// touched this event so none applies twice.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameEvent {
    pub kind: EventKind,

    /// The card which caused this event, if any.
    pub source: Option<CardId>,

    /// The card this event is about, if any.
    pub target: Option<CardId>,

    /// The player this event is about, if any.
    pub player: Option<PlayerName>,

    /// Numeric payload: damage amount, life change, etc.
    pub amount: i64,

    /// True if this event describes combat damage rather than damage from
    /// a spell or ability.
    pub combat: bool,

    /// Free-form annotations, e.g. the origin and destination zones of a
    /// zone change.
    pub metadata: BTreeMap<String, String>,

    /// Replacement effects which have already been applied to this event.
    pub applied_effects: Vec<ReplacementId>,
}

impl GameEvent {
    pub fn new(kind: EventKind) -> Self {
        Self {
            kind,
            source: None,
            target: None,
            player: None,
            amount: 0,
            combat: false,
            metadata: BTreeMap::new(),
            applied_effects: vec![],
        }
    }

    pub fn with_source(mut self, source: CardId) -> Self {
        self.source = Some(source);
        self
    }

    pub fn with_target(mut self, target: CardId) -> Self {
        self.target = Some(target);
        self
    }

    pub fn with_player(mut self, player: PlayerName) -> Self {
        self.player = Some(player);
        self
    }

    pub fn with_amount(mut self, amount: i64) -> Self {
        self.amount = amount;
        self
    }

    pub fn combat_damage(mut self) -> Self {
        self.combat = true;
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}
