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

use std::fmt::{Debug, Formatter};
use std::sync::Arc;

use enumset::EnumSet;
use primitives::game_primitives::{CardId, ObjectId, PlayerName, TriggerId, Zone};

use crate::card_states::last_known_info::LastKnownInfo;
use crate::card_states::stack_object::StackObject;
use crate::events::game_event::{EventKind, GameEvent};
use crate::game_states::game_state::GameState;

/// Condition deciding whether a trigger fires for an event.
///
/// Conditions for dies-events should read the last-known-information
/// snapshot on the game state rather than the card itself, which has
/// already moved.
pub type TriggerCondition = Arc<dyn Fn(&GameState, &GameEvent) -> bool + Send + Sync>;

/// The effect of a triggered ability, run when it resolves from the
/// stack. Receives the event which caused the trigger and the resolving
/// stack object (whose `last_known` field carries the snapshot for
/// dies-triggers).
pub type TriggerEffectFn = Arc<dyn Fn(&mut GameState, &GameEvent, &StackObject) + Send + Sync>;

/// An event-matcher paired with a factory for a pending ability.
///
/// When a published event matches `kinds` and `condition`, the dispatcher
/// queues a [PendingTriggeredAbility]; the queue is drained onto the
/// stack in APNAP order before priority is next granted.
#[derive(Clone)]
pub struct Trigger {
    pub id: TriggerId,

    /// The card this trigger belongs to.
    pub source: CardId,

    /// Zones the source must be in for this trigger to fire. A
    /// dies-trigger includes the graveyard here since its source has
    /// already moved when the zone-change event is delivered.
    pub zones: EnumSet<Zone>,

    pub kinds: EnumSet<EventKind>,

    pub condition: TriggerCondition,

    pub effect: TriggerEffectFn,
}

impl Debug for Trigger {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Trigger")
            .field("id", &self.id)
            .field("source", &self.source)
            .field("kinds", &self.kinds)
            .finish()
    }
}

/// The set of registered triggers for a game.
#[derive(Debug, Clone, Default)]
pub struct TriggerRegistry {
    triggers: Vec<Trigger>,
    next_id: u64,
}

impl TriggerRegistry {
    /// Registers a trigger. Returns its ID.
    pub fn register(
        &mut self,
        source: CardId,
        zones: impl Into<EnumSet<Zone>>,
        kinds: impl Into<EnumSet<EventKind>>,
        condition: TriggerCondition,
        effect: TriggerEffectFn,
    ) -> TriggerId {
        let id = TriggerId(self.next_id);
        self.next_id += 1;
        self.triggers.push(Trigger {
            id,
            source,
            zones: zones.into(),
            kinds: kinds.into(),
            condition,
            effect,
        });
        id
    }

    /// Removes a trigger registration.
    pub fn remove(&mut self, id: TriggerId) {
        self.triggers.retain(|trigger| trigger.id != id);
    }

    /// Removes all triggers belonging to a card.
    pub fn remove_for_card(&mut self, card_id: CardId) {
        self.triggers.retain(|trigger| trigger.source != card_id);
    }

    pub fn len(&self) -> usize {
        self.triggers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triggers.is_empty()
    }

    /// The trigger at the given registration index, if it matches the
    /// event kind. Used by the dispatcher's index loop.
    pub fn matching_at(&self, index: usize, kind: EventKind) -> Option<&Trigger> {
        let trigger = self.triggers.get(index)?;
        trigger.kinds.contains(kind).then_some(trigger)
    }
}

/// A triggered ability which has triggered but has not yet been put on
/// the stack.
#[derive(Clone)]
pub struct PendingTriggeredAbility {
    pub trigger_id: TriggerId,

    pub source: CardId,

    /// Object incarnation of the source when the trigger fired.
    pub source_object: ObjectId,

    pub controller: PlayerName,

    /// The event which caused the trigger, preserved for the effect.
    pub event: GameEvent,

    pub effect: TriggerEffectFn,

    /// Snapshot for dies-triggers; resolves against the creature's
    /// characteristics as they last existed on the battlefield.
    pub last_known: Option<LastKnownInfo>,
}

impl Debug for PendingTriggeredAbility {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PendingTriggeredAbility")
            .field("trigger_id", &self.trigger_id)
            .field("source", &self.source)
            .field("controller", &self.controller)
            .finish()
    }
}
