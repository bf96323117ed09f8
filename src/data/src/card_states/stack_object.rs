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

use primitives::game_primitives::{
    CardId, EntityId, HasController, ObjectId, PlayerName, ReplacementId, StackObjectId,
};

use crate::card_states::last_known_info::LastKnownInfo;
#[allow(unused)] // Used in docs
use crate::game_states::game_state::GameState;

/// Which kind of object this is on the stack.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum StackObjectKind {
    /// A spell: a card being cast. The source card sits in the stack zone
    /// while this object exists.
    Spell,

    /// An activated ability of a card.
    ActivatedAbility,

    /// A triggered ability. Triggered abilities may legally resolve after
    /// their source has left its zone.
    TriggeredAbility,
}

/// The resolution payload of a stack object.
///
/// Invoked at most once, when the object resolves legally. The closure
/// receives the object itself so it can read chosen targets.
pub type StackEffect = Arc<dyn Fn(&mut GameState, &StackObject) + Send + Sync>;

/// A spell or ability on the stack.
#[derive(Clone)]
pub struct StackObject {
    pub id: StackObjectId,

    pub kind: StackObjectKind,

    /// The card this object is (for spells) or originates from (for
    /// abilities).
    pub source: CardId,

    /// The object incarnation of [Self::source] observed when this stack
    /// object was created. Used to detect that the source has since
    /// changed zones.
    pub source_object: ObjectId,

    pub controller: PlayerName,

    /// Chosen targets, pinned to the object incarnation observed at
    /// selection time. Revalidated on resolution.
    pub targets: Vec<EntityId>,

    /// The resolution payload.
    pub effect: StackEffect,

    /// Replacement effects which have already been applied to events
    /// created by this object, for non-reentrancy.
    pub applied_effects: Vec<ReplacementId>,

    /// For triggered abilities created by a permanent leaving the
    /// battlefield: the characteristics snapshot the ability resolves
    /// against.
    pub last_known: Option<LastKnownInfo>,
}

impl Debug for StackObject {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StackObject")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .field("source", &self.source)
            .field("controller", &self.controller)
            .field("targets", &self.targets)
            .finish()
    }
}

impl HasController for StackObject {
    fn controller(&self) -> PlayerName {
        self.controller
    }
}
