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
use primitives::game_primitives::{CardId, ReplacementId};

use crate::events::game_event::{EventKind, GameEvent};
use crate::game_states::game_state::GameState;
use crate::properties::duration::Duration;

/// The result of applying one replacement effect to an event.
pub enum Replaced {
    /// The event continues, possibly rewritten.
    Event(GameEvent),

    /// The event is fully consumed and will not be delivered.
    Consumed,
}

/// Predicate deciding whether a replacement effect applies to an event.
pub type AppliesFn = Arc<dyn Fn(&GameState, &GameEvent) -> bool + Send + Sync>;

/// Rewrites an event. Runs before the event is delivered; the rewritten
/// event re-enters replacement processing until no unapplied effect
/// remains.
pub type ReplaceFn = Arc<dyn Fn(&mut GameState, GameEvent) -> Replaced + Send + Sync>;

/// A registered replacement effect.
#[derive(Clone)]
pub struct ReplacementEffect {
    pub id: ReplacementId,

    /// Event types this effect can replace.
    pub kinds: EnumSet<EventKind>,

    /// The card this effect originates from, if any.
    pub source: Option<CardId>,

    /// True if this effect replaces events originating from its own
    /// source. Self-replacement effects are preferred over all others
    /// when several apply.
    pub self_scope: bool,

    pub duration: Duration,

    pub applies: AppliesFn,

    pub replace: ReplaceFn,
}

impl Debug for ReplacementEffect {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReplacementEffect")
            .field("id", &self.id)
            .field("kinds", &self.kinds)
            .field("source", &self.source)
            .field("self_scope", &self.self_scope)
            .finish()
    }
}

/// The set of registered replacement effects for a game.
///
/// The choose-and-apply loop lives in the rules crate's dispatcher; this
/// type only stores registrations and answers applicability queries.
#[derive(Debug, Clone, Default)]
pub struct ReplacementManager {
    effects: Vec<ReplacementEffect>,
    next_id: u64,
}

impl ReplacementManager {
    /// Registers a replacement effect. Returns its ID.
    pub fn register(
        &mut self,
        kinds: impl Into<EnumSet<EventKind>>,
        source: Option<CardId>,
        self_scope: bool,
        duration: Duration,
        applies: AppliesFn,
        replace: ReplaceFn,
    ) -> ReplacementId {
        let id = ReplacementId(self.next_id);
        self.next_id += 1;
        self.effects.push(ReplacementEffect {
            id,
            kinds: kinds.into(),
            source,
            self_scope,
            duration,
            applies,
            replace,
        });
        id
    }

    /// Removes a replacement effect registration.
    pub fn remove(&mut self, id: ReplacementId) {
        self.effects.retain(|effect| effect.id != id);
    }

    /// Looks up a registered effect.
    pub fn effect(&self, id: ReplacementId) -> Option<&ReplacementEffect> {
        self.effects.iter().find(|effect| effect.id == id)
    }

    /// IDs of effects which apply to the given event and have not already
    /// been applied to it, in registration order.
    pub fn applicable(&self, game: &GameState, event: &GameEvent) -> Vec<ReplacementId> {
        self.effects
            .iter()
            .filter(|effect| {
                effect.kinds.contains(event.kind)
                    && !event.applied_effects.contains(&effect.id)
                    && effect.duration.is_active(game)
                    && (*effect.applies)(game, event)
            })
            .map(|effect| effect.id)
            .collect()
    }
}
