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
use primitives::game_primitives::SubscriberId;

use crate::core::game_error::GameError;
use crate::events::game_event::{EventKind, GameEvent};
use crate::game_states::game_state::GameState;

/// Callback invoked when a subscribed event is delivered.
///
/// Subscribers run synchronously on the game worker with the state lock
/// held; they must not re-acquire it. A subscriber that needs follow-up
/// work appends to the triggered-ability queue and returns.
pub type SubscriberFn = Arc<dyn Fn(&mut GameState, &GameEvent) -> Result<(), GameError> + Send + Sync>;

/// A registered event-bus subscriber.
#[derive(Clone)]
pub struct Subscriber {
    pub id: SubscriberId,
    pub kinds: EnumSet<EventKind>,
    pub callback: SubscriberFn,
}

impl Debug for Subscriber {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscriber").field("id", &self.id).field("kinds", &self.kinds).finish()
    }
}

/// Synchronous in-order publish/subscribe keyed by event type.
///
/// Delivery itself lives in the rules crate's dispatcher, which needs
/// `&mut GameState`; the bus only stores registrations. Subscribers for a
/// type are invoked in registration order, and a failing subscriber never
/// prevents delivery to the rest.
#[derive(Debug, Clone, Default)]
pub struct EventBus {
    subscribers: Vec<Subscriber>,
    next_id: u64,
}

impl EventBus {
    /// Registers a subscriber for the given event kinds. Returns its ID.
    pub fn subscribe(
        &mut self,
        kinds: impl Into<EnumSet<EventKind>>,
        callback: SubscriberFn,
    ) -> SubscriberId {
        let id = SubscriberId(self.next_id);
        self.next_id += 1;
        self.subscribers.push(Subscriber { id, kinds: kinds.into(), callback });
        id
    }

    /// Removes a subscriber registration.
    pub fn unsubscribe(&mut self, id: SubscriberId) {
        self.subscribers.retain(|subscriber| subscriber.id != id);
    }

    /// Number of registered subscribers.
    pub fn len(&self) -> usize {
        self.subscribers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }

    /// The subscriber at the given registration index, if it matches the
    /// event kind. Used by the dispatcher's index loop.
    pub fn matching_at(&self, index: usize, kind: EventKind) -> Option<&Subscriber> {
        let subscriber = self.subscribers.get(index)?;
        subscriber.kinds.contains(kind).then_some(subscriber)
    }
}
