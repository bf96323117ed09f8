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

use primitives::game_primitives::{PlayerName, ReplacementId};

use crate::events::game_event::GameEvent;
use crate::events::triggers::PendingTriggeredAbility;
use crate::game_states::game_state::GameState;

/// Decision interface for choices the rules delegate to a player.
///
/// The engine never blocks on player input while holding the game lock;
/// implementations must answer synchronously from available information.
/// Production deployments forward these to a policy layer; tests install
/// a deterministic stub.
pub trait Chooser: Send + Sync {
    /// Picks which of several applicable replacement effects to apply
    /// next. `options` is non-empty and lists effects in registration
    /// order; the affected player or controller makes this choice.
    fn choose_replacement(
        &self,
        game: &GameState,
        event: &GameEvent,
        options: &[ReplacementId],
    ) -> ReplacementId;

    /// Orders a single controller's simultaneous triggers before they go
    /// onto the stack. Returns indexes into `pending`; the default is
    /// queue order.
    fn order_triggers(
        &self,
        game: &GameState,
        controller: PlayerName,
        pending: &[PendingTriggeredAbility],
    ) -> Vec<usize> {
        let _ = (game, controller);
        (0..pending.len()).collect()
    }
}

/// Deterministic chooser which always takes the first option.
#[derive(Debug, Default, Clone, Copy)]
pub struct FirstChoice;

impl Chooser for FirstChoice {
    fn choose_replacement(
        &self,
        _game: &GameState,
        _event: &GameEvent,
        options: &[ReplacementId],
    ) -> ReplacementId {
        options[0]
    }
}
