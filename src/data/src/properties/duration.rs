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

use primitives::game_primitives::{CardId, ObjectId, Zone};

use crate::card_states::zones::ZoneQueries;
use crate::game_states::game_state::{GameState, TurnData};

/// Controls how long a continuous or replacement effect applies.
#[derive(Debug, Clone, Copy)]
pub enum Duration {
    /// Effect applies until the end of the game.
    Continuous,

    /// Effect applies while the indicated object incarnation of a card is
    /// on the battlefield.
    WhileSourceOnBattlefield(CardId, ObjectId),

    /// Effect applies during the indicated turn only.
    ThisTurn(TurnData),
}

impl Duration {
    /// Returns true if effects with this duration currently apply.
    pub fn is_active(&self, game: &GameState) -> bool {
        match self {
            Duration::Continuous => true,
            Duration::WhileSourceOnBattlefield(card_id, object_id) => game
                .card(*card_id)
                .map(|card| card.zone == Zone::Battlefield && card.object_id == *object_id)
                .unwrap_or(false),
            Duration::ThisTurn(turn) => game.turn == *turn,
        }
    }
}
