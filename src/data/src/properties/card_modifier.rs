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

use primitives::game_primitives::Source;

use crate::game_states::game_state::GameState;
use crate::properties::duration::Duration;
use crate::properties::property_value::PropertyValue;

/// A single continuous effect applied to one card characteristic.
#[derive(Debug, Clone, Copy)]
pub struct CardModifier<TValue> {
    pub source: Source,
    pub duration: Duration,
    pub effect: TValue,
}

impl<TValue: PropertyValue> CardModifier<TValue> {
    /// Returns true if this modifier should currently be applied.
    pub fn active(&self, game: &GameState) -> bool {
        self.duration.is_active(game)
    }
}
