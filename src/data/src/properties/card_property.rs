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

use std::ops::Add;

use enumset::{EnumSet, EnumSetType};
use primitives::game_primitives::PlayerName;

use crate::game_states::game_state::GameState;
use crate::properties::card_modifier::CardModifier;
use crate::properties::property_value::{ControlChange, EnumSets, Flag, Ints, PropertyValue};

/// The modifier list for one characteristic of one card.
///
/// Queries start from the printed baseline, collect the active modifiers,
/// and apply them in ascending (layer, timestamp) order. Dependencies
/// within a layer are therefore resolved by timestamp, which also makes
/// repeated queries deterministic.
#[derive(Debug, Clone)]
pub struct CardProperty<TValue> {
    modifiers: Vec<CardModifier<TValue>>,
}

impl<TValue> Default for CardProperty<TValue> {
    fn default() -> Self {
        Self { modifiers: vec![] }
    }
}

impl<TValue: PropertyValue> CardProperty<TValue> {
    pub fn add(&mut self, modifier: CardModifier<TValue>) {
        self.modifiers.push(modifier);
    }

    /// Drops modifiers which can never apply again, e.g. at end of turn.
    pub fn retain_active(&mut self, game: &GameState) {
        self.modifiers.retain(|modifier| modifier.active(game));
    }

    fn active_in_order<'a>(&'a self, game: &GameState) -> Vec<&'a CardModifier<TValue>> {
        let mut active: Vec<&CardModifier<TValue>> =
            self.modifiers.iter().filter(|modifier| modifier.active(game)).collect();
        active.sort_by_key(|modifier| modifier.effect.effect_sorting_key());
        active
    }
}

impl<T: EnumSetType> CardProperty<EnumSets<T>> {
    #[must_use]
    pub fn query(&self, game: &GameState, current: EnumSet<T>) -> EnumSet<T> {
        let mut result = current;
        for modifier in self.active_in_order(game) {
            match modifier.effect {
                EnumSets::Set(_, value) => result = value,
                EnumSets::Add(_, value) => result.insert_all(value),
                EnumSets::Remove(_, value) => result.remove_all(value),
            }
        }
        result
    }
}

impl<T: Copy + Add<Output = T>> CardProperty<Ints<T>> {
    #[must_use]
    pub fn query(&self, game: &GameState, current: T) -> T {
        let mut result = current;
        for modifier in self.active_in_order(game) {
            match modifier.effect {
                Ints::Set(_, value) => result = value,
                Ints::Add(_, value) => result = result + value,
            }
        }
        result
    }
}

impl CardProperty<Flag> {
    #[must_use]
    pub fn query(&self, game: &GameState, current: bool) -> bool {
        let mut result = current;
        for modifier in self.active_in_order(game) {
            match modifier.effect {
                Flag::Overwrite(_, value) => result = value,
            }
        }
        result
    }
}

impl CardProperty<ControlChange> {
    #[must_use]
    pub fn query(&self, game: &GameState, current: PlayerName) -> PlayerName {
        let mut result = current;
        for modifier in self.active_in_order(game) {
            match modifier.effect {
                ControlChange::Gain(_, player) => result = player,
            }
        }
        result
    }
}
