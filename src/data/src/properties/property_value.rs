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

use enumset::{EnumSet, EnumSetType};
use primitives::game_primitives::PlayerName;

use crate::core::layer::EffectSortingKey;

/// Trait for effect payloads stored in a `CardProperty`.
pub trait PropertyValue {
    /// The layer/timestamp key this effect applies at.
    fn effect_sorting_key(&self) -> EffectSortingKey;
}

/// Effects over a set-valued characteristic (abilities, types).
#[derive(Debug, Clone, Copy)]
pub enum EnumSets<T: EnumSetType> {
    /// Overwrite the set entirely.
    Set(EffectSortingKey, EnumSet<T>),

    /// Add members to the set.
    Add(EffectSortingKey, EnumSet<T>),

    /// Remove members from the set.
    Remove(EffectSortingKey, EnumSet<T>),
}

impl<T: EnumSetType> PropertyValue for EnumSets<T> {
    fn effect_sorting_key(&self) -> EffectSortingKey {
        match self {
            EnumSets::Set(key, _) | EnumSets::Add(key, _) | EnumSets::Remove(key, _) => *key,
        }
    }
}

/// Effects over an integer-valued characteristic (power, toughness).
#[derive(Debug, Clone, Copy)]
pub enum Ints<T> {
    /// Overwrite the base value.
    Set(EffectSortingKey, T),

    /// Add to the value.
    Add(EffectSortingKey, T),
}

impl<T: Copy> PropertyValue for Ints<T> {
    fn effect_sorting_key(&self) -> EffectSortingKey {
        match self {
            Ints::Set(key, _) | Ints::Add(key, _) => *key,
        }
    }
}

/// Effects over a boolean characteristic.
#[derive(Debug, Clone, Copy)]
pub enum Flag {
    Overwrite(EffectSortingKey, bool),
}

impl PropertyValue for Flag {
    fn effect_sorting_key(&self) -> EffectSortingKey {
        match self {
            Flag::Overwrite(key, _) => *key,
        }
    }
}

/// Control-changing effects.
#[derive(Debug, Clone, Copy)]
pub enum ControlChange {
    Gain(EffectSortingKey, PlayerName),
}

impl PropertyValue for ControlChange {
    fn effect_sorting_key(&self) -> EffectSortingKey {
        match self {
            ControlChange::Gain(key, _) => *key,
        }
    }
}
