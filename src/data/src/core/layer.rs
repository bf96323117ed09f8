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

use primitives::game_primitives::Timestamp;

/// Represents a layer or sublayer for resolving continuous effects.
///
/// The values of an object's characteristics are determined by starting
/// with the printed object, then applying all continuous effects in a
/// series of layers in this order. Within a layer, effects apply in
/// timestamp order.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd)]
pub enum Layer {
    CopyEffects,
    ControlChangingEffects,
    TextChangingEffects,
    TypeChangingEffects,
    ColorChangingEffects,
    AbilityModifyingEffects,
    PowerToughnessSettingEffects,
    PowerToughnessModifyingEffects,
    PowerToughnessCounterEffects,
    PowerToughnessSwitchingEffects,
}

/// Sort key for a continuous effect: its layer, then its timestamp.
///
/// Dependencies between effects in the same layer are resolved by
/// applying them in ascending key order.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq, Ord, PartialOrd)]
pub struct EffectSortingKey {
    pub layer: Option<Layer>,
    pub timestamp: Option<Timestamp>,
}

impl EffectSortingKey {
    pub fn new(layer: Layer, timestamp: Timestamp) -> Self {
        Self { layer: Some(layer), timestamp: Some(timestamp) }
    }
}
