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

use enumset::EnumSet;
use primitives::game_primitives::{PlayerName, Source, Timestamp};

use crate::core::ability::Ability;
use crate::core::card_types::CardType;
use crate::core::layer::{EffectSortingKey, Layer};
use crate::core::numerics::{Power, Toughness};
use crate::properties::card_modifier::CardModifier;
use crate::properties::card_property::CardProperty;
use crate::properties::duration::Duration;
use crate::properties::property_value::{ControlChange, EnumSets, Flag, Ints};

/// Continuous-effect modifier lists for every queryable characteristic of
/// one card.
///
/// Registration helpers pin each effect to its correct layer; queries in
/// the rules crate compose these over the printed baseline.
#[derive(Debug, Clone, Default)]
pub struct CardProperties {
    /// Modifiers to this card's ability set.
    pub abilities: CardProperty<EnumSets<Ability>>,

    /// Modifiers to this card's type set.
    pub card_types: CardProperty<EnumSets<CardType>>,

    /// Modifiers to this card's power.
    pub power: CardProperty<Ints<Power>>,

    /// Modifiers to this card's toughness.
    pub toughness: CardProperty<Ints<Toughness>>,

    /// Control-changing effects applied to this card.
    pub controller: CardProperty<ControlChange>,

    /// Power/toughness switching effects applied to this card.
    pub pt_switched: CardProperty<Flag>,
}

impl CardProperties {
    /// Grants abilities to this card for the given duration.
    pub fn gain_abilities(
        &mut self,
        source: Source,
        duration: Duration,
        timestamp: Timestamp,
        abilities: impl Into<EnumSet<Ability>>,
    ) {
        self.abilities.add(CardModifier {
            source,
            duration,
            effect: EnumSets::Add(
                EffectSortingKey::new(Layer::AbilityModifyingEffects, timestamp),
                abilities.into(),
            ),
        });
    }

    /// Removes abilities from this card for the given duration.
    pub fn lose_abilities(
        &mut self,
        source: Source,
        duration: Duration,
        timestamp: Timestamp,
        abilities: impl Into<EnumSet<Ability>>,
    ) {
        self.abilities.add(CardModifier {
            source,
            duration,
            effect: EnumSets::Remove(
                EffectSortingKey::new(Layer::AbilityModifyingEffects, timestamp),
                abilities.into(),
            ),
        });
    }

    /// Adds card types to this card for the given duration.
    pub fn gain_types(
        &mut self,
        source: Source,
        duration: Duration,
        timestamp: Timestamp,
        types: impl Into<EnumSet<CardType>>,
    ) {
        self.card_types.add(CardModifier {
            source,
            duration,
            effect: EnumSets::Add(
                EffectSortingKey::new(Layer::TypeChangingEffects, timestamp),
                types.into(),
            ),
        });
    }

    /// Sets this card's base power and toughness.
    pub fn set_power_toughness(
        &mut self,
        source: Source,
        duration: Duration,
        timestamp: Timestamp,
        power: Power,
        toughness: Toughness,
    ) {
        let key = EffectSortingKey::new(Layer::PowerToughnessSettingEffects, timestamp);
        self.power.add(CardModifier { source, duration, effect: Ints::Set(key, power) });
        self.toughness.add(CardModifier { source, duration, effect: Ints::Set(key, toughness) });
    }

    /// Applies a +N/+N style modifier to this card.
    pub fn add_power_toughness(
        &mut self,
        source: Source,
        duration: Duration,
        timestamp: Timestamp,
        power: Power,
        toughness: Toughness,
    ) {
        let key = EffectSortingKey::new(Layer::PowerToughnessModifyingEffects, timestamp);
        self.power.add(CardModifier { source, duration, effect: Ints::Add(key, power) });
        self.toughness.add(CardModifier { source, duration, effect: Ints::Add(key, toughness) });
    }

    /// Switches this card's power and toughness.
    pub fn switch_power_toughness(
        &mut self,
        source: Source,
        duration: Duration,
        timestamp: Timestamp,
    ) {
        self.pt_switched.add(CardModifier {
            source,
            duration,
            effect: Flag::Overwrite(
                EffectSortingKey::new(Layer::PowerToughnessSwitchingEffects, timestamp),
                true,
            ),
        });
    }

    /// Gives control of this card to another player.
    pub fn gain_control(
        &mut self,
        source: Source,
        duration: Duration,
        timestamp: Timestamp,
        player: PlayerName,
    ) {
        self.controller.add(CardModifier {
            source,
            duration,
            effect: ControlChange::Gain(
                EffectSortingKey::new(Layer::ControlChangingEffects, timestamp),
                player,
            ),
        });
    }
}
