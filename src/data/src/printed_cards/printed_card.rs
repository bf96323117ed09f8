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
use serde::{Deserialize, Serialize};

use crate::core::ability::Ability;
use crate::core::card_types::CardType;
use crate::core::numerics::{Loyalty, Power, Toughness};

/// A printed power or toughness value.
///
/// Most cards print a fixed number; some print `*`, whose value is defined
/// by a characteristic-setting effect and is otherwise zero.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
pub enum PrintedValue {
    Fixed(i64),
    Star,
}

impl PrintedValue {
    /// The baseline numeric value before any continuous effects apply.
    pub fn base_value(&self) -> i64 {
        match self {
            PrintedValue::Fixed(value) => *value,
            PrintedValue::Star => 0,
        }
    }
}

/// The printed characteristics of a card, supplied by the card catalog.
///
/// The engine treats the catalog as an external collaborator: it never
/// looks cards up by name itself. A [PrintedCard] is attached to each
/// card instance at creation time and acts only as the baseline the
/// layer system starts from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrintedCard {
    pub name: String,
    pub card_types: EnumSet<CardType>,
    pub subtypes: Vec<String>,
    pub power: Option<PrintedValue>,
    pub toughness: Option<PrintedValue>,
    pub abilities: EnumSet<Ability>,
    pub loyalty: Option<Loyalty>,
}

impl PrintedCard {
    /// A creature card with the given stats and no abilities.
    pub fn vanilla_creature(name: impl Into<String>, power: Power, toughness: Toughness) -> Self {
        Self {
            name: name.into(),
            card_types: EnumSet::only(CardType::Creature),
            subtypes: vec![],
            power: Some(PrintedValue::Fixed(power)),
            toughness: Some(PrintedValue::Fixed(toughness)),
            abilities: EnumSet::empty(),
            loyalty: None,
        }
    }

    /// A creature card with the given stats and keyword abilities.
    pub fn keyword_creature(
        name: impl Into<String>,
        power: Power,
        toughness: Toughness,
        abilities: impl Into<EnumSet<Ability>>,
    ) -> Self {
        Self { abilities: abilities.into(), ..Self::vanilla_creature(name, power, toughness) }
    }

    /// A planeswalker card with the given starting loyalty.
    pub fn planeswalker(name: impl Into<String>, loyalty: Loyalty) -> Self {
        Self {
            name: name.into(),
            card_types: EnumSet::only(CardType::Planeswalker),
            subtypes: vec![],
            power: None,
            toughness: None,
            abilities: EnumSet::empty(),
            loyalty: Some(loyalty),
        }
    }
}
