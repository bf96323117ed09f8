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
use primitives::game_primitives::{CardId, ObjectId, PlayerName};
use serde::{Deserialize, Serialize};

use crate::core::ability::Ability;
use crate::core::card_types::CardType;
use crate::core::numerics::{Damage, Power, Toughness};

/// A snapshot of a permanent's effective characteristics, taken
/// immediately before it left the battlefield.
///
/// Triggers which care about a creature dying match and resolve against
/// this snapshot rather than the card's post-move state: once a card is
/// in the graveyard it is a new object and its battlefield
/// characteristics (granted abilities, modified power, controller) are
/// no longer observable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LastKnownInfo {
    /// The card this snapshot describes.
    pub card_id: CardId,

    /// The object incarnation that left the battlefield.
    pub object_id: ObjectId,

    pub name: String,
    pub controller: PlayerName,
    pub owner: PlayerName,
    pub card_types: EnumSet<CardType>,
    pub abilities: EnumSet<Ability>,
    pub power: Power,
    pub toughness: Toughness,
    pub damage: Damage,

    /// True if the permanent was attacking when it left the battlefield.
    pub was_attacking: bool,

    /// True if the permanent was blocking when it left the battlefield.
    pub was_blocking: bool,
}
