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

use enumset::EnumSetType;
use serde::{Deserialize, Serialize};
use strum::Display;

/// Keyword abilities known to the rules engine.
///
/// Game logic never inspects a card's printed ability list directly; it
/// always asks the layer system for the card's *effective* abilities, so
/// that abilities granted or removed at runtime behave identically to
/// printed ones.
#[derive(Debug, Hash, Ord, PartialOrd, Serialize, Deserialize, EnumSetType, Display)]
pub enum Ability {
    Banding,
    Deathtouch,
    Defender,
    DoubleStrike,
    FirstStrike,
    Flying,
    Haste,
    Lifelink,
    /// "All creatures able to block this creature do so."
    Lure,
    Menace,
    Reach,
    Trample,
    /// Trample damage may be assigned to the planeswalker this creature is
    /// attacking, not only to players.
    TrampleOverPlaneswalkers,
    Unblockable,
    Vigilance,
}
