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

use std::fmt;

use enum_iterator::Sequence;
use enumset::{enum_set, EnumSet, EnumSetType};
use serde::{Deserialize, Serialize};
use slotmap::new_key_type;
use uuid::Uuid;

/// Identifies one of the players in a game.
///
/// Games are created with a fixed set of player slots; two-player games
/// simply never reference `Three` and `Four`.
#[derive(Debug, Hash, Ord, PartialOrd, Serialize, Deserialize, EnumSetType, Sequence)]
pub enum PlayerName {
    /// The player who takes the first turn of the game
    One,
    Two,
    Three,
    Four,
}

pub const ALL_POSSIBLE_PLAYERS: EnumSet<PlayerName> =
    enum_set!(PlayerName::One | PlayerName::Two | PlayerName::Three | PlayerName::Four);

impl fmt::Display for PlayerName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlayerName::One => write!(f, "Player One"),
            PlayerName::Two => write!(f, "Player Two"),
            PlayerName::Three => write!(f, "Player Three"),
            PlayerName::Four => write!(f, "Player Four"),
        }
    }
}

/// The zones of the game.
///
/// A card is always in exactly one zone; the `Zones` struct in the `data`
/// crate enforces this by moving IDs between indexes atomically.
#[derive(Debug, Hash, Ord, PartialOrd, Serialize, Deserialize, EnumSetType, Sequence)]
pub enum Zone {
    Library,
    Hand,
    Stack,
    Battlefield,
    Graveyard,
    Exiled,
    Command,
}

new_key_type! {
    /// Identifies a card or card-like object (token, emblem) in the card
    /// store.
    ///
    /// Card IDs are stable for the lifetime of a game. They do *not*
    /// distinguish between the "objects" a card becomes as it changes
    /// zones; pair with [ObjectId] where that matters.
    pub struct CardId;

    /// Identifies a spell or ability on the stack.
    pub struct StackObjectId;
}

/// Monotonic counter bumped every time a card changes zones.
///
/// The rules only 'remember' effects applied to a specific object: a card
/// that leaves and re-enters the battlefield is a new object, and stale
/// references to it (targets, pending triggers) must not resolve. Storing
/// the object ID observed at selection time and re-checking it on use is
/// how that staleness is detected.
#[derive(
    Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Default, Serialize, Deserialize,
)]
pub struct ObjectId(pub u64);

/// Ordering key for continuous effects.
///
/// Timestamps are assigned from a per-game counter when an effect is
/// registered and break ties between effects in the same layer.
#[derive(
    Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Default, Serialize, Deserialize,
)]
pub struct Timestamp(pub u64);

/// Identifies a registered replacement effect.
#[derive(
    Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Default, Serialize, Deserialize,
)]
pub struct ReplacementId(pub u64);

/// Identifies a registered event-bus subscriber.
#[derive(
    Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Default, Serialize, Deserialize,
)]
pub struct SubscriberId(pub u64);

/// Identifies a registered trigger.
#[derive(
    Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Default, Serialize, Deserialize,
)]
pub struct TriggerId(pub u64);

/// Unique identifier for a game.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub struct GameId(pub Uuid);

impl GameId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for GameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A game entity which can be referenced over time: a specific *object*
/// incarnation of a card, or a player.
///
/// Target lists store entity IDs so that resolution-time legality checks
/// can detect that a card changed zones after being targeted.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub enum EntityId {
    Card(CardId, ObjectId),
    Player(PlayerName),
}

impl EntityId {
    /// Returns the card ID for a card entity, ignoring object staleness.
    pub fn card_id(&self) -> Option<CardId> {
        match self {
            EntityId::Card(id, _) => Some(*id),
            EntityId::Player(_) => None,
        }
    }
}

/// The cause of a mutation or query, used for effect attribution.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub enum Source {
    /// Caused by the rules of the game themselves, e.g. a state-based
    /// action or a turn-based action.
    Game,

    /// Caused by an ability of or effect from the indicated card.
    Card(CardId),
}

impl Source {
    pub fn card_id(&self) -> Option<CardId> {
        match self {
            Source::Game => None,
            Source::Card(id) => Some(*id),
        }
    }
}

/// Trait for types which are or contain a [PlayerName].
pub trait HasPlayerName {
    fn player_name(&self) -> PlayerName;
}

impl HasPlayerName for PlayerName {
    fn player_name(&self) -> PlayerName {
        *self
    }
}

/// Trait for types which have a controlling player.
pub trait HasController {
    fn controller(&self) -> PlayerName;
}

/// Trait for types which can produce a [Source].
pub trait HasSource {
    fn source(&self) -> Source;
}

impl HasSource for Source {
    fn source(&self) -> Source {
        *self
    }
}

impl HasSource for CardId {
    fn source(&self) -> Source {
        Source::Card(*self)
    }
}
