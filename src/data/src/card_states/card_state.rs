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

use std::collections::BTreeMap;

use enumset::EnumSet;
use primitives::game_primitives::{
    CardId, EntityId, HasController, HasPlayerName, ObjectId, PlayerName, Zone,
};
use serde::{Deserialize, Serialize};

use crate::card_states::counters::Counters;
use crate::core::numerics::Damage;
use crate::game_states::combat_state::AttackTarget;
#[allow(unused)] // Used in docs
use crate::game_states::game_state::GameState;
use crate::game_states::game_state::TurnData;
use crate::printed_cards::printed_card::PrintedCard;
use crate::properties::card_properties::CardProperties;

/// Describes which kind of card-like object this is.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub enum CardKind {
    /// A normal card which came from a deck.
    Normal,

    /// A token, which ceases to exist when it leaves the battlefield.
    Token,
}

/// Whether a card is tapped or untapped.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub enum TappedState {
    Untapped,
    Tapped,
}

impl TappedState {
    pub fn is_tapped(self) -> bool {
        self == TappedState::Tapped
    }
}

/// Facing for a card.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub enum CardFacing {
    FaceDown,
    FaceUp,
}

/// Represents the state of a card or card-like object in some zone.
///
/// The printed characteristics stored here are only a baseline: all game
/// logic reads a card's *effective* characteristics through the query
/// functions in the rules crate, which apply continuous effects in layer
/// order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardState {
    /// Unique identifier for this card in the card store. Stable for the
    /// lifetime of the game.
    pub id: CardId,

    /// Object counter for this card, bumped on every zone change.
    ///
    /// Effects which 'remember' a card record the object ID they observed;
    /// a mismatch on re-check means the card has since changed zones. Do
    /// not mutate this field directly, use the `move_card` module instead.
    pub object_id: ObjectId,

    /// Describes which kind of card-like object this is.
    pub kind: CardKind,

    /// The player who owns this card. Do not mutate this field.
    pub owner: PlayerName,

    /// The player who can currently make decisions about this card.
    ///
    /// Control-changing continuous effects are layered on top of this
    /// baseline; read control through the card queries, not this field.
    pub controller: PlayerName,

    /// Current game zone location for this card.
    ///
    /// Do not mutate this field directly, use the `move_card` module
    /// instead.
    pub zone: Zone,

    /// Whether this card is currently face down.
    pub facing: CardFacing,

    /// Whether this card is currently tapped.
    ///
    /// A card that is not on the battlefield is always untapped.
    pub tapped_state: TappedState,

    /// Players this card has been revealed to.
    pub revealed_to: EnumSet<PlayerName>,

    /// Counters on this card.
    pub counters: Counters,

    /// Damage marked on this card.
    ///
    /// A card that is not on the battlefield always has 0 damage.
    pub damage: Damage,

    /// Damage marked on this card broken down by the card which dealt it,
    /// for lifelink and attribution queries. The sum of this map never
    /// exceeds [Self::damage].
    pub damage_sources: BTreeMap<CardId, Damage>,

    /// True if a source with deathtouch has dealt damage to this card
    /// since damage was last cleared.
    pub deathtouched: bool,

    /// If this creature is attacking, what it is attacking.
    pub attacking: Option<AttackTarget>,

    /// Attackers this creature is blocking, in declaration order.
    pub blocking: Vec<CardId>,

    /// The permanent this card is attached to, for Auras and Equipment.
    pub attached_to: Option<CardId>,

    /// Turn on which this card last entered its current zone. Used with
    /// [Self::last_changed_control] to determine summoning sickness. Do
    /// not mutate this field directly, use the `move_card` module instead.
    pub entered_current_zone: TurnData,

    /// Turn on which this card gained its current controller.
    pub last_changed_control: TurnData,

    /// The printed characteristics of this card, supplied by the catalog.
    pub printed: PrintedCard,

    /// Continuous-effect modifier lists for this card's characteristics.
    ///
    /// Not serialized; effects are re-registered when a game is rebuilt
    /// from external storage.
    #[serde(skip)]
    pub properties: CardProperties,
}

impl CardState {
    /// Returns the [EntityId] for the current object incarnation of this
    /// card.
    pub fn entity_id(&self) -> EntityId {
        EntityId::Card(self.id, self.object_id)
    }

    /// True if this creature is currently attacking.
    pub fn is_attacking(&self) -> bool {
        self.attacking.is_some()
    }

    /// True if this creature is currently blocking.
    pub fn is_blocking(&self) -> bool {
        !self.blocking.is_empty()
    }

    /// Clears combat participation and marked damage, at end of combat.
    pub fn clear_combat_state(&mut self) {
        self.attacking = None;
        self.blocking.clear();
        self.damage = 0;
        self.damage_sources.clear();
        self.deathtouched = false;
    }
}

impl HasPlayerName for &CardState {
    fn player_name(&self) -> PlayerName {
        self.owner
    }
}

impl HasController for CardState {
    fn controller(&self) -> PlayerName {
        self.controller
    }
}
