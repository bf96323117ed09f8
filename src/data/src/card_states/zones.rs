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

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use enum_iterator::all;
use primitives::game_primitives::{
    CardId, HasPlayerName, ObjectId, PlayerName, StackObjectId, Timestamp, Zone,
};
use rand::prelude::SliceRandom;
use rand_xoshiro::Xoshiro256StarStar;
use serde::{Deserialize, Serialize};
use tracing::debug;
use utils::outcome;
use utils::outcome::Outcome;

use crate::card_states::card_state::{CardFacing, CardKind, CardState, TappedState};
use crate::card_states::counters::{CounterKind, Counters};
use crate::card_states::stack_object::StackObject;
use crate::game_states::game_state::TurnData;
use crate::printed_cards::printed_card::PrintedCard;
use crate::properties::card_properties::CardProperties;

/// Queries for cards and zone contents.
///
/// Implemented by [Zones] and re-exported on `GameState` so call sites can
/// ask the game directly.
pub trait ZoneQueries {
    /// Looks up the state for a card.
    ///
    /// Returns None if this card ID does not exist, e.g. the ID of a token
    /// which has been destroyed.
    fn card(&self, id: CardId) -> Option<&CardState>;

    /// Mutable equivalent of [Self::card].
    fn card_mut(&mut self, id: CardId) -> Option<&mut CardState>;

    /// Returns true if a card with the given ID currently exists.
    fn has_card(&self, id: CardId) -> bool {
        self.card(id).is_some()
    }

    /// Looks up a spell or ability on the stack.
    fn stack_object(&self, id: StackObjectId) -> Option<&StackObject>;

    /// Mutable equivalent of [Self::stack_object].
    fn stack_object_mut(&mut self, id: StackObjectId) -> Option<&mut StackObject>;

    /// IDs of cards owned by a player in their library, in order (the
    /// `.back()` element is the top card).
    fn library(&self, player: impl HasPlayerName) -> &VecDeque<CardId>;

    /// IDs of cards owned by a player in their hand.
    fn hand(&self, player: impl HasPlayerName) -> &BTreeSet<CardId>;

    /// IDs of cards owned by a player in their graveyard, in order (the
    /// `.back()` element is the top card).
    fn graveyard(&self, player: impl HasPlayerName) -> &VecDeque<CardId>;

    /// IDs of permanents *controlled* by a player on the battlefield.
    fn battlefield(&self, player: impl HasPlayerName) -> &BTreeSet<CardId>;

    /// IDs of cards owned by a player in exile.
    fn exile(&self, player: impl HasPlayerName) -> &BTreeSet<CardId>;

    /// IDs of all spells and abilities on the stack (the last element is
    /// the top of the stack).
    fn stack(&self) -> &[StackObjectId];
}

/// Cards in an unordered zone, indexed per player.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct UnorderedZone {
    cards: BTreeMap<PlayerName, BTreeSet<CardId>>,
}

impl Default for UnorderedZone {
    fn default() -> Self {
        Self { cards: all::<PlayerName>().map(|player| (player, BTreeSet::new())).collect() }
    }
}

impl UnorderedZone {
    fn cards(&self, player: PlayerName) -> &BTreeSet<CardId> {
        self.cards.get(&player).expect("player index missing")
    }

    fn cards_mut(&mut self, player: PlayerName) -> &mut BTreeSet<CardId> {
        self.cards.get_mut(&player).expect("player index missing")
    }
}

/// Cards in an ordered zone, indexed per player.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct OrderedZone {
    cards: BTreeMap<PlayerName, VecDeque<CardId>>,
}

impl Default for OrderedZone {
    fn default() -> Self {
        Self { cards: all::<PlayerName>().map(|player| (player, VecDeque::new())).collect() }
    }
}

impl OrderedZone {
    fn cards(&self, player: PlayerName) -> &VecDeque<CardId> {
        self.cards.get(&player).expect("player index missing")
    }

    fn cards_mut(&mut self, player: PlayerName) -> &mut VecDeque<CardId> {
        self.cards.get_mut(&player).expect("player index missing")
    }
}

/// Stores the state & position of all cards and card-like objects.
///
/// A card is in exactly one zone at any time; all moves between zone
/// indexes go through [Zones::move_card] so the indexes can never
/// disagree with the per-card zone tag.
#[derive(Debug, Clone, Default)]
pub struct Zones {
    all_cards: slotmap::SlotMap<CardId, CardState>,
    stack_objects: slotmap::SlotMap<StackObjectId, StackObject>,
    next_object_id: ObjectId,
    next_timestamp: Timestamp,
    libraries: OrderedZone,
    hands: UnorderedZone,
    graveyards: OrderedZone,
    battlefield: UnorderedZone,
    exile: UnorderedZone,
    stack: Vec<StackObjectId>,
}

impl Zones {
    /// Allocates a new object ID for a zone move.
    pub fn new_object_id(&mut self) -> ObjectId {
        let result = self.next_object_id;
        self.next_object_id = ObjectId(result.0 + 1);
        result
    }

    /// Allocates a new timestamp for a continuous effect.
    pub fn new_timestamp(&mut self) -> Timestamp {
        let result = self.next_timestamp;
        self.next_timestamp = Timestamp(result.0 + 1);
        result
    }

    /// Creates a new card owned by `owner` in the indicated zone.
    pub fn create_card(
        &mut self,
        owner: PlayerName,
        kind: CardKind,
        printed: PrintedCard,
        zone: Zone,
        turn: TurnData,
    ) -> CardId {
        let object_id = self.new_object_id();
        let mut counters = Counters::default();
        if let Some(loyalty) = printed.loyalty {
            counters.set(CounterKind::Loyalty, loyalty);
        }
        let id = self.all_cards.insert_with_key(|id| CardState {
            id,
            object_id,
            kind,
            owner,
            controller: owner,
            zone,
            facing: if zone == Zone::Battlefield { CardFacing::FaceUp } else { CardFacing::FaceDown },
            tapped_state: TappedState::Untapped,
            revealed_to: Default::default(),
            counters,
            damage: 0,
            damage_sources: BTreeMap::new(),
            deathtouched: false,
            attacking: None,
            blocking: vec![],
            attached_to: None,
            entered_current_zone: turn,
            last_changed_control: turn,
            printed,
            properties: CardProperties::default(),
        });
        self.add_to_zone_index(id, zone);
        id
    }

    /// Moves a card between zone indexes, updating its zone tag and
    /// assigning it a new [ObjectId].
    ///
    /// Callers are expected to use the `move_card` module in the rules
    /// crate, which layers events, snapshots, and combat removal on top
    /// of this index update.
    pub fn move_card(&mut self, id: CardId, zone: Zone, turn: TurnData) -> Outcome {
        self.remove_from_zone_index(id)?;
        let object_id = self.new_object_id();
        let card = self.all_cards.get_mut(id)?;
        debug!(?id, ?zone, "Moving card to zone");
        card.zone = zone;
        card.object_id = object_id;
        card.entered_current_zone = turn;
        self.add_to_zone_index(id, zone);
        outcome::OK
    }

    /// Moves a battlefield index entry between controllers.
    pub fn change_battlefield_controller(
        &mut self,
        id: CardId,
        from: PlayerName,
        to: PlayerName,
    ) -> Outcome {
        if self.battlefield.cards_mut(from).remove(&id) {
            self.battlefield.cards_mut(to).insert(id);
            outcome::OK
        } else {
            outcome::SKIPPED
        }
    }

    /// Permanently removes a card, for tokens which have left the
    /// battlefield.
    pub fn destroy_card(&mut self, id: CardId) -> Outcome {
        self.remove_from_zone_index(id)?;
        self.all_cards.remove(id)?;
        outcome::OK
    }

    /// Iterator over all cards in the game, in any zone.
    pub fn all_cards(&self) -> impl Iterator<Item = &CardState> {
        self.all_cards.values()
    }

    /// Mutable equivalent of [Self::all_cards].
    pub fn all_cards_mut(&mut self) -> impl Iterator<Item = &mut CardState> {
        self.all_cards.values_mut()
    }

    /// Shuffles the order of cards in a player's library.
    pub fn shuffle_library(&mut self, player: PlayerName, rng: &mut Xoshiro256StarStar) {
        self.libraries.cards_mut(player).make_contiguous().shuffle(rng);
    }

    /// Adds a new stack object to the top of the stack.
    pub fn push_stack_object(
        &mut self,
        build: impl FnOnce(StackObjectId) -> StackObject,
    ) -> StackObjectId {
        let id = self.stack_objects.insert_with_key(build);
        self.stack.push(id);
        id
    }

    /// Removes the top object of the stack and returns it.
    pub fn pop_stack_object(&mut self) -> Option<StackObject> {
        let id = self.stack.pop()?;
        self.stack_objects.remove(id)
    }

    /// Removes a specific object from the stack, e.g. when countered.
    pub fn remove_stack_object(&mut self, id: StackObjectId) -> Option<StackObject> {
        self.stack.retain(|&item| item != id);
        self.stack_objects.remove(id)
    }

    fn add_to_zone_index(&mut self, id: CardId, zone: Zone) {
        let Some(card) = self.all_cards.get(id) else {
            return;
        };
        let owner = card.owner;
        let controller = card.controller;
        match zone {
            Zone::Library => self.libraries.cards_mut(owner).push_back(id),
            Zone::Hand => {
                self.hands.cards_mut(owner).insert(id);
            }
            Zone::Graveyard => self.graveyards.cards_mut(owner).push_back(id),
            Zone::Battlefield => {
                self.battlefield.cards_mut(controller).insert(id);
            }
            Zone::Exiled => {
                self.exile.cards_mut(owner).insert(id);
            }
            Zone::Stack | Zone::Command => {}
        }
    }

    fn remove_from_zone_index(&mut self, id: CardId) -> Outcome {
        let card = self.all_cards.get(id)?;
        let owner = card.owner;
        let controller = card.controller;
        match card.zone {
            Zone::Library => self.libraries.cards_mut(owner).retain(|&card_id| card_id != id),
            Zone::Hand => {
                self.hands.cards_mut(owner).remove(&id);
            }
            Zone::Graveyard => self.graveyards.cards_mut(owner).retain(|&card_id| card_id != id),
            Zone::Battlefield => {
                self.battlefield.cards_mut(controller).remove(&id);
            }
            Zone::Exiled => {
                self.exile.cards_mut(owner).remove(&id);
            }
            Zone::Stack | Zone::Command => {}
        }
        outcome::OK
    }
}

impl ZoneQueries for Zones {
    fn card(&self, id: CardId) -> Option<&CardState> {
        self.all_cards.get(id)
    }

    fn card_mut(&mut self, id: CardId) -> Option<&mut CardState> {
        self.all_cards.get_mut(id)
    }

    fn stack_object(&self, id: StackObjectId) -> Option<&StackObject> {
        self.stack_objects.get(id)
    }

    fn stack_object_mut(&mut self, id: StackObjectId) -> Option<&mut StackObject> {
        self.stack_objects.get_mut(id)
    }

    fn library(&self, player: impl HasPlayerName) -> &VecDeque<CardId> {
        self.libraries.cards(player.player_name())
    }

    fn hand(&self, player: impl HasPlayerName) -> &BTreeSet<CardId> {
        self.hands.cards(player.player_name())
    }

    fn graveyard(&self, player: impl HasPlayerName) -> &VecDeque<CardId> {
        self.graveyards.cards(player.player_name())
    }

    fn battlefield(&self, player: impl HasPlayerName) -> &BTreeSet<CardId> {
        self.battlefield.cards(player.player_name())
    }

    fn exile(&self, player: impl HasPlayerName) -> &BTreeSet<CardId> {
        self.exile.cards(player.player_name())
    }

    fn stack(&self) -> &[StackObjectId] {
        &self.stack
    }
}
