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

use primitives::game_primitives::{HasPlayerName, PlayerName};
use serde::{Deserialize, Serialize};

use crate::core::numerics::LifeValue;

pub trait PlayerQueries {
    /// Looks up a player by name.
    fn player(&self, name: PlayerName) -> &PlayerState;

    /// Mutable version of [Self::player].
    fn player_mut(&mut self, name: PlayerName) -> &mut PlayerState;
}

/// Represents the state of a single player within a game.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerState {
    pub name: PlayerName,

    /// Current life total. May be negative; a non-positive life total is
    /// a loss condition applied by state-based actions, not here.
    pub life: LifeValue,

    /// Poison counters. Ten or more is a loss condition.
    pub poison: u64,

    /// True if this player has lost the game. A player who has lost never
    /// holds priority again and never blocks the stack from resolving.
    pub has_lost: bool,

    /// True if this player has left the game.
    pub has_left: bool,

    /// True if this player attempted to draw from an empty library, which
    /// is a loss condition checked by state-based actions.
    pub drew_from_empty_library: bool,
}

impl PlayerState {
    pub fn new(name: PlayerName, life: LifeValue) -> Self {
        Self {
            name,
            life,
            poison: 0,
            has_lost: false,
            has_left: false,
            drew_from_empty_library: false,
        }
    }

    /// True if this player is still participating in the game.
    pub fn is_in_game(&self) -> bool {
        !self.has_lost && !self.has_left
    }
}

impl HasPlayerName for &PlayerState {
    fn player_name(&self) -> PlayerName {
        self.name
    }
}

/// Represents the state of players within a game.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Players {
    player_1: PlayerState,
    player_2: PlayerState,
    player_3: PlayerState,
    player_4: PlayerState,
}

impl Players {
    pub fn new(starting_life: LifeValue) -> Self {
        Self {
            player_1: PlayerState::new(PlayerName::One, starting_life),
            player_2: PlayerState::new(PlayerName::Two, starting_life),
            player_3: PlayerState::new(PlayerName::Three, starting_life),
            player_4: PlayerState::new(PlayerName::Four, starting_life),
        }
    }
}

impl PlayerQueries for Players {
    fn player(&self, name: PlayerName) -> &PlayerState {
        match name {
            PlayerName::One => &self.player_1,
            PlayerName::Two => &self.player_2,
            PlayerName::Three => &self.player_3,
            PlayerName::Four => &self.player_4,
        }
    }

    fn player_mut(&mut self, name: PlayerName) -> &mut PlayerState {
        match name {
            PlayerName::One => &mut self.player_1,
            PlayerName::Two => &mut self.player_2,
            PlayerName::Three => &mut self.player_3,
            PlayerName::Four => &mut self.player_4,
        }
    }
}
