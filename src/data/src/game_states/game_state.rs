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
use std::sync::Arc;

use enumset::{enum_set, EnumSet};
use primitives::game_primitives::{
    CardId, EntityId, GameId, HasPlayerName, PlayerName, StackObjectId,
};
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256StarStar;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::UnboundedSender;
use tracing::error;

use crate::card_states::card_state::CardState;
use crate::card_states::last_known_info::LastKnownInfo;
use crate::card_states::stack_object::StackObject;
use crate::card_states::zones::{ZoneQueries, Zones};
use crate::core::numerics::{LifeValue, TurnNumber};
use crate::events::event_bus::EventBus;
use crate::events::game_event::GameEvent;
use crate::events::replacement::ReplacementManager;
use crate::events::triggers::{PendingTriggeredAbility, TriggerRegistry};
use crate::game_states::combat_state::{CombatData, CombatGroup};
use crate::game_states::game_phase_step::GamePhaseStep;
use crate::player_states::player_state::{PlayerQueries, Players};
use crate::prompts::chooser::Chooser;

/// Identifies a turn within a game.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub struct TurnData {
    /// Player whose turn it is or was.
    pub active_player: PlayerName,

    /// Turn number for that player, starting at 0.
    pub turn_number: TurnNumber,
}

/// Status of the game: whether it is starting, is ongoing, or has ended.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub enum GameStatus {
    /// Initial game setup has not yet completed.
    Setup,

    Playing,

    /// The game is suspended and rejects mutations until resumed.
    Paused,

    GameOver { winners: EnumSet<PlayerName> },
}

/// Options controlling overall gameplay.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameConfiguration {
    /// Players participating in this game, in turn order.
    pub all_players: EnumSet<PlayerName>,

    pub starting_life: LifeValue,

    /// Maximum iterations of the replacement-effect loop for a single
    /// event before the game is marked with a rules error.
    pub maximum_replacements_per_event: usize,

    /// Maximum iterations of the state-based action loop before the game
    /// is marked with a rules error.
    pub maximum_state_based_iterations: usize,
}

impl Default for GameConfiguration {
    fn default() -> Self {
        Self {
            all_players: enum_set!(PlayerName::One | PlayerName::Two),
            starting_life: 20,
            maximum_replacements_per_event: 64,
            maximum_state_based_iterations: 128,
        }
    }
}

/// Incremental updates sent to the outbound observer channel.
#[derive(Debug, Clone)]
pub enum GameUpdate {
    /// An event was published (after replacement effects applied).
    Event(GameEvent),

    /// The game status changed.
    Status(GameStatus),
}

/// This is the complete state of a single ongoing game.
///
/// All mutation is serialized by the per-game lock in the engine crate;
/// nothing here is internally synchronized. Event delivery happens
/// synchronously on the mutating thread.
#[derive(Clone)]
pub struct GameState {
    /// Unique ID for this game.
    pub id: GameId,

    pub status: GameStatus,

    /// Current game phase step.
    pub step: GamePhaseStep,

    /// Identifies the player whose turn it currently is and the current
    /// turn number.
    pub turn: TurnData,

    /// Player who can currently take a game action.
    pub priority: PlayerName,

    /// Players whose last game action was to pass priority. When every
    /// player still in the game has passed, the current item on the stack
    /// resolves or the current step ends.
    pub passed: EnumSet<PlayerName>,

    pub configuration: GameConfiguration,

    /// State for the players within this game.
    pub players: Players,

    /// Stores state for all cards and stack objects and tracks which game
    /// zone they are in.
    pub zones: Zones,

    /// State of creatures participating in the currently active combat
    /// phase, if any.
    pub combat: Option<CombatData>,

    /// Combat groups from completed combat phases of the current turn.
    /// Supports attacked-this-turn queries; cleared at cleanup.
    pub former_groups: Vec<CombatGroup>,

    /// Event-bus subscriber registrations.
    pub bus: EventBus,

    /// Replacement-effect registrations.
    pub replacements: ReplacementManager,

    /// Trigger registrations.
    pub triggers: TriggerRegistry,

    /// Triggered abilities which have triggered but not yet been put on
    /// the stack. Drained in APNAP order before priority is granted.
    pub triggered_queue: Vec<PendingTriggeredAbility>,

    /// Characteristic snapshots of permanents which left the battlefield
    /// this turn, keyed by card. Cleared at cleanup.
    pub last_known: BTreeMap<CardId, LastKnownInfo>,

    /// Decision callback for choices the rules cannot make themselves:
    /// replacement-effect ordering and same-controller trigger ordering.
    pub chooser: Arc<dyn Chooser>,

    /// Channel on which to send game updates.
    ///
    /// If no channel is provided here, game mutations are applied
    /// silently.
    pub updates: Option<UnboundedSender<GameUpdate>>,

    /// Seed used to initialize the random number generator for this game.
    pub rng_seed: u64,

    /// Random number generator to use for this game.
    pub rng: Xoshiro256StarStar,

    /// Set when an internal invariant is violated. The game remains
    /// playable where possible; inspect this to surface diagnostics.
    pub rules_error: Option<String>,
}

impl GameState {
    pub fn new(
        id: GameId,
        configuration: GameConfiguration,
        chooser: Arc<dyn Chooser>,
        rng_seed: u64,
    ) -> Self {
        let players = Players::new(configuration.starting_life);
        Self {
            id,
            status: GameStatus::Setup,
            step: GamePhaseStep::Untap,
            turn: TurnData { active_player: PlayerName::One, turn_number: 0 },
            priority: PlayerName::One,
            passed: EnumSet::empty(),
            configuration,
            players,
            zones: Zones::default(),
            combat: None,
            former_groups: vec![],
            bus: EventBus::default(),
            replacements: ReplacementManager::default(),
            triggers: TriggerRegistry::default(),
            triggered_queue: vec![],
            last_known: BTreeMap::new(),
            chooser,
            updates: None,
            rng_seed,
            rng: Xoshiro256StarStar::seed_from_u64(rng_seed),
            rules_error: None,
        }
    }

    /// Returns the player whose turn it is.
    pub fn active_player(&self) -> PlayerName {
        self.turn.active_player
    }

    /// Players participating in the game who have not lost or left, in
    /// turn order.
    pub fn players_in_game(&self) -> Vec<PlayerName> {
        self.configuration
            .all_players
            .iter()
            .filter(|&name| {
                let player = self.players.player(name);
                !player.has_lost && !player.has_left
            })
            .collect()
    }

    /// Shuffles the order of cards in a player's library.
    pub fn shuffle_library(&mut self, player: PlayerName) {
        self.zones.shuffle_library(player, &mut self.rng)
    }

    /// The [EntityId] for the current object incarnation of a card.
    pub fn entity_id(&self, card_id: CardId) -> Option<EntityId> {
        Some(self.card(card_id)?.entity_id())
    }

    /// Records an internal invariant violation without halting the game.
    pub fn mark_rules_error(&mut self, message: impl Into<String>) {
        let message = message.into();
        error!(game_id = ?self.id, message, "Rules error");
        if self.rules_error.is_none() {
            self.rules_error = Some(message);
        }
    }

    /// Sends an update to the outbound observer channel, if attached.
    ///
    /// Failures mean the observer has gone away; updates are then applied
    /// silently.
    pub fn send_update(&self, update: GameUpdate) {
        if let Some(updates) = &self.updates {
            let _ = updates.send(update);
        }
    }

    pub fn clear_passed(&mut self) {
        self.passed = EnumSet::empty();
    }
}

impl ZoneQueries for GameState {
    fn card(&self, id: CardId) -> Option<&CardState> {
        self.zones.card(id)
    }

    fn card_mut(&mut self, id: CardId) -> Option<&mut CardState> {
        self.zones.card_mut(id)
    }

    fn stack_object(&self, id: StackObjectId) -> Option<&StackObject> {
        self.zones.stack_object(id)
    }

    fn stack_object_mut(&mut self, id: StackObjectId) -> Option<&mut StackObject> {
        self.zones.stack_object_mut(id)
    }

    fn library(&self, player: impl HasPlayerName) -> &VecDeque<CardId> {
        self.zones.library(player)
    }

    fn hand(&self, player: impl HasPlayerName) -> &BTreeSet<CardId> {
        self.zones.hand(player)
    }

    fn graveyard(&self, player: impl HasPlayerName) -> &VecDeque<CardId> {
        self.zones.graveyard(player)
    }

    fn battlefield(&self, player: impl HasPlayerName) -> &BTreeSet<CardId> {
        self.zones.battlefield(player)
    }

    fn exile(&self, player: impl HasPlayerName) -> &BTreeSet<CardId> {
        self.zones.exile(player)
    }

    fn stack(&self) -> &[StackObjectId] {
        self.zones.stack()
    }
}

impl PlayerQueries for GameState {
    fn player(&self, name: PlayerName) -> &crate::player_states::player_state::PlayerState {
        self.players.player(name)
    }

    fn player_mut(
        &mut self,
        name: PlayerName,
    ) -> &mut crate::player_states::player_state::PlayerState {
        self.players.player_mut(name)
    }
}
