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

//! The engine boundary.
//!
//! One [GameEngine] hosts many games. Each game is guarded by its own
//! `RwLock`: public mutating operations take the write lock, queries
//! take the read lock, and event delivery happens synchronously under
//! the writer. The engine never blocks on I/O while holding a lock;
//! player decisions arrive as separate API calls.

use std::collections::BTreeMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use dashmap::DashMap;
use data::actions::game_action::{ClientAction, CombatAction, GameAction, PlayerActionName};
use data::card_states::card_state::CardKind;
use data::core::game_error::{GameError, GameResult};
use data::core::numerics::Damage;
use data::events::event_bus::SubscriberFn;
use data::events::game_event::EventKind;
use data::events::replacement::{AppliesFn, ReplaceFn};
use data::events::triggers::{TriggerCondition, TriggerEffectFn};
use data::game_states::combat_state::AttackTarget;
use data::game_states::game_state::{
    GameConfiguration, GameState, GameStatus, GameUpdate,
};
use data::player_states::player_state::PlayerQueries;
use data::printed_cards::card_catalog::CardCatalog;
use data::printed_cards::printed_card::PrintedCard;
use data::prompts::chooser::Chooser;
use data::properties::duration::Duration;
use enumset::EnumSet;
use primitives::game_primitives::{
    CardId, GameId, PlayerName, ReplacementId, SubscriberId, TriggerId, Zone,
};
use rules::action_handlers::actions;
use rules::combat::{blocks, cleanup, damage, declare};
use rules::mutations::{move_card, state_based_actions};
use rules::queries::{card_queries, combat_queries};
use tokio::sync::mpsc;
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{info, instrument};

use crate::views;
use crate::views::{CombatView, GameView};

/// Hosts games and serializes access to them.
pub struct GameEngine {
    games: DashMap<GameId, Arc<RwLock<GameState>>>,
    catalog: Arc<dyn CardCatalog>,
    chooser: Arc<dyn Chooser>,
}

impl GameEngine {
    pub fn new(catalog: Arc<dyn CardCatalog>, chooser: Arc<dyn Chooser>) -> Self {
        Self { games: DashMap::new(), catalog, chooser }
    }

    /// Creates a new game and starts play.
    #[instrument(level = "debug", skip(self, configuration))]
    pub fn start_game(
        &self,
        game_id: GameId,
        configuration: GameConfiguration,
        rng_seed: u64,
    ) -> GameResult<()> {
        if self.games.contains_key(&game_id) {
            return Err(GameError::illegal_state("game already exists"));
        }
        let mut game = GameState::new(game_id, configuration, self.chooser.clone(), rng_seed);
        game.status = GameStatus::Playing;
        game.step = data::game_states::game_phase_step::GamePhaseStep::PreCombatMain;
        game.turn.turn_number = 1;
        info!(%game_id, "Started game");
        self.games.insert(game_id, Arc::new(RwLock::new(game)));
        Ok(())
    }

    /// Terminates a game. Subsequent operations return "game-ended".
    pub fn end_game(&self, game_id: GameId, winner: Option<PlayerName>) -> GameResult<()> {
        self.with_game_mut(game_id, |game| {
            let winners = winner.map(EnumSet::only).unwrap_or_default();
            game.status = GameStatus::GameOver { winners };
            game.send_update(GameUpdate::Status(game.status.clone()));
            info!(%game_id, ?winner, "Ended game");
            Ok(())
        })
    }

    /// Suspends a game: mutations are rejected until it is resumed.
    pub fn pause_game(&self, game_id: GameId) -> GameResult<()> {
        self.with_game_mut(game_id, |game| match game.status {
            GameStatus::Playing => {
                game.status = GameStatus::Paused;
                game.send_update(GameUpdate::Status(game.status.clone()));
                Ok(())
            }
            GameStatus::GameOver { .. } => Err(GameError::GameEnded),
            _ => Err(GameError::illegal_state("game is not in progress")),
        })
    }

    /// Resumes a paused game.
    pub fn resume_game(&self, game_id: GameId) -> GameResult<()> {
        self.with_game_mut(game_id, |game| match game.status {
            GameStatus::Paused => {
                game.status = GameStatus::Playing;
                game.send_update(GameUpdate::Status(game.status.clone()));
                Ok(())
            }
            GameStatus::GameOver { .. } => Err(GameError::GameEnded),
            _ => Err(GameError::illegal_state("game is not paused")),
        })
    }

    /// Handles raw client input for a game.
    #[instrument(level = "debug", skip(self))]
    pub fn process_action(
        &self,
        game_id: GameId,
        player: PlayerName,
        action: ClientAction,
    ) -> GameResult<()> {
        match action {
            ClientAction::PlayerAction(PlayerActionName::Pass) => {
                self.execute(game_id, player, GameAction::PassPriority)
            }
            ClientAction::PlayerAction(PlayerActionName::DeclareAttackersDone) => {
                self.execute(game_id, player, CombatAction::ConfirmAttackers.into())
            }
            ClientAction::PlayerAction(PlayerActionName::DeclareBlockersDone) => {
                self.execute(game_id, player, CombatAction::ConfirmBlockers.into())
            }
            ClientAction::PlayerAction(PlayerActionName::Concede) => {
                self.execute(game_id, player, GameAction::Concede)
            }
            ClientAction::Game(game_action) => self.execute(game_id, player, game_action),
            ClientAction::SendString(name) => {
                let printed = self
                    .catalog
                    .printed(&name)
                    .ok_or_else(|| GameError::not_found("card name"))?;
                self.with_game_mut(game_id, |game| {
                    let turn = game.turn;
                    game.zones.create_card(player, CardKind::Normal, printed, Zone::Hand, turn);
                    Ok(())
                })
            }
            ClientAction::SendInteger(amount) => self.with_game_mut(game_id, |game| {
                game.player_mut(player).life += amount;
                state_based_actions::on_will_receive_priority(game);
                Ok(())
            }),
            ClientAction::SelectTarget(_) => {
                Err(GameError::illegal_state("no pending target selection"))
            }
        }
    }

    fn execute(&self, game_id: GameId, player: PlayerName, action: GameAction) -> GameResult<()> {
        self.with_game_mut(game_id, |game| actions::execute(game, player, action))
    }

    /// A snapshot of the game filtered for one viewer: hidden zones are
    /// reduced to counts.
    pub fn game_view(&self, game_id: GameId, viewer: PlayerName) -> GameResult<GameView> {
        self.with_game(game_id, |game| Ok(views::game_view(game, viewer)))
    }

    /// A snapshot of the current combat, if one is in progress.
    pub fn combat_view(&self, game_id: GameId) -> GameResult<Option<CombatView>> {
        self.with_game(game_id, |game| Ok(views::combat_view(game)))
    }

    /// True if the card attacked at any point this turn.
    pub fn attacked_this_turn(&self, game_id: GameId, card_id: CardId) -> GameResult<bool> {
        self.with_game(game_id, |game| Ok(cleanup::attacked_this_turn(game, card_id)))
    }

    /// Attaches an observer channel receiving every published event and
    /// status change for a game.
    pub fn observe(&self, game_id: GameId) -> GameResult<UnboundedReceiver<GameUpdate>> {
        self.with_game_mut(game_id, |game| {
            let (sender, receiver) = mpsc::unbounded_channel();
            game.updates = Some(sender);
            Ok(receiver)
        })
    }

    /// Registers an event-bus subscriber for a game.
    pub fn subscribe(
        &self,
        game_id: GameId,
        kinds: EnumSet<EventKind>,
        callback: SubscriberFn,
    ) -> GameResult<SubscriberId> {
        self.with_game_mut(game_id, |game| Ok(game.bus.subscribe(kinds, callback)))
    }

    /// Registers a replacement effect for a game.
    #[allow(clippy::too_many_arguments)]
    pub fn register_replacement(
        &self,
        game_id: GameId,
        kinds: EnumSet<EventKind>,
        source: Option<CardId>,
        self_scope: bool,
        duration: Duration,
        applies: AppliesFn,
        replace: ReplaceFn,
    ) -> GameResult<ReplacementId> {
        self.with_game_mut(game_id, |game| {
            Ok(game.replacements.register(kinds, source, self_scope, duration, applies, replace))
        })
    }

    /// Registers a trigger for a game.
    pub fn register_trigger(
        &self,
        game_id: GameId,
        source: CardId,
        zones: EnumSet<Zone>,
        kinds: EnumSet<EventKind>,
        condition: TriggerCondition,
        effect: TriggerEffectFn,
    ) -> GameResult<TriggerId> {
        self.with_game_mut(game_id, |game| {
            Ok(game.triggers.register(source, zones, kinds, condition, effect))
        })
    }

    /// Creates a card in a game from catalog data supplied by the
    /// caller.
    pub fn create_card(
        &self,
        game_id: GameId,
        owner: PlayerName,
        printed: PrintedCard,
        zone: Zone,
    ) -> GameResult<CardId> {
        self.with_game_mut(game_id, |game| {
            let turn = game.turn;
            Ok(game.zones.create_card(owner, CardKind::Normal, printed, zone, turn))
        })
    }

    // Direct combat operations. These are the engine-internal surface
    // reused by tests and by higher-level policy layers; the
    // action-handler path is a thin mapping onto them.

    pub fn reset_combat(&self, game_id: GameId) -> GameResult<()> {
        self.with_game_mut(game_id, |game| {
            declare::reset_combat(game);
            Ok(())
        })
    }

    pub fn set_attacker(&self, game_id: GameId, player: PlayerName) -> GameResult<()> {
        self.with_game_mut(game_id, |game| declare::set_attacker(game, player))
    }

    pub fn set_defenders(&self, game_id: GameId) -> GameResult<()> {
        self.with_game_mut(game_id, |game| declare::set_defenders(game))
    }

    pub fn can_attack(&self, game_id: GameId, card_id: CardId) -> GameResult<bool> {
        self.with_game(game_id, |game| declare::can_attack(game, card_id))
    }

    /// Creatures the player could legally declare as attackers right now.
    pub fn legal_attackers(&self, game_id: GameId, player: PlayerName) -> GameResult<Vec<CardId>> {
        self.with_game(game_id, |game| Ok(combat_queries::legal_attackers(game, player)))
    }

    /// Blockers the player could legally declare against an attacker.
    pub fn legal_blockers(
        &self,
        game_id: GameId,
        player: PlayerName,
        attacker: CardId,
    ) -> GameResult<Vec<CardId>> {
        self.with_game(game_id, |game| {
            Ok(combat_queries::legal_blockers(game, player, attacker))
        })
    }

    pub fn can_attack_defender(
        &self,
        game_id: GameId,
        card_id: CardId,
        defender: AttackTarget,
    ) -> GameResult<bool> {
        self.with_game(game_id, |game| declare::can_attack_defender(game, card_id, defender))
    }

    pub fn declare_attacker(
        &self,
        game_id: GameId,
        card_id: CardId,
        defender: AttackTarget,
        controller: PlayerName,
    ) -> GameResult<()> {
        self.with_game_mut(game_id, |game| {
            declare::declare_attacker(game, card_id, defender, controller)
        })
    }

    pub fn remove_attacker(&self, game_id: GameId, card_id: CardId) -> GameResult<()> {
        self.with_game_mut(game_id, |game| declare::remove_attacker(game, card_id))
    }

    pub fn confirm_attackers(&self, game_id: GameId) -> GameResult<()> {
        self.with_game_mut(game_id, |game| declare::confirm_attackers(game))
    }

    pub fn can_block(
        &self,
        game_id: GameId,
        blocker: CardId,
        attacker: CardId,
    ) -> GameResult<bool> {
        self.with_game(game_id, |game| blocks::can_block(game, blocker, attacker))
    }

    pub fn declare_blocker(
        &self,
        game_id: GameId,
        blocker: CardId,
        attacker: CardId,
        controller: PlayerName,
    ) -> GameResult<()> {
        self.with_game_mut(game_id, |game| {
            blocks::declare_blocker(game, blocker, attacker, controller)
        })
    }

    pub fn remove_blocker(&self, game_id: GameId, blocker: CardId) -> GameResult<()> {
        self.with_game_mut(game_id, |game| blocks::remove_blocker(game, blocker))
    }

    pub fn accept_blockers(&self, game_id: GameId) -> GameResult<()> {
        self.with_game_mut(game_id, |game| blocks::accept_blockers(game))
    }

    pub fn check_block_requirements(
        &self,
        game_id: GameId,
        defender: PlayerName,
    ) -> GameResult<Vec<blocks::BlockRequirementViolation>> {
        self.with_game(game_id, |game| Ok(blocks::check_block_requirements(game, defender)))
    }

    pub fn process_must_block_requirements(&self, game_id: GameId) -> GameResult<()> {
        self.with_game_mut(game_id, |game| blocks::process_must_block_requirements(game))
    }

    pub fn order_blockers(
        &self,
        game_id: GameId,
        attacker: CardId,
        ordered: Vec<CardId>,
    ) -> GameResult<()> {
        self.with_game_mut(game_id, |game| blocks::order_blockers(game, attacker, &ordered))
    }

    pub fn has_first_or_double_strike(&self, game_id: GameId) -> GameResult<bool> {
        self.with_game(game_id, |game| Ok(damage::has_first_or_double_strike(game)))
    }

    pub fn assign_combat_damage(&self, game_id: GameId, first_strike: bool) -> GameResult<()> {
        self.with_game_mut(game_id, |game| damage::assign_combat_damage(game, first_strike))
    }

    pub fn apply_combat_damage(&self, game_id: GameId) -> GameResult<()> {
        self.with_game_mut(game_id, |game| damage::apply_combat_damage(game))
    }

    pub fn assign_attacker_damage(
        &self,
        game_id: GameId,
        attacker: CardId,
        player: PlayerName,
        assignments: BTreeMap<CardId, Damage>,
    ) -> GameResult<()> {
        self.with_game_mut(game_id, |game| {
            damage::assign_attacker_damage(game, attacker, player, &assignments)
        })
    }

    pub fn assign_blocker_damage(
        &self,
        game_id: GameId,
        blocker: CardId,
        player: PlayerName,
        assignments: BTreeMap<CardId, Damage>,
    ) -> GameResult<()> {
        self.with_game_mut(game_id, |game| {
            damage::assign_blocker_damage(game, blocker, player, &assignments)
        })
    }

    pub fn end_combat(&self, game_id: GameId) -> GameResult<()> {
        self.with_game_mut(game_id, |game| {
            cleanup::end_combat(game);
            Ok(())
        })
    }

    pub fn remove_from_combat(&self, game_id: GameId, card_id: CardId) -> GameResult<()> {
        self.with_game_mut(game_id, |game| {
            cleanup::remove_from_combat(game, card_id);
            Ok(())
        })
    }

    /// Moves a card between zones directly, for policy layers and
    /// tests.
    pub fn move_card(&self, game_id: GameId, card_id: CardId, zone: Zone) -> GameResult<()> {
        self.with_game_mut(game_id, |game| {
            move_card::run(game, primitives::game_primitives::Source::Game, card_id, zone);
            state_based_actions::on_will_receive_priority(game);
            Ok(())
        })
    }

    /// Runs a closure with shared (read) access to a game's state.
    pub fn with_game<T>(
        &self,
        game_id: GameId,
        f: impl FnOnce(&GameState) -> GameResult<T>,
    ) -> GameResult<T> {
        let lock = self.lock_for(game_id)?;
        let game = read_guard(&lock);
        f(&game)
    }

    /// Runs a closure with exclusive (write) access to a game's state.
    ///
    /// This is the engine's single-writer guarantee: every mutation of a
    /// game happens under this lock, and event delivery occurs
    /// synchronously inside it.
    pub fn with_game_mut<T>(
        &self,
        game_id: GameId,
        f: impl FnOnce(&mut GameState) -> GameResult<T>,
    ) -> GameResult<T> {
        let lock = self.lock_for(game_id)?;
        let mut game = write_guard(&lock);
        f(&mut game)
    }

    fn lock_for(&self, game_id: GameId) -> GameResult<Arc<RwLock<GameState>>> {
        self.games
            .get(&game_id)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| GameError::not_found("game"))
    }

    /// Looks up the effective controller of a card, for callers mapping
    /// inputs to players.
    pub fn controller_of(&self, game_id: GameId, card_id: CardId) -> GameResult<PlayerName> {
        self.with_game(game_id, |game| {
            card_queries::controller(game, card_id).ok_or_else(|| GameError::not_found("card"))
        })
    }
}

fn read_guard(lock: &RwLock<GameState>) -> RwLockReadGuard<'_, GameState> {
    lock.read().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn write_guard(lock: &RwLock<GameState>) -> RwLockWriteGuard<'_, GameState> {
    lock.write().unwrap_or_else(|poisoned| poisoned.into_inner())
}
