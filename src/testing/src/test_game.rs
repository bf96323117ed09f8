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

//! Builders for in-memory test games.
//!
//! Scenario tests assemble a two-player battlefield, step into combat
//! with the direct combat operations, and assert on the resulting
//! state.

use std::sync::Arc;

use data::card_states::card_state::CardKind;
use data::core::ability::Ability;
use data::core::numerics::{Loyalty, Power, Toughness};
use data::game_states::combat_state::AttackTarget;
use data::game_states::game_phase_step::GamePhaseStep;
use data::game_states::game_state::{GameConfiguration, GameState, GameStatus, TurnData};
use data::printed_cards::printed_card::PrintedCard;
use data::prompts::chooser::FirstChoice;
use enumset::EnumSet;
use primitives::game_primitives::{CardId, GameId, PlayerName, Zone};
use rules::combat::{blocks, damage, declare};
use uuid::Uuid;

/// A ready-to-play two-player game in the pre-combat main phase of turn
/// one, with a deterministic chooser and rng seed.
pub fn two_player_game() -> GameState {
    let mut game = GameState::new(
        GameId(Uuid::from_u128(0)),
        GameConfiguration::default(),
        Arc::new(FirstChoice),
        314159265,
    );
    game.status = GameStatus::Playing;
    game.step = GamePhaseStep::PreCombatMain;
    game.turn = TurnData { active_player: PlayerName::One, turn_number: 1 };
    game.priority = PlayerName::One;
    game
}

/// Creates a creature on the battlefield which has been under its
/// owner's control since the previous turn, so it may attack.
pub fn battlefield_creature(
    game: &mut GameState,
    owner: PlayerName,
    name: &str,
    power: Power,
    toughness: Toughness,
    abilities: impl Into<EnumSet<Ability>>,
) -> CardId {
    let printed = PrintedCard::keyword_creature(name, power, toughness, abilities);
    let previous_turn = TurnData { active_player: owner, turn_number: 0 };
    game.zones.create_card(owner, CardKind::Normal, printed, Zone::Battlefield, previous_turn)
}

/// Creates a vanilla creature on the battlefield.
pub fn vanilla_creature(
    game: &mut GameState,
    owner: PlayerName,
    name: &str,
    power: Power,
    toughness: Toughness,
) -> CardId {
    battlefield_creature(game, owner, name, power, toughness, EnumSet::empty())
}

/// Creates a planeswalker on the battlefield with the given loyalty.
pub fn battlefield_planeswalker(
    game: &mut GameState,
    owner: PlayerName,
    name: &str,
    loyalty: Loyalty,
) -> CardId {
    let printed = PrintedCard::planeswalker(name, loyalty);
    let previous_turn = TurnData { active_player: owner, turn_number: 0 };
    game.zones.create_card(owner, CardKind::Normal, printed, Zone::Battlefield, previous_turn)
}

/// Enters the declare-attackers step with a fresh combat for the active
/// player.
pub fn begin_combat(game: &mut GameState) {
    declare::reset_combat(game);
    let active = game.active_player();
    declare::set_attacker(game, active).expect("combat was just created");
    declare::set_defenders(game).expect("combat was just created");
    game.step = GamePhaseStep::DeclareAttackers;
}

/// Declares an attacker against the defending player.
pub fn attack_player(game: &mut GameState, attacker: CardId, defender: PlayerName) {
    let active = game.active_player();
    declare::declare_attacker(game, attacker, AttackTarget::Player(defender), active)
        .expect("attack declaration should be legal");
}

/// Locks in attackers and moves to blocker declaration.
pub fn confirm_attackers(game: &mut GameState) {
    declare::confirm_attackers(game).expect("attackers should confirm");
    game.step = GamePhaseStep::DeclareBlockers;
}

/// Declares a blocker for its controller.
pub fn block(game: &mut GameState, blocker: CardId, attacker: CardId) {
    let controller = rules::queries::card_queries::controller(game, blocker)
        .expect("blocker should exist");
    blocks::declare_blocker(game, blocker, attacker, controller)
        .expect("block declaration should be legal");
}

/// Accepts blockers and runs both combat damage steps.
pub fn run_combat_damage(game: &mut GameState) {
    blocks::accept_blockers(game).expect("blockers should be accepted");
    if damage::has_first_or_double_strike(game) {
        game.step = GamePhaseStep::FirstStrikeDamage;
        damage::assign_combat_damage(game, true).expect("first strike assignment");
        damage::apply_combat_damage(game).expect("first strike application");
    }
    game.step = GamePhaseStep::CombatDamage;
    damage::assign_combat_damage(game, false).expect("combat damage assignment");
    damage::apply_combat_damage(game).expect("combat damage application");
}
