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

use std::sync::Arc;

use data::actions::game_action::{ClientAction, PlayerActionName};
use data::core::game_error::GameError;
use data::game_states::combat_state::AttackTarget;
use data::game_states::game_state::{GameConfiguration, GameStatus, GameUpdate};
use data::printed_cards::printed_card::PrintedCard;
use data::prompts::chooser::FirstChoice;
use engine::game_engine::GameEngine;
use primitives::game_primitives::{GameId, PlayerName, Zone};
use testing::stub_catalog::StubCatalog;
use uuid::Uuid;

fn new_engine() -> GameEngine {
    integration::init_tracing();
    let catalog =
        StubCatalog::new().with_card(PrintedCard::vanilla_creature("Hill Giant", 3, 3));
    GameEngine::new(Arc::new(catalog), Arc::new(FirstChoice))
}

fn started_game(engine: &GameEngine) -> GameId {
    let game_id = GameId(Uuid::new_v4());
    engine.start_game(game_id, GameConfiguration::default(), 7).unwrap();
    game_id
}

#[test]
fn lifecycle_start_pause_resume_end() {
    let engine = new_engine();
    let game_id = started_game(&engine);

    engine.pause_game(game_id).unwrap();
    let error = engine
        .process_action(game_id, PlayerName::One, ClientAction::PlayerAction(PlayerActionName::Pass))
        .unwrap_err();
    assert_eq!(error.code(), "illegal-state");

    engine.resume_game(game_id).unwrap();
    engine
        .process_action(game_id, PlayerName::One, ClientAction::PlayerAction(PlayerActionName::Pass))
        .unwrap();

    engine.end_game(game_id, Some(PlayerName::One)).unwrap();
    let error = engine
        .process_action(game_id, PlayerName::One, ClientAction::PlayerAction(PlayerActionName::Pass))
        .unwrap_err();
    assert_eq!(error, GameError::GameEnded);
    assert_eq!(error.code(), "game-ended");
}

#[test]
fn unknown_game_is_not_found() {
    let engine = new_engine();
    let error = engine.game_view(GameId(Uuid::new_v4()), PlayerName::One).unwrap_err();
    assert_eq!(error.code(), "not-found");
}

#[test]
fn full_combat_through_the_engine_interface() {
    let engine = new_engine();
    let game_id = started_game(&engine);
    let attacker = engine
        .create_card(
            game_id,
            PlayerName::One,
            PrintedCard::vanilla_creature("Seasoned Veteran", 3, 3),
            Zone::Battlefield,
        )
        .unwrap();
    // Clear summoning sickness by marking the previous turn.
    engine
        .with_game_mut(game_id, |game| {
            if let Some(card) = data::card_states::zones::ZoneQueries::card_mut(game, attacker) {
                card.entered_current_zone.turn_number = 0;
                card.last_changed_control.turn_number = 0;
            }
            Ok(())
        })
        .unwrap();

    engine.reset_combat(game_id).unwrap();
    engine.set_attacker(game_id, PlayerName::One).unwrap();
    engine.set_defenders(game_id).unwrap();
    assert!(engine.can_attack(game_id, attacker).unwrap());
    assert!(engine
        .can_attack_defender(game_id, attacker, AttackTarget::Player(PlayerName::Two))
        .unwrap());
    assert_eq!(engine.legal_attackers(game_id, PlayerName::One).unwrap(), vec![attacker]);
    assert!(engine.legal_attackers(game_id, PlayerName::Two).unwrap().is_empty());

    engine
        .declare_attacker(game_id, attacker, AttackTarget::Player(PlayerName::Two), PlayerName::One)
        .unwrap();
    engine.confirm_attackers(game_id).unwrap();
    engine.accept_blockers(game_id).unwrap();
    assert!(!engine.has_first_or_double_strike(game_id).unwrap());
    engine.assign_combat_damage(game_id, false).unwrap();
    engine.apply_combat_damage(game_id).unwrap();
    engine.end_combat(game_id).unwrap();

    let view = engine.game_view(game_id, PlayerName::Two).unwrap();
    let defender = view.players.iter().find(|player| player.name == PlayerName::Two).unwrap();
    assert_eq!(defender.life, 17);
    assert!(engine.attacked_this_turn(game_id, attacker).unwrap());
    assert_eq!(view.attacked_this_turn, vec![attacker]);
}

#[test]
fn views_mask_hidden_zones() {
    let engine = new_engine();
    let game_id = started_game(&engine);
    let secret = engine
        .create_card(
            game_id,
            PlayerName::Two,
            PrintedCard::vanilla_creature("Hidden Plan", 1, 1),
            Zone::Hand,
        )
        .unwrap();
    engine
        .create_card(
            game_id,
            PlayerName::Two,
            PrintedCard::vanilla_creature("Buried Secret", 1, 1),
            Zone::Library,
        )
        .unwrap();

    let view = engine.game_view(game_id, PlayerName::One).unwrap();
    assert!(view.hand.is_empty());
    assert_eq!(view.hand_sizes.get(&PlayerName::Two), Some(&1));
    assert_eq!(view.library_sizes.get(&PlayerName::Two), Some(&1));
    assert!(!view.hand.iter().any(|card| card.id == secret));

    let owner_view = engine.game_view(game_id, PlayerName::Two).unwrap();
    assert_eq!(owner_view.hand.len(), 1);
    assert_eq!(owner_view.hand[0].id, secret);
}

#[test]
fn send_string_creates_card_from_catalog() {
    let engine = new_engine();
    let game_id = started_game(&engine);

    engine
        .process_action(game_id, PlayerName::One, ClientAction::SendString("Hill Giant".into()))
        .unwrap();
    let view = engine.game_view(game_id, PlayerName::One).unwrap();
    assert_eq!(view.hand.len(), 1);
    assert_eq!(view.hand[0].name, "Hill Giant");

    let error = engine
        .process_action(game_id, PlayerName::One, ClientAction::SendString("No Such Card".into()))
        .unwrap_err();
    assert_eq!(error.code(), "not-found");
}

#[test]
fn send_integer_adjusts_life_and_checks_state() {
    let engine = new_engine();
    let game_id = started_game(&engine);

    engine.process_action(game_id, PlayerName::Two, ClientAction::SendInteger(-20)).unwrap();
    let view = engine.game_view(game_id, PlayerName::One).unwrap();
    let loser = view.players.iter().find(|player| player.name == PlayerName::Two).unwrap();
    assert!(loser.has_lost);
    assert!(matches!(view.status, GameStatus::GameOver { .. }));
}

#[tokio::test]
async fn observer_channel_receives_events() {
    let engine = Arc::new(new_engine());
    let game_id = started_game(&engine);
    let mut updates = engine.observe(game_id).unwrap();

    let attacker = engine
        .create_card(
            game_id,
            PlayerName::One,
            PrintedCard::vanilla_creature("Raider", 2, 2),
            Zone::Battlefield,
        )
        .unwrap();
    engine
        .with_game_mut(game_id, |game| {
            if let Some(card) = data::card_states::zones::ZoneQueries::card_mut(game, attacker) {
                card.entered_current_zone.turn_number = 0;
            }
            Ok(())
        })
        .unwrap();

    engine.reset_combat(game_id).unwrap();
    engine.set_attacker(game_id, PlayerName::One).unwrap();
    engine.set_defenders(game_id).unwrap();
    engine
        .declare_attacker(game_id, attacker, AttackTarget::Player(PlayerName::Two), PlayerName::One)
        .unwrap();

    let update = updates.recv().await.unwrap();
    match update {
        GameUpdate::Event(event) => {
            assert_eq!(event.kind, data::events::game_event::EventKind::AttackerDeclared);
            assert_eq!(event.source, Some(attacker));
        }
        other => panic!("expected an event update, got {other:?}"),
    }
}

#[tokio::test]
async fn service_loop_processes_inbound_actions() {
    let engine = Arc::new(new_engine());
    let game_id = started_game(&engine);

    let (sender, handle) = engine::service::spawn(engine.clone());
    sender
        .send(engine::service::EngineRequest {
            game_id,
            player: PlayerName::One,
            action: ClientAction::SendString("Hill Giant".into()),
        })
        .unwrap();
    drop(sender);
    handle.await.unwrap();

    let view = engine.game_view(game_id, PlayerName::One).unwrap();
    assert_eq!(view.hand.len(), 1);
}
