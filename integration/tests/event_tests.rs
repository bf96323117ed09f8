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

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use data::core::game_error::GameError;
use data::events::game_event::{EventKind, GameEvent};
use data::events::replacement::Replaced;
use data::player_states::player_state::PlayerQueries;
use data::properties::duration::Duration;
use primitives::game_primitives::PlayerName;
use rules::dispatcher::dispatch;
use testing::test_game::two_player_game;

#[test]
fn subscribers_run_in_registration_order() {
    let mut game = two_player_game();
    let order = Arc::new(Mutex::new(Vec::new()));

    for label in ["first", "second", "third"] {
        let order = order.clone();
        game.bus.subscribe(
            EventKind::GainLife,
            Arc::new(move |_game, _event| {
                order.lock().unwrap().push(label);
                Ok(())
            }),
        );
    }

    dispatch::publish(&mut game, GameEvent::new(EventKind::GainLife).with_amount(1));
    assert_eq!(*order.lock().unwrap(), vec!["first", "second", "third"]);
}

#[test]
fn failing_subscriber_does_not_abort_delivery() {
    let mut game = two_player_game();
    let delivered = Arc::new(AtomicUsize::new(0));

    game.bus.subscribe(
        EventKind::GainLife,
        Arc::new(|_game, _event| Err(GameError::rules_error("subscriber exploded"))),
    );
    let counter = delivered.clone();
    game.bus.subscribe(
        EventKind::GainLife,
        Arc::new(move |_game, _event| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }),
    );

    dispatch::publish(&mut game, GameEvent::new(EventKind::GainLife).with_amount(1));
    assert_eq!(delivered.load(Ordering::SeqCst), 1);
}

#[test]
fn subscribers_only_receive_their_event_kinds() {
    let mut game = two_player_game();
    let count = Arc::new(AtomicUsize::new(0));

    let counter = count.clone();
    game.bus.subscribe(
        EventKind::DamagePlayer,
        Arc::new(move |_game, _event| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }),
    );

    dispatch::publish(&mut game, GameEvent::new(EventKind::GainLife));
    assert_eq!(count.load(Ordering::SeqCst), 0);
    dispatch::publish(&mut game, GameEvent::new(EventKind::DamagePlayer));
    assert_eq!(count.load(Ordering::SeqCst), 1);
}

#[test]
fn replacement_rewrites_event_before_delivery() {
    let mut game = two_player_game();
    game.replacements.register(
        EventKind::GainLife,
        None,
        false,
        Duration::Continuous,
        Arc::new(|_game, _event| true),
        Arc::new(|_game, mut event: GameEvent| {
            event.amount *= 2;
            Replaced::Event(event)
        }),
    );

    let seen = Arc::new(Mutex::new(0));
    let observed = seen.clone();
    game.bus.subscribe(
        EventKind::GainLife,
        Arc::new(move |_game, event| {
            *observed.lock().unwrap() = event.amount;
            Ok(())
        }),
    );

    let result =
        dispatch::publish_returning(&mut game, GameEvent::new(EventKind::GainLife).with_amount(3));
    assert_eq!(result.unwrap().amount, 6);
    assert_eq!(*seen.lock().unwrap(), 6);
}

#[test]
fn replacement_applies_at_most_once_per_event() {
    let mut game = two_player_game();
    let id = game.replacements.register(
        EventKind::GainLife,
        None,
        false,
        Duration::Continuous,
        Arc::new(|_game, _event| true),
        Arc::new(|_game, mut event: GameEvent| {
            event.amount *= 2;
            Replaced::Event(event)
        }),
    );

    let first = dispatch::replace_event(&mut game, GameEvent::new(EventKind::GainLife).with_amount(3))
        .unwrap();
    assert_eq!(first.amount, 6);
    assert_eq!(first.applied_effects, vec![id]);

    // Feeding the result back in applies nothing further.
    let second = dispatch::replace_event(&mut game, first.clone()).unwrap();
    assert_eq!(second.amount, first.amount);
    assert_eq!(second.applied_effects, first.applied_effects);
}

#[test]
fn consuming_replacement_prevents_delivery() {
    let mut game = two_player_game();
    game.replacements.register(
        EventKind::DamagePlayer,
        None,
        false,
        Duration::Continuous,
        Arc::new(|_game, _event| true),
        Arc::new(|_game, _event| Replaced::Consumed),
    );

    let count = Arc::new(AtomicUsize::new(0));
    let counter = count.clone();
    game.bus.subscribe(
        EventKind::DamagePlayer,
        Arc::new(move |_game, _event| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }),
    );

    let result =
        dispatch::publish_returning(&mut game, GameEvent::new(EventKind::DamagePlayer));
    assert!(result.is_none());
    assert_eq!(count.load(Ordering::SeqCst), 0);
}

#[test]
fn self_replacement_preferred_over_chooser() {
    let mut game = two_player_game();
    // Registered first, but not self-scoped.
    game.replacements.register(
        EventKind::GainLife,
        None,
        false,
        Duration::Continuous,
        Arc::new(|_game, _event| true),
        Arc::new(|_game, mut event: GameEvent| {
            event.amount += 100;
            Replaced::Event(event)
        }),
    );
    // Self-scoped: applies first despite later registration.
    game.replacements.register(
        EventKind::GainLife,
        None,
        true,
        Duration::Continuous,
        Arc::new(|_game, _event| true),
        Arc::new(|_game, mut event: GameEvent| {
            event.amount *= 10;
            Replaced::Event(event)
        }),
    );

    let result = dispatch::replace_event(&mut game, GameEvent::new(EventKind::GainLife).with_amount(1))
        .unwrap();
    // Self-replacement ran first: (1 * 10) + 100, not (1 + 100) * 10.
    assert_eq!(result.amount, 110);
}

#[test]
fn mutually_replacing_effects_hit_loop_cap_without_hanging() {
    let mut game = two_player_game();
    // Pathological effect: strips the applied-effects list so it always
    // looks unapplied.
    game.replacements.register(
        EventKind::GainLife,
        None,
        false,
        Duration::Continuous,
        Arc::new(|_game, _event| true),
        Arc::new(|_game, mut event: GameEvent| {
            event.applied_effects.clear();
            event.amount += 1;
            Replaced::Event(event)
        }),
    );

    let result =
        dispatch::replace_event(&mut game, GameEvent::new(EventKind::GainLife).with_amount(0));
    assert!(result.is_some());
    assert!(game.rules_error.is_some());
}

#[test]
fn damage_prevention_expressed_as_replacement() {
    use data::core::ability::Ability;
    use testing::test_game::{
        attack_player, battlefield_creature, begin_combat, confirm_attackers, run_combat_damage,
    };

    let mut game = two_player_game();
    let attacker =
        battlefield_creature(&mut game, PlayerName::One, "Raider", 3, 3, Ability::Haste);

    // Prevent all combat damage to players this game.
    game.replacements.register(
        EventKind::DamagePlayer,
        None,
        false,
        Duration::Continuous,
        Arc::new(|_game, event| event.combat),
        Arc::new(|_game, mut event: GameEvent| {
            event.amount = 0;
            Replaced::Event(event)
        }),
    );

    begin_combat(&mut game);
    attack_player(&mut game, attacker, PlayerName::Two);
    confirm_attackers(&mut game);
    run_combat_damage(&mut game);

    assert_eq!(game.player(PlayerName::Two).life, 20);
}
