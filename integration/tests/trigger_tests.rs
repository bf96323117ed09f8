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

use data::card_states::zones::ZoneQueries;
use data::core::ability::Ability;
use data::events::game_event::EventKind;
use data::player_states::player_state::PlayerQueries;
use data::properties::duration::Duration;
use enumset::enum_set;
use primitives::game_primitives::{PlayerName, Source, Zone};
use rules::combat::blocks;
use rules::mutations::{state_based_actions, triggers};
use rules::stack::resolve;
use testing::test_game::{
    attack_player, battlefield_creature, begin_combat, block, confirm_attackers,
    run_combat_damage, two_player_game, vanilla_creature,
};

#[test]
fn unblocked_attacker_trigger_reaches_the_stack() {
    let mut game = two_player_game();
    let attacker = vanilla_creature(&mut game, PlayerName::One, "Raider", 2, 2);

    game.triggers.register(
        attacker,
        Zone::Battlefield,
        EventKind::UnblockedAttacker,
        Arc::new(move |_game, event| event.source == Some(attacker)),
        Arc::new(|game, _event, stack_object| {
            let controller = stack_object.controller;
            game.player_mut(controller).life += 1;
        }),
    );

    begin_combat(&mut game);
    attack_player(&mut game, attacker, PlayerName::Two);
    confirm_attackers(&mut game);
    blocks::accept_blockers(&mut game).unwrap();

    assert_eq!(game.triggered_queue.len(), 1);
    assert!(triggers::process_triggered_abilities(&mut game));
    assert_eq!(game.stack().len(), 1);

    resolve::resolve_top_of_stack(&mut game).unwrap();
    assert_eq!(game.player(PlayerName::One).life, 21);
    assert!(game.stack().is_empty());
}

#[test]
fn triggers_stack_in_apnap_order() {
    let mut game = two_player_game();
    let mine = vanilla_creature(&mut game, PlayerName::One, "Mine", 2, 2);
    let theirs = vanilla_creature(&mut game, PlayerName::Two, "Theirs", 2, 2);

    for (card, marker) in [(mine, 1), (theirs, 2)] {
        game.triggers.register(
            card,
            Zone::Battlefield,
            EventKind::DeclaredBlockers,
            Arc::new(|_game, _event| true),
            Arc::new(move |game, _event, _stack_object| {
                game.player_mut(PlayerName::One).life += marker;
            }),
        );
    }

    begin_combat(&mut game);
    attack_player(&mut game, mine, PlayerName::Two);
    confirm_attackers(&mut game);
    blocks::accept_blockers(&mut game).unwrap();
    assert_eq!(game.triggered_queue.len(), 2);
    triggers::process_triggered_abilities(&mut game);
    assert_eq!(game.stack().len(), 2);

    // The non-active player's trigger went on top of the stack, so it
    // resolves first.
    let top = *game.stack().last().unwrap();
    assert_eq!(game.stack_object(top).unwrap().controller, PlayerName::Two);
}

#[test]
fn dies_trigger_resolves_against_last_known_information() {
    let mut game = two_player_game();
    let attacker = vanilla_creature(&mut game, PlayerName::One, "Slayer", 3, 3);
    let blocker = vanilla_creature(&mut game, PlayerName::Two, "Martyr", 2, 2);

    // Pump the blocker so its snapshot differs from its printed stats.
    let timestamp = game.zones.new_timestamp();
    game.card_mut(blocker).unwrap().properties.add_power_toughness(
        Source::Game,
        Duration::Continuous,
        timestamp,
        2,
        0,
    );

    // "When this creature dies, its controller gains life equal to its
    // power." The power must come from the snapshot, not the card in
    // the graveyard.
    game.triggers.register(
        blocker,
        enum_set!(Zone::Battlefield | Zone::Graveyard),
        EventKind::ZoneChange,
        Arc::new(move |_game, event| {
            event.target == Some(blocker)
                && event.metadata.get("from").map(String::as_str) == Some("battlefield")
                && event.metadata.get("to").map(String::as_str) == Some("graveyard")
        }),
        Arc::new(|game, _event, stack_object| {
            if let Some(snapshot) = &stack_object.last_known {
                let controller = snapshot.controller;
                game.player_mut(controller).life += snapshot.power;
            }
        }),
    );

    begin_combat(&mut game);
    attack_player(&mut game, attacker, PlayerName::Two);
    confirm_attackers(&mut game);
    block(&mut game, blocker, attacker);
    run_combat_damage(&mut game);

    assert_eq!(game.card(blocker).unwrap().zone, Zone::Graveyard);
    state_based_actions::on_will_receive_priority(&mut game);
    while !game.stack().is_empty() {
        resolve::resolve_top_of_stack(&mut game).unwrap();
    }
    // Snapshot power was 4 (2 printed + 2 from the pump effect).
    assert_eq!(game.player(PlayerName::Two).life, 24);
}

#[test]
fn lost_players_skip_priority_and_stack_resolves() {
    use rules::mutations::priority;

    let mut game = two_player_game();
    game.player_mut(PlayerName::Two).has_lost = true;

    // With only one player left the pass should immediately advance the
    // step rather than waiting on the lost player.
    let step_before = game.step;
    priority::pass(&mut game, PlayerName::One).unwrap();
    assert_ne!(game.step, step_before);
}

#[test]
fn end_combat_event_fires_once() {
    use rules::combat::cleanup;

    let mut game = two_player_game();
    let attacker = vanilla_creature(&mut game, PlayerName::One, "Raider", 2, 2);
    let counted = Arc::new(std::sync::atomic::AtomicUsize::new(0));

    let counter = counted.clone();
    game.bus.subscribe(
        EventKind::EndCombatStep,
        Arc::new(move |_game, _event| {
            counter.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            Ok(())
        }),
    );

    begin_combat(&mut game);
    attack_player(&mut game, attacker, PlayerName::Two);
    confirm_attackers(&mut game);
    run_combat_damage(&mut game);
    cleanup::end_combat(&mut game);
    cleanup::end_combat(&mut game);

    assert_eq!(counted.load(std::sync::atomic::Ordering::SeqCst), 1);
}

#[test]
fn must_block_violation_clears_when_block_declared() {
    let mut game = two_player_game();
    let attacker =
        battlefield_creature(&mut game, PlayerName::One, "Taunter", 2, 2, Ability::Lure);
    let blocker = vanilla_creature(&mut game, PlayerName::Two, "Reluctant", 2, 2);

    begin_combat(&mut game);
    attack_player(&mut game, attacker, PlayerName::Two);
    confirm_attackers(&mut game);

    let before = blocks::check_block_requirements(&game, PlayerName::Two);
    assert_eq!(before.len(), 1);

    blocks::declare_blocker(&mut game, blocker, attacker, PlayerName::Two).unwrap();
    let after = blocks::check_block_requirements(&game, PlayerName::Two);
    assert_eq!(after.len(), before.len() - 1);
}
