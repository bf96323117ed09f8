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
use std::sync::Arc;

use data::card_states::card_state::CardKind;
use data::card_states::stack_object::{StackObject, StackObjectKind};
use data::card_states::zones::ZoneQueries;
use data::player_states::player_state::PlayerQueries;
use data::printed_cards::printed_card::PrintedCard;
use primitives::game_primitives::{EntityId, PlayerName, Source, Zone};
use rules::mutations::{move_card, priority};
use rules::stack::resolve;
use testing::test_game::{two_player_game, vanilla_creature};

/// Puts a sorcery on the stack whose resolution runs the provided
/// closure.
fn push_spell(
    game: &mut data::game_states::game_state::GameState,
    controller: PlayerName,
    targets: Vec<EntityId>,
    effect: impl Fn(&mut data::game_states::game_state::GameState, &StackObject)
        + Send
        + Sync
        + 'static,
) -> primitives::game_primitives::StackObjectId {
    let turn = game.turn;
    let card = game.zones.create_card(
        controller,
        CardKind::Normal,
        PrintedCard {
            name: "Test Sorcery".into(),
            card_types: enumset::EnumSet::only(data::core::card_types::CardType::Sorcery),
            subtypes: vec![],
            power: None,
            toughness: None,
            abilities: enumset::EnumSet::empty(),
            loyalty: None,
        },
        Zone::Stack,
        turn,
    );
    let source_object = game.card(card).unwrap().object_id;
    game.zones.push_stack_object(|id| StackObject {
        id,
        kind: StackObjectKind::Spell,
        source: card,
        source_object,
        controller,
        targets,
        effect: Arc::new(effect),
        applied_effects: vec![],
        last_known: None,
    })
}

#[test]
fn stack_resolves_last_in_first_out() {
    let mut game = two_player_game();
    let order = Arc::new(std::sync::Mutex::new(Vec::new()));

    for label in ["bottom", "top"] {
        let order = order.clone();
        push_spell(&mut game, PlayerName::One, vec![], move |_game, _object| {
            order.lock().unwrap().push(label);
        });
    }

    resolve::resolve_top_of_stack(&mut game).unwrap();
    resolve::resolve_top_of_stack(&mut game).unwrap();
    assert_eq!(*order.lock().unwrap(), vec!["top", "bottom"]);
}

#[test]
fn resolved_sorcery_moves_to_graveyard() {
    let mut game = two_player_game();
    let id = push_spell(&mut game, PlayerName::One, vec![], |_game, _object| {});
    let source = game.stack_object(id).unwrap().source;

    resolve::resolve_top_of_stack(&mut game).unwrap();
    assert_eq!(game.card(source).unwrap().zone, Zone::Graveyard);
    assert!(game.stack().is_empty());
}

#[test]
fn spell_with_stale_target_is_countered() {
    let mut game = two_player_game();
    let victim = vanilla_creature(&mut game, PlayerName::Two, "Victim", 2, 2);
    let target = game.entity_id(victim).unwrap();

    let executed = Arc::new(AtomicUsize::new(0));
    let counter = executed.clone();
    let id = push_spell(&mut game, PlayerName::One, vec![target], move |_game, _object| {
        counter.fetch_add(1, Ordering::SeqCst);
    });
    let source = game.stack_object(id).unwrap().source;

    // The target changes zones before resolution, invalidating it.
    move_card::run(&mut game, Source::Game, victim, Zone::Graveyard);

    resolve::resolve_top_of_stack(&mut game).unwrap();
    assert_eq!(executed.load(Ordering::SeqCst), 0);
    assert_eq!(game.card(source).unwrap().zone, Zone::Graveyard);
}

#[test]
fn spell_with_live_target_resolves() {
    let mut game = two_player_game();
    let victim = vanilla_creature(&mut game, PlayerName::Two, "Victim", 2, 2);
    let target = game.entity_id(victim).unwrap();

    let executed = Arc::new(AtomicUsize::new(0));
    let counter = executed.clone();
    push_spell(&mut game, PlayerName::One, vec![target], move |_game, _object| {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    resolve::resolve_top_of_stack(&mut game).unwrap();
    assert_eq!(executed.load(Ordering::SeqCst), 1);
}

#[test]
fn spell_of_departed_controller_is_countered() {
    let mut game = two_player_game();
    let executed = Arc::new(AtomicUsize::new(0));
    let counter = executed.clone();
    push_spell(&mut game, PlayerName::One, vec![], move |_game, _object| {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    game.player_mut(PlayerName::One).has_left = true;
    resolve::resolve_top_of_stack(&mut game).unwrap();
    assert_eq!(executed.load(Ordering::SeqCst), 0);
}

#[test]
fn all_players_passing_resolves_top_of_stack() {
    let mut game = two_player_game();
    let resolved = Arc::new(AtomicUsize::new(0));
    let counter = resolved.clone();
    push_spell(&mut game, PlayerName::One, vec![], move |_game, _object| {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    priority::pass(&mut game, PlayerName::One).unwrap();
    assert_eq!(resolved.load(Ordering::SeqCst), 0);
    assert_eq!(game.priority, PlayerName::Two);

    priority::pass(&mut game, PlayerName::Two).unwrap();
    assert_eq!(resolved.load(Ordering::SeqCst), 1);
    // After resolution, priority returns to the active player.
    assert_eq!(game.priority, PlayerName::One);
}

#[test]
fn passing_out_of_turn_is_rejected() {
    let mut game = two_player_game();
    let error = priority::pass(&mut game, PlayerName::Two).unwrap_err();
    assert_eq!(error.code(), "illegal-state");
}

#[test]
fn draw_from_empty_library_loses_the_game() {
    use data::game_states::game_state::GameStatus;
    use rules::mutations::state_based_actions;

    let mut game = two_player_game();
    game.player_mut(PlayerName::One).drew_from_empty_library = true;
    state_based_actions::run(&mut game);

    assert!(game.player(PlayerName::One).has_lost);
    match &game.status {
        GameStatus::GameOver { winners } => assert!(winners.contains(PlayerName::Two)),
        other => panic!("expected game over, got {other:?}"),
    }
}

#[test]
fn poison_threshold_loses_the_game() {
    use rules::mutations::state_based_actions;

    let mut game = two_player_game();
    game.player_mut(PlayerName::Two).poison = 10;
    state_based_actions::run(&mut game);
    assert!(game.player(PlayerName::Two).has_lost);
}

#[test]
fn orphaned_aura_moves_to_graveyard() {
    use rules::mutations::state_based_actions;

    let mut game = two_player_game();
    let bearer = vanilla_creature(&mut game, PlayerName::One, "Bearer", 2, 2);
    let turn = game.turn;
    let aura = game.zones.create_card(
        PlayerName::One,
        CardKind::Normal,
        PrintedCard {
            name: "Blessing".into(),
            card_types: enumset::EnumSet::only(data::core::card_types::CardType::Enchantment),
            subtypes: vec!["Aura".into()],
            power: None,
            toughness: None,
            abilities: enumset::EnumSet::empty(),
            loyalty: None,
        },
        Zone::Battlefield,
        turn,
    );
    game.card_mut(aura).unwrap().attached_to = Some(bearer);

    state_based_actions::run(&mut game);
    assert_eq!(game.card(aura).unwrap().zone, Zone::Battlefield);

    move_card::run(&mut game, Source::Game, bearer, Zone::Graveyard);
    state_based_actions::run(&mut game);
    assert_eq!(game.card(aura).unwrap().zone, Zone::Graveyard);
}

#[test]
fn planeswalker_without_loyalty_moves_to_graveyard() {
    use data::card_states::counters::CounterKind;
    use rules::mutations::state_based_actions;
    use testing::test_game::battlefield_planeswalker;

    let mut game = two_player_game();
    let planeswalker = battlefield_planeswalker(&mut game, PlayerName::Two, "Seer", 3);

    state_based_actions::run(&mut game);
    assert_eq!(game.card(planeswalker).unwrap().zone, Zone::Battlefield);

    game.card_mut(planeswalker).unwrap().counters.set(CounterKind::Loyalty, 0);
    state_based_actions::run(&mut game);
    assert_eq!(game.card(planeswalker).unwrap().zone, Zone::Graveyard);
}
