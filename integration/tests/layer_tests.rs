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

use data::card_states::counters::CounterKind;
use data::card_states::zones::ZoneQueries;
use data::core::ability::Ability;
use data::game_states::game_state::TurnData;
use data::properties::duration::Duration;
use primitives::game_primitives::{PlayerName, Source};
use rules::queries::card_queries;
use testing::test_game::{two_player_game, vanilla_creature};

#[test]
fn granted_ability_reads_through_layer_system() {
    let mut game = two_player_game();
    let creature = vanilla_creature(&mut game, PlayerName::One, "Bear", 2, 2);
    assert!(!card_queries::has_ability(&game, creature, Ability::Flying));

    let timestamp = game.zones.new_timestamp();
    game.card_mut(creature).unwrap().properties.gain_abilities(
        Source::Game,
        Duration::Continuous,
        timestamp,
        Ability::Flying,
    );
    assert!(card_queries::has_ability(&game, creature, Ability::Flying));
}

#[test]
fn later_removal_overrides_earlier_grant() {
    let mut game = two_player_game();
    let creature = vanilla_creature(&mut game, PlayerName::One, "Bear", 2, 2);

    let grant = game.zones.new_timestamp();
    game.card_mut(creature).unwrap().properties.gain_abilities(
        Source::Game,
        Duration::Continuous,
        grant,
        Ability::Flying,
    );
    let removal = game.zones.new_timestamp();
    game.card_mut(creature).unwrap().properties.lose_abilities(
        Source::Game,
        Duration::Continuous,
        removal,
        Ability::Flying,
    );
    assert!(!card_queries::has_ability(&game, creature, Ability::Flying));
}

#[test]
fn this_turn_effects_expire_with_the_turn() {
    let mut game = two_player_game();
    let creature = vanilla_creature(&mut game, PlayerName::One, "Bear", 2, 2);

    let timestamp = game.zones.new_timestamp();
    let this_turn = Duration::ThisTurn(game.turn);
    game.card_mut(creature).unwrap().properties.add_power_toughness(
        Source::Game,
        this_turn,
        timestamp,
        2,
        2,
    );
    assert_eq!(card_queries::power_toughness(&game, creature), Some((4, 4)));

    game.turn = TurnData { active_player: PlayerName::Two, turn_number: 2 };
    assert_eq!(card_queries::power_toughness(&game, creature), Some((2, 2)));
}

#[test]
fn power_toughness_layers_apply_in_order() {
    let mut game = two_player_game();
    let creature = vanilla_creature(&mut game, PlayerName::One, "Shapeshifter", 1, 1);

    // Setting layer applies before the modifying layer regardless of
    // registration order.
    let add = game.zones.new_timestamp();
    game.card_mut(creature).unwrap().properties.add_power_toughness(
        Source::Game,
        Duration::Continuous,
        add,
        2,
        0,
    );
    let set = game.zones.new_timestamp();
    game.card_mut(creature).unwrap().properties.set_power_toughness(
        Source::Game,
        Duration::Continuous,
        set,
        5,
        5,
    );

    // Base set to 5/5, then +2/+0.
    assert_eq!(card_queries::power_toughness(&game, creature), Some((7, 5)));
}

#[test]
fn counters_apply_after_modifiers_and_before_switch() {
    let mut game = two_player_game();
    let creature = vanilla_creature(&mut game, PlayerName::One, "Acolyte", 1, 3);

    game.card_mut(creature).unwrap().counters.add(CounterKind::PlusOnePlusOne, 2);
    assert_eq!(card_queries::power_toughness(&game, creature), Some((3, 5)));

    let timestamp = game.zones.new_timestamp();
    game.card_mut(creature).unwrap().properties.switch_power_toughness(
        Source::Game,
        Duration::Continuous,
        timestamp,
    );
    assert_eq!(card_queries::power_toughness(&game, creature), Some((5, 3)));
}

#[test]
fn minus_counters_can_kill_via_state_based_actions() {
    let mut game = two_player_game();
    let creature = vanilla_creature(&mut game, PlayerName::One, "Wisp", 2, 2);

    game.card_mut(creature).unwrap().counters.add(CounterKind::MinusOneMinusOne, 2);
    assert_eq!(card_queries::toughness(&game, creature), Some(0));

    rules::mutations::state_based_actions::run(&mut game);
    assert_eq!(game.card(creature).unwrap().zone, primitives::game_primitives::Zone::Graveyard);
}

#[test]
fn control_change_reads_through_layer_system() {
    let mut game = two_player_game();
    let creature = vanilla_creature(&mut game, PlayerName::One, "Defector", 2, 2);
    assert_eq!(card_queries::controller(&game, creature), Some(PlayerName::One));

    let timestamp = game.zones.new_timestamp();
    game.card_mut(creature).unwrap().properties.gain_control(
        Source::Game,
        Duration::Continuous,
        timestamp,
        PlayerName::Two,
    );
    assert_eq!(card_queries::controller(&game, creature), Some(PlayerName::Two));
    assert!(card_queries::battlefield_controlled_by(&game, PlayerName::Two).contains(&creature));
}

#[test]
fn effective_types_gate_creature_queries() {
    use data::core::card_types::CardType;
    use data::printed_cards::printed_card::PrintedCard;

    let mut game = two_player_game();
    let turn = game.turn;
    let vehicle = game.zones.create_card(
        PlayerName::One,
        data::card_states::card_state::CardKind::Normal,
        PrintedCard {
            name: "Carriage".into(),
            card_types: enumset::EnumSet::only(CardType::Artifact),
            subtypes: vec!["Vehicle".into()],
            power: Some(data::printed_cards::printed_card::PrintedValue::Fixed(4)),
            toughness: Some(data::printed_cards::printed_card::PrintedValue::Fixed(4)),
            abilities: enumset::EnumSet::empty(),
            loyalty: None,
        },
        primitives::game_primitives::Zone::Battlefield,
        turn,
    );
    assert!(!card_queries::is_creature(&game, vehicle));

    let timestamp = game.zones.new_timestamp();
    let current_turn = game.turn;
    game.card_mut(vehicle).unwrap().properties.gain_types(
        Source::Game,
        Duration::ThisTurn(current_turn),
        timestamp,
        CardType::Creature,
    );
    assert!(card_queries::is_creature(&game, vehicle));
}
