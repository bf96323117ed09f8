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

use std::collections::BTreeMap;

use data::card_states::zones::ZoneQueries;
use data::core::ability::Ability;
use data::core::game_error::GameError;
use data::player_states::player_state::PlayerQueries;
use primitives::game_primitives::{PlayerName, Zone};
use rules::combat::{blocks, cleanup, damage, declare};
use rules::queries::card_queries;
use testing::test_game::{
    attack_player, battlefield_creature, begin_combat, block, confirm_attackers,
    run_combat_damage, two_player_game, vanilla_creature,
};

#[test]
fn unblocked_attacker_damages_player() {
    integration::init_tracing();
    let mut game = two_player_game();
    let attacker = vanilla_creature(&mut game, PlayerName::One, "Hill Giant", 3, 3);

    begin_combat(&mut game);
    attack_player(&mut game, attacker, PlayerName::Two);
    confirm_attackers(&mut game);
    run_combat_damage(&mut game);

    assert_eq!(game.player(PlayerName::Two).life, 17);
    assert_eq!(game.card(attacker).unwrap().zone, Zone::Battlefield);
    assert!(game.card(attacker).unwrap().tapped_state.is_tapped());

    cleanup::end_combat(&mut game);
    assert_eq!(game.card(attacker).unwrap().damage, 0);
    assert!(cleanup::attacked_this_turn(&game, attacker));
}

#[test]
fn evenly_matched_creatures_destroy_each_other() {
    let mut game = two_player_game();
    let attacker = vanilla_creature(&mut game, PlayerName::One, "Gray Bear", 3, 3);
    let blocker = vanilla_creature(&mut game, PlayerName::Two, "Other Bear", 3, 3);

    begin_combat(&mut game);
    attack_player(&mut game, attacker, PlayerName::Two);
    confirm_attackers(&mut game);
    block(&mut game, blocker, attacker);
    run_combat_damage(&mut game);

    assert_eq!(game.card(attacker).unwrap().zone, Zone::Graveyard);
    assert_eq!(game.card(blocker).unwrap().zone, Zone::Graveyard);
    assert_eq!(game.player(PlayerName::Two).life, 20);

    cleanup::end_combat(&mut game);
    assert!(!game.former_groups.is_empty());
}

#[test]
fn first_strike_kills_before_normal_damage() {
    let mut game = two_player_game();
    let attacker = battlefield_creature(
        &mut game,
        PlayerName::One,
        "Swift Duelist",
        2,
        2,
        Ability::FirstStrike,
    );
    let blocker = vanilla_creature(&mut game, PlayerName::Two, "Slow Bear", 2, 2);

    begin_combat(&mut game);
    attack_player(&mut game, attacker, PlayerName::Two);
    confirm_attackers(&mut game);
    block(&mut game, blocker, attacker);
    blocks::accept_blockers(&mut game).unwrap();

    assert!(damage::has_first_or_double_strike(&game));
    damage::assign_combat_damage(&mut game, true).unwrap();
    damage::apply_combat_damage(&mut game).unwrap();

    assert_eq!(game.card(blocker).unwrap().zone, Zone::Graveyard);
    assert_eq!(game.card(attacker).unwrap().zone, Zone::Battlefield);
    assert_eq!(game.card(attacker).unwrap().damage, 0);

    let life_before = game.player(PlayerName::Two).life;
    damage::assign_combat_damage(&mut game, false).unwrap();
    damage::apply_combat_damage(&mut game).unwrap();
    assert_eq!(game.player(PlayerName::Two).life, life_before);
    assert_eq!(game.card(attacker).unwrap().damage, 0);
}

#[test]
fn first_strike_step_is_noop_without_first_strikers() {
    let mut game = two_player_game();
    let attacker = vanilla_creature(&mut game, PlayerName::One, "Bear", 2, 2);
    let blocker = vanilla_creature(&mut game, PlayerName::Two, "Other Bear", 2, 2);

    begin_combat(&mut game);
    attack_player(&mut game, attacker, PlayerName::Two);
    confirm_attackers(&mut game);
    block(&mut game, blocker, attacker);
    blocks::accept_blockers(&mut game).unwrap();

    assert!(!damage::has_first_or_double_strike(&game));
    damage::assign_combat_damage(&mut game, true).unwrap();
    damage::apply_combat_damage(&mut game).unwrap();
    assert_eq!(game.card(attacker).unwrap().damage, 0);
    assert_eq!(game.card(blocker).unwrap().damage, 0);
    assert_eq!(game.player(PlayerName::Two).life, 20);
}

#[test]
fn trample_carries_over_blocker() {
    let mut game = two_player_game();
    let attacker =
        battlefield_creature(&mut game, PlayerName::One, "Crasher", 6, 6, Ability::Trample);
    let blocker = vanilla_creature(&mut game, PlayerName::Two, "Chump", 2, 2);

    begin_combat(&mut game);
    attack_player(&mut game, attacker, PlayerName::Two);
    confirm_attackers(&mut game);
    block(&mut game, blocker, attacker);
    run_combat_damage(&mut game);

    assert_eq!(game.card(blocker).unwrap().zone, Zone::Graveyard);
    assert_eq!(game.player(PlayerName::Two).life, 16);
}

#[test]
fn deathtouch_trample_assigns_single_lethal_point() {
    let mut game = two_player_game();
    let attacker = battlefield_creature(
        &mut game,
        PlayerName::One,
        "Venomous Crasher",
        4,
        4,
        Ability::Deathtouch | Ability::Trample,
    );
    let blocker = vanilla_creature(&mut game, PlayerName::Two, "Wall of Meat", 5, 5);

    begin_combat(&mut game);
    attack_player(&mut game, attacker, PlayerName::Two);
    confirm_attackers(&mut game);
    block(&mut game, blocker, attacker);
    blocks::accept_blockers(&mut game).unwrap();
    damage::assign_combat_damage(&mut game, false).unwrap();

    // One point is lethal under deathtouch; three carry over.
    damage::apply_combat_damage(&mut game).unwrap();
    assert_eq!(game.card(blocker).unwrap().zone, Zone::Graveyard);
    assert_eq!(game.player(PlayerName::Two).life, 17);
}

#[test]
fn menace_removes_single_blocker() {
    let mut game = two_player_game();
    let attacker =
        battlefield_creature(&mut game, PlayerName::One, "Dreadmaw", 4, 4, Ability::Menace);
    let blocker = vanilla_creature(&mut game, PlayerName::Two, "Lone Guard", 2, 2);

    begin_combat(&mut game);
    attack_player(&mut game, attacker, PlayerName::Two);
    confirm_attackers(&mut game);
    block(&mut game, blocker, attacker);
    run_combat_damage(&mut game);

    // The single block was illegal and silently removed, so the
    // attacker connects with the defending player.
    assert!(!game.card(blocker).unwrap().is_blocking());
    assert_eq!(game.card(blocker).unwrap().damage, 0);
    assert_eq!(game.player(PlayerName::Two).life, 16);
}

#[test]
fn menace_two_blockers_stand() {
    let mut game = two_player_game();
    let attacker =
        battlefield_creature(&mut game, PlayerName::One, "Dreadmaw", 4, 4, Ability::Menace);
    let first = vanilla_creature(&mut game, PlayerName::Two, "Guard One", 2, 2);
    let second = vanilla_creature(&mut game, PlayerName::Two, "Guard Two", 2, 2);

    begin_combat(&mut game);
    attack_player(&mut game, attacker, PlayerName::Two);
    confirm_attackers(&mut game);
    block(&mut game, first, attacker);
    block(&mut game, second, attacker);
    run_combat_damage(&mut game);

    assert_eq!(game.player(PlayerName::Two).life, 20);
    assert_eq!(game.card(attacker).unwrap().zone, Zone::Graveyard);
}

#[test]
fn banding_moves_damage_assignment_to_defender() {
    let mut game = two_player_game();
    let attacker =
        battlefield_creature(&mut game, PlayerName::One, "Banded Veteran", 3, 3, Ability::Banding);
    let first = vanilla_creature(&mut game, PlayerName::Two, "Blocker One", 2, 2);
    let second = vanilla_creature(&mut game, PlayerName::Two, "Blocker Two", 2, 2);

    begin_combat(&mut game);
    attack_player(&mut game, attacker, PlayerName::Two);
    confirm_attackers(&mut game);
    block(&mut game, first, attacker);
    block(&mut game, second, attacker);
    blocks::accept_blockers(&mut game).unwrap();

    let mut assignments = BTreeMap::new();
    assignments.insert(first, 2);
    assignments.insert(second, 1);

    let error = damage::assign_attacker_damage(&mut game, attacker, PlayerName::One, &assignments)
        .unwrap_err();
    assert!(matches!(error, GameError::RestrictionViolation { .. }));
    assert!(error.to_string().contains("defending player must assign"));

    damage::assign_attacker_damage(&mut game, attacker, PlayerName::Two, &assignments).unwrap();
    damage::assign_combat_damage(&mut game, false).unwrap();
    damage::apply_combat_damage(&mut game).unwrap();

    assert_eq!(game.card(first).unwrap().zone, Zone::Graveyard);
    assert_eq!(game.card(second).unwrap().damage, 1);
}

#[test]
fn lure_requires_only_able_blockers() {
    let mut game = two_player_game();
    let attacker = battlefield_creature(
        &mut game,
        PlayerName::One,
        "Alluring Skywhale",
        3,
        3,
        Ability::Flying | Ability::Lure,
    );
    let grounded = vanilla_creature(&mut game, PlayerName::Two, "Grounded Bear", 2, 2);
    let flyer =
        battlefield_creature(&mut game, PlayerName::Two, "Watchful Drake", 2, 2, Ability::Flying);

    begin_combat(&mut game);
    attack_player(&mut game, attacker, PlayerName::Two);
    confirm_attackers(&mut game);

    let violations = blocks::check_block_requirements(&game, PlayerName::Two);
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].blocker, flyer);
    assert_eq!(violations[0].attacker, attacker);
    assert!(!violations.iter().any(|violation| violation.blocker == grounded));

    block(&mut game, flyer, attacker);
    assert!(blocks::check_block_requirements(&game, PlayerName::Two).is_empty());
}

#[test]
fn attacking_taps_unless_vigilance() {
    let mut game = two_player_game();
    let normal = vanilla_creature(&mut game, PlayerName::One, "Footsoldier", 2, 2);
    let vigilant =
        battlefield_creature(&mut game, PlayerName::One, "Watcher", 2, 2, Ability::Vigilance);

    begin_combat(&mut game);
    attack_player(&mut game, normal, PlayerName::Two);
    attack_player(&mut game, vigilant, PlayerName::Two);

    assert!(game.card(normal).unwrap().tapped_state.is_tapped());
    assert!(!game.card(vigilant).unwrap().tapped_state.is_tapped());
    let combat = game.combat.as_ref().unwrap();
    assert!(combat.attackers_tapped.contains(&normal));
    assert!(!combat.attackers_tapped.contains(&vigilant));
}

#[test]
fn flying_attacker_blockable_only_by_flying_or_reach() {
    let mut game = two_player_game();
    let attacker =
        battlefield_creature(&mut game, PlayerName::One, "Skywhale", 3, 3, Ability::Flying);
    let grounded = vanilla_creature(&mut game, PlayerName::Two, "Bear", 2, 2);
    let spider =
        battlefield_creature(&mut game, PlayerName::Two, "Spider", 1, 4, Ability::Reach);
    let drake =
        battlefield_creature(&mut game, PlayerName::Two, "Drake", 2, 2, Ability::Flying);

    begin_combat(&mut game);
    attack_player(&mut game, attacker, PlayerName::Two);
    confirm_attackers(&mut game);

    assert!(!blocks::can_block(&game, grounded, attacker).unwrap());
    assert!(blocks::can_block(&game, spider, attacker).unwrap());
    assert!(blocks::can_block(&game, drake, attacker).unwrap());
}

#[test]
fn tapped_and_summoning_sick_creatures_cannot_attack() {
    let mut game = two_player_game();
    let tapped = vanilla_creature(&mut game, PlayerName::One, "Tired Bear", 2, 2);
    let fresh = {
        use data::card_states::card_state::CardKind;
        use data::printed_cards::printed_card::PrintedCard;
        let turn = game.turn;
        game.zones.create_card(
            PlayerName::One,
            CardKind::Normal,
            PrintedCard::vanilla_creature("New Arrival", 2, 2),
            Zone::Battlefield,
            turn,
        )
    };
    let hasty = battlefield_creature(&mut game, PlayerName::One, "Sprinter", 2, 2, Ability::Haste);

    begin_combat(&mut game);
    rules::mutations::permanents::tap(
        &mut game,
        primitives::game_primitives::Source::Game,
        tapped,
    );

    assert!(!declare::can_attack(&game, tapped).unwrap());
    assert!(!declare::can_attack(&game, fresh).unwrap());
    assert!(declare::can_attack(&game, hasty).unwrap());
}

#[test]
fn granted_haste_allows_fresh_creature_to_attack() {
    let mut game = two_player_game();
    let fresh = {
        use data::card_states::card_state::CardKind;
        use data::printed_cards::printed_card::PrintedCard;
        let turn = game.turn;
        game.zones.create_card(
            PlayerName::One,
            CardKind::Normal,
            PrintedCard::vanilla_creature("New Arrival", 2, 2),
            Zone::Battlefield,
            turn,
        )
    };
    begin_combat(&mut game);
    assert!(!declare::can_attack(&game, fresh).unwrap());

    let timestamp = game.zones.new_timestamp();
    game.card_mut(fresh).unwrap().properties.gain_abilities(
        primitives::game_primitives::Source::Game,
        data::properties::duration::Duration::Continuous,
        timestamp,
        Ability::Haste,
    );
    assert!(declare::can_attack(&game, fresh).unwrap());
}

#[test]
fn damage_equals_recorded_sources() {
    let mut game = two_player_game();
    let attacker = vanilla_creature(&mut game, PlayerName::One, "Bruiser", 4, 5);
    let blocker = vanilla_creature(&mut game, PlayerName::Two, "Sturdy Wall", 2, 6);

    begin_combat(&mut game);
    attack_player(&mut game, attacker, PlayerName::Two);
    confirm_attackers(&mut game);
    block(&mut game, blocker, attacker);
    run_combat_damage(&mut game);

    for id in [attacker, blocker] {
        let card = game.card(id).unwrap();
        let from_sources: u64 = card.damage_sources.values().sum();
        assert_eq!(card.damage, from_sources);
    }
    assert_eq!(game.card(attacker).unwrap().damage, 2);
    assert_eq!(game.card(blocker).unwrap().damage, 4);
}

#[test]
fn attacker_becomes_unblocked_when_blocker_leaves_battlefield() {
    let mut game = two_player_game();
    let attacker = vanilla_creature(&mut game, PlayerName::One, "Bear", 2, 2);
    let blocker = vanilla_creature(&mut game, PlayerName::Two, "Sacrifice", 1, 1);

    begin_combat(&mut game);
    attack_player(&mut game, attacker, PlayerName::Two);
    confirm_attackers(&mut game);
    block(&mut game, blocker, attacker);
    blocks::accept_blockers(&mut game).unwrap();

    // The blocker leaves the battlefield before damage; its group
    // becomes unblocked and the attacker connects with the player.
    rules::mutations::move_card::run(
        &mut game,
        primitives::game_primitives::Source::Game,
        blocker,
        Zone::Graveyard,
    );
    let combat = game.combat.as_ref().unwrap();
    assert!(combat.groups.iter().all(|group| !group.blocked));

    damage::assign_combat_damage(&mut game, false).unwrap();
    damage::apply_combat_damage(&mut game).unwrap();
    assert_eq!(game.player(PlayerName::Two).life, 18);
}

#[test]
fn ordered_blockers_receive_lethal_in_sequence() {
    let mut game = two_player_game();
    let attacker = vanilla_creature(&mut game, PlayerName::One, "Giant", 5, 5);
    let first = vanilla_creature(&mut game, PlayerName::Two, "Frontline", 2, 2);
    let second = vanilla_creature(&mut game, PlayerName::Two, "Backline", 2, 4);

    begin_combat(&mut game);
    attack_player(&mut game, attacker, PlayerName::Two);
    confirm_attackers(&mut game);
    block(&mut game, first, attacker);
    block(&mut game, second, attacker);
    blocks::accept_blockers(&mut game).unwrap();
    blocks::order_blockers(&mut game, attacker, &[second, first]).unwrap();

    damage::assign_combat_damage(&mut game, false).unwrap();
    damage::apply_combat_damage(&mut game).unwrap();

    // Second was ordered first: lethal 4 there, remaining 1 to first.
    assert_eq!(game.card(second).unwrap().zone, Zone::Graveyard);
    assert_eq!(game.card(first).unwrap().zone, Zone::Battlefield);
    assert_eq!(game.card(first).unwrap().damage, 1);
}

#[test]
fn order_blockers_rejects_wrong_multiset() {
    let mut game = two_player_game();
    let attacker = vanilla_creature(&mut game, PlayerName::One, "Giant", 5, 5);
    let blocker = vanilla_creature(&mut game, PlayerName::Two, "Frontline", 2, 2);
    let bystander = vanilla_creature(&mut game, PlayerName::Two, "Bystander", 1, 1);

    begin_combat(&mut game);
    attack_player(&mut game, attacker, PlayerName::Two);
    confirm_attackers(&mut game);
    block(&mut game, blocker, attacker);
    blocks::accept_blockers(&mut game).unwrap();

    let error = blocks::order_blockers(&mut game, attacker, &[bystander]).unwrap_err();
    assert!(matches!(error, GameError::RestrictionViolation { .. }));
}

#[test]
fn attacker_must_be_tapped_or_vigilant_while_attacking() {
    let mut game = two_player_game();
    let normal = vanilla_creature(&mut game, PlayerName::One, "Footsoldier", 2, 2);
    let vigilant =
        battlefield_creature(&mut game, PlayerName::One, "Watcher", 2, 2, Ability::Vigilance);

    begin_combat(&mut game);
    attack_player(&mut game, normal, PlayerName::Two);
    attack_player(&mut game, vigilant, PlayerName::Two);

    for id in [normal, vigilant] {
        let card = game.card(id).unwrap();
        assert!(
            card.tapped_state.is_tapped()
                || card_queries::has_ability(&game, id, Ability::Vigilance)
        );
    }
}

#[test]
fn blocked_flag_tracks_blocker_count() {
    let mut game = two_player_game();
    let attacker = vanilla_creature(&mut game, PlayerName::One, "Bear", 2, 2);
    let blocker = vanilla_creature(&mut game, PlayerName::Two, "Other Bear", 2, 2);

    begin_combat(&mut game);
    attack_player(&mut game, attacker, PlayerName::Two);
    confirm_attackers(&mut game);
    block(&mut game, blocker, attacker);

    for group in &game.combat.as_ref().unwrap().groups {
        assert_eq!(group.blocked, !group.blockers.is_empty());
    }

    blocks::remove_blocker(&mut game, blocker).unwrap();
    for group in &game.combat.as_ref().unwrap().groups {
        assert_eq!(group.blocked, !group.blockers.is_empty());
    }
}

#[test]
fn lifelink_gains_life_for_combat_damage() {
    let mut game = two_player_game();
    let attacker =
        battlefield_creature(&mut game, PlayerName::One, "Chaplain", 3, 3, Ability::Lifelink);

    begin_combat(&mut game);
    attack_player(&mut game, attacker, PlayerName::Two);
    confirm_attackers(&mut game);
    run_combat_damage(&mut game);

    assert_eq!(game.player(PlayerName::Two).life, 17);
    assert_eq!(game.player(PlayerName::One).life, 23);
}

#[test]
fn attacking_a_planeswalker_removes_loyalty() {
    use data::game_states::combat_state::AttackTarget;
    use testing::test_game::battlefield_planeswalker;

    let mut game = two_player_game();
    let attacker = vanilla_creature(&mut game, PlayerName::One, "Raider", 2, 2);
    let planeswalker = battlefield_planeswalker(&mut game, PlayerName::Two, "Seer", 3);

    begin_combat(&mut game);
    let active = game.active_player();
    declare::declare_attacker(
        &mut game,
        attacker,
        AttackTarget::Planeswalker(PlayerName::Two, planeswalker),
        active,
    )
    .unwrap();
    confirm_attackers(&mut game);
    run_combat_damage(&mut game);

    assert_eq!(card_queries::loyalty(&game, planeswalker), 1);
    assert_eq!(game.player(PlayerName::Two).life, 20);
}

#[test]
fn trample_over_planeswalkers_carries_to_the_planeswalker() {
    use data::game_states::combat_state::AttackTarget;
    use testing::test_game::battlefield_planeswalker;

    let mut game = two_player_game();
    let attacker = battlefield_creature(
        &mut game,
        PlayerName::One,
        "Juggernaut",
        5,
        5,
        Ability::Trample | Ability::TrampleOverPlaneswalkers,
    );
    let blocker = vanilla_creature(&mut game, PlayerName::Two, "Guard", 2, 2);
    let planeswalker = battlefield_planeswalker(&mut game, PlayerName::Two, "Seer", 4);

    begin_combat(&mut game);
    let active = game.active_player();
    declare::declare_attacker(
        &mut game,
        attacker,
        AttackTarget::Planeswalker(PlayerName::Two, planeswalker),
        active,
    )
    .unwrap();
    confirm_attackers(&mut game);
    block(&mut game, blocker, attacker);
    run_combat_damage(&mut game);

    // Lethal 2 to the blocker, remaining 3 tramples onto the
    // planeswalker.
    assert_eq!(game.card(blocker).unwrap().zone, Zone::Graveyard);
    assert_eq!(card_queries::loyalty(&game, planeswalker), 1);
}

#[test]
fn removal_from_combat_unblocks_group_without_untapping() {
    let mut game = two_player_game();
    let attacker = vanilla_creature(&mut game, PlayerName::One, "Bear", 2, 2);
    let blocker = vanilla_creature(&mut game, PlayerName::Two, "Other Bear", 2, 2);

    begin_combat(&mut game);
    attack_player(&mut game, attacker, PlayerName::Two);
    confirm_attackers(&mut game);
    block(&mut game, blocker, attacker);

    cleanup::remove_from_combat(&mut game, blocker);
    let combat = game.combat.as_ref().unwrap();
    assert!(combat.groups.iter().all(|group| group.blockers.is_empty() && !group.blocked));
    assert!(game.card(attacker).unwrap().tapped_state.is_tapped());

    cleanup::remove_from_combat(&mut game, attacker);
    assert!(game.combat.as_ref().unwrap().groups.is_empty());
    // Removal from combat never untaps.
    assert!(game.card(attacker).unwrap().tapped_state.is_tapped());
}
