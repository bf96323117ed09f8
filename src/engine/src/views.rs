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

//! Per-player filtered game snapshots.
//!
//! Views mask hidden zones: a viewer sees the contents of their own
//! hand, but only the sizes of opponents' hands and of every library.

use std::collections::BTreeMap;

use data::card_states::zones::ZoneQueries;
use data::core::ability::Ability;
use data::core::numerics::{Damage, LifeValue, Power, Toughness};
use data::game_states::combat_state::{AttackTarget, CombatPhase};
use data::game_states::game_phase_step::GamePhaseStep;
use data::game_states::game_state::{GameState, GameStatus, TurnData};
use data::player_states::player_state::PlayerQueries;
use enumset::EnumSet;
use primitives::game_primitives::{CardId, GameId, PlayerName, Zone};
use rules::combat::cleanup;
use rules::queries::card_queries;
use serde::{Deserialize, Serialize};

/// One card as a viewer sees it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardView {
    pub id: CardId,
    pub name: String,
    pub controller: PlayerName,
    pub tapped: bool,
    pub damage: Damage,
    pub power: Option<Power>,
    pub toughness: Option<Toughness>,
    pub abilities: EnumSet<Ability>,
    pub attacking: Option<AttackTarget>,
    pub blocking: Vec<CardId>,
}

/// One player as a viewer sees them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerView {
    pub name: PlayerName,
    pub life: LifeValue,
    pub poison: u64,
    pub has_lost: bool,
    pub has_left: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CombatGroupView {
    pub attackers: Vec<CardId>,
    pub defender: AttackTarget,
    pub blockers: Vec<CardId>,
    pub blocked: bool,
}

/// Snapshot of a combat phase in progress.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CombatView {
    pub attacking_player: PlayerName,
    pub phase: CombatPhase,
    pub groups: Vec<CombatGroupView>,
    pub attackers_tapped: Vec<CardId>,
}

/// A complete per-player filtered snapshot of a game.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameView {
    pub game_id: GameId,
    pub viewer: PlayerName,
    pub status: GameStatus,
    pub step: GamePhaseStep,
    pub turn: TurnData,
    pub priority: PlayerName,
    pub players: Vec<PlayerView>,
    pub battlefield: Vec<CardView>,
    pub graveyards: BTreeMap<PlayerName, Vec<CardView>>,
    /// The viewer's own hand.
    pub hand: Vec<CardView>,
    /// Hand sizes for every player, including the viewer.
    pub hand_sizes: BTreeMap<PlayerName, usize>,
    pub library_sizes: BTreeMap<PlayerName, usize>,
    pub stack_size: usize,
    pub combat: Option<CombatView>,
    pub attacked_this_turn: Vec<CardId>,
    pub rules_error: Option<String>,
}

/// Builds the filtered snapshot of a game for one viewer.
pub fn game_view(game: &GameState, viewer: PlayerName) -> GameView {
    let players: Vec<PlayerView> = game
        .configuration
        .all_players
        .iter()
        .map(|name| {
            let player = game.player(name);
            PlayerView {
                name,
                life: player.life,
                poison: player.poison,
                has_lost: player.has_lost,
                has_left: player.has_left,
            }
        })
        .collect();

    let battlefield: Vec<CardView> = game
        .zones
        .all_cards()
        .filter(|card| card.zone == Zone::Battlefield)
        .map(|card| card_view(game, card.id))
        .collect();

    let mut graveyards = BTreeMap::new();
    let mut hand_sizes = BTreeMap::new();
    let mut library_sizes = BTreeMap::new();
    for name in game.configuration.all_players {
        graveyards.insert(
            name,
            game.graveyard(name).iter().map(|&id| card_view(game, id)).collect(),
        );
        hand_sizes.insert(name, game.hand(name).len());
        library_sizes.insert(name, game.library(name).len());
    }

    let hand: Vec<CardView> =
        game.hand(viewer).iter().map(|&id| card_view(game, id)).collect();

    let attacked_this_turn: Vec<CardId> = game
        .zones
        .all_cards()
        .map(|card| card.id)
        .filter(|&id| cleanup::attacked_this_turn(game, id))
        .collect();

    GameView {
        game_id: game.id,
        viewer,
        status: game.status.clone(),
        step: game.step,
        turn: game.turn,
        priority: game.priority,
        players,
        battlefield,
        graveyards,
        hand,
        hand_sizes,
        library_sizes,
        stack_size: game.stack().len(),
        combat: combat_view(game),
        attacked_this_turn,
        rules_error: game.rules_error.clone(),
    }
}

/// Builds a snapshot of the current combat, if any.
pub fn combat_view(game: &GameState) -> Option<CombatView> {
    let combat = game.combat.as_ref()?;
    Some(CombatView {
        attacking_player: combat.attacking_player,
        phase: combat.phase,
        groups: combat
            .groups
            .iter()
            .map(|group| CombatGroupView {
                attackers: group.attackers.clone(),
                defender: group.defender,
                blockers: group.blockers.clone(),
                blocked: group.blocked,
            })
            .collect(),
        attackers_tapped: combat.attackers_tapped.iter().copied().collect(),
    })
}

fn card_view(game: &GameState, id: CardId) -> CardView {
    let name = game.card(id).map(|card| card.printed.name.clone()).unwrap_or_default();
    let tapped =
        game.card(id).map(|card| card.tapped_state.is_tapped()).unwrap_or(false);
    let damage = game.card(id).map(|card| card.damage).unwrap_or(0);
    let attacking = game.card(id).and_then(|card| card.attacking);
    let blocking = game.card(id).map(|card| card.blocking.clone()).unwrap_or_default();
    let is_creature = card_queries::is_creature(game, id);
    let (power, toughness) = if is_creature {
        card_queries::power_toughness(game, id)
            .map(|(power, toughness)| (Some(power), Some(toughness)))
            .unwrap_or((None, None))
    } else {
        (None, None)
    };
    CardView {
        id,
        name,
        controller: card_queries::controller(game, id).unwrap_or(PlayerName::One),
        tapped,
        damage,
        power,
        toughness,
        abilities: card_queries::abilities(game, id).unwrap_or_default(),
        attacking,
        blocking,
    }
}
