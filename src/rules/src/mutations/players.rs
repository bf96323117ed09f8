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

use data::core::numerics::{Damage, LifeValue};
use data::events::game_event::{EventKind, GameEvent};
use data::game_states::game_state::GameState;
use data::player_states::player_state::PlayerQueries;
use primitives::game_primitives::{CardId, PlayerName};
use tracing::debug;
use utils::outcome;
use utils::outcome::Outcome;

use crate::dispatcher::dispatch;
use crate::queries::card_queries;

/// Reduces a player's life total after damage has been applied.
pub fn lose_life(game: &mut GameState, player: PlayerName, amount: Damage) -> Outcome {
    debug!(?player, amount, "Player losing life");
    game.player_mut(player).life -= amount as LifeValue;
    outcome::OK
}

/// Gains life for a player as a replaceable event.
///
/// The GAIN_LIFE event goes through the replacement pipeline first, so
/// effects which modify or prevent life gain see it before any state
/// changes.
pub fn gain_life(
    game: &mut GameState,
    source: CardId,
    player: PlayerName,
    amount: Damage,
) -> Outcome {
    let event = GameEvent::new(EventKind::GainLife)
        .with_source(source)
        .with_player(player)
        .with_amount(amount as i64);
    let Some(event) = dispatch::publish_returning(game, event) else {
        return outcome::OK;
    };
    if event.amount > 0 {
        debug!(?player, amount = event.amount, "Player gaining life");
        game.player_mut(player).life += event.amount;
    }
    outcome::OK
}

/// Applies lifelink for a parcel of damage dealt by a card.
pub fn apply_lifelink(game: &mut GameState, source: CardId, amount: Damage) -> Outcome {
    if amount == 0 {
        return outcome::OK;
    }
    let controller = card_queries::controller(game, source)?;
    gain_life(game, source, controller, amount)
}
