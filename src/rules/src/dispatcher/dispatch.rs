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

//! Event publication pipeline.
//!
//! Every published event passes three stages in order: the replacement
//! pipeline (which may rewrite or consume it), synchronous delivery to
//! bus subscribers in registration order, and trigger matching (which
//! appends to the triggered-ability queue). All three run on the calling
//! thread with the game lock held.

use data::card_states::zones::ZoneQueries;
use data::events::game_event::GameEvent;
use data::events::replacement::Replaced;
use data::events::triggers::PendingTriggeredAbility;
use data::game_states::game_state::{GameState, GameUpdate};
use tracing::warn;

use crate::queries::card_queries;

/// Publishes an event: replacement effects apply first, then subscribers
/// are delivered in order, then triggers match.
pub fn publish(game: &mut GameState, event: GameEvent) {
    publish_returning(game, event);
}

/// Equivalent to [publish], returning the event as it looked after
/// replacement effects, or None if a replacement consumed it.
///
/// Callers which act on the event's payload (e.g. the damage pipeline)
/// use the returned event so that replacements and preventions are
/// honored.
pub fn publish_returning(game: &mut GameState, event: GameEvent) -> Option<GameEvent> {
    let event = replace_event(game, event)?;
    deliver(game, &event);
    match_triggers(game, &event);
    game.send_update(GameUpdate::Event(event.clone()));
    Some(event)
}

/// Runs the replacement-effect loop for an event.
///
/// Collects applicable effects not already applied to the event,
/// prefers self-replacement effects (lowest ID breaks ties), otherwise
/// asks the chooser, and repeats until no effect remains applicable.
/// Returns None if an effect consumed the event.
///
/// A hard iteration cap defends against malformed mutually-replacing
/// effects; on exceeding it the event is returned as-is and the game is
/// marked with a rules error.
pub fn replace_event(game: &mut GameState, event: GameEvent) -> Option<GameEvent> {
    let cap = game.configuration.maximum_replacements_per_event;
    let mut event = event;
    for _ in 0..cap {
        let applicable = game.replacements.applicable(game, &event);
        if applicable.is_empty() {
            return Some(event);
        }

        let self_replacements: Vec<_> = applicable
            .iter()
            .copied()
            .filter(|&id| {
                game.replacements.effect(id).map(|effect| effect.self_scope).unwrap_or(false)
            })
            .collect();

        let chosen = if let Some(&first) = self_replacements.iter().min() {
            first
        } else if applicable.len() == 1 {
            applicable[0]
        } else {
            let chooser = game.chooser.clone();
            let choice = chooser.choose_replacement(game, &event, &applicable);
            if applicable.contains(&choice) {
                choice
            } else {
                game.mark_rules_error("chooser returned an inapplicable replacement effect");
                applicable[0]
            }
        };

        let Some(effect) = game.replacements.effect(chosen).cloned() else {
            return Some(event);
        };
        event.applied_effects.push(chosen);
        match (*effect.replace)(game, event) {
            Replaced::Event(replaced) => event = replaced,
            Replaced::Consumed => return None,
        }
    }

    game.mark_rules_error(format!(
        "replacement loop exceeded {cap} iterations for {:?}",
        event.kind
    ));
    Some(event)
}

/// Delivers an event to every subscriber registered for its type, in
/// registration order.
///
/// A failing subscriber never aborts delivery: errors are collected and
/// logged, and the remaining subscribers still run.
fn deliver(game: &mut GameState, event: &GameEvent) {
    for index in 0..game.bus.len() {
        let Some(subscriber) = game.bus.matching_at(index, event.kind) else {
            continue;
        };
        let id = subscriber.id;
        let callback = subscriber.callback.clone();
        if let Err(error) = (*callback)(game, event) {
            warn!(?id, kind = ?event.kind, %error, "Event subscriber failed");
        }
    }
}

/// Appends a pending triggered ability for every registered trigger
/// whose condition matches this event.
///
/// Dies-triggers read the last-known-information snapshot stored on the
/// game before the zone change was indexed; the snapshot travels with
/// the pending ability so the effect can resolve against it.
fn match_triggers(game: &mut GameState, event: &GameEvent) {
    for index in 0..game.triggers.len() {
        let Some(trigger) = game.triggers.matching_at(index, event.kind).cloned() else {
            continue;
        };
        let Some(card) = game.card(trigger.source) else {
            continue;
        };
        if !trigger.zones.contains(card.zone) {
            continue;
        }
        let source_object = card.object_id;
        if !(*trigger.condition)(game, event) {
            continue;
        }
        let controller =
            card_queries::controller(game, trigger.source).unwrap_or(game.active_player());
        let last_known = game.last_known.get(&trigger.source).cloned();
        game.triggered_queue.push(PendingTriggeredAbility {
            trigger_id: trigger.id,
            source: trigger.source,
            source_object,
            controller,
            event: event.clone(),
            effect: trigger.effect.clone(),
            last_known,
        });
    }
}
