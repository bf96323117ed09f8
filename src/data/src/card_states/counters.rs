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

use serde::{Deserialize, Serialize};
use strum::Display;

/// Kinds of counters which may be placed on a card.
#[derive(
    Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize, Display,
)]
pub enum CounterKind {
    PlusOnePlusOne,
    MinusOneMinusOne,
    Loyalty,
    Charge,
}

/// Counters on a card, keyed by kind. Counts are always non-negative;
/// removing more counters than are present leaves zero.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Counters {
    counts: BTreeMap<CounterKind, u64>,
}

impl Counters {
    pub fn count(&self, kind: CounterKind) -> u64 {
        self.counts.get(&kind).copied().unwrap_or_default()
    }

    pub fn add(&mut self, kind: CounterKind, count: u64) {
        *self.counts.entry(kind).or_default() += count;
    }

    pub fn remove(&mut self, kind: CounterKind, count: u64) {
        let current = self.count(kind);
        let remaining = current.saturating_sub(count);
        if remaining == 0 {
            self.counts.remove(&kind);
        } else {
            self.counts.insert(kind, remaining);
        }
    }

    pub fn set(&mut self, kind: CounterKind, count: u64) {
        if count == 0 {
            self.counts.remove(&kind);
        } else {
            self.counts.insert(kind, count);
        }
    }

    pub fn all(&self) -> impl Iterator<Item = (CounterKind, u64)> + '_ {
        self.counts.iter().map(|(&kind, &count)| (kind, count))
    }
}
