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

use data::printed_cards::card_catalog::CardCatalog;
use data::printed_cards::printed_card::PrintedCard;

/// A fixed in-memory card catalog for tests.
#[derive(Debug, Clone, Default)]
pub struct StubCatalog {
    cards: BTreeMap<String, PrintedCard>,
}

impl StubCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_card(mut self, printed: PrintedCard) -> Self {
        self.cards.insert(printed.name.clone(), printed);
        self
    }
}

impl CardCatalog for StubCatalog {
    fn printed(&self, name: &str) -> Option<PrintedCard> {
        self.cards.get(name).cloned()
    }
}
