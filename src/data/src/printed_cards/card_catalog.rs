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

use crate::printed_cards::printed_card::PrintedCard;

/// Source of printed card data.
///
/// The card database is an external collaborator: the engine receives an
/// implementation at construction and never resolves card names any
/// other way.
pub trait CardCatalog: Send + Sync {
    /// Looks up the printed characteristics for a card name.
    fn printed(&self, name: &str) -> Option<PrintedCard>;
}
