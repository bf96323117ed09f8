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

use std::error::Error;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Result type for public engine operations.
///
/// Each operation is a transaction: if it returns an error, no state was
/// changed. Contrast with [utils::outcome::Outcome], which low-level
/// single-object mutations use to skip work on missing objects.
pub type GameResult<T> = Result<T, GameError>;

/// Errors returned to callers of public engine operations.
///
/// Every variant maps to a stable machine-readable code via
/// [GameError::code]; the [fmt::Display] implementation provides the
/// human-readable message.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub enum GameError {
    /// A game, card, or player ID was not recognized.
    NotFound { entity: String },

    /// The operation is not valid in the current phase or combat state.
    IllegalState { message: String },

    /// A declared combat action violates an ability or combat rule.
    RestrictionViolation { message: String },

    /// A target left its zone or no longer matches its requirement.
    TargetInvalid { message: String },

    /// An internal invariant was violated. The game is kept playable
    /// where possible.
    RulesError { message: String },

    /// The game has already been terminated.
    GameEnded,
}

impl GameError {
    /// Stable machine-readable code for this error kind.
    pub fn code(&self) -> &'static str {
        match self {
            GameError::NotFound { .. } => "not-found",
            GameError::IllegalState { .. } => "illegal-state",
            GameError::RestrictionViolation { .. } => "restriction-violation",
            GameError::TargetInvalid { .. } => "target-invalid",
            GameError::RulesError { .. } => "rules-error",
            GameError::GameEnded => "game-ended",
        }
    }

    pub fn not_found(entity: impl Into<String>) -> Self {
        GameError::NotFound { entity: entity.into() }
    }

    pub fn illegal_state(message: impl Into<String>) -> Self {
        GameError::IllegalState { message: message.into() }
    }

    pub fn restriction(message: impl Into<String>) -> Self {
        GameError::RestrictionViolation { message: message.into() }
    }

    pub fn target_invalid(message: impl Into<String>) -> Self {
        GameError::TargetInvalid { message: message.into() }
    }

    pub fn rules_error(message: impl Into<String>) -> Self {
        GameError::RulesError { message: message.into() }
    }
}

impl fmt::Display for GameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameError::NotFound { entity } => write!(f, "unknown {entity}"),
            GameError::IllegalState { message } => write!(f, "{message}"),
            GameError::RestrictionViolation { message } => write!(f, "{message}"),
            GameError::TargetInvalid { message } => write!(f, "{message}"),
            GameError::RulesError { message } => write!(f, "internal rules error: {message}"),
            GameError::GameEnded => write!(f, "game has ended"),
        }
    }
}

impl Error for GameError {}
