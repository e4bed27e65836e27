// Copyright 2025 John Brosnihan
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//! Error types shared across the crate
//!
//! Each concern has its own error enum; [`EngineError`] unifies them for
//! the system and session APIs so callers can propagate with `?`.

use crate::assets::AssetError;
use crate::config::ConfigError;
use crate::ecs::Entity;
use crate::messaging::MessagingError;
use thiserror::Error;

/// Top-level error returned by systems, initializers and sessions
#[derive(Debug, Error)]
pub enum EngineError {
    /// An operation was invoked out of order
    #[error("usage error: {0}")]
    Usage(String),

    /// The entity handle refers to a destroyed entity
    #[error("stale entity handle {0}")]
    StaleEntity(Entity),

    /// Queue precondition violated
    #[error(transparent)]
    Messaging(#[from] MessagingError),

    /// Asset collaborator failure
    #[error(transparent)]
    Asset(#[from] AssetError),

    /// Invalid or unreadable configuration
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl EngineError {
    /// Build a usage-order error
    pub fn usage(message: impl Into<String>) -> Self {
        EngineError::Usage(message.into())
    }
}
