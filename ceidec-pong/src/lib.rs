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
//! # Ceidec Pong
//!
//! The gameplay core of a Pong clone (and of an unfinished second game)
//! built on a small entity-component-system.
//!
//! ## Features
//!
//! - **ECS Architecture**: generational entities, pooled components and
//!   incrementally indexed component families
//! - **Update Pipeline**: staged systems run in a fixed order every frame
//! - **Messaging**: one typed, mutex-guarded queue decouples the systems
//! - **Ball Physics**: border and paddle bounces with speed escalation,
//!   scoring and respawns
//! - **Parallelization**: optional Rayon integration for the kinematics step
//!
//! ## Example
//!
//! ```rust
//! use ceidec_pong::assets::{AssetError, AudioBackend, SoundHandle, StaticAtlas};
//! use ceidec_pong::config::GameConfig;
//! use ceidec_pong::initializer::sprites;
//! use ceidec_pong::render::NullRenderer;
//! use ceidec_pong::session::GameSession;
//!
//! struct Silent;
//! impl AudioBackend for Silent {
//!     fn load(&mut self, _path: &str) -> Result<SoundHandle, AssetError> {
//!         Ok(SoundHandle::new(0))
//!     }
//!     fn play(&mut self, _sound: SoundHandle) {}
//!     fn unload(&mut self, _sound: SoundHandle) {}
//! }
//!
//! let mut session = GameSession::pong(&GameConfig::default(), Box::new(Silent))?;
//! let mut atlas = StaticAtlas::new()
//!     .with_sprite(sprites::BACKGROUND, 1920.0, 1080.0)
//!     .with_sprite(sprites::BALL, 32.0, 32.0)
//!     .with_sprite(sprites::HUMAN_PADDLE, 32.0, 256.0)
//!     .with_sprite(sprites::COMPUTER_PADDLE, 32.0, 256.0);
//!
//! while !session.poll_assets(&mut atlas)? {}
//! let mut renderer = NullRenderer::new();
//! session.update(1.0 / 60.0, &mut renderer)?;
//! session.end()?;
//! # Ok::<(), ceidec_pong::error::EngineError>(())
//! ```

#![warn(missing_docs)]

/// Entity Component System implementation
pub mod ecs;

/// Inter-system message queue
pub mod messaging;

/// Gameplay systems of the update pipeline
pub mod systems;

/// Sound cache and asset loading
pub mod assets;

/// Renderer contract and window mapping
pub mod render;

/// Entity setup for each game
pub mod initializer;

/// Game session lifecycle
pub mod session;

/// Memory pooling for reducing allocation churn
pub mod pool;

/// Gameplay configuration
pub mod config;

/// Error types
pub mod error;

#[cfg(test)]
mod testing;

pub use config::GameConfig;
pub use ecs::{Entity, World};
pub use error::EngineError;
pub use session::{GameKind, GameSession};
