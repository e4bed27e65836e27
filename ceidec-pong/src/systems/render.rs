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
//! Frame drawing
//!
//! Draws every positioned sprite through the [`Renderer`](crate::render::Renderer)
//! and, for entities that keep a score, the score as a two-digit label over
//! their half of the screen.

use crate::config::GameConfig;
use crate::ecs::components::{PlayerIdentity, Position, Renderable, Score};
use crate::ecs::{ComponentMask, Entity, Family, Frame, System, World};
use crate::error::EngineError;

/// Draws sprites and score labels
#[derive(Debug, Clone)]
pub struct RenderingSystem {
    score_x: f32,
    score_y: f32,
}

impl RenderingSystem {
    /// Create a system laying out score labels for the configured framebuffer
    pub fn new(config: &GameConfig) -> Self {
        RenderingSystem {
            score_x: config.framebuffer_width / 4.0,
            score_y: config.framebuffer_height / 2.0 - 20.0,
        }
    }

    /// Anchor of a player's score label
    ///
    /// The human score sits over the left quarter of the screen, the
    /// computer score over the right quarter.
    pub fn score_anchor(&self, player: PlayerIdentity) -> (f32, f32) {
        match player {
            PlayerIdentity::Human => (-self.score_x, self.score_y),
            PlayerIdentity::Computer => (self.score_x, self.score_y),
        }
    }
}

impl System for RenderingSystem {
    fn family(&self) -> Family {
        Family::all(ComponentMask::POSITION | ComponentMask::RENDERABLE)
    }

    fn run(
        &mut self,
        world: &mut World,
        entities: &[Entity],
        frame: &mut Frame<'_>,
    ) -> Result<(), EngineError> {
        let renderer = frame.renderer();
        if !renderer.is_drawing() {
            return Err(EngineError::usage(
                "renderer did not begin a frame before entities were drawn",
            ));
        }

        for &entity in entities {
            let (Some(position), Some(sprite)) =
                (world.get::<Position>(entity), world.get::<Renderable>(entity))
            else {
                continue;
            };
            if let Some(handle) = sprite.handle() {
                renderer.draw_sprite(handle, position.x(), position.y());
            }
        }

        for &entity in entities {
            if let (Some(score), Some(&player)) =
                (world.get::<Score>(entity), world.get::<PlayerIdentity>(entity))
            {
                let (x, y) = self.score_anchor(player);
                renderer.draw_text(&format!("{:02}", score.value()), x, y);
            }
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "RenderingSystem"
    }
}
