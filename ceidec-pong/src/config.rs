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
//! Game configuration
//!
//! Every field has a default matching the shipped game, so an empty TOML
//! file (or no file at all) yields a playable configuration.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// A value is out of its accepted range
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Screen borders in world units, origin at the screen center
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenBounds {
    /// Left border
    pub left: f32,
    /// Right border
    pub right: f32,
    /// Top border
    pub top: f32,
    /// Bottom border
    pub bottom: f32,
}

impl ScreenBounds {
    /// Borders of a `width` × `height` framebuffer centered on the origin
    pub fn from_framebuffer(width: f32, height: f32) -> Self {
        ScreenBounds {
            left: -width / 2.0,
            right: width / 2.0 - 1.0,
            top: height / 2.0 - 1.0,
            bottom: -height / 2.0,
        }
    }

    /// Clamp the y of a box of `height` so it stays between the borders
    pub fn clamp_vertical(&self, y: f32, height: f32) -> f32 {
        if y < self.bottom {
            self.bottom
        } else if y + height >= self.top {
            self.top - height
        } else {
            y
        }
    }
}

impl Default for ScreenBounds {
    fn default() -> Self {
        GameConfig::default().bounds()
    }
}

/// Tunable gameplay parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Framebuffer width in world units
    pub framebuffer_width: f32,
    /// Framebuffer height in world units
    pub framebuffer_height: f32,
    /// Ball speed right after a respawn
    pub ball_speed: f32,
    /// Maximum spawn angle from the horizontal, in degrees
    pub spawn_angle_degrees: f32,
    /// Velocity multiplier applied on every bounce
    pub ball_acceleration: f32,
    /// Optional upper bound on the ball speed; unbounded when absent
    pub max_ball_speed: Option<f32>,
    /// Vertical speed of the computer paddle
    pub computer_paddle_speed: f32,
    /// Gap between a paddle and its side border
    pub paddle_margin: f32,
    /// Per-frame velocity damping in the prototype game
    pub prototype_friction: f32,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            framebuffer_width: 1920.0,
            framebuffer_height: 1080.0,
            ball_speed: 475.0,
            spawn_angle_degrees: 60.0,
            ball_acceleration: 1.03,
            max_ball_speed: None,
            computer_paddle_speed: 550.0,
            paddle_margin: 100.0,
            prototype_friction: 0.95,
        }
    }
}

impl GameConfig {
    /// Load and validate a TOML configuration file
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parse and validate a TOML document
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: GameConfig =
            toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to a TOML document
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Check every value is within its accepted range
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("framebuffer_width", self.framebuffer_width),
            ("framebuffer_height", self.framebuffer_height),
            ("ball_speed", self.ball_speed),
            ("computer_paddle_speed", self.computer_paddle_speed),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::Invalid(format!("{} must be positive, got {}", name, value)));
            }
        }

        if !(self.ball_acceleration.is_finite() && self.ball_acceleration >= 1.0) {
            return Err(ConfigError::Invalid(format!(
                "ball_acceleration must be at least 1, got {}",
                self.ball_acceleration
            )));
        }
        if !(self.prototype_friction > 0.0 && self.prototype_friction <= 1.0) {
            return Err(ConfigError::Invalid(format!(
                "prototype_friction must be in (0, 1], got {}",
                self.prototype_friction
            )));
        }
        if !(self.spawn_angle_degrees >= 0.0 && self.spawn_angle_degrees < 90.0) {
            return Err(ConfigError::Invalid(format!(
                "spawn_angle_degrees must be in [0, 90), got {}",
                self.spawn_angle_degrees
            )));
        }
        if !(self.paddle_margin >= 0.0 && self.paddle_margin < self.framebuffer_width / 2.0) {
            return Err(ConfigError::Invalid(format!(
                "paddle_margin must be in [0, {}), got {}",
                self.framebuffer_width / 2.0,
                self.paddle_margin
            )));
        }
        if let Some(cap) = self.max_ball_speed {
            if !(cap >= self.ball_speed) {
                return Err(ConfigError::Invalid(format!(
                    "max_ball_speed {} is below ball_speed {}",
                    cap, self.ball_speed
                )));
            }
        }
        Ok(())
    }

    /// Screen borders derived from the framebuffer size
    pub fn bounds(&self) -> ScreenBounds {
        ScreenBounds::from_framebuffer(self.framebuffer_width, self.framebuffer_height)
    }
}
