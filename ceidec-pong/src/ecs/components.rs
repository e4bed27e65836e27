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
//! Gameplay components
//!
//! Data records attached to game entities: kinematic state, collision
//! bounds, drawables, sound references and the per-paddle player data.
//! World space is 2D with its origin at the screen center, y pointing up.

use crate::render::SpriteHandle;
use std::fmt;

/// 2D position component
///
/// For sprite-backed entities this is the lower-left corner of the sprite.
///
/// # Examples
///
/// ```
/// use ceidec_pong::ecs::components::Position;
///
/// let pos = Position::new(1.0, 2.0);
/// assert_eq!(pos.x(), 1.0);
/// assert!(pos.is_valid());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Position {
    x: f32,
    y: f32,
}

impl Position {
    /// Create a new position with the given coordinates
    pub fn new(x: f32, y: f32) -> Self {
        Position { x, y }
    }

    /// Get the x coordinate
    pub fn x(&self) -> f32 {
        self.x
    }

    /// Get the y coordinate
    pub fn y(&self) -> f32 {
        self.y
    }

    /// Set the x coordinate
    pub fn set_x(&mut self, x: f32) {
        self.x = x;
    }

    /// Set the y coordinate
    pub fn set_y(&mut self, y: f32) {
        self.y = y;
    }

    /// Set both coordinates
    pub fn set_xy(&mut self, x: f32, y: f32) {
        self.x = x;
        self.y = y;
    }

    /// Check if both coordinates are finite (not NaN or infinite)
    pub fn is_valid(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// 2D velocity component in units per second
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Velocity {
    vx: f32,
    vy: f32,
}

impl Velocity {
    /// Create a new velocity with the given components
    pub fn new(vx: f32, vy: f32) -> Self {
        Velocity { vx, vy }
    }

    /// Get the x component
    pub fn vx(&self) -> f32 {
        self.vx
    }

    /// Get the y component
    pub fn vy(&self) -> f32 {
        self.vy
    }

    /// Set the x component
    pub fn set_vx(&mut self, vx: f32) {
        self.vx = vx;
    }

    /// Set the y component
    pub fn set_vy(&mut self, vy: f32) {
        self.vy = vy;
    }

    /// Set both components
    pub fn set_xy(&mut self, vx: f32, vy: f32) {
        self.vx = vx;
        self.vy = vy;
    }

    /// Multiply both components by `factor`
    pub fn scale(&mut self, factor: f32) {
        self.vx *= factor;
        self.vy *= factor;
    }

    /// Speed (magnitude of the velocity vector)
    pub fn magnitude(&self) -> f32 {
        (self.vx * self.vx + self.vy * self.vy).sqrt()
    }

    /// Check if both components are finite (not NaN or infinite)
    pub fn is_valid(&self) -> bool {
        self.vx.is_finite() && self.vy.is_finite()
    }
}

/// Axis-aligned bounding box used for collision tests
///
/// The extent comes from the entity's sprite when assets are assigned; the
/// origin follows the entity's [`Position`] every frame.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BoundingBox {
    x: f32,
    y: f32,
    width: f32,
    height: f32,
}

impl BoundingBox {
    /// Create a box from its lower-left corner and extent
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        BoundingBox { x, y, width, height }
    }

    /// Left edge
    pub fn x(&self) -> f32 {
        self.x
    }

    /// Bottom edge
    pub fn y(&self) -> f32 {
        self.y
    }

    /// Horizontal extent
    pub fn width(&self) -> f32 {
        self.width
    }

    /// Vertical extent
    pub fn height(&self) -> f32 {
        self.height
    }

    /// Right edge
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Top edge
    pub fn top(&self) -> f32 {
        self.y + self.height
    }

    /// Vertical center
    pub fn center_y(&self) -> f32 {
        self.y + self.height / 2.0
    }

    /// Move the box so its lower-left corner sits at `(x, y)`
    pub fn set_position(&mut self, x: f32, y: f32) {
        self.x = x;
        self.y = y;
    }

    /// Change the extent, keeping the origin
    pub fn set_size(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
    }

    /// Check whether a point lies inside the box, edges included
    pub fn contains(&self, px: f32, py: f32) -> bool {
        px >= self.x && px <= self.right() && py >= self.y && py <= self.top()
    }
}

/// Who controls a paddle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub enum PlayerIdentity {
    /// Driven by pointer input
    #[default]
    Human,
    /// Driven by the ball-tracking AI
    Computer,
}

impl PlayerIdentity {
    /// Numeric player id (0 for the human, 1 for the computer)
    pub fn id(&self) -> u8 {
        match self {
            PlayerIdentity::Human => 0,
            PlayerIdentity::Computer => 1,
        }
    }
}

impl fmt::Display for PlayerIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlayerIdentity::Human => write!(f, "human"),
            PlayerIdentity::Computer => write!(f, "computer"),
        }
    }
}

/// Points scored by a paddle's player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Score {
    value: u32,
}

impl Score {
    /// Create a score with an initial value
    pub fn new(value: u32) -> Self {
        Score { value }
    }

    /// Current points
    pub fn value(&self) -> u32 {
        self.value
    }

    /// Add one point
    pub fn increment(&mut self) {
        self.value = self.value.saturating_add(1);
    }
}

/// Key of a sound asset in the session's sound cache
///
/// Only names the asset; the cache owns the loaded sound.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SoundRef {
    path: String,
}

impl SoundRef {
    /// Reference the sound stored under `path`
    pub fn new(path: impl Into<String>) -> Self {
        SoundRef { path: path.into() }
    }

    /// Asset key
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Point this reference at another asset
    pub fn set_path(&mut self, path: impl Into<String>) {
        self.path = path.into();
    }

    /// Check whether an asset has been assigned
    pub fn is_set(&self) -> bool {
        !self.path.is_empty()
    }
}

/// Drawable handle plus its pixel extent
///
/// The handle is `None` until assets finish loading; the extent is what the
/// simulation uses for spawn offsets and bounding boxes.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Renderable {
    handle: Option<SpriteHandle>,
    width: f32,
    height: f32,
}

impl Renderable {
    /// Create a drawable reference
    pub fn new(handle: SpriteHandle, width: f32, height: f32) -> Self {
        Renderable {
            handle: Some(handle),
            width,
            height,
        }
    }

    /// Renderer handle, if assigned
    pub fn handle(&self) -> Option<SpriteHandle> {
        self.handle
    }

    /// Pixel width
    pub fn width(&self) -> f32 {
        self.width
    }

    /// Pixel height
    pub fn height(&self) -> f32 {
        self.height
    }

    /// Bounding box of the sprite placed at `position`
    pub fn bounds_at(&self, position: Position) -> BoundingBox {
        BoundingBox::new(position.x(), position.y(), self.width, self.height)
    }
}
