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
//! Render collaborator contract
//!
//! The simulation core never draws by itself: it hands sprite handles and
//! world positions to a [`Renderer`] supplied by the host. This module also
//! maps window-space pointer events onto the letterboxed framebuffer.

/// Opaque handle to a drawable owned by the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SpriteHandle(u32);

impl SpriteHandle {
    /// Wrap a renderer-specific id
    pub fn new(id: u32) -> Self {
        SpriteHandle(id)
    }

    /// Renderer-specific id
    pub fn raw(&self) -> u32 {
        self.0
    }
}

/// Drawing backend used by the rendering system
///
/// Draw calls are only valid between `begin_frame` and `end_frame`.
pub trait Renderer {
    /// Start batching draw calls for a frame
    fn begin_frame(&mut self);

    /// Draw a sprite with its lower-left corner at `(x, y)` in world space
    fn draw_sprite(&mut self, sprite: SpriteHandle, x: f32, y: f32);

    /// Draw a line of text with its lower-left corner at `(x, y)`
    fn draw_text(&mut self, text: &str, x: f32, y: f32);

    /// Flush the frame
    fn end_frame(&mut self);

    /// Check whether a frame is currently being batched
    fn is_drawing(&self) -> bool;
}

/// Renderer that discards every draw call
///
/// Used for headless runs; it still enforces frame bracketing.
#[derive(Debug, Default)]
pub struct NullRenderer {
    drawing: bool,
    frames: u64,
}

impl NullRenderer {
    /// Create a renderer outside of any frame
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of completed frames
    pub fn frames(&self) -> u64 {
        self.frames
    }
}

impl Renderer for NullRenderer {
    fn begin_frame(&mut self) {
        self.drawing = true;
    }

    fn draw_sprite(&mut self, _sprite: SpriteHandle, _x: f32, _y: f32) {}

    fn draw_text(&mut self, _text: &str, _x: f32, _y: f32) {}

    fn end_frame(&mut self) {
        if self.drawing {
            self.frames += 1;
        }
        self.drawing = false;
    }

    fn is_drawing(&self) -> bool {
        self.drawing
    }
}

/// Window geometry used to map pointer events into world space
///
/// The framebuffer is scaled to the window width, keeps its aspect ratio and
/// is centered vertically. Window coordinates have their origin at the
/// top-left corner with y pointing down.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    window_width: f32,
    window_height: f32,
    framebuffer_width: f32,
    framebuffer_height: f32,
}

impl Viewport {
    /// Describe a window showing a framebuffer of the given logical size
    pub fn new(
        window_width: f32,
        window_height: f32,
        framebuffer_width: f32,
        framebuffer_height: f32,
    ) -> Self {
        Viewport {
            window_width,
            window_height,
            framebuffer_width,
            framebuffer_height,
        }
    }

    fn rendered_height(&self) -> f32 {
        self.window_width * self.framebuffer_height / self.framebuffer_width
    }

    /// Check whether a window-space point falls on the framebuffer
    pub fn contains(&self, screen_x: f32, screen_y: f32) -> bool {
        let half_height = self.rendered_height() / 2.0;
        let center_y = self.window_height / 2.0;
        (0.0..=self.window_width).contains(&screen_x)
            && (screen_y - center_y).abs() <= half_height
    }

    /// Convert a window-space y into world space
    ///
    /// Returns `None` when the point lies outside the framebuffer.
    pub fn to_world_y(&self, screen_x: f32, screen_y: f32) -> Option<f32> {
        if !self.contains(screen_x, screen_y) {
            return None;
        }
        let center_y = self.window_height / 2.0;
        Some((center_y - screen_y) * self.framebuffer_height / self.rendered_height())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_renderer_brackets_frames() {
        let mut renderer = NullRenderer::new();
        assert!(!renderer.is_drawing());

        renderer.begin_frame();
        assert!(renderer.is_drawing());
        renderer.draw_sprite(SpriteHandle::new(1), 0.0, 0.0);
        renderer.end_frame();

        assert!(!renderer.is_drawing());
        assert_eq!(renderer.frames(), 1);

        // An unmatched end does not count as a frame
        renderer.end_frame();
        assert_eq!(renderer.frames(), 1);
    }

    #[test]
    fn test_viewport_maps_center_and_edges() {
        let viewport = Viewport::new(960.0, 540.0, 1920.0, 1080.0);

        assert_eq!(viewport.to_world_y(480.0, 270.0), Some(0.0));
        assert_eq!(viewport.to_world_y(480.0, 0.0), Some(540.0));
        assert_eq!(viewport.to_world_y(480.0, 540.0), Some(-540.0));
    }

    #[test]
    fn test_viewport_letterbox_rejects_outside() {
        // Tall window: the framebuffer occupies 540 of 1000 rows
        let viewport = Viewport::new(960.0, 1000.0, 1920.0, 1080.0);

        assert!(viewport.to_world_y(480.0, 100.0).is_none());
        assert!(viewport.to_world_y(-1.0, 500.0).is_none());
        assert_eq!(viewport.to_world_y(480.0, 500.0), Some(0.0));
        assert_eq!(viewport.to_world_y(480.0, 365.0), Some(270.0));
    }

    #[test]
    fn test_sprite_handle_raw() {
        assert_eq!(SpriteHandle::new(7).raw(), 7);
    }
}
