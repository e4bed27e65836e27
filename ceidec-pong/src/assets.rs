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
//! Asset collaborators
//!
//! Sounds are cached by path in a [`SoundCache`] owned by the game session;
//! the cache releases every loaded sound when it is dropped at the end of
//! the session. Sprites come from an [`AssetSource`] that loads in the
//! background and is polled once per frame through an [`AssetLoader`], which
//! fires its completion listeners exactly once.

use crate::ecs::components::Renderable;
use crate::render::SpriteHandle;
use std::collections::HashMap;
use thiserror::Error;

/// Sound effect paths shipped with the game
pub mod sfx {
    /// Played when the human player scores
    pub const VICTORY: &str = "data/sfx/oh_yeah_wav_cut.ogg";

    /// Played when the computer player scores
    pub const DEFEAT: &str = "data/sfx/atari_boom.ogg";

    /// Played when the ball bounces off a border or a paddle
    pub const BOUNCE: &str = "data/sfx/BounceYoFrankie.ogg";
}

/// Asset failures
#[derive(Debug, Error, PartialEq)]
pub enum AssetError {
    /// The audio backend could not load a sound
    #[error("failed to load sound {path}: {reason}")]
    SoundLoad {
        /// Asset key
        path: String,
        /// Backend explanation
        reason: String,
    },

    /// A sprite was requested that the source does not provide
    #[error("sprite {0} is not available")]
    MissingSprite(String),

    /// Entities were asked for their sprites before loading finished
    #[error("assets are not loaded yet")]
    NotLoaded,
}

/// Opaque handle to a sound loaded by the audio backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SoundHandle(u32);

impl SoundHandle {
    /// Wrap a backend-specific id
    pub fn new(id: u32) -> Self {
        SoundHandle(id)
    }

    /// Backend-specific id
    pub fn raw(&self) -> u32 {
        self.0
    }
}

/// Audio playback backend
pub trait AudioBackend: Send {
    /// Load the sound stored at `path`
    fn load(&mut self, path: &str) -> Result<SoundHandle, AssetError>;

    /// Start playing a loaded sound
    fn play(&mut self, sound: SoundHandle);

    /// Release a loaded sound
    fn unload(&mut self, sound: SoundHandle);
}

/// Path-keyed cache of loaded sounds
pub struct SoundCache {
    backend: Box<dyn AudioBackend>,
    sounds: HashMap<String, SoundHandle>,
}

impl SoundCache {
    /// Create an empty cache on top of `backend`
    pub fn new(backend: Box<dyn AudioBackend>) -> Self {
        SoundCache {
            backend,
            sounds: HashMap::new(),
        }
    }

    /// Return the cached sound for `path`, loading it on first use
    pub fn load_or_fetch(&mut self, path: &str) -> Result<SoundHandle, AssetError> {
        if let Some(&handle) = self.sounds.get(path) {
            return Ok(handle);
        }

        let handle = self.backend.load(path)?;
        self.sounds.insert(path.to_string(), handle);
        Ok(handle)
    }

    /// Play the sound stored under `path`
    pub fn play(&mut self, path: &str) -> Result<(), AssetError> {
        let handle = self.load_or_fetch(path)?;
        self.backend.play(handle);
        Ok(())
    }

    /// Release the sound stored under `path`
    pub fn unload(&mut self, path: &str) -> bool {
        match self.sounds.remove(path) {
            Some(handle) => {
                self.backend.unload(handle);
                true
            }
            None => false,
        }
    }

    /// Check whether `path` is cached
    pub fn contains(&self, path: &str) -> bool {
        self.sounds.contains_key(path)
    }

    /// Number of cached sounds
    pub fn len(&self) -> usize {
        self.sounds.len()
    }

    /// Check whether no sound is cached
    pub fn is_empty(&self) -> bool {
        self.sounds.is_empty()
    }
}

impl Drop for SoundCache {
    fn drop(&mut self) {
        if !self.sounds.is_empty() {
            log::info!("Disposing {} sounds.", self.sounds.len());
        }
        for (_, handle) in self.sounds.drain() {
            self.backend.unload(handle);
        }
    }
}

/// Background sprite loader polled by the session
pub trait AssetSource {
    /// Queue a sprite for loading
    fn request(&mut self, name: &str);

    /// Advance loading; returns `true` once every requested asset is ready
    fn update(&mut self) -> bool;

    /// Check whether the last update finished loading
    fn is_loaded(&self) -> bool;

    /// A loaded sprite and its pixel extent
    fn sprite(&self, name: &str) -> Option<Renderable>;
}

/// Look up a sprite that must exist
pub fn require_sprite(source: &dyn AssetSource, name: &str) -> Result<Renderable, AssetError> {
    if !source.is_loaded() {
        return Err(AssetError::NotLoaded);
    }
    source
        .sprite(name)
        .ok_or_else(|| AssetError::MissingSprite(name.to_string()))
}

type LoadListener = Box<dyn FnOnce() + Send>;

/// Polls an [`AssetSource`] and notifies listeners once loading completes
///
/// Listeners are one-shot: they are dropped after the notification.
#[derive(Default)]
pub struct AssetLoader {
    pending: Vec<String>,
    listeners: Vec<LoadListener>,
    done: bool,
}

impl AssetLoader {
    /// Create a loader with nothing requested
    pub fn new() -> Self {
        Self::default()
    }

    /// Request a sprite; forwarded to the source on the next update
    pub fn add_asset_to_load(&mut self, name: impl Into<String>) {
        self.pending.push(name.into());
        self.done = false;
    }

    /// Register a callback for the next completion
    pub fn add_listener(&mut self, listener: impl FnOnce() + Send + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Number of listeners waiting for completion
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Check whether the last update finished loading
    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Forward pending requests and poll the source
    ///
    /// Returns `true` when everything requested so far is loaded.
    pub fn update(&mut self, source: &mut dyn AssetSource) -> bool {
        for name in self.pending.drain(..) {
            source.request(&name);
        }

        if source.update() {
            if !self.done {
                log::debug!("assets loaded, notifying {} listeners", self.listeners.len());
            }
            self.done = true;
            for listener in self.listeners.drain(..) {
                listener();
            }
        }
        self.done
    }
}

/// In-memory sprite source with a fixed catalog
///
/// Completes after a configurable number of polls, which lets headless runs
/// and tests exercise the asynchronous loading path. The whole catalog
/// becomes available at once, like sprites packed in a single atlas.
#[derive(Debug, Default)]
pub struct StaticAtlas {
    catalog: HashMap<String, Renderable>,
    requested: Vec<String>,
    ready: bool,
    polls_remaining: u32,
    next_handle: u32,
}

impl StaticAtlas {
    /// Create an empty atlas that finishes on the first poll
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a sprite of the given pixel size to the catalog
    pub fn with_sprite(mut self, name: &str, width: f32, height: f32) -> Self {
        self.next_handle += 1;
        let sprite = Renderable::new(SpriteHandle::new(self.next_handle), width, height);
        self.catalog.insert(name.to_string(), sprite);
        self
    }

    /// Require `polls` unsuccessful updates before loading completes
    pub fn with_load_delay(mut self, polls: u32) -> Self {
        self.polls_remaining = polls;
        self
    }

    /// Names requested so far
    pub fn requested(&self) -> &[String] {
        &self.requested
    }
}

impl AssetSource for StaticAtlas {
    fn request(&mut self, name: &str) {
        self.requested.push(name.to_string());
    }

    fn update(&mut self) -> bool {
        if self.polls_remaining > 0 {
            self.polls_remaining -= 1;
            return false;
        }
        self.ready = true;
        true
    }

    fn is_loaded(&self) -> bool {
        self.ready
    }

    fn sprite(&self, name: &str) -> Option<Renderable> {
        if self.ready {
            self.catalog.get(name).copied()
        } else {
            None
        }
    }
}
