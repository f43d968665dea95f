//! Frame driver
//!
//! [`Game`] owns the scenes, the keyboard and the frame clock. Each call to
//! [`Game::update`] is one frame: the keyboard advances, then every scene
//! walks its entity tree with the same [`Frame`].

use crate::foundation::time::Timer;
use crate::input::Keyboard;
use crate::scene::Scene;

/// Frames between two fps samples
const FPS_SAMPLE_INTERVAL: u64 = 4;

/// Per-frame inputs handed down the entity tree
#[derive(Debug, Clone, Copy)]
pub struct Frame<'a> {
    /// Seconds elapsed since the previous frame
    pub delta: f64,
    /// Frame number, starting at 1
    pub number: u64,
    /// Keyboard state for this frame
    pub keyboard: &'a Keyboard,
}

impl<'a> Frame<'a> {
    /// Create a frame
    pub fn new(delta: f64, number: u64, keyboard: &'a Keyboard) -> Self {
        Self {
            delta,
            number,
            keyboard,
        }
    }
}

/// Top-level loop state
#[derive(Debug, Default)]
pub struct Game {
    scenes: Vec<Scene>,
    keyboard: Keyboard,
    timer: Timer,
    frame: u64,
    fps: f64,
}

impl Game {
    /// Create a game with no scenes
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a scene; scenes update in insertion order.
    ///
    /// Keys read by the scene's behaviors are watched from now on.
    pub fn add_scene(&mut self, scene: Scene) -> usize {
        log::debug!("Added scene '{}'", scene.key());
        Self::watch_behavior_keys(&mut self.keyboard, &scene);
        self.scenes.push(scene);
        self.scenes.len() - 1
    }

    fn watch_behavior_keys(keyboard: &mut Keyboard, scene: &Scene) {
        for code in scene.watched_keys() {
            keyboard.watch(code);
        }
    }

    /// Scene by key
    pub fn scene(&self, key: &str) -> Option<&Scene> {
        self.scenes.iter().find(|scene| scene.key() == key)
    }

    /// Mutable scene by key
    pub fn scene_mut(&mut self, key: &str) -> Option<&mut Scene> {
        self.scenes.iter_mut().find(|scene| scene.key() == key)
    }

    /// All scenes
    pub fn scenes(&self) -> &[Scene] {
        &self.scenes
    }

    /// Keyboard state
    pub fn keyboard(&self) -> &Keyboard {
        &self.keyboard
    }

    /// Keyboard for feeding events and watching keys
    pub fn keyboard_mut(&mut self) -> &mut Keyboard {
        &mut self.keyboard
    }

    /// Frames run so far
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Frames per second, sampled every fourth frame
    pub fn fps(&self) -> f64 {
        self.fps
    }

    /// Frame clock
    pub fn timer(&self) -> &Timer {
        &self.timer
    }

    /// Run one frame timed by the wall clock
    pub fn update(&mut self) {
        self.timer.update();
        let delta = self.timer.delta_time();
        self.step(delta);
    }

    /// Run one frame of fixed length
    pub fn update_with_delta(&mut self, delta: f64) {
        self.timer.advance(delta);
        self.step(delta);
    }

    fn step(&mut self, delta: f64) {
        self.frame += 1;
        self.keyboard.update();

        let frame = Frame::new(delta, self.frame, &self.keyboard);
        for scene in &mut self.scenes {
            scene.update(&frame);
        }

        // Entities added or loaded since the last frame may bring new triggers
        for scene in &self.scenes {
            Self::watch_behavior_keys(&mut self.keyboard, scene);
        }

        if self.frame % FPS_SAMPLE_INTERVAL == 0 && delta > 0.0 {
            self.fps = (1.0 / delta).floor();
            log::debug!("Frame {}: {} fps", self.frame, self.fps);
        }
    }
}
