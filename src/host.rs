//! What the game loop core tells the outside world.
//!
//! The core never waits on any of these : every call is a fire-and-forget
//! notification, and collaborators read whatever state they need through
//! the `Scene` they are handed.

use crate::ball::Ball;
use crate::geometry::Viewport;
use crate::layout::{Droplet, Obstacle};
use crate::session::{Progress, Session};

/// Named sound cues, synthesis is up to the `AudioSink`
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Cue {
    Jump,
    Landing,
    Collect,
    /// consecutive quick pickups, always >= 2
    Combo(u32),
    ObstacleHit,
    LifeLost,
    LevelUp,
    LevelComplete,
    GameOver,
    FactShown,
    GameStart,
    StarCollect,
}

pub trait AudioSink {
    fn play(&mut self, cue: Cue);
}

pub trait Overlay {
    fn show_interstitial(&mut self, fact: usize);
    fn hide_interstitial(&mut self);
    fn show_win_overlay(&mut self);
    fn hide_win_overlay(&mut self);
    fn show_game_over_overlay(&mut self);
    fn hide_game_over_overlay(&mut self);
    fn update_score(&mut self, score: u32);
    fn update_level(&mut self, level: u32);
    fn update_lives(&mut self, lives: u32);
    fn update_progress(&mut self, progress: Progress);
    /// transient "Let's go!" banner, hides itself
    fn show_lets_go(&mut self);
}

/// Read-only view of everything a frame needs to be drawn
pub struct Scene<'a> {
    pub viewport: Viewport,
    /// resting y of the ball's top edge
    pub ground: f32,
    pub ball: &'a Ball,
    pub obstacles: &'a [Obstacle],
    pub droplets: &'a [Droplet],
    pub session: &'a Session,
}

pub trait FrameRenderer {
    fn render_frame(&mut self, scene: &Scene<'_>);
}

/// Everything the scheduler needs from its surroundings
pub trait Host: AudioSink + Overlay + FrameRenderer {}

impl<T: AudioSink + Overlay + FrameRenderer> Host for T {}
