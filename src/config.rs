//! Tunable numbers for the whole game.
//!
//! Every section falls back to the values the game shipped with, so a
//! partial `config.json` only needs the keys it changes.

use anyhow::{anyhow, ensure, Context, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct GameConfig {
    pub physics: PhysicsConfig,
    pub layout: LayoutConfig,
    pub progression: ProgressionConfig,
    pub facts: FactsConfig,
}

/// Units are pixels per frame (physics runs exactly once per frame)
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct PhysicsConfig {
    pub gravity: f32,
    /// negative because top left is origin
    pub jump_velocity: f32,
    /// ground = ground_base - ground_lift * ratio
    pub ground_base: f32,
    pub ground_lift: f32,
    /// intro fall starts here, scaled by canvas height / 393
    pub intro_start: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        PhysicsConfig {
            gravity: 0.5,
            jump_velocity: -15.0,
            ground_base: 274.0,
            ground_lift: 60.0,
            intro_start: -60.0,
        }
    }
}

/// Authored at 805px wide, scaled by the viewport ratio at use
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub obstacle_count: usize,
    pub droplet_count: usize,
    pub obstacle_width: f32,
    pub obstacle_height: f32,
    pub droplet_width: f32,
    pub droplet_height: f32,
    pub ball_x: f32,
    pub ball_size: f32,
    pub ball_radius: f32,
    pub obstacle_gap: f32,
    pub droplet_buffer: f32,
    pub obstacle_droplet_gap: f32,
    /// distance past the right edge where fresh levels start spawning
    pub spawn_lead: f32,
    /// fractions of the canvas width
    pub obstacle_jitter: f32,
    pub droplet_window: f32,
    pub droplet_respawn_window: f32,
    pub obstacle_attempts: u32,
    pub droplet_attempts: u32,
    pub obstacle_recycle_attempts: u32,
    pub droplet_recycle_attempts: u32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        LayoutConfig {
            obstacle_count: 2,
            droplet_count: 5,
            obstacle_width: 52.0,
            obstacle_height: 54.0,
            droplet_width: 22.0,
            droplet_height: 35.0,
            ball_x: 80.0,
            ball_size: 45.0,
            ball_radius: 22.0,
            obstacle_gap: 220.0,
            droplet_buffer: 60.0,
            obstacle_droplet_gap: 60.0,
            spawn_lead: 100.0,
            obstacle_jitter: 0.5,
            droplet_window: 0.7,
            droplet_respawn_window: 0.5,
            obstacle_attempts: 30,
            droplet_attempts: 40,
            obstacle_recycle_attempts: 30,
            droplet_recycle_attempts: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ProgressionConfig {
    pub points_per_droplet: u32,
    pub fact_every: u32,
    pub level_every: u32,
    pub win_score: u32,
    pub max_level: u32,
    pub max_lives: u32,
    pub initial_speed: f32,
    pub level_up_speed_step: f32,
    /// applied when the level up was queued behind a fact card
    pub deferred_level_up_speed_step: f32,
    pub combo_window_ms: f64,
}

impl Default for ProgressionConfig {
    fn default() -> Self {
        ProgressionConfig {
            points_per_droplet: 3,
            fact_every: 45,
            level_every: 60,
            win_score: 180,
            max_level: 3,
            max_lives: 5,
            initial_speed: 5.0,
            level_up_speed_step: 1.7,
            deferred_level_up_speed_step: 1.5,
            combo_window_ms: 1000.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct FactsConfig {
    pub entries: Vec<String>,
}

impl Default for FactsConfig {
    fn default() -> Self {
        FactsConfig {
            entries: vec![
                "785 million people lack access to clean water worldwide.".into(),
                "Every 2 minutes a child dies from water-related diseases.".into(),
                "By 2025, half of the world's population may live in water-stressed areas."
                    .into(),
                "Women and children walk an average of 6 km daily to collect water.".into(),
            ],
        }
    }
}

impl GameConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        let config: GameConfig =
            serde_json::from_str(json).context("config is not valid JSON for GameConfig")?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects configs that would make the loop misbehave
    /// - physics must actually pull the ball back down
    /// - every threshold must be reachable in whole droplet steps
    pub fn validate(&self) -> Result<()> {
        let physics = &self.physics;
        ensure!(physics.gravity > 0.0, "gravity must be positive, got {}", physics.gravity);
        ensure!(
            physics.jump_velocity < 0.0,
            "jump_velocity must point up (negative), got {}",
            physics.jump_velocity
        );

        let progression = &self.progression;
        let step = progression.points_per_droplet;
        ensure!(step > 0, "points_per_droplet must be positive");
        for (name, value) in [
            ("fact_every", progression.fact_every),
            ("level_every", progression.level_every),
            ("win_score", progression.win_score),
        ] {
            if value == 0 || value % step != 0 {
                return Err(anyhow!(
                    "{} = {} is not a positive multiple of points_per_droplet ({})",
                    name,
                    value,
                    step
                ));
            }
        }
        ensure!(progression.max_level >= 1, "max_level must be at least 1");
        ensure!(progression.max_lives >= 1, "max_lives must be at least 1");

        let layout = &self.layout;
        ensure!(
            layout.obstacle_count > 0 && layout.droplet_count > 0,
            "a level needs at least one rock and one droplet"
        );
        ensure!(!self.facts.entries.is_empty(), "at least one fact is required");
        Ok(())
    }
}
