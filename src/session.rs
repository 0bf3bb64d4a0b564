//! Score, level and lives bookkeeping for one play session.
//!
//! ┌──────────────── Phase Transition Flow ──────────────────────────────┐
//! │  From          →  Trigger                  →  To                    │
//! ├─────────────────────────────────────────────────────────────────────┤
//! │  Idle          →  intro fall lands         →  Running               │
//! │  Running       →  score == win             →  Won          (halt)   │
//! │  Running       →  score % fact == 0        →  Interstitial (halt)   │
//! │  Running       →  score % level == 0       →  Running  (level + 1)  │
//! │  Running       →  hit, lives left          →  Running  (new layout) │
//! │  Running       →  hit, no lives left       →  GameOver     (halt)   │
//! │  Interstitial  →  dismissed                →  Running               │
//! │  any           →  start / reset            →  Idle                  │
//! └─────────────────────────────────────────────────────────────────────┘
//!
//! When a score is both a fact checkpoint and a level boundary the fact
//! card wins and the level up waits behind it (`pending_level_up`), so a
//! level never changes while the card is covering the screen.

use crate::config::ProgressionConfig;
use rand::seq::SliceRandom;
use rand::Rng;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Phase {
    /// title screen or intro fall
    Idle,
    Running,
    Interstitial,
    Won,
    GameOver,
}

/// What a droplet pickup did to the session
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Pickup {
    Scored,
    Won,
    Interstitial { pending_level_up: bool },
    LevelUp,
}

/// What a rock collision did to the session
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Hit {
    LifeLost,
    GameOver,
}

#[derive(Debug, Clone)]
pub struct Session {
    rules: ProgressionConfig,
    score: u32,
    level: u32,
    speed: f32,
    lives: u32,
    phase: Phase,
    pending_level_up: bool,
}

impl Session {
    pub fn new(rules: ProgressionConfig) -> Self {
        Session {
            score: 0,
            level: 1,
            speed: rules.initial_speed,
            lives: rules.max_lives,
            phase: Phase::Idle,
            pending_level_up: false,
            rules,
        }
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn lives(&self) -> u32 {
        self.lives
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.phase == Phase::Running
    }

    pub fn is_showing_interstitial(&self) -> bool {
        self.phase == Phase::Interstitial
    }

    pub fn is_showing_win_card(&self) -> bool {
        self.phase == Phase::Won
    }

    pub fn is_showing_game_over(&self) -> bool {
        self.phase == Phase::GameOver
    }

    pub fn pending_level_up(&self) -> bool {
        self.pending_level_up
    }

    /// Back to the initial counters, waiting in Idle
    pub fn reset(&mut self) {
        *self = Session::new(self.rules.clone());
    }

    /// The intro fall landed
    pub fn begin_running(&mut self) {
        self.phase = Phase::Running;
    }

    /// Score a freshly collected droplet.
    /// Checked in order : win, fact checkpoint, level boundary.
    pub fn collect(&mut self) -> Pickup {
        self.score += self.rules.points_per_droplet;
        let score = self.score;

        if score == self.rules.win_score {
            self.phase = Phase::Won;
            log::info!("won with {} points", score);
            return Pickup::Won;
        }

        let level_due = self.is_level_boundary(score);
        if score > 0 && score % self.rules.fact_every == 0 && !self.is_showing_interstitial() {
            self.pending_level_up = level_due;
            self.phase = Phase::Interstitial;
            log::debug!("fact checkpoint at {}, level up queued: {}", score, level_due);
            return Pickup::Interstitial {
                pending_level_up: level_due,
            };
        }

        if level_due {
            self.level_up(self.rules.level_up_speed_step);
            return Pickup::LevelUp;
        }

        Pickup::Scored
    }

    /// Close the fact card. Returns true if a queued level up was applied
    /// (the caller must then lay out a fresh level).
    pub fn dismiss_interstitial(&mut self) -> bool {
        if !self.is_showing_interstitial() {
            return false;
        }
        let levelled = self.pending_level_up;
        if levelled {
            self.pending_level_up = false;
            self.level_up(self.rules.deferred_level_up_speed_step);
        }
        self.phase = Phase::Running;
        levelled
    }

    /// Lose a life to a rock
    pub fn hit(&mut self) -> Hit {
        self.lives = self.lives.saturating_sub(1);
        if self.lives == 0 {
            self.phase = Phase::GameOver;
            log::info!("game over at level {} with {} points", self.level, self.score);
            Hit::GameOver
        } else {
            log::debug!("life lost, {} left", self.lives);
            Hit::LifeLost
        }
    }

    /// Progress bar fill and stars lit for the HUD
    pub fn progress(&self) -> Progress {
        Progress::new(self.level, self.score, &self.rules)
    }

    fn is_level_boundary(&self, score: u32) -> bool {
        score > 0 && score % self.rules.level_every == 0 && self.level < self.rules.max_level
    }

    fn level_up(&mut self, speed_step: f32) {
        self.level += 1;
        self.speed += speed_step;
        log::info!("level {} at speed {}", self.level, self.speed);
    }
}

/// HUD progress : the bar is split into one third per level, and each
/// third fills as the score climbs towards the next level boundary
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Progress {
    pub percent: f32,
    pub stars: u32,
}

impl Progress {
    const STARS: u32 = 3;

    pub fn new(level: u32, score: u32, rules: &ProgressionConfig) -> Self {
        let thirds = Self::STARS as f32;
        let within = (score % rules.level_every) as f32 / rules.level_every as f32;
        let total = (level.saturating_sub(1)) as f32 / thirds + within / thirds;
        let stars = (1..=Self::STARS)
            .filter(|i| total >= *i as f32 / thirds)
            .count() as u32;
        Progress {
            percent: (total * 100.0).min(100.0),
            stars,
        }
    }
}

/// Fact cards are drawn at random without repeats until the deck is used
/// up, then it reshuffles
#[derive(Debug, Clone)]
pub struct FactDeck {
    len: usize,
    used: Vec<usize>,
}

impl FactDeck {
    pub fn new(len: usize) -> Self {
        FactDeck {
            len,
            used: Vec::with_capacity(len),
        }
    }

    /// `None` only for a deck built over zero facts
    pub fn draw<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<usize> {
        if self.len == 0 {
            return None;
        }
        if self.used.len() >= self.len {
            self.used.clear();
        }
        let available: Vec<usize> = (0..self.len).filter(|i| !self.used.contains(i)).collect();
        let fact = *available.choose(rng)?;
        self.used.push(fact);
        Some(fact)
    }

    pub fn reset(&mut self) {
        self.used.clear();
    }
}

/// Pickups closer together than the window stack into a combo
#[derive(Debug, Clone)]
pub struct Combo {
    window_ms: f64,
    count: u32,
    last_ms: Option<f64>,
}

impl Combo {
    pub fn new(window_ms: f64) -> Self {
        Combo {
            window_ms,
            count: 0,
            last_ms: None,
        }
    }

    /// Register a pickup at `now_ms`, returns the running combo count
    pub fn register(&mut self, now_ms: f64) -> u32 {
        self.count = match self.last_ms {
            Some(last) if now_ms - last < self.window_ms => self.count + 1,
            _ => 1,
        };
        self.last_ms = Some(now_ms);
        self.count
    }
}
