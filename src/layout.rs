//! Procedural placement of rocks and droplets.
//!
//! Placement is rejection sampling with a hard cap on attempts : when the
//! cap runs out the last candidate is reported as unsatisfied and the
//! caller decides whether to take it anyway.

use crate::config::LayoutConfig;
use crate::geometry::{overlaps, overlaps_with_buffer, Point, Rect, Size, Viewport};
use rand::Rng;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Obstacle {
    pub position: Point,
    pub size: Size,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Droplet {
    pub position: Point,
    pub size: Size,
    /// collected droplets stay in their slot, invisible, until they scroll off
    pub collected: bool,
}

impl Obstacle {
    pub fn x(&self) -> f32 {
        self.position.x
    }

    pub fn width(&self) -> f32 {
        self.size.width
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(self.position, self.size)
    }

    pub fn is_off_screen(&self) -> bool {
        self.position.x + self.size.width < 0.0
    }
}

impl Droplet {
    pub fn x(&self) -> f32 {
        self.position.x
    }

    pub fn width(&self) -> f32 {
        self.size.width
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(self.position, self.size)
    }

    pub fn is_off_screen(&self) -> bool {
        self.position.x + self.size.width < 0.0
    }
}

/// Result of a bounded sampling loop
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Placement {
    pub x: f32,
    pub satisfied: bool,
}

/// Draw candidates until one passes `valid` or `attempts` run out
/// - always samples at least once
/// - on exhaustion returns the LAST candidate with satisfied = false
pub fn sample<R, C, V>(rng: &mut R, attempts: u32, mut candidate: C, valid: V) -> Placement
where
    R: Rng + ?Sized,
    C: FnMut(&mut R) -> f32,
    V: Fn(f32) -> bool,
{
    let mut x = candidate(rng);
    let mut satisfied = valid(x);
    let mut tries = 1;
    while !satisfied && tries < attempts {
        x = candidate(rng);
        satisfied = valid(x);
        tries += 1;
    }
    Placement { x, satisfied }
}

/// `LayoutConfig` resolved against the current canvas : everything in pixels
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutRules {
    pub width: f32,
    pub obstacle_count: usize,
    pub droplet_count: usize,
    pub obstacle_size: Size,
    pub droplet_size: Size,
    pub obstacle_y: f32,
    pub droplet_y: f32,
    pub obstacle_gap: f32,
    pub droplet_buffer: f32,
    pub obstacle_droplet_gap: f32,
    pub spawn_lead: f32,
    pub obstacle_jitter: f32,
    pub droplet_window: f32,
    pub droplet_respawn_window: f32,
    pub obstacle_attempts: u32,
    pub droplet_attempts: u32,
    pub obstacle_recycle_attempts: u32,
    pub droplet_recycle_attempts: u32,
}

impl LayoutRules {
    pub fn new(config: &LayoutConfig, viewport: Viewport, ground: f32) -> Self {
        let ratio = viewport.ratio();
        let droplet_size = Size {
            width: config.droplet_width * ratio,
            height: config.droplet_height * ratio,
        };
        LayoutRules {
            width: viewport.width,
            obstacle_count: config.obstacle_count,
            droplet_count: config.droplet_count,
            obstacle_size: Size {
                width: config.obstacle_width * ratio,
                height: config.obstacle_height * ratio,
            },
            droplet_size,
            obstacle_y: ground,
            // centred on the ball's middle
            droplet_y: ground + (config.ball_radius * ratio) / 2.0 - droplet_size.height / 2.0,
            obstacle_gap: config.obstacle_gap * ratio,
            droplet_buffer: config.droplet_buffer * ratio,
            obstacle_droplet_gap: config.obstacle_droplet_gap * ratio,
            spawn_lead: config.spawn_lead,
            obstacle_jitter: config.obstacle_jitter * viewport.width,
            droplet_window: config.droplet_window * viewport.width,
            droplet_respawn_window: config.droplet_respawn_window * viewport.width,
            obstacle_attempts: config.obstacle_attempts,
            droplet_attempts: config.droplet_attempts,
            obstacle_recycle_attempts: config.obstacle_recycle_attempts,
            droplet_recycle_attempts: config.droplet_recycle_attempts,
        }
    }

    /// Can a rock start at `x` given the other rocks and droplets?
    pub fn obstacle_fits<'a>(
        &self,
        x: f32,
        mut obstacles: impl Iterator<Item = &'a Obstacle>,
        mut droplets: impl Iterator<Item = &'a Droplet>,
    ) -> bool {
        let width = self.obstacle_size.width;
        !obstacles.any(|other| {
            overlaps_with_buffer(x, width, other.x(), other.width(), self.obstacle_gap)
        }) && !droplets.any(|drop| {
            overlaps_with_buffer(x, width, drop.x(), drop.width(), self.obstacle_droplet_gap)
        })
    }

    /// Can a droplet start at `x` on a fresh level? Only the rocks' own
    /// boxes are off limits, the rock gap is a recycling rule
    pub fn droplet_fits_at_reset<'a>(
        &self,
        x: f32,
        mut obstacles: impl Iterator<Item = &'a Obstacle>,
        mut droplets: impl Iterator<Item = &'a Droplet>,
    ) -> bool {
        let width = self.droplet_size.width;
        !obstacles.any(|rock| overlaps(x, width, rock.x(), rock.width()))
            && !droplets.any(|other| {
                overlaps_with_buffer(x, width, other.x(), other.width(), self.droplet_buffer)
            })
    }

    /// Can a recycled droplet start at `x` given the rocks and other droplets?
    pub fn droplet_fits<'a>(
        &self,
        x: f32,
        mut obstacles: impl Iterator<Item = &'a Obstacle>,
        mut droplets: impl Iterator<Item = &'a Droplet>,
    ) -> bool {
        let width = self.droplet_size.width;
        !obstacles.any(|rock| {
            overlaps_with_buffer(x, width, rock.x(), rock.width(), self.obstacle_droplet_gap)
        }) && !droplets
            .any(|other| overlaps_with_buffer(x, width, other.x(), other.width(), self.droplet_buffer))
    }

    pub fn obstacle_at(&self, x: f32) -> Obstacle {
        Obstacle {
            position: Point {
                x,
                y: self.obstacle_y,
            },
            size: self.obstacle_size,
        }
    }

    pub fn droplet_at(&self, x: f32) -> Droplet {
        Droplet {
            position: Point {
                x,
                y: self.droplet_y,
            },
            size: self.droplet_size,
            collected: false,
        }
    }
}

/// Which placements hit their constraints before the attempt cap
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayoutReport {
    pub obstacles: Vec<bool>,
    pub droplets: Vec<bool>,
}

impl LayoutReport {
    pub fn all_satisfied(&self) -> bool {
        self.obstacles.iter().chain(self.droplets.iter()).all(|ok| *ok)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Layout {
    pub obstacles: Vec<Obstacle>,
    pub droplets: Vec<Droplet>,
    pub report: LayoutReport,
}

/// Fresh layout for a level start / reset
/// - rocks chain off each other : anchor + gap + jitter
/// - droplets scatter in a wide window past the right edge
/// - out of attempts => keep the candidate anyway
pub fn generate<R: Rng + ?Sized>(rules: &LayoutRules, rng: &mut R) -> Layout {
    let mut layout = Layout::default();

    let mut anchor = rules.width + rules.spawn_lead;
    for _ in 0..rules.obstacle_count {
        let from = anchor;
        let placement = sample(
            rng,
            rules.obstacle_attempts,
            |rng| from + rules.obstacle_gap + rng.gen::<f32>() * rules.obstacle_jitter,
            |x| rules.obstacle_fits(x, layout.obstacles.iter(), std::iter::empty::<&Droplet>()),
        );
        layout.obstacles.push(rules.obstacle_at(placement.x));
        layout.report.obstacles.push(placement.satisfied);
        anchor = placement.x;
    }

    let start = rules.width + rules.spawn_lead;
    for _ in 0..rules.droplet_count {
        let placement = sample(
            rng,
            rules.droplet_attempts,
            |rng| start + rng.gen::<f32>() * rules.droplet_window,
            |x| rules.droplet_fits_at_reset(x, layout.obstacles.iter(), layout.droplets.iter()),
        );
        layout.droplets.push(rules.droplet_at(placement.x));
        layout.report.droplets.push(placement.satisfied);
    }

    layout
}
