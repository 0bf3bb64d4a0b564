//! Per-frame orchestration of the core.
//!
//! The host's frame source (requestAnimationFrame in the browser) calls
//! `Scheduler::frame` once per display refresh. A frame either does all of
//! its work or none of it; nothing suspends mid-frame.
//!
//! ┌───────────────────────── One game frame ─────────────────────────────┐
//! │  1. not running / intro in progress  → Halt, touch nothing           │
//! │  2. scroll rocks + droplets by -speed, recycle anything off-screen   │
//! │  3. integrate the ball if it is airborne                             │
//! │  4. first rock hit       → lose a life      (skip droplets)          │
//! │  5. each droplet hit     → score            (win / fact card halt)   │
//! │  6. render, ask for the next frame                                   │
//! └──────────────────────────────────────────────────────────────────────┘

use crate::ball::Ball;
use crate::config::GameConfig;
use crate::geometry::Viewport;
use crate::host::{AudioSink, Cue, Host, Scene};
use crate::layout::{self, Droplet, LayoutRules, Obstacle};
use crate::respawn::{recycle_droplet, recycle_obstacle};
use crate::session::{Combo, FactDeck, Hit, Phase, Pickup, Session};
use anyhow::Result;
use rand_pcg::Pcg32;

// intro start height is authored against a 393px tall canvas
const INTRO_REFERENCE_HEIGHT: f32 = 393.0;

/// Whether the core wants another frame
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Schedule {
    NextFrame,
    Halt,
}

/// Everything owned by the current level; replaced wholesale on reset
#[derive(Debug, Clone)]
pub struct World {
    pub ball: Ball,
    pub obstacles: Vec<Obstacle>,
    pub droplets: Vec<Droplet>,
    /// the spacing rules this level was laid out with, reused for recycling
    pub rules: LayoutRules,
}

enum Flow {
    Continue,
    /// the level was laid out again, old droplets are gone
    Relaid,
    Halt,
}

pub struct Scheduler {
    config: GameConfig,
    viewport: Viewport,
    session: Session,
    world: World,
    facts: FactDeck,
    combo: Combo,
    stars: u32,
    rng: Pcg32,
}

fn ground(config: &GameConfig, viewport: Viewport) -> f32 {
    config.physics.ground_base - config.physics.ground_lift * viewport.ratio()
}

fn lay_out(config: &GameConfig, viewport: Viewport, rng: &mut Pcg32) -> World {
    let ground = ground(config, viewport);
    let rules = LayoutRules::new(&config.layout, viewport, ground);
    let layout = layout::generate(&rules, rng);
    if !layout.report.all_satisfied() {
        log::debug!("level laid out with relaxed spacing: {:?}", layout.report);
    }
    let ratio = viewport.ratio();
    World {
        ball: Ball::new(
            config.layout.ball_x * ratio,
            config.layout.ball_size * ratio,
            ground,
            config.physics.gravity,
            config.physics.jump_velocity,
        ),
        obstacles: layout.obstacles,
        droplets: layout.droplets,
        rules,
    }
}

impl Scheduler {
    /// Fails on a config the loop can't run with (see `GameConfig::validate`)
    pub fn new(config: GameConfig, viewport: Viewport, mut rng: Pcg32) -> Result<Self> {
        config.validate()?;
        let world = lay_out(&config, viewport, &mut rng);
        Ok(Scheduler {
            session: Session::new(config.progression.clone()),
            facts: FactDeck::new(config.facts.entries.len()),
            combo: Combo::new(config.progression.combo_window_ms),
            stars: 0,
            config,
            viewport,
            world,
            rng,
        })
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn scene(&self) -> Scene<'_> {
        Scene {
            viewport: self.viewport,
            ground: self.world.rules.obstacle_y,
            ball: &self.world.ball,
            obstacles: &self.world.obstacles,
            droplets: &self.world.droplets,
            session: &self.session,
        }
    }

    /// Entry point for the host's frame source
    pub fn frame<H: Host>(&mut self, now_ms: f64, host: &mut H) -> Schedule {
        if self.world.ball.is_entering() {
            self.tick_intro(host)
        } else {
            self.tick(now_ms, host)
        }
    }

    /// One frame of the intro fall; the session starts running on landing
    pub fn tick_intro<H: Host>(&mut self, host: &mut H) -> Schedule {
        if !self.world.ball.is_entering() {
            return Schedule::Halt;
        }
        self.world.ball.update();
        if !self.world.ball.is_entering() {
            self.session.begin_running();
            log::debug!("intro landed, running at speed {}", self.session.speed());
        }
        self.render(host);
        Schedule::NextFrame
    }

    /// One frame of play
    pub fn tick<H: Host>(&mut self, now_ms: f64, host: &mut H) -> Schedule {
        if !self.session.is_running() || self.world.ball.is_entering() {
            return Schedule::Halt;
        }

        self.advance_entities();

        if !self.world.ball.is_grounded() {
            self.world.ball.update();
            if self.world.ball.is_grounded() {
                host.play(Cue::Landing);
            }
        }

        let ball = self.world.ball.bounding_box();
        if self
            .world
            .obstacles
            .iter()
            .any(|rock| rock.bounds().intersects(&ball))
        {
            let schedule = self.on_obstacle_hit(host);
            self.render(host);
            return schedule;
        }

        for index in 0..self.world.droplets.len() {
            let droplet = &mut self.world.droplets[index];
            if droplet.collected || !droplet.bounds().intersects(&ball) {
                continue;
            }
            droplet.collected = true;
            match self.on_pickup(now_ms, host) {
                Flow::Continue => {}
                Flow::Relaid => break,
                Flow::Halt => {
                    self.render(host);
                    return Schedule::Halt;
                }
            }
        }

        self.render(host);
        Schedule::NextFrame
    }

    /// Jump request from input; only a grounded ball in a running game jumps
    pub fn jump<A: AudioSink>(&mut self, host: &mut A) -> bool {
        if !self.session.is_running() || !self.world.ball.jump() {
            return false;
        }
        host.play(Cue::Jump);
        true
    }

    /// Start (or restart) a session : fresh counters, fresh level, intro fall
    pub fn start<H: Host>(&mut self, host: &mut H) -> Schedule {
        host.play(Cue::GameStart);
        host.hide_interstitial();
        host.hide_win_overlay();
        host.hide_game_over_overlay();
        self.session.reset();
        self.facts.reset();
        self.refresh_hud(host);
        self.reset_level();
        let from = self.config.physics.intro_start * self.viewport.height / INTRO_REFERENCE_HEIGHT;
        self.world.ball.fall_in(from);
        log::info!("session started");
        Schedule::NextFrame
    }

    /// Close the fact card and resume, applying a queued level up first
    pub fn dismiss_interstitial<H: Host>(&mut self, host: &mut H) -> Schedule {
        if !self.session.is_showing_interstitial() {
            return Schedule::Halt;
        }
        host.hide_interstitial();
        if self.session.dismiss_interstitial() {
            host.play(Cue::LevelUp);
            self.enter_new_level(host);
        }
        Schedule::NextFrame
    }

    /// Back to the title screen after a game over, without the intro
    pub fn reset_game<H: Host>(&mut self, host: &mut H) {
        host.hide_game_over_overlay();
        self.session.reset();
        self.refresh_hud(host);
        self.reset_level();
    }

    /// New canvas size; the level is laid out again only while idle on the
    /// title screen, otherwise it applies from the next level reset
    pub fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        if self.session.phase() == Phase::Idle && !self.world.ball.is_entering() {
            self.reset_level();
        }
    }

    pub fn reset_level(&mut self) {
        self.world = lay_out(&self.config, self.viewport, &mut self.rng);
    }

    fn advance_entities(&mut self) {
        let speed = self.session.speed();
        let World {
            obstacles,
            droplets,
            rules,
            ..
        } = &mut self.world;
        let rng = &mut self.rng;

        for index in 0..obstacles.len() {
            obstacles[index].position.x -= speed;
            if obstacles[index].is_off_screen() {
                recycle_obstacle(index, obstacles, droplets, rules, rng);
            }
        }
        for index in 0..droplets.len() {
            droplets[index].position.x -= speed;
            if droplets[index].is_off_screen() {
                recycle_droplet(index, droplets, obstacles, rules, rng);
            }
        }
    }

    fn on_obstacle_hit<H: Host>(&mut self, host: &mut H) -> Schedule {
        host.play(Cue::ObstacleHit);
        let hit = self.session.hit();
        host.play(Cue::LifeLost);
        host.update_lives(self.session.lives());
        match hit {
            Hit::GameOver => {
                host.play(Cue::GameOver);
                host.show_game_over_overlay();
                Schedule::Halt
            }
            Hit::LifeLost => {
                self.reset_level();
                Schedule::NextFrame
            }
        }
    }

    fn on_pickup<H: Host>(&mut self, now_ms: f64, host: &mut H) -> Flow {
        let streak = self.combo.register(now_ms);
        host.play(if streak > 1 {
            Cue::Combo(streak)
        } else {
            Cue::Collect
        });

        let pickup = self.session.collect();
        host.update_score(self.session.score());
        host.update_progress(self.session.progress());

        match pickup {
            Pickup::Scored => Flow::Continue,
            Pickup::Won => {
                host.play(Cue::LevelComplete);
                host.show_win_overlay();
                Flow::Halt
            }
            Pickup::Interstitial { .. } => {
                host.play(Cue::FactShown);
                match self.facts.draw(&mut self.rng) {
                    Some(fact) => host.show_interstitial(fact),
                    None => log::warn!("fact checkpoint reached with an empty fact deck"),
                }
                Flow::Halt
            }
            Pickup::LevelUp => {
                host.play(Cue::LevelUp);
                self.enter_new_level(host);
                Flow::Relaid
            }
        }
    }

    fn enter_new_level<H: Host>(&mut self, host: &mut H) {
        self.announce_level(host);
        host.show_lets_go();
        self.reset_level();
    }

    fn refresh_hud<H: Host>(&mut self, host: &mut H) {
        host.update_score(self.session.score());
        host.update_lives(self.session.lives());
        self.announce_level(host);
    }

    // level display + stars, a star lighting up gets its own cue
    fn announce_level<H: Host>(&mut self, host: &mut H) {
        host.update_level(self.session.level());
        let progress = self.session.progress();
        if progress.stars > self.stars {
            host.play(Cue::StarCollect);
        }
        self.stars = progress.stars;
        host.update_progress(progress);
    }

    fn render<H: Host>(&self, host: &mut H) {
        host.render_frame(&self.scene());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProgressionConfig;
    use crate::host::recording::{Call, RecordingHost};
    use approx::assert_relative_eq;
    use rand::SeedableRng;

    fn scheduler_with(config: GameConfig) -> Scheduler {
        Scheduler::new(config, Viewport::default(), Pcg32::seed_from_u64(42)).expect("valid config")
    }

    /// Start a session and play out the intro fall
    fn running_with(config: GameConfig) -> (Scheduler, RecordingHost) {
        let mut scheduler = scheduler_with(config);
        let mut host = RecordingHost::default();
        scheduler.start(&mut host);
        let mut frames = 0;
        while !scheduler.session().is_running() {
            assert_eq!(scheduler.frame(0.0, &mut host), Schedule::NextFrame);
            frames += 1;
            assert!(frames < 100, "intro never landed");
        }
        host.clear();
        (scheduler, host)
    }

    fn running() -> (Scheduler, RecordingHost) {
        running_with(GameConfig::default())
    }

    fn park_obstacles(scheduler: &mut Scheduler) {
        for rock in &mut scheduler.world.obstacles {
            rock.position.x = 10_000.0;
        }
    }

    fn droplet_on_ball(scheduler: &mut Scheduler, index: usize) {
        let ball = scheduler.world.ball.bounding_box();
        let droplet = &mut scheduler.world.droplets[index];
        droplet.position.x = ball.x();
        droplet.collected = false;
    }

    fn obstacle_on_ball(scheduler: &mut Scheduler, index: usize) {
        let ball = scheduler.world.ball.bounding_box();
        scheduler.world.obstacles[index].position.x = ball.x();
    }

    /// collect `count` droplets, one per frame, 2s apart so no combos
    fn collect(scheduler: &mut Scheduler, host: &mut RecordingHost, count: usize) -> Schedule {
        let mut schedule = Schedule::NextFrame;
        for i in 0..count {
            park_obstacles(scheduler);
            droplet_on_ball(scheduler, 0);
            schedule = scheduler.tick(i as f64 * 2000.0, host);
        }
        schedule
    }

    #[test]
    fn idle_frames_do_nothing() {
        let mut scheduler = scheduler_with(GameConfig::default());
        let mut host = RecordingHost::default();
        let before = scheduler.world.obstacles.clone();
        assert_eq!(scheduler.tick(0.0, &mut host), Schedule::Halt);
        assert_eq!(scheduler.frame(0.0, &mut host), Schedule::Halt);
        assert!(host.calls.is_empty());
        assert_eq!(scheduler.world.obstacles, before);
    }

    #[test]
    fn start_resets_hud_and_drops_ball_in() {
        let mut scheduler = scheduler_with(GameConfig::default());
        let mut host = RecordingHost::default();
        assert_eq!(scheduler.start(&mut host), Schedule::NextFrame);
        assert_eq!(host.cues(), vec![Cue::GameStart]);
        assert_eq!(host.count(&Call::Score(0)), 1);
        assert_eq!(host.count(&Call::Lives(5)), 1);
        assert_eq!(host.count(&Call::Level(1)), 1);
        let body = scheduler.world.ball.body();
        assert!(body.entering);
        assert_eq!(body.y, -60.0);
        assert_eq!(scheduler.session.phase(), Phase::Idle);
    }

    #[test]
    fn intro_takes_33_frames_and_holds_entities() {
        let mut scheduler = scheduler_with(GameConfig::default());
        let mut host = RecordingHost::default();
        scheduler.start(&mut host);
        host.clear();
        let before = scheduler.world.obstacles.clone();

        // regular ticks are a no-op while the ball is entering
        assert_eq!(scheduler.tick(0.0, &mut host), Schedule::Halt);

        let mut frames = 0;
        while scheduler.world.ball.is_entering() {
            scheduler.frame(frames as f64 * 16.0, &mut host);
            frames += 1;
        }
        assert_eq!(frames, 33);
        assert!(scheduler.session.is_running());
        assert_eq!(host.count(&Call::Render), 33);
        assert_eq!(scheduler.world.obstacles, before);
        assert_eq!(scheduler.world.ball.body().y, 214.0);
    }

    #[test]
    fn entities_scroll_by_speed() {
        let (mut scheduler, mut host) = running();
        let rock = scheduler.world.obstacles[0].x();
        let droplet = scheduler.world.droplets[0].x();
        assert_eq!(scheduler.tick(0.0, &mut host), Schedule::NextFrame);
        assert_relative_eq!(scheduler.world.obstacles[0].x(), rock - 5.0);
        assert_relative_eq!(scheduler.world.droplets[0].x(), droplet - 5.0);
        assert_eq!(host.calls, vec![Call::Render]);
    }

    #[test]
    fn jump_arc_lands_with_cue() {
        let (mut scheduler, mut host) = running();
        assert!(scheduler.jump(&mut host));
        assert!(!scheduler.jump(&mut host));
        assert_eq!(host.cues(), vec![Cue::Jump]);

        for _ in 0..58 {
            scheduler.tick(0.0, &mut host);
            assert!(scheduler.world.ball.body().airborne);
        }
        scheduler.tick(0.0, &mut host);
        let body = scheduler.world.ball.body();
        assert!(!body.airborne);
        assert_eq!(body.y, 214.0);
        assert_eq!(host.cues(), vec![Cue::Jump, Cue::Landing]);
    }

    #[test]
    fn jump_needs_a_running_game() {
        let mut scheduler = scheduler_with(GameConfig::default());
        let mut host = RecordingHost::default();
        assert!(!scheduler.jump(&mut host));
        scheduler.start(&mut host);
        host.clear();
        assert!(!scheduler.jump(&mut host));
        assert!(host.cues().is_empty());
    }

    #[test]
    fn droplet_scores_only_once() {
        let (mut scheduler, mut host) = running();
        assert_eq!(collect(&mut scheduler, &mut host, 1), Schedule::NextFrame);
        assert_eq!(scheduler.session.score(), 3);
        assert!(scheduler.world.droplets[0].collected);
        assert_eq!(host.cues(), vec![Cue::Collect]);
        assert_eq!(host.count(&Call::Score(3)), 1);

        // still overlapping the ball next frame, but already collected
        park_obstacles(&mut scheduler);
        scheduler.tick(100.0, &mut host);
        assert_eq!(scheduler.session.score(), 3);
    }

    #[test]
    fn quick_pickups_combo() {
        let (mut scheduler, mut host) = running();
        park_obstacles(&mut scheduler);
        droplet_on_ball(&mut scheduler, 0);
        scheduler.tick(0.0, &mut host);
        droplet_on_ball(&mut scheduler, 1);
        scheduler.tick(500.0, &mut host);
        assert_eq!(host.cues(), vec![Cue::Collect, Cue::Combo(2)]);
    }

    #[test]
    fn fifteen_droplets_reach_first_fact_card() {
        let (mut scheduler, mut host) = running();
        assert_eq!(collect(&mut scheduler, &mut host, 15), Schedule::Halt);

        assert_eq!(scheduler.session.score(), 45);
        assert_eq!(host.count(&Call::Render), 15);
        assert!(scheduler.session.is_showing_interstitial());
        assert!(!scheduler.session.is_running());
        // 45 is not a level boundary with the shipped thresholds
        assert!(!scheduler.session.pending_level_up());
        assert!(host.cues().contains(&Cue::FactShown));
        assert_eq!(
            host.calls
                .iter()
                .filter(|call| matches!(call, Call::ShowInterstitial(_)))
                .count(),
            1
        );

        // halted : nothing moves until dismissed
        let frozen = scheduler.world.droplets.clone();
        assert_eq!(scheduler.frame(0.0, &mut host), Schedule::Halt);
        assert_eq!(scheduler.world.droplets, frozen);

        assert_eq!(scheduler.dismiss_interstitial(&mut host), Schedule::NextFrame);
        assert!(scheduler.session.is_running());
        assert_eq!(scheduler.session.level(), 1);
        assert_eq!(host.count(&Call::HideInterstitial), 1);
    }

    #[test]
    fn level_up_queued_behind_fact_card_applies_on_dismiss() {
        // level boundary moved onto the first fact checkpoint
        let config = GameConfig {
            progression: ProgressionConfig {
                level_every: 45,
                ..ProgressionConfig::default()
            },
            ..GameConfig::default()
        };
        let (mut scheduler, mut host) = running_with(config);
        assert_eq!(collect(&mut scheduler, &mut host, 15), Schedule::Halt);
        assert_eq!(scheduler.session.score(), 45);
        assert!(scheduler.session.is_showing_interstitial());
        assert!(scheduler.session.pending_level_up());
        assert_eq!(scheduler.session.level(), 1);

        host.clear();
        assert_eq!(scheduler.dismiss_interstitial(&mut host), Schedule::NextFrame);
        assert_eq!(scheduler.session.level(), 2);
        assert_relative_eq!(scheduler.session.speed(), 6.5);
        assert!(scheduler.session.is_running());
        assert!(!scheduler.session.pending_level_up());
        assert!(host.calls.contains(&Call::Level(2)));
        assert!(host.calls.contains(&Call::LetsGo));
        assert!(host.cues().contains(&Cue::LevelUp));
        // fresh layout
        let fresh_from = 805.0 + 100.0;
        assert!(scheduler
            .world
            .droplets
            .iter()
            .all(|d| !d.collected && d.x() >= fresh_from));
    }

    #[test]
    fn level_boundary_levels_up_without_halting() {
        let (mut scheduler, mut host) = running();
        while scheduler.session.score() < 57 {
            scheduler.session.collect();
            scheduler.session.dismiss_interstitial();
        }
        host.clear();
        assert_eq!(collect(&mut scheduler, &mut host, 1), Schedule::NextFrame);
        assert_eq!(scheduler.session.score(), 60);
        assert_eq!(scheduler.session.level(), 2);
        assert_relative_eq!(scheduler.session.speed(), 6.7);
        assert!(scheduler.session.is_running());
        assert_eq!(
            host.cues(),
            vec![Cue::Collect, Cue::LevelUp, Cue::StarCollect]
        );
        assert!(host.calls.contains(&Call::LetsGo));
        assert!(scheduler.world.droplets.iter().all(|d| !d.collected));
        assert_eq!(host.calls.last(), Some(&Call::Render));
    }

    #[test]
    fn reaching_180_wins_and_halts() {
        let (mut scheduler, mut host) = running();
        while scheduler.session.score() < 177 {
            scheduler.session.collect();
            scheduler.session.dismiss_interstitial();
        }
        host.clear();
        assert_eq!(collect(&mut scheduler, &mut host, 1), Schedule::Halt);
        assert!(scheduler.session.is_showing_win_card());
        assert!(host.cues().contains(&Cue::LevelComplete));
        assert_eq!(host.count(&Call::ShowWin), 1);

        host.clear();
        assert_eq!(scheduler.frame(0.0, &mut host), Schedule::Halt);
        assert!(host.calls.is_empty());
    }

    #[test]
    fn five_rock_hits_end_the_game() {
        let (mut scheduler, mut host) = running();
        for lives_left in (1..5).rev() {
            obstacle_on_ball(&mut scheduler, 0);
            assert_eq!(scheduler.tick(0.0, &mut host), Schedule::NextFrame);
            assert_eq!(scheduler.session.lives(), lives_left);
            // new layout : every rock is back past the right edge
            assert!(scheduler.world.obstacles.iter().all(|r| r.x() > 805.0));
        }
        obstacle_on_ball(&mut scheduler, 0);
        let ball_x = scheduler.world.ball.bounding_box().x();
        assert_eq!(scheduler.tick(0.0, &mut host), Schedule::Halt);
        assert_eq!(scheduler.session.lives(), 0);
        assert!(scheduler.session.is_showing_game_over());
        assert_eq!(host.count(&Call::ShowGameOver), 1);
        assert_eq!(host.count(&Call::Play(Cue::GameOver)), 1);
        assert_eq!(host.count(&Call::Play(Cue::ObstacleHit)), 5);
        // no layout reset on the final hit
        assert_relative_eq!(scheduler.world.obstacles[0].x(), ball_x - 5.0);
    }

    #[test]
    fn rock_hit_wins_over_pickup_in_same_frame() {
        let (mut scheduler, mut host) = running();
        obstacle_on_ball(&mut scheduler, 0);
        droplet_on_ball(&mut scheduler, 0);
        scheduler.tick(0.0, &mut host);
        assert_eq!(scheduler.session.lives(), 4);
        assert_eq!(scheduler.session.score(), 0);
        assert!(!host.cues().contains(&Cue::Collect));
    }

    #[test]
    fn off_screen_rock_is_recycled_ahead() {
        let (mut scheduler, mut host) = running();
        scheduler.world.obstacles[0].position.x = -100.0;
        scheduler.tick(0.0, &mut host);
        assert!(scheduler.world.obstacles[0].x() >= 805.0);
    }

    #[test]
    fn collected_droplet_waits_for_left_edge_before_recycling() {
        let (mut scheduler, mut host) = running();
        collect(&mut scheduler, &mut host, 1);
        let mut frames = 0;
        while scheduler.world.droplets[0].collected {
            park_obstacles(&mut scheduler);
            scheduler.tick(0.0, &mut host);
            let droplet = scheduler.world.droplets[0];
            if droplet.collected {
                assert!(droplet.x() < 805.0);
            }
            frames += 1;
            assert!(frames < 60, "droplet never recycled");
        }
        // scrolled 75 -> past -22 first
        assert!(frames >= 20);
        assert!(scheduler.world.droplets[0].x() >= 805.0);
        assert_eq!(scheduler.session.score(), 3);
    }

    #[test]
    fn restart_after_game_over() {
        let (mut scheduler, mut host) = running();
        for _ in 0..5 {
            obstacle_on_ball(&mut scheduler, 0);
            scheduler.tick(0.0, &mut host);
        }
        assert!(scheduler.session.is_showing_game_over());
        host.clear();

        scheduler.start(&mut host);
        assert!(host.calls.contains(&Call::HideGameOver));
        assert_eq!(scheduler.session.lives(), 5);
        assert_eq!(scheduler.session.score(), 0);
        assert!(scheduler.world.ball.is_entering());
        assert!(!scheduler.session.is_showing_game_over());
    }

    #[test]
    fn reset_game_returns_to_title_without_intro() {
        let (mut scheduler, mut host) = running();
        collect(&mut scheduler, &mut host, 3);
        host.clear();
        scheduler.reset_game(&mut host);
        assert_eq!(scheduler.session.phase(), Phase::Idle);
        assert_eq!(scheduler.session.score(), 0);
        assert!(scheduler.world.ball.is_grounded());
        assert!(host.calls.contains(&Call::HideGameOver));
        assert_eq!(scheduler.tick(0.0, &mut host), Schedule::Halt);
    }

    #[test]
    fn resize_on_title_lays_out_again() {
        let mut scheduler = scheduler_with(GameConfig::default());
        scheduler.resize(Viewport::new(402.5, 186.0));
        let ball = scheduler.world.ball.bounding_box();
        assert_relative_eq!(ball.x(), 40.0);
        assert_relative_eq!(ball.width(), 22.5);
        // ground = 274 - 60 * 0.5
        assert_relative_eq!(ball.y(), 244.0);
        assert!(scheduler.world.obstacles.iter().all(|r| r.x() > 402.5));
    }

    #[test]
    fn resize_mid_run_keeps_the_laid_out_ground() {
        let (mut scheduler, mut host) = running();
        scheduler.resize(Viewport::new(402.5, 186.0));
        let ball = scheduler.world.ball.bounding_box();
        assert_relative_eq!(scheduler.scene().ground, ball.y());
        assert_relative_eq!(scheduler.scene().ground, 214.0);

        // rocks keep resting on the same line they were laid out on
        scheduler.world.obstacles[0].position.x = -200.0;
        scheduler.tick(0.0, &mut host);
        assert!(scheduler.world.obstacles[0].x() > 402.5);
        assert_relative_eq!(scheduler.world.obstacles[0].position.y, 214.0);

        // the new size takes over on the next level reset
        scheduler.reset_level();
        assert_relative_eq!(scheduler.scene().ground, 244.0);
        assert_relative_eq!(scheduler.world.ball.bounding_box().y(), 244.0);
    }

    #[test]
    fn new_rejects_unplayable_config() {
        let mut no_facts = GameConfig::default();
        no_facts.facts.entries.clear();
        let err = Scheduler::new(no_facts, Viewport::default(), Pcg32::seed_from_u64(1))
            .err()
            .expect("empty fact list accepted");
        assert!(err.to_string().contains("fact"));

        let mut no_checkpoints = GameConfig::default();
        no_checkpoints.progression.fact_every = 0;
        assert!(Scheduler::new(no_checkpoints, Viewport::default(), Pcg32::seed_from_u64(1)).is_err());
    }
}
