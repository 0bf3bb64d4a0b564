use crate::audio::CuePlayer;
use crate::browser;
use crate::config::GameConfig;
use crate::engine::input::{self, Command, CommandReceiver};
use crate::engine::{Game, Renderer};
use crate::geometry::{Point, Rect, Viewport};
use crate::host::{AudioSink, Cue, FrameRenderer, Overlay, Scene};
use crate::scheduler::{Schedule, Scheduler};
use crate::session::Progress;
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use rand::SeedableRng;
use rand_pcg::Pcg32;

/// TABLE
/// ┌──────────────────────── Page ⇄ core wiring ─────────────────────────────┐
/// │                                                                         │
/// │   engine::input          game.rs                 scheduler.rs           │
/// │   ┌────────────┐ Command ┌────────────┐  frame() ┌──────────────┐       │
/// │   │ DOM events ├────────►│ DropletRun ├─────────►│  Scheduler   │       │
/// │   └────────────┘         │  update()  │          └──────┬───────┘       │
/// │                          └─────┬──────┘                 │ cues, HUD,    │
/// │                                │ draw()                 │ render_frame  │
/// │                          ┌─────▼──────┐          ┌──────▼───────┐       │
/// │                          │  Renderer  │◄─────────┤   PageHost   │       │
/// │                          │  (canvas)  │  dirty   │ DOM + audio  │       │
/// │                          └────────────┘          └──────────────┘       │
/// └─────────────────────────────────────────────────────────────────────────┘
pub enum DropletRun {
    /// Waiting on config.json
    Loading,
    Loaded(Box<Run>),
}

impl DropletRun {
    const CONFIG_PATH: &'static str = "config.json";

    pub fn new() -> Self {
        DropletRun::Loading
    }

    async fn load_config() -> Result<GameConfig> {
        let config = browser::fetch_json::<GameConfig>(Self::CONFIG_PATH)
            .await
            .with_context(|| format!("Failed to load config from : {}", Self::CONFIG_PATH))?;
        config.validate().context("config.json rejected")?;
        Ok(config)
    }
}

impl Default for DropletRun {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait(?Send)]
impl Game for DropletRun {
    async fn initialize(&self) -> Result<Box<dyn Game>> {
        match self {
            DropletRun::Loading => {
                let config = Self::load_config().await.unwrap_or_else(|err| {
                    log::warn!("{:#}, playing with defaults", err);
                    GameConfig::default()
                });
                let viewport = fit_canvas()?;
                let rng = Pcg32::seed_from_u64(browser::random_seed()?);
                let host = PageHost::new(&config);
                let scheduler = Scheduler::new(config, viewport, rng)?;
                Ok(Box::new(DropletRun::Loaded(Box::new(Run {
                    scheduler,
                    host,
                    scheduled: false,
                }))))
            }
            DropletRun::Loaded(_) => Err(anyhow!("Game is already initialized")),
        }
    }

    fn update(&mut self, now_ms: f64, commands: &mut CommandReceiver) {
        if let DropletRun::Loaded(run) = self {
            let run = run.as_mut();
            for command in input::drain(commands) {
                run.handle(command);
            }
            // halted cores are only woken by a command
            if run.scheduled {
                run.scheduled = run.scheduler.frame(now_ms, &mut run.host) == Schedule::NextFrame;
            }
        }
    }

    fn draw(&mut self, renderer: &Renderer) {
        if let DropletRun::Loaded(run) = self {
            if run.host.dirty {
                run.host.dirty = false;
                paint(renderer, &run.scheduler.scene());
            }
        }
    }
}

pub struct Run {
    scheduler: Scheduler,
    host: PageHost,
    /// the core asked for another frame
    scheduled: bool,
}

impl Run {
    fn handle(&mut self, command: Command) {
        log::debug!("command {:?}", command);
        match command {
            Command::Jump => {
                self.scheduler.jump(&mut self.host);
            }
            Command::Start => {
                report("start button", set_hidden(ids::START_BUTTON, true));
                self.scheduled = self.scheduler.start(&mut self.host) == Schedule::NextFrame;
            }
            Command::DismissFact => {
                if self.scheduler.dismiss_interstitial(&mut self.host) == Schedule::NextFrame {
                    self.scheduled = true;
                }
            }
            Command::ReturnToTitle => {
                self.scheduler.reset_game(&mut self.host);
                self.scheduled = false;
                self.host.dirty = true;
                report("start button", set_hidden(ids::START_BUTTON, false));
            }
            Command::Replay => {
                self.host.hide_win_overlay();
                report("start button", set_hidden(ids::START_BUTTON, false));
            }
            Command::Resize => match fit_canvas() {
                Ok(viewport) => {
                    self.scheduler.resize(viewport);
                    self.host.dirty = true;
                }
                Err(err) => log::warn!("resize ignored : {:#}", err),
            },
            Command::LearnMore => {
                report("learn more link", browser::open_in_new_tab(links::LEARN_MORE));
            }
            Command::Donate => {
                report("donate link", browser::open_in_new_tab(links::DONATE));
            }
        }
    }
}

mod ids {
    pub const START_BUTTON: &str = "start-btn";
    pub const INFO_CARD: &str = "info-card";
    pub const FACT_TEXT: &str = "fact-text";
    pub const WIN_CARD: &str = "call-to-action";
    pub const GAME_OVER_CARD: &str = "game-over-card";
    pub const SCORE: &str = "score";
    pub const LEVEL: &str = "level-num";
    pub const PROGRESS_FILL: &str = "progress-fill";
    pub const LETS_GO: &str = "lets-go";

    pub fn heart(n: u32) -> String {
        format!("heart{}", n)
    }

    pub fn star(n: u32) -> String {
        format!("star{}", n)
    }
}

mod links {
    pub const LEARN_MORE: &str = "https://www.charitywater.org/about";
    pub const DONATE: &str = "https://www.charitywater.org/donate";
}

const LETS_GO_MILLIS: i32 = 1500;
const STARS: u32 = 3;

/// The page around the canvas : DOM overlays, audio and a redraw flag
pub struct PageHost {
    audio: CuePlayer,
    facts: Vec<String>,
    max_lives: u32,
    dirty: bool,
}

impl PageHost {
    fn new(config: &GameConfig) -> Self {
        PageHost {
            audio: CuePlayer::new(),
            facts: config.facts.entries.clone(),
            max_lives: config.progression.max_lives,
            dirty: true,
        }
    }
}

impl AudioSink for PageHost {
    fn play(&mut self, cue: Cue) {
        self.audio.play(cue);
    }
}

impl Overlay for PageHost {
    fn show_interstitial(&mut self, fact: usize) {
        let text = self.facts.get(fact).map(String::as_str).unwrap_or_default();
        report("fact text", set_text(ids::FACT_TEXT, text));
        report("fact card", set_hidden(ids::INFO_CARD, false));
    }

    fn hide_interstitial(&mut self) {
        report("fact card", set_hidden(ids::INFO_CARD, true));
    }

    fn show_win_overlay(&mut self) {
        report("win card", set_hidden(ids::WIN_CARD, false));
    }

    fn hide_win_overlay(&mut self) {
        report("win card", set_hidden(ids::WIN_CARD, true));
    }

    fn show_game_over_overlay(&mut self) {
        report("game over card", set_hidden(ids::GAME_OVER_CARD, false));
    }

    fn hide_game_over_overlay(&mut self) {
        report("game over card", set_hidden(ids::GAME_OVER_CARD, true));
    }

    fn update_score(&mut self, score: u32) {
        report("score", set_text(ids::SCORE, &score.to_string()));
    }

    fn update_level(&mut self, level: u32) {
        report("level", set_text(ids::LEVEL, &level.to_string()));
    }

    fn update_lives(&mut self, lives: u32) {
        for heart in 1..=self.max_lives {
            report("hearts", set_class(&ids::heart(heart), "lost", heart > lives));
        }
    }

    fn update_progress(&mut self, progress: Progress) {
        report("progress bar", set_width(ids::PROGRESS_FILL, progress.percent));
        for star in 1..=STARS {
            report("stars", set_class(&ids::star(star), "active", star <= progress.stars));
        }
    }

    fn show_lets_go(&mut self) {
        report("let's go", flash(ids::LETS_GO, LETS_GO_MILLIS));
    }
}

impl FrameRenderer for PageHost {
    fn render_frame(&mut self, _scene: &Scene<'_>) {
        // painted on the next draw, the scene is read back from the scheduler
        self.dirty = true;
    }
}

// ==================== DOM helpers ====================
fn report(what: &str, result: Result<()>) {
    if let Err(err) = result {
        log::warn!("{} not updated : {:#}", what, err);
    }
}

fn set_hidden(id: &str, hidden: bool) -> Result<()> {
    set_class(id, "hidden", hidden)
}

fn set_class(id: &str, class: &str, on: bool) -> Result<()> {
    browser::element_by_id(id)?
        .class_list()
        .toggle_with_force(class, on)
        .map(|_| ())
        .map_err(|err| anyhow!("Could not toggle {} on {} : {:#?}", class, id, err))
}

fn set_text(id: &str, text: &str) -> Result<()> {
    browser::element_by_id(id)?.set_text_content(Some(text));
    Ok(())
}

fn set_width(id: &str, percent: f32) -> Result<()> {
    browser::element_by_id(id)?
        .style()
        .set_property("width", &format!("{}%", percent))
        .map_err(|err| anyhow!("Could not size {} : {:#?}", id, err))
}

/// Show an element for `millis`, then hide it again
fn flash(id: &'static str, millis: i32) -> Result<()> {
    set_class(id, "visible", true)?;
    let hide = browser::closure_wrap(Box::new(move || {
        report("let's go", set_class(id, "visible", false))
    }) as Box<dyn FnMut()>);
    browser::set_timeout(&hide, millis)?;
    hide.forget();
    Ok(())
}

/// Size the canvas to the window and return the new viewport
fn fit_canvas() -> Result<Viewport> {
    let viewport = Viewport::fit(browser::inner_width()?);
    let canvas = browser::canvas()?;
    canvas.set_width(viewport.width as u32);
    canvas.set_height(viewport.height as u32);
    let style = canvas.style();
    style
        .set_property("width", &format!("{}px", viewport.width))
        .and_then(|_| style.set_property("height", &format!("{}px", viewport.height)))
        .map_err(|err| anyhow!("Could not style canvas : {:#?}", err))?;
    Ok(viewport)
}

// ==================== Canvas ====================
mod palette {
    pub const SKY: &str = "#bfe6ff";
    pub const GROUND: &str = "#c8a165";
    pub const ROCK: &str = "#6b5b4b";
    pub const DROPLET: &str = "#2e9df7";
    pub const BALL: &str = "#ffc907";
}

fn paint(renderer: &Renderer, scene: &Scene<'_>) {
    let viewport = scene.viewport;
    let screen = Rect::new_from_x_y(0.0, 0.0, viewport.width, viewport.height);
    renderer.clear(&screen);
    renderer.fill_rect(&screen, palette::SKY);

    let ball = scene.ball.bounding_box();
    let ground = scene.ground + ball.height();
    renderer.fill_rect(
        &Rect::new_from_x_y(0.0, ground, viewport.width, viewport.height - ground),
        palette::GROUND,
    );

    for rock in scene.obstacles {
        renderer.fill_rect(&rock.bounds(), palette::ROCK);
    }
    for droplet in scene.droplets.iter().filter(|droplet| !droplet.collected) {
        renderer.fill_rect(&droplet.bounds(), palette::DROPLET);
    }
    let radius = ball.width() / 2.0;
    renderer.fill_circle(
        Point {
            x: ball.x() + radius,
            y: ball.y() + radius,
        },
        radius,
        palette::BALL,
    );
}
