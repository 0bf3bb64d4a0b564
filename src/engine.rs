use crate::browser;
use crate::geometry::{Point, Rect};
use anyhow::{anyhow, Result};
// wasm is single threaded, so Rc RefCell over Mutex
use async_trait::async_trait;
use std::cell::RefCell;
use std::rc::Rc;
use web_sys::CanvasRenderingContext2d;

use self::input::CommandReceiver;

#[async_trait(?Send)]
pub trait Game {
    async fn initialize(&self) -> Result<Box<dyn Game>>;
    fn update(&mut self, now_ms: f64, commands: &mut CommandReceiver);
    fn draw(&mut self, renderer: &Renderer);
}

/// TABLE
/// ┌──────────────────────── One animation frame ──────────────────────────┐
/// │  requestAnimationFrame(perf)                                          │
/// │     ├─► game.update(perf, commands)   drain input, step the core once │
/// │     ├─► game.draw(renderer)           repaint if the core rendered    │
/// │     └─► requestAnimationFrame(...)    re-arm                          │
/// └───────────────────────────────────────────────────────────────────────┘
/// The core is stepped exactly once per display refresh, no fixed-step
/// accumulator : physics constants are tuned per frame.
pub struct GameLoop;

type SharedLoopClosure = Rc<RefCell<Option<browser::LoopClosure>>>;

impl GameLoop {
    pub async fn start(game: impl Game + 'static) -> Result<()> {
        let mut commands = input::prepare_input()?;
        let mut game = game.initialize().await?;
        let renderer = Renderer {
            context: browser::context()?,
        };
        let f: SharedLoopClosure = Rc::new(RefCell::new(None));
        let g = f.clone();
        *g.borrow_mut() = Some(browser::create_raf_closure(move |perf: f64| {
            game.update(perf, &mut commands);
            game.draw(&renderer);
            if let Some(next) = f.borrow().as_ref() {
                if let Err(err) = browser::request_animation_frame(next) {
                    log::error!("game loop stopped : {:#}", err);
                }
            }
        }));

        browser::request_animation_frame(
            g.borrow()
                .as_ref()
                .ok_or_else(|| anyhow!("GameLoop: Loop is None"))?,
        )?;
        log::info!("game loop started");

        Ok(())
    }
}

pub struct Renderer {
    context: CanvasRenderingContext2d,
}

impl Renderer {
    pub fn clear(&self, rect: &Rect) {
        self.context.clear_rect(
            rect.x().into(),
            rect.y().into(),
            rect.width().into(),
            rect.height().into(),
        );
    }

    pub fn fill_rect(&self, rect: &Rect, color: &str) {
        self.context.set_fill_style_str(color);
        self.context.fill_rect(
            rect.x().into(),
            rect.y().into(),
            rect.width().into(),
            rect.height().into(),
        );
    }

    pub fn fill_circle(&self, center: Point, radius: f32, color: &str) {
        self.context.set_fill_style_str(color);
        self.context.begin_path();
        let arc = self.context.arc(
            center.x.into(),
            center.y.into(),
            radius.into(),
            0.0,
            std::f64::consts::TAU,
        );
        match arc {
            Ok(()) => self.context.fill(),
            Err(err) => log::warn!("could not draw circle {:#?}", err),
        }
    }
}

/// Page input turned into game commands
pub mod input {
    use crate::browser;
    use anyhow::{anyhow, Result};
    use futures::channel::mpsc::{unbounded, UnboundedReceiver, UnboundedSender};
    use wasm_bindgen::JsCast;
    use web_sys::{Event, EventTarget, KeyboardEvent};

    #[derive(Debug, Copy, Clone, PartialEq, Eq)]
    pub enum Command {
        Jump,
        Start,
        DismissFact,
        /// back to the title screen from the game over card
        ReturnToTitle,
        /// leave the win card for the start button
        Replay,
        Resize,
        LearnMore,
        Donate,
    }

    pub type CommandReceiver = UnboundedReceiver<Command>;

    // (element id, event, command)
    const BUTTONS: [(&str, &str, Command); 6] = [
        ("start-btn", "click", Command::Start),
        ("close-fact-btn", "click", Command::DismissFact),
        ("restart-game-btn", "click", Command::ReturnToTitle),
        ("replay-btn", "click", Command::Replay),
        ("learn-more-btn", "click", Command::LearnMore),
        ("donate-btn", "click", Command::Donate),
    ];

    /// Wire page events into a command channel, read once per frame
    pub fn prepare_input() -> Result<CommandReceiver> {
        let (sender, receiver) = unbounded();

        let canvas = browser::canvas()?;
        let window = browser::window()?;

        listen(&canvas, "pointerdown", &sender, |_| Some(Command::Jump))?;
        listen(&window, "keydown", &sender, |event| {
            event
                .dyn_ref::<KeyboardEvent>()
                .filter(|key| key.code() == "Space")
                .map(|_| Command::Jump)
        })?;
        for event in ["resize", "orientationchange"] {
            listen(&window, event, &sender, |_| Some(Command::Resize))?;
        }
        for (id, event, command) in BUTTONS {
            match browser::element_by_id(id) {
                Ok(button) => listen(&button, event, &sender, move |_| Some(command))?,
                Err(err) => log::warn!("{} not wired : {:#}", id, err),
            }
        }

        Ok(receiver)
    }

    /// Everything queued since the last frame, oldest first
    pub fn drain(receiver: &mut CommandReceiver) -> Vec<Command> {
        let mut commands = Vec::new();
        while let Ok(command) = receiver.try_recv() {
            commands.push(command);
        }
        commands
    }

    fn listen(
        target: &impl AsRef<EventTarget>,
        event: &str,
        sender: &UnboundedSender<Command>,
        to_command: impl Fn(&Event) -> Option<Command> + 'static,
    ) -> Result<()> {
        let sender = sender.clone();
        let callback = browser::closure_wrap(Box::new(move |event: Event| {
            if let Some(command) = to_command(&event) {
                let _ = sender.unbounded_send(command);
            }
        }) as Box<dyn FnMut(Event)>);
        target
            .as_ref()
            .add_event_listener_with_callback(event, callback.as_ref().unchecked_ref())
            .map_err(|err| anyhow!("Could not listen to {} : {:#?}", event, err))?;
        // listeners live as long as the page
        callback.forget();
        Ok(())
    }
}
