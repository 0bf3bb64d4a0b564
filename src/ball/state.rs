/// All code relating to individual ball states lives here and enforces
/// unrepresentable states : a transition can only happen through the
/// methods provided on the matching `BallState<S>`
/// - PUBLIC  : BallState and BallContext
/// - PRIVATE : fields of BallState
use super::{Entering, Jumping, Motion, Rolling};

pub enum IsJumping {
    Landed(BallState<Rolling>),
    InProgress(BallState<Jumping>),
}

pub enum IsEntering {
    Landed(BallState<Rolling>),
    Falling(BallState<Entering>),
}

#[derive(Debug, Copy, Clone, PartialEq)]
/// Shared physics data, y grows downwards (top left is origin)
pub struct BallContext {
    pub y: f32,
    pub vy: f32,
    pub ground: f32,
    gravity: f32,
    jump_velocity: f32,
}

impl BallContext {
    pub fn new(ground: f32, gravity: f32, jump_velocity: f32) -> Self {
        BallContext {
            y: ground,
            vy: 0.0,
            ground,
            gravity,
            jump_velocity,
        }
    }

    /// One explicit Euler step, no sub-stepping
    /// - velocity first, then position
    /// - reaching the ground clamps exactly and kills velocity (no bounce)
    pub fn integrate(mut self) -> Self {
        self.vy += self.gravity;
        self.y += self.vy;
        if self.y >= self.ground {
            self.y = self.ground;
            self.vy = 0.0;
        }
        self
    }

    fn grounded(&self) -> bool {
        self.y >= self.ground
    }

    fn launch(mut self) -> Self {
        self.vy = self.jump_velocity;
        self
    }

    fn hold_at(mut self, y: f32) -> Self {
        self.y = y;
        self.vy = 0.0;
        self
    }
}

#[derive(Debug, Copy, Clone)]
pub struct BallState<S> {
    context: BallContext,
    // phantom tag, only differentiates states at compile time
    _state: S,
}

impl<S: Motion> BallState<S> {
    pub fn context(&self) -> &BallContext {
        &self.context
    }

    pub fn name(&self) -> &'static str {
        S::name()
    }

    /// Any state can be thrown back above the canvas (start / restart)
    pub fn fall_in(self, from: f32) -> BallState<Entering> {
        BallState {
            context: self.context.hold_at(from),
            _state: Entering,
        }
    }
}

impl BallState<Rolling> {
    pub fn new(context: BallContext) -> Self {
        BallState {
            context: context.hold_at(context.ground),
            _state: Rolling,
        }
    }

    pub fn jump(self) -> BallState<Jumping> {
        BallState {
            context: self.context.launch(),
            _state: Jumping,
        }
    }
}

impl BallState<Jumping> {
    pub fn update(mut self) -> IsJumping {
        self.context = self.context.integrate();
        if self.context.grounded() {
            IsJumping::Landed(self.land())
        } else {
            IsJumping::InProgress(self)
        }
    }

    fn land(self) -> BallState<Rolling> {
        BallState {
            context: self.context,
            _state: Rolling,
        }
    }
}

impl BallState<Entering> {
    pub fn update(mut self) -> IsEntering {
        self.context = self.context.integrate();
        if self.context.grounded() {
            IsEntering::Landed(BallState {
                context: self.context,
                _state: Rolling,
            })
        } else {
            IsEntering::Falling(self)
        }
    }
}
