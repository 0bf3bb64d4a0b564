use super::state::{BallContext, BallState, IsEntering, IsJumping};
use super::{Entering, Jumping, Rolling};
use crate::geometry::Rect;

/// ┌──────────────── State Transition Flow ──────────────────┐
/// │  From State  →  Event   →  To State                     │
/// ├─────────────────────────────────────────────────────────┤
/// │  any         →  FallIn  →  Entering                     │
/// │  Rolling     →  Jump    →  Jumping                      │
/// │  -------        ------                                  │
/// │  Entering    →  Update  →  Rolling (when grounded)      │
/// │  Jumping     →  Update  →  Rolling (when landed)        │
/// └─────────────────────────────────────────────────────────┘
#[derive(Debug, Copy, Clone)]
pub enum Event {
    FallIn { from: f32 },
    Jump,
    Update,
}

#[derive(Debug, Copy, Clone)]
enum BallStateMachine {
    Entering(BallState<Entering>),
    Rolling(BallState<Rolling>),
    Jumping(BallState<Jumping>),
}

impl From<BallState<Entering>> for BallStateMachine {
    fn from(state: BallState<Entering>) -> Self {
        BallStateMachine::Entering(state)
    }
}

impl From<BallState<Rolling>> for BallStateMachine {
    fn from(state: BallState<Rolling>) -> Self {
        BallStateMachine::Rolling(state)
    }
}

impl From<BallState<Jumping>> for BallStateMachine {
    fn from(state: BallState<Jumping>) -> Self {
        BallStateMachine::Jumping(state)
    }
}

impl From<IsJumping> for BallStateMachine {
    fn from(is_jumping: IsJumping) -> Self {
        match is_jumping {
            IsJumping::Landed(rolling) => rolling.into(),
            IsJumping::InProgress(jumping) => jumping.into(),
        }
    }
}

impl From<IsEntering> for BallStateMachine {
    fn from(is_entering: IsEntering) -> Self {
        match is_entering {
            IsEntering::Landed(rolling) => rolling.into(),
            IsEntering::Falling(entering) => entering.into(),
        }
    }
}

impl BallStateMachine {
    // consumes self : the old state can't be observed after a transition
    fn transition(self, event: Event) -> Self {
        use BallStateMachine::*;
        match (self, event) {
            (Entering(state), Event::FallIn { from }) => state.fall_in(from).into(),
            (Rolling(state), Event::FallIn { from }) => state.fall_in(from).into(),
            (Jumping(state), Event::FallIn { from }) => state.fall_in(from).into(),
            (Rolling(state), Event::Jump) => state.jump().into(),
            (Entering(state), Event::Update) => state.update().into(),
            (Jumping(state), Event::Update) => state.update().into(),
            // grounded balls don't integrate, mid-air balls can't jump
            _ => self,
        }
    }

    fn context(&self) -> &BallContext {
        use BallStateMachine::*;
        match self {
            Entering(state) => state.context(),
            Rolling(state) => state.context(),
            Jumping(state) => state.context(),
        }
    }

    fn name(&self) -> &'static str {
        use BallStateMachine::*;
        match self {
            Entering(state) => state.name(),
            Rolling(state) => state.name(),
            Jumping(state) => state.name(),
        }
    }
}

/// Snapshot of the ball's vertical physics
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PlayerBody {
    pub y: f32,
    pub vy: f32,
    pub airborne: bool,
    pub entering: bool,
}

/// The player character
/// - x and size are fixed fractions of the canvas width
/// - y is owned by the state machine
#[derive(Debug, Clone)]
pub struct Ball {
    state: BallStateMachine,
    x: f32,
    size: f32,
}

impl Ball {
    pub fn new(x: f32, size: f32, ground: f32, gravity: f32, jump_velocity: f32) -> Self {
        let context = BallContext::new(ground, gravity, jump_velocity);
        Ball {
            state: BallState::new(context).into(),
            x,
            size,
        }
    }

    /// Advance one frame; grounded balls are left alone
    pub fn update(&mut self) {
        self.state = self.state.transition(Event::Update);
    }

    /// Returns false if the ball wasn't on the ground to jump from
    pub fn jump(&mut self) -> bool {
        let jumped = self.is_grounded();
        self.state = self.state.transition(Event::Jump);
        jumped
    }

    pub fn fall_in(&mut self, from: f32) {
        self.state = self.state.transition(Event::FallIn { from });
    }

    pub fn body(&self) -> PlayerBody {
        let context = self.state.context();
        PlayerBody {
            y: context.y,
            vy: context.vy,
            airborne: !self.is_grounded(),
            entering: self.is_entering(),
        }
    }

    pub fn is_grounded(&self) -> bool {
        matches!(self.state, BallStateMachine::Rolling(_))
    }

    pub fn is_entering(&self) -> bool {
        matches!(self.state, BallStateMachine::Entering(_))
    }

    pub fn state_name(&self) -> &'static str {
        self.state.name()
    }

    pub fn bounding_box(&self) -> Rect {
        Rect::new_from_x_y(self.x, self.state.context().y, self.size, self.size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const GROUND: f32 = 214.0;

    fn ball() -> Ball {
        Ball::new(80.0, 45.0, GROUND, 0.5, -15.0)
    }

    fn steps_until_grounded(ball: &mut Ball) -> u32 {
        let mut steps = 0;
        while !ball.is_grounded() {
            ball.update();
            steps += 1;
            assert!(steps < 1000, "ball never landed");
        }
        steps
    }

    #[test]
    fn starts_grounded_and_still() {
        let body = ball().body();
        assert_eq!(
            body,
            PlayerBody {
                y: GROUND,
                vy: 0.0,
                airborne: false,
                entering: false
            }
        );
    }

    #[test]
    fn jump_trajectory_is_exact() {
        let mut ball = ball();
        assert!(ball.jump());
        let mut peak = GROUND;
        let mut steps = 0;
        while ball.body().airborne {
            ball.update();
            steps += 1;
            peak = peak.min(ball.body().y);
            if steps == 30 {
                assert_relative_eq!(ball.body().y, GROUND - 217.5);
                assert_relative_eq!(ball.body().vy, 0.0);
            }
        }
        assert_eq!(steps, 59);
        assert_relative_eq!(peak, GROUND - 217.5);
        assert_eq!(ball.body().y, GROUND);
        assert_eq!(ball.body().vy, 0.0);
    }

    #[test]
    fn cannot_double_jump() {
        let mut ball = ball();
        assert!(ball.jump());
        ball.update();
        let before = ball.body();
        assert!(!ball.jump());
        assert_eq!(ball.body(), before);
    }

    #[test]
    fn grounded_update_is_a_no_op() {
        let mut ball = ball();
        ball.update();
        ball.update();
        assert_eq!(ball.body().y, GROUND);
        assert_eq!(ball.state_name(), "rolling");
    }

    #[test]
    fn intro_fall_lands_on_step_33() {
        let mut ball = ball();
        ball.fall_in(-60.0);
        assert!(ball.body().entering);
        assert!(ball.body().airborne);
        assert_eq!(steps_until_grounded(&mut ball), 33);
        assert!(!ball.body().entering);
        assert_eq!(ball.body().y, GROUND);
    }

    #[test]
    fn no_jump_during_intro() {
        let mut ball = ball();
        ball.fall_in(-60.0);
        assert!(!ball.jump());
        assert!(ball.is_entering());
    }

    #[test]
    fn restart_mid_jump_reenters() {
        let mut ball = ball();
        ball.jump();
        ball.update();
        ball.fall_in(-30.0);
        assert_eq!(ball.state_name(), "entering");
        assert_eq!(ball.body().y, -30.0);
        assert_eq!(ball.body().vy, 0.0);
    }

    #[test]
    fn bounding_box_tracks_height() {
        let mut ball = ball();
        ball.jump();
        ball.update();
        let bounds = ball.bounding_box();
        assert_relative_eq!(bounds.x(), 80.0);
        assert_relative_eq!(bounds.y(), GROUND - 14.5);
        assert_relative_eq!(bounds.width(), 45.0);
    }
}
