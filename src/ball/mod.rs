// ┌──────────────────────────────────────────────────────────────────────────┐
// │                          Ball Module Layout                              │
// ├────────────────┬──────────────────────┬──────────────────────────────────┤
// │   Code File    │   Code Component     │         Responsibility           │
// ├────────────────┼──────────────────────┼──────────────────────────────────┤
// │   mod.rs       │ Motion trait         │ marker types for each state      │
// │                │ Entering/Rolling/... │                                  │
// ├────────────────┼──────────────────────┼──────────────────────────────────┤
// │   state.rs     │ BallState<S>         │ legal transitions per state      │
// │                │ BallContext          │ gravity integration + ground     │
// ├────────────────┼──────────────────────┼──────────────────────────────────┤
// │   machine.rs   │ BallStateMachine     │ runtime dispatch of Events       │
// │                │ Ball / PlayerBody    │ what the scheduler talks to      │
// └────────────────┴──────────────────────┴──────────────────────────────────┘
pub mod machine;
pub mod state;

pub use machine::{Ball, Event, PlayerBody};

/// Compile time tag for a ball state
pub trait Motion {
    fn name() -> &'static str;
}

/// One-shot intro : dropping into the scene from above the canvas
#[derive(Debug, Copy, Clone)]
pub struct Entering;

/// Resting on the ground, the only state that accepts a jump
#[derive(Debug, Copy, Clone)]
pub struct Rolling;

#[derive(Debug, Copy, Clone)]
pub struct Jumping;

impl Motion for Entering {
    fn name() -> &'static str {
        "entering"
    }
}

impl Motion for Rolling {
    fn name() -> &'static str {
        "rolling"
    }
}

impl Motion for Jumping {
    fn name() -> &'static str {
        "jumping"
    }
}
