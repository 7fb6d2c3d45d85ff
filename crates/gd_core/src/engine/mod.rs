//! Resolution engine: dice, penalties, clock, validation and the game flow
//! state machine that ties them together.

pub mod clock;
pub mod config;
pub mod dice;
pub mod flow;
pub mod penalty;
pub mod rng;
pub mod validator;

pub use flow::{Branch, FlowResult, GameFlow, PendingPenalty};
pub use rng::{Lcg, RandomSource};
