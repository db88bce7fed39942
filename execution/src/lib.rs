pub mod clock;
pub mod engine;
pub mod prize;
pub mod resolve;
pub mod rng;

#[cfg(any(test, feature = "mocks"))]
pub mod mocks;

pub use clock::{Clock, SystemClock};
pub use engine::{Batch, Engine, RunState, StopReason, Tick};
pub use prize::{PrizeTable, PrizeValue};
pub use resolve::{count_matches, NumberSet, Resolution, Resolver};
pub use rng::{DrawRng, Entropy};
