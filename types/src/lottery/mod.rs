mod constants;
mod game;
mod presets;
mod stats;
mod ticket;

pub use constants::*;
pub use game::*;
pub use presets::*;
pub use stats::*;
pub use ticket::*;

#[cfg(test)]
mod tests;
