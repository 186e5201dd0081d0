//! Technical indicators over per-symbol daily bars. Every function takes
//! the bar series sorted most-recent-first and answers insufficient or
//! gappy history with an absent value, never a partial one.

pub mod indicators;
pub mod levels;
pub mod snapshot;


pub use indicators::*;
pub use levels::*;
pub use snapshot::*;
