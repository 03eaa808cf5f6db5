//! Value objects produced by the aggregation pipeline.

mod ids;
mod match_record;
mod player;
mod stats;
mod steam;
mod window;

pub use ids::*;
pub use match_record::*;
pub use player::*;
pub use stats::*;
pub use steam::*;
pub use window::*;
