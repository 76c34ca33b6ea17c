pub mod level;
pub mod side;
pub mod snapshot;

pub use level::{AggregatedLevel, PriceLevel};
pub use side::Side;
pub use snapshot::Snapshot;
