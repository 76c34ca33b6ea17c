pub mod aggregate;
pub mod config;
pub mod error;
pub mod feed;
pub mod ladder;
pub mod scale;
pub mod types;

pub use aggregate::{aggregate, sort_best_first};
pub use config::AppConfig;
pub use error::{LadderError, Result};
pub use feed::{BinanceRest, DepthSource, SimulatedBook};
pub use ladder::{build_side, build_view, mid_price, LadderParams, LadderView, RenderRow};
pub use scale::{scale, RowStyle};
pub use types::{AggregatedLevel, PriceLevel, Side, Snapshot};
