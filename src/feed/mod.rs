pub mod binance;
pub mod simulated;

use crate::error::Result;
use crate::types::Snapshot;

pub use binance::BinanceRest;
pub use simulated::SimulatedBook;

/// Something that can hand out a full depth snapshot for a trading pair on demand.
///
/// One call per refresh tick; implementations do not retry.
pub trait DepthSource {
    fn name(&self) -> &str;

    fn fetch(&mut self, pair: &str) -> Result<Snapshot>;
}
