use crate::error::Result;
use crate::types::PriceLevel;
use serde::Deserialize;

/// Full depth snapshot as returned by a REST depth endpoint, best price first on each side.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Snapshot {
    #[serde(rename = "lastUpdateId", default)]
    pub last_update_id: u64,
    pub bids: Vec<PriceLevel>,
    pub asks: Vec<PriceLevel>,
}

impl Snapshot {
    pub fn from_json(body: &str) -> Result<Self> {
        Ok(serde_json::from_str(body)?)
    }

    #[inline]
    pub fn best_bid(&self) -> Option<&PriceLevel> {
        self.bids.first()
    }

    #[inline]
    pub fn best_ask(&self) -> Option<&PriceLevel> {
        self.asks.first()
    }
}
