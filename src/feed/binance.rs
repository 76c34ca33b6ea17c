use crate::error::{LadderError, Result};
use crate::feed::DepthSource;
use crate::types::Snapshot;
use log::debug;
use reqwest::blocking::Client;

pub const SPOT_DEPTH_ENDPOINT: &str = "https://api.binance.com/api/v3/depth";
pub const MAX_DEPTH_LIMIT: u32 = 5000;

/// Blocking client for a Binance-style `GET /depth?symbol=..&limit=..` endpoint.
pub struct BinanceRest {
    client: Client,
    endpoint: String,
    limit: u32,
}

impl BinanceRest {
    pub fn new(endpoint: impl Into<String>, limit: u32) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
            limit: limit.clamp(1, MAX_DEPTH_LIMIT),
        }
    }

    #[inline]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    #[inline]
    pub fn limit(&self) -> u32 {
        self.limit
    }
}

impl Default for BinanceRest {
    fn default() -> Self {
        Self::new(SPOT_DEPTH_ENDPOINT, MAX_DEPTH_LIMIT)
    }
}

impl DepthSource for BinanceRest {
    fn name(&self) -> &str {
        "binance"
    }

    fn fetch(&mut self, pair: &str) -> Result<Snapshot> {
        let symbol = pair.to_uppercase();
        debug!("GET {}?symbol={}&limit={}", self.endpoint, symbol, self.limit);

        let limit = self.limit.to_string();
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("symbol", symbol.as_str()), ("limit", limit.as_str())])
            .send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(LadderError::Status(status.as_u16()));
        }

        let snapshot = Snapshot::from_json(&response.text()?)?;
        debug!(
            "{symbol}: {} bids, {} asks (update {})",
            snapshot.bids.len(),
            snapshot.asks.len(),
            snapshot.last_update_id
        );

        Ok(snapshot)
    }
}
