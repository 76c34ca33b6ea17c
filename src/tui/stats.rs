use depth_ladder::Snapshot;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

/// Summary of the raw snapshot behind the current frame.
#[derive(Debug, Clone, PartialEq)]
pub struct MarketStats {
    pub bid_volume: Decimal,
    pub ask_volume: Decimal,
    pub spread: Option<Decimal>,
    pub imbalance: f64,
    pub bid_levels: usize,
    pub ask_levels: usize,
    pub update_id: u64,
}

impl MarketStats {
    pub fn from_snapshot(snapshot: &Snapshot) -> Self {
        let bid_volume: Decimal = snapshot.bids.iter().map(|l| l.quantity).sum();
        let ask_volume: Decimal = snapshot.asks.iter().map(|l| l.quantity).sum();

        let spread = match (snapshot.best_bid(), snapshot.best_ask()) {
            (Some(bid), Some(ask)) => Some(ask.price - bid.price),
            _ => None,
        };

        let total_volume = bid_volume + ask_volume;
        let imbalance = if total_volume > Decimal::ZERO {
            ((bid_volume - ask_volume) / total_volume)
                .to_f64()
                .unwrap_or(0.0)
        } else {
            0.0
        };

        Self {
            bid_volume,
            ask_volume,
            spread,
            imbalance,
            bid_levels: snapshot.bids.len(),
            ask_levels: snapshot.asks.len(),
            update_id: snapshot.last_update_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use depth_ladder::PriceLevel;
    use rust_decimal_macros::dec;

    #[test]
    fn test_from_snapshot() {
        let snapshot = Snapshot {
            last_update_id: 77,
            bids: vec![
                PriceLevel::new(dec!(99.5), dec!(3)),
                PriceLevel::new(dec!(99), dec!(3)),
            ],
            asks: vec![PriceLevel::new(dec!(100.25), dec!(2))],
        };

        let stats = MarketStats::from_snapshot(&snapshot);
        assert_eq!(stats.bid_volume, dec!(6));
        assert_eq!(stats.ask_volume, dec!(2));
        assert_eq!(stats.spread, Some(dec!(0.75)));
        assert_eq!(stats.imbalance, 0.5);
        assert_eq!((stats.bid_levels, stats.ask_levels), (2, 1));
        assert_eq!(stats.update_id, 77);
    }

    #[test]
    fn test_empty_snapshot() {
        let stats = MarketStats::from_snapshot(&Snapshot::default());
        assert_eq!(stats.spread, None);
        assert_eq!(stats.imbalance, 0.0);
        assert_eq!(stats.bid_volume, Decimal::ZERO);
    }
}
