use crate::error::Result;
use crate::feed::DepthSource;
use crate::types::{PriceLevel, Snapshot};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::HashMap;

/// Offline stand-in for an exchange: each pair's mid-price takes a random walk step per fetch
/// and a fresh book is laid out around it.
pub struct SimulatedBook {
    rng: StdRng,
    mids: HashMap<String, Decimal>,
    depth: usize,
    volatility: Decimal,
    sequence: u64,
}

impl SimulatedBook {
    pub fn new(depth: usize) -> Self {
        Self::from_rng(StdRng::from_entropy(), depth)
    }

    pub fn with_seed(seed: u64, depth: usize) -> Self {
        Self::from_rng(StdRng::seed_from_u64(seed), depth)
    }

    fn from_rng(rng: StdRng, depth: usize) -> Self {
        Self {
            rng,
            mids: HashMap::new(),
            depth: depth.max(1),
            volatility: dec!(0.0005),
            sequence: 0,
        }
    }

    pub fn mid_price(&self, pair: &str) -> Option<Decimal> {
        self.mids.get(&pair.to_uppercase()).copied()
    }

    fn starting_mid(symbol: &str) -> Decimal {
        match symbol {
            "BTCUSDT" => dec!(60000),
            "ETHUSDT" => dec!(2500),
            "SOLUSDT" => dec!(150),
            "WLDUSDT" => dec!(2.5),
            _ => dec!(100),
        }
    }

    fn tick_size(mid: Decimal) -> Decimal {
        if mid >= dec!(10) {
            dec!(0.01)
        } else if mid >= Decimal::ONE {
            dec!(0.001)
        } else {
            dec!(0.0001)
        }
    }

    fn step_mid(&mut self, symbol: &str) -> Decimal {
        let mid = self
            .mids
            .get(symbol)
            .copied()
            .unwrap_or_else(|| Self::starting_mid(symbol));
        let tick = Self::tick_size(mid);

        let change = Decimal::from(self.rng.gen_range(-10..=10)) * self.volatility * mid / dec!(10);
        let next = ((mid + change) / tick).round() * tick;
        let next = next.max(tick * dec!(100));

        self.mids.insert(symbol.to_string(), next);
        next
    }

    fn random_quantity(&mut self) -> Decimal {
        let quantity = Decimal::new(self.rng.gen_range(1..50_000), 4);
        if self.rng.gen_bool(0.03) {
            quantity * dec!(20)
        } else {
            quantity
        }
    }

    /// Walks away from `best` one side at a time. A zero gap repeats the previous price, so
    /// books carry the occasional duplicate level the way merged feeds do.
    fn side(&mut self, best: Decimal, tick: Decimal, direction: Decimal) -> Vec<PriceLevel> {
        let mut price = best;
        let mut levels = Vec::with_capacity(self.depth);

        for i in 0..self.depth {
            if i > 0 {
                price += direction * tick * Decimal::from(self.rng.gen_range(0..=3));
            }
            let quantity = self.random_quantity();
            levels.push(PriceLevel::new(price, quantity));
        }

        levels
    }
}

impl DepthSource for SimulatedBook {
    fn name(&self) -> &str {
        "simulated"
    }

    fn fetch(&mut self, pair: &str) -> Result<Snapshot> {
        let symbol = pair.to_uppercase();
        let mid = self.step_mid(&symbol);
        let tick = Self::tick_size(mid);
        let half_spread = tick * Decimal::from(self.rng.gen_range(1..=3));

        let bids = self.side(mid - half_spread, tick, Decimal::NEGATIVE_ONE);
        let asks = self.side(mid + half_spread, tick, Decimal::ONE);

        self.sequence += 1;

        Ok(Snapshot {
            last_update_id: self.sequence,
            bids,
            asks,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_book_shape() {
        let mut book = SimulatedBook::with_seed(42, 200);

        for _ in 0..20 {
            let snapshot = book.fetch("ethusdt").unwrap();

            assert_eq!(snapshot.bids.len(), 200);
            assert_eq!(snapshot.asks.len(), 200);
            assert!(snapshot.bids[0].price < snapshot.asks[0].price);
            assert!(snapshot.bids.windows(2).all(|w| w[0].price >= w[1].price));
            assert!(snapshot.asks.windows(2).all(|w| w[0].price <= w[1].price));
            assert!(snapshot
                .bids
                .iter()
                .chain(&snapshot.asks)
                .all(|l| l.quantity > Decimal::ZERO && l.price > Decimal::ZERO));
        }

        assert!(book.mid_price("ETHUSDT").is_some());
        assert!(book.mid_price("BTCUSDT").is_none());
    }

    #[test]
    fn test_same_seed_same_books() {
        let mut a = SimulatedBook::with_seed(9, 50);
        let mut b = SimulatedBook::with_seed(9, 50);

        for _ in 0..5 {
            assert_eq!(a.fetch("SOLUSDT").unwrap(), b.fetch("SOLUSDT").unwrap());
        }
    }

    #[test]
    fn test_sequence_advances() {
        let mut book = SimulatedBook::with_seed(1, 5);
        assert_eq!(book.fetch("BTCUSDT").unwrap().last_update_id, 1);
        assert_eq!(book.fetch("WLDUSDT").unwrap().last_update_id, 2);
    }
}
