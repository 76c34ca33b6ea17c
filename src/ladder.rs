use crate::aggregate::{aggregate, sort_best_first};
use crate::error::{LadderError, Result};
use crate::scale::{scale, RowStyle};
use crate::types::{AggregatedLevel, PriceLevel, Side, Snapshot};
use log::debug;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

pub const DEFAULT_ROWS: usize = 10;

/// Knobs the user picks from the menus; fixed for the duration of one refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LadderParams {
    pub step: Decimal,
    pub price_precision: u32,
    pub quantity_precision: u32,
    pub rows: usize,
}

impl Default for LadderParams {
    fn default() -> Self {
        Self {
            step: dec!(0.01),
            price_precision: 2,
            quantity_precision: 2,
            rows: DEFAULT_ROWS,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderRow {
    pub price: String,
    pub quantity: String,
    pub style: RowStyle,
}

/// Everything the renderer needs for one frame. Both sides are best-first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LadderView {
    pub bids: Vec<RenderRow>,
    pub asks: Vec<RenderRow>,
    pub mid_price: Option<String>,
}

/// Aggregates one side, keeps the best `params.rows` buckets and formats them.
///
/// Quantities are rounded to the display precision before styling, so the fill bars and the
/// max highlight agree with the numbers on screen.
pub fn build_side(
    levels: &[PriceLevel],
    side: Side,
    params: &LadderParams,
) -> Result<Vec<RenderRow>> {
    let mut buckets = aggregate(levels, params.step, side)?;
    sort_best_first(&mut buckets, side);
    buckets.truncate(params.rows);

    let shown: Vec<AggregatedLevel> = buckets
        .iter()
        .map(|b| AggregatedLevel {
            price: round_half_even(b.price, params.price_precision),
            quantity: round_half_even(b.quantity, params.quantity_precision),
        })
        .collect();

    let styles = scale(&shown);

    Ok(shown
        .iter()
        .zip(styles)
        .map(|(level, style)| RenderRow {
            price: format_decimal(level.price, params.price_precision),
            quantity: format_decimal(level.quantity, params.quantity_precision),
            style,
        })
        .collect())
}

/// Builds both tables and the mid-price. A side with no levels renders as an empty table.
pub fn build_view(snapshot: &Snapshot, params: &LadderParams) -> Result<LadderView> {
    Ok(LadderView {
        bids: side_or_empty(&snapshot.bids, Side::Bid, params)?,
        asks: side_or_empty(&snapshot.asks, Side::Ask, params)?,
        mid_price: mid_price(snapshot)
            .map(|mid| format_decimal(mid, params.price_precision + 2)),
    })
}

fn side_or_empty(
    levels: &[PriceLevel],
    side: Side,
    params: &LadderParams,
) -> Result<Vec<RenderRow>> {
    match build_side(levels, side, params) {
        Err(LadderError::EmptyInput { side }) => {
            debug!("snapshot has no {side} levels");
            Ok(Vec::new())
        }
        other => other,
    }
}

/// Midpoint of the first raw bid and ask, taken before any aggregation.
pub fn mid_price(snapshot: &Snapshot) -> Option<Decimal> {
    let bid = snapshot.best_bid()?;
    let ask = snapshot.best_ask()?;
    bid.price.checked_add(ask.price).map(|sum| sum / dec!(2))
}

/// Fixed-point rendering with exactly `dp` fractional digits, ties to even.
pub fn format_decimal(value: Decimal, dp: u32) -> String {
    format!("{:.*}", dp as usize, round_half_even(value, dp))
}

#[inline]
fn round_half_even(value: Decimal, dp: u32) -> Decimal {
    value.round_dp_with_strategy(dp, RoundingStrategy::MidpointNearestEven)
}
