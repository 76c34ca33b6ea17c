use crate::types::AggregatedLevel;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

/// Number of equal-width quantity bins a side's rows are sorted into.
pub const FILL_BINS: u32 = 25;

/// Background bar for one row: how much of the cell to fill and whether the row holds the
/// largest quantity on its side.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RowStyle {
    pub fill_percent: f64,
    pub is_max: bool,
}

/// Computes one [`RowStyle`] per row, in input order.
///
/// `[qmin, qmax]` is split into [`FILL_BINS`] equal bins, half-open on the upper end except for
/// the last one. A row in bin `i` fills `(i + 1) / FILL_BINS` of its cell. When every row has
/// the same quantity all of them fill completely.
pub fn scale(rows: &[AggregatedLevel]) -> Vec<RowStyle> {
    let (Some(qmin), Some(qmax)) = (
        rows.iter().map(|r| r.quantity).min(),
        rows.iter().map(|r| r.quantity).max(),
    ) else {
        return Vec::new();
    };

    let range = qmax - qmin;

    rows.iter()
        .map(|row| {
            let fill_percent = if range.is_zero() {
                100.0
            } else {
                let bin = bin_index(row.quantity - qmin, range);
                f64::from(bin + 1) * 100.0 / f64::from(FILL_BINS)
            };

            RowStyle {
                fill_percent,
                is_max: row.quantity == qmax,
            }
        })
        .collect()
}

/// `offset` is in `[0, range]`; `range` is positive.
///
/// Quantities near `Decimal::MAX` overflow `offset * FILL_BINS`, so those fall back to
/// scaling the ratio instead.
#[inline]
fn bin_index(offset: Decimal, range: Decimal) -> u32 {
    let bins = Decimal::from(FILL_BINS);
    let scaled = offset
        .checked_mul(bins)
        .and_then(|product| product.checked_div(range))
        .or_else(|| {
            offset
                .checked_div(range)
                .and_then(|ratio| ratio.checked_mul(bins))
        })
        .unwrap_or(bins);

    scaled
        .floor()
        .to_u32()
        .unwrap_or(0)
        .min(FILL_BINS - 1)
}
