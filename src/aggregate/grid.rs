use crate::error::{LadderError, Result};
use crate::types::Side;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

/// Evenly spaced bucket edges `origin + i * step` for `i = 0..=buckets`.
///
/// The grid is padded by one full step below the lowest price and above the highest one, so
/// every price handed to [`BucketGrid::locate`] falls strictly inside it. All arithmetic is
/// checked: a step too fine for the prices involved yields [`LadderError::StepOverflow`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BucketGrid {
    origin: Decimal,
    step: Decimal,
    buckets: u64,
}

impl BucketGrid {
    /// `step` must be positive; the caller validates it.
    pub fn covering(min_price: Decimal, max_price: Decimal, step: Decimal) -> Result<Self> {
        let overflow = || LadderError::StepOverflow(step);

        let origin = min_price
            .checked_div(step)
            .and_then(|q| q.checked_sub(Decimal::ONE))
            .and_then(|q| q.floor().checked_mul(step))
            .ok_or_else(overflow)?;
        let end = max_price
            .checked_div(step)
            .and_then(|q| q.checked_add(Decimal::ONE))
            .and_then(|q| q.ceil().checked_mul(step))
            .ok_or_else(overflow)?;
        let buckets = end
            .checked_sub(origin)
            .and_then(|span| span.checked_div(step))
            .and_then(|n| n.round().to_u64())
            .ok_or_else(overflow)?;

        Ok(Self {
            origin,
            step,
            buckets,
        })
    }

    #[inline]
    pub fn origin(&self) -> Decimal {
        self.origin
    }

    #[inline]
    pub fn buckets(&self) -> u64 {
        self.buckets
    }

    /// `None` when the edge is not representable.
    #[inline]
    pub fn edge(&self, index: u64) -> Option<Decimal> {
        self.step
            .checked_mul(Decimal::from(index))
            .and_then(|offset| self.origin.checked_add(offset))
    }

    #[inline]
    fn checked_edge(&self, index: u64) -> Result<Decimal> {
        self.edge(index).ok_or(LadderError::StepOverflow(self.step))
    }

    /// Index of the bucket responsible for `price` on `side`.
    ///
    /// The division gives an estimate; the exact edge comparisons afterwards make the
    /// half-open rule hold even where the quotient had to be rounded.
    pub fn locate(&self, price: Decimal, side: Side) -> Result<u64> {
        let offset = price
            .checked_sub(self.origin)
            .and_then(|distance| distance.checked_div(self.step))
            .ok_or(LadderError::StepOverflow(self.step))?;
        let estimate = if side.closed_on_left() {
            offset.floor()
        } else {
            offset.ceil() - Decimal::ONE
        };
        let mut index = estimate
            .max(Decimal::ZERO)
            .to_u64()
            .ok_or(LadderError::StepOverflow(self.step))?;

        if side.closed_on_left() {
            while index > 0 && price < self.checked_edge(index)? {
                index -= 1;
            }
            while price >= self.checked_edge(index + 1)? {
                index += 1;
            }
        } else {
            while index > 0 && price <= self.checked_edge(index)? {
                index -= 1;
            }
            while price > self.checked_edge(index + 1)? {
                index += 1;
            }
        }

        Ok(index)
    }

    /// Bids are labelled by their left edge, asks by their right edge.
    #[inline]
    pub fn label(&self, index: u64, side: Side) -> Result<Decimal> {
        match side {
            Side::Bid => self.checked_edge(index),
            Side::Ask => index
                .checked_add(1)
                .ok_or(LadderError::StepOverflow(self.step))
                .and_then(|right| self.checked_edge(right)),
        }
    }
}
