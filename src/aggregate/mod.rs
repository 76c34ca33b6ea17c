pub mod grid;

use crate::error::{LadderError, Result};
use crate::types::{AggregatedLevel, PriceLevel, Side};
use grid::BucketGrid;
use rust_decimal::Decimal;
use std::collections::BTreeMap;

/// Groups raw levels into buckets `step` wide and sums the quantity in each.
///
/// Bid levels land in `[edge, edge + step)` and are labelled by the left edge; ask levels land
/// in `(edge - step, edge]` and are labelled by the right edge. Buckets whose total is not
/// positive are dropped. The result carries no ordering guarantee; callers sort per side
/// before truncating.
///
/// A step so fine that the bucket edges around these prices cannot be represented yields
/// [`LadderError::StepOverflow`].
pub fn aggregate(
    levels: &[PriceLevel],
    step: Decimal,
    side: Side,
) -> Result<Vec<AggregatedLevel>> {
    let (min_price, max_price) = price_range(levels).ok_or(LadderError::EmptyInput { side })?;

    if step <= Decimal::ZERO {
        return Err(LadderError::InvalidStep(step));
    }

    let grid = BucketGrid::covering(min_price, max_price, step)?;
    let mut totals: BTreeMap<u64, Decimal> = BTreeMap::new();

    for level in levels {
        *totals.entry(grid.locate(level.price, side)?).or_default() += level.quantity;
    }

    totals
        .into_iter()
        .filter(|(_, quantity)| *quantity > Decimal::ZERO)
        .map(|(index, quantity)| {
            Ok(AggregatedLevel {
                price: grid.label(index, side)?,
                quantity,
            })
        })
        .collect()
}

/// Orders buckets best-first: bids high to low, asks low to high.
pub fn sort_best_first(levels: &mut [AggregatedLevel], side: Side) {
    match side {
        Side::Bid => levels.sort_by(|a, b| b.price.cmp(&a.price)),
        Side::Ask => levels.sort_by(|a, b| a.price.cmp(&b.price)),
    }
}

#[inline]
fn price_range(levels: &[PriceLevel]) -> Option<(Decimal, Decimal)> {
    let min = levels.iter().map(|l| l.price).min()?;
    let max = levels.iter().map(|l| l.price).max()?;
    Some((min, max))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use rust_decimal_macros::dec;

    fn levels(raw: &[(Decimal, Decimal)]) -> Vec<PriceLevel> {
        raw.iter().map(|&(p, q)| PriceLevel::new(p, q)).collect()
    }

    fn sorted(mut out: Vec<AggregatedLevel>) -> Vec<(Decimal, Decimal)> {
        out.sort_by(|a, b| a.price.cmp(&b.price));
        out.into_iter().map(|l| (l.price, l.quantity)).collect()
    }

    #[test]
    fn test_empty_input() {
        let result = aggregate(&[], dec!(1), Side::Bid);
        assert!(matches!(
            result,
            Err(LadderError::EmptyInput { side: Side::Bid })
        ));
    }

    #[test]
    fn test_invalid_step() {
        let book = levels(&[(dec!(100), dec!(1))]);
        assert!(matches!(
            aggregate(&book, dec!(0), Side::Ask),
            Err(LadderError::InvalidStep(_))
        ));
        assert!(matches!(
            aggregate(&book, dec!(-0.5), Side::Bid),
            Err(LadderError::InvalidStep(_))
        ));
    }

    #[test]
    fn test_bid_sample() {
        let book = levels(&[
            (dec!(100.0), dec!(1)),
            (dec!(100.5), dec!(2)),
            (dec!(101.0), dec!(3)),
        ]);
        let out = aggregate(&book, dec!(1), Side::Bid).unwrap();

        assert_eq!(
            sorted(out),
            vec![(dec!(100), dec!(3)), (dec!(101), dec!(3))]
        );
    }

    #[test]
    fn test_ask_sample() {
        let book = levels(&[
            (dec!(100.0), dec!(1)),
            (dec!(100.5), dec!(2)),
            (dec!(101.0), dec!(3)),
        ]);
        let out = aggregate(&book, dec!(1), Side::Ask).unwrap();

        assert_eq!(
            sorted(out),
            vec![(dec!(100), dec!(1)), (dec!(101), dec!(5))]
        );
    }

    #[test]
    fn test_boundary_convention() {
        let book = levels(&[(dec!(100), dec!(4))]);
        let out = aggregate(&book, dec!(1), Side::Bid).unwrap();
        assert_eq!(sorted(out), vec![(dec!(100), dec!(4))]);

        let book = levels(&[(dec!(101), dec!(4))]);
        let out = aggregate(&book, dec!(1), Side::Ask).unwrap();
        assert_eq!(sorted(out), vec![(dec!(101), dec!(4))]);
    }

    #[test]
    fn test_duplicate_prices_are_summed() {
        let book = levels(&[
            (dec!(2500.10), dec!(1.5)),
            (dec!(2500.10), dec!(2.25)),
            (dec!(2500.15), dec!(0.25)),
        ]);
        let out = aggregate(&book, dec!(0.1), Side::Bid).unwrap();
        assert_eq!(sorted(out), vec![(dec!(2500.1), dec!(4.0))]);
    }

    #[test]
    fn test_tenth_step_has_no_drift() {
        let book = levels(&[
            (dec!(0.1), dec!(1)),
            (dec!(0.2), dec!(1)),
            (dec!(0.3), dec!(1)),
            (dec!(0.7), dec!(1)),
        ]);

        let bids = aggregate(&book, dec!(0.1), Side::Bid).unwrap();
        assert_eq!(
            sorted(bids),
            vec![
                (dec!(0.1), dec!(1)),
                (dec!(0.2), dec!(1)),
                (dec!(0.3), dec!(1)),
                (dec!(0.7), dec!(1)),
            ]
        );

        let asks = aggregate(&book, dec!(0.2), Side::Ask).unwrap();
        assert_eq!(
            sorted(asks),
            vec![
                (dec!(0.2), dec!(2)),
                (dec!(0.4), dec!(1)),
                (dec!(0.8), dec!(1)),
            ]
        );
    }

    #[test]
    fn test_zero_quantity_buckets_dropped() {
        let book = levels(&[(dec!(10), dec!(0)), (dec!(20), dec!(3))]);
        let out = aggregate(&book, dec!(5), Side::Bid).unwrap();
        assert_eq!(sorted(out), vec![(dec!(20), dec!(3))]);
    }

    #[test]
    fn test_tiny_step_is_accepted() {
        let book = levels(&[(dec!(1), dec!(1)), (dec!(60000), dec!(2))]);
        let out = aggregate(&book, dec!(0.00000001), Side::Ask).unwrap();
        assert_eq!(
            sorted(out),
            vec![(dec!(1), dec!(1)), (dec!(60000), dec!(2))]
        );
    }

    #[test]
    fn test_too_fine_step_is_an_error() {
        let book = levels(&[(dec!(60000), dec!(1)), (dec!(60001), dec!(2))]);
        let step = dec!(0.0000000000000000000000001);

        for side in [Side::Bid, Side::Ask] {
            let result = aggregate(&book, step, side);
            assert!(matches!(result, Err(LadderError::StepOverflow(s)) if s == step));
        }

        // The same step is fine where the edges stay representable.
        let book = levels(&[(dec!(0.5), dec!(1))]);
        let out = aggregate(&book, step, Side::Bid).unwrap();
        assert_eq!(sorted(out), vec![(dec!(0.5), dec!(1))]);
    }

    #[test]
    fn test_sort_best_first() {
        let mut out = vec![
            AggregatedLevel {
                price: dec!(100),
                quantity: dec!(1),
            },
            AggregatedLevel {
                price: dec!(102),
                quantity: dec!(1),
            },
            AggregatedLevel {
                price: dec!(101),
                quantity: dec!(1),
            },
        ];

        sort_best_first(&mut out, Side::Bid);
        assert_eq!(out[0].price, dec!(102));
        assert_eq!(out[2].price, dec!(100));

        sort_best_first(&mut out, Side::Ask);
        assert_eq!(out[0].price, dec!(100));
        assert_eq!(out[2].price, dec!(102));
    }

    #[test]
    fn test_random_books_conserve_and_cover() {
        let mut rng = StdRng::seed_from_u64(7);
        let steps = [
            dec!(0.01),
            dec!(0.1),
            dec!(0.2),
            dec!(0.3),
            dec!(1),
            dec!(5),
            dec!(250),
        ];

        for round in 0..200 {
            let side = if round % 2 == 0 { Side::Bid } else { Side::Ask };
            let step = steps[round % steps.len()];
            let book: Vec<PriceLevel> = (0..rng.gen_range(1..60))
                .map(|_| {
                    PriceLevel::new(
                        Decimal::new(rng.gen_range(90_000..110_000), 2),
                        Decimal::new(rng.gen_range(1..10_000), 3),
                    )
                })
                .collect();

            let out = aggregate(&book, step, side).unwrap();

            let input_total: Decimal = book.iter().map(|l| l.quantity).sum();
            let output_total: Decimal = out.iter().map(|l| l.quantity).sum();
            assert_eq!(input_total, output_total, "step {step} side {side}");

            let mut labels: Vec<Decimal> = out.iter().map(|l| l.price).collect();
            labels.sort();
            labels.dedup();
            assert_eq!(labels.len(), out.len());

            for bucket in &out {
                assert_eq!(bucket.price % step, Decimal::ZERO);
            }

            for level in &book {
                let owners = out
                    .iter()
                    .filter(|b| match side {
                        Side::Bid => b.price <= level.price && level.price < b.price + step,
                        Side::Ask => b.price - step < level.price && level.price <= b.price,
                    })
                    .count();
                assert_eq!(owners, 1, "price {} step {step} side {side}", level.price);
            }
        }
    }
}
