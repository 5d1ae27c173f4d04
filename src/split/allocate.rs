//! Equal split allocation

use std::collections::HashSet;
use std::hash::Hash;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::models::money::{Money, ROUNDING};

/// Divide `total` evenly among `participants`
///
/// Every participant but the last gets `total / n` rounded half away from
/// zero; the last gets whatever is left, so the shares sum to `total`
/// exactly. When the rounded share would overdraw the total for the first
/// `n - 1` participants (tiny totals such as 0.05 among 7), the share is
/// truncated toward zero instead so the remainder keeps the total's sign.
///
/// Duplicate participants collapse to their first occurrence.
///
/// # Examples
/// ```
/// use household_cli::models::Money;
/// use household_cli::split::allocate_equal;
///
/// let shares = allocate_equal(Money::from_cents(10000), &["a", "b", "c"]);
/// assert_eq!(
///     shares,
///     vec![
///         ("a", Money::from_cents(3333)),
///         ("b", Money::from_cents(3333)),
///         ("c", Money::from_cents(3334)),
///     ]
/// );
/// ```
pub fn allocate_equal<P>(total: Money, participants: &[P]) -> Vec<(P, Money)>
where
    P: Clone + Eq + Hash,
{
    let mut seen = HashSet::with_capacity(participants.len());
    let unique: Vec<&P> = participants.iter().filter(|p| seen.insert(*p)).collect();

    let Some((last, rest)) = unique.split_last() else {
        return Vec::new();
    };

    let count = unique.len() as i64;
    let share = provisional_share(total, count);
    let remainder = total - share * (count - 1);

    tracing::debug!(
        total = %total,
        participants = count,
        share = %share,
        remainder = %remainder,
        "Allocated equal split"
    );

    rest.iter()
        .map(|p| ((*p).clone(), share))
        .chain(std::iter::once(((*last).clone(), remainder)))
        .collect()
}

/// Per-participant share before the remainder is assigned
fn provisional_share(total: Money, count: i64) -> Money {
    let rounded = (Decimal::from(total.cents()) / Decimal::from(count))
        .round_dp_with_strategy(0, ROUNDING)
        .to_i64()
        .map(Money::from_cents)
        .unwrap_or_else(|| Money::from_cents(total.cents() / count));

    if (rounded * (count - 1)).abs() > total.abs() {
        Money::from_cents(total.cents() / count)
    } else {
        rounded
    }
}
