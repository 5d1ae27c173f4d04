//! Custom split reconciliation

use crate::models::Money;

/// Adjust user-entered shares so they sum to `total`
///
/// The difference between `total` and the sum of `entries` is added to the
/// last entry. Entries that already sum to `total` come back unchanged.
///
/// # Examples
/// ```
/// use household_cli::models::Money;
/// use household_cli::split::reconcile;
///
/// let shares = reconcile(
///     Money::from_cents(10000),
///     &[("a", Money::from_cents(4000)), ("b", Money::from_cents(4000))],
/// );
/// assert_eq!(shares[1], ("b", Money::from_cents(6000)));
/// ```
pub fn reconcile<P: Clone>(total: Money, entries: &[(P, Money)]) -> Vec<(P, Money)> {
    let mut shares = entries.to_vec();
    if let Some(((_, last), others)) = shares.split_last_mut() {
        reconcile_last(total, others, last);
    }
    shares
}

fn reconcile_last<P>(total: Money, others: &[(P, Money)], last: &mut Money) {
    // Widened so arbitrary entries can't overflow; the last share only
    // saturates when no `i64` value could make the split sum to `total`.
    let others_sum: i128 = others.iter().map(|(_, m)| i128::from(m.cents())).sum();
    let wanted = i128::from(total.cents()) - others_sum;
    let adjusted = i64::try_from(wanted)
        .map(Money::from_cents)
        .unwrap_or(if wanted < 0 {
            Money::from_cents(i64::MIN)
        } else {
            Money::from_cents(i64::MAX)
        });

    if adjusted != *last {
        tracing::debug!(
            total = %total,
            entered = %*last,
            adjusted = %adjusted,
            "Reconciled custom split onto last entry"
        );
        *last = adjusted;
    }
}

/// Parse free-text amounts leniently, then [`reconcile`] them
///
/// Unparseable amounts count as zero.
pub fn reconcile_input<P, S>(total: Money, entries: &[(P, S)]) -> Vec<(P, Money)>
where
    P: Clone,
    S: AsRef<str>,
{
    let parsed: Vec<(P, Money)> = entries
        .iter()
        .map(|(p, raw)| (p.clone(), Money::parse_lenient(raw.as_ref())))
        .collect();
    reconcile(total, &parsed)
}
