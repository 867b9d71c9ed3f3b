use crate::AblError;

/// Floating point type used throughout the system
pub type Real = f64;

/// A value that may be missing. `NaN`/`Infinity` in source files also end up here.
pub type MaybeReal = Option<Real>;

/// Check that a series has exactly the expected length.
pub fn ensure_len(what: &'static str, actual: usize, expected: usize) -> Result<(), AblError> {
    if actual == expected {
        Ok(())
    } else {
        Err(AblError::LengthMismatch {
            what,
            expected,
            actual,
        })
    }
}

/// Sum of present values; missing entries count as zero.
pub fn sum_present(values: &[MaybeReal]) -> Real {
    values.iter().flatten().sum()
}

pub fn first_present(values: &[MaybeReal]) -> MaybeReal {
    values.iter().flatten().next().copied()
}

pub fn last_present(values: &[MaybeReal]) -> MaybeReal {
    values.iter().rev().flatten().next().copied()
}

/// Running sum of `a[i] + b[i]`, missing entries treated as zero.
///
/// Both inputs must have the same length.
pub fn prefix_sum_or_zero(a: &[MaybeReal], b: &[MaybeReal]) -> Result<Vec<Real>, AblError> {
    ensure_len("prefix sum operand", b.len(), a.len())?;
    let mut acc = 0.0;
    Ok(a.iter()
        .zip(b)
        .map(|(x, y)| {
            acc += x.unwrap_or(0.0) + y.unwrap_or(0.0);
            acc
        })
        .collect())
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn maybe_real() -> impl Strategy<Value = MaybeReal> {
        prop::option::of(0.0_f64..1000.0_f64)
    }

    proptest! {
        #[test]
        fn prefix_sum_is_monotone_and_ends_at_total(
            pairs in prop::collection::vec((maybe_real(), maybe_real()), 0..50)
        ) {
            let (a, b): (Vec<MaybeReal>, Vec<MaybeReal>) = pairs.into_iter().unzip();
            let sums = prefix_sum_or_zero(&a, &b).unwrap();
            prop_assert_eq!(sums.len(), a.len());
            for w in sums.windows(2) {
                prop_assert!(w[1] >= w[0]);
            }
            let total = sum_present(&a) + sum_present(&b);
            let last = sums.last().copied().unwrap_or(0.0);
            prop_assert!((last - total).abs() <= 1e-6 * total.max(1.0));
        }
    }
}
