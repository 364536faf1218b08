//! Index-aligned value series and the windowing primitives every indicator
//! is built from.

use std::{num::NonZero, ops::Deref};

use crate::{
    Price,
    window::{Extremum, ExtremumWindow, MeanWindow, Smoother},
};

/// An ordered sequence of optional values aligned 1:1 with a source
/// sequence.
///
/// `None` marks a position where the value is undefined (warm-up, shifted
/// out of range, or a non-finite input). Undefined positions are never
/// treated as zero by any computation in this crate: they propagate.
///
/// Dereferences to `[Option<Price>]`, so it can be indexed, iterated and
/// zipped positionally with the bars it was computed from.
///
/// # Example
///
/// ```
/// use stratus_ta::Series;
///
/// let series = Series::from_prices(&[1.0, f64::NAN, 3.0]);
///
/// assert_eq!(series.len(), 3);
/// assert_eq!(series[0], Some(1.0));
/// assert_eq!(series[1], None);
/// assert_eq!(series.defined_count(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct Series(Vec<Option<Price>>);

impl Series {
    /// A series of `len` undefined positions.
    #[must_use]
    pub fn undefined(len: usize) -> Self {
        Self(vec![None; len])
    }

    /// Wraps raw prices, mapping non-finite values (NaN, ±inf) to `None`.
    #[must_use]
    pub fn from_prices(prices: &[Price]) -> Self {
        prices.iter().copied().map(finite).collect()
    }

    /// Number of defined positions.
    #[must_use]
    pub fn defined_count(&self) -> usize {
        self.0.iter().flatten().count()
    }

    /// Position of the first defined value.
    #[must_use]
    pub fn first_defined(&self) -> Option<usize> {
        self.0.iter().position(Option::is_some)
    }

    /// Position and value of the last defined value.
    #[must_use]
    pub fn last_defined(&self) -> Option<(usize, Price)> {
        self.0
            .iter()
            .enumerate()
            .rev()
            .find_map(|(i, value)| value.map(|v| (i, v)))
    }

    /// Applies `f` to every defined position.
    #[must_use]
    pub fn map(&self, f: impl Fn(Price) -> Price) -> Self {
        self.0.iter().map(|value| value.map(&f)).collect()
    }

    /// Combines two aligned series position by position. A position is
    /// defined only when it is defined in both inputs.
    ///
    /// # Panics
    ///
    /// Panics if the two series differ in length.
    #[must_use]
    pub fn zip_with(&self, other: &[Option<Price>], f: impl Fn(Price, Price) -> Price) -> Self {
        assert_eq!(
            self.len(),
            other.len(),
            "zipped series must be index-aligned"
        );

        self.0
            .iter()
            .zip(other)
            .map(|(a, b)| a.zip(*b).map(|(a, b)| f(a, b)))
            .collect()
    }

    /// Flattens into plain floats with NaN as the undefined sentinel, the
    /// shape most plotting layers expect.
    #[must_use]
    pub fn to_nan_vec(&self) -> Vec<f64> {
        self.0.iter().map(|value| value.unwrap_or(f64::NAN)).collect()
    }

    #[must_use]
    pub fn into_inner(self) -> Vec<Option<Price>> {
        self.0
    }
}

impl Deref for Series {
    type Target = [Option<Price>];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<Vec<Option<Price>>> for Series {
    fn from(values: Vec<Option<Price>>) -> Self {
        Self(values)
    }
}

impl FromIterator<Option<Price>> for Series {
    fn from_iter<I: IntoIterator<Item = Option<Price>>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for Series {
    type Item = Option<Price>;
    type IntoIter = std::vec::IntoIter<Option<Price>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Series {
    type Item = &'a Option<Price>;
    type IntoIter = std::slice::Iter<'a, Option<Price>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[inline]
pub(crate) fn finite(price: Price) -> Option<Price> {
    price.is_finite().then_some(price)
}

/// Arithmetic mean of `values[i - length + 1 ..= i]` at each `i`.
///
/// Undefined for the first `length - 1` positions and wherever the window
/// contains an undefined position.
///
/// ```
/// use stratus_ta::{Series, rolling_mean};
/// use std::num::NonZero;
///
/// let means = rolling_mean(
///     &Series::from_prices(&[1.0, 2.0, 3.0, 4.0, 5.0]),
///     NonZero::new(3).unwrap(),
/// );
/// assert_eq!(means.into_inner(), vec![None, None, Some(2.0), Some(3.0), Some(4.0)]);
/// ```
#[must_use]
pub fn rolling_mean(values: &[Option<Price>], length: NonZero<usize>) -> Series {
    let mut window = MeanWindow::new(length);
    values.iter().map(|&value| window.push(value)).collect()
}

/// Maximum over the trailing `length` positions, same windowing rule as
/// [`rolling_mean`].
#[must_use]
pub fn rolling_max(values: &[Option<Price>], length: NonZero<usize>) -> Series {
    rolling_extremum(values, Extremum::Max, length)
}

/// Minimum over the trailing `length` positions, same windowing rule as
/// [`rolling_mean`].
#[must_use]
pub fn rolling_min(values: &[Option<Price>], length: NonZero<usize>) -> Series {
    rolling_extremum(values, Extremum::Min, length)
}

fn rolling_extremum(values: &[Option<Price>], kind: Extremum, length: NonZero<usize>) -> Series {
    let mut window = ExtremumWindow::new(kind, length);
    values.iter().map(|&value| window.push(value)).collect()
}

/// Recursive exponential smoothing with `α = 2 / (span + 1)`:
///
/// ```text
/// out[0] = values[0]
/// out[i] = α × values[i] + (1 − α) × out[i − 1]
/// ```
///
/// There is no warm-up gap: on a fully defined input every position is
/// defined, starting at index 0. Positions before the first defined input
/// stay undefined; a later undefined input yields an undefined output and
/// is skipped by the recursion.
#[must_use]
pub fn exponential_mean(values: &[Option<Price>], span: NonZero<usize>) -> Series {
    let mut smoother = Smoother::new(span);
    values.iter().map(|&value| smoother.push(value)).collect()
}

/// Moves every value `k` positions later: `out[i + k] = values[i]`.
///
/// The first `k` positions are undefined; values pushed past the end are
/// dropped.
#[must_use]
pub fn shift_forward(values: &[Option<Price>], k: usize) -> Series {
    (0..values.len())
        .map(|i| i.checked_sub(k).and_then(|source| values[source]))
        .collect()
}

/// Moves every value `k` positions earlier: `out[i - k] = values[i]`.
///
/// The last `k` positions are undefined.
#[must_use]
pub fn shift_backward(values: &[Option<Price>], k: usize) -> Series {
    (0..values.len())
        .map(|i| {
            i.checked_add(k)
                .and_then(|source| values.get(source).copied().flatten())
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::test_util::{assert_approx, nz};

    fn series(prices: &[f64]) -> Series {
        Series::from_prices(prices)
    }

    mod series_type {
        use super::*;

        #[test]
        fn non_finite_becomes_undefined() {
            let s = series(&[1.0, f64::NAN, f64::INFINITY, f64::NEG_INFINITY, 5.0]);
            assert_eq!(s.into_inner(), vec![Some(1.0), None, None, None, Some(5.0)]);
        }

        #[test]
        fn first_and_last_defined() {
            let s = Series::from(vec![None, Some(2.0), Some(3.0), None]);
            assert_eq!(s.first_defined(), Some(1));
            assert_eq!(s.last_defined(), Some((2, 3.0)));
        }

        #[test]
        fn all_undefined_has_no_bounds() {
            let s = Series::undefined(4);
            assert_eq!(s.len(), 4);
            assert_eq!(s.first_defined(), None);
            assert_eq!(s.last_defined(), None);
            assert_eq!(s.defined_count(), 0);
        }

        #[test]
        fn zip_with_propagates_undefined() {
            let a = Series::from(vec![Some(1.0), None, Some(3.0)]);
            let b = Series::from(vec![Some(10.0), Some(20.0), None]);
            assert_eq!(
                a.zip_with(&b, |x, y| x + y).into_inner(),
                vec![Some(11.0), None, None]
            );
        }

        #[test]
        #[should_panic(expected = "zipped series must be index-aligned")]
        fn zip_with_rejects_misaligned() {
            let a = Series::undefined(2);
            let _ = a.zip_with(&Series::undefined(3), |x, _| x);
        }

        #[test]
        fn map_skips_undefined() {
            let s = Series::from(vec![Some(2.0), None]);
            assert_eq!(s.map(|x| x * 2.0).into_inner(), vec![Some(4.0), None]);
        }

        #[test]
        fn nan_vec_uses_nan_sentinel() {
            let v = Series::from(vec![Some(1.0), None]).to_nan_vec();
            assert_eq!(v[0], 1.0);
            assert!(v[1].is_nan());
        }
    }

    mod rolling {
        use super::*;

        #[test]
        fn mean_matches_window_average() {
            let means = rolling_mean(&series(&[1.0, 2.0, 3.0, 4.0, 5.0]), nz(3));
            assert_eq!(
                means.into_inner(),
                vec![None, None, Some(2.0), Some(3.0), Some(4.0)]
            );
        }

        #[test]
        fn mean_window_longer_than_input_is_all_undefined() {
            let means = rolling_mean(&series(&[1.0, 2.0]), nz(3));
            assert_eq!(means, Series::undefined(2));
        }

        #[test]
        fn mean_of_fractional_values() {
            let means = rolling_mean(&series(&[0.1, 0.2, 0.3, 0.4]), nz(2));
            assert_approx!(means[1].unwrap(), 0.15);
            assert_approx!(means[2].unwrap(), 0.25);
            assert_approx!(means[3].unwrap(), 0.35);
        }

        #[test]
        fn undefined_poisons_every_window_containing_it() {
            let s = Series::from(vec![Some(1.0), Some(2.0), None, Some(4.0), Some(5.0), Some(6.0)]);
            let means = rolling_mean(&s, nz(2));
            assert_eq!(
                means.into_inner(),
                vec![None, Some(1.5), None, None, Some(4.5), Some(5.5)]
            );
        }

        #[test]
        fn max_and_min() {
            let s = series(&[3.0, 1.0, 4.0, 1.0, 5.0, 9.0, 2.0]);
            assert_eq!(
                rolling_max(&s, nz(3)).into_inner(),
                vec![None, None, Some(4.0), Some(4.0), Some(5.0), Some(9.0), Some(9.0)]
            );
            assert_eq!(
                rolling_min(&s, nz(3)).into_inner(),
                vec![None, None, Some(1.0), Some(1.0), Some(1.0), Some(1.0), Some(2.0)]
            );
        }

        #[test]
        fn extremum_undefined_window() {
            let s = Series::from(vec![Some(1.0), None, Some(3.0), Some(2.0)]);
            assert_eq!(
                rolling_max(&s, nz(2)).into_inner(),
                vec![None, None, None, Some(3.0)]
            );
        }

        #[test]
        fn lengths_are_preserved() {
            let s = series(&[1.0; 17]);
            assert_eq!(rolling_mean(&s, nz(5)).len(), 17);
            assert_eq!(rolling_max(&s, nz(20)).len(), 17);
            assert_eq!(rolling_min(&s, nz(1)).len(), 17);
        }
    }

    mod exponential {
        use super::*;

        #[test]
        fn first_value_is_input() {
            let e = exponential_mean(&series(&[7.0, 8.0, 9.0]), nz(10));
            assert_eq!(e[0], Some(7.0));
        }

        #[test]
        fn fully_defined_from_index_zero() {
            let e = exponential_mean(&series(&[5.0, 1.0, 8.0, 2.0, 6.0]), nz(26));
            assert_eq!(e.defined_count(), 5);
        }

        #[test]
        fn recursion_with_alpha_half() {
            // span 3: α = 0.5
            let e = exponential_mean(&series(&[2.0, 4.0, 8.0, 0.0]), nz(3));
            assert_eq!(
                e.into_inner(),
                vec![Some(2.0), Some(3.0), Some(5.5), Some(2.75)]
            );
        }

        #[test]
        fn leading_undefined_delays_seed() {
            let s = Series::from(vec![None, Some(4.0), Some(8.0)]);
            let e = exponential_mean(&s, nz(3));
            assert_eq!(e.into_inner(), vec![None, Some(4.0), Some(6.0)]);
        }

        #[test]
        fn empty_input() {
            assert!(exponential_mean(&[], nz(3)).is_empty());
        }
    }

    mod shift {
        use super::*;

        #[test]
        fn forward_leaves_leading_gap() {
            let s = series(&[1.0, 2.0, 3.0, 4.0]);
            assert_eq!(
                shift_forward(&s, 2).into_inner(),
                vec![None, None, Some(1.0), Some(2.0)]
            );
        }

        #[test]
        fn backward_leaves_trailing_gap() {
            let s = series(&[1.0, 2.0, 3.0, 4.0]);
            assert_eq!(
                shift_backward(&s, 1).into_inner(),
                vec![Some(2.0), Some(3.0), Some(4.0), None]
            );
        }

        #[test]
        fn zero_shift_is_identity() {
            let s = series(&[1.0, 2.0]);
            assert_eq!(shift_forward(&s, 0), s);
            assert_eq!(shift_backward(&s, 0), s);
        }

        #[test]
        fn shift_past_length_is_all_undefined() {
            let s = series(&[1.0, 2.0, 3.0]);
            assert_eq!(shift_forward(&s, 5), Series::undefined(3));
            assert_eq!(shift_backward(&s, usize::MAX), Series::undefined(3));
        }

        #[test]
        fn round_trip_restores_interior() {
            let s = series(&[3.0, 1.0, 4.0, 1.0, 5.0, 9.0, 2.0, 6.0]);
            let k = 3;
            let restored = shift_backward(&shift_forward(&s, k), k);
            for i in 0..s.len() {
                if i + k < s.len() {
                    assert_eq!(restored[i], s[i], "position {i}");
                } else {
                    assert_eq!(restored[i], None, "position {i}");
                }
            }
        }
    }
}
