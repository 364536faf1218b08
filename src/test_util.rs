// src/test_util.rs

use crate::{Bar, Price, Timestamp};
use std::num::NonZero;

/// Asserts that two `f64` values are approximately equal using a
/// relative epsilon of `4 * f64::EPSILON`.
macro_rules! assert_approx {
    ($actual:expr, $expected:expr) => {{
        let (a, e) = ($actual, $expected);
        assert!(
            (a - e).abs() < e.abs() * 4.0 * f64::EPSILON,
            "assert_approx failed: actual={a}, expected={e}, diff={}",
            (a - e).abs(),
        );
    }};
}

pub(crate) use assert_approx;

/// Asserts two `f64` values are within an absolute tolerance.
pub fn assert_near(actual: f64, expected: f64, tolerance: f64) {
    let diff = (actual - expected).abs();
    assert!(
        diff <= tolerance,
        "expected {expected:.12}, got {actual:.12}, diff {diff:.2e} > tolerance {tolerance:.2e}"
    );
}

pub fn nz(n: usize) -> NonZero<usize> {
    NonZero::new(n).expect("non zero value")
}

pub fn ohlc(open: f64, high: f64, low: f64, close: f64, timestamp: Timestamp) -> Bar {
    Bar::new(timestamp, open, high, low, close, 0.0)
}

/// Convenience: bar with just a close price and timestamp (OHLC all equal to close).
pub fn bar(close: Price, timestamp: Timestamp) -> Bar {
    ohlc(close, close, close, close, timestamp)
}

/// One flat bar per close, timestamps 1, 2, 3, ...
pub fn bars_from_closes(closes: &[Price]) -> Vec<Bar> {
    (1..)
        .zip(closes)
        .map(|(timestamp, &close)| bar(close, timestamp))
        .collect()
}
