#![allow(dead_code)]

use serde::{Deserialize, de::DeserializeOwned};
use stratus_ta::{Ohlcv, Price, Series, Timestamp};

/// Daily OHLCV bar parsed from the reference CSV.
#[derive(Debug, Clone, Deserialize)]
pub struct RefBar {
    pub timestamp: u64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Ohlcv for RefBar {
    fn open(&self) -> Price {
        self.open
    }

    fn high(&self) -> Price {
        self.high
    }

    fn low(&self) -> Price {
        self.low
    }

    fn close(&self) -> Price {
        self.close
    }

    fn volume(&self) -> f64 {
        self.volume
    }

    fn timestamp(&self) -> Timestamp {
        self.timestamp
    }
}

/// Reference value with timestamp. Only defined positions are listed.
#[derive(Debug, Deserialize)]
pub struct RefValue {
    pub timestamp: u64,
    pub expected: f64,
}

/// Reference MACD lines with timestamp.
#[derive(Debug, Deserialize)]
pub struct RefMacd {
    pub timestamp: u64,
    pub macd: f64,
    pub signal: f64,
    pub histogram: f64,
}

/// Reference Ichimoku lines, one row per bar. Empty fields are undefined.
#[derive(Debug, Deserialize)]
pub struct RefIchimoku {
    pub timestamp: u64,
    pub conversion: Option<f64>,
    pub base: Option<f64>,
    pub leading_a: Option<f64>,
    pub leading_b: Option<f64>,
    pub lagging: Option<f64>,
}

const OHLCV_PATH: &str = "tests/fixtures/data/ohlcv-daily.csv";

/// Load the reference daily bars.
pub fn load_reference_ohlcvs() -> Vec<RefBar> {
    load_records(OHLCV_PATH, "invalid OHLCV record")
}

/// Load single-value reference data (SMA, EMA, RSI).
pub fn load_ref_values(path: &str) -> Vec<RefValue> {
    load_records(path, "invalid reference record")
}

/// Load MACD reference data (macd, signal, histogram).
pub fn load_macd_ref(path: &str) -> Vec<RefMacd> {
    load_records(path, "invalid MACD reference record")
}

/// Load Ichimoku reference data.
pub fn load_ichimoku_ref(path: &str) -> Vec<RefIchimoku> {
    load_records(path, "invalid Ichimoku reference record")
}

/// Assert two f64 values are within tolerance.
pub fn assert_near(actual: f64, expected: f64, tolerance: f64, context: &str) {
    let diff = (actual - expected).abs();
    assert!(
        diff <= tolerance,
        "{context}: expected {expected:.10}, got {actual:.10}, diff {diff:.2e} > tolerance {tolerance:.2e}"
    );
}

/// Assert an optional value matches, including agreement on undefined.
pub fn assert_option_near(actual: Option<f64>, expected: Option<f64>, tolerance: f64, context: &str) {
    match (actual, expected) {
        (None, None) => {}
        (Some(a), Some(e)) => assert_near(a, e, tolerance, context),
        (a, e) => panic!("{context}: definedness mismatch, got {a:?}, expected {e:?}"),
    }
}

/// Assert `series` is defined exactly at the reference timestamps and
/// matches their values.
pub fn assert_series_matches(
    name: &str,
    bars: &[RefBar],
    series: &Series,
    reference: &[RefValue],
    tolerance: f64,
) {
    assert_eq!(series.len(), bars.len(), "{name}: length mismatch");

    let mut ref_idx = 0;
    for (bar, value) in bars.iter().zip(series.iter()) {
        if ref_idx < reference.len() && bar.timestamp == reference[ref_idx].timestamp {
            let value = value.unwrap_or_else(|| panic!("{name} undefined at t={}", bar.timestamp));
            assert_near(
                value,
                reference[ref_idx].expected,
                tolerance,
                &format!("{name} at bar {ref_idx} (t={})", bar.timestamp),
            );
            ref_idx += 1;
        } else {
            assert!(
                value.is_none(),
                "{name} defined at t={} but reference has no value",
                bar.timestamp
            );
        }
    }

    assert_eq!(
        ref_idx,
        reference.len(),
        "not all reference values checked: {ref_idx}/{}",
        reference.len()
    );
}

/// Generate a reference match test for a single-series indicator.
///
/// Usage: `reference_test!(sma_20, Sma, SmaConfig::close(nz(20)), "tests/fixtures/data/sma-20-close.csv", 1e-9);`
#[allow(unused_macros)]
macro_rules! reference_test {
    ($name:ident, $ind:ty, $config:expr, $ref_path:expr, $tolerance:expr) => {
        mod $name {
            use super::fixtures::*;
            use std::num::NonZero;
            use stratus_ta::*;

            fn nz(n: usize) -> NonZero<usize> {
                NonZero::new(n).unwrap()
            }

            #[test]
            fn matches_reference() {
                let bars = load_reference_ohlcvs();
                let reference = load_ref_values($ref_path);
                let series = <$ind>::new($config).compute(&bars).unwrap();

                assert_series_matches(
                    stringify!($name),
                    &bars,
                    &series,
                    &reference,
                    $tolerance,
                );
            }
        }
    };
}

#[allow(unused_imports)]
pub(crate) use reference_test;

fn load_records<D>(path: &str, expect_msg: &str) -> Vec<D>
where
    D: DeserializeOwned,
{
    let mut rdr =
        csv::Reader::from_path(path).unwrap_or_else(|e| panic!("failed to open {path}: {e}"));

    rdr.deserialize().map(|r| r.expect(expect_msg)).collect()
}
