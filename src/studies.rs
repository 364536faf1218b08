use std::{fmt::Display, num::NonZero};

use tracing::{debug, warn};

use crate::{
    Error, Ichimoku, IchimokuConfig, IchimokuSeries, Macd, MacdConfig, MacdSeries, Ohlcv,
    PriceSource, Result, Rsi, RsiConfig, Series, Sma, SmaConfig, Timestamp,
    ohlcv::ensure_ordered,
};

const SMA_FAST: NonZero<usize> = NonZero::new(20).unwrap();
const SMA_MEDIUM: NonZero<usize> = NonZero::new(50).unwrap();
const SMA_SLOW: NonZero<usize> = NonZero::new(200).unwrap();

/// Parameters of every study drawn on an analysis chart.
///
/// Defaults: SMA 20 / 50 / 200 on close, RSI 14, MACD 12 / 26 / 9 and the
/// standard 9 / 26 / 52 Ichimoku cloud.
///
/// ```
/// use stratus_ta::{RsiConfig, StudiesConfig};
/// use std::num::NonZero;
///
/// let config = StudiesConfig {
///     rsi: RsiConfig::close(NonZero::new(9).unwrap()),
///     ..StudiesConfig::default()
/// };
/// assert_eq!(config.sma_slow.length(), 200);
/// assert_eq!(config.rsi.length(), 9);
/// ```
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub struct StudiesConfig {
    pub sma_fast: SmaConfig,
    pub sma_medium: SmaConfig,
    pub sma_slow: SmaConfig,
    pub rsi: RsiConfig,
    pub macd: MacdConfig,
    pub ichimoku: IchimokuConfig,
}

impl Default for StudiesConfig {
    fn default() -> Self {
        Self {
            sma_fast: SmaConfig::close(SMA_FAST),
            sma_medium: SmaConfig::close(SMA_MEDIUM),
            sma_slow: SmaConfig::close(SMA_SLOW),
            rsi: RsiConfig::default(),
            macd: MacdConfig::default(),
            ichimoku: IchimokuConfig::default(),
        }
    }
}

impl Display for StudiesConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "StudiesConfig({}, {}, {}, {}, {}, {})",
            self.sma_fast, self.sma_medium, self.sma_slow, self.rsi, self.macd, self.ichimoku
        )
    }
}

/// Every overlay and pane of one analysis chart, aligned with the bars.
///
/// The moving averages, MACD and volume are always present; a long SMA on
/// a short chart is simply all `None`. RSI and Ichimoku need a minimum
/// history and are `None` as a whole when the bars fall short of it.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChartStudies {
    pub timestamps: Vec<Timestamp>,
    pub volume: Series,
    pub sma_fast: Series,
    pub sma_medium: Series,
    pub sma_slow: Series,
    pub rsi: Option<Series>,
    pub macd: MacdSeries,
    pub ichimoku: Option<IchimokuSeries>,
}

impl ChartStudies {
    /// Runs every configured study over `bars`.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidInput`] for out-of-order timestamps or a field with
    /// no finite value. Insufficient history never fails the whole chart.
    ///
    /// # Example
    ///
    /// ```
    /// use stratus_ta::{Bar, ChartStudies, StudiesConfig};
    ///
    /// let bars: Vec<Bar> = (1..=30)
    ///     .map(|t| {
    ///         let c = 50.0 + (t as f64 * 0.3).sin();
    ///         Bar::new(t, c, c + 1.0, c - 1.0, c, 1_000.0)
    ///     })
    ///     .collect();
    ///
    /// let studies = ChartStudies::compute(&bars, &StudiesConfig::default()).unwrap();
    ///
    /// assert_eq!(studies.len(), 30);
    /// assert!(studies.rsi.is_some());
    /// // 30 bars cannot fill the 52-bar leading span window
    /// assert!(studies.ichimoku.is_none());
    /// ```
    pub fn compute(bars: &[impl Ohlcv], config: &StudiesConfig) -> Result<Self> {
        ensure_ordered(bars)?;

        debug!(%config, bars = bars.len(), "computing chart studies");

        Ok(Self {
            timestamps: bars.iter().map(Ohlcv::timestamp).collect(),
            volume: PriceSource::Volume.series(bars)?,
            sma_fast: Sma::new(config.sma_fast).compute(bars)?,
            sma_medium: Sma::new(config.sma_medium).compute(bars)?,
            sma_slow: Sma::new(config.sma_slow).compute(bars)?,
            rsi: optional(Rsi::new(config.rsi).compute(bars))?,
            macd: Macd::new(config.macd).compute(bars)?,
            ichimoku: optional(Ichimoku::new(config.ichimoku).compute(bars))?,
        })
    }

    /// Number of bars the studies cover.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }
}

fn optional<T>(result: Result<T>) -> Result<Option<T>> {
    match result {
        Ok(output) => Ok(Some(output)),
        Err(Error::InsufficientData {
            indicator,
            required,
            actual,
        }) => {
            warn!(indicator, required, actual, "study skipped: insufficient data");
            Ok(None)
        }
        Err(err) => Err(err),
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::{
        Bar, InputFault,
        test_util::{bar, nz, ohlc},
    };

    fn wave(n: u32) -> Vec<Bar> {
        (0..n)
            .map(|i| {
                let c = 100.0 + (f64::from(i) * 0.17).sin() * 8.0 + f64::from(i) * 0.02;
                let mut b = ohlc(c - 0.5, c + 2.0, c - 2.0, c, u64::from(i) * 86_400);
                b.volume = 1_000.0 + f64::from(i);
                b
            })
            .collect()
    }

    fn studies(bars: &[Bar]) -> ChartStudies {
        ChartStudies::compute(bars, &StudiesConfig::default()).unwrap()
    }

    mod alignment {
        use super::*;

        #[test]
        fn every_series_matches_bar_count() {
            let out = studies(&wave(260));
            let ichimoku = out.ichimoku.as_ref().unwrap();
            for len in [
                out.timestamps.len(),
                out.volume.len(),
                out.sma_fast.len(),
                out.sma_medium.len(),
                out.sma_slow.len(),
                out.rsi.as_ref().unwrap().len(),
                out.macd.len(),
                ichimoku.len(),
            ] {
                assert_eq!(len, 260);
            }
        }

        #[test]
        fn timestamps_and_volume_are_copied() {
            let bars = wave(40);
            let out = studies(&bars);
            assert_eq!(out.timestamps[3], 3 * 86_400);
            assert_eq!(out.volume[39], Some(1_039.0));
        }
    }

    mod components {
        use super::*;
        use crate::{ichimoku, macd, rsi, sma};

        #[test]
        fn match_standalone_computations() {
            let bars = wave(260);
            let out = studies(&bars);

            let closes = PriceSource::Close.series(&bars).unwrap();
            let high = PriceSource::High.series(&bars).unwrap();
            let low = PriceSource::Low.series(&bars).unwrap();

            assert_eq!(out.sma_fast, sma(&closes, nz(20)));
            assert_eq!(out.sma_medium, sma(&closes, nz(50)));
            assert_eq!(out.sma_slow, sma(&closes, nz(200)));
            assert_eq!(out.rsi, Some(rsi(&closes, nz(14)).unwrap()));
            assert_eq!(out.macd, macd(&closes, nz(12), nz(26), nz(9)));
            assert_eq!(
                out.ichimoku,
                Some(ichimoku(&high, &low, &closes, &IchimokuConfig::default()))
            );
        }

        #[test]
        fn slow_average_is_empty_on_short_chart() {
            let out = studies(&wave(120));
            assert_eq!(out.sma_slow.defined_count(), 0);
            assert_eq!(out.sma_medium.first_defined(), Some(49));
        }
    }

    mod short_history {
        use super::*;

        #[test]
        fn ichimoku_skipped_below_span_b_window() {
            let out = studies(&wave(51));
            assert!(out.rsi.is_some());
            assert!(out.ichimoku.is_none());
        }

        #[test]
        fn rsi_skipped_at_period_length() {
            let out = studies(&wave(14));
            assert!(out.rsi.is_none());
            assert!(out.ichimoku.is_none());
            assert_eq!(out.macd.histogram().defined_count(), 14);
        }

        #[test]
        fn empty_chart() {
            let out = studies(&[]);
            assert!(out.is_empty());
            assert!(out.rsi.is_none());
            assert!(out.macd.is_empty());
        }
    }

    mod errors {
        use super::*;

        #[test]
        fn out_of_order_fails_whole_chart() {
            let bars = [bar(1.0, 10), bar(2.0, 20), bar(3.0, 15)];
            assert_eq!(
                ChartStudies::compute(&bars, &StudiesConfig::default()),
                Err(Error::InvalidInput {
                    field: "timestamp",
                    fault: InputFault::OutOfOrder { index: 2 },
                })
            );
        }

        #[test]
        fn missing_close_fails_whole_chart() {
            let mut bars = wave(60);
            for b in &mut bars {
                b.close = f64::NAN;
            }
            assert!(matches!(
                ChartStudies::compute(&bars, &StudiesConfig::default()),
                Err(Error::InvalidInput {
                    field: "close",
                    ..
                })
            ));
        }
    }

    mod config {
        use super::*;

        #[test]
        fn custom_rsi_period() {
            let config = StudiesConfig {
                rsi: RsiConfig::close(nz(5)),
                ..StudiesConfig::default()
            };
            let out = ChartStudies::compute(&wave(8), &config).unwrap();
            assert!(out.rsi.is_some());
        }

        #[test]
        fn display() {
            assert_eq!(
                StudiesConfig::default().to_string(),
                "StudiesConfig(SmaConfig(20, Close), SmaConfig(50, Close), \
                 SmaConfig(200, Close), RsiConfig(14, Close), MacdConfig(12, 26, 9, Close), \
                 IchimokuConfig(9, 26, 52, 26, Close))"
            );
        }
    }
}
