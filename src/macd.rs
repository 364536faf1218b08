use std::{fmt::Display, num::NonZero};

use tracing::debug;

use crate::{
    Indicator, IndicatorConfig, IndicatorConfigBuilder, Ohlcv, Price, PriceSource, Result, Series,
    ohlcv::ensure_ordered, series::exponential_mean,
};

const DEFAULT_FAST: NonZero<usize> = NonZero::new(12).unwrap();
const DEFAULT_SLOW: NonZero<usize> = NonZero::new(26).unwrap();
const DEFAULT_SIGNAL: NonZero<usize> = NonZero::new(9).unwrap();

/// Configuration for the [`Macd`] indicator.
///
/// Defaults to the classic 12 / 26 / 9 on the closing price.
///
/// # Example
///
/// ```
/// use stratus_ta::{IndicatorConfig, IndicatorConfigBuilder, MacdConfig};
/// use std::num::NonZero;
///
/// let config = MacdConfig::builder()
///     .fast(NonZero::new(8).unwrap())
///     .slow(NonZero::new(21).unwrap())
///     .build();
///
/// assert_eq!(config.fast(), 8);
/// assert_eq!(config.slow(), 21);
/// assert_eq!(config.signal(), 9);
/// ```
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub struct MacdConfig {
    fast: NonZero<usize>,
    slow: NonZero<usize>,
    signal: NonZero<usize>,
    source: PriceSource,
}

impl IndicatorConfig for MacdConfig {
    type Builder = MacdConfigBuilder;

    #[inline]
    fn builder() -> Self::Builder {
        MacdConfigBuilder::new()
    }

    #[inline]
    fn source(&self) -> PriceSource {
        self.source
    }
}

impl MacdConfig {
    /// Span of the fast EMA.
    #[inline]
    #[must_use]
    pub fn fast(&self) -> usize {
        self.fast.get()
    }

    /// Span of the slow EMA.
    #[inline]
    #[must_use]
    pub fn slow(&self) -> usize {
        self.slow.get()
    }

    /// Span of the signal EMA applied to the MACD line.
    #[inline]
    #[must_use]
    pub fn signal(&self) -> usize {
        self.signal.get()
    }
}

impl Default for MacdConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl Display for MacdConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "MacdConfig({}, {}, {}, {})",
            self.fast, self.slow, self.signal, self.source
        )
    }
}

/// Builder for [`MacdConfig`].
///
/// Defaults: fast = 12, slow = 26, signal = 9,
/// source = [`PriceSource::Close`].
pub struct MacdConfigBuilder {
    fast: NonZero<usize>,
    slow: NonZero<usize>,
    signal: NonZero<usize>,
    source: PriceSource,
}

impl MacdConfigBuilder {
    fn new() -> Self {
        Self {
            fast: DEFAULT_FAST,
            slow: DEFAULT_SLOW,
            signal: DEFAULT_SIGNAL,
            source: PriceSource::Close,
        }
    }

    #[inline]
    #[must_use]
    pub fn fast(mut self, span: NonZero<usize>) -> Self {
        self.fast = span;
        self
    }

    #[inline]
    #[must_use]
    pub fn slow(mut self, span: NonZero<usize>) -> Self {
        self.slow = span;
        self
    }

    #[inline]
    #[must_use]
    pub fn signal(mut self, span: NonZero<usize>) -> Self {
        self.signal = span;
        self
    }
}

impl IndicatorConfigBuilder<MacdConfig> for MacdConfigBuilder {
    #[inline]
    fn source(mut self, source: PriceSource) -> Self {
        self.source = source;
        self
    }

    #[inline]
    fn build(self) -> MacdConfig {
        MacdConfig {
            fast: self.fast,
            slow: self.slow,
            signal: self.signal,
            source: self.source,
        }
    }
}

/// MACD output: three series aligned with the input.
///
/// ```text
/// macd      = EMA(fast) − EMA(slow)
/// signal    = EMA(macd, signal span)
/// histogram = macd − signal
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MacdSeries {
    macd: Series,
    signal: Series,
    histogram: Series,
}

impl MacdSeries {
    /// MACD line: fast EMA minus slow EMA.
    #[inline]
    #[must_use]
    pub fn macd(&self) -> &Series {
        &self.macd
    }

    /// Signal line: EMA of the MACD line.
    #[inline]
    #[must_use]
    pub fn signal(&self) -> &Series {
        &self.signal
    }

    /// Histogram: MACD line minus signal line.
    #[inline]
    #[must_use]
    pub fn histogram(&self) -> &Series {
        &self.histogram
    }

    /// Number of positions, equal to the input length.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.macd.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.macd.is_empty()
    }
}

/// Moving average convergence/divergence of `values`.
///
/// Built entirely from [`exponential_mean`], which has no warm-up gap, so
/// all three lines are defined from position 0 on a fully defined input.
#[must_use]
pub fn macd(
    values: &[Option<Price>],
    fast: NonZero<usize>,
    slow: NonZero<usize>,
    signal: NonZero<usize>,
) -> MacdSeries {
    let line =
        exponential_mean(values, fast).zip_with(&exponential_mean(values, slow), |f, s| f - s);
    let signal = exponential_mean(&line, signal);
    let histogram = line.zip_with(&signal, |m, s| m - s);

    MacdSeries {
        macd: line,
        signal,
        histogram,
    }
}

/// Moving Average Convergence/Divergence (MACD).
///
/// A trend-following momentum indicator: the gap between a fast and a slow
/// EMA, its own EMA (the signal line), and the difference of the two
/// (the histogram). Never fails for lack of history.
///
/// # Example
///
/// ```
/// use stratus_ta::{Bar, Macd, MacdConfig};
///
/// let bars: Vec<Bar> = (1..=60)
///     .map(|t| {
///         let c = 100.0 + (t as f64).sin();
///         Bar::new(t, c, c, c, c, 0.0)
///     })
///     .collect();
///
/// let macd = Macd::new(MacdConfig::default());
/// let out = macd.compute(&bars).unwrap();
///
/// assert_eq!(out.len(), 60);
/// assert_eq!(out.macd()[0], Some(0.0));
/// assert_eq!(out.histogram().defined_count(), 60);
/// ```
#[derive(Clone, Debug)]
pub struct Macd {
    config: MacdConfig,
}

impl Indicator for Macd {
    type Config = MacdConfig;
    type Output = MacdSeries;

    fn new(config: Self::Config) -> Self {
        Self { config }
    }

    #[inline]
    fn config(&self) -> &MacdConfig {
        &self.config
    }

    #[inline]
    fn min_bars(&self) -> usize {
        0
    }

    fn compute(&self, bars: &[impl Ohlcv]) -> Result<MacdSeries> {
        ensure_ordered(bars)?;
        let prices = self.config.source.series(bars)?;

        debug!(indicator = %self, bars = bars.len(), "computing");

        Ok(macd(
            &prices,
            self.config.fast,
            self.config.slow,
            self.config.signal,
        ))
    }
}

impl Display for Macd {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "MACD({}, {}, {}, {})",
            self.config.fast, self.config.slow, self.config.signal, self.config.source
        )
    }
}
