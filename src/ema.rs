use std::{fmt::Display, num::NonZero};

use tracing::debug;

use crate::{
    Indicator, IndicatorConfig, IndicatorConfigBuilder, Ohlcv, Price, PriceSource, Result, Series,
    ohlcv::ensure_ordered, series::exponential_mean,
};

/// Configuration for the Exponential Moving Average ([`Ema`])
/// indicator.
///
/// # Example
///
/// ```
/// use stratus_ta::EmaConfig;
/// use std::num::NonZero;
///
/// let config = EmaConfig::close(NonZero::new(12).unwrap());
///
/// assert_eq!(config.length(), 12);
/// assert_eq!(config.alpha(), 2.0 / 13.0);
/// ```
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub struct EmaConfig {
    length: NonZero<usize>,
    source: PriceSource,
}

impl IndicatorConfig for EmaConfig {
    type Builder = EmaConfigBuilder;

    #[inline]
    fn builder() -> Self::Builder {
        EmaConfigBuilder::new()
    }

    #[inline]
    fn source(&self) -> PriceSource {
        self.source
    }
}

impl EmaConfig {
    /// Span (number of bars) the smoothing factor is derived from.
    #[inline]
    #[must_use]
    pub fn length(&self) -> usize {
        self.length.get()
    }

    /// Smoothing factor `α = 2 / (length + 1)`.
    #[must_use]
    pub fn alpha(&self) -> f64 {
        #[allow(clippy::cast_precision_loss)]
        let span = self.length.get() as f64;
        2.0 / (span + 1.0)
    }

    /// EMA on closing price.
    #[must_use]
    pub fn close(length: NonZero<usize>) -> Self {
        Self::builder().length(length).build()
    }

    /// EMA on median price: `(high + low) / 2`.
    #[must_use]
    pub fn hl2(length: NonZero<usize>) -> Self {
        Self::builder()
            .length(length)
            .source(PriceSource::HL2)
            .build()
    }
}

impl Display for EmaConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "EmaConfig({}, {})", self.length, self.source)
    }
}

/// Builder for [`EmaConfig`].
///
/// Defaults: source = [`PriceSource::Close`].
/// Length must be set before calling
/// [`build`](IndicatorConfigBuilder::build).
pub struct EmaConfigBuilder {
    length: Option<NonZero<usize>>,
    source: PriceSource,
}

impl EmaConfigBuilder {
    fn new() -> Self {
        Self {
            length: None,
            source: PriceSource::Close,
        }
    }

    /// Sets the span.
    #[inline]
    #[must_use]
    pub fn length(mut self, length: NonZero<usize>) -> Self {
        self.length.replace(length);
        self
    }
}

impl IndicatorConfigBuilder<EmaConfig> for EmaConfigBuilder {
    #[inline]
    fn source(mut self, source: PriceSource) -> Self {
        self.source = source;
        self
    }

    #[inline]
    fn build(self) -> EmaConfig {
        EmaConfig {
            length: self.length.expect("length is required"),
            source: self.source,
        }
    }
}

/// Exponential moving average of `values` with span `length`.
///
/// Seeded with the first value, so a fully defined input gives a fully
/// defined output.
#[must_use]
pub fn ema(values: &[Option<Price>], length: NonZero<usize>) -> Series {
    exponential_mean(values, length)
}

/// Exponential Moving Average (EMA).
///
/// A weighted moving average that gives more weight to recent
/// prices. Uses the standard smoothing factor
/// `α = 2 / (length + 1)`. Each value is computed as:
///
/// ```text
/// EMA[0] = price[0]
/// EMA[i] = α × price[i] + (1 − α) × EMA[i − 1]
/// ```
///
/// Unlike [`Sma`](crate::Sma) there is no warm-up gap: the first bar seeds
/// the recursion and every position is defined. Composite indicators such
/// as [`Macd`](crate::Macd) rely on this.
///
/// # Example
///
/// ```
/// use stratus_ta::{Bar, Ema, EmaConfig};
/// use std::num::NonZero;
///
/// let bars: Vec<Bar> = [2.0, 4.0, 8.0]
///     .iter()
///     .zip(1..)
///     .map(|(&c, t)| Bar::new(t, c, c, c, c, 0.0))
///     .collect();
///
/// // EMA(3): α = 0.5
/// let ema = Ema::new(EmaConfig::close(NonZero::new(3).unwrap()));
/// let series = ema.compute(&bars).unwrap();
///
/// assert_eq!(series.into_inner(), vec![Some(2.0), Some(3.0), Some(5.5)]);
/// ```
#[derive(Clone, Debug)]
pub struct Ema {
    config: EmaConfig,
}

impl Indicator for Ema {
    type Config = EmaConfig;
    type Output = Series;

    fn new(config: Self::Config) -> Self {
        Self { config }
    }

    #[inline]
    fn config(&self) -> &EmaConfig {
        &self.config
    }

    #[inline]
    fn min_bars(&self) -> usize {
        0
    }

    fn compute(&self, bars: &[impl Ohlcv]) -> Result<Series> {
        ensure_ordered(bars)?;
        let prices = self.config.source.series(bars)?;

        debug!(indicator = %self, bars = bars.len(), "computing");

        Ok(ema(&prices, self.config.length))
    }
}

impl Display for Ema {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "EMA({}, {})", self.config.length, self.config.source)
    }
}
