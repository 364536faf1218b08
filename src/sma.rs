use std::{fmt::Display, num::NonZero};

use tracing::debug;

use crate::{
    Indicator, IndicatorConfig, IndicatorConfigBuilder, Ohlcv, Price, PriceSource, Result, Series,
    ohlcv::ensure_ordered, series::rolling_mean,
};

/// Configuration for the Simple Moving Average ([`Sma`]) indicator.
///
/// # Example
///
/// ```rust
/// use stratus_ta::SmaConfig;
/// use std::num::NonZero;
///
/// let config = SmaConfig::close(NonZero::new(20).unwrap());
/// assert_eq!(config.length(), 20);
/// ```
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub struct SmaConfig {
    length: NonZero<usize>,
    source: PriceSource,
}

impl IndicatorConfig for SmaConfig {
    type Builder = SmaConfigBuilder;

    #[inline]
    fn builder() -> Self::Builder {
        SmaConfigBuilder::new()
    }

    #[inline]
    fn source(&self) -> PriceSource {
        self.source
    }
}

impl SmaConfig {
    /// Window length (number of bars).
    #[inline]
    #[must_use]
    pub fn length(&self) -> usize {
        self.length.get()
    }

    /// SMA on closing price.
    #[must_use]
    pub fn close(length: NonZero<usize>) -> Self {
        Self::builder().length(length).build()
    }

    /// SMA on median price: `(high + low) / 2`.
    #[must_use]
    pub fn hl2(length: NonZero<usize>) -> Self {
        Self::builder()
            .length(length)
            .source(PriceSource::HL2)
            .build()
    }
}

impl Display for SmaConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SmaConfig({}, {})", self.length, self.source)
    }
}

/// Builder for [`SmaConfig`].
///
/// Defaults: source = [`PriceSource::Close`].
/// Length must be set before calling [`build`](IndicatorConfigBuilder::build).
pub struct SmaConfigBuilder {
    length: Option<NonZero<usize>>,
    source: PriceSource,
}

impl SmaConfigBuilder {
    fn new() -> Self {
        Self {
            length: None,
            source: PriceSource::Close,
        }
    }

    /// Sets the window length.
    #[inline]
    #[must_use]
    pub fn length(mut self, length: NonZero<usize>) -> Self {
        self.length.replace(length);
        self
    }
}

impl IndicatorConfigBuilder<SmaConfig> for SmaConfigBuilder {
    #[inline]
    fn source(mut self, source: PriceSource) -> Self {
        self.source = source;
        self
    }

    #[inline]
    fn build(self) -> SmaConfig {
        SmaConfig {
            length: self.length.expect("length is required"),
            source: self.source,
        }
    }
}

/// Simple moving average of `values`: the rolling mean over `length`
/// positions, undefined for the first `length - 1`.
#[must_use]
pub fn sma(values: &[Option<Price>], length: NonZero<usize>) -> Series {
    rolling_mean(values, length)
}

/// Simple Moving Average (SMA).
///
/// Computes the unweighted mean of the last *n* values, where *n* is the
/// configured window length. Positions before the window first fills are
/// `None`; input shorter than the window yields an all-`None` series rather
/// than an error, so a long overlay on a short chart simply stays empty.
///
/// # Example
///
/// ```rust
/// use stratus_ta::{Bar, Sma, SmaConfig};
/// use std::num::NonZero;
///
/// let bars: Vec<Bar> = [10.0, 20.0, 30.0, 40.0]
///     .iter()
///     .zip(1..)
///     .map(|(&c, t)| Bar::new(t, c, c, c, c, 0.0))
///     .collect();
///
/// let sma = Sma::new(SmaConfig::close(NonZero::new(3).unwrap()));
/// let series = sma.compute(&bars).unwrap();
///
/// assert_eq!(series[1], None);
/// assert_eq!(series[2], Some(20.0));
/// assert_eq!(series[3], Some(30.0));
/// ```
#[derive(Clone, Debug)]
pub struct Sma {
    config: SmaConfig,
}

impl Indicator for Sma {
    type Config = SmaConfig;
    type Output = Series;

    fn new(config: Self::Config) -> Self {
        Self { config }
    }

    #[inline]
    fn config(&self) -> &SmaConfig {
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

        Ok(sma(&prices, self.config.length))
    }
}

impl Display for Sma {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SMA({}, {})", self.config.length, self.config.source)
    }
}
