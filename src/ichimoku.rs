use std::{fmt::Display, num::NonZero};

use tracing::debug;

use crate::{
    Error, Indicator, IndicatorConfig, IndicatorConfigBuilder, Ohlcv, Price, PriceSource, Result,
    Series,
    ohlcv::ensure_ordered,
    series::{rolling_max, rolling_min, shift_backward, shift_forward},
};

const DEFAULT_CONVERSION: NonZero<usize> = NonZero::new(9).unwrap();
const DEFAULT_BASE: NonZero<usize> = NonZero::new(26).unwrap();
const DEFAULT_SPAN_B: NonZero<usize> = NonZero::new(52).unwrap();
const DEFAULT_DISPLACEMENT: usize = 26;

/// Configuration for the [`Ichimoku`] cloud.
///
/// Defaults: conversion 9, base 26, leading span B 52, displacement 26,
/// lagging span on the closing price.
///
/// # Example
///
/// ```
/// use stratus_ta::IchimokuConfig;
///
/// let config = IchimokuConfig::default();
/// assert_eq!(config.conversion(), 9);
/// assert_eq!(config.base(), 26);
/// assert_eq!(config.span_b(), 52);
/// assert_eq!(config.displacement(), 26);
/// ```
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub struct IchimokuConfig {
    conversion: NonZero<usize>,
    base: NonZero<usize>,
    span_b: NonZero<usize>,
    displacement: usize,
    source: PriceSource,
}

impl IndicatorConfig for IchimokuConfig {
    type Builder = IchimokuConfigBuilder;

    #[inline]
    fn builder() -> Self::Builder {
        IchimokuConfigBuilder::new()
    }

    /// Source plotted as the lagging span.
    #[inline]
    fn source(&self) -> PriceSource {
        self.source
    }
}

impl IchimokuConfig {
    /// Window of the conversion line (tenkan-sen).
    #[inline]
    #[must_use]
    pub fn conversion(&self) -> usize {
        self.conversion.get()
    }

    /// Window of the base line (kijun-sen).
    #[inline]
    #[must_use]
    pub fn base(&self) -> usize {
        self.base.get()
    }

    /// Window of leading span B (senkou span B).
    #[inline]
    #[must_use]
    pub fn span_b(&self) -> usize {
        self.span_b.get()
    }

    /// Bars the leading spans are pushed ahead and the lagging span
    /// pulled behind.
    #[inline]
    #[must_use]
    pub fn displacement(&self) -> usize {
        self.displacement
    }

    fn longest_window(&self) -> usize {
        self.conversion.max(self.base).max(self.span_b).get()
    }
}

impl Default for IchimokuConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl Display for IchimokuConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "IchimokuConfig({}, {}, {}, {}, {})",
            self.conversion, self.base, self.span_b, self.displacement, self.source
        )
    }
}

/// Builder for [`IchimokuConfig`].
pub struct IchimokuConfigBuilder {
    conversion: NonZero<usize>,
    base: NonZero<usize>,
    span_b: NonZero<usize>,
    displacement: usize,
    source: PriceSource,
}

impl IchimokuConfigBuilder {
    fn new() -> Self {
        Self {
            conversion: DEFAULT_CONVERSION,
            base: DEFAULT_BASE,
            span_b: DEFAULT_SPAN_B,
            displacement: DEFAULT_DISPLACEMENT,
            source: PriceSource::Close,
        }
    }

    #[inline]
    #[must_use]
    pub fn conversion(mut self, length: NonZero<usize>) -> Self {
        self.conversion = length;
        self
    }

    #[inline]
    #[must_use]
    pub fn base(mut self, length: NonZero<usize>) -> Self {
        self.base = length;
        self
    }

    #[inline]
    #[must_use]
    pub fn span_b(mut self, length: NonZero<usize>) -> Self {
        self.span_b = length;
        self
    }

    #[inline]
    #[must_use]
    pub fn displacement(mut self, displacement: usize) -> Self {
        self.displacement = displacement;
        self
    }
}

impl IndicatorConfigBuilder<IchimokuConfig> for IchimokuConfigBuilder {
    #[inline]
    fn source(mut self, source: PriceSource) -> Self {
        self.source = source;
        self
    }

    #[inline]
    fn build(self) -> IchimokuConfig {
        IchimokuConfig {
            conversion: self.conversion,
            base: self.base,
            span_b: self.span_b,
            displacement: self.displacement,
            source: self.source,
        }
    }
}

/// The five Ichimoku lines, aligned with the input bars.
///
/// Leading spans are already displaced forward and the lagging span
/// backward, so position `i` of every line is what a chart draws above
/// bar `i`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IchimokuSeries {
    conversion: Series,
    base: Series,
    leading_a: Series,
    leading_b: Series,
    lagging: Series,
}

impl IchimokuSeries {
    /// Conversion line: midpoint of the conversion-window high/low range.
    #[inline]
    #[must_use]
    pub fn conversion(&self) -> &Series {
        &self.conversion
    }

    /// Base line: midpoint of the base-window high/low range.
    #[inline]
    #[must_use]
    pub fn base(&self) -> &Series {
        &self.base
    }

    /// Leading span A: mean of conversion and base, displaced forward.
    #[inline]
    #[must_use]
    pub fn leading_a(&self) -> &Series {
        &self.leading_a
    }

    /// Leading span B: midpoint of the span-B-window range, displaced
    /// forward.
    #[inline]
    #[must_use]
    pub fn leading_b(&self) -> &Series {
        &self.leading_b
    }

    /// Lagging span: the source price displaced backward.
    #[inline]
    #[must_use]
    pub fn lagging(&self) -> &Series {
        &self.lagging
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.conversion.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.conversion.is_empty()
    }
}

fn midpoint_channel(high: &[Option<Price>], low: &[Option<Price>], length: NonZero<usize>) -> Series {
    rolling_max(high, length).zip_with(&rolling_min(low, length), f64::midpoint)
}

/// Ichimoku lines from aligned high, low and lagging-source series.
///
/// ```text
/// conversion = (max(high, conv) + min(low, conv)) / 2
/// base       = (max(high, base) + min(low, base)) / 2
/// leading_a  = shift_forward((conversion + base) / 2, displacement)
/// leading_b  = shift_forward((max(high, span_b) + min(low, span_b)) / 2, displacement)
/// lagging    = shift_backward(source, displacement)
/// ```
///
/// # Panics
///
/// Panics if the three input series differ in length.
#[must_use]
pub fn ichimoku(
    high: &[Option<Price>],
    low: &[Option<Price>],
    source: &[Option<Price>],
    config: &IchimokuConfig,
) -> IchimokuSeries {
    assert_eq!(high.len(), low.len(), "ichimoku inputs must be index-aligned");
    assert_eq!(high.len(), source.len(), "ichimoku inputs must be index-aligned");

    let conversion = midpoint_channel(high, low, config.conversion);
    let base = midpoint_channel(high, low, config.base);
    let leading_a_raw = conversion.zip_with(&base, f64::midpoint);
    let leading_b_raw = midpoint_channel(high, low, config.span_b);

    IchimokuSeries {
        leading_a: shift_forward(&leading_a_raw, config.displacement),
        leading_b: shift_forward(&leading_b_raw, config.displacement),
        lagging: shift_backward(source, config.displacement),
        conversion,
        base,
    }
}

/// Ichimoku Kinko Hyo (trend cloud).
///
/// Five lines built from rolling high/low extremes: the conversion and
/// base lines track short and medium range midpoints, the two leading
/// spans form the cloud plotted ahead of price, and the lagging span
/// plots price behind.
///
/// Requires at least as many bars as the longest window (52 by default);
/// shorter input is rejected with [`Error::InsufficientData`].
///
/// # Example
///
/// ```
/// use stratus_ta::{Bar, Ichimoku, IchimokuConfig};
///
/// let bars: Vec<Bar> = (1..=60)
///     .map(|t| {
///         let mid = 100.0 + (t as f64 * 0.1).sin() * 5.0;
///         Bar::new(t, mid, mid + 5.0, mid - 5.0, mid, 0.0)
///     })
///     .collect();
///
/// let cloud = Ichimoku::new(IchimokuConfig::default()).compute(&bars).unwrap();
///
/// assert_eq!(cloud.len(), 60);
/// assert!(cloud.conversion()[7].is_none());
/// assert!(cloud.conversion()[8].is_some());
/// ```
#[derive(Clone, Debug)]
pub struct Ichimoku {
    config: IchimokuConfig,
}

impl Indicator for Ichimoku {
    type Config = IchimokuConfig;
    type Output = IchimokuSeries;

    fn new(config: Self::Config) -> Self {
        Self { config }
    }

    #[inline]
    fn config(&self) -> &IchimokuConfig {
        &self.config
    }

    #[inline]
    fn min_bars(&self) -> usize {
        self.config.longest_window()
    }

    fn compute(&self, bars: &[impl Ohlcv]) -> Result<IchimokuSeries> {
        ensure_ordered(bars)?;

        if bars.len() < self.min_bars() {
            return Err(Error::insufficient("Ichimoku", self.min_bars(), bars.len()));
        }

        let high = PriceSource::High.series(bars)?;
        let low = PriceSource::Low.series(bars)?;
        let source = self.config.source.series(bars)?;

        debug!(indicator = %self, bars = bars.len(), "computing");

        Ok(ichimoku(&high, &low, &source, &self.config))
    }
}

impl Display for Ichimoku {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "ICHIMOKU({}, {}, {}, {})",
            self.config.conversion, self.config.base, self.config.span_b, self.config.displacement
        )
    }
}
