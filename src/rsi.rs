use std::{fmt::Display, num::NonZero};

use tracing::debug;

use crate::{
    Error, Indicator, IndicatorConfig, IndicatorConfigBuilder, Ohlcv, Price, PriceSource, Result,
    Series, ohlcv::ensure_ordered,
};

/// Substituted for a zero average loss so the strength ratio stays finite.
const LOSS_FLOOR: f64 = 1e-10;

const DEFAULT_LENGTH: NonZero<usize> = NonZero::new(14).unwrap();

/// Configuration for the Relative Strength Index ([`Rsi`])
/// indicator.
///
/// Defaults to 14 periods on the closing price.
///
/// # Example
///
/// ```
/// use stratus_ta::RsiConfig;
/// use std::num::NonZero;
///
/// assert_eq!(RsiConfig::default().length(), 14);
///
/// let config = RsiConfig::close(NonZero::new(7).unwrap());
/// assert_eq!(config.length(), 7);
/// ```
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub struct RsiConfig {
    length: NonZero<usize>,
    source: PriceSource,
}

impl IndicatorConfig for RsiConfig {
    type Builder = RsiConfigBuilder;

    #[inline]
    fn builder() -> Self::Builder {
        RsiConfigBuilder::new()
    }

    #[inline]
    fn source(&self) -> PriceSource {
        self.source
    }
}

impl RsiConfig {
    /// Smoothing period (number of price changes).
    #[inline]
    #[must_use]
    pub fn length(&self) -> usize {
        self.length.get()
    }

    /// RSI on closing price.
    #[must_use]
    pub fn close(length: NonZero<usize>) -> Self {
        Self::builder().length(length).build()
    }
}

impl Default for RsiConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl Display for RsiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "RsiConfig({}, {})", self.length, self.source)
    }
}

/// Builder for [`RsiConfig`].
///
/// Defaults: length = 14, source = [`PriceSource::Close`].
pub struct RsiConfigBuilder {
    length: NonZero<usize>,
    source: PriceSource,
}

impl RsiConfigBuilder {
    #[must_use]
    fn new() -> Self {
        Self {
            length: DEFAULT_LENGTH,
            source: PriceSource::Close,
        }
    }

    /// Sets the smoothing period.
    #[inline]
    #[must_use]
    pub fn length(mut self, length: NonZero<usize>) -> Self {
        self.length = length;
        self
    }
}

impl IndicatorConfigBuilder<RsiConfig> for RsiConfigBuilder {
    #[inline]
    fn source(mut self, source: PriceSource) -> Self {
        self.source = source;
        self
    }

    #[inline]
    fn build(self) -> RsiConfig {
        RsiConfig {
            length: self.length,
            source: self.source,
        }
    }
}

/// Wilder-smoothed average gain and loss.
#[derive(Clone, Copy, Debug)]
struct Averages {
    gain: f64,
    loss: f64,
    length: f64,
    length_minus_one: f64,
}

impl Averages {
    /// Simple mean of gains and losses over the defined changes in `seed`,
    /// or `None` if none of them is defined.
    fn seed(seed: &[Option<Price>], length: NonZero<usize>) -> Option<Self> {
        let (count, sum_gain, sum_loss) = seed.iter().flatten().fold(
            (0_u32, 0.0, 0.0),
            |(count, sum_gain, sum_loss), &change| {
                let (gain, loss) = gain_and_loss(change);
                (count + 1, sum_gain + gain, sum_loss + loss)
            },
        );

        if count == 0 {
            return None;
        }

        let count = f64::from(count);

        #[allow(clippy::cast_precision_loss)]
        let length = length.get() as f64;

        Some(Self {
            gain: sum_gain / count,
            loss: sum_loss / count,
            length,
            length_minus_one: length - 1.0,
        })
    }

    #[inline]
    fn update(&mut self, change: Price) -> Price {
        let (gain, loss) = gain_and_loss(change);

        self.gain = self.gain.mul_add(self.length_minus_one, gain) / self.length;
        self.loss = self.loss.mul_add(self.length_minus_one, loss) / self.length;

        self.rsi()
    }

    #[inline]
    fn rsi(&self) -> Price {
        let loss = if self.loss == 0.0 { LOSS_FLOOR } else { self.loss };
        let rs = self.gain / loss;

        100.0 - 100.0 / (1.0 + rs)
    }
}

#[inline]
fn gain_and_loss(change: Price) -> (Price, Price) {
    (change.max(0.0), (-change).max(0.0))
}

/// Relative strength index of `values` over `length` price changes.
///
/// 1. The first `length` changes seed the average gain and loss with a
///    simple mean. Every position `1..length` receives the RSI of that
///    seed; position 0 has no prior price and is undefined.
/// 2. From position `length` on, the averages are Wilder-smoothed with the
///    change into that position, so the first step reuses the last seed
///    change: `avg = (avg × (length − 1) + move) / length`.
///
/// A zero average loss is replaced by a tiny floor, so a series that only
/// rises tends to 100 without dividing by zero.
///
/// Undefined changes (either endpoint undefined) are left out of the seed
/// mean and yield an undefined position in the smoothing phase without
/// disturbing the averages.
///
/// # Errors
///
/// [`Error::InsufficientData`] when `values` holds `length` positions or
/// fewer.
pub fn rsi(values: &[Option<Price>], length: NonZero<usize>) -> Result<Series> {
    let period = length.get();
    let n = values.len();

    if n <= period {
        return Err(Error::insufficient("RSI", period + 1, n));
    }

    let changes: Vec<Option<Price>> = values
        .windows(2)
        .map(|pair| pair[0].zip(pair[1]).map(|(prev, cur)| cur - prev))
        .collect();

    let Some(mut averages) = Averages::seed(&changes[..period], length) else {
        return Ok(Series::undefined(n));
    };
    let seed_rsi = averages.rsi();

    let mut out = Vec::with_capacity(n);
    out.push(None);
    out.extend(values[1..period].iter().map(|value| value.map(|_| seed_rsi)));
    out.extend(
        changes[period - 1..]
            .iter()
            .map(|change| change.map(|change| averages.update(change))),
    );

    Ok(out.into())
}

/// Relative Strength Index (RSI).
///
/// Measures the speed and magnitude of recent price changes on
/// a 0–100 scale. Values above 70 are conventionally considered
/// overbought; below 30, oversold.
///
/// ```text
/// RS  = avg_gain / avg_loss
/// RSI = 100 − 100 / (1 + RS)
/// ```
///
/// See [`rsi`] for the seeding and smoothing rules.
///
/// # Example
///
/// ```
/// use stratus_ta::{Bar, Rsi, RsiConfig};
/// use std::num::NonZero;
///
/// let bars: Vec<Bar> = [10.0, 12.0, 11.0, 13.0, 15.0]
///     .iter()
///     .zip(1..)
///     .map(|(&c, t)| Bar::new(t, c, c, c, c, 0.0))
///     .collect();
///
/// let rsi = Rsi::new(RsiConfig::close(NonZero::new(3).unwrap()));
/// let series = rsi.compute(&bars).unwrap();
///
/// // Seed over +2, −1, +2: avg_gain = 4/3, avg_loss = 1/3 → RSI = 80
/// assert_eq!(series[0], None);
/// assert!((series[1].unwrap() - 80.0).abs() < 1e-9);
/// assert!((series[2].unwrap() - 80.0).abs() < 1e-9);
/// ```
#[derive(Clone, Debug)]
pub struct Rsi {
    config: RsiConfig,
}

impl Indicator for Rsi {
    type Config = RsiConfig;
    type Output = Series;

    fn new(config: Self::Config) -> Self {
        Self { config }
    }

    #[inline]
    fn config(&self) -> &RsiConfig {
        &self.config
    }

    #[inline]
    fn min_bars(&self) -> usize {
        self.config.length() + 1
    }

    fn compute(&self, bars: &[impl Ohlcv]) -> Result<Series> {
        ensure_ordered(bars)?;
        let prices = self.config.source.series(bars)?;

        debug!(indicator = %self, bars = bars.len(), "computing");

        rsi(&prices, self.config.length)
    }
}

impl Display for Rsi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "RSI({}, {})", self.config.length, self.config.source)
    }
}
