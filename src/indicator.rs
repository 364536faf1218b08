use crate::{Ohlcv, PriceSource, Result};

use std::{
    fmt::{Debug, Display},
    hash::Hash,
};

/// Configuration for a technical [`Indicator`].
///
/// Every indicator has a corresponding config type that holds its parameters
/// (lengths, price source, etc). Configs are value types: cheap to copy,
/// compare, and hash.
pub trait IndicatorConfig: Sized + Copy + PartialEq + Eq + Hash + Display + Debug {
    /// Builder type for constructing this config.
    type Builder: IndicatorConfigBuilder<Self>;

    /// Returns a new builder with default values.
    fn builder() -> Self::Builder;

    /// Price source extracted from each bar.
    fn source(&self) -> PriceSource;
}

/// Builder for an [`IndicatorConfig`].
///
/// Length setters are inherent on each builder since indicators differ in
/// how many windows they take.
pub trait IndicatorConfigBuilder<Config>
where
    Config: IndicatorConfig,
{
    /// Sets the price source.
    #[must_use]
    fn source(self, source: PriceSource) -> Self;

    /// Builds the config. Panics if required fields are missing.
    #[must_use]
    fn build(self) -> Config;
}

/// A technical indicator computed over a whole bar sequence.
///
/// [`compute`](Indicator::compute) is a pure function of the bars: the
/// indicator holds only its configuration, so the same input always yields
/// the same output. Every output series has exactly one position per input
/// bar, with `None` wherever there is not enough history.
///
/// # Example
///
/// ```
/// use stratus_ta::{Bar, Indicator, Sma, SmaConfig};
/// use std::num::NonZero;
///
/// let bars: Vec<Bar> = [10.0, 20.0, 30.0]
///     .iter()
///     .zip(1..)
///     .map(|(&c, t)| Bar::new(t, c, c, c, c, 0.0))
///     .collect();
///
/// let sma = Sma::new(SmaConfig::close(NonZero::new(3).unwrap()));
/// let series = sma.compute(&bars).unwrap();
///
/// assert_eq!(series.into_inner(), vec![None, None, Some(20.0)]);
/// ```
pub trait Indicator: Sized + Clone + Display + Debug {
    /// Configuration type for this indicator.
    type Config: IndicatorConfig;

    /// Computed output type. A [`Series`](crate::Series) for single-line
    /// indicators, a struct of aligned series for composite ones.
    type Output: Send + Sync + Debug;

    /// Creates a new indicator from the given config.
    fn new(config: Self::Config) -> Self;

    /// The indicator's configuration.
    fn config(&self) -> &Self::Config;

    /// Minimum number of bars for [`compute`](Indicator::compute) to
    /// succeed. Zero for indicators that pad short input with undefined
    /// positions instead of failing.
    fn min_bars(&self) -> usize;

    /// Computes the indicator over `bars`, ordered oldest to newest.
    ///
    /// # Errors
    ///
    /// [`Error::InsufficientData`](crate::Error::InsufficientData) when
    /// `bars` is shorter than [`min_bars`](Indicator::min_bars);
    /// [`Error::InvalidInput`](crate::Error::InvalidInput) when timestamps
    /// are not strictly increasing or a required field has no finite value.
    fn compute(&self, bars: &[impl Ohlcv]) -> Result<Self::Output>;
}
