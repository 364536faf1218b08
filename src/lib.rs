//! Technical analysis studies for daily price charts.
//!
//! Indicators take a slice of any type implementing [`Ohlcv`], ordered
//! oldest to newest, and return [`Series`] aligned one-to-one with it.
//! Positions without enough history are `None`, never a placeholder
//! number, so composite studies cannot mistake them for real values.
//!
//! Each indicator type ([`Sma`], [`Ema`], [`Rsi`], [`Macd`], [`Ichimoku`])
//! exposes [`new`](Sma::new) and [`compute`](Sma::compute) as inherent
//! methods; no trait import needed. Import [`Indicator`] only for generic
//! code. The same computations are available as free functions over
//! already extracted series ([`sma`], [`ema`], [`rsi`], [`macd`],
//! [`ichimoku`]) together with the windowing primitives they are built
//! from.
//!
//! [`ChartStudies`] runs every study of an analysis chart in one call,
//! [`QuoteSummary`] and [`Recommendation`] produce the info card, and
//! [`MarketBreadth`] tallies a universe of symbols against their long
//! averages.

mod breadth;
mod ema;
mod error;
mod ichimoku;
mod indicator;
mod macd;
mod ohlcv;
mod price_source;
mod quote;
mod ring_buffer;
mod rsi;
mod series;
mod sma;
mod studies;
mod window;

pub use crate::error::{Error, InputFault, Result};
pub use crate::indicator::{Indicator, IndicatorConfig, IndicatorConfigBuilder};
pub use crate::ohlcv::{Bar, Ohlcv, Price, Timestamp};
pub use crate::price_source::PriceSource;
pub use crate::series::{
    Series, exponential_mean, rolling_max, rolling_mean, rolling_min, shift_backward,
    shift_forward,
};

pub use crate::ema::{Ema, EmaConfig, EmaConfigBuilder, ema};
pub use crate::ichimoku::{
    Ichimoku, IchimokuConfig, IchimokuConfigBuilder, IchimokuSeries, ichimoku,
};
pub use crate::macd::{Macd, MacdConfig, MacdConfigBuilder, MacdSeries, macd};
pub use crate::rsi::{Rsi, RsiConfig, RsiConfigBuilder, rsi};
pub use crate::sma::{Sma, SmaConfig, SmaConfigBuilder, sma};

pub use crate::breadth::{BreadthCount, MarketBreadth};
pub use crate::quote::{QuoteSummary, Recommendation, intrinsic_value};
pub use crate::studies::{ChartStudies, StudiesConfig};

macro_rules! impl_indicator_methods {
    ($type:ty, $config:ty, $output:ty) => {
        impl $type {
            /// See [`Indicator::new`].
            #[must_use]
            pub fn new(config: $config) -> Self {
                <Self as Indicator>::new(config)
            }

            /// See [`Indicator::compute`].
            ///
            /// # Errors
            ///
            /// See [`Indicator::compute`].
            #[inline]
            pub fn compute(&self, bars: &[impl Ohlcv]) -> Result<$output> {
                <Self as Indicator>::compute(self, bars)
            }
        }
    };
}

impl_indicator_methods!(Sma, SmaConfig, Series);
impl_indicator_methods!(Ema, EmaConfig, Series);
impl_indicator_methods!(Rsi, RsiConfig, Series);
impl_indicator_methods!(Macd, MacdConfig, MacdSeries);
impl_indicator_methods!(Ichimoku, IchimokuConfig, IchimokuSeries);

#[cfg(test)]
mod test_util;
