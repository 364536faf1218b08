use crate::{Error, InputFault, Ohlcv, Price, Result, Series, series::finite};

use std::fmt::{Debug, Display};
use tracing::trace;

/// Price source extracted from each [`Ohlcv`] bar before feeding into an
/// indicator.
///
/// Each single-input indicator is configured with a `PriceSource` that
/// determines which value (or derived value) to compute on.
#[derive(PartialEq, Eq, Hash, Clone, Copy, Default, Debug)]
pub enum PriceSource {
    /// Opening price.
    Open,
    /// Highest price.
    High,
    /// Closing price.
    #[default]
    Close,
    /// Lowest price.
    Low,
    /// Traded volume.
    Volume,
    /// Median price: `(high + low) / 2`.
    HL2,
    /// Typical price: `(high + low + close) / 3`.
    HLC3,
    /// Average price: `(open + high + low + close) / 4`.
    OHLC4,
    /// Weighted close: `(high + low + close + close) / 4`.
    HLCC4,
    /// True range: `max(high - low, |high - prev_close|, |low - prev_close|)`.
    ///
    /// On the first bar (no previous close), falls back to `high - low`.
    TrueRange,
}

impl Display for PriceSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self:?}")
    }
}

impl PriceSource {
    /// Field name reported in [`Error::InvalidInput`].
    #[must_use]
    pub fn field_name(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::High => "high",
            Self::Close => "close",
            Self::Low => "low",
            Self::Volume => "volume",
            Self::HL2 => "hl2",
            Self::HLC3 => "hlc3",
            Self::OHLC4 => "ohlc4",
            Self::HLCC4 => "hlcc4",
            Self::TrueRange => "true_range",
        }
    }

    /// Extracts this source from every bar into an aligned [`Series`].
    ///
    /// Non-finite values become undefined positions. A non-empty sequence in
    /// which *no* bar yields a finite value is rejected, since every window
    /// computed from it would be undefined.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidInput`] with [`InputFault::NoFiniteValues`].
    pub fn series(self, bars: &[impl Ohlcv]) -> Result<Series> {
        let mut prev_close = None;

        let series: Series = bars
            .iter()
            .map(|bar| {
                let price = self.extract(bar, prev_close);
                prev_close = Some(bar.close());
                finite(price)
            })
            .collect();

        let defined = series.defined_count();
        if !bars.is_empty() && defined == 0 {
            return Err(Error::InvalidInput {
                field: self.field_name(),
                fault: InputFault::NoFiniteValues,
            });
        }

        if defined < bars.len() {
            trace!(
                source = %self,
                undefined = bars.len() - defined,
                "non-finite inputs mapped to undefined"
            );
        }

        Ok(series)
    }

    #[inline]
    pub(crate) fn extract(self, ohlcv: &impl Ohlcv, prev_close: Option<Price>) -> Price {
        match self {
            Self::Open => ohlcv.open(),
            Self::High => ohlcv.high(),
            Self::Close => ohlcv.close(),
            Self::Low => ohlcv.low(),
            Self::Volume => ohlcv.volume(),
            Self::HL2 => f64::midpoint(ohlcv.high(), ohlcv.low()),
            Self::HLC3 => (ohlcv.high() + ohlcv.low() + ohlcv.close()) / 3.0,
            Self::OHLC4 => (ohlcv.open() + ohlcv.high() + ohlcv.low() + ohlcv.close()) / 4.0,
            Self::HLCC4 => (ohlcv.high() + ohlcv.low() + ohlcv.close() + ohlcv.close()) / 4.0,
            Self::TrueRange => {
                let hl = ohlcv.high() - ohlcv.low();

                match prev_close {
                    // f64::max ignores NaN, so an unusable previous close
                    // has to be surfaced explicitly.
                    Some(prev_close) if !prev_close.is_finite() => Price::NAN,
                    Some(prev_close) => {
                        let hc = (ohlcv.high() - prev_close).abs();
                        let lc = (ohlcv.low() - prev_close).abs();
                        hl.max(hc).max(lc)
                    }
                    None => hl,
                }
            }
        }
    }
}
