use std::fmt::Display;

use tracing::debug;

use crate::{Error, Ohlcv, Price, PriceSource, Result, ohlcv::ensure_ordered};

const BUY_DISCOUNT: f64 = 0.85;
const SELL_PREMIUM: f64 = 1.15;

/// Base P/E of a no-growth company in the Graham formula.
const GRAHAM_BASE_PE: f64 = 8.5;

/// Headline numbers for the latest bar of a sequence.
///
/// `change` and `change_pct` compare the last close against the close one
/// bar earlier; both are absent when that close is missing, and the
/// percentage is also absent when the previous close is zero.
///
/// # Example
///
/// ```
/// use stratus_ta::{Bar, QuoteSummary};
///
/// let bars = [
///     Bar::new(1, 100.0, 101.0, 99.0, 100.0, 1_000.0),
///     Bar::new(2, 100.0, 106.0, 100.0, 105.0, 1_200.0),
/// ];
///
/// let quote = QuoteSummary::from_bars(&bars).unwrap();
/// assert_eq!(quote.last, 105.0);
/// assert_eq!(quote.previous, Some(100.0));
/// assert_eq!(quote.change, Some(5.0));
/// assert_eq!(quote.change_pct, Some(5.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct QuoteSummary {
    pub last: Price,
    pub previous: Option<Price>,
    pub change: Option<Price>,
    pub change_pct: Option<Price>,
}

impl QuoteSummary {
    /// Summarizes the most recent defined close of `bars`.
    ///
    /// # Errors
    ///
    /// [`Error::InsufficientData`] for an empty sequence,
    /// [`Error::InvalidInput`] when no close is finite or timestamps are out
    /// of order.
    pub fn from_bars(bars: &[impl Ohlcv]) -> Result<Self> {
        if bars.is_empty() {
            return Err(Error::insufficient("quote", 1, 0));
        }
        ensure_ordered(bars)?;

        let closes = PriceSource::Close.series(bars)?;
        let Some((index, last)) = closes.last_defined() else {
            // series() rejects a non-empty sequence without a finite close
            return Err(Error::insufficient("quote", 1, 0));
        };

        let previous = index.checked_sub(1).and_then(|i| closes[i]);
        let change = previous.map(|prev| last - prev);
        let change_pct = previous
            .zip(change)
            .filter(|&(prev, _)| prev != 0.0)
            .map(|(prev, change)| change / prev * 100.0);

        debug!(last, ?previous, ?change_pct, "quote summary");

        Ok(Self {
            last,
            previous,
            change,
            change_pct,
        })
    }
}

/// Graham intrinsic value: `eps × (8.5 + 2 × growth × 100)`.
///
/// `growth` is the earnings growth rate as a fraction (`0.12` for 12 %).
/// Returns `None` unless both inputs are present, finite and non-zero.
///
/// ```
/// use stratus_ta::intrinsic_value;
///
/// // 2 × (8.5 + 2 × 10) = 57
/// assert_eq!(intrinsic_value(Some(2.0), Some(0.10)), Some(57.0));
/// assert_eq!(intrinsic_value(Some(2.0), None), None);
/// assert_eq!(intrinsic_value(Some(2.0), Some(0.0)), None);
/// ```
#[must_use]
pub fn intrinsic_value(eps: Option<f64>, growth: Option<f64>) -> Option<Price> {
    let usable = |value: &f64| value.is_finite() && *value != 0.0;
    let eps = eps.filter(usable)?;
    let growth = growth.filter(usable)?;

    Some(eps * 2.0f64.mul_add(growth * 100.0, GRAHAM_BASE_PE))
}

/// Valuation call from last price versus intrinsic value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Recommendation {
    /// Price more than 15 % below intrinsic value.
    Buy,
    #[default]
    Hold,
    /// Price more than 15 % above intrinsic value.
    Sell,
}

impl Recommendation {
    /// `Buy` below 0.85 × intrinsic, `Sell` above 1.15 × intrinsic,
    /// otherwise `Hold`. Always `Hold` without an intrinsic value or when
    /// either price is zero.
    ///
    /// ```
    /// use stratus_ta::Recommendation;
    ///
    /// assert_eq!(Recommendation::assess(80.0, Some(100.0)), Recommendation::Buy);
    /// assert_eq!(Recommendation::assess(100.0, Some(100.0)), Recommendation::Hold);
    /// assert_eq!(Recommendation::assess(120.0, Some(100.0)), Recommendation::Sell);
    /// assert_eq!(Recommendation::assess(120.0, None), Recommendation::Hold);
    /// ```
    #[must_use]
    pub fn assess(last: Price, intrinsic: Option<Price>) -> Self {
        match intrinsic {
            Some(value) if value != 0.0 && last != 0.0 => {
                if last < value * BUY_DISCOUNT {
                    Self::Buy
                } else if last > value * SELL_PREMIUM {
                    Self::Sell
                } else {
                    Self::Hold
                }
            }
            _ => Self::Hold,
        }
    }
}

impl Display for Recommendation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Buy => "Buy",
            Self::Hold => "Hold",
            Self::Sell => "Sell",
        };
        f.write_str(label)
    }
}
