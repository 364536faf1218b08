use std::num::NonZero;

use tracing::{debug, trace};

use crate::{Price, series::finite, sma};

const MEDIUM: NonZero<usize> = NonZero::new(50).unwrap();
const LONG: NonZero<usize> = NonZero::new(200).unwrap();

/// How many symbols close at/above versus below one moving average.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BreadthCount {
    pub above: usize,
    pub below: usize,
    /// Symbols with enough finite history to be compared.
    pub counted: usize,
}

impl BreadthCount {
    /// Share of counted symbols at or above the average, in percent.
    #[must_use]
    pub fn above_pct(&self) -> Option<f64> {
        self.pct(self.above)
    }

    /// Share of counted symbols below the average, in percent.
    #[must_use]
    pub fn below_pct(&self) -> Option<f64> {
        self.pct(self.below)
    }

    #[allow(clippy::cast_precision_loss)]
    fn pct(&self, part: usize) -> Option<f64> {
        (self.counted > 0).then(|| part as f64 / self.counted as f64 * 100.0)
    }

    /// Compares the last close against the mean of the last `length` closes.
    /// Skipped when fewer than `length` closes are available.
    fn record(&mut self, closes: &[Option<Price>], length: NonZero<usize>) {
        if closes.len() < length.get() {
            return;
        }
        let average = sma(closes, length).last().copied().flatten();
        let last = closes.last().copied().flatten();

        if let Some((last, average)) = last.zip(average) {
            if last >= average {
                self.above += 1;
            } else {
                self.below += 1;
            }
            self.counted += 1;
        }
    }
}

/// Market breadth over a universe of symbols: the share trading at or
/// above their 50- and 200-bar simple moving averages.
///
/// Each symbol contributes its close history, oldest first. Non-finite
/// closes are dropped before averaging, and a symbol only counts toward an
/// average once it has that many finite closes.
///
/// # Example
///
/// ```
/// use stratus_ta::MarketBreadth;
///
/// let rising: Vec<f64> = (1..=60).map(f64::from).collect();
/// let falling: Vec<f64> = (1..=60).rev().map(f64::from).collect();
/// let young = vec![10.0; 20];
///
/// let breadth = MarketBreadth::compute([&rising[..], &falling[..], &young[..]]);
///
/// assert_eq!(breadth.sample_size, 3);
/// assert_eq!(breadth.sma50.counted, 2);
/// assert_eq!(breadth.sma50.above_pct(), Some(50.0));
/// assert_eq!(breadth.sma200.above_pct(), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MarketBreadth {
    /// Number of symbols supplied, counted or not.
    pub sample_size: usize,
    pub sma50: BreadthCount,
    pub sma200: BreadthCount,
}

impl MarketBreadth {
    /// Tallies breadth over each symbol's close history.
    #[must_use]
    pub fn compute<'a>(symbols: impl IntoIterator<Item = &'a [Price]>) -> Self {
        let mut breadth = Self::default();

        for closes in symbols {
            breadth.sample_size += 1;

            let finite_closes: Vec<Option<Price>> = closes
                .iter()
                .filter_map(|&close| finite(close))
                .map(Some)
                .collect();
            if finite_closes.len() < closes.len() {
                trace!(
                    dropped = closes.len() - finite_closes.len(),
                    "dropped non-finite closes"
                );
            }

            breadth.sma50.record(&finite_closes, MEDIUM);
            breadth.sma200.record(&finite_closes, LONG);
        }

        debug!(
            sample_size = breadth.sample_size,
            counted_sma50 = breadth.sma50.counted,
            counted_sma200 = breadth.sma200.counted,
            "market breadth"
        );

        breadth
    }
}
