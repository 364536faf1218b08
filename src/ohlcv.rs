use crate::{Error, InputFault, Result};

/// A price value.
///
/// Semantic alias for [`f64`]. Documents intent in function signatures
/// without introducing newtype construction overhead.
pub type Price = f64;

/// Bar timestamp (e.g. seconds since epoch) or sequence number.
///
/// Must be strictly increasing along a bar sequence.
pub type Timestamp = u64;

/// OHLCV bar data used as input to all indicators.
///
/// Implement this on your own candle type to avoid a conversion pass.
/// Indicators accept `&[impl Ohlcv]` ordered oldest to newest and extract
/// the configured [`PriceSource`](crate::PriceSource) internally.
///
/// # Example
///
/// ```
/// use stratus_ta::{Ohlcv, Price, Timestamp};
///
/// struct MyCandle {
///     o: f64, h: f64, l: f64, c: f64, v: f64,
///     ts: u64,
/// }
///
/// impl Ohlcv for MyCandle {
///     fn open(&self) -> Price { self.o }
///     fn high(&self) -> Price { self.h }
///     fn low(&self) -> Price { self.l }
///     fn close(&self) -> Price { self.c }
///     fn volume(&self) -> f64 { self.v }
///     fn timestamp(&self) -> Timestamp { self.ts }
/// }
/// ```
pub trait Ohlcv {
    /// Opening price of the bar.
    fn open(&self) -> Price;

    /// Highest price during the bar.
    fn high(&self) -> Price;

    /// Lowest price during the bar.
    fn low(&self) -> Price;

    /// Closing price of the bar.
    fn close(&self) -> Price;

    /// Traded volume during the bar.
    fn volume(&self) -> f64;

    /// Bar timestamp. Strictly increasing from one bar to the next.
    fn timestamp(&self) -> Timestamp;
}

/// Plain daily price bar.
///
/// The default carrier for bar sequences handed over by a data-fetch layer.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Bar {
    pub timestamp: Timestamp,
    pub open: Price,
    pub high: Price,
    pub low: Price,
    pub close: Price,
    pub volume: f64,
}

impl Bar {
    #[must_use]
    pub fn new(
        timestamp: Timestamp,
        open: Price,
        high: Price,
        low: Price,
        close: Price,
        volume: f64,
    ) -> Self {
        Self {
            timestamp,
            open,
            high,
            low,
            close,
            volume,
        }
    }
}

impl Ohlcv for Bar {
    #[inline]
    fn open(&self) -> Price {
        self.open
    }

    #[inline]
    fn high(&self) -> Price {
        self.high
    }

    #[inline]
    fn low(&self) -> Price {
        self.low
    }

    #[inline]
    fn close(&self) -> Price {
        self.close
    }

    #[inline]
    fn volume(&self) -> f64 {
        self.volume
    }

    #[inline]
    fn timestamp(&self) -> Timestamp {
        self.timestamp
    }
}

/// Rejects a sequence whose timestamps do not strictly increase.
pub(crate) fn ensure_ordered(bars: &[impl Ohlcv]) -> Result<()> {
    match bars
        .windows(2)
        .position(|pair| pair[1].timestamp() <= pair[0].timestamp())
    {
        Some(i) => Err(Error::InvalidInput {
            field: "timestamp",
            fault: InputFault::OutOfOrder { index: i + 1 },
        }),
        None => Ok(()),
    }
}
