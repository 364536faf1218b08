use crate::{Price, ring_buffer::RingBuffer};
use std::{collections::VecDeque, num::NonZero};

/// Streaming arithmetic mean over the last `length` positions.
///
/// Yields a value only when the window is full and every position in it is
/// defined. Partial windows are never averaged.
#[derive(Clone, Debug)]
pub(crate) struct MeanWindow {
    values: RingBuffer<Option<Price>>,
    /// Running sum of the defined values in the window. Maintained
    /// incrementally, may accumulate FP rounding drift over very long runs,
    /// but negligible for typical window sizes on daily bars.
    sum: Price,
    undefined: usize,
    length_reciprocal: f64,
}

impl MeanWindow {
    pub(crate) fn new(length: NonZero<usize>) -> Self {
        Self {
            values: RingBuffer::new(length.get(), None),
            sum: 0.0,
            undefined: 0,
            #[allow(clippy::cast_precision_loss)]
            length_reciprocal: 1.0 / length.get() as f64,
        }
    }

    #[inline]
    pub(crate) fn push(&mut self, value: Option<Price>) -> Option<Price> {
        match self.values.push(value) {
            Some(Some(old)) => self.sum -= old,
            Some(None) => self.undefined -= 1,
            None => {}
        }

        match value {
            Some(price) => self.sum += price,
            None => self.undefined += 1,
        }

        (self.values.is_ready() && self.undefined == 0).then(|| self.sum * self.length_reciprocal)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Extremum {
    Max,
    Min,
}

impl Extremum {
    /// `true` when `candidate` makes `held` irrelevant for the rest of its
    /// lifetime in the window.
    #[inline]
    fn supersedes(self, candidate: Price, held: Price) -> bool {
        match self {
            Self::Max => candidate >= held,
            Self::Min => candidate <= held,
        }
    }
}

/// Streaming max or min over the last `length` positions.
///
/// Monotonic deque of `(position, value)`: the front is always the extremum
/// of the current window. Amortised O(1) per push.
#[derive(Clone, Debug)]
pub(crate) struct ExtremumWindow {
    kind: Extremum,
    length: usize,
    seen: usize,
    last_undefined: Option<usize>,
    candidates: VecDeque<(usize, Price)>,
}

impl ExtremumWindow {
    pub(crate) fn new(kind: Extremum, length: NonZero<usize>) -> Self {
        Self {
            kind,
            length: length.get(),
            seen: 0,
            last_undefined: None,
            candidates: VecDeque::with_capacity(length.get()),
        }
    }

    #[inline]
    pub(crate) fn push(&mut self, value: Option<Price>) -> Option<Price> {
        let position = self.seen;
        self.seen += 1;

        while self
            .candidates
            .front()
            .is_some_and(|&(i, _)| i + self.length <= position)
        {
            self.candidates.pop_front();
        }

        match value {
            Some(price) => {
                while self
                    .candidates
                    .back()
                    .is_some_and(|&(_, held)| self.kind.supersedes(price, held))
                {
                    self.candidates.pop_back();
                }
                self.candidates.push_back((position, price));
            }
            None => self.last_undefined = Some(position),
        }

        let ready = self.seen >= self.length
            && self
                .last_undefined
                .is_none_or(|i| i + self.length <= position);

        if ready {
            self.candidates.front().map(|&(_, price)| price)
        } else {
            None
        }
    }
}

/// Exponential smoother with `α = 2 / (span + 1)`.
///
/// Seeds on the first defined value. An undefined input yields no output
/// and leaves the state as it was.
#[derive(Clone, Debug)]
pub(crate) struct Smoother {
    alpha: f64,
    current: Option<Price>,
}

impl Smoother {
    pub(crate) fn new(span: NonZero<usize>) -> Self {
        Self {
            #[allow(clippy::cast_precision_loss)]
            alpha: 2.0 / (span.get() + 1) as f64,
            current: None,
        }
    }

    #[inline]
    pub(crate) fn push(&mut self, value: Option<Price>) -> Option<Price> {
        let price = value?;

        let next = match self.current {
            Some(previous) => self.alpha.mul_add(price - previous, previous),
            None => price,
        };
        self.current = Some(next);

        self.current
    }
}
