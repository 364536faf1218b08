/// Fixed-capacity FIFO that hands back the evicted slot once full.
#[derive(Clone, Debug)]
pub(crate) struct RingBuffer<T: Copy> {
    buffer: Vec<T>,
    head: usize,
    len: usize,
}

impl<T: Copy> RingBuffer<T> {
    /// Creates an empty buffer. `fill` only pre-sizes storage and is never
    /// returned from [`push`](Self::push).
    #[must_use]
    pub(crate) fn new(capacity: usize, fill: T) -> Self {
        Self {
            buffer: vec![fill; capacity],
            head: 0,
            len: 0,
        }
    }

    #[inline]
    pub(crate) fn is_ready(&self) -> bool {
        self.len == self.buffer.len()
    }

    #[inline]
    pub(crate) fn push(&mut self, value: T) -> Option<T> {
        if self.is_ready() {
            let old = self.buffer[self.head];

            self.buffer[self.head] = value;

            self.head += 1;
            if self.head == self.buffer.len() {
                self.head = 0;
            }

            Some(old)
        } else {
            self.buffer[self.len] = value;
            self.len += 1;

            None
        }
    }
}
