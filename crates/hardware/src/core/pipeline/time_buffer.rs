//! Delayed inter-stage communication buffer.
//!
//! Pipeline stages do not see each other's outputs instantly: a signal
//! written by commit this cycle reaches the IQ `commit_to_iew_delay` cycles
//! later. [`TimeBuffer`] models that as a ring of slots indexed relative to
//! the current cycle: negative offsets read the past, positive offsets write
//! the future, and `advance()` moves the window forward one cycle, recycling
//! the slot that falls off the back.

/// Ring buffer of per-cycle slots with a sliding "now".
#[derive(Debug)]
pub struct TimeBuffer<T: Default> {
    slots: Vec<T>,
    /// Index of the slot for relative offset `-past` (the oldest visible slot).
    base: usize,
    past: usize,
    future: usize,
}

impl<T: Default> TimeBuffer<T> {
    /// Creates a buffer able to hold `past` cycles of history and `future`
    /// cycles of forwarded writes, plus the current cycle.
    pub fn new(past: usize, future: usize) -> Self {
        let len = past + future + 1;
        let mut slots = Vec::with_capacity(len);
        slots.resize_with(len, T::default);
        Self {
            slots,
            base: 0,
            past,
            future,
        }
    }

    fn index_of(&self, rel: isize) -> usize {
        assert!(
            rel >= -(self.past as isize) && rel <= self.future as isize,
            "time buffer offset {} outside [-{}, {}]",
            rel,
            self.past,
            self.future
        );
        let off = (rel + self.past as isize) as usize;
        (self.base + off) % self.slots.len()
    }

    /// Reads the slot at `rel` cycles from now (use a negative offset for
    /// signals produced in earlier cycles).
    pub fn read(&self, rel: isize) -> &T {
        &self.slots[self.index_of(rel)]
    }

    /// Writable access to the slot at `rel` cycles from now.
    pub fn write(&mut self, rel: isize) -> &mut T {
        let idx = self.index_of(rel);
        &mut self.slots[idx]
    }

    /// Moves the window forward one cycle. The slot that drops out of the
    /// past becomes the new farthest-future slot and is reset.
    pub fn advance(&mut self) {
        self.base = (self.base + 1) % self.slots.len();
        let idx = self.index_of(self.future as isize);
        self.slots[idx] = T::default();
    }
}
