use circular_buffer::CircularBuffer;

use crate::InputEvent;

/// FIFO holding edges while a sequence blocks the dispatching context.
///
/// When full, new events are dropped and queued ones are kept. Dropping the oldest event instead
/// could lose a press whose release is still queued, and the release would then run on its own,
/// e.g. an alternate reset release pulsing RESET without BOOT ever having been held.
#[derive(Debug)]
pub struct EventQueue<const N: usize>(CircularBuffer<N, InputEvent>);

impl<const N: usize> EventQueue<N> {
    #[must_use]
    pub const fn new() -> Self {
        Self(CircularBuffer::new())
    }

    /// Pushes an event to the front of the queue.
    ///
    /// Returns `false` if the queue was full and the event got dropped.
    #[inline]
    pub fn push(&mut self, event: InputEvent) -> bool {
        if self.0.is_full() {
            return false;
        }

        self.0.push_front(event);
        true
    }

    /// Pops the oldest event from the back of the queue.
    #[inline]
    pub fn pop(&mut self) -> Option<InputEvent> {
        self.0.pop_back()
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<const N: usize> Default for EventQueue<N> {
    fn default() -> Self {
        Self::new()
    }
}
