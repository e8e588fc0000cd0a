use core::cell::RefCell;

use avr_device::interrupt::Mutex;
use ticklet::{EventQueue, InputEvent};

/// Mutex locked state shared between the input interrupt and the main loop.
pub static SHARED_STATE: Mutex<RefCell<SharedState>> = Mutex::new(RefCell::new(SharedState::new()));

#[derive(Debug)]
pub struct SharedState {
    /// Key edges waiting to be dispatched. Fills up while a sequence blocks the main loop.
    event_queue: EventQueue<{ Self::EVENT_QUEUE_SIZE }>,
}

impl SharedState {
    /// Far more edges than a person can produce while the longest sequence (400ms) runs.
    const EVENT_QUEUE_SIZE: usize = 16;

    const fn new() -> Self {
        Self {
            event_queue: EventQueue::new(),
        }
    }

    /// Queues an event. When the queue is full the event is dropped, so queued presses never lose
    /// their release.
    #[inline]
    pub fn push_event(&mut self, event: InputEvent) {
        self.event_queue.push(event);
    }

    /// Pops the oldest queued event.
    #[inline]
    pub fn pop_event(&mut self) -> Option<InputEvent> {
        self.event_queue.pop()
    }
}
