use core::cell::RefCell;

use arduino_hal::{
    hal::port::Dynamic,
    pac::TC0,
    port::{
        Pin,
        mode::{Input, PullUp},
    },
};
use avr_device::{interrupt, interrupt::Mutex};
use ticklet::{InputEvent, Key};

use crate::{INPUT_CODES, shared_state::SHARED_STATE};

pub type KeyPin = Pin<Input<PullUp>, Dynamic>;

/// Key monitors, used exclusively from the `TIMER0_COMPA` interrupt once set up.
static INPUT_MONITOR: Mutex<RefCell<Option<InputMonitor>>> = Mutex::new(RefCell::new(None));

/// Sets up `TIMER0_COMPA` to trigger every millisecond and starts monitoring the key pins.
///
/// Timer comparison value formula: 16 MHz / (64 * (1 + 249)) = 1000 Hz
pub fn setup_input_monitor(timer: &TC0, k1_pin: KeyPin, k2_pin: KeyPin) {
    // WGM
    timer.tccr0a.write(|w| w.wgm0().bits(0b10));
    timer.tccr0b.write(|w| w.wgm02().clear_bit());

    // Prescaler
    timer.tccr0b.write(|w| w.cs0().prescale_64());
    timer.ocr0a.write(|w| w.bits(249));

    // Enable the timer interrupt
    timer.timsk0.write(|w| w.ocie0a().set_bit());

    let monitor = InputMonitor([
        KeyMonitor::new(Key::K1, k1_pin),
        KeyMonitor::new(Key::K2, k2_pin),
    ]);

    interrupt::free(|cs| {
        INPUT_MONITOR.borrow(cs).replace(Some(monitor));
    });
}

#[interrupt(atmega32u4)]
fn TIMER0_COMPA() {
    interrupt::free(|cs| {
        let mut monitor = INPUT_MONITOR.borrow(cs).borrow_mut();
        let Some(monitor) = monitor.as_mut() else {
            return;
        };

        let shared_state = &mut *SHARED_STATE.borrow(cs).borrow_mut();

        for key_monitor in &mut monitor.0 {
            if let Some(pressed) = key_monitor.sample() {
                shared_state.push_event(InputEvent::key(key_monitor.code, pressed));
            }
        }
    });
}

struct InputMonitor([KeyMonitor; 2]);

/// A physical key, active-low.
///
/// A level only counts once the pin reads the same for 8 consecutive samples, so every reported
/// change is a clean edge and presses and releases always alternate.
struct KeyMonitor {
    code: u16,
    pin: KeyPin,
    /// One bit per sample, newest in the lowest bit. `1` means pressed.
    samples: u8,
    pressed: bool,
}

impl KeyMonitor {
    #[inline]
    fn new(key: Key, pin: KeyPin) -> Self {
        Self {
            code: INPUT_CODES[key.input_index()],
            pin,
            samples: 0,
            pressed: false,
        }
    }

    /// Samples the pin, returning the new state if it just changed.
    #[inline]
    fn sample(&mut self) -> Option<bool> {
        self.samples = (self.samples << 1) | u8::from(self.pin.is_low());

        let pressed = match self.samples {
            u8::MAX => true,
            0 => false,
            _ => return None,
        };

        if pressed == self.pressed {
            return None;
        }

        self.pressed = pressed;
        Some(pressed)
    }
}
