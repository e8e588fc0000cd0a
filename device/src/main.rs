//! Ticklet device code.
//!
//! The code was developed for an Arduino Pro Micro with an ATmega32u4 running at 5V.
//! Hardware components used:
//! - TIMER0
//! - Pins: PD1 (K1), PD0 (K2), PD4 (RESET), PC6 (BOOT), PD7 (RESET LED), PE6 (BOOT LED)

#![no_std]
#![no_main]

use arduino_hal::{Delay, Pins};
use avr_device::{asm::sleep, interrupt};
use device::{INPUT_CODES, input::setup_input_monitor, shared_state::SHARED_STATE};
use panic_halt as _;
use ticklet::{Config, Dispatcher, PinIndicators, Polarities};

#[arduino_hal::entry]
fn main() -> ! {
    let peripherals = arduino_hal::Peripherals::take().unwrap();
    let timer = peripherals.TC0;

    let Pins {
        d2: k1_pin,
        d3: k2_pin,
        d4: reset_pin,
        d5: boot_pin,
        d6: reset_led_pin,
        d7: boot_led_pin,
        ..
    } = arduino_hal::pins!(peripherals);

    let indicators = PinIndicators::new(
        reset_led_pin.into_output().downgrade(),
        boot_led_pin.into_output().downgrade(),
    );

    let config = Config {
        input_codes: &INPUT_CODES,
        polarities: Polarities::default(),
    };

    // Both lines are active-low, so they start out high to avoid glitching the target.
    let Ok(mut dispatcher) = Dispatcher::new(
        config,
        reset_pin.into_output_high().downgrade(),
        boot_pin.into_output_high().downgrade(),
        indicators,
        Delay::new(),
    ) else {
        // No events may be dispatched with the lines in an unknown state.
        panic!();
    };

    setup_input_monitor(
        &timer,
        k1_pin.into_pull_up_input().downgrade(),
        k2_pin.into_pull_up_input().downgrade(),
    );

    // Enable interrupts globally.
    unsafe { interrupt::enable() };

    loop {
        // NOTE: The critical section only covers popping the event. Sequences block for up to
        //       400ms and run with interrupts enabled so edges keep getting queued.
        let event = interrupt::free(|cs| SHARED_STATE.borrow(cs).borrow_mut().pop_event());

        match event {
            // Output writes on this board cannot fail.
            Some(event) => {
                dispatcher.dispatch(event).ok();
            }
            None => sleep(),
        }
    }
}
