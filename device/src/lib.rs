#![no_std]
#![feature(abi_avr_interrupt)]

pub mod input;
pub mod shared_state;

use ticklet::DEFAULT_INPUT_CODES;

/// Input codes reported by the buttons. K1 reports the code at index 1, K2 the one at index 2.
pub const INPUT_CODES: [u16; 3] = DEFAULT_INPUT_CODES;
