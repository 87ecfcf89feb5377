//! Keymap of the OLKB Planck rev6: four layers, seven tap dances, a custom
//! backspace key and an encoder that scrolls.
//!
//! Everything here is data and short callbacks. Matrix scanning, tap/hold
//! timing and USB reports are left to the firmware, which talks to this crate
//! through [`reporter::KeyReporter`].
#![cfg_attr(not(test), no_std)]

// This mod MUST go first, so that the others see its macros.
pub(crate) mod fmt;

pub mod action;
pub mod config;
pub mod dual_function;
pub mod encoder;
pub mod event;
pub mod keycode;
pub mod keymap;
pub mod layout_macro;
pub mod reporter;
pub mod tap_dance;
pub mod vial;

pub use keymap::{COL, KeyMap, Layer, NUM_ENCODER, NUM_LAYER, ROW};
