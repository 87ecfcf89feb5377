//! Rotary encoder handling.
//!
//! The encoder scrolls the mouse wheel. With audio enabled and music "muse"
//! mode running, it changes the muse offset while Raise is held and the muse
//! tempo otherwise.

use crate::action::{Action, KeyAction};
use crate::keycode::KeyCode;
use crate::keymap::{KeyMap, Layer, NUM_ENCODER};
use crate::reporter::KeyReporter;

#[cfg(feature = "mousekey")]
const SCROLL_DOWN: KeyCode = KeyCode::MouseWheelDown;
#[cfg(feature = "mousekey")]
const SCROLL_UP: KeyCode = KeyCode::MouseWheelUp;
#[cfg(not(feature = "mousekey"))]
const SCROLL_DOWN: KeyCode = KeyCode::PageDown;
#[cfg(not(feature = "mousekey"))]
const SCROLL_UP: KeyCode = KeyCode::PageUp;

/// The encoder direction is either `Clockwise`, `CounterClockwise`, or `None`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    /// A clockwise turn
    Clockwise,
    /// A counterclockwise turn
    CounterClockwise,
    /// No change
    None,
}

/// Music mode sequencer settings driven by the encoder
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MusicState {
    pub muse_mode: bool,
    /// Base note of the sequencer
    pub muse_offset: u8,
    pub muse_tempo: u16,
}

impl Default for MusicState {
    fn default() -> Self {
        Self {
            muse_mode: false,
            muse_offset: 70,
            muse_tempo: 50,
        }
    }
}

/// Handle one step of encoder `id`
pub fn encoder_update<R: KeyReporter>(
    id: usize,
    direction: Direction,
    keymap: &KeyMap,
    music: &mut MusicState,
    reporter: &mut R,
) {
    if id >= NUM_ENCODER {
        warn!("Encoder {} is not defined", id);
        return;
    }
    let clockwise = match direction {
        Direction::Clockwise => true,
        Direction::CounterClockwise => false,
        Direction::None => return,
    };

    #[cfg(feature = "audio")]
    if music.muse_mode {
        if keymap.is_layer_on(Layer::Raise) {
            music.muse_offset = if clockwise {
                music.muse_offset.wrapping_add(1)
            } else {
                music.muse_offset.wrapping_sub(1)
            };
        } else {
            music.muse_tempo = if clockwise {
                music.muse_tempo.wrapping_add(1)
            } else {
                music.muse_tempo.wrapping_sub(1)
            };
        }
        debug!("Muse offset {}, tempo {}", music.muse_offset, music.muse_tempo);
        return;
    }
    #[cfg(not(feature = "audio"))]
    let _ = music;

    // Without an encoder map the wheel scrolls
    let action = keymap
        .get_encoder_action(id)
        .and_then(|e| {
            if clockwise {
                e.clockwise().tap_action()
            } else {
                e.counter_clockwise().tap_action()
            }
        })
        .unwrap_or(Action::Key(if clockwise { SCROLL_DOWN } else { SCROLL_UP }));
    reporter.tap(action);
}

/// Whether music mode captures a key. Lower and Raise keep working as layer keys.
pub fn music_mask(action: KeyAction) -> bool {
    !matches!(
        action,
        KeyAction::Single(Action::LayerOn(layer)) if layer == Layer::Lower as u8 || layer == Layer::Raise as u8
    )
}
