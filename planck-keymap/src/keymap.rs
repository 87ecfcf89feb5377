use strum::FromRepr;

use crate::action::{EncoderAction, KeyAction};
use crate::config::BehaviorConfig;
use crate::event::KeyEvent;
use crate::keycode::ModifierCombination;
use crate::{a, dual, encoder, k, layer, mt, shifted, td, tt, wm};

/// Rows of the electrical matrix, rows 0..=3 are the left half and 4..=7 the right half
pub const ROW: usize = 8;
/// Columns of the electrical matrix, per half
pub const COL: usize = 6;
pub const NUM_LAYER: usize = 4;
pub const NUM_ENCODER: usize = 1;

/// Layers of the Planck keymap
#[repr(u8)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, FromRepr)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Layer {
    Base = 0,
    Lower = 1,
    Raise = 2,
    Adjust = 3,
}

/// Custom backspace key, see [`crate::dual_function`]
pub const DUAL_FUNC_0: KeyAction = dual!(0);

#[cfg(feature = "mousekey")]
const SCROLL_DOWN: KeyAction = k!(MouseWheelDown);
#[cfg(feature = "mousekey")]
const SCROLL_UP: KeyAction = k!(MouseWheelUp);
#[cfg(not(feature = "mousekey"))]
const SCROLL_DOWN: KeyAction = k!(PageDown);
#[cfg(not(feature = "mousekey"))]
const SCROLL_UP: KeyAction = k!(PageUp);

/// Map a position of the printed 4x12 grid to the 8x6 matrix.
///
/// Columns 6..=11 belong to the right half, whose rows start at 4.
pub const fn matrix_position(visual_row: u8, visual_col: u8) -> Option<(u8, u8)> {
    if visual_row >= 4 || visual_col >= 12 {
        return None;
    }
    if visual_col < COL as u8 {
        Some((visual_row, visual_col))
    } else {
        Some((visual_row + 4, visual_col - COL as u8))
    }
}

#[rustfmt::skip]
pub const KEYMAP: [[[KeyAction; COL]; ROW]; NUM_LAYER] = [
    // Base
    layer!([
        [k!(Tab), k!(Q), k!(W), k!(E), k!(R), k!(T)],
        [td!(0), k!(A), k!(S), k!(D), k!(F), k!(G)],
        [DUAL_FUNC_0, k!(Z), k!(X), k!(C), k!(V), k!(B)],
        [wm!(LAlt, ModifierCombination::LSHIFT), a!(Transparent), k!(LGui), td!(3), mt!(Backslash, ModifierCombination::LSHIFT), td!(4)],
        [k!(Y), k!(U), k!(I), k!(O), k!(P), k!(Escape)],
        [k!(H), k!(J), k!(K), k!(L), k!(Semicolon), tt!(1)],
        [k!(N), k!(M), k!(Comma), k!(Dot), td!(1), td!(2)],
        [a!(No), td!(5), td!(6), mt!(Quote, ModifierCombination::RSHIFT), mt!(Slash, ModifierCombination::RCTRL), k!(Equal)]
    ]),
    // Lower
    layer!([
        [shifted!(Grave), k!(Kc1), k!(Kc2), k!(Kc3), k!(Kc4), k!(Kc5)],
        [k!(Delete), k!(Home), k!(Up), k!(End), k!(PageUp), k!(KpAsterisk)],
        [k!(Backspace), k!(Left), k!(Down), k!(Right), k!(PageDown), k!(KpSlash)],
        [a!(Transparent), a!(Transparent), a!(Transparent), k!(Backslash), k!(LShift), a!(Transparent)],
        [k!(Kc6), k!(Kc7), k!(Kc8), k!(Kc9), k!(Kc0), a!(Transparent)],
        [k!(KpPlus), k!(Kp4), k!(Kp5), k!(Kp6), k!(KpEqual), a!(Transparent)],
        [k!(KpMinus), k!(Kp1), k!(Kp2), k!(Kp3), a!(Transparent), a!(Transparent)],
        [a!(No), k!(KpComma), k!(Kp0), k!(KpDot), k!(Minus), k!(Equal)]
    ]),
    // Raise
    layer!([
        [a!(Transparent), k!(F1), k!(F2), k!(F3), k!(F4), k!(F5)],
        [a!(Transparent), k!(F7), k!(F8), k!(F9), k!(F10), k!(F11)],
        [a!(Transparent), a!(Transparent), a!(Transparent), a!(Transparent), a!(Transparent), a!(Transparent)],
        [a!(Transparent), a!(Transparent), a!(Transparent), a!(Transparent), a!(Transparent), a!(Transparent)],
        [k!(F6), a!(Transparent), a!(Transparent), a!(Transparent), a!(Transparent), a!(Transparent)],
        [k!(F12), a!(Transparent), a!(Transparent), a!(Transparent), a!(Transparent), a!(Transparent)],
        [a!(Transparent), a!(Transparent), a!(Transparent), a!(Transparent), a!(Transparent), a!(Transparent)],
        [a!(No), a!(Transparent), a!(Transparent), a!(Transparent), a!(Transparent), a!(Transparent)]
    ]),
    // Adjust
    layer!([
        [a!(Transparent), a!(Transparent), a!(Transparent), a!(Transparent), a!(Transparent), a!(Transparent)],
        [k!(Delete), a!(Transparent), k!(AudioOn), k!(AudioOff), k!(AudioToggle), a!(Transparent)],
        [a!(Transparent), a!(Transparent), k!(MusicOn), k!(MusicOff), k!(MusicToggle), a!(Transparent)],
        [a!(Transparent), a!(Transparent), a!(Transparent), a!(Transparent), a!(Transparent), a!(Transparent)],
        [a!(Transparent), a!(Transparent), a!(Transparent), a!(Transparent), a!(Transparent), a!(Transparent)],
        [a!(Transparent), a!(Transparent), a!(Transparent), a!(Transparent), a!(Transparent), k!(Bootloader)],
        [a!(Transparent), a!(Transparent), a!(Transparent), a!(Transparent), a!(Transparent), a!(Transparent)],
        [a!(No), a!(Transparent), a!(Transparent), a!(Transparent), a!(Transparent), a!(Transparent)]
    ]),
];

pub const fn get_default_keymap() -> [[[KeyAction; COL]; ROW]; NUM_LAYER] {
    KEYMAP
}

/// The encoder scrolls on every layer
pub const fn get_default_encoder_map() -> [[EncoderAction; NUM_ENCODER]; NUM_LAYER] {
    [
        [encoder!(SCROLL_DOWN, SCROLL_UP)],
        [encoder!(SCROLL_DOWN, SCROLL_UP)],
        [encoder!(SCROLL_DOWN, SCROLL_UP)],
        [encoder!(SCROLL_DOWN, SCROLL_UP)],
    ]
}

/// Keymap represents the stack of layers.
///
/// The conception of Keymap is borrowed from qmk: <https://docs.qmk.fm/#/keymap>.
///
/// Keymap is bound to the 8x6 matrix of the Planck rev6. The firmware detects key strokes and
/// uses `(row, col, layer)` to retrieve the action from Keymap.
pub struct KeyMap<'a> {
    /// Layers
    layers: &'a mut [[[KeyAction; COL]; ROW]; NUM_LAYER],
    /// Rotary encoders, each rotary encoder is represented as (Clockwise, CounterClockwise)
    encoders: Option<&'a mut [[EncoderAction; NUM_ENCODER]; NUM_LAYER]>,
    /// Current state of each layer
    layer_state: [bool; NUM_LAYER],
    /// Default layer number, max: 32
    default_layer: u8,
    /// Layer cache, the layer a pressed key was resolved on, used when releasing it
    layer_cache: [[u8; COL]; ROW],
    behavior: BehaviorConfig,
}

impl<'a> KeyMap<'a> {
    pub fn new(
        action_map: &'a mut [[[KeyAction; COL]; ROW]; NUM_LAYER],
        encoder_map: Option<&'a mut [[EncoderAction; NUM_ENCODER]; NUM_LAYER]>,
        behavior: BehaviorConfig,
    ) -> Self {
        KeyMap {
            layers: action_map,
            encoders: encoder_map,
            layer_state: [false; NUM_LAYER],
            default_layer: 0,
            layer_cache: [[0; COL]; ROW],
            behavior,
        }
    }

    /// Fetch the action in keymap, with layer cache
    pub fn get_action_with_layer_cache(&mut self, key_event: KeyEvent) -> KeyAction {
        let row = key_event.row as usize;
        let col = key_event.col as usize;
        if row >= ROW || col >= COL {
            warn!("Key ({}, {}) is outside of the matrix", row, col);
            return KeyAction::No;
        }
        if !key_event.pressed {
            // Releasing a pressed key, use cached layer and restore the cache
            let layer = self.pop_layer_from_cache(row, col);
            return match self.layers[layer as usize][row][col] {
                // Transparent on every layer when pressed, release it the same way
                KeyAction::Transparent => KeyAction::No,
                action => action,
            };
        }

        // Iterate from higher layer to lower layer, the lowest checked layer is the default layer
        for (layer_idx, layer) in self.layers.iter().enumerate().rev() {
            if self.layer_state[layer_idx] || layer_idx as u8 == self.default_layer {
                let action = layer[row][col];
                if action == KeyAction::Transparent {
                    continue;
                }

                // Found a valid action in the layer, cache it
                self.save_layer_cache(row, col, layer_idx as u8);

                return action;
            }
        }

        KeyAction::No
    }

    /// Encoder action on the highest active layer
    pub fn get_encoder_action(&self, id: usize) -> Option<EncoderAction> {
        let layer = self.get_activated_layer();
        match &self.encoders {
            Some(encoders) => encoders[layer as usize].get(id).copied(),
            None => None,
        }
    }

    pub fn get_activated_layer(&self) -> u8 {
        for (layer_idx, _) in self.layers.iter().enumerate().rev() {
            if self.layer_state[layer_idx] || layer_idx as u8 == self.default_layer {
                return layer_idx as u8;
            }
        }

        self.default_layer
    }

    pub fn is_layer_on(&self, layer: Layer) -> bool {
        self.layer_state.get(layer as usize).copied().unwrap_or(false)
    }

    /// Active layers as a bitmask, bit n is layer n
    pub fn layer_state(&self) -> u32 {
        self.layer_state
            .iter()
            .enumerate()
            .filter(|(_, on)| **on)
            .fold(0, |state, (i, _)| state | (1 << i))
    }

    fn pop_layer_from_cache(&mut self, row: usize, col: usize) -> u8 {
        let layer = self.layer_cache[row][col];
        self.layer_cache[row][col] = self.default_layer;

        layer
    }

    fn save_layer_cache(&mut self, row: usize, col: usize, layer_num: u8) {
        self.layer_cache[row][col] = layer_num;
    }

    /// Update Tri Layer state, the third layer is on iff the other two are
    fn update_tri_layer(&mut self) {
        if let Some(ref tri_layer) = self.behavior.tri_layer {
            self.layer_state[tri_layer[2] as usize] =
                self.layer_state[tri_layer[0] as usize] && self.layer_state[tri_layer[1] as usize];
        }
    }

    fn check_layer(&self, layer_num: u8) -> bool {
        if layer_num as usize >= NUM_LAYER {
            warn!(
                "Not a valid layer {}, keyboard supports only {} layers",
                layer_num, NUM_LAYER
            );
            return false;
        }
        true
    }

    /// Activate given layer
    pub fn activate_layer(&mut self, layer_num: u8) {
        if !self.check_layer(layer_num) {
            return;
        }
        self.layer_state[layer_num as usize] = true;
        self.update_tri_layer();
        debug!("Layer state: {:b}", self.layer_state());
    }

    /// Deactivate given layer
    pub fn deactivate_layer(&mut self, layer_num: u8) {
        if !self.check_layer(layer_num) {
            return;
        }
        self.layer_state[layer_num as usize] = false;
        self.update_tri_layer();
        debug!("Layer state: {:b}", self.layer_state());
    }

    /// Toggle given layer
    pub fn toggle_layer(&mut self, layer_num: u8) {
        if !self.check_layer(layer_num) {
            return;
        }
        self.layer_state[layer_num as usize] = !self.layer_state[layer_num as usize];
        self.update_tri_layer();
        debug!("Layer state: {:b}", self.layer_state());
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::action::Action;
    use crate::keycode::KeyCode;

    #[test]
    fn test_matrix_position() {
        assert_eq!(matrix_position(0, 0), Some((0, 0)));
        assert_eq!(matrix_position(0, 11), Some((4, 5)));
        assert_eq!(matrix_position(3, 6), Some((7, 0)));
        assert_eq!(matrix_position(2, 5), Some((2, 5)));
        assert_eq!(matrix_position(4, 0), None);
        assert_eq!(matrix_position(0, 12), None);
    }

    #[test]
    fn test_base_layer_spot_checks() {
        let base = &KEYMAP[Layer::Base as usize];
        assert_eq!(base[0][0], k!(Tab));
        assert_eq!(base[4][5], k!(Escape));
        assert_eq!(base[2][0], KeyAction::DualFunction(0));
        assert_eq!(base[1][0], KeyAction::TapDance(0));
        assert_eq!(
            base[5][5],
            KeyAction::TapHold(Action::LayerToggle(1), Action::LayerOn(1))
        );
        assert_eq!(
            base[3][4],
            KeyAction::TapHold(
                Action::Key(KeyCode::Backslash),
                Action::Modifier(ModifierCombination::LSHIFT)
            )
        );
        assert_eq!(
            base[3][0],
            KeyAction::Single(Action::KeyWithModifier(KeyCode::LAlt, ModifierCombination::LSHIFT))
        );
        assert_eq!(base[7][0], KeyAction::No);
    }

    #[test]
    fn test_bottom_left_of_right_half_is_no_on_every_layer() {
        for layer in KEYMAP.iter() {
            assert_eq!(layer[7][0], KeyAction::No);
        }
    }

    #[test]
    fn test_adjust_layer_firmware_keys() {
        let adjust = &KEYMAP[Layer::Adjust as usize];
        assert_eq!(adjust[5][5], k!(Bootloader));
        assert_eq!(adjust[1][2], k!(AudioOn));
        assert_eq!(adjust[2][4], k!(MusicToggle));
    }
}
