//! Vial encoding of the keymap.
//!
//! Note: vial uses little endian, while the dynamic keymap (via) uses big endian

mod keycode_convert;
mod vial_lock;

use byteorder::{BigEndian, ByteOrder, LittleEndian};
pub use keycode_convert::{from_via_keycode, to_via_keycode};
pub use vial_lock::VialLock;

use crate::action::KeyAction;
use crate::keymap::{COL, NUM_LAYER, ROW};

pub const VIAL_PROTOCOL_VERSION: u32 = 6;

/// Size of the dynamic keymap, two bytes per key
pub const KEYMAP_BUFFER_SIZE: usize = NUM_LAYER * ROW * COL * 2;

/// Answer to Vial's `GetKeyboardId`: protocol version followed by the keyboard uid
pub fn keyboard_id_response(vial_keyboard_id: &[u8], out: &mut [u8; 12]) {
    LittleEndian::write_u32(&mut out[0..4], VIAL_PROTOCOL_VERSION);
    let len = vial_keyboard_id.len().min(8);
    out[4..4 + len].copy_from_slice(&vial_keyboard_id[..len]);
}

/// Serialize all layers row-major, as Vial reads the dynamic keymap
pub fn keymap_to_buffer(layers: &[[[KeyAction; COL]; ROW]; NUM_LAYER], buf: &mut [u8; KEYMAP_BUFFER_SIZE]) {
    let keys = layers.iter().flatten().flatten();
    for (chunk, action) in buf.chunks_exact_mut(2).zip(keys) {
        BigEndian::write_u16(chunk, to_via_keycode(*action));
    }
}

/// Load a keymap written by Vial
pub fn keymap_from_buffer(buf: &[u8; KEYMAP_BUFFER_SIZE], layers: &mut [[[KeyAction; COL]; ROW]; NUM_LAYER]) {
    let keys = layers.iter_mut().flatten().flatten();
    for (chunk, action) in buf.chunks_exact(2).zip(keys) {
        *action = from_via_keycode(BigEndian::read_u16(chunk));
    }
}

/// Offset of a key in the dynamic keymap
pub fn keymap_offset(layer: usize, row: usize, col: usize) -> Option<usize> {
    if layer >= NUM_LAYER || row >= ROW || col >= COL {
        return None;
    }
    Some(((layer * ROW + row) * COL + col) * 2)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::keymap::{KEYMAP, Layer, get_default_keymap};

    #[test]
    fn test_keymap_buffer_layout() {
        let mut buf = [0; KEYMAP_BUFFER_SIZE];
        keymap_to_buffer(&KEYMAP, &mut buf);

        // KC_TAB at the first key of the base layer
        assert_eq!(&buf[0..2], &[0x00, 0x2B]);
        // KC_ESC, base layer (4, 5)
        let offset = keymap_offset(0, 4, 5).unwrap();
        assert_eq!(BigEndian::read_u16(&buf[offset..]), 0x0029);
        // QK_BOOT, adjust layer (5, 5)
        let offset = keymap_offset(Layer::Adjust as usize, 5, 5).unwrap();
        assert_eq!(BigEndian::read_u16(&buf[offset..]), 0x7C00);
        assert_eq!(keymap_offset(4, 0, 0), None);

        let mut layers = [[[KeyAction::No; COL]; ROW]; NUM_LAYER];
        keymap_from_buffer(&buf, &mut layers);
        assert_eq!(layers, get_default_keymap());
    }

    #[test]
    fn test_keyboard_id_response() {
        let mut out = [0; 12];
        keyboard_id_response(&crate::config::VIAL_KEYBOARD_UID, &mut out);
        assert_eq!(&out[0..4], &[6, 0, 0, 0]);
        assert_eq!(&out[4..], &[0x89, 0xAB, 0xCD, 0xEF, 0x01, 0x23, 0x45, 0x77]);
    }
}
