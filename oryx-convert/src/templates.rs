//! Build files written next to the converted `keymap.c`.

/// Vial UID, changing the last byte forces a layout reset in Vial
pub const VIAL_KEYBOARD_UID: [u8; 8] = [0x89, 0xAB, 0xCD, 0xEF, 0x01, 0x23, 0x45, 0x77];

/// Esc at the top left and Backspace at the top right
pub const VIAL_UNLOCK_KEYS: [(u8, u8); 2] = [(0, 0), (4, 5)];

pub const RULES_MK: &str = "# Generated by oryx-convert
# Planck Rev6 Vial Keymap Build Rules

# Vial support (dynamic remapping GUI)
VIAL_ENABLE = yes

# Tap dance support (required for TD() keycodes)
TAP_DANCE_ENABLE = yes

# Disable Vial's built-in tap dance (using QMK's native implementation)
VIAL_TAP_DANCE_ENABLE = no

# Audio support (Planck Rev6 has speaker/buzzer)
AUDIO_ENABLE = yes

# Music mode support (for encoder and audio features)
MUSIC_ENABLE = yes

# Link-Time Optimization (reduces firmware size)
LTO_ENABLE = yes

# Introspection fix
COMBO_ENABLE = yes
KEY_OVERRIDE_ENABLE = yes
";

/// `config.h` with the Vial UID and unlock combo
pub fn config_h(uid: &[u8; 8], unlock_keys: &[(u8, u8)]) -> String {
    let uid = uid
        .iter()
        .map(|b| format!("0x{b:02X}"))
        .collect::<Vec<_>>()
        .join(", ");
    let rows = unlock_keys
        .iter()
        .map(|(r, _)| r.to_string())
        .collect::<Vec<_>>()
        .join(", ");
    let cols = unlock_keys
        .iter()
        .map(|(_, c)| c.to_string())
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "#pragma once

/* Vial Configuration for Planck Rev6 */

/* 1. Vial UID - Unique identifier for this keyboard in Vial app */
/* Change the last byte to force a layout reset if needed */
#define VIAL_KEYBOARD_UID {{{uid}}}

/* 2. Unlock Combo - Press these keys simultaneously to unlock Vial editing */
/* Planck matrix: Left half = rows 0-3, Right half = rows 4-7, Cols = 0-5 */
#define VIAL_UNLOCK_COMBO_ROWS {{ {rows} }}
#define VIAL_UNLOCK_COMBO_COLS {{ {cols} }}
"
    )
}
