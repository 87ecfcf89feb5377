//! Custom dual-function keys.
//!
//! A dual-function key sends one action when tapped and another when held. The
//! firmware reports the tap count on press: a non-zero count means the key was
//! tapped, zero means it is held past the tapping term.

use crate::action::{Action, KeyAction};
use crate::event::KeyRecord;
use crate::keycode::{KeyCode, ModifierCombination};
use crate::reporter::KeyReporter;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DualFunction {
    pub tap: Action,
    pub hold: Action,
    /// Keycode Vial shows for this key. Vial cannot express custom keys, it
    /// stores this placeholder and never executes it.
    pub vial_keycode: u16,
}

/// Layer-tap on a layer that doesn't exist, `LT(5, KC_D)`
const DUAL_FUNC_0_VIAL_KEYCODE: u16 = 0x4507;

pub const DUAL_FUNCTIONS: [DualFunction; 1] = [
    // Backspace, ctrl+backspace (delete word) when held
    DualFunction {
        tap: Action::Key(KeyCode::Backspace),
        hold: Action::KeyWithModifier(KeyCode::Backspace, ModifierCombination::LCTRL),
        vial_keycode: DUAL_FUNC_0_VIAL_KEYCODE,
    },
];

/// Dual-function key whose Vial placeholder is `keycode`
pub fn find_by_vial_keycode(keycode: u16) -> Option<u8> {
    DUAL_FUNCTIONS
        .iter()
        .position(|f| f.vial_keycode == keycode)
        .map(|i| i as u8)
}

/// Handle a key before the firmware does.
///
/// Returns `false` when the key is fully handled here and the firmware must skip it,
/// `true` to let the firmware process it as usual.
pub fn process_record_user<R: KeyReporter>(action: KeyAction, record: &KeyRecord, reporter: &mut R) -> bool {
    let KeyAction::DualFunction(index) = action else {
        return true;
    };
    let Some(function) = DUAL_FUNCTIONS.get(index as usize) else {
        warn!("Dual function {} is not defined", index);
        return true;
    };

    let action = if record.tap_count > 0 {
        function.tap
    } else {
        function.hold
    };
    if record.event.pressed {
        reporter.register(action);
    } else {
        reporter.unregister(action);
    }
    false
}
