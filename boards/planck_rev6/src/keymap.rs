//! The Planck keymap tables expressed as RMK actions.
//!
//! Tap dances become RMK morse keys, one morse per dance at the same index.
//! The triple tap of dance `i` runs keyboard macro `i`, which taps the burst key
//! three times. RMK has no counterpart for the interrupted double tap or the
//! repeats after the third tap, those patterns are left out.

use planck_keymap::action::{
    Action as PlanckAction, EncoderAction as PlanckEncoderAction, KeyAction as PlanckKeyAction,
};
use planck_keymap::config::TAPPING_TERM_MS;
use planck_keymap::dual_function::DUAL_FUNCTIONS;
use planck_keymap::keycode::{KeyCode as PlanckKeyCode, ModifierCombination as PlanckModifiers};
use planck_keymap::keymap::{get_default_encoder_map as planck_encoder_map, get_default_keymap as planck_keymap};
use planck_keymap::tap_dance::{TAP_DANCE_NUM, TAP_DANCES, TapDance, TapPattern};
use rmk::keyboard_macros::MacroOperation;
use rmk::morse::{DOUBLE_TAP, HOLD, HOLD_AFTER_TAP, Morse, MorsePattern, TAP};
use rmk::types::action::{Action, EncoderAction, KeyAction, MorseProfile};
use rmk::types::keycode::KeyCode;
use rmk::types::modifier::ModifierCombination;

pub(crate) use planck_keymap::{COL, NUM_ENCODER, NUM_LAYER, ROW};

/// Hold and gap timeout of every tap/hold and morse key
pub(crate) const PROFILE: MorseProfile =
    MorseProfile::new(None, None, Some(TAPPING_TERM_MS as u16), Some(TAPPING_TERM_MS as u16));

fn keycode(keycode: PlanckKeyCode) -> KeyCode {
    // The speaker is not driven
    if keycode.is_audio() {
        return KeyCode::No;
    }
    // Both keycode tables share QMK's numbering
    KeyCode::from(keycode as u16)
}

fn modifiers(modifiers: PlanckModifiers) -> ModifierCombination {
    ModifierCombination::from_bits(modifiers.to_bits())
}

fn action(action: PlanckAction) -> Action {
    match action {
        PlanckAction::Key(k) => Action::Key(keycode(k)),
        PlanckAction::Modifier(m) => Action::Modifier(modifiers(m)),
        PlanckAction::KeyWithModifier(k, m) => Action::KeyWithModifier(keycode(k), modifiers(m)),
        PlanckAction::LayerOn(layer) => Action::LayerOn(layer),
        PlanckAction::LayerOff(layer) => Action::LayerOff(layer),
        PlanckAction::LayerToggle(layer) => Action::LayerToggle(layer),
        PlanckAction::TriggerMacro(index) => Action::TriggerMacro(index),
    }
}

fn key_action(key_action: PlanckKeyAction) -> KeyAction {
    match key_action {
        PlanckKeyAction::No => KeyAction::No,
        PlanckKeyAction::Transparent => KeyAction::Transparent,
        PlanckKeyAction::Single(a) => KeyAction::Single(action(a)),
        PlanckKeyAction::TapHold(tap, hold) => KeyAction::TapHold(action(tap), action(hold), PROFILE),
        PlanckKeyAction::TapDance(index) => KeyAction::Morse(index),
        // A tap/hold key sends the same actions as the custom key
        PlanckKeyAction::DualFunction(index) => match DUAL_FUNCTIONS.get(index as usize) {
            Some(f) => KeyAction::TapHold(action(f.tap), action(f.hold), PROFILE),
            None => {
                defmt::warn!("Dual function {} is not defined", index);
                KeyAction::No
            }
        },
    }
}

fn encoder_action(encoder_action: PlanckEncoderAction) -> EncoderAction {
    EncoderAction::new(
        key_action(encoder_action.clockwise()),
        key_action(encoder_action.counter_clockwise()),
    )
}

pub(crate) fn get_default_keymap() -> [[[KeyAction; COL]; ROW]; NUM_LAYER] {
    planck_keymap().map(|layer| layer.map(|row| row.map(key_action)))
}

pub(crate) fn get_default_encoder_map() -> [[EncoderAction; NUM_ENCODER]; NUM_LAYER] {
    planck_encoder_map().map(|layer| layer.map(encoder_action))
}

fn morse_pattern(pattern: TapPattern) -> MorsePattern {
    match pattern {
        TapPattern::Tap => TAP,
        TapPattern::Hold => HOLD,
        TapPattern::DoubleTap => DOUBLE_TAP,
        TapPattern::HoldAfterTap => HOLD_AFTER_TAP,
        TapPattern::TripleTap => DOUBLE_TAP.followed_by_tap(),
    }
}

fn morse(index: u8, dance: &TapDance) -> Morse {
    let mut morse = Morse::new_from_vial(Action::No, Action::No, Action::No, Action::No, PROFILE);
    // Macro `index` holds the burst of this dance
    for (pattern, a) in dance.to_patterns(index) {
        if morse.put(morse_pattern(pattern), action(a)).is_err() {
            defmt::warn!("Tap dance {}: pattern {} does not fit", index, pattern);
        }
    }
    morse
}

/// Morse keys for `KeyAction::Morse(i)`, in tap dance order
pub(crate) fn tap_dance_morses() -> impl Iterator<Item = Morse> {
    TAP_DANCES.iter().enumerate().map(|(i, dance)| morse(i as u8, dance))
}

/// Keyboard macros in tap dance order, macro `i` taps the burst key of dance `i`
pub(crate) fn burst_macros<const N: usize>() -> [heapless::Vec<MacroOperation, N>; TAP_DANCE_NUM] {
    TAP_DANCES.each_ref().map(|dance| {
        let mut sequence = heapless::Vec::new();
        for k in dance.burst_sequence().into_iter().flatten() {
            if sequence.push(MacroOperation::Tap(keycode(k))).is_err() {
                defmt::warn!("Burst macro is full");
            }
        }
        sequence
    })
}
