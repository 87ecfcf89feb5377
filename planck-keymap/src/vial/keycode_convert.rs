use crate::action::{Action, KeyAction};
use crate::dual_function::{DUAL_FUNCTIONS, find_by_vial_keycode};
use crate::keycode::{KeyCode, ModifierCombination};

const QK_MODS: u16 = 0x0100;
const QK_MOD_TAP: u16 = 0x2000;
const QK_LAYER_TAP: u16 = 0x4000;
const QK_MOMENTARY: u16 = 0x5220;
const QK_TOGGLE_LAYER: u16 = 0x5260;
const QK_LAYER_TAP_TOGGLE: u16 = 0x52C0;
const QK_TAP_DANCE: u16 = 0x5700;
const QK_MACRO: u16 = 0x7700;
const QK_AUDIO_ON: u16 = 0x7480;
const QK_AUDIO_OFF: u16 = 0x7481;
const QK_AUDIO_TOGGLE: u16 = 0x7482;
const QK_MUSIC_ON: u16 = 0x7490;
const QK_MUSIC_OFF: u16 = 0x7491;
const QK_MUSIC_TOGGLE: u16 = 0x7492;
const QK_BOOT: u16 = 0x7C00;

fn key_to_via(k: KeyCode) -> u16 {
    match k {
        KeyCode::AudioOn => QK_AUDIO_ON,
        KeyCode::AudioOff => QK_AUDIO_OFF,
        KeyCode::AudioToggle => QK_AUDIO_TOGGLE,
        KeyCode::MusicOn => QK_MUSIC_ON,
        KeyCode::MusicOff => QK_MUSIC_OFF,
        KeyCode::MusicToggle => QK_MUSIC_TOGGLE,
        KeyCode::Bootloader => QK_BOOT,
        k => k as u16,
    }
}

/// Single modifier as a keycode, combinations fall back to their first modifier
fn modifier_to_keycode(m: ModifierCombination) -> KeyCode {
    let keycodes = if m.right() {
        [KeyCode::RCtrl, KeyCode::RShift, KeyCode::RAlt, KeyCode::RGui]
    } else {
        [KeyCode::LCtrl, KeyCode::LShift, KeyCode::LAlt, KeyCode::LGui]
    };
    let flags = [m.ctrl(), m.shift(), m.alt(), m.gui()];
    flags
        .iter()
        .zip(keycodes)
        .find(|(on, _)| **on)
        .map(|(_, k)| k)
        .unwrap_or(KeyCode::No)
}

/// Convert a KeyAction to its Vial keycode
pub fn to_via_keycode(key_action: KeyAction) -> u16 {
    match key_action {
        KeyAction::No => 0x0000,
        KeyAction::Transparent => 0x0001,
        KeyAction::Single(a) => match a {
            Action::Key(k) => key_to_via(k),
            Action::KeyWithModifier(k, m) => ((m.to_bits() as u16) << 8) | (k as u16 & 0xFF),
            Action::Modifier(m) => modifier_to_keycode(m) as u16,
            Action::LayerOn(l) if l < 32 => QK_MOMENTARY | l as u16,
            Action::LayerToggle(l) if l < 32 => QK_TOGGLE_LAYER | l as u16,
            Action::TriggerMacro(i) if i < 128 => QK_MACRO | i as u16,
            _ => {
                warn!("Action {:?} has no Vial keycode", a);
                0x0000
            }
        },
        KeyAction::TapHold(Action::Key(k), Action::Modifier(m)) => {
            QK_MOD_TAP | ((m.to_bits() as u16) << 8) | (k as u16 & 0xFF)
        }
        KeyAction::TapHold(Action::Key(k), Action::LayerOn(l)) if l < 16 => {
            QK_LAYER_TAP | ((l as u16) << 8) | (k as u16 & 0xFF)
        }
        KeyAction::TapHold(Action::LayerToggle(t), Action::LayerOn(l)) if t == l && l < 32 => {
            QK_LAYER_TAP_TOGGLE | l as u16
        }
        KeyAction::TapHold(tap, hold) => {
            warn!("Tap/hold {:?}/{:?} has no Vial keycode", tap, hold);
            0x0000
        }
        KeyAction::TapDance(n) => QK_TAP_DANCE | n as u16,
        KeyAction::DualFunction(i) => match DUAL_FUNCTIONS.get(i as usize) {
            Some(f) => f.vial_keycode,
            None => {
                warn!("Dual function {} is not defined", i);
                0x0000
            }
        },
    }
}

/// Convert Vial keycode to KeyAction.
pub fn from_via_keycode(via_keycode: u16) -> KeyAction {
    if let Some(i) = find_by_vial_keycode(via_keycode) {
        return KeyAction::DualFunction(i);
    }
    match via_keycode {
        0x0000 => KeyAction::No,
        0x0001 => KeyAction::Transparent,
        0x0002..=0x00FF => match KeyCode::from_repr(via_keycode) {
            Some(k) => KeyAction::Single(Action::Key(k)),
            None => {
                warn!("Keycode {:#X} is not supported", via_keycode);
                KeyAction::No
            }
        },
        QK_MODS..=0x1FFF => {
            // Key with modifier, like `LSFT(KC_A)`
            let keycode = KeyCode::from_u16(via_keycode & 0x00FF);
            let modifier = ModifierCombination::from_5bits((via_keycode >> 8) as u8);
            KeyAction::Single(Action::KeyWithModifier(keycode, modifier))
        }
        QK_MOD_TAP..=0x3FFF => {
            let keycode = KeyCode::from_u16(via_keycode & 0x00FF);
            let modifier = ModifierCombination::from_5bits((via_keycode >> 8) as u8);
            KeyAction::TapHold(Action::Key(keycode), Action::Modifier(modifier))
        }
        QK_LAYER_TAP..=0x4FFF => {
            let layer = ((via_keycode >> 8) & 0xF) as u8;
            let keycode = KeyCode::from_u16(via_keycode & 0x00FF);
            KeyAction::TapHold(Action::Key(keycode), Action::LayerOn(layer))
        }
        0x5220..=0x523F => KeyAction::Single(Action::LayerOn((via_keycode & 0x1F) as u8)),
        0x5260..=0x527F => KeyAction::Single(Action::LayerToggle((via_keycode & 0x1F) as u8)),
        0x52C0..=0x52DF => {
            let layer = (via_keycode & 0x1F) as u8;
            KeyAction::TapHold(Action::LayerToggle(layer), Action::LayerOn(layer))
        }
        QK_TAP_DANCE..=0x57FF => KeyAction::TapDance((via_keycode & 0xFF) as u8),
        QK_MACRO..=0x777F => KeyAction::Single(Action::TriggerMacro((via_keycode & 0x7F) as u8)),
        QK_AUDIO_ON => KeyAction::Single(Action::Key(KeyCode::AudioOn)),
        QK_AUDIO_OFF => KeyAction::Single(Action::Key(KeyCode::AudioOff)),
        QK_AUDIO_TOGGLE => KeyAction::Single(Action::Key(KeyCode::AudioToggle)),
        QK_MUSIC_ON => KeyAction::Single(Action::Key(KeyCode::MusicOn)),
        QK_MUSIC_OFF => KeyAction::Single(Action::Key(KeyCode::MusicOff)),
        QK_MUSIC_TOGGLE => KeyAction::Single(Action::Key(KeyCode::MusicToggle)),
        QK_BOOT => KeyAction::Single(Action::Key(KeyCode::Bootloader)),
        _ => {
            warn!("Vial keycode {:#X} is not processed", via_keycode);
            KeyAction::No
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::keymap::{KEYMAP, Layer};

    #[test]
    fn test_convert_via_keycode_to_key_action() {
        // A
        assert_eq!(KeyAction::Single(Action::Key(KeyCode::A)), from_via_keycode(0x04));

        // MO(1)
        assert_eq!(KeyAction::Single(Action::LayerOn(1)), from_via_keycode(0x5221));

        // TT(1)
        assert_eq!(
            KeyAction::TapHold(Action::LayerToggle(1), Action::LayerOn(1)),
            from_via_keycode(0x52C1)
        );

        // LSFT(KC_GRV), the tilde
        assert_eq!(
            KeyAction::Single(Action::KeyWithModifier(KeyCode::Grave, ModifierCombination::LSHIFT)),
            from_via_keycode(0x0235)
        );

        // RCTL_T(KC_SLSH)
        assert_eq!(
            KeyAction::TapHold(
                Action::Key(KeyCode::Slash),
                Action::Modifier(ModifierCombination::RCTRL)
            ),
            from_via_keycode(0x3138)
        );

        // TD(4)
        assert_eq!(KeyAction::TapDance(4), from_via_keycode(0x5704));

        // QK_BOOT
        assert_eq!(
            KeyAction::Single(Action::Key(KeyCode::Bootloader)),
            from_via_keycode(0x7C00)
        );

        // Placeholder of the custom backspace
        assert_eq!(KeyAction::DualFunction(0), from_via_keycode(0x4507));

        // QK_MACRO_5
        assert_eq!(KeyAction::Single(Action::TriggerMacro(5)), from_via_keycode(0x7705));

        // Unsupported
        assert_eq!(KeyAction::No, from_via_keycode(0x7E00));
    }

    #[test]
    fn test_convert_key_action_to_via_keycode() {
        let base = &KEYMAP[Layer::Base as usize];
        // LSFT(KC_LALT)
        assert_eq!(to_via_keycode(base[3][0]), 0x02E2);
        // LSFT_T(KC_BSLS)
        assert_eq!(to_via_keycode(base[3][4]), 0x2231);
        // RSFT_T(KC_QUOT)
        assert_eq!(to_via_keycode(base[7][3]), 0x3234);
        // TT(1)
        assert_eq!(to_via_keycode(base[5][5]), 0x52C1);
        // TD(0)
        assert_eq!(to_via_keycode(base[1][0]), 0x5700);
        assert_eq!(to_via_keycode(base[2][0]), 0x4507);

        let adjust = &KEYMAP[Layer::Adjust as usize];
        assert_eq!(to_via_keycode(adjust[1][2]), 0x7480);
        assert_eq!(to_via_keycode(adjust[2][4]), 0x7492);
        assert_eq!(to_via_keycode(adjust[5][5]), 0x7C00);

        assert_eq!(to_via_keycode(KeyAction::Single(Action::TriggerMacro(5))), 0x7705);
        assert_eq!(to_via_keycode(KeyAction::Single(Action::TriggerMacro(200))), 0x0000);
    }

    #[test]
    fn test_every_default_key_survives_vial() {
        for layer in KEYMAP.iter() {
            for row in layer.iter() {
                for action in row.iter() {
                    assert_eq!(from_via_keycode(to_via_keycode(*action)), *action);
                }
            }
        }
    }
}
