pub mod common;

use planck_keymap::action::KeyAction;
use planck_keymap::config::BehaviorConfig;
use planck_keymap::dual_function::process_record_user;
use planck_keymap::encoder::{Direction, MusicState, encoder_update, music_mask};
use planck_keymap::event::{KeyEvent, KeyRecord};
use planck_keymap::keycode::{KeyCode, ModifierCombination};
use planck_keymap::keymap::DUAL_FUNC_0;
use planck_keymap::{KeyMap, Layer, k, mo, tt};

use crate::common::{RecordingReporter, create_planck_keymap, default_tables, reg, reg_with, tapped, unreg, unreg_with};

fn record(pressed: bool, tap_count: u8) -> KeyRecord {
    KeyRecord {
        event: KeyEvent {
            row: 2,
            col: 0,
            pressed,
        },
        tap_count,
    }
}

mod dual_function_test {
    use super::*;

    #[test]
    fn test_tap_sends_backspace() {
        let mut reporter = RecordingReporter::default();
        assert!(!process_record_user(DUAL_FUNC_0, &record(true, 1), &mut reporter));
        assert!(!process_record_user(DUAL_FUNC_0, &record(false, 1), &mut reporter));
        assert_eq!(reporter.take(), tapped(KeyCode::Backspace).to_vec());
    }

    #[test]
    fn test_hold_sends_ctrl_backspace() {
        let mut reporter = RecordingReporter::default();
        assert!(!process_record_user(DUAL_FUNC_0, &record(true, 0), &mut reporter));
        assert!(!process_record_user(DUAL_FUNC_0, &record(false, 0), &mut reporter));
        assert_eq!(
            reporter.take(),
            vec![
                reg_with(KeyCode::Backspace, ModifierCombination::LCTRL),
                unreg_with(KeyCode::Backspace, ModifierCombination::LCTRL),
            ]
        );
    }

    #[test]
    fn test_other_keys_pass_through() {
        let mut reporter = RecordingReporter::default();
        assert!(process_record_user(k!(A), &record(true, 1), &mut reporter));
        assert!(process_record_user(KeyAction::TapDance(0), &record(true, 1), &mut reporter));
        // Undefined dual function is left to the firmware
        assert!(process_record_user(KeyAction::DualFunction(3), &record(true, 1), &mut reporter));
        assert!(reporter.take().is_empty());
    }
}

mod encoder_test {
    use super::*;

    #[test]
    fn test_encoder_scrolls() {
        let keymap = create_planck_keymap();
        let mut music = MusicState::default();
        let mut reporter = RecordingReporter::default();

        encoder_update(0, Direction::Clockwise, &keymap, &mut music, &mut reporter);
        assert_eq!(reporter.take(), tapped(KeyCode::MouseWheelDown).to_vec());

        encoder_update(0, Direction::CounterClockwise, &keymap, &mut music, &mut reporter);
        assert_eq!(reporter.take(), vec![reg(KeyCode::MouseWheelUp), unreg(KeyCode::MouseWheelUp)]);

        encoder_update(0, Direction::None, &keymap, &mut music, &mut reporter);
        assert!(reporter.take().is_empty());
        assert_eq!(music, MusicState::default());
    }

    #[test]
    fn test_unknown_encoder_does_nothing() {
        let keymap = create_planck_keymap();
        let mut music = MusicState::default();
        let mut reporter = RecordingReporter::default();

        encoder_update(5, Direction::Clockwise, &keymap, &mut music, &mut reporter);
        encoder_update(1, Direction::CounterClockwise, &keymap, &mut music, &mut reporter);
        assert!(reporter.take().is_empty());
        assert_eq!(music, MusicState::default());
    }

    #[test]
    fn test_scroll_without_encoder_map() {
        let (layers, _) = default_tables();
        let keymap = KeyMap::new(layers, None, BehaviorConfig::default());
        let mut music = MusicState::default();
        let mut reporter = RecordingReporter::default();

        encoder_update(0, Direction::CounterClockwise, &keymap, &mut music, &mut reporter);
        assert_eq!(reporter.take(), tapped(KeyCode::MouseWheelUp).to_vec());
    }

    #[test]
    fn test_muse_mode_tempo_and_offset() {
        let mut keymap = create_planck_keymap();
        let mut music = MusicState {
            muse_mode: true,
            ..MusicState::default()
        };
        let mut reporter = RecordingReporter::default();

        encoder_update(0, Direction::Clockwise, &keymap, &mut music, &mut reporter);
        encoder_update(0, Direction::Clockwise, &keymap, &mut music, &mut reporter);
        assert_eq!(music.muse_tempo, 52);
        encoder_update(0, Direction::CounterClockwise, &keymap, &mut music, &mut reporter);
        assert_eq!(music.muse_tempo, 51);
        assert_eq!(music.muse_offset, 70);

        keymap.activate_layer(Layer::Raise as u8);
        encoder_update(0, Direction::CounterClockwise, &keymap, &mut music, &mut reporter);
        assert_eq!(music.muse_offset, 69);
        assert_eq!(music.muse_tempo, 51);

        // Nothing reaches the host while muse mode runs
        assert!(reporter.take().is_empty());
    }

    #[test]
    fn test_muse_counters_wrap() {
        let mut keymap = create_planck_keymap();
        let mut music = MusicState {
            muse_mode: true,
            muse_offset: 255,
            muse_tempo: 0,
        };
        let mut reporter = RecordingReporter::default();
        encoder_update(0, Direction::CounterClockwise, &keymap, &mut music, &mut reporter);
        assert_eq!(music.muse_tempo, u16::MAX);
        keymap.activate_layer(Layer::Raise as u8);
        encoder_update(0, Direction::Clockwise, &keymap, &mut music, &mut reporter);
        assert_eq!(music.muse_offset, 0);
    }

    #[test]
    fn test_music_mask() {
        assert!(!music_mask(mo!(1)));
        assert!(!music_mask(mo!(2)));
        assert!(music_mask(mo!(3)));
        assert!(music_mask(tt!(1)));
        assert!(music_mask(k!(A)));
    }
}
