pub mod common;

use planck_keymap::action::Action;
use planck_keymap::keycode::{KeyCode, ModifierCombination};
use planck_keymap::tap_dance::{DanceStep, TAP_DANCES, TapDanceRunner, TapDanceState};

use crate::common::{RecordingReporter, Report, reg, reg_with, tapped, unreg, unreg_with};

fn state(count: u8, pressed: bool, interrupted: bool) -> TapDanceState {
    TapDanceState {
        count,
        pressed,
        interrupted,
    }
}

/// Run a whole dance: one `on_each_tap` per tap, then finish and reset
fn run_dance(index: u8, count: u8, pressed: bool, interrupted: bool) -> Vec<Report> {
    let mut runner = TapDanceRunner::default();
    let mut reporter = RecordingReporter::default();
    for c in 1..=count {
        runner.on_each_tap(index, &state(c, true, false), &mut reporter);
    }
    runner.on_dance_finished(index, &state(count, pressed, interrupted), &mut reporter);
    runner.on_dance_reset(index, &mut reporter);
    reporter.take()
}

mod tap_dance_test {
    use super::*;

    #[test]
    fn test_delete_dance() {
        assert_eq!(
            run_dance(0, 1, false, false),
            vec![reg(KeyCode::Delete), Report::Wait(10), unreg(KeyCode::Delete)]
        );
        // Hold does nothing
        assert_eq!(run_dance(0, 1, true, false), vec![Report::Wait(10)]);
        assert_eq!(
            run_dance(0, 2, false, false),
            vec![
                reg_with(KeyCode::Delete, ModifierCombination::LCTRL),
                Report::Wait(10),
                unreg_with(KeyCode::Delete, ModifierCombination::LCTRL),
            ]
        );
    }

    #[test]
    fn test_bracket_dances() {
        assert_eq!(
            run_dance(1, 1, true, false),
            vec![reg(KeyCode::RGui), Report::Wait(10), unreg(KeyCode::RGui)]
        );
        assert_eq!(
            run_dance(1, 2, false, false),
            vec![
                reg_with(KeyCode::LeftBracket, ModifierCombination::LSHIFT),
                Report::Wait(10),
                unreg_with(KeyCode::LeftBracket, ModifierCombination::LSHIFT),
            ]
        );
        assert_eq!(
            run_dance(2, 1, true, false),
            vec![reg(KeyCode::RAlt), Report::Wait(10), unreg(KeyCode::RAlt)]
        );
        assert_eq!(
            run_dance(2, 1, false, false),
            vec![reg(KeyCode::RightBracket), Report::Wait(10), unreg(KeyCode::RightBracket)]
        );
    }

    #[test]
    fn test_interrupted_double_tap_sends_two_keys() {
        let mut expected = tapped(KeyCode::LeftBracket).to_vec();
        expected.extend([reg(KeyCode::LeftBracket), Report::Wait(10), unreg(KeyCode::LeftBracket)]);
        assert_eq!(run_dance(1, 2, true, true), expected);
    }

    #[test]
    fn test_ctrl_caps_dance() {
        // Dance 3 has no single tap and no burst
        assert_eq!(run_dance(3, 1, false, false), vec![Report::Wait(10)]);
        assert_eq!(
            run_dance(3, 1, true, false),
            vec![reg(KeyCode::LCtrl), Report::Wait(10), unreg(KeyCode::LCtrl)]
        );
        assert_eq!(
            run_dance(3, 2, false, false),
            vec![reg(KeyCode::CapsLock), Report::Wait(10), unreg(KeyCode::CapsLock)]
        );
        assert_eq!(run_dance(3, 4, false, false), vec![Report::Wait(10)]);
    }

    #[test]
    fn test_space_dance() {
        assert_eq!(
            run_dance(4, 1, true, false),
            vec![reg(KeyCode::Enter), Report::Wait(10), unreg(KeyCode::Enter)]
        );
        // Double tap registers space twice and releases it once
        assert_eq!(
            run_dance(4, 2, false, false),
            vec![reg(KeyCode::Space), reg(KeyCode::Space), Report::Wait(10), unreg(KeyCode::Space)]
        );
        assert_eq!(
            run_dance(4, 2, true, false),
            vec![
                reg_with(KeyCode::Enter, ModifierCombination::LSHIFT),
                Report::Wait(10),
                unreg_with(KeyCode::Enter, ModifierCombination::LSHIFT),
            ]
        );
    }

    #[test]
    fn test_backspace_and_delete_dances() {
        assert_eq!(
            run_dance(5, 1, true, false),
            vec![reg(KeyCode::RShift), Report::Wait(10), unreg(KeyCode::RShift)]
        );
        assert_eq!(
            run_dance(5, 2, false, false),
            vec![
                reg_with(KeyCode::Backspace, ModifierCombination::RCTRL),
                Report::Wait(10),
                unreg_with(KeyCode::Backspace, ModifierCombination::RCTRL),
            ]
        );
        assert_eq!(
            run_dance(5, 2, true, false),
            vec![reg(KeyCode::Backspace), Report::Wait(10), unreg(KeyCode::Backspace)]
        );
        assert_eq!(
            run_dance(6, 1, true, false),
            vec![reg(KeyCode::RCtrl), Report::Wait(10), unreg(KeyCode::RCtrl)]
        );
        assert_eq!(
            run_dance(6, 2, false, false),
            vec![
                reg_with(KeyCode::Delete, ModifierCombination::RCTRL),
                Report::Wait(10),
                unreg_with(KeyCode::Delete, ModifierCombination::RCTRL),
            ]
        );
    }

    #[test]
    fn test_rapid_taps_burst() {
        // Third tap sends three keys, every following tap one more, the finish sends nothing
        let mut expected = Vec::new();
        for _ in 0..4 {
            expected.extend(tapped(KeyCode::Backspace));
        }
        expected.push(Report::Wait(10));
        assert_eq!(run_dance(5, 4, false, false), expected);

        let mut expected = Vec::new();
        for _ in 0..3 {
            expected.extend(tapped(KeyCode::Space));
        }
        expected.push(Report::Wait(10));
        assert_eq!(run_dance(4, 3, false, false), expected);
    }

    #[test]
    fn test_third_tap_runs_burst_sequence() {
        // The runner and the triple tap macro tap the same keys
        for (index, dance) in TAP_DANCES.iter().enumerate() {
            let Some(sequence) = dance.burst_sequence() else {
                continue;
            };
            let expected: Vec<Report> = sequence.iter().flat_map(|k| tapped(*k)).collect();
            let mut runner = TapDanceRunner::default();
            let mut reporter = RecordingReporter::default();
            runner.on_each_tap(index as u8, &state(3, false, false), &mut reporter);
            assert_eq!(reporter.take(), expected, "tap dance {index}");
        }
    }

    #[test]
    fn test_step_is_cleared_on_reset() {
        let mut runner = TapDanceRunner::default();
        let mut reporter = RecordingReporter::default();
        runner.on_dance_finished(5, &state(1, true, false), &mut reporter);
        assert_eq!(runner.step(5), DanceStep::SingleHold);
        assert_eq!(runner.step(6), DanceStep::None);
        runner.on_dance_reset(5, &mut reporter);
        assert_eq!(runner.step(5), DanceStep::None);
        assert_eq!(
            reporter.take(),
            vec![reg(KeyCode::RShift), Report::Wait(10), Report::Unregister(Action::Key(KeyCode::RShift))]
        );
    }

    #[test]
    fn test_undefined_dance_is_ignored() {
        let mut runner = TapDanceRunner::default();
        let mut reporter = RecordingReporter::default();
        runner.on_each_tap(7, &state(3, true, false), &mut reporter);
        runner.on_dance_finished(7, &state(1, false, false), &mut reporter);
        runner.on_dance_reset(7, &mut reporter);
        assert!(reporter.take().is_empty());
    }
}
