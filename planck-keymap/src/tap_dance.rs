//! Tap dances of the Planck keymap.
//!
//! The firmware counts taps and decides when a dance is over. This module
//! only reacts to its callbacks: each tap, dance finished and dance reset.

use embassy_time::Duration;
use heapless::Vec;

use crate::action::Action;
use crate::config::{TAP_DANCE_RESET_DELAY_MS, TAPPING_TERM};
use crate::keycode::{KeyCode, ModifierCombination};
use crate::reporter::KeyReporter;

/// Number of tap dances in [`TAP_DANCES`]
pub const TAP_DANCE_NUM: usize = 7;

/// Times the burst key is tapped on the third tap
pub const BURST_TAPS: usize = 3;

/// Tap dance state reported by the firmware
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TapDanceState {
    /// Number of taps so far
    pub count: u8,
    /// Whether the key is still held
    pub pressed: bool,
    /// Whether another key was pressed during the dance
    pub interrupted: bool,
}

/// Outcome of a finished tap dance
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DanceStep {
    /// No dance finished since the last reset
    #[default]
    None,
    SingleTap,
    SingleHold,
    DoubleTap,
    DoubleHold,
    /// Two taps, the second interrupted by another key
    DoubleSingleTap,
    MoreTaps,
}

impl DanceStep {
    pub fn classify(state: &TapDanceState) -> Self {
        match state.count {
            1 => {
                if state.interrupted || !state.pressed {
                    DanceStep::SingleTap
                } else {
                    DanceStep::SingleHold
                }
            }
            2 => {
                if state.interrupted {
                    DanceStep::DoubleSingleTap
                } else if state.pressed {
                    DanceStep::DoubleHold
                } else {
                    DanceStep::DoubleTap
                }
            }
            _ => DanceStep::MoreTaps,
        }
    }
}

/// What a dance does when it finishes with a given step
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DanceAction {
    No,
    /// Register the action until the dance resets
    Register(Action),
    /// Register the action twice, reset releases it once
    RegisterTwice(Action),
    /// Tap the action once, then register it until the dance resets
    TapThenRegister(Action),
}

impl DanceAction {
    pub const fn action(&self) -> Option<Action> {
        match self {
            DanceAction::No => None,
            DanceAction::Register(a) | DanceAction::RegisterTwice(a) | DanceAction::TapThenRegister(a) => Some(*a),
        }
    }

    fn perform<R: KeyReporter>(&self, reporter: &mut R) {
        match *self {
            DanceAction::No => {}
            DanceAction::Register(a) => reporter.register(a),
            DanceAction::RegisterTwice(a) => {
                reporter.register(a);
                reporter.register(a);
            }
            DanceAction::TapThenRegister(a) => {
                reporter.tap(a);
                reporter.register(a);
            }
        }
    }

    fn release<R: KeyReporter>(&self, reporter: &mut R) {
        if let Some(a) = self.action() {
            reporter.unregister(a);
        }
    }
}

/// Tap/hold patterns a declarative tap dance engine can match
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TapPattern {
    Tap,
    Hold,
    DoubleTap,
    HoldAfterTap,
    /// Three quick taps, bound to a keyboard macro
    TripleTap,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TapDance {
    /// Key tapped on rapid repeats, three times on the third tap and once on every tap after it
    pub burst: Option<KeyCode>,
    pub single_tap: DanceAction,
    pub single_hold: DanceAction,
    pub double_tap: DanceAction,
    pub double_hold: DanceAction,
    pub double_single_tap: DanceAction,
    pub tapping_term: Duration,
}

impl TapDance {
    /// Create a tap dance, the interrupted double tap repeats the single tap key
    pub const fn new(
        burst: Option<KeyCode>,
        single_tap: DanceAction,
        single_hold: DanceAction,
        double_tap: DanceAction,
        double_hold: DanceAction,
    ) -> Self {
        let double_single_tap = match single_tap {
            DanceAction::Register(a) => DanceAction::TapThenRegister(a),
            _ => DanceAction::No,
        };
        Self {
            burst,
            single_tap,
            single_hold,
            double_tap,
            double_hold,
            double_single_tap,
            tapping_term: TAPPING_TERM,
        }
    }

    pub fn action_for(&self, step: DanceStep) -> DanceAction {
        match step {
            DanceStep::SingleTap => self.single_tap,
            DanceStep::SingleHold => self.single_hold,
            DanceStep::DoubleTap => self.double_tap,
            DanceStep::DoubleHold => self.double_hold,
            DanceStep::DoubleSingleTap => self.double_single_tap,
            DanceStep::None | DanceStep::MoreTaps => DanceAction::No,
        }
    }

    /// Patterns and their actions, for firmwares that describe tap dances declaratively.
    ///
    /// Three taps trigger keyboard macro `burst_macro`, which is expected to tap the keys of
    /// [`TapDance::burst_sequence`]. The interrupted double tap and the repeats after the
    /// third tap have no pattern.
    pub fn to_patterns(&self, burst_macro: u8) -> Vec<(TapPattern, Action), 5> {
        let mut patterns = Vec::new();
        let candidates = [
            (TapPattern::Tap, self.single_tap.action()),
            (TapPattern::Hold, self.single_hold.action()),
            (TapPattern::DoubleTap, self.double_tap.action()),
            (TapPattern::HoldAfterTap, self.double_hold.action()),
            (TapPattern::TripleTap, self.burst.map(|_| Action::TriggerMacro(burst_macro))),
        ];
        for (pattern, action) in candidates {
            let Some(action) = action else {
                continue;
            };
            if patterns.push((pattern, action)).is_err() {
                warn!("Tap pattern {:?} is dropped", pattern);
            }
        }
        patterns
    }

    /// Keys tapped on the third tap, `None` without a burst key
    pub fn burst_sequence(&self) -> Option<[KeyCode; BURST_TAPS]> {
        self.burst.map(|burst| [burst; BURST_TAPS])
    }
}

const fn key(keycode: KeyCode) -> DanceAction {
    DanceAction::Register(Action::Key(keycode))
}

const fn key_with(keycode: KeyCode, modifier: ModifierCombination) -> DanceAction {
    DanceAction::Register(Action::KeyWithModifier(keycode, modifier))
}

const NONE: DanceAction = DanceAction::No;

#[rustfmt::skip]
pub const TAP_DANCES: [TapDance; TAP_DANCE_NUM] = [
    // Delete, ctrl+delete on double tap
    TapDance::new(Some(KeyCode::Delete), key(KeyCode::Delete), NONE, key_with(KeyCode::Delete, ModifierCombination::LCTRL), NONE),
    // `[`, right gui on hold, `{` on double tap
    TapDance::new(Some(KeyCode::LeftBracket), key(KeyCode::LeftBracket), key(KeyCode::RGui), key_with(KeyCode::LeftBracket, ModifierCombination::LSHIFT), NONE),
    // `]`, right alt on hold, `}` on double tap
    TapDance::new(Some(KeyCode::RightBracket), key(KeyCode::RightBracket), key(KeyCode::RAlt), key_with(KeyCode::RightBracket, ModifierCombination::LSHIFT), NONE),
    // Ctrl on hold, caps lock on double tap
    TapDance::new(None, NONE, key(KeyCode::LCtrl), key(KeyCode::CapsLock), NONE),
    // Space, enter on hold, shift+enter on double hold
    TapDance::new(Some(KeyCode::Space), key(KeyCode::Space), key(KeyCode::Enter), DanceAction::RegisterTwice(Action::Key(KeyCode::Space)), key_with(KeyCode::Enter, ModifierCombination::LSHIFT)),
    // Backspace, right shift on hold, ctrl+backspace on double tap
    TapDance::new(Some(KeyCode::Backspace), key(KeyCode::Backspace), key(KeyCode::RShift), key_with(KeyCode::Backspace, ModifierCombination::RCTRL), key(KeyCode::Backspace)),
    // Delete, right ctrl on hold, ctrl+delete on double tap
    TapDance::new(Some(KeyCode::Delete), key(KeyCode::Delete), key(KeyCode::RCtrl), key_with(KeyCode::Delete, ModifierCombination::RCTRL), key(KeyCode::Delete)),
];

/// Runs the tap dance callbacks, remembering the finished step of every dance until its reset
pub struct TapDanceRunner<'a> {
    dances: &'a [TapDance],
    steps: [DanceStep; TAP_DANCE_NUM],
}

impl Default for TapDanceRunner<'static> {
    fn default() -> Self {
        Self::new(&TAP_DANCES)
    }
}

impl<'a> TapDanceRunner<'a> {
    pub fn new(dances: &'a [TapDance]) -> Self {
        if dances.len() > TAP_DANCE_NUM {
            warn!(
                "{} tap dances given, only the first {} are used",
                dances.len(),
                TAP_DANCE_NUM
            );
        }
        Self {
            dances: &dances[..dances.len().min(TAP_DANCE_NUM)],
            steps: [DanceStep::None; TAP_DANCE_NUM],
        }
    }

    /// Step stored by the last finished dance
    pub fn step(&self, index: u8) -> DanceStep {
        self.steps.get(index as usize).copied().unwrap_or_default()
    }

    fn dance(&self, index: u8) -> Option<&'a TapDance> {
        let dance = self.dances.get(index as usize);
        if dance.is_none() {
            warn!("Tap dance {} is not defined", index);
        }
        dance
    }

    /// Called on every tap while the dance runs
    pub fn on_each_tap<R: KeyReporter>(&mut self, index: u8, state: &TapDanceState, reporter: &mut R) {
        let Some(burst) = self.dance(index).and_then(|d| d.burst) else {
            return;
        };
        let taps = match state.count {
            3 => BURST_TAPS,
            c if c > 3 => 1,
            _ => 0,
        };
        for _ in 0..taps {
            reporter.tap_code(burst);
        }
    }

    /// Called once the dance is decided
    pub fn on_dance_finished<R: KeyReporter>(&mut self, index: u8, state: &TapDanceState, reporter: &mut R) {
        let Some(dance) = self.dance(index) else {
            return;
        };
        let step = DanceStep::classify(state);
        debug!("Tap dance {} finished: {:?}", index, step);
        self.steps[index as usize] = step;
        dance.action_for(step).perform(reporter);
    }

    /// Called when the dance key is released after finishing
    pub fn on_dance_reset<R: KeyReporter>(&mut self, index: u8, reporter: &mut R) {
        let Some(dance) = self.dance(index) else {
            return;
        };
        reporter.wait_ms(TAP_DANCE_RESET_DELAY_MS);
        let step = core::mem::take(&mut self.steps[index as usize]);
        dance.action_for(step).release(reporter);
    }
}
