use crate::keycode::{KeyCode, ModifierCombination};

/// EncoderAction is the action at a encoder position, stored in encoder_map.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EncoderAction {
    clockwise: KeyAction,
    counter_clockwise: KeyAction,
}

impl Default for EncoderAction {
    fn default() -> Self {
        Self {
            clockwise: KeyAction::No,
            counter_clockwise: KeyAction::No,
        }
    }
}

impl EncoderAction {
    pub const fn new(clockwise: KeyAction, counter_clockwise: KeyAction) -> Self {
        Self {
            clockwise,
            counter_clockwise,
        }
    }

    pub fn clockwise(&self) -> KeyAction {
        self.clockwise
    }

    pub fn counter_clockwise(&self) -> KeyAction {
        self.counter_clockwise
    }
}

/// A KeyAction is the action at a keyboard position, stored in keymap.
/// It can be a single action like triggering a key, or a composite keyboard action like tap/hold
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum KeyAction {
    /// No action.
    No,
    /// Transparent action, next layer will be checked.
    Transparent,
    /// A single action, such as triggering a key, or activating a layer. Action is triggered when pressed and cancelled when released.
    Single(Action),
    /// General tap/hold action: (tap_action, hold_action)
    TapHold(Action, Action),
    /// Tap dance action, references an entry of `TAP_DANCES` by index.
    TapDance(u8),
    /// Custom key whose tap and hold actions are decided in `process_record_user`,
    /// references an entry of `DUAL_FUNCTIONS` by index.
    DualFunction(u8),
}

impl KeyAction {
    /// The action performed when the key is pressed and released quickly
    pub fn tap_action(&self) -> Option<Action> {
        match self {
            KeyAction::Single(a) | KeyAction::TapHold(a, _) => Some(*a),
            _ => None,
        }
    }
}

/// A single basic action that a keyboard can execute.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Action {
    /// A normal key stroke, uses for all keycodes defined in `KeyCode` enum, including mouse key, audio keys, etc.
    Key(KeyCode),
    /// Modifier Combination, used as the hold action of mod-tap keys.
    Modifier(ModifierCombination),
    /// Key stroke with modifier combination triggered, like `LSFT(KC_LBRC)`.
    KeyWithModifier(KeyCode, ModifierCombination),
    /// Activate a layer
    LayerOn(u8),
    /// Deactivate a layer
    LayerOff(u8),
    /// Toggle a layer
    LayerToggle(u8),
    /// Run the keyboard macro at the index
    TriggerMacro(u8),
}

impl From<KeyCode> for Action {
    fn from(keycode: KeyCode) -> Self {
        Action::Key(keycode)
    }
}
