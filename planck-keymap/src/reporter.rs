use crate::action::Action;
use crate::keycode::KeyCode;

/// The seam between keymap callbacks and the firmware.
///
/// Callbacks never build HID reports themselves, they ask the firmware to press
/// or release an action, and the firmware turns that into reports.
pub trait KeyReporter {
    /// Press an action and keep it pressed
    fn register(&mut self, action: Action);

    /// Release a previously registered action
    fn unregister(&mut self, action: Action);

    /// Press and release an action
    fn tap(&mut self, action: Action) {
        self.register(action);
        self.unregister(action);
    }

    /// Shorthand for tapping a plain keycode
    fn tap_code(&mut self, keycode: KeyCode) {
        self.tap(Action::Key(keycode));
    }

    /// Block for the given time before the next report
    fn wait_ms(&mut self, ms: u16);
}
