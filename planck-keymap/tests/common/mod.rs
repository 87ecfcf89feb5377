use planck_keymap::action::{Action, EncoderAction, KeyAction};
use planck_keymap::config::BehaviorConfig;
use planck_keymap::keycode::{KeyCode, ModifierCombination};
use planck_keymap::keymap::{KeyMap, get_default_encoder_map, get_default_keymap};
use planck_keymap::reporter::KeyReporter;
use planck_keymap::{COL, NUM_ENCODER, NUM_LAYER, ROW};

// Init logger for tests
#[ctor::ctor]
pub fn init_log() {
    let _ = env_logger::builder()
        .filter_level(log::LevelFilter::Debug)
        .is_test(true)
        .try_init();
}

/// Everything the keymap asked the firmware to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Report {
    Register(Action),
    Unregister(Action),
    Wait(u16),
}

#[derive(Debug, Default)]
pub struct RecordingReporter {
    pub reports: Vec<Report>,
}

impl RecordingReporter {
    pub fn take(&mut self) -> Vec<Report> {
        std::mem::take(&mut self.reports)
    }
}

impl KeyReporter for RecordingReporter {
    fn register(&mut self, action: Action) {
        self.reports.push(Report::Register(action));
    }

    fn unregister(&mut self, action: Action) {
        self.reports.push(Report::Unregister(action));
    }

    fn wait_ms(&mut self, ms: u16) {
        self.reports.push(Report::Wait(ms));
    }
}

pub fn reg(k: KeyCode) -> Report {
    Report::Register(Action::Key(k))
}

pub fn unreg(k: KeyCode) -> Report {
    Report::Unregister(Action::Key(k))
}

pub fn reg_with(k: KeyCode, m: ModifierCombination) -> Report {
    Report::Register(Action::KeyWithModifier(k, m))
}

pub fn unreg_with(k: KeyCode, m: ModifierCombination) -> Report {
    Report::Unregister(Action::KeyWithModifier(k, m))
}

/// Register then unregister
pub fn tapped(k: KeyCode) -> [Report; 2] {
    [reg(k), unreg(k)]
}

pub type Layers = [[[KeyAction; COL]; ROW]; NUM_LAYER];
pub type Encoders = [[EncoderAction; NUM_ENCODER]; NUM_LAYER];

/// Fresh copies of the default tables, leaked so the keymap can borrow them for the whole test
pub fn default_tables() -> (&'static mut Layers, &'static mut Encoders) {
    (
        Box::leak(Box::new(get_default_keymap())),
        Box::leak(Box::new(get_default_encoder_map())),
    )
}

pub fn create_planck_keymap() -> KeyMap<'static> {
    let (layers, encoders) = default_tables();
    KeyMap::new(layers, Some(encoders), BehaviorConfig::default())
}
