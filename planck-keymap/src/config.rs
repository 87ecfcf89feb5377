//! Build-time configuration of the Planck keymap.
//!
//! Values come from `keyboard.toml`, see `build.rs`.

use embassy_time::Duration;

// Include constants generated by build.rs
include!(concat!(env!("OUT_DIR"), "/constants.rs"));

/// Time window in which repeated presses count towards one tap dance or tap/hold decision
pub const TAPPING_TERM: Duration = Duration::from_millis(TAPPING_TERM_MS);

/// Delay between the end of a tap dance and releasing what it registered
pub const TAP_DANCE_RESET_DELAY_MS: u16 = 10;

/// Aggregated configuration of the keyboard
#[derive(Clone, Debug, Default)]
pub struct KeyboardConfig<'a> {
    pub usb_config: KeyboardUsbConfig<'a>,
    pub vial_config: VialConfig<'a>,
    pub behavior_config: BehaviorConfig,
    pub mouse_config: MouseKeyConfig,
    pub audio_config: AudioConfig<'a>,
}

/// Config for configurable action behavior
#[derive(Clone, Debug)]
pub struct BehaviorConfig {
    /// Lower, raise and adjust layers; adjust is on iff both others are on
    pub tri_layer: Option<[u8; 3]>,
    pub tapping_term: Duration,
    pub combo_count: u8,
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        Self {
            tri_layer: Some(TRI_LAYER),
            tapping_term: TAPPING_TERM,
            combo_count: COMBO_COUNT,
        }
    }
}

/// Mouse key acceleration, in QMK's units
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MouseKeyConfig {
    /// Time between cursor movement reports
    pub interval: Duration,
    /// Delay before the cursor starts moving
    pub delay: Duration,
    /// Number of intervals to reach max speed
    pub time_to_max: u8,
    pub max_speed: u8,
    /// Delay before the wheel starts repeating
    pub wheel_delay: Duration,
}

impl Default for MouseKeyConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(MOUSEKEY_INTERVAL_MS),
            delay: Duration::from_millis(MOUSEKEY_DELAY_MS),
            time_to_max: MOUSEKEY_TIME_TO_MAX,
            max_speed: MOUSEKEY_MAX_SPEED,
            wheel_delay: Duration::from_millis(MOUSEKEY_WHEEL_DELAY_MS),
        }
    }
}

/// Configurations for the Vial companion app
#[derive(Clone, Debug)]
pub struct VialConfig<'a> {
    /// Unique id of this keyboard definition
    pub vial_keyboard_id: &'a [u8],
    /// Matrix positions `(row, col)` which must be held together to unlock
    pub unlock_keys: &'a [(u8, u8)],
    /// Whether Vial may edit tap dances at runtime
    pub dynamic_tap_dance: bool,
}

impl Default for VialConfig<'_> {
    fn default() -> Self {
        Self {
            vial_keyboard_id: &VIAL_KEYBOARD_UID,
            unlock_keys: VIAL_UNLOCK_KEYS,
            dynamic_tap_dance: VIAL_TAP_DANCE_ENABLE,
        }
    }
}

/// Configurations for usb
#[derive(Clone, Copy, Debug)]
pub struct KeyboardUsbConfig<'a> {
    /// Vender id
    pub vid: u16,
    /// Product id
    pub pid: u16,
    /// Manufacturer
    pub manufacturer: &'a str,
    /// Product name
    pub product_name: &'a str,
    /// Serial number
    pub serial_number: &'a str,
}

impl Default for KeyboardUsbConfig<'_> {
    fn default() -> Self {
        Self {
            vid: USB_VID,
            pid: USB_PID,
            manufacturer: MANUFACTURER,
            product_name: KEYBOARD_NAME,
            serial_number: SERIAL_NUMBER,
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct AudioConfig<'a> {
    /// Click on every key press
    pub clicky: bool,
    pub startup_song: &'a str,
}

impl Default for AudioConfig<'_> {
    fn default() -> Self {
        Self {
            clicky: AUDIO_CLICKY,
            startup_song: STARTUP_SONG,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_values() {
        let config = KeyboardConfig::default();
        assert_eq!(config.behavior_config.tapping_term, Duration::from_millis(200));
        assert_eq!(config.behavior_config.tri_layer, Some([1, 2, 3]));
        assert_eq!(config.behavior_config.combo_count, 0);

        assert_eq!(config.mouse_config.interval, Duration::from_millis(16));
        assert_eq!(config.mouse_config.delay, Duration::from_millis(0));
        assert_eq!(config.mouse_config.time_to_max, 60);
        assert_eq!(config.mouse_config.max_speed, 7);
        assert_eq!(config.mouse_config.wheel_delay, Duration::from_millis(0));

        assert_eq!(
            config.vial_config.vial_keyboard_id,
            &[0x89, 0xAB, 0xCD, 0xEF, 0x01, 0x23, 0x45, 0x77]
        );
        assert_eq!(config.vial_config.unlock_keys, &[(0, 0), (4, 5)]);
        assert!(!config.vial_config.dynamic_tap_dance);

        assert_eq!(config.usb_config.vid, 0x03A8);
        assert_eq!(config.usb_config.pid, 0xA4F9);
        assert!(config.usb_config.serial_number.starts_with("vial:f64c2b3c"));

        assert!(config.audio_config.clicky);
        assert_eq!(config.audio_config.startup_song, "planck");
    }
}
