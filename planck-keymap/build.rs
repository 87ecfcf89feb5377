use std::path::{Path, PathBuf};
use std::{env, fs};

use const_gen::*;
use serde::{Deserialize, de};

const MATRIX_ROWS: u8 = 8;
const MATRIX_COLS: u8 = 6;

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=KEYBOARD_TOML_PATH");

    // Read keyboard.toml, `KEYBOARD_TOML_PATH` overrides the one next to Cargo.toml
    let toml_path = match env::var("KEYBOARD_TOML_PATH") {
        Ok(path) => PathBuf::from(path),
        Err(_) => Path::new(&env::var("CARGO_MANIFEST_DIR").unwrap()).join("keyboard.toml"),
    };
    println!("cargo:rerun-if-changed={}", toml_path.display());
    let config_str = fs::read_to_string(&toml_path)
        .unwrap_or_else(|e| panic!("Failed to read {}: {e}", toml_path.display()));
    let config: KeyboardToml = toml::from_str(&config_str).expect("Failed to parse keyboard.toml\n");
    config.validate();

    let constants = get_constants_str(&config);

    let out_dir = env::var("OUT_DIR").unwrap();
    let dest_path = Path::new(&out_dir).join("constants.rs");
    fs::write(&dest_path, constants).expect("Failed to write constants.rs file");
}

fn get_constants_str(config: &KeyboardToml) -> String {
    let uid: [u8; 8] = config.vial.keyboard_uid.as_slice().try_into().unwrap();
    let tri_layer = [
        config.behavior.tri_layer.lower,
        config.behavior.tri_layer.raise,
        config.behavior.tri_layer.adjust,
    ];
    let unlock_keys = config
        .vial
        .unlock_keys
        .iter()
        .map(|[row, col]| format!("({row}, {col})"))
        .collect::<Vec<_>>()
        .join(", ");

    let constant_strs = vec![
        const_declaration!(pub TAPPING_TERM_MS = config.behavior.tapping_term.0),
        const_declaration!(pub TRI_LAYER = tri_layer),
        const_declaration!(pub COMBO_COUNT = config.behavior.combo_count),
        const_declaration!(pub MOUSEKEY_INTERVAL_MS = config.mouse_key.interval.0),
        const_declaration!(pub MOUSEKEY_DELAY_MS = config.mouse_key.delay.0),
        const_declaration!(pub MOUSEKEY_TIME_TO_MAX = config.mouse_key.time_to_max),
        const_declaration!(pub MOUSEKEY_MAX_SPEED = config.mouse_key.max_speed),
        const_declaration!(pub MOUSEKEY_WHEEL_DELAY_MS = config.mouse_key.wheel_delay.0),
        const_declaration!(pub VIAL_KEYBOARD_UID = uid),
        const_declaration!(pub VIAL_TAP_DANCE_ENABLE = config.vial.tap_dance),
        const_declaration!(pub AUDIO_CLICKY = config.audio.clicky),
        const_declaration!(pub USB_VID = config.keyboard.vendor_id),
        const_declaration!(pub USB_PID = config.keyboard.product_id),
        format!("pub const VIAL_UNLOCK_KEYS: &[(u8, u8)] = &[{unlock_keys}];\n"),
        format!("pub const KEYBOARD_NAME: &str = {:?};\n", config.keyboard.name),
        format!("pub const MANUFACTURER: &str = {:?};\n", config.keyboard.manufacturer),
        format!("pub const SERIAL_NUMBER: &str = {:?};\n", config.keyboard.serial_number),
        format!("pub const STARTUP_SONG: &str = {:?};\n", config.audio.startup_song),
    ];

    constant_strs.join("\n")
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct KeyboardToml {
    keyboard: KeyboardInfo,
    behavior: Behavior,
    mouse_key: MouseKey,
    vial: Vial,
    audio: Audio,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct KeyboardInfo {
    name: String,
    manufacturer: String,
    vendor_id: u16,
    product_id: u16,
    serial_number: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct Behavior {
    tapping_term: DurationMillis,
    tri_layer: TriLayer,
    #[serde(default)]
    combo_count: u8,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct TriLayer {
    lower: u8,
    raise: u8,
    adjust: u8,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct MouseKey {
    interval: DurationMillis,
    delay: DurationMillis,
    time_to_max: u8,
    max_speed: u8,
    wheel_delay: DurationMillis,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct Vial {
    keyboard_uid: Vec<u8>,
    unlock_keys: Vec<[u8; 2]>,
    #[serde(default)]
    tap_dance: bool,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct Audio {
    #[serde(default)]
    clicky: bool,
    startup_song: String,
}

impl KeyboardToml {
    fn validate(&self) {
        if self.vial.keyboard_uid.len() != 8 {
            panic!(
                "vial.keyboard_uid must have exactly 8 bytes, got {}",
                self.vial.keyboard_uid.len()
            );
        }
        for [row, col] in &self.vial.unlock_keys {
            if *row >= MATRIX_ROWS || *col >= MATRIX_COLS {
                panic!("vial.unlock_keys entry ({row}, {col}) is outside the {MATRIX_ROWS}x{MATRIX_COLS} matrix");
            }
        }
        let tri = &self.behavior.tri_layer;
        for layer in [tri.lower, tri.raise, tri.adjust] {
            if layer >= 4 {
                panic!("behavior.tri_layer refers to layer {layer}, the keymap has 4 layers");
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct DurationMillis(#[serde(deserialize_with = "parse_duration_millis")] u64);

fn parse_duration_millis<'de, D: de::Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    let input: String = de::Deserialize::deserialize(deserializer)?;
    let num = input.trim_end_matches(|c: char| !c.is_numeric());
    let unit = &input[num.len()..];
    let num: u64 = num.parse().map_err(|_| {
        de::Error::custom(format!(
            "Invalid number \"{num}\" in duration: number part must be a u64"
        ))
    })?;

    match unit {
        "s" => Ok(num * 1000),
        "ms" => Ok(num),
        other => Err(de::Error::custom(format!(
            "Invalid duration unit \"{other}\": unit part must be either \"s\" or \"ms\""
        ))),
    }
}
