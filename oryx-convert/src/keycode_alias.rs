//! QMK keycode names and their `planck-keymap` layout macro expressions.

use std::collections::HashMap;

use once_cell::sync::Lazy;

/// QMK name -> `KeyCode` variant
pub static KEYCODE_ALIAS: Lazy<HashMap<&str, &str>> = Lazy::new(|| {
    let mut m = HashMap::new();

    macro_rules! add_alias {
        ($keycode:tt = $( $alias:expr),*) => {
            $(
                m.insert($alias, $keycode);
            )*
        };
    }

    add_alias!("A" = "KC_A");
    add_alias!("B" = "KC_B");
    add_alias!("C" = "KC_C");
    add_alias!("D" = "KC_D");
    add_alias!("E" = "KC_E");
    add_alias!("F" = "KC_F");
    add_alias!("G" = "KC_G");
    add_alias!("H" = "KC_H");
    add_alias!("I" = "KC_I");
    add_alias!("J" = "KC_J");
    add_alias!("K" = "KC_K");
    add_alias!("L" = "KC_L");
    add_alias!("M" = "KC_M");
    add_alias!("N" = "KC_N");
    add_alias!("O" = "KC_O");
    add_alias!("P" = "KC_P");
    add_alias!("Q" = "KC_Q");
    add_alias!("R" = "KC_R");
    add_alias!("S" = "KC_S");
    add_alias!("T" = "KC_T");
    add_alias!("U" = "KC_U");
    add_alias!("V" = "KC_V");
    add_alias!("W" = "KC_W");
    add_alias!("X" = "KC_X");
    add_alias!("Y" = "KC_Y");
    add_alias!("Z" = "KC_Z");
    add_alias!("Kc1" = "KC_1");
    add_alias!("Kc2" = "KC_2");
    add_alias!("Kc3" = "KC_3");
    add_alias!("Kc4" = "KC_4");
    add_alias!("Kc5" = "KC_5");
    add_alias!("Kc6" = "KC_6");
    add_alias!("Kc7" = "KC_7");
    add_alias!("Kc8" = "KC_8");
    add_alias!("Kc9" = "KC_9");
    add_alias!("Kc0" = "KC_0");
    add_alias!("Enter" = "KC_ENTER", "KC_ENT");
    add_alias!("Escape" = "KC_ESCAPE", "KC_ESC");
    add_alias!("Backspace" = "KC_BACKSPACE", "KC_BSPC", "KC_BSPACE");
    add_alias!("Tab" = "KC_TAB");
    add_alias!("Space" = "KC_SPACE", "KC_SPC");
    add_alias!("Minus" = "KC_MINUS", "KC_MINS");
    add_alias!("Equal" = "KC_EQUAL", "KC_EQL");
    add_alias!("LeftBracket" = "KC_LEFT_BRACKET", "KC_LBRACKET", "KC_LBRC");
    add_alias!("RightBracket" = "KC_RIGHT_BRACKET", "KC_RBRACKET", "KC_RBRC");
    add_alias!("Backslash" = "KC_BACKSLASH", "KC_BSLASH", "KC_BSLS");
    add_alias!("NonusHash" = "KC_NONUS_HASH", "KC_NUHS");
    add_alias!("Semicolon" = "KC_SEMICOLON", "KC_SCOLON", "KC_SCLN");
    add_alias!("Quote" = "KC_QUOTE", "KC_QUOT");
    add_alias!("Grave" = "KC_GRAVE", "KC_GRV");
    add_alias!("Comma" = "KC_COMMA", "KC_COMM");
    add_alias!("Dot" = "KC_DOT");
    add_alias!("Slash" = "KC_SLASH", "KC_SLSH");
    add_alias!("CapsLock" = "KC_CAPS_LOCK", "KC_CAPSLOCK", "KC_CAPS");
    add_alias!("F1" = "KC_F1");
    add_alias!("F2" = "KC_F2");
    add_alias!("F3" = "KC_F3");
    add_alias!("F4" = "KC_F4");
    add_alias!("F5" = "KC_F5");
    add_alias!("F6" = "KC_F6");
    add_alias!("F7" = "KC_F7");
    add_alias!("F8" = "KC_F8");
    add_alias!("F9" = "KC_F9");
    add_alias!("F10" = "KC_F10");
    add_alias!("F11" = "KC_F11");
    add_alias!("F12" = "KC_F12");
    add_alias!("PrintScreen" = "KC_PRINT_SCREEN", "KC_PSCREEN", "KC_PSCR");
    add_alias!("ScrollLock" = "KC_SCROLL_LOCK", "KC_SCROLLLOCK", "KC_SCRL");
    add_alias!("Pause" = "KC_PAUSE", "KC_PAUS", "KC_BRK");
    add_alias!("Insert" = "KC_INSERT", "KC_INS");
    add_alias!("Home" = "KC_HOME");
    add_alias!("PageUp" = "KC_PAGE_UP", "KC_PGUP");
    add_alias!("Delete" = "KC_DELETE", "KC_DEL");
    add_alias!("End" = "KC_END");
    add_alias!("PageDown" = "KC_PAGE_DOWN", "KC_PGDOWN", "KC_PGDN");
    add_alias!("Right" = "KC_RIGHT", "KC_RGHT");
    add_alias!("Left" = "KC_LEFT");
    add_alias!("Down" = "KC_DOWN");
    add_alias!("Up" = "KC_UP");
    add_alias!("NumLock" = "KC_NUM_LOCK", "KC_NUMLOCK", "KC_NUM");
    add_alias!("KpSlash" = "KC_KP_SLASH", "KC_PSLS");
    add_alias!("KpAsterisk" = "KC_KP_ASTERISK", "KC_PAST");
    add_alias!("KpMinus" = "KC_KP_MINUS", "KC_PMNS");
    add_alias!("KpPlus" = "KC_KP_PLUS", "KC_PPLS");
    add_alias!("KpEnter" = "KC_KP_ENTER", "KC_PENT");
    add_alias!("Kp1" = "KC_KP_1", "KC_P1");
    add_alias!("Kp2" = "KC_KP_2", "KC_P2");
    add_alias!("Kp3" = "KC_KP_3", "KC_P3");
    add_alias!("Kp4" = "KC_KP_4", "KC_P4");
    add_alias!("Kp5" = "KC_KP_5", "KC_P5");
    add_alias!("Kp6" = "KC_KP_6", "KC_P6");
    add_alias!("Kp7" = "KC_KP_7", "KC_P7");
    add_alias!("Kp8" = "KC_KP_8", "KC_P8");
    add_alias!("Kp9" = "KC_KP_9", "KC_P9");
    add_alias!("Kp0" = "KC_KP_0", "KC_P0");
    add_alias!("KpDot" = "KC_KP_DOT", "KC_PDOT");
    add_alias!("KpEqual" = "KC_KP_EQUAL", "KC_PEQL");
    add_alias!("KpComma" = "KC_KP_COMMA", "KC_PCMM");
    add_alias!("NonusBackslash" = "KC_NONUS_BACKSLASH", "KC_NUBS");
    add_alias!("Application" = "KC_APPLICATION", "KC_APP");
    add_alias!("KbPower" = "KC_KB_POWER");
    add_alias!("F13" = "KC_F13");
    add_alias!("F14" = "KC_F14");
    add_alias!("F15" = "KC_F15");
    add_alias!("F16" = "KC_F16");
    add_alias!("F17" = "KC_F17");
    add_alias!("F18" = "KC_F18");
    add_alias!("F19" = "KC_F19");
    add_alias!("F20" = "KC_F20");
    add_alias!("F21" = "KC_F21");
    add_alias!("F22" = "KC_F22");
    add_alias!("F23" = "KC_F23");
    add_alias!("F24" = "KC_F24");
    add_alias!("Execute" = "KC_EXECUTE", "KC_EXEC");
    add_alias!("Help" = "KC_HELP");
    add_alias!("Menu" = "KC_MENU");
    add_alias!("Select" = "KC_SELECT", "KC_SLCT");
    add_alias!("Stop" = "KC_STOP");
    add_alias!("Again" = "KC_AGAIN", "KC_AGIN");
    add_alias!("Undo" = "KC_UNDO");
    add_alias!("Cut" = "KC_CUT");
    add_alias!("Copy" = "KC_COPY");
    add_alias!("Paste" = "KC_PASTE", "KC_PSTE");
    add_alias!("Find" = "KC_FIND");
    add_alias!("KbMute" = "KC_KB_MUTE");
    add_alias!("KbVolumeUp" = "KC_KB_VOLUME_UP");
    add_alias!("KbVolumeDown" = "KC_KB_VOLUME_DOWN");
    add_alias!("AudioMute" = "KC_AUDIO_MUTE", "KC_MUTE");
    add_alias!("AudioVolUp" = "KC_AUDIO_VOL_UP", "KC_VOLU");
    add_alias!("AudioVolDown" = "KC_AUDIO_VOL_DOWN", "KC_VOLD");
    add_alias!("MediaNextTrack" = "KC_MEDIA_NEXT_TRACK", "KC_MNXT");
    add_alias!("MediaPrevTrack" = "KC_MEDIA_PREV_TRACK", "KC_MPRV");
    add_alias!("MediaStop" = "KC_MEDIA_STOP", "KC_MSTP");
    add_alias!("MediaPlayPause" = "KC_MEDIA_PLAY_PAUSE", "KC_MPLY");
    add_alias!("MouseUp" = "KC_MS_UP", "KC_MS_U", "MS_UP");
    add_alias!("MouseDown" = "KC_MS_DOWN", "KC_MS_D", "MS_DOWN");
    add_alias!("MouseLeft" = "KC_MS_LEFT", "KC_MS_L", "MS_LEFT");
    add_alias!("MouseRight" = "KC_MS_RIGHT", "KC_MS_R", "MS_RGHT");
    add_alias!("MouseBtn1" = "KC_MS_BTN1", "KC_BTN1", "MS_BTN1");
    add_alias!("MouseBtn2" = "KC_MS_BTN2", "KC_BTN2", "MS_BTN2");
    add_alias!("MouseBtn3" = "KC_MS_BTN3", "KC_BTN3", "MS_BTN3");
    add_alias!("MouseBtn4" = "KC_MS_BTN4", "KC_BTN4", "MS_BTN4");
    add_alias!("MouseBtn5" = "KC_MS_BTN5", "KC_BTN5", "MS_BTN5");
    add_alias!("MouseWheelUp" = "KC_MS_WH_UP", "KC_WH_U", "MS_WHLU");
    add_alias!("MouseWheelDown" = "KC_MS_WH_DOWN", "KC_WH_D", "MS_WHLD");
    add_alias!("MouseWheelLeft" = "KC_MS_WH_LEFT", "KC_WH_L", "MS_WHLL");
    add_alias!("MouseWheelRight" = "KC_MS_WH_RIGHT", "KC_WH_R", "MS_WHLR");
    add_alias!("MouseAccel0" = "KC_MS_ACCEL0", "KC_ACL0", "MS_ACL0");
    add_alias!("MouseAccel1" = "KC_MS_ACCEL1", "KC_ACL1", "MS_ACL1");
    add_alias!("MouseAccel2" = "KC_MS_ACCEL2", "KC_ACL2", "MS_ACL2");
    add_alias!("LCtrl" = "KC_LEFT_CTRL", "KC_LCTRL", "KC_LCTL");
    add_alias!("LShift" = "KC_LEFT_SHIFT", "KC_LSHIFT", "KC_LSFT");
    add_alias!("LAlt" = "KC_LEFT_ALT", "KC_LALT", "KC_LOPT");
    add_alias!("LGui" = "KC_LEFT_GUI", "KC_LGUI", "KC_LCMD", "KC_LWIN");
    add_alias!("RCtrl" = "KC_RIGHT_CTRL", "KC_RCTRL", "KC_RCTL");
    add_alias!("RShift" = "KC_RIGHT_SHIFT", "KC_RSHIFT", "KC_RSFT");
    add_alias!("RAlt" = "KC_RIGHT_ALT", "KC_RALT", "KC_ROPT", "KC_ALGR");
    add_alias!("RGui" = "KC_RIGHT_GUI", "KC_RGUI", "KC_RCMD", "KC_RWIN");
    add_alias!("AudioOn" = "QK_AUDIO_ON", "AU_ON");
    add_alias!("AudioOff" = "QK_AUDIO_OFF", "AU_OFF");
    add_alias!("AudioToggle" = "QK_AUDIO_TOGGLE", "AU_TOGG", "AU_TOG");
    add_alias!("MusicOn" = "QK_MUSIC_ON", "MU_ON");
    add_alias!("MusicOff" = "QK_MUSIC_OFF", "MU_OFF");
    add_alias!("MusicToggle" = "QK_MUSIC_TOGGLE", "MU_TOGG", "MU_TOG");
    add_alias!("Bootloader" = "QK_BOOTLOADER", "QK_BOOT", "RESET");

    m
});

/// Shifted symbols, QMK name -> unshifted `KeyCode` variant
pub static SHIFTED_ALIAS: Lazy<HashMap<&str, &str>> = Lazy::new(|| {
    let mut m = HashMap::new();

    macro_rules! add_shifted {
        ($keycode:tt = $( $alias:expr),*) => {
            $(
                m.insert($alias, $keycode);
            )*
        };
    }

    add_shifted!("Grave" = "KC_TILDE", "KC_TILD");
    add_shifted!("Kc1" = "KC_EXCLAIM", "KC_EXLM");
    add_shifted!("Kc2" = "KC_AT");
    add_shifted!("Kc3" = "KC_HASH");
    add_shifted!("Kc4" = "KC_DOLLAR", "KC_DLR");
    add_shifted!("Kc5" = "KC_PERCENT", "KC_PERC");
    add_shifted!("Kc6" = "KC_CIRCUMFLEX", "KC_CIRC");
    add_shifted!("Kc7" = "KC_AMPERSAND", "KC_AMPR");
    add_shifted!("Kc8" = "KC_ASTERISK", "KC_ASTR");
    add_shifted!("Kc9" = "KC_LEFT_PAREN", "KC_LPRN");
    add_shifted!("Kc0" = "KC_RIGHT_PAREN", "KC_RPRN");
    add_shifted!("Minus" = "KC_UNDERSCORE", "KC_UNDS");
    add_shifted!("Equal" = "KC_PLUS");
    add_shifted!("LeftBracket" = "KC_LEFT_CURLY_BRACE", "KC_LCBR");
    add_shifted!("RightBracket" = "KC_RIGHT_CURLY_BRACE", "KC_RCBR");
    add_shifted!("Backslash" = "KC_PIPE");
    add_shifted!("Semicolon" = "KC_COLON", "KC_COLN");
    add_shifted!("Quote" = "KC_DOUBLE_QUOTE", "KC_DQUO", "KC_DQT");
    add_shifted!("Comma" = "KC_LEFT_ANGLE_BRACKET", "KC_LABK", "KC_LT");
    add_shifted!("Dot" = "KC_RIGHT_ANGLE_BRACKET", "KC_RABK", "KC_GT");
    add_shifted!("Slash" = "KC_QUESTION", "KC_QUES");

    m
});

/// A set of modifiers, as written in a `ModifierCombination` expression
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Mods {
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
    pub gui: bool,
    pub right: bool,
}

impl Mods {
    const SHIFT: Self = Mods {
        ctrl: false,
        shift: true,
        alt: false,
        gui: false,
        right: false,
    };

    fn union(self, other: Self) -> Self {
        Mods {
            ctrl: self.ctrl || other.ctrl,
            shift: self.shift || other.shift,
            alt: self.alt || other.alt,
            gui: self.gui || other.gui,
            right: self.right || other.right,
        }
    }

    fn is_empty(&self) -> bool {
        !(self.ctrl || self.shift || self.alt || self.gui)
    }

    /// Modifiers of a QMK modifier name: `LSFT`, `MOD_RCTL`, `RCTL_T`
    fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        let name = name.strip_prefix("MOD_").unwrap_or(name);
        let name = name.strip_suffix("_T").unwrap_or(name);
        let mut mods = Mods::default();
        let (right, base) = match name {
            "HYPR" | "ALL" => {
                return Some(Mods {
                    ctrl: true,
                    shift: true,
                    alt: true,
                    gui: true,
                    right: false,
                });
            }
            "MEH" => {
                return Some(Mods {
                    ctrl: true,
                    shift: true,
                    alt: true,
                    gui: false,
                    right: false,
                });
            }
            "S" => (false, "SFT"),
            "C" => (false, "CTL"),
            "A" => (false, "ALT"),
            "G" => (false, "GUI"),
            _ if name.len() == 4 && name.starts_with('L') => (false, &name[1..]),
            _ if name.len() == 4 && name.starts_with('R') => (true, &name[1..]),
            _ => return None,
        };
        match base {
            "CTL" => mods.ctrl = true,
            "SFT" => mods.shift = true,
            "ALT" | "OPT" => mods.alt = true,
            "GUI" | "CMD" | "WIN" => mods.gui = true,
            _ => return None,
        }
        mods.right = right;
        Some(mods)
    }

    /// `MOD_LCTL | MOD_LSFT`
    fn from_mask(mask: &str) -> Option<Self> {
        mask.split('|')
            .map(Mods::from_name)
            .try_fold(Mods::default(), |acc, m| m.map(|m| acc.union(m)))
            .filter(|m| !m.is_empty())
    }

    pub fn to_rust(self) -> String {
        let held = [self.ctrl, self.shift, self.alt, self.gui];
        if held.iter().filter(|h| **h).count() == 1 {
            let side = if self.right { "R" } else { "L" };
            let name = if self.ctrl {
                "CTRL"
            } else if self.shift {
                "SHIFT"
            } else if self.alt {
                "ALT"
            } else {
                "GUI"
            };
            format!("ModifierCombination::{side}{name}")
        } else {
            format!(
                "ModifierCombination::new_from({}, {}, {}, {}, {})",
                self.right, self.gui, self.alt, self.shift, self.ctrl
            )
        }
    }
}

/// Split `NAME(arg, arg)` into its name and top-level arguments
fn split_call(keycode: &str) -> Option<(&str, Vec<String>)> {
    let open = keycode.find('(')?;
    let inner = keycode.strip_suffix(')')?.get(open + 1..)?;
    let name = keycode[..open].trim();
    if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return None;
    }
    Some((name, crate::parse::split_keycodes(inner)))
}

/// Turns QMK keycodes of one export into layout macro expressions
pub struct KeycodeResolver<'a> {
    layers: &'a [String],
    defines: &'a HashMap<String, String>,
}

/// Nesting limit for `#define` expansion
const MAX_DEFINE_DEPTH: u8 = 4;

impl<'a> KeycodeResolver<'a> {
    pub fn new(layers: &'a [String], defines: &'a HashMap<String, String>) -> Self {
        Self { layers, defines }
    }

    /// Expression for `keycode`, `None` when it has no counterpart
    pub fn to_rust(&self, keycode: &str) -> Option<String> {
        self.resolve(keycode.trim(), 0)
    }

    fn resolve(&self, keycode: &str, depth: u8) -> Option<String> {
        match keycode {
            "KC_NO" | "XXXXXXX" => return Some("a!(No)".to_string()),
            "KC_TRNS" | "KC_TRANSPARENT" | "_______" => return Some("a!(Transparent)".to_string()),
            _ => {}
        }
        // Custom dual-function keys are defined as placeholders, take them before the defines
        if let Some(index) = keycode.strip_prefix("DUAL_FUNC_").and_then(|i| i.parse::<u8>().ok()) {
            return Some(format!("dual!({index})"));
        }
        if let Some(v) = KEYCODE_ALIAS.get(keycode) {
            return Some(format!("k!({v})"));
        }
        if let Some(v) = SHIFTED_ALIAS.get(keycode) {
            return Some(format!("shifted!({v})"));
        }
        if let Some((name, args)) = split_call(keycode) {
            return self.resolve_call(name, &args, depth);
        }
        if depth < MAX_DEFINE_DEPTH {
            if let Some(value) = self.defines.get(keycode) {
                return self.resolve(value, depth + 1);
            }
        }
        None
    }

    fn resolve_call(&self, name: &str, args: &[String], depth: u8) -> Option<String> {
        match (name, args) {
            ("MO", [layer]) => Some(format!("mo!({})", self.layer(layer, depth)?)),
            ("TG", [layer]) => Some(format!("tg!({})", self.layer(layer, depth)?)),
            ("TT", [layer]) => Some(format!("tt!({})", self.layer(layer, depth)?)),
            ("TD", [dance]) => Some(format!("td!({})", dance_index(dance)?)),
            ("LT", [layer, key]) => Some(format!("lt!({}, {})", self.layer(layer, depth)?, basic(key)?)),
            ("MT", [mask, key]) => Some(format!("mt!({}, {})", basic(key)?, Mods::from_mask(mask)?.to_rust())),
            (_, [key]) if name.ends_with("_T") => {
                let mods = Mods::from_name(name)?;
                Some(format!("mt!({}, {})", basic(key)?, mods.to_rust()))
            }
            (_, [inner]) => {
                let (inner_mods, key) = modified_key(inner)?;
                let mods = Mods::from_name(name)?.union(inner_mods);
                if mods == Mods::SHIFT {
                    Some(format!("shifted!({key})"))
                } else {
                    Some(format!("wm!({key}, {})", mods.to_rust()))
                }
            }
            _ => None,
        }
    }

    /// Layer index of a number, a layer enum name or a define of either
    fn layer(&self, arg: &str, depth: u8) -> Option<usize> {
        let arg = arg.trim();
        if let Ok(n) = arg.parse::<usize>() {
            return Some(n);
        }
        if let Some(n) = self.layers.iter().position(|l| l == arg) {
            return Some(n);
        }
        if depth < MAX_DEFINE_DEPTH {
            return self.layer(self.defines.get(arg)?, depth + 1);
        }
        None
    }
}

/// Variant of a plain keycode, as taken by `mt!` and `lt!`
fn basic(keycode: &str) -> Option<&'static str> {
    KEYCODE_ALIAS.get(keycode.trim()).copied()
}

/// Modifiers and base key of `LCTL(LSFT(KC_A))`
fn modified_key(keycode: &str) -> Option<(Mods, &'static str)> {
    let keycode = keycode.trim();
    if let Some(v) = basic(keycode) {
        return Some((Mods::default(), v));
    }
    if let Some(v) = SHIFTED_ALIAS.get(keycode) {
        return Some((Mods::SHIFT, v));
    }
    let (name, args) = split_call(keycode)?;
    let [inner] = args.as_slice() else {
        return None;
    };
    let mods = Mods::from_name(name)?;
    let (inner_mods, key) = modified_key(inner)?;
    Some((mods.union(inner_mods), key))
}

/// `TD(3)` or `TD(DANCE_3)`
fn dance_index(arg: &str) -> Option<u8> {
    let digits: String = arg.trim().chars().rev().take_while(|c| c.is_ascii_digit()).collect();
    digits.chars().rev().collect::<String>().parse().ok()
}
