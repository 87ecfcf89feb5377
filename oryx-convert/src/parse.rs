//! Locate the keymaps array of an Oryx `keymap.c` and pull out its layers.

use std::collections::HashMap;
use std::ops::Range;

use log::{debug, warn};
use regex::Regex;

use crate::error::{ConvertError, Result};
use crate::matrix::GRID_KEYS;

/// One `[NAME] = LAYOUT(...)` or `LAYOUT_xxx(...)` entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OryxLayer {
    pub name: String,
    /// Byte range of the layout call, closing parenthesis included
    pub call: Range<usize>,
    /// Keycodes in visual order, comments stripped
    pub keys: Vec<String>,
}

/// A parsed Oryx export
#[derive(Debug, Clone)]
pub struct KeymapSource<'a> {
    pub text: &'a str,
    /// Byte range of the whole declaration, from `const` to the trailing `;`
    pub declaration: Range<usize>,
    pub layers: Vec<OryxLayer>,
    /// Object-like `#define NAME VALUE` macros of the file
    pub defines: HashMap<String, String>,
}

impl KeymapSource<'_> {
    /// Index of a layer by its enum name, like `_LOWER`
    pub fn layer_index(&self, name: &str) -> Option<usize> {
        self.layers.iter().position(|l| l.name == name)
    }

    pub fn layer_names(&self) -> Vec<String> {
        self.layers.iter().map(|l| l.name.clone()).collect()
    }
}

pub fn parse_keymap(text: &str) -> Result<KeymapSource<'_>> {
    let start_re = Regex::new(
        r"(?:const\s+uint16_t\s+(?:PROGMEM\s+)?)?keymaps\s*\[\s*\]\s*\[\s*MATRIX_ROWS\s*\]\s*\[\s*MATRIX_COLS\s*\]\s*=\s*\{",
    )?;
    let m = start_re.find(text).ok_or(ConvertError::KeymapsNotFound)?;
    let open = m.end() - 1;
    let close = find_matching(text, open, '{', '}')?;

    // Swallow the `;` after the closing brace
    let mut end = close + 1;
    let rest = &text[end..];
    let trimmed = rest.trim_start();
    if trimmed.starts_with(';') {
        end += rest.len() - trimmed.len() + 1;
    }

    let layer_re = Regex::new(r"\[([^\]]+)\]\s*=\s*(LAYOUT\w*)\s*\(")?;
    let mut layers = Vec::new();
    for caps in layer_re.captures_iter(&text[..close]) {
        let whole = caps.get(0).ok_or(ConvertError::NoLayers)?;
        if whole.start() < open {
            continue;
        }
        let layout = caps.get(2).ok_or(ConvertError::NoLayers)?;
        let paren = whole.end() - 1;
        let paren_close = find_matching(text, paren, '(', ')')?;
        let name = caps[1].trim().to_string();
        let keys = split_keycodes(&strip_line_comments(&text[paren + 1..paren_close]));
        if keys.len() < GRID_KEYS - 1 {
            warn!("Layer {} has only {} keys, check the export", name, keys.len());
        }
        debug!("Found layer {} with {} keys", name, keys.len());
        layers.push(OryxLayer {
            name,
            call: layout.start()..paren_close + 1,
            keys,
        });
    }

    if layers.is_empty() {
        return Err(ConvertError::NoLayers);
    }

    Ok(KeymapSource {
        text,
        declaration: m.start()..end,
        layers,
        defines: parse_defines(text)?,
    })
}

/// Find the closing delimiter of the one at `open_at`, skipping `//` comments
pub fn find_matching(text: &str, open_at: usize, open: char, close: char) -> Result<usize> {
    let bytes = text.as_bytes();
    let mut depth = 0usize;
    let mut i = open_at;
    while i < bytes.len() {
        let c = bytes[i] as char;
        if c == '/' && bytes.get(i + 1) == Some(&b'/') {
            while i < bytes.len() && bytes[i] != b'\n' {
                i += 1;
            }
            continue;
        }
        if c == open {
            depth += 1;
        } else if c == close {
            depth = depth.saturating_sub(1);
            if depth == 0 {
                return Ok(i);
            }
        }
        i += 1;
    }
    Err(ConvertError::Unbalanced {
        open,
        offset: open_at,
    })
}

pub fn strip_line_comments(content: &str) -> String {
    content
        .lines()
        .map(|line| match line.find("//") {
            Some(pos) => &line[..pos],
            None => line,
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Split at commas that are not nested in `()`, `[]` or `{}`
pub fn split_keycodes(content: &str) -> Vec<String> {
    let mut keys = Vec::new();
    let mut current = String::new();
    let mut depth = 0i32;
    for c in content.chars() {
        match c {
            '(' | '[' | '{' => {
                depth += 1;
                current.push(c);
            }
            ')' | ']' | '}' => {
                depth -= 1;
                current.push(c);
            }
            ',' if depth == 0 => {
                push_key(&mut keys, &current);
                current.clear();
            }
            '\r' | '\n' => current.push(' '),
            _ => current.push(c),
        }
    }
    push_key(&mut keys, &current);
    keys
}

fn push_key(keys: &mut Vec<String>, raw: &str) {
    let key = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    if !key.is_empty() {
        keys.push(key);
    }
}

fn parse_defines(text: &str) -> Result<HashMap<String, String>> {
    let define_re = Regex::new(r"(?m)^\s*#define\s+([A-Za-z_]\w*)[ \t]+([^\r\n]+?)\s*$")?;
    let mut defines = HashMap::new();
    for caps in define_re.captures_iter(text) {
        let value = strip_line_comments(&caps[2]).trim().to_string();
        if !value.is_empty() {
            defines.insert(caps[1].to_string(), value);
        }
    }
    Ok(defines)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
#define LOWER MO(_LOWER)
#define DUAL_FUNC_0 LT(5, KC_D) // placeholder
const uint16_t PROGMEM keymaps[][MATRIX_ROWS][MATRIX_COLS] = {
  [_BASE] = LAYOUT_planck_grid(
    KC_A, MT(MOD_LSFT, KC_B), // first (row
    LOWER, KC_C
  ),
  [_LOWER] = LAYOUT(KC_TRANSPARENT, KC_1),
};
int after;
"#;

    #[test]
    fn test_split_keycodes_nested() {
        assert_eq!(
            split_keycodes("KC_A, MT(MOD_LSFT, KC_B),\n LCTL(LSFT(KC_C)) , {1, 2}"),
            vec!["KC_A", "MT(MOD_LSFT, KC_B)", "LCTL(LSFT(KC_C))", "{1, 2}"]
        );
        assert!(split_keycodes(" , ,").is_empty());
    }

    #[test]
    fn test_parse_layers() {
        let source = parse_keymap(SAMPLE).unwrap();
        assert_eq!(source.layers.len(), 2);
        assert_eq!(source.layers[0].name, "_BASE");
        assert_eq!(source.layers[0].keys, vec!["KC_A", "MT(MOD_LSFT, KC_B)", "LOWER", "KC_C"]);
        assert_eq!(source.layers[1].keys, vec!["KC_TRANSPARENT", "KC_1"]);
        assert_eq!(source.layer_index("_LOWER"), Some(1));
        assert!(SAMPLE[source.layers[1].call.clone()].starts_with("LAYOUT("));
        assert!(SAMPLE[source.declaration.clone()].ends_with("};"));
        assert_eq!(source.defines.get("LOWER").map(String::as_str), Some("MO(_LOWER)"));
        assert_eq!(source.defines.get("DUAL_FUNC_0").map(String::as_str), Some("LT(5, KC_D)"));
    }

    #[test]
    fn test_layout_macro_forms() {
        for layout in ["LAYOUT", "LAYOUT_planck_grid", "LAYOUT_ortho_4x12"] {
            let text = format!("keymaps[][MATRIX_ROWS][MATRIX_COLS] = {{\n  [0] = {layout} (KC_A, KC_B),\n}};");
            let source = parse_keymap(&text).unwrap();
            assert_eq!(source.layers.len(), 1, "{layout}");
            assert_eq!(source.layers[0].keys, vec!["KC_A", "KC_B"]);
            assert!(text[source.layers[0].call.clone()].starts_with(layout));
        }
        // Other calls inside the array are not layers
        assert!(matches!(
            parse_keymap("keymaps[][MATRIX_ROWS][MATRIX_COLS] = {\n  [0] = KEYS(KC_A),\n};"),
            Err(ConvertError::NoLayers)
        ));
    }

    #[test]
    fn test_missing_keymaps() {
        assert!(matches!(parse_keymap("int main() {}"), Err(ConvertError::KeymapsNotFound)));
        assert!(matches!(
            parse_keymap("const uint16_t PROGMEM keymaps[][MATRIX_ROWS][MATRIX_COLS] = {\n};"),
            Err(ConvertError::NoLayers)
        ));
        assert!(matches!(
            parse_keymap("keymaps[][MATRIX_ROWS][MATRIX_COLS] = { [0] = LAYOUT(KC_A"),
            Err(ConvertError::Unbalanced { .. })
        ));
    }
}
