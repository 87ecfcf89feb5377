//! Source rewrites that make an Oryx export build against stock QMK with Vial.

use regex::Regex;

use crate::error::Result;
use crate::parse::find_matching;

/// Headers that only exist in ZSA's QMK fork
pub const ZSA_HEADERS: [&str; 3] = ["version.h", "zsa.h", "muse.h"];

/// Comment out `#include "<header>"` lines
pub fn comment_out_includes(text: &str, headers: &[&str]) -> Result<String> {
    let mut out = text.to_string();
    for header in headers {
        let re = Regex::new(&format!(
            r#"(?m)^([ \t]*)(#include\s+"{}")"#,
            regex::escape(header)
        ))?;
        out = re.replace_all(&out, "${1}// ${2}").into_owned();
    }
    Ok(out)
}

/// Old exports declare `layer_state_set_user` on `uint8_t` or `uint32_t`
pub fn modernize_layer_state_signature(text: &str) -> Result<String> {
    let re = Regex::new(
        r"(?:uint8_t|uint32_t|layer_state_t)\s+layer_state_set_user\s*\(\s*(?:uint8_t|uint32_t|layer_state_t)\s+state\s*\)",
    )?;
    Ok(re
        .replace_all(text, "layer_state_t layer_state_set_user(layer_state_t state)")
        .into_owned())
}

/// Wrap the definition of `void <name>(...) { ... }` in `#if 0`.
///
/// Preprocessor guards nest where block comments would not.
pub fn disable_function(text: &str, name: &str) -> Result<String> {
    let re = Regex::new(&format!(r"void\s+{}\s*\([^)]*\)\s*\{{", regex::escape(name)))?;
    let Some(m) = re.find(text) else {
        return Ok(text.to_string());
    };
    let close = find_matching(text, m.end() - 1, '{', '}')?;
    Ok(format!(
        "{}\n#if 0 // Disabled by oryx-convert\n{}\n#endif\n{}",
        &text[..m.start()],
        &text[m.start()..=close],
        &text[close + 1..]
    ))
}

/// Comment out a `void <name>(...);` prototype
pub fn comment_out_prototype(text: &str, name: &str) -> Result<String> {
    let re = Regex::new(&format!(
        r"(?m)^([ \t]*)(void\s+{}\s*\([^)]*\)\s*;)",
        regex::escape(name)
    ))?;
    Ok(re.replace_all(text, "${1}// ${2}").into_owned())
}

/// Empty combo and key override tables, Vial's introspection links against them
pub fn introspection_stubs(text: &str) -> String {
    let mut stubs = String::from("\n\n/* Introspection Fixes for Vial/QMK */\n");
    if !text.contains("key_combos") {
        stubs.push_str("#ifdef COMBO_ENABLE\nconst combo_t PROGMEM key_combos[0] = {};\n#endif\n");
    }
    if !text.contains("key_overrides") {
        stubs.push_str("#ifdef KEY_OVERRIDE_ENABLE\nconst key_override_t *key_overrides[] = { NULL };\n#endif\n");
    }
    stubs
}

/// Fixups of the Vial keymap
pub fn qmk_fixups(text: &str) -> Result<String> {
    let mut out = comment_out_includes(text, &ZSA_HEADERS)?;
    out = modernize_layer_state_signature(&out)?;
    // The muse clock in matrix_scan_user fights with Vial's matrix polling
    if out.contains("muse_clock_pulse") || out.contains("matrix_scan_user") {
        log::info!("Disabling matrix_scan_user");
        out = disable_function(&out, "matrix_scan_user")?;
        out = comment_out_prototype(&out, "matrix_scan_user")?;
    }
    out.push_str(&introspection_stubs(&out));
    Ok(out)
}

/// Fixups of the plain grid keymap
pub fn grid_fixups(text: &str) -> Result<String> {
    let out = modernize_layer_state_signature(text)?;
    let out = out.replace("ZSA_SAFE_RANGE", "SAFE_RANGE");
    comment_out_includes(&out, &ZSA_HEADERS[..2])
}
