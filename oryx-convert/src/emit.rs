use log::warn;

use crate::error::{ConvertError, Result};
use crate::keycode_alias::KeycodeResolver;
use crate::matrix::{MATRIX_COLS, Matrix, VISUAL_COLS, normalize, transpose};
use crate::parse::KeymapSource;

/// Layers the firmware keymap holds
const FIRMWARE_LAYERS: usize = 4;

/// A layer laid out on the 8x6 matrix
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertedLayer {
    pub name: String,
    pub matrix: Matrix,
}

pub fn convert_layers(source: &KeymapSource<'_>) -> Vec<ConvertedLayer> {
    source
        .layers
        .iter()
        .map(|layer| ConvertedLayer {
            name: layer.name.clone(),
            matrix: transpose(&normalize(&layer.name, &layer.keys)),
        })
        .collect()
}

fn row_label(row: usize) -> String {
    if row < 4 {
        format!("L{row}")
    } else {
        format!("R{}", row - 4)
    }
}

/// The QMK `keymaps` array, one `{ ... }` row per matrix row
pub fn qmk_keymaps_block(layers: &[ConvertedLayer]) -> String {
    let mut out = vec!["const uint16_t PROGMEM keymaps[][MATRIX_ROWS][MATRIX_COLS] = {".to_string()];
    for layer in layers {
        out.push(format!("    [{}] = {{ // Converted from {}", layer.name, layer.name));
        for (r, row) in layer.matrix.iter().enumerate() {
            let keys = row.iter().map(|k| format!("{k:<7}")).collect::<Vec<_>>().join(", ");
            out.push(format!("        {{ {} }}, // {}", keys, row_label(r)));
        }
        out.push("    },".to_string());
    }
    out.push("};".to_string());
    out.join("\n")
}

/// `keymap.c` with the keymaps array replaced by the matrix block
pub fn qmk_keymap(source: &KeymapSource<'_>) -> String {
    let block = qmk_keymaps_block(&convert_layers(source));
    let text = source.text;
    format!(
        "{}{}{}",
        &text[..source.declaration.start],
        block,
        &text[source.declaration.end..]
    )
}

/// `KEYMAP` constant for `planck-keymap/src/keymap.rs`
pub fn rust_keymap(source: &KeymapSource<'_>) -> Result<String> {
    let names = source.layer_names();
    let resolver = KeycodeResolver::new(&names, &source.defines);
    let layers = convert_layers(source);
    if layers.len() != FIRMWARE_LAYERS {
        warn!(
            "Export has {} layers, the firmware keymap holds {}",
            layers.len(),
            FIRMWARE_LAYERS
        );
    }
    let count = if layers.len() == FIRMWARE_LAYERS {
        "NUM_LAYER".to_string()
    } else {
        layers.len().to_string()
    };

    let mut out = vec![
        "// Converted by oryx-convert".to_string(),
        "#[rustfmt::skip]".to_string(),
        format!("pub const KEYMAP: [[[KeyAction; COL]; ROW]; {count}] = ["),
    ];
    for layer in &layers {
        out.push(format!("    // {}", layer.name));
        out.push("    layer!([".to_string());
        let mut rows = Vec::with_capacity(layer.matrix.len());
        for (r, row) in layer.matrix.iter().enumerate() {
            let mut keys = Vec::with_capacity(MATRIX_COLS);
            for (c, keycode) in row.iter().enumerate() {
                let expr = resolver.to_rust(keycode).ok_or_else(|| ConvertError::UnknownKeycode {
                    layer: layer.name.clone(),
                    row: r,
                    col: c,
                    keycode: keycode.clone(),
                })?;
                keys.push(expr);
            }
            rows.push(format!("        [{}]", keys.join(", ")));
        }
        out.push(rows.join(",\n"));
        out.push("    ]),".to_string());
    }
    out.push("];".to_string());
    Ok(out.join("\n") + "\n")
}

/// `LAYOUT_planck_grid(...)` with 4 rows of 12
pub fn planck_grid_call(keys: &[String]) -> String {
    let rows = keys
        .chunks(VISUAL_COLS)
        .map(|row| row.join(", "))
        .collect::<Vec<_>>()
        .join(",\n    ");
    format!("LAYOUT_planck_grid(\n    {rows}\n)")
}

/// Rewrite every layout call of the export in place
pub fn planck_grid(source: &KeymapSource<'_>) -> String {
    let text = source.text;
    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    for layer in &source.layers {
        out.push_str(&text[last..layer.call.start]);
        out.push_str(&planck_grid_call(&normalize(&layer.name, &layer.keys)));
        last = layer.call.end;
    }
    out.push_str(&text[last..]);
    out
}
