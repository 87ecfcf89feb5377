//! Converter from ZSA Oryx `keymap.c` exports to the Planck rev6 keymap.
//!
//! Oryx lays a Planck out as a 4x12 grid, the rev6 PCB is wired as an 8x6
//! matrix. The converter parses the export, normalizes every layer to 48 keys
//! and writes one of:
//!
//! - `rust`: the `KEYMAP` constant of `planck-keymap`
//! - `qmk`: a QMK/Vial `keymap.c` on the 8x6 matrix, with `rules.mk` and `config.h`
//! - `grid`: the export rewritten to `LAYOUT_planck_grid`
pub mod emit;
pub mod error;
pub mod fixups;
pub mod keycode_alias;
pub mod matrix;
pub mod parse;
pub mod templates;

pub use error::{ConvertError, Result};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// `layer!` tables for planck-keymap
    #[default]
    Rust,
    /// QMK/Vial keymap.c, rules.mk and config.h
    Qmk,
    /// Plain QMK keymap.c on LAYOUT_planck_grid
    Grid,
}

/// A generated file, named relative to the output directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputFile {
    pub name: &'static str,
    pub contents: String,
}

pub fn convert(text: &str, format: OutputFormat) -> Result<Vec<OutputFile>> {
    let source = parse::parse_keymap(text)?;
    log::info!("Found {} layers", source.layers.len());

    let files = match format {
        OutputFormat::Rust => vec![OutputFile {
            name: "keymap.rs",
            contents: emit::rust_keymap(&source)?,
        }],
        OutputFormat::Qmk => {
            let keymap = fixups::qmk_fixups(&emit::qmk_keymap(&source))?;
            vec![
                OutputFile {
                    name: "keymap.c",
                    contents: format!(
                        "// Converted by oryx-convert\n// Retains Vial/OLKB Matrix Compatibility\n{keymap}"
                    ),
                },
                OutputFile {
                    name: "rules.mk",
                    contents: templates::RULES_MK.to_string(),
                },
                OutputFile {
                    name: "config.h",
                    contents: templates::config_h(&templates::VIAL_KEYBOARD_UID, &templates::VIAL_UNLOCK_KEYS),
                },
            ]
        }
        OutputFormat::Grid => {
            let keymap = fixups::grid_fixups(&emit::planck_grid(&source))?;
            vec![OutputFile {
                name: "keymap.c",
                contents: format!("// Converted from Oryx to QMK Planck Grid\n{keymap}"),
            }]
        }
    };
    Ok(files)
}
